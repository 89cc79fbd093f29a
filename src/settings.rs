use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use log::{info, warn};
use tokio::task::JoinHandle;

use crate::profile::{AdaptationProfile, ProfileStore};

/// The adaptation profile as a flat JSON record on disk.
#[derive(Debug, Clone)]
pub struct ProfileFile {
    path: PathBuf,
}

impl ProfileFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Missing or unreadable files fall back to the default profile.
    pub fn load(&self) -> AdaptationProfile {
        if !self.path.exists() {
            return AdaptationProfile::default();
        }

        let parsed = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read profile from {}", self.path.display()))
            .and_then(|contents| {
                serde_json::from_str(&contents).context("Failed to parse profile JSON")
            });

        match parsed {
            Ok(profile) => profile,
            Err(err) => {
                warn!("Using default profile: {err:#}");
                AdaptationProfile::default()
            }
        }
    }

    pub fn save(&self, profile: &AdaptationProfile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let serialized = serde_json::to_string_pretty(profile)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write profile to {}", self.path.display()))
    }
}

/// Saves the profile after each burst of changes, once `debounce` has passed
/// without further notifications. Ends when the store is dropped.
pub fn spawn_autosave(store: &ProfileStore, file: ProfileFile, debounce: Duration) -> JoinHandle<()> {
    let mut rx = store.subscribe();
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            loop {
                tokio::select! {
                    changed = rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                    _ = tokio::time::sleep(debounce) => break,
                }
            }

            let profile = rx.borrow_and_update().clone();
            match file.save(&profile) {
                Ok(()) => info!("Profile saved to {}", file.path().display()),
                Err(err) => warn!("Failed to save profile: {err:#}"),
            }
        }
    })
}
