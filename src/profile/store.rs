use std::sync::Arc;

use log::debug;
use serde_json::Value;
use tokio::sync::watch;

use super::external::NeuroProfile;
use super::presets::Preset;
use super::types::AdaptationProfile;
use super::update::ProfileUpdate;

/// Owner of the live adaptation profile.
///
/// Every mutation goes through this store. Subscribers get a watch
/// notification only when the record actually changed, so a no-op merge or
/// update never wakes the timer or the session controller.
#[derive(Clone)]
pub struct ProfileStore {
    tx: Arc<watch::Sender<AdaptationProfile>>,
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::with_profile(AdaptationProfile::default())
    }

    pub fn with_profile(profile: AdaptationProfile) -> Self {
        let (tx, _rx) = watch::channel(profile);
        Self { tx: Arc::new(tx) }
    }

    pub fn get(&self) -> AdaptationProfile {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AdaptationProfile> {
        self.tx.subscribe()
    }

    /// Applies a typed update. Returns whether the profile changed.
    pub fn apply(&self, update: ProfileUpdate) -> bool {
        self.modify(|profile| update.apply(profile))
    }

    /// Applies an update addressed by a dotted path. Unsupported paths and
    /// mistyped values are ignored.
    pub fn update(&self, path: &str, value: &Value) -> bool {
        match ProfileUpdate::from_path(path, value) {
            Some(update) => self.apply(update),
            None => {
                debug!("Ignoring unsupported profile update '{path}' = {value}");
                false
            }
        }
    }

    pub fn merge_from_external_profile(&self, incoming: &NeuroProfile) -> bool {
        self.modify(|profile| incoming.merge_into(profile))
    }

    pub fn apply_preset(&self, preset: Preset) -> bool {
        let changed = self.modify(|profile| preset.apply(profile));
        debug!("Applied {preset} preset (changed: {changed})");
        changed
    }

    pub fn reset_to_defaults(&self) -> bool {
        self.apply_preset(Preset::Default)
    }

    pub fn replace(&self, profile: AdaptationProfile) -> bool {
        self.modify(|current| *current = profile)
    }

    fn modify<F>(&self, mutate: F) -> bool
    where
        F: FnOnce(&mut AdaptationProfile),
    {
        self.tx.send_if_modified(|current| {
            let before = current.clone();
            mutate(current);
            *current != before
        })
    }
}
