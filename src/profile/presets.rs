use std::{fmt, str::FromStr};

use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};

use super::types::{AdaptationProfile, AdhdSettings, AutismSettings, DyslexiaSettings};

/// Hand-tuned bundles for the common support needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Preset {
    Adhd,
    Autism,
    Dyslexia,
    Default,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Adhd => "adhd",
            Preset::Autism => "autism",
            Preset::Dyslexia => "dyslexia",
            Preset::Default => "default",
        }
    }

    /// Overwrites the preset's group and its related display fields.
    /// Fields outside the bundle keep their current values, except for
    /// `Default`, which replaces the whole record.
    pub fn apply(self, profile: &mut AdaptationProfile) {
        match self {
            Preset::Adhd => {
                profile.adhd = AdhdSettings {
                    short_attention_blocks: true,
                    enable_break_reminders: true,
                    auto_resume_after_break: false,
                    reduce_visual_clutter: true,
                    increase_focus_indicators: true,
                    show_progress_indicator: true,
                };
                profile.typography.text_size = 18.0;
                profile.typography.line_height = 1.8;
                profile.enable_crowd_interactions = true;
                profile.auto_advance_pages = false;
            }
            Preset::Autism => {
                profile.autism = AutismSettings {
                    enhance_predictability: true,
                    reduce_animations: true,
                    clear_visual_structure: true,
                    explicit_instructions: true,
                    sensory_comfort: true,
                };
                profile.typography.text_size = 16.0;
                profile.typography.line_height = 1.6;
                profile.enable_crowd_interactions = true;
                profile.auto_advance_pages = true;
            }
            Preset::Dyslexia => {
                profile.dyslexia = DyslexiaSettings {
                    high_contrast_text: true,
                    larger_font_size: true,
                    reading_guide: true,
                    audio_support: true,
                };
                profile.typography.text_size = 20.0;
                profile.typography.line_height = 2.0;
                profile.typography.background_color = "#f8f9fa".into();
                profile.typography.text_color = "#000000".into();
                profile.enable_crowd_interactions = true;
                profile.auto_advance_pages = false;
            }
            Preset::Default => *profile = AdaptationProfile::default(),
        }
    }
}

impl FromStr for Preset {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "adhd" => Ok(Preset::Adhd),
            "autism" => Ok(Preset::Autism),
            "dyslexia" => Ok(Preset::Dyslexia),
            "default" => Ok(Preset::Default),
            other => Err(anyhow!("unknown preset '{other}'")),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
