use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Typography {
    pub text_size: f32,
    pub line_height: f32,
    pub font_family: String,
    pub background_color: String,
    pub text_color: String,
    pub progress_bar_color: String,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            text_size: 16.0,
            line_height: 1.6,
            font_family: "system-ui, -apple-system, sans-serif".into(),
            background_color: "#ffffff".into(),
            text_color: "#1f2937".into(),
            progress_bar_color: "#3b82f6".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdhdSettings {
    pub short_attention_blocks: bool,
    pub enable_break_reminders: bool,
    pub auto_resume_after_break: bool,
    pub reduce_visual_clutter: bool,
    pub increase_focus_indicators: bool,
    pub show_progress_indicator: bool,
}

impl Default for AdhdSettings {
    fn default() -> Self {
        Self {
            short_attention_blocks: false,
            enable_break_reminders: true,
            auto_resume_after_break: false,
            reduce_visual_clutter: false,
            increase_focus_indicators: true,
            show_progress_indicator: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutismSettings {
    pub enhance_predictability: bool,
    pub reduce_animations: bool,
    pub clear_visual_structure: bool,
    pub explicit_instructions: bool,
    pub sensory_comfort: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DyslexiaSettings {
    pub high_contrast_text: bool,
    pub larger_font_size: bool,
    pub reading_guide: bool,
    pub audio_support: bool,
}

/// Merged display and pacing parameters for one reader.
///
/// Serializes to the flat record the profile file stores: typography fields
/// sit at the top level next to the three support groups. Missing keys take
/// their defaults and unknown keys are ignored, so a partial or older record
/// always loads into a complete profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdaptationProfile {
    #[serde(flatten)]
    pub typography: Typography,
    pub adhd: AdhdSettings,
    pub autism: AutismSettings,
    pub dyslexia: DyslexiaSettings,
    #[serde(rename = "enableCROWDInteractions")]
    pub enable_crowd_interactions: bool,
    pub auto_advance_pages: bool,
    pub show_reading_progress: bool,
}

impl Default for AdaptationProfile {
    fn default() -> Self {
        Self {
            typography: Typography::default(),
            adhd: AdhdSettings::default(),
            autism: AutismSettings::default(),
            dyslexia: DyslexiaSettings::default(),
            enable_crowd_interactions: true,
            auto_advance_pages: false,
            show_reading_progress: true,
        }
    }
}

impl AdaptationProfile {
    /// Pages wait for an explicit "done" instead of a reading timer.
    pub fn manual_page_confirmation(&self) -> bool {
        self.autism.enhance_predictability
    }
}
