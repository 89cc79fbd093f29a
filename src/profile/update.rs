use serde_json::Value;

use super::external::{AdhdPatch, AutismPatch, DyslexiaPatch};
use super::types::{AdaptationProfile, AdhdSettings, AutismSettings, DyslexiaSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdhdFlag {
    ShortAttentionBlocks,
    EnableBreakReminders,
    AutoResumeAfterBreak,
    ReduceVisualClutter,
    IncreaseFocusIndicators,
    ShowProgressIndicator,
}

impl AdhdFlag {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "shortAttentionBlocks" => Some(Self::ShortAttentionBlocks),
            "enableBreakReminders" => Some(Self::EnableBreakReminders),
            "autoResumeAfterBreak" => Some(Self::AutoResumeAfterBreak),
            "reduceVisualClutter" => Some(Self::ReduceVisualClutter),
            "increaseFocusIndicators" => Some(Self::IncreaseFocusIndicators),
            "showProgressIndicator" => Some(Self::ShowProgressIndicator),
            _ => None,
        }
    }

    fn slot(self, group: &mut AdhdSettings) -> &mut bool {
        match self {
            Self::ShortAttentionBlocks => &mut group.short_attention_blocks,
            Self::EnableBreakReminders => &mut group.enable_break_reminders,
            Self::AutoResumeAfterBreak => &mut group.auto_resume_after_break,
            Self::ReduceVisualClutter => &mut group.reduce_visual_clutter,
            Self::IncreaseFocusIndicators => &mut group.increase_focus_indicators,
            Self::ShowProgressIndicator => &mut group.show_progress_indicator,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutismFlag {
    EnhancePredictability,
    ReduceAnimations,
    ClearVisualStructure,
    ExplicitInstructions,
    SensoryComfort,
}

impl AutismFlag {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "enhancePredictability" => Some(Self::EnhancePredictability),
            "reduceAnimations" => Some(Self::ReduceAnimations),
            "clearVisualStructure" => Some(Self::ClearVisualStructure),
            "explicitInstructions" => Some(Self::ExplicitInstructions),
            "sensoryComfort" => Some(Self::SensoryComfort),
            _ => None,
        }
    }

    fn slot(self, group: &mut AutismSettings) -> &mut bool {
        match self {
            Self::EnhancePredictability => &mut group.enhance_predictability,
            Self::ReduceAnimations => &mut group.reduce_animations,
            Self::ClearVisualStructure => &mut group.clear_visual_structure,
            Self::ExplicitInstructions => &mut group.explicit_instructions,
            Self::SensoryComfort => &mut group.sensory_comfort,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DyslexiaFlag {
    HighContrastText,
    LargerFontSize,
    ReadingGuide,
    AudioSupport,
}

impl DyslexiaFlag {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "highContrastText" => Some(Self::HighContrastText),
            "largerFontSize" => Some(Self::LargerFontSize),
            "readingGuide" => Some(Self::ReadingGuide),
            "audioSupport" => Some(Self::AudioSupport),
            _ => None,
        }
    }

    fn slot(self, group: &mut DyslexiaSettings) -> &mut bool {
        match self {
            Self::HighContrastText => &mut group.high_contrast_text,
            Self::LargerFontSize => &mut group.larger_font_size,
            Self::ReadingGuide => &mut group.reading_guide,
            Self::AudioSupport => &mut group.audio_support,
        }
    }
}

/// One addressable change to an [`AdaptationProfile`].
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileUpdate {
    TextSize(f32),
    LineHeight(f32),
    FontFamily(String),
    BackgroundColor(String),
    TextColor(String),
    ProgressBarColor(String),
    Adhd(AdhdFlag, bool),
    Autism(AutismFlag, bool),
    Dyslexia(DyslexiaFlag, bool),
    /// Shallow merge of a whole group object, e.g. `update("adhd", {...})`.
    AdhdGroup(AdhdPatch),
    AutismGroup(AutismPatch),
    DyslexiaGroup(DyslexiaPatch),
    EnableCrowdInteractions(bool),
    AutoAdvancePages(bool),
    ShowReadingProgress(bool),
}

impl ProfileUpdate {
    /// Decodes a dotted path such as `"textSize"` or `"adhd.shortAttentionBlocks"`.
    ///
    /// Returns `None` for paths deeper than two segments, unknown names, and
    /// values of the wrong JSON type.
    pub fn from_path(path: &str, value: &Value) -> Option<Self> {
        let segments: Vec<&str> = path.split('.').collect();
        match segments.as_slice() {
            [key] => Self::top_level(key, value),
            [group, key] => {
                let flag = value.as_bool()?;
                match *group {
                    "adhd" => AdhdFlag::from_key(key).map(|f| Self::Adhd(f, flag)),
                    "autism" => AutismFlag::from_key(key).map(|f| Self::Autism(f, flag)),
                    "dyslexia" => DyslexiaFlag::from_key(key).map(|f| Self::Dyslexia(f, flag)),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn top_level(key: &str, value: &Value) -> Option<Self> {
        let number = || value.as_f64().map(|n| n as f32);
        let text = || value.as_str().map(str::to_owned);
        match key {
            "textSize" => number().map(Self::TextSize),
            "lineHeight" => number().map(Self::LineHeight),
            "fontFamily" => text().map(Self::FontFamily),
            "backgroundColor" => text().map(Self::BackgroundColor),
            "textColor" => text().map(Self::TextColor),
            "progressBarColor" => text().map(Self::ProgressBarColor),
            "enableCROWDInteractions" => value.as_bool().map(Self::EnableCrowdInteractions),
            "autoAdvancePages" => value.as_bool().map(Self::AutoAdvancePages),
            "showReadingProgress" => value.as_bool().map(Self::ShowReadingProgress),
            "adhd" if value.is_object() => serde_json::from_value(value.clone())
                .ok()
                .map(Self::AdhdGroup),
            "autism" if value.is_object() => serde_json::from_value(value.clone())
                .ok()
                .map(Self::AutismGroup),
            "dyslexia" if value.is_object() => serde_json::from_value(value.clone())
                .ok()
                .map(Self::DyslexiaGroup),
            _ => None,
        }
    }

    pub fn apply(&self, profile: &mut AdaptationProfile) {
        let typography = &mut profile.typography;
        match self {
            Self::TextSize(size) => typography.text_size = *size,
            Self::LineHeight(height) => typography.line_height = *height,
            Self::FontFamily(family) => typography.font_family = family.clone(),
            Self::BackgroundColor(color) => typography.background_color = color.clone(),
            Self::TextColor(color) => typography.text_color = color.clone(),
            Self::ProgressBarColor(color) => typography.progress_bar_color = color.clone(),
            Self::Adhd(flag, value) => *flag.slot(&mut profile.adhd) = *value,
            Self::Autism(flag, value) => *flag.slot(&mut profile.autism) = *value,
            Self::Dyslexia(flag, value) => *flag.slot(&mut profile.dyslexia) = *value,
            Self::AdhdGroup(patch) => patch.merge_into(&mut profile.adhd),
            Self::AutismGroup(patch) => patch.merge_into(&mut profile.autism),
            Self::DyslexiaGroup(patch) => patch.merge_into(&mut profile.dyslexia),
            Self::EnableCrowdInteractions(value) => profile.enable_crowd_interactions = *value,
            Self::AutoAdvancePages(value) => profile.auto_advance_pages = *value,
            Self::ShowReadingProgress(value) => profile.show_reading_progress = *value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_one_and_two_segment_paths() {
        assert_eq!(
            ProfileUpdate::from_path("textSize", &json!(20)),
            Some(ProfileUpdate::TextSize(20.0))
        );
        assert_eq!(
            ProfileUpdate::from_path("adhd.shortAttentionBlocks", &json!(true)),
            Some(ProfileUpdate::Adhd(AdhdFlag::ShortAttentionBlocks, true))
        );
        assert_eq!(
            ProfileUpdate::from_path("enableCROWDInteractions", &json!(false)),
            Some(ProfileUpdate::EnableCrowdInteractions(false))
        );
    }

    #[test]
    fn unsupported_paths_decode_to_nothing() {
        assert_eq!(ProfileUpdate::from_path("adhd.timing.blocks", &json!(true)), None);
        assert_eq!(ProfileUpdate::from_path("adhd.notAFlag", &json!(true)), None);
        assert_eq!(ProfileUpdate::from_path("vision.colorBlind", &json!(true)), None);
        assert_eq!(ProfileUpdate::from_path("textSize", &json!("large")), None);
        assert_eq!(ProfileUpdate::from_path("autism.reduceAnimations", &json!(1)), None);
    }

    #[test]
    fn group_flag_update_leaves_siblings_alone() {
        let mut profile = AdaptationProfile::default();
        profile.dyslexia.reading_guide = true;

        ProfileUpdate::Adhd(AdhdFlag::AutoResumeAfterBreak, true).apply(&mut profile);

        assert!(profile.adhd.auto_resume_after_break);
        assert!(profile.adhd.enable_break_reminders);
        assert!(profile.dyslexia.reading_guide);
        assert_eq!(profile.autism, AutismSettings::default());
    }

    #[test]
    fn whole_group_object_merges_shallowly() {
        let update =
            ProfileUpdate::from_path("autism", &json!({ "reduceAnimations": true })).unwrap();
        let mut profile = AdaptationProfile::default();
        profile.autism.sensory_comfort = true;
        update.apply(&mut profile);

        assert!(profile.autism.reduce_animations);
        assert!(profile.autism.sensory_comfort);
    }
}
