//! Partial neuro-profile records coming from a child's stored profile.

use serde::{Deserialize, Serialize};

use super::types::{AdaptationProfile, AdhdSettings, AutismSettings, DyslexiaSettings};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdhdPatch {
    pub short_attention_blocks: Option<bool>,
    pub enable_break_reminders: Option<bool>,
    pub auto_resume_after_break: Option<bool>,
    pub reduce_visual_clutter: Option<bool>,
    pub increase_focus_indicators: Option<bool>,
    pub show_progress_indicator: Option<bool>,
}

impl AdhdPatch {
    pub fn merge_into(&self, group: &mut AdhdSettings) {
        overlay(&mut group.short_attention_blocks, self.short_attention_blocks);
        overlay(&mut group.enable_break_reminders, self.enable_break_reminders);
        overlay(&mut group.auto_resume_after_break, self.auto_resume_after_break);
        overlay(&mut group.reduce_visual_clutter, self.reduce_visual_clutter);
        overlay(&mut group.increase_focus_indicators, self.increase_focus_indicators);
        overlay(&mut group.show_progress_indicator, self.show_progress_indicator);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutismPatch {
    pub enhance_predictability: Option<bool>,
    pub reduce_animations: Option<bool>,
    pub clear_visual_structure: Option<bool>,
    pub explicit_instructions: Option<bool>,
    pub sensory_comfort: Option<bool>,
}

impl AutismPatch {
    pub fn merge_into(&self, group: &mut AutismSettings) {
        overlay(&mut group.enhance_predictability, self.enhance_predictability);
        overlay(&mut group.reduce_animations, self.reduce_animations);
        overlay(&mut group.clear_visual_structure, self.clear_visual_structure);
        overlay(&mut group.explicit_instructions, self.explicit_instructions);
        overlay(&mut group.sensory_comfort, self.sensory_comfort);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DyslexiaPatch {
    pub high_contrast_text: Option<bool>,
    pub larger_font_size: Option<bool>,
    pub reading_guide: Option<bool>,
    pub audio_support: Option<bool>,
}

impl DyslexiaPatch {
    pub fn merge_into(&self, group: &mut DyslexiaSettings) {
        overlay(&mut group.high_contrast_text, self.high_contrast_text);
        overlay(&mut group.larger_font_size, self.larger_font_size);
        overlay(&mut group.reading_guide, self.reading_guide);
        overlay(&mut group.audio_support, self.audio_support);
    }
}

/// The `neuro_profile` object of a child profile. Every group is optional and
/// every field inside a group is optional; absent ones leave the current
/// value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeuroProfile {
    pub adhd: Option<AdhdPatch>,
    pub autism: Option<AutismPatch>,
    pub dyslexia: Option<DyslexiaPatch>,
}

impl NeuroProfile {
    pub fn merge_into(&self, profile: &mut AdaptationProfile) {
        if let Some(adhd) = &self.adhd {
            adhd.merge_into(&mut profile.adhd);
        }
        if let Some(autism) = &self.autism {
            autism.merge_into(&mut profile.autism);
        }
        if let Some(dyslexia) = &self.dyslexia {
            dyslexia.merge_into(&mut profile.dyslexia);
        }
    }
}

fn overlay(slot: &mut bool, incoming: Option<bool>) {
    if let Some(value) = incoming {
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_touches_only_present_fields() {
        let incoming: NeuroProfile = serde_json::from_str(
            r#"{ "adhd": { "shortAttentionBlocks": true, "unknownKey": 1 } }"#,
        )
        .unwrap();

        let mut profile = AdaptationProfile::default();
        profile.autism.reduce_animations = true;
        incoming.merge_into(&mut profile);

        assert!(profile.adhd.short_attention_blocks);
        assert!(profile.adhd.enable_break_reminders);
        assert!(profile.autism.reduce_animations);
        assert_eq!(profile.dyslexia, DyslexiaSettings::default());
    }
}
