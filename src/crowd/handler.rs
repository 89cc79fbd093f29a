use crate::{
    models::{CrowdPrompt, CrowdPromptType, StoryPage},
    profile::AdaptationProfile,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePrompt {
    pub page_number: u32,
    pub prompt: CrowdPrompt,
}

/// How an active prompt ended. `response` is `None` for a skip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrowdResolution {
    pub page_number: u32,
    pub prompt_type: CrowdPromptType,
    pub response: Option<String>,
}

/// Lifecycle of at most one interactive prompt.
#[derive(Debug, Default)]
pub struct CrowdPromptHandler {
    active: Option<ActivePrompt>,
}

impl CrowdPromptHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_eligible(page: &StoryPage, profile: &AdaptationProfile) -> bool {
        page.crowd_prompt.is_some() && profile.enable_crowd_interactions
    }

    pub fn can_submit(response: &str) -> bool {
        !response.trim().is_empty()
    }

    /// Opens the page's prompt, replacing any previous one.
    pub fn open(&mut self, page: &StoryPage) -> Option<&ActivePrompt> {
        let prompt = page.crowd_prompt.clone()?;
        self.active = Some(ActivePrompt {
            page_number: page.page_number,
            prompt,
        });
        self.active.as_ref()
    }

    pub fn active(&self) -> Option<&ActivePrompt> {
        self.active.as_ref()
    }

    /// Resolves the prompt with a response. Blank responses leave it open.
    pub fn submit(&mut self, response: &str) -> Option<CrowdResolution> {
        if !Self::can_submit(response) {
            return None;
        }
        self.resolve(Some(response.to_string()))
    }

    pub fn skip(&mut self) -> Option<CrowdResolution> {
        self.resolve(None)
    }

    /// Drops the prompt without producing a resolution.
    pub fn dismiss(&mut self) {
        self.active = None;
    }

    fn resolve(&mut self, response: Option<String>) -> Option<CrowdResolution> {
        let active = self.active.take()?;
        Some(CrowdResolution {
            page_number: active.page_number,
            prompt_type: active.prompt.kind,
            response,
        })
    }
}
