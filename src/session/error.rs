use thiserror::Error;

/// Reasons a reading session could not start. No controller exists after
/// any of these; the caller offers a retry.
#[derive(Debug, Error)]
pub enum SessionStartError {
    #[error("failed to load story {story_id}")]
    Fetch {
        story_id: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
    #[error("story {story_id} has no pages")]
    EmptyStory { story_id: String },
}

impl SessionStartError {
    pub fn fetch(story_id: &str, err: anyhow::Error) -> Self {
        Self::Fetch {
            story_id: story_id.to_string(),
            source: err.into(),
        }
    }

    pub fn story_id(&self) -> &str {
        match self {
            Self::Fetch { story_id, .. } | Self::EmptyStory { story_id } => story_id,
        }
    }
}
