use async_trait::async_trait;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum IllustrationStatus {
    Ready { uri: String },
    /// Generation is still running; the page shows a placeholder for now.
    Pending,
    Failed,
}

/// Looks up or generates the picture for one page.
#[async_trait]
pub trait IllustrationProvider: Send + Sync {
    async fn resolve_illustration(
        &self,
        story_id: &str,
        page_number: u32,
        prompt: &str,
    ) -> anyhow::Result<IllustrationStatus>;
}
