use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;

use crate::models::Story;

#[async_trait]
pub trait StoryProvider: Send + Sync {
    async fn fetch_story(&self, story_id: &str) -> Result<Story>;
}

/// Stories stored as `<dir>/<story-id>.json`.
#[derive(Debug, Clone)]
pub struct JsonStoryDirectory {
    dir: PathBuf,
}

impl JsonStoryDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn story_path(&self, story_id: &str) -> Result<PathBuf> {
        if story_id.is_empty()
            || story_id.contains('/')
            || story_id.contains('\\')
            || story_id.contains("..")
        {
            bail!("invalid story id {story_id:?}");
        }
        Ok(self.dir.join(format!("{story_id}.json")))
    }
}

#[async_trait]
impl StoryProvider for JsonStoryDirectory {
    async fn fetch_story(&self, story_id: &str) -> Result<Story> {
        let path = self.story_path(story_id)?;
        let raw = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        let story: Story = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(story)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn loads_story_by_id() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("fox.json"),
            r#"{"id":"fox","title":"Fox","content":{"pages":[{"page_number":1,"text":"Hi"}]}}"#,
        )
        .unwrap();

        let provider = JsonStoryDirectory::new(dir.path());
        let story = provider.fetch_story("fox").await.unwrap();
        assert_eq!(story.title, "Fox");
        assert_eq!(story.page_count(), 1);
    }

    #[tokio::test]
    async fn rejects_missing_and_traversing_ids() {
        let dir = tempfile::tempdir().unwrap();
        let provider = JsonStoryDirectory::new(dir.path());

        assert!(provider.fetch_story("missing").await.is_err());
        assert!(provider.fetch_story("../secret").await.is_err());
        assert!(provider.fetch_story("").await.is_err());
    }

    #[tokio::test]
    async fn malformed_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), "{ not json").unwrap();

        let provider = JsonStoryDirectory::new(dir.path());
        let err = provider.fetch_story("bad").await.unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse"));
    }
}
