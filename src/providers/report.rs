use async_trait::async_trait;
use log::info;

use crate::models::{CrowdResponseReport, SessionReport};

/// Receives session outcomes. Calls are fire-and-forget from the session's
/// point of view; an error is logged and otherwise ignored.
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn session_completed(&self, report: &SessionReport) -> anyhow::Result<()>;

    async fn crowd_response(&self, report: &CrowdResponseReport) -> anyhow::Result<()>;
}

/// Writes reports to the log and nowhere else.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReportSink;

#[async_trait]
impl ReportSink for LogReportSink {
    async fn session_completed(&self, report: &SessionReport) -> anyhow::Result<()> {
        info!(
            "session {} on story {} finished ({}) in {}s",
            report.session_id,
            report.story_id,
            report.reason.as_str(),
            report.duration_seconds
        );
        Ok(())
    }

    async fn crowd_response(&self, report: &CrowdResponseReport) -> anyhow::Result<()> {
        match &report.response_text {
            Some(text) => info!(
                "page {} {} answered: {}",
                report.page_number,
                report.prompt_type.as_str(),
                text
            ),
            None => info!(
                "page {} {} skipped",
                report.page_number,
                report.prompt_type.as_str()
            ),
        }
        Ok(())
    }
}
