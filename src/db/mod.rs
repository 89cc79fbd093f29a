mod connection;
mod helpers;
mod migrations;
mod repositories;

use async_trait::async_trait;

pub use connection::Database;

use crate::{
    models::{CrowdResponseReport, SessionReport},
    providers::ReportSink,
};

#[async_trait]
impl ReportSink for Database {
    async fn session_completed(&self, report: &SessionReport) -> anyhow::Result<()> {
        self.insert_reading_session(report).await
    }

    async fn crowd_response(&self, report: &CrowdResponseReport) -> anyhow::Result<()> {
        self.insert_crowd_response(report).await
    }
}
