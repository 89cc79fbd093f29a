use anyhow::Result;
use rusqlite::{params, OptionalExtension, Row};

use crate::{
    db::{
        connection::Database,
        helpers::{parse_datetime, parse_reason, to_i64, to_u64},
    },
    models::SessionReport,
};

fn row_to_report(row: &Row) -> Result<SessionReport> {
    let started_at: String = row.get("started_at")?;
    let completed_at: String = row.get("completed_at")?;
    let duration_seconds: i64 = row.get("duration_seconds")?;
    let reason: String = row.get("reason")?;
    let last_page_index: i64 = row.get("last_page_index")?;

    Ok(SessionReport {
        session_id: row.get("id")?,
        story_id: row.get("story_id")?,
        child_id: row.get("child_id")?,
        started_at: parse_datetime(&started_at, "started_at")?,
        completed_at: parse_datetime(&completed_at, "completed_at")?,
        duration_seconds: to_u64(duration_seconds, "duration_seconds")?,
        reason: parse_reason(&reason)?,
        last_page_index: to_u64(last_page_index, "last_page_index")? as usize,
    })
}

impl Database {
    pub async fn insert_reading_session(&self, report: &SessionReport) -> Result<()> {
        let record = report.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO reading_sessions
                    (id, story_id, child_id, started_at, completed_at, duration_seconds, reason, last_page_index)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    record.session_id,
                    record.story_id,
                    record.child_id,
                    record.started_at.to_rfc3339(),
                    record.completed_at.to_rfc3339(),
                    to_i64(record.duration_seconds)?,
                    record.reason.as_str(),
                    to_i64(record.last_page_index as u64)?,
                ],
            )?;
            Ok(())
        })
        .await
    }

    pub async fn get_reading_session(&self, session_id: &str) -> Result<Option<SessionReport>> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare("SELECT * FROM reading_sessions WHERE id = ?1")?;
            let raw = stmt
                .query_row(params![session_id], |row| Ok(row_to_report(row)))
                .optional()?;
            raw.transpose()
        })
        .await
    }

    /// Most recent first.
    pub async fn list_reading_sessions(&self, child_id: &str, limit: usize) -> Result<Vec<SessionReport>> {
        let child_id = child_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM reading_sessions
                 WHERE child_id = ?1
                 ORDER BY started_at DESC
                 LIMIT ?2",
            )?;
            let mut rows = stmt.query(params![child_id, to_i64(limit as u64)?])?;
            let mut reports = Vec::new();
            while let Some(row) = rows.next()? {
                reports.push(row_to_report(row)?);
            }
            Ok(reports)
        })
        .await
    }
}
