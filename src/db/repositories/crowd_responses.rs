use anyhow::Result;
use rusqlite::{params, Row};

use crate::{
    db::{
        connection::Database,
        helpers::{parse_datetime, parse_prompt_type, to_u64},
    },
    models::CrowdResponseReport,
};

fn row_to_response(row: &Row) -> Result<CrowdResponseReport> {
    let page_number: i64 = row.get("page_number")?;
    let prompt_type: String = row.get("prompt_type")?;
    let answered_at: String = row.get("answered_at")?;

    Ok(CrowdResponseReport {
        session_id: row.get("session_id")?,
        story_id: row.get("story_id")?,
        page_number: u32::try_from(to_u64(page_number, "page_number")?)?,
        prompt_type: parse_prompt_type(&prompt_type)?,
        response_text: row.get("response_text")?,
        answered_at: parse_datetime(&answered_at, "answered_at")?,
    })
}

impl Database {
    pub async fn insert_crowd_response(&self, response: &CrowdResponseReport) -> Result<()> {
        let record = response.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO crowd_responses
                    (session_id, story_id, page_number, prompt_type, response_text, answered_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record.session_id,
                    record.story_id,
                    record.page_number,
                    record.prompt_type.as_str(),
                    record.response_text,
                    record.answered_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
        .await
    }

    /// Responses for one session in page order. Skipped prompts have no text.
    pub async fn list_crowd_responses(&self, session_id: &str) -> Result<Vec<CrowdResponseReport>> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM crowd_responses
                 WHERE session_id = ?1
                 ORDER BY page_number ASC, id ASC",
            )?;
            let mut rows = stmt.query(params![session_id])?;
            let mut responses = Vec::new();
            while let Some(row) = rows.next()? {
                responses.push(row_to_response(row)?);
            }
            Ok(responses)
        })
        .await
    }
}
