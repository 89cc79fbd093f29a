use std::convert::TryFrom;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};

use crate::models::{CompletionReason, CrowdPromptType};

pub fn to_i64(value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|_| anyhow!("value {value} exceeds SQLite INTEGER range"))
}

pub fn to_u64(value: i64, field: &str) -> Result<u64> {
    u64::try_from(value).map_err(|_| anyhow!("{field} contains negative value {value}"))
}

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

pub fn parse_reason(value: &str) -> Result<CompletionReason> {
    match value {
        "Finished" => Ok(CompletionReason::Finished),
        "TimeUp" => Ok(CompletionReason::TimeUp),
        other => Err(anyhow!("unknown completion reason {other}")),
    }
}

pub fn parse_prompt_type(value: &str) -> Result<CrowdPromptType> {
    match value {
        "completion" => Ok(CrowdPromptType::Completion),
        "recall" => Ok(CrowdPromptType::Recall),
        "open_ended" => Ok(CrowdPromptType::OpenEnded),
        "wh_question" => Ok(CrowdPromptType::WhQuestion),
        "distancing" => Ok(CrowdPromptType::Distancing),
        other => Err(anyhow!("unknown prompt type {other}")),
    }
}
