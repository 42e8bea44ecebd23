// crates/core/src/cron.rs
//! Scheduled-session classification.
//!
//! A session started by the scheduler opens with a user message of the form
//! `[cron:<id> <human name>] ...`. The human name is case-folded with
//! whitespace runs collapsed to single hyphens to produce the canonical job
//! name used as part of the report idempotency key.

use openclaw_memory_types::{NewMessage, Role};
use regex_lite::Regex;
use std::sync::OnceLock;

/// Classification result for a scheduler-triggered session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronInfo {
    /// Opaque scheduler id, kept for correlation only.
    pub cron_id: String,
    /// Canonical job name, e.g. `daily-report`.
    pub cron_name: String,
}

fn marker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\[cron:([\w-]+)\s+([^\]]+)\]").unwrap())
}

/// Inspect the first user message of a freshly-extracted batch for the cron
/// marker. Absence of a user message or of the marker is the common case,
/// not an error.
pub fn detect_cron(messages: &[NewMessage]) -> Option<CronInfo> {
    let first_user = messages.iter().find(|m| m.role == Role::User)?;
    let caps = marker_pattern().captures(&first_user.content)?;
    Some(CronInfo {
        cron_id: caps[1].to_string(),
        cron_name: canonical_job_name(&caps[2]),
    })
}

/// The report summary is the last assistant turn of the batch; without one
/// there is nothing worth reporting.
pub fn last_assistant_summary(messages: &[NewMessage]) -> Option<&str> {
    messages
        .iter()
        .rev()
        .find(|m| m.role == Role::Assistant)
        .map(|m| m.content.as_str())
}

fn canonical_job_name(raw: &str) -> String {
    raw.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
