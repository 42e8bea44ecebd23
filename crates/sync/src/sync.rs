// crates/sync/src/sync.rs
//! Ingestion coordinator: discover → read-delta → parse → transform → persist.
//!
//! One invocation performs a single synchronization pass over every session
//! file of every discovered instance. Each session commits inside its own
//! transaction, with the advanced offset persisted alongside the message
//! inserts it protects — an interrupted run therefore resumes exactly where
//! the last committed session left it. Failures are isolated per session:
//! a failed session keeps its prior offset and is retried by the next
//! scheduled invocation.

use anyhow::Result;
use chrono::Utc;
use openclaw_memory_core::{
    detect_cron, discover_instances, last_assistant_summary, parse_delta, Instance,
};
use openclaw_memory_db::{CronReport, Database, SessionUpsert};
use sqlx::Connection;
use sqlx::PgConnection;
use std::io::SeekFrom;
use std::path::Path;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tracing::{debug, info, warn};

/// Aggregate counters for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Session files visited, including up-to-date ones.
    pub files_processed: usize,
    /// Message rows actually written (conflicts excluded).
    pub messages_synced: usize,
    /// Sessions that failed and kept their prior offset.
    pub sessions_failed: usize,
}

/// Outcome of one session pass.
#[derive(Debug)]
enum SyncOutcome {
    /// File size equals the recorded offset; nothing was written.
    UpToDate,
    /// A delta was committed.
    Synced { new_messages: usize },
}

/// One full synchronization pass over `root`.
///
/// Only discovery of the root itself is fatal; per-session errors are
/// logged and survive into the summary.
pub async fn run_sync(db: &Database, root: &Path) -> Result<RunSummary> {
    let instances = discover_instances(root).await?;
    info!(
        count = instances.len(),
        root = %root.display(),
        "Discovered instances"
    );

    // One pooled connection for the whole run, released on every exit path.
    let mut conn = db.acquire().await?;

    let names: Vec<String> = instances.iter().map(|i| i.name.clone()).collect();
    db.ensure_instance_views(&mut conn, &names).await?;

    let mut summary = RunSummary::default();
    for instance in &instances {
        sync_instance(db, &mut conn, instance, &mut summary).await;
    }

    info!(
        files_processed = summary.files_processed,
        messages_synced = summary.messages_synced,
        sessions_failed = summary.sessions_failed,
        "Sync complete"
    );
    Ok(summary)
}

/// Sync every `*.jsonl` session file of one instance.
async fn sync_instance(
    db: &Database,
    conn: &mut PgConnection,
    instance: &Instance,
    summary: &mut RunSummary,
) {
    let mut entries = match fs::read_dir(&instance.sessions_dir).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!(
                instance = %instance.name,
                dir = %instance.sessions_dir.display(),
                error = %e,
                "Cannot read sessions directory"
            );
            return;
        }
    };

    while let Ok(Some(entry)) = entries.next_entry().await {
        let path = entry.path();
        if path.extension().map(|ext| ext != "jsonl").unwrap_or(true) {
            continue;
        }
        let Some(session_id) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
            continue;
        };

        match sync_file(db, conn, &instance.name, &session_id, &path).await {
            Ok(SyncOutcome::UpToDate) => {
                summary.files_processed += 1;
                debug!(instance = %instance.name, session = %session_id, "up to date");
            }
            Ok(SyncOutcome::Synced { new_messages }) => {
                summary.files_processed += 1;
                summary.messages_synced += new_messages;
                if new_messages > 0 {
                    info!(
                        instance = %instance.name,
                        session = %session_id,
                        new_messages,
                        "Session synced"
                    );
                } else {
                    debug!(instance = %instance.name, session = %session_id, "synced");
                }
            }
            Err(e) => {
                summary.sessions_failed += 1;
                warn!(
                    instance = %instance.name,
                    session = %session_id,
                    error = %e,
                    "Session sync failed; offset not advanced"
                );
            }
        }
    }
}

/// One synchronization pass over a single session file.
async fn sync_file(
    db: &Database,
    conn: &mut PgConnection,
    instance: &str,
    session_id: &str,
    path: &Path,
) -> Result<SyncOutcome> {
    let file_size = fs::metadata(path).await?.len() as i64;
    let offset = db.last_synced_byte(conn, instance, session_id).await?;

    if file_size == offset {
        return Ok(SyncOutcome::UpToDate);
    }
    if file_size < offset {
        // Rotation or truncation. The offset is monotonic by contract, so
        // leave the session alone rather than guess at the file's identity.
        warn!(
            instance,
            session = session_id,
            file_size,
            offset,
            "Session file shrank below the recorded offset; skipping"
        );
        return Ok(SyncOutcome::UpToDate);
    }

    // Read exactly the delta region [offset, file_size).
    let mut file = fs::File::open(path).await?;
    file.seek(SeekFrom::Start(offset as u64)).await?;
    let mut delta = vec![0u8; (file_size - offset) as usize];
    file.read_exact(&mut delta).await?;
    drop(file);

    let batch = parse_delta(&delta);
    let new_offset = offset + batch.bytes_consumed as i64;

    // The advanced offset must commit atomically with the message inserts
    // it protects.
    let mut tx = conn.begin().await?;

    let mut new_messages = 0usize;
    for message in &batch.messages {
        if db.insert_message(&mut tx, instance, session_id, message).await? {
            new_messages += 1;
        }
    }

    if !batch.messages.is_empty() {
        if let (Some(cron), Some(meta)) = (detect_cron(&batch.messages), batch.session.as_ref()) {
            match last_assistant_summary(&batch.messages) {
                Some(summary) => {
                    let now = Utc::now();
                    let report = CronReport {
                        instance: instance.to_string(),
                        session_id: session_id.to_string(),
                        cron_name: cron.cron_name,
                        summary: summary.to_string(),
                        run_started_at: meta.started_at,
                        run_ended_at: now,
                        event_at: meta.started_at.unwrap_or(now),
                    };
                    db.insert_cron_report(&mut tx, &report).await?;
                }
                None => {
                    debug!(
                        instance,
                        session = session_id,
                        "Scheduled session without an assistant turn; no report"
                    );
                }
            }
        }
    }

    let meta = batch.session.clone().unwrap_or_default();
    db.upsert_session(
        &mut tx,
        &SessionUpsert {
            instance: instance.to_string(),
            session_id: session_id.to_string(),
            started_at: meta.started_at,
            model: meta.model,
            source: meta.source,
            message_count: batch.messages.len() as i64,
            last_synced_byte: new_offset,
        },
    )
    .await?;

    tx.commit().await?;

    Ok(SyncOutcome::Synced { new_messages })
}
