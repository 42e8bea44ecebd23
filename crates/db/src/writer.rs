// crates/db/src/writer.rs
//! Idempotent write operations against the three memory relations.
//!
//! Every operation takes a borrowed [`PgConnection`] so callers can scope a
//! whole session's writes inside one transaction: message inserts, the
//! optional cron report, and the session upsert carrying the advanced
//! offset either all commit or none do.
//!
//! Messages and cron reports insert with `ON CONFLICT DO NOTHING` — first
//! writer wins and re-processing the same bytes is a no-op. Sessions are
//! the one mutable record and always reflect the latest known state.

use crate::{Database, DbResult};
use chrono::{DateTime, Utc};
use openclaw_memory_types::NewMessage;
use sqlx::PgConnection;

/// Latest state of one session row, written on every pass with new bytes.
#[derive(Debug, Clone)]
pub struct SessionUpsert {
    pub instance: String,
    pub session_id: String,
    pub started_at: Option<DateTime<Utc>>,
    pub model: Option<String>,
    pub source: Option<String>,
    pub message_count: i64,
    pub last_synced_byte: i64,
}

/// One derived scheduled-job report.
#[derive(Debug, Clone)]
pub struct CronReport {
    pub instance: String,
    pub session_id: String,
    pub cron_name: String,
    pub summary: String,
    pub run_started_at: Option<DateTime<Utc>>,
    pub run_ended_at: DateTime<Utc>,
    pub event_at: DateTime<Utc>,
}

impl Database {
    /// Offset of the last durably recorded byte for a session, `0` when the
    /// session has never been seen.
    pub async fn last_synced_byte(
        &self,
        conn: &mut PgConnection,
        instance: &str,
        session_id: &str,
    ) -> DbResult<i64> {
        let row: Option<(i64,)> = sqlx::query_as(&self.sql(
            "SELECT last_synced_byte FROM {schema}.sessions \
             WHERE instance = $1 AND session_id = $2",
        ))
        .bind(instance)
        .bind(session_id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(row.map(|(byte,)| byte).unwrap_or(0))
    }

    /// Insert one message; returns `true` when a row was actually written.
    /// Conflicts on the `(instance, session_id, message_id)` key are
    /// swallowed — content is immutable once stored.
    pub async fn insert_message(
        &self,
        conn: &mut PgConnection,
        instance: &str,
        session_id: &str,
        message: &NewMessage,
    ) -> DbResult<bool> {
        let result = sqlx::query(&self.sql(
            "INSERT INTO {schema}.messages \
                 (instance, session_id, message_id, parent_id, role, content, source, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (instance, session_id, message_id) DO NOTHING",
        ))
        .bind(instance)
        .bind(session_id)
        .bind(&message.message_id)
        .bind(&message.parent_id)
        .bind(message.role.as_str())
        .bind(&message.content)
        .bind(&message.source)
        .bind(message.created_at)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Insert one scheduled-job report; at most one row per
    /// `(instance, session_id, cron_name)` ever exists, no matter how many
    /// runs re-detect the same classification.
    pub async fn insert_cron_report(
        &self,
        conn: &mut PgConnection,
        report: &CronReport,
    ) -> DbResult<bool> {
        let result = sqlx::query(&self.sql(
            "INSERT INTO {schema}.cron_reports \
                 (instance, session_id, cron_name, summary, run_started_at, run_ended_at, event_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (instance, session_id, cron_name) DO NOTHING",
        ))
        .bind(&report.instance)
        .bind(&report.session_id)
        .bind(&report.cron_name)
        .bind(&report.summary)
        .bind(report.run_started_at)
        .bind(report.run_ended_at)
        .bind(report.event_at)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Create or update the session row.
    ///
    /// Offset, message count, and sync time are always overwritten. Header
    /// metadata (`started_at`, `model`, `source`) is overwritten only when
    /// newly observed: an incremental delta carries no `session` record, and
    /// nulling previously known metadata would lose state, so absent values
    /// fall back to the stored ones via `COALESCE`.
    pub async fn upsert_session(
        &self,
        conn: &mut PgConnection,
        session: &SessionUpsert,
    ) -> DbResult<()> {
        sqlx::query(&self.sql(
            "INSERT INTO {schema}.sessions \
                 (instance, session_id, started_at, model, source, message_count, \
                  last_synced_byte, last_synced_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, NOW()) \
             ON CONFLICT (instance, session_id) DO UPDATE SET \
                 started_at = COALESCE(EXCLUDED.started_at, sessions.started_at), \
                 model = COALESCE(EXCLUDED.model, sessions.model), \
                 source = COALESCE(EXCLUDED.source, sessions.source), \
                 message_count = EXCLUDED.message_count, \
                 last_synced_byte = EXCLUDED.last_synced_byte, \
                 last_synced_at = NOW()",
        ))
        .bind(&session.instance)
        .bind(&session.session_id)
        .bind(session.started_at)
        .bind(&session.model)
        .bind(&session.source)
        .bind(session.message_count)
        .bind(session.last_synced_byte)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }
}
