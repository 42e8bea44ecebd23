/// Inline SQL migrations for the memory schema.
///
/// We use simple inline migrations rather than sqlx migration files
/// because the schema is small and self-contained. Each statement may
/// reference the configured schema through the `{schema}` placeholder,
/// substituted (after identifier validation) at execution time. Applied
/// versions are tracked in `{schema}._migrations`, so statements run once.

pub const MIGRATIONS: &[&str] = &[
    // Migration 1: sessions table — one row per append-only transcript file.
    r#"
CREATE TABLE IF NOT EXISTS {schema}.sessions (
    instance TEXT NOT NULL,
    session_id TEXT NOT NULL,
    started_at TIMESTAMPTZ,
    model TEXT,
    source TEXT,
    message_count BIGINT NOT NULL DEFAULT 0,
    last_synced_byte BIGINT NOT NULL DEFAULT 0,
    last_synced_at TIMESTAMPTZ,
    PRIMARY KEY (instance, session_id)
);
"#,
    // Migration 2: messages table — immutable normalized turns.
    r#"
CREATE TABLE IF NOT EXISTS {schema}.messages (
    instance TEXT NOT NULL,
    session_id TEXT NOT NULL,
    message_id TEXT NOT NULL,
    parent_id TEXT,
    role TEXT NOT NULL CHECK (role IN ('user', 'assistant')),
    content TEXT NOT NULL,
    source TEXT,
    created_at TIMESTAMPTZ NOT NULL,
    PRIMARY KEY (instance, session_id, message_id)
);
"#,
    r#"
CREATE INDEX IF NOT EXISTS idx_messages_instance_created
    ON {schema}.messages (instance, created_at DESC);
"#,
    // Migration 3: cron_reports table — at most one report per session/job.
    r#"
CREATE TABLE IF NOT EXISTS {schema}.cron_reports (
    instance TEXT NOT NULL,
    session_id TEXT NOT NULL,
    cron_name TEXT NOT NULL,
    summary TEXT,
    run_started_at TIMESTAMPTZ,
    run_ended_at TIMESTAMPTZ,
    event_at TIMESTAMPTZ,
    PRIMARY KEY (instance, session_id, cron_name)
);
"#,
    r#"
CREATE INDEX IF NOT EXISTS idx_cron_reports_instance_event
    ON {schema}.cron_reports (instance, event_at DESC);
"#,
];
