// crates/db/src/views.rs
//! Per-instance convenience views.
//!
//! External consumers read `v_<instance>` and `v_cron_<instance>` instead
//! of repeating the instance filter. Instance names come from directory
//! names on disk, so each one must pass the [`Ident`](crate::Ident) guard
//! before it lands in a generated view definition — invalid names are
//! skipped with a warning, never sanitized into shape.

use crate::{Database, DbResult, Ident};
use sqlx::PgConnection;
use tracing::warn;

impl Database {
    /// (Re)create the filtered message and cron-report views for each
    /// instance discovered this run.
    pub async fn ensure_instance_views(
        &self,
        conn: &mut PgConnection,
        instances: &[String],
    ) -> DbResult<()> {
        for name in instances {
            let ident = match Ident::parse(name) {
                Ok(ident) => ident,
                Err(e) => {
                    warn!(instance = %name, error = %e, "Skipping views for invalid instance name");
                    continue;
                }
            };

            for (view, table) in [
                (format!("v_{ident}"), "messages"),
                (format!("v_cron_{ident}"), "cron_reports"),
            ] {
                let statement = self.sql(&format!(
                    "CREATE OR REPLACE VIEW {{schema}}.{view} AS \
                     SELECT * FROM {{schema}}.{table} WHERE instance = '{ident}'"
                ));
                sqlx::query(&statement).execute(&mut *conn).await?;
            }
        }
        Ok(())
    }
}
