//! Migrate command - Database migration management.

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, MigrationStatus};

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    if let MigrateAction::Fresh { yes: false } = args.action {
        return Err(AppError::bad_request(
            "migrate fresh drops every table; pass --yes to confirm",
        ));
    }

    let db = Database::open(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    match args.action {
        MigrateAction::Up => {
            db.migrate_up().await?;
            tracing::info!("Migrations applied");
        }
        MigrateAction::Down => {
            db.migrate_down().await?;
            tracing::info!("Last migration rolled back");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            println!("{}", render_status(&status));
        }
        MigrateAction::Fresh { .. } => {
            tracing::warn!("Dropping all tables and re-running migrations");
            db.migrate_fresh().await?;
            tracing::info!("Database rebuilt");
        }
    }

    Ok(())
}

/// One line per migration plus a pending count.
fn render_status(status: &[MigrationStatus]) -> String {
    let pending = status.iter().filter(|m| !m.applied).count();
    let mut lines: Vec<String> = status
        .iter()
        .map(|m| format!("{:<8} {}", if m.applied { "applied" } else { "pending" }, m.name))
        .collect();
    lines.push(format!("{} of {} pending", pending, status.len()));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_status() {
        let migration = |name: &str, applied| MigrationStatus {
            name: name.to_string(),
            applied,
        };
        let out = render_status(&[
            migration("m20240101_000001_create_users", true),
            migration("m20240101_000002_create_guests", false),
        ]);
        assert_eq!(
            out,
            "applied  m20240101_000001_create_users\n\
             pending  m20240101_000002_create_guests\n\
             1 of 2 pending"
        );
    }
}
