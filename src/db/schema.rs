use anyhow::{Context, Result};
use rusqlite::Connection;

struct Migration {
    version: &'static str,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: "001",
    name: "initial",
    sql: include_str!("migrations/001_initial.sql"),
}];

pub fn run_migrations(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )",
    )
    .context("Failed to create schema_migrations table")?;

    let applied = get_applied_migrations(conn)?;

    for migration in MIGRATIONS
        .iter()
        .filter(|m| !applied.iter().any(|v| v == m.version))
    {
        apply_migration(conn, migration)?;
    }

    Ok(())
}

fn get_applied_migrations(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT version FROM schema_migrations ORDER BY version")?;
    let versions = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(versions)
}

fn mark_migration_applied(conn: &Connection, version: &str, name: &str) -> Result<()> {
    let now = chrono::Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO schema_migrations (version, name, applied_at) VALUES (?, ?, ?)",
        (version, name, &now),
    )?;
    Ok(())
}

/// Apply one migration and record its version in a single transaction.
fn apply_migration(conn: &mut Connection, migration: &Migration) -> Result<()> {
    tracing::info!("Applying migration {} ({})", migration.version, migration.name);

    let tx = conn.transaction()?;
    tx.execute_batch(migration.sql).with_context(|| {
        format!("Migration {} ({}) failed", migration.version, migration.name)
    })?;
    mark_migration_applied(&tx, migration.version, migration.name)?;
    tx.commit()?;

    tracing::info!("Migration {} applied", migration.version);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_exists(conn: &Connection, name: &str) -> bool {
        let count: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?",
                [name],
                |row| row.get(0),
            )
            .unwrap();
        count == 1
    }

    #[test]
    fn test_migrations_create_every_collection() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();

        for table in ["tasks", "subjects", "marks", "notes", "rewards"] {
            assert!(table_exists(&conn, table), "missing table {table}");
        }

        let versions = get_applied_migrations(&conn).unwrap();
        assert_eq!(versions, vec!["001"]);
    }

    #[test]
    fn failed_migration_leaves_no_trace() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();

        let broken = Migration {
            version: "999",
            name: "broken",
            sql: "CREATE TABLE scratch (id TEXT); INSERT INTO nowhere VALUES (1);",
        };
        assert!(apply_migration(&mut conn, &broken).is_err());

        assert!(!table_exists(&conn, "scratch"));
        assert_eq!(get_applied_migrations(&conn).unwrap(), vec!["001"]);
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();
        run_migrations(&mut conn).unwrap();

        let versions = get_applied_migrations(&conn).unwrap();
        assert_eq!(versions, vec!["001"]);
    }
}
