pub mod models;
pub mod operations;

use anyhow::{Result, bail};
use log::{debug, info};
use sqlx::SqlitePool;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};
use std::str::FromStr;
use std::time::Duration;
use tokio::sync::OnceCell;

use crate::config;

static DB_PATH: OnceCell<String> = OnceCell::const_new();

#[inline(always)]
pub async fn get_db_path() -> &'static String {
    DB_PATH
        .get_or_init(|| async { config::database_url_from_env() })
        .await
}

pub async fn set_db_path(path: &str) -> Result<()> {
    DB_PATH
        .set(path.to_string())
        .map_err(|e| anyhow::anyhow!(format!("Failed to set DB_PATH: {:?}", e)))
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Opens a pool for `url` and makes sure the schema exists.
///
/// Accepts either a `sqlite:` URL or a bare file path. In-memory databases get
/// a single long-lived connection so the data outlives individual queries.
pub async fn connect(url: &str) -> Result<SqlitePool> {
    let options = if url.starts_with("sqlite:") {
        SqliteConnectOptions::from_str(url)?
    } else {
        SqliteConnectOptions::new().filename(url)
    }
    .create_if_missing(true)
    .foreign_keys(true);

    let pool = if is_in_memory(url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
    } else {
        let options = options
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_millis(5000));
        SqlitePoolOptions::new().connect_with(options).await
    }
    .map_err(|e| anyhow::anyhow!("Failed to create DB pool: {}", e))?;

    init_database(&pool).await?;
    Ok(pool)
}

/// Removes every row from every table, children first. The schema stays.
pub async fn clear_all_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM workout_exercises")
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM workouts").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM exercises").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM progress").execute(&mut *tx).await?;
    tx.commit().await?;
    Ok(())
}

struct Migration {
    name: &'static str,
    up_sql: &'static str,
}

const MIGRATION_2026_10_18_090000_0000_SETUP_TABLES: &str =
    include_str!("../../migrations/2026-10-18-090000-0000_setup_tables/up.sql");

const MIGRATIONS: &[Migration] = &[Migration {
    name: "2026-10-18-090000-0000_setup_tables",
    up_sql: MIGRATION_2026_10_18_090000_0000_SETUP_TABLES,
}];

async fn init_migrations_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS _migrations (
            id INTEGER NOT NULL PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            applied_at INTEGER NOT NULL DEFAULT (CAST(strftime('%s','now') AS INTEGER))
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn is_migration_applied(pool: &SqlitePool, migration_name: &str) -> Result<bool> {
    let result =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM _migrations WHERE name = ?1")
            .bind(migration_name)
            .fetch_one(pool)
            .await?;
    Ok(result > 0)
}

fn parse_sql_statements(sql: &str) -> Vec<String> {
    sql.lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with("--")
        })
        .collect::<Vec<_>>()
        .join("\n")
        .split(';')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Columns each table must carry. SQLite matches table names case-insensitively,
/// so a pre-existing `Workouts` table with another layout satisfies
/// `CREATE TABLE IF NOT EXISTS workouts` and has to be caught here.
const EXPECTED_COLUMNS: &[(&str, &[&str])] = &[
    (
        "workouts",
        &["id", "title", "workout_type", "duration_minutes", "calories_burned", "date", "notes"],
    ),
    ("exercises", &["id", "name", "description", "muscle_group"]),
    (
        "progress",
        &["id", "date", "weight", "height", "body_fat_percentage", "muscle_mass", "notes"],
    ),
    (
        "workout_exercises",
        &["id", "workout_id", "exercise_id", "sets", "reps", "weight_kg", "duration_seconds"],
    ),
];

async fn check_schema(pool: &SqlitePool) -> Result<()> {
    for (table, columns) in EXPECTED_COLUMNS {
        let present: Vec<String> = sqlx::query_scalar("SELECT name FROM pragma_table_info(?1)")
            .bind(*table)
            .fetch_all(pool)
            .await?;
        let missing: Vec<&str> = columns
            .iter()
            .copied()
            .filter(|column| !present.iter().any(|p| p == column))
            .collect();
        if !missing.is_empty() {
            bail!(
                "Table {} exists with an incompatible layout (missing columns: {})",
                table,
                missing.join(", ")
            );
        }
    }
    Ok(())
}

/// Applies every pending migration and verifies the table layout. Safe to call
/// on every startup.
pub async fn init_database(pool: &SqlitePool) -> Result<()> {
    init_migrations_table(pool).await?;

    for migration in MIGRATIONS {
        if is_migration_applied(pool, migration.name).await? {
            debug!("Migration {} already applied, skipping", migration.name);
            continue;
        }

        info!("Applying migration: {}", migration.name);
        let mut tx = pool.begin().await?;

        for statement in parse_sql_statements(migration.up_sql) {
            sqlx::query(&statement)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    anyhow::anyhow!(
                        "Failed to execute migration statement in {}: {} - Error: {}",
                        migration.name,
                        statement,
                        e
                    )
                })?;
        }

        sqlx::query("INSERT INTO _migrations (name) VALUES (?1)")
            .bind(migration.name)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        info!("Migration {} applied successfully", migration.name);
    }

    check_schema(pool).await
}
