//! Database connection and schema migrations
use std::path::Path;

use anyhow::Result;
use rusqlite::Connection as SqliteConnection;
use tokio_rusqlite::Connection;

pub const DB_FILE_NAME: &str = "tutor.sqlite3";

// Each entry upgrades the schema by one version. The current version is
// kept in `PRAGMA user_version`.
const MIGRATIONS: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS tutor (
      id INTEGER PRIMARY KEY,
      name TEXT NOT NULL,
      email TEXT NOT NULL UNIQUE,
      admin INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS student (
      id INTEGER PRIMARY KEY,
      name TEXT NOT NULL,
      slug TEXT NOT NULL,
      tutor_id INTEGER REFERENCES tutor(id),
      curr_test TEXT,
      address TEXT,
      photo TEXT,
      created TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    );

    CREATE TABLE IF NOT EXISTS lesson (
      id INTEGER PRIMARY KEY,
      student_id INTEGER NOT NULL REFERENCES student(id) ON DELETE CASCADE,
      lesson TEXT NOT NULL
    );
    ",
    r"
    CREATE INDEX IF NOT EXISTS idx_student_tutor ON student(tutor_id);
    CREATE INDEX IF NOT EXISTS idx_lesson_student ON lesson(student_id, lesson);
    ",
];

/// Open the database stored under `db_path`.
pub async fn async_db(db_path: &str) -> Result<Connection> {
    let path = Path::new(db_path).join(DB_FILE_NAME);
    let db = Connection::open(path).await?;
    db.call(|conn| {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(())
    })
    .await?;
    Ok(db)
}

fn schema_version(conn: &SqliteConnection) -> rusqlite::Result<usize> {
    let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    Ok(usize::try_from(version).unwrap_or(0))
}

/// Create the schema on an empty database.
pub fn initialize_db(conn: &SqliteConnection) -> rusqlite::Result<()> {
    migrate_db(conn)
}

/// Apply every migration newer than the database's schema version.
pub fn migrate_db(conn: &SqliteConnection) -> rusqlite::Result<()> {
    apply_migrations(conn, MIGRATIONS)
}

fn apply_migrations(conn: &SqliteConnection, migrations: &[&str]) -> rusqlite::Result<()> {
    let current = schema_version(conn)?;
    for (idx, migration) in migrations.iter().enumerate().skip(current) {
        let version = idx + 1;
        tracing::info!("Applying schema migration {}", version);

        // Rolled back on drop if any statement fails
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(migration)?;
        tx.pragma_update(None, "user_version", version as i64)?;
        tx.commit()?;
    }
    Ok(())
}
