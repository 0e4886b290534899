#![cfg(test)]
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use migration::MigratorTrait;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// Fresh in-memory SQLite database with migrations applied.
///
/// The pool is pinned to one connection: every SQLite memory connection is a
/// separate database, so each call gets an isolated store for the lifetime of
/// the returned handle.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Migrated SQLite database in a temp file, shared by several pooled
/// connections so that statements from different tasks really overlap.
/// The file is removed on drop.
pub struct FileDb {
    pub db: DatabaseConnection,
    path: PathBuf,
}

impl Drop for FileDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", self.path.display(), suffix));
        }
    }
}

pub async fn get_file_db(max_connections: u32) -> Result<FileDb, anyhow::Error> {
    static SEQ: AtomicUsize = AtomicUsize::new(0);
    let path = std::env::temp_dir().join(format!(
        "student-records-{}-{}.db",
        std::process::id(),
        SEQ.fetch_add(1, Ordering::Relaxed)
    ));
    let _ = std::fs::remove_file(&path);
    let mut opt = ConnectOptions::new(format!("sqlite://{}?mode=rwc", path.display()));
    opt.max_connections(max_connections).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await?;
    let file_db = FileDb { db, path };
    migration::Migrator::up(&file_db.db, None).await?;
    Ok(file_db)
}
