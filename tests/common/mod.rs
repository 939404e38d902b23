//! Helpers for integration tests.

use std::path::PathBuf;

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use maderera::db::{DbPool, establish_connection_pool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// A migrated throwaway SQLite database, removed (with its WAL siblings)
/// when the test ends.
pub struct TestDb {
    path: PathBuf,
    pool: DbPool,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        let path = PathBuf::from(filename);
        remove_artifacts(&path); // leftovers from a crashed run

        let pool = establish_connection_pool(filename)
            .expect("Failed to establish SQLite connection.");

        {
            let mut conn = pool
                .get()
                .expect("Failed to get SQLite connection from pool.");
            conn.run_pending_migrations(MIGRATIONS)
                .expect("Migrations failed");
        }

        TestDb { path, pool }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        remove_artifacts(&self.path);
    }
}

fn remove_artifacts(path: &PathBuf) {
    std::fs::remove_file(path).ok();
    for suffix in ["-shm", "-wal"] {
        std::fs::remove_file(format!("{}{suffix}", path.display())).ok();
    }
}
