//! Throwaway SQLite databases for integration and BDD tests.
use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};

use crate::SqliteDatabase;

/// Loads `.env.test`, starts logging and leaves an empty, fully migrated deal tracker database at `url`.
pub async fn prepare_test_env(url: &str) {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    create_database(url).await;
    run_migrations(url).await;
    debug!("🗃️ Test deal tracker ready at {url}");
}

/// A database URL in the system temp directory that no other test will pick.
pub fn random_db_path() -> String {
    let dir = std::env::temp_dir();
    format!("sqlite://{}/deal_tracker_test_{:016x}.db", dir.display(), rand::random::<u64>())
}

pub async fn run_migrations(url: &str) {
    let db = SqliteDatabase::new_with_url(url, 1).await.expect("Could not open the test deal tracker");
    db.run_migrations().await.expect("Could not migrate the test deal tracker");
}

/// Replaces whatever database lives at `url` with an empty one.
pub async fn create_database(url: &str) {
    if Sqlite::database_exists(url).await.unwrap_or(false) {
        if let Err(e) = Sqlite::drop_database(url).await {
            warn!("🗃️ Could not remove stale test deal tracker {url}: {e}");
        }
    }
    Sqlite::create_database(url).await.expect("Could not create the test deal tracker");
    trace!("🗃️ Created test deal tracker {url}");
}
