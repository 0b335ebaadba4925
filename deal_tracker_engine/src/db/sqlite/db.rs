use std::{fmt::Debug, str::FromStr};

use log::*;
use sqlx::{migrate::MigrateDatabase, sqlite::SqliteConnectOptions, Sqlite, SqlitePool};

use super::{deals, new_pool, SqliteDatabaseError};
use crate::{
    db::traits::{DealStore, DealStoreError},
    db_types::{Deal, DealTimestamps, NewDeal},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl DealStore for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn insert_deal(&self, deal: NewDeal) -> Result<i64, DealStoreError> {
        let mut tx = self.pool.begin().await?;
        let reference = deal.deal_reference.clone();
        let id = deals::insert_deal(deal, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Deal [{reference}] has been saved in the DB with id {id}");
        Ok(id)
    }

    async fn fetch_all_deals(&self) -> Result<Vec<Deal>, DealStoreError> {
        let mut conn = self.pool.acquire().await?;
        let deals = deals::fetch_all_deals(&mut conn).await?;
        Ok(deals)
    }

    async fn fetch_deal_by_id(&self, id: i64) -> Result<Option<Deal>, DealStoreError> {
        let mut conn = self.pool.acquire().await?;
        let deal = deals::fetch_deal_by_id(id, &mut conn).await?;
        Ok(deal)
    }

    async fn fetch_deal_by_reference(&self, deal_reference: &str) -> Result<Option<Deal>, DealStoreError> {
        let mut conn = self.pool.acquire().await?;
        let deal = deals::fetch_deal_by_reference(deal_reference, &mut conn).await?;
        Ok(deal)
    }

    async fn update_deal_timestamps(
        &self,
        id: i64,
        timestamps: DealTimestamps,
    ) -> Result<Option<Deal>, DealStoreError> {
        let mut tx = self.pool.begin().await?;
        let deal = deals::update_deal_timestamps(id, timestamps, &mut tx).await?;
        tx.commit().await?;
        Ok(deal)
    }

    async fn delete_deal_by_id(&self, id: i64) -> Result<Option<Deal>, DealStoreError> {
        let mut tx = self.pool.begin().await?;
        let deal = deals::delete_deal_by_id(id, &mut tx).await?;
        tx.commit().await?;
        Ok(deal)
    }

    async fn close(&mut self) -> Result<(), DealStoreError> {
        self.pool.close().await;
        Ok(())
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, SqliteDatabaseError> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Creates the SQLite database file, and the directory it lives in, if it does not exist yet. Existing databases
    /// are left untouched.
    pub async fn create_if_missing(url: &str) -> Result<(), SqliteDatabaseError> {
        let options = SqliteConnectOptions::from_str(url)?;
        if let Some(dir) = options.get_filename().parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        if !Sqlite::database_exists(url).await? {
            Sqlite::create_database(url).await?;
            info!("🗃️ Created Sqlite database {url}");
        }
        Ok(())
    }

    /// Brings the schema up to date using the migrations embedded in the engine.
    pub async fn run_migrations(&self) -> Result<(), SqliteDatabaseError> {
        sqlx::migrate!("./src/db/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Migrations complete");
        Ok(())
    }
}
