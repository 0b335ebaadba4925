use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::{
    db::sqlite::SqliteDatabaseError,
    db_types::{Deal, DealTimestamps, NewDeal},
};

const DEAL_COLUMNS: &str =
    "id, deal_reference, chain, chain_number, arrival_time, sent_time, vest_complete_time, app_complete_time";

/// Inserts a new deal into the database using the given connection and returns its id. This is not atomic with
/// respect to any other call. You can embed this call inside a transaction if you need to ensure atomicity, and pass
/// `&mut *tx` as the connection argument.
pub async fn insert_deal(deal: NewDeal, conn: &mut SqliteConnection) -> Result<i64, SqliteDatabaseError> {
    let ts = deal.timestamps;
    let id = sqlx::query_scalar::<_, i64>(
        r#"
            INSERT INTO dealtracker (
                deal_reference,
                chain,
                chain_number,
                arrival_time,
                sent_time,
                vest_complete_time,
                app_complete_time
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id;
        "#,
    )
    .bind(deal.deal_reference)
    .bind(deal.chain)
    .bind(deal.chain_number)
    .bind(ts.arrival_time)
    .bind(ts.sent_time)
    .bind(ts.vest_complete_time)
    .bind(ts.app_complete_time)
    .fetch_one(conn)
    .await?;
    trace!("🗃️ Inserted deal with id {id}");
    Ok(id)
}

pub async fn fetch_all_deals(conn: &mut SqliteConnection) -> Result<Vec<Deal>, SqliteDatabaseError> {
    let sql = format!("SELECT {DEAL_COLUMNS} FROM dealtracker");
    let deals = sqlx::query_as::<_, Deal>(&sql).fetch_all(conn).await?;
    trace!("🗃️ Result of fetch_all_deals: {}", deals.len());
    Ok(deals)
}

pub async fn fetch_deal_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Deal>, SqliteDatabaseError> {
    let sql = format!("SELECT {DEAL_COLUMNS} FROM dealtracker WHERE id = $1");
    let deal = sqlx::query_as::<_, Deal>(&sql).bind(id).fetch_optional(conn).await?;
    Ok(deal)
}

/// Returns the first (lowest id) deal with the given reference.
pub async fn fetch_deal_by_reference(
    deal_reference: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Deal>, SqliteDatabaseError> {
    let sql = format!("SELECT {DEAL_COLUMNS} FROM dealtracker WHERE deal_reference = $1 ORDER BY id ASC LIMIT 1");
    let deal = sqlx::query_as::<_, Deal>(&sql).bind(deal_reference).fetch_optional(conn).await?;
    Ok(deal)
}

/// Writes the given timestamps onto the deal in one conditional statement. Absent timestamps keep their stored value.
///
/// Returns `None` if the deal does not exist, which includes the case where it was removed by another caller since
/// it was last read.
pub async fn update_deal_timestamps(
    id: i64,
    timestamps: DealTimestamps,
    conn: &mut SqliteConnection,
) -> Result<Option<Deal>, SqliteDatabaseError> {
    let sql = format!(
        r#"
            UPDATE dealtracker SET
                arrival_time = COALESCE($1, arrival_time),
                sent_time = COALESCE($2, sent_time),
                vest_complete_time = COALESCE($3, vest_complete_time),
                app_complete_time = COALESCE($4, app_complete_time)
            WHERE id = $5
            RETURNING {DEAL_COLUMNS};
        "#
    );
    let deal = sqlx::query_as::<_, Deal>(&sql)
        .bind(timestamps.arrival_time)
        .bind(timestamps.sent_time)
        .bind(timestamps.vest_complete_time)
        .bind(timestamps.app_complete_time)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    match &deal {
        Some(d) => debug!("🗃️ Timestamps for deal #{id} [{}] updated", d.deal_reference),
        None => debug!("🗃️ No deal with id {id} to update"),
    }
    Ok(deal)
}

pub async fn delete_deal_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Deal>, SqliteDatabaseError> {
    let sql = format!("DELETE FROM dealtracker WHERE id = $1 RETURNING {DEAL_COLUMNS}");
    let deal = sqlx::query_as::<_, Deal>(&sql).bind(id).fetch_optional(conn).await?;
    match &deal {
        Some(d) => debug!("🗃️ Deal #{id} [{}] deleted", d.deal_reference),
        None => debug!("🗃️ No deal with id {id} to delete"),
    }
    Ok(deal)
}
