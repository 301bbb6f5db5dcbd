//! SQLite-backed hand repository.
//!
//! Methods are organized across submodules:
//! - `hands.rs` - row encoding/decoding for the `hands` table

mod hands;

use super::{HandStore, InsertOutcome, ScanOrder, StoreError};
use crate::domain::{HandRecord, TimeWindow};
use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqliteQueryResult};
use sqlx::Row;
use tracing::debug;

const HAND_COLUMNS: &str = r#"
    hand_id, start_time, game_type, small_blind, big_blind, hero_position,
    hero_hole_cards, flop_cards, turn_card, river_card,
    preflop_investment, flop_investment, turn_investment, river_investment,
    preflop_actions, flop_actions, turn_actions, river_actions,
    pot_amount, jackpot_amount, hero_profit, hero_rake, hand_result, final_stage
"#;

/// Repository for database operations.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    /// Insert a hand unless its hand id is already stored.
    ///
    /// `ON CONFLICT DO NOTHING` turns a duplicate into zero affected rows.
    ///
    /// # Errors
    /// Returns an error for any other database failure.
    pub async fn insert_hand(&self, hand: &HandRecord) -> Result<InsertOutcome, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO hands ({HAND_COLUMNS}, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(hand_id) DO NOTHING
            "#
        );
        let row = hands::HandRow::encode(hand);
        let result = sqlx::query(&sql)
            .bind(row.hand_id)
            .bind(row.start_time)
            .bind(row.game_type)
            .bind(row.small_blind)
            .bind(row.big_blind)
            .bind(row.hero_position)
            .bind(row.hero_hole_cards)
            .bind(row.flop_cards)
            .bind(row.turn_card)
            .bind(row.river_card)
            .bind(row.investments[0].clone())
            .bind(row.investments[1].clone())
            .bind(row.investments[2].clone())
            .bind(row.investments[3].clone())
            .bind(row.actions[0].clone())
            .bind(row.actions[1].clone())
            .bind(row.actions[2].clone())
            .bind(row.actions[3].clone())
            .bind(row.pot_amount)
            .bind(row.jackpot_amount)
            .bind(row.hero_profit)
            .bind(row.hero_rake)
            .bind(row.hand_result)
            .bind(row.final_stage)
            .bind(chrono::Utc::now().timestamp_millis())
            .execute(&self.pool)
            .await;

        insert_outcome(&hand.hand_id, result)
    }

    /// Point lookup by hand id.
    ///
    /// # Errors
    /// Returns an error if the query fails or the stored row cannot be decoded.
    pub async fn find_hand(&self, hand_id: &str) -> Result<Option<HandRecord>, StoreError> {
        let sql = format!("SELECT {HAND_COLUMNS} FROM hands WHERE hand_id = ?");
        let row = sqlx::query(&sql)
            .bind(hand_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(hands::decode_hand).transpose()
    }

    /// Hands ordered by start time (ties by insertion order).
    ///
    /// # Errors
    /// Returns an error if the query fails or any row cannot be decoded.
    pub async fn scan_hands(
        &self,
        order: ScanOrder,
        window: Option<&TimeWindow>,
    ) -> Result<Vec<HandRecord>, StoreError> {
        let direction = match order {
            ScanOrder::OldestFirst => "ASC",
            ScanOrder::NewestFirst => "DESC",
        };
        let sql = format!(
            r#"
            SELECT {HAND_COLUMNS}
            FROM hands
            WHERE start_time >= COALESCE(?, start_time)
              AND start_time <= COALESCE(?, start_time)
            ORDER BY start_time {direction}, id {direction}
            "#
        );
        let (start, end) = window
            .map(|w| (w.start.clone(), w.end.clone()))
            .unwrap_or_default();

        let rows = sqlx::query(&sql)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(hands::decode_hand).collect()
    }

    /// Number of stored hands.
    pub async fn count_hands(&self) -> Result<i64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM hands")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get::<i64, _>("n"))
    }
}

/// Map an insert's result onto an [`InsertOutcome`].
///
/// With `ON CONFLICT(hand_id) DO NOTHING` SQLite never raises the unique
/// violation; the error arm only fires for an insert without that clause.
fn insert_outcome(
    hand_id: &str,
    result: Result<SqliteQueryResult, sqlx::Error>,
) -> Result<InsertOutcome, StoreError> {
    match result {
        Ok(done) if done.rows_affected() > 0 => Ok(InsertOutcome::Inserted),
        Ok(_) => Ok(InsertOutcome::Duplicate),
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            debug!(hand_id, "unique constraint caught duplicate hand");
            Ok(InsertOutcome::Duplicate)
        }
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl HandStore for Repository {
    async fn insert_hand(&self, hand: &HandRecord) -> Result<InsertOutcome, StoreError> {
        Repository::insert_hand(self, hand).await
    }

    async fn find_hand(&self, hand_id: &str) -> Result<Option<HandRecord>, StoreError> {
        Repository::find_hand(self, hand_id).await
    }

    async fn scan_hands(
        &self,
        order: ScanOrder,
        window: Option<&TimeWindow>,
    ) -> Result<Vec<HandRecord>, StoreError> {
        Repository::scan_hands(self, order, window).await
    }
}
