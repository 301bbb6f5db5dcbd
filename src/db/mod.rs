//! Storage for parsed hands.
//!
//! This module provides:
//! - The `HandStore` trait the ingestion and reporting layers depend on
//! - Database initialization, pragmas and migrations for SQLite
//! - `Repository`, the SQLite-backed store
//! - `MockHandStore`, an in-memory store for tests

pub mod migrations;
pub mod mock;
pub mod repo;

pub use migrations::init_db;
pub use mock::MockHandStore;
pub use repo::Repository;

use crate::domain::{HandRecord, TimeWindow};
use async_trait::async_trait;
use thiserror::Error;

/// What happened to a hand handed to `insert_hand`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// A row with the same hand id already exists; nothing was written.
    Duplicate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanOrder {
    #[default]
    OldestFirst,
    NewestFirst,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] sqlx::Error),
    #[error("stored hand {hand_id} has unreadable {field}")]
    Corrupt { hand_id: String, field: &'static str },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Relational store keyed by hand id.
///
/// `insert_hand` is idempotent: a second insert of the same hand id reports
/// `Duplicate` instead of failing, including when the store's own unique
/// constraint is what catches it.
#[async_trait]
pub trait HandStore: Send + Sync {
    async fn insert_hand(&self, hand: &HandRecord) -> Result<InsertOutcome, StoreError>;

    async fn find_hand(&self, hand_id: &str) -> Result<Option<HandRecord>, StoreError>;

    /// Hands ordered by start time, optionally bounded by an inclusive window.
    async fn scan_hands(
        &self,
        order: ScanOrder,
        window: Option<&TimeWindow>,
    ) -> Result<Vec<HandRecord>, StoreError>;
}
