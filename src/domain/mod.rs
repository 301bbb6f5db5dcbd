//! Domain types for the hand-history ledger.
//!
//! This module provides:
//! - Lossless money handling via the Decimal wrapper
//! - Closed enumerations for positions, streets, stages, actions and results
//! - HandRecord, the per-hand entity produced by the parser and stored as-is

pub mod decimal;
pub mod hand;
pub mod primitives;

pub use decimal::Decimal;
pub use hand::{HandRecord, PerStreet, TimeWindow, ValidationError};
pub use primitives::{ActionCode, GameType, HandResult, Position, Stage, Street, UnknownVariant};
