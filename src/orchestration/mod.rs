//! Workflows that tie the parser, the store and the engine together.

pub mod ingest;
pub mod report;

pub use ingest::{IngestionError, IngestionResult, Ingestor};
pub use report::Reporter;
