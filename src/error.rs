use crate::config::ConfigError;
use crate::db::StoreError;
use crate::orchestration::IngestionError;
use crate::render::RenderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Ingestion failed: {0}")]
    Ingestion(#[from] IngestionError),
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
    #[error("Chart output failed: {0}")]
    Render(#[from] RenderError),
    #[error("Invalid argument: {0}")]
    BadRequest(String),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Store(StoreError::Db(err))
    }
}

impl From<regex::Error> for AppError {
    fn from(err: regex::Error) -> Self {
        AppError::BadRequest(format!("hero name does not form a valid pattern: {}", err))
    }
}
