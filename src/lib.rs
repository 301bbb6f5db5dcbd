pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;
pub mod parser;
pub mod render;

pub use config::Config;
pub use db::{init_db, HandStore, MockHandStore, Repository};
pub use domain::{
    ActionCode, Decimal, GameType, HandRecord, HandResult, Position, Stage, Street, TimeWindow,
};
pub use engine::{build_report, AggregationSettings, Report};
pub use error::AppError;
pub use orchestration::{Ingestor, Reporter};
pub use parser::{HandFormat, HandParser, ParserOptions};
pub use render::{ChartSink, CsvChartWriter};
