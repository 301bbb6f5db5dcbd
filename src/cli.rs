use crate::domain::TimeWindow;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "handledger")]
#[command(about = "Poker hand-history ledger and chart-table generator", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse hand-history files and store new hands
    Parse {
        /// Directory of .txt hand histories (searched recursively)
        #[arg(short, long)]
        input: PathBuf,

        /// SQLite database path (overrides HANDLEDGER_DATABASE_PATH)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Keep hands that have no summary section
        #[arg(long)]
        keep_incomplete: bool,

        /// Hero screen name (overrides HANDLEDGER_HERO_NAME)
        #[arg(long)]
        hero: Option<String>,
    },

    /// Aggregate stored hands into chart tables
    Chart {
        /// SQLite database path (overrides HANDLEDGER_DATABASE_PATH)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Output directory (overrides HANDLEDGER_OUTPUT_DIR)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// First day to include (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        start: Option<NaiveDate>,

        /// Last day to include (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        end: Option<NaiveDate>,

        /// Hands per series point (overrides HANDLEDGER_INTERVAL)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,
    },
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD, got {:?}: {}", raw, e))
}

/// Inclusive window covering whole days, in stored start-time format.
///
/// `None` when neither bound is given.
pub fn date_window(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Option<TimeWindow>, String> {
    if let (Some(s), Some(e)) = (start, end) {
        if s > e {
            return Err(format!("start date {} is after end date {}", s, e));
        }
    }
    if start.is_none() && end.is_none() {
        return Ok(None);
    }
    Ok(Some(TimeWindow::new(
        start.map(|d| format!("{} 00:00:00", d.format("%Y/%m/%d"))),
        end.map(|d| format!("{} 23:59:59", d.format("%Y/%m/%d"))),
    )))
}
