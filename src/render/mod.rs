//! Chart-table output for the renderer.
//!
//! Reports are written as one CSV per chart plus `report.json`. Numbers are
//! already final here; the only formatting is the decimal string form.

use crate::engine::{Report, SeriesSet};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Consumer of a finished report.
pub trait ChartSink {
    /// Returns the paths written.
    fn write_report(&self, report: &Report) -> Result<Vec<PathBuf>, RenderError>;
}

#[derive(Debug, Serialize)]
struct SeriesRow<'a> {
    ordinal: usize,
    timestamp: &'a str,
    gross: String,
    net: String,
    showdown: String,
    non_showdown: String,
}

#[derive(Debug, Serialize)]
struct ActionRow {
    position: &'static str,
    fold_pct: String,
    check_pct: String,
    call_pct: String,
    bet_pct: String,
    raise_pct: String,
    sample_size: usize,
}

#[derive(Debug, Serialize)]
struct WinRateRow {
    position: &'static str,
    win_rate: String,
    sample_size: usize,
}

#[derive(Debug, Serialize)]
struct PnlRow {
    position: &'static str,
    profit: String,
    loss: String,
    total_pnl: String,
    profit_count: usize,
    loss_count: usize,
}

/// Writes chart tables into a directory.
#[derive(Debug, Clone)]
pub struct CsvChartWriter {
    out_dir: PathBuf,
}

impl CsvChartWriter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Encode every output file in memory. Nothing touches disk until all
    /// of them succeed.
    pub fn encode(report: &Report) -> Result<Vec<(String, Vec<u8>)>, RenderError> {
        let mut files = vec![
            ("profit_series.csv".to_string(), series_csv(&report.series.profit)?),
            ("bb100_series.csv".to_string(), series_csv(&report.series.bb100)?),
        ];

        for table in &report.actions {
            let rows = table.rows.iter().map(|r| ActionRow {
                position: r.bucket.label(),
                fold_pct: r.fold_pct.to_string(),
                check_pct: r.check_pct.to_string(),
                call_pct: r.call_pct.to_string(),
                bet_pct: r.bet_pct.to_string(),
                raise_pct: r.raise_pct.to_string(),
                sample_size: r.sample_size,
            });
            files.push((format!("actions_{}.csv", table.street), to_csv(rows)?));
        }

        let win_rates = report.showdown_win_rates.iter().map(|r| WinRateRow {
            position: r.bucket.label(),
            win_rate: r.win_rate.to_string(),
            sample_size: r.sample_size,
        });
        files.push(("showdown_win_rate.csv".to_string(), to_csv(win_rates)?));

        for table in &report.pnl {
            let rows = table.rows.iter().map(|r| PnlRow {
                position: r.bucket.label(),
                profit: r.profit.to_string(),
                loss: r.loss.to_string(),
                total_pnl: r.total_pnl.to_string(),
                profit_count: r.profit_count,
                loss_count: r.loss_count,
            });
            files.push((format!("pnl_{}.csv", table.stage), to_csv(rows)?));
        }

        files.push(("report.json".to_string(), serde_json::to_vec_pretty(report)?));
        Ok(files)
    }
}

impl ChartSink for CsvChartWriter {
    fn write_report(&self, report: &Report) -> Result<Vec<PathBuf>, RenderError> {
        let files = Self::encode(report)?;

        std::fs::create_dir_all(&self.out_dir).map_err(|source| RenderError::Io {
            path: self.out_dir.clone(),
            source,
        })?;

        let mut written = Vec::with_capacity(files.len());
        for (name, bytes) in files {
            let path = self.out_dir.join(name);
            std::fs::write(&path, &bytes).map_err(|source| RenderError::Io {
                path: path.clone(),
                source,
            })?;
            debug!(path = %path.display(), bytes = bytes.len(), "chart table written");
            written.push(path);
        }

        info!(dir = %self.out_dir.display(), files = written.len(), "report written");
        Ok(written)
    }
}

fn series_csv(set: &SeriesSet) -> Result<Vec<u8>, RenderError> {
    to_csv(set.rows().map(|(ordinal, timestamp, [gross, net, showdown, non_showdown])| SeriesRow {
        ordinal,
        timestamp,
        gross: gross.to_string(),
        net: net.to_string(),
        showdown: showdown.to_string(),
        non_showdown: non_showdown.to_string(),
    }))
}

fn to_csv<T: Serialize>(rows: impl IntoIterator<Item = T>) -> Result<Vec<u8>, RenderError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| RenderError::Csv(e.into_error().into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Decimal, GameType, HandRecord, HandResult, PerStreet, Position, Stage};
    use crate::engine::{build_report, AggregationSettings};
    use tempfile::TempDir;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn hand(time: &str, profit: &str, result: HandResult) -> HandRecord {
        HandRecord {
            hand_id: time.to_string(),
            start_time: time.to_string(),
            game_type: GameType::CashGame,
            small_blind: d("0.02"),
            big_blind: d("0.05"),
            hero_position: Position::BTN,
            hero_hole_cards: String::new(),
            flop_cards: String::new(),
            turn_card: String::new(),
            river_card: String::new(),
            hero_investment: PerStreet::default(),
            hero_actions: PerStreet::default(),
            pot_amount: Decimal::zero(),
            jackpot_amount: Decimal::zero(),
            hero_profit: d(profit),
            hero_rake: Decimal::zero(),
            hand_result: result,
            final_stage: if result.is_showdown() {
                Stage::Showdown
            } else {
                Stage::Preflop
            },
        }
    }

    fn sample_report() -> Report {
        let hands = vec![
            hand("2024/01/15 20:11:32", "-0.02", HandResult::NoShowdownLoss),
            hand("2024/01/15 20:12:05", "3", HandResult::ShowdownWin),
        ];
        build_report(&hands, &AggregationSettings::default())
    }

    #[test]
    fn test_writes_every_chart_table() {
        let tmp = TempDir::new().unwrap();
        let writer = CsvChartWriter::new(tmp.path().join("charts"));

        let written = writer.write_report(&sample_report()).unwrap();
        // 2 series + 4 action streets + win rate + 5 pnl stages + json
        assert_eq!(written.len(), 13);
        for name in [
            "profit_series.csv",
            "bb100_series.csv",
            "actions_preflop.csv",
            "actions_river.csv",
            "showdown_win_rate.csv",
            "pnl_showdown.csv",
            "report.json",
        ] {
            assert!(writer.out_dir().join(name).is_file(), "{}", name);
        }
    }

    #[test]
    fn test_series_csv_layout() {
        let files = CsvChartWriter::encode(&sample_report()).unwrap();
        let (_, bytes) = files
            .iter()
            .find(|(name, _)| name == "profit_series.csv")
            .unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "ordinal,timestamp,gross,net,showdown,non_showdown");
        assert_eq!(lines[1], "1,2024/01/15 20:11:32,-0.02,-0.02,0,-0.02");
        assert_eq!(lines[2], "2,2024/01/15 20:12:05,2.98,2.98,3,-0.02");
    }

    #[test]
    fn test_action_table_rows_start_with_overall() {
        let files = CsvChartWriter::encode(&sample_report()).unwrap();
        let (_, bytes) = files
            .iter()
            .find(|(name, _)| name == "actions_flop.csv")
            .unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        let positions: Vec<_> = text
            .lines()
            .skip(1)
            .map(|l| l.split(',').next().unwrap())
            .collect();
        assert_eq!(positions, vec!["Overall", "UTG", "HJ", "CO", "BTN", "SB", "BB"]);
    }
}
