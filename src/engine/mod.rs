//! Pure aggregation over stored hands.
//!
//! Every function here takes hands ordered oldest first and is recomputed
//! from scratch per report. Nothing is persisted.

use crate::domain::{Decimal, HandRecord, Position};
use serde::{Serialize, Serializer};
use std::fmt;

pub mod actions;
pub mod pnl;
pub mod series;

pub use actions::{
    action_distribution, action_tables, showdown_win_rates, ActionDistribution, ShowdownWinRate,
    StreetActions,
};
pub use pnl::{pnl_bucket, pnl_tables, PnlBucket, StagePnl};
pub use series::{cumulative_series, CumulativeSeries, SeriesPoint, SeriesSet};

/// Row key of the cross-sectional tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Overall,
    Position(Position),
}

impl Bucket {
    /// Overall, then UTG, HJ, CO, BTN, SB, BB.
    pub fn all() -> [Bucket; 7] {
        let mut out = [Bucket::Overall; 7];
        for (slot, position) in out[1..].iter_mut().zip(Position::ALL) {
            *slot = Bucket::Position(position);
        }
        out
    }

    pub fn label(&self) -> &'static str {
        match self {
            Bucket::Overall => "Overall",
            Bucket::Position(p) => p.as_str(),
        }
    }

    pub fn contains(&self, hand: &HandRecord) -> bool {
        match self {
            Bucket::Overall => true,
            Bucket::Position(p) => hand.hero_position == *p,
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Bucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationSettings {
    /// Hands per series point.
    pub interval: usize,
}

impl Default for AggregationSettings {
    fn default() -> Self {
        Self { interval: 1 }
    }
}

/// Headline numbers for a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub hands: usize,
    pub total_profit: Decimal,
    /// Rake on hands hero won.
    pub total_rake: Decimal,
    pub profit_without_rake: Decimal,
    pub showdown_profit: Decimal,
    pub non_showdown_profit: Decimal,
    pub bb100: Decimal,
    pub first_hand: Option<String>,
    pub last_hand: Option<String>,
}

impl ReportSummary {
    pub fn from_hands(hands: &[HandRecord]) -> Self {
        let mut summary = ReportSummary {
            hands: hands.len(),
            first_hand: hands.first().map(|h| h.start_time.clone()),
            last_hand: hands.last().map(|h| h.start_time.clone()),
            ..Default::default()
        };
        let mut big_blinds = Decimal::zero();

        for hand in hands {
            summary.total_profit += hand.hero_profit;
            summary.profit_without_rake += hand.profit_without_rake();
            if hand.hero_profit.is_positive() {
                summary.total_rake += hand.hero_rake;
            }
            if hand.went_to_showdown() {
                summary.showdown_profit += hand.hero_profit;
            } else {
                summary.non_showdown_profit += hand.hero_profit;
            }
            big_blinds += hand.big_blind;
        }

        summary.bb100 = (summary.total_profit * Decimal::hundred())
            .div_or_zero(big_blinds)
            .round2();
        summary
    }
}

/// Everything the chart renderer consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub summary: ReportSummary,
    pub interval: usize,
    pub series: CumulativeSeries,
    pub actions: Vec<StreetActions>,
    pub showdown_win_rates: Vec<ShowdownWinRate>,
    pub pnl: Vec<StagePnl>,
}

/// Build the full report from hands ordered oldest first.
pub fn build_report(hands: &[HandRecord], settings: &AggregationSettings) -> Report {
    let interval = settings.interval.max(1);
    Report {
        summary: ReportSummary::from_hands(hands),
        interval,
        series: cumulative_series(hands, interval),
        actions: action_tables(hands),
        showdown_win_rates: showdown_win_rates(hands),
        pnl: pnl_tables(hands),
    }
}
