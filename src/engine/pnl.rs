//! Profit/loss buckets per final stage, in big blinds.

use super::Bucket;
use crate::domain::{Decimal, HandRecord, Stage};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PnlBucket {
    pub bucket: Bucket,
    /// Sum of winning hands, in big blinds.
    pub profit: Decimal,
    /// Sum of losing and break-even hands, in big blinds. Never positive.
    pub loss: Decimal,
    pub total_pnl: Decimal,
    pub profit_count: usize,
    pub loss_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StagePnl {
    pub stage: Stage,
    pub rows: Vec<PnlBucket>,
}

/// One table per stage, each with Overall followed by the six positions.
pub fn pnl_tables(hands: &[HandRecord]) -> Vec<StagePnl> {
    Stage::ALL
        .into_iter()
        .map(|stage| StagePnl {
            stage,
            rows: Bucket::all()
                .into_iter()
                .map(|bucket| pnl_bucket(hands, stage, bucket))
                .collect(),
        })
        .collect()
}

/// Splits hands that ended at `stage` into winners and the rest.
///
/// Money sums are converted with the average big blind of the same hands.
pub fn pnl_bucket(hands: &[HandRecord], stage: Stage, bucket: Bucket) -> PnlBucket {
    let mut profit = Decimal::zero();
    let mut loss = Decimal::zero();
    let mut profit_count = 0;
    let mut loss_count = 0;
    let mut big_blinds = Decimal::zero();

    for hand in hands
        .iter()
        .filter(|h| h.final_stage == stage && bucket.contains(h))
    {
        big_blinds += hand.big_blind;
        if hand.hero_profit.is_positive() {
            profit += hand.hero_profit;
            profit_count += 1;
        } else {
            loss += hand.hero_profit;
            loss_count += 1;
        }
    }

    let avg_big_blind = big_blinds.div_or_zero(Decimal::from_count(profit_count + loss_count));
    let profit = profit.div_or_zero(avg_big_blind).round2();
    let loss = loss.div_or_zero(avg_big_blind).round2();

    PnlBucket {
        bucket,
        profit,
        loss,
        total_pnl: profit + loss,
        profit_count,
        loss_count,
    }
}
