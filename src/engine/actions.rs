//! Per-position, per-street action mix and showdown win rates.

use super::Bucket;
use crate::domain::{ActionCode, Decimal, HandRecord, Stage, Street};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionDistribution {
    pub bucket: Bucket,
    pub fold_pct: Decimal,
    pub check_pct: Decimal,
    pub call_pct: Decimal,
    pub bet_pct: Decimal,
    pub raise_pct: Decimal,
    pub sample_size: usize,
}

impl ActionDistribution {
    pub fn percentages(&self) -> [Decimal; 5] {
        [
            self.fold_pct,
            self.check_pct,
            self.call_pct,
            self.bet_pct,
            self.raise_pct,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreetActions {
    pub street: Street,
    /// Overall first, then UTG..BB.
    pub rows: Vec<ActionDistribution>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowdownWinRate {
    pub bucket: Bucket,
    pub win_rate: Decimal,
    pub sample_size: usize,
}

/// Action tables for every betting street.
pub fn action_tables(hands: &[HandRecord]) -> Vec<StreetActions> {
    Street::ALL
        .into_iter()
        .map(|street| StreetActions {
            street,
            rows: Bucket::all()
                .into_iter()
                .map(|bucket| action_distribution(hands, street, bucket))
                .collect(),
        })
        .collect()
}

/// Share of each hero action on `street`, one vote per qualifying hand.
///
/// A hand qualifies if it reached the street and hero acted there; its last
/// action on the street is the one counted.
pub fn action_distribution(
    hands: &[HandRecord],
    street: Street,
    bucket: Bucket,
) -> ActionDistribution {
    let mut counts = [0usize; 5];
    for hand in hands
        .iter()
        .filter(|h| bucket.contains(h) && h.final_stage.reached(street))
    {
        if let Some(action) = hand.last_action(street) {
            counts[action_slot(action)] += 1;
        }
    }
    let sample_size: usize = counts.iter().sum();
    let [fold_pct, check_pct, call_pct, bet_pct, raise_pct] = tenths_summing_to_100(counts);

    ActionDistribution {
        bucket,
        fold_pct,
        check_pct,
        call_pct,
        bet_pct,
        raise_pct,
        sample_size,
    }
}

fn action_slot(action: ActionCode) -> usize {
    match action {
        ActionCode::Fold => 0,
        ActionCode::Check => 1,
        ActionCode::Call => 2,
        ActionCode::Bet => 3,
        ActionCode::Raise => 4,
    }
}

/// Percentages at 0.1 resolution that add up to exactly 100.0.
///
/// Each share is floored to a tenth and the leftover tenths go to the
/// largest remainders (earlier slot wins ties). All zeros when `counts` is
/// empty.
fn tenths_summing_to_100(counts: [usize; 5]) -> [Decimal; 5] {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return [Decimal::zero(); 5];
    }

    let mut tenths = [0usize; 5];
    let mut remainders = [(0usize, 0usize); 5];
    for (i, count) in counts.iter().enumerate() {
        tenths[i] = count * 1000 / total;
        remainders[i] = (count * 1000 % total, i);
    }

    let leftover = 1000 - tenths.iter().sum::<usize>();
    remainders.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    for (_, slot) in remainders.iter().take(leftover) {
        tenths[*slot] += 1;
    }

    tenths.map(|t| Decimal::from_tenths(t as i64))
}

/// Share of showdown hands hero won, for Overall and each position.
pub fn showdown_win_rates(hands: &[HandRecord]) -> Vec<ShowdownWinRate> {
    Bucket::all()
        .into_iter()
        .map(|bucket| {
            let showdowns: Vec<&HandRecord> = hands
                .iter()
                .filter(|h| bucket.contains(h) && h.final_stage == Stage::Showdown)
                .collect();
            let wins = showdowns
                .iter()
                .filter(|h| h.hero_profit.is_positive())
                .count();
            ShowdownWinRate {
                bucket,
                win_rate: Decimal::percent_of(wins, showdowns.len()).round1(),
                sample_size: showdowns.len(),
            }
        })
        .collect()
}
