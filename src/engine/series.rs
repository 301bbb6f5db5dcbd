//! Interval-smoothed cumulative profit and BB/100 series.

use crate::domain::{Decimal, HandRecord};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    /// 1-based count of hands seen when the point was emitted.
    pub ordinal: usize,
    pub value: Decimal,
    /// Start time of the last hand in the interval.
    pub timestamp: String,
}

/// The four partitions every series family is computed under.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeriesSet {
    /// Profit with rake added back on winning hands.
    pub gross: Vec<SeriesPoint>,
    pub net: Vec<SeriesPoint>,
    pub showdown: Vec<SeriesPoint>,
    pub non_showdown: Vec<SeriesPoint>,
}

impl SeriesSet {
    pub fn len(&self) -> usize {
        self.net.len()
    }

    pub fn is_empty(&self) -> bool {
        self.net.is_empty()
    }

    fn push(&mut self, ordinal: usize, values: [Decimal; 4], timestamp: &str) {
        let [gross, net, showdown, non_showdown] = values;
        for (series, value) in [
            (&mut self.gross, gross),
            (&mut self.net, net),
            (&mut self.showdown, showdown),
            (&mut self.non_showdown, non_showdown),
        ] {
            series.push(SeriesPoint {
                ordinal,
                value: value.round2(),
                timestamp: timestamp.to_string(),
            });
        }
    }

    /// Rows of `(ordinal, timestamp, [gross, net, showdown, non_showdown])`.
    pub fn rows(&self) -> impl Iterator<Item = (usize, &str, [Decimal; 4])> + '_ {
        self.net.iter().enumerate().map(move |(i, p)| {
            (
                p.ordinal,
                p.timestamp.as_str(),
                [
                    self.gross[i].value,
                    p.value,
                    self.showdown[i].value,
                    self.non_showdown[i].value,
                ],
            )
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CumulativeSeries {
    pub profit: SeriesSet,
    pub bb100: SeriesSet,
}

/// Running sums across the scan.
#[derive(Debug, Default)]
struct RunningTotals {
    gross: Decimal,
    net: Decimal,
    showdown: Decimal,
    non_showdown: Decimal,
    big_blinds: Decimal,
}

impl RunningTotals {
    fn add(&mut self, hand: &HandRecord) {
        self.gross += hand.profit_without_rake();
        self.net += hand.hero_profit;
        if hand.went_to_showdown() {
            self.showdown += hand.hero_profit;
        } else {
            self.non_showdown += hand.hero_profit;
        }
        self.big_blinds += hand.big_blind;
    }

    fn profit(&self) -> [Decimal; 4] {
        [self.gross, self.net, self.showdown, self.non_showdown]
    }

    /// Instantaneous BB/100 for each partition; zero until a big blind is seen.
    fn bb100(&self) -> [Decimal; 4] {
        self.profit()
            .map(|sum| (sum * Decimal::hundred()).div_or_zero(self.big_blinds))
    }
}

/// Sums per-hand values until the interval closes.
#[derive(Debug, Default)]
struct IntervalAccumulator {
    sums: [Decimal; 4],
    count: usize,
}

impl IntervalAccumulator {
    fn push(&mut self, values: [Decimal; 4]) {
        for (sum, value) in self.sums.iter_mut().zip(values) {
            *sum += value;
        }
        self.count += 1;
    }

    fn take_mean(&mut self) -> [Decimal; 4] {
        let count = Decimal::from_count(self.count);
        let mean = self.sums.map(|sum| sum.div_or_zero(count));
        *self = IntervalAccumulator::default();
        mean
    }
}

/// Cumulative profit and BB/100 series over hands ordered oldest first.
///
/// A point is emitted every `interval` hands and after the last hand, holding
/// the mean of the per-hand running values since the previous point. All
/// eight arrays share the same ordinals.
pub fn cumulative_series(hands: &[HandRecord], interval: usize) -> CumulativeSeries {
    let interval = interval.max(1);
    let mut out = CumulativeSeries::default();
    let mut totals = RunningTotals::default();
    let mut profit_acc = IntervalAccumulator::default();
    let mut bb100_acc = IntervalAccumulator::default();

    for (i, hand) in hands.iter().enumerate() {
        let ordinal = i + 1;
        totals.add(hand);
        profit_acc.push(totals.profit());
        bb100_acc.push(totals.bb100());

        if ordinal % interval == 0 || ordinal == hands.len() {
            out.profit
                .push(ordinal, profit_acc.take_mean(), &hand.start_time);
            out.bb100
                .push(ordinal, bb100_acc.take_mean(), &hand.start_time);
        }
    }

    out
}
