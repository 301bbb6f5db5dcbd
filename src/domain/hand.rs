//! HandRecord: one played hand from hero's perspective.

use crate::domain::{ActionCode, Decimal, GameType, HandResult, Position, Stage, Street};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One value per betting street.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerStreet<T> {
    pub preflop: T,
    pub flop: T,
    pub turn: T,
    pub river: T,
}

impl<T> PerStreet<T> {
    pub fn get(&self, street: Street) -> &T {
        match street {
            Street::Preflop => &self.preflop,
            Street::Flop => &self.flop,
            Street::Turn => &self.turn,
            Street::River => &self.river,
        }
    }

    pub fn get_mut(&mut self, street: Street) -> &mut T {
        match street {
            Street::Preflop => &mut self.preflop,
            Street::Flop => &mut self.flop,
            Street::Turn => &mut self.turn,
            Street::River => &mut self.river,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Street, &T)> {
        Street::ALL.into_iter().map(move |s| (s, self.get(s)))
    }
}

impl PerStreet<Decimal> {
    pub fn total(&self) -> Decimal {
        self.iter().map(|(_, v)| *v).sum()
    }
}

/// A finalized hand. Immutable once produced by the finalizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandRecord {
    pub hand_id: String,
    /// Site-local `YYYY/MM/DD HH:MM:SS`; sorts lexicographically.
    pub start_time: String,
    pub game_type: GameType,
    pub small_blind: Decimal,
    pub big_blind: Decimal,
    pub hero_position: Position,
    pub hero_hole_cards: String,
    pub flop_cards: String,
    pub turn_card: String,
    pub river_card: String,
    pub hero_investment: PerStreet<Decimal>,
    pub hero_actions: PerStreet<Vec<ActionCode>>,
    pub pot_amount: Decimal,
    pub jackpot_amount: Decimal,
    pub hero_profit: Decimal,
    pub hero_rake: Decimal,
    pub hand_result: HandResult,
    pub final_stage: Stage,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("hand id is empty")]
    EmptyHandId,
    #[error("hand {hand_id} has negative rake")]
    NegativeRake { hand_id: String },
}

impl HandRecord {
    /// Checks that must pass before a record is handed to storage.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.hand_id.trim().is_empty() {
            return Err(ValidationError::EmptyHandId);
        }
        if self.hero_rake.is_negative() {
            return Err(ValidationError::NegativeRake {
                hand_id: self.hand_id.clone(),
            });
        }
        Ok(())
    }

    pub fn total_investment(&self) -> Decimal {
        self.hero_investment.total().round2()
    }

    /// Profit with the rake added back on winning hands.
    pub fn profit_without_rake(&self) -> Decimal {
        if self.hero_profit.is_positive() {
            self.hero_profit + self.hero_rake
        } else {
            self.hero_profit
        }
    }

    /// Last recorded hero action on `street`, if any.
    pub fn last_action(&self, street: Street) -> Option<ActionCode> {
        self.hero_actions.get(street).last().copied()
    }

    pub fn went_to_showdown(&self) -> bool {
        self.hand_result.is_showdown()
    }
}

/// Inclusive `[start, end]` bounds on `start_time`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl TimeWindow {
    pub fn new(start: Option<String>, end: Option<String>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, start_time: &str) -> bool {
        let after_start = self.start.as_deref().map_or(true, |s| start_time >= s);
        let before_end = self.end.as_deref().map_or(true, |e| start_time <= e);
        after_start && before_end
    }
}
