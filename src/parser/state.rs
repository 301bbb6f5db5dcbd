//! Per-hand scan state and its section transition table.

use super::format::HandFormat;
use super::text;
use super::ParseError;
use crate::domain::{ActionCode, Decimal, GameType, PerStreet, Street};
use tracing::{debug, warn};

/// Where the scan currently is inside one hand.
///
/// Ordered so transitions can be checked for monotonicity:
/// `Street(Preflop) < .. < Street(River) < Showdown < Summary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Section {
    Street(Street),
    Showdown,
    Summary,
}

impl Section {
    /// Section a `*** NAME ***` marker moves to, if it is a transition.
    pub fn from_marker(name: &str) -> Option<Section> {
        match name {
            "FLOP" => Some(Section::Street(Street::Flop)),
            "TURN" => Some(Section::Street(Street::Turn)),
            "RIVER" => Some(Section::Street(Street::River)),
            "SHOWDOWN" => Some(Section::Showdown),
            "SUMMARY" => Some(Section::Summary),
            _ => None,
        }
    }
}

/// Raw accumulators for one hand, before finalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialHand {
    pub hand_id: String,
    pub start_time: String,
    pub game_type: GameType,
    pub small_blind: Decimal,
    pub big_blind: Decimal,
    pub hole_cards: String,
    pub flop_cards: String,
    pub turn_card: String,
    pub river_card: String,
    pub investment: PerStreet<Decimal>,
    pub actions: PerStreet<Vec<ActionCode>>,
    pub pot: Decimal,
    pub rake: Decimal,
    pub jackpot: Decimal,
    /// Amount hero won or collected per the summary; zero if nothing.
    pub collected: Decimal,
    /// Hero's summary line says `showed`.
    pub showed: bool,
}

impl PartialHand {
    pub fn new(
        hand_id: String,
        start_time: String,
        small_blind: Decimal,
        big_blind: Decimal,
    ) -> Self {
        Self {
            hand_id,
            start_time,
            game_type: GameType::CashGame,
            small_blind,
            big_blind,
            hole_cards: String::new(),
            flop_cards: String::new(),
            turn_card: String::new(),
            river_card: String::new(),
            investment: PerStreet::default(),
            actions: PerStreet::default(),
            pot: Decimal::zero(),
            rake: Decimal::zero(),
            jackpot: Decimal::zero(),
            collected: Decimal::zero(),
            showed: false,
        }
    }
}

/// Explicit scan state threaded through one hand's lines.
#[derive(Debug, Clone)]
pub struct ParseState {
    pub section: Section,
    /// Street investments and actions are booked against. Stays on the last
    /// betting street once showdown/summary is reached.
    pub street: Street,
    pub hero_seat: Option<u32>,
    pub button_seat: Option<u32>,
    pub hand: PartialHand,
}

impl ParseState {
    /// Seed state from a header line. `None` if the line is not a header.
    pub fn from_header(format: &HandFormat, line: &str) -> Option<Self> {
        let caps = format.header.captures(line)?;
        let small_blind = amount_or_zero(&caps[2], "small blind");
        let big_blind = amount_or_zero(&caps[3], "big blind");
        let mut hand = PartialHand::new(
            caps[1].to_string(),
            text::normalize_timestamp(&caps[4]),
            small_blind,
            big_blind,
        );
        if hand.hand_id.starts_with(&format.rush_id_prefix) {
            hand.game_type = GameType::RushAndCash;
        }
        Some(Self {
            section: Section::Street(Street::Preflop),
            street: Street::Preflop,
            hero_seat: None,
            button_seat: None,
            hand,
        })
    }

    pub fn in_summary(&self) -> bool {
        self.section == Section::Summary
    }

    /// Feed one line (never a header) into the state.
    pub fn apply_line(&mut self, format: &HandFormat, line: &str) {
        let line = line.trim_end();
        if line.is_empty() {
            return;
        }

        if let Some(name) = text::section_marker(line) {
            self.transition(name, line);
            return;
        }

        if self.in_summary() {
            self.apply_summary_line(format, line);
            return;
        }

        if let Some(caps) = format.hero_action.captures(line) {
            self.apply_hero_action(format, &caps[1]);
        } else if let Some(result) = text::capture_amount(&format.uncalled, line) {
            match result {
                Ok(refund) => {
                    let inv = self.hand.investment.get_mut(self.street);
                    *inv = (*inv - refund).round2();
                }
                Err(e) => self.log_bad_amount(e, line),
            }
        } else if let Some(caps) = format.hole_cards.captures(line) {
            self.hand.hole_cards = caps[1].trim().to_string();
        } else if let Some(caps) = format.hero_seat.captures(line) {
            self.hero_seat = caps[1].parse().ok();
        } else if let Some(caps) = format.button.captures(line) {
            self.button_seat = caps[1].parse().ok();
            if let Some(name) = format.table_name.captures(line) {
                if name[1].contains(&format.rush_table_marker) {
                    self.hand.game_type = GameType::RushAndCash;
                }
            }
        }
    }

    fn transition(&mut self, name: &str, line: &str) {
        let Some(next) = Section::from_marker(name) else {
            return;
        };
        if next <= self.section {
            debug!(
                hand_id = %self.hand.hand_id,
                marker = name,
                "ignoring non-forward section marker"
            );
            return;
        }
        self.section = next;

        if let Section::Street(street) = next {
            self.street = street;
            match street {
                Street::Flop => {
                    self.hand.flop_cards = text::bracket_groups(line)
                        .first()
                        .map(|g| g.to_string())
                        .unwrap_or_default();
                }
                Street::Turn => self.hand.turn_card = text::street_card(line, 3),
                Street::River => self.hand.river_card = text::street_card(line, 4),
                Street::Preflop => {}
            }
        }
    }

    fn apply_hero_action(&mut self, format: &HandFormat, action: &str) {
        let street = self.street;

        if action.starts_with("posts") {
            if let Some(result) = text::capture_amount(&format.post, action) {
                match result {
                    Ok(amount) => {
                        let inv = self.hand.investment.get_mut(Street::Preflop);
                        // A blind sets preflop investment outright, replacing
                        // any earlier ante. Posts after it add on.
                        if action.contains("small blind") || action.contains("big blind") {
                            *inv = amount;
                        } else {
                            *inv = (*inv + amount).round2();
                        }
                    }
                    Err(e) => self.log_bad_amount(e, action),
                }
            }
            return;
        }

        // `raises` must be classified before `bets`/`calls`.
        let code = if action.contains("raises") {
            if let Some(caps) = format.raise_to.captures(action) {
                match text::parse_amount(&caps[2]) {
                    Ok(to) => *self.hand.investment.get_mut(street) = to,
                    Err(e) => self.log_bad_amount(e, action),
                }
            }
            ActionCode::Raise
        } else if action.starts_with("bets") || action.starts_with("calls") {
            match text::capture_amount(&format.wager, action) {
                Some(Ok(amount)) => {
                    let inv = self.hand.investment.get_mut(street);
                    *inv = (*inv + amount).round2();
                }
                Some(Err(e)) => self.log_bad_amount(e, action),
                None => {}
            }
            if action.starts_with("bets") {
                ActionCode::Bet
            } else {
                ActionCode::Call
            }
        } else if action.starts_with("checks") {
            ActionCode::Check
        } else if action.starts_with("folds") {
            ActionCode::Fold
        } else {
            debug!(hand_id = %self.hand.hand_id, action, "ignoring non-betting hero line");
            return;
        };

        self.hand.actions.get_mut(street).push(code);
    }

    fn apply_summary_line(&mut self, format: &HandFormat, line: &str) {
        if line.starts_with("Total pot") {
            if let Some(Ok(pot)) = text::capture_amount(&format.total_pot, line) {
                self.hand.pot = pot;
            }
            if let Some(Ok(rake)) = text::capture_amount(&format.rake, line) {
                self.hand.rake = rake;
            }
            if let Some(Ok(jackpot)) = text::capture_amount(&format.jackpot, line) {
                self.hand.jackpot = jackpot;
            }
            return;
        }

        if format.is_hero_summary_seat(line, self.hero_seat) {
            self.hand.showed = line.contains("showed");
            match text::capture_amount(&format.result_amount, line) {
                Some(Ok(amount)) => self.hand.collected = amount,
                Some(Err(e)) => self.log_bad_amount(e, line),
                None => {}
            }
        }
    }

    fn log_bad_amount(&self, err: ParseError, line: &str) {
        warn!(
            hand_id = %self.hand.hand_id,
            error = %err,
            line,
            "skipping line with unreadable amount"
        );
    }
}

fn amount_or_zero(raw: &str, what: &str) -> Decimal {
    text::parse_amount(raw).unwrap_or_else(|e| {
        warn!(error = %e, field = what, "header amount unreadable, using zero");
        Decimal::zero()
    })
}
