//! Hand-history parser: log text to finalized HandRecords.
//!
//! This module provides:
//! - Text primitives for amounts, brackets and markers
//! - `HandFormat`, the compiled site format
//! - `ParseState`, the per-hand scan state machine
//! - Position resolution and hand finalization

pub mod finalize;
pub mod format;
pub mod position;
pub mod state;
pub mod text;

pub use finalize::{finalize, Seating};
pub use format::HandFormat;
pub use position::{resolve_position, SIX_MAX};
pub use state::{ParseState, PartialHand, Section};

use crate::domain::HandRecord;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("hand {hand_id} starting at line {line} has no summary section")]
    MissingSummary { hand_id: String, line: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    pub table_size: u32,
    /// Keep hands whose summary section is missing instead of discarding them.
    pub keep_incomplete: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            table_size: SIX_MAX,
            keep_incomplete: false,
        }
    }
}

/// One hand scanned from a line slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedHand {
    pub record: HandRecord,
    /// Index of the next hand header, or the input length.
    pub next_index: usize,
    /// The hand had a summary section.
    pub complete: bool,
}

/// Result of parsing a whole file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    pub hands: Vec<HandRecord>,
    pub discarded: Vec<ParseError>,
}

#[derive(Debug, Clone)]
pub struct HandParser {
    format: HandFormat,
    options: ParserOptions,
}

impl HandParser {
    pub fn new(format: HandFormat, options: ParserOptions) -> Self {
        Self { format, options }
    }

    pub fn format(&self) -> &HandFormat {
        &self.format
    }

    /// Scan the hand whose header is at `lines[start]`.
    ///
    /// Returns `None` if that line is not a hand header; the caller should
    /// advance by one line.
    pub fn parse_hand(&self, lines: &[&str], start: usize) -> Option<ParsedHand> {
        let mut state = ParseState::from_header(&self.format, lines.get(start)?)?;

        let mut index = start + 1;
        while index < lines.len() && !self.format.is_header(lines[index]) {
            state.apply_line(&self.format, lines[index]);
            index += 1;
        }

        let complete = state.in_summary();
        let seating = Seating {
            hero_seat: state.hero_seat,
            button_seat: state.button_seat,
            table_size: self.options.table_size,
        };
        let record = finalize(state.hand, seating);
        debug!(hand_id = %record.hand_id, profit = %record.hero_profit, complete, "parsed hand");

        Some(ParsedHand {
            record,
            next_index: index,
            complete,
        })
    }

    /// Parse every hand in a sequence of lines.
    pub fn parse_lines(&self, lines: &[&str]) -> ParseOutcome {
        let mut outcome = ParseOutcome::default();
        let mut index = 0;

        while index < lines.len() {
            let Some(parsed) = self.parse_hand(lines, index) else {
                index += 1;
                continue;
            };

            if parsed.complete || self.options.keep_incomplete {
                outcome.hands.push(parsed.record);
            } else {
                let err = ParseError::MissingSummary {
                    hand_id: parsed.record.hand_id,
                    line: index + 1,
                };
                warn!(error = %err, "discarding truncated hand");
                outcome.discarded.push(err);
            }
            index = parsed.next_index;
        }

        outcome
    }

    pub fn parse_text(&self, text: &str) -> ParseOutcome {
        // Some exports start with a UTF-8 byte order mark.
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let lines: Vec<&str> = text.lines().collect();
        self.parse_lines(&lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActionCode, Decimal, HandResult, Position, Stage};

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn parser() -> HandParser {
        HandParser::new(HandFormat::new("Hero").unwrap(), ParserOptions::default())
    }

    const FOLDED_PREFLOP: &str = "\
Poker Hand #RC1: Hold'em No Limit ($0.02/$0.05) - 2024/01/15 20:11:32
Table 'RushAndCash1' 6-max Seat #1 is the button
Seat 1: Villain1 ($5.00 in chips)
Seat 2: Hero ($5.00 in chips)
Seat 3: Villain2 ($5.00 in chips)
Hero: posts small blind $0.02
Villain2: posts big blind $0.05
*** HOLE CARDS ***
Dealt to Hero [7c 2d]
Villain1: raises $0.10 to $0.15
Hero: folds
Villain2: folds
Uncalled bet ($0.10) returned to Villain1
*** SUMMARY ***
Total pot $0.12 | Rake $0 | Jackpot $0
Seat 1: Villain1 (button) collected ($0.12)
Seat 2: Hero (small blind) folded before Flop
Seat 3: Villain2 (big blind) folded before Flop
";

    #[test]
    fn test_parse_single_folded_hand() {
        let outcome = parser().parse_text(FOLDED_PREFLOP);
        assert_eq!(outcome.hands.len(), 1);
        assert!(outcome.discarded.is_empty());

        let hand = &outcome.hands[0];
        assert_eq!(hand.hand_id, "RC1");
        assert_eq!(hand.hero_position, Position::SB);
        assert_eq!(hand.hero_hole_cards, "7c 2d");
        assert_eq!(hand.hero_actions.preflop, vec![ActionCode::Fold]);
        assert_eq!(hand.hero_profit, d("-0.02"));
        assert_eq!(hand.hand_result, HandResult::NoShowdownLoss);
        assert_eq!(hand.final_stage, Stage::Preflop);
        assert_eq!(hand.pot_amount, d("0.12"));
    }

    #[test]
    fn test_parse_hand_rejects_non_header_start() {
        let lines: Vec<&str> = FOLDED_PREFLOP.lines().collect();
        assert!(parser().parse_hand(&lines, 1).is_none());
    }

    #[test]
    fn test_parse_hand_next_index_is_next_header() {
        let text = format!("{FOLDED_PREFLOP}\n{}", FOLDED_PREFLOP.replace("#RC1:", "#RC2:"));
        let lines: Vec<&str> = text.lines().collect();
        let first = parser().parse_hand(&lines, 0).unwrap();
        assert!(lines[first.next_index].starts_with("Poker Hand #RC2"));
        let second = parser().parse_hand(&lines, first.next_index).unwrap();
        assert_eq!(second.next_index, lines.len());
    }

    #[test]
    fn test_leading_noise_is_skipped() {
        let text = format!("garbage line\n\n{FOLDED_PREFLOP}");
        let outcome = parser().parse_text(&text);
        assert_eq!(outcome.hands.len(), 1);
    }

    #[test]
    fn test_byte_order_mark_does_not_hide_first_hand() {
        let text = format!("\u{feff}{FOLDED_PREFLOP}");
        let outcome = parser().parse_text(&text);
        assert_eq!(outcome.hands.len(), 1);
        assert_eq!(outcome.hands[0].hand_id, "RC1");
    }

    #[test]
    fn test_truncated_hand_discarded_by_default() {
        let truncated: String = FOLDED_PREFLOP
            .lines()
            .take_while(|l| !l.starts_with("*** SUMMARY"))
            .map(|l| format!("{l}\n"))
            .collect();
        let outcome = parser().parse_text(&truncated);
        assert!(outcome.hands.is_empty());
        assert_eq!(
            outcome.discarded,
            vec![ParseError::MissingSummary {
                hand_id: "RC1".to_string(),
                line: 1
            }]
        );
    }

    #[test]
    fn test_truncated_hand_kept_when_configured() {
        let truncated: String = FOLDED_PREFLOP
            .lines()
            .take_while(|l| !l.starts_with("*** SUMMARY"))
            .map(|l| format!("{l}\n"))
            .collect();
        let parser = HandParser::new(
            HandFormat::new("Hero").unwrap(),
            ParserOptions {
                keep_incomplete: true,
                ..ParserOptions::default()
            },
        );
        let outcome = parser.parse_text(&truncated);
        assert_eq!(outcome.hands.len(), 1);
        assert_eq!(outcome.hands[0].hero_profit, d("-0.02"));
    }
}
