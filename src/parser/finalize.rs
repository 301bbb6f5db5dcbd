//! Post-scan reconciliation of raw accumulators into a HandRecord.

use super::position::resolve_or_button;
use super::state::PartialHand;
use crate::domain::{Decimal, HandRecord, HandResult, Stage};

/// Seat information needed to place hero at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seating {
    pub hero_seat: Option<u32>,
    pub button_seat: Option<u32>,
    pub table_size: u32,
}

/// Derive profit, result, final stage and position; round all money to 2dp.
///
/// Profit is `collected - invested` when hero collected anything, else
/// `-invested`. The win/loss side of the result follows the sign of that
/// profit, so a chopped pot smaller than hero's stake is a loss.
pub fn finalize(partial: PartialHand, seating: Seating) -> HandRecord {
    let investment = {
        let mut inv = partial.investment;
        inv.preflop = inv.preflop.round2();
        inv.flop = inv.flop.round2();
        inv.turn = inv.turn.round2();
        inv.river = inv.river.round2();
        inv
    };
    let total_investment = investment.total().round2();
    let collected = partial.collected.round2();

    let hero_profit = if collected.is_positive() {
        (collected - total_investment).round2()
    } else {
        (-total_investment).round2()
    };

    let hero_rake = if collected.is_positive() {
        partial.rake.round2()
    } else {
        Decimal::zero()
    };

    let hand_result = HandResult::classify(partial.showed, hero_profit.is_positive());

    let final_stage = if hand_result.is_showdown() {
        Stage::Showdown
    } else if !partial.river_card.is_empty() {
        Stage::River
    } else if !partial.turn_card.is_empty() {
        Stage::Turn
    } else if !partial.flop_cards.is_empty() {
        Stage::Flop
    } else {
        Stage::Preflop
    };

    let hero_position =
        resolve_or_button(seating.hero_seat, seating.button_seat, seating.table_size);

    HandRecord {
        hand_id: partial.hand_id,
        start_time: partial.start_time,
        game_type: partial.game_type,
        small_blind: partial.small_blind.round2(),
        big_blind: partial.big_blind.round2(),
        hero_position,
        hero_hole_cards: partial.hole_cards,
        flop_cards: partial.flop_cards,
        turn_card: partial.turn_card,
        river_card: partial.river_card,
        hero_investment: investment,
        hero_actions: partial.actions,
        pot_amount: partial.pot.round2(),
        jackpot_amount: partial.jackpot.round2(),
        hero_profit,
        hero_rake,
        hand_result,
        final_stage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Position;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn partial() -> PartialHand {
        PartialHand::new(
            "RC1".to_string(),
            "2024/01/15 20:11:32".to_string(),
            d("0.02"),
            d("0.05"),
        )
    }

    fn seating() -> Seating {
        Seating {
            hero_seat: Some(4),
            button_seat: Some(3),
            table_size: 6,
        }
    }

    #[test]
    fn test_profit_when_collected() {
        let mut hand = partial();
        hand.investment.preflop = d("0.50");
        hand.investment.flop = d("1.50");
        hand.collected = d("5.00");
        hand.showed = true;
        hand.rake = d("0.25");

        let record = finalize(hand, seating());
        assert_eq!(record.hero_profit, d("3.00"));
        assert_eq!(record.hand_result, HandResult::ShowdownWin);
        assert_eq!(record.final_stage, Stage::Showdown);
        assert_eq!(record.hero_rake, d("0.25"));
        assert_eq!(record.hero_position, Position::SB);
    }

    #[test]
    fn test_profit_when_nothing_collected() {
        let mut hand = partial();
        hand.investment.preflop = d("0.50");
        hand.investment.flop = d("1.00");
        hand.rake = d("0.25");
        hand.flop_cards = "2c 7d Jh".to_string();

        let record = finalize(hand, seating());
        assert_eq!(record.hero_profit, d("-1.50"));
        assert_eq!(record.hand_result, HandResult::NoShowdownLoss);
        assert_eq!(record.final_stage, Stage::Flop);
        assert_eq!(record.hero_rake, Decimal::zero());
    }

    #[test]
    fn test_chopped_pot_below_stake_is_a_loss() {
        let mut hand = partial();
        hand.investment.preflop = d("2.00");
        hand.collected = d("1.90");
        hand.showed = true;

        let record = finalize(hand, seating());
        assert_eq!(record.hero_profit, d("-0.10"));
        assert_eq!(record.hand_result, HandResult::ShowdownLoss);
        assert_eq!(record.final_stage, Stage::Showdown);
    }

    #[test]
    fn test_final_stage_follows_deepest_card() {
        let mut hand = partial();
        hand.flop_cards = "2c 7d Jh".to_string();
        hand.turn_card = "5s".to_string();
        assert_eq!(finalize(hand.clone(), seating()).final_stage, Stage::Turn);

        hand.river_card = "9c".to_string();
        assert_eq!(finalize(hand, seating()).final_stage, Stage::River);
    }

    #[test]
    fn test_unknown_seats_default_to_button() {
        let record = finalize(
            partial(),
            Seating {
                hero_seat: None,
                button_seat: Some(1),
                table_size: 6,
            },
        );
        assert_eq!(record.hero_position, Position::BTN);
    }

    #[test]
    fn test_showdown_iff_showdown_result() {
        for showed in [true, false] {
            for collected in ["0", "3"] {
                let mut hand = partial();
                hand.investment.preflop = d("1");
                hand.showed = showed;
                hand.collected = d(collected);
                let record = finalize(hand, seating());
                assert_eq!(
                    record.final_stage == Stage::Showdown,
                    record.hand_result.is_showdown()
                );
                assert_eq!(record.hand_result.is_win(), record.hero_profit.is_positive());
            }
        }
    }
}
