//! Row encoding/decoding for the `hands` table.

use crate::db::StoreError;
use crate::domain::{ActionCode, Decimal, HandRecord, PerStreet, Street};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::str::FromStr;

/// Column values of one `hands` row, in storage form.
pub(super) struct HandRow {
    pub hand_id: String,
    pub start_time: String,
    pub game_type: &'static str,
    pub small_blind: String,
    pub big_blind: String,
    pub hero_position: &'static str,
    pub hero_hole_cards: String,
    pub flop_cards: String,
    pub turn_card: String,
    pub river_card: String,
    /// preflop, flop, turn, river
    pub investments: [String; 4],
    pub actions: [String; 4],
    pub pot_amount: String,
    pub jackpot_amount: String,
    pub hero_profit: String,
    pub hero_rake: String,
    pub hand_result: &'static str,
    pub final_stage: &'static str,
}

impl HandRow {
    pub fn encode(hand: &HandRecord) -> Self {
        Self {
            hand_id: hand.hand_id.clone(),
            start_time: hand.start_time.clone(),
            game_type: hand.game_type.as_str(),
            small_blind: hand.small_blind.to_canonical_string(),
            big_blind: hand.big_blind.to_canonical_string(),
            hero_position: hand.hero_position.as_str(),
            hero_hole_cards: hand.hero_hole_cards.clone(),
            flop_cards: hand.flop_cards.clone(),
            turn_card: hand.turn_card.clone(),
            river_card: hand.river_card.clone(),
            investments: Street::ALL.map(|s| hand.hero_investment.get(s).to_canonical_string()),
            actions: Street::ALL.map(|s| encode_actions(hand.hero_actions.get(s))),
            pot_amount: hand.pot_amount.to_canonical_string(),
            jackpot_amount: hand.jackpot_amount.to_canonical_string(),
            hero_profit: hand.hero_profit.to_canonical_string(),
            hero_rake: hand.hero_rake.to_canonical_string(),
            hand_result: hand.hand_result.as_str(),
            final_stage: hand.final_stage.as_str(),
        }
    }
}

/// `[Bet, Call]` -> `"bet,call"`.
fn encode_actions(actions: &[ActionCode]) -> String {
    actions
        .iter()
        .map(|a| a.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

fn decode_actions(hand_id: &str, raw: &str) -> Result<Vec<ActionCode>, StoreError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| ActionCode::from_str(s).map_err(|_| corrupt(hand_id, "actions")))
        .collect()
}

fn corrupt(hand_id: &str, field: &'static str) -> StoreError {
    StoreError::Corrupt {
        hand_id: hand_id.to_string(),
        field,
    }
}

fn money(row: &SqliteRow, hand_id: &str, column: &'static str) -> Result<Decimal, StoreError> {
    let raw: String = row.try_get(column)?;
    Decimal::from_str(&raw).map_err(|_| corrupt(hand_id, column))
}

fn variant<T: FromStr>(
    row: &SqliteRow,
    hand_id: &str,
    column: &'static str,
) -> Result<T, StoreError> {
    let raw: String = row.try_get(column)?;
    T::from_str(&raw).map_err(|_| corrupt(hand_id, column))
}

pub(super) fn decode_hand(row: &SqliteRow) -> Result<HandRecord, StoreError> {
    let hand_id: String = row.try_get("hand_id")?;
    let id = hand_id.as_str();

    let mut investment = PerStreet::<Decimal>::default();
    let mut actions = PerStreet::<Vec<ActionCode>>::default();
    for (street, inv_col, act_col) in [
        (Street::Preflop, "preflop_investment", "preflop_actions"),
        (Street::Flop, "flop_investment", "flop_actions"),
        (Street::Turn, "turn_investment", "turn_actions"),
        (Street::River, "river_investment", "river_actions"),
    ] {
        *investment.get_mut(street) = money(row, id, inv_col)?;
        let raw: String = row.try_get(act_col)?;
        *actions.get_mut(street) = decode_actions(id, &raw)?;
    }

    Ok(HandRecord {
        start_time: row.try_get("start_time")?,
        game_type: variant(row, id, "game_type")?,
        small_blind: money(row, id, "small_blind")?,
        big_blind: money(row, id, "big_blind")?,
        hero_position: variant(row, id, "hero_position")?,
        hero_hole_cards: row.try_get("hero_hole_cards")?,
        flop_cards: row.try_get("flop_cards")?,
        turn_card: row.try_get("turn_card")?,
        river_card: row.try_get("river_card")?,
        hero_investment: investment,
        hero_actions: actions,
        pot_amount: money(row, id, "pot_amount")?,
        jackpot_amount: money(row, id, "jackpot_amount")?,
        hero_profit: money(row, id, "hero_profit")?,
        hero_rake: money(row, id, "hero_rake")?,
        hand_result: variant(row, id, "hand_result")?,
        final_stage: variant(row, id, "final_stage")?,
        hand_id,
    })
}
