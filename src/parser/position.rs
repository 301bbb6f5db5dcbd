//! Seat-position resolution relative to the button.

use crate::domain::Position;

pub const SIX_MAX: u32 = 6;

/// Position of `hero_seat` on a table whose button sits at `button_seat`.
///
/// `relative = (hero - button) mod table_size` indexes
/// `[BTN, SB, BB, UTG, HJ, CO]`. Total for any seat numbers.
pub fn resolve_position(hero_seat: i64, button_seat: i64, table_size: u32) -> Position {
    if table_size == 0 {
        return Position::BTN;
    }
    let relative = (hero_seat - button_seat).rem_euclid(i64::from(table_size)) as usize;
    Position::ROTATION[relative % Position::ROTATION.len()]
}

/// Like [`resolve_position`], falling back to BTN when either seat is unknown.
pub fn resolve_or_button(
    hero_seat: Option<u32>,
    button_seat: Option<u32>,
    table_size: u32,
) -> Position {
    match (hero_seat, button_seat) {
        (Some(hero), Some(button)) => {
            resolve_position(i64::from(hero), i64::from(button), table_size)
        }
        _ => Position::BTN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_from_button_three() {
        assert_eq!(resolve_position(3, 3, SIX_MAX), Position::BTN);
        assert_eq!(resolve_position(4, 3, SIX_MAX), Position::SB);
        assert_eq!(resolve_position(5, 3, SIX_MAX), Position::BB);
        assert_eq!(resolve_position(6, 3, SIX_MAX), Position::UTG);
        assert_eq!(resolve_position(1, 3, SIX_MAX), Position::HJ);
        assert_eq!(resolve_position(2, 3, SIX_MAX), Position::CO);
    }

    #[test]
    fn test_every_seat_gets_a_distinct_position() {
        for button in 1..=6 {
            let mut seen: Vec<Position> = (1..=6)
                .map(|hero| resolve_position(hero, button, SIX_MAX))
                .collect();
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), 6, "button {}", button);
        }
    }

    #[test]
    fn test_out_of_range_seats_reduce_mod_table_size() {
        assert_eq!(resolve_position(9, 3, SIX_MAX), Position::BTN);
        assert_eq!(resolve_position(-2, 3, SIX_MAX), Position::SB);
    }

    #[test]
    fn test_missing_seat_defaults_to_button() {
        assert_eq!(resolve_or_button(None, Some(3), SIX_MAX), Position::BTN);
        assert_eq!(resolve_or_button(Some(4), None, SIX_MAX), Position::BTN);
        assert_eq!(resolve_or_button(Some(4), Some(3), SIX_MAX), Position::SB);
    }
}
