//! Site format definition: compiled patterns and markers for one export format.
//!
//! Built once at startup and shared by reference, so tests can swap in a
//! format with a different hero name without touching globals.

use regex::Regex;

const AMOUNT: &str = r"\$?([\d,]+(?:\.\d+)?)";

/// Compiled patterns for the GG-style `Poker Hand #...` export.
#[derive(Debug, Clone)]
pub struct HandFormat {
    pub hero_name: String,
    pub header: Regex,
    pub button: Regex,
    pub table_name: Regex,
    pub hero_seat: Regex,
    pub hero_action: Regex,
    pub hole_cards: Regex,
    pub raise_to: Regex,
    pub wager: Regex,
    pub post: Regex,
    pub uncalled: Regex,
    pub total_pot: Regex,
    pub rake: Regex,
    pub jackpot: Regex,
    pub hero_summary_seat: Regex,
    pub result_amount: Regex,
    pub rush_table_marker: String,
    pub rush_id_prefix: String,
}

impl HandFormat {
    /// Build the format for the given hero screen name.
    pub fn new(hero_name: &str) -> Result<Self, regex::Error> {
        let hero = regex::escape(hero_name);
        Ok(Self {
            hero_name: hero_name.to_string(),
            header: Regex::new(
                r"^Poker Hand #(\S*): Hold'em No Limit \(\$?([\d.,]+)/\$?([\d.,]+)\) - (\d{4}/\d{2}/\d{2} \d{1,2}:\d{2}:\d{2})",
            )?,
            button: Regex::new(r"Seat #(\d+) is the button")?,
            table_name: Regex::new(r"^Table '([^']*)'")?,
            hero_seat: Regex::new(&format!(r"^Seat (\d+): {hero} \("))?,
            hero_action: Regex::new(&format!(r"^{hero}: (.+)$"))?,
            hole_cards: Regex::new(&format!(r"^Dealt to {hero} \[([^\]]+)\]"))?,
            raise_to: Regex::new(&format!(r"raises {AMOUNT} to {AMOUNT}"))?,
            wager: Regex::new(&format!(r"(?:calls|bets) {AMOUNT}"))?,
            post: Regex::new(&format!(r"posts (?:[a-z ]+ )?{AMOUNT}"))?,
            uncalled: Regex::new(&format!(
                r"^Uncalled bet \({AMOUNT}\) returned to {hero}$"
            ))?,
            total_pot: Regex::new(&format!(r"Total pot {AMOUNT}"))?,
            rake: Regex::new(&format!(r"Rake {AMOUNT}"))?,
            jackpot: Regex::new(&format!(r"Jackpot {AMOUNT}"))?,
            hero_summary_seat: Regex::new(&format!(r"^Seat \d+: {hero} "))?,
            result_amount: Regex::new(&format!(r"(?:won|collected) \({AMOUNT}\)"))?,
            rush_table_marker: "RushAndCash".to_string(),
            rush_id_prefix: "RC".to_string(),
        })
    }

    pub fn is_header(&self, line: &str) -> bool {
        self.header.is_match(line)
    }

    /// True for summary lines that describe hero's own seat.
    pub fn is_hero_summary_seat(&self, line: &str, hero_seat: Option<u32>) -> bool {
        match hero_seat {
            Some(seat) => super::text::seat_number(line) == Some(seat),
            None => self.hero_summary_seat.is_match(line),
        }
    }
}
