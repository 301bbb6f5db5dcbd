//! Text primitives: amount parsing, bracket/card extraction, line classification.

use super::ParseError;
use crate::domain::Decimal;
use chrono::NaiveDateTime;
use regex::Regex;

/// Site timestamp layout. Stored start times always use the zero-padded form
/// so they order and compare as plain strings.
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Parse a money amount such as `$1,234.50`, `0.05` or `$3` to 2dp.
pub fn parse_amount(raw: &str) -> Result<Decimal, ParseError> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    if cleaned.is_empty() {
        return Err(ParseError::InvalidAmount(raw.to_string()));
    }
    Decimal::from_str_canonical(&cleaned)
        .map(|d| d.round2())
        .map_err(|_| ParseError::InvalidAmount(raw.to_string()))
}

/// First capture group of `re` in `line`, parsed as an amount.
///
/// `None` when the pattern does not match; `Some(Err)` when it matches but
/// the captured text is not a number.
pub fn capture_amount(re: &Regex, line: &str) -> Option<Result<Decimal, ParseError>> {
    re.captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| parse_amount(m.as_str()))
}

/// Zero-pad a header timestamp (`2024/01/15 9:05:00` -> `2024/01/15 09:05:00`).
///
/// Unparseable input is returned unchanged.
pub fn normalize_timestamp(raw: &str) -> String {
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT)
        .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Contents of every `[...]` group on the line, in order.
pub fn bracket_groups(line: &str) -> Vec<&str> {
    let mut groups = Vec::new();
    let mut rest = line;
    while let Some(open) = rest.find('[') {
        let after = &rest[open + 1..];
        match after.find(']') {
            Some(close) => {
                groups.push(after[..close].trim());
                rest = &after[close + 1..];
            }
            None => break,
        }
    }
    groups
}

/// Whitespace-separated cards of one bracket group.
pub fn cards(group: &str) -> Vec<&str> {
    group.split_whitespace().collect()
}

/// The card introduced by a turn/river line.
///
/// Handles both `[a b c] [d]` (new card in its own group) and `[a b c d]`
/// (all cards so far in one group, new card at `combined_index`).
pub fn street_card(line: &str, combined_index: usize) -> String {
    let groups = bracket_groups(line);
    if let Some(new_card) = groups.get(1) {
        return new_card.to_string();
    }
    groups
        .first()
        .and_then(|g| cards(g).get(combined_index).map(|c| c.to_string()))
        .unwrap_or_default()
}

/// `*** NAME ***` section marker name, if the line is one.
pub fn section_marker(line: &str) -> Option<&str> {
    let rest = line.trim().strip_prefix("***")?;
    let end = rest.find("***")?;
    Some(rest[..end].trim())
}

/// Seat number from a `Seat N: ...` line.
pub fn seat_number(line: &str) -> Option<u32> {
    let rest = line.trim_start().strip_prefix("Seat ")?;
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if !rest[digits.len()..].starts_with(':') {
        return None;
    }
    digits.parse().ok()
}
