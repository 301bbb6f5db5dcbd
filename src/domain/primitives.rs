//! Domain primitives: Position, Street, Stage, ActionCode, HandResult, GameType.
//!
//! Each enum has a stable lowercase storage form (`as_str`) and a matching
//! `FromStr` so database rows decode back into closed variants.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

macro_rules! storage_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(UnknownVariant::new($kind, other)),
                }
            }
        }
    };
}

/// Six-max seat position label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Position {
    UTG,
    HJ,
    CO,
    BTN,
    SB,
    BB,
}

storage_enum!(Position, "position", {
    UTG => "UTG",
    HJ => "HJ",
    CO => "CO",
    BTN => "BTN",
    SB => "SB",
    BB => "BB",
});

impl Position {
    /// Reporting order.
    pub const ALL: [Position; 6] = [
        Position::UTG,
        Position::HJ,
        Position::CO,
        Position::BTN,
        Position::SB,
        Position::BB,
    ];

    /// Seat order clockwise from the button.
    pub const ROTATION: [Position; 6] = [
        Position::BTN,
        Position::SB,
        Position::BB,
        Position::UTG,
        Position::HJ,
        Position::CO,
    ];
}

/// Betting street (where actions and investments are recorded).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
}

storage_enum!(Street, "street", {
    Preflop => "preflop",
    Flop => "flop",
    Turn => "turn",
    River => "river",
});

impl Street {
    pub const ALL: [Street; 4] = [Street::Preflop, Street::Flop, Street::Turn, Street::River];

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// The stage a hand is in while this street is being played.
    pub fn stage(&self) -> Stage {
        match self {
            Street::Preflop => Stage::Preflop,
            Street::Flop => Stage::Flop,
            Street::Turn => Stage::Turn,
            Street::River => Stage::River,
        }
    }
}

/// Last stage a hand reached. Showdown is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

storage_enum!(Stage, "stage", {
    Preflop => "preflop",
    Flop => "flop",
    Turn => "turn",
    River => "river",
    Showdown => "showdown",
});

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Preflop,
        Stage::Flop,
        Stage::Turn,
        Stage::River,
        Stage::Showdown,
    ];

    /// Position in preflop < flop < turn < river < showdown.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// True if a hand ending at `self` saw `street` dealt.
    pub fn reached(&self, street: Street) -> bool {
        self.index() >= street.index()
    }
}

/// Hero action recorded on a street.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionCode {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
}

storage_enum!(ActionCode, "action", {
    Fold => "fold",
    Check => "check",
    Call => "call",
    Bet => "bet",
    Raise => "raise",
});

impl ActionCode {
    pub const ALL: [ActionCode; 5] = [
        ActionCode::Fold,
        ActionCode::Check,
        ActionCode::Call,
        ActionCode::Bet,
        ActionCode::Raise,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandResult {
    ShowdownWin,
    ShowdownLoss,
    NoShowdownWin,
    NoShowdownLoss,
}

storage_enum!(HandResult, "hand result", {
    ShowdownWin => "showdown_win",
    ShowdownLoss => "showdown_loss",
    NoShowdownWin => "no_showdown_win",
    NoShowdownLoss => "no_showdown_loss",
});

impl HandResult {
    pub fn classify(showdown: bool, won: bool) -> Self {
        match (showdown, won) {
            (true, true) => HandResult::ShowdownWin,
            (true, false) => HandResult::ShowdownLoss,
            (false, true) => HandResult::NoShowdownWin,
            (false, false) => HandResult::NoShowdownLoss,
        }
    }

    pub fn is_showdown(&self) -> bool {
        matches!(self, HandResult::ShowdownWin | HandResult::ShowdownLoss)
    }

    pub fn is_win(&self) -> bool {
        matches!(self, HandResult::ShowdownWin | HandResult::NoShowdownWin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameType {
    RushAndCash,
    CashGame,
}

storage_enum!(GameType, "game type", {
    RushAndCash => "rush_and_cash",
    CashGame => "cash_game",
});
