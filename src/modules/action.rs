use std::fmt;
use std::str::FromStr;

use crate::modules::agent::{ACTION_CYCLES, PUT_OUT_EXTRA_CYCLES};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Fwd,
    TurnL,
    TurnR,
    PutOut,
    End,
    /// A token outside the vocabulary, kept by permissive decoding.
    Unknown(String),
}

impl Action {
    pub fn token(&self) -> &str {
        match self {
            Action::Fwd => "fwd",
            Action::TurnL => "turnL",
            Action::TurnR => "turnR",
            Action::PutOut => "put-out",
            Action::End => "end",
            Action::Unknown(raw) => raw,
        }
    }

    /// Cycles this action drains from the battery. `end` is free.
    pub const fn cycle_cost(&self) -> u32 {
        match self {
            Action::End => 0,
            Action::PutOut => ACTION_CYCLES + PUT_OUT_EXTRA_CYCLES,
            _ => ACTION_CYCLES,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl FromStr for Action {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "fwd" => Ok(Action::Fwd),
            "turnL" => Ok(Action::TurnL),
            "turnR" => Ok(Action::TurnR),
            "put-out" => Ok(Action::PutOut),
            "end" => Ok(Action::End),
            _ => Err(()),
        }
    }
}
