//! Wire format shared with the decision process.
//!
//! Outbound: `[sensor(cell,normal),sensor(temp,equal),...].`
//! Inbound: `[turnR,fwd,put-out].` (trailing period and whitespace optional).

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::modules::action::Action;
use crate::modules::sensor::SensorReadings;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DecodeMode {
    /// Tolerate missing brackets and keep unknown tokens as no-op actions.
    #[default]
    Permissive,
    /// Reject anything outside the grammar.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("action list must be enclosed in brackets: {0:?}")]
    MissingBrackets(String),
    #[error("unknown action token {token:?} at position {position}")]
    UnknownToken { token: String, position: usize },
}

pub fn encode_sensors(readings: &SensorReadings) -> String {
    let terms: Vec<String> = readings
        .pairs()
        .iter()
        .map(|(name, value)| format!("sensor({},{})", name, value))
        .collect();
    format!("[{}].", terms.join(","))
}

pub fn decode_actions(message: &str, mode: DecodeMode) -> Result<Vec<Action>, DecodeError> {
    let body = message.trim_end_matches(|c: char| c == '.' || c.is_whitespace());
    let body = body.trim_start();

    let inner = match body.strip_prefix('[').and_then(|b| b.strip_suffix(']')) {
        Some(inner) => inner,
        None => match mode {
            DecodeMode::Strict => return Err(DecodeError::MissingBrackets(body.to_string())),
            DecodeMode::Permissive => body.trim_start_matches('[').trim_end_matches(']'),
        },
    };

    let mut actions = Vec::new();
    for (position, raw) in inner.split(',').map(str::trim).enumerate() {
        if raw.is_empty() {
            continue;
        }
        match raw.parse::<Action>() {
            Ok(action) => actions.push(action),
            Err(()) => match mode {
                DecodeMode::Strict => {
                    return Err(DecodeError::UnknownToken {
                        token: raw.to_string(),
                        position,
                    });
                }
                DecodeMode::Permissive => actions.push(Action::Unknown(raw.to_string())),
            },
        }
    }
    Ok(actions)
}
