//! What a front end should show for a fetch outcome.
//!
//! A success fills temperature, glyph and description; an error replaces all
//! of them with its message so no stale weather survives next to it.

use std::fmt;

use crate::{WeatherError, WeatherResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendering {
    Weather {
        temperature: String,
        glyph: &'static str,
        description: String,
    },
    Error {
        message: String,
    },
}

impl Rendering {
    pub fn from_outcome(outcome: &Result<WeatherResult, WeatherError>) -> Self {
        match outcome {
            Ok(result) => Self::weather(result),
            Err(err) => Self::error(err),
        }
    }

    pub fn weather(result: &WeatherResult) -> Self {
        Rendering::Weather {
            temperature: result.display_temperature(),
            glyph: result.glyph(),
            description: result.description().to_string(),
        }
    }

    pub fn error(err: &WeatherError) -> Self {
        Rendering::Error {
            message: err.message().to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Rendering::Error { .. })
    }
}

impl fmt::Display for Rendering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rendering::Weather { temperature, glyph, description } => {
                writeln!(f, "{temperature}")?;
                if !glyph.is_empty() {
                    writeln!(f, "{glyph}")?;
                }
                write!(f, "{description}")
            }
            Rendering::Error { message } => f.write_str(message),
        }
    }
}
