//! Writing a fetch outcome for the user.
//!
//! Weather goes to `out`, errors go to `err`, in text or JSON form.

use std::io::Write;

use skyglyph_core::{Rendering, WeatherError, WeatherResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

impl Format {
    pub fn from_json_flag(json: bool) -> Self {
        if json { Format::Json } else { Format::Text }
    }
}

/// Write `outcome` and return whether it was a success.
pub fn report(
    outcome: &Result<WeatherResult, WeatherError>,
    format: Format,
    out: &mut impl Write,
    err: &mut impl Write,
) -> anyhow::Result<bool> {
    match (format, outcome) {
        (Format::Text, _) => {
            let rendering = Rendering::from_outcome(outcome);
            let target: &mut dyn Write = if rendering.is_error() { err } else { out };
            writeln!(target, "{rendering}")?;
        }
        (Format::Json, Ok(result)) => {
            writeln!(out, "{}", serde_json::to_string_pretty(result)?)?;
        }
        (Format::Json, Err(error)) => {
            let value = serde_json::json!({ "error": error });
            writeln!(err, "{}", serde_json::to_string_pretty(&value)?)?;
        }
    }

    Ok(outcome.is_ok())
}
