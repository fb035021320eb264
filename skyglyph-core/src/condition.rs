//! Mapping from OpenWeather condition codes to display categories.
//!
//! Code table: <https://openweathermap.org/weather-conditions>

use serde::Serialize;

/// Display category for a group of condition codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionCategory {
    Thunderstorm,
    Drizzle,
    Rain,
    Snow,
    /// Mist, smoke, haze, dust and fog (701-741).
    Atmosphere,
    VolcanicAsh,
    Squall,
    Tornado,
    Clear,
    Clouds,
}

impl ConditionCategory {
    pub fn glyph(&self) -> &'static str {
        match self {
            ConditionCategory::Thunderstorm => "⛈️",
            ConditionCategory::Drizzle => "⛅",
            ConditionCategory::Rain => "🌧️",
            ConditionCategory::Snow => "🌨️",
            ConditionCategory::Atmosphere => "🌫️",
            ConditionCategory::VolcanicAsh => "🌋",
            ConditionCategory::Squall => "💨",
            ConditionCategory::Tornado => "🌪️",
            ConditionCategory::Clear => "☀️",
            ConditionCategory::Clouds => "☁️",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionCategory::Thunderstorm => "thunderstorm",
            ConditionCategory::Drizzle => "drizzle",
            ConditionCategory::Rain => "rain",
            ConditionCategory::Snow => "snow",
            ConditionCategory::Atmosphere => "atmosphere",
            ConditionCategory::VolcanicAsh => "volcanic ash",
            ConditionCategory::Squall => "squall",
            ConditionCategory::Tornado => "tornado",
            ConditionCategory::Clear => "clear sky",
            ConditionCategory::Clouds => "clouds",
        }
    }

    pub const fn all() -> &'static [ConditionCategory] {
        &[
            ConditionCategory::Thunderstorm,
            ConditionCategory::Drizzle,
            ConditionCategory::Rain,
            ConditionCategory::Snow,
            ConditionCategory::Atmosphere,
            ConditionCategory::VolcanicAsh,
            ConditionCategory::Squall,
            ConditionCategory::Tornado,
            ConditionCategory::Clear,
            ConditionCategory::Clouds,
        ]
    }
}

impl std::fmt::Display for ConditionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a condition code. Total over all integers; unknown codes give `None`.
pub const fn classify(code: i64) -> Option<ConditionCategory> {
    match code {
        200..=232 => Some(ConditionCategory::Thunderstorm),
        300..=321 => Some(ConditionCategory::Drizzle),
        500..=531 => Some(ConditionCategory::Rain),
        600..=622 => Some(ConditionCategory::Snow),
        701..=741 => Some(ConditionCategory::Atmosphere),
        762 => Some(ConditionCategory::VolcanicAsh),
        771 => Some(ConditionCategory::Squall),
        781 => Some(ConditionCategory::Tornado),
        800 => Some(ConditionCategory::Clear),
        801..=804 => Some(ConditionCategory::Clouds),
        _ => None,
    }
}

/// Glyph for a condition code, or an empty string when the code is unknown.
pub fn glyph(code: i64) -> &'static str {
    classify(code).map(|c| c.glyph()).unwrap_or("")
}
