use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    condition::{self, ConditionCategory},
    error::{ErrorKind, WeatherError},
};

/// Offset between the Kelvin and Celsius scales.
pub const KELVIN_OFFSET: f64 = 273.15;

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

/// A city lookup. The provider resolves the name; we only reject blank input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    city: String,
}

impl Query {
    pub fn new(city: &str) -> Result<Self, WeatherError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::new(ErrorKind::BadRequest));
        }

        Ok(Self {
            city: city.to_string(),
        })
    }

    pub fn city(&self) -> &str {
        &self.city
    }
}

/// Current weather for a city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherResult {
    temperature_celsius: f64,
    condition_code: i64,
    description: String,
    glyph: &'static str,
    category: Option<ConditionCategory>,
    location: Option<String>,
    observed_at: Option<DateTime<Utc>>,
}

impl WeatherResult {
    /// Build a result from a Kelvin reading and a condition code.
    pub fn from_kelvin(kelvin: f64, condition_code: i64, description: impl Into<String>) -> Self {
        let category = condition::classify(condition_code);

        Self {
            temperature_celsius: kelvin_to_celsius(kelvin),
            condition_code,
            description: description.into(),
            glyph: category.map(|c| c.glyph()).unwrap_or(""),
            category,
            location: None,
            observed_at: None,
        }
    }

    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = location;
        self
    }

    pub fn with_observed_at(mut self, observed_at: Option<DateTime<Utc>>) -> Self {
        self.observed_at = observed_at;
        self
    }

    pub fn temperature_celsius(&self) -> f64 {
        self.temperature_celsius
    }

    /// Temperature rounded to whole degrees, e.g. `27°C`.
    pub fn display_temperature(&self) -> String {
        format!("{:.0}°C", self.temperature_celsius)
    }

    pub fn condition_code(&self) -> i64 {
        self.condition_code
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn glyph(&self) -> &'static str {
        self.glyph
    }

    pub fn category(&self) -> Option<ConditionCategory> {
        self.category
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        self.observed_at
    }
}
