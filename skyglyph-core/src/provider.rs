use crate::{Config, WeatherError, WeatherResult, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Anything that can answer "what's the weather in this city right now".
///
/// Implementations must never panic past this boundary: every failure comes
/// back as a [`WeatherError`].
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch(&self, city: &str) -> Result<WeatherResult, WeatherError>;
}

/// Construct the provider described by `config`.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    Ok(Box::new(OpenWeatherProvider::from_config(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No API key configured"));
    }

    #[test]
    fn provider_from_config_works_when_configured() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        let provider = provider_from_config(&cfg);
        assert!(provider.is_ok());
    }

    #[test]
    fn provider_debug_hides_api_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("SECRET_KEY".to_string());

        let provider = provider_from_config(&cfg).expect("provider");
        assert!(!format!("{provider:?}").contains("SECRET_KEY"));
    }
}
