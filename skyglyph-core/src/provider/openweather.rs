use anyhow::{Context, Result, ensure};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::{fmt, time::Duration};
use tracing::{debug, instrument, warn};

use crate::{
    config::{Config, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS},
    error::WeatherError,
    model::{Query, WeatherResult},
};

use super::WeatherProvider;

const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

/// Status OpenWeather embeds in a successful body.
const ENVELOPE_OK: i64 = 200;

/// Current weather by city name from OpenWeather. Temperatures come back in
/// Kelvin (no `units` parameter is sent).
#[derive(Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl fmt::Debug for OpenWeatherProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenWeatherProvider")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_options(api_key, DEFAULT_BASE_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_options(api_key: String, base_url: &str, timeout: Duration) -> Result<Self> {
        ensure!(!timeout.is_zero(), "Request timeout must be greater than zero");

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.api_key()?;
        Self::with_options(api_key.to_owned(), &config.base_url, config.timeout())
    }

    /// Full request URL, with the city form-encoded and the key attached.
    pub fn request_url(&self, query: &Query) -> Result<Url, WeatherError> {
        Url::parse_with_params(
            &format!("{}{CURRENT_WEATHER_PATH}", self.base_url),
            &[("q", query.city()), ("appid", self.api_key.as_str())],
        )
        .map_err(|e| WeatherError::request(format!("invalid request URL: {e}")))
    }

    #[instrument(skip(self), fields(city = %query.city()))]
    async fn fetch_current(&self, query: &Query) -> Result<WeatherResult, WeatherError> {
        let url = self.request_url(query)?;
        debug!(base_url = %self.base_url, "Requesting current weather");

        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(WeatherError::from_transport)?;

        let status = res.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(WeatherError::from_status(status));
        }

        let body = res.text().await.map_err(WeatherError::from_transport)?;
        debug!(%status, bytes = body.len(), "Received response");

        parse_current(&body)
            .inspect_err(|_| debug!(body = %truncate_body(&body), "Unusable body"))
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch(&self, city: &str) -> Result<WeatherResult, WeatherError> {
        let query = Query::new(city)?;

        self.fetch_current(&query)
            .await
            .inspect_err(|e| warn!(kind = ?e.kind(), city = %query.city(), "{e}"))
    }
}

/// `cod` shows up as a number on success and as a string on some errors.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OwCode {
    Number(i64),
    Text(String),
}

impl OwCode {
    fn as_i64(&self) -> Option<i64> {
        match self {
            OwCode::Number(n) => Some(*n),
            OwCode::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: i64,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    cod: Option<OwCode>,
    main: Option<OwMain>,
    #[serde(default)]
    weather: Vec<OwWeather>,
    name: Option<String>,
    dt: Option<i64>,
}

/// Interpret a 2xx body. Anything short of a complete envelope is an error.
fn parse_current(body: &str) -> Result<WeatherResult, WeatherError> {
    let parsed: OwCurrentResponse =
        serde_json::from_str(body).map_err(WeatherError::unexpected_response)?;

    let code = parsed
        .cod
        .as_ref()
        .ok_or_else(|| WeatherError::unexpected_response("missing status code"))?
        .as_i64()
        .ok_or_else(|| WeatherError::unexpected_response("non-numeric status code"))?;

    if code != ENVELOPE_OK {
        return Err(WeatherError::unexpected_response(format!(
            "provider reported status {code}"
        )));
    }

    let main = parsed
        .main
        .ok_or_else(|| WeatherError::unexpected_response("missing temperature"))?;

    let condition = parsed
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::unexpected_response("missing weather condition"))?;

    let location = parsed.name.filter(|n| !n.is_empty());
    let observed_at = parsed.dt.and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0));

    Ok(WeatherResult::from_kelvin(main.temp, condition.id, condition.description)
        .with_location(location)
        .with_observed_at(observed_at))
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{condition::ConditionCategory, error::ErrorKind};

    fn provider() -> OpenWeatherProvider {
        OpenWeatherProvider::new("KEY".into()).expect("provider")
    }

    #[test]
    fn request_url_encodes_city_and_key() {
        let query = Query::new("São Paulo").expect("query");
        let url = provider().request_url(&query).expect("url");

        assert_eq!(url.path(), "/data/2.5/weather");
        assert!(url.as_str().starts_with("https://api.openweathermap.org/"));
        assert!(url.as_str().contains("q=S%C3%A3o+Paulo"), "{url}");

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![("q".into(), "São Paulo".into()), ("appid".into(), "KEY".into())]
        );
    }

    #[test]
    fn request_url_keeps_reserved_characters_in_the_city() {
        let query = Query::new("a&b=c").expect("query");
        let url = provider().request_url(&query).expect("url");

        let city = url
            .query_pairs()
            .find(|(k, _)| k == "q")
            .map(|(_, v)| v.into_owned());
        assert_eq!(city.as_deref(), Some("a&b=c"));
    }

    #[test]
    fn base_url_trailing_slash_is_ignored() {
        let p = OpenWeatherProvider::with_options(
            "K".into(),
            "http://localhost:9/",
            Duration::from_secs(1),
        )
        .expect("provider");
        let url = p.request_url(&Query::new("x").expect("query")).expect("url");
        assert!(url.as_str().starts_with("http://localhost:9/data/2.5/weather?"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = OpenWeatherProvider::with_options("K".into(), DEFAULT_BASE_URL, Duration::ZERO)
            .unwrap_err();
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn from_config_requires_api_key() {
        assert!(OpenWeatherProvider::from_config(&Config::default()).is_err());
    }

    #[test]
    fn parse_clear_sky() {
        let body = r#"{
            "cod": 200,
            "main": {"temp": 300.15},
            "weather": [{"id": 800, "description": "clear sky"}]
        }"#;
        let result = parse_current(body).expect("result");

        assert_eq!(result.temperature_celsius().round(), 27.0);
        assert_eq!(result.glyph(), "☀️");
        assert_eq!(result.description(), "clear sky");
        assert_eq!(result.condition_code(), 800);
        assert_eq!(result.category(), Some(ConditionCategory::Clear));
    }

    #[test]
    fn parse_accepts_string_status_and_extras() {
        let body = r#"{
            "cod": "200",
            "name": "London",
            "dt": 1700000000,
            "main": {"temp": 283.15, "humidity": 81},
            "weather": [
                {"id": 501, "main": "Rain", "description": "moderate rain", "icon": "10d"},
                {"id": 701, "main": "Mist", "description": "mist", "icon": "50d"}
            ]
        }"#;
        let result = parse_current(body).expect("result");

        assert_eq!(result.category(), Some(ConditionCategory::Rain));
        assert_eq!(result.description(), "moderate rain");
        assert_eq!(result.location(), Some("London"));
        assert_eq!(result.observed_at().map(|t| t.timestamp()), Some(1_700_000_000));
        assert_eq!(result.display_temperature(), "10°C");
    }

    #[test]
    fn parse_rejects_mismatched_envelope_status() {
        let body = r#"{"cod":"404","message":"city not found"}"#;
        let err = parse_current(body).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::OtherRequest);
        assert!(err.message().contains("404"), "{}", err.message());
    }

    #[test]
    fn parse_rejects_incomplete_bodies() {
        let bodies = [
            r#"{"main":{"temp":280.0},"weather":[{"id":800,"description":"clear sky"}]}"#,
            r#"{"cod":200,"weather":[{"id":800,"description":"clear sky"}]}"#,
            r#"{"cod":200,"main":{"temp":280.0}}"#,
            r#"{"cod":200,"main":{"temp":280.0},"weather":[]}"#,
            r#"{"cod":200,"main":{},"weather":[{"id":800,"description":"clear sky"}]}"#,
            r#"{"cod":"abc","main":{"temp":280.0},"weather":[{"id":800,"description":"x"}]}"#,
            "<html>oops</html>",
            "",
        ];

        for body in bodies {
            let err = parse_current(body).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::OtherRequest, "body {body}");
            assert!(err.message().contains("Unexpected response"), "{}", err.message());
        }
    }

    #[test]
    fn status_errors_say_whether_cod_was_missing_or_malformed() {
        let missing = r#"{"main":{"temp":280.0},"weather":[{"id":800,"description":"x"}]}"#;
        let err = parse_current(missing).unwrap_err();
        assert!(err.message().contains("missing status code"), "{}", err.message());

        let malformed =
            r#"{"cod":"abc","main":{"temp":280.0},"weather":[{"id":800,"description":"x"}]}"#;
        let err = parse_current(malformed).unwrap_err();
        assert!(err.message().contains("non-numeric status code"), "{}", err.message());
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        assert_eq!(truncate_body(&long).chars().count(), 200);
        assert_eq!(truncate_body("short"), "short");
    }
}
