//! Core library for the `skyglyph` weather client.
//!
//! This crate defines:
//! - The OpenWeather fetcher and the [`WeatherProvider`] seam front ends call into
//! - Condition-code classification into display glyphs
//! - The typed error taxonomy every failed fetch ends up in
//! - Configuration & credentials handling
//!
//! It is used by `skyglyph-cli`, but a GUI can drive it the same way through
//! [`FetchSession`] and [`Rendering`].

pub mod condition;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod render;
pub mod session;

pub use condition::ConditionCategory;
pub use config::Config;
pub use error::{ErrorKind, WeatherError};
pub use model::{Query, WeatherResult};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use render::Rendering;
pub use session::{FetchOutcome, FetchSession};
