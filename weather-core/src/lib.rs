//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client and its error taxonomy
//! - Shared domain models (samples, forecast bundles)
//! - Daily outlook aggregation and rendering helpers
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod forecast;
pub mod model;
pub mod presentation;
pub mod provider;
pub mod search;

pub use config::Config;
pub use error::WeatherError;
pub use forecast::{NOON_WINDOW, OUTLOOK_DAYS, daily_outlook, daily_outlook_local};
pub use model::{ConditionCategory, ForecastBundle, WeatherSample};
pub use presentation::{
    DateStyle, GradientTag, format_timestamp, gradient_category_for, is_night_sample,
};
pub use provider::{
    WeatherProvider,
    openweather::{ClientConfig, OpenWeatherClient},
    provider_from_config,
};
pub use search::{SearchOutcome, SearchReport, WeatherSearch};
