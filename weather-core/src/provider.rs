use crate::{
    Config, ForecastBundle, WeatherError, WeatherSample,
    provider::openweather::OpenWeatherClient,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of current conditions and forecasts for a city name.
///
/// City strings are passed through as given; the provider does its own
/// fuzzy matching and the returned records carry its resolved name.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_current(&self, city: &str) -> Result<WeatherSample, WeatherError>;

    async fn fetch_forecast(&self, city: &str) -> Result<ForecastBundle, WeatherError>;
}

/// Construct the OpenWeather client from on-disk config.
///
/// A missing key is not rejected here; the client reports
/// `MissingCredential` on first use without touching the network.
pub fn provider_from_config(config: &Config) -> Result<OpenWeatherClient, WeatherError> {
    OpenWeatherClient::new(config.client_config())
}
