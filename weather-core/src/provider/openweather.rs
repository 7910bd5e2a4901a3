use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, warn};

use crate::{
    error::WeatherError,
    model::{ConditionCategory, ForecastBundle, WeatherSample},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Settings for one [`OpenWeatherClient`]. Each client owns its own copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// OpenWeather `appid`. Requests fail with `MissingCredential` while unset.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whole-request timeout; `None` keeps the transport default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

impl ClientConfig {
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    config: ClientConfig,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(config: ClientConfig) -> Result<Self, WeatherError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(WeatherError::Network)?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// GET `{base_url}/{endpoint}` for `city` and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        city: &str,
    ) -> Result<T, WeatherError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(WeatherError::MissingCredential)?;

        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint);
        debug!(%url, city, "Requesting OpenWeather data");

        let res = self
            .http
            .get(&url)
            .query(&[("q", city), ("appid", api_key), ("units", "metric")])
            .send()
            .await
            .map_err(WeatherError::Network)?;

        let status = res.status();
        let body = res.text().await.map_err(WeatherError::Network)?;
        debug!(%status, bytes = body.len(), "OpenWeather responded");

        if !status.is_success() {
            return Err(classify_failure(status, &body, city));
        }

        serde_json::from_str(&body)
            .map_err(|e| WeatherError::MalformedResponse(format!("{endpoint}: {e}")))
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn fetch_current(&self, city: &str) -> Result<WeatherSample, WeatherError> {
        let parsed: OwCurrentResponse = self.get_json("weather", city).await?;

        to_sample(
            parsed.name,
            parsed.sys.country,
            parsed.dt,
            parsed.main,
            parsed.wind,
            parsed.weather,
        )
    }

    #[instrument(skip(self))]
    async fn fetch_forecast(&self, city: &str) -> Result<ForecastBundle, WeatherError> {
        let parsed: OwForecastResponse = self.get_json("forecast", city).await?;
        let OwCity { name, country } = parsed.city;

        let samples = parsed
            .list
            .into_iter()
            .map(|e| to_sample(name.clone(), country.clone(), e.dt, e.main, e.wind, e.weather))
            .collect::<Result<Vec<_>, _>>()?;

        if samples.windows(2).any(|w| w[0].timestamp >= w[1].timestamp) {
            warn!(city = %name, "Forecast samples are not strictly time-ordered");
        }
        debug!(city = %name, samples = samples.len(), "Parsed forecast");

        Ok(ForecastBundle {
            city: name,
            country,
            samples,
        })
    }
}

fn to_sample(
    city: String,
    country: String,
    dt: i64,
    main: OwMain,
    wind: OwWind,
    weather: Vec<OwWeather>,
) -> Result<WeatherSample, WeatherError> {
    let condition = weather.into_iter().next().ok_or_else(|| {
        WeatherError::MalformedResponse(format!("no weather condition listed for dt={dt}"))
    })?;

    if !main.temp.is_finite() || !main.feels_like.is_finite() {
        return Err(WeatherError::MalformedResponse(format!(
            "non-finite temperature for dt={dt}"
        )));
    }

    Ok(WeatherSample {
        city,
        country,
        temperature_c: main.temp,
        feels_like_c: main.feels_like,
        humidity_pct: main.humidity,
        wind_speed_mps: wind.speed,
        description: condition.description,
        icon: condition.icon,
        category: ConditionCategory::from(condition.main),
        timestamp: dt,
    })
}

fn classify_failure(status: StatusCode, body: &str, city: &str) -> WeatherError {
    match status {
        StatusCode::UNAUTHORIZED => WeatherError::InvalidCredential,
        StatusCode::NOT_FOUND => WeatherError::CityNotFound {
            city: city.to_string(),
        },
        _ => {
            let message = serde_json::from_str::<OwErrorBody>(body)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| truncate_body(body));
            WeatherError::Provider { status, message }
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    sys: OwSys,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

/// `{"cod": "...", "message": "..."}`
#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: Option<String>,
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
