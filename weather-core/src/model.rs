use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::presentation::{GradientTag, gradient_category_for, is_night_sample};

/// Primary condition group as reported in `weather[0].main`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionCategory {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
    Fog,
    Haze,
    /// Anything outside the groups above, kept verbatim.
    Other(String),
}

impl ConditionCategory {
    pub fn as_str(&self) -> &str {
        match self {
            ConditionCategory::Clear => "Clear",
            ConditionCategory::Clouds => "Clouds",
            ConditionCategory::Rain => "Rain",
            ConditionCategory::Drizzle => "Drizzle",
            ConditionCategory::Thunderstorm => "Thunderstorm",
            ConditionCategory::Snow => "Snow",
            ConditionCategory::Mist => "Mist",
            ConditionCategory::Fog => "Fog",
            ConditionCategory::Haze => "Haze",
            ConditionCategory::Other(raw) => raw,
        }
    }
}

impl From<&str> for ConditionCategory {
    fn from(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "clear" => ConditionCategory::Clear,
            "clouds" => ConditionCategory::Clouds,
            "rain" => ConditionCategory::Rain,
            "drizzle" => ConditionCategory::Drizzle,
            "thunderstorm" => ConditionCategory::Thunderstorm,
            "snow" => ConditionCategory::Snow,
            "mist" => ConditionCategory::Mist,
            "fog" => ConditionCategory::Fog,
            "haze" => ConditionCategory::Haze,
            _ => ConditionCategory::Other(value.to_string()),
        }
    }
}

impl From<String> for ConditionCategory {
    fn from(value: String) -> Self {
        ConditionCategory::from(value.as_str())
    }
}

impl From<ConditionCategory> for String {
    fn from(value: ConditionCategory) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for ConditionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized snapshot of conditions at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    pub city: String,
    pub country: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub description: String,
    pub icon: String,
    pub category: ConditionCategory,
    /// Unix seconds.
    pub timestamp: i64,
}

impl WeatherSample {
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }

    /// The sample's timestamp expressed in `tz`.
    pub fn local_time<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        tz.timestamp_opt(self.timestamp, 0).single()
    }

    pub fn is_night(&self) -> bool {
        is_night_sample(&self.icon)
    }

    pub fn gradient(&self) -> GradientTag {
        gradient_category_for(&self.category, self.is_night())
    }
}

/// A resolved city plus its time-ordered forecast samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastBundle {
    pub city: String,
    pub country: String,
    pub samples: Vec<WeatherSample>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(icon: &str, category: ConditionCategory) -> WeatherSample {
        WeatherSample {
            city: "London".into(),
            country: "GB".into(),
            temperature_c: 11.2,
            feels_like_c: 10.1,
            humidity_pct: 81,
            wind_speed_mps: 4.6,
            description: "light rain".into(),
            icon: icon.into(),
            category,
            timestamp: 1_705_320_000,
        }
    }

    #[test]
    fn category_parsing_is_case_insensitive() {
        assert_eq!(ConditionCategory::from("RAIN"), ConditionCategory::Rain);
        assert_eq!(ConditionCategory::from("clouds"), ConditionCategory::Clouds);
        assert_eq!(ConditionCategory::from("Haze"), ConditionCategory::Haze);
    }

    #[test]
    fn unknown_category_is_kept_verbatim() {
        let cat = ConditionCategory::from("Tornado");
        assert_eq!(cat, ConditionCategory::Other("Tornado".into()));
        assert_eq!(cat.to_string(), "Tornado");
    }

    #[test]
    fn category_serializes_as_provider_string() {
        let json = serde_json::to_string(&ConditionCategory::Thunderstorm).unwrap();
        assert_eq!(json, "\"Thunderstorm\"");

        let back: ConditionCategory = serde_json::from_str("\"Smoke\"").unwrap();
        assert_eq!(back, ConditionCategory::Other("Smoke".into()));
    }

    #[test]
    fn observed_at_converts_unix_seconds() {
        let s = sample("10d", ConditionCategory::Rain);
        let at = s.observed_at().unwrap();
        assert_eq!(at.to_rfc3339(), "2024-01-15T12:00:00+00:00");
    }

    #[test]
    fn sample_gradient_uses_icon_night_marker() {
        assert_eq!(sample("10d", ConditionCategory::Rain).gradient(), GradientTag::Rain);
        assert_eq!(sample("10n", ConditionCategory::Rain).gradient(), GradientTag::Night);
    }
}
