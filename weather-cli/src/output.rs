use std::fmt::Display;

use chrono::TimeZone;
use weather_core::{
    ConditionCategory, DateStyle, SearchReport, WeatherError, WeatherSample, format_timestamp,
};

/// Human wording for each error kind.
pub fn describe_error(err: &WeatherError, city: &str) -> String {
    match err {
        WeatherError::MissingCredential => "No OpenWeather API key configured.\n\
             Hint: run `weather configure` or set OPENWEATHER_API_KEY."
            .to_string(),
        WeatherError::InvalidCredential => "OpenWeather rejected the API key.\n\
             Hint: check the key with `weather configure`; new keys can take a while to activate."
            .to_string(),
        WeatherError::CityNotFound { .. } => format!(
            "Could not find weather data for \"{city}\". \
             Please check the city name and try again."
        ),
        WeatherError::EmptyCity => "Please enter a city name.".to_string(),
        WeatherError::Network(_) => {
            "Could not reach OpenWeather. Check your internet connection.".to_string()
        }
        WeatherError::Provider { .. } | WeatherError::MalformedResponse(_) => {
            format!("Weather lookup for \"{city}\" failed: {err}")
        }
    }
}

fn glyph(category: &ConditionCategory) -> &'static str {
    match category {
        ConditionCategory::Clear => "☀",
        ConditionCategory::Clouds => "☁",
        ConditionCategory::Rain | ConditionCategory::Drizzle => "🌧",
        ConditionCategory::Thunderstorm => "⛈",
        ConditionCategory::Snow => "❄",
        _ => "⛅",
    }
}

pub fn render_report<Tz>(report: &SearchReport, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let current = &report.current;
    let mut out = format!("{}, {}\n", current.city, current.country);

    if let Some(when) = format_timestamp(current.timestamp, DateStyle::Full, tz) {
        out.push_str(&format!("{when}\n"));
    }
    out.push_str(&format!(
        "{} {:.0}°C  (feels like {:.0}°C)  {}  [{}]\n",
        glyph(&current.category),
        current.temperature_c,
        current.feels_like_c,
        current.description,
        current.gradient(),
    ));
    out.push_str(&format!(
        "Humidity {}%  Wind {} m/s\n",
        current.humidity_pct, current.wind_speed_mps
    ));

    if !report.daily.is_empty() {
        out.push_str(&format!("\n{}-Day Forecast\n", report.daily.len()));
        for day in &report.daily {
            out.push_str(&render_day(day, tz));
        }
    }

    out
}

fn render_day<Tz>(day: &WeatherSample, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let label = format_timestamp(day.timestamp, DateStyle::Day, tz).unwrap_or_default();
    format!(
        "  {label:<4} {} {:>4.0}°C  {}\n",
        glyph(&day.category),
        day.temperature_c,
        day.description
    )
}
