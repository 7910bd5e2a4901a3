//! Pure mapping helpers used by front-ends when rendering samples.

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::model::ConditionCategory;

/// Background style bucket for a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientTag {
    Night,
    Clear,
    Clouds,
    Rain,
    Thunderstorm,
    Snow,
    Mist,
}

impl GradientTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            GradientTag::Night => "night",
            GradientTag::Clear => "clear",
            GradientTag::Clouds => "clouds",
            GradientTag::Rain => "rain",
            GradientTag::Thunderstorm => "thunderstorm",
            GradientTag::Snow => "snow",
            GradientTag::Mist => "mist",
        }
    }
}

impl std::fmt::Display for GradientTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// OpenWeather icon codes end in `d` for day and `n` for night, e.g. `10n`.
pub fn is_night_sample(icon: &str) -> bool {
    icon.contains('n')
}

/// Night wins over the condition; unknown conditions fall back to clear.
pub fn gradient_category_for(category: &ConditionCategory, is_night: bool) -> GradientTag {
    if is_night {
        return GradientTag::Night;
    }

    match category {
        ConditionCategory::Clear => GradientTag::Clear,
        ConditionCategory::Clouds => GradientTag::Clouds,
        ConditionCategory::Rain | ConditionCategory::Drizzle => GradientTag::Rain,
        ConditionCategory::Thunderstorm => GradientTag::Thunderstorm,
        ConditionCategory::Snow => GradientTag::Snow,
        ConditionCategory::Mist | ConditionCategory::Fog | ConditionCategory::Haze => {
            GradientTag::Mist
        }
        ConditionCategory::Other(_) => GradientTag::Clear,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateStyle {
    /// `Monday, Jan 15, 3:00 PM`
    #[default]
    Full,
    /// `Mon`
    Day,
    /// `3:00 PM`
    Time,
}

/// Render a Unix timestamp in `tz`. Returns `None` for out-of-range values.
pub fn format_timestamp<Tz>(timestamp: i64, style: DateStyle, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let at: DateTime<Tz> = tz.timestamp_opt(timestamp, 0).single()?;
    let pattern = match style {
        DateStyle::Full => "%A, %b %-d, %-I:%M %p",
        DateStyle::Day => "%a",
        DateStyle::Time => "%-I:%M %p",
    };
    Some(at.format(pattern).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn night_marker_detection() {
        assert!(is_night_sample("10n"));
        assert!(!is_night_sample("10d"));
        assert!(!is_night_sample(""));
    }

    #[test]
    fn night_overrides_category() {
        assert_eq!(gradient_category_for(&ConditionCategory::Clear, true), GradientTag::Night);
        assert_eq!(gradient_category_for(&ConditionCategory::Snow, true), GradientTag::Night);
    }

    #[test]
    fn rain_and_drizzle_share_a_tag() {
        assert_eq!(gradient_category_for(&ConditionCategory::Rain, false), GradientTag::Rain);
        assert_eq!(gradient_category_for(&ConditionCategory::Drizzle, false), GradientTag::Rain);
    }

    #[test]
    fn mist_like_conditions_share_a_tag() {
        for cat in [ConditionCategory::Mist, ConditionCategory::Fog, ConditionCategory::Haze] {
            assert_eq!(gradient_category_for(&cat, false), GradientTag::Mist);
        }
    }

    #[test]
    fn unknown_category_defaults_to_clear() {
        let cat = ConditionCategory::from("Squall");
        assert_eq!(gradient_category_for(&cat, false), GradientTag::Clear);
    }

    #[test]
    fn formats_each_style() {
        // 2024-01-15 15:00:00 UTC, a Monday
        let ts = 1_705_330_800;
        assert_eq!(
            format_timestamp(ts, DateStyle::Full, &Utc).as_deref(),
            Some("Monday, Jan 15, 3:00 PM")
        );
        assert_eq!(format_timestamp(ts, DateStyle::Day, &Utc).as_deref(), Some("Mon"));
        assert_eq!(format_timestamp(ts, DateStyle::Time, &Utc).as_deref(), Some("3:00 PM"));
    }
}
