//! One city lookup end to end: current conditions, forecast, daily outlook.
//!
//! Searches may overlap. Every call takes a new generation number, and a
//! search that notices a newer one has started drops its result, so only
//! the latest search ever reaches the caller's display state.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    error::WeatherError,
    forecast::daily_outlook,
    model::{ForecastBundle, WeatherSample},
    provider::WeatherProvider,
};

#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub current: WeatherSample,
    pub forecast: ForecastBundle,
    /// Up to five upcoming days, one sample each.
    pub daily: Vec<WeatherSample>,
}

#[derive(Debug)]
pub enum SearchOutcome {
    Completed(SearchReport),
    /// A newer search started while this one was in flight.
    Superseded,
}

#[derive(Debug)]
pub struct WeatherSearch {
    provider: Arc<dyn WeatherProvider>,
    generation: AtomicU64,
}

impl WeatherSearch {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self {
            provider,
            generation: AtomicU64::new(0),
        }
    }

    /// Search using the machine's local clock for "today".
    pub async fn search(&self, city: &str) -> Result<SearchOutcome, WeatherError> {
        self.search_at(city, &Local::now()).await
    }

    /// Search with an explicit "now"; the outlook is computed in `now`'s zone.
    pub async fn search_at<Tz>(
        &self,
        city: &str,
        now: &DateTime<Tz>,
    ) -> Result<SearchOutcome, WeatherError>
    where
        Tz: TimeZone,
    {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::EmptyCity);
        }

        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(city, ticket, "Starting weather search");

        // Current first, then forecast, both before anything is returned.
        let current = self.provider.fetch_current(city).await;
        if self.is_stale(ticket) {
            return Ok(self.superseded(ticket));
        }
        let current = current?;

        let forecast = self.provider.fetch_forecast(city).await;
        if self.is_stale(ticket) {
            return Ok(self.superseded(ticket));
        }
        let forecast = forecast?;

        let daily = daily_outlook(&forecast.samples, now);
        info!(
            city = %forecast.city,
            country = %forecast.country,
            days = daily.len(),
            "Weather search completed"
        );

        Ok(SearchOutcome::Completed(SearchReport {
            current,
            forecast,
            daily,
        }))
    }

    fn is_stale(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != ticket
    }

    fn superseded(&self, ticket: u64) -> SearchOutcome {
        debug!(ticket, "Dropping superseded search result");
        SearchOutcome::Superseded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ConditionCategory;
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    fn sample(city: &str, timestamp: i64) -> WeatherSample {
        WeatherSample {
            city: city.into(),
            country: "FR".into(),
            temperature_c: 18.0,
            feels_like_c: 17.5,
            humidity_pct: 55,
            wind_speed_mps: 2.1,
            description: "clear sky".into(),
            icon: "01d".into(),
            category: ConditionCategory::Clear,
            timestamp,
        }
    }

    /// Answers every city with a two-day forecast. Requests for `blocked`
    /// wait on `gate` before returning.
    #[derive(Debug, Default)]
    struct FakeProvider {
        blocked: Option<String>,
        gate: Notify,
        forecast_calls: AtomicUsize,
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn fetch_current(&self, city: &str) -> Result<WeatherSample, WeatherError> {
            if self.blocked.as_deref() == Some(city) {
                self.gate.notified().await;
            }
            if city == "Atlantis" {
                return Err(WeatherError::CityNotFound { city: city.into() });
            }
            Ok(sample(city, base().timestamp()))
        }

        async fn fetch_forecast(&self, city: &str) -> Result<ForecastBundle, WeatherError> {
            self.forecast_calls.fetch_add(1, Ordering::SeqCst);
            let start = base() + Duration::days(1);
            let samples = (0..16)
                .map(|i| sample(city, (start + Duration::hours(3 * i)).timestamp()))
                .collect();
            Ok(ForecastBundle {
                city: city.into(),
                country: "FR".into(),
                samples,
            })
        }
    }

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    fn now() -> DateTime<Utc> {
        base() + Duration::hours(8)
    }

    #[tokio::test]
    async fn completed_search_aggregates_forecast() {
        let search = WeatherSearch::new(Arc::new(FakeProvider::default()));

        let outcome = search.search_at("  Paris ", &now()).await.unwrap();

        let SearchOutcome::Completed(report) = outcome else {
            panic!("expected a completed search");
        };
        assert_eq!(report.current.city, "Paris");
        assert_eq!(report.forecast.samples.len(), 16);
        assert_eq!(report.daily.len(), 2);
    }

    #[tokio::test]
    async fn blank_city_is_rejected() {
        let search = WeatherSearch::new(Arc::new(FakeProvider::default()));

        let err = search.search_at("   ", &now()).await.unwrap_err();
        assert!(matches!(err, WeatherError::EmptyCity));
    }

    #[tokio::test]
    async fn current_failure_skips_forecast() {
        let provider = Arc::new(FakeProvider::default());
        let search = WeatherSearch::new(provider.clone());

        let err = search.search_at("Atlantis", &now()).await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(provider.forecast_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn newer_search_supersedes_in_flight_one() {
        let provider = Arc::new(FakeProvider {
            blocked: Some("Slowtown".into()),
            ..FakeProvider::default()
        });
        let search = Arc::new(WeatherSearch::new(provider.clone()));

        let slow = {
            let search = search.clone();
            tokio::spawn(async move { search.search_at("Slowtown", &now()).await })
        };
        // Let the slow search take its ticket and park on the gate.
        tokio::task::yield_now().await;
        while search.generation.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        let fast = search.search_at("Lyon", &now()).await.unwrap();
        provider.gate.notify_one();
        let slow = slow.await.unwrap().unwrap();

        assert!(matches!(fast, SearchOutcome::Completed(ref r) if r.current.city == "Lyon"));
        assert!(matches!(slow, SearchOutcome::Superseded));
    }
}
