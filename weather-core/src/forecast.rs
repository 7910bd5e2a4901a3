//! Reduces a 3-hourly forecast to one representative sample per upcoming day.

use std::ops::RangeInclusive;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Timelike};

use crate::model::WeatherSample;

/// Maximum number of days in an outlook.
pub const OUTLOOK_DAYS: usize = 5;

/// Local hours preferred when picking a day's representative sample.
pub const NOON_WINDOW: RangeInclusive<u32> = 12..=15;

/// Pick one sample per calendar day after `now`'s date, at most [`OUTLOOK_DAYS`].
///
/// Samples are grouped by their UTC calendar date, the frame the provider
/// stamps `dt` in. The "today" exclusion and the [`NOON_WINDOW`] hour use
/// `now`'s time zone. Days are emitted in the order their first sample
/// appears; the input is expected to be time-ordered and is not re-sorted.
/// For each day the first sample inside the window wins, otherwise the day's
/// first sample.
pub fn daily_outlook<Tz: TimeZone>(
    samples: &[WeatherSample],
    now: &DateTime<Tz>,
) -> Vec<WeatherSample> {
    let tz = now.timezone();
    let today = now.date_naive();

    let mut days: Vec<NaiveDate> = Vec::with_capacity(OUTLOOK_DAYS);
    let mut picks = Vec::with_capacity(OUTLOOK_DAYS);

    for sample in samples {
        let Some(local) = sample.local_time(&tz) else {
            continue;
        };
        if local.date_naive() == today {
            continue;
        }
        let Some(day) = sample.observed_at().map(|t| t.date_naive()) else {
            continue;
        };
        if days.contains(&day) {
            continue;
        }
        if days.len() == OUTLOOK_DAYS {
            break;
        }

        days.push(day);
        if let Some(pick) = representative(samples, day, &tz) {
            picks.push(pick.clone());
        }
    }

    picks
}

/// [`daily_outlook`] against the machine's local clock.
pub fn daily_outlook_local(samples: &[WeatherSample]) -> Vec<WeatherSample> {
    daily_outlook(samples, &Local::now())
}

fn representative<'a, Tz: TimeZone>(
    samples: &'a [WeatherSample],
    day: NaiveDate,
    tz: &'a Tz,
) -> Option<&'a WeatherSample> {
    samples_on(samples, day, tz)
        .find(|(_, hour)| NOON_WINDOW.contains(hour))
        .or_else(|| samples_on(samples, day, tz).next())
        .map(|(s, _)| s)
}

/// Samples whose UTC date is `day`, paired with their hour in `tz`.
fn samples_on<'a, Tz: TimeZone>(
    samples: &'a [WeatherSample],
    day: NaiveDate,
    tz: &'a Tz,
) -> impl Iterator<Item = (&'a WeatherSample, u32)> {
    samples.iter().filter_map(move |s| {
        let on_day = s.observed_at()?.date_naive() == day;
        let hour = s.local_time(tz)?.hour();
        on_day.then_some((s, hour))
    })
}
