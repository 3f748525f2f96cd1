//! Wall-clock tick source.

use std::time::Duration;

use chrono::{Datelike, Local, Timelike};
use classy_core::{
    scheduler::{Granularity, TickSource},
    time::TimeSample,
};
use log::debug;

const NANOS_PER_SECOND: u32 = 1_000_000_000;

/// Remembers the subscribed granularity; the event loop asks it how long to
/// sleep and what time to deliver.
#[derive(Debug, Default)]
pub struct WallClock {
    granularity: Option<Granularity>,
}

impl WallClock {
    pub const fn new() -> Self {
        Self { granularity: None }
    }

    pub fn granularity(&self) -> Option<Granularity> {
        self.granularity
    }

    pub fn now_sample(&self) -> Option<TimeSample> {
        sample_of(&Local::now())
    }

    /// Time left until the next tick is due, `None` while unsubscribed.
    pub fn until_next_tick(&self) -> Option<Duration> {
        let granularity = self.granularity?;
        Some(delay_until_next(granularity, &Local::now()))
    }
}

impl TickSource for WallClock {
    fn subscribe(&mut self, granularity: Granularity) {
        debug!("wall clock ticking {:?}", granularity);
        self.granularity = Some(granularity);
    }

    fn unsubscribe(&mut self) {
        debug!("wall clock stopped");
        self.granularity = None;
    }
}

pub fn sample_of<T>(time: &T) -> Option<TimeSample>
where
    T: Datelike + Timelike,
{
    TimeSample::new(
        time.hour() as u8,
        time.minute() as u8,
        time.second().min(59) as u8,
        time.weekday().num_days_from_sunday() as u8,
        time.day() as u8,
    )
}

/// Delay from `now` to the next second or minute boundary.
pub fn delay_until_next<T: Timelike>(granularity: Granularity, now: &T) -> Duration {
    let nanos = now.nanosecond() % NANOS_PER_SECOND;
    let whole_seconds = match granularity {
        Granularity::PerSecond => 1,
        Granularity::PerMinute => 60 - now.second().min(59) as u64,
    };
    Duration::from_secs(whole_seconds) - Duration::from_nanos(nanos as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn sample_uses_sunday_based_weekday() {
        // 2024-03-10 was a Sunday.
        let sunday = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap();
        assert_eq!(sample_of(&sunday), TimeSample::new(14, 5, 9, 0, 10));

        let saturday = NaiveDate::from_ymd_opt(2024, 3, 16)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(sample_of(&saturday).map(|s| s.weekday), Some(6));
    }

    #[test]
    fn leap_second_is_clamped() {
        let leap = NaiveDate::from_ymd_opt(2016, 12, 31)
            .unwrap()
            .and_hms_milli_opt(23, 59, 59, 1_500)
            .unwrap();
        assert_eq!(sample_of(&leap).map(|s| s.second), Some(59));
        assert_eq!(
            delay_until_next(Granularity::PerSecond, &leap),
            Duration::from_millis(500)
        );
    }

    #[test]
    fn delays_land_on_boundaries() {
        let now = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_milli_opt(12, 30, 45, 250)
            .unwrap();

        assert_eq!(
            delay_until_next(Granularity::PerSecond, &now),
            Duration::from_millis(750)
        );
        assert_eq!(
            delay_until_next(Granularity::PerMinute, &now),
            Duration::from_millis(14_750)
        );
    }

    #[test]
    fn subscription_is_tracked() {
        let mut clock = WallClock::new();
        assert_eq!(clock.until_next_tick(), None);

        clock.subscribe(Granularity::PerMinute);
        assert_eq!(clock.granularity(), Some(Granularity::PerMinute));
        assert!(clock.until_next_tick().unwrap() <= Duration::from_secs(60));

        clock.unsubscribe();
        assert_eq!(clock.granularity(), None);
    }
}
