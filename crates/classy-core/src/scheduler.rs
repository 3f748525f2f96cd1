//! Tick subscription state machine and the redraw-minimization policy.
//!
//! The scheduler owns the only handle to the tick source. Granularity follows
//! `Settings::second_tick_enabled`; a change is applied as unsubscribe followed
//! by subscribe inside a single call, so two subscriptions never coexist.

use log::{debug, info};

use crate::{
    render::{DirtySet, ElementKind},
    settings::Settings,
    time::TimeSample,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Granularity {
    PerSecond,
    PerMinute,
}

impl Granularity {
    pub const fn for_settings(settings: &Settings) -> Self {
        if settings.second_tick_enabled {
            Self::PerSecond
        } else {
            Self::PerMinute
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Subscription {
    Unsubscribed,
    Subscribed(Granularity),
}

/// Periodic wall-clock tick provider.
///
/// Ticks are delivered back to the event context as [`TimeSample`]s; the
/// source only has to remember which granularity is wanted.
pub trait TickSource {
    fn subscribe(&mut self, granularity: Granularity);
    fn unsubscribe(&mut self);
}

/// Elements that can change when the minute rolls over.
const MINUTE_ELEMENTS: DirtySet = DirtySet::EMPTY
    .with(ElementKind::MinuteHand)
    .with(ElementKind::HourHand)
    .with(ElementKind::Date)
    .with(ElementKind::Weekday);

pub struct RedrawScheduler<T: TickSource> {
    ticks: T,
    subscription: Subscription,
    time_text: bool,
}

impl<T: TickSource> RedrawScheduler<T> {
    /// `time_text` adds the digital time element to the minute cadence.
    pub const fn new(ticks: T, time_text: bool) -> Self {
        Self {
            ticks,
            subscription: Subscription::Unsubscribed,
            time_text,
        }
    }

    pub fn start(&mut self, settings: &Settings) {
        if let Subscription::Subscribed(granularity) = self.subscription {
            debug!("scheduler already subscribed at {:?}", granularity);
            return;
        }

        let granularity = Granularity::for_settings(settings);
        self.ticks.subscribe(granularity);
        self.subscription = Subscription::Subscribed(granularity);
        info!("tick subscription started at {:?}", granularity);
    }

    /// Re-derives the granularity; returns `true` when it resubscribed.
    pub fn on_settings_changed(&mut self, settings: &Settings) -> bool {
        let Subscription::Subscribed(current) = self.subscription else {
            return false;
        };

        let wanted = Granularity::for_settings(settings);
        if wanted == current {
            return false;
        }

        self.ticks.unsubscribe();
        self.subscription = Subscription::Unsubscribed;
        self.ticks.subscribe(wanted);
        self.subscription = Subscription::Subscribed(wanted);
        info!("tick subscription moved {:?} -> {:?}", current, wanted);
        true
    }

    pub fn stop(&mut self) {
        if self.subscription == Subscription::Unsubscribed {
            return;
        }

        self.ticks.unsubscribe();
        self.subscription = Subscription::Unsubscribed;
        info!("tick subscription stopped");
    }

    /// Elements made stale by this tick.
    pub fn on_tick(&self, sample: &TimeSample) -> DirtySet {
        let minute_elements = if self.time_text {
            MINUTE_ELEMENTS.with(ElementKind::TimeText)
        } else {
            MINUTE_ELEMENTS
        };

        let dirty = match self.subscription {
            Subscription::Unsubscribed => DirtySet::EMPTY,
            Subscription::Subscribed(Granularity::PerMinute) => minute_elements,
            Subscription::Subscribed(Granularity::PerSecond) => {
                let dirty = DirtySet::EMPTY.with(ElementKind::SecondHand);
                if sample.is_minute_boundary() {
                    dirty.union(minute_elements)
                } else {
                    dirty
                }
            }
        };

        debug!(
            "tick {:02}:{:02}:{:02} dirty={:?}",
            sample.hour, sample.minute, sample.second, dirty
        );
        dirty
    }

    pub fn subscription(&self) -> Subscription {
        self.subscription
    }

    pub fn ticks(&self) -> &T {
        &self.ticks
    }

    pub fn ticks_mut(&mut self) -> &mut T {
        &mut self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{RecordingTicks, TickCall};

    fn sample(second: u8) -> TimeSample {
        TimeSample::new(10, 8, second, 2, 5).unwrap()
    }

    fn started(settings: Settings, time_text: bool) -> RedrawScheduler<RecordingTicks> {
        let mut scheduler = RedrawScheduler::new(RecordingTicks::new(), time_text);
        scheduler.start(&settings);
        scheduler
    }

    #[test]
    fn start_derives_granularity_from_settings() {
        let scheduler = started(Settings::new(true, false), false);
        assert_eq!(
            scheduler.subscription(),
            Subscription::Subscribed(Granularity::PerSecond)
        );

        let scheduler = started(Settings::new(false, false), false);
        assert_eq!(
            scheduler.ticks().calls(),
            &[TickCall::Subscribe(Granularity::PerMinute)]
        );
    }

    #[test]
    fn second_start_keeps_single_subscription() {
        let mut scheduler = started(Settings::new(true, false), false);
        scheduler.start(&Settings::new(false, false));
        assert_eq!(scheduler.ticks().calls().len(), 1);
        assert_eq!(scheduler.ticks().active_subscriptions(), 1);
    }

    #[test]
    fn per_second_minute_boundary_marks_everything() {
        let scheduler = started(Settings::new(true, false), false);
        let dirty = scheduler.on_tick(&sample(0));

        for element in [
            ElementKind::SecondHand,
            ElementKind::MinuteHand,
            ElementKind::HourHand,
            ElementKind::Date,
            ElementKind::Weekday,
        ] {
            assert!(dirty.contains(element), "{element:?} not dirty");
        }
        assert_eq!(dirty.len(), 5);
    }

    #[test]
    fn per_second_mid_minute_marks_only_second_hand() {
        let scheduler = started(Settings::new(true, false), false);
        assert_eq!(
            scheduler.on_tick(&sample(37)),
            DirtySet::EMPTY.with(ElementKind::SecondHand)
        );
    }

    #[test]
    fn per_minute_never_marks_second_hand() {
        let scheduler = started(Settings::new(false, false), false);
        for second in [0, 1, 37, 59] {
            let dirty = scheduler.on_tick(&sample(second));
            assert_eq!(dirty, MINUTE_ELEMENTS);
            assert!(!dirty.contains(ElementKind::SecondHand));
        }
    }

    #[test]
    fn time_text_joins_minute_cadence() {
        let scheduler = started(Settings::new(true, false), true);
        assert!(scheduler.on_tick(&sample(0)).contains(ElementKind::TimeText));
        assert!(!scheduler.on_tick(&sample(1)).contains(ElementKind::TimeText));
    }

    #[test]
    fn disabling_seconds_unsubscribes_then_subscribes_once() {
        let mut scheduler = started(Settings::new(true, false), false);
        scheduler.ticks_mut().clear();

        assert!(scheduler.on_settings_changed(&Settings::new(false, false)));
        assert_eq!(
            scheduler.ticks().calls(),
            &[
                TickCall::Unsubscribe,
                TickCall::Subscribe(Granularity::PerMinute)
            ]
        );
        assert_eq!(scheduler.ticks().active_subscriptions(), 1);
    }

    #[test]
    fn unrelated_change_does_not_resubscribe() {
        let mut scheduler = started(Settings::new(true, false), false);
        scheduler.ticks_mut().clear();

        assert!(!scheduler.on_settings_changed(&Settings::new(true, true)));
        assert!(scheduler.ticks().calls().is_empty());
    }

    #[test]
    fn settings_change_before_start_is_ignored() {
        let mut scheduler = RedrawScheduler::new(RecordingTicks::new(), false);
        assert!(!scheduler.on_settings_changed(&Settings::new(true, false)));
        assert_eq!(scheduler.subscription(), Subscription::Unsubscribed);
        assert!(scheduler.ticks().calls().is_empty());
    }

    #[test]
    fn stop_is_idempotent_and_silences_late_ticks() {
        let mut scheduler = started(Settings::new(true, false), false);
        scheduler.stop();
        scheduler.stop();

        assert_eq!(
            scheduler.ticks().calls(),
            &[
                TickCall::Subscribe(Granularity::PerSecond),
                TickCall::Unsubscribe
            ]
        );
        assert!(scheduler.on_tick(&sample(0)).is_empty());
    }
}
