//! Wall-clock samples delivered with every tick.

/// Broken-down local time at the instant of a tick.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TimeSample {
    /// 0..=23
    pub hour: u8,
    /// 0..=59
    pub minute: u8,
    /// 0..=59
    pub second: u8,
    /// 0..=6, Sunday is 0.
    pub weekday: u8,
    /// 1..=31
    pub day: u8,
}

impl TimeSample {
    /// Builds a sample, rejecting any out-of-range field.
    pub const fn new(hour: u8, minute: u8, second: u8, weekday: u8, day: u8) -> Option<Self> {
        if hour > 23 || minute > 59 || second > 59 || weekday > 6 || day == 0 || day > 31 {
            return None;
        }

        Some(Self {
            hour,
            minute,
            second,
            weekday,
            day,
        })
    }

    /// First tick of a new minute.
    pub const fn is_minute_boundary(&self) -> bool {
        self.second == 0
    }

    /// Minutes elapsed since the last 12 o'clock.
    pub const fn minutes_in_half_day(&self) -> u32 {
        (self.hour as u32 % 12) * 60 + self.minute as u32
    }
}
