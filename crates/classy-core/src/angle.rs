//! Time to hand angle conversion.
//!
//! Angles are fixed-point turns: `FULL_TURN` units per 360 degrees, measured
//! clockwise from 12 o'clock. All divisions floor; the error is below one unit.

use crate::time::TimeSample;

/// Angle units in one full turn.
pub const FULL_TURN: u32 = 0x1_0000;

const MINUTES_PER_HALF_DAY: u32 = 12 * 60;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HandAngles {
    pub second: u32,
    pub minute: u32,
    pub hour: u32,
}

pub fn compute_angles(sample: &TimeSample) -> HandAngles {
    HandAngles {
        second: second_angle(sample.second),
        minute: minute_angle(sample.minute),
        hour: hour_angle(sample.hour, sample.minute),
    }
}

pub const fn second_angle(second: u8) -> u32 {
    FULL_TURN * second as u32 / 60
}

pub const fn minute_angle(minute: u8) -> u32 {
    FULL_TURN * minute as u32 / 60
}

/// Hour hand advances with every minute, not only on the hour.
pub const fn hour_angle(hour: u8, minute: u8) -> u32 {
    let elapsed = (hour as u32 % 12) * 60 + minute as u32;
    FULL_TURN * elapsed / MINUTES_PER_HALF_DAY
}
