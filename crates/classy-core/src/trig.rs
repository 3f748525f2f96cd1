//! Fixed-point trigonometry over [`FULL_TURN`](crate::angle::FULL_TURN) angles.

use crate::{angle::FULL_TURN, layout::Point};

/// Magnitude of `sin`/`cos` results at +-1.
pub const TRIG_MAX_RATIO: i32 = 0xFFFF;

pub fn sin_lookup(angle: u32) -> i32 {
    scaled(libm::sin(radians(angle)))
}

pub fn cos_lookup(angle: u32) -> i32 {
    scaled(libm::cos(radians(angle)))
}

/// Rotates `point` clockwise (screen coordinates) about the origin.
pub fn rotate(point: Point, angle: u32) -> Point {
    let sin = sin_lookup(angle) as i64;
    let cos = cos_lookup(angle) as i64;
    let x = point.x as i64;
    let y = point.y as i64;
    let ratio = TRIG_MAX_RATIO as i64;

    Point::new(
        ((x * cos - y * sin) / ratio) as i16,
        ((y * cos + x * sin) / ratio) as i16,
    )
}

/// End of a hand of `length` pointing at `angle`, measured from `center`.
pub fn polar(center: Point, length: i32, angle: u32) -> Point {
    let dx = length * sin_lookup(angle) / TRIG_MAX_RATIO;
    let dy = length * cos_lookup(angle) / TRIG_MAX_RATIO;
    Point::new(center.x + dx as i16, center.y - dy as i16)
}

fn radians(angle: u32) -> f64 {
    (angle % FULL_TURN) as f64 * core::f64::consts::TAU / FULL_TURN as f64
}

fn scaled(value: f64) -> i32 {
    libm::round(value * TRIG_MAX_RATIO as f64) as i32
}
