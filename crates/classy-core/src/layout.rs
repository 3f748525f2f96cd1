//! Screen geometry for the 144x168 face.

use crate::render::ElementKind;

pub const SCREEN_WIDTH: i16 = 144;
pub const SCREEN_HEIGHT: i16 = 168;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Point {
    pub x: i16,
    pub y: i16,
}

impl Point {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: i16, y: i16, width: u16, height: u16) -> Self {
        Self {
            origin: Point::new(x, y),
            width,
            height,
        }
    }

    pub const fn center(&self) -> Point {
        Point::new(
            self.origin.x + (self.width / 2) as i16,
            self.origin.y + (self.height / 2) as i16,
        )
    }
}

pub const SCREEN: Rect = Rect::new(0, 0, SCREEN_WIDTH as u16, SCREEN_HEIGHT as u16);

/// Pivot of every hand.
pub const FACE_CENTER: Point = SCREEN.center();

// Hand outlines point at 12 o'clock; y grows downwards.
pub const MINUTE_HAND_PATH: [Point; 4] = [
    Point::new(0, 15),
    Point::new(5, 0),
    Point::new(0, -58),
    Point::new(-5, 0),
];
pub const HOUR_HAND_PATH: [Point; 4] = [
    Point::new(0, 15),
    Point::new(6, 0),
    Point::new(0, -48),
    Point::new(-6, 0),
];
pub const SECOND_HAND_LENGTH: i32 = 70;

pub const CENTER_RING_RADIUS: u8 = 2;
pub const CENTER_DOT_RADIUS: u8 = 1;

pub const WEEKDAY_BOX: Rect = Rect::new(1, 42, 144, 14);
pub const DATE_BOX: Rect = Rect::new(64, 109, 16, 14);
pub const TIME_TEXT_BOX: Rect = Rect::new(58, 42, 29, 14);

/// Box a text element is centered in, `None` for non-text elements.
pub const fn text_box(element: ElementKind) -> Option<Rect> {
    match element {
        ElementKind::Weekday => Some(WEEKDAY_BOX),
        ElementKind::Date => Some(DATE_BOX),
        ElementKind::TimeText => Some(TIME_TEXT_BOX),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_center_is_middle_of_screen() {
        assert_eq!(FACE_CENTER, Point::new(72, 84));
    }

    #[test]
    fn only_text_elements_have_boxes() {
        assert_eq!(text_box(ElementKind::Date), Some(DATE_BOX));
        assert_eq!(text_box(ElementKind::MinuteHand), None);
        assert_eq!(text_box(ElementKind::Background), None);
    }
}
