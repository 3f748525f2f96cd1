//! Face elements, palette resolution and the renderer that draws them.

use core::fmt::Write;

use heapless::String;
use log::debug;

use crate::{
    angle::{HandAngles, compute_angles},
    layout::{
        CENTER_DOT_RADIUS, CENTER_RING_RADIUS, FACE_CENTER, HOUR_HAND_PATH, MINUTE_HAND_PATH,
        Point, SECOND_HAND_LENGTH,
    },
    settings::Settings,
    time::TimeSample,
    trig,
};

/// Longest text any element shows.
pub const TEXT_BYTES: usize = 8;

/// Visual elements in bottom-to-top drawing order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ElementKind {
    Background,
    Weekday,
    Date,
    TimeText,
    MinuteHand,
    HourHand,
    SecondHand,
    CenterOrnament,
}

impl ElementKind {
    pub const COUNT: usize = 8;

    pub const ALL: [ElementKind; Self::COUNT] = [
        Self::Background,
        Self::Weekday,
        Self::Date,
        Self::TimeText,
        Self::MinuteHand,
        Self::HourHand,
        Self::SecondHand,
        Self::CenterOrnament,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of elements that need a redraw.
#[derive(Clone, Copy, Default, Eq, PartialEq)]
pub struct DirtySet(u8);

impl DirtySet {
    pub const EMPTY: Self = Self(0);
    pub const ALL: Self = Self(u8::MAX);

    #[must_use]
    pub const fn with(self, element: ElementKind) -> Self {
        Self(self.0 | element.bit())
    }

    #[must_use]
    pub const fn without(self, element: ElementKind) -> Self {
        Self(self.0 & !element.bit())
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn contains(&self, element: ElementKind) -> bool {
        self.0 & element.bit() != 0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in drawing order.
    pub fn iter(self) -> impl Iterator<Item = ElementKind> {
        ElementKind::ALL
            .into_iter()
            .filter(move |element| self.contains(*element))
    }
}

impl core::fmt::Debug for DirtySet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// One-bit display colors.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Color {
    Black,
    White,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Palette {
    pub foreground: Color,
    pub background: Color,
}

impl Palette {
    pub const BASE: Self = Self {
        foreground: Color::Black,
        background: Color::White,
    };

    pub const fn inverted(self) -> Self {
        Self {
            foreground: self.background,
            background: self.foreground,
        }
    }

    /// The palette every element of the face uses for `settings`.
    pub const fn resolve(self, settings: &Settings) -> Self {
        if settings.invert_colors {
            self.inverted()
        } else {
            self
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::BASE
    }
}

/// Drawing collaborator.
///
/// Commands issued after `begin_element` replace that element's previous
/// content; `present` makes the accumulated changes visible.
pub trait FaceSurface {
    fn begin_element(&mut self, element: ElementKind);
    fn remove_element(&mut self, element: ElementKind);
    fn fill_background(&mut self, color: Color);
    fn draw_line(&mut self, from: Point, to: Point, color: Color);
    fn fill_circle(&mut self, center: Point, radius: u8, color: Color);
    fn fill_polygon(&mut self, points: &[Point], color: Color);
    fn set_text(&mut self, element: ElementKind, text: &str, color: Color);
    fn present(&mut self) {}
}

/// Three-letter weekday abbreviations, Sunday first.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WeekdayTable(pub [&'static str; 7]);

impl WeekdayTable {
    pub const FRENCH: Self = Self(["dim", "lun", "mar", "mer", "jeu", "ven", "sam"]);
    pub const ENGLISH: Self = Self(["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"]);

    pub fn abbreviation(&self, weekday: u8) -> &'static str {
        self.0[weekday as usize % 7]
    }
}

impl Default for WeekdayTable {
    fn default() -> Self {
        Self::FRENCH
    }
}

/// Zero-padded day of month.
pub fn format_date(day: u8) -> String<TEXT_BYTES> {
    let mut out = String::new();
    let _ = write!(out, "{:02}", day);
    out
}

/// `HH:MM`, or `hh:MM` on a 12-hour clock.
pub fn format_time(sample: &TimeSample, clock_24h: bool) -> String<TEXT_BYTES> {
    let hour = if clock_24h {
        sample.hour
    } else {
        match sample.hour % 12 {
            0 => 12,
            hour => hour,
        }
    };

    let mut out = String::new();
    let _ = write!(out, "{:02}:{:02}", hour, sample.minute);
    out
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RenderOptions {
    pub palette: Palette,
    pub weekdays: WeekdayTable,
    pub time_text: bool,
    pub clock_24h: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            palette: Palette::BASE,
            weekdays: WeekdayTable::default(),
            time_text: false,
            clock_24h: true,
        }
    }
}

/// Outcome of [`FaceRenderer::sync_second_hand`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SecondHandChange {
    Unchanged,
    /// Constructed; not drawn yet.
    Created,
    /// Torn down and removed from the surface.
    Removed,
}

/// The seconds hand exists only while per-second ticking is enabled.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct SecondHand {
    length: i32,
}

pub struct FaceRenderer {
    options: RenderOptions,
    second_hand: Option<SecondHand>,
}

impl FaceRenderer {
    pub const fn new(options: RenderOptions) -> Self {
        Self {
            options,
            second_hand: None,
        }
    }

    pub fn has_second_hand(&self) -> bool {
        self.second_hand.is_some()
    }

    /// Builds or tears down the seconds hand to match `enabled`.
    pub fn sync_second_hand<S: FaceSurface>(
        &mut self,
        enabled: bool,
        surface: &mut S,
    ) -> SecondHandChange {
        match (enabled, self.second_hand) {
            (true, None) => {
                self.second_hand = Some(SecondHand {
                    length: SECOND_HAND_LENGTH,
                });
                debug!("second hand created");
                SecondHandChange::Created
            }
            (false, Some(_)) => {
                self.second_hand = None;
                surface.remove_element(ElementKind::SecondHand);
                debug!("second hand removed");
                SecondHandChange::Removed
            }
            _ => SecondHandChange::Unchanged,
        }
    }

    /// Every element the current configuration shows.
    pub fn visible_elements(&self) -> DirtySet {
        let mut all = DirtySet::ALL;
        if !self.options.time_text {
            all = all.without(ElementKind::TimeText);
        }
        if self.second_hand.is_none() {
            all = all.without(ElementKind::SecondHand);
        }
        all
    }

    pub fn render_full<S: FaceSurface>(
        &mut self,
        sample: &TimeSample,
        settings: &Settings,
        surface: &mut S,
    ) {
        self.sync_second_hand(settings.second_tick_enabled, surface);
        let dirty = self.visible_elements();
        self.render(dirty, sample, settings, surface);
    }

    pub fn render<S: FaceSurface>(
        &mut self,
        dirty: DirtySet,
        sample: &TimeSample,
        settings: &Settings,
        surface: &mut S,
    ) {
        if dirty.is_empty() {
            return;
        }

        let palette = self.options.palette.resolve(settings);
        let angles = compute_angles(sample);

        for element in dirty.iter() {
            match element {
                ElementKind::Background => {
                    surface.begin_element(element);
                    surface.fill_background(palette.background);
                }
                ElementKind::Weekday => {
                    let text = self.options.weekdays.abbreviation(sample.weekday);
                    surface.set_text(element, text, palette.foreground);
                }
                ElementKind::Date => {
                    surface.set_text(element, &format_date(sample.day), palette.foreground);
                }
                ElementKind::TimeText => {
                    if self.options.time_text {
                        let text = format_time(sample, self.options.clock_24h);
                        surface.set_text(element, &text, palette.foreground);
                    }
                }
                ElementKind::MinuteHand => {
                    surface.begin_element(element);
                    draw_hand_path(surface, &MINUTE_HAND_PATH, angles.minute, palette.foreground);
                }
                ElementKind::HourHand => {
                    surface.begin_element(element);
                    draw_hand_path(surface, &HOUR_HAND_PATH, angles.hour, palette.foreground);
                }
                ElementKind::SecondHand => {
                    if let Some(hand) = self.second_hand {
                        surface.begin_element(element);
                        draw_second_hand(surface, hand, &angles, palette.foreground);
                    }
                }
                ElementKind::CenterOrnament => {
                    surface.begin_element(element);
                    surface.fill_circle(FACE_CENTER, CENTER_RING_RADIUS, palette.background);
                    surface.fill_circle(FACE_CENTER, CENTER_DOT_RADIUS, palette.foreground);
                }
            }
        }

        surface.present();
    }
}

fn draw_hand_path<S: FaceSurface>(surface: &mut S, path: &[Point; 4], angle: u32, color: Color) {
    let points = path.map(|point| trig::rotate(point, angle).offset(FACE_CENTER));
    surface.fill_polygon(&points, color);
}

fn draw_second_hand<S: FaceSurface>(
    surface: &mut S,
    hand: SecondHand,
    angles: &HandAngles,
    color: Color,
) {
    let tip = trig::polar(FACE_CENTER, hand.length, angles.second);
    surface.draw_line(FACE_CENTER, tip, color);
}
