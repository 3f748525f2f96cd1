//! Retained drawing surface backed by a [`Frame`].
//!
//! Each element keeps the commands from its last `begin_element` in its own
//! layer. `present` repaints the frame from scratch, bottom layer first, so a
//! single element can be redrawn without disturbing the others.

use classy_core::{
    layout::{self, Point},
    render::{Color, ElementKind, FaceSurface, TEXT_BYTES},
};
use embedded_graphics::{
    mono_font::{MonoTextStyle, ascii::FONT_6X10},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Circle, Line, PrimitiveStyle, Triangle},
    text::{Alignment, Baseline, Text, TextStyle, TextStyleBuilder},
};
use heapless::{String, Vec};
use log::{debug, warn};

use super::frame::Frame;

const LAYER_OPS: usize = 4;
const POLYGON_POINTS: usize = 4;

const CENTERED: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Center)
    .baseline(Baseline::Middle)
    .build();

#[derive(Clone, Debug, Eq, PartialEq)]
enum DrawOp {
    Fill(Color),
    Line {
        from: Point,
        to: Point,
        color: Color,
    },
    Circle {
        center: Point,
        radius: u8,
        color: Color,
    },
    Polygon {
        points: Vec<Point, POLYGON_POINTS>,
        color: Color,
    },
    Text {
        text: String<TEXT_BYTES>,
        color: Color,
    },
}

type Layer = Vec<DrawOp, LAYER_OPS>;

pub struct LayeredCanvas {
    layers: [Layer; ElementKind::COUNT],
    current: Option<ElementKind>,
    frame: Frame,
    presented: usize,
}

impl Default for LayeredCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl LayeredCanvas {
    pub fn new() -> Self {
        Self {
            layers: core::array::from_fn(|_| Vec::new()),
            current: None,
            frame: Frame::new(),
            presented: 0,
        }
    }

    /// The frame as of the last `present`.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn presented(&self) -> usize {
        self.presented
    }

    pub fn has_content(&self, element: ElementKind) -> bool {
        !self.layers[element.index()].is_empty()
    }

    fn push(&mut self, op: DrawOp) {
        let Some(element) = self.current else {
            warn!("draw command outside of an element dropped");
            return;
        };
        if self.layers[element.index()].push(op).is_err() {
            warn!("layer {:?} is full, draw command dropped", element);
        }
    }

    fn compose(&mut self) {
        self.frame.clear(false);
        for element in ElementKind::ALL {
            for op in self.layers[element.index()].iter() {
                draw_op(&mut self.frame, element, op);
            }
        }
    }
}

impl FaceSurface for LayeredCanvas {
    fn begin_element(&mut self, element: ElementKind) {
        self.layers[element.index()].clear();
        self.current = Some(element);
    }

    fn remove_element(&mut self, element: ElementKind) {
        self.layers[element.index()].clear();
        if self.current == Some(element) {
            self.current = None;
        }
    }

    fn fill_background(&mut self, color: Color) {
        self.push(DrawOp::Fill(color));
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color) {
        self.push(DrawOp::Line { from, to, color });
    }

    fn fill_circle(&mut self, center: Point, radius: u8, color: Color) {
        self.push(DrawOp::Circle {
            center,
            radius,
            color,
        });
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        match Vec::from_slice(points) {
            Ok(points) => self.push(DrawOp::Polygon { points, color }),
            Err(()) => warn!("polygon with {} points dropped", points.len()),
        }
    }

    fn set_text(&mut self, element: ElementKind, text: &str, color: Color) {
        let mut owned = String::new();
        if owned.push_str(text).is_err() {
            warn!("text {:?} too long for {:?}", text, element);
            return;
        }

        let layer = &mut self.layers[element.index()];
        layer.clear();
        let _ = layer.push(DrawOp::Text { text: owned, color });
    }

    fn present(&mut self) {
        self.compose();
        self.presented += 1;
        debug!("frame {} presented, {} px on", self.presented, self.frame.count_on());
    }
}

fn to_binary(color: Color) -> BinaryColor {
    match color {
        Color::Black => BinaryColor::On,
        Color::White => BinaryColor::Off,
    }
}

fn to_eg(point: Point) -> embedded_graphics::geometry::Point {
    embedded_graphics::geometry::Point::new(point.x as i32, point.y as i32)
}

fn draw_op(frame: &mut Frame, element: ElementKind, op: &DrawOp) {
    match op {
        DrawOp::Fill(color) => frame.clear(to_binary(*color).is_on()),
        DrawOp::Line { from, to, color } => {
            Line::new(to_eg(*from), to_eg(*to))
                .into_styled(PrimitiveStyle::with_stroke(to_binary(*color), 1))
                .draw(frame)
                .ok();
        }
        DrawOp::Circle {
            center,
            radius,
            color,
        } => {
            Circle::with_center(to_eg(*center), *radius as u32 * 2 + 1)
                .into_styled(PrimitiveStyle::with_fill(to_binary(*color)))
                .draw(frame)
                .ok();
        }
        DrawOp::Polygon { points, color } => {
            let style = PrimitiveStyle::with_fill(to_binary(*color));
            let Some((&first, rest)) = points.split_first() else {
                return;
            };
            for pair in rest.windows(2) {
                Triangle::new(to_eg(first), to_eg(pair[0]), to_eg(pair[1]))
                    .into_styled(style)
                    .draw(frame)
                    .ok();
            }
        }
        DrawOp::Text { text, color } => {
            let Some(area) = layout::text_box(element) else {
                return;
            };
            let style = MonoTextStyle::new(&FONT_6X10, to_binary(*color));
            Text::with_text_style(text, to_eg(area.center()), style, CENTERED)
                .draw(frame)
                .ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classy_core::{
        layout::FACE_CENTER,
        render::{DirtySet, FaceRenderer, RenderOptions},
        settings::Settings,
        time::TimeSample,
    };

    fn three_oclock() -> TimeSample {
        TimeSample::new(3, 0, 15, 1, 12).unwrap()
    }

    fn pixel(canvas: &LayeredCanvas, x: i16, y: i16) -> bool {
        canvas
            .frame()
            .pixel(x as usize, y as usize)
            .unwrap_or(false)
    }

    #[test]
    fn full_face_is_composed_on_present() {
        let mut canvas = LayeredCanvas::new();
        let mut renderer = FaceRenderer::new(RenderOptions::default());
        renderer.render_full(&three_oclock(), &Settings::new(true, false), &mut canvas);

        assert_eq!(canvas.presented(), 1);
        assert!(!pixel(&canvas, 0, 0));
        assert!(pixel(&canvas, FACE_CENTER.x, FACE_CENTER.y));
        // hour hand towards 3 o'clock, seconds hand past its tip
        assert!(pixel(&canvas, FACE_CENTER.x + 40, FACE_CENTER.y));
        assert!(pixel(&canvas, FACE_CENTER.x + 65, FACE_CENTER.y));
        // minute hand towards 12
        assert!(pixel(&canvas, FACE_CENTER.x, FACE_CENTER.y - 50));
    }

    #[test]
    fn inverted_face_has_black_background() {
        let mut canvas = LayeredCanvas::new();
        let mut renderer = FaceRenderer::new(RenderOptions::default());
        renderer.render_full(&three_oclock(), &Settings::new(false, true), &mut canvas);

        assert!(pixel(&canvas, 0, 0));
        assert!(!pixel(&canvas, FACE_CENTER.x, FACE_CENTER.y));
    }

    #[test]
    fn removed_second_hand_disappears() {
        let mut canvas = LayeredCanvas::new();
        let mut renderer = FaceRenderer::new(RenderOptions::default());
        renderer.render_full(&three_oclock(), &Settings::new(true, false), &mut canvas);
        assert!(canvas.has_content(ElementKind::SecondHand));

        renderer.sync_second_hand(false, &mut canvas);
        canvas.present();

        assert!(!canvas.has_content(ElementKind::SecondHand));
        assert!(!pixel(&canvas, FACE_CENTER.x + 65, FACE_CENTER.y));
        assert!(pixel(&canvas, FACE_CENTER.x + 40, FACE_CENTER.y));
    }

    #[test]
    fn redrawing_one_element_keeps_the_rest() {
        let mut canvas = LayeredCanvas::new();
        let mut renderer = FaceRenderer::new(RenderOptions::default());
        let settings = Settings::new(true, false);
        renderer.render_full(&three_oclock(), &settings, &mut canvas);

        let later = TimeSample::new(3, 0, 30, 1, 12).unwrap();
        renderer.render(
            DirtySet::EMPTY.with(ElementKind::SecondHand),
            &later,
            &settings,
            &mut canvas,
        );

        assert!(pixel(&canvas, FACE_CENTER.x, FACE_CENTER.y + 65));
        assert!(!pixel(&canvas, FACE_CENTER.x + 65, FACE_CENTER.y));
        assert!(pixel(&canvas, FACE_CENTER.x + 40, FACE_CENTER.y));
        assert!(canvas.has_content(ElementKind::Weekday));
    }

    #[test]
    fn draws_outside_an_element_are_dropped() {
        let mut canvas = LayeredCanvas::new();
        canvas.draw_line(Point::new(0, 0), Point::new(10, 0), Color::Black);
        canvas.present();
        assert_eq!(canvas.frame().count_on(), 0);
    }

    #[test]
    fn text_lands_inside_its_box() {
        let mut canvas = LayeredCanvas::new();
        canvas.set_text(ElementKind::Date, "12", Color::Black);
        canvas.present();

        let area = layout::DATE_BOX;
        let mut inside = 0;
        for y in 0..layout::SCREEN_HEIGHT {
            for x in 0..layout::SCREEN_WIDTH {
                if pixel(&canvas, x, y) {
                    assert!(x >= area.origin.x && x < area.origin.x + area.width as i16);
                    assert!(y >= area.origin.y && y < area.origin.y + area.height as i16);
                    inside += 1;
                }
            }
        }
        assert!(inside > 0);
    }
}
