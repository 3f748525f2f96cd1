//! No-hardware collaborators used by tests and during bring-up.

use heapless::{String, Vec};

use crate::{
    layout::Point,
    render::{Color, ElementKind, FaceSurface, TEXT_BYTES},
    scheduler::{Granularity, TickSource},
    settings::RecordStore,
};

const MAX_RECORDS: usize = 4;
const RECORD_BYTES: usize = 32;
const MAX_TICK_CALLS: usize = 16;
const MAX_DRAW_CALLS: usize = 64;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MemoryStoreError {
    RecordTooLarge,
    StoreFull,
}

/// Volatile record store; settings survive only as long as the value.
#[derive(Clone, Debug, Default)]
pub struct MemoryRecordStore {
    records: Vec<(u32, Vec<u8, RECORD_BYTES>), MAX_RECORDS>,
    writes: u32,
}

impl MemoryRecordStore {
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
            writes: 0,
        }
    }

    /// Seeds a record without counting it as a write.
    pub fn preload(&mut self, key: u32, bytes: &[u8]) {
        let _ = self.store(key, bytes);
    }

    pub fn record(&self, key: u32) -> Option<&[u8]> {
        self.records
            .iter()
            .find(|(stored, _)| *stored == key)
            .map(|(_, bytes)| bytes.as_slice())
    }

    pub fn write_count(&self) -> u32 {
        self.writes
    }

    fn store(&mut self, key: u32, bytes: &[u8]) -> Result<(), MemoryStoreError> {
        let value = Vec::from_slice(bytes).map_err(|_| MemoryStoreError::RecordTooLarge)?;
        if let Some((_, existing)) = self.records.iter_mut().find(|(stored, _)| *stored == key) {
            *existing = value;
            return Ok(());
        }
        self.records
            .push((key, value))
            .map_err(|_| MemoryStoreError::StoreFull)
    }
}

impl RecordStore for MemoryRecordStore {
    type Error = MemoryStoreError;

    fn read_record(&mut self, key: u32, buf: &mut [u8]) -> Result<Option<usize>, Self::Error> {
        let Some(bytes) = self.record(key) else {
            return Ok(None);
        };
        let len = bytes.len().min(buf.len());
        buf[..len].copy_from_slice(&bytes[..len]);
        Ok(Some(len))
    }

    fn write_record(&mut self, key: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        self.store(key, bytes)?;
        self.writes = self.writes.saturating_add(1);
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TickCall {
    Subscribe(Granularity),
    Unsubscribe,
}

/// Tick source that only records subscription traffic.
#[derive(Clone, Debug, Default)]
pub struct RecordingTicks {
    calls: Vec<TickCall, MAX_TICK_CALLS>,
    active: u8,
}

impl RecordingTicks {
    pub const fn new() -> Self {
        Self {
            calls: Vec::new(),
            active: 0,
        }
    }

    pub fn calls(&self) -> &[TickCall] {
        &self.calls
    }

    /// Subscriptions currently open; never above one for a correct caller.
    pub fn active_subscriptions(&self) -> u8 {
        self.active
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl TickSource for RecordingTicks {
    fn subscribe(&mut self, granularity: Granularity) {
        let _ = self.calls.push(TickCall::Subscribe(granularity));
        self.active = self.active.saturating_add(1);
    }

    fn unsubscribe(&mut self) {
        let _ = self.calls.push(TickCall::Unsubscribe);
        self.active = self.active.saturating_sub(1);
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DrawCall {
    Begin(ElementKind),
    Remove(ElementKind),
    Background(Color),
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
        points: Vec<Point, 4>,
        color: Color,
    },
    Text {
        element: ElementKind,
        text: String<TEXT_BYTES>,
        color: Color,
    },
    Present,
}

/// Surface that keeps a log of every draw command.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    calls: Vec<DrawCall, MAX_DRAW_CALLS>,
}

impl RecordingSurface {
    pub const fn new() -> Self {
        Self { calls: Vec::new() }
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Last text set on `element`.
    pub fn text_of(&self, element: ElementKind) -> Option<&str> {
        self.calls.iter().rev().find_map(|call| match call {
            DrawCall::Text {
                element: target,
                text,
                ..
            } if *target == element => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn began(&self, element: ElementKind) -> bool {
        self.calls.contains(&DrawCall::Begin(element))
    }

    pub fn line_count(&self) -> usize {
        self.count(|call| matches!(call, DrawCall::Line { .. }))
    }

    pub fn polygon_count(&self) -> usize {
        self.count(|call| matches!(call, DrawCall::Polygon { .. }))
    }

    pub fn present_count(&self) -> usize {
        self.count(|call| matches!(call, DrawCall::Present))
    }

    fn count(&self, predicate: impl Fn(&DrawCall) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }

    fn record(&mut self, call: DrawCall) {
        let _ = self.calls.push(call);
    }
}

impl FaceSurface for RecordingSurface {
    fn begin_element(&mut self, element: ElementKind) {
        self.record(DrawCall::Begin(element));
    }

    fn remove_element(&mut self, element: ElementKind) {
        self.record(DrawCall::Remove(element));
    }

    fn fill_background(&mut self, color: Color) {
        self.record(DrawCall::Background(color));
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color) {
        self.record(DrawCall::Line { from, to, color });
    }

    fn fill_circle(&mut self, center: Point, radius: u8, color: Color) {
        self.record(DrawCall::Circle {
            center,
            radius,
            color,
        });
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        let points = points.iter().copied().take(4).collect();
        self.record(DrawCall::Polygon { points, color });
    }

    fn set_text(&mut self, element: ElementKind, text: &str, color: Color) {
        let mut owned = String::new();
        let _ = owned.push_str(text);
        self.record(DrawCall::Text {
            element,
            text: owned,
            color,
        });
    }

    fn present(&mut self) {
        self.record(DrawCall::Present);
    }
}
