//! Event context for the watch face.
//!
//! [`FaceApp`] owns the settings store, the redraw scheduler, the renderer and
//! the drawing surface. Events are handed in one at a time through
//! [`FaceApp::handle`] and are fully processed before it returns, so a tick can
//! never observe a half-applied settings change.

use log::info;

use crate::{
    render::{DirtySet, ElementKind, FaceRenderer, FaceSurface, RenderOptions, SecondHandChange},
    scheduler::{RedrawScheduler, Subscription, TickSource},
    settings::{RecordStore, Settings, SettingsDefaults, SettingsDelta, SettingsStore},
    time::TimeSample,
};

/// Static configuration of a face instance.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FaceConfig {
    pub defaults: SettingsDefaults,
    pub render: RenderOptions,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FaceEvent {
    Tick(TimeSample),
    /// Settings change, with the current time when the sender has one.
    /// Without it the redraw uses the time of the latest tick.
    SettingsDelta(SettingsDelta, Option<TimeSample>),
}

pub struct FaceApp<R, T, S>
where
    R: RecordStore,
    T: TickSource,
    S: FaceSurface,
{
    settings: SettingsStore<R>,
    scheduler: RedrawScheduler<T>,
    renderer: FaceRenderer,
    surface: S,
    last_sample: Option<TimeSample>,
    running: bool,
}

impl<R, T, S> FaceApp<R, T, S>
where
    R: RecordStore,
    T: TickSource,
    S: FaceSurface,
{
    /// Builds the face and restores persisted settings.
    pub fn new(records: R, ticks: T, surface: S, config: FaceConfig) -> Self {
        let mut settings = SettingsStore::new(records, config.defaults);
        settings.load();

        Self {
            settings,
            scheduler: RedrawScheduler::new(ticks, config.render.time_text),
            renderer: FaceRenderer::new(config.render),
            surface,
            last_sample: None,
            running: false,
        }
    }

    pub fn settings(&self) -> Settings {
        self.settings.current()
    }

    pub fn subscription(&self) -> Subscription {
        self.scheduler.subscription()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn renderer(&self) -> &FaceRenderer {
        &self.renderer
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn ticks(&self) -> &T {
        self.scheduler.ticks()
    }

    pub fn ticks_mut(&mut self) -> &mut T {
        self.scheduler.ticks_mut()
    }

    pub fn records(&self) -> &R {
        self.settings.backend()
    }

    /// Subscribes to ticks and draws the whole face for `now`.
    pub fn start(&mut self, now: TimeSample) {
        if self.running {
            return;
        }

        let settings = self.settings.current();
        self.scheduler.start(&settings);
        self.renderer
            .render_full(&now, &settings, &mut self.surface);
        self.last_sample = Some(now);
        self.running = true;
        info!("face started with {:?}", settings);
    }

    /// Processes one event; returns the elements that were redrawn.
    pub fn handle(&mut self, event: FaceEvent) -> DirtySet {
        match event {
            FaceEvent::Tick(sample) => self.on_tick(sample),
            FaceEvent::SettingsDelta(delta, now) => self.on_settings_delta(delta, now),
        }
    }

    pub fn stop(&mut self) {
        if !self.running {
            return;
        }

        self.scheduler.stop();
        self.running = false;
        info!("face stopped");
    }
}

include!("runtime.rs");
