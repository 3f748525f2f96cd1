impl<R, T, S> FaceApp<R, T, S>
where
    R: RecordStore,
    T: TickSource,
    S: FaceSurface,
{
    fn on_tick(&mut self, sample: TimeSample) -> DirtySet {
        self.last_sample = Some(sample);
        if !self.running {
            return DirtySet::EMPTY;
        }

        let dirty = self.scheduler.on_tick(&sample);
        let settings = self.settings.current();
        self.renderer
            .render(dirty, &sample, &settings, &mut self.surface);
        dirty
    }

    fn on_settings_delta(&mut self, delta: SettingsDelta, now: Option<TimeSample>) -> DirtySet {
        if now.is_some() {
            self.last_sample = now;
        }

        let previous = self.settings.current();
        let next = self.settings.apply(delta);
        if next != previous {
            info!("settings changed {:?} -> {:?}", previous, next);
        }

        if !self.running {
            return DirtySet::EMPTY;
        }

        self.scheduler.on_settings_changed(&next);

        let change = self
            .renderer
            .sync_second_hand(next.second_tick_enabled, &mut self.surface);

        let Some(sample) = self.last_sample else {
            return DirtySet::EMPTY;
        };

        let dirty = if next.invert_colors != previous.invert_colors {
            self.renderer.visible_elements()
        } else if change == SecondHandChange::Created {
            DirtySet::EMPTY.with(ElementKind::SecondHand)
        } else {
            DirtySet::EMPTY
        };

        if dirty.is_empty() {
            if change == SecondHandChange::Removed {
                self.surface.present();
            }
        } else {
            self.renderer
                .render(dirty, &sample, &next, &mut self.surface);
        }

        dirty
    }
}
