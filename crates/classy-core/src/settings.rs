//! Persisted user settings and the store that owns them.

use core::fmt::Debug;

use log::{debug, info, warn};

/// Persistence key of the settings record.
pub const SETTINGS_RECORD_KEY: u32 = 1;

const RECORD_VERSION: u8 = 1;
const RECORD_LEN: usize = 2;
const FLAG_SECOND_TICK: u8 = 0x01;
const FLAG_INVERT_COLORS: u8 = 0x02;

/// User-tunable settings that survive restarts.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Settings {
    /// Per-second redraw with a second hand instead of per-minute redraw.
    pub second_tick_enabled: bool,
    /// Swap foreground and background for the whole face.
    pub invert_colors: bool,
}

impl Settings {
    pub const fn new(second_tick_enabled: bool, invert_colors: bool) -> Self {
        Self {
            second_tick_enabled,
            invert_colors,
        }
    }

    /// Returns a copy with every field present in `delta` replaced.
    pub const fn merged(self, delta: SettingsDelta) -> Self {
        Self {
            second_tick_enabled: match delta.second_tick_enabled {
                Some(value) => value,
                None => self.second_tick_enabled,
            },
            invert_colors: match delta.invert_colors {
                Some(value) => value,
                None => self.invert_colors,
            },
        }
    }

    pub fn encode(&self) -> [u8; RECORD_LEN] {
        let mut flags = 0u8;
        if self.second_tick_enabled {
            flags |= FLAG_SECOND_TICK;
        }
        if self.invert_colors {
            flags |= FLAG_INVERT_COLORS;
        }
        [RECORD_VERSION, flags]
    }

    /// Decodes a stored record; unknown versions read as no record.
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [RECORD_VERSION, flags, ..] => Some(Self {
                second_tick_enabled: flags & FLAG_SECOND_TICK != 0,
                invert_colors: flags & FLAG_INVERT_COLORS != 0,
            }),
            _ => None,
        }
    }
}

/// Partial update; `None` leaves the field unchanged.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SettingsDelta {
    pub second_tick_enabled: Option<bool>,
    pub invert_colors: Option<bool>,
}

impl SettingsDelta {
    pub const fn is_empty(&self) -> bool {
        self.second_tick_enabled.is_none() && self.invert_colors.is_none()
    }
}

/// First-run values, used whenever no valid record can be read.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SettingsDefaults {
    pub second_tick_enabled: bool,
    pub invert_colors: bool,
}

impl SettingsDefaults {
    /// Per-minute redraw keeps the display idle between minutes.
    pub const BATTERY_SAVER: Self = Self {
        second_tick_enabled: false,
        invert_colors: false,
    };

    pub const SECONDS_SHOWN: Self = Self {
        second_tick_enabled: true,
        invert_colors: false,
    };

    pub const fn settings(self) -> Settings {
        Settings::new(self.second_tick_enabled, self.invert_colors)
    }
}

impl Default for SettingsDefaults {
    fn default() -> Self {
        Self::BATTERY_SAVER
    }
}

/// Keyed byte-record persistence backend.
pub trait RecordStore {
    type Error: Debug;

    /// Copies the record into `buf` and returns its length, `None` when absent.
    fn read_record(&mut self, key: u32, buf: &mut [u8]) -> Result<Option<usize>, Self::Error>;
    fn write_record(&mut self, key: u32, bytes: &[u8]) -> Result<(), Self::Error>;
}

/// Owns the live settings and writes every change through to `R`.
pub struct SettingsStore<R: RecordStore> {
    backend: R,
    defaults: SettingsDefaults,
    current: Settings,
}

impl<R: RecordStore> SettingsStore<R> {
    pub fn new(backend: R, defaults: SettingsDefaults) -> Self {
        Self {
            backend,
            defaults,
            current: defaults.settings(),
        }
    }

    /// Restores the persisted record, falling back to defaults on any failure.
    pub fn load(&mut self) -> Settings {
        let mut buf = [0u8; 8];
        self.current = match self.backend.read_record(SETTINGS_RECORD_KEY, &mut buf) {
            Ok(Some(len)) => match Settings::decode(&buf[..len.min(buf.len())]) {
                Some(settings) => {
                    info!("settings restored: {:?}", settings);
                    settings
                }
                None => {
                    info!("unrecognized settings record; using defaults");
                    self.defaults.settings()
                }
            },
            Ok(None) => {
                info!("no saved settings; using defaults");
                self.defaults.settings()
            }
            Err(err) => {
                warn!("failed to read saved settings: {:?}; using defaults", err);
                self.defaults.settings()
            }
        };
        self.current
    }

    /// Merges `delta`, persists the full record and returns the result.
    pub fn apply(&mut self, delta: SettingsDelta) -> Settings {
        let next = self.current.merged(delta);
        debug!("settings {:?} + {:?} -> {:?}", self.current, delta, next);
        self.current = next;

        if let Err(err) = self
            .backend
            .write_record(SETTINGS_RECORD_KEY, &next.encode())
        {
            warn!("settings write failed: {:?}; change kept in memory", err);
        }

        next
    }

    pub fn current(&self) -> Settings {
        self.current
    }

    pub fn backend(&self) -> &R {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MemoryRecordStore;

    struct BrokenStore;

    impl RecordStore for BrokenStore {
        type Error = ();

        fn read_record(&mut self, _key: u32, _buf: &mut [u8]) -> Result<Option<usize>, ()> {
            Err(())
        }

        fn write_record(&mut self, _key: u32, _bytes: &[u8]) -> Result<(), ()> {
            Err(())
        }
    }

    #[test]
    fn first_run_uses_configured_defaults() {
        let mut store = SettingsStore::new(MemoryRecordStore::new(), SettingsDefaults::default());
        assert_eq!(store.load(), Settings::new(false, false));

        let mut store = SettingsStore::new(MemoryRecordStore::new(), SettingsDefaults::SECONDS_SHOWN);
        assert_eq!(store.load(), Settings::new(true, false));
    }

    #[test]
    fn partial_delta_keeps_other_field_and_writes_full_record() {
        let mut backend = MemoryRecordStore::new();
        backend.preload(SETTINGS_RECORD_KEY, &Settings::new(true, false).encode());
        let mut store = SettingsStore::new(backend, SettingsDefaults::default());
        store.load();

        let next = store.apply(SettingsDelta {
            invert_colors: Some(true),
            ..SettingsDelta::default()
        });

        assert_eq!(next, Settings::new(true, true));
        assert_eq!(store.backend().write_count(), 1);
        assert_eq!(
            store.backend().record(SETTINGS_RECORD_KEY),
            Some(&Settings::new(true, true).encode()[..])
        );
    }

    #[test]
    fn load_after_apply_returns_merged_record() {
        let mut store = SettingsStore::new(MemoryRecordStore::new(), SettingsDefaults::default());
        store.load();
        let applied = store.apply(SettingsDelta {
            second_tick_enabled: Some(true),
            invert_colors: None,
        });

        let mut reopened = SettingsStore::new(store.backend().clone(), SettingsDefaults::default());
        assert_eq!(reopened.load(), applied);
    }

    #[test]
    fn empty_delta_still_persists() {
        let mut store = SettingsStore::new(MemoryRecordStore::new(), SettingsDefaults::default());
        store.load();
        store.apply(SettingsDelta::default());
        assert_eq!(store.backend().write_count(), 1);
    }

    #[test]
    fn backend_failures_degrade_to_defaults_and_memory() {
        let mut store = SettingsStore::new(BrokenStore, SettingsDefaults::SECONDS_SHOWN);
        assert_eq!(store.load(), Settings::new(true, false));

        let next = store.apply(SettingsDelta {
            invert_colors: Some(true),
            ..SettingsDelta::default()
        });
        assert_eq!(next, Settings::new(true, true));
        assert_eq!(store.current(), next);
    }

    #[test]
    fn unknown_record_version_reads_as_absent() {
        let mut backend = MemoryRecordStore::new();
        backend.preload(SETTINGS_RECORD_KEY, &[9, 0x03]);
        let mut store = SettingsStore::new(backend, SettingsDefaults::default());
        assert_eq!(store.load(), Settings::new(false, false));
    }

    #[test]
    fn record_flags_encode_both_fields() {
        assert_eq!(Settings::new(false, false).encode(), [1, 0]);
        assert_eq!(Settings::new(true, true).encode(), [1, 0x03]);
        assert_eq!(Settings::decode(&[1, 0x02]), Some(Settings::new(false, true)));
        assert_eq!(Settings::decode(&[]), None);
    }
}
