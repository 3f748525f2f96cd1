//! Settings-delta channel boundary.
//!
//! The companion configuration page sends key/value pairs. Each field is
//! validated on its own; an unknown key or a value of the wrong shape drops
//! only that field.

use log::warn;

use crate::settings::SettingsDelta;

pub const KEY_SECOND_TICK: &str = "SecondTick";
pub const KEY_INVERT_COLORS: &str = "InvertColors";

/// A single value as carried by the configuration message.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MessageValue<'a> {
    Bool(bool),
    Int(i32),
    Text(&'a str),
}

impl MessageValue<'_> {
    /// Toggles arrive as booleans or as integers (zero is off).
    pub fn as_flag(&self) -> Option<bool> {
        match *self {
            Self::Bool(value) => Some(value),
            Self::Int(value) => Some(value != 0),
            Self::Text(_) => None,
        }
    }
}

/// Folds message pairs into a delta; later duplicates win.
pub fn decode_delta<'a, I>(pairs: I) -> SettingsDelta
where
    I: IntoIterator<Item = (&'a str, MessageValue<'a>)>,
{
    let mut delta = SettingsDelta::default();

    for (key, value) in pairs {
        let slot = match key {
            KEY_SECOND_TICK => &mut delta.second_tick_enabled,
            KEY_INVERT_COLORS => &mut delta.invert_colors,
            _ => {
                warn!("settings message: ignoring unknown key {}", key);
                continue;
            }
        };

        match value.as_flag() {
            Some(flag) => *slot = Some(flag),
            None => warn!("settings message: ignoring malformed {} = {:?}", key, value),
        }
    }

    delta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_and_bool_toggles_are_accepted() {
        let delta = decode_delta([
            (KEY_SECOND_TICK, MessageValue::Int(1)),
            (KEY_INVERT_COLORS, MessageValue::Bool(false)),
        ]);
        assert_eq!(delta.second_tick_enabled, Some(true));
        assert_eq!(delta.invert_colors, Some(false));
    }

    #[test]
    fn absent_fields_stay_unchanged() {
        let delta = decode_delta([(KEY_INVERT_COLORS, MessageValue::Int(0))]);
        assert_eq!(delta.second_tick_enabled, None);
        assert_eq!(delta.invert_colors, Some(false));
    }

    #[test]
    fn malformed_field_is_dropped_alone() {
        let delta = decode_delta([
            (KEY_SECOND_TICK, MessageValue::Text("yes")),
            (KEY_INVERT_COLORS, MessageValue::Bool(true)),
            ("Vibrate", MessageValue::Int(1)),
        ]);
        assert_eq!(delta.second_tick_enabled, None);
        assert_eq!(delta.invert_colors, Some(true));
    }

    #[test]
    fn empty_message_yields_empty_delta() {
        let pairs: [(&str, MessageValue<'_>); 0] = [];
        assert!(decode_delta(pairs).is_empty());
    }
}
