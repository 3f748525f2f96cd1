//! Text form of the settings message: `SecondTick=1 InvertColors=false`.

use classy_core::{
    channel::{MessageValue, decode_delta},
    settings::SettingsDelta,
};
use log::warn;

pub fn parse_value(raw: &str) -> MessageValue<'_> {
    match raw {
        "true" => MessageValue::Bool(true),
        "false" => MessageValue::Bool(false),
        _ => match raw.parse::<i32>() {
            Ok(value) => MessageValue::Int(value),
            Err(_) => MessageValue::Text(raw),
        },
    }
}

/// Parses whitespace separated `key=value` pairs into a delta.
pub fn parse_settings_line(line: &str) -> SettingsDelta {
    let pairs = line.split_whitespace().filter_map(|token| {
        let pair = token.split_once('=');
        if pair.is_none() {
            warn!("settings line: ignoring token {:?} without '='", token);
        }
        pair.map(|(key, value)| (key, parse_value(value)))
    });
    decode_delta(pairs)
}
