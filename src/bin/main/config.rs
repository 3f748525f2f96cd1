use std::{env, path::PathBuf};

use classy_core::{
    app::FaceConfig,
    render::RenderOptions,
    settings::SettingsDefaults,
};
use log::warn;

use super::{DEFAULT_FLASH_PATH, DEFAULT_SECONDS_SHOWN, DEFAULT_TIME_TEXT};

const ENV_FLASH_PATH: &str = "CLASSY_FLASH_PATH";
const ENV_FRAME_PATH: &str = "CLASSY_FRAME_PATH";
const ENV_SECONDS_DEFAULT: &str = "CLASSY_SECONDS_DEFAULT";
const ENV_TIME_TEXT: &str = "CLASSY_TIME_TEXT";

pub(super) struct HostConfig {
    pub(super) flash_path: PathBuf,
    /// PBM snapshot rewritten after every presented frame.
    pub(super) frame_path: Option<PathBuf>,
    pub(super) face: FaceConfig,
}

impl HostConfig {
    pub(super) fn from_env() -> Self {
        let flash_path = env::var_os(ENV_FLASH_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FLASH_PATH));
        let frame_path = env::var_os(ENV_FRAME_PATH).map(PathBuf::from);

        let seconds_shown = env_flag(ENV_SECONDS_DEFAULT).unwrap_or(DEFAULT_SECONDS_SHOWN);
        let time_text = env_flag(ENV_TIME_TEXT).unwrap_or(DEFAULT_TIME_TEXT);

        let face = FaceConfig {
            defaults: if seconds_shown {
                SettingsDefaults::SECONDS_SHOWN
            } else {
                SettingsDefaults::BATTERY_SAVER
            },
            render: RenderOptions {
                time_text,
                ..RenderOptions::default()
            },
        };

        Self {
            flash_path,
            frame_path,
            face,
        }
    }
}

fn env_flag(name: &str) -> Option<bool> {
    let raw = env::var(name).ok()?;
    match parse_flag(&raw) {
        Some(value) => Some(value),
        None => {
            warn!("{}={:?} is not a flag; using the default", name, raw);
            None
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_accept_common_spellings() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag(" On "), Some(true));
        assert_eq!(parse_flag("false"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
