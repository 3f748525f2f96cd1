use std::{
    fs::File,
    io::BufWriter,
    path::Path,
    process::ExitCode,
};

use classy_core::app::FaceApp;
use classy_hal_host::{
    clock::WallClock,
    render::{canvas::LayeredCanvas, frame::Frame},
    storage::{
        file_flash::{DEFAULT_CAPACITY, FileFlash},
        flash_record::FlashRecordStore,
    },
};
use env_logger::Env;
use log::{error, info, warn};

use config::HostConfig;
use events::HostEvent;

#[path = "main/config.rs"]
mod config;
#[path = "main/events.rs"]
mod events;

const DEFAULT_FLASH_PATH: &str = "classy-flash.bin";
const DEFAULT_SECONDS_SHOWN: bool = false;
const DEFAULT_TIME_TEXT: bool = false;

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = HostConfig::from_env();

    let flash = match FileFlash::open(&config.flash_path, DEFAULT_CAPACITY) {
        Ok(flash) => flash,
        Err(err) => {
            error!(
                "flash image {} unavailable: {:?}",
                config.flash_path.display(),
                err
            );
            return ExitCode::FAILURE;
        }
    };

    let lines = match events::spawn_stdin_reader() {
        Ok(lines) => lines,
        Err(err) => {
            error!("stdin reader failed to start: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let mut app = FaceApp::new(
        FlashRecordStore::new(flash),
        WallClock::new(),
        LayeredCanvas::new(),
        config.face,
    );

    let Some(now) = app.ticks().now_sample() else {
        error!("local time is out of range");
        return ExitCode::FAILURE;
    };

    info!(
        "Classy started: flash={} frame={:?} time_text={}",
        config.flash_path.display(),
        config.frame_path,
        config.face.render.time_text
    );

    app.start(now);

    let mut last_presented = 0;
    loop {
        let presented = app.surface().presented();
        if presented != last_presented {
            last_presented = presented;
            if let Some(path) = config.frame_path.as_deref() {
                write_snapshot(app.surface().frame(), path);
            }
        }

        match events::next_event(app.ticks(), &lines) {
            HostEvent::Face(event) => {
                app.handle(event);
            }
            HostEvent::Quit => break,
        }
    }

    app.stop();
    info!("Classy stopped");
    ExitCode::SUCCESS
}

fn write_snapshot(frame: &Frame, path: &Path) {
    let result = File::create(path).and_then(|file| frame.write_pbm(BufWriter::new(file)));
    if let Err(err) = result {
        warn!("frame snapshot {} failed: {}", path.display(), err);
    }
}
