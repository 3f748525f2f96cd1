use std::{
    io::{self, BufRead},
    sync::mpsc::{self, Receiver, RecvTimeoutError, Sender},
    thread,
    time::Duration,
};

use classy_core::{app::FaceEvent, time::TimeSample};
use classy_hal_host::{clock::WallClock, settings_line::parse_settings_line};
use log::{debug, info, warn};

/// Added to every tick deadline so the wakeup lands past the boundary.
const TICK_SLACK: Duration = Duration::from_millis(5);

#[derive(Debug, Eq, PartialEq)]
pub(super) enum HostEvent {
    Face(FaceEvent),
    Quit,
}

/// Forwards stdin lines to the event loop; the channel closes at EOF.
pub(super) fn spawn_stdin_reader() -> io::Result<Receiver<String>> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("stdin".into())
        .spawn(move || {
            forward_lines(io::stdin().lock(), &tx);
            debug!("stdin closed");
        })?;
    Ok(rx)
}

/// Sends every UTF-8 line of `reader`; lines that are not UTF-8 are skipped.
/// Stops at EOF, on a read error, or when the receiver is gone.
fn forward_lines<R: BufRead>(mut reader: R, tx: &Sender<String>) {
    let mut raw = Vec::new();
    loop {
        raw.clear();
        match reader.read_until(b'\n', &mut raw) {
            Ok(0) => return,
            Ok(_) => {}
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => {
                warn!("stdin read failed: {}", err);
                return;
            }
        }

        let line = match std::str::from_utf8(&raw) {
            Ok(line) => line.trim_end_matches(['\n', '\r']).to_owned(),
            Err(_) => {
                warn!("ignoring input line that is not UTF-8 ({} bytes)", raw.len());
                continue;
            }
        };
        if tx.send(line).is_err() {
            return;
        }
    }
}

/// Blocks until the next tick is due or a command line arrives.
pub(super) fn next_event(clock: &WallClock, lines: &Receiver<String>) -> HostEvent {
    loop {
        let received = match clock.until_next_tick() {
            Some(wait) => lines.recv_timeout(wait + TICK_SLACK),
            None => lines.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match received {
            Ok(line) => {
                if let Some(event) = parse_command(&line, clock.now_sample()) {
                    return event;
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                if let Some(sample) = clock.now_sample() {
                    return HostEvent::Face(FaceEvent::Tick(sample));
                }
            }
            Err(RecvTimeoutError::Disconnected) => return HostEvent::Quit,
        }
    }
}

fn parse_command(line: &str, now: Option<TimeSample>) -> Option<HostEvent> {
    let line = line.trim();
    match line {
        "" => None,
        "quit" => Some(HostEvent::Quit),
        _ => {
            let delta = parse_settings_line(line);
            info!("settings message {:?}", delta);
            Some(HostEvent::Face(FaceEvent::SettingsDelta(delta, now)))
        }
    }
}
