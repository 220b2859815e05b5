//! Auto-save loop.
//!
//! Saves every interval while auto-save is enabled, and once more when the
//! loop stops (Ctrl-C, or the watched process exiting). Without `--pid` the
//! watcher tracks itself, so its session key keeps sub-second precision.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{error, info};
use uptimes_core::process::{is_pid_alive, process_boot_time};
use uptimes_core::{CurrentSession, SessionTracker};

use crate::context::Context;
use crate::shutdown::{StopSignal, Wake};

const PID_POLL_INTERVAL: Duration = Duration::from_secs(1);

pub fn run(ctx: &Context, pid: Option<u32>, interval: Option<u64>) -> Result<(), String> {
    let current = match pid {
        Some(pid) => CurrentSession::new(process_boot_time(pid)?),
        None => CurrentSession::starting_now(),
    };
    let tracker = ctx.tracker(current);

    let interval = match interval {
        Some(0) => return Err("Interval must be a positive number of seconds".to_string()),
        Some(secs) => Duration::from_secs(secs),
        None => ctx.config.auto_save_interval(),
    };
    let auto_save = ctx.config.auto_save.enabled;

    let signal = Arc::new(StopSignal::new());
    let handler_signal = Arc::clone(&signal);
    ctrlc::set_handler(move || handler_signal.request_stop())
        .map_err(|e| format!("Failed to install Ctrl-C handler: {}", e))?;

    info!(
        session = %tracker.current().key,
        database = %tracker.store().path().display(),
        interval_secs = interval.as_secs(),
        auto_save,
        "Watching session"
    );

    run_loop(&tracker, &signal, pid, interval, auto_save);

    info!(session = %tracker.current().key, "Final save before exit");
    tracker.save_now()?;
    Ok(())
}

fn run_loop(
    tracker: &SessionTracker,
    signal: &StopSignal,
    pid: Option<u32>,
    interval: Duration,
    auto_save: bool,
) {
    if auto_save {
        save_cycle(tracker);
    }

    let step = if pid.is_some() {
        interval.min(PID_POLL_INTERVAL)
    } else {
        interval
    };
    let mut last_save = Instant::now();

    while signal.sleep(step) == Wake::Elapsed {
        if let Some(pid) = pid {
            if !is_pid_alive(pid) {
                info!(pid, "Watched process exited");
                return;
            }
        }
        if auto_save && last_save.elapsed() >= interval {
            save_cycle(tracker);
            last_save = Instant::now();
        }
    }
}

/// Periodic saves never stop the loop; failures are reported and retried.
fn save_cycle(tracker: &SessionTracker) {
    if let Err(err) = tracker.save_now() {
        error!(error = %err, "Periodic uptimes save failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use uptimes_core::{PresentationFormatter, RecordStore, TrackerOptions};

    fn tracker(path: std::path::PathBuf) -> SessionTracker {
        SessionTracker::new(
            TrackerOptions::new(path),
            CurrentSession::starting_now(),
            PresentationFormatter::default(),
        )
    }

    #[test]
    fn loop_saves_immediately_and_stops_on_signal() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let path = temp_dir.path().join("uptimes.json");
        let tracker = tracker(path.clone());
        let signal = Arc::new(StopSignal::new());

        let trigger = Arc::clone(&signal);
        let stopper = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            trigger.request_stop();
        });

        run_loop(&tracker, &signal, None, Duration::from_secs(60), true);
        stopper.join().unwrap();

        let db = RecordStore::new(&path).load().expect("load");
        assert_eq!(db.recency.len(), 1);
        assert_eq!(db.recency[0].key, tracker.current().key);
    }

    #[test]
    fn loop_without_auto_save_writes_nothing() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let path = temp_dir.path().join("uptimes.json");
        let tracker = tracker(path.clone());
        let signal = StopSignal::new();
        signal.request_stop();

        run_loop(&tracker, &signal, None, Duration::from_secs(60), false);
        assert!(!path.exists());
    }

    #[test]
    fn loop_survives_corrupt_database() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let path = temp_dir.path().join("uptimes.json");
        fs_err::write(&path, "garbage").expect("write");
        let tracker = tracker(path.clone());
        let signal = StopSignal::new();
        signal.request_stop();

        run_loop(&tracker, &signal, None, Duration::from_secs(60), true);
        assert_eq!(fs_err::read_to_string(&path).expect("read"), "garbage");
    }
}
