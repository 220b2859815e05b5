//! Resolves which session an invocation is about.

use clap::Args;
use uptimes_core::process;
use uptimes_core::{CurrentSession, Timestamp};

#[derive(Args, Debug, Clone, Default)]
pub struct SessionArgs {
    /// Process whose session to track (default: the parent process)
    #[arg(long, conflicts_with = "boot_time")]
    pub pid: Option<u32>,

    /// Boot time of the session, in seconds since the Unix epoch
    #[arg(long, value_name = "SECS")]
    pub boot_time: Option<f64>,
}

pub fn resolve(args: &SessionArgs) -> Result<CurrentSession, String> {
    if let Some(boot_time) = args.boot_time {
        if !boot_time.is_finite() || boot_time < 0.0 {
            return Err(format!("Invalid boot time: {}", boot_time));
        }
        return Ok(CurrentSession::new(Timestamp::from_secs_f64(boot_time)));
    }

    let pid = match args.pid {
        Some(pid) => pid,
        None => process::parent_pid().ok_or("Cannot determine parent process")?,
    };
    let boot_time = process::process_boot_time(pid)?;
    tracing::debug!(pid, boot = %boot_time, "Resolved session from process");
    Ok(CurrentSession::new(boot_time))
}
