//! Process inspection helpers.
//!
//! The OS reports process start times with one-second resolution, so two
//! tracked processes started within the same second share a session key.
//! A tracker that watches its own process should use
//! [`CurrentSession::starting_now`](crate::CurrentSession::starting_now)
//! instead, which keeps the sub-second fraction.

use sysinfo::{Pid, ProcessRefreshKind, System};

use crate::error::{Result, UptimesError};
use crate::time::Timestamp;

/// Start time of `pid` in whole seconds since the epoch.
pub fn get_process_start_time(pid: u32) -> Option<u64> {
    let mut sys = System::new();
    let sys_pid = Pid::from(pid as usize);
    sys.refresh_process_specifics(sys_pid, ProcessRefreshKind::new());
    sys.process(sys_pid).map(|process| process.start_time())
}

/// Boot time of `pid` as a [`Timestamp`].
pub fn process_boot_time(pid: u32) -> Result<Timestamp> {
    get_process_start_time(pid)
        .map(Timestamp::from_unix_secs)
        .ok_or(UptimesError::ProcessNotFound(pid))
}

/// PID of the process that launched us (the shell or editor running a hook).
pub fn parent_pid() -> Option<u32> {
    let own = sysinfo::get_current_pid().ok()?;
    let mut sys = System::new();
    sys.refresh_process_specifics(own, ProcessRefreshKind::new());
    sys.process(own)
        .and_then(|process| process.parent())
        .map(|pid| pid.as_u32())
}

/// A process we may not signal (EPERM) still exists.
pub fn is_pid_alive(pid: u32) -> bool {
    #[cfg(unix)]
    {
        if unsafe { libc::kill(pid as i32, 0) } == 0 {
            return true;
        }
        std::io::Error::last_os_error().raw_os_error() == Some(libc::EPERM)
    }
    #[cfg(not(unix))]
    {
        get_process_start_time(pid).is_some()
    }
}
