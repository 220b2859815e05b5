//! # uptimes-core
//!
//! Core library for uptimes: records when successive sessions of a
//! long-running process started and were last seen, keeps a bounded history
//! in one file, and ranks it two ways (most recent, longest running).
//!
//! ## Design Principles
//!
//! - **Synchronous**: every operation runs to completion; no async runtime.
//! - **Caller-driven**: the host decides when to save; nothing is scheduled here.
//! - **Graceful degradation**: a missing database is an empty history and a
//!   failed write is retried next cycle. Only a corrupt database is an error.
//! - **Lock-free sharing**: several processes may share one database with
//!   last-writer-wins semantics.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use uptimes_core::{CurrentSession, SessionTracker, StoragePaths, UptimesConfig};
//!
//! let paths = StoragePaths::from_home()?;
//! let config = uptimes_core::load_config(&paths.config_file())?;
//! let tracker = SessionTracker::from_config(&config, &paths, CurrentSession::starting_now());
//! tracker.save_now()?;
//! println!("{}", tracker.display()?);
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod process;
pub mod ranking;
pub mod storage;
pub mod store;
pub mod time;
pub mod tracker;
pub mod types;

pub use config::{load_config, AutoSaveConfig, DisplayConfig, UptimesConfig};
pub use error::{Result, UptimesError};
pub use format::{
    compact_duration, strftime_timestamp, wordy_duration, DurationFormatter, DurationParts,
    DurationStyle, PresentationFormatter, TimestampFormatter,
};
pub use ranking::{rank, update, update_database, DEFAULT_KEEP_COUNT};
pub use storage::StoragePaths;
pub use store::RecordStore;
pub use time::{SessionKey, Timestamp};
pub use tracker::{SaveOutcome, SaveReport, SessionTracker, TrackerOptions};
pub use types::{CurrentSession, Database, DisplayOrder, RankOrder, SessionRecord};
