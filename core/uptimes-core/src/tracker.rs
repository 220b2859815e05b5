//! Session tracker facade.
//!
//! A [`SessionTracker`] is built once at process start and holds everything
//! that stays fixed for the life of the process: the live session, the
//! database location and the display options. Hosts call
//! [`SessionTracker::save_now`] from their own timer and at shutdown; the
//! tracker never schedules anything itself.
//!
//! ## Error policy
//!
//! - A corrupt database fails the call, since neither list can be trusted.
//! - A failed write is logged and reported as [`SaveOutcome::Skipped`];
//!   the next save cycle catches up.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::config::UptimesConfig;
use crate::error::Result;
use crate::format::{wordy_duration, DurationParts, PresentationFormatter};
use crate::ranking::{self, DEFAULT_KEEP_COUNT};
use crate::storage::StoragePaths;
use crate::store::RecordStore;
use crate::time::{self, Timestamp};
use crate::types::{CurrentSession, Database, DisplayOrder};

/// Fixed settings for a tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerOptions {
    pub database: PathBuf,
    pub keep_count: usize,
    pub display_order: DisplayOrder,
}

impl TrackerOptions {
    pub fn new(database: impl Into<PathBuf>) -> Self {
        Self {
            database: database.into(),
            keep_count: DEFAULT_KEEP_COUNT,
            display_order: DisplayOrder::default(),
        }
    }

    pub fn from_config(config: &UptimesConfig, paths: &StoragePaths) -> Self {
        Self {
            database: config.database_path(paths),
            keep_count: config.keep_count,
            display_order: config.display.order,
        }
    }
}

/// Whether a save cycle reached the disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Skipped { reason: String },
}

/// Result of a save cycle: the merged database and whether it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveReport {
    pub database: Database,
    pub outcome: SaveOutcome,
}

impl SaveReport {
    pub fn persisted(&self) -> bool {
        self.outcome == SaveOutcome::Saved
    }
}

pub struct SessionTracker {
    store: RecordStore,
    current: CurrentSession,
    keep_count: usize,
    display_order: DisplayOrder,
    formatter: PresentationFormatter,
}

impl SessionTracker {
    pub fn new(
        options: TrackerOptions,
        current: CurrentSession,
        formatter: PresentationFormatter,
    ) -> Self {
        Self {
            store: RecordStore::new(options.database),
            current,
            keep_count: options.keep_count,
            display_order: options.display_order,
            formatter,
        }
    }

    pub fn from_config(
        config: &UptimesConfig,
        paths: &StoragePaths,
        current: CurrentSession,
    ) -> Self {
        Self::new(
            TrackerOptions::from_config(config, paths),
            current,
            config.formatter(),
        )
    }

    pub fn current(&self) -> &CurrentSession {
        &self.current
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Load, merge the live session at the current time, save.
    pub fn save_now(&self) -> Result<SaveReport> {
        self.save_at(time::now())
    }

    pub fn save_at(&self, now: Timestamp) -> Result<SaveReport> {
        let loaded = self.store.load()?;
        let database = ranking::update_database(loaded, &self.current, now, self.keep_count);

        let outcome = match self.store.save(&database) {
            Ok(()) => {
                debug!(
                    session = %self.current.key,
                    path = %self.store.path().display(),
                    "Uptimes saved"
                );
                SaveOutcome::Saved
            }
            Err(err) if err.is_write_contention() => {
                warn!(
                    error = %err,
                    session = %self.current.key,
                    "Uptimes save skipped; will retry next cycle"
                );
                SaveOutcome::Skipped {
                    reason: err.to_string(),
                }
            }
            Err(err) => return Err(err),
        };

        Ok(SaveReport { database, outcome })
    }

    /// Saves, then renders both lists in the configured order.
    pub fn display(&self) -> Result<String> {
        self.display_at(time::now())
    }

    pub fn display_at(&self, now: Timestamp) -> Result<String> {
        let report = self.save_at(now)?;
        let sections: Vec<String> = self
            .display_order
            .lists()
            .into_iter()
            .map(|order| {
                self.formatter
                    .render_ranked(order, report.database.list(order), &self.current.key)
            })
            .collect();
        Ok(sections.join("\n"))
    }

    /// Uptime of the live session at `now`. Does not touch the database.
    pub fn uptime_at(&self, now: Timestamp) -> DurationParts {
        DurationParts::from_secs_f64(now.seconds_since(self.current.boot_time))
    }

    /// Human-readable uptime of the live session.
    pub fn current_uptime(&self) -> String {
        wordy_duration(self.uptime_at(time::now()))
    }
}
