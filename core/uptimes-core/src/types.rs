//! Core types for the uptimes history.
//!
//! These types are shared by the store, the ranking engine and the
//! formatter. A [`Database`] is the unit of persistence: two ranked lists
//! of [`SessionRecord`]s that are always written together.

use serde::{Deserialize, Serialize};

use crate::time::{self, SessionKey, Timestamp};

/// One process lifetime: when it booted and when it was last seen.
///
/// Serialized as the triple `[key, boot, end]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RecordTriple", into = "RecordTriple")]
pub struct SessionRecord {
    pub key: SessionKey,
    pub boot_time: Timestamp,
    pub end_time: Timestamp,
}

type RecordTriple = (SessionKey, f64, f64);

impl From<RecordTriple> for SessionRecord {
    fn from((key, boot, end): RecordTriple) -> Self {
        SessionRecord {
            key,
            boot_time: time::decode(boot),
            end_time: time::decode(end),
        }
    }
}

impl From<SessionRecord> for RecordTriple {
    fn from(record: SessionRecord) -> Self {
        (
            record.key,
            time::encode(record.boot_time),
            time::encode(record.end_time),
        )
    }
}

impl SessionRecord {
    /// Creates the first record for a session, seen at `end_time`.
    pub fn new(session: &CurrentSession, end_time: Timestamp) -> Self {
        SessionRecord {
            key: session.key.clone(),
            boot_time: session.boot_time,
            end_time,
        }
    }

    /// Uptime in seconds, derived from the record's own boot/end pair.
    pub fn duration_secs(&self) -> f64 {
        self.end_time.seconds_since(self.boot_time)
    }
}

/// The two ranked lists, persisted together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Database {
    /// Most recently seen sessions first.
    pub recency: Vec<SessionRecord>,
    /// Longest-running sessions first.
    pub duration: Vec<SessionRecord>,
}

impl Database {
    pub fn is_empty(&self) -> bool {
        self.recency.is_empty() && self.duration.is_empty()
    }

    pub fn list(&self, order: RankOrder) -> &[SessionRecord] {
        match order {
            RankOrder::Recency => &self.recency,
            RankOrder::Duration => &self.duration,
        }
    }
}

/// The live process: its boot time and the key derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentSession {
    pub boot_time: Timestamp,
    pub key: SessionKey,
}

impl CurrentSession {
    pub fn new(boot_time: Timestamp) -> Self {
        CurrentSession {
            key: SessionKey::from_boot(boot_time),
            boot_time,
        }
    }

    /// A session that booted right now. Used when tracking the calling process itself.
    pub fn starting_now() -> Self {
        Self::new(time::now())
    }
}

/// Which ordering a ranked list follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RankOrder {
    /// By end time, latest first.
    Recency,
    /// By end time minus boot time, longest first.
    Duration,
}

impl RankOrder {
    /// The value a list of this kind is sorted on, highest first.
    pub fn sort_value(self, record: &SessionRecord) -> f64 {
        match self {
            RankOrder::Recency => record.end_time.as_secs_f64(),
            RankOrder::Duration => record.duration_secs(),
        }
    }

    /// Title line for a rendered list of `count` records.
    pub fn title(self, count: usize) -> String {
        match self {
            RankOrder::Recency => format!("Last {} uptimes", count),
            RankOrder::Duration => format!("Top {} uptimes", count),
        }
    }
}

/// Which list `display` renders first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayOrder {
    #[default]
    RecencyFirst,
    DurationFirst,
}

impl DisplayOrder {
    pub fn lists(self) -> [RankOrder; 2] {
        match self {
            DisplayOrder::RecencyFirst => [RankOrder::Recency, RankOrder::Duration],
            DisplayOrder::DurationFirst => [RankOrder::Duration, RankOrder::Recency],
        }
    }
}
