//! Text rendering of the ranked lists.
//!
//! ```text
//! Last 2 uptimes
//!
//! Boot                Endtime                   Uptime This session
//! =================== =================== ============ ============
//! 2026-10-16 09:00:00 2026-10-16 17:30:12   0.08:30:12 <--
//! 2026-10-15 08:55:41 2026-10-15 18:02:03   0.09:06:22
//! ```
//!
//! Timestamp and duration rendering are injected as closures so callers can
//! swap in their own layouts without touching the table code.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::time::{SessionKey, Timestamp};
use crate::types::{RankOrder, SessionRecord};

pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const CURRENT_SESSION_MARKER: &str = "<--";

const SECS_PER_DAY: u64 = 86_400;
const SECS_PER_HOUR: u64 = 3_600;
const SECS_PER_MINUTE: u64 = 60;

/// Renders a decomposed duration.
pub type DurationFormatter = Box<dyn Fn(DurationParts) -> String + Send + Sync>;
/// Renders a stored timestamp as a human date/time.
pub type TimestampFormatter = Box<dyn Fn(Timestamp) -> String + Send + Sync>;

/// A duration split into days, hours, minutes and seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DurationParts {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl DurationParts {
    /// Splits whole seconds by successive division. Fractions are dropped;
    /// negative or non-finite input renders as zero.
    pub fn from_secs_f64(total: f64) -> Self {
        let total = if total.is_finite() && total > 0.0 {
            total.floor() as u64
        } else {
            0
        };
        Self::from_secs(total)
    }

    pub fn from_secs(total: u64) -> Self {
        let days = total / SECS_PER_DAY;
        let rem = total % SECS_PER_DAY;
        let hours = rem / SECS_PER_HOUR;
        let rem = rem % SECS_PER_HOUR;
        DurationParts {
            days,
            hours,
            minutes: rem / SECS_PER_MINUTE,
            seconds: rem % SECS_PER_MINUTE,
        }
    }
}

/// `3.04:05:06`
pub fn compact_duration(parts: DurationParts) -> String {
    format!(
        "{}.{:02}:{:02}:{:02}",
        parts.days, parts.hours, parts.minutes, parts.seconds
    )
}

/// `3 days, 4 hours, 5 minutes and 6 seconds`
pub fn wordy_duration(parts: DurationParts) -> String {
    fn unit(n: u64, name: &str) -> String {
        if n == 1 {
            format!("{} {}", n, name)
        } else {
            format!("{} {}s", n, name)
        }
    }
    format!(
        "{}, {}, {} and {}",
        unit(parts.days, "day"),
        unit(parts.hours, "hour"),
        unit(parts.minutes, "minute"),
        unit(parts.seconds, "second")
    )
}

/// Built-in duration layouts selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationStyle {
    #[default]
    Compact,
    Wordy,
}

impl DurationStyle {
    pub fn formatter(self) -> DurationFormatter {
        match self {
            DurationStyle::Compact => Box::new(compact_duration),
            DurationStyle::Wordy => Box::new(wordy_duration),
        }
    }
}

/// Formats timestamps in local time with a `strftime` pattern.
///
/// Values that are not representable, or a pattern chrono rejects, render as `?`.
pub fn strftime_timestamp(pattern: impl Into<String>) -> TimestampFormatter {
    let pattern = pattern.into();
    Box::new(move |timestamp| {
        let Some(local) = timestamp.to_local() else {
            return "?".to_string();
        };
        let mut out = String::new();
        match write!(out, "{}", local.format(&pattern)) {
            Ok(()) => out,
            Err(_) => "?".to_string(),
        }
    })
}

/// True when chrono can render `pattern`.
pub fn is_valid_timestamp_format(pattern: &str) -> bool {
    use chrono::format::{Item, StrftimeItems};
    !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}

#[derive(Clone, Copy)]
enum Align {
    Left,
    Right,
}

#[derive(Clone, Copy)]
enum Field {
    Boot,
    End,
    Uptime,
    Marker,
}

#[derive(Clone, Copy)]
struct Column {
    field: Field,
    title: &'static str,
    width: usize,
    align: Align,
}

const BOOT: Column = Column {
    field: Field::Boot,
    title: "Boot",
    width: 19,
    align: Align::Left,
};
const END: Column = Column {
    field: Field::End,
    title: "Endtime",
    width: 19,
    align: Align::Left,
};
const UPTIME: Column = Column {
    field: Field::Uptime,
    title: "Uptime",
    width: 12,
    align: Align::Right,
};
const THIS: Column = Column {
    field: Field::Marker,
    title: "This session",
    width: 12,
    align: Align::Left,
};

fn pad(value: &str, column: Column) -> String {
    match column.align {
        Align::Left => format!("{:<width$}", value, width = column.width),
        Align::Right => format!("{:>width$}", value, width = column.width),
    }
}

/// Renders ranked lists as text tables.
pub struct PresentationFormatter {
    duration: DurationFormatter,
    timestamp: TimestampFormatter,
    booted_first: bool,
}

impl Default for PresentationFormatter {
    fn default() -> Self {
        PresentationFormatter {
            duration: Box::new(compact_duration),
            timestamp: strftime_timestamp(DEFAULT_TIMESTAMP_FORMAT),
            booted_first: true,
        }
    }
}

impl PresentationFormatter {
    pub fn new(duration: DurationFormatter, timestamp: TimestampFormatter) -> Self {
        PresentationFormatter {
            duration,
            timestamp,
            booted_first: true,
        }
    }

    /// Puts the boot/end columns before the uptime column (the default).
    pub fn booted_first(mut self, booted_first: bool) -> Self {
        self.booted_first = booted_first;
        self
    }

    pub fn format_duration(&self, secs: f64) -> String {
        (self.duration)(DurationParts::from_secs_f64(secs))
    }

    pub fn format_timestamp(&self, timestamp: Timestamp) -> String {
        (self.timestamp)(timestamp)
    }

    fn data_columns(&self) -> [Column; 3] {
        if self.booted_first {
            [BOOT, END, UPTIME]
        } else {
            [UPTIME, BOOT, END]
        }
    }

    /// Renders `list` under `title`, marking the row whose key is `current`.
    pub fn render(&self, title: &str, list: &[SessionRecord], current: &SessionKey) -> String {
        let columns = self.data_columns();
        let mut out = String::new();

        out.push_str(title);
        out.push_str("\n\n");

        let heading: Vec<String> = columns
            .iter()
            .chain(std::iter::once(&THIS))
            .map(|c| pad(c.title, *c))
            .collect();
        out.push_str(heading.join(" ").trim_end());
        out.push('\n');

        let underline: Vec<String> = columns
            .iter()
            .chain(std::iter::once(&THIS))
            .map(|c| "=".repeat(c.width))
            .collect();
        out.push_str(&underline.join(" "));
        out.push('\n');

        for record in list {
            let cells: Vec<String> = columns
                .iter()
                .map(|column| {
                    let value = match column.field {
                        Field::Boot => self.format_timestamp(record.boot_time),
                        Field::End => self.format_timestamp(record.end_time),
                        Field::Uptime => self.format_duration(record.duration_secs()),
                        Field::Marker => String::new(),
                    };
                    pad(&value, *column)
                })
                .collect();
            let mut line = cells.join(" ");
            if &record.key == current {
                line.push(' ');
                line.push_str(CURRENT_SESSION_MARKER);
            }
            out.push_str(line.trim_end());
            out.push('\n');
        }

        out
    }

    /// Renders a ranked list with its standard title.
    pub fn render_ranked(
        &self,
        order: RankOrder,
        list: &[SessionRecord],
        current: &SessionKey,
    ) -> String {
        self.render(&order.title(list.len()), list, current)
    }
}
