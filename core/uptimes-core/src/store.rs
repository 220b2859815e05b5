//! File-backed persistence for the uptimes database.
//!
//! # File Format
//!
//! Two JSON arrays written back to back, recency list first, one per line.
//! Each element is a `[key, boot, end]` triple:
//!
//! ```text
//! [["1760601600.1234567",1760601600.1234567,1760605200.5]]
//! [["1760601600.1234567",1760601600.1234567,1760605200.5]]
//! ```
//!
//! There is no header or version tag. The lists are positional, so a file
//! that fails to parse is rejected as a whole rather than half-recovered.
//!
//! # Concurrency
//!
//! Several processes may share one database file. Nobody takes a lock:
//! reads are plain whole-file reads, and writes go to a temp file in the
//! same directory that is renamed over the target. A writer that loads,
//! merges and saves while another writer does the same can lose that
//! writer's update (last writer wins). The next save cycle of the losing
//! process puts its session back.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use fs_err as fs;
use serde_json::Deserializer;
use tempfile::NamedTempFile;

use crate::error::{Result, UptimesError};
use crate::types::{Database, SessionRecord};

/// Writes a serialized database to its final path.
type WriteFn = fn(&Path, &[u8]) -> std::io::Result<()>;

/// Reads and writes the [`Database`] at a fixed path.
#[derive(Clone)]
pub struct RecordStore {
    path: PathBuf,
    write: WriteFn,
}

impl fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        RecordStore {
            path: path.into(),
            write: replace_file,
        }
    }

    /// Same store with the final write step swapped out.
    #[cfg(test)]
    pub(crate) fn with_writer(path: impl Into<PathBuf>, write: WriteFn) -> Self {
        RecordStore {
            path: path.into(),
            write,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads both lists. A missing file is an empty database.
    pub fn load(&self) -> Result<Database> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Database::default());
            }
            Err(err) => {
                return Err(UptimesError::Io {
                    context: "Failed to read uptimes database".to_string(),
                    source: err,
                })
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            tracing::warn!(
                path = %self.path.display(),
                "Empty uptimes database, starting from an empty history"
            );
            return Ok(Database::default());
        }

        parse_database(&bytes).map_err(|details| UptimesError::CorruptDatabase {
            path: self.path.clone(),
            details,
        })
    }

    /// Rewrites the whole file with both lists.
    ///
    /// Every failure is reported as [`UptimesError::Persist`]; callers that
    /// run periodic saves treat it as contention and try again next cycle.
    pub fn save(&self, db: &Database) -> Result<()> {
        let buffer = serialize_database(db)?;
        (self.write)(&self.path, &buffer).map_err(|source| UptimesError::Persist {
            path: self.path.clone(),
            source,
        })
    }
}

/// Temp file in the target directory, renamed over `path`.
fn replace_file(path: &Path, buffer: &[u8]) -> std::io::Result<()> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let mut temp_file = NamedTempFile::new_in(parent_dir)?;
    temp_file.write_all(buffer)?;
    temp_file.flush()?;
    temp_file.persist(path).map_err(|err| err.error)?;
    Ok(())
}

fn serialize_database(db: &Database) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    for list in [&db.recency, &db.duration] {
        serde_json::to_writer(&mut buffer, list).map_err(|source| UptimesError::Json {
            context: "Failed to serialize uptimes list".to_string(),
            source,
        })?;
        buffer.push(b'\n');
    }
    Ok(buffer)
}

fn parse_database(bytes: &[u8]) -> std::result::Result<Database, String> {
    let mut lists = Deserializer::from_slice(bytes).into_iter::<Vec<SessionRecord>>();

    let recency = match lists.next() {
        Some(Ok(list)) => list,
        Some(Err(err)) => return Err(format!("recency list: {}", err)),
        None => return Err("recency list missing".to_string()),
    };
    let duration = match lists.next() {
        Some(Ok(list)) => list,
        Some(Err(err)) => return Err(format!("duration list: {}", err)),
        None => return Err("duration list missing".to_string()),
    };

    Ok(Database { recency, duration })
}
