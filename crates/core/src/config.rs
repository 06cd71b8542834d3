//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into
//! core services. The intent is to avoid reading process-wide environment
//! variables during normal operations, which can lead to inconsistent
//! behaviour in test harnesses.

use crate::constants::{ARCHIVED_PATIENTS_FILE, DEFAULT_DATA_DIR, PATIENTS_FILE, SESSION_FILE};
use crate::{TriageError, TriageResult};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    submit_delay: Option<Duration>,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// `submit_delay` is an optional fixed pause applied before intake
    /// registration writes. It simulates the round-trip to a future server
    /// and has no cancellation path.
    pub fn new(data_dir: PathBuf, submit_delay: Option<Duration>) -> TriageResult<Self> {
        if data_dir.as_os_str().is_empty() {
            return Err(TriageError::InvalidInput(
                "data directory cannot be empty".into(),
            ));
        }

        Ok(Self {
            data_dir,
            submit_delay,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn submit_delay(&self) -> Option<Duration> {
        self.submit_delay
    }

    /// Path of the active patient collection.
    pub fn patients_path(&self) -> PathBuf {
        self.data_dir.join(PATIENTS_FILE)
    }

    /// Path of the archived patient collection.
    pub fn archived_path(&self) -> PathBuf {
        self.data_dir.join(ARCHIVED_PATIENTS_FILE)
    }

    /// Path of the session-marker file.
    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }
}

/// Resolve the data directory without reading environment variables.
///
/// If `override_dir` is provided it is used as-is; otherwise the default
/// directory name is resolved relative to the current working directory.
/// Callers that want an environment override (e.g. `TRIAGE_DATA_DIR`) read
/// it themselves and pass the value in.
pub fn resolve_data_dir(override_dir: Option<PathBuf>) -> PathBuf {
    override_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}
