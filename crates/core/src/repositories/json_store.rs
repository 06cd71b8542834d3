//! Key-per-file JSON storage.
//!
//! One JSON document per storage key under the configured data directory:
//! `patients.json`, `archivedPatients.json` and `session.json`. The keys and
//! document shapes follow the browser-storage convention, so a dump of those
//! keys loads unchanged.
//!
//! Parse failures are recovered, not surfaced: a malformed active
//! collection falls back to the demonstration dataset (and the fallback is
//! persisted), a malformed archive or session falls back to empty. Writes
//! are whole-file replacements, last write wins.

use crate::config::CoreConfig;
use crate::error::{TriageError, TriageResult};
use crate::patient::PatientRecord;
use crate::repositories::patients::{PatientRepository, Session};
use crate::seed;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use triage_types::PatientId;

/// File-backed patient store.
#[derive(Clone, Debug)]
pub struct JsonStore {
    cfg: Arc<CoreConfig>,
}

/// Outcome of reading one storage key.
enum Loaded<T> {
    Value(T),
    Missing,
    Malformed,
}

impl JsonStore {
    /// Opens the store, creating the data directory when needed.
    pub fn new(cfg: Arc<CoreConfig>) -> TriageResult<Self> {
        fs::create_dir_all(cfg.data_dir()).map_err(TriageError::DataDirCreation)?;
        Ok(Self { cfg })
    }

    fn read_key<T: DeserializeOwned>(&self, path: &Path) -> Loaded<T> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Loaded::Missing,
            Err(error) => {
                // Unreadable recovers the same way as unparseable.
                tracing::warn!("failed to read {}: {error}", path.display());
                return Loaded::Malformed;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(value) => Loaded::Value(value),
            Err(error) => {
                tracing::warn!(
                    "failed to parse {}: {error}; falling back to defaults",
                    path.display()
                );
                Loaded::Malformed
            }
        }
    }

    fn write_key<T: Serialize>(&self, path: &Path, value: &T) -> TriageResult<()> {
        let json = serde_json::to_string_pretty(value).map_err(TriageError::Serialization)?;
        fs::write(path, json).map_err(TriageError::FileWrite)
    }

    fn load_active(&self) -> TriageResult<Vec<PatientRecord>> {
        match self.read_key(&self.cfg.patients_path()) {
            Loaded::Value(patients) => Ok(patients),
            Loaded::Missing | Loaded::Malformed => {
                let patients = seed::demonstration_patients(Utc::now());
                self.write_key(&self.cfg.patients_path(), &patients)?;
                Ok(patients)
            }
        }
    }

    fn load_archived(&self) -> Vec<PatientRecord> {
        match self.read_key(&self.cfg.archived_path()) {
            Loaded::Value(patients) => patients,
            Loaded::Missing | Loaded::Malformed => Vec::new(),
        }
    }
}

impl PatientRepository for JsonStore {
    fn list(&self) -> TriageResult<Vec<PatientRecord>> {
        self.load_active()
    }

    fn list_archived(&self) -> TriageResult<Vec<PatientRecord>> {
        Ok(self.load_archived())
    }

    fn get(&self, id: &PatientId) -> TriageResult<PatientRecord> {
        if let Some(record) = self.load_active()?.into_iter().find(|p| p.id == *id) {
            return Ok(record);
        }
        if self.load_archived().iter().any(|p| p.id == *id) {
            return Err(TriageError::ArchivedReadOnly(id.to_string()));
        }
        Err(TriageError::UnknownPatient(id.to_string()))
    }

    fn save(&self, record: &PatientRecord) -> TriageResult<()> {
        if self.load_archived().iter().any(|p| p.id == record.id) {
            return Err(TriageError::ArchivedReadOnly(record.id.to_string()));
        }

        let mut patients = self.load_active()?;
        match patients.iter_mut().find(|p| p.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => patients.push(record.clone()),
        }
        self.write_key(&self.cfg.patients_path(), &patients)
    }

    fn archive(&self, id: &PatientId) -> TriageResult<()> {
        let mut archived = self.load_archived();
        if archived.iter().any(|p| p.id == *id) {
            return Ok(());
        }

        let mut patients = self.load_active()?;
        let position = patients
            .iter()
            .position(|p| p.id == *id)
            .ok_or_else(|| TriageError::UnknownPatient(id.to_string()))?;
        let record = patients.remove(position);

        archived.push(record);
        self.write_key(&self.cfg.archived_path(), &archived)?;
        self.write_key(&self.cfg.patients_path(), &patients)
    }

    fn session(&self) -> TriageResult<Session> {
        Ok(match self.read_key(&self.cfg.session_path()) {
            Loaded::Value(session) => session,
            Loaded::Missing | Loaded::Malformed => Session::default(),
        })
    }

    fn store_session(&self, session: &Session) -> TriageResult<()> {
        self.write_key(&self.cfg.session_path(), session)
    }
}
