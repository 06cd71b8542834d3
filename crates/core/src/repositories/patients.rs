//! The repository seam between domain logic and storage.

use crate::auth::StaffRole;
use crate::patient::PatientRecord;
use crate::TriageResult;
use serde::{Deserialize, Serialize};
use triage_types::PatientId;

/// Session markers kept alongside the patient collections: the logged-in
/// staff account, its role, and the patient id of the self-service view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_role: Option<StaffRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_patient_id: Option<PatientId>,
}

impl Session {
    pub fn is_staff(&self) -> bool {
        self.staff_id.is_some()
    }
}

/// Storage access for patient records.
///
/// A record is in exactly one of the active or archived sets. `archive`
/// moves it; archived records are read-only and `save` rejects them.
/// Concurrent writers are last-write-wins; there is deliberately no locking
/// or conflict detection (single-user execution model).
pub trait PatientRepository {
    /// All active records, in stored order.
    fn list(&self) -> TriageResult<Vec<PatientRecord>>;

    /// All discharged records, in stored order.
    fn list_archived(&self) -> TriageResult<Vec<PatientRecord>>;

    /// Looks up an active record by id.
    ///
    /// Fails with `ArchivedReadOnly` when the id is in the archive and
    /// `UnknownPatient` when it is in neither set.
    fn get(&self, id: &PatientId) -> TriageResult<PatientRecord>;

    /// Inserts or replaces an active record. Rejects ids already archived.
    fn save(&self, record: &PatientRecord) -> TriageResult<()>;

    /// Moves a record from the active set to the archive. Archiving an
    /// already-archived id is a no-op; an id in neither set is an error.
    fn archive(&self, id: &PatientId) -> TriageResult<()>;

    /// Current session markers; defaults when none are stored.
    fn session(&self) -> TriageResult<Session>;

    /// Replaces the session markers.
    fn store_session(&self, session: &Session) -> TriageResult<()>;
}
