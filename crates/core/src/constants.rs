//! Constants used throughout the triage core crate.
//!
//! This module contains storage key and export constants to ensure
//! consistency across the codebase and make maintenance easier.

/// Default directory for triage data storage when no explicit directory is configured.
pub const DEFAULT_DATA_DIR: &str = "triage_data";

/// Storage key for the active patient collection.
pub const PATIENTS_FILE: &str = "patients.json";

/// Storage key for discharged (archived) patients.
pub const ARCHIVED_PATIENTS_FILE: &str = "archivedPatients.json";

/// Storage key for the session markers (staff login, current patient).
pub const SESSION_FILE: &str = "session.json";

/// Literal written to CSV cells for missing optional fields.
pub const MISSING_FIELD: &str = "N/A";

/// Fixed CSV export header, in column order.
pub const CSV_HEADER: [&str; 13] = [
    "ID",
    "Nome",
    "Idade",
    "Gênero",
    "Sintomas",
    "Prioridade",
    "Data de Registro",
    "Etapa Atual",
    "Temperatura",
    "Pressão Arterial",
    "Freq. Cardíaca",
    "Saturação O₂",
    "Nível de Dor",
];
