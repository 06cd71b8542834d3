use crate::validation::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to create data directory: {0}")]
    DataDirCreation(std::io::Error),
    #[error("failed to write storage file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to serialize records: {0}")]
    Serialization(serde_json::Error),

    #[error("unknown patient id: {0}")]
    UnknownPatient(String),
    #[error("patient {0} has been discharged; archived records are read-only")]
    ArchivedReadOnly(String),
    #[error("patient {0} has no reevaluation request")]
    NoReevaluation(String),
    #[error("a reevaluation request is already pending review")]
    ReevaluationPending,
    #[error("could not allocate an unused patient id")]
    IdExhausted,

    #[error("unknown username or password")]
    InvalidCredentials,

    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Id(#[from] triage_types::IdError),
}

pub type TriageResult<T> = std::result::Result<T, TriageError>;
