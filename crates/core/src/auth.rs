//! Staff login against a static allow-list.
//!
//! Credentials are a fixed in-memory table; there is deliberately no
//! password hashing or account management here. A failed login is a single
//! retryable error, never fatal.

use crate::{TriageError, TriageResult};
use serde::{Deserialize, Serialize};

/// Role attached to a staff session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StaffRole {
    #[serde(rename = "medico")]
    Medico,
    #[serde(rename = "enfermeiro")]
    Enfermeiro,
}

impl StaffRole {
    pub fn as_str(self) -> &'static str {
        match self {
            StaffRole::Medico => "medico",
            StaffRole::Enfermeiro => "enfermeiro",
        }
    }
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fixed allow-list of staff accounts.
const ALLOW_LIST: [(&str, &str); 3] = [
    ("enfermeiro", "123456"),
    ("medico", "123456"),
    ("admin", "admin"),
];

/// Validates a username/password pair against the allow-list.
///
/// Returns the role for the session: "medico" for the medico account,
/// "enfermeiro" for everyone else.
pub fn authenticate(username: &str, password: &str) -> TriageResult<StaffRole> {
    let known = ALLOW_LIST
        .iter()
        .any(|(user, pass)| *user == username && *pass == password);

    if !known {
        return Err(TriageError::InvalidCredentials);
    }

    if username == "medico" {
        Ok(StaffRole::Medico)
    } else {
        Ok(StaffRole::Enfermeiro)
    }
}
