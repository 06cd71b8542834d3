//! # Triage Core
//!
//! Core business logic for the emergency-department triage tracker:
//!
//! - Manchester-protocol priority classification from intake vitals
//! - The fixed six-stage care pathway and its wait-time model
//! - Patient records, reevaluation requests and the archive lifecycle
//! - Key-per-file JSON storage behind a repository trait
//!
//! **No surface concerns**: argument parsing, screens and session policy
//! belong in the `triage-cli` crate.

pub mod auth;
pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod patient;
pub mod priority;
pub mod repositories;
pub mod seed;
pub mod service;
pub mod stage;
pub mod validation;
pub mod vitals;

pub use config::CoreConfig;
pub use error::{TriageError, TriageResult};
pub use patient::{PatientRecord, PatientUpdate, ReevaluationRequest};
pub use priority::Priority;
pub use repositories::{JsonStore, PatientRepository, Session};
pub use service::{DashboardStats, TriageService};
pub use stage::Stage;
pub use vitals::{classify, VitalDefaults, Vitals};
