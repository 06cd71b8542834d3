//! Patient record storage.
//!
//! The domain logic never touches files directly; it goes through the
//! [`PatientRepository`] trait so the classifier and stage model stay
//! storage-agnostic and unit-testable. The shipped implementation is
//! [`JsonStore`], a key-per-file JSON layout with browser-storage-style
//! keys.

pub mod json_store;
pub mod patients;

pub use json_store::JsonStore;
pub use patients::{PatientRepository, Session};
