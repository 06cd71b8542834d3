//! Intake form validation.
//!
//! Validation failures are collected per field and surfaced together, so a
//! form screen can show every inline message at once. They are never fatal;
//! the caller re-submits corrected input.

use crate::vitals::Vitals;
use triage_types::NonEmptyText;

/// Raw intake form as captured from the registration screen. Numeric fields
/// arrive as strings, exactly as typed.
#[derive(Debug, Clone, Default)]
pub struct IntakeForm {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub symptoms: String,
    pub vitals: Vitals,
    pub allergies: Option<String>,
    pub medications: Option<String>,
    pub has_emergency_signs: bool,
}

/// A validated intake, ready to become a patient record.
#[derive(Debug, Clone)]
pub struct Intake {
    pub name: NonEmptyText,
    pub age: u32,
    pub gender: NonEmptyText,
    pub symptoms: NonEmptyText,
    pub vitals: Vitals,
    pub allergies: Option<String>,
    pub medications: Option<String>,
    pub has_emergency_signs: bool,
}

/// One inline validation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All inline messages for one submission.
#[derive(Debug, Clone, Default)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation failed")?;
        for error in &self.errors {
            write!(f, "; {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validates an intake form, collecting every field problem.
///
/// Vitals are intentionally not validated here: the classifier treats
/// malformed vitals as absent and applies its own defaults.
pub fn validate_intake(form: IntakeForm) -> Result<Intake, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = NonEmptyText::new(&form.name)
        .map_err(|_| errors.push("name", "o nome é obrigatório"))
        .ok();

    let gender = NonEmptyText::new(&form.gender)
        .map_err(|_| errors.push("gender", "o gênero é obrigatório"))
        .ok();

    let symptoms = NonEmptyText::new(&form.symptoms)
        .map_err(|_| errors.push("symptoms", "descreva os sintomas"))
        .ok();

    let age = match form.age.trim().parse::<u32>() {
        Ok(age) if age > 0 => Some(age),
        _ => {
            errors.push("age", "a idade deve ser um número positivo");
            None
        }
    };

    match (name, age, gender, symptoms) {
        (Some(name), Some(age), Some(gender), Some(symptoms)) if errors.is_empty() => Ok(Intake {
            name,
            age,
            gender,
            symptoms,
            vitals: form.vitals,
            allergies: form.allergies.filter(|s| !s.trim().is_empty()),
            medications: form.medications.filter(|s| !s.trim().is_empty()),
            has_emergency_signs: form.has_emergency_signs,
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> IntakeForm {
        IntakeForm {
            name: "Maria Oliveira".into(),
            age: "32".into(),
            gender: "Feminino".into(),
            symptoms: "Febre alta".into(),
            ..IntakeForm::default()
        }
    }

    #[test]
    fn accepts_a_complete_form() {
        let intake = validate_intake(valid_form()).unwrap();
        assert_eq!(intake.name.as_str(), "Maria Oliveira");
        assert_eq!(intake.age, 32);
    }

    #[test]
    fn collects_every_field_error() {
        let form = IntakeForm {
            name: "  ".into(),
            age: "zero".into(),
            gender: String::new(),
            symptoms: String::new(),
            ..IntakeForm::default()
        };
        let errors = validate_intake(form).unwrap_err();
        let fields: Vec<_> = errors.errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["name", "gender", "symptoms", "age"]);
    }

    #[test]
    fn age_zero_is_rejected() {
        let mut form = valid_form();
        form.age = "0".into();
        let errors = validate_intake(form).unwrap_err();
        assert_eq!(errors.errors.len(), 1);
        assert_eq!(errors.errors[0].field, "age");
    }

    #[test]
    fn blank_optionals_become_none() {
        let mut form = valid_form();
        form.allergies = Some("  ".into());
        form.medications = Some("Dipirona".into());
        let intake = validate_intake(form).unwrap();
        assert!(intake.allergies.is_none());
        assert_eq!(intake.medications.as_deref(), Some("Dipirona"));
    }
}
