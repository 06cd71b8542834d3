//! Fixed demonstration dataset.
//!
//! Loaded whenever the active collection is missing or cannot be parsed,
//! so the screens always have data to show. Recovery is silent apart from a
//! log line; storage corruption is never surfaced as a user error.

use crate::patient::{PatientRecord, ReevaluationRequest};
use crate::stage::Stage;
use crate::vitals::Vitals;
use crate::Priority;
use chrono::{DateTime, Duration, Utc};
use triage_types::PatientId;

fn seeded(
    id: &str,
    name: &str,
    age: u32,
    gender: &str,
    symptoms: &str,
    priority: Priority,
    registered_at: DateTime<Utc>,
    current_step: Stage,
    completed_steps: &[Stage],
    vitals: Vitals,
) -> PatientRecord {
    PatientRecord {
        // Seed ids are compile-time constants in the valid shape.
        id: PatientId::parse(id).expect("seed patient id is well-formed"),
        name: name.to_string(),
        age,
        gender: gender.to_string(),
        symptoms: symptoms.to_string(),
        priority,
        registered_at,
        wait_time: priority.intake_wait_label().to_string(),
        current_step,
        completed_steps: completed_steps.to_vec(),
        vitals,
        allergies: None,
        medications: None,
        reevaluation_request: None,
    }
}

/// The five demonstration patients, timestamped relative to `now`.
pub fn demonstration_patients(now: DateTime<Utc>) -> Vec<PatientRecord> {
    let mut patients = vec![
        seeded(
            "PS12345",
            "João Silva",
            45,
            "Masculino",
            "Dor no peito e falta de ar",
            Priority::Red,
            now - Duration::minutes(15),
            Stage::Consultation,
            &[Stage::Reception, Stage::Triage],
            Vitals {
                temperature: Some("37.8".into()),
                blood_pressure: Some("150/90".into()),
                heart_rate: Some("95".into()),
                oxygen_saturation: Some("94".into()),
                pain_level: Some("8".into()),
            },
        ),
        seeded(
            "PS67890",
            "Maria Oliveira",
            32,
            "Feminino",
            "Febre alta e dor de cabeça intensa",
            Priority::Orange,
            now - Duration::minutes(45),
            Stage::Triage,
            &[Stage::Reception],
            Vitals {
                temperature: Some("39.2".into()),
                blood_pressure: Some("120/80".into()),
                heart_rate: Some("88".into()),
                oxygen_saturation: Some("97".into()),
                pain_level: Some("7".into()),
            },
        ),
        seeded(
            "PS54321",
            "Pedro Santos",
            28,
            "Masculino",
            "Corte profundo no braço",
            Priority::Yellow,
            now - Duration::minutes(60),
            Stage::Waiting,
            &[Stage::Reception, Stage::Triage],
            Vitals {
                temperature: Some("36.5".into()),
                blood_pressure: Some("130/85".into()),
                heart_rate: Some("75".into()),
                oxygen_saturation: Some("98".into()),
                pain_level: Some("6".into()),
            },
        ),
        seeded(
            "PS24680",
            "Ana Souza",
            65,
            "Feminino",
            "Dor nas costas",
            Priority::Green,
            now - Duration::minutes(90),
            Stage::Waiting,
            &[Stage::Reception, Stage::Triage],
            Vitals::default(),
        ),
        seeded(
            "PS13579",
            "Carlos Ferreira",
            18,
            "Masculino",
            "Dor de garganta leve",
            Priority::Blue,
            now - Duration::minutes(120),
            Stage::Reception,
            &[Stage::Reception],
            Vitals::default(),
        ),
    ];

    // One pending reevaluation so the staff notification path has data.
    patients[1].reevaluation_request = Some(ReevaluationRequest {
        requested: true,
        reason: "Minha dor de cabeça piorou muito e estou com náuseas".into(),
        timestamp: now - Duration::minutes(10),
        seen: false,
    });

    patients
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_has_one_patient_per_priority() {
        let patients = demonstration_patients(Utc::now());
        assert_eq!(patients.len(), 5);
        for priority in Priority::ALL {
            assert!(patients.iter().any(|p| p.priority == priority));
        }
    }

    #[test]
    fn one_unseen_reevaluation_is_pending() {
        let patients = demonstration_patients(Utc::now());
        let pending = patients
            .iter()
            .filter(|p| {
                p.reevaluation_request
                    .as_ref()
                    .is_some_and(|r| r.requested && !r.seen)
            })
            .count();
        assert_eq!(pending, 1);
    }

    #[test]
    fn ids_are_unique_and_well_formed() {
        let patients = demonstration_patients(Utc::now());
        let mut ids: Vec<_> = patients.iter().map(|p| p.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }
}
