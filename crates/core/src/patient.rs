//! Patient records and the mutations staff and patients perform on them.
//!
//! A record lives in the active set from intake until its current step is
//! set to discharge, at which point it moves to the archive and becomes
//! read-only. Completed steps are a set, not a prefix of the stage order:
//! staff correct mistakes by toggling stages in any order.

use crate::stage::{self, Stage};
use crate::validation::Intake;
use crate::vitals::{classify, Vitals};
use crate::Priority;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use triage_types::PatientId;

/// A patient-initiated request for re-assessment.
///
/// At most one request exists per patient; submitting again overwrites the
/// previous reason and timestamp, no history is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReevaluationRequest {
    pub requested: bool,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
    pub seen: bool,
}

/// One emergency-department patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    pub id: PatientId,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub symptoms: String,
    pub priority: Priority,
    pub registered_at: DateTime<Utc>,
    /// Human wait-time label assigned at intake, e.g. "Imediato".
    pub wait_time: String,
    pub current_step: Stage,
    #[serde(default)]
    pub completed_steps: Vec<Stage>,
    #[serde(flatten)]
    pub vitals: Vitals,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medications: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reevaluation_request: Option<ReevaluationRequest>,
}

impl PatientRecord {
    /// Builds a new record from a validated intake. The priority is computed
    /// by the classifier; the record starts at reception with nothing
    /// completed.
    pub fn from_intake(id: PatientId, intake: Intake, now: DateTime<Utc>) -> Self {
        let priority = classify(&intake.vitals, intake.has_emergency_signs);
        Self {
            id,
            name: intake.name.into_inner(),
            age: intake.age,
            gender: intake.gender.into_inner(),
            symptoms: intake.symptoms.into_inner(),
            priority,
            registered_at: now,
            wait_time: priority.intake_wait_label().to_string(),
            current_step: Stage::Reception,
            completed_steps: Vec::new(),
            vitals: intake.vitals,
            allergies: intake.allergies,
            medications: intake.medications,
            reevaluation_request: None,
        }
    }

    pub fn is_discharged(&self) -> bool {
        self.current_step.is_terminal()
    }

    fn is_completed(&self, step: Stage) -> bool {
        self.completed_steps.contains(&step)
    }

    /// Toggles a stage's completion, moving the current step when needed.
    ///
    /// Marking: the step joins the completed set; if it was the current
    /// step, the current step advances to the next stage not yet completed
    /// (discharge is terminal, so it may stay put).
    ///
    /// Unmarking: the step leaves the set; the current step rewinds when the
    /// unmarked stage is the current step itself, or when it is the nearest
    /// incomplete stage before the current step (so that marking and
    /// immediately unmarking restores the record exactly). Unmarking a stage
    /// ahead of the current step never moves it.
    pub fn toggle_step(&mut self, step: Stage) {
        if let Some(pos) = self.completed_steps.iter().position(|s| *s == step) {
            self.completed_steps.remove(pos);
            if step == self.current_step {
                self.current_step = stage::retreat(step, &self.completed_steps);
            } else if step.index() < self.current_step.index()
                && !self.is_completed(self.current_step)
                && stage::retreat(self.current_step, &self.completed_steps) == step
            {
                self.current_step = step;
            }
        } else {
            self.completed_steps.push(step);
            if step == self.current_step {
                self.current_step = stage::advance(step, &self.completed_steps);
            }
        }
    }

    /// Whether the patient may submit a reevaluation request right now.
    /// Blocked while an earlier request is pending and unseen.
    pub fn can_request_reevaluation(&self) -> bool {
        !matches!(
            &self.reevaluation_request,
            Some(request) if request.requested && !request.seen
        )
    }

    /// Records a reevaluation request, overwriting any previous one.
    pub fn request_reevaluation(&mut self, reason: String, now: DateTime<Utc>) {
        self.reevaluation_request = Some(ReevaluationRequest {
            requested: true,
            reason,
            timestamp: now,
            seen: false,
        });
    }

    /// Marks the pending request as seen by staff. Returns the request, or
    /// `None` when there is nothing to view.
    pub fn mark_reevaluation_seen(&mut self) -> Option<ReevaluationRequest> {
        let request = self.reevaluation_request.as_mut()?;
        request.seen = true;
        Some(request.clone())
    }

    /// Expected minutes at the current step for this patient's priority.
    pub fn current_step_minutes(&self) -> u32 {
        stage::expected_minutes(self.current_step, self.priority)
    }

    /// Human label for the total time estimate through discharge.
    pub fn estimate_label(&self) -> String {
        stage::estimate_label(self.current_step, self.priority)
    }

    /// Case-insensitive match on name or id, as the dashboard search box does.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term)
            || self.id.as_str().to_lowercase().contains(&term)
    }
}

/// A staff edit. `None` fields are left untouched; `registered_at` is never
/// editable.
#[derive(Debug, Clone, Default)]
pub struct PatientUpdate {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub symptoms: Option<String>,
    pub priority: Option<Priority>,
    pub current_step: Option<Stage>,
    pub vitals: Vitals,
    pub allergies: Option<String>,
    pub medications: Option<String>,
}

impl PatientUpdate {
    pub fn apply(&self, record: &mut PatientRecord) {
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(age) = self.age {
            record.age = age;
        }
        if let Some(gender) = &self.gender {
            record.gender = gender.clone();
        }
        if let Some(symptoms) = &self.symptoms {
            record.symptoms = symptoms.clone();
        }
        if let Some(priority) = self.priority {
            record.priority = priority;
            record.wait_time = priority.intake_wait_label().to_string();
        }
        if let Some(step) = self.current_step {
            record.current_step = step;
        }
        if self.vitals.temperature.is_some() {
            record.vitals.temperature = self.vitals.temperature.clone();
        }
        if self.vitals.blood_pressure.is_some() {
            record.vitals.blood_pressure = self.vitals.blood_pressure.clone();
        }
        if self.vitals.heart_rate.is_some() {
            record.vitals.heart_rate = self.vitals.heart_rate.clone();
        }
        if self.vitals.oxygen_saturation.is_some() {
            record.vitals.oxygen_saturation = self.vitals.oxygen_saturation.clone();
        }
        if self.vitals.pain_level.is_some() {
            record.vitals.pain_level = self.vitals.pain_level.clone();
        }
        if let Some(allergies) = &self.allergies {
            record.allergies = Some(allergies.clone());
        }
        if let Some(medications) = &self.medications {
            record.medications = Some(medications.clone());
        }
    }
}
