//! Triage service: the operations behind the intake, dashboard and patient
//! status screens, composed over an injected [`PatientRepository`].
//!
//! Session handling (who is logged in) is a surface concern and stays with
//! the caller; this service only validates credentials and updates the
//! stored markers when asked.

use crate::auth::{self, StaffRole};
use crate::config::CoreConfig;
use crate::export;
use crate::patient::{PatientRecord, PatientUpdate, ReevaluationRequest};
use crate::repositories::{PatientRepository, Session};
use crate::stage::Stage;
use crate::validation::{validate_intake, IntakeForm};
use crate::{TriageError, TriageResult};
use chrono::Utc;
use rand::Rng;
use std::sync::Arc;
use triage_types::PatientId;

/// Dashboard statistics over the active census.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub active: usize,
    pub urgent: usize,
    pub waiting: usize,
    pub unseen_reevaluations: usize,
    pub average_wait_minutes: u32,
}

/// Thin service over a repository and the startup configuration.
#[derive(Clone)]
pub struct TriageService<R: PatientRepository> {
    repo: R,
    cfg: Arc<CoreConfig>,
}

impl<R: PatientRepository> TriageService<R> {
    pub fn new(repo: R, cfg: Arc<CoreConfig>) -> Self {
        Self { repo, cfg }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Registers a new patient: validates the form, classifies, allocates a
    /// fresh id and persists the record at reception.
    ///
    /// When a submit delay is configured it is applied before the write,
    /// simulating the round-trip to a future server.
    pub fn register(&self, form: IntakeForm) -> TriageResult<PatientRecord> {
        let intake = validate_intake(form)?;
        let id = self.allocate_id()?;
        let record = PatientRecord::from_intake(id, intake, Utc::now());

        if let Some(delay) = self.cfg.submit_delay() {
            std::thread::sleep(delay);
        }

        self.repo.save(&record)?;
        tracing::info!("registered patient {} as {}", record.id, record.priority);
        Ok(record)
    }

    /// Draws random five-digit ids until one is unused across both sets.
    fn allocate_id(&self) -> TriageResult<PatientId> {
        let mut taken: Vec<PatientId> =
            self.repo.list()?.into_iter().map(|p| p.id).collect();
        taken.extend(self.repo.list_archived()?.into_iter().map(|p| p.id));

        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let id = PatientId::from_number(rng.gen_range(10_000..=99_999))?;
            if !taken.contains(&id) {
                return Ok(id);
            }
        }
        Err(TriageError::IdExhausted)
    }

    /// Active census sorted by urgency, most urgent first; ties keep
    /// arrival order.
    pub fn list(&self) -> TriageResult<Vec<PatientRecord>> {
        let mut patients = self.repo.list()?;
        patients.sort_by_key(|p| (p.priority.urgency_rank(), p.registered_at));
        Ok(patients)
    }

    pub fn list_archived(&self) -> TriageResult<Vec<PatientRecord>> {
        self.repo.list_archived()
    }

    /// Dashboard search over name and id.
    pub fn search(&self, term: &str) -> TriageResult<Vec<PatientRecord>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|p| p.matches_search(term))
            .collect())
    }

    /// Patient lookup for the self-service status screen. Records the
    /// looked-up id as the current patient session marker.
    pub fn patient_login(&self, id: &PatientId) -> TriageResult<PatientRecord> {
        let record = self.repo.get(id)?;
        let mut session = self.repo.session()?;
        session.current_patient_id = Some(record.id.clone());
        self.repo.store_session(&session)?;
        Ok(record)
    }

    pub fn get(&self, id: &PatientId) -> TriageResult<PatientRecord> {
        self.repo.get(id)
    }

    /// Toggles one stage's completion for a patient and persists the result.
    /// A toggle that lands the current step on discharge archives the record,
    /// the same as an explicit discharge edit.
    pub fn toggle_step(&self, id: &PatientId, step: Stage) -> TriageResult<PatientRecord> {
        let mut record = self.repo.get(id)?;
        record.toggle_step(step);
        self.repo.save(&record)?;

        if record.is_discharged() {
            self.repo.archive(id)?;
            tracing::info!("patient {} discharged and archived", record.id);
        }
        Ok(record)
    }

    /// Applies a staff edit. Setting the current step to discharge moves the
    /// record to the archive, exactly once; archived records reject edits.
    pub fn edit(&self, id: &PatientId, update: &PatientUpdate) -> TriageResult<PatientRecord> {
        let mut record = self.repo.get(id)?;
        update.apply(&mut record);
        self.repo.save(&record)?;

        if record.is_discharged() {
            self.repo.archive(id)?;
            tracing::info!("patient {} discharged and archived", record.id);
        }
        Ok(record)
    }

    /// Patient-side reevaluation submission. Refused while an earlier
    /// request is pending and unseen; a fresh submission after staff have
    /// seen the last one overwrites it.
    pub fn submit_reevaluation(&self, id: &PatientId, reason: String) -> TriageResult<PatientRecord> {
        let mut record = self.repo.get(id)?;
        if !record.can_request_reevaluation() {
            return Err(TriageError::ReevaluationPending);
        }
        record.request_reevaluation(reason, Utc::now());
        self.repo.save(&record)?;
        Ok(record)
    }

    /// Staff viewing of a request: marks it seen and returns it.
    pub fn view_reevaluation(&self, id: &PatientId) -> TriageResult<ReevaluationRequest> {
        let mut record = self.repo.get(id)?;
        let request = record
            .mark_reevaluation_seen()
            .ok_or_else(|| TriageError::NoReevaluation(id.to_string()))?;
        self.repo.save(&record)?;
        Ok(request)
    }

    /// Active patients with a pending, unseen reevaluation request.
    pub fn pending_reevaluations(&self) -> TriageResult<Vec<PatientRecord>> {
        Ok(self
            .repo
            .list()?
            .into_iter()
            .filter(|p| !p.can_request_reevaluation())
            .collect())
    }

    pub fn stats(&self) -> TriageResult<DashboardStats> {
        let patients = self.repo.list()?;
        let active = patients.len();
        let urgent = patients.iter().filter(|p| p.priority.is_urgent()).count();
        let waiting = patients
            .iter()
            .filter(|p| p.current_step == Stage::Waiting)
            .count();
        let unseen_reevaluations = patients
            .iter()
            .filter(|p| !p.can_request_reevaluation())
            .count();
        let average_wait_minutes = if active == 0 {
            0
        } else {
            let total: u32 = patients
                .iter()
                .map(|p| p.priority.average_wait_minutes())
                .sum();
            (f64::from(total) / active as f64).round() as u32
        };

        Ok(DashboardStats {
            active,
            urgent,
            waiting,
            unseen_reevaluations,
            average_wait_minutes,
        })
    }

    /// CSV text over the full census, active then archived.
    pub fn export_csv(&self) -> TriageResult<String> {
        let active = self.repo.list()?;
        let archived = self.repo.list_archived()?;
        Ok(export::export_csv(&active, &archived))
    }

    /// Staff login: validates against the allow-list and stores the session
    /// markers.
    pub fn login(&self, username: &str, password: &str) -> TriageResult<StaffRole> {
        let role = auth::authenticate(username, password)?;
        let mut session = self.repo.session()?;
        session.staff_id = Some(username.to_string());
        session.staff_role = Some(role);
        self.repo.store_session(&session)?;
        Ok(role)
    }

    /// Clears the staff session markers.
    pub fn logout(&self) -> TriageResult<()> {
        let mut session = self.repo.session()?;
        session.staff_id = None;
        session.staff_role = None;
        self.repo.store_session(&session)
    }

    pub fn session(&self) -> TriageResult<Session> {
        self.repo.session()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::JsonStore;
    use crate::vitals::Vitals;
    use crate::Priority;
    use tempfile::TempDir;

    fn service(dir: &TempDir) -> TriageService<JsonStore> {
        let cfg = Arc::new(CoreConfig::new(dir.path().to_path_buf(), None).unwrap());
        let repo = JsonStore::new(Arc::clone(&cfg)).unwrap();
        TriageService::new(repo, cfg)
    }

    fn form(name: &str) -> IntakeForm {
        IntakeForm {
            name: name.into(),
            age: "40".into(),
            gender: "Feminino".into(),
            symptoms: "Tosse".into(),
            ..IntakeForm::default()
        }
    }

    #[test]
    fn register_allocates_a_fresh_id_at_reception() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir);
        let record = service.register(form("Nova Paciente")).unwrap();

        assert_eq!(record.current_step, Stage::Reception);
        assert!(record.id.as_str().starts_with("PS"));
        assert_eq!(service.list().unwrap().len(), 6);
        let ids: Vec<_> = service.list().unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids.iter().filter(|i| **i == record.id).count(), 1);
    }

    #[test]
    fn register_with_low_oxygen_is_orange() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir);
        let mut intake = form("Hipoxemia");
        intake.vitals = Vitals {
            oxygen_saturation: Some("91".into()),
            ..Vitals::default()
        };
        let record = service.register(intake).unwrap();
        assert_eq!(record.priority, Priority::Orange);
    }

    #[test]
    fn list_sorts_by_urgency() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir);
        let ranks: Vec<_> = service
            .list()
            .unwrap()
            .iter()
            .map(|p| p.priority.urgency_rank())
            .collect();
        let mut sorted = ranks.clone();
        sorted.sort_unstable();
        assert_eq!(ranks, sorted);
    }

    #[test]
    fn discharge_edit_archives_exactly_once() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir);
        let id = service.list().unwrap()[0].id.clone();

        let update = PatientUpdate {
            current_step: Some(Stage::Discharge),
            ..PatientUpdate::default()
        };
        let record = service.edit(&id, &update).unwrap();
        assert!(record.is_discharged());
        assert_eq!(service.list_archived().unwrap().len(), 1);

        // The record is now read-only.
        assert!(matches!(
            service.edit(&id, &PatientUpdate::default()),
            Err(TriageError::ArchivedReadOnly(_))
        ));
    }

    #[test]
    fn toggle_step_persists_the_transition() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir);
        let blue = PatientId::parse("PS13579").unwrap();

        // Seed record sits at reception with reception already completed.
        let record = service.toggle_step(&blue, Stage::Reception).unwrap();
        assert_eq!(record.current_step, Stage::Reception);
        let record = service.toggle_step(&blue, Stage::Reception).unwrap();
        assert_eq!(record.current_step, Stage::Triage);
        assert_eq!(service.get(&blue).unwrap().current_step, Stage::Triage);
    }

    #[test]
    fn toggle_into_discharge_archives_the_record() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir);
        let id = service.register(form("Percurso Completo")).unwrap().id;

        // Complete every stage up to medication; the last toggle advances
        // the current step into discharge.
        for step in [
            Stage::Reception,
            Stage::Triage,
            Stage::Waiting,
            Stage::Consultation,
        ] {
            service.toggle_step(&id, step).unwrap();
        }
        let record = service.toggle_step(&id, Stage::Medication).unwrap();
        assert!(record.is_discharged());
        assert_eq!(service.list_archived().unwrap().len(), 1);
        assert!(matches!(
            service.toggle_step(&id, Stage::Medication),
            Err(TriageError::ArchivedReadOnly(_))
        ));
    }

    #[test]
    fn reevaluation_submission_is_blocked_while_unseen() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir);
        let id = service.register(form("Reavaliação")).unwrap().id;

        service.submit_reevaluation(&id, "piorei".into()).unwrap();
        assert!(matches!(
            service.submit_reevaluation(&id, "piorei mais".into()),
            Err(TriageError::ReevaluationPending)
        ));

        let request = service.view_reevaluation(&id).unwrap();
        assert!(request.seen);
        assert_eq!(request.reason, "piorei");

        // Seen requests unblock a new cycle, and the new one overwrites.
        let record = service.submit_reevaluation(&id, "nova razão".into()).unwrap();
        let request = record.reevaluation_request.unwrap();
        assert_eq!(request.reason, "nova razão");
        assert!(!request.seen);
    }

    #[test]
    fn stats_cover_the_seeded_census() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir);
        let stats = service.stats().unwrap();
        assert_eq!(stats.active, 5);
        assert_eq!(stats.urgent, 2);
        assert_eq!(stats.waiting, 2);
        assert_eq!(stats.unseen_reevaluations, 1);
        // (0 + 10 + 30 + 60 + 120) / 5
        assert_eq!(stats.average_wait_minutes, 44);
    }

    #[test]
    fn login_round_trip_updates_the_session() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir);

        assert!(matches!(
            service.login("medico", "errada"),
            Err(TriageError::InvalidCredentials)
        ));

        let role = service.login("medico", "123456").unwrap();
        assert_eq!(role, StaffRole::Medico);
        let session = service.session().unwrap();
        assert_eq!(session.staff_id.as_deref(), Some("medico"));

        service.logout().unwrap();
        assert!(!service.session().unwrap().is_staff());
    }

    #[test]
    fn export_includes_archived_records() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir);
        let id = service.list().unwrap()[0].id.clone();
        service
            .edit(
                &id,
                &PatientUpdate {
                    current_step: Some(Stage::Discharge),
                    ..PatientUpdate::default()
                },
            )
            .unwrap();

        let csv = service.export_csv().unwrap();
        // Header + 4 active + 1 archived.
        assert_eq!(csv.lines().count(), 6);
        assert!(csv.contains(id.as_str()));
    }
}
