//! The fixed care pathway and its wait-time model.
//!
//! Six stages in a fixed order, a dense table of expected minutes per
//! (stage, priority), and the total transition functions [`advance`] and
//! [`retreat`] used when staff toggle stage completion. Completion is not
//! required to be a prefix of the order; corrections that re-order completed
//! steps are a legitimate workflow, not an error.

use crate::Priority;
use serde::{Deserialize, Serialize};

/// One step of the care pathway. Wire ids are the Portuguese stage ids
/// written to persisted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    #[serde(rename = "recepcao")]
    Reception,
    #[serde(rename = "triagem")]
    Triage,
    #[serde(rename = "espera")]
    Waiting,
    #[serde(rename = "consulta")]
    Consultation,
    #[serde(rename = "medicacao")]
    Medication,
    #[serde(rename = "alta")]
    Discharge,
}

/// The care pathway in visit order.
pub const CARE_PATHWAY: [Stage; 6] = [
    Stage::Reception,
    Stage::Triage,
    Stage::Waiting,
    Stage::Consultation,
    Stage::Medication,
    Stage::Discharge,
];

impl Stage {
    /// Position in the fixed order.
    pub fn index(self) -> usize {
        match self {
            Stage::Reception => 0,
            Stage::Triage => 1,
            Stage::Waiting => 2,
            Stage::Consultation => 3,
            Stage::Medication => 4,
            Stage::Discharge => 5,
        }
    }

    /// Wire id, as persisted.
    pub fn id(self) -> &'static str {
        match self {
            Stage::Reception => "recepcao",
            Stage::Triage => "triagem",
            Stage::Waiting => "espera",
            Stage::Consultation => "consulta",
            Stage::Medication => "medicacao",
            Stage::Discharge => "alta",
        }
    }

    /// Human label for screens and exports.
    pub fn label(self) -> &'static str {
        match self {
            Stage::Reception => "Recepção",
            Stage::Triage => "Triagem",
            Stage::Waiting => "Espera",
            Stage::Consultation => "Consulta",
            Stage::Medication => "Medicação",
            Stage::Discharge => "Alta",
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Stage::Discharge
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Stage {
    type Err = crate::TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "recepcao" | "reception" => Ok(Stage::Reception),
            "triagem" | "triage" => Ok(Stage::Triage),
            "espera" | "waiting" => Ok(Stage::Waiting),
            "consulta" | "consultation" => Ok(Stage::Consultation),
            "medicacao" | "medication" => Ok(Stage::Medication),
            "alta" | "discharge" => Ok(Stage::Discharge),
            other => Err(crate::TriageError::InvalidInput(format!(
                "unknown stage: {other}"
            ))),
        }
    }
}

/// Expected minutes spent at `stage` for a patient of `priority`.
///
/// Dense over every (stage, priority) pair; values follow the Manchester
/// protocol table used at intake.
pub fn expected_minutes(stage: Stage, priority: Priority) -> u32 {
    use Priority::*;
    match stage {
        Stage::Reception | Stage::Triage => match priority {
            Red => 0,
            Orange => 5,
            Yellow => 10,
            Green => 15,
            Blue => 20,
        },
        Stage::Waiting => match priority {
            Red => 5,
            Orange => 15,
            Yellow => 30,
            Green => 60,
            Blue => 120,
        },
        Stage::Consultation => 30,
        Stage::Medication => match priority {
            Red | Orange => 30,
            Yellow => 20,
            Green => 15,
            Blue => 10,
        },
        Stage::Discharge => 0,
    }
}

/// Expected minutes from the current stage through discharge: the current
/// stage plus every stage strictly after it in the fixed order.
pub fn total_minutes_to_discharge(current: Stage, priority: Priority) -> u32 {
    CARE_PATHWAY
        .iter()
        .skip(current.index())
        .map(|stage| expected_minutes(*stage, priority))
        .sum()
}

/// Human label for the total estimate shown on the patient status screen.
pub fn estimate_label(current: Stage, priority: Priority) -> String {
    if current.is_terminal() {
        return "Concluído".into();
    }
    let minutes = total_minutes_to_discharge(current, priority);
    if minutes == 0 {
        "Imediato".into()
    } else if minutes < 60 {
        format!("{minutes} minutos")
    } else {
        format!("{} hora(s) e {} minutos", minutes / 60, minutes % 60)
    }
}

/// Next current stage after `current` was marked complete: the first stage
/// strictly after it that is not in the completed set. Discharge is terminal,
/// so when nothing qualifies the stage is unchanged.
pub fn advance(current: Stage, completed: &[Stage]) -> Stage {
    CARE_PATHWAY
        .iter()
        .copied()
        .skip(current.index() + 1)
        .find(|stage| !completed.contains(stage))
        .unwrap_or(current)
}

/// Nearest stage strictly before `current` that is not in the completed set;
/// unchanged when every preceding stage is complete.
pub fn retreat(current: Stage, completed: &[Stage]) -> Stage {
    CARE_PATHWAY[..current.index()]
        .iter()
        .copied()
        .rev()
        .find(|stage| !completed.contains(stage))
        .unwrap_or(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_dense() {
        for stage in CARE_PATHWAY {
            for priority in Priority::ALL {
                // Must not panic for any pair; discharge is always free.
                let minutes = expected_minutes(stage, priority);
                if stage == Stage::Discharge {
                    assert_eq!(minutes, 0);
                }
            }
        }
    }

    #[test]
    fn red_patients_skip_the_queue() {
        assert_eq!(expected_minutes(Stage::Reception, Priority::Red), 0);
        assert_eq!(expected_minutes(Stage::Waiting, Priority::Red), 5);
        assert_eq!(expected_minutes(Stage::Waiting, Priority::Blue), 120);
    }

    #[test]
    fn total_sums_current_and_later_stages() {
        // Red at espera: 5 + 30 + 30 + 0
        assert_eq!(total_minutes_to_discharge(Stage::Waiting, Priority::Red), 65);
        assert_eq!(total_minutes_to_discharge(Stage::Discharge, Priority::Blue), 0);
    }

    #[test]
    fn estimate_labels() {
        assert_eq!(estimate_label(Stage::Discharge, Priority::Green), "Concluído");
        assert_eq!(estimate_label(Stage::Medication, Priority::Blue), "10 minutos");
        assert_eq!(
            estimate_label(Stage::Waiting, Priority::Red),
            "1 hora(s) e 5 minutos"
        );
    }

    #[test]
    fn advance_skips_completed_stages() {
        let completed = [Stage::Reception, Stage::Triage, Stage::Consultation];
        assert_eq!(advance(Stage::Triage, &completed), Stage::Waiting);
        // consulta already done, jump straight to medicacao
        assert_eq!(advance(Stage::Waiting, &completed), Stage::Medication);
    }

    #[test]
    fn advance_is_total_at_the_end() {
        assert_eq!(advance(Stage::Discharge, &[]), Stage::Discharge);
        let all: Vec<_> = CARE_PATHWAY.to_vec();
        assert_eq!(advance(Stage::Medication, &all), Stage::Medication);
    }

    #[test]
    fn retreat_finds_nearest_incomplete_predecessor() {
        let completed = [Stage::Triage];
        assert_eq!(retreat(Stage::Waiting, &completed), Stage::Reception);
        assert_eq!(retreat(Stage::Reception, &[]), Stage::Reception);
        let all_done = [Stage::Reception, Stage::Triage];
        assert_eq!(retreat(Stage::Waiting, &all_done), Stage::Waiting);
    }

    #[test]
    fn wire_ids_round_trip() {
        for stage in CARE_PATHWAY {
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(json, format!("\"{}\"", stage.id()));
            let back: Stage = serde_json::from_str(&json).unwrap();
            assert_eq!(back, stage);
        }
    }
}
