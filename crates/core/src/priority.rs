//! Manchester-protocol urgency levels.
//!
//! Five colours ordered by clinical severity, Red highest. The wire labels
//! are the Portuguese colour names shown on the intake screens and written
//! to the CSV export.

use serde::{Deserialize, Serialize};

/// Manchester-protocol priority, most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "Vermelho")]
    Red,
    #[serde(rename = "Laranja")]
    Orange,
    #[serde(rename = "Amarelo")]
    Yellow,
    #[serde(rename = "Verde")]
    Green,
    #[serde(rename = "Azul")]
    Blue,
}

impl Priority {
    /// All priorities, most urgent first.
    pub const ALL: [Priority; 5] = [
        Priority::Red,
        Priority::Orange,
        Priority::Yellow,
        Priority::Green,
        Priority::Blue,
    ];

    /// Sort key: 0 is most urgent.
    pub fn urgency_rank(self) -> u8 {
        match self {
            Priority::Red => 0,
            Priority::Orange => 1,
            Priority::Yellow => 2,
            Priority::Green => 3,
            Priority::Blue => 4,
        }
    }

    /// The Portuguese colour label shown to users and written to exports.
    pub fn label(self) -> &'static str {
        match self {
            Priority::Red => "Vermelho",
            Priority::Orange => "Laranja",
            Priority::Yellow => "Amarelo",
            Priority::Green => "Verde",
            Priority::Blue => "Azul",
        }
    }

    /// Human wait-time label assigned at intake.
    pub fn intake_wait_label(self) -> &'static str {
        match self {
            Priority::Red => "Imediato",
            Priority::Orange => "10 minutos",
            Priority::Yellow => "30 minutos",
            Priority::Green => "1 hora",
            Priority::Blue => "2 horas",
        }
    }

    /// Nominal wait in minutes used for the dashboard average.
    pub fn average_wait_minutes(self) -> u32 {
        match self {
            Priority::Red => 0,
            Priority::Orange => 10,
            Priority::Yellow => 30,
            Priority::Green => 60,
            Priority::Blue => 120,
        }
    }

    /// Red and Orange cases count as urgent on the dashboard.
    pub fn is_urgent(self) -> bool {
        matches!(self, Priority::Red | Priority::Orange)
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Priority {
    type Err = crate::TriageError;

    /// Accepts the Portuguese label or the English colour name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vermelho" | "red" => Ok(Priority::Red),
            "laranja" | "orange" => Ok(Priority::Orange),
            "amarelo" | "yellow" => Ok(Priority::Yellow),
            "verde" | "green" => Ok(Priority::Green),
            "azul" | "blue" => Ok(Priority::Blue),
            other => Err(crate::TriageError::InvalidInput(format!(
                "unknown priority: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_orders_red_first() {
        let mut shuffled = [Priority::Blue, Priority::Red, Priority::Green, Priority::Orange, Priority::Yellow];
        shuffled.sort_by_key(|p| p.urgency_rank());
        assert_eq!(shuffled, Priority::ALL);
    }

    #[test]
    fn wire_labels_are_portuguese() {
        let json = serde_json::to_string(&Priority::Red).unwrap();
        assert_eq!(json, "\"Vermelho\"");
        let back: Priority = serde_json::from_str("\"Azul\"").unwrap();
        assert_eq!(back, Priority::Blue);
    }

    #[test]
    fn intake_wait_labels_match_protocol() {
        assert_eq!(Priority::Red.intake_wait_label(), "Imediato");
        assert_eq!(Priority::Blue.intake_wait_label(), "2 horas");
    }

    #[test]
    fn parses_both_naming_schemes() {
        assert_eq!("Laranja".parse::<Priority>().unwrap(), Priority::Orange);
        assert_eq!("yellow".parse::<Priority>().unwrap(), Priority::Yellow);
        assert!("roxo".parse::<Priority>().is_err());
    }

    #[test]
    fn urgency_covers_red_and_orange_only() {
        let urgent: Vec<_> = Priority::ALL.iter().filter(|p| p.is_urgent()).collect();
        assert_eq!(urgent.len(), 2);
    }
}
