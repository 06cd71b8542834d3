//! Vital signs and the priority classifier.
//!
//! The classifier is a pure, total decision table: ordered rules, first
//! match wins, no weighted scoring. Vitals arrive as free-form strings from
//! the intake form; anything malformed or absent resolves to the default in
//! [`VitalDefaults`] for that check and never fails.

use crate::Priority;
use serde::{Deserialize, Serialize};

/// Vital signs captured at intake, kept as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vitals {
    /// Body temperature in °C, e.g. "38.5".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<String>,
    /// Blood pressure as "systolic/diastolic", e.g. "120/80".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_pressure: Option<String>,
    /// Heart rate in bpm.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<String>,
    /// Oxygen saturation in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oxygen_saturation: Option<String>,
    /// Self-reported pain, 0-10.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pain_level: Option<String>,
}

/// Default values applied when a vital is absent or unparseable.
///
/// Centralised here so the classifier consumes one table instead of
/// scattering fallbacks through the rules.
#[derive(Debug, Clone)]
pub struct VitalDefaults {
    pub temperature: f64,
    pub blood_pressure: &'static str,
    pub heart_rate: i64,
    pub oxygen_saturation: i64,
    pub pain_level: i64,
}

impl Default for VitalDefaults {
    fn default() -> Self {
        Self {
            temperature: 36.5,
            blood_pressure: "120/80",
            heart_rate: 70,
            oxygen_saturation: 98,
            pain_level: 0,
        }
    }
}

/// Vitals after defaulting and numeric parsing, ready for the rules.
#[derive(Debug, Clone, Copy)]
struct ResolvedVitals {
    temperature: f64,
    systolic: i64,
    heart_rate: i64,
    oxygen_saturation: i64,
    pain_level: i64,
}

/// Leading-integer parse: takes the ASCII digit prefix of the trimmed input,
/// so "120/80" reads as 120 and "7 (forte)" as 7. `None` when the input does
/// not start with a digit.
fn int_prefix(input: &str) -> Option<i64> {
    let trimmed = input.trim();
    let digits: &str = {
        let end = trimmed
            .bytes()
            .position(|b| !b.is_ascii_digit())
            .unwrap_or(trimmed.len());
        &trimmed[..end]
    };
    digits.parse().ok()
}

fn int_or(value: Option<&String>, default: i64) -> i64 {
    value
        .map(|s| s.as_str())
        .filter(|s| !s.trim().is_empty())
        .and_then(int_prefix)
        .unwrap_or(default)
}

fn resolve(vitals: &Vitals, defaults: &VitalDefaults) -> ResolvedVitals {
    let temperature = vitals
        .temperature
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(defaults.temperature);

    let blood_pressure = vitals
        .blood_pressure
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(defaults.blood_pressure);
    let systolic = blood_pressure
        .split('/')
        .next()
        .and_then(int_prefix)
        .unwrap_or_else(|| {
            // Fall back to the default reading's systolic component.
            defaults
                .blood_pressure
                .split('/')
                .next()
                .and_then(int_prefix)
                .unwrap_or(120)
        });

    ResolvedVitals {
        temperature,
        systolic,
        heart_rate: int_or(vitals.heart_rate.as_ref(), defaults.heart_rate),
        oxygen_saturation: int_or(vitals.oxygen_saturation.as_ref(), defaults.oxygen_saturation),
        pain_level: int_or(vitals.pain_level.as_ref(), defaults.pain_level),
    }
}

/// Classify a patient with the standard defaults.
pub fn classify(vitals: &Vitals, has_emergency_signs: bool) -> Priority {
    classify_with(&VitalDefaults::default(), vitals, has_emergency_signs)
}

/// Classify a patient. Deterministic, total, no side effects.
///
/// Rules are evaluated in order, first match wins:
/// 1. explicit emergency signs
/// 2. temperature out of range
/// 3. systolic blood pressure out of range
/// 4. pain level bands
/// 5. oxygen saturation bands
/// 6. heart rate out of range
/// 7. default Green
pub fn classify_with(
    defaults: &VitalDefaults,
    vitals: &Vitals,
    has_emergency_signs: bool,
) -> Priority {
    if has_emergency_signs {
        return Priority::Red;
    }

    let v = resolve(vitals, defaults);

    if v.temperature > 39.5 || v.temperature < 35.0 {
        return Priority::Orange;
    }

    if v.systolic > 180 || v.systolic < 90 {
        return Priority::Orange;
    }

    if v.pain_level >= 8 {
        return Priority::Orange;
    } else if v.pain_level >= 5 {
        return Priority::Yellow;
    } else if v.pain_level >= 3 {
        return Priority::Green;
    }

    if v.oxygen_saturation < 92 {
        return Priority::Orange;
    } else if v.oxygen_saturation < 95 {
        return Priority::Yellow;
    }

    if v.heart_rate > 120 || v.heart_rate < 50 {
        return Priority::Yellow;
    }

    Priority::Green
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vitals() -> Vitals {
        Vitals::default()
    }

    #[test]
    fn emergency_signs_always_win() {
        // Normal vitals do not downgrade an explicit emergency flag.
        let v = Vitals {
            temperature: Some("37".into()),
            pain_level: Some("2".into()),
            ..vitals()
        };
        assert_eq!(classify(&v, true), Priority::Red);
    }

    #[test]
    fn normal_vitals_default_to_green() {
        assert_eq!(classify(&vitals(), false), Priority::Green);
    }

    #[test]
    fn fever_and_hypothermia_are_orange() {
        let hot = Vitals {
            temperature: Some("39.6".into()),
            ..vitals()
        };
        assert_eq!(classify(&hot, false), Priority::Orange);

        let cold = Vitals {
            temperature: Some("34.9".into()),
            ..vitals()
        };
        assert_eq!(classify(&cold, false), Priority::Orange);

        let borderline = Vitals {
            temperature: Some("39.5".into()),
            ..vitals()
        };
        assert_eq!(classify(&borderline, false), Priority::Green);
    }

    #[test]
    fn systolic_pressure_bands() {
        let high = Vitals {
            blood_pressure: Some("190/95".into()),
            ..vitals()
        };
        assert_eq!(classify(&high, false), Priority::Orange);

        let low = Vitals {
            blood_pressure: Some("85/60".into()),
            ..vitals()
        };
        assert_eq!(classify(&low, false), Priority::Orange);
    }

    #[test]
    fn pain_bands() {
        let severe = Vitals {
            pain_level: Some("8".into()),
            ..vitals()
        };
        assert_eq!(classify(&severe, false), Priority::Orange);

        let moderate = Vitals {
            pain_level: Some("5".into()),
            ..vitals()
        };
        assert_eq!(classify(&moderate, false), Priority::Yellow);

        let mild = Vitals {
            pain_level: Some("3".into()),
            ..vitals()
        };
        assert_eq!(classify(&mild, false), Priority::Green);
    }

    #[test]
    fn oxygen_bands() {
        let critical = Vitals {
            oxygen_saturation: Some("91".into()),
            ..vitals()
        };
        assert_eq!(classify(&critical, false), Priority::Orange);

        let low = Vitals {
            oxygen_saturation: Some("94".into()),
            ..vitals()
        };
        assert_eq!(classify(&low, false), Priority::Yellow);
    }

    #[test]
    fn heart_rate_out_of_range_is_yellow() {
        let fast = Vitals {
            heart_rate: Some("121".into()),
            ..vitals()
        };
        assert_eq!(classify(&fast, false), Priority::Yellow);

        let slow = Vitals {
            heart_rate: Some("49".into()),
            ..vitals()
        };
        assert_eq!(classify(&slow, false), Priority::Yellow);
    }

    #[test]
    fn rule_order_pain_beats_oxygen() {
        // Pain 5 fires before the SpO2 91 rule is reached.
        let v = Vitals {
            pain_level: Some("5".into()),
            oxygen_saturation: Some("91".into()),
            ..vitals()
        };
        assert_eq!(classify(&v, false), Priority::Yellow);
    }

    #[test]
    fn malformed_inputs_fall_back_to_defaults() {
        let v = Vitals {
            temperature: Some("quente".into()),
            blood_pressure: Some("alta".into()),
            heart_rate: Some("??".into()),
            oxygen_saturation: Some("".into()),
            pain_level: Some("n/a".into()),
        };
        assert_eq!(classify(&v, false), Priority::Green);
    }

    #[test]
    fn integer_vitals_take_the_leading_digit_prefix() {
        assert_eq!(int_prefix("120/80"), Some(120));
        assert_eq!(int_prefix(" 7 de 10"), Some(7));
        assert_eq!(int_prefix("x9"), None);
        assert_eq!(int_prefix(""), None);
    }

    #[test]
    fn classifier_is_total_over_arbitrary_strings() {
        let junk = ["", " ", "NaN", "-3", "9999999999999999999999", "36,5", "/"];
        for t in junk {
            for o in junk {
                let v = Vitals {
                    temperature: Some(t.into()),
                    blood_pressure: Some(o.into()),
                    heart_rate: Some(t.into()),
                    oxygen_saturation: Some(o.into()),
                    pain_level: Some(t.into()),
                };
                let priority = classify(&v, false);
                assert!(Priority::ALL.contains(&priority));
            }
        }
    }
}
