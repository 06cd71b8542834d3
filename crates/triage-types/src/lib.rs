/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// Errors that can occur when parsing a patient identifier.
#[derive(Debug, thiserror::Error)]
pub enum IdError {
    #[error("patient id must start with '{}'", PatientId::PREFIX)]
    BadPrefix,
    #[error("patient id must end with exactly {} digits", PatientId::DIGITS)]
    BadNumber,
}

/// A string type that guarantees non-empty content.
///
/// Wraps a `String` and ensures it contains at least one non-whitespace
/// character. The input is trimmed of leading and trailing whitespace during
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// Returns `Err(TextError::Empty)` if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// A patient lookup identifier: a fixed two-letter prefix followed by five
/// digits, e.g. `PS12345`.
///
/// Identifiers are handed to patients at intake and typed back in on the
/// self-service status screen, so parsing is lenient about surrounding
/// whitespace but strict about the shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PatientId(String);

impl PatientId {
    /// Fixed prefix for every patient identifier.
    pub const PREFIX: &'static str = "PS";
    /// Number of digits following the prefix.
    pub const DIGITS: usize = 5;

    /// Parses an identifier from user input.
    ///
    /// The input is trimmed; the prefix match is case-sensitive.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, IdError> {
        let trimmed = input.as_ref().trim();
        let digits = trimmed
            .strip_prefix(Self::PREFIX)
            .ok_or(IdError::BadPrefix)?;
        if digits.len() != Self::DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdError::BadNumber);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Builds an identifier from a five-digit number (10000..=99999).
    pub fn from_number(number: u32) -> Result<Self, IdError> {
        if !(10_000..=99_999).contains(&number) {
            return Err(IdError::BadNumber);
        }
        Ok(Self(format!("{}{}", Self::PREFIX, number)))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PatientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PatientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for PatientId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for PatientId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for PatientId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PatientId::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_and_rejects_blank() {
        assert_eq!(NonEmptyText::new("  Maria  ").unwrap().as_str(), "Maria");
        assert!(NonEmptyText::new("   ").is_err());
        assert!(NonEmptyText::new("").is_err());
    }

    #[test]
    fn patient_id_round_trips() {
        let id = PatientId::parse(" PS12345 ").unwrap();
        assert_eq!(id.as_str(), "PS12345");
        assert_eq!(id, PatientId::from_number(12345).unwrap());
    }

    #[test]
    fn patient_id_rejects_bad_shapes() {
        assert!(matches!(PatientId::parse("XX12345"), Err(IdError::BadPrefix)));
        assert!(matches!(PatientId::parse("PS1234"), Err(IdError::BadNumber)));
        assert!(matches!(PatientId::parse("PS123456"), Err(IdError::BadNumber)));
        assert!(matches!(PatientId::parse("PS12a45"), Err(IdError::BadNumber)));
        assert!(PatientId::from_number(9_999).is_err());
        assert!(PatientId::from_number(100_000).is_err());
    }

    #[test]
    fn patient_id_serde_uses_plain_string() {
        let id = PatientId::parse("PS54321").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"PS54321\"");
        let back: PatientId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
