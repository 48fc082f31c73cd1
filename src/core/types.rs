use serde::{Deserialize, Serialize};

use crate::utils::validation::{validate_name, ValidationError};

/// Name of a reference database, as exposed to callers
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DatabaseName(String);

impl DatabaseName {
    /// Create a database name.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the name is empty, too long, or contains
    /// control characters.
    pub fn new(name: impl AsRef<str>) -> Result<Self, ValidationError> {
        validate_name(name.as_ref(), "database name").map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DatabaseName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The homology implementation that built a database and searches it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImplementationName {
    Last,
}

impl ImplementationName {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Last => "last",
        }
    }
}

impl std::fmt::Display for ImplementationName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Strand of an aligned sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strand {
    Forward,
    Reverse,
}

impl Strand {
    /// Parse the strand sign used in aligner output (`+` or `-`)
    pub fn from_sign(sign: &str) -> Option<Self> {
        match sign {
            "+" => Some(Self::Forward),
            "-" => Some(Self::Reverse),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_forward(self) -> bool {
        matches!(self, Self::Forward)
    }
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Forward => write!(f, "+"),
            Self::Reverse => write!(f, "-"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_name_trims() {
        let name = DatabaseName::new("  uniref50 ").unwrap();
        assert_eq!(name.as_str(), "uniref50");
        assert_eq!(name.to_string(), "uniref50");
    }

    #[test]
    fn test_database_name_rejects_empty() {
        assert!(matches!(
            DatabaseName::new("   "),
            Err(ValidationError::MissingName(_))
        ));
    }

    #[test]
    fn test_implementation_name() {
        assert_eq!(ImplementationName::Last.to_string(), "last");
        assert_eq!(
            serde_json::to_string(&ImplementationName::Last).unwrap(),
            "\"last\""
        );
    }

    #[test]
    fn test_strand_from_sign() {
        assert_eq!(Strand::from_sign("+"), Some(Strand::Forward));
        assert_eq!(Strand::from_sign("-"), Some(Strand::Reverse));
        assert_eq!(Strand::from_sign("x"), None);
        assert!(Strand::Forward.is_forward());
        assert!(!Strand::Reverse.is_forward());
    }
}
