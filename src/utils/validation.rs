//! Centralized validation helpers.

/// Maximum length of user-supplied names (database names and similar)
pub const MAX_NAME_LENGTH: usize = 256;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing {0}")]
    MissingName(String),
    #[error("{0} exceeds maximum length of {MAX_NAME_LENGTH}")]
    NameTooLong(String),
    #[error("{0} contains control characters")]
    ControlCharacters(String),
}

/// Validate a user-supplied name and return it trimmed.
///
/// `what` names the kind of value in error messages.
///
/// # Examples
///
/// ```
/// use gene_homology::utils::validation::validate_name;
///
/// assert_eq!(validate_name(" uniref50 ", "database name").unwrap(), "uniref50");
/// assert!(validate_name("", "database name").is_err());
/// assert!(validate_name("bad\tname", "database name").is_err());
/// ```
///
/// # Errors
///
/// Returns `ValidationError::MissingName` for empty or whitespace-only input,
/// `ValidationError::NameTooLong` if the trimmed name exceeds
/// [`MAX_NAME_LENGTH`] characters, or `ValidationError::ControlCharacters`.
pub fn validate_name(name: &str, what: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingName(what.to_string()));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::NameTooLong(what.to_string()));
    }
    if trimmed.chars().any(char::is_control) {
        return Err(ValidationError::ControlCharacters(what.to_string()));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("uniref50", "name").unwrap(), "uniref50");
        assert_eq!(validate_name("\n uniref50\t", "name").unwrap(), "uniref50");
    }

    #[test]
    fn test_validate_name_missing() {
        assert_eq!(
            validate_name("  \t", "database name"),
            Err(ValidationError::MissingName("database name".to_string()))
        );
    }

    #[test]
    fn test_validate_name_length() {
        let at_limit = "a".repeat(MAX_NAME_LENGTH);
        assert!(validate_name(&at_limit, "name").is_ok());

        let too_long = "a".repeat(MAX_NAME_LENGTH + 1);
        assert!(matches!(
            validate_name(&too_long, "name"),
            Err(ValidationError::NameTooLong(_))
        ));
    }

    #[test]
    fn test_validate_name_control_characters() {
        for bad in ["db\u{0}name", "db\u{7}", "two\nlines"] {
            assert!(
                matches!(
                    validate_name(bad, "name"),
                    Err(ValidationError::ControlCharacters(_))
                ),
                "'{bad}' should be rejected"
            );
        }
    }
}
