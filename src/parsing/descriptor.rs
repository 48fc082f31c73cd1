//! Reader for LAST database descriptor (`.prj`) files.
//!
//! The descriptor is a properties-style file written by `lastdb`:
//!
//! ```text
//! version=1060
//! alphabet=ACDEFGHIKLMNPQRSTVWY
//! numofsequences=40000000
//! numofletters=13204491377
//! ```
//!
//! Only `numofsequences` is required; other keys are kept but not
//! interpreted.

use std::collections::HashMap;
use std::path::Path;

use crate::core::database::{DatabaseLocation, ReferenceDatabase};
use crate::core::types::{DatabaseName, ImplementationName};
use crate::homology::HomologyError;

/// Key holding the number of sequences in the database
pub const SEQUENCE_COUNT_KEY: &str = "numofsequences";

/// Read a database descriptor and build the `ReferenceDatabase` it describes
///
/// # Errors
///
/// Returns `HomologyError::Configuration` if the file cannot be read, the
/// sequence count key is missing, or its value is not an integer >= 1.
pub fn read_database(
    name: DatabaseName,
    location: DatabaseLocation,
) -> Result<ReferenceDatabase, HomologyError> {
    let properties = read_properties_file(location.path())?;
    let sequence_count = sequence_count(&properties, location.path())?;
    ReferenceDatabase::new(name, ImplementationName::Last, location, sequence_count)
}

/// Read a properties file into a key/value map
///
/// # Errors
///
/// Returns `HomologyError::Configuration` if the file cannot be read.
pub fn read_properties_file(path: &Path) -> Result<HashMap<String, String>, HomologyError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        HomologyError::Configuration(format!(
            "Couldn't open LAST database file {}: {e}",
            path.display()
        ))
    })?;
    Ok(parse_properties_text(&content))
}

/// Parse `key=value` (or `key: value`) lines. Blank lines and lines starting
/// with `#` or `!` are ignored; a line without a separator is a key with an
/// empty value.
pub fn parse_properties_text(text: &str) -> HashMap<String, String> {
    let mut properties = HashMap::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let (key, value) = match line.find(['=', ':']) {
            Some(idx) => (&line[..idx], &line[idx + 1..]),
            None => (line, ""),
        };
        properties.insert(key.trim().to_string(), value.trim().to_string());
    }

    properties
}

fn sequence_count(
    properties: &HashMap<String, String>,
    path: &Path,
) -> Result<u64, HomologyError> {
    let value = properties.get(SEQUENCE_COUNT_KEY).ok_or_else(|| {
        HomologyError::Configuration(format!(
            "File {} is not a LAST database file: missing key {SEQUENCE_COUNT_KEY}",
            path.display()
        ))
    })?;

    match value.parse::<u64>() {
        Ok(count) if count >= 1 => Ok(count),
        _ => Err(HomologyError::Configuration(format!(
            "File {} has invalid {SEQUENCE_COUNT_KEY} '{value}': must be an integer >= 1",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_descriptor(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".prj").unwrap();
        write!(file, "{content}").unwrap();
        file.flush().unwrap();
        file
    }

    fn read(file: &NamedTempFile) -> Result<ReferenceDatabase, HomologyError> {
        read_database(
            DatabaseName::new("uniref50").unwrap(),
            DatabaseLocation::new(file.path()).unwrap(),
        )
    }

    #[test]
    fn test_read_database() {
        let file = create_descriptor(
            "version=1060\nalphabet=ACDEFGHIKLMNPQRSTVWY\nnumofsequences=2500\nnumofletters=9000\n",
        );

        let db = read(&file).unwrap();
        assert_eq!(db.name().as_str(), "uniref50");
        assert_eq!(db.implementation(), ImplementationName::Last);
        assert_eq!(db.sequence_count(), 2500);
        assert_eq!(db.location().path(), file.path());
    }

    #[test]
    fn test_missing_sequence_count() {
        let file = create_descriptor("version=1060\nnumofletters=9000\n");
        let err = read(&file).unwrap_err();
        assert!(matches!(err, HomologyError::Configuration(_)));
        assert!(err.to_string().contains(SEQUENCE_COUNT_KEY));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_invalid_sequence_count() {
        for bad in ["numofsequences=0", "numofsequences=many", "numofsequences=-3"] {
            let file = create_descriptor(bad);
            let err = read(&file).unwrap_err();
            assert!(
                matches!(err, HomologyError::Configuration(_)),
                "expected configuration error for {bad}"
            );
        }
    }

    #[test]
    fn test_unreadable_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        // A directory exists but cannot be read as a file
        let location = DatabaseLocation::new(dir.path()).unwrap();
        let err = read_database(DatabaseName::new("db").unwrap(), location).unwrap_err();
        assert!(matches!(err, HomologyError::Configuration(_)));
        assert!(err.to_string().contains("Couldn't open LAST database file"));
    }

    #[test]
    fn test_parse_properties_text() {
        let props = parse_properties_text(
            "# written by lastdb\n! legacy comment\n\n key = value \ncolon: sep\nflag\nurl=a=b\n",
        );
        assert_eq!(props.get("key").map(String::as_str), Some("value"));
        assert_eq!(props.get("colon").map(String::as_str), Some("sep"));
        assert_eq!(props.get("flag").map(String::as_str), Some(""));
        assert_eq!(props.get("url").map(String::as_str), Some("a=b"));
        assert_eq!(props.len(), 4);
    }
}
