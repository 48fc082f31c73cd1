use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::types::{DatabaseName, ImplementationName};
use crate::homology::HomologyError;

/// File extension of a LAST database descriptor
pub const DESCRIPTOR_EXTENSION: &str = "prj";

/// Location of a reference database on disk.
///
/// The path is checked for existence at construction since it ends up in the
/// aligner's argument list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatabaseLocation {
    path: PathBuf,
}

impl DatabaseLocation {
    /// Create a location from the path to a database descriptor file
    ///
    /// # Errors
    ///
    /// Returns `HomologyError::Configuration` if the path does not exist.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, HomologyError> {
        let path = path.into();
        if !path.exists() {
            return Err(HomologyError::Configuration(format!(
                "{} does not exist",
                path.display()
            )));
        }
        Ok(Self { path })
    }

    /// Path to the descriptor file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Database prefix handed to the aligner: the descriptor path with its
    /// `.prj` suffix removed
    pub fn database_prefix(&self) -> PathBuf {
        match self.path.extension() {
            Some(ext) if ext == DESCRIPTOR_EXTENSION => self.path.with_extension(""),
            _ => self.path.clone(),
        }
    }
}

/// A reference database built by a homology implementation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceDatabase {
    name: DatabaseName,
    implementation: ImplementationName,
    location: DatabaseLocation,
    sequence_count: u64,
}

impl ReferenceDatabase {
    /// # Errors
    ///
    /// Returns `HomologyError::Configuration` if `sequence_count` is zero.
    pub fn new(
        name: DatabaseName,
        implementation: ImplementationName,
        location: DatabaseLocation,
        sequence_count: u64,
    ) -> Result<Self, HomologyError> {
        if sequence_count < 1 {
            return Err(HomologyError::Configuration(format!(
                "Database {name} must contain at least 1 sequence"
            )));
        }
        Ok(Self {
            name,
            implementation,
            location,
            sequence_count,
        })
    }

    pub fn name(&self) -> &DatabaseName {
        &self.name
    }

    pub fn implementation(&self) -> ImplementationName {
        self.implementation
    }

    pub fn location(&self) -> &DatabaseLocation {
        &self.location
    }

    pub fn sequence_count(&self) -> u64 {
        self.sequence_count
    }

    /// Serializable summary, as reported alongside search results
    #[must_use]
    pub fn summary(&self) -> DatabaseSummary {
        DatabaseSummary {
            name: self.name.to_string(),
            implementation: self.implementation,
            sequence_count: self.sequence_count,
            location: self.location.path().display().to_string(),
        }
    }
}

/// Flattened view of a `ReferenceDatabase` for output
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseSummary {
    pub name: String,
    #[serde(rename = "impl")]
    pub implementation: ImplementationName,
    #[serde(rename = "seqcount")]
    pub sequence_count: u64,
    pub location: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_location_requires_existing_path() {
        let result = DatabaseLocation::new("/definitely/not/here.prj");
        assert!(matches!(result, Err(HomologyError::Configuration(_))));
    }

    #[test]
    fn test_database_prefix_strips_prj() {
        let file = NamedTempFile::with_suffix(".last.prj").unwrap();
        let location = DatabaseLocation::new(file.path()).unwrap();
        let prefix = location.database_prefix();
        assert!(prefix.to_string_lossy().ends_with(".last"));
        assert_eq!(prefix.parent(), file.path().parent());
    }

    #[test]
    fn test_database_prefix_keeps_other_suffixes() {
        let file = NamedTempFile::with_suffix(".db").unwrap();
        let location = DatabaseLocation::new(file.path()).unwrap();
        assert_eq!(location.database_prefix(), file.path());
    }

    #[test]
    fn test_reference_database_requires_sequences() {
        let file = NamedTempFile::new().unwrap();
        let location = DatabaseLocation::new(file.path()).unwrap();
        let name = DatabaseName::new("db").unwrap();

        let result =
            ReferenceDatabase::new(name.clone(), ImplementationName::Last, location.clone(), 0);
        assert!(matches!(result, Err(HomologyError::Configuration(_))));

        let db = ReferenceDatabase::new(name, ImplementationName::Last, location, 12).unwrap();
        assert_eq!(db.sequence_count(), 12);
        assert_eq!(db.summary().implementation, ImplementationName::Last);
    }
}
