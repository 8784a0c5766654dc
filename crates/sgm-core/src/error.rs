//! # Error Types
//!
//! Two families of errors live here:
//!
//! - [`ValidationError`] records are *data*: a validation pass collects every
//!   one it finds and returns them as a list. Each carries the [`Path`] of
//!   the offending value, an [`ErrorKind`] category and a message.
//! - [`DocumentError`] is a real `std::error::Error`: the manifest text
//!   could not be turned into a document tree at all.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::path::Path;

/// Category of a [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The value has the wrong shape for its declared type.
    Structural,
    /// A non-null value is null or absent.
    MissingRequiredValue,
    /// A mapping contains a key its object type does not declare.
    UnknownField,
    /// An `UnknownField` for the old nested `templates` key, reported with a
    /// migration hint.
    LegacyTemplates,
    /// A file reference does not point to an existing file.
    FileNotFound,
    /// No member of a union type could be selected for the value.
    UnresolvedUnionVariant,
    /// Data sources and templates use more than one network.
    NetworkConflict,
    /// The mutation resolver kind is not supported.
    UnsupportedResolverKind,
    /// The type schema uses a kind the validator cannot interpret.
    UnsupportedSchemaKind,
    /// A data source references an ABI name its mapping does not declare.
    AbiReference,
    /// An ABI file could not be loaded.
    AbiFile,
    /// An event handler names an event that is not in the ABI.
    EventSignature,
}

impl ErrorKind {
    /// Unknown-field errors, including the legacy `templates` hint.
    pub fn is_unknown_field(self) -> bool {
        matches!(self, Self::UnknownField | Self::LegacyTemplates)
    }

    /// Manifest-wide invariant violations.
    pub fn is_domain_invariant(self) -> bool {
        matches!(self, Self::NetworkConflict | Self::UnsupportedResolverKind)
    }

    /// Errors that point at a defect in the type schema rather than the
    /// document.
    pub fn is_schema_defect(self) -> bool {
        matches!(self, Self::UnsupportedSchemaKind)
    }
}

/// A single path-annotated validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Location of the offending value.
    pub path: Path,
    /// Error category.
    pub kind: ErrorKind,
    /// Human-readable description.
    pub message: String,
}

impl ValidationError {
    pub fn new(path: Path, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// The manifest text could not be parsed into a document tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// The text is not valid YAML.
    #[error("invalid YAML: {0}")]
    Yaml(String),

    /// The text is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(String),

    /// The YAML tree uses features with no document equivalent.
    #[error("YAML-to-JSON conversion failed: {0}")]
    Conversion(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_path_and_message() {
        let err = ValidationError::new(
            Path::root().join("schema").join("file"),
            ErrorKind::MissingRequiredValue,
            "No value provided",
        );
        assert_eq!(err.to_string(), "schema > file: No value provided");
    }

    #[test]
    fn display_root_path() {
        let err = ValidationError::new(Path::root(), ErrorKind::NetworkConflict, "conflict");
        assert_eq!(err.to_string(), "/: conflict");
    }

    #[test]
    fn kind_predicates() {
        assert!(ErrorKind::LegacyTemplates.is_unknown_field());
        assert!(ErrorKind::UnknownField.is_unknown_field());
        assert!(!ErrorKind::Structural.is_unknown_field());
        assert!(ErrorKind::NetworkConflict.is_domain_invariant());
        assert!(ErrorKind::UnsupportedResolverKind.is_domain_invariant());
        assert!(!ErrorKind::FileNotFound.is_domain_invariant());
        assert!(ErrorKind::UnsupportedSchemaKind.is_schema_defect());
    }

    #[test]
    fn serializes_kind_in_snake_case() {
        let err = ValidationError::new(
            Path::root().join("dataSources").join(0usize),
            ErrorKind::UnresolvedUnionVariant,
            "m",
        );
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "unresolved_union_variant");
        assert_eq!(json["path"], serde_json::json!(["dataSources", 0]));
    }
}
