//! # Manifest Loading and Validation
//!
//! The full pipeline for one manifest file:
//!
//! 1. Read the file and parse it as YAML.
//! 2. Validate it structurally against the type schema.
//! 3. If that is clean, check the domain invariants.
//! 4. If those are clean too, run the ABI and event checks.
//!
//! Each stage runs only when the previous one found nothing, so later stages
//! can assume the shape earlier stages established. Referenced files resolve
//! relative to the manifest's directory.
//!
//! The invariants and the ABI and event checks read subgraph manifest
//! fields, so they only run when validating as the manifest root type. Any
//! other root type gets structural validation alone.

use std::path::{Path, PathBuf};

use serde_json::Value;
use sgm_core::{from_yaml_str, DocumentError, ValidationError};
use sgm_schema::{validate_document, FileResolver, RelativeTo, SchemaError, TypeSchema};
use thiserror::Error;

use crate::checks::check_manifest;
use crate::embedded::{manifest_schema, ROOT_TYPE};
use crate::invariants::check_domain_invariants;
use crate::report::ManifestReport;

/// Failure to load a manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("cannot read manifest {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manifest is not a parseable document.
    #[error("cannot parse manifest {}: {source}", .path.display())]
    Document {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },

    /// The type schema is broken or lacks the requested root type.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// The manifest was read but failed validation.
    #[error("{0}")]
    Invalid(ManifestReport),
}

impl ManifestError {
    /// The validation report, if this is a validation failure.
    pub fn report(&self) -> Option<&ManifestReport> {
        match self {
            Self::Invalid(report) => Some(report),
            _ => None,
        }
    }
}

/// A manifest that passed every check.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    pub path: PathBuf,
    pub document: Value,
}

impl Manifest {
    /// Load and validate a manifest against the embedded schema.
    ///
    /// # Errors
    ///
    /// See [`ManifestValidator::load`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        ManifestValidator::embedded()?.load(path.as_ref())
    }

    /// The manifest's `specVersion`, if set.
    pub fn spec_version(&self) -> Option<&str> {
        self.document.get("specVersion").and_then(Value::as_str)
    }

    /// Names of all data sources, in declaration order.
    pub fn data_source_names(&self) -> Vec<&str> {
        self.document
            .get("dataSources")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|ds| ds.get("name").and_then(Value::as_str))
            .collect()
    }
}

/// Structural validation followed by the domain invariants, against the
/// manifest root type.
///
/// Reads no files other than those `files` reports on.
///
/// # Errors
///
/// `SchemaError` if `schema` does not declare the manifest root type.
pub fn validate_manifest(
    document: &Value,
    schema: &TypeSchema,
    files: &dyn FileResolver,
) -> Result<Vec<ValidationError>, SchemaError> {
    ManifestValidator::new(schema).validate(document, files)
}

/// Validates manifests against a type schema and root type.
#[derive(Debug, Clone)]
pub struct ManifestValidator<'s> {
    schema: &'s TypeSchema,
    root_type: String,
}

impl ManifestValidator<'static> {
    /// Validator over the embedded manifest schema.
    ///
    /// # Errors
    ///
    /// `SchemaError` if the embedded schema fails to parse.
    pub fn embedded() -> Result<Self, SchemaError> {
        Ok(Self::new(manifest_schema()?))
    }
}

impl<'s> ManifestValidator<'s> {
    /// Validator over `schema`, rooted at the manifest type.
    pub fn new(schema: &'s TypeSchema) -> Self {
        Self {
            schema,
            root_type: ROOT_TYPE.to_string(),
        }
    }

    /// Validate documents as `root_type` instead of the manifest type.
    pub fn with_root_type(mut self, root_type: impl Into<String>) -> Self {
        self.root_type = root_type.into();
        self
    }

    pub fn schema(&self) -> &'s TypeSchema {
        self.schema
    }

    pub fn root_type(&self) -> &str {
        &self.root_type
    }

    /// Structural errors, or the domain invariant errors if the structure is
    /// sound and the root type is the manifest type.
    ///
    /// # Errors
    ///
    /// `SchemaError::UnknownRootType` if the root type is not declared.
    pub fn validate(
        &self,
        document: &Value,
        files: &dyn FileResolver,
    ) -> Result<Vec<ValidationError>, SchemaError> {
        let errors = validate_document(self.schema, &self.root_type, document, files)?;
        if !errors.is_empty() || !self.is_manifest_root() {
            return Ok(errors);
        }
        Ok(check_domain_invariants(document))
    }

    /// Every stage of the pipeline, stopping at the first stage that reports.
    ///
    /// # Errors
    ///
    /// `SchemaError::UnknownRootType` if the root type is not declared.
    pub fn check(
        &self,
        document: &Value,
        files: &dyn FileResolver,
    ) -> Result<Vec<ValidationError>, SchemaError> {
        let errors = self.validate(document, files)?;
        if !errors.is_empty() || !self.is_manifest_root() {
            return Ok(errors);
        }
        Ok(check_manifest(document, files))
    }

    fn is_manifest_root(&self) -> bool {
        self.root_type == ROOT_TYPE
    }

    /// Read, parse and fully check the manifest at `path`.
    ///
    /// # Errors
    ///
    /// - `ManifestError::Read` if the file cannot be read.
    /// - `ManifestError::Document` if it is not valid YAML.
    /// - `ManifestError::Schema` if the root type is not declared.
    /// - `ManifestError::Invalid` with every error of the first failing stage.
    pub fn load(&self, path: &Path) -> Result<Manifest, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let document = from_yaml_str(&content).map_err(|source| ManifestError::Document {
            path: path.to_path_buf(),
            source,
        })?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        let files = RelativeTo::new(base_dir);

        tracing::info!(
            manifest = %path.display(),
            root_type = %self.root_type,
            "validating manifest"
        );
        let errors = self.check(&document, &files)?;
        if !errors.is_empty() {
            tracing::debug!(errors = errors.len(), "manifest rejected");
            return Err(ManifestError::Invalid(ManifestReport::new(path, errors)));
        }

        Ok(Manifest {
            path: path.to_path_buf(),
            document,
        })
    }
}
