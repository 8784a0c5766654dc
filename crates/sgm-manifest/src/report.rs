//! # Combined Error Report
//!
//! All errors found in one manifest, rendered as a single message.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use sgm_core::ValidationError;

/// Every error found in one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManifestReport {
    pub file: PathBuf,
    pub errors: Vec<ValidationError>,
}

impl ManifestReport {
    pub fn new(file: impl Into<PathBuf>, errors: Vec<ValidationError>) -> Self {
        Self {
            file: file.into(),
            errors,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ManifestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error in {}:", self.file.display())?;
        for error in &self.errors {
            write!(f, "\n\n    Path: {}\n    {}", error.path, error.message)?;
        }
        Ok(())
    }
}
