//! # Contract ABI Files
//!
//! Loads the JSON ABI a data source declares under `mapping.abis` and derives
//! the event signatures its event handlers may subscribe to.
//!
//! An ABI file is either a bare JSON array of entries or an object whose
//! `abi` field holds that array (the layout emitted by Truffle and similar
//! build tools).

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Failure to load an ABI file.
#[derive(Error, Debug)]
pub enum AbiError {
    /// The file could not be read.
    #[error("Could not read ABI file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not JSON, or its entries are malformed.
    #[error("Could not parse ABI file {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// Valid JSON, but neither an array nor an object with an `abi` array.
    #[error(
        "ABI file {} must contain an array or an object with an \"abi\" array",
        .path.display()
    )]
    Invalid { path: PathBuf },
}

/// One parameter of an ABI function or event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AbiParam {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub indexed: bool,
    #[serde(default)]
    pub components: Vec<AbiParam>,
}

impl AbiParam {
    /// Canonical type string. Tuples expand to `(a,b)` and keep their array
    /// suffix, so `tuple[2]` with two members becomes `(a,b)[2]`.
    pub fn canonical_type(&self) -> String {
        match self.ty.strip_prefix("tuple") {
            Some(suffix) => {
                let members: Vec<String> =
                    self.components.iter().map(AbiParam::canonical_type).collect();
                format!("({}){suffix}", members.join(","))
            }
            None => self.ty.clone(),
        }
    }
}

/// One entry of an ABI array. Only the fields used for event checks are kept.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AbiEntry {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
}

impl AbiEntry {
    pub fn is_event(&self) -> bool {
        self.kind.as_deref() == Some("event")
    }

    /// Event signature such as `Transfer(address,address,uint256)`.
    ///
    /// With `mark_indexed`, indexed inputs are prefixed with `indexed `,
    /// e.g. `Transfer(indexed address,indexed address,uint256)`.
    pub fn signature(&self, mark_indexed: bool) -> String {
        let inputs: Vec<String> = self
            .inputs
            .iter()
            .map(|input| {
                if mark_indexed && input.indexed {
                    format!("indexed {}", input.canonical_type())
                } else {
                    input.canonical_type()
                }
            })
            .collect();
        format!(
            "{}({})",
            self.name.as_deref().unwrap_or_default(),
            inputs.join(",")
        )
    }
}

/// A named, loaded contract ABI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Abi {
    pub name: String,
    pub entries: Vec<AbiEntry>,
}

impl Abi {
    /// Read and parse the ABI file at `path`.
    pub fn load(name: impl Into<String>, path: &Path) -> Result<Self, AbiError> {
        let content = std::fs::read_to_string(path).map_err(|source| AbiError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let abi = Self::from_json_str(name, &content).map_err(|e| e.at(path))?;
        tracing::debug!(
            name = %abi.name,
            path = %path.display(),
            entries = abi.entries.len(),
            "ABI loaded"
        );
        Ok(abi)
    }

    /// Parse ABI JSON that is already in memory.
    pub fn from_json_str(name: impl Into<String>, content: &str) -> Result<Self, AbiError> {
        let parse = |e: serde_json::Error| AbiError::Parse {
            path: PathBuf::new(),
            message: e.to_string(),
        };
        let value: Value = serde_json::from_str(content).map_err(parse)?;
        let entries = match value {
            Value::Array(_) => value,
            Value::Object(mut map) => match map.remove("abi") {
                Some(abi @ Value::Array(_)) => abi,
                _ => return Err(AbiError::Invalid { path: PathBuf::new() }),
            },
            _ => return Err(AbiError::Invalid { path: PathBuf::new() }),
        };
        Ok(Self {
            name: name.into(),
            entries: serde_json::from_value(entries).map_err(parse)?,
        })
    }

    /// Plain signatures of every event, in declaration order.
    pub fn event_signatures(&self) -> Vec<String> {
        self.events().map(|e| e.signature(false)).collect()
    }

    /// Whether `signature` names an event in this ABI, in either the plain
    /// or the `indexed`-marked form.
    pub fn has_event(&self, signature: &str) -> bool {
        self.events()
            .any(|e| e.signature(false) == signature || e.signature(true) == signature)
    }

    fn events(&self) -> impl Iterator<Item = &AbiEntry> {
        self.entries.iter().filter(|e| e.is_event())
    }
}

impl AbiError {
    fn at(self, path: &Path) -> Self {
        match self {
            AbiError::Parse { message, .. } => AbiError::Parse {
                path: path.to_path_buf(),
                message,
            },
            AbiError::Invalid { .. } => AbiError::Invalid {
                path: path.to_path_buf(),
            },
            read @ AbiError::Read { .. } => read,
        }
    }
}
