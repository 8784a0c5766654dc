//! # sgm-core: Foundational Types for Manifest Validation
//!
//! Defines the value and error primitives shared by the schema engine
//! (`sgm-schema`), the manifest pipeline (`sgm-manifest`) and the CLI.
//!
//! ## Key Types
//!
//! - [`DocumentValue`]: the untyped tree a manifest deserializes into.
//!   It is `serde_json::Value`, so every consumer matches on one closed set
//!   of variants: null, boolean, number, string, sequence, mapping.
//! - [`Path`]: the location of a value inside a document, as map keys and
//!   sequence indices.
//! - [`ValidationError`]: a path-annotated, categorized error record.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `sgm-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod document;
pub mod error;
pub mod path;

pub use document::{from_json_str, from_yaml_str, kind_name, to_yaml_snippet, DocumentValue};
pub use error::{DocumentError, ErrorKind, ValidationError};
pub use path::{Path, PathSegment};
