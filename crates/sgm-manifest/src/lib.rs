//! # sgm-manifest: Subgraph Manifest Validation
//!
//! Validates `subgraph.yaml` manifests end to end: the embedded manifest
//! schema, the manifest-wide invariants the schema cannot express, the ABI
//! and event cross-checks, and the combined error report.
//!
//! ## Modules
//!
//! - [`embedded`]: the manifest schema compiled into the crate.
//! - [`invariants`]: single network and supported resolver kind.
//! - [`abi`]: contract ABI loading and event signatures.
//! - [`checks`]: ABI reference, ABI file and event signature checks.
//! - [`manifest`]: the staged load pipeline ([`ManifestValidator`]).
//! - [`report`]: all errors of one file rendered as one message.
//!
//! ## Crate Policy
//!
//! - Depends on `sgm-core` and `sgm-schema` internally.
//! - Validation failures are data ([`ManifestReport`]); only I/O, parse and
//!   schema defects are distinct error variants.

pub mod abi;
pub mod checks;
pub mod embedded;
pub mod invariants;
pub mod manifest;
pub mod report;

pub use abi::{Abi, AbiError};
pub use checks::check_manifest;
pub use embedded::{manifest_schema, MANIFEST_SCHEMA_SOURCE, ROOT_TYPE};
pub use invariants::{check_domain_invariants, check_resolver_kind, check_single_network};
pub use manifest::{validate_manifest, Manifest, ManifestError, ManifestValidator};
pub use report::ManifestReport;
