//! # sgm-cli: Subgraph Manifest Validation CLI
//!
//! Provides the `sgm` command-line interface.
//!
//! ## Subcommands
//!
//! - `sgm validate`: Validate a manifest against the built-in manifest
//!   schema or a user-supplied type schema.
//!
//! ```bash
//! sgm validate subgraph.yaml
//! sgm -vv validate subgraph.yaml --format json
//! sgm validate config.yaml --schema config.graphql --root-type Config
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from business logic.
//! - Handlers delegate to `sgm-manifest`; no validation logic lives here.

pub mod validate;
