//! # Manifest Checks
//!
//! Cross-references between a data source and the ABI files it declares.
//! These run only once the manifest is structurally valid, so they read the
//! document loosely and skip anything that is not shaped as expected.
//!
//! Data source indices in error paths are positions in the manifest's
//! `dataSources` list, counting data sources of every kind.

use serde_json::Value;
use sgm_core::{ErrorKind, Path, ValidationError};
use sgm_schema::FileResolver;

use crate::abi::Abi;
use crate::invariants::CHAIN_DATA_SOURCE_KIND;

/// Run every manifest check, in order: ABI references, ABI files, events.
pub fn check_manifest(document: &Value, files: &dyn FileResolver) -> Vec<ValidationError> {
    let mut errors = check_abi_references(document);
    errors.extend(check_abi_files(document, files));
    errors.extend(check_event_signatures(document, files));
    tracing::debug!(errors = errors.len(), "manifest checks finished");
    errors
}

/// Chain data sources paired with their position in `dataSources`.
fn chain_data_sources(document: &Value) -> impl Iterator<Item = (usize, &Value)> {
    document
        .get("dataSources")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .enumerate()
        .filter(|(_, ds)| ds.get("kind").and_then(Value::as_str) == Some(CHAIN_DATA_SOURCE_KIND))
}

fn data_source_path(index: usize) -> Path {
    Path::root().join("dataSources").join(index)
}

/// `(name, file)` of each entry in `mapping.abis`.
fn declared_abis(data_source: &Value) -> Vec<(&str, Option<&str>)> {
    data_source
        .pointer("/mapping/abis")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|abi| {
            let name = abi.get("name").and_then(Value::as_str)?;
            Some((name, abi.get("file").and_then(Value::as_str)))
        })
        .collect()
}

/// `source.abi` must name one of the data source's `mapping.abis`.
pub fn check_abi_references(document: &Value) -> Vec<ValidationError> {
    chain_data_sources(document)
        .filter_map(|(index, ds)| {
            let abi_name = ds.pointer("/source/abi").and_then(Value::as_str)?;
            let names: Vec<&str> = declared_abis(ds).into_iter().map(|(n, _)| n).collect();
            if names.contains(&abi_name) {
                return None;
            }
            Some(ValidationError::new(
                data_source_path(index).join("source").join("abi"),
                ErrorKind::AbiReference,
                format!(
                    "ABI name \"{abi_name}\" not found in mapping > abis: {}",
                    names.join(", ")
                ),
            ))
        })
        .collect()
}

/// Every file in `mapping.abis` must load as an ABI.
pub fn check_abi_files(document: &Value, files: &dyn FileResolver) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (index, ds) in chain_data_sources(document) {
        let abis = ds.pointer("/mapping/abis").and_then(Value::as_array);
        for (abi_index, abi) in abis.into_iter().flatten().enumerate() {
            let (Some(name), Some(file)) = (
                abi.get("name").and_then(Value::as_str),
                abi.get("file").and_then(Value::as_str),
            ) else {
                continue;
            };
            if let Err(e) = Abi::load(name, &files.resolve(file)) {
                errors.push(ValidationError::new(
                    data_source_path(index)
                        .join("mapping")
                        .join("abis")
                        .join(abi_index)
                        .join("file"),
                    ErrorKind::AbiFile,
                    e.to_string(),
                ));
            }
        }
    }
    errors
}

/// Every `mapping.eventHandlers[k].event` must be an event of the ABI named
/// by `source.abi`. Data sources whose ABI cannot be loaded are skipped; the
/// ABI checks already report them.
pub fn check_event_signatures(document: &Value, files: &dyn FileResolver) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (index, ds) in chain_data_sources(document) {
        let Some(abi) = source_abi(ds, files) else {
            continue;
        };
        let handlers = ds.pointer("/mapping/eventHandlers").and_then(Value::as_array);
        for (handler_index, handler) in handlers.into_iter().flatten().enumerate() {
            let Some(event) = handler.get("event").and_then(Value::as_str) else {
                continue;
            };
            if abi.has_event(event) {
                continue;
            }
            errors.push(ValidationError::new(
                data_source_path(index)
                    .join("mapping")
                    .join("eventHandlers")
                    .join(handler_index),
                ErrorKind::EventSignature,
                format!(
                    "Event with signature {event} not present in ABI \"{}\". Candidates: {}",
                    abi.name,
                    abi.event_signatures().join(", ")
                ),
            ));
        }
    }
    errors
}

fn source_abi(data_source: &Value, files: &dyn FileResolver) -> Option<Abi> {
    let abi_name = data_source.pointer("/source/abi").and_then(Value::as_str)?;
    let (name, file) = declared_abis(data_source)
        .into_iter()
        .find(|(name, _)| *name == abi_name)?;
    match Abi::load(name, &files.resolve(file?)) {
        Ok(abi) => Some(abi),
        Err(e) => {
            tracing::debug!(abi = name, error = %e, "skipping event checks");
            None
        }
    }
}
