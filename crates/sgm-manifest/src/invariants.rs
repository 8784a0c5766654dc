//! # Domain Invariants
//!
//! Manifest-wide rules that cannot be expressed in the type schema. They
//! assume a structurally valid manifest and are only run after structural
//! validation came back clean.
//!
//! - **Single network**: every data source and template that indexes a chain
//!   must use the same network (having no network counts as one choice).
//! - **Resolver kind**: a mutation resolver block must use a supported kind.
//!
//! The two checks are independent; both may report.

use serde_json::Value;
use sgm_core::{ErrorKind, Path, ValidationError};

/// Data source kind that is bound to a chain network.
pub const CHAIN_DATA_SOURCE_KIND: &str = "ethereum/contract";

/// Mutation resolver kinds that can be deployed.
pub const SUPPORTED_RESOLVER_KINDS: &[&str] = &["javascript"];

/// Run every domain invariant.
pub fn check_domain_invariants(document: &Value) -> Vec<ValidationError> {
    let errors: Vec<ValidationError> = check_single_network(document)
        .into_iter()
        .chain(check_resolver_kind(document))
        .collect();
    tracing::debug!(errors = errors.len(), "domain invariants checked");
    errors
}

/// Entries of `dataSources` followed by entries of `templates`.
fn sources_and_templates(document: &Value) -> impl Iterator<Item = &Value> {
    ["dataSources", "templates"]
        .into_iter()
        .filter_map(|key| document.get(key).and_then(Value::as_array))
        .flatten()
}

/// Group chain data sources and templates by network, in first-seen order.
pub fn network_groups(document: &Value) -> Vec<(Option<&str>, Vec<&str>)> {
    let mut groups: Vec<(Option<&str>, Vec<&str>)> = Vec::new();
    for entry in sources_and_templates(document)
        .filter(|e| e.get("kind").and_then(Value::as_str) == Some(CHAIN_DATA_SOURCE_KIND))
    {
        let network = entry.get("network").and_then(Value::as_str);
        let name = entry.get("name").and_then(Value::as_str).unwrap_or("<unnamed>");
        match groups.iter_mut().find(|(n, _)| *n == network) {
            Some((_, members)) => {
                if !members.contains(&name) {
                    members.push(name);
                }
            }
            None => groups.push((network, vec![name])),
        }
    }
    groups
}

/// All chain data sources and templates must share one network.
pub fn check_single_network(document: &Value) -> Option<ValidationError> {
    let groups = network_groups(document);
    if groups.len() <= 1 {
        return None;
    }

    let mut message = String::from("Conflicting networks used in data sources and templates:");
    for (network, members) in &groups {
        match network {
            Some(network) => {
                message.push_str(&format!("\n  Data sources and templates using '{network}':"))
            }
            None => message.push_str("\n  Data sources and templates having no network set:"),
        }
        for member in members {
            message.push_str(&format!("\n    - {member}"));
        }
    }
    message.push_str(
        "\nRecommendation: Make all data sources and templates use the same network name.",
    );

    Some(ValidationError::new(
        Path::root(),
        ErrorKind::NetworkConflict,
        message,
    ))
}

/// A `mutations.resolvers` block must declare a supported kind.
pub fn check_resolver_kind(document: &Value) -> Option<ValidationError> {
    let resolvers = document.get("mutations")?.get("resolvers")?;
    if resolvers.is_null() {
        return None;
    }

    let kind = resolvers.get("kind").and_then(Value::as_str);
    if kind.is_some_and(|k| SUPPORTED_RESOLVER_KINDS.contains(&k)) {
        return None;
    }

    Some(ValidationError::new(
        Path::root(),
        ErrorKind::UnsupportedResolverKind,
        format!(
            "Requested resolver kind {} is not supported. \
             Please use one of the following supported kinds: {}",
            kind.unwrap_or("(none)"),
            SUPPORTED_RESOLVER_KINDS.join(", ")
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source(name: &str, network: Option<&str>) -> Value {
        let mut ds = json!({"kind": "ethereum/contract", "name": name});
        if let Some(network) = network {
            ds["network"] = json!(network);
        }
        ds
    }

    #[test]
    fn single_network_passes() {
        let doc = json!({
            "dataSources": [source("A", Some("mainnet")), source("B", Some("mainnet"))],
            "templates": [source("T", Some("mainnet"))]
        });
        assert!(check_single_network(&doc).is_none());
    }

    #[test]
    fn no_network_anywhere_passes() {
        let doc = json!({"dataSources": [source("A", None), source("B", None)]});
        assert!(check_single_network(&doc).is_none());
    }

    #[test]
    fn two_networks_conflict() {
        let doc = json!({
            "dataSources": [source("A", Some("mainnet")), source("B", Some("rinkeby"))]
        });
        let err = check_single_network(&doc).unwrap();
        assert_eq!(err.kind, ErrorKind::NetworkConflict);
        assert!(err.path.is_root());
        assert_eq!(
            err.message,
            "Conflicting networks used in data sources and templates:\n  \
             Data sources and templates using 'mainnet':\n    - A\n  \
             Data sources and templates using 'rinkeby':\n    - B\n\
             Recommendation: Make all data sources and templates use the same network name."
        );
    }

    #[test]
    fn templates_and_missing_networks_form_groups() {
        let doc = json!({
            "dataSources": [source("A", Some("mainnet"))],
            "templates": [source("T", None), source("U", Some("mainnet"))]
        });
        let groups = network_groups(&doc);
        assert_eq!(groups, vec![(Some("mainnet"), vec!["A", "U"]), (None, vec!["T"])]);
        let err = check_single_network(&doc).unwrap();
        assert!(err.message.contains("having no network set:\n    - T"));
    }

    #[test]
    fn non_chain_kinds_are_ignored() {
        let doc = json!({
            "dataSources": [
                source("A", Some("mainnet")),
                {"kind": "ipfs/files", "name": "F", "network": "other"}
            ]
        });
        assert!(check_single_network(&doc).is_none());
    }

    #[test]
    fn duplicate_names_listed_once() {
        let doc = json!({
            "dataSources": [source("A", Some("mainnet")), source("B", Some("poa-core"))],
            "templates": [source("A", Some("mainnet"))]
        });
        let groups = network_groups(&doc);
        assert_eq!(groups[0], (Some("mainnet"), vec!["A"]));
    }

    #[test]
    fn javascript_resolvers_pass() {
        let doc = json!({"mutations": {"resolvers": {"kind": "javascript", "file": "r.js"}}});
        assert!(check_resolver_kind(&doc).is_none());
    }

    #[test]
    fn unsupported_resolver_kind() {
        let doc = json!({"mutations": {"resolvers": {"kind": "python", "file": "r.py"}}});
        let err = check_resolver_kind(&doc).unwrap();
        assert_eq!(err.kind, ErrorKind::UnsupportedResolverKind);
        assert_eq!(
            err.message,
            "Requested resolver kind python is not supported. \
             Please use one of the following supported kinds: javascript"
        );
    }

    #[test]
    fn absent_resolvers_pass() {
        assert!(check_resolver_kind(&json!({})).is_none());
        assert!(check_resolver_kind(&json!({"mutations": {"file": "m.yaml"}})).is_none());
        assert!(check_resolver_kind(&json!({"mutations": {"resolvers": null}})).is_none());
    }

    #[test]
    fn both_invariants_can_fire() {
        let doc = json!({
            "dataSources": [source("A", Some("mainnet")), source("B", Some("rinkeby"))],
            "mutations": {"resolvers": {"kind": "python"}}
        });
        let errors = check_domain_invariants(&doc);
        let kinds: Vec<_> = errors.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            [ErrorKind::NetworkConflict, ErrorKind::UnsupportedResolverKind]
        );
    }
}
