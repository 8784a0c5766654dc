//! # Union Deduction
//!
//! When the validator meets a union type it has to pick the member to
//! validate against. There is no general inference here: a closed table maps
//! the structural pattern of the current path (see [`Path::pattern`]) to a
//! rule that inspects the value's discriminating keys. A union at any path
//! not in the table cannot be deduced.

use serde_json::Value;
use sgm_core::Path;

/// Result of looking up a union member for a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deduction {
    /// The rule for this path selected a member name.
    Candidate(&'static str),
    /// A rule exists for this path but the value carries no discriminator
    /// it recognizes.
    NoCandidate,
    /// No rule is registered for this path.
    NoRule,
}

type Rule = fn(&Value) -> Option<&'static str>;

const UNION_DEDUCTIONS: &[(&str, Rule)] = &[
    ("mutations", mutations_member),
    ("mutations.resolvers", resolvers_member),
    ("dataSources[$i]", data_source_member),
];

/// A reference to a separate mutations manifest (`file:`) or an inline one.
fn mutations_member(value: &Value) -> Option<&'static str> {
    let map = value.as_object()?;
    if map.contains_key("file") {
        Some("Manifest")
    } else {
        Some("MutationsManifest")
    }
}

fn resolvers_member(value: &Value) -> Option<&'static str> {
    match value.get("kind").and_then(Value::as_str) {
        Some("javascript") => Some("JavascriptResolvers"),
        _ => None,
    }
}

fn data_source_member(value: &Value) -> Option<&'static str> {
    match value.get("kind").and_then(Value::as_str) {
        Some("ethereum/contract") => Some("EthereumContractDataSource"),
        _ => None,
    }
}

/// Select the union member for `value` found at `path`.
pub fn deduce_union_member(path: &Path, value: &Value) -> Deduction {
    let pattern = path.pattern();
    let deduction = match UNION_DEDUCTIONS.iter().find(|(site, _)| *site == pattern) {
        None => Deduction::NoRule,
        Some((_, rule)) => rule(value).map_or(Deduction::NoCandidate, Deduction::Candidate),
    };
    tracing::trace!(path = %path, %pattern, ?deduction, "union deduction");
    deduction
}

/// Path patterns that have a deduction rule.
pub fn union_sites() -> impl Iterator<Item = &'static str> {
    UNION_DEDUCTIONS.iter().map(|(site, _)| *site)
}
