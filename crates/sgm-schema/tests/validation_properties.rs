//! Behavioral properties of the validator against a manifest-shaped schema:
//! acceptance of exact shapes, independence of sibling errors, union member
//! selection and error propagation, and idempotence.

use proptest::prelude::*;
use serde_json::{json, Value};
use sgm_core::{ErrorKind, Path, ValidationError};
use sgm_schema::{validate_document, KnownFiles, TypeSchema};

const MANIFEST_SCHEMA: &str = r#"
scalar String
scalar File

type SubgraphManifest {
  specVersion: String!
  dataSources: [DataSource!]!
  mutations: Mutations
}

union DataSource = EthereumContractDataSource

type EthereumContractDataSource {
  kind: String!
  name: String!
  network: String
}

union Mutations = Manifest | MutationsManifest

type Manifest {
  file: File!
}

type MutationsManifest {
  schema: Schema!
  resolvers: Resolvers!
}

type Schema {
  file: File!
}

union Resolvers = JavascriptResolvers

type JavascriptResolvers {
  kind: String!
  file: File!
}

type Pair {
  left: Schema
  right: Schema
}
"#;

fn schema() -> TypeSchema {
    TypeSchema::parse(MANIFEST_SCHEMA).expect("test schema parses")
}

fn files() -> KnownFiles {
    KnownFiles::new(["./mutations.yaml", "./mutations.graphql", "./resolvers.js"])
}

fn check(document: &Value) -> Vec<ValidationError> {
    validate_document(&schema(), "SubgraphManifest", document, &files()).unwrap()
}

fn data_source(name: &str) -> Value {
    json!({"kind": "ethereum/contract", "name": name, "network": "mainnet"})
}

#[test]
fn exact_manifest_shape_validates_cleanly() {
    let doc = json!({
        "specVersion": "0.0.1",
        "dataSources": [data_source("Gravity"), data_source("Token")],
        "mutations": {
            "schema": {"file": "./mutations.graphql"},
            "resolvers": {"kind": "javascript", "file": "./resolvers.js"}
        }
    });
    assert_eq!(check(&doc), Vec::new());
}

#[test]
fn missing_non_null_field_is_one_error_and_siblings_still_checked() {
    let doc = json!({
        "dataSources": [{"kind": "ethereum/contract", "name": 5}]
    });
    let errors = check(&doc);
    assert_eq!(errors.len(), 2, "{errors:?}");

    let missing: Vec<_> = errors
        .iter()
        .filter(|e| e.kind == ErrorKind::MissingRequiredValue)
        .collect();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].path, Path::root().join("specVersion"));

    assert_eq!(errors[1].kind, ErrorKind::Structural);
    assert_eq!(errors[1].path.to_string(), "dataSources > 0 > name");
}

#[test]
fn undeclared_key_is_one_error_and_declared_siblings_still_checked() {
    let doc = json!({
        "specVersion": 1,
        "dataSources": [],
        "repository": "https://example.com/subgraph"
    });
    let errors = check(&doc);
    let unknown: Vec<_> = errors.iter().filter(|e| e.kind.is_unknown_field()).collect();
    assert_eq!(unknown.len(), 1);
    assert_eq!(unknown[0].path, Path::root().join("repository"));
    assert!(errors
        .iter()
        .any(|e| e.kind == ErrorKind::Structural && e.path == Path::root().join("specVersion")));
}

#[test]
fn mutations_with_file_dispatches_to_manifest_member() {
    let ok = json!({
        "specVersion": "0.0.1",
        "dataSources": [],
        "mutations": {"file": "./mutations.yaml"}
    });
    assert!(check(&ok).is_empty());

    // The `Manifest` member declares only `file`; its errors come through.
    let bad = json!({
        "specVersion": "0.0.1",
        "dataSources": [],
        "mutations": {"file": "./gone.yaml", "schema": {"file": "./mutations.graphql"}}
    });
    let errors = check(&bad);
    assert_eq!(errors.len(), 2, "{errors:?}");
    assert_eq!(errors[0].kind, ErrorKind::FileNotFound);
    assert_eq!(errors[0].path.to_string(), "mutations > file");
    assert_eq!(errors[1].kind, ErrorKind::UnknownField);
    assert_eq!(errors[1].path.to_string(), "mutations > schema");
}

#[test]
fn mutations_without_discriminator_is_one_unresolved_variant() {
    let doc = json!({
        "specVersion": "0.0.1",
        "dataSources": [],
        "mutations": ["file"]
    });
    let errors = check(&doc);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::UnresolvedUnionVariant);
    assert_eq!(errors[0].path, Path::root().join("mutations"));
    assert!(errors[0].message.contains("Manifest, MutationsManifest"));
}

#[test]
fn union_member_errors_are_propagated() {
    let doc = json!({
        "specVersion": "0.0.1",
        "dataSources": [{"kind": "ethereum/contract"}],
        "mutations": {
            "schema": {},
            "resolvers": {"kind": "javascript"}
        }
    });
    let errors = check(&doc);
    let paths: Vec<String> = errors.iter().map(|e| e.path.to_string()).collect();
    assert_eq!(
        paths,
        [
            "dataSources > 0 > name",
            "mutations > schema > file",
            "mutations > resolvers > file",
        ]
    );
    assert!(errors.iter().all(|e| e.kind == ErrorKind::MissingRequiredValue));
}

#[test]
fn unknown_data_source_kind_is_unresolved() {
    let doc = json!({
        "specVersion": "0.0.1",
        "dataSources": [data_source("Gravity"), {"kind": "near", "name": "Other"}]
    });
    let errors = check(&doc);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::UnresolvedUnionVariant);
    assert_eq!(errors[0].path.to_string(), "dataSources > 1");
}

#[test]
fn deduced_candidate_outside_declared_members() {
    let schema = TypeSchema::parse(
        r#"
        scalar String
        type Root { mutations: Inline }
        type Inline { resolvers: Resolvers }
        union Resolvers = WasmResolvers
        type WasmResolvers { kind: String! }
        "#,
    )
    .unwrap();
    let doc = json!({"mutations": {"resolvers": {"kind": "javascript"}}});
    let errors = validate_document(&schema, "Root", &doc, &files()).unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::UnresolvedUnionVariant);
    assert!(errors[0].message.contains("JavascriptResolvers"));
    assert!(errors[0].message.contains("WasmResolvers"));
}

#[test]
fn union_at_unlisted_path_never_deduces() {
    let schema = TypeSchema::parse(
        r#"
        scalar String
        type Root { sources: [DataSource] }
        union DataSource = EthereumContractDataSource
        type EthereumContractDataSource { kind: String }
        "#,
    )
    .unwrap();
    let doc = json!({"sources": [{"kind": "ethereum/contract"}]});
    let errors = validate_document(&schema, "Root", &doc, &files()).unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("sources[$i]"));
}

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        prop_oneof![
            Just("./mutations.graphql".to_string()),
            Just("./missing.graphql".to_string()),
            "[a-z]{0,8}",
        ]
        .prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        let key = prop_oneof![
            Just("file".to_string()),
            Just("kind".to_string()),
            Just("name".to_string()),
            Just("schema".to_string()),
            Just("templates".to_string()),
            "[a-z]{1,6}",
        ];
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map(key, inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    /// Validating the same document twice yields the same ordered errors.
    #[test]
    fn validation_is_idempotent(
        spec in json_value(),
        sources in json_value(),
        mutations in json_value(),
    ) {
        let doc = json!({"specVersion": spec, "dataSources": sources, "mutations": mutations});
        let first = check(&doc);
        let second = check(&doc);
        prop_assert_eq!(first, second);
    }

    /// Errors of a mapping are the concatenation of its fields' errors,
    /// each computed without knowledge of the other.
    #[test]
    fn sibling_errors_are_independent(left in json_value(), right in json_value()) {
        let schema = schema();
        let files = files();
        let pair = json!({"left": left.clone(), "right": right.clone()});
        let both = validate_document(&schema, "Pair", &pair, &files).unwrap();
        let only_left = validate_document(&schema, "Pair", &json!({"left": left}), &files)
            .unwrap();
        let only_right = validate_document(&schema, "Pair", &json!({"right": right}), &files)
            .unwrap();

        let mut combined = only_left;
        combined.extend(only_right);
        prop_assert_eq!(both, combined);
    }

    /// Any list of well-formed data sources is accepted.
    #[test]
    fn well_formed_data_sources_are_accepted(
        names in prop::collection::vec("[A-Za-z]{1,12}", 0..8)
    ) {
        let sources: Vec<Value> = names.iter().map(|n| data_source(n)).collect();
        let doc = json!({"specVersion": "0.0.1", "dataSources": sources});
        prop_assert!(check(&doc).is_empty());
    }
}
