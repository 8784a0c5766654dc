//! # Embedded Manifest Schema
//!
//! The manifest schema ships inside the binary and is parsed at most once per
//! process.

use std::sync::OnceLock;

use sgm_schema::{SchemaError, TypeSchema};

/// Description of the subgraph manifest shape.
pub const MANIFEST_SCHEMA_SOURCE: &str = include_str!("../manifest-schema.graphql");

/// Type every manifest is validated against.
pub const ROOT_TYPE: &str = "SubgraphManifest";

static MANIFEST_SCHEMA: OnceLock<Result<TypeSchema, SchemaError>> = OnceLock::new();

/// The parsed embedded schema.
///
/// # Errors
///
/// Returns the parse error if the embedded description is malformed. The
/// error is computed once and returned on every call.
pub fn manifest_schema() -> Result<&'static TypeSchema, SchemaError> {
    MANIFEST_SCHEMA
        .get_or_init(|| TypeSchema::parse(MANIFEST_SCHEMA_SOURCE))
        .as_ref()
        .map_err(Clone::clone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sgm_schema::TypeDefinition;

    #[test]
    fn embedded_schema_parses() {
        let schema = manifest_schema().unwrap();
        assert!(matches!(schema.root(ROOT_TYPE), Ok(TypeDefinition::Object(_))));
    }

    #[test]
    fn embedded_schema_is_loaded_once() {
        let a = manifest_schema().unwrap();
        let b = manifest_schema().unwrap();
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn unions_sit_at_deducible_paths() {
        let schema = manifest_schema().unwrap();
        let TypeDefinition::Object(root) = schema.root(ROOT_TYPE).unwrap() else {
            panic!("root is not an object type");
        };
        assert_eq!(root.field("dataSources").unwrap().ty.base_name(), "DataSource");
        assert_eq!(root.field("mutations").unwrap().ty.base_name(), "Mutations");
        assert!(matches!(
            schema.definition("Resolvers"),
            Some(TypeDefinition::Union(u)) if u.has_member("JavascriptResolvers")
        ));
    }
}
