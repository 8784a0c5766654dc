//! # Schema Description Grammar
//!
//! Schemas are written in the GraphQL schema definition language:
//!
//! ```text
//! scalar File
//!
//! type Schema {
//!   file: File!
//! }
//!
//! union DataSource = EthereumContractDataSource
//!
//! type SubgraphManifest {
//!   schema: Schema!
//!   dataSources: [DataSource!]!
//! }
//! ```
//!
//! Parsing is done by `graphql-parser`; this module maps its document onto
//! [`TypeDefinition`]s. Descriptions, directives and field arguments are
//! ignored. `enum`, `interface` and `input` declarations are recorded as
//! unsupported. Schema definitions, type extensions and directive
//! definitions have no meaning for document validation and are rejected
//! with the line they start on.

use graphql_parser::schema::{self as ast, Definition, TypeExtension};
use graphql_parser::Pos;

use crate::schema::{
    FieldDefinition, ObjectType, ScalarType, SchemaError, TypeDefinition, TypeRef, UnionType,
    UnsupportedType,
};

/// Parse `source` into type definitions, in declaration order.
///
/// # Errors
///
/// `SchemaError::Parse` if `source` is not valid schema language, and
/// `SchemaError::UnsupportedDefinition` for definitions that do not declare
/// a type.
pub fn parse_definitions(source: &str) -> Result<Vec<TypeDefinition>, SchemaError> {
    let document = ast::parse_schema::<String>(source).map_err(|e| SchemaError::Parse {
        message: e.to_string(),
    })?;

    document
        .definitions
        .into_iter()
        .map(|definition| match definition {
            Definition::TypeDefinition(ty) => Ok(type_definition(ty)),
            Definition::SchemaDefinition(schema) => {
                Err(unsupported_definition("schema definition", schema.position))
            }
            Definition::TypeExtension(extension) => Err(unsupported_definition(
                "type extension",
                extension_position(&extension),
            )),
            Definition::DirectiveDefinition(directive) => {
                Err(unsupported_definition("directive definition", directive.position))
            }
        })
        .collect()
}

fn type_definition(ty: ast::TypeDefinition<'_, String>) -> TypeDefinition {
    match ty {
        ast::TypeDefinition::Scalar(scalar) => TypeDefinition::Scalar(ScalarType {
            name: scalar.name,
        }),
        ast::TypeDefinition::Object(object) => TypeDefinition::Object(ObjectType {
            name: object.name,
            fields: object
                .fields
                .into_iter()
                .map(|field| FieldDefinition::new(field.name, type_ref(field.field_type)))
                .collect(),
        }),
        ast::TypeDefinition::Union(union) => TypeDefinition::Union(UnionType {
            name: union.name,
            members: union.types,
        }),
        ast::TypeDefinition::Enum(e) => unsupported_type(e.name, "EnumTypeDefinition"),
        ast::TypeDefinition::Interface(i) => unsupported_type(i.name, "InterfaceTypeDefinition"),
        ast::TypeDefinition::InputObject(i) => {
            unsupported_type(i.name, "InputObjectTypeDefinition")
        }
    }
}

fn type_ref(ty: ast::Type<'_, String>) -> TypeRef {
    match ty {
        ast::Type::NamedType(name) => TypeRef::Named(name),
        ast::Type::ListType(inner) => TypeRef::list(type_ref(*inner)),
        ast::Type::NonNullType(inner) => TypeRef::non_null(type_ref(*inner)),
    }
}

fn unsupported_type(name: String, kind: &str) -> TypeDefinition {
    TypeDefinition::Unsupported(UnsupportedType {
        name,
        kind: kind.to_string(),
    })
}

fn unsupported_definition(kind: &str, position: Pos) -> SchemaError {
    SchemaError::UnsupportedDefinition {
        kind: kind.to_string(),
        line: position.line,
    }
}

fn extension_position(extension: &TypeExtension<'_, String>) -> Pos {
    match extension {
        TypeExtension::Scalar(e) => e.position,
        TypeExtension::Object(e) => e.position,
        TypeExtension::Interface(e) => e.position,
        TypeExtension::Union(e) => e.position,
        TypeExtension::Enum(e) => e.position,
        TypeExtension::InputObject(e) => e.position,
    }
}
