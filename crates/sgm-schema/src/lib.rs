//! # sgm-schema: Schema-Driven Document Validation
//!
//! Interprets a declarative type schema and walks a parsed document against
//! it, producing every path-annotated error in one pass.
//!
//! ## Modules
//!
//! - [`schema`]: the immutable type graph ([`TypeSchema`]) and the type
//!   resolver ([`TypeSchema::resolve`]).
//! - [`sdl`]: maps GraphQL SDL, parsed by `graphql-parser`, onto type
//!   definitions (scalars, object types, unions, list and non-null wrappers).
//! - [`validate`]: the validator: one handler per type kind, dispatched by
//!   exhaustive match.
//! - [`deduce`]: the closed table that picks a union's member from the
//!   current path and the value's discriminating keys.
//! - [`files`]: the [`FileResolver`] seam used by `File` scalars.
//!
//! ## Crate Policy
//!
//! - Depends only on `sgm-core` internally.
//! - Validation is pure: documents and schemas are never mutated, and no
//!   state outlives a call. Independent runs may execute concurrently.
//! - Document problems are returned as data; only schema defects are
//!   `Err`.

pub mod deduce;
pub mod files;
pub mod schema;
pub mod sdl;
pub mod validate;

pub use deduce::{deduce_union_member, Deduction};
pub use files::{FileResolver, KnownFiles, RelativeTo};
pub use schema::{
    FieldDefinition, ObjectType, ScalarType, SchemaError, TypeDefinition, TypeRef, TypeSchema,
    UnionType, UnsupportedType,
};
pub use validate::{validate, validate_document, TypeNode, ValidationContext};
