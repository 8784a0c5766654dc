//! # Type Schema
//!
//! The immutable type graph the validator interprets. A schema is a set of
//! named [`TypeDefinition`]s; fields refer to other types through
//! [`TypeRef`]s, which wrap a named reference in any number of list and
//! non-null layers.
//!
//! ## Closure Invariant
//!
//! A [`TypeSchema`] can only be built through [`TypeSchema::from_definitions`]
//! (or [`TypeSchema::parse`], which calls it), and construction rejects any
//! schema with a duplicate name or a reference to an undeclared type.
//! Resolution therefore always grounds out in a definition for a schema that
//! exists; a failure to resolve is a configuration defect, never a document
//! error.

use std::collections::{HashMap, HashSet};
use std::fmt;

use thiserror::Error;

use crate::sdl;

/// Fatal defect in a type schema description.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The description text is not valid schema language. The message
    /// carries the line and column of the offending token.
    #[error("{message}")]
    Parse { message: String },

    /// A well-formed definition that does not declare a type, such as a
    /// type extension.
    #[error("{kind} at line {line} is not supported in a type schema")]
    UnsupportedDefinition {
        kind: String,
        /// 1-based line the definition starts on.
        line: usize,
    },

    /// Two definitions share a name.
    #[error("type '{0}' is declared more than once")]
    DuplicateType(String),

    /// An object type declares the same field twice.
    #[error("field '{field}' is declared more than once in type '{type_name}'")]
    DuplicateField {
        /// Declaring object type.
        type_name: String,
        /// Repeated field name.
        field: String,
    },

    /// A field type or union member names a type that does not exist.
    #[error("type '{name}' referenced by '{referenced_by}' is not declared")]
    UndeclaredType {
        /// The missing type name.
        name: String,
        /// Type (and field) holding the reference.
        referenced_by: String,
    },

    /// A union member is declared, but not as an object type.
    #[error("member '{member}' of union '{union}' is a {kind}, not an object type")]
    UnionMemberNotObject {
        union: String,
        member: String,
        /// Declaration kind of the member, e.g. `UnionTypeDefinition`.
        kind: String,
    },

    /// The requested root type does not exist.
    #[error("root type '{0}' is not declared in the schema")]
    UnknownRootType(String),
}

/// Reference to a type from a field: a name wrapped in list and non-null
/// layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// Reference to a declared type by name.
    Named(String),
    /// Sequence of the inner type.
    List(Box<TypeRef>),
    /// The inner type, with null and absent values rejected.
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn list(inner: TypeRef) -> Self {
        Self::List(Box::new(inner))
    }

    pub fn non_null(inner: TypeRef) -> Self {
        Self::NonNull(Box::new(inner))
    }

    /// The name at the bottom of the wrapper chain.
    pub fn base_name(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::List(inner) | Self::NonNull(inner) => inner.base_name(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "{name}"),
            Self::List(inner) => write!(f, "[{inner}]"),
            Self::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

/// A leaf type, interpreted by name (`String`, `BigInt`, `File`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarType {
    pub name: String,
}

/// A named field of an object type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    pub name: String,
    pub ty: TypeRef,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A mapping with a fixed, ordered set of declared fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectType {
    pub name: String,
    pub fields: Vec<FieldDefinition>,
}

impl ObjectType {
    /// Look up a declared field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A polymorphic type whose value is one of several member object types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionType {
    pub name: String,
    pub members: Vec<String>,
}

impl UnionType {
    pub fn has_member(&self, name: &str) -> bool {
        self.members.iter().any(|m| m == name)
    }
}

/// A declaration the grammar accepts but the validator cannot interpret
/// (`enum`, `interface`, `input`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedType {
    pub name: String,
    /// Declaration kind, e.g. `EnumTypeDefinition`.
    pub kind: String,
}

/// A named, grounded type definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDefinition {
    Scalar(ScalarType),
    Object(ObjectType),
    Union(UnionType),
    Unsupported(UnsupportedType),
}

impl TypeDefinition {
    pub fn name(&self) -> &str {
        match self {
            Self::Scalar(t) => &t.name,
            Self::Object(t) => &t.name,
            Self::Union(t) => &t.name,
            Self::Unsupported(t) => &t.name,
        }
    }

    /// Declaration kind name, in the vocabulary of the description grammar.
    pub fn kind_name(&self) -> &str {
        match self {
            Self::Scalar(_) => "ScalarTypeDefinition",
            Self::Object(_) => "ObjectTypeDefinition",
            Self::Union(_) => "UnionTypeDefinition",
            Self::Unsupported(t) => &t.kind,
        }
    }
}

/// Immutable, closed set of named type definitions.
///
/// `TypeSchema` is `Send + Sync`; it is loaded once and shared read-only by
/// every validation run.
#[derive(Debug, Clone)]
pub struct TypeSchema {
    definitions: Vec<TypeDefinition>,
    by_name: HashMap<String, usize>,
}

impl TypeSchema {
    /// Parse a schema from its textual description.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Parse` for syntax errors,
    /// `SchemaError::UnsupportedDefinition` for definitions that declare no
    /// type, and any error [`from_definitions`](Self::from_definitions)
    /// reports.
    pub fn parse(source: &str) -> Result<Self, SchemaError> {
        let definitions = sdl::parse_definitions(source)?;
        let schema = Self::from_definitions(definitions)?;
        tracing::debug!(types = schema.len(), "parsed type schema");
        Ok(schema)
    }

    /// Build a schema from definitions, checking that names are unique,
    /// every reference resolves and every union member is an object type.
    ///
    /// Union members being objects keeps union resolution from looping: a
    /// union can never name itself or another union.
    ///
    /// # Errors
    ///
    /// `DuplicateType`, `DuplicateField`, `UndeclaredType` or
    /// `UnionMemberNotObject`.
    pub fn from_definitions(definitions: Vec<TypeDefinition>) -> Result<Self, SchemaError> {
        let mut by_name = HashMap::with_capacity(definitions.len());
        for (index, definition) in definitions.iter().enumerate() {
            if by_name.insert(definition.name().to_string(), index).is_some() {
                return Err(SchemaError::DuplicateType(definition.name().to_string()));
            }
        }

        for definition in &definitions {
            match definition {
                TypeDefinition::Object(object) => {
                    let mut seen = HashSet::new();
                    for field in &object.fields {
                        if !seen.insert(field.name.as_str()) {
                            return Err(SchemaError::DuplicateField {
                                type_name: object.name.clone(),
                                field: field.name.clone(),
                            });
                        }
                        let target = field.ty.base_name();
                        if !by_name.contains_key(target) {
                            return Err(SchemaError::UndeclaredType {
                                name: target.to_string(),
                                referenced_by: format!("{}.{}", object.name, field.name),
                            });
                        }
                    }
                }
                TypeDefinition::Union(union) => {
                    for member in &union.members {
                        let Some(&index) = by_name.get(member.as_str()) else {
                            return Err(SchemaError::UndeclaredType {
                                name: member.clone(),
                                referenced_by: union.name.clone(),
                            });
                        };
                        let target = &definitions[index];
                        if !matches!(target, TypeDefinition::Object(_)) {
                            return Err(SchemaError::UnionMemberNotObject {
                                union: union.name.clone(),
                                member: member.clone(),
                                kind: target.kind_name().to_string(),
                            });
                        }
                    }
                }
                TypeDefinition::Scalar(_) | TypeDefinition::Unsupported(_) => {}
            }
        }

        Ok(Self {
            definitions,
            by_name,
        })
    }

    /// Look up a definition by name.
    pub fn definition(&self, name: &str) -> Option<&TypeDefinition> {
        self.by_name.get(name).map(|&i| &self.definitions[i])
    }

    /// Look up the definition a validation run starts from.
    ///
    /// # Errors
    ///
    /// `SchemaError::UnknownRootType` if `name` is not declared.
    pub fn root(&self, name: &str) -> Result<&TypeDefinition, SchemaError> {
        self.definition(name)
            .ok_or_else(|| SchemaError::UnknownRootType(name.to_string()))
    }

    /// Follow list and non-null wrappers down to the named reference and
    /// return the definition it names.
    ///
    /// # Errors
    ///
    /// `SchemaError::UndeclaredType` if the name is not declared. This cannot
    /// happen for references that belong to this schema.
    pub fn resolve(&self, ty: &TypeRef) -> Result<&TypeDefinition, SchemaError> {
        match ty {
            TypeRef::List(inner) | TypeRef::NonNull(inner) => self.resolve(inner),
            TypeRef::Named(name) => self
                .definition(name)
                .ok_or_else(|| SchemaError::UndeclaredType {
                    name: name.clone(),
                    referenced_by: ty.to_string(),
                }),
        }
    }

    pub fn definitions(&self) -> &[TypeDefinition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
