//! # Value Validation
//!
//! Walks a [`DocumentValue`] together with a cursor into the [`TypeSchema`]
//! and collects every mismatch as a path-annotated [`ValidationError`].
//!
//! ## Rules
//!
//! - A null or absent value is valid unless the type is non-null.
//! - A non-null type reports a missing value and stops; otherwise it checks
//!   the same value against its inner type.
//! - Lists and objects check their own shape first. A wrong shape is one
//!   error and nothing below it is visited.
//! - Every declared object field is visited, present or not, so missing
//!   required fields are reported. Undeclared keys are reported once each.
//! - Union members are picked by [`deduce_union_member`]; the chosen
//!   member's errors are reported like any other subtree.
//!
//! Siblings never affect each other: every child gets a freshly derived
//! [`ValidationContext`] and its errors are appended in field order (then
//! undeclared keys in document order) or index order.

use serde_json::Value;
use sgm_core::{
    kind_name, to_yaml_snippet, DocumentValue, ErrorKind, Path, PathSegment, ValidationError,
};

use crate::deduce::{deduce_union_member, Deduction};
use crate::files::FileResolver;
use crate::schema::{
    ObjectType, ScalarType, SchemaError, TypeDefinition, TypeRef, TypeSchema, UnionType,
};

static NULL: Value = Value::Null;

/// Where the validator currently is in the type graph: a field's type
/// reference, or a grounded definition.
#[derive(Debug, Clone, Copy)]
pub enum TypeNode<'s> {
    Ref(&'s TypeRef),
    Def(&'s TypeDefinition),
}

impl TypeNode<'_> {
    fn is_non_null(&self) -> bool {
        matches!(self, TypeNode::Ref(TypeRef::NonNull(_)))
    }
}

/// Everything one validation step needs. Never mutated: descending produces
/// a new context.
#[derive(Clone)]
pub struct ValidationContext<'a> {
    schema: &'a TypeSchema,
    node: TypeNode<'a>,
    path: Path,
    files: &'a dyn FileResolver,
}

impl<'a> ValidationContext<'a> {
    /// A context at the document root.
    pub fn new(schema: &'a TypeSchema, node: TypeNode<'a>, files: &'a dyn FileResolver) -> Self {
        Self {
            schema,
            node,
            path: Path::root(),
            files,
        }
    }

    pub fn schema(&self) -> &'a TypeSchema {
        self.schema
    }

    pub fn node(&self) -> TypeNode<'a> {
        self.node
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Same location, different type.
    fn with_node(&self, node: TypeNode<'a>) -> Self {
        Self {
            node,
            path: self.path.clone(),
            ..*self
        }
    }

    /// One level down in the document.
    fn descend(&self, segment: impl Into<PathSegment>, node: TypeNode<'a>) -> Self {
        Self {
            node,
            path: self.path.join(segment),
            ..*self
        }
    }

    fn error(&self, kind: ErrorKind, message: impl Into<String>) -> ValidationError {
        ValidationError::new(self.path.clone(), kind, message)
    }

    fn mismatch(&self, expected: &str, value: &Value) -> ValidationError {
        self.error(
            ErrorKind::Structural,
            format!(
                "Expected {expected}, found {}:\n{}",
                kind_name(value),
                to_yaml_snippet(value)
            ),
        )
    }
}

/// Validate `value` against the type at `ctx`, returning every error found.
pub fn validate(value: &DocumentValue, ctx: &ValidationContext<'_>) -> Vec<ValidationError> {
    if value.is_null() && !ctx.node.is_non_null() {
        return Vec::new();
    }

    match ctx.node {
        TypeNode::Ref(TypeRef::NonNull(inner)) => validate_non_null(value, inner, ctx),
        TypeNode::Ref(TypeRef::List(inner)) => validate_list(value, inner, ctx),
        TypeNode::Ref(ty @ TypeRef::Named(_)) => validate_named(value, ty, ctx),
        TypeNode::Def(TypeDefinition::Scalar(scalar)) => validate_scalar(value, scalar, ctx),
        TypeNode::Def(TypeDefinition::Object(object)) => validate_object(value, object, ctx),
        TypeNode::Def(TypeDefinition::Union(union)) => validate_union(value, union, ctx),
        TypeNode::Def(def @ TypeDefinition::Unsupported(_)) => vec![ctx.error(
            ErrorKind::UnsupportedSchemaKind,
            format!(
                "No validator for unsupported schema type: {}",
                def.kind_name()
            ),
        )],
    }
}

/// Validate a whole document against the named root type.
///
/// A null document short-circuits with a single error at the root.
///
/// # Errors
///
/// `SchemaError::UnknownRootType` if `root_type` is not declared.
pub fn validate_document(
    schema: &TypeSchema,
    root_type: &str,
    document: &DocumentValue,
    files: &dyn FileResolver,
) -> Result<Vec<ValidationError>, SchemaError> {
    let root = schema.root(root_type)?;

    if document.is_null() {
        return Ok(vec![ValidationError::new(
            Path::root(),
            ErrorKind::Structural,
            format!("Expected non-empty value, found {}", kind_name(document)),
        )]);
    }

    tracing::debug!(root_type, "validating document");
    let ctx = ValidationContext::new(schema, TypeNode::Def(root), files);
    let errors = validate(document, &ctx);
    tracing::debug!(errors = errors.len(), "structural validation finished");
    Ok(errors)
}

fn validate_non_null(
    value: &Value,
    inner: &TypeRef,
    ctx: &ValidationContext<'_>,
) -> Vec<ValidationError> {
    if value.is_null() {
        return vec![ctx.error(ErrorKind::MissingRequiredValue, "No value provided")];
    }
    validate(value, &ctx.with_node(TypeNode::Ref(inner)))
}

fn validate_list(
    value: &Value,
    inner: &TypeRef,
    ctx: &ValidationContext<'_>,
) -> Vec<ValidationError> {
    let Some(items) = value.as_array() else {
        return vec![ctx.mismatch("list", value)];
    };
    items
        .iter()
        .enumerate()
        .flat_map(|(i, item)| validate(item, &ctx.descend(i, TypeNode::Ref(inner))))
        .collect()
}

fn validate_named(
    value: &Value,
    ty: &TypeRef,
    ctx: &ValidationContext<'_>,
) -> Vec<ValidationError> {
    match ctx.schema.resolve(ty) {
        Ok(def) => validate(value, &ctx.with_node(TypeNode::Def(def))),
        Err(e) => vec![ctx.error(ErrorKind::UnsupportedSchemaKind, e.to_string())],
    }
}

fn validate_object(
    value: &Value,
    object: &ObjectType,
    ctx: &ValidationContext<'_>,
) -> Vec<ValidationError> {
    let Some(map) = value.as_object() else {
        return vec![ctx.mismatch("map", value)];
    };

    let mut errors = Vec::new();
    for field in &object.fields {
        let entry = map.get(&field.name).unwrap_or(&NULL);
        let field_ctx = ctx.descend(field.name.as_str(), TypeNode::Ref(&field.ty));
        errors.extend(validate(entry, &field_ctx));
    }

    for key in map.keys().filter(|k| object.field(k).is_none()) {
        let path = ctx.path.join(key.as_str());
        let error = if key == "templates" {
            ValidationError::new(
                path,
                ErrorKind::LegacyTemplates,
                "The way to declare data source templates has changed, please move the \
                 templates from inside data sources to a `templates:` field at the top \
                 level of the manifest.",
            )
        } else {
            ValidationError::new(
                path,
                ErrorKind::UnknownField,
                format!("Unexpected key in map: {key}"),
            )
        };
        errors.push(error);
    }

    errors
}

fn validate_union(
    value: &Value,
    union: &UnionType,
    ctx: &ValidationContext<'_>,
) -> Vec<ValidationError> {
    let members = union.members.join(", ");
    let unresolved =
        |message: String| vec![ctx.error(ErrorKind::UnresolvedUnionVariant, message)];

    match deduce_union_member(&ctx.path, value) {
        Deduction::Candidate(name) if union.has_member(name) => {
            match ctx.schema.definition(name) {
                Some(def) => validate(value, &ctx.with_node(TypeNode::Def(def))),
                None => unresolved(format!(
                    "Deduced type {name} from union {}, but {name} is not declared in the schema",
                    union.name
                )),
            }
        }
        Deduction::Candidate(name) => unresolved(format!(
            "Deduced type {name} from union {}, but such type is not a declared member \
             (declared members: {members})",
            union.name
        )),
        Deduction::NoCandidate => unresolved(format!(
            "Could not deduce which member of union {} this value is (declared members: {members})",
            union.name
        )),
        Deduction::NoRule => unresolved(format!(
            "No member deduction is defined for union {} at '{}' (declared members: {members})",
            union.name,
            ctx.path.pattern()
        )),
    }
}

/// Scalar names the validator knows how to check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Primitive {
    String,
    BigInt,
    Boolean,
    File,
    Address,
}

impl Primitive {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "String" => Some(Self::String),
            "BigInt" => Some(Self::BigInt),
            "Boolean" => Some(Self::Boolean),
            "File" => Some(Self::File),
            "Address" => Some(Self::Address),
            _ => None,
        }
    }
}

fn validate_scalar(
    value: &Value,
    scalar: &ScalarType,
    ctx: &ValidationContext<'_>,
) -> Vec<ValidationError> {
    let Some(primitive) = Primitive::from_name(&scalar.name) else {
        return vec![ctx.error(
            ErrorKind::UnsupportedSchemaKind,
            format!("No validator for unsupported scalar type: {}", scalar.name),
        )];
    };

    let error = match primitive {
        Primitive::String => (!value.is_string()).then(|| ctx.mismatch("string", value)),
        Primitive::BigInt => (!value.is_number()).then(|| ctx.mismatch("BigInt", value)),
        Primitive::Boolean => (!value.is_boolean()).then(|| ctx.mismatch("boolean", value)),
        Primitive::File => check_file(value, ctx),
        Primitive::Address => check_address(value, ctx),
    };
    error.into_iter().collect()
}

fn check_file(value: &Value, ctx: &ValidationContext<'_>) -> Option<ValidationError> {
    let Some(declared) = value.as_str() else {
        return Some(ctx.mismatch("filename", value));
    };
    let resolved = ctx.files.resolve(declared);
    if ctx.files.exists(&resolved) {
        None
    } else {
        tracing::debug!(
            path = %ctx.path,
            resolved = %resolved.display(),
            "referenced file missing"
        );
        Some(ctx.error(
            ErrorKind::FileNotFound,
            format!("File does not exist: {declared}"),
        ))
    }
}

/// Contract addresses are 40 hex digits, optionally prefixed with `0x`.
fn check_address(value: &Value, ctx: &ValidationContext<'_>) -> Option<ValidationError> {
    let Some(address) = value.as_str() else {
        return Some(ctx.mismatch("contract address", value));
    };

    let digits = match address.strip_prefix("0x") {
        Some(rest) if address.len() == 42 => rest,
        _ if address.len() == 40 => address,
        _ => {
            return Some(ctx.error(
                ErrorKind::Structural,
                format!(
                    "Contract address must have length 40 (or 42 if prefixed with 0x) \
                     but has length {}: {address}",
                    address.len()
                ),
            ))
        }
    };

    if digits.chars().all(|c| c.is_ascii_hexdigit()) {
        None
    } else {
        Some(ctx.error(
            ErrorKind::Structural,
            format!("Contract address is not a hexadecimal string: {address}"),
        ))
    }
}
