//! # Validate Subcommand
//!
//! Validates one manifest file and prints either the combined report or the
//! error list as JSON.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use sgm_core::ValidationError;
use sgm_manifest::{ManifestError, ManifestValidator, ROOT_TYPE};
use sgm_schema::TypeSchema;

/// Output format for validation results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable report.
    #[default]
    Text,
    /// JSON array of `{path, kind, message}` objects.
    Json,
}

/// Arguments for the `sgm validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Manifest file to validate (usually subgraph.yaml).
    #[arg(value_name = "MANIFEST")]
    pub manifest: PathBuf,

    /// Type schema to validate against instead of the built-in manifest schema.
    #[arg(long, value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// Root type of the schema the manifest must conform to.
    #[arg(long, value_name = "NAME", default_value = ROOT_TYPE)]
    pub root_type: String,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Execute the validate subcommand, printing to stdout.
///
/// Returns exit code: 0 if the manifest is valid, 1 if it is not.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let stdout = std::io::stdout();
    validate_to(args, &mut stdout.lock())
}

/// Execute the validate subcommand, writing results to `out`.
pub fn validate_to(args: &ValidateArgs, out: &mut dyn Write) -> Result<u8> {
    let custom = args.schema.as_deref().map(load_schema).transpose()?;
    let validator = match &custom {
        Some(schema) => ManifestValidator::new(schema),
        None => ManifestValidator::embedded().context("built-in manifest schema is invalid")?,
    }
    .with_root_type(&args.root_type);

    let errors = match validator.load(&args.manifest) {
        Ok(_) => Vec::new(),
        Err(ManifestError::Invalid(report)) => {
            if args.format == OutputFormat::Text {
                writeln!(out, "{report}")?;
            }
            report.errors
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to validate {}", args.manifest.display()))
        }
    };

    match args.format {
        OutputFormat::Json => writeln!(out, "{}", render_json(&errors)?)?,
        OutputFormat::Text if errors.is_empty() => {
            writeln!(out, "{}: valid", args.manifest.display())?
        }
        OutputFormat::Text => {}
    }

    tracing::info!(errors = errors.len(), "validation finished");
    Ok(if errors.is_empty() { 0 } else { 1 })
}

fn load_schema(path: &Path) -> Result<TypeSchema> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read schema {}", path.display()))?;
    let schema = TypeSchema::parse(&source)
        .with_context(|| format!("invalid schema {}", path.display()))?;
    tracing::debug!(schema = %path.display(), types = schema.len(), "loaded schema");
    Ok(schema)
}

fn render_json(errors: &[ValidationError]) -> Result<String> {
    serde_json::to_string_pretty(errors).context("failed to serialize errors")
}
