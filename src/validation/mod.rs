//! Export validation and the diagnostic stream.
//!
//! Accumulated exports are checked against the contribution schemas before
//! they are persisted. An export survives only if its flattened predicate
//! set is exactly the required set for its declared type; there is no
//! partial persistence of an invalid export.

mod warning;

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::exports::{ExportAccumulator, ExportRecord};
use crate::types::{vocab, ContributionType};

pub use warning::{Diagnostic, Diagnostics, Severity, SourceLocation};

/// An export that passed validation.
///
/// `pairs` holds every collected pair, duplicated predicates included; only
/// the check itself looks at the flattened view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedExport {
    pub name: String,
    pub contribution_type: ContributionType,
    pub pairs: Vec<(String, String)>,
}

/// Why an export was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Rejection {
    /// No `terms:type` pair was collected.
    MissingType,
    /// The declared type is not one of the supported contributions.
    UnsupportedType(String),
    /// The predicate set differs from the schema. Only the missing
    /// predicates are listed; unexpected extras are never reported.
    PredicateMismatch { missing: BTreeSet<String> },
}

/// Result of validating every accumulated export.
#[derive(Debug, Clone, Default)]
pub struct ExportValidation {
    pub accepted: Vec<ValidatedExport>,
    pub rejected: Vec<(String, Rejection)>,
    pub diagnostics: Diagnostics,
}

/// Validate a single export record.
pub fn validate_export(record: &ExportRecord) -> Result<ValidatedExport, Rejection> {
    let flat = record.flatten();

    let type_name = flat
        .iter()
        .find(|(p, _)| *p == vocab::TYPE)
        .map(|(_, o)| *o)
        .ok_or(Rejection::MissingType)?;

    let contribution_type = ContributionType::from_name(type_name)
        .ok_or_else(|| Rejection::UnsupportedType(type_name.to_string()))?;

    let present: BTreeSet<&str> = flat.iter().map(|(p, _)| *p).collect();
    let required: BTreeSet<&str> = contribution_type.required_set();

    if present != required {
        let missing = required
            .difference(&present)
            .map(|p| p.to_string())
            .collect();
        return Err(Rejection::PredicateMismatch { missing });
    }

    Ok(ValidatedExport {
        name: record.name.clone(),
        contribution_type,
        pairs: record.pairs().to_vec(),
    })
}

/// Validate all exports, keeping accumulator order for the accepted ones.
pub fn validate_exports(exports: &ExportAccumulator) -> ExportValidation {
    let mut validation = ExportValidation::default();

    for record in exports.iter() {
        match validate_export(record) {
            Ok(valid) => {
                debug!(export = %record.name, kind = %valid.contribution_type, "export validated");
                validation.accepted.push(valid);
            }
            Err(rejection) => {
                validation.diagnostics.push(rejection_diagnostic(&record.name, &rejection));
                validation.rejected.push((record.name.clone(), rejection));
            }
        }
    }

    validation
}

fn rejection_diagnostic(name: &str, rejection: &Rejection) -> Diagnostic {
    match rejection {
        Rejection::MissingType => Diagnostic::warning(
            "rdftex::export::untyped",
            format!("Export of {} is skipped because it has no type", name),
        )
        .with_help("Declare the export with \\rdfexport{name}{Type}{...}"),
        Rejection::UnsupportedType(ty) => Diagnostic::warning(
            "rdftex::export::unsupported-type",
            format!("Export of {} is skipped due to unsupported type '{}'", name, ty),
        )
        .with_help("Supported types: Definition, Dataset, Figure, ExpResult, Software"),
        Rejection::PredicateMismatch { missing } => {
            let listed: Vec<String> = missing.iter().map(|p| vocab::compact(p)).collect();
            Diagnostic::warning(
                "rdftex::export::incomplete",
                format!(
                    "Export of {} is skipped due to missing predicates: {}",
                    name,
                    listed.join(", ")
                ),
            )
        }
    }
}
