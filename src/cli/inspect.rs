//! Inspect command implementation.
//!
//! Prints the flattened neighbourhood of a content node, its classification,
//! and which required predicates it lacks.

use clap::Args;

use crate::error::{RdftexError, Result};
use crate::output::Printer;
use crate::store::{Backend, Inspection};
use crate::types::vocab;

use super::ProjectArgs;

/// Show what the knowledge store knows about a content node
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// IRI of the content node
    pub iri: String,

    /// Print JSON to stdout instead of a summary
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub project: ProjectArgs,
}

pub fn run(args: InspectArgs, printer: &Printer) -> Result<Inspection> {
    let project = args.project.load_project()?;
    let manifest = &project.manifest;
    let backend = Backend::open(&manifest.backend, &project.store_path, &project.media_root)?;

    let inspection = backend.inspect(&args.iri);

    if args.json {
        let json = serde_json::to_string_pretty(&inspection).map_err(|e| RdftexError::Parse {
            message: format!("Failed to serialize inspection: {}", e),
            help: None,
        })?;
        println!("{}", json);
    } else {
        print_inspection(&inspection, printer);
    }

    Ok(inspection)
}

fn print_inspection(inspection: &Inspection, printer: &Printer) {
    match (&inspection.contribution_type, &inspection.error) {
        (Some(ty), _) => printer.info(ty.as_str(), &inspection.iri),
        (None, Some(error)) => printer.warning("Unresolved", error),
        (None, None) => printer.warning("Unresolved", &inspection.iri),
    }

    for (predicate, object) in &inspection.values {
        printer.info(&vocab::compact(predicate), object);
    }

    if !inspection.missing.is_empty() {
        let missing: Vec<String> = inspection.missing.iter().map(|p| vocab::compact(p)).collect();
        printer.warning("Missing", &missing.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContributionType;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_inspect_classified_node() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("minskg.nt"),
            "<https://ex.org/c> <https://example.org/scikg/terms/type> \"Software\" .\n\
             <https://ex.org/c> <https://example.org/scikg/terms/software_name> \"rdftex\" .\n",
        )
        .unwrap();

        let args = InspectArgs {
            iri: "https://ex.org/c".to_string(),
            json: false,
            project: ProjectArgs {
                path: dir.path().to_path_buf(),
                ..Default::default()
            },
        };
        let inspection = run(args, &Printer::plain()).unwrap();

        assert_eq!(inspection.contribution_type, Some(ContributionType::Software));
        assert_eq!(inspection.missing.len(), 2);
    }
}
