//! Build command implementation.
//!
//! Runs the pipeline once over every discovered source, writes the `.tex`
//! outputs and the export document.

use clap::Args;

use crate::discovery::Project;
use crate::error::Result;
use crate::output::{display_path, plural, Printer};
use crate::preprocess::{Pipeline, RunReport};
use crate::store::Backend;

use super::{open_pipeline, ProjectArgs};

/// Process all *.rdf.tex files and write the export document
#[derive(Args, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

pub fn run(args: BuildArgs, printer: &Printer) -> Result<RunReport> {
    let project = args.project.load_project()?;
    let pipeline = open_pipeline(&project, false)?;
    run_once(&project, &pipeline, printer)
}

/// One pipeline run with status output.
pub fn run_once(project: &Project, pipeline: &Pipeline<Backend>, printer: &Printer) -> Result<RunReport> {
    for source in &project.sources {
        printer.status("Processing", &display_path(&source.source));
    }

    let report = pipeline.run(&project.sources)?;
    print_report(&report, &project.export_path.display().to_string(), printer);
    Ok(report)
}

/// Summarize a finished run.
pub fn print_report(report: &RunReport, export_path: &str, printer: &Printer) {
    printer.diagnostics(&report.diagnostics);

    if !report.dry_run {
        for file in &report.files {
            printer.status("Wrote", &display_path(&file.output));
        }
    }

    if report.injected > 0 {
        printer.info(
            "Injected",
            &format!(
                "{} into {}",
                plural(report.injected, "environment", "environments"),
                display_path(&report.root)
            ),
        );
    }

    let accepted = report.validation.accepted.len();
    let rejected = report.validation.rejected.len();
    if report.dry_run {
        printer.info(
            "Exports",
            &format!("{} valid, {} rejected", accepted, rejected),
        );
    } else {
        printer.status(
            "Exported",
            &format!(
                "{} to {}",
                plural(report.persisted, "contribution", "contributions"),
                export_path
            ),
        );
    }

    let summary = format!(
        "{} ({}, {})",
        plural(report.files.len(), "file", "files"),
        plural(report.diagnostics.error_count(), "error", "errors"),
        plural(report.diagnostics.warning_count(), "warning", "warnings"),
    );

    if report.diagnostics.has_errors() {
        printer.warning("Finished", &summary);
    } else {
        printer.status("Finished", &summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_build_writes_outputs_and_exports() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("minskg.nt"), "").unwrap();
        fs::write(
            dir.path().join("main.rdf.tex"),
            "\\rdfprefix{terms}{https://example.org/scikg/terms/}\n\
             \\begin{document}\n\
             \\rdfexport{e1}{Definition}{terms:definition_content=A thing.}\n\
             \\end{document}\n",
        )
        .unwrap();

        let args = BuildArgs {
            project: ProjectArgs {
                path: dir.path().to_path_buf(),
                ..Default::default()
            },
        };
        let report = run(args, &Printer::plain()).unwrap();

        assert_eq!(report.persisted, 1);
        assert_eq!(
            fs::read_to_string(dir.path().join("main.tex")).unwrap(),
            "\\begin{document}\n\\end{document}\n"
        );
        let exported = fs::read_to_string(dir.path().join("exports.ttl")).unwrap();
        assert!(exported.contains("terms:definition_content \"A thing.\""));
    }

    #[test]
    fn test_build_missing_store_is_an_error() {
        let dir = tempdir().unwrap();
        let args = BuildArgs {
            project: ProjectArgs {
                path: dir.path().to_path_buf(),
                ..Default::default()
            },
        };

        assert!(run(args, &Printer::plain()).is_err());
    }
}
