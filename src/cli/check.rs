//! Check command implementation.
//!
//! A full run that writes nothing: every directive is resolved and every
//! export validated, and the diagnostics are reported.

use clap::Args;

use crate::error::{RdftexError, Result};
use crate::output::{display_path, Printer};
use crate::preprocess::RunReport;

use super::build::print_report;
use super::{open_pipeline, ProjectArgs};

/// Process everything without writing any file
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

pub fn run(args: CheckArgs, printer: &Printer) -> Result<RunReport> {
    let project = args.project.load_project()?;
    let pipeline = open_pipeline(&project, true)?;

    for source in &project.sources {
        printer.status("Checking", &display_path(&source.source));
    }

    let report = pipeline.run(&project.sources)?;
    print_report(&report, &project.export_path.display().to_string(), printer);

    let errors = if args.strict {
        report.diagnostics.len()
    } else {
        report.diagnostics.error_count()
    };

    if errors > 0 {
        return Err(RdftexError::CheckFailed { errors });
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn project(dir: &std::path::Path, body: &str) -> CheckArgs {
        fs::write(dir.join("minskg.nt"), "").unwrap();
        fs::write(dir.join("main.rdf.tex"), body).unwrap();
        CheckArgs {
            project: ProjectArgs {
                path: dir.to_path_buf(),
                ..Default::default()
            },
            strict: false,
        }
    }

    #[test]
    fn test_check_writes_nothing() {
        let dir = tempdir().unwrap();
        let args = project(dir.path(), "\\begin{document}\n");

        let report = run(args, &Printer::plain()).unwrap();

        assert!(report.dry_run);
        assert!(!dir.path().join("main.tex").exists());
        assert!(!dir.path().join("exports.ttl").exists());
    }

    #[test]
    fn test_check_fails_on_errors() {
        let dir = tempdir().unwrap();
        let args = project(dir.path(), "\\begin{document}\n\\rdfimport{a}{b}{c\n");

        let err = run(args, &Printer::plain()).unwrap_err();
        assert!(matches!(err, RdftexError::CheckFailed { errors: 1 }));
    }

    #[test]
    fn test_strict_counts_warnings() {
        let dir = tempdir().unwrap();
        let mut args = project(dir.path(), "\\begin{document}\n\\rdfimport{a}{b}\n");

        args.strict = false;
        assert!(run(args, &Printer::plain()).is_ok());

        let mut args = project(dir.path(), "\\begin{document}\n\\rdfimport{a}{b}\n");
        args.strict = true;
        assert!(run(args, &Printer::plain()).is_err());
    }
}
