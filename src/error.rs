use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for rdftex operations.
///
/// Only conditions that abort a whole run live here. Directive-level and
/// export-level problems are recovered locally and reported as
/// [`crate::validation::Diagnostic`]s instead.
#[derive(Error, Diagnostic, Debug)]
pub enum RdftexError {
    #[error("IO error: {0}")]
    #[diagnostic(code(rdftex::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(rdftex::io))]
    Io { path: PathBuf, message: String },

    #[error("Parse error: {message}")]
    #[diagnostic(code(rdftex::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(rdftex::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Unsupported knowledge-store backend '{name}'")]
    #[diagnostic(
        code(rdftex::backend),
        help("Currently only the MinSKG backend is supported")
    )]
    UnsupportedBackend { name: String },

    #[error("Expected exactly one root file containing \\begin{{document}}, found {}", candidates.len())]
    #[diagnostic(code(rdftex::root))]
    AmbiguousRootFile {
        candidates: Vec<PathBuf>,
        #[help]
        help: Option<String>,
    },

    #[error("{path}:{line}: malformed export pair '{token}'")]
    #[diagnostic(
        code(rdftex::export::pair),
        help("Export pairs are written as predicate=object, separated by commas")
    )]
    MalformedExportPair {
        path: PathBuf,
        line: usize,
        token: String,
    },

    #[error("Watch error: {message}")]
    #[diagnostic(code(rdftex::watch))]
    Watch { message: String },

    #[error("Check failed with {errors} error(s)")]
    #[diagnostic(code(rdftex::check), help("Run with -v for details on each directive"))]
    CheckFailed { errors: usize },
}

pub type Result<T> = std::result::Result<T, RdftexError>;
