//! rdftex - RDF directives for LaTeX
//!
//! Expands `\rdfprefix`, `\rdfimport`, `\rdfexport` and `\rdfproperty`
//! directives in `*.rdf.tex` sources. Imports are rendered from a knowledge
//! store; exports are validated and written as a new RDF graph document.

pub mod cli;
pub mod discovery;
pub mod error;
pub mod exports;
pub mod graph;
pub mod output;
pub mod parser;
pub mod preprocess;
pub mod store;
pub mod types;
pub mod validation;
pub mod watch;

pub use discovery::{discover, Manifest, Project, SourceFile};
pub use error::{RdftexError, Result};
pub use exports::{ExportAccumulator, ExportDocument, ExportFormat, ExportRecord};
pub use graph::{Graph, Term, Triple};
pub use parser::{Directive, MacroError, MacroInvocation, PrefixTable};
pub use preprocess::{Pipeline, PreprocessingState, RunOptions, RunReport};
pub use store::{Backend, ContentRequest, ImportOutcome, KnowledgeStore, MinSkg, ResolveError};
pub use types::ContributionType;
pub use validation::{validate_exports, Diagnostic, Diagnostics, Severity};
