//! The preprocessing pipeline.
//!
//! A run scans every source line by line, dispatching directive lines to
//! their handlers, then picks the root file, injects the environment
//! definitions the imports need, writes the outputs, and finally validates
//! and persists the collected exports.
//!
//! Nothing is written until root selection succeeds, so a run that fails on
//! an ambiguous root leaves every output untouched.

mod handlers;
mod root;
mod state;

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::discovery::SourceFile;
use crate::error::{RdftexError, Result};
use crate::exports::{ExportAccumulator, ExportFormat};
use crate::parser::{Directive, BODY_MARKER};
use crate::store::KnowledgeStore;
use crate::types::ContributionType;
use crate::validation::{validate_exports, Diagnostics, ExportValidation};

pub use handlers::{
    handle_export, handle_import, handle_prefix, handle_property, line_ending, parse_export_pairs,
    LineContext, LineOutput,
};
pub use root::{inject_environments, select_root};
pub use state::{FileBuffer, PreprocessingState};

/// Settings for a run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub export_path: PathBuf,
    pub export_format: ExportFormat,
    /// `None` waits for the store indefinitely.
    pub resolver_timeout: Option<Duration>,
    /// Process everything but write nothing.
    pub dry_run: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            export_path: PathBuf::from("exports.ttl"),
            export_format: ExportFormat::default(),
            resolver_timeout: Some(Duration::from_millis(5000)),
            dry_run: false,
        }
    }
}

/// One processed output file.
#[derive(Debug, Clone)]
pub struct RenderedFile {
    pub source: PathBuf,
    pub output: PathBuf,
    pub text: String,
}

/// What a run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Outputs in scan order.
    pub files: Vec<RenderedFile>,
    /// Source of the root file.
    pub root: PathBuf,
    pub imported_types: BTreeSet<ContributionType>,
    /// Environment definitions injected into the root file.
    pub injected: usize,
    pub exports: ExportAccumulator,
    pub validation: ExportValidation,
    /// Contributions written to the export document (0 on a dry run).
    pub persisted: usize,
    pub publication: Option<String>,
    pub diagnostics: Diagnostics,
    pub dry_run: bool,
}

impl RunReport {
    /// Rendered text of the output derived from `source`.
    pub fn output_for(&self, source: &Path) -> Option<&str> {
        self.files
            .iter()
            .find(|f| f.source == source)
            .map(|f| f.text.as_str())
    }
}

/// A preprocessing pipeline bound to one knowledge store.
///
/// Every call to [`Pipeline::run`] starts from fresh state.
#[derive(Debug)]
pub struct Pipeline<S> {
    store: Arc<S>,
    options: RunOptions,
}

impl<S> Pipeline<S>
where
    S: KnowledgeStore + Send + Sync + 'static,
{
    pub fn new(store: S, options: RunOptions) -> Self {
        Self {
            store: Arc::new(store),
            options,
        }
    }

    /// Read and process the given sources.
    pub fn run(&self, sources: &[SourceFile]) -> Result<RunReport> {
        let mut texts = Vec::with_capacity(sources.len());
        for source in sources {
            let text = fs::read_to_string(&source.source).map_err(|e| RdftexError::Io {
                path: source.source.clone(),
                message: format!("Failed to read source: {}", e),
            })?;
            texts.push((source.clone(), text));
        }

        self.run_texts(texts)
    }

    /// Process sources whose contents are already in memory.
    pub fn run_texts<I>(&self, sources: I) -> Result<RunReport>
    where
        I: IntoIterator<Item = (SourceFile, String)>,
    {
        let mut state = PreprocessingState::new();

        for (source, text) in sources {
            self.scan(&mut state, &source, &text)?;
        }

        let root_index = select_root(&state)?;

        let snippets = self.store.environment_snippets(&state.imported_types);
        let injected = inject_environments(&mut state.buffers[root_index], &snippets);
        let root = state.buffers[root_index].source.clone();
        debug!(root = %root.display(), injected, "environments injected");

        let files: Vec<RenderedFile> = state
            .buffers
            .iter()
            .map(|b| RenderedFile {
                source: b.source.clone(),
                output: b.output.clone(),
                text: b.text(),
            })
            .collect();

        let (validation, persisted, publication) = if self.options.dry_run {
            (validate_exports(&state.exports), 0, None)
        } else {
            for file in &files {
                write_output(&file.output, &file.text)?;
            }

            let report = self.store.validate_and_persist_exports(
                &state.exports,
                &self.options.export_path,
                self.options.export_format,
            )?;
            (report.validation, report.persisted, report.publication)
        };

        let mut diagnostics = state.diagnostics;
        diagnostics.merge(validation.diagnostics.clone());

        info!(
            files = files.len(),
            imported = state.imported_types.len(),
            persisted,
            dry_run = self.options.dry_run,
            "run finished"
        );

        Ok(RunReport {
            files,
            root,
            imported_types: state.imported_types,
            injected,
            exports: state.exports,
            validation,
            persisted,
            publication,
            diagnostics,
            dry_run: self.options.dry_run,
        })
    }

    /// Single pass over one file, appending its buffer to `state`.
    fn scan(&self, state: &mut PreprocessingState, source: &SourceFile, text: &str) -> Result<()> {
        debug!(source = %source.source.display(), "scanning");
        let mut buffer = FileBuffer::new(&source.source, &source.output);

        for (index, line) in text.split_inclusive('\n').enumerate() {
            if line.contains(BODY_MARKER) {
                buffer.insertion_index = Some(buffer.lines.len());
            }

            let ctx = LineContext {
                path: &source.source,
                number: index + 1,
            };

            let output = match Directive::classify(line) {
                None => LineOutput::Original,
                Some((Directive::Prefix, start)) => handle_prefix(state, ctx, line, start),
                Some((Directive::Import, start)) => handle_import(
                    state,
                    ctx,
                    line,
                    start,
                    &self.store,
                    self.options.resolver_timeout,
                ),
                Some((Directive::Export, start)) => handle_export(state, ctx, line, start)?,
                Some((Directive::Property, _)) => handle_property(state, ctx, line),
            };

            match output {
                LineOutput::Original => buffer.lines.push(line.to_string()),
                LineOutput::Dropped => {}
                LineOutput::Replaced(text) => buffer.lines.push(text),
            }
        }

        state.buffers.push(buffer);
        Ok(())
    }
}

fn write_output(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| RdftexError::Io {
            path: parent.to_path_buf(),
            message: format!("Failed to create output directory: {}", e),
        })?;
    }

    fs::write(path, text).map_err(|e| RdftexError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write output: {}", e),
    })
}
