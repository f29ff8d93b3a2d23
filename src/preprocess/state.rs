//! Per-run mutable state.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::exports::ExportAccumulator;
use crate::parser::PrefixTable;
use crate::types::ContributionType;
use crate::validation::Diagnostics;

/// Output lines of one scanned file, held until the run commits.
#[derive(Debug, Clone)]
pub struct FileBuffer {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Output lines, each keeping its line ending.
    pub lines: Vec<String>,
    /// Line count of the buffer when the body marker was seen.
    pub insertion_index: Option<usize>,
}

impl FileBuffer {
    pub fn new(source: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
            lines: Vec::new(),
            insertion_index: None,
        }
    }

    /// The buffered output as one string.
    pub fn text(&self) -> String {
        self.lines.concat()
    }
}

/// Everything a single run accumulates.
///
/// Built fresh for every run and dropped when it ends.
#[derive(Debug, Default)]
pub struct PreprocessingState {
    pub prefixes: PrefixTable,
    pub exports: ExportAccumulator,
    pub imported_types: BTreeSet<ContributionType>,
    /// Buffers in scan order.
    pub buffers: Vec<FileBuffer>,
    pub diagnostics: Diagnostics,
}

impl PreprocessingState {
    pub fn new() -> Self {
        Self::default()
    }
}
