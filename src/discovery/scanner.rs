//! File system scanner for rdftex sources.
//!
//! Recursively scans a directory for `*.rdf.tex` files and pairs each with
//! the `.tex` path its output is written to.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::manifest::Manifest;

/// Extension marking a file as an rdftex source.
pub const SOURCE_SUFFIX: &str = ".rdf.tex";

/// A source file and its derived output path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceFile {
    pub source: PathBuf,
    pub output: PathBuf,
}

impl SourceFile {
    /// Pair `source` with its output path, if it is an rdftex source.
    pub fn new(source: impl Into<PathBuf>) -> Option<Self> {
        let source = source.into();
        let output = output_path_for(&source)?;
        Some(Self { source, output })
    }
}

/// Whether the path names an rdftex source.
pub fn is_source(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.len() > SOURCE_SUFFIX.len() && n.ends_with(SOURCE_SUFFIX))
}

/// Derive the output path: `paper.rdf.tex` becomes `paper.tex`.
pub fn output_path_for(source: &Path) -> Option<PathBuf> {
    if !is_source(source) {
        return None;
    }

    let name = source.file_name()?.to_str()?;
    let stem = &name[..name.len() - SOURCE_SUFFIX.len()];
    Some(source.with_file_name(format!("{}.tex", stem)))
}

/// Scan a directory for rdftex sources, sorted by path.
pub fn scan_directory(root: &Path, manifest: &Manifest) -> Vec<SourceFile> {
    if !root.exists() {
        return Vec::new();
    }

    let mut sources: Vec<SourceFile> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            !manifest.is_excluded(relative)
        })
        .filter_map(|entry| SourceFile::new(entry.into_path()))
        .collect();

    sources.sort();
    sources
}
