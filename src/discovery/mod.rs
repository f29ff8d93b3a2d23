//! Project discovery for rdftex.
//!
//! Finds the manifest, resolves its paths against the project directory,
//! and collects the `*.rdf.tex` sources to process.
//!
//! # Example
//!
//! ```ignore
//! use rdftex::discovery::discover;
//!
//! let project = discover("./paper")?;
//! println!("Found {} sources", project.sources.len());
//! ```

mod manifest;
mod scanner;

use std::path::{Path, PathBuf};

use crate::error::Result;

pub use manifest::Manifest;
pub use scanner::{is_source, output_path_for, scan_directory, SourceFile, SOURCE_SUFFIX};

/// The name of the manifest file.
pub const MANIFEST_FILENAME: &str = "rdftex.yaml";

/// A discovered project with every manifest path made absolute-or-rooted.
#[derive(Debug, Clone)]
pub struct Project {
    /// The project root directory.
    pub root: PathBuf,

    /// The loaded manifest (default if no rdftex.yaml was found).
    pub manifest: Manifest,

    /// Whether an rdftex.yaml manifest was found.
    pub has_manifest: bool,

    /// Directory scanned for sources.
    pub texdir: PathBuf,

    /// Where the export document is written.
    pub export_path: PathBuf,

    /// The knowledge-store file.
    pub store_path: PathBuf,

    /// Where Figure media are looked up.
    pub media_root: PathBuf,

    /// Discovered sources, sorted by path.
    pub sources: Vec<SourceFile>,
}

impl Project {
    /// Re-scan the source directory, picking up added or removed files.
    pub fn rescan(&mut self) {
        self.sources = scan_directory(&self.texdir, &self.manifest);
    }
}

/// Discover a project rooted at `root`.
///
/// Looks for `rdftex.yaml` in the root directory. Relative manifest paths
/// are resolved against the root.
pub fn discover(root: impl AsRef<Path>) -> Result<Project> {
    let root = root.as_ref().to_path_buf();

    let manifest_path = root.join(MANIFEST_FILENAME);
    let (manifest, has_manifest) = if manifest_path.exists() {
        (Manifest::load(&manifest_path)?, true)
    } else {
        (Manifest::default(), false)
    };

    Ok(from_manifest(root, manifest, has_manifest))
}

/// Build a project from an already loaded manifest.
pub fn from_manifest(root: PathBuf, manifest: Manifest, has_manifest: bool) -> Project {
    let texdir = resolve(&root, &manifest.texdir);
    let export_path = resolve(&root, &manifest.exportpath);
    let store_path = resolve(&root, &manifest.store);
    let media_root = manifest
        .media_root
        .as_deref()
        .map(|p| resolve(&root, p))
        .unwrap_or_else(|| texdir.clone());

    let sources = scan_directory(&texdir, &manifest);

    Project {
        root,
        manifest,
        has_manifest,
        texdir,
        export_path,
        store_path,
        media_root,
        sources,
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
