//! Init command implementation.
//!
//! Generates an `rdftex.yaml` manifest, pointing `texdir` at the directory
//! holding the discovered sources when there is exactly one.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::discovery::{discover, Manifest, MANIFEST_FILENAME};
use crate::error::{RdftexError, Result};
use crate::output::{display_path, plural, Printer};

/// Initialize an rdftex project by generating an rdftex.yaml manifest
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to scan (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing rdftex.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let manifest_path = args.path.join(MANIFEST_FILENAME);

    if manifest_path.exists() && !args.force {
        return Err(RdftexError::Config {
            message: format!("{} already exists", MANIFEST_FILENAME),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    printer.status("Scanning", &display_path(&args.path));
    let project = discover(&args.path)?;

    // Source directories relative to the project root
    let source_dirs: BTreeSet<PathBuf> = project
        .sources
        .iter()
        .filter_map(|s| s.source.parent())
        .map(|parent| parent.strip_prefix(&project.root).unwrap_or(parent).to_path_buf())
        .collect();

    let mut manifest = Manifest::default();
    if let [dir] = source_dirs.iter().collect::<Vec<_>>().as_slice() {
        if dir.as_path() != Path::new("") {
            manifest.texdir = dir.to_path_buf();
        }
    }

    fs::write(&manifest_path, manifest.to_yaml()?).map_err(|e| RdftexError::Io {
        path: manifest_path.clone(),
        message: format!("Failed to write manifest: {}", e),
    })?;

    if !source_dirs.is_empty() {
        let dirs: Vec<String> = source_dirs
            .iter()
            .map(|d| {
                if d.as_path() == Path::new("") {
                    ".".to_string()
                } else {
                    d.display().to_string()
                }
            })
            .collect();
        printer.info("Discovered", &dirs.join(", "));
    }

    printer.status(
        "Created",
        &format!(
            "{} ({} found)",
            MANIFEST_FILENAME,
            plural(project.sources.len(), "source", "sources")
        ),
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_init_creates_manifest() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("main.rdf.tex"), "\\begin{document}\n").unwrap();

        let args = InitArgs {
            path: dir.path().to_path_buf(),
            force: false,
        };
        run(args, &Printer::plain()).unwrap();

        let manifest = Manifest::load(&dir.path().join("rdftex.yaml")).unwrap();
        assert_eq!(manifest.texdir, PathBuf::from("."));
        assert_eq!(manifest.backend, "MinSKG");
    }

    #[test]
    fn test_init_errors_if_manifest_exists() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("rdftex.yaml"), "texdir: paper").unwrap();

        let args = InitArgs {
            path: dir.path().to_path_buf(),
            force: false,
        };

        assert!(run(args, &Printer::plain()).is_err());
    }

    #[test]
    fn test_init_force_overwrites() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("rdftex.yaml"), "texdir: paper").unwrap();

        let args = InitArgs {
            path: dir.path().to_path_buf(),
            force: true,
        };
        run(args, &Printer::plain()).unwrap();

        let manifest = Manifest::load(&dir.path().join("rdftex.yaml")).unwrap();
        assert_eq!(manifest.texdir, PathBuf::from("."));
    }

    #[test]
    fn test_init_points_texdir_at_single_source_directory() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("paper")).unwrap();
        fs::write(dir.path().join("paper/main.rdf.tex"), "").unwrap();
        fs::write(dir.path().join("paper/intro.rdf.tex"), "").unwrap();

        let args = InitArgs {
            path: dir.path().to_path_buf(),
            force: false,
        };
        run(args, &Printer::plain()).unwrap();

        let manifest = Manifest::load(&dir.path().join("rdftex.yaml")).unwrap();
        assert_eq!(manifest.texdir, PathBuf::from("paper"));
    }
}
