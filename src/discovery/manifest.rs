//! Project manifest (rdftex.yaml) parsing.
//!
//! The manifest configures where sources live, where the export document
//! goes, and which knowledge store backs imports. Every field has a default,
//! so an empty or missing manifest describes a usable project.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{RdftexError, Result};
use crate::exports::ExportFormat;

/// Project manifest loaded from rdftex.yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Directory scanned for `*.rdf.tex` sources.
    pub texdir: PathBuf,

    /// Path of the export graph document.
    pub exportpath: PathBuf,

    /// Serialization of the export document.
    pub export_format: ExportFormat,

    /// Knowledge-store backend name.
    pub backend: String,

    /// N-Triples file loaded by the MinSKG backend.
    pub store: PathBuf,

    /// Where Figure media are looked up. Defaults to `texdir`.
    pub media_root: Option<PathBuf>,

    /// Per-import resolver timeout in milliseconds; 0 disables it.
    pub resolver_timeout_ms: u64,

    /// Patterns to exclude from discovery.
    pub excludes: Vec<String>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            texdir: PathBuf::from("."),
            exportpath: PathBuf::from("exports.ttl"),
            export_format: ExportFormat::default(),
            backend: "MinSKG".to_string(),
            store: PathBuf::from("minskg.nt"),
            media_root: None,
            resolver_timeout_ms: 5000,
            excludes: vec![],
        }
    }
}

impl Manifest {
    /// Load manifest from a rdftex.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| RdftexError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read manifest: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse manifest from YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(content).map_err(|e| RdftexError::Config {
            message: format!("Invalid manifest: {}", e),
            help: Some("Check rdftex.yaml syntax".to_string()),
        })
    }

    /// Render the manifest as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| RdftexError::Config {
            message: format!("Failed to serialize manifest: {}", e),
            help: None,
        })
    }

    /// The resolver timeout, or `None` when disabled.
    pub fn resolver_timeout(&self) -> Option<Duration> {
        (self.resolver_timeout_ms > 0).then(|| Duration::from_millis(self.resolver_timeout_ms))
    }

    /// Check if a path should be excluded based on exclude patterns.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy().replace('\\', "/");

        self.excludes
            .iter()
            .any(|pattern| Self::matches_pattern(&path_str, pattern))
    }

    /// Simple glob pattern matching.
    fn matches_pattern(path: &str, pattern: &str) -> bool {
        if let Some(suffix) = pattern.strip_prefix("**/") {
            // **/dir/* matches anything inside dir anywhere in the path
            if let Some(dir) = suffix.strip_suffix("/*") {
                return path.starts_with(&format!("{}/", dir))
                    || path.contains(&format!("/{}/", dir));
            }
            return path.ends_with(suffix) || path.contains(&format!("{}/", suffix));
        }

        if let Some(suffix) = pattern.strip_prefix('*') {
            if !pattern.contains('/') {
                return path.ends_with(suffix);
            }
        }

        if let Some(prefix) = pattern.strip_suffix("/*") {
            return path.starts_with(&format!("{}/", prefix))
                || path.contains(&format!("/{}/", prefix));
        }

        path.contains(pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_manifest() {
        let manifest = Manifest::parse("texdir: paper").unwrap();

        assert_eq!(manifest.texdir, PathBuf::from("paper"));
        assert_eq!(manifest.backend, "MinSKG");
        assert_eq!(manifest.export_format, ExportFormat::Turtle);
    }

    #[test]
    fn test_parse_full_manifest() {
        let yaml = r#"
texdir: paper
exportpath: out/exports.nt
export_format: ntriples
backend: MinSKG
store: kg/store.nt
media_root: paper/media
resolver_timeout_ms: 250
excludes:
  - "*.bak.rdf.tex"
  - "**/drafts/*"
"#;
        let manifest = Manifest::parse(yaml).unwrap();

        assert_eq!(manifest.exportpath, PathBuf::from("out/exports.nt"));
        assert_eq!(manifest.export_format, ExportFormat::Ntriples);
        assert_eq!(manifest.store, PathBuf::from("kg/store.nt"));
        assert_eq!(manifest.media_root, Some(PathBuf::from("paper/media")));
        assert_eq!(manifest.resolver_timeout(), Some(Duration::from_millis(250)));
        assert_eq!(manifest.excludes.len(), 2);
    }

    #[test]
    fn test_parse_empty_manifest() {
        assert_eq!(Manifest::parse("").unwrap(), Manifest::default());
    }

    #[test]
    fn test_invalid_manifest_is_config_error() {
        let err = Manifest::parse("export_format: rdfxml").unwrap_err();
        assert!(matches!(err, RdftexError::Config { .. }));
    }

    #[test]
    fn test_zero_timeout_disables() {
        let manifest = Manifest {
            resolver_timeout_ms: 0,
            ..Default::default()
        };
        assert_eq!(manifest.resolver_timeout(), None);
    }

    #[test]
    fn test_yaml_round_trip() {
        let manifest = Manifest::default();
        let yaml = manifest.to_yaml().unwrap();
        assert_eq!(Manifest::parse(&yaml).unwrap(), manifest);
    }

    #[test]
    fn test_is_excluded_patterns() {
        let manifest = Manifest {
            excludes: vec!["*.bak.rdf.tex".to_string(), "**/drafts/*".to_string()],
            ..Default::default()
        };

        assert!(manifest.is_excluded(Path::new("old.bak.rdf.tex")));
        assert!(manifest.is_excluded(Path::new("drafts/intro.rdf.tex")));
        assert!(manifest.is_excluded(Path::new("sections/drafts/intro.rdf.tex")));
        assert!(!manifest.is_excluded(Path::new("sections/intro.rdf.tex")));
    }
}
