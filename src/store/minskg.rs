//! The minimal scientific knowledge graph backend.
//!
//! Holds the whole store in memory, loaded once from an N-Triples file.
//! Contributions are found by walking the undirected neighbourhood of the
//! requested node.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::error::{RdftexError, Result};
use crate::graph::{ntriples, Graph, Term};
use crate::types::{vocab, ContributionType};

use super::template::render_snippet;
use super::{ContentRequest, ImportOutcome, KnowledgeStore, ResolveError};

/// Name under which this backend is selected.
pub const BACKEND_NAME: &str = "MinSKG";

/// Flattened view of a contribution's neighbourhood.
#[derive(Debug, Clone, Serialize)]
pub struct ContributionData {
    pub iri: String,
    pub contribution_type: ContributionType,
    /// Predicate → object, first-occurrence order, last value wins.
    pub values: Vec<(String, String)>,
}

impl ContributionData {
    /// Values keyed by predicate.
    pub fn as_map(&self) -> HashMap<&str, &str> {
        self.values
            .iter()
            .map(|(p, o)| (p.as_str(), o.as_str()))
            .collect()
    }

    /// Required predicates of the declared type that are absent.
    pub fn missing_predicates(&self) -> BTreeSet<String> {
        let present: HashSet<&str> = self.values.iter().map(|(p, _)| p.as_str()).collect();
        self.contribution_type
            .required_predicates()
            .iter()
            .filter(|p| !present.contains(*p))
            .map(|p| p.to_string())
            .collect()
    }
}

/// In-memory knowledge store.
#[derive(Debug, Clone)]
pub struct MinSkg {
    graph: Graph,
    media_root: PathBuf,
}

impl MinSkg {
    /// Create a store over an already-built graph.
    pub fn from_graph(graph: Graph, media_root: impl Into<PathBuf>) -> Self {
        Self {
            graph,
            media_root: media_root.into(),
        }
    }

    /// Load the store from an N-Triples file.
    pub fn load(path: &Path, media_root: impl Into<PathBuf>) -> Result<Self> {
        let source = fs::read_to_string(path).map_err(|e| RdftexError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read knowledge store: {}", e),
        })?;

        let graph = ntriples::parse(&source).map_err(|e| RdftexError::Parse {
            message: format!("{}: {}", path.display(), e),
            help: Some("The MinSKG store must be an N-Triples document".to_string()),
        })?;

        debug!(path = %path.display(), triples = graph.len(), "loaded knowledge store");

        Ok(Self::from_graph(graph, media_root))
    }

    /// Collect and flatten everything reachable from `iri`.
    ///
    /// Fails unless the neighbourhood carries exactly one `terms:type` triple
    /// naming a supported contribution type.
    pub fn subgraph_for_subject(&self, iri: &str) -> std::result::Result<ContributionData, ResolveError> {
        let root = Term::iri(iri);
        let mut closure = self.graph.closure(&root);

        if closure.is_empty() {
            return Err(ResolveError::UnknownContent {
                iri: iri.to_string(),
            });
        }

        // set semantics, keeping first occurrence order
        let mut seen = HashSet::new();
        closure.retain(|t| seen.insert(*t));

        let type_values: Vec<&str> = closure
            .iter()
            .filter(|t| t.p == vocab::TYPE)
            .map(|t| t.o.value())
            .collect();

        if type_values.len() != 1 {
            return Err(ResolveError::Classification {
                iri: iri.to_string(),
                found: type_values.len(),
            });
        }

        let contribution_type = ContributionType::from_name(type_values[0]).ok_or_else(|| {
            ResolveError::UnsupportedType {
                iri: iri.to_string(),
                found: type_values[0].to_string(),
            }
        })?;

        let mut values: Vec<(String, String)> = Vec::new();
        for triple in closure {
            let object = triple.o.value().to_string();
            match values.iter_mut().find(|(p, _)| *p == triple.p) {
                Some(entry) => entry.1 = object,
                None => values.push((triple.p.clone(), object)),
            }
        }

        Ok(ContributionData {
            iri: iri.to_string(),
            contribution_type,
            values,
        })
    }

    /// Whether a media file matching `url` (ignoring its extension) exists.
    ///
    /// The lookup never leaves the media root: URLs with `..` segments fail.
    fn media_exists(&self, url: &str) -> bool {
        let relative = Path::new(url.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return false;
        }

        let target = self.media_root.join(relative);
        let (Some(dir), Some(name)) = (target.parent(), target.file_name()) else {
            return false;
        };

        let Ok(entries) = fs::read_dir(dir) else {
            return false;
        };

        entries.filter_map(|e| e.ok()).any(|entry| {
            let path = entry.path();
            path.is_file()
                && path.extension().is_some()
                && path.file_stem() == Some(name)
        })
    }
}

impl KnowledgeStore for MinSkg {
    fn name(&self) -> &str {
        BACKEND_NAME
    }

    fn resolve_contribution(
        &self,
        request: &ContentRequest,
    ) -> std::result::Result<ImportOutcome, ResolveError> {
        let data = self.subgraph_for_subject(&request.content_iri)?;

        let missing = data.missing_predicates();
        if !missing.is_empty() {
            return Err(ResolveError::Incomplete {
                iri: request.content_iri.clone(),
                missing,
            });
        }

        let values = data.as_map();

        if data.contribution_type == ContributionType::Figure {
            let url = values.get(vocab::FIGURE_URL).copied().unwrap_or_default();
            if !self.media_exists(url) {
                return Err(ResolveError::MissingMedia {
                    url: url.to_string(),
                });
            }
        }

        Ok(ImportOutcome {
            snippet: render_snippet(
                data.contribution_type,
                &values,
                &request.label,
                &request.citation_key,
            ),
            contribution_type: data.contribution_type,
        })
    }

    fn list_predicates_for_subject(&self, subject: &str) -> Vec<(String, String)> {
        let subject = Term::iri(subject);
        self.graph
            .triples_for_subject(&subject)
            .map(|t| (t.p.clone(), t.o.value().to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const STORE: &str = r#"
<https://example.org/scikg/publications/Ehrlinger16> <https://example.org/scikg/terms/has_contribution> <https://example.org/scikg/publications/Ehrlinger16/contrib1> .
<https://example.org/scikg/publications/Ehrlinger16/contrib1> <https://example.org/scikg/terms/type> "Definition" .
<https://example.org/scikg/publications/Ehrlinger16/contrib1> <https://example.org/scikg/terms/definition_content> "A knowledge graph acquires and integrates information." .
<https://example.org/scikg/publications/Luan18> <https://example.org/scikg/terms/has_contribution> <https://example.org/scikg/publications/Luan18/contrib1> .
<https://example.org/scikg/publications/Luan18/contrib1> <https://example.org/scikg/terms/type> "Dataset" .
<https://example.org/scikg/publications/Luan18/contrib1> <https://example.org/scikg/terms/dataset_name> "SciERC" .
<https://example.org/scikg/publications/Martin21> <https://example.org/scikg/terms/has_contribution> <https://example.org/scikg/publications/Martin21/contrib1> .
<https://example.org/scikg/publications/Martin21> <https://example.org/scikg/terms/has_contribution> <https://example.org/scikg/publications/Martin21/contrib2> .
<https://example.org/scikg/publications/Martin21/contrib1> <https://example.org/scikg/terms/type> "Definition" .
<https://example.org/scikg/publications/Martin21/contrib2> <https://example.org/scikg/terms/type> "Figure" .
<https://example.org/scikg/publications/Fig> <https://example.org/scikg/terms/has_contribution> <https://example.org/scikg/publications/Fig/contrib1> .
<https://example.org/scikg/publications/Fig/contrib1> <https://example.org/scikg/terms/type> "Figure" .
<https://example.org/scikg/publications/Fig/contrib1> <https://example.org/scikg/terms/figure_url> "figures/triples" .
<https://example.org/scikg/publications/Fig/contrib1> <https://example.org/scikg/terms/figure_mime> "pdf" .
<https://example.org/scikg/publications/Fig/contrib1> <https://example.org/scikg/terms/figure_description> "Two triples" .
"#;

    fn store(media_root: &Path) -> MinSkg {
        MinSkg::from_graph(ntriples::parse(STORE).unwrap(), media_root)
    }

    fn request(iri: &str) -> ContentRequest {
        ContentRequest {
            content_iri: iri.to_string(),
            label: "lbl".to_string(),
            citation_key: "Key".to_string(),
            backend: BACKEND_NAME.to_string(),
        }
    }

    #[test]
    fn test_resolve_definition() {
        let dir = tempdir().unwrap();
        let outcome = store(dir.path())
            .resolve_contribution(&request(
                "https://example.org/scikg/publications/Ehrlinger16/contrib1",
            ))
            .unwrap();

        assert_eq!(outcome.contribution_type, ContributionType::Definition);
        assert!(outcome
            .snippet
            .contains("A knowledge graph acquires and integrates information.\\normalfont{~\\cite{Key}}"));
        assert!(outcome.snippet.contains("\\label{lbl}"));
    }

    #[test]
    fn test_unknown_content() {
        let dir = tempdir().unwrap();
        let err = store(dir.path())
            .resolve_contribution(&request("https://example.org/nothing"))
            .unwrap_err();
        assert!(matches!(err, ResolveError::UnknownContent { .. }));
    }

    #[test]
    fn test_incomplete_dataset() {
        let dir = tempdir().unwrap();
        let err = store(dir.path())
            .resolve_contribution(&request(
                "https://example.org/scikg/publications/Luan18/contrib1",
            ))
            .unwrap_err();

        match err {
            ResolveError::Incomplete { missing, .. } => {
                assert!(missing.contains(vocab::DATASET_URL));
                assert!(!missing.contains(vocab::DATASET_NAME));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_sibling_contributions_break_classification() {
        let dir = tempdir().unwrap();
        let err = store(dir.path())
            .subgraph_for_subject("https://example.org/scikg/publications/Martin21/contrib1")
            .unwrap_err();
        assert!(matches!(err, ResolveError::Classification { found: 2, .. }));
    }

    #[test]
    fn test_figure_requires_local_media() {
        let dir = tempdir().unwrap();
        let iri = "https://example.org/scikg/publications/Fig/contrib1";

        let err = store(dir.path()).resolve_contribution(&request(iri)).unwrap_err();
        assert!(matches!(err, ResolveError::MissingMedia { .. }));

        fs::create_dir_all(dir.path().join("figures")).unwrap();
        fs::write(dir.path().join("figures/triples.pdf"), b"%PDF").unwrap();

        let outcome = store(dir.path()).resolve_contribution(&request(iri)).unwrap();
        assert_eq!(outcome.contribution_type, ContributionType::Figure);
    }

    #[test]
    fn test_figure_media_outside_root_is_missing() {
        let dir = tempdir().unwrap();
        let media_root = dir.path().join("media");
        fs::create_dir_all(&media_root).unwrap();
        fs::write(dir.path().join("secret.pdf"), b"%PDF").unwrap();

        let store = store(&media_root);
        assert!(!store.media_exists("secret"));
        assert!(!store.media_exists("../secret"));
        assert!(!store.media_exists("/../secret"));

        fs::write(media_root.join("secret.pdf"), b"%PDF").unwrap();
        assert!(store.media_exists("secret"));
        assert!(store.media_exists("./secret"));
    }

    #[test]
    fn test_superset_of_schema_is_accepted() {
        let dir = tempdir().unwrap();
        // the closure also carries terms:has_contribution from the publication
        let data = store(dir.path())
            .subgraph_for_subject("https://example.org/scikg/publications/Ehrlinger16/contrib1")
            .unwrap();
        assert!(data.values.iter().any(|(p, _)| p == vocab::HAS_CONTRIBUTION));
        assert!(data.missing_predicates().is_empty());
    }

    #[test]
    fn test_list_predicates_for_subject() {
        let dir = tempdir().unwrap();
        let pairs = store(dir.path())
            .list_predicates_for_subject("https://example.org/scikg/publications/Luan18/contrib1");

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[1], (vocab::DATASET_NAME.to_string(), "SciERC".to_string()));
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.nt");
        fs::write(&path, "<http://a> <http://b> .\n").unwrap();

        assert!(matches!(
            MinSkg::load(&path, dir.path()),
            Err(RdftexError::Parse { .. })
        ));
    }
}
