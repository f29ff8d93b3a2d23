//! Serialization of validated exports into a new publication graph.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{RdftexError, Result};
use crate::graph::{ntriples, turtle, Graph, Term};
use crate::types::vocab;
use crate::validation::ValidatedExport;

/// On-disk format of the export document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Turtle,
    Ntriples,
}

/// The graph generated for one run's exports.
#[derive(Debug, Clone)]
pub struct ExportDocument {
    /// IRI of the freshly minted publication.
    pub publication: String,
    /// IRIs of the contributions, in export order.
    pub contributions: Vec<String>,
    pub graph: Graph,
}

impl ExportDocument {
    /// Render in the requested format.
    pub fn render(&self, format: ExportFormat) -> String {
        match format {
            ExportFormat::Turtle => turtle::write(&self.graph),
            ExportFormat::Ntriples => ntriples::write(&self.graph),
        }
    }

    /// Write the document, replacing whatever `path` held before.
    pub fn write_to(&self, path: &Path, format: ExportFormat) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| RdftexError::Io {
                path: parent.to_path_buf(),
                message: format!("Failed to create export directory: {}", e),
            })?;
        }

        fs::write(path, self.render(format)).map_err(|e| RdftexError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to write export document: {}", e),
        })
    }
}

/// Build the export graph under a freshly generated publication IRI.
pub fn build_export_graph(exports: &[ValidatedExport]) -> ExportDocument {
    let id = Uuid::new_v4().simple().to_string();
    build_export_graph_with_id(exports, &id)
}

/// Build the export graph under `publications:NEW/<id>`.
///
/// Contributions are numbered `contrib0`, `contrib1`, ... in export order and
/// every collected pair becomes a triple with a plain literal object, so a
/// repeated predicate is written once per value.
pub fn build_export_graph_with_id(exports: &[ValidatedExport], id: &str) -> ExportDocument {
    let publication = format!("{}NEW/{}", vocab::PUBLICATIONS_NS, id);
    let publication_term = Term::iri(&publication);

    let mut graph = Graph::new();
    graph.add_prefix("terms", vocab::TERMS_NS);
    graph.add_prefix("publ", vocab::PUBLICATIONS_NS);

    let mut contributions = Vec::with_capacity(exports.len());

    for (counter, export) in exports.iter().enumerate() {
        let contribution = format!("{}/contrib{}", publication, counter);
        let contribution_term = Term::iri(&contribution);

        graph.add_triple(
            publication_term.clone(),
            vocab::HAS_CONTRIBUTION,
            contribution_term.clone(),
        );

        for (predicate, object) in &export.pairs {
            graph.add_triple(contribution_term.clone(), predicate, Term::literal(object));
        }

        contributions.push(contribution);
    }

    ExportDocument {
        publication,
        contributions,
        graph,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContributionType;
    use tempfile::tempdir;

    fn definition(name: &str, content: &str) -> ValidatedExport {
        ValidatedExport {
            name: name.to_string(),
            contribution_type: ContributionType::Definition,
            pairs: vec![
                (vocab::TYPE.to_string(), "Definition".to_string()),
                (vocab::DEFINITION_CONTENT.to_string(), content.to_string()),
            ],
        }
    }

    #[test]
    fn test_contributions_numbered_in_order() {
        let exports = vec![definition("a", "first"), definition("b", "second")];
        let doc = build_export_graph_with_id(&exports, "abc");

        assert_eq!(doc.publication, "https://example.org/scikg/publications/NEW/abc");
        assert_eq!(
            doc.contributions,
            vec![
                "https://example.org/scikg/publications/NEW/abc/contrib0",
                "https://example.org/scikg/publications/NEW/abc/contrib1",
            ]
        );
        // 2 has_contribution + 2 * 2 pairs
        assert_eq!(doc.graph.len(), 6);
    }

    #[test]
    fn test_pairs_become_plain_literals() {
        let doc = build_export_graph_with_id(&[definition("a", "text")], "x");
        let contribution = Term::iri(&doc.contributions[0]);

        let objects: Vec<&Term> = doc
            .graph
            .triples_for_subject(&contribution)
            .map(|t| &t.o)
            .collect();
        assert_eq!(objects, vec![&Term::literal("Definition"), &Term::literal("text")]);
    }

    #[test]
    fn test_duplicated_predicate_writes_one_triple_per_value() {
        let mut record = crate::exports::ExportRecord::new("e");
        record.push(vocab::TYPE, "Definition");
        record.push(vocab::DEFINITION_CONTENT, "first");
        record.push(vocab::DEFINITION_CONTENT, "second");
        let valid = crate::validation::validate_export(&record).unwrap();

        let doc = build_export_graph_with_id(&[valid], "dup");
        let written = doc.render(ExportFormat::Ntriples);

        // has_contribution + type + both contents
        assert_eq!(doc.graph.len(), 4);
        assert!(written.contains("\"first\""));
        assert!(written.contains("\"second\""));
    }

    #[test]
    fn test_fresh_ids_differ() {
        let exports = vec![definition("a", "x")];
        let first = build_export_graph(&exports);
        let second = build_export_graph(&exports);
        assert_ne!(first.publication, second.publication);
    }

    #[test]
    fn test_write_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out/exports.ttl");
        fs::create_dir_all(dir.path().join("out")).unwrap();
        fs::write(&path, "stale content that must disappear").unwrap();

        let doc = build_export_graph_with_id(&[definition("a", "x")], "id1");
        doc.write_to(&path, ExportFormat::Turtle).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(!written.contains("stale"));
        assert!(written.starts_with("@prefix publ:"));
        assert!(written.contains("terms:definition_content \"x\""));
    }

    #[test]
    fn test_ntriples_output() {
        let doc = build_export_graph_with_id(&[], "empty");
        assert_eq!(doc.render(ExportFormat::Ntriples), "");
        assert!(doc.contributions.is_empty());
    }
}
