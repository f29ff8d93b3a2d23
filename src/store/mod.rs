//! Knowledge-store capability boundary.
//!
//! Imports are resolved against a knowledge store and validated exports are
//! persisted through it. Every backend implements [`KnowledgeStore`]; the
//! configured one is picked by name through [`Backend::open`].

pub mod minskg;
mod template;

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::error::{RdftexError, Result};
use crate::exports::{build_export_graph, ExportAccumulator, ExportDocument, ExportFormat};
use crate::types::{vocab, ContributionType};
use crate::validation::{validate_exports, ExportValidation};

pub use minskg::{ContributionData, MinSkg};
pub use template::render_snippet;

/// One import directive's request to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRequest {
    pub content_iri: String,
    pub label: String,
    pub citation_key: String,
    /// Backend named in the directive.
    pub backend: String,
}

/// A resolved import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Rendered LaTeX, without trailing newline.
    pub snippet: String,
    pub contribution_type: ContributionType,
}

/// Why an import could not be resolved. Never fatal to a run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no triples reachable from {iri}")]
    UnknownContent { iri: String },

    #[error("{iri} is not classified: expected exactly one type triple, found {found}")]
    Classification { iri: String, found: usize },

    #[error("{iri} has unsupported type '{found}'")]
    UnsupportedType { iri: String, found: String },

    #[error("{iri} is incomplete, missing: {}", compact_list(missing))]
    Incomplete {
        iri: String,
        missing: BTreeSet<String>,
    },

    #[error("no local media file matches '{url}'")]
    MissingMedia { url: String },

    #[error("backend '{requested}' is not available (configured: {available})")]
    BackendMismatch { requested: String, available: String },

    #[error("resolving {iri} timed out after {}ms", after.as_millis())]
    Timeout { iri: String, after: Duration },

    #[error("knowledge store unavailable: {message}")]
    Unavailable { message: String },
}

fn compact_list(predicates: &BTreeSet<String>) -> String {
    predicates
        .iter()
        .map(|p| vocab::compact(p))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Outcome of validating and persisting a run's exports.
#[derive(Debug, Clone, Default)]
pub struct PersistReport {
    /// Number of contributions written.
    pub persisted: usize,
    /// IRI of the generated publication, if a document was written.
    pub publication: Option<String>,
    pub validation: ExportValidation,
}

/// Capabilities a knowledge-store backend provides.
pub trait KnowledgeStore {
    /// Backend name as written in import directives.
    fn name(&self) -> &str;

    /// Resolve one content node into a rendered snippet.
    fn resolve_contribution(
        &self,
        request: &ContentRequest,
    ) -> std::result::Result<ImportOutcome, ResolveError>;

    /// Direct (predicate, object) pairs of a subject, in store order.
    fn list_predicates_for_subject(&self, subject: &str) -> Vec<(String, String)>;

    /// Environment definitions needed by the imported types.
    ///
    /// Types without an environment (Definition) are absent from the map.
    fn environment_snippets(
        &self,
        types: &BTreeSet<ContributionType>,
    ) -> BTreeMap<ContributionType, String> {
        types
            .iter()
            .filter_map(|&ty| ty.environment_snippet().map(|s| (ty, s.to_string())))
            .collect()
    }

    /// Write an export document, replacing any previous content.
    fn write_export_document(
        &self,
        document: &ExportDocument,
        path: &Path,
        format: ExportFormat,
    ) -> Result<()> {
        document.write_to(path, format)
    }

    /// Validate the accumulated exports and persist the survivors.
    ///
    /// The document is written even when no export survives, so a stale
    /// document from an earlier run never lingers.
    fn validate_and_persist_exports(
        &self,
        exports: &ExportAccumulator,
        path: &Path,
        format: ExportFormat,
    ) -> Result<PersistReport> {
        let validation = validate_exports(exports);
        let document = build_export_graph(&validation.accepted);

        self.write_export_document(&document, path, format)?;

        info!(
            path = %path.display(),
            persisted = document.contributions.len(),
            rejected = validation.rejected.len(),
            "export document written"
        );

        Ok(PersistReport {
            persisted: document.contributions.len(),
            publication: Some(document.publication),
            validation,
        })
    }
}

/// The configured backend.
#[derive(Debug, Clone)]
pub enum Backend {
    MinSkg(MinSkg),
}

impl Backend {
    /// Open the backend named `name`.
    ///
    /// Unknown names are rejected before anything else happens in a run.
    pub fn open(name: &str, store: &Path, media_root: impl Into<PathBuf>) -> Result<Self> {
        if name.eq_ignore_ascii_case(minskg::BACKEND_NAME) {
            debug!(store = %store.display(), "opening MinSKG backend");
            return Ok(Backend::MinSkg(MinSkg::load(store, media_root)?));
        }

        Err(RdftexError::UnsupportedBackend {
            name: name.to_string(),
        })
    }

    /// Check that `name` is a known backend without opening it.
    pub fn ensure_supported(name: &str) -> Result<()> {
        if name.eq_ignore_ascii_case(minskg::BACKEND_NAME) {
            Ok(())
        } else {
            Err(RdftexError::UnsupportedBackend {
                name: name.to_string(),
            })
        }
    }
}

impl KnowledgeStore for Backend {
    fn name(&self) -> &str {
        match self {
            Backend::MinSkg(store) => store.name(),
        }
    }

    fn resolve_contribution(
        &self,
        request: &ContentRequest,
    ) -> std::result::Result<ImportOutcome, ResolveError> {
        match self {
            Backend::MinSkg(store) => store.resolve_contribution(request),
        }
    }

    fn list_predicates_for_subject(&self, subject: &str) -> Vec<(String, String)> {
        match self {
            Backend::MinSkg(store) => store.list_predicates_for_subject(subject),
        }
    }
}

/// Resolve `request`, giving up after `timeout`.
///
/// The directive's backend name must match the store. With a timeout the
/// call runs on a helper thread; an abandoned call finishes in the
/// background and its result is discarded.
pub fn resolve_with_timeout<S>(
    store: &Arc<S>,
    request: &ContentRequest,
    timeout: Option<Duration>,
) -> std::result::Result<ImportOutcome, ResolveError>
where
    S: KnowledgeStore + Send + Sync + 'static,
{
    if !request.backend.eq_ignore_ascii_case(store.name()) {
        return Err(ResolveError::BackendMismatch {
            requested: request.backend.clone(),
            available: store.name().to_string(),
        });
    }

    let Some(after) = timeout else {
        return store.resolve_contribution(request);
    };

    let (tx, rx) = mpsc::channel();
    let worker_store = Arc::clone(store);
    let worker_request = request.clone();

    thread::Builder::new()
        .name("rdftex-resolve".to_string())
        .spawn(move || {
            let _ = tx.send(worker_store.resolve_contribution(&worker_request));
        })
        .map_err(|e| ResolveError::Unavailable {
            message: e.to_string(),
        })?;

    match rx.recv_timeout(after) {
        Ok(result) => result,
        Err(mpsc::RecvTimeoutError::Timeout) => Err(ResolveError::Timeout {
            iri: request.content_iri.clone(),
            after,
        }),
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(ResolveError::Unavailable {
            message: "resolver thread exited without a result".to_string(),
        }),
    }
}

/// Serializable summary of a contribution node, used by `inspect`.
#[derive(Debug, Clone, Serialize)]
pub struct Inspection {
    pub iri: String,
    pub contribution_type: Option<ContributionType>,
    pub values: Vec<(String, String)>,
    pub missing: BTreeSet<String>,
    pub error: Option<String>,
}

impl Backend {
    /// Describe the flattened neighbourhood of `iri`.
    pub fn inspect(&self, iri: &str) -> Inspection {
        match self {
            Backend::MinSkg(store) => match store.subgraph_for_subject(iri) {
                Ok(data) => Inspection {
                    iri: iri.to_string(),
                    contribution_type: Some(data.contribution_type),
                    missing: data.missing_predicates(),
                    values: data.values,
                    error: None,
                },
                Err(e) => Inspection {
                    iri: iri.to_string(),
                    contribution_type: None,
                    values: store.list_predicates_for_subject(iri),
                    missing: BTreeSet::new(),
                    error: Some(e.to_string()),
                },
            },
        }
    }
}
