//! Accumulation and persistence of exported contributions.
//!
//! `\rdfexport` and `\rdfproperty` directives add (predicate, object) pairs
//! to named export records. After all files are scanned the records are
//! validated against the contribution schemas and serialized as a new graph
//! document.

mod serialize;

use std::collections::HashMap;

use serde::Serialize;

use crate::types::vocab;

pub use serialize::{build_export_graph, build_export_graph_with_id, ExportDocument, ExportFormat};

/// One named export and the pairs collected for it, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRecord {
    pub name: String,
    pairs: Vec<(String, String)>,
}

impl ExportRecord {
    /// Create an empty record.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pairs: Vec::new(),
        }
    }

    /// Append a pair.
    pub fn push(&mut self, predicate: impl Into<String>, object: impl Into<String>) {
        self.pairs.push((predicate.into(), object.into()));
    }

    /// All pairs in insertion order, duplicates included.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Collapse duplicate predicates, keeping the last object written.
    ///
    /// Each predicate keeps the position of its first occurrence.
    pub fn flatten(&self) -> Vec<(&str, &str)> {
        let mut flat: Vec<(&str, &str)> = Vec::with_capacity(self.pairs.len());

        for (predicate, object) in &self.pairs {
            match flat.iter_mut().find(|(p, _)| *p == predicate.as_str()) {
                Some(entry) => entry.1 = object.as_str(),
                None => flat.push((predicate.as_str(), object.as_str())),
            }
        }

        flat
    }

    /// The declared contribution type (last `terms:type` value), if any.
    pub fn declared_type(&self) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(p, _)| p == vocab::TYPE)
            .map(|(_, o)| o.as_str())
    }
}

/// All export records of a run, in order of first mention.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportAccumulator {
    records: Vec<ExportRecord>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl ExportAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append pairs to the named record, creating it if absent.
    pub fn append<I, P, O>(&mut self, name: &str, pairs: I)
    where
        I: IntoIterator<Item = (P, O)>,
        P: Into<String>,
        O: Into<String>,
    {
        let position = match self.index.get(name) {
            Some(&position) => position,
            None => {
                self.records.push(ExportRecord::new(name));
                self.index.insert(name.to_string(), self.records.len() - 1);
                self.records.len() - 1
            }
        };

        let record = &mut self.records[position];
        for (predicate, object) in pairs {
            record.push(predicate, object);
        }
    }

    /// Look up a record by name.
    pub fn get(&self, name: &str) -> Option<&ExportRecord> {
        self.index.get(name).map(|&i| &self.records[i])
    }

    /// Iterate records in order of first mention.
    pub fn iter(&self) -> impl Iterator<Item = &ExportRecord> {
        self.records.iter()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no export was declared.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
