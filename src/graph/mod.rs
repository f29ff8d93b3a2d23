//! Minimal RDF graph model.
//!
//! Enough of RDF to hold a knowledge store in memory, walk a contribution's
//! neighbourhood, and write export documents:
//! - `Term` - IRI, blank node, or literal
//! - `Triple` - subject, predicate IRI, object
//! - `Graph` - an ordered bag of triples plus prefix mappings

pub mod ntriples;
pub mod turtle;

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::fmt;

/// An RDF term.
///
/// `Term::Iri` always holds an expanded IRI, never a prefixed name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    Iri(String),
    Blank(String),
    Literal {
        value: String,
        datatype: Option<String>,
        language: Option<String>,
    },
}

impl Term {
    /// Create an IRI term.
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    /// Create a blank node term (label without `_:`).
    pub fn blank(label: impl Into<String>) -> Self {
        Term::Blank(label.into())
    }

    /// Create a plain literal without datatype or language.
    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    /// Whether the term can be traversed as a graph node.
    pub fn is_node(&self) -> bool {
        matches!(self, Term::Iri(_) | Term::Blank(_))
    }

    /// The IRI string, label, or literal lexical form.
    pub fn value(&self) -> &str {
        match self {
            Term::Iri(iri) => iri,
            Term::Blank(label) => label,
            Term::Literal { value, .. } => value,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{}>", iri),
            Term::Blank(label) => write!(f, "_:{}", label),
            Term::Literal {
                value,
                datatype,
                language,
            } => {
                write!(f, "\"{}\"", ntriples::escape_literal(value))?;
                if let Some(lang) = language {
                    write!(f, "@{}", lang)
                } else if let Some(dt) = datatype {
                    write!(f, "^^<{}>", dt)
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// A single statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triple {
    pub s: Term,
    /// Predicates are always IRIs.
    pub p: String,
    pub o: Term,
}

impl Triple {
    pub fn new(s: Term, p: impl Into<String>, o: Term) -> Self {
        Self { s, p: p.into(), o }
    }
}

/// A collection of triples.
///
/// Keeps insertion order (bag semantics); call `dedupe()` for set semantics.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    triples: Vec<Triple>,
    /// Prefix mappings used when writing Turtle.
    pub prefixes: BTreeMap<String, String>,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a prefix mapping.
    pub fn add_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    /// Add a triple.
    pub fn add(&mut self, triple: Triple) {
        self.triples.push(triple);
    }

    /// Add a triple by components.
    pub fn add_triple(&mut self, s: Term, p: impl Into<String>, o: Term) {
        self.add(Triple::new(s, p, o));
    }

    /// Number of triples.
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Whether the graph holds no triples.
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Iterate over triples in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// All triples whose subject is `subject`, in insertion order.
    pub fn triples_for_subject<'a>(&'a self, subject: &'a Term) -> impl Iterator<Item = &'a Triple> {
        self.triples.iter().filter(move |t| &t.s == subject)
    }

    /// Triples reachable from `root`, following edges in either direction.
    ///
    /// Only IRI and blank-node objects are edges; a shared literal never
    /// connects two subjects. The result keeps insertion order and is empty
    /// when `root` is not mentioned in the graph.
    pub fn closure<'a>(&'a self, root: &'a Term) -> Vec<&'a Triple> {
        let mut adjacency: HashMap<&Term, Vec<&Term>> = HashMap::new();

        for triple in &self.triples {
            if triple.o.is_node() {
                adjacency.entry(&triple.s).or_default().push(&triple.o);
                adjacency.entry(&triple.o).or_default().push(&triple.s);
            }
        }

        let mut visited: HashSet<&Term> = HashSet::new();
        let mut queue: VecDeque<&Term> = VecDeque::new();
        visited.insert(root);
        queue.push_back(root);

        while let Some(node) = queue.pop_front() {
            if let Some(neighbours) = adjacency.get(node) {
                for &next in neighbours {
                    if visited.insert(next) {
                        queue.push_back(next);
                    }
                }
            }
        }

        self.triples
            .iter()
            .filter(|t| visited.contains(&t.s))
            .collect()
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<T: IntoIterator<Item = Triple>>(iter: T) -> Self {
        Graph {
            triples: iter.into_iter().collect(),
            prefixes: BTreeMap::new(),
        }
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Triple;
    type IntoIter = std::slice::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Graph {
        let mut g = Graph::new();
        g.add_triple(Term::iri("pub"), "has", Term::iri("c1"));
        g.add_triple(Term::iri("c1"), "type", Term::literal("Definition"));
        g.add_triple(Term::iri("c1"), "detail", Term::blank("b0"));
        g.add_triple(Term::blank("b0"), "note", Term::literal("deep"));
        g.add_triple(Term::iri("other"), "type", Term::literal("Definition"));
        g
    }

    #[test]
    fn test_closure_follows_both_directions() {
        let g = sample();
        let root = Term::iri("c1");
        let closure = g.closure(&root);

        // pub (incoming edge), c1, and the blank node; not `other`
        assert_eq!(closure.len(), 4);
        assert!(closure.iter().any(|t| t.s == Term::iri("pub")));
        assert!(closure.iter().any(|t| t.s == Term::blank("b0")));
        assert!(!closure.iter().any(|t| t.s == Term::iri("other")));
    }

    #[test]
    fn test_closure_shared_literal_is_not_an_edge() {
        let g = sample();
        let root = Term::iri("other");
        let closure = g.closure(&root);

        assert_eq!(closure.len(), 1);
    }

    #[test]
    fn test_closure_unknown_root() {
        let g = sample();
        let root = Term::iri("missing");
        assert!(g.closure(&root).is_empty());
    }

    #[test]
    fn test_term_display() {
        assert_eq!(Term::iri("http://a").to_string(), "<http://a>");
        assert_eq!(Term::blank("b1").to_string(), "_:b1");
        assert_eq!(Term::literal("say \"hi\"").to_string(), "\"say \\\"hi\\\"\"");
    }
}
