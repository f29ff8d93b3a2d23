//! Turtle serialization.
//!
//! Writes `@prefix` declarations for the graph's prefix mappings followed
//! by one subject block per subject, predicates separated by `;`.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use super::ntriples::escape_literal;
use super::{Graph, Term};

/// Render a graph as Turtle with deterministic (sorted) output.
pub fn write(graph: &Graph) -> String {
    let mut out = String::new();

    for (prefix, namespace) in &graph.prefixes {
        let _ = writeln!(out, "@prefix {}: <{}> .", prefix, namespace);
    }
    if !graph.prefixes.is_empty() {
        out.push('\n');
    }

    let mut triples: Vec<_> = graph.iter().collect();
    triples.sort();
    triples.dedup();

    let mut current: Option<&Term> = None;

    for triple in triples {
        if current == Some(&triple.s) {
            out.push_str(" ;\n");
        } else {
            if current.is_some() {
                out.push_str(" .\n\n");
            }
            let _ = writeln!(out, "{}", format_node(&triple.s, &graph.prefixes));
            current = Some(&triple.s);
        }

        let _ = write!(
            out,
            "    {} {}",
            format_iri(&triple.p, &graph.prefixes),
            format_object(&triple.o, &graph.prefixes)
        );
    }

    if current.is_some() {
        out.push_str(" .\n");
    }

    out
}

fn format_node(term: &Term, prefixes: &BTreeMap<String, String>) -> String {
    match term {
        Term::Iri(iri) => format_iri(iri, prefixes),
        Term::Blank(label) => format!("_:{}", label),
        Term::Literal { .. } => format_object(term, prefixes),
    }
}

fn format_object(term: &Term, prefixes: &BTreeMap<String, String>) -> String {
    match term {
        Term::Literal {
            value,
            datatype,
            language,
        } => {
            let mut s = format!("\"{}\"", escape_literal(value));
            if let Some(lang) = language {
                s.push('@');
                s.push_str(lang);
            } else if let Some(dt) = datatype {
                s.push_str("^^");
                s.push_str(&format_iri(dt, prefixes));
            }
            s
        }
        other => format_node(other, prefixes),
    }
}

/// Abbreviate an IRI as `prefix:local` when the local part is a plain name.
fn format_iri(iri: &str, prefixes: &BTreeMap<String, String>) -> String {
    for (prefix, namespace) in prefixes {
        if let Some(local) = iri.strip_prefix(namespace.as_str()) {
            if is_plain_local_name(local) {
                return format!("{}:{}", prefix, local);
            }
        }
    }
    format!("<{}>", iri)
}

fn is_plain_local_name(local: &str) -> bool {
    !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        && !local.starts_with('-')
}
