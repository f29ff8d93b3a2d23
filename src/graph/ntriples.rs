//! N-Triples reading and writing.
//!
//! The knowledge store is persisted as N-Triples: one statement per line,
//! `#` comments, absolute IRIs only.

use std::fmt::Write as _;

use thiserror::Error;

use super::{Graph, Term, Triple};

/// Error raised for a malformed N-Triples line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct NTriplesError {
    pub line: usize,
    pub message: String,
}

/// Parse an N-Triples document.
pub fn parse(source: &str) -> Result<Graph, NTriplesError> {
    let mut graph = Graph::new();

    for (index, raw) in source.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let triple = parse_line(line).map_err(|message| NTriplesError {
            line: index + 1,
            message,
        })?;
        graph.add(triple);
    }

    Ok(graph)
}

/// Serialize a graph as N-Triples, one statement per line.
pub fn write(graph: &Graph) -> String {
    let mut out = String::new();
    for triple in graph {
        // writing into a String cannot fail
        let _ = writeln!(out, "{} <{}> {} .", triple.s, triple.p, triple.o);
    }
    out
}

/// Escape special characters for a quoted literal.
pub fn escape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

fn parse_line(line: &str) -> Result<Triple, String> {
    let mut cursor = Cursor { rest: line };

    let s = cursor.node()?;
    cursor.skip_ws();
    let p = cursor.iri()?;
    cursor.skip_ws();
    let o = cursor.object()?;
    cursor.skip_ws();

    if !cursor.eat('.') {
        return Err("expected '.' at end of statement".to_string());
    }
    cursor.skip_ws();
    if !cursor.rest.is_empty() && !cursor.rest.starts_with('#') {
        return Err(format!("unexpected trailing text '{}'", cursor.rest));
    }

    Ok(Triple::new(s, p, o))
}

struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn skip_ws(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn eat(&mut self, c: char) -> bool {
        match self.rest.strip_prefix(c) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    fn iri(&mut self) -> Result<String, String> {
        if !self.eat('<') {
            return Err(format!("expected IRI at '{}'", self.rest));
        }
        let end = self
            .rest
            .find('>')
            .ok_or_else(|| "unterminated IRI".to_string())?;
        let iri = self.rest[..end].to_string();
        self.rest = &self.rest[end + 1..];
        Ok(iri)
    }

    fn blank(&mut self) -> Result<String, String> {
        let rest = self
            .rest
            .strip_prefix("_:")
            .ok_or_else(|| format!("expected blank node at '{}'", self.rest))?;
        let end = rest
            .find(|c: char| c.is_whitespace())
            .unwrap_or(rest.len());
        if end == 0 {
            return Err("empty blank node label".to_string());
        }
        self.rest = &rest[end..];
        Ok(rest[..end].to_string())
    }

    fn node(&mut self) -> Result<Term, String> {
        if self.rest.starts_with("_:") {
            self.blank().map(Term::Blank)
        } else {
            self.iri().map(Term::Iri)
        }
    }

    fn object(&mut self) -> Result<Term, String> {
        if self.rest.starts_with('"') {
            self.literal()
        } else {
            self.node()
        }
    }

    fn literal(&mut self) -> Result<Term, String> {
        self.eat('"');

        let mut value = String::new();
        let mut chars = self.rest.char_indices();
        let mut closed_at = None;

        while let Some((index, c)) = chars.next() {
            match c {
                '"' => {
                    closed_at = Some(index);
                    break;
                }
                '\\' => {
                    let (_, escaped) = chars
                        .next()
                        .ok_or_else(|| "dangling escape in literal".to_string())?;
                    match escaped {
                        't' => value.push('\t'),
                        'b' => value.push('\u{8}'),
                        'n' => value.push('\n'),
                        'r' => value.push('\r'),
                        'f' => value.push('\u{c}'),
                        '"' => value.push('"'),
                        '\'' => value.push('\''),
                        '\\' => value.push('\\'),
                        'u' | 'U' => {
                            let width = if escaped == 'u' { 4 } else { 8 };
                            let hex: String = chars.by_ref().take(width).map(|(_, h)| h).collect();
                            let code = u32::from_str_radix(&hex, 16)
                                .ok()
                                .filter(|_| hex.len() == width)
                                .and_then(char::from_u32)
                                .ok_or_else(|| format!("invalid unicode escape '\\{}{}'", escaped, hex))?;
                            value.push(code);
                        }
                        other => return Err(format!("unknown escape '\\{}'", other)),
                    }
                }
                c => value.push(c),
            }
        }

        let end = closed_at.ok_or_else(|| "unterminated literal".to_string())?;
        self.rest = &self.rest[end + 1..];

        let mut datatype = None;
        let mut language = None;

        if self.rest.starts_with("^^") {
            self.rest = &self.rest[2..];
            datatype = Some(self.iri()?);
        } else if self.eat('@') {
            let end = self
                .rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
                .unwrap_or(self.rest.len());
            language = Some(self.rest[..end].to_string());
            self.rest = &self.rest[end..];
        }

        Ok(Term::Literal {
            value,
            datatype,
            language,
        })
    }
}
