//! Directive handlers.
//!
//! Each handler decides what becomes of the line that carries its directive.
//! Recoverable problems are pushed as diagnostics and resolved by the
//! directive's own recovery rule:
//!
//! | Directive | Success | Arity mismatch / unbalanced | Other failure |
//! |---|---|---|---|
//! | prefix | dropped | dropped | - |
//! | import | replaced by snippet | original kept | dropped |
//! | export | dropped | original kept | malformed pair is fatal |
//! | property | occurrences replaced | original kept | sentinel object: original kept |

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{RdftexError, Result};
use crate::parser::{tokenize, Directive, MacroError, MacroInvocation};
use crate::store::{resolve_with_timeout, ContentRequest, KnowledgeStore};
use crate::types::vocab;
use crate::validation::Diagnostic;

use super::state::PreprocessingState;

/// What a handler does with its line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutput {
    /// Emit the line unchanged.
    Original,
    /// Emit nothing.
    Dropped,
    /// Emit this text instead (line ending included).
    Replaced(String),
}

/// Position of the line being handled.
#[derive(Debug, Clone, Copy)]
pub struct LineContext<'a> {
    pub path: &'a Path,
    /// 1-indexed.
    pub number: usize,
}

impl LineContext<'_> {
    fn warn(&self, code: String, message: String) -> Diagnostic {
        Diagnostic::warning(code, message).at(self.path, self.number)
    }
}

/// The line terminator of `line`, if any.
pub fn line_ending(line: &str) -> &str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else if line.ends_with('\n') {
        "\n"
    } else {
        ""
    }
}

/// Tokenize one occurrence, turning failures into diagnostics.
///
/// Returns `None` when the occurrence is unusable; the caller applies the
/// directive's arity-mismatch recovery.
fn checked_invocation(
    state: &mut PreprocessingState,
    ctx: LineContext<'_>,
    directive: Directive,
    line: &str,
    start: usize,
) -> Option<MacroInvocation> {
    match tokenize(directive, line, start, ctx.number, &state.prefixes) {
        Ok(invocation) if invocation.has_arity() => Some(invocation),
        Ok(invocation) => {
            state.diagnostics.push(ctx.warn(
                format!("rdftex::{}::arity", directive.label()),
                format!(
                    "{} expects {} arguments, found {}",
                    directive,
                    directive.arity(),
                    invocation.arguments.len()
                ),
            ));
            None
        }
        Err(MacroError::Unbalanced { offset }) => {
            state.diagnostics.push(
                Diagnostic::error(
                    format!("rdftex::{}::unbalanced", directive.label()),
                    format!("{} has an unclosed argument starting at column {}", directive, offset + 1),
                )
                .with_help("Close every `{` of the directive on the same line")
                .at(ctx.path, ctx.number),
            );
            None
        }
    }
}

/// `\rdfprefix{token}{expansion}`: the line never reaches the output.
pub fn handle_prefix(
    state: &mut PreprocessingState,
    ctx: LineContext<'_>,
    line: &str,
    start: usize,
) -> LineOutput {
    if let Some(invocation) = checked_invocation(state, ctx, Directive::Prefix, line, start) {
        let token = &invocation.arguments[0];
        let expansion = &invocation.arguments[1];
        debug!(token = %token, expansion = %expansion, "prefix declared");
        state.prefixes.declare(token.as_str(), expansion.as_str());
    }
    LineOutput::Dropped
}

/// `\rdfimport{label}{citation key}{content IRI}{backend}`.
pub fn handle_import<S>(
    state: &mut PreprocessingState,
    ctx: LineContext<'_>,
    line: &str,
    start: usize,
    store: &Arc<S>,
    timeout: Option<Duration>,
) -> LineOutput
where
    S: KnowledgeStore + Send + Sync + 'static,
{
    let Some(invocation) = checked_invocation(state, ctx, Directive::Import, line, start) else {
        return LineOutput::Original;
    };

    let mut arguments = invocation.arguments.into_iter();
    let (Some(label), Some(citation_key), Some(content_iri), Some(backend)) = (
        arguments.next(),
        arguments.next(),
        arguments.next(),
        arguments.next(),
    ) else {
        return LineOutput::Original;
    };

    let request = ContentRequest {
        content_iri,
        label,
        citation_key,
        backend,
    };

    match resolve_with_timeout(store, &request, timeout) {
        Ok(outcome) => {
            debug!(iri = %request.content_iri, kind = %outcome.contribution_type, "import resolved");
            state.imported_types.insert(outcome.contribution_type);
            LineOutput::Replaced(format!("{}{}", outcome.snippet, line_ending(line)))
        }
        Err(e) => {
            warn!(iri = %request.content_iri, error = %e, "import dropped");
            state.diagnostics.push(
                ctx.warn(
                    "rdftex::import::unresolved".to_string(),
                    format!("Import of {} is skipped: {}", request.content_iri, e),
                ),
            );
            LineOutput::Dropped
        }
    }
}

/// `\rdfexport{name}{Type}{pred=obj,...}`.
///
/// A pair token without `=` aborts the run.
pub fn handle_export(
    state: &mut PreprocessingState,
    ctx: LineContext<'_>,
    line: &str,
    start: usize,
) -> Result<LineOutput> {
    let Some(invocation) = checked_invocation(state, ctx, Directive::Export, line, start) else {
        return Ok(LineOutput::Original);
    };

    let name = &invocation.arguments[0];
    let contribution_type = &invocation.arguments[1];
    let pairs = parse_export_pairs(&invocation.arguments[2], ctx)?;

    debug!(export = %name, kind = %contribution_type, pairs = pairs.len(), "export declared");

    state.exports.append(
        name,
        std::iter::once((vocab::TYPE.to_string(), contribution_type.clone())).chain(pairs),
    );

    Ok(LineOutput::Dropped)
}

/// Split `pred=obj,pred=obj` into pairs. Empty tokens are ignored.
pub fn parse_export_pairs(csv: &str, ctx: LineContext<'_>) -> Result<Vec<(String, String)>> {
    csv.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .split_once('=')
                .map(|(p, o)| (p.trim().to_string(), o.trim().to_string()))
                .ok_or_else(|| RdftexError::MalformedExportPair {
                    path: ctx.path.to_path_buf(),
                    line: ctx.number,
                    token: token.to_string(),
                })
        })
        .collect()
}

/// `\rdfproperty{name}{predicate}{object}`, possibly several per line.
///
/// Each occurrence is replaced by its object. The line is all or nothing:
/// if any occurrence fails, the original line is emitted and none of its
/// pairs are recorded.
pub fn handle_property(
    state: &mut PreprocessingState,
    ctx: LineContext<'_>,
    line: &str,
) -> LineOutput {
    let name = Directive::Property.name();
    let mut output = String::with_capacity(line.len());
    let mut pairs: Vec<(String, String, String)> = Vec::new();
    let mut cursor = 0;

    while let Some(found) = line[cursor..].find(name) {
        let start = cursor + found;

        let Some(invocation) = checked_invocation(state, ctx, Directive::Property, line, start)
        else {
            return LineOutput::Original;
        };

        let mut arguments = invocation.arguments.into_iter();
        let (Some(export), Some(predicate), Some(object)) =
            (arguments.next(), arguments.next(), arguments.next())
        else {
            return LineOutput::Original;
        };

        if object == vocab::UNRESOLVED_OBJECT {
            state.diagnostics.push(ctx.warn(
                "rdftex::property::unresolved-object".to_string(),
                format!(
                    "Property {} of export {} has no resolved object; line kept verbatim",
                    vocab::compact(&predicate),
                    export
                ),
            ));
            return LineOutput::Original;
        }

        output.push_str(&line[cursor..start]);
        output.push_str(&object);
        pairs.push((export, predicate, object));
        cursor = invocation.end_offset;
    }

    output.push_str(&line[cursor..]);

    for (export, predicate, object) in pairs {
        state.exports.append(&export, [(predicate, object)]);
    }

    LineOutput::Replaced(output)
}
