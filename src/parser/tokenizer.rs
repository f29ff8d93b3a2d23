//! Brace-delimited argument extraction for directives.
//!
//! A directive is written as its name followed by consecutive `{...}` groups
//! with nothing between them: `\rdfproperty{e1}{terms:name}{SciERC}`. Groups
//! may nest braces; only the outermost level delimits arguments.

use thiserror::Error;

use super::directive::Directive;
use super::prefix::PrefixTable;

/// Error raised when a directive's argument list cannot be closed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MacroError {
    #[error("unbalanced braces: argument opened at byte {offset} is never closed")]
    Unbalanced { offset: usize },
}

/// One directive occurrence with its prefix-resolved arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroInvocation {
    pub directive: Directive,
    pub arguments: Vec<String>,
    /// 1-indexed source line.
    pub line: usize,
    /// Byte offset within the line just past the last closing brace.
    pub end_offset: usize,
}

impl MacroInvocation {
    /// Whether the occurrence carries exactly the directive's arity.
    pub fn has_arity(&self) -> bool {
        self.arguments.len() == self.directive.arity()
    }
}

/// Split the raw (unresolved) argument groups off the start of `source`.
///
/// Returns the arguments and the number of bytes consumed. Scanning stops
/// right after a closing brace that is not immediately followed by `{`.
/// If no group is found the whole input counts as consumed.
pub fn split_arguments(source: &str) -> Result<(Vec<&str>, usize), MacroError> {
    let mut arguments = Vec::new();
    let mut depth = 0usize;
    let mut arg_start = 0;
    let mut chars = source.char_indices().peekable();

    while let Some((index, c)) = chars.next() {
        match c {
            '{' => {
                if depth == 0 {
                    arg_start = index + 1;
                }
                depth += 1;
            }
            // a stray `}` outside any group is ordinary text
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    arguments.push(&source[arg_start..index]);

                    if !matches!(chars.peek(), Some((_, '{'))) {
                        return Ok((arguments, index + 1));
                    }
                }
            }
            _ => {}
        }
    }

    if depth > 0 {
        return Err(MacroError::Unbalanced {
            offset: arg_start - 1,
        });
    }

    Ok((arguments, source.len()))
}

/// Tokenize the directive occurrence starting at byte `start` of `line`.
///
/// Every argument is passed through the prefix table before it is returned.
pub fn tokenize(
    directive: Directive,
    line: &str,
    start: usize,
    line_number: usize,
    prefixes: &PrefixTable,
) -> Result<MacroInvocation, MacroError> {
    let (raw, consumed) = split_arguments(&line[start..]).map_err(|e| match e {
        MacroError::Unbalanced { offset } => MacroError::Unbalanced {
            offset: start + offset,
        },
    })?;

    Ok(MacroInvocation {
        directive,
        arguments: raw.into_iter().map(|arg| prefixes.resolve(arg)).collect(),
        line: line_number,
        end_offset: start + consumed,
    })
}
