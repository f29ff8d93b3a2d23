//! Parser modules for rdftex directives.
//!
//! Directives are LaTeX-style commands whose arguments are written as
//! consecutive brace groups:
//!
//! ```text
//! \rdfprefix{terms}{https://example.org/scikg/terms/}
//! \rdfimport{def:kg}{Ehrlinger16}{publ:Ehrlinger16/contrib1}{MinSKG}
//! \rdfexport{e1}{Dataset}{terms:dataset_url=https://example.org/data}
//! Our dataset \rdfproperty{e1}{terms:dataset_name}{SciERC} is ...
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use rdftex::parser::{tokenize, Directive, PrefixTable};
//!
//! let prefixes = PrefixTable::new();
//! if let Some((directive, start)) = Directive::classify(line) {
//!     let invocation = tokenize(directive, line, start, 1, &prefixes)?;
//! }
//! ```

pub mod directive;
pub mod prefix;
pub mod tokenizer;

pub use directive::{Directive, BODY_MARKER};
pub use prefix::PrefixTable;
pub use tokenizer::{split_arguments, tokenize, MacroError, MacroInvocation};
