//! Prefix table for shortening IRIs inside directive arguments.

use std::collections::BTreeMap;

/// Mapping of short prefix tokens to their expansions.
///
/// Filled by `\rdfprefix{token}{expansion}` and consulted by the tokenizer
/// before any directive handler sees an argument. Scoped to a single run.
#[derive(Debug, Clone, Default)]
pub struct PrefixTable {
    entries: BTreeMap<String, String>,
}

impl PrefixTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare (or redeclare) a prefix.
    pub fn declare(&mut self, token: impl Into<String>, expansion: impl Into<String>) {
        self.entries.insert(token.into(), expansion.into());
    }

    /// Look up the expansion of a token.
    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries.get(token).map(|s| s.as_str())
    }

    /// Replace every `token:` substring with its expansion.
    ///
    /// This is plain substring replacement, so a token that happens to end a
    /// longer word (`data:` for token `a`) is replaced as well. Tokens are
    /// applied in lexical order.
    pub fn resolve(&self, text: &str) -> String {
        let mut resolved = text.to_string();

        for (token, expansion) in &self.entries {
            let needle = format!("{}:", token);
            if resolved.contains(&needle) {
                resolved = resolved.replace(&needle, expansion);
            }
        }

        resolved
    }

    /// Number of declared prefixes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no prefix has been declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
