//! Root file selection and environment injection.

use std::collections::BTreeMap;

use crate::error::{RdftexError, Result};
use crate::parser::BODY_MARKER;
use crate::types::ContributionType;

use super::state::{FileBuffer, PreprocessingState};

/// Index of the single buffer carrying the body marker.
///
/// Zero or several candidates abort the run.
pub fn select_root(state: &PreprocessingState) -> Result<usize> {
    let candidates: Vec<usize> = state
        .buffers
        .iter()
        .enumerate()
        .filter(|(_, b)| b.insertion_index.is_some())
        .map(|(i, _)| i)
        .collect();

    match candidates.as_slice() {
        [root] => Ok(*root),
        _ => Err(RdftexError::AmbiguousRootFile {
            candidates: candidates
                .iter()
                .map(|&i| state.buffers[i].source.clone())
                .collect(),
            help: Some(if candidates.is_empty() {
                format!("Add {} to the main document", BODY_MARKER)
            } else {
                format!("Only the main document may contain {}", BODY_MARKER)
            }),
        }),
    }
}

/// Insert environment definitions at the buffer's insertion index.
///
/// Snippets keep the map's iteration order. Returns how many were inserted.
pub fn inject_environments(
    buffer: &mut FileBuffer,
    snippets: &BTreeMap<ContributionType, String>,
) -> usize {
    let Some(index) = buffer.insertion_index else {
        return 0;
    };

    let index = index.min(buffer.lines.len());
    buffer
        .lines
        .splice(index..index, snippets.values().cloned());

    snippets.len()
}
