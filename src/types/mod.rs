//! Core domain types for rdftex.
//!
//! - `ContributionType` - the five supported contribution kinds and their schemas
//! - `vocab` - IRIs of the knowledge-graph vocabulary

mod contribution;
pub mod vocab;

pub use contribution::ContributionType;
