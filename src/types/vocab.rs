//! IRIs of the scientific knowledge-graph vocabulary.

/// Namespace of all contribution predicates.
pub const TERMS_NS: &str = "https://example.org/scikg/terms/";

/// Namespace under which new publications are minted.
pub const PUBLICATIONS_NS: &str = "https://example.org/scikg/publications/";

/// The reserved predicate carrying a contribution's type.
pub const TYPE: &str = "https://example.org/scikg/terms/type";

/// Links a publication to one of its contributions.
pub const HAS_CONTRIBUTION: &str = "https://example.org/scikg/terms/has_contribution";

pub const DEFINITION_CONTENT: &str = "https://example.org/scikg/terms/definition_content";

pub const DATASET_NAME: &str = "https://example.org/scikg/terms/dataset_name";
pub const DATASET_DOMAIN: &str = "https://example.org/scikg/terms/dataset_domain";
pub const DATASET_DESCRIPTION: &str = "https://example.org/scikg/terms/dataset_description";
pub const DATASET_URL: &str = "https://example.org/scikg/terms/dataset_url";

pub const FIGURE_URL: &str = "https://example.org/scikg/terms/figure_url";
pub const FIGURE_MIME: &str = "https://example.org/scikg/terms/figure_mime";
pub const FIGURE_DESCRIPTION: &str = "https://example.org/scikg/terms/figure_description";

pub const EXPRESULT_DESCRIPTION: &str = "https://example.org/scikg/terms/expresult_description";
pub const EXPRESULT_RESULT: &str = "https://example.org/scikg/terms/expresult_result";
pub const EXPRESULT_SAMPLESIZE: &str = "https://example.org/scikg/terms/expresult_samplesize";

pub const SOFTWARE_NAME: &str = "https://example.org/scikg/terms/software_name";
pub const SOFTWARE_DESCRIPTION: &str = "https://example.org/scikg/terms/software_description";
pub const SOFTWARE_URL: &str = "https://example.org/scikg/terms/software_url";

/// Object text that marks an unresolved reference in a property directive.
///
/// Property occurrences carrying it abort their whole line.
pub const UNRESOLVED_OBJECT: &str = "<object>";

/// Shorten a vocabulary IRI to `terms:local` for display.
pub fn compact(iri: &str) -> String {
    match iri.strip_prefix(TERMS_NS) {
        Some(local) => format!("terms:{}", local),
        None => iri.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_vocab_iri() {
        assert_eq!(compact(TYPE), "terms:type");
        assert_eq!(compact(DATASET_URL), "terms:dataset_url");
    }

    #[test]
    fn test_compact_foreign_iri() {
        assert_eq!(compact("http://xmlns.com/foaf/0.1/name"), "http://xmlns.com/foaf/0.1/name");
    }
}
