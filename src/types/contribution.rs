//! Contribution types and their completeness schemas.
//!
//! A contribution is a typed unit of scientific content. Each of the five
//! supported types has a fixed set of predicates that must be present before
//! it can be rendered (import) or persisted (export).

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use super::vocab;

/// The supported contribution types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ContributionType {
    Definition,
    Dataset,
    Figure,
    ExpResult,
    Software,
}

impl ContributionType {
    /// All supported types, in schema-table order.
    pub const ALL: [ContributionType; 5] = [
        ContributionType::Definition,
        ContributionType::Dataset,
        ContributionType::Figure,
        ContributionType::ExpResult,
        ContributionType::Software,
    ];

    /// Parse the literal value of a `terms:type` triple.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Definition" => Some(ContributionType::Definition),
            "Dataset" => Some(ContributionType::Dataset),
            "Figure" => Some(ContributionType::Figure),
            "ExpResult" => Some(ContributionType::ExpResult),
            "Software" => Some(ContributionType::Software),
            _ => None,
        }
    }

    /// The literal used for this type in the graph.
    pub fn as_str(self) -> &'static str {
        match self {
            ContributionType::Definition => "Definition",
            ContributionType::Dataset => "Dataset",
            ContributionType::Figure => "Figure",
            ContributionType::ExpResult => "ExpResult",
            ContributionType::Software => "Software",
        }
    }

    /// Predicates a contribution of this type must carry, including `terms:type`.
    pub fn required_predicates(self) -> &'static [&'static str] {
        match self {
            ContributionType::Definition => &[vocab::TYPE, vocab::DEFINITION_CONTENT],
            ContributionType::Dataset => &[
                vocab::TYPE,
                vocab::DATASET_NAME,
                vocab::DATASET_DOMAIN,
                vocab::DATASET_DESCRIPTION,
                vocab::DATASET_URL,
            ],
            ContributionType::Figure => &[
                vocab::TYPE,
                vocab::FIGURE_URL,
                vocab::FIGURE_MIME,
                vocab::FIGURE_DESCRIPTION,
            ],
            ContributionType::ExpResult => &[
                vocab::TYPE,
                vocab::EXPRESULT_DESCRIPTION,
                vocab::EXPRESULT_RESULT,
                vocab::EXPRESULT_SAMPLESIZE,
            ],
            ContributionType::Software => &[
                vocab::TYPE,
                vocab::SOFTWARE_NAME,
                vocab::SOFTWARE_DESCRIPTION,
                vocab::SOFTWARE_URL,
            ],
        }
    }

    /// Required predicates as an owned set, for set comparisons.
    pub fn required_set(self) -> BTreeSet<&'static str> {
        self.required_predicates().iter().copied().collect()
    }

    /// LaTeX preamble needed by this type's rendered snippets, if any.
    ///
    /// Definitions use the document class's own `definition` environment
    /// and therefore have no entry.
    pub fn environment_snippet(self) -> Option<&'static str> {
        match self {
            ContributionType::Definition => None,
            ContributionType::Dataset => Some(DATASET_ENV),
            ContributionType::Figure => Some(FIGURE_ENV),
            ContributionType::ExpResult => Some(EXPRESULT_ENV),
            ContributionType::Software => Some(SOFTWARE_ENV),
        }
    }
}

impl fmt::Display for ContributionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const DATASET_ENV: &str = r"\newcounter{dataset}[section]
\newenvironment{dataset}[1][]{\refstepcounter{dataset}\par\medskip
\textbf{Dataset~\thedataset. #1} \rmfamily}{\medskip}

\crefname{dataset}{Dataset}{Datasets}
\Crefname{dataset}{Dataset}{Datasets}
";

const EXPRESULT_ENV: &str = r"\newcounter{expresult}[section]
\newenvironment{expresult}[1][]{\refstepcounter{expresult}\par\medskip
\textit{Experimental Result~\theexpresult. #1} \rmfamily}{\medskip}

\crefname{expresult}{Experimental Result}{Experimental Results}
\Crefname{expresult}{Experimental Result}{Experimental Results}
";

const FIGURE_ENV: &str = r"\usepackage[export]{adjustbox}
";

const SOFTWARE_ENV: &str = r"\newcounter{software}[section]
\newenvironment{software}[1][]{\refstepcounter{software}\par\medskip
\textbf{Software~\thesoftware. #1} \rmfamily}{\medskip}

\crefname{software}{Software}{Software}
\Crefname{software}{Software}{Software}
";
