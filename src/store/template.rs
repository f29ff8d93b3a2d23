//! LaTeX templates for imported contributions.
//!
//! Each contribution type renders to a fixed snippet framed by start/end
//! comments. Snippets carry no trailing newline; the scanner adds the
//! line ending of the directive line they replace.

use std::collections::HashMap;

use crate::types::{vocab, ContributionType};

/// Render the snippet for a contribution.
///
/// `values` maps predicate IRIs to literal values. Completeness is checked
/// before rendering; a missing value renders as empty text.
pub fn render_snippet(
    contribution_type: ContributionType,
    values: &HashMap<&str, &str>,
    label: &str,
    key: &str,
) -> String {
    let get = |predicate: &str| values.get(predicate).copied().unwrap_or_default();

    match contribution_type {
        ContributionType::Definition => {
            let content = get(vocab::DEFINITION_CONTENT);
            format!(
                r"% RDFtex Definition Import Start
\begin{{definition}}
\label{{{label}}}
{content}\normalfont{{~\cite{{{key}}}}}
\end{{definition}}
% RDFtex Definition Import End"
            )
        }
        ContributionType::Dataset => {
            let name = get(vocab::DATASET_NAME);
            let url = get(vocab::DATASET_URL);
            let domain = get(vocab::DATASET_DOMAIN);
            let description = get(vocab::DATASET_DESCRIPTION);
            format!(
                r#"% RDFtex Dataset Import Start
\begin{{dataset}}
{name}~\cite{{{key}}}\\
Available at: \url{{{url}}}\\
Domain: {domain}\\
Description: ``{description}"~\cite{{{key}}}
\label{{{label}}}
\end{{dataset}}
% RDFtex Dataset Import End"#
            )
        }
        ContributionType::Figure => {
            let url = get(vocab::FIGURE_URL);
            let description = get(vocab::FIGURE_DESCRIPTION);
            format!(
                r"% RDFtex Figure Import Start
\begin{{figure}}[htb!]
\centering
\includegraphics[max width=0.7\columnwidth]{{{url}}}
\caption{{{description} (Figure and caption adopted from~\cite{{{key}}}.)}}
\label{{{label}}}
\end{{figure}}
% RDFtex Figure Import End"
            )
        }
        ContributionType::ExpResult => {
            let description = get(vocab::EXPRESULT_DESCRIPTION);
            let result = get(vocab::EXPRESULT_RESULT);
            let sample_size = get(vocab::EXPRESULT_SAMPLESIZE);
            format!(
                r"% RDFtex ExpResult Import Start
\begin{{expresult}}
{description}~\cite{{{key}}}\\
Result: {result}\\
Sample size: {sample_size}
\label{{{label}}}
\end{{expresult}}
% RDFtex ExpResult Import End"
            )
        }
        ContributionType::Software => {
            let name = get(vocab::SOFTWARE_NAME);
            let url = get(vocab::SOFTWARE_URL);
            let description = get(vocab::SOFTWARE_DESCRIPTION);
            format!(
                r#"% RDFtex Software Import Start
\begin{{software}}
{name}~\cite{{{key}}}\\
Available at: \url{{{url}}}\\
Description: ``{description}"~\cite{{{key}}}
\label{{{label}}}
\end{{software}}
% RDFtex Software Import End"#
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_definition_template() {
        let values = HashMap::from([
            (vocab::TYPE, "Definition"),
            (vocab::DEFINITION_CONTENT, "A knowledge graph integrates information."),
        ]);

        let snippet = render_snippet(ContributionType::Definition, &values, "def:kg", "Ehrlinger16");

        assert_eq!(
            snippet,
            "% RDFtex Definition Import Start\n\
             \\begin{definition}\n\
             \\label{def:kg}\n\
             A knowledge graph integrates information.\\normalfont{~\\cite{Ehrlinger16}}\n\
             \\end{definition}\n\
             % RDFtex Definition Import End"
        );
    }

    #[test]
    fn test_dataset_template_mentions_every_value() {
        let values = HashMap::from([
            (vocab::DATASET_NAME, "SciERC"),
            (vocab::DATASET_URL, "https://paperswithcode.com/dataset/scierc"),
            (vocab::DATASET_DOMAIN, "Artificial Intelligence"),
            (vocab::DATASET_DESCRIPTION, "Annotated abstracts"),
        ]);

        let snippet = render_snippet(ContributionType::Dataset, &values, "ds:scierc", "Luan18");

        assert!(snippet.contains("SciERC~\\cite{Luan18}\\\\"));
        assert!(snippet.contains("\\url{https://paperswithcode.com/dataset/scierc}"));
        assert!(snippet.contains("Domain: Artificial Intelligence"));
        assert!(snippet.contains("``Annotated abstracts\"~\\cite{Luan18}"));
        assert!(snippet.contains("\\label{ds:scierc}"));
        assert!(!snippet.ends_with('\n'));
    }

    #[test]
    fn test_figure_template() {
        let values = HashMap::from([
            (vocab::FIGURE_URL, "figures/triples"),
            (vocab::FIGURE_DESCRIPTION, "Two triples"),
        ]);

        let snippet = render_snippet(ContributionType::Figure, &values, "fig:t", "Martin21");
        assert!(snippet.contains("\\includegraphics[max width=0.7\\columnwidth]{figures/triples}"));
        assert!(snippet.contains("\\caption{Two triples (Figure and caption adopted from~\\cite{Martin21}.)}"));
    }

    #[test]
    fn test_expresult_uses_its_environment() {
        let values = HashMap::from([
            (vocab::EXPRESULT_DESCRIPTION, "Accuracy on test split"),
            (vocab::EXPRESULT_RESULT, "0.93"),
            (vocab::EXPRESULT_SAMPLESIZE, "500"),
        ]);

        let snippet = render_snippet(ContributionType::ExpResult, &values, "res:acc", "Key");
        assert!(snippet.contains("\\begin{expresult}"));
        assert!(snippet.contains("Result: 0.93"));
        assert!(snippet.contains("Sample size: 500"));
    }
}
