//! Directive names and line classification.

use std::fmt;

/// Marker of the document body; the file containing it is the root file.
pub const BODY_MARKER: &str = r"\begin{document}";

/// The four custom directives, in dispatch precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    /// `\rdfprefix{token}{expansion}`
    Prefix,
    /// `\rdfimport{label}{citation key}{content IRI}{backend}`
    Import,
    /// `\rdfexport{name}{type}{pred=obj,...}`
    Export,
    /// `\rdfproperty{export name}{predicate}{object}`
    Property,
}

impl Directive {
    /// Directives in the order a line is tested against them.
    pub const PRECEDENCE: [Directive; 4] = [
        Directive::Prefix,
        Directive::Import,
        Directive::Export,
        Directive::Property,
    ];

    /// The literal command name.
    pub fn name(self) -> &'static str {
        match self {
            Directive::Prefix => r"\rdfprefix",
            Directive::Import => r"\rdfimport",
            Directive::Export => r"\rdfexport",
            Directive::Property => r"\rdfproperty",
        }
    }

    /// Number of arguments each occurrence must carry.
    pub fn arity(self) -> usize {
        match self {
            Directive::Prefix => 2,
            Directive::Import => 4,
            Directive::Export => 3,
            Directive::Property => 3,
        }
    }

    /// Whether an occurrence directly after a space is ignored.
    ///
    /// Property is deliberately unguarded: it appears inline in running text.
    pub fn space_guarded(self) -> bool {
        !matches!(self, Directive::Property)
    }

    /// Byte offset of the first occurrence in `line` that this directive accepts.
    pub fn find_in(self, line: &str) -> Option<usize> {
        let name = self.name();

        line.match_indices(name)
            .map(|(index, _)| index)
            .find(|&index| !self.space_guarded() || index == 0 || line.as_bytes()[index - 1] != b' ')
    }

    /// Pick the directive that handles `line`, if any.
    pub fn classify(line: &str) -> Option<(Directive, usize)> {
        Self::PRECEDENCE
            .iter()
            .find_map(|&directive| directive.find_in(line).map(|start| (directive, start)))
    }

    /// Short lowercase label used in diagnostic codes.
    pub fn label(self) -> &'static str {
        match self {
            Directive::Prefix => "prefix",
            Directive::Import => "import",
            Directive::Export => "export",
            Directive::Property => "property",
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_each_directive() {
        assert_eq!(
            Directive::classify(r"\rdfprefix{a}{b}"),
            Some((Directive::Prefix, 0))
        );
        assert_eq!(
            Directive::classify(r"\rdfimport{a}{b}{c}{d}"),
            Some((Directive::Import, 0))
        );
        assert_eq!(
            Directive::classify(r"\rdfexport{a}{b}{c}"),
            Some((Directive::Export, 0))
        );
        assert_eq!(
            Directive::classify(r"text \rdfproperty{a}{b}{c}"),
            Some((Directive::Property, 5))
        );
        assert_eq!(Directive::classify("plain text"), None);
    }

    #[test]
    fn test_space_guard_skips_indented_occurrence() {
        assert_eq!(Directive::classify(r"  \rdfimport{a}{b}{c}{d}"), None);
        assert_eq!(Directive::classify(r"% \rdfexport{a}{b}{c}"), None);
    }

    #[test]
    fn test_space_guard_finds_later_occurrence() {
        let line = r"x \rdfprefix{a}{b}~\rdfprefix{c}{d}";
        assert_eq!(Directive::Prefix.find_in(line), Some(19));
    }

    #[test]
    fn test_property_is_not_guarded() {
        assert_eq!(
            Directive::classify(r"The \rdfproperty{e}{p}{o} value"),
            Some((Directive::Property, 4))
        );
    }

    #[test]
    fn test_precedence_prefers_prefix() {
        let line = r"\rdfproperty{e}{p}{o}\rdfprefix{a}{b}";
        assert_eq!(Directive::classify(line), Some((Directive::Prefix, 21)));
    }

    #[test]
    fn test_arity() {
        assert_eq!(Directive::Prefix.arity(), 2);
        assert_eq!(Directive::Import.arity(), 4);
        assert_eq!(Directive::Export.arity(), 3);
        assert_eq!(Directive::Property.arity(), 3);
    }
}
