//! Recoverable validation diagnostics
//!
//! Structural problems in documentation comments never abort extraction.
//! They are collected here, tagged with a severity and a source site, and
//! the caller decides whether an error-severity entry should stop rendering.

use std::fmt;

use thiserror::Error;

use crate::doc::SectionKind;
use crate::program::{SourceFile, SourceRange};

/// How serious a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Note,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Note => write!(f, "note"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// The kind of problem found in a documentation comment
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    #[error("missing whitespace after `///`")]
    MissingWhitespace,

    #[error("a file can contain only one file-level comment")]
    DuplicateFileLevelComment,

    #[error("documentation comment is not attached to any declaration")]
    UnattachedComment,

    #[error("section comments are not supported and are ignored")]
    UnsupportedSectionComment,

    #[error("section heading is empty")]
    EmptySectionHeading,

    #[error("unknown section `{name}`")]
    UnknownSection { name: String },

    #[error("`{section}` is not allowed in {owner} documentation")]
    SectionNotAllowed { section: SectionKind, owner: String },

    #[error("`{found}` section should appear before `{expected_before}`")]
    SectionOutOfOrder {
        found: SectionKind,
        expected_before: SectionKind,
    },

    #[error("`{section}` can appear only once")]
    DuplicateSection { section: SectionKind },

    #[error("`See also` must contain exactly one list")]
    MalformedSeeAlso,

    #[error("`{section}` must contain exactly one list of `name: description` items")]
    MalformedParameterList { section: SectionKind },

    #[error("`{section}` documents `{name}`, which is not declared")]
    UnknownParameter { section: SectionKind, name: String },

    #[error("`{name}` is documented more than once")]
    DuplicateParameter { name: String },
}

impl DiagnosticKind {
    /// The severity this kind of problem is reported with
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::UnsupportedSectionComment | Self::SectionOutOfOrder { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// A diagnostic with its source site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub site: SourceRange,
    /// Optional hint for fixing the problem
    pub hint: Option<String>,
}

impl Diagnostic {
    /// Create a diagnostic with the default severity of `kind`
    #[must_use]
    pub fn new(kind: DiagnosticKind, site: SourceRange) -> Self {
        Self {
            severity: kind.severity(),
            kind,
            site,
            hint: None,
        }
    }

    /// Add a hint to this diagnostic
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Render as `path:line:column: severity: message`
    #[must_use]
    pub fn render(&self, file: &SourceFile) -> String {
        let location = file.location(self.site.span.start);
        let mut out = format!(
            "{}:{location}: {}: {}",
            file.path.display(),
            self.severity,
            self.kind
        );
        if let Some(hint) = &self.hint {
            out.push_str(&format!(" (hint: {hint})"));
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} at {}:{}", self.severity, self.kind, self.site.file, self.site.span)?;
        if let Some(hint) = &self.hint {
            write!(f, " (hint: {hint})")?;
        }
        Ok(())
    }
}

/// An ordered collection of diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Report `kind` at `site` with its default severity
    pub fn report(&mut self, kind: DiagnosticKind, site: SourceRange) {
        self.insert(Diagnostic::new(kind, site));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if at least one diagnostic is an error
    #[must_use]
    pub fn contains_error(&self) -> bool {
        self.entries.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    /// Sort by source site, keeping insertion order for equal sites
    pub fn sort(&mut self) {
        self.entries.sort_by_key(|d| d.site);
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<T: IntoIterator<Item = Diagnostic>>(&mut self, iter: T) {
        self.entries.extend(iter);
    }
}

impl FromIterator<Diagnostic> for Diagnostics {
    fn from_iter<T: IntoIterator<Item = Diagnostic>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Span;
    use crate::program::SourceFileId;

    fn site(start: u32, end: u32) -> SourceRange {
        SourceRange::new(SourceFileId::new(0), Span::new(start, end))
    }

    #[test]
    fn test_severity_follows_kind() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.report(
            DiagnosticKind::SectionOutOfOrder {
                found: SectionKind::Parameters,
                expected_before: SectionKind::Returns,
            },
            site(0, 3),
        );
        assert!(!diagnostics.contains_error());
        assert_eq!(diagnostics.warnings().count(), 1);

        diagnostics.report(DiagnosticKind::UnattachedComment, site(4, 8));
        assert!(diagnostics.contains_error());
        assert_eq!(diagnostics.errors().count(), 1);
    }

    #[test]
    fn test_render_uses_line_and_column() {
        let file = SourceFile::new("lib.hylo", "let a = 1\n///Oops\nlet b = 2");
        let diagnostic = Diagnostic::new(DiagnosticKind::MissingWhitespace, site(10, 17))
            .with_hint("write `/// Oops`");
        assert_eq!(
            diagnostic.render(&file),
            "lib.hylo:2:1: error: missing whitespace after `///` (hint: write `/// Oops`)"
        );
    }

    #[test]
    fn test_sort_orders_by_site() {
        let mut diagnostics: Diagnostics = [
            Diagnostic::new(DiagnosticKind::EmptySectionHeading, site(9, 10)),
            Diagnostic::new(DiagnosticKind::MalformedSeeAlso, site(1, 2)),
        ]
        .into_iter()
        .collect();
        diagnostics.sort();
        let kinds: Vec<_> = diagnostics.iter().map(|d| d.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![DiagnosticKind::MalformedSeeAlso, DiagnosticKind::EmptySectionHeading]
        );
    }
}
