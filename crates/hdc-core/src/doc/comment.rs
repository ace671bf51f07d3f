//! Structure of a single documentation comment

use std::fmt;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::lexer::Span;
use crate::markdown::{parse_located, Block, Document};
use crate::program::{SourceFileId, SourceRange};

/// Name of the marker section making a comment file-level
const FILE_LEVEL_MARKER: &str = "file-level";
/// Name of the marker section making a comment a section divider
const SECTION_MARKER: &str = "section";

/// A named special section recognized in documentation comments
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SectionKind {
    Parameters,
    Generics,
    Preconditions,
    Postconditions,
    Returns,
    Yields,
    Throws,
    Complexity,
    Invariants,
    SeeAlso,
}

impl SectionKind {
    /// Look up a section by heading name, ignoring case, a trailing colon,
    /// and singular/plural spelling
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().trim_end_matches(':').trim();
        let normalized = name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        match normalized.as_str() {
            "parameter" | "parameters" => Some(Self::Parameters),
            "generic" | "generics" | "generic parameter" | "generic parameters" => {
                Some(Self::Generics)
            }
            "precondition" | "preconditions" => Some(Self::Preconditions),
            "postcondition" | "postconditions" => Some(Self::Postconditions),
            "return" | "returns" => Some(Self::Returns),
            "yield" | "yields" => Some(Self::Yields),
            "throw" | "throws" => Some(Self::Throws),
            "complexity" => Some(Self::Complexity),
            "invariant" | "invariants" => Some(Self::Invariants),
            "see also" | "see-also" => Some(Self::SeeAlso),
            _ => None,
        }
    }

    /// Position in the canonical order of function-like documentation
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Parameters => 0,
            Self::Generics => 1,
            Self::Preconditions => 2,
            Self::Postconditions => 3,
            Self::Returns | Self::Yields => 4,
            Self::Throws => 5,
            Self::Complexity => 6,
            Self::SeeAlso => 7,
            Self::Invariants => 8,
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Parameters => "Parameters",
            Self::Generics => "Generics",
            Self::Preconditions => "Preconditions",
            Self::Postconditions => "Postconditions",
            Self::Returns => "Returns",
            Self::Yields => "Yields",
            Self::Throws => "Throws",
            Self::Complexity => "Complexity",
            Self::Invariants => "Invariants",
            Self::SeeAlso => "See also",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// What a comment documents, derived from its first section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentType {
    /// Describes the whole source file
    FileLevel,
    /// Divides a file into sections; not supported downstream
    Section,
    /// Describes the declaration that follows it
    Symbol,
}

/// A level-1 heading of a comment and the blocks up to the next one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialSection {
    /// Heading text without its trailing colon
    pub name: String,
    pub blocks: Vec<Block>,
    /// Site of the heading line
    pub site: SourceRange,
}

/// One comment, structurally parsed but not yet validated against what it
/// documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LowLevelCommentInfo {
    /// Blocks before the first special section
    pub content_before_sections: Option<Document>,
    pub special_sections: Vec<SpecialSection>,
    pub comment_type: CommentType,
    pub site: SourceRange,
}

/// A doc-comment line with its marker removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CommentLine {
    pub text: String,
    /// Span of the whole line, marker included
    pub span: Span,
}

impl LowLevelCommentInfo {
    /// Parse the lines of one comment run
    ///
    /// Empty section headings are reported to `diagnostics`; the resulting
    /// section keeps an empty name and is skipped by later validation.
    pub(crate) fn parse(
        file: SourceFileId,
        lines: &[CommentLine],
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let site = match (lines.first(), lines.last()) {
            (Some(first), Some(last)) => {
                SourceRange::new(file, Span::new(first.span.start, last.span.end))
            }
            _ => SourceRange::new(file, Span::default()),
        };

        let texts: Vec<String> = lines.iter().map(|line| line.text.clone()).collect();

        let mut leading = Vec::new();
        let mut sections: Vec<SpecialSection> = Vec::new();
        for (index, block) in parse_located(&texts) {
            match block {
                Block::Heading { level: 1, text } => {
                    let heading_site = lines
                        .get(index)
                        .map_or(site, |line| SourceRange::new(file, line.span));
                    let name = text.trim().trim_end_matches(':').trim().to_string();
                    if name.is_empty() {
                        diagnostics.report(DiagnosticKind::EmptySectionHeading, heading_site);
                    }
                    sections.push(SpecialSection {
                        name,
                        blocks: Vec::new(),
                        site: heading_site,
                    });
                }
                block => match sections.last_mut() {
                    Some(section) => section.blocks.push(block),
                    None => leading.push(block),
                },
            }
        }

        let comment_type = match sections.first().map(|s| s.name.to_lowercase()) {
            Some(name) if name == FILE_LEVEL_MARKER => CommentType::FileLevel,
            Some(name) if name == SECTION_MARKER => CommentType::Section,
            _ => CommentType::Symbol,
        };
        if comment_type != CommentType::Symbol {
            let marker = sections.remove(0);
            leading.extend(marker.blocks);
        }

        Self {
            content_before_sections: (!leading.is_empty()).then(|| Document::new(leading)),
            special_sections: sections,
            comment_type,
            site,
        }
    }

    /// First leading block and the remaining leading blocks
    #[must_use]
    pub fn summary_and_description(&self) -> (Option<Block>, Option<Document>) {
        self.content_before_sections
            .as_ref()
            .map_or((None, None), Document::split_summary)
    }
}
