//! Documentation comment extraction
//!
//! Comments are not tokens, so they are found in the text *between* tokens:
//! before the first token, between each pair of consecutive tokens, and
//! after the last one. Within each of these windows, maximal runs of
//! doc-comment lines form comments. The last run of a window documents the
//! token that follows it; every other run has nothing to attach to.

#![allow(clippy::cast_possible_truncation)] // Offsets are u32, like spans

use std::collections::BTreeMap;

use super::comment::{CommentLine, CommentType, LowLevelCommentInfo};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::lexer::{LineIndex, Lexer, Span, Token};
use crate::program::{SourceFile, SourceFileId, SourcePosition, SourceRange};

/// Marker opening a documentation comment line
const DOC_MARKER: &str = "///";

/// The comments of one source file, keyed by what they document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentedFile {
    pub file: SourceFileId,
    pub file_level: Option<LowLevelCommentInfo>,
    /// Symbol comments keyed by the start of the token following them
    pub symbol_comments: BTreeMap<SourcePosition, LowLevelCommentInfo>,
    /// Warnings raised while extracting
    pub diagnostics: Diagnostics,
}

/// Tokenize `file` and extract its comments
pub fn extract_source(file_id: SourceFileId, file: &SourceFile) -> Result<DocumentedFile, Diagnostics> {
    let (tokens, errors) = Lexer::tokenize(&file.text);
    if !errors.is_empty() {
        log::debug!("{} lexical errors in {}", errors.len(), file.path.display());
    }
    extract(file_id, file, &tokens)
}

/// Extract the documentation comments of `file` given its token stream
///
/// Every problem found is collected; if any of them is an error the whole
/// collection is returned instead of a result.
pub fn extract(
    file_id: SourceFileId,
    file: &SourceFile,
    tokens: &[Token],
) -> Result<DocumentedFile, Diagnostics> {
    let mut diagnostics = Diagnostics::new();
    let mut result = DocumentedFile {
        file: file_id,
        file_level: None,
        symbol_comments: BTreeMap::new(),
        diagnostics: Diagnostics::new(),
    };

    let mut cursor = 0;
    let mut windows = Vec::with_capacity(tokens.len() + 1);
    for token in tokens {
        windows.push((Span::new(cursor, token.span.start), Some(token.span.start)));
        cursor = token.span.end;
    }
    windows.push((Span::new(cursor, file.text.len() as u32), None));

    for (window, target) in windows {
        let runs = comment_runs(file_id, &file.text, window, file.line_index(), &mut diagnostics);
        let last = runs.len().saturating_sub(1);
        for (index, run) in runs.into_iter().enumerate() {
            let target = if index == last { target } else { None };
            let comment = LowLevelCommentInfo::parse(file_id, &run, &mut diagnostics);
            attach(&mut result, comment, target, &mut diagnostics);
        }
    }

    if diagnostics.contains_error() {
        return Err(diagnostics);
    }
    log::debug!(
        "extracted {} comments from {}",
        result.symbol_comments.len() + usize::from(result.file_level.is_some()),
        file.path.display()
    );
    result.diagnostics = diagnostics;
    Ok(result)
}

fn attach(
    result: &mut DocumentedFile,
    comment: LowLevelCommentInfo,
    target: Option<u32>,
    diagnostics: &mut Diagnostics,
) {
    match (comment.comment_type, target) {
        (CommentType::FileLevel, _) => {
            if result.file_level.is_some() {
                diagnostics.report(DiagnosticKind::DuplicateFileLevelComment, comment.site);
            } else {
                result.file_level = Some(comment);
            }
        }
        (CommentType::Section, _) => {
            diagnostics.report(DiagnosticKind::UnsupportedSectionComment, comment.site);
        }
        (CommentType::Symbol, None) => {
            diagnostics.report(DiagnosticKind::UnattachedComment, comment.site);
        }
        (CommentType::Symbol, Some(offset)) => {
            result
                .symbol_comments
                .insert(SourcePosition::new(result.file, offset), comment);
        }
    }
}

/// Maximal runs of doc-comment lines in `window`
///
/// A line belongs to a run only if its marker is the first non-blank text
/// of a source line outside block comments; any other line closes the
/// current run.
fn comment_runs(
    file: SourceFileId,
    text: &str,
    window: Span,
    lines: &LineIndex,
    diagnostics: &mut Diagnostics,
) -> Vec<Vec<CommentLine>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    let mut offset = window.start;
    let Some(slice) = window.text(text) else {
        return runs;
    };
    let blocks = block_comments(slice, window.start);

    for segment in slice.split_inclusive('\n') {
        let start = offset;
        offset += segment.len() as u32;

        let line = segment.trim_end_matches(['\n', '\r']);
        let content = line.trim_start();
        let indent = (line.len() - content.len()) as u32;
        let is_doc = lines.is_line_start(start)
            && !blocks.iter().any(|block| block.contains(start + indent))
            && content.starts_with(DOC_MARKER)
            && !content.starts_with("////");
        if !is_doc {
            if !current.is_empty() {
                runs.push(std::mem::take(&mut current));
            }
            continue;
        }

        let span = Span::new(start + indent, start + line.len() as u32);
        let rest = &content[DOC_MARKER.len()..];
        let stripped = match rest.strip_prefix(' ') {
            Some(stripped) => stripped,
            None if rest.is_empty() => rest,
            None => {
                diagnostics.insert(
                    crate::diagnostics::Diagnostic::new(
                        DiagnosticKind::MissingWhitespace,
                        SourceRange::new(file, span),
                    )
                    .with_hint(format!("write `/// {rest}`")),
                );
                rest
            }
        };
        current.push(CommentLine {
            text: stripped.to_string(),
            span,
        });
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Spans of the `/* */` comments in `trivia`, which starts at `base`
///
/// `trivia` holds only whitespace and comments, so every `/` begins one.
fn block_comments(trivia: &str, base: u32) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut offset = 0;
    while let Some(found) = trivia[offset..].find('/') {
        let start = offset + found;
        let rest = &trivia[start..];
        offset = if rest.starts_with("//") {
            start + rest.find('\n').unwrap_or(rest.len())
        } else if rest.starts_with("/*") {
            let end = rest[2..].find("*/").map_or(rest.len(), |close| close + 4);
            spans.push(Span::new(base + start as u32, base + (start + end) as u32));
            start + end
        } else {
            start + 1
        };
    }
    spans
}
