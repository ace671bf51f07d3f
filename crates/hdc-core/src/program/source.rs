//! Source files, translation units and modules of a program

use std::path::{Path, PathBuf};

use crate::id::define_id;
use crate::lexer::{LineIndex, Location, Span};

define_id!(
    /// Identifies a source file of the program
    SourceFileId,
    "file"
);

define_id!(
    /// Identifies the translation unit parsed from one source file
    TranslationUnitId,
    "unit"
);

define_id!(
    /// Identifies a module (one documentation root folder)
    ModuleId,
    "module"
);

/// A source file known to the front end
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Location on disk
    pub path: PathBuf,
    /// Full text of the file
    pub text: String,
    line_index: LineIndex,
}

impl SourceFile {
    /// Create a source file from its path and contents
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let text = text.into();
        let line_index = LineIndex::new(&text);
        Self {
            path: path.into(),
            text,
            line_index,
        }
    }

    /// Line index of the file contents
    #[must_use]
    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    /// Line/column location of a byte offset
    #[must_use]
    pub fn location(&self, offset: u32) -> Location {
        self.line_index.location(offset)
    }

    /// File name without its directory
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
    }
}

/// A `[start, end)` range in a specific source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceRange {
    pub file: SourceFileId,
    pub span: Span,
}

impl SourceRange {
    #[must_use]
    pub const fn new(file: SourceFileId, span: Span) -> Self {
        Self { file, span }
    }

    /// Position of the first byte of the range
    #[must_use]
    pub const fn start(&self) -> SourcePosition {
        SourcePosition::new(self.file, self.span.start)
    }
}

/// A single byte position in a specific source file
///
/// Documentation comments are keyed by the position of the first token
/// following them, independent of the declaration tree's own nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourcePosition {
    pub file: SourceFileId,
    pub offset: u32,
}

impl SourcePosition {
    #[must_use]
    pub const fn new(file: SourceFileId, offset: u32) -> Self {
        Self { file, offset }
    }
}

/// The declarations parsed from one source file
#[derive(Debug, Clone)]
pub struct TranslationUnit {
    pub file: SourceFileId,
    pub module: ModuleId,
    /// Top-level declarations in source order
    pub decls: Vec<super::AnyDeclId>,
}

/// A module: a named root folder whose source files form one program unit
#[derive(Debug, Clone)]
pub struct Module {
    pub name: String,
    pub root: PathBuf,
    pub units: Vec<TranslationUnitId>,
}

impl Module {
    /// Returns true if `path` lies under this module's root folder
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.root)
    }
}
