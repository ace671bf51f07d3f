//! The asset graph: folders, articles, source files and other files
//!
//! Assets are created once while scanning a module's root folder and are
//! immutable afterward. Each kind lives in its own arena, so an asset's
//! identity is a dense per-kind index assigned in insertion order.

mod scanner;

pub use scanner::{AssetScanner, ScanError, ScanErrorKind};

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::doc::GeneralDescription;
use crate::id::{define_id, Arena};
use crate::markdown::{Block, Document};
use crate::program::{Program, TranslationUnitId};

define_id!(
    /// Identifies a folder asset
    FolderAssetId,
    "folder"
);
define_id!(
    /// Identifies an article asset
    ArticleAssetId,
    "article"
);
define_id!(
    /// Identifies a source file asset
    SourceFileAssetId,
    "source-file"
);
define_id!(
    /// Identifies an auxiliary file asset
    OtherFileAssetId,
    "other-file"
);

/// The identity of an asset of any kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AnyAssetId {
    Folder(FolderAssetId),
    Article(ArticleAssetId),
    SourceFile(SourceFileAssetId),
    OtherFile(OtherFileAssetId),
}

impl fmt::Display for AnyAssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Folder(id) => write!(f, "{id}"),
            Self::Article(id) => write!(f, "{id}"),
            Self::SourceFile(id) => write!(f, "{id}"),
            Self::OtherFile(id) => write!(f, "{id}"),
        }
    }
}

impl From<FolderAssetId> for AnyAssetId {
    fn from(id: FolderAssetId) -> Self {
        Self::Folder(id)
    }
}

impl From<ArticleAssetId> for AnyAssetId {
    fn from(id: ArticleAssetId) -> Self {
        Self::Article(id)
    }
}

impl From<SourceFileAssetId> for AnyAssetId {
    fn from(id: SourceFileAssetId) -> Self {
        Self::SourceFile(id)
    }
}

impl From<OtherFileAssetId> for AnyAssetId {
    fn from(id: OtherFileAssetId) -> Self {
        Self::OtherFile(id)
    }
}

/// A folder and the assets directly inside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderAsset {
    pub location: PathBuf,
    pub name: String,
    /// The article documenting this folder; never one of `children`
    pub documentation: Option<ArticleAssetId>,
    pub children: Vec<AnyAssetId>,
}

/// A free-form documentation article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleAsset {
    pub location: PathBuf,
    /// Text of a leading level-1 heading
    pub title: Option<String>,
    /// Everything after the title
    pub content: Document,
}

impl ArticleAsset {
    /// Parse an article, taking a leading level-1 heading as its title
    #[must_use]
    pub fn parse(location: impl Into<PathBuf>, text: &str) -> Self {
        let mut content = Document::parse(text);
        let title = match content.blocks.first() {
            Some(Block::Heading { level: 1, text }) => Some(text.clone()),
            _ => None,
        };
        if title.is_some() {
            content.blocks.remove(0);
        }
        Self {
            location: location.into(),
            title,
            content,
        }
    }
}

/// A program source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFileAsset {
    pub location: PathBuf,
    pub translation_unit: TranslationUnitId,
    /// Summary, description and see-also of the file-level comment
    pub general_description: GeneralDescription,
}

/// Any other file; copied or embedded, never documented on its own
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherFileAsset {
    pub location: PathBuf,
}

/// Per-kind storage for every scanned asset
#[derive(Debug, Default)]
pub struct AssetStore {
    folders: Arena<FolderAssetId, FolderAsset>,
    articles: Arena<ArticleAssetId, ArticleAsset>,
    source_files: Arena<SourceFileAssetId, SourceFileAsset>,
    other_files: Arena<OtherFileAssetId, OtherFileAsset>,
}

impl AssetStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_folder(&mut self, folder: FolderAsset) -> FolderAssetId {
        self.folders.push(folder)
    }

    pub fn insert_article(&mut self, article: ArticleAsset) -> ArticleAssetId {
        self.articles.push(article)
    }

    pub fn insert_source_file(&mut self, file: SourceFileAsset) -> SourceFileAssetId {
        self.source_files.push(file)
    }

    pub fn insert_other_file(&mut self, file: OtherFileAsset) -> OtherFileAssetId {
        self.other_files.push(file)
    }

    pub fn folders(&self) -> impl Iterator<Item = (FolderAssetId, &FolderAsset)> {
        self.folders.iter()
    }

    pub fn articles(&self) -> impl Iterator<Item = (ArticleAssetId, &ArticleAsset)> {
        self.articles.iter()
    }

    pub fn source_files(&self) -> impl Iterator<Item = (SourceFileAssetId, &SourceFileAsset)> {
        self.source_files.iter()
    }

    pub fn other_files(&self) -> impl Iterator<Item = (OtherFileAssetId, &OtherFileAsset)> {
        self.other_files.iter()
    }

    /// Location on disk of any asset
    #[must_use]
    pub fn location(&self, id: AnyAssetId) -> &Path {
        match id {
            AnyAssetId::Folder(id) => &self.folders[id].location,
            AnyAssetId::Article(id) => &self.articles[id].location,
            AnyAssetId::SourceFile(id) => &self.source_files[id].location,
            AnyAssetId::OtherFile(id) => &self.other_files[id].location,
        }
    }

    /// File name of any asset; folders use their own name
    #[must_use]
    pub fn file_name(&self, id: AnyAssetId) -> String {
        match id {
            AnyAssetId::Folder(id) => self.folders[id].name.clone(),
            _ => file_name(self.location(id)),
        }
    }

    /// The source file asset for a translation unit
    #[must_use]
    pub fn source_file_for_unit(&self, unit: TranslationUnitId) -> Option<SourceFileAssetId> {
        self.source_files
            .iter()
            .find(|(_, file)| file.translation_unit == unit)
            .map(|(id, _)| id)
    }
}

macro_rules! asset_index {
    ($id:ident, $asset:ident, $field:ident) => {
        impl std::ops::Index<$id> for AssetStore {
            type Output = $asset;

            fn index(&self, id: $id) -> &$asset {
                &self.$field[id]
            }
        }
    };
}

asset_index!(FolderAssetId, FolderAsset, folders);
asset_index!(ArticleAssetId, ArticleAsset, articles);
asset_index!(SourceFileAssetId, SourceFileAsset, source_files);
asset_index!(OtherFileAssetId, OtherFileAsset, other_files);

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Receives each entry found by [`AssetScanner`]
///
/// Folders are visited after all of their entries (post-order), with the
/// ids of the children produced for those entries.
pub trait AssetHandler {
    type Error: std::error::Error + Send + Sync + 'static;

    fn visit_source_file(&mut self, path: &Path) -> Result<SourceFileAssetId, Self::Error>;

    fn visit_article(&mut self, path: &Path) -> Result<ArticleAssetId, Self::Error>;

    fn visit_other_file(&mut self, path: &Path) -> Result<OtherFileAssetId, Self::Error>;

    fn visit_folder(
        &mut self,
        path: &Path,
        documentation: Option<ArticleAssetId>,
        children: Vec<AnyAssetId>,
    ) -> Result<FolderAssetId, Self::Error>;
}

/// Errors raised by the stock asset handlers
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("source file {} is not part of the program", .0.display())]
    UnknownSourceFile(PathBuf),
}

/// A handler that records assets without extracting documentation
#[derive(Debug)]
pub struct AssetCollector<'p> {
    program: &'p Program,
    store: AssetStore,
}

impl<'p> AssetCollector<'p> {
    #[must_use]
    pub fn new(program: &'p Program) -> Self {
        Self::with_store(program, AssetStore::new())
    }

    /// Continue filling an existing store
    #[must_use]
    pub fn with_store(program: &'p Program, store: AssetStore) -> Self {
        Self { program, store }
    }

    #[must_use]
    pub fn store(&self) -> &AssetStore {
        &self.store
    }

    #[must_use]
    pub fn into_store(self) -> AssetStore {
        self.store
    }

    /// Record the source file at `path` with the description `describe`
    /// builds for its translation unit
    pub(crate) fn record_source_file(
        &mut self,
        path: &Path,
        describe: impl FnOnce(TranslationUnitId) -> GeneralDescription,
    ) -> Result<SourceFileAssetId, AssetError> {
        let unit = self
            .program
            .unit_for_path(path)
            .ok_or_else(|| AssetError::UnknownSourceFile(path.to_path_buf()))?;
        Ok(self.store.insert_source_file(SourceFileAsset {
            location: path.to_path_buf(),
            translation_unit: unit,
            general_description: describe(unit),
        }))
    }
}

impl AssetHandler for AssetCollector<'_> {
    type Error = AssetError;

    fn visit_source_file(&mut self, path: &Path) -> Result<SourceFileAssetId, AssetError> {
        self.record_source_file(path, |_| GeneralDescription::default())
    }

    fn visit_article(&mut self, path: &Path) -> Result<ArticleAssetId, AssetError> {
        let text = std::fs::read_to_string(path)?;
        Ok(self.store.insert_article(ArticleAsset::parse(path, &text)))
    }

    fn visit_other_file(&mut self, path: &Path) -> Result<OtherFileAssetId, AssetError> {
        Ok(self.store.insert_other_file(OtherFileAsset {
            location: path.to_path_buf(),
        }))
    }

    fn visit_folder(
        &mut self,
        path: &Path,
        documentation: Option<ArticleAssetId>,
        children: Vec<AnyAssetId>,
    ) -> Result<FolderAssetId, AssetError> {
        Ok(self.store.insert_folder(FolderAsset {
            location: path.to_path_buf(),
            name: file_name(path),
            documentation,
            children,
        }))
    }
}
