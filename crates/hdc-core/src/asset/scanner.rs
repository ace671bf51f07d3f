//! Recursive walk of a module's root folder

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::{AnyAssetId, ArticleAssetId, AssetHandler, FolderAssetId};
use crate::config::ScanConfig;

/// A scan failure with the path of the entry being processed
#[derive(Debug, Error)]
#[error("{}: {kind}", path.display())]
pub struct ScanError {
    pub path: PathBuf,
    #[source]
    pub kind: ScanErrorKind,
}

/// The kind of scan failure
#[derive(Debug, Error)]
pub enum ScanErrorKind {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a directory")]
    NotADirectory,

    #[error("folder is already documented by {}", .0.display())]
    DuplicateFolderDocumentation(PathBuf),

    #[error(transparent)]
    Handler(Box<dyn std::error::Error + Send + Sync>),
}

impl ScanError {
    fn new(path: &Path, kind: impl Into<ScanErrorKind>) -> Self {
        Self {
            path: path.to_path_buf(),
            kind: kind.into(),
        }
    }

    fn handler<E: std::error::Error + Send + Sync + 'static>(path: &Path, error: E) -> Self {
        Self::new(path, ScanErrorKind::Handler(Box::new(error)))
    }
}

/// Classifies the entries of a folder tree and reports them to a handler
#[derive(Debug, Clone)]
pub struct AssetScanner<'c> {
    config: &'c ScanConfig,
}

impl<'c> AssetScanner<'c> {
    #[must_use]
    pub fn new(config: &'c ScanConfig) -> Self {
        Self { config }
    }

    /// Scan the folder at `root`, returning its id and the handler
    ///
    /// The handler is consumed and only handed back on success, so a failed
    /// scan never leaves a partially filled store behind. Several roots can
    /// share one store by passing the returned handler to the next scan.
    pub fn scan<H: AssetHandler>(
        &self,
        root: &Path,
        mut handler: H,
    ) -> Result<(FolderAssetId, H), ScanError> {
        if !root.is_dir() {
            return Err(ScanError::new(root, ScanErrorKind::NotADirectory));
        }
        let id = self.scan_folder(root, &mut handler)?;
        log::info!("scanned {}", root.display());
        Ok((id, handler))
    }

    fn scan_folder<H: AssetHandler>(
        &self,
        path: &Path,
        handler: &mut H,
    ) -> Result<FolderAssetId, ScanError> {
        let mut entries = std::fs::read_dir(path)
            .and_then(|entries| entries.collect::<Result<Vec<_>, _>>())
            .map_err(|e| ScanError::new(path, e))?;
        entries.sort_by_key(std::fs::DirEntry::file_name);

        let mut documentation: Option<(ArticleAssetId, PathBuf)> = None;
        let mut children: Vec<AnyAssetId> = Vec::new();
        for entry in entries {
            let entry_path = entry.path();
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with('.') && !self.config.include_hidden {
                log::debug!("skipping hidden entry {}", entry_path.display());
                continue;
            }

            // Follow symbolic links to classify their target.
            let metadata = std::fs::metadata(&entry_path).map_err(|e| ScanError::new(&entry_path, e))?;
            if metadata.is_dir() {
                let id = self.scan_folder(&entry_path, handler)?;
                children.push(id.into());
                continue;
            }

            let extension = entry_path.extension().and_then(OsStr::to_str);
            if extension == Some(self.config.source_extension.as_str()) {
                log::debug!("source file {}", entry_path.display());
                let id = handler
                    .visit_source_file(&entry_path)
                    .map_err(|e| ScanError::handler(&entry_path, e))?;
                children.push(id.into());
            } else if extension == Some(self.config.article_extension.as_str()) {
                log::debug!("article {}", entry_path.display());
                let id = handler
                    .visit_article(&entry_path)
                    .map_err(|e| ScanError::handler(&entry_path, e))?;
                if self.config.is_index_article(&name) {
                    if let Some((_, first)) = documentation {
                        return Err(ScanError::new(
                            &entry_path,
                            ScanErrorKind::DuplicateFolderDocumentation(first),
                        ));
                    }
                    documentation = Some((id, entry_path));
                } else {
                    children.push(id.into());
                }
            } else {
                log::debug!("other file {}", entry_path.display());
                let id = handler
                    .visit_other_file(&entry_path)
                    .map_err(|e| ScanError::handler(&entry_path, e))?;
                children.push(id.into());
            }
        }

        handler
            .visit_folder(path, documentation.map(|(id, _)| id), children)
            .map_err(|e| ScanError::handler(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{AssetCollector, AssetError};
    use crate::program::{Program, ProgramBuilder};
    use std::fs;
    use tempfile::TempDir;

    /// A program whose single module owns every `.hylo` file under `root`
    fn program_for(root: &Path, sources: &[&str]) -> Program {
        let mut builder = ProgramBuilder::new();
        let module = builder.add_module("Main", root);
        for source in sources {
            let path = root.join(source);
            let text = fs::read_to_string(&path).unwrap();
            builder.add_source_file(module, path, text).unwrap();
        }
        builder.finish()
    }

    fn write(root: &Path, relative: &str, text: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    #[test]
    fn test_scan_classifies_entries_in_name_order() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "b.hylo", "public let b = 1");
        write(root, "a.hylodoc", "# A\n\nText.");
        write(root, "logo.png", "png");
        write(root, "sub/c.hylo", "public let c = 1");
        let program = program_for(root, &["b.hylo", "sub/c.hylo"]);

        let config = ScanConfig::default();
        let (root_id, collector) = AssetScanner::new(&config)
            .scan(root, AssetCollector::new(&program))
            .unwrap();
        let store = collector.into_store();

        let folder = &store[root_id];
        let names: Vec<String> = folder.children.iter().map(|&c| store.file_name(c)).collect();
        assert_eq!(names, vec!["a.hylodoc", "b.hylo", "logo.png", "sub"]);
        assert!(matches!(folder.children[0], AnyAssetId::Article(_)));
        assert!(matches!(folder.children[1], AnyAssetId::SourceFile(_)));
        assert!(matches!(folder.children[2], AnyAssetId::OtherFile(_)));
        assert!(matches!(folder.children[3], AnyAssetId::Folder(_)));
        assert_eq!(folder.documentation, None);

        // Post-order: the subfolder is stored before its parent.
        let AnyAssetId::Folder(sub) = folder.children[3] else {
            panic!("expected a folder");
        };
        assert!(sub < root_id);
    }

    #[test]
    fn test_index_article_documents_folder() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "index.hylodoc", "# T\n\nAbout this folder.");
        write(root, "guide.hylodoc", "Guide.");
        write(root, "notes.txt", "notes");
        let program = program_for(root, &[]);

        let config = ScanConfig::default();
        let (root_id, collector) = AssetScanner::new(&config)
            .scan(root, AssetCollector::new(&program))
            .unwrap();
        let store = collector.store();

        let folder = &store[root_id];
        assert_eq!(folder.children.len(), 2);
        let documentation = folder.documentation.unwrap();
        assert!(!folder.children.contains(&documentation.into()));
        assert_eq!(store[documentation].title.as_deref(), Some("T"));
    }

    #[test]
    fn test_two_index_articles_rejected() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "index.hylodoc", "A");
        write(root, "index.internal.hylodoc", "B");
        let program = program_for(root, &[]);

        let config = ScanConfig::default();
        let err = AssetScanner::new(&config)
            .scan(root, AssetCollector::new(&program))
            .unwrap_err();
        assert_eq!(err.path, root.join("index.internal.hylodoc"));
        assert!(matches!(
            err.kind,
            ScanErrorKind::DuplicateFolderDocumentation(ref first) if *first == root.join("index.hylodoc")
        ));
    }

    #[test]
    fn test_hidden_entries_skipped_unless_configured() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, ".git/config", "x");
        write(root, "readme.md", "x");
        let program = program_for(root, &[]);

        let mut config = ScanConfig::default();
        let (id, collector) = AssetScanner::new(&config)
            .scan(root, AssetCollector::new(&program))
            .unwrap();
        assert_eq!(collector.store()[id].children.len(), 1);

        config.include_hidden = true;
        let (id, collector) = AssetScanner::new(&config)
            .scan(root, AssetCollector::new(&program))
            .unwrap();
        assert_eq!(collector.store()[id].children.len(), 2);
    }

    #[test]
    fn test_handler_failure_carries_path() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "sub/orphan.hylo", "let x = 1");
        let program = program_for(root, &[]);

        let config = ScanConfig::default();
        let err = AssetScanner::new(&config)
            .scan(root, AssetCollector::new(&program))
            .unwrap_err();
        assert_eq!(err.path, root.join("sub/orphan.hylo"));
        let ScanErrorKind::Handler(inner) = err.kind else {
            panic!("expected a handler error");
        };
        assert!(inner.downcast_ref::<AssetError>().is_some());
    }

    #[test]
    fn test_root_must_be_directory() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file.hylo");
        fs::write(&file, "").unwrap();
        let program = program_for(temp.path(), &[]);

        let config = ScanConfig::default();
        let err = AssetScanner::new(&config)
            .scan(&file, AssetCollector::new(&program))
            .unwrap_err();
        assert!(matches!(err.kind, ScanErrorKind::NotADirectory));
    }

    #[test]
    fn test_roots_share_one_store() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        write(first.path(), "a.txt", "a");
        write(second.path(), "b.txt", "b");
        let program = program_for(first.path(), &[]);

        let config = ScanConfig::default();
        let scanner = AssetScanner::new(&config);
        let (a, collector) = scanner.scan(first.path(), AssetCollector::new(&program)).unwrap();
        let (b, collector) = scanner.scan(second.path(), collector).unwrap();
        assert_ne!(a, b);
        assert_eq!(collector.store().other_files().count(), 2);
    }
}
