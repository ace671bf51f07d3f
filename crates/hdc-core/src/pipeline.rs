//! End-to-end documentation pipeline
//!
//! Scans the root folder of every module with a handler that extracts
//! documentation as source files are visited, then resolves all roots
//! together into output paths.

use std::path::Path;

use thiserror::Error;

use crate::asset::{
    AnyAssetId, ArticleAssetId, AssetCollector, AssetError, AssetHandler, AssetScanner,
    AssetStore, FolderAssetId, OtherFileAssetId, ScanError, SourceFileAssetId,
};
use crate::config::{ConfigError, DocConfig};
use crate::diagnostics::Diagnostics;
use crate::doc::{extract_source, DocumentationBuilder, DocumentationDatabase, GeneralDescription};
use crate::program::Program;
use crate::resolve::{ResolveContext, ResolveError, Target, TargetResolver};

/// Structural failures that stop the pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Everything a renderer needs
#[derive(Debug)]
pub struct DocumentationOutput {
    pub assets: AssetStore,
    pub documentation: DocumentationDatabase,
    pub resolver: TargetResolver,
    /// Root folder of each module, in module order
    pub roots: Vec<FolderAssetId>,
    pub diagnostics: Diagnostics,
}

impl DocumentationOutput {
    /// Returns true if rendering should not proceed
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.contains_error()
    }

    /// Diagnostics rendered against their source files, in site order
    #[must_use]
    pub fn render_diagnostics(&self, program: &Program) -> Vec<String> {
        self.diagnostics
            .iter()
            .map(|d| d.render(program.source_file(d.site.file)))
            .collect()
    }

    /// Target of the root folder of the `n`th module
    #[must_use]
    pub fn root_target(&self, n: usize) -> Option<Target> {
        self.roots.get(n).map(|&root| Target::from(root))
    }
}

/// Asset handler that extracts and validates documentation while scanning
#[derive(Debug)]
pub struct DocumentationHandler<'p> {
    program: &'p Program,
    assets: AssetCollector<'p>,
    builder: DocumentationBuilder<'p>,
    /// Diagnostics of files whose comments could not be extracted
    rejected: Diagnostics,
}

impl<'p> DocumentationHandler<'p> {
    #[must_use]
    pub fn new(program: &'p Program) -> Self {
        Self {
            program,
            assets: AssetCollector::new(program),
            builder: DocumentationBuilder::new(program),
            rejected: Diagnostics::new(),
        }
    }

    #[must_use]
    pub fn finish(self) -> (AssetStore, DocumentationDatabase, Diagnostics) {
        let (documentation, mut diagnostics) = self.builder.finish();
        diagnostics.extend(self.rejected);
        diagnostics.sort();
        (self.assets.into_store(), documentation, diagnostics)
    }
}

impl AssetHandler for DocumentationHandler<'_> {
    type Error = AssetError;

    fn visit_source_file(&mut self, path: &Path) -> Result<SourceFileAssetId, AssetError> {
        let Self {
            program,
            assets,
            builder,
            rejected,
        } = self;
        assets.record_source_file(path, |unit| {
            let file_id = program.translation_unit(unit).file;
            match extract_source(file_id, program.source_file(file_id)) {
                Ok(documented) => builder.add_file(unit, documented),
                Err(diagnostics) => {
                    log::warn!(
                        "skipping documentation of {}: {} problems",
                        path.display(),
                        diagnostics.len()
                    );
                    rejected.extend(diagnostics);
                    GeneralDescription::default()
                }
            }
        })
    }

    fn visit_article(&mut self, path: &Path) -> Result<ArticleAssetId, AssetError> {
        self.assets.visit_article(path)
    }

    fn visit_other_file(&mut self, path: &Path) -> Result<OtherFileAssetId, AssetError> {
        self.assets.visit_other_file(path)
    }

    fn visit_folder(
        &mut self,
        path: &Path,
        documentation: Option<ArticleAssetId>,
        children: Vec<AnyAssetId>,
    ) -> Result<FolderAssetId, AssetError> {
        self.assets.visit_folder(path, documentation, children)
    }
}

/// Build the documentation model of every module of `program`
pub fn document(program: &Program, config: &DocConfig) -> Result<DocumentationOutput, PipelineError> {
    let scanner = AssetScanner::new(&config.scan);
    let mut handler = DocumentationHandler::new(program);
    let mut roots = Vec::new();

    for (_, module) in program.modules() {
        log::info!("scanning module {} at {}", module.name, module.root.display());
        let (root, next) = scanner.scan(&module.root, handler)?;
        roots.push(root);
        handler = next;
    }

    let (assets, documentation, diagnostics) = handler.finish();
    log::info!(
        "documented {} declarations with {} diagnostics",
        documentation.len(),
        diagnostics.len()
    );

    let context = ResolveContext::new(program, &assets, &documentation, &config.resolve);
    let resolver = TargetResolver::resolve(&context, &roots)?;

    Ok(DocumentationOutput {
        assets,
        documentation,
        resolver,
        roots,
        diagnostics,
    })
}

/// Like [`document`], reading `hdc.toml` from `project_root` when present
pub fn document_project(
    program: &Program,
    project_root: &Path,
) -> Result<DocumentationOutput, PipelineError> {
    let config = DocConfig::discover(project_root)?;
    document(program, &config)
}
