//! Target resolution
//!
//! Every documentable entity, asset or declaration, is a [`Target`]. The
//! [`TargetResolver`] walks the targets breadth-first from the module roots,
//! assigns each one an output path derived from its parent's, and answers
//! relative-link queries between resolved targets.
//!
//! Resolution runs in two phases per target: names, descriptions and
//! children are computed without knowing any path, then the path is derived
//! from the parent, which is always resolved first.

mod partial;
mod path;

pub use path::RelativePath;

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::asset::{AnyAssetId, AssetStore, FolderAssetId, OtherFileAssetId};
use crate::config::ResolveConfig;
use crate::doc::DocumentationDatabase;
use crate::program::{AnyDeclId, Program};

/// An addressable unit of documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Target {
    Asset(AnyAssetId),
    Decl(AnyDeclId),
    /// The output root; never resolved
    Empty,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asset(asset) => write!(f, "{asset}"),
            Self::Decl(decl) => write!(f, "{decl}"),
            Self::Empty => write!(f, "<root>"),
        }
    }
}

impl From<AnyAssetId> for Target {
    fn from(id: AnyAssetId) -> Self {
        Self::Asset(id)
    }
}

impl From<FolderAssetId> for Target {
    fn from(id: FolderAssetId) -> Self {
        Self::Asset(id.into())
    }
}

impl From<AnyDeclId> for Target {
    fn from(id: AnyDeclId) -> Self {
        Self::Decl(id)
    }
}

/// Errors that abort resolution
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("{0} cannot be resolved: declarations of this kind have no page")]
    UnsupportedDecl(AnyDeclId),

    #[error("{0} was reached twice; the target graph is not a forest")]
    Revisited(Target),

    #[error("the empty target cannot be resolved")]
    EmptyTarget,

    #[error("{first} and {second} both resolve to {path}")]
    PathCollision {
        path: RelativePath,
        first: Target,
        second: Target,
    },
}

/// Everything known about a resolved target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// `None` for roots
    pub parent: Option<Target>,
    pub simple_name: String,
    pub navigation_name: String,
    pub meta_description: String,
    pub children: Vec<Target>,
    pub path: RelativePath,
}

/// Where an other file is copied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOtherFile {
    pub source: PathBuf,
    pub destination: RelativePath,
}

/// The inputs of resolution
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    pub program: &'a Program,
    pub assets: &'a AssetStore,
    pub documentation: &'a DocumentationDatabase,
    pub config: &'a ResolveConfig,
}

impl<'a> ResolveContext<'a> {
    #[must_use]
    pub fn new(
        program: &'a Program,
        assets: &'a AssetStore,
        documentation: &'a DocumentationDatabase,
        config: &'a ResolveConfig,
    ) -> Self {
        Self {
            program,
            assets,
            documentation,
            config,
        }
    }
}

/// Output paths of every target reachable from the module roots
#[derive(Debug, Clone, Default)]
pub struct TargetResolver {
    targets: HashMap<Target, ResolvedTarget>,
    other_files: BTreeMap<OtherFileAssetId, ResolvedOtherFile>,
    roots: Vec<Target>,
}

impl TargetResolver {
    /// Resolve every target reachable from `roots`
    ///
    /// Targets are processed first-in first-out, so all siblings are
    /// resolved before any of their children.
    pub fn resolve(context: &ResolveContext<'_>, roots: &[FolderAssetId]) -> Result<Self, ResolveError> {
        let mut resolver = Self::default();
        let mut queue: VecDeque<(Option<Target>, Target)> =
            roots.iter().map(|&root| (None, Target::from(root))).collect();
        let mut visited = HashSet::new();
        let mut claimed: HashMap<RelativePath, Target> = HashMap::new();

        while let Some((parent, target)) = queue.pop_front() {
            if !visited.insert(target) {
                return Err(ResolveError::Revisited(target));
            }
            let parent_path = parent
                .and_then(|p| resolver.targets.get(&p))
                .map(|p| p.path.clone())
                .unwrap_or_default();

            if let Target::Asset(AnyAssetId::OtherFile(id)) = target {
                let location = &context.assets[id].location;
                let destination = parent_path.sibling(&[crate::asset::file_name(location)]);
                check_collision(&mut claimed, &destination, target)?;
                resolver.other_files.insert(
                    id,
                    ResolvedOtherFile {
                        source: location.clone(),
                        destination,
                    },
                );
                continue;
            }

            let partial = context.partial(target)?;
            let path = parent_path.sibling(&partial.segments);
            check_collision(&mut claimed, &path, target)?;
            log::debug!("resolved {target} to {path}");

            for &child in &partial.children {
                queue.push_back((Some(target), child));
            }
            for &file in &partial.embedded {
                queue.push_back((Some(target), Target::Asset(file)));
            }
            if parent.is_none() {
                resolver.roots.push(target);
            }
            resolver.targets.insert(
                target,
                ResolvedTarget {
                    parent,
                    simple_name: partial.simple_name,
                    navigation_name: partial.navigation_name,
                    meta_description: partial.meta_description,
                    children: partial.children,
                    path,
                },
            );
        }

        log::info!(
            "resolved {} targets and {} other files",
            resolver.targets.len(),
            resolver.other_files.len()
        );
        Ok(resolver)
    }

    #[must_use]
    pub fn get(&self, target: Target) -> Option<&ResolvedTarget> {
        self.targets.get(&target)
    }

    /// Output path of `target`, relative to the output root
    #[must_use]
    pub fn path(&self, target: Target) -> Option<&RelativePath> {
        self.get(target).map(|resolved| &resolved.path)
    }

    /// The shortest link from the page of `from` to the page of `to`
    ///
    /// Returns `None` when both are the same target or `to` is unresolved.
    /// An unresolved `from`, such as [`Target::Empty`], links from the output
    /// root.
    #[must_use]
    pub fn refer(&self, from: Target, to: Target) -> Option<RelativePath> {
        if from == to {
            return None;
        }
        let to = self.path(to)?;
        match self.path(from) {
            Some(from) => Some(from.relative(to)),
            None => Some(to.clone()),
        }
    }

    /// Targets resolved without a parent, in queue order
    #[must_use]
    pub fn roots(&self) -> &[Target] {
        &self.roots
    }

    pub fn other_files(&self) -> impl Iterator<Item = (OtherFileAssetId, &ResolvedOtherFile)> {
        self.other_files.iter().map(|(&id, file)| (id, file))
    }

    #[must_use]
    pub fn other_file(&self, id: OtherFileAssetId) -> Option<&ResolvedOtherFile> {
        self.other_files.get(&id)
    }

    /// Every resolved target, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (Target, &ResolvedTarget)> {
        self.targets.iter().map(|(&target, resolved)| (target, resolved))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Claim `path` for `target`, failing if another target holds it
fn check_collision(
    claimed: &mut HashMap<RelativePath, Target>,
    path: &RelativePath,
    target: Target,
) -> Result<(), ResolveError> {
    match claimed.entry(path.clone()) {
        Entry::Occupied(entry) => Err(ResolveError::PathCollision {
            path: path.clone(),
            first: *entry.get(),
            second: target,
        }),
        Entry::Vacant(entry) => {
            entry.insert(target);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{AssetCollector, AssetScanner};
    use crate::config::{DocConfig, ScanConfig};
    use crate::doc::{extract_source, DocumentationBuilder};
    use crate::program::{
        AccessEffect, MethodDecl, MethodImplDecl, ProductTypeDecl, ProgramBuilder, Scope,
        TranslationUnitId,
    };
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const VECTOR: &str = "/// A growable array.\n\
                          public type Vector {\n\
                          \x20 public fun push() { let }\n\
                          }\n";

    fn write(root: &Path, relative: &str, text: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    /// A module at `root` with `lib.hylo` declaring `Vector` and its `push` bundle
    fn vector_program(root: &Path) -> (crate::program::Program, TranslationUnitId) {
        let mut b = ProgramBuilder::new();
        let module = b.add_module("Main", root);
        let unit = b.add_source_file(module, root.join("lib.hylo"), VECTOR).unwrap();
        let site = b.site_of(unit, "public type Vector").unwrap();
        let ty = b
            .add(
                Scope::TranslationUnit(unit),
                ProductTypeDecl {
                    site,
                    identifier: "Vector".into(),
                    generic_parameters: vec![],
                    members: vec![],
                },
            )
            .unwrap();
        let site = b.site_of(unit, "public fun push").unwrap();
        let method = b
            .add(
                Scope::Decl(ty.into()),
                MethodDecl {
                    site,
                    identifier: "push".into(),
                    parameters: vec![],
                    generic_parameters: vec![],
                    output: None,
                    impls: vec![],
                },
            )
            .unwrap();
        let site = b.site_of(unit, "let }").unwrap();
        b.add(
            Scope::Decl(method.into()),
            MethodImplDecl {
                site,
                effect: AccessEffect::Let,
            },
        )
        .unwrap();
        (b.finish(), unit)
    }

    struct Resolved {
        assets: AssetStore,
        resolver: TargetResolver,
        root: FolderAssetId,
    }

    fn resolve_tree(root: &Path, program: &crate::program::Program) -> Resolved {
        let config = DocConfig::default();
        let (root_id, collector) = AssetScanner::new(&config.scan)
            .scan(root, AssetCollector::new(program))
            .unwrap();
        let assets = collector.into_store();

        let mut builder = DocumentationBuilder::new(program);
        for (_, file) in assets.source_files() {
            let unit = program.translation_unit(file.translation_unit);
            let documented = extract_source(unit.file, program.source_file(unit.file)).unwrap();
            builder.add_file(file.translation_unit, documented);
        }
        let (documentation, _) = builder.finish();

        let context = ResolveContext::new(program, &assets, &documentation, &config.resolve);
        let resolver = TargetResolver::resolve(&context, &[root_id]).unwrap();
        Resolved {
            assets,
            resolver,
            root: root_id,
        }
    }

    #[test]
    fn test_index_article_names_folder() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "index.hylodoc", "# T\n\nAll about T.");
        write(root, "guide.hylodoc", "# Guide\n\nRead me.");
        write(root, "lib.hylo", VECTOR);
        let (program, _) = vector_program(root);

        let resolved = resolve_tree(root, &program);
        let folder = resolved.resolver.get(resolved.root.into()).unwrap();
        assert_eq!(folder.simple_name, "T");
        assert_eq!(folder.meta_description, "All about T.");
        assert_eq!(folder.children.len(), 2);
        assert_eq!(folder.parent, None);
        assert_eq!(resolved.resolver.roots(), &[Target::from(resolved.root)]);
    }

    #[test]
    fn test_paths_follow_nesting() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "lib.hylo", VECTOR);
        write(root, "guide.hylodoc", "Read me.");
        let (program, unit) = vector_program(root);
        let folder_name = crate::asset::file_name(root);

        let resolved = resolve_tree(root, &program);
        let resolver = &resolved.resolver;
        let path_of = |target: Target| resolver.path(target).unwrap().to_string();

        assert_eq!(path_of(resolved.root.into()), format!("{folder_name}/index.html"));

        let file = resolved.assets.source_file_for_unit(unit).unwrap();
        let file = Target::Asset(file.into());
        assert_eq!(path_of(file), format!("{folder_name}/lib.hylo/index.html"));

        let ty = resolver.get(file).unwrap().children[0];
        assert_eq!(path_of(ty), format!("{folder_name}/lib.hylo/type-Vector-0/index.html"));
        let ty = resolver.get(ty).unwrap();
        assert_eq!(ty.meta_description, "A growable array.");

        let method_target = ty.children[0];
        let method = resolver.get(method_target).unwrap();
        assert_eq!(method.navigation_name, "push()");
        assert_eq!(method.meta_description, "Documentation for the method push.");
        let implementation = method.children[0];
        assert_eq!(
            path_of(implementation),
            format!("{folder_name}/lib.hylo/type-Vector-0/method-push-0/method-impl-let-0.html")
        );
        assert_eq!(resolver.get(implementation).unwrap().parent, Some(method_target));
    }

    #[test]
    fn test_refer_between_resolved_targets() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "a.hylodoc", "A");
        write(root, "b.hylodoc", "B");
        write(root, "sub/c.hylodoc", "C");
        let program = ProgramBuilder::new().finish();

        let resolved = resolve_tree(root, &program);
        let resolver = &resolved.resolver;
        let children = resolver.get(resolved.root.into()).unwrap().children.clone();
        let &[a, b, sub] = children.as_slice() else {
            panic!("expected three children, got {children:?}");
        };
        let c = resolver.get(sub).unwrap().children[0];

        assert_eq!(resolver.refer(a, b).unwrap().to_string(), "b.html");
        assert_eq!(resolver.refer(b, a).unwrap().to_string(), "a.html");
        assert_eq!(resolver.refer(a, c).unwrap().to_string(), "sub/c.html");
        assert_eq!(resolver.refer(c, a).unwrap().to_string(), "../a.html");
        assert_eq!(resolver.refer(c, resolved.root.into()).unwrap().to_string(), "../index.html");
        assert_eq!(resolver.refer(a, a), None);
        assert_eq!(resolver.refer(a, Target::Empty), None);
        assert_eq!(
            resolver.refer(Target::Empty, c).unwrap(),
            resolver.path(c).unwrap().clone()
        );

        // Distinct siblings never refer to each other with an empty path.
        for &from in &children {
            for &to in &children {
                if from != to {
                    assert!(!resolver.refer(from, to).unwrap().is_empty());
                }
            }
        }
    }

    #[test]
    fn test_other_files_are_resolved_but_never_listed() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "logo.png", "png");
        write(root, "a.hylodoc", "A");
        let program = ProgramBuilder::new().finish();
        let folder_name = crate::asset::file_name(root);

        let resolved = resolve_tree(root, &program);
        let folder = resolved.resolver.get(resolved.root.into()).unwrap();
        assert_eq!(folder.children.len(), 1);

        let (_, logo) = resolved.resolver.other_files().next().unwrap();
        assert_eq!(logo.source, root.join("logo.png"));
        assert_eq!(logo.destination.to_string(), format!("{folder_name}/logo.png"));
    }

    #[test]
    fn test_unsupported_declaration_is_fatal() {
        let mut b = ProgramBuilder::new();
        let module = b.add_module("Main", "/src");
        let unit = b.add_source_file(module, "/src/a.hylo", "import Core").unwrap();
        let site = b.site_of(unit, "import Core").unwrap();
        let import = b
            .add(
                Scope::TranslationUnit(unit),
                crate::program::ImportDecl {
                    site,
                    identifier: "Core".into(),
                },
            )
            .unwrap();
        let program = b.finish();
        let assets = AssetStore::new();
        let documentation = DocumentationDatabase::new();
        let config = ResolveConfig::default();
        let context = ResolveContext::new(&program, &assets, &documentation, &config);

        assert_eq!(
            context.partial(Target::Decl(import.into())),
            Err(ResolveError::UnsupportedDecl(import.into()))
        );
        assert_eq!(context.partial(Target::Empty), Err(ResolveError::EmptyTarget));
    }

    #[test]
    fn test_same_root_twice_is_revisited() {
        let temp = TempDir::new().unwrap();
        let program = ProgramBuilder::new().finish();
        let config = ScanConfig::default();
        let (root, collector) = AssetScanner::new(&config)
            .scan(temp.path(), AssetCollector::new(&program))
            .unwrap();
        let assets = collector.into_store();
        let documentation = DocumentationDatabase::new();
        let resolve = ResolveConfig::default();
        let context = ResolveContext::new(&program, &assets, &documentation, &resolve);

        assert_eq!(
            TargetResolver::resolve(&context, &[root, root]).unwrap_err(),
            ResolveError::Revisited(root.into())
        );
    }

    #[test]
    fn test_other_file_over_folder_page_is_fatal() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "index.html", "<html></html>");
        let program = ProgramBuilder::new().finish();
        let config = DocConfig::default();
        let (root_id, collector) = AssetScanner::new(&config.scan)
            .scan(root, AssetCollector::new(&program))
            .unwrap();
        let assets = collector.into_store();
        let documentation = DocumentationDatabase::new();
        let context = ResolveContext::new(&program, &assets, &documentation, &config.resolve);

        let err = TargetResolver::resolve(&context, &[root_id]).unwrap_err();
        let ResolveError::PathCollision { path, first, second } = err else {
            panic!("expected a collision, got {err:?}");
        };
        let folder_name = crate::asset::file_name(root);
        assert_eq!(path.to_string(), format!("{folder_name}/index.html"));
        assert_eq!(first, Target::from(root_id));
        assert!(matches!(second, Target::Asset(AnyAssetId::OtherFile(_))));
    }
}
