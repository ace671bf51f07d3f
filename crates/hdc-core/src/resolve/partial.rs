//! Path-independent resolution data: names, descriptions and children

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::{ResolveContext, ResolveError, Target};
use crate::asset::AnyAssetId;
use crate::markdown::{Block, Document};
use crate::program::{AnyDeclId, DeclKind, Program};

/// Characters kept as is in path segments
const PATH_NAME: &AsciiSet = &NON_ALPHANUMERIC.remove(b'_').remove(b'-').remove(b'.');

/// What is known about a target before its path is
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Partial {
    /// Own path segments, appended to the parent's folder
    pub segments: Vec<String>,
    pub simple_name: String,
    pub navigation_name: String,
    pub meta_description: String,
    /// Targets listed as children
    pub children: Vec<Target>,
    /// Other files resolved under this target but never listed
    pub embedded: Vec<AnyAssetId>,
}

/// Returns true if declarations of `kind` are resolved to their own page
pub(super) fn is_supported(kind: DeclKind) -> bool {
    kind.is_documentable()
}

/// Returns true if declarations of `kind` get a folder for their children
fn is_container(kind: DeclKind) -> bool {
    matches!(
        kind,
        DeclKind::ProductType | DeclKind::Trait | DeclKind::Method | DeclKind::Subscript
    )
}

impl ResolveContext<'_> {
    pub(super) fn partial(&self, target: Target) -> Result<Partial, ResolveError> {
        match target {
            Target::Asset(asset) => Ok(self.partial_asset(asset)),
            Target::Decl(decl) => self.partial_decl(decl),
            Target::Empty => Err(ResolveError::EmptyTarget),
        }
    }

    fn page(&self, stem: &str) -> String {
        format!("{stem}.{}", self.config.page_extension)
    }

    fn index_page(&self) -> String {
        self.page("index")
    }

    fn partial_asset(&self, asset: AnyAssetId) -> Partial {
        let assets = self.assets;
        match asset {
            AnyAssetId::Folder(id) => {
                let folder = &assets[id];
                let article = folder.documentation.map(|a| &assets[a]);
                let name = article
                    .and_then(|a| a.title.clone())
                    .unwrap_or_else(|| folder.name.clone());
                let summary = article.and_then(|a| summary_of(&a.content));
                let (embedded, children): (Vec<_>, Vec<_>) = folder
                    .children
                    .iter()
                    .copied()
                    .partition(|c| matches!(c, AnyAssetId::OtherFile(_)));
                Partial {
                    segments: vec![path_name(&folder.name), self.index_page()],
                    meta_description: self.meta_description(summary, "folder", &name),
                    navigation_name: name.clone(),
                    simple_name: name,
                    children: children.into_iter().map(Target::Asset).collect(),
                    embedded,
                }
            }
            AnyAssetId::Article(id) => {
                let article = &assets[id];
                let stem = article_stem(&assets.file_name(asset));
                let name = article.title.clone().unwrap_or_else(|| stem.clone());
                Partial {
                    segments: vec![self.page(&path_name(&stem))],
                    meta_description: self.meta_description(
                        summary_of(&article.content),
                        "article",
                        &name,
                    ),
                    navigation_name: name.clone(),
                    simple_name: name,
                    children: Vec::new(),
                    embedded: Vec::new(),
                }
            }
            AnyAssetId::SourceFile(id) => {
                let file = &assets[id];
                let name = assets.file_name(asset);
                let unit = self.program.translation_unit(file.translation_unit);
                Partial {
                    segments: vec![path_name(&name), self.index_page()],
                    meta_description: self.meta_description(
                        file.general_description.summary_text(),
                        "source file",
                        &name,
                    ),
                    navigation_name: name.clone(),
                    simple_name: name,
                    children: self.flatten(&unit.decls),
                    embedded: Vec::new(),
                }
            }
            // Never expanded; the resolver records other files on its own.
            AnyAssetId::OtherFile(_) => Partial {
                segments: vec![assets.file_name(asset)],
                simple_name: assets.file_name(asset),
                navigation_name: assets.file_name(asset),
                meta_description: String::new(),
                children: Vec::new(),
                embedded: Vec::new(),
            },
        }
    }

    fn partial_decl(&self, decl: AnyDeclId) -> Result<Partial, ResolveError> {
        let kind = decl.kind();
        if !is_supported(kind) {
            return Err(ResolveError::UnsupportedDecl(decl));
        }

        let simple_name = simple_name(self.program, decl);
        let stem = format!("{}-{}-{}", kind.slug(), path_name(&simple_name), decl.raw());
        let segments = if is_container(kind) {
            vec![stem, self.index_page()]
        } else {
            vec![self.page(&stem)]
        };
        let children = match kind {
            DeclKind::ProductType | DeclKind::Trait => self.flatten(self.program.members(decl)),
            DeclKind::Method | DeclKind::Subscript => self
                .program
                .implementations(decl)
                .into_iter()
                .map(Target::Decl)
                .collect(),
            _ => Vec::new(),
        };
        let summary = self
            .documentation
            .general(decl)
            .and_then(|general| general.summary_text());

        Ok(Partial {
            segments,
            meta_description: self.meta_description(summary, kind.display_name(), &simple_name),
            navigation_name: navigation_name(self.program, decl, &simple_name),
            simple_name,
            children,
            embedded: Vec::new(),
        })
    }

    /// Supported declarations among `decls`, looking through transparent
    /// containers
    fn flatten(&self, decls: &[AnyDeclId]) -> Vec<Target> {
        let mut result = Vec::new();
        for &decl in decls {
            let kind = decl.kind();
            if kind.is_transparent_container() {
                result.extend(self.flatten(self.program.members(decl)));
            } else if is_supported(kind) {
                result.push(Target::Decl(decl));
            }
        }
        result
    }

    /// A one-line description for page metadata
    fn meta_description(&self, summary: Option<String>, kind: &str, name: &str) -> String {
        let summary = summary
            .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|text| !text.is_empty());
        match summary {
            Some(text) => truncate(&text, self.config.meta_description_limit),
            None => format!("Documentation for the {kind} {name}."),
        }
    }
}

/// Plain text of the first block of `document`
fn summary_of(document: &Document) -> Option<String> {
    document.blocks.first().map(Block::plain_text)
}

/// `text` cut to at most `limit` characters, marking the cut with an ellipsis
fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let kept: String = text.chars().take(limit.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}

/// Name of an article without its extension
fn article_stem(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map_or(file_name, |(stem, _)| stem)
        .to_string()
}

/// `name` with every character unsafe in a file name percent-encoded
pub(super) fn path_name(name: &str) -> String {
    utf8_percent_encode(name, PATH_NAME).to_string()
}

/// The plain name of a declaration
fn simple_name(program: &Program, decl: AnyDeclId) -> String {
    match decl {
        AnyDeclId::MethodImpl(id) => program[id].effect.keyword().to_string(),
        AnyDeclId::SubscriptImpl(id) => program[id].effect.keyword().to_string(),
        AnyDeclId::Initializer(_) => "init".to_string(),
        AnyDeclId::Subscript(id) if program[id].identifier.is_none() => "subscript".to_string(),
        _ => program.identifier(decl).unwrap_or_default().to_string(),
    }
}

/// The name shown in navigation: callables show their argument labels
fn navigation_name(program: &Program, decl: AnyDeclId, simple_name: &str) -> String {
    match decl {
        AnyDeclId::Function(_)
        | AnyDeclId::Method(_)
        | AnyDeclId::Subscript(_)
        | AnyDeclId::Initializer(_) => {
            let labels: String = program
                .parameters(decl)
                .iter()
                .map(|&p| format!("{}:", program[p].label.as_deref().unwrap_or("_")))
                .collect();
            format!("{simple_name}({labels})")
        }
        AnyDeclId::Binding(id) => program[id].names.join(", "),
        AnyDeclId::Operator(id) => format!("{} {}", program[id].notation.keyword(), simple_name),
        _ => simple_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly ten", 11), "exactly ten");
        assert_eq!(truncate("one two three", 8), "one two…");
        assert_eq!(truncate("one two three", 8).chars().count(), 8);
    }

    #[test]
    fn test_path_name() {
        assert_eq!(path_name("Vector"), "Vector");
        assert_eq!(path_name("+"), "%2B");
        assert_eq!(path_name("a/b"), "a%2Fb");
        assert_eq!(path_name("index.hylo"), "index.hylo");
        assert_eq!(path_name("é"), "%C3%A9");
    }

    #[test]
    fn test_article_stem() {
        assert_eq!(article_stem("guide.hylodoc"), "guide");
        assert_eq!(article_stem("index.internal.hylodoc"), "index.internal");
        assert_eq!(article_stem("README"), "README");
    }
}
