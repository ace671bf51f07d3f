//! Cross-linking for documentation
//!
//! This module resolves textual references written in documentation, such
//! as `` `Vector.push` ``, to declarations, and rewrites them into relative
//! links between output pages.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::markdown::ListItem;
use crate::program::{AnyDeclId, Program, Scope};
use crate::resolve::{RelativePath, Target, TargetResolver};

/// An inline code span holding a possibly qualified name
static RE_CODE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"`([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*)`").unwrap()
});

/// Configuration for cross-linking
#[derive(Debug, Clone, Default)]
pub struct CrossLinkConfig {
    /// Whether references to built-in types are linked when the program
    /// declares them
    pub link_builtins: bool,
}

/// Cross-linker for resolving references to links
#[derive(Debug)]
pub struct CrossLinker<'a> {
    program: &'a Program,
    resolver: &'a TargetResolver,
    config: CrossLinkConfig,
    /// Built-in types that shouldn't be linked
    builtin_types: HashSet<&'static str>,
}

impl<'a> CrossLinker<'a> {
    /// Create a new cross-linker
    #[must_use]
    pub fn new(program: &'a Program, resolver: &'a TargetResolver) -> Self {
        Self::with_config(program, resolver, CrossLinkConfig::default())
    }

    #[must_use]
    pub fn with_config(
        program: &'a Program,
        resolver: &'a TargetResolver,
        config: CrossLinkConfig,
    ) -> Self {
        let builtin_types = ["Int", "Float", "Double", "Bool", "String", "Void", "Never"]
            .into_iter()
            .collect();
        Self {
            program,
            resolver,
            config,
            builtin_types,
        }
    }

    /// Every declaration `reference` may denote when written in `scope`
    #[must_use]
    pub fn resolve_reference(&self, scope: Scope, reference: &str) -> Vec<AnyDeclId> {
        let reference = reference.trim().trim_matches('`');
        if !self.config.link_builtins && self.builtin_types.contains(reference) {
            return Vec::new();
        }
        self.program.resolve_qualified(scope, reference)
    }

    /// Link from the page of `from` to the declaration `reference` denotes
    ///
    /// Ambiguous and unresolved references produce no link.
    #[must_use]
    pub fn link(&self, from: Target, scope: Scope, reference: &str) -> Option<RelativePath> {
        match self.resolve_reference(scope, reference).as_slice() {
            [decl] => self.resolver.refer(from, Target::Decl(*decl)),
            [] => None,
            candidates => {
                log::debug!(
                    "`{reference}` is ambiguous in {scope}: {} candidates",
                    candidates.len()
                );
                None
            }
        }
    }

    /// Rewrite the code spans of Markdown `text` that name a declaration into
    /// links
    #[must_use]
    pub fn link_text(&self, from: Target, scope: Scope, text: &str) -> String {
        RE_CODE_REFERENCE
            .replace_all(text, |captures: &Captures<'_>| {
                match self.link(from, scope, &captures[1]) {
                    Some(path) => format!("[{}]({path})", &captures[0]),
                    None => captures[0].to_string(),
                }
            })
            .into_owned()
    }

    /// Resolve a `See also` item to its text and link
    #[must_use]
    pub fn resolve_see_also(
        &self,
        from: Target,
        scope: Scope,
        item: &ListItem,
    ) -> Option<(String, RelativePath)> {
        let reference = item.plain_text();
        let link = self.link(from, scope, &reference)?;
        Some((reference, link))
    }
}
