//! Name lookup over the declaration tree

use super::{AnyDeclId, Program, Scope, TranslationUnitId};

impl Program {
    /// Declarations named `name` visible from `scope`
    ///
    /// Scopes are searched innermost first; the first scope with at least one
    /// match wins, so overloads come back together. After the enclosing
    /// translation unit, the top-level declarations of every file in the same
    /// module are searched.
    #[must_use]
    pub fn lookup(&self, scope: Scope, name: &str) -> Vec<AnyDeclId> {
        let mut current = Some(scope);
        let mut unit = None;
        while let Some(scope) = current {
            let found: Vec<_> = self
                .visible_in(scope)
                .into_iter()
                .filter(|&decl| self.introduces(decl, name))
                .collect();
            if !found.is_empty() {
                return found;
            }
            current = match scope {
                Scope::Decl(decl) => self.parent(decl),
                Scope::TranslationUnit(u) => {
                    unit = Some(u);
                    None
                }
            };
        }

        let Some(unit) = unit else {
            return Vec::new();
        };
        let module = self.translation_unit(unit).module;
        self.module(module)
            .units
            .iter()
            .filter(|&&other| other != unit)
            .flat_map(|&other| self.visible_in(Scope::TranslationUnit(other)))
            .filter(|&decl| self.introduces(decl, name))
            .collect()
    }

    /// Resolve a dotted reference such as `Vector.push` from `scope`
    #[must_use]
    pub fn resolve_qualified(&self, scope: Scope, path: &str) -> Vec<AnyDeclId> {
        let mut components = path.split('.').map(str::trim);
        let Some(first) = components.next().filter(|c| !c.is_empty()) else {
            return Vec::new();
        };

        let mut candidates = self.lookup(scope, first);
        for component in components {
            if component.is_empty() {
                return Vec::new();
            }
            candidates = candidates
                .into_iter()
                .flat_map(|decl| self.named_members(decl))
                .filter(|&decl| self.introduces(decl, component))
                .collect();
            if candidates.is_empty() {
                break;
            }
        }
        candidates
    }

    /// Declarations introduced inside `decl` that can be named from it
    ///
    /// Members added to a product type by extensions and conformances of the
    /// same module count as its own.
    #[must_use]
    pub fn named_members(&self, decl: AnyDeclId) -> Vec<AnyDeclId> {
        let mut result: Vec<AnyDeclId> = self
            .generic_parameters(decl)
            .iter()
            .map(|&g| g.into())
            .chain(self.parameters(decl).iter().map(|&p| p.into()))
            .collect();
        self.flatten_into(self.members(decl), &mut result);

        if let AnyDeclId::ProductType(ty) = decl {
            let subject = self[ty].identifier.as_str();
            for extension in self.extensions_of(decl, subject) {
                self.flatten_into(self.members(extension), &mut result);
            }
        }
        result
    }

    fn visible_in(&self, scope: Scope) -> Vec<AnyDeclId> {
        match scope {
            Scope::Decl(decl) => self.named_members(decl),
            Scope::TranslationUnit(unit) => self
                .translation_unit(unit)
                .decls
                .iter()
                .copied()
                .filter(|decl| !matches!(decl, AnyDeclId::Extension(_) | AnyDeclId::Conformance(_)))
                .collect(),
        }
    }

    fn flatten_into(&self, members: &[AnyDeclId], result: &mut Vec<AnyDeclId>) {
        for &member in members {
            match member {
                AnyDeclId::Extension(_) | AnyDeclId::Conformance(_) => {
                    self.flatten_into(self.members(member), result);
                }
                _ => result.push(member),
            }
        }
    }

    /// Extensions and conformances of `subject` in the module declaring `decl`
    fn extensions_of(&self, decl: AnyDeclId, subject: &str) -> Vec<AnyDeclId> {
        let Some(unit) = self.translation_unit_of(decl) else {
            return Vec::new();
        };
        let module = self.translation_unit(unit).module;
        self.module(module)
            .units
            .iter()
            .flat_map(|&unit: &TranslationUnitId| self.decls_in_unit(unit))
            .filter(|&candidate| match candidate {
                AnyDeclId::Extension(id) => self[id].subject == subject,
                AnyDeclId::Conformance(id) => self[id].subject == subject,
                _ => false,
            })
            .collect()
    }
}
