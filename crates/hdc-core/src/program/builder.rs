//! Incremental construction of a [`Program`]

use std::path::PathBuf;

use super::{
    AnyDeclId, DeclKind, DeclNode, Module, ModuleId, Program, ProgramError, Scope, SourceFile,
    SourceRange, TranslationUnit, TranslationUnitId,
};
use crate::lexer::Span;

/// Builds a program one module, file and declaration at a time
///
/// Declarations are appended in source order; every declaration is checked
/// against the scope it is added to before it is stored.
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    program: Program,
}

impl ProgramBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module rooted at `root`
    pub fn add_module(&mut self, name: impl Into<String>, root: impl Into<PathBuf>) -> ModuleId {
        self.program.modules.push(Module {
            name: name.into(),
            root: root.into(),
            units: Vec::new(),
        })
    }

    /// Register a source file of `module` and open its translation unit
    pub fn add_source_file(
        &mut self,
        module: ModuleId,
        path: impl Into<PathBuf>,
        text: impl Into<String>,
    ) -> Result<TranslationUnitId, ProgramError> {
        let path = path.into();
        if self.program.modules.get(module).is_none() {
            return Err(ProgramError::UnknownModule(module));
        }
        if self.program.unit_by_path.contains_key(&path) {
            return Err(ProgramError::DuplicateSourceFile(path));
        }

        let file = self.program.files.push(SourceFile::new(path.clone(), text));
        let unit = self.program.units.push(TranslationUnit {
            file,
            module,
            decls: Vec::new(),
        });
        self.program.unit_by_path.insert(path, unit);
        if let Some(module) = self.program.modules.get_mut(module) {
            module.units.push(unit);
        }
        Ok(unit)
    }

    /// The range of the first occurrence of `needle` in the text of `unit`
    pub fn site_of(&self, unit: TranslationUnitId, needle: &str) -> Result<SourceRange, ProgramError> {
        let not_found = || ProgramError::TextNotFound {
            unit,
            needle: needle.to_string(),
        };
        let file = self.program.units.get(unit).ok_or_else(not_found)?.file;
        let start = self.program.files[file].text.find(needle).ok_or_else(not_found)?;
        Ok(SourceRange::new(file, Span::from_range(start..start + needle.len())))
    }

    /// Add `decl` to `scope`
    pub fn add<T: DeclNode>(&mut self, scope: Scope, decl: T) -> Result<T::Id, ProgramError> {
        self.check_scope(scope, T::KIND)?;

        let id = T::arena_mut(&mut self.program).push(decl);
        let any = T::erase(id);
        self.attach(scope, any);
        self.program.parents.insert(any, scope);
        Ok(id)
    }

    /// Finish building
    #[must_use]
    pub fn finish(self) -> Program {
        self.program
    }

    fn check_scope(&self, scope: Scope, member: DeclKind) -> Result<(), ProgramError> {
        let accepted = match scope {
            Scope::TranslationUnit(unit) => {
                if self.program.units.get(unit).is_none() {
                    return Err(ProgramError::UnknownScope(scope));
                }
                accepts_at_top_level(member)
            }
            Scope::Decl(parent) => {
                if !self.contains(parent) {
                    return Err(ProgramError::UnknownScope(scope));
                }
                accepts_member(parent.kind(), member)
            }
        };
        if accepted {
            Ok(())
        } else {
            Err(ProgramError::InvalidNesting { member, scope })
        }
    }

    fn contains(&self, decl: AnyDeclId) -> bool {
        let p = &self.program;
        match decl {
            AnyDeclId::Binding(id) => p.bindings.get(id).is_some(),
            AnyDeclId::Function(id) => p.functions.get(id).is_some(),
            AnyDeclId::Method(id) => p.methods.get(id).is_some(),
            AnyDeclId::MethodImpl(id) => p.method_impls.get(id).is_some(),
            AnyDeclId::Subscript(id) => p.subscripts.get(id).is_some(),
            AnyDeclId::SubscriptImpl(id) => p.subscript_impls.get(id).is_some(),
            AnyDeclId::Initializer(id) => p.initializers.get(id).is_some(),
            AnyDeclId::ProductType(id) => p.product_types.get(id).is_some(),
            AnyDeclId::Trait(id) => p.traits.get(id).is_some(),
            AnyDeclId::TypeAlias(id) => p.type_aliases.get(id).is_some(),
            AnyDeclId::Operator(id) => p.operators.get(id).is_some(),
            AnyDeclId::AssociatedType(id) => p.associated_types.get(id).is_some(),
            AnyDeclId::AssociatedValue(id) => p.associated_values.get(id).is_some(),
            AnyDeclId::Parameter(id) => p.parameters.get(id).is_some(),
            AnyDeclId::GenericParameter(id) => p.generic_parameters.get(id).is_some(),
            AnyDeclId::Extension(id) => p.extensions.get(id).is_some(),
            AnyDeclId::Conformance(id) => p.conformances.get(id).is_some(),
            AnyDeclId::Namespace(id) => p.namespaces.get(id).is_some(),
            AnyDeclId::Import(id) => p.imports.get(id).is_some(),
        }
    }

    /// Record `member` in the list of `scope` it belongs to
    ///
    /// Only called after [`Self::check_scope`] accepted the pair, so every
    /// lookup below succeeds.
    fn attach(&mut self, scope: Scope, member: AnyDeclId) {
        let p = &mut self.program;
        let parent = match scope {
            Scope::TranslationUnit(unit) => {
                if let Some(unit) = p.units.get_mut(unit) {
                    unit.decls.push(member);
                }
                return;
            }
            Scope::Decl(parent) => parent,
        };

        match (parent, member) {
            (AnyDeclId::Function(f), AnyDeclId::Parameter(param)) => {
                push(p.functions.get_mut(f).map(|d| &mut d.parameters), param);
            }
            (AnyDeclId::Method(m), AnyDeclId::Parameter(param)) => {
                push(p.methods.get_mut(m).map(|d| &mut d.parameters), param);
            }
            (AnyDeclId::Subscript(s), AnyDeclId::Parameter(param)) => {
                push(p.subscripts.get_mut(s).map(|d| &mut d.parameters), param);
            }
            (AnyDeclId::Initializer(i), AnyDeclId::Parameter(param)) => {
                push(p.initializers.get_mut(i).map(|d| &mut d.parameters), param);
            }
            (AnyDeclId::Function(f), AnyDeclId::GenericParameter(g)) => {
                push(p.functions.get_mut(f).map(|d| &mut d.generic_parameters), g);
            }
            (AnyDeclId::Method(m), AnyDeclId::GenericParameter(g)) => {
                push(p.methods.get_mut(m).map(|d| &mut d.generic_parameters), g);
            }
            (AnyDeclId::Subscript(s), AnyDeclId::GenericParameter(g)) => {
                push(p.subscripts.get_mut(s).map(|d| &mut d.generic_parameters), g);
            }
            (AnyDeclId::Initializer(i), AnyDeclId::GenericParameter(g)) => {
                push(p.initializers.get_mut(i).map(|d| &mut d.generic_parameters), g);
            }
            (AnyDeclId::ProductType(t), AnyDeclId::GenericParameter(g)) => {
                push(p.product_types.get_mut(t).map(|d| &mut d.generic_parameters), g);
            }
            (AnyDeclId::TypeAlias(t), AnyDeclId::GenericParameter(g)) => {
                push(p.type_aliases.get_mut(t).map(|d| &mut d.generic_parameters), g);
            }
            (AnyDeclId::Method(m), AnyDeclId::MethodImpl(i)) => {
                push(p.methods.get_mut(m).map(|d| &mut d.impls), i);
            }
            (AnyDeclId::Subscript(s), AnyDeclId::SubscriptImpl(i)) => {
                push(p.subscripts.get_mut(s).map(|d| &mut d.impls), i);
            }
            (AnyDeclId::ProductType(t), member) => {
                push(p.product_types.get_mut(t).map(|d| &mut d.members), member);
            }
            (AnyDeclId::Trait(t), member) => {
                push(p.traits.get_mut(t).map(|d| &mut d.members), member);
            }
            (AnyDeclId::Extension(e), member) => {
                push(p.extensions.get_mut(e).map(|d| &mut d.members), member);
            }
            (AnyDeclId::Conformance(c), member) => {
                push(p.conformances.get_mut(c).map(|d| &mut d.members), member);
            }
            (AnyDeclId::Namespace(n), member) => {
                push(p.namespaces.get_mut(n).map(|d| &mut d.members), member);
            }
            _ => {}
        }
    }
}

fn push<T>(list: Option<&mut Vec<T>>, item: T) {
    if let Some(list) = list {
        list.push(item);
    }
}

fn accepts_at_top_level(member: DeclKind) -> bool {
    matches!(
        member,
        DeclKind::Binding
            | DeclKind::Function
            | DeclKind::Subscript
            | DeclKind::ProductType
            | DeclKind::Trait
            | DeclKind::TypeAlias
            | DeclKind::Operator
            | DeclKind::Extension
            | DeclKind::Conformance
            | DeclKind::Namespace
            | DeclKind::Import
    )
}

fn accepts_member(parent: DeclKind, member: DeclKind) -> bool {
    use DeclKind as K;
    match parent {
        K::Function | K::Initializer => matches!(member, K::Parameter | K::GenericParameter),
        K::Method => matches!(member, K::Parameter | K::GenericParameter | K::MethodImpl),
        K::Subscript => matches!(member, K::Parameter | K::GenericParameter | K::SubscriptImpl),
        K::TypeAlias => member == K::GenericParameter,
        K::ProductType => matches!(
            member,
            K::Binding
                | K::Function
                | K::Method
                | K::Subscript
                | K::Initializer
                | K::ProductType
                | K::TypeAlias
                | K::GenericParameter
        ),
        K::Trait => matches!(
            member,
            K::Function
                | K::Method
                | K::Subscript
                | K::Initializer
                | K::AssociatedType
                | K::AssociatedValue
        ),
        K::Extension | K::Conformance => matches!(
            member,
            K::Binding
                | K::Function
                | K::Method
                | K::Subscript
                | K::Initializer
                | K::ProductType
                | K::TypeAlias
        ),
        K::Namespace => accepts_at_top_level(member) && member != K::Import,
        _ => false,
    }
}
