//! The declaration tree consumed from the source-language front end
//!
//! A [`Program`] holds the source files, translation units and modules of a
//! project together with every declaration, stored in one arena per
//! declaration kind. It is produced once (see [`ProgramBuilder`]) and only
//! read afterward.

mod builder;
mod decl;
mod lookup;
mod source;

pub use builder::ProgramBuilder;
pub use decl::{
    AccessEffect, AnyDeclId, AssociatedTypeDecl, AssociatedTypeDeclId, AssociatedValueDecl,
    AssociatedValueDeclId, BindingDecl, BindingDeclId, BindingIntroducer, ConformanceDecl,
    ConformanceDeclId, DeclKind, ExtensionDecl, ExtensionDeclId, FunctionDecl, FunctionDeclId,
    GenericParameterDecl, GenericParameterDeclId, ImportDecl, ImportDeclId, InitializerDecl,
    InitializerDeclId, MethodDecl, MethodDeclId, MethodImplDecl, MethodImplDeclId, NamespaceDecl,
    NamespaceDeclId, OperatorDecl, OperatorDeclId, OperatorNotation, ParameterDecl,
    ParameterDeclId, ProductTypeDecl, ProductTypeDeclId, SubscriptDecl, SubscriptDeclId,
    SubscriptImplDecl, SubscriptImplDeclId, TraitDecl, TraitDeclId, TypeAliasDecl,
    TypeAliasDeclId,
};
pub use source::{
    Module, ModuleId, SourceFile, SourceFileId, SourcePosition, SourceRange, TranslationUnit,
    TranslationUnitId,
};

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::id::{Arena, ArenaId};

/// A lexical scope: a translation unit or a declaration containing others
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    TranslationUnit(TranslationUnitId),
    Decl(AnyDeclId),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TranslationUnit(unit) => write!(f, "{unit}"),
            Self::Decl(decl) => write!(f, "{decl}"),
        }
    }
}

/// Errors raised while building a program
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProgramError {
    #[error("a {member} cannot be declared in {scope}")]
    InvalidNesting { member: DeclKind, scope: Scope },

    #[error("unknown scope {0}")]
    UnknownScope(Scope),

    #[error("unknown module {0}")]
    UnknownModule(ModuleId),

    #[error("source file {} is already part of the program", .0.display())]
    DuplicateSourceFile(PathBuf),

    #[error("text `{needle}` does not occur in {unit}")]
    TextNotFound {
        unit: TranslationUnitId,
        needle: String,
    },
}

/// Storage and typed access for one declaration kind
pub trait DeclNode: Sized {
    type Id: ArenaId;

    const KIND: DeclKind;

    fn arena(program: &Program) -> &Arena<Self::Id, Self>;
    fn arena_mut(program: &mut Program) -> &mut Arena<Self::Id, Self>;
    fn erase(id: Self::Id) -> AnyDeclId;
    fn site(&self) -> SourceRange;
}

macro_rules! decl_node {
    ($decl:ident, $id:ident, $variant:ident, $field:ident) => {
        impl DeclNode for $decl {
            type Id = $id;

            const KIND: DeclKind = DeclKind::$variant;

            fn arena(program: &Program) -> &Arena<$id, Self> {
                &program.$field
            }

            fn arena_mut(program: &mut Program) -> &mut Arena<$id, Self> {
                &mut program.$field
            }

            fn erase(id: $id) -> AnyDeclId {
                AnyDeclId::$variant(id)
            }

            fn site(&self) -> SourceRange {
                self.site
            }
        }

        impl From<$id> for AnyDeclId {
            fn from(id: $id) -> Self {
                AnyDeclId::$variant(id)
            }
        }

        impl std::ops::Index<$id> for Program {
            type Output = $decl;

            fn index(&self, id: $id) -> &$decl {
                &self.$field[id]
            }
        }
    };
}

decl_node!(BindingDecl, BindingDeclId, Binding, bindings);
decl_node!(FunctionDecl, FunctionDeclId, Function, functions);
decl_node!(MethodDecl, MethodDeclId, Method, methods);
decl_node!(MethodImplDecl, MethodImplDeclId, MethodImpl, method_impls);
decl_node!(SubscriptDecl, SubscriptDeclId, Subscript, subscripts);
decl_node!(SubscriptImplDecl, SubscriptImplDeclId, SubscriptImpl, subscript_impls);
decl_node!(InitializerDecl, InitializerDeclId, Initializer, initializers);
decl_node!(ProductTypeDecl, ProductTypeDeclId, ProductType, product_types);
decl_node!(TraitDecl, TraitDeclId, Trait, traits);
decl_node!(TypeAliasDecl, TypeAliasDeclId, TypeAlias, type_aliases);
decl_node!(OperatorDecl, OperatorDeclId, Operator, operators);
decl_node!(AssociatedTypeDecl, AssociatedTypeDeclId, AssociatedType, associated_types);
decl_node!(AssociatedValueDecl, AssociatedValueDeclId, AssociatedValue, associated_values);
decl_node!(ParameterDecl, ParameterDeclId, Parameter, parameters);
decl_node!(GenericParameterDecl, GenericParameterDeclId, GenericParameter, generic_parameters);
decl_node!(ExtensionDecl, ExtensionDeclId, Extension, extensions);
decl_node!(ConformanceDecl, ConformanceDeclId, Conformance, conformances);
decl_node!(NamespaceDecl, NamespaceDeclId, Namespace, namespaces);
decl_node!(ImportDecl, ImportDeclId, Import, imports);

/// A fully parsed and checked program
#[derive(Debug, Default)]
pub struct Program {
    files: Arena<SourceFileId, SourceFile>,
    units: Arena<TranslationUnitId, TranslationUnit>,
    modules: Arena<ModuleId, Module>,
    unit_by_path: HashMap<PathBuf, TranslationUnitId>,
    parents: HashMap<AnyDeclId, Scope>,

    bindings: Arena<BindingDeclId, BindingDecl>,
    functions: Arena<FunctionDeclId, FunctionDecl>,
    methods: Arena<MethodDeclId, MethodDecl>,
    method_impls: Arena<MethodImplDeclId, MethodImplDecl>,
    subscripts: Arena<SubscriptDeclId, SubscriptDecl>,
    subscript_impls: Arena<SubscriptImplDeclId, SubscriptImplDecl>,
    initializers: Arena<InitializerDeclId, InitializerDecl>,
    product_types: Arena<ProductTypeDeclId, ProductTypeDecl>,
    traits: Arena<TraitDeclId, TraitDecl>,
    type_aliases: Arena<TypeAliasDeclId, TypeAliasDecl>,
    operators: Arena<OperatorDeclId, OperatorDecl>,
    associated_types: Arena<AssociatedTypeDeclId, AssociatedTypeDecl>,
    associated_values: Arena<AssociatedValueDeclId, AssociatedValueDecl>,
    parameters: Arena<ParameterDeclId, ParameterDecl>,
    generic_parameters: Arena<GenericParameterDeclId, GenericParameterDecl>,
    extensions: Arena<ExtensionDeclId, ExtensionDecl>,
    conformances: Arena<ConformanceDeclId, ConformanceDecl>,
    namespaces: Arena<NamespaceDeclId, NamespaceDecl>,
    imports: Arena<ImportDeclId, ImportDecl>,
}

impl Program {
    /// All modules in declaration order
    pub fn modules(&self) -> impl Iterator<Item = (ModuleId, &Module)> {
        self.modules.iter()
    }

    #[must_use]
    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id]
    }

    #[must_use]
    pub fn source_file(&self, id: SourceFileId) -> &SourceFile {
        &self.files[id]
    }

    #[must_use]
    pub fn translation_unit(&self, id: TranslationUnitId) -> &TranslationUnit {
        &self.units[id]
    }

    /// The translation unit parsed from the file at `path`
    #[must_use]
    pub fn unit_for_path(&self, path: &Path) -> Option<TranslationUnitId> {
        self.unit_by_path.get(path).copied()
    }

    /// Typed access to a declaration through its id
    #[must_use]
    pub fn decl<T: DeclNode>(&self, id: T::Id) -> Option<&T> {
        T::arena(self).get(id)
    }

    /// The scope that directly contains `decl`
    #[must_use]
    pub fn parent(&self, decl: AnyDeclId) -> Option<Scope> {
        self.parents.get(&decl).copied()
    }

    /// The translation unit in which `decl` is written
    #[must_use]
    pub fn translation_unit_of(&self, decl: AnyDeclId) -> Option<TranslationUnitId> {
        let mut current = decl;
        loop {
            match self.parent(current)? {
                Scope::TranslationUnit(unit) => return Some(unit),
                Scope::Decl(parent) => current = parent,
            }
        }
    }

    /// The source range covered by `decl`
    #[must_use]
    pub fn site(&self, decl: AnyDeclId) -> SourceRange {
        match decl {
            AnyDeclId::Binding(id) => self[id].site,
            AnyDeclId::Function(id) => self[id].site,
            AnyDeclId::Method(id) => self[id].site,
            AnyDeclId::MethodImpl(id) => self[id].site,
            AnyDeclId::Subscript(id) => self[id].site,
            AnyDeclId::SubscriptImpl(id) => self[id].site,
            AnyDeclId::Initializer(id) => self[id].site,
            AnyDeclId::ProductType(id) => self[id].site,
            AnyDeclId::Trait(id) => self[id].site,
            AnyDeclId::TypeAlias(id) => self[id].site,
            AnyDeclId::Operator(id) => self[id].site,
            AnyDeclId::AssociatedType(id) => self[id].site,
            AnyDeclId::AssociatedValue(id) => self[id].site,
            AnyDeclId::Parameter(id) => self[id].site,
            AnyDeclId::GenericParameter(id) => self[id].site,
            AnyDeclId::Extension(id) => self[id].site,
            AnyDeclId::Conformance(id) => self[id].site,
            AnyDeclId::Namespace(id) => self[id].site,
            AnyDeclId::Import(id) => self[id].site,
        }
    }

    /// The identifier `decl` introduces, if it has one
    ///
    /// Bindings report their first name; initializers and implementations are
    /// anonymous.
    #[must_use]
    pub fn identifier(&self, decl: AnyDeclId) -> Option<&str> {
        match decl {
            AnyDeclId::Binding(id) => self[id].names.first().map(String::as_str),
            AnyDeclId::Function(id) => Some(&self[id].identifier),
            AnyDeclId::Method(id) => Some(&self[id].identifier),
            AnyDeclId::Subscript(id) => self[id].identifier.as_deref(),
            AnyDeclId::ProductType(id) => Some(&self[id].identifier),
            AnyDeclId::Trait(id) => Some(&self[id].identifier),
            AnyDeclId::TypeAlias(id) => Some(&self[id].identifier),
            AnyDeclId::Operator(id) => Some(&self[id].name),
            AnyDeclId::AssociatedType(id) => Some(&self[id].identifier),
            AnyDeclId::AssociatedValue(id) => Some(&self[id].identifier),
            AnyDeclId::Parameter(id) => Some(&self[id].identifier),
            AnyDeclId::GenericParameter(id) => Some(&self[id].identifier),
            AnyDeclId::Namespace(id) => Some(&self[id].identifier),
            AnyDeclId::Import(id) => Some(&self[id].identifier),
            AnyDeclId::MethodImpl(_)
            | AnyDeclId::SubscriptImpl(_)
            | AnyDeclId::Initializer(_)
            | AnyDeclId::Extension(_)
            | AnyDeclId::Conformance(_) => None,
        }
    }

    /// Returns true if `decl` introduces `name`
    #[must_use]
    pub fn introduces(&self, decl: AnyDeclId, name: &str) -> bool {
        match decl {
            AnyDeclId::Binding(id) => self[id].names.iter().any(|n| n == name),
            AnyDeclId::Initializer(_) => name == "init",
            _ => self.identifier(decl) == Some(name),
        }
    }

    /// Members declared directly inside `decl`
    #[must_use]
    pub fn members(&self, decl: AnyDeclId) -> &[AnyDeclId] {
        match decl {
            AnyDeclId::ProductType(id) => &self[id].members,
            AnyDeclId::Trait(id) => &self[id].members,
            AnyDeclId::Extension(id) => &self[id].members,
            AnyDeclId::Conformance(id) => &self[id].members,
            AnyDeclId::Namespace(id) => &self[id].members,
            _ => &[],
        }
    }

    /// The implementations bundled by a method or subscript
    #[must_use]
    pub fn implementations(&self, decl: AnyDeclId) -> Vec<AnyDeclId> {
        match decl {
            AnyDeclId::Method(id) => self[id].impls.iter().map(|&i| i.into()).collect(),
            AnyDeclId::Subscript(id) => self[id].impls.iter().map(|&i| i.into()).collect(),
            _ => Vec::new(),
        }
    }

    /// The parameters of a function-like declaration
    ///
    /// Method and subscript implementations share the parameters of their
    /// bundle.
    #[must_use]
    pub fn parameters(&self, decl: AnyDeclId) -> &[ParameterDeclId] {
        match decl {
            AnyDeclId::Function(id) => &self[id].parameters,
            AnyDeclId::Method(id) => &self[id].parameters,
            AnyDeclId::Subscript(id) => &self[id].parameters,
            AnyDeclId::Initializer(id) => &self[id].parameters,
            AnyDeclId::MethodImpl(_) | AnyDeclId::SubscriptImpl(_) => match self.parent(decl) {
                Some(Scope::Decl(bundle)) => self.parameters(bundle),
                _ => &[],
            },
            _ => &[],
        }
    }

    /// The generic parameters of a declaration
    #[must_use]
    pub fn generic_parameters(&self, decl: AnyDeclId) -> &[GenericParameterDeclId] {
        match decl {
            AnyDeclId::Function(id) => &self[id].generic_parameters,
            AnyDeclId::Method(id) => &self[id].generic_parameters,
            AnyDeclId::Subscript(id) => &self[id].generic_parameters,
            AnyDeclId::Initializer(id) => &self[id].generic_parameters,
            AnyDeclId::ProductType(id) => &self[id].generic_parameters,
            AnyDeclId::TypeAlias(id) => &self[id].generic_parameters,
            AnyDeclId::MethodImpl(_) | AnyDeclId::SubscriptImpl(_) => match self.parent(decl) {
                Some(Scope::Decl(bundle)) => self.generic_parameters(bundle),
                _ => &[],
            },
            _ => &[],
        }
    }

    /// Every declaration written in `unit`, in source order, excluding
    /// parameters and generic parameters
    #[must_use]
    pub fn decls_in_unit(&self, unit: TranslationUnitId) -> Vec<AnyDeclId> {
        let mut result = Vec::new();
        for &decl in &self.units[unit].decls {
            self.collect_nested(decl, &mut result);
        }
        result
    }

    fn collect_nested(&self, decl: AnyDeclId, result: &mut Vec<AnyDeclId>) {
        result.push(decl);
        for &member in self.members(decl) {
            self.collect_nested(member, result);
        }
        for implementation in self.implementations(decl) {
            result.push(implementation);
        }
    }

    /// Number of declarations of every kind
    #[must_use]
    pub fn decl_count(&self) -> usize {
        self.bindings.len()
            + self.functions.len()
            + self.methods.len()
            + self.method_impls.len()
            + self.subscripts.len()
            + self.subscript_impls.len()
            + self.initializers.len()
            + self.product_types.len()
            + self.traits.len()
            + self.type_aliases.len()
            + self.operators.len()
            + self.associated_types.len()
            + self.associated_values.len()
            + self.parameters.len()
            + self.generic_parameters.len()
            + self.extensions.len()
            + self.conformances.len()
            + self.namespaces.len()
            + self.imports.len()
    }
}
