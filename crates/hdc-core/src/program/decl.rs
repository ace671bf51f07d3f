//! Declarations of the documented program
//!
//! Every declaration kind has its own dense identifier type and arena.
//! [`AnyDeclId`] is the closed union over all kinds; operations that depend on
//! the kind match on it exhaustively.

use std::fmt;

use super::source::SourceRange;
use crate::id::define_id;

define_id!(BindingDeclId, "binding");
define_id!(FunctionDeclId, "function");
define_id!(MethodDeclId, "method");
define_id!(MethodImplDeclId, "method-impl");
define_id!(SubscriptDeclId, "subscript");
define_id!(SubscriptImplDeclId, "subscript-impl");
define_id!(InitializerDeclId, "initializer");
define_id!(ProductTypeDeclId, "product-type");
define_id!(TraitDeclId, "trait");
define_id!(TypeAliasDeclId, "type-alias");
define_id!(OperatorDeclId, "operator");
define_id!(AssociatedTypeDeclId, "associated-type");
define_id!(AssociatedValueDeclId, "associated-value");
define_id!(ParameterDeclId, "parameter");
define_id!(GenericParameterDeclId, "generic-parameter");
define_id!(ExtensionDeclId, "extension");
define_id!(ConformanceDeclId, "conformance");
define_id!(NamespaceDeclId, "namespace");
define_id!(ImportDeclId, "import");

/// The kind of a declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DeclKind {
    Binding,
    Function,
    Method,
    MethodImpl,
    Subscript,
    SubscriptImpl,
    Initializer,
    ProductType,
    Trait,
    TypeAlias,
    Operator,
    AssociatedType,
    AssociatedValue,
    Parameter,
    GenericParameter,
    Extension,
    Conformance,
    Namespace,
    Import,
}

impl DeclKind {
    /// Human-readable name of the kind
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Binding => "binding",
            Self::Function => "function",
            Self::Method => "method",
            Self::MethodImpl => "method implementation",
            Self::Subscript => "subscript",
            Self::SubscriptImpl => "subscript implementation",
            Self::Initializer => "initializer",
            Self::ProductType => "type",
            Self::Trait => "trait",
            Self::TypeAlias => "type alias",
            Self::Operator => "operator",
            Self::AssociatedType => "associated type",
            Self::AssociatedValue => "associated value",
            Self::Parameter => "parameter",
            Self::GenericParameter => "generic parameter",
            Self::Extension => "extension",
            Self::Conformance => "conformance",
            Self::Namespace => "namespace",
            Self::Import => "import",
        }
    }

    /// Slug used in output file names
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Binding => "binding",
            Self::Function => "function",
            Self::Method => "method",
            Self::MethodImpl => "method-impl",
            Self::Subscript => "subscript",
            Self::SubscriptImpl => "subscript-impl",
            Self::Initializer => "init",
            Self::ProductType => "type",
            Self::Trait => "trait",
            Self::TypeAlias => "typealias",
            Self::Operator => "operator",
            Self::AssociatedType => "associatedtype",
            Self::AssociatedValue => "associatedvalue",
            Self::Parameter => "parameter",
            Self::GenericParameter => "generic-parameter",
            Self::Extension => "extension",
            Self::Conformance => "conformance",
            Self::Namespace => "namespace",
            Self::Import => "import",
        }
    }

    /// Returns true if declarations of this kind get their own documentation
    /// record and output page
    #[must_use]
    pub const fn is_documentable(self) -> bool {
        !matches!(
            self,
            Self::Parameter
                | Self::GenericParameter
                | Self::Extension
                | Self::Conformance
                | Self::Namespace
                | Self::Import
        )
    }

    /// Returns true if the members of declarations of this kind belong to the
    /// enclosing declaration or file for documentation purposes
    #[must_use]
    pub const fn is_transparent_container(self) -> bool {
        matches!(self, Self::Extension | Self::Conformance | Self::Namespace)
    }
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// The identity of a declaration of any kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AnyDeclId {
    Binding(BindingDeclId),
    Function(FunctionDeclId),
    Method(MethodDeclId),
    MethodImpl(MethodImplDeclId),
    Subscript(SubscriptDeclId),
    SubscriptImpl(SubscriptImplDeclId),
    Initializer(InitializerDeclId),
    ProductType(ProductTypeDeclId),
    Trait(TraitDeclId),
    TypeAlias(TypeAliasDeclId),
    Operator(OperatorDeclId),
    AssociatedType(AssociatedTypeDeclId),
    AssociatedValue(AssociatedValueDeclId),
    Parameter(ParameterDeclId),
    GenericParameter(GenericParameterDeclId),
    Extension(ExtensionDeclId),
    Conformance(ConformanceDeclId),
    Namespace(NamespaceDeclId),
    Import(ImportDeclId),
}

impl AnyDeclId {
    /// The kind of the identified declaration
    #[must_use]
    pub const fn kind(self) -> DeclKind {
        match self {
            Self::Binding(_) => DeclKind::Binding,
            Self::Function(_) => DeclKind::Function,
            Self::Method(_) => DeclKind::Method,
            Self::MethodImpl(_) => DeclKind::MethodImpl,
            Self::Subscript(_) => DeclKind::Subscript,
            Self::SubscriptImpl(_) => DeclKind::SubscriptImpl,
            Self::Initializer(_) => DeclKind::Initializer,
            Self::ProductType(_) => DeclKind::ProductType,
            Self::Trait(_) => DeclKind::Trait,
            Self::TypeAlias(_) => DeclKind::TypeAlias,
            Self::Operator(_) => DeclKind::Operator,
            Self::AssociatedType(_) => DeclKind::AssociatedType,
            Self::AssociatedValue(_) => DeclKind::AssociatedValue,
            Self::Parameter(_) => DeclKind::Parameter,
            Self::GenericParameter(_) => DeclKind::GenericParameter,
            Self::Extension(_) => DeclKind::Extension,
            Self::Conformance(_) => DeclKind::Conformance,
            Self::Namespace(_) => DeclKind::Namespace,
            Self::Import(_) => DeclKind::Import,
        }
    }

    /// The raw value of the per-kind id
    #[must_use]
    pub const fn raw(self) -> u32 {
        match self {
            Self::Binding(id) => id.raw(),
            Self::Function(id) => id.raw(),
            Self::Method(id) => id.raw(),
            Self::MethodImpl(id) => id.raw(),
            Self::Subscript(id) => id.raw(),
            Self::SubscriptImpl(id) => id.raw(),
            Self::Initializer(id) => id.raw(),
            Self::ProductType(id) => id.raw(),
            Self::Trait(id) => id.raw(),
            Self::TypeAlias(id) => id.raw(),
            Self::Operator(id) => id.raw(),
            Self::AssociatedType(id) => id.raw(),
            Self::AssociatedValue(id) => id.raw(),
            Self::Parameter(id) => id.raw(),
            Self::GenericParameter(id) => id.raw(),
            Self::Extension(id) => id.raw(),
            Self::Conformance(id) => id.raw(),
            Self::Namespace(id) => id.raw(),
            Self::Import(id) => id.raw(),
        }
    }
}

impl fmt::Display for AnyDeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind().slug(), self.raw())
    }
}

/// How a binding introduces its names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingIntroducer {
    Let,
    Var,
    Inout,
    Sink,
}

impl BindingIntroducer {
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Let => "let",
            Self::Var => "var",
            Self::Inout => "inout",
            Self::Sink => "sink",
        }
    }
}

/// The access effect of a method or subscript implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessEffect {
    Let,
    Inout,
    Set,
    Sink,
}

impl AccessEffect {
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Let => "let",
            Self::Inout => "inout",
            Self::Set => "set",
            Self::Sink => "sink",
        }
    }
}

/// Where an operator is written relative to its operands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorNotation {
    Infix,
    Prefix,
    Postfix,
}

impl OperatorNotation {
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Infix => "infix",
            Self::Prefix => "prefix",
            Self::Postfix => "postfix",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BindingDecl {
    pub site: SourceRange,
    pub introducer: BindingIntroducer,
    /// Names introduced by the binding pattern, in order
    pub names: Vec<String>,
    pub annotation: Option<String>,
    pub is_static: bool,
}

#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub site: SourceRange,
    pub identifier: String,
    pub parameters: Vec<ParameterDeclId>,
    pub generic_parameters: Vec<GenericParameterDeclId>,
    pub output: Option<String>,
    pub is_static: bool,
}

#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub site: SourceRange,
    pub identifier: String,
    pub parameters: Vec<ParameterDeclId>,
    pub generic_parameters: Vec<GenericParameterDeclId>,
    pub output: Option<String>,
    pub impls: Vec<MethodImplDeclId>,
}

/// One variant of a method bundle; shares the parameters of its method
#[derive(Debug, Clone)]
pub struct MethodImplDecl {
    pub site: SourceRange,
    pub effect: AccessEffect,
}

#[derive(Debug, Clone)]
pub struct SubscriptDecl {
    pub site: SourceRange,
    /// `None` for the anonymous subscript `subscript(...)`
    pub identifier: Option<String>,
    pub parameters: Vec<ParameterDeclId>,
    pub generic_parameters: Vec<GenericParameterDeclId>,
    pub output: Option<String>,
    pub impls: Vec<SubscriptImplDeclId>,
    pub is_property: bool,
}

/// One variant of a subscript bundle; shares the parameters of its subscript
#[derive(Debug, Clone)]
pub struct SubscriptImplDecl {
    pub site: SourceRange,
    pub effect: AccessEffect,
}

#[derive(Debug, Clone)]
pub struct InitializerDecl {
    pub site: SourceRange,
    pub parameters: Vec<ParameterDeclId>,
    pub generic_parameters: Vec<GenericParameterDeclId>,
    pub is_memberwise: bool,
}

#[derive(Debug, Clone)]
pub struct ProductTypeDecl {
    pub site: SourceRange,
    pub identifier: String,
    pub generic_parameters: Vec<GenericParameterDeclId>,
    pub members: Vec<AnyDeclId>,
}

#[derive(Debug, Clone)]
pub struct TraitDecl {
    pub site: SourceRange,
    pub identifier: String,
    pub members: Vec<AnyDeclId>,
}

#[derive(Debug, Clone)]
pub struct TypeAliasDecl {
    pub site: SourceRange,
    pub identifier: String,
    pub generic_parameters: Vec<GenericParameterDeclId>,
    pub aliased: String,
}

#[derive(Debug, Clone)]
pub struct OperatorDecl {
    pub site: SourceRange,
    pub notation: OperatorNotation,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct AssociatedTypeDecl {
    pub site: SourceRange,
    pub identifier: String,
}

#[derive(Debug, Clone)]
pub struct AssociatedValueDecl {
    pub site: SourceRange,
    pub identifier: String,
}

#[derive(Debug, Clone)]
pub struct ParameterDecl {
    pub site: SourceRange,
    /// Argument label; `None` when the parameter is unlabeled (`_`)
    pub label: Option<String>,
    pub identifier: String,
    pub annotation: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GenericParameterDecl {
    pub site: SourceRange,
    pub identifier: String,
}

#[derive(Debug, Clone)]
pub struct ExtensionDecl {
    pub site: SourceRange,
    pub subject: String,
    pub members: Vec<AnyDeclId>,
}

#[derive(Debug, Clone)]
pub struct ConformanceDecl {
    pub site: SourceRange,
    pub subject: String,
    pub traits: Vec<String>,
    pub members: Vec<AnyDeclId>,
}

#[derive(Debug, Clone)]
pub struct NamespaceDecl {
    pub site: SourceRange,
    pub identifier: String,
    pub members: Vec<AnyDeclId>,
}

#[derive(Debug, Clone)]
pub struct ImportDecl {
    pub site: SourceRange,
    pub identifier: String,
}
