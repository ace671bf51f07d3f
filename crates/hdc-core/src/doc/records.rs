//! Types for representing validated declaration documentation

use std::collections::BTreeMap;

use crate::markdown::{Block, Document, ListItem};
use crate::program::{
    AnyDeclId, AssociatedTypeDeclId, AssociatedValueDeclId, BindingDeclId, FunctionDeclId,
    GenericParameterDeclId, InitializerDeclId, MethodDeclId, MethodImplDeclId, OperatorDeclId,
    ParameterDeclId, ProductTypeDeclId, SubscriptDeclId, SubscriptImplDeclId, TraitDeclId,
    TranslationUnitId, TypeAliasDeclId,
};

/// Documentation shared by every record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneralDescription {
    /// First block of the leading content
    pub summary: Option<Block>,
    /// Remaining blocks of the leading content
    pub description: Option<Document>,
    /// Items of the `See also` list
    pub see_also: Vec<ListItem>,
}

impl GeneralDescription {
    /// Returns true if nothing was documented
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.summary.is_none() && self.description.is_none() && self.see_also.is_empty()
    }

    /// Summary as plain text
    #[must_use]
    pub fn summary_text(&self) -> Option<String> {
        self.summary.as_ref().map(Block::plain_text)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingDocumentation {
    pub common: GeneralDescription,
    pub invariants: Vec<Document>,
}

/// Documentation of functions and every other callable with a return value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionDocumentation {
    pub common: GeneralDescription,
    pub parameters: BTreeMap<ParameterDeclId, Document>,
    pub generic_parameters: BTreeMap<GenericParameterDeclId, Document>,
    pub preconditions: Vec<Document>,
    pub postconditions: Vec<Document>,
    pub returns: Vec<Document>,
    pub throws: Vec<Document>,
    pub complexity: Vec<Document>,
}

pub type MethodDocumentation = FunctionDocumentation;
pub type MethodImplDocumentation = FunctionDocumentation;
/// Initializers never carry `returns`
pub type InitializerDocumentation = FunctionDocumentation;

/// Documentation of subscripts, which yield instead of returning
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptDocumentation {
    pub common: GeneralDescription,
    pub parameters: BTreeMap<ParameterDeclId, Document>,
    pub generic_parameters: BTreeMap<GenericParameterDeclId, Document>,
    pub preconditions: Vec<Document>,
    pub postconditions: Vec<Document>,
    pub yields: Vec<Document>,
    pub throws: Vec<Document>,
    pub complexity: Vec<Document>,
}

pub type SubscriptImplDocumentation = SubscriptDocumentation;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductTypeDocumentation {
    pub common: GeneralDescription,
    pub generic_parameters: BTreeMap<GenericParameterDeclId, Document>,
    pub invariants: Vec<Document>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraitDocumentation {
    pub common: GeneralDescription,
    pub invariants: Vec<Document>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeAliasDocumentation {
    pub common: GeneralDescription,
    pub generic_parameters: BTreeMap<GenericParameterDeclId, Document>,
}

/// Documentation with no kind-specific sections
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolDocumentation {
    pub common: GeneralDescription,
}

pub type OperatorDocumentation = SymbolDocumentation;
pub type AssociatedTypeDocumentation = SymbolDocumentation;
pub type AssociatedValueDocumentation = SymbolDocumentation;

/// Every documentation record of a program, one store per declaration kind
#[derive(Debug, Clone, Default)]
pub struct DocumentationDatabase {
    pub bindings: BTreeMap<BindingDeclId, BindingDocumentation>,
    pub functions: BTreeMap<FunctionDeclId, FunctionDocumentation>,
    pub methods: BTreeMap<MethodDeclId, MethodDocumentation>,
    pub method_impls: BTreeMap<MethodImplDeclId, MethodImplDocumentation>,
    pub subscripts: BTreeMap<SubscriptDeclId, SubscriptDocumentation>,
    pub subscript_impls: BTreeMap<SubscriptImplDeclId, SubscriptImplDocumentation>,
    pub initializers: BTreeMap<InitializerDeclId, InitializerDocumentation>,
    pub product_types: BTreeMap<ProductTypeDeclId, ProductTypeDocumentation>,
    pub traits: BTreeMap<TraitDeclId, TraitDocumentation>,
    pub type_aliases: BTreeMap<TypeAliasDeclId, TypeAliasDocumentation>,
    pub operators: BTreeMap<OperatorDeclId, OperatorDocumentation>,
    pub associated_types: BTreeMap<AssociatedTypeDeclId, AssociatedTypeDocumentation>,
    pub associated_values: BTreeMap<AssociatedValueDeclId, AssociatedValueDocumentation>,
    /// File-level descriptions
    pub files: BTreeMap<TranslationUnitId, GeneralDescription>,
}

impl DocumentationDatabase {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The common part of the record documenting `decl`, if any
    #[must_use]
    pub fn general(&self, decl: AnyDeclId) -> Option<&GeneralDescription> {
        match decl {
            AnyDeclId::Binding(id) => self.bindings.get(&id).map(|d| &d.common),
            AnyDeclId::Function(id) => self.functions.get(&id).map(|d| &d.common),
            AnyDeclId::Method(id) => self.methods.get(&id).map(|d| &d.common),
            AnyDeclId::MethodImpl(id) => self.method_impls.get(&id).map(|d| &d.common),
            AnyDeclId::Subscript(id) => self.subscripts.get(&id).map(|d| &d.common),
            AnyDeclId::SubscriptImpl(id) => self.subscript_impls.get(&id).map(|d| &d.common),
            AnyDeclId::Initializer(id) => self.initializers.get(&id).map(|d| &d.common),
            AnyDeclId::ProductType(id) => self.product_types.get(&id).map(|d| &d.common),
            AnyDeclId::Trait(id) => self.traits.get(&id).map(|d| &d.common),
            AnyDeclId::TypeAlias(id) => self.type_aliases.get(&id).map(|d| &d.common),
            AnyDeclId::Operator(id) => self.operators.get(&id).map(|d| &d.common),
            AnyDeclId::AssociatedType(id) => self.associated_types.get(&id).map(|d| &d.common),
            AnyDeclId::AssociatedValue(id) => self.associated_values.get(&id).map(|d| &d.common),
            AnyDeclId::Parameter(_)
            | AnyDeclId::GenericParameter(_)
            | AnyDeclId::Extension(_)
            | AnyDeclId::Conformance(_)
            | AnyDeclId::Namespace(_)
            | AnyDeclId::Import(_) => None,
        }
    }

    /// Number of declaration records
    #[must_use]
    pub fn len(&self) -> usize {
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
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
