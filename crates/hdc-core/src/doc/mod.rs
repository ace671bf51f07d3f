//! Documentation comment extraction and validation
//!
//! This module provides:
//! - Extraction of `///` comment runs from source text and attachment to
//!   the declaration or file they document
//! - Structural parsing of each comment into leading content and sections
//! - Per-kind validation into documentation records
//! - Cross-linking of in-comment references

mod builder;
mod comment;
mod crosslink;
mod extract;
mod records;

pub use builder::DocumentationBuilder;
pub use comment::{CommentType, LowLevelCommentInfo, SectionKind, SpecialSection};
pub use crosslink::{CrossLinkConfig, CrossLinker};
pub use extract::{extract, extract_source, DocumentedFile};
pub use records::{
    AssociatedTypeDocumentation, AssociatedValueDocumentation, BindingDocumentation,
    DocumentationDatabase, FunctionDocumentation, GeneralDescription, InitializerDocumentation,
    MethodDocumentation, MethodImplDocumentation, OperatorDocumentation,
    ProductTypeDocumentation, SubscriptDocumentation, SubscriptImplDocumentation,
    SymbolDocumentation, TraitDocumentation, TypeAliasDocumentation,
};
