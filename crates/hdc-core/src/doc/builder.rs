//! Validation of extracted comments into declaration documentation records
//!
//! The builder claims the comment keyed at each declaration's start position,
//! checks its special sections against what the declaration kind accepts, and
//! stores the resulting record in the [`DocumentationDatabase`]. Problems are
//! reported as diagnostics; a rejected section is dropped while the rest of
//! the comment is still recorded.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;

use super::comment::{LowLevelCommentInfo, SectionKind, SpecialSection};
use super::extract::DocumentedFile;
use super::records::{
    BindingDocumentation, DocumentationDatabase, FunctionDocumentation, GeneralDescription,
    ProductTypeDocumentation, SubscriptDocumentation, SymbolDocumentation, TraitDocumentation,
    TypeAliasDocumentation,
};
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::markdown::{Block, Document, ListItem};
use crate::program::{
    AnyDeclId, DeclKind, GenericParameterDeclId, ParameterDeclId, Program, TranslationUnitId,
};

/// A `name: description` list entry; the name may be written as code
static RE_NAMED_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^`?([A-Za-z_][A-Za-z0-9_]*)`?[ \t]*:[ \t]*(.*)$").unwrap());

const FILE_LEVEL_SECTIONS: &[SectionKind] = &[SectionKind::SeeAlso];

/// Sections accepted in the documentation of each declaration kind
fn allowed_sections(kind: DeclKind) -> &'static [SectionKind] {
    use SectionKind as S;
    match kind {
        DeclKind::Binding => &[S::Invariants, S::SeeAlso],
        DeclKind::Function | DeclKind::Method | DeclKind::MethodImpl => &[
            S::Parameters,
            S::Generics,
            S::Preconditions,
            S::Postconditions,
            S::Returns,
            S::Throws,
            S::Complexity,
            S::SeeAlso,
        ],
        DeclKind::Subscript | DeclKind::SubscriptImpl => &[
            S::Parameters,
            S::Generics,
            S::Preconditions,
            S::Postconditions,
            S::Yields,
            S::Throws,
            S::Complexity,
            S::SeeAlso,
        ],
        DeclKind::Initializer => &[
            S::Parameters,
            S::Generics,
            S::Preconditions,
            S::Postconditions,
            S::Throws,
            S::Complexity,
            S::SeeAlso,
        ],
        DeclKind::ProductType => &[S::Generics, S::Invariants, S::SeeAlso],
        DeclKind::Trait => &[S::Invariants, S::SeeAlso],
        DeclKind::TypeAlias => &[S::Generics, S::SeeAlso],
        DeclKind::Operator | DeclKind::AssociatedType | DeclKind::AssociatedValue => &[S::SeeAlso],
        DeclKind::Parameter
        | DeclKind::GenericParameter
        | DeclKind::Extension
        | DeclKind::Conformance
        | DeclKind::Namespace
        | DeclKind::Import => &[],
    }
}

/// Returns true if sections of `kind` must follow the canonical order
fn is_function_like(kind: DeclKind) -> bool {
    matches!(
        kind,
        DeclKind::Function
            | DeclKind::Method
            | DeclKind::MethodImpl
            | DeclKind::Subscript
            | DeclKind::SubscriptImpl
            | DeclKind::Initializer
    )
}

/// The validated content of a comment's special sections
#[derive(Debug, Default)]
struct Sections {
    see_also: Vec<ListItem>,
    parameters: BTreeMap<ParameterDeclId, Document>,
    generic_parameters: BTreeMap<GenericParameterDeclId, Document>,
    prose: BTreeMap<SectionKind, Vec<Document>>,
}

impl Sections {
    fn take(&mut self, kind: SectionKind) -> Vec<Document> {
        self.prose.remove(&kind).unwrap_or_default()
    }

    fn function(mut self, common: GeneralDescription) -> FunctionDocumentation {
        FunctionDocumentation {
            preconditions: self.take(SectionKind::Preconditions),
            postconditions: self.take(SectionKind::Postconditions),
            returns: self.take(SectionKind::Returns),
            throws: self.take(SectionKind::Throws),
            complexity: self.take(SectionKind::Complexity),
            parameters: self.parameters,
            generic_parameters: self.generic_parameters,
            common,
        }
    }

    fn subscript(mut self, common: GeneralDescription) -> SubscriptDocumentation {
        SubscriptDocumentation {
            preconditions: self.take(SectionKind::Preconditions),
            postconditions: self.take(SectionKind::Postconditions),
            yields: self.take(SectionKind::Yields),
            throws: self.take(SectionKind::Throws),
            complexity: self.take(SectionKind::Complexity),
            parameters: self.parameters,
            generic_parameters: self.generic_parameters,
            common,
        }
    }
}

/// Builds the documentation database of a program, one source file at a time
#[derive(Debug)]
pub struct DocumentationBuilder<'p> {
    program: &'p Program,
    database: DocumentationDatabase,
    diagnostics: Diagnostics,
}

impl<'p> DocumentationBuilder<'p> {
    #[must_use]
    pub fn new(program: &'p Program) -> Self {
        Self {
            program,
            database: DocumentationDatabase::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Record the documentation of `unit`, returning its file-level description
    pub fn add_file(&mut self, unit: TranslationUnitId, file: DocumentedFile) -> GeneralDescription {
        let DocumentedFile {
            file_level,
            mut symbol_comments,
            diagnostics,
            ..
        } = file;
        self.diagnostics.extend(diagnostics);

        let general = file_level
            .map(|comment| self.file_description(&comment))
            .unwrap_or_default();
        self.database.files.insert(unit, general.clone());

        let mut documented = 0;
        for decl in self.program.decls_in_unit(unit) {
            if !decl.kind().is_documentable() {
                continue;
            }
            let key = self.program.site(decl).start();
            if let Some(comment) = symbol_comments.remove(&key) {
                self.document(decl, &comment);
                documented += 1;
            }
        }
        for comment in symbol_comments.into_values() {
            self.diagnostics
                .report(DiagnosticKind::UnattachedComment, comment.site);
        }
        log::debug!("documented {documented} declarations of {unit}");
        general
    }

    /// Diagnostics reported so far
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    #[must_use]
    pub fn finish(self) -> (DocumentationDatabase, Diagnostics) {
        (self.database, self.diagnostics)
    }

    fn file_description(&mut self, comment: &LowLevelCommentInfo) -> GeneralDescription {
        let sections = self.sections(None, "file-level", FILE_LEVEL_SECTIONS, comment);
        common(comment, sections.see_also)
    }

    fn document(&mut self, decl: AnyDeclId, comment: &LowLevelCommentInfo) {
        let kind = decl.kind();
        let mut sections = self.sections(
            Some(decl),
            kind.display_name(),
            allowed_sections(kind),
            comment,
        );
        let common = common(comment, std::mem::take(&mut sections.see_also));
        let db = &mut self.database;
        match decl {
            AnyDeclId::Binding(id) => {
                let invariants = sections.take(SectionKind::Invariants);
                db.bindings.insert(id, BindingDocumentation { common, invariants });
            }
            AnyDeclId::Function(id) => {
                db.functions.insert(id, sections.function(common));
            }
            AnyDeclId::Method(id) => {
                db.methods.insert(id, sections.function(common));
            }
            AnyDeclId::MethodImpl(id) => {
                db.method_impls.insert(id, sections.function(common));
            }
            AnyDeclId::Initializer(id) => {
                db.initializers.insert(id, sections.function(common));
            }
            AnyDeclId::Subscript(id) => {
                db.subscripts.insert(id, sections.subscript(common));
            }
            AnyDeclId::SubscriptImpl(id) => {
                db.subscript_impls.insert(id, sections.subscript(common));
            }
            AnyDeclId::ProductType(id) => {
                let invariants = sections.take(SectionKind::Invariants);
                db.product_types.insert(
                    id,
                    ProductTypeDocumentation {
                        common,
                        generic_parameters: sections.generic_parameters,
                        invariants,
                    },
                );
            }
            AnyDeclId::Trait(id) => {
                let invariants = sections.take(SectionKind::Invariants);
                db.traits.insert(id, TraitDocumentation { common, invariants });
            }
            AnyDeclId::TypeAlias(id) => {
                db.type_aliases.insert(
                    id,
                    TypeAliasDocumentation {
                        common,
                        generic_parameters: sections.generic_parameters,
                    },
                );
            }
            AnyDeclId::Operator(id) => {
                db.operators.insert(id, SymbolDocumentation { common });
            }
            AnyDeclId::AssociatedType(id) => {
                db.associated_types.insert(id, SymbolDocumentation { common });
            }
            AnyDeclId::AssociatedValue(id) => {
                db.associated_values.insert(id, SymbolDocumentation { common });
            }
            AnyDeclId::Parameter(_)
            | AnyDeclId::GenericParameter(_)
            | AnyDeclId::Extension(_)
            | AnyDeclId::Conformance(_)
            | AnyDeclId::Namespace(_)
            | AnyDeclId::Import(_) => {}
        }
    }

    /// Validate the special sections of `comment`
    fn sections(
        &mut self,
        decl: Option<AnyDeclId>,
        owner: &str,
        allowed: &[SectionKind],
        comment: &LowLevelCommentInfo,
    ) -> Sections {
        let ordered = decl.is_some_and(|d| is_function_like(d.kind()));
        let mut result = Sections::default();
        let mut latest: Option<SectionKind> = None;
        let mut seen = BTreeSet::new();

        for section in &comment.special_sections {
            // Already reported as an empty heading.
            if section.name.is_empty() {
                continue;
            }
            let Some(kind) = SectionKind::from_name(&section.name) else {
                self.diagnostics.report(
                    DiagnosticKind::UnknownSection {
                        name: section.name.clone(),
                    },
                    section.site,
                );
                continue;
            };
            if !allowed.contains(&kind) {
                self.diagnostics.report(
                    DiagnosticKind::SectionNotAllowed {
                        section: kind,
                        owner: owner.to_string(),
                    },
                    section.site,
                );
                continue;
            }
            if ordered {
                match latest {
                    Some(previous) if kind.rank() < previous.rank() => self.diagnostics.report(
                        DiagnosticKind::SectionOutOfOrder {
                            found: kind,
                            expected_before: previous,
                        },
                        section.site,
                    ),
                    _ => latest = Some(kind),
                }
            }

            let unique = matches!(
                kind,
                SectionKind::Parameters | SectionKind::Generics | SectionKind::SeeAlso
            );
            if unique && !seen.insert(kind) {
                self.diagnostics
                    .report(DiagnosticKind::DuplicateSection { section: kind }, section.site);
                continue;
            }

            match kind {
                SectionKind::SeeAlso => match section.blocks.as_slice() {
                    [Block::List(list)] => result.see_also = list.items.clone(),
                    _ => self
                        .diagnostics
                        .report(DiagnosticKind::MalformedSeeAlso, section.site),
                },
                SectionKind::Parameters => {
                    let program = self.program;
                    let candidates: Vec<_> = decl
                        .map(|d| program.parameters(d))
                        .unwrap_or_default()
                        .iter()
                        .map(|&p| (program[p].identifier.as_str(), p))
                        .collect();
                    result.parameters = self.named_entries(kind, section, &candidates);
                }
                SectionKind::Generics => {
                    let program = self.program;
                    let candidates: Vec<_> = decl
                        .map(|d| program.generic_parameters(d))
                        .unwrap_or_default()
                        .iter()
                        .map(|&g| (program[g].identifier.as_str(), g))
                        .collect();
                    result.generic_parameters = self.named_entries(kind, section, &candidates);
                }
                _ => result
                    .prose
                    .entry(kind)
                    .or_default()
                    .extend(prose_entries(&section.blocks)),
            }
        }
        result
    }

    /// Parse a list of `name: description` items naming one of `candidates`
    fn named_entries<I: Copy + Ord>(
        &mut self,
        kind: SectionKind,
        section: &SpecialSection,
        candidates: &[(&str, I)],
    ) -> BTreeMap<I, Document> {
        let mut entries = BTreeMap::new();
        let malformed = || {
            Diagnostic::new(
                DiagnosticKind::MalformedParameterList { section: kind },
                section.site,
            )
        };
        let [Block::List(list)] = section.blocks.as_slice() else {
            self.diagnostics.insert(malformed());
            return entries;
        };

        for item in &list.items {
            let Some(captures) = item.leading_text().and_then(|t| RE_NAMED_ENTRY.captures(t)) else {
                self.diagnostics
                    .insert(malformed().with_hint("write each item as `name: description`"));
                continue;
            };
            let name = &captures[1];
            let Some(&(_, id)) = candidates.iter().find(|(candidate, _)| *candidate == name) else {
                self.diagnostics.report(
                    DiagnosticKind::UnknownParameter {
                        section: kind,
                        name: name.to_string(),
                    },
                    section.site,
                );
                continue;
            };
            if entries.contains_key(&id) {
                self.diagnostics.report(
                    DiagnosticKind::DuplicateParameter {
                        name: name.to_string(),
                    },
                    section.site,
                );
                continue;
            }

            let mut blocks = Vec::with_capacity(item.blocks.len());
            let description = captures[2].trim();
            if !description.is_empty() {
                blocks.push(Block::Paragraph(description.to_string()));
            }
            blocks.extend(item.blocks.iter().skip(1).cloned());
            entries.insert(id, Document::new(blocks));
        }
        entries
    }
}

fn common(comment: &LowLevelCommentInfo, see_also: Vec<ListItem>) -> GeneralDescription {
    let (summary, description) = comment.summary_and_description();
    GeneralDescription {
        summary,
        description,
        see_also,
    }
}

/// Entries of a prose section: one per item if the section is a single list,
/// otherwise the whole section
fn prose_entries(blocks: &[Block]) -> Vec<Document> {
    match blocks {
        [] => Vec::new(),
        [Block::List(list)] => list
            .items
            .iter()
            .map(|item| Document::new(item.blocks.clone()))
            .collect(),
        blocks => vec![Document::new(blocks.to_vec())],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::extract_source;
    use crate::program::{
        BindingDecl, BindingIntroducer, FunctionDecl, GenericParameterDecl, InitializerDecl,
        ParameterDecl, ProductTypeDecl, ProgramBuilder, Scope,
    };
    use pretty_assertions::assert_eq;

    struct Fixture {
        program: Program,
        unit: TranslationUnitId,
    }

    impl Fixture {
        fn document(&self) -> (DocumentationDatabase, Diagnostics, GeneralDescription) {
            let file = self.program.translation_unit(self.unit).file;
            let documented = extract_source(file, self.program.source_file(file)).unwrap();
            let mut builder = DocumentationBuilder::new(&self.program);
            let general = builder.add_file(self.unit, documented);
            let (database, diagnostics) = builder.finish();
            (database, diagnostics, general)
        }
    }

    /// A file declaring `fun add(_ x: Int, _ y: Int)` with generic `T`
    fn function_fixture(comment: &str) -> Fixture {
        let source = format!("{comment}public fun add<T>(_ x: Int, _ y: Int) {{}}\n");
        let mut b = ProgramBuilder::new();
        let module = b.add_module("Main", "/src");
        let unit = b.add_source_file(module, "/src/add.hylo", source).unwrap();
        let site = b.site_of(unit, "public fun add").unwrap();
        let f = b
            .add(
                Scope::TranslationUnit(unit),
                FunctionDecl {
                    site,
                    identifier: "add".into(),
                    parameters: vec![],
                    generic_parameters: vec![],
                    output: None,
                    is_static: false,
                },
            )
            .unwrap();
        let site = b.site_of(unit, "T>").unwrap();
        b.add(
            Scope::Decl(f.into()),
            GenericParameterDecl {
                site,
                identifier: "T".into(),
            },
        )
        .unwrap();
        for name in ["x", "y"] {
            let site = b.site_of(unit, &format!("_ {name}: Int")).unwrap();
            b.add(
                Scope::Decl(f.into()),
                ParameterDecl {
                    site,
                    label: None,
                    identifier: name.into(),
                    annotation: Some("Int".into()),
                },
            )
            .unwrap();
        }
        Fixture {
            program: b.finish(),
            unit,
        }
    }

    fn kinds(diagnostics: &Diagnostics) -> Vec<DiagnosticKind> {
        diagnostics.iter().map(|d| d.kind.clone()).collect()
    }

    fn paragraph(text: &str) -> Document {
        Document::new(vec![Block::Paragraph(text.into())])
    }

    #[test]
    fn test_function_sections() {
        let fixture = function_fixture(
            "/// Adds two numbers.\n\
             /// # Parameters:\n\
             /// - x: The left operand.\n\
             /// - y: The right operand.\n\
             /// # Generics:\n\
             /// - T: Unused.\n\
             /// # Returns: \n\
             /// The sum.\n\
             /// # Complexity:\n\
             /// - O(1)\n\
             /// - No allocation\n\
             /// # See also:\n\
             /// - sub\n",
        );
        let (database, diagnostics, _) = fixture.document();
        assert!(diagnostics.is_empty(), "{diagnostics:?}");

        let (_, doc) = database.functions.iter().next().unwrap();
        assert_eq!(doc.common.summary, Some(Block::Paragraph("Adds two numbers.".into())));
        assert_eq!(doc.common.description, None);
        let parameters: Vec<&Document> = doc.parameters.values().collect();
        assert_eq!(
            parameters,
            vec![&paragraph("The left operand."), &paragraph("The right operand.")]
        );
        assert_eq!(doc.generic_parameters.len(), 1);
        assert_eq!(doc.returns, vec![paragraph("The sum.")]);
        assert_eq!(doc.complexity, vec![paragraph("O(1)"), paragraph("No allocation")]);
        assert_eq!(doc.common.see_also.len(), 1);
    }

    #[test]
    fn test_out_of_order_section_reported_once() {
        let fixture = function_fixture(
            "/// Adds.\n/// # Returns:\n/// The sum.\n/// # Parameters:\n/// - x: Left.\n",
        );
        let (database, diagnostics, _) = fixture.document();
        assert_eq!(
            kinds(&diagnostics),
            vec![DiagnosticKind::SectionOutOfOrder {
                found: SectionKind::Parameters,
                expected_before: SectionKind::Returns,
            }]
        );
        assert!(!diagnostics.contains_error());

        // Parsing continues past the misplaced section.
        let (_, doc) = database.functions.iter().next().unwrap();
        assert_eq!(doc.parameters.len(), 1);
        assert_eq!(doc.returns.len(), 1);
    }

    #[test]
    fn test_summary_and_description_split() {
        let fixture = function_fixture("/// P1\n///\n/// P2\n///\n/// P3\n");
        let (database, _, _) = fixture.document();
        let (_, doc) = database.functions.iter().next().unwrap();
        assert_eq!(doc.common.summary, Some(Block::Paragraph("P1".into())));
        assert_eq!(
            doc.common.description,
            Some(Document::new(vec![
                Block::Paragraph("P2".into()),
                Block::Paragraph("P3".into())
            ]))
        );
    }

    #[test]
    fn test_section_rules() {
        let fixture = function_fixture(
            "/// Adds.\n\
             /// # Invariants:\n\
             /// Nope.\n\
             /// # Examples:\n\
             /// Nope.\n\
             /// # Parameters:\n\
             /// - z: Missing.\n\
             /// - not a pair\n\
             /// # Parameters:\n\
             /// - x: Twice.\n\
             /// # See also:\n\
             /// Not a list.\n",
        );
        let (_, diagnostics, _) = fixture.document();
        assert_eq!(
            kinds(&diagnostics),
            vec![
                DiagnosticKind::SectionNotAllowed {
                    section: SectionKind::Invariants,
                    owner: "function".into(),
                },
                DiagnosticKind::UnknownSection {
                    name: "Examples".into(),
                },
                DiagnosticKind::UnknownParameter {
                    section: SectionKind::Parameters,
                    name: "z".into(),
                },
                DiagnosticKind::MalformedParameterList {
                    section: SectionKind::Parameters,
                },
                DiagnosticKind::DuplicateSection {
                    section: SectionKind::Parameters,
                },
                DiagnosticKind::MalformedSeeAlso,
            ]
        );
    }

    #[test]
    fn test_parameter_documented_twice() {
        let fixture =
            function_fixture("/// Adds.\n/// # Parameters:\n/// - x: One.\n/// - `x`: Two.\n");
        let (_, diagnostics, _) = fixture.document();
        assert_eq!(
            kinds(&diagnostics),
            vec![DiagnosticKind::DuplicateParameter { name: "x".into() }]
        );
    }

    #[test]
    fn test_file_level_and_members() {
        let source = "/// # File-level:\n\
                      /// Geometry.\n\
                      /// # See also:\n\
                      /// - Shapes\n\
                      \n\
                      /// A point.\n\
                      /// # Invariants:\n\
                      /// - x is finite\n\
                      public type Point {\n\
                      \x20 /// Creates the origin.\n\
                      \x20 /// # Returns:\n\
                      \x20 /// Nothing.\n\
                      \x20 public init() {}\n\
                      \x20 /// The abscissa.\n\
                      \x20 public var x: Float\n\
                      }\n";
        let mut b = ProgramBuilder::new();
        let module = b.add_module("Main", "/src");
        let unit = b.add_source_file(module, "/src/point.hylo", source).unwrap();
        let site = b.site_of(unit, "public type Point").unwrap();
        let ty = b
            .add(
                Scope::TranslationUnit(unit),
                ProductTypeDecl {
                    site,
                    identifier: "Point".into(),
                    generic_parameters: vec![],
                    members: vec![],
                },
            )
            .unwrap();
        let site = b.site_of(unit, "public init").unwrap();
        b.add(
            Scope::Decl(ty.into()),
            InitializerDecl {
                site,
                parameters: vec![],
                generic_parameters: vec![],
                is_memberwise: false,
            },
        )
        .unwrap();
        let site = b.site_of(unit, "public var x").unwrap();
        b.add(
            Scope::Decl(ty.into()),
            BindingDecl {
                site,
                introducer: BindingIntroducer::Var,
                names: vec!["x".into()],
                annotation: Some("Float".into()),
                is_static: false,
            },
        )
        .unwrap();
        let fixture = Fixture {
            program: b.finish(),
            unit,
        };

        let (database, diagnostics, general) = fixture.document();
        assert_eq!(general.summary, Some(Block::Paragraph("Geometry.".into())));
        assert_eq!(general.see_also.len(), 1);
        assert_eq!(database.files.get(&unit), Some(&general));

        assert_eq!(
            kinds(&diagnostics),
            vec![DiagnosticKind::SectionNotAllowed {
                section: SectionKind::Returns,
                owner: "initializer".into(),
            }]
        );
        assert_eq!(database.product_types[&ty].invariants, vec![paragraph("x is finite")]);
        assert_eq!(database.initializers.len(), 1);
        assert_eq!(database.bindings.len(), 1);
        assert_eq!(
            database.general(ty.into()).and_then(GeneralDescription::summary_text),
            Some("A point.".into())
        );
    }

    #[test]
    fn test_comment_before_undocumentable_declaration_is_unattached() {
        let source = "/// Extends.\nextension Int {}\n";
        let mut b = ProgramBuilder::new();
        let module = b.add_module("Main", "/src");
        let unit = b.add_source_file(module, "/src/ext.hylo", source).unwrap();
        let site = b.site_of(unit, "extension Int").unwrap();
        b.add(
            Scope::TranslationUnit(unit),
            crate::program::ExtensionDecl {
                site,
                subject: "Int".into(),
                members: vec![],
            },
        )
        .unwrap();
        let fixture = Fixture {
            program: b.finish(),
            unit,
        };

        let (database, diagnostics, _) = fixture.document();
        assert!(database.is_empty());
        assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::UnattachedComment]);
    }
}
