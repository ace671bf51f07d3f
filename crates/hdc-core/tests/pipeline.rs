//! Integration tests for the documentation pipeline

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use hdc_core::asset::AnyAssetId;
use hdc_core::doc::CrossLinker;
use hdc_core::program::{
    AccessEffect, FunctionDecl, MethodDecl, MethodImplDecl, ParameterDecl, Program,
    ProgramBuilder, ProductTypeDecl, Scope,
};
use hdc_core::resolve::Target;
use hdc_core::{document, DiagnosticKind, DocConfig};

const VECTOR: &str = "\
/// # File-level:
/// Growable arrays.

/// A resizable array.
public type Vector {
  /// Appends an element.
  /// # Parameters:
  /// - x: The element.
  public fun push(_ x: Int) {
    /// Appends in place.
    inout {}
  }
}
";

fn write(root: &Path, relative: &str, text: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, text).unwrap();
}

/// A module `collections` holding `src/vector.hylo`, two articles and an image
fn collections(base: &Path) -> Program {
    let root = base.join("collections");
    write(&root, "index.hylodoc", "# Collections\n\nGrowable containers.\n");
    write(&root, "guide.hylodoc", "# Getting started\n\nRead `Vector` first.\n");
    write(&root, "logo.png", "png");
    write(&root, "src/vector.hylo", VECTOR);

    let mut b = ProgramBuilder::new();
    let module = b.add_module("Collections", &root);
    let unit = b
        .add_source_file(module, root.join("src/vector.hylo"), VECTOR)
        .unwrap();

    let site = b.site_of(unit, "public type Vector").unwrap();
    let vector = b
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
    let push = b
        .add(
            Scope::Decl(vector.into()),
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
    let site = b.site_of(unit, "_ x: Int").unwrap();
    b.add(
        Scope::Decl(push.into()),
        ParameterDecl {
            site,
            label: None,
            identifier: "x".into(),
            annotation: Some("Int".into()),
        },
    )
    .unwrap();
    let site = b.site_of(unit, "inout {}").unwrap();
    b.add(
        Scope::Decl(push.into()),
        MethodImplDecl {
            site,
            effect: AccessEffect::Inout,
        },
    )
    .unwrap();
    b.finish()
}

fn path_of(output: &hdc_core::DocumentationOutput, target: Target) -> String {
    output.resolver.path(target).unwrap().to_string()
}

#[test]
fn test_documentation_model_of_a_module() {
    let temp = TempDir::new().unwrap();
    let program = collections(temp.path());
    let output = document(&program, &DocConfig::default()).unwrap();

    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    assert_eq!(output.documentation.product_types.len(), 1);
    assert_eq!(output.documentation.methods.len(), 1);
    assert_eq!(output.documentation.method_impls.len(), 1);
    let (_, push) = output.documentation.methods.iter().next().unwrap();
    assert_eq!(push.parameters.len(), 1);

    let (_, source) = output.assets.source_files().next().unwrap();
    assert_eq!(
        source.general_description.summary_text().as_deref(),
        Some("Growable arrays.")
    );

    let root = output.root_target(0).unwrap();
    let folder = output.resolver.get(root).unwrap();
    assert_eq!(folder.simple_name, "Collections");
    assert_eq!(folder.meta_description, "Growable containers.");
    assert_eq!(path_of(&output, root), "collections/index.html");
}

#[test]
fn test_output_paths_follow_nesting() {
    let temp = TempDir::new().unwrap();
    let program = collections(temp.path());
    let output = document(&program, &DocConfig::default()).unwrap();

    let mut paths: Vec<String> = output
        .resolver
        .iter()
        .map(|(_, resolved)| resolved.path.to_string())
        .collect();
    paths.sort();
    assert_eq!(
        paths,
        vec![
            "collections/guide.html",
            "collections/index.html",
            "collections/src/index.html",
            "collections/src/vector.hylo/index.html",
            "collections/src/vector.hylo/type-Vector-0/index.html",
            "collections/src/vector.hylo/type-Vector-0/method-push-0/index.html",
            "collections/src/vector.hylo/type-Vector-0/method-push-0/method-impl-inout-0.html",
        ]
    );

    let (_, logo) = output.resolver.other_files().next().unwrap();
    assert_eq!(logo.destination.to_string(), "collections/logo.png");
}

#[test]
fn test_references_between_pages() {
    let temp = TempDir::new().unwrap();
    let program = collections(temp.path());
    let output = document(&program, &DocConfig::default()).unwrap();

    let (guide_id, guide) = output
        .assets
        .articles()
        .find(|(_, article)| article.title.as_deref() == Some("Getting started"))
        .unwrap();
    assert_eq!(guide.location.file_name().unwrap(), "guide.hylodoc");
    let guide = Target::Asset(AnyAssetId::from(guide_id));

    let (impl_id, _) = output.documentation.method_impls.iter().next().unwrap();
    let implementation = Target::Decl((*impl_id).into());
    assert_eq!(
        output.resolver.refer(implementation, guide).unwrap().to_string(),
        "../../../../guide.html"
    );
    assert_eq!(
        output.resolver.get(implementation).unwrap().simple_name,
        "inout"
    );

    let (_, source) = output.assets.source_files().next().unwrap();
    let linker = CrossLinker::new(&program, &output.resolver);
    let text = linker.link_text(
        guide,
        Scope::TranslationUnit(source.translation_unit),
        "Read `Vector` first.",
    );
    assert_eq!(text, "Read [`Vector`](src/vector.hylo/type-Vector-0/index.html) first.");
}

#[test]
fn test_every_module_root_is_resolved() {
    let temp = TempDir::new().unwrap();
    let first = temp.path().join("first");
    let second = temp.path().join("second");
    write(&first, "a.hylo", "fun a() {}");
    write(&second, "b.hylo", "fun b() {}");

    let mut b = ProgramBuilder::new();
    let modules = [
        ("First", &first, "a.hylo", "fun a() {}"),
        ("Second", &second, "b.hylo", "fun b() {}"),
    ];
    for (name, root, file, text) in modules {
        let module = b.add_module(name, root);
        let unit = b.add_source_file(module, root.join(file), text).unwrap();
        let site = b.site_of(unit, text).unwrap();
        b.add(
            Scope::TranslationUnit(unit),
            FunctionDecl {
                site,
                identifier: text[4..5].to_string(),
                parameters: vec![],
                generic_parameters: vec![],
                output: None,
                is_static: false,
            },
        )
        .unwrap();
    }
    let program = b.finish();
    let output = document(&program, &DocConfig::default()).unwrap();

    assert_eq!(output.roots.len(), 2);
    assert_eq!(output.resolver.roots().len(), 2);
    let first = output.root_target(0).unwrap();
    let second = output.root_target(1).unwrap();
    assert_eq!(
        output.resolver.refer(first, second).unwrap().to_string(),
        "../second/index.html"
    );
}

#[test]
fn test_validation_problems_do_not_abort() {
    let temp = TempDir::new().unwrap();
    let text = "/// Adds.\n/// # Remarks:\n/// Unknown.\nfun add() {}";
    write(temp.path(), "add.hylo", text);

    let mut b = ProgramBuilder::new();
    let module = b.add_module("Add", temp.path());
    let unit = b
        .add_source_file(module, temp.path().join("add.hylo"), text)
        .unwrap();
    let site = b.site_of(unit, "fun add() {}").unwrap();
    b.add(
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
    let program = b.finish();
    let output = document(&program, &DocConfig::default()).unwrap();

    assert!(output.has_errors());
    let kinds: Vec<_> = output.diagnostics.iter().map(|d| d.kind.clone()).collect();
    assert_eq!(
        kinds,
        vec![DiagnosticKind::UnknownSection {
            name: "Remarks".into()
        }]
    );
    // The declaration is still documented and resolved.
    assert_eq!(output.documentation.functions.len(), 1);
    assert_eq!(output.resolver.len(), 3);
}
