mod common;

use common::shape;
use gofront::ast::{ParameterDecl, ParameterDeclList};
use gofront::{Error, ParseOptions, Parser};

fn params(src: &str, names_required: bool) -> Result<ParameterDeclList, Error> {
    Parser::from_source(src, "params.go", ParseOptions::default())?
        .parse_parameter_list(names_required)
}

fn summary(list: &ParameterDeclList) -> Vec<(Option<String>, String, bool, bool)> {
    list.decls
        .iter()
        .map(|p: &ParameterDecl| {
            (
                p.name.as_ref().map(|n| n.name.clone()),
                p.ty.to_string(),
                p.type_was_inferred,
                p.variadic,
            )
        })
        .collect()
}

fn named(name: &str, ty: &str, inferred: bool) -> (Option<String>, String, bool, bool) {
    (Some(name.to_owned()), ty.to_owned(), inferred, false)
}

fn unnamed(ty: &str) -> (Option<String>, String, bool, bool) {
    (None, ty.to_owned(), false, false)
}

#[test]
fn names_propagate_right_to_left() {
    let list = params("(a, b int, c string)", false).unwrap();
    assert_eq!(
        summary(&list),
        vec![
            named("a", "int", true),
            named("b", "int", false),
            named("c", "string", false)
        ]
    );
    assert!(list.is_named());
}

#[test]
fn unnamed_types() {
    let list = params("(int, string)", false).unwrap();
    assert_eq!(summary(&list), vec![unnamed("int"), unnamed("string")]);
    assert!(!list.is_named());

    let list = params("(int)", false).unwrap();
    assert_eq!(summary(&list), vec![unnamed("int")]);

    let list = params("(io.Reader, []byte, *T, func())", false).unwrap();
    assert_eq!(list.len(), 4);
    assert!(list.decls.iter().all(|p| p.name.is_none()));
}

#[test]
fn qualified_types_after_names() {
    let list = params("(r io.Reader, w, x pkg.T)", false).unwrap();
    assert_eq!(
        summary(&list),
        vec![
            named("r", "io.Reader", false),
            named("w", "pkg.T", true),
            named("x", "pkg.T", false)
        ]
    );
}

#[test]
fn empty_and_trailing_comma() {
    assert!(params("()", true).unwrap().is_empty());
    let list = params("(a int,\n\tb string,\n)", false).unwrap();
    assert_eq!(
        summary(&list),
        vec![named("a", "int", false), named("b", "string", false)]
    );
}

#[test]
fn variadic_parameters() {
    let list = params("(format string, args ...any)", true).unwrap();
    assert_eq!(
        summary(&list),
        vec![
            named("format", "string", false),
            (Some("args".into()), "any".into(), false, true)
        ]
    );
    assert_eq!(list.to_string(), "(format string, args ...any)");

    let list = params("(int, ...string)", false).unwrap();
    assert_eq!(
        summary(&list),
        vec![unnamed("int"), (None, "string".into(), false, true)]
    );
}

#[test]
fn only_the_final_parameter_may_be_variadic() {
    let err = params("(a ...int, b string)", false).unwrap_err();
    assert!(err.to_string().contains("only the final parameter may be variadic"), "{err}");
}

#[test]
fn mixed_named_and_unnamed_is_rejected() {
    for src in ["(a int, []string)", "(a int, b)", "(a, *T, b int)"] {
        let err = params(src, false).unwrap_err();
        assert!(
            err.to_string().contains("mixed named and unnamed parameters"),
            "{src}: {err}"
        );
        assert!(!err.is_internal());
    }
}

#[test]
fn names_required_context() {
    let err = params("(int, string)", true).unwrap_err();
    assert!(err.to_string().contains("parameter names are required"), "{err}");
    assert!(params("(a, b int)", true).is_ok());
}

#[test]
fn parenthesized_identifier_is_a_type_not_a_name() {
    let err = params("((a) int)", false).unwrap_err();
    assert!(matches!(err, Error::Syntax { .. }), "{err:?}");
}

#[test]
fn printing_reparses_to_the_same_list() {
    for src in [
        "(a, b int, c string)",
        "(int, string)",
        "(ch <-chan int, done chan struct{})",
        "(f func(int) (int, error), xs ...[]byte)",
    ] {
        let first = params(src, false).unwrap();
        let printed = first.to_string();
        let second = params(&printed, false).unwrap();
        assert_eq!(summary(&first), summary(&second), "{src} -> {printed}");
        assert_eq!(shape(&first), shape(&second), "{src} -> {printed}");
        assert_eq!(printed, second.to_string());
    }
}

#[test]
fn signatures() {
    let mut p = Parser::from_source(
        "(x int) (n int, err error)",
        "params.go",
        ParseOptions::default(),
    )
    .unwrap();
    let sig = p.parse_signature(true).unwrap();
    assert_eq!(sig.args.len(), 1);
    let results = sig.results.expect("results");
    assert_eq!(results.len(), 2);
    assert!(results.is_named());

    let mut p = Parser::from_source("() error {", "params.go", ParseOptions::default()).unwrap();
    let sig = p.parse_signature(true).unwrap();
    assert_eq!(sig.to_string(), "() error");
    assert_eq!(p.peek().kind, gofront::TokenKind::LBrace);

    // Result lists never require names, even when arguments do.
    let mut p =
        Parser::from_source("(x int) (int, error)", "params.go", ParseOptions::default()).unwrap();
    let sig = p.parse_signature(true).unwrap();
    let results = sig.results.expect("results");
    assert_eq!(results.len(), 2);
    assert!(!results.is_named());
}
