mod common;

use common::shape;
use gofront::ast::{File, ImportName};
use gofront::{parse_reader, parse_source, DiagKind, Error, ParseOptions};

fn assert_parses(src: &str) -> File {
    match parse_source(src, "snippet.go", ParseOptions::default()) {
        Ok(file) => file,
        Err(e) => panic!("expected parse ok, got {:#?}", e.diag()),
    }
}

fn parse_err(src: &str) -> Error {
    match parse_source(src, "snippet.go", ParseOptions::default()) {
        Ok(file) => panic!("expected an error, parsed {file:#?}"),
        Err(e) => e,
    }
}

#[test]
fn package_clause_only() {
    let file = assert_parses("package main\n");
    assert_eq!(file.package.name, "main");
    assert!(file.imports.is_empty());
    assert!(file.decls.is_empty());

    assert_parses("package main");
    assert_parses("// Package p does things.\npackage p // trailing\n");
}

#[test]
fn missing_package_clause() {
    let err = parse_err("func main() {}\n");
    assert_eq!(err.kind(), DiagKind::Syntax);
    assert!(err.to_string().contains("a file must start with a package clause"), "{err}");

    assert!(matches!(parse_err("package 1\n"), Error::Syntax { .. }));
}

#[test]
fn imports() {
    let file = assert_parses(
        r#"
package main

import "fmt"
import (
    . "math"
    _ "net/http/pprof"
    str "strings"; "os"
    `raw/path`
)
"#,
    );
    let paths: Vec<_> = file.imports.iter().map(|i| i.path.value.as_str()).collect();
    assert_eq!(
        paths,
        vec!["fmt", "math", "net/http/pprof", "strings", "os", "raw/path"]
    );
    assert!(file.imports[0].name.is_none());
    assert!(matches!(file.imports[1].name, Some(ImportName::Dot(_))));
    assert!(matches!(file.imports[2].name, Some(ImportName::Blank(_))));
    assert!(matches!(&file.imports[3].name, Some(ImportName::Named(id)) if id.name == "str"));
}

#[test]
fn import_group_closer_on_same_line() {
    let file = assert_parses("package p\nimport (\"a\"; \"b\")\n");
    assert_eq!(file.imports.len(), 2);
}

#[test]
fn import_after_declaration_is_rejected() {
    let err = parse_err("package p\nfunc f()\nimport \"fmt\"\n");
    assert!(err.to_string().contains("imports must appear before"), "{err}");
}

#[test]
fn functions_and_methods() {
    let file = assert_parses(
        r#"
package p

func main() {
    fmt.Println("hi")
}

func (s *Server) Serve(l net.Listener, opts ...Option) error {
    if s == nil { return nil }
    return s.loop(l)
}

func external(x int) int

func pair() (a, b int) { return 1, 2 }
"#,
    );
    let funcs: Vec<_> = file.funcs().collect();
    assert_eq!(funcs.len(), 4);

    assert_eq!(funcs[0].name.name, "main");
    assert!(!funcs[0].is_method());
    assert!(funcs[0].body.is_some());

    assert!(funcs[1].is_method());
    let recv = funcs[1].receiver.as_ref().unwrap();
    assert_eq!(recv.to_string(), "(s *Server)");
    assert_eq!(
        funcs[1].signature.to_string(),
        "(l net.Listener, opts ...Option) error"
    );

    assert!(funcs[2].body.is_none());
    let results = funcs[3].signature.results.as_ref().unwrap();
    assert_eq!(results.to_string(), "(a, b int)");
}

#[test]
fn function_body_keeps_balanced_tokens() {
    let file = assert_parses("package p\nfunc f() { if x { y() } }\n");
    let body = file.funcs().next().unwrap().body.as_ref().unwrap();
    let texts: Vec<_> = body.tokens.iter().map(|t| t.text()).collect();
    assert_eq!(texts, vec!["if", "x", "{", "y", "(", ")", "}"]);
}

#[test]
fn receivers_need_exactly_one_named_entry() {
    let err = parse_err("package p\nfunc () M() {}\n");
    assert!(err.to_string().contains("method has no receiver"), "{err}");

    let err = parse_err("package p\nfunc (a A, b B) M() {}\n");
    assert!(err.to_string().contains("method has multiple receivers"), "{err}");

    let err = parse_err("package p\nfunc (T) M() {}\n");
    assert!(err.to_string().contains("parameter names are required"), "{err}");
}

#[test]
fn top_level_arguments_need_names() {
    let err = parse_err("package p\nfunc f(int, string) {}\n");
    assert!(err.to_string().contains("parameter names are required"), "{err}");
}

#[test]
fn unsupported_declarations_fail_cleanly() {
    for (src, keyword) in [
        ("package p\nconst A = 1\n", "const"),
        ("package p\n\nfunc f() {}\ntype T int\n", "type"),
        ("package p\nvar x int\n", "var"),
    ] {
        match parse_err(src) {
            Error::Unsupported { keyword: k, pos } => {
                assert_eq!(k, keyword);
                assert_eq!(pos.column, 1);
            }
            other => panic!("{src:?}: {other:?}"),
        }
    }
}

#[test]
fn stray_semicolons_between_declarations() {
    let file = assert_parses("package p;;\n;\nfunc a() {};;\n\n;func b() {}\n");
    assert_eq!(file.decls.len(), 2);
}

#[test]
fn unclosed_body() {
    let err = parse_err("package p\nfunc f() {\n\tx := 1\n");
    assert!(err.to_string().contains("is not closed"), "{err}");
}

#[test]
fn syntax_error_reports_what_was_found() {
    let err = parse_err("package p\nfunc 1() {}\n");
    let diag = err.diag();
    assert_eq!(diag.kind, DiagKind::Syntax);
    assert_eq!((diag.pos.line, diag.pos.column), (2, 6));
    assert_eq!(diag.message, "expected function name, found literal 1");

    let err = parse_err("package p\nfunc f(\n");
    assert!(err.to_string().contains("found EOF"), "{err}");
}

#[test]
fn elided_semicolon_at_end_of_input_is_reported_as_eof() {
    let err = parse_err("package p\nfunc f(x");
    assert_eq!(err.diag().message, "expected type, found EOF");

    let err = parse_err("package p\nfunc f(x  ");
    assert_eq!(err.diag().message, "expected type, found EOF");

    let err = parse_err("package p\nfunc f(x\n");
    assert_eq!(err.diag().message, "expected type, found newline");

    let err = parse_err("package p\nfunc f(x /* a\nb */ y)");
    assert_eq!(err.diag().message, "expected type, found newline");
}

#[test]
fn parse_reader_matches_parse_source() {
    let src = "package p\n\nimport \"fmt\"\n\nfunc f(a, b int) (int, error) {\n\treturn a + b, nil\n}\n";
    let from_reader = parse_reader(src.as_bytes(), "snippet.go", ParseOptions::default()).unwrap();
    let from_source = assert_parses(src);
    assert_eq!(from_reader, from_source);
}

#[test]
fn print_then_reparse_is_stable() {
    let src = r#"
package demo

import (
    "fmt"
    io2 "io"
)

func (r *reader) Read(p []byte) (n int, err error) {
    for i := range p { p[i] = 0 }
    return len(p), nil
}

func worker(jobs <-chan Job, results chan<- Result, done chan (<-chan struct{})) {
    select {}
}

func table(m map[string][4]func(int) error, _ [N + 1]*T) interface { io2.Reader; Len() int }

func vararg(format string, a ...interface{})

func tagged(s struct { a, b int "ab"; *T; pkg.U `u` }, n [1 .x + 'c']int) (func() (int), error)
"#;
    let first = assert_parses(src);
    let printed = first.to_string();
    let second = assert_parses(&printed);
    assert_eq!(shape(&first), shape(&second), "{printed}");
    assert_eq!(printed, second.to_string());
}

#[test]
fn reparse_keeps_parameter_resolution() {
    let first = assert_parses("package p\nfunc f(a, b int, c ...string) (x, y float64)\n");
    let second = assert_parses(&first.to_string());
    let lines = shape(&second);
    assert_eq!(shape(&first), lines);
    let params: Vec<_> = lines.iter().filter(|l| l.starts_with("param")).collect();
    assert_eq!(
        params,
        [
            "param named=true inferred=true variadic=false",
            "param named=true inferred=false variadic=false",
            "param named=true inferred=false variadic=true",
            "param named=true inferred=true variadic=false",
            "param named=true inferred=false variadic=false",
        ]
    );
}
