use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gofront::{parse_source, Lexer, ParseOptions, TokenKind};
use std::hint::black_box as bb;

// =============================================================================
// Test Corpus - Different sizes of Go code
// =============================================================================

const SMALL_HELLO_WORLD: &str = r#"
package main

func main() {
    println("Hello, World!")
}
"#;

const MEDIUM_METHODS: &str = r#"
package geometry

import "math"

func (p Point) Abs() float64 {
    return math.Sqrt(p.X*p.X + p.Y*p.Y)
}

func (p *Point) Scale(f float64) {
    p.X = p.X * f
    p.Y = p.Y * f
}

func (r Rectangle) Area() float64 {
    return r.Width * r.Height
}

func (r *Rectangle) Grow(delta float64) {
    r.Width += delta
    r.Height += delta
}
"#;

const LARGE_SIGNATURES: &str = r#"
package compiler

import (
    "fmt"
    "io"
    str "strings"
)

// NewLexer builds a lexer over source.
func NewLexer(source string, opts ...Option) *Lexer {
    return &Lexer{input: []byte(source), line: 1}
}

func (l *Lexer) NextToken() (tok Token, err error) {
    if l.pos >= len(l.input) {
        return Token{Kind: TokEOF, Line: l.line}, nil
    }
    ch := l.input[l.pos]
    switch {
    case isLetter(ch):
        return l.readIdent(), nil
    case isDigit(ch):
        return l.readNumber(), nil
    }
    l.pos++
    return Token{Kind: TokIdent, Text: string(ch), Line: l.line}, nil
}

func (l *Lexer) run(out chan<- Token, done <-chan struct{}, errs chan (<-chan error)) {
    for {
        select {
        case <-done:
            return
        default:
        }
    }
}

func Pipe(r io.Reader, w io.Writer, buf [4 * 1024]byte, hooks map[string][]func(int, string) error) (n int64, err error)

func Visit(nodes []interface { Pos() int; End() int; fmt.Stringer }, fn func(a, b int) bool) bool {
    /* block
       comment */
    return str.HasPrefix("x", `raw
string`) && 0x1F == 31 && 1.5e3 > 0 && 'a' != '\n'
}

func isLetter(ch byte) bool {
    return (ch >= 'a' && ch <= 'z') || (ch >= 'A' && ch <= 'Z') || ch == '_'
}

func isDigit(ch byte) bool {
    return ch >= '0' && ch <= '9'
}
"#;

const CORPORA: [(&str, &str); 3] = [
    ("small", SMALL_HELLO_WORLD),
    ("medium", MEDIUM_METHODS),
    ("large", LARGE_SIGNATURES),
];

// =============================================================================
// Helpers: build inputs outside measurement
// =============================================================================

fn token_count(input: &str) -> usize {
    Lexer::from_source(input, "bench.go")
        .map(|lx| lx.filter(|t| t.is_ok()).count())
        .unwrap_or(0)
}

fn make_file(funcs: usize) -> String {
    let mut out = String::from("package gen\n\nimport \"fmt\"\n");
    for i in 0..funcs {
        out.push_str(&format!(
            "\nfunc (s *Svc{i}) Handle{i}(ctx Context, a, b int, opts ...string) (map[string][]int, error) {{\n\tfmt.Println(a + b * {i})\n\treturn nil, nil\n}}\n"
        ));
    }
    out
}

// =============================================================================
// Benchmark 1: Lexer Performance
//  - iterate_only: decoding + tokenization + semicolon insertion, no Vec
//  - collect: the same plus collecting tokens
// =============================================================================

fn bench_lexer(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");

    for (name, input) in CORPORA {
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("iterate_only_bytes", name),
            &input,
            |b, &input| {
                b.iter(|| {
                    let mut acc: u64 = 0;
                    let mut lx = Lexer::from_source(bb(input), "bench.go").unwrap();
                    loop {
                        let tok = lx.next_token().unwrap();
                        acc = acc.wrapping_add(u64::from(tok.span.end));
                        if tok.kind == TokenKind::EndOfFile {
                            break;
                        }
                    }
                    bb(acc);
                });
            },
        );

        let tok_count = token_count(input);
        group.throughput(Throughput::Elements(tok_count as u64));
        group.bench_with_input(
            BenchmarkId::new("collect_tokens", name),
            &input,
            |b, &input| {
                b.iter(|| {
                    let v = gofront::tokenize(bb(input), "bench.go").unwrap();
                    bb(v.len());
                    bb(v);
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// Benchmark 2: Parser Performance (lexing included)
// =============================================================================

fn bench_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");

    for (name, input) in CORPORA {
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse_file", name), &input, |b, &input| {
            b.iter(|| {
                let file = parse_source(bb(input), "bench.go", ParseOptions::default()).unwrap();
                bb(file);
            });
        });
    }

    group.finish();
}

// =============================================================================
// Benchmark 3: Scalability in the number of declarations
// =============================================================================

fn bench_scalability(c: &mut Criterion) {
    let mut group = c.benchmark_group("scalability");

    for &n in &[10usize, 100, 1000] {
        let src = make_file(n);
        group.throughput(Throughput::Bytes(src.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse_funcs", n), &src, |b, src| {
            b.iter(|| {
                let file = parse_source(bb(src), "bench.go", ParseOptions::default()).unwrap();
                bb(file.decls.len());
            });
        });
    }

    group.finish();
}

// =============================================================================
// Criterion registration
// =============================================================================

criterion_group!(benches, bench_lexer, bench_parser, bench_scalability);
criterion_main!(benches);
