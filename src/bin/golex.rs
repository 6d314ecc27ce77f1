//! golex - dump the token stream or syntax tree of a Go source file.

use std::fs;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as ClapParser;
use gofront::ast::{Block, File, FuncOrMethodDecl, Ident, ParameterDecl, TypeRef};
use gofront::walk::{Visitor, Walk, WalkChildren};
use gofront::{Diag, Error, Lexer, ParseOptions, Parser, TokenKind};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(ClapParser, Debug)]
#[command(name = "golex")]
#[command(about = "Lex or parse a Go source file")]
struct Cli {
    /// Go source file
    file: PathBuf,

    /// Parse the file and print the syntax tree instead of tokens
    #[arg(long)]
    parse: bool,

    /// Parse the file and print node counts
    #[arg(long, conflicts_with = "parse")]
    stats: bool,

    /// Nesting depth limit for types, expressions and blocks
    #[arg(long, default_value_t = ParseOptions::DEFAULT_MAX_NESTING_DEPTH)]
    max_depth: usize,

    /// More logging (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "gofront=debug,golex=debug",
        _ => "gofront=trace,golex=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug, Default)]
struct Stats {
    funcs: usize,
    methods: usize,
    bodies: usize,
    params: usize,
    inferred_params: usize,
    type_refs: usize,
    idents: usize,
}

impl<'ast> Visitor<'ast> for Stats {
    fn visit_func(&mut self, f: &'ast FuncOrMethodDecl) {
        self.funcs += 1;
        if f.is_method() {
            self.methods += 1;
        }
        f.walk_children(self);
    }

    fn visit_block(&mut self, _b: &'ast Block) {
        self.bodies += 1;
    }

    fn visit_param(&mut self, p: &'ast ParameterDecl) {
        self.params += 1;
        if p.type_was_inferred {
            self.inferred_params += 1;
        }
        p.walk_children(self);
    }

    fn visit_type_ref(&mut self, t: &'ast TypeRef) {
        self.type_refs += 1;
        t.walk_children(self);
    }

    fn visit_ident(&mut self, _i: &'ast Ident) {
        self.idents += 1;
    }
}

fn report(diag: &Diag) {
    eprintln!("{}: {:?} error: {}", diag.pos, diag.kind, diag.message);
}

fn dump_tokens(cli: &Cli, filename: &str) -> Result<(), Error> {
    let reader = BufReader::new(open(cli, filename)?);
    let mut lexer = Lexer::new(reader, filename)?;
    let mut count = 0usize;
    loop {
        let tok = lexer.next_token()?;
        println!("{}\t{}\t{:?}", tok.pos, tok.kind, tok.text());
        count += 1;
        if tok.kind == TokenKind::EndOfFile {
            break;
        }
    }
    info!(tokens = count, "lexed");
    Ok(())
}

fn parse(cli: &Cli, filename: &str) -> Result<File, Error> {
    let reader = BufReader::new(open(cli, filename)?);
    let options = ParseOptions::default().with_max_nesting_depth(cli.max_depth);
    let file = Parser::new(Lexer::new(reader, filename)?, options)?.parse_file()?;
    info!(imports = file.imports.len(), decls = file.decls.len(), "parsed");
    Ok(file)
}

fn open(cli: &Cli, filename: &str) -> Result<fs::File, Error> {
    fs::File::open(&cli.file).map_err(|e| {
        Error::Lex(gofront::LexError::new(
            gofront::LexErrorKind::Read(e.to_string()),
            gofront::Position::start(filename),
        ))
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let filename = cli.file.display().to_string();
    let outcome = if cli.parse {
        parse(&cli, &filename).map(|file| println!("{file:#?}"))
    } else if cli.stats {
        parse(&cli, &filename).map(|file| {
            let mut stats = Stats::default();
            file.walk(&mut stats);
            println!("{stats:#?}");
        })
    } else {
        dump_tokens(&cli, &filename)
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e.diag());
            ExitCode::FAILURE
        }
    }
}
