use std::env;
use std::fs::File;
use std::io::BufReader;

use gofront::{parse_reader, ParseOptions};

fn main() {
    let path = env::args().nth(1).unwrap_or_else(|| {
        eprintln!("usage: cargo run --example parse -- <file.go>");
        std::process::exit(2);
    });

    let reader = match File::open(&path) {
        Ok(f) => BufReader::new(f),
        Err(e) => {
            eprintln!("{path}: {e}");
            std::process::exit(2);
        }
    };

    match parse_reader(reader, path.as_str(), ParseOptions::default()) {
        Ok(file) => {
            println!("{file:#?}");
            println!("{file}");
        }
        Err(e) => {
            let d = e.diag();
            eprintln!("parse failed");
            eprintln!("{:?} {}: {}", d.kind, d.pos, d.message);
            std::process::exit(1);
        }
    }
}
