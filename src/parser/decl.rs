use std::io::BufRead;

use tracing::debug;

use super::Parser;
use crate::ast::{Decl, File, FuncOrMethodDecl, Import, ImportName};
use crate::error::{Error, Result};
use crate::token::TokenKind;

impl<R: BufRead> Parser<R> {
    /// `PackageClause ; {ImportDecl ;} {TopLevelDecl ;}` up to end of input.
    pub fn parse_file(&mut self) -> Result<File> {
        self.require(
            "a file must start with a package clause",
            &[TokenKind::PackageKeyword],
        )?;
        let begin = self.tok.pos.clone();
        let package = self.parse_identifier_or("expected package name after 'package'")?;
        self.require(
            "expected ';' after package clause",
            &[TokenKind::Semicolon],
        )?;
        debug!(package = %package, "package clause");

        let mut file = File {
            begin,
            package,
            imports: Vec::new(),
            decls: Vec::new(),
        };
        if self.peek_is(TokenKind::EndOfFile) {
            return Ok(file);
        }

        while self.consume_if(TokenKind::ImportKeyword)? {
            if self.consume_if(TokenKind::LParen)? {
                while !self.peek_is(TokenKind::RParen) {
                    file.imports.push(self.parse_import_spec()?);
                    self.require_statement_terminator("expected ';' or ')' after import spec")?;
                }
                self.require("expected ')' to close import group", &[TokenKind::RParen])?;
            } else {
                file.imports.push(self.parse_import_spec()?);
            }
            self.require(
                "expected ';' after import declaration",
                &[TokenKind::Semicolon],
            )?;
        }

        loop {
            while self.consume_if(TokenKind::Semicolon)? {}
            if self.peek_is(TokenKind::EndOfFile) {
                break;
            }
            file.decls.push(self.parse_top_level_decl()?);
        }

        Ok(file)
    }

    // [ "." | "_" | name ] path
    fn parse_import_spec(&mut self) -> Result<Import> {
        let begin = self.peek.pos.clone();
        let name = if self.consume_if(TokenKind::Dot)? {
            Some(ImportName::Dot(self.tok.pos.clone()))
        } else if self.peek_is(TokenKind::Identifier) {
            let ident = self.parse_identifier()?;
            if ident.is_blank() {
                Some(ImportName::Blank(ident.pos))
            } else {
                Some(ImportName::Named(ident))
            }
        } else {
            None
        };

        self.require(
            "expected import path string",
            &[
                TokenKind::InterpretedStringLiteral,
                TokenKind::RawStringLiteral,
            ],
        )?;
        let path = self.string_lit()?;
        debug!(path = %path.value, "import");

        Ok(Import { begin, name, path })
    }

    /// Dispatches on the leading keyword. `const`, `type` and `var` are rejected without
    /// consuming anything.
    pub fn parse_top_level_decl(&mut self) -> Result<Decl> {
        let keyword = match self.peek.kind {
            TokenKind::FuncKeyword => {
                return Ok(Decl::FuncOrMethod(self.parse_func_decl()?));
            }
            TokenKind::ConstKeyword => "const",
            TokenKind::TypeKeyword => "type",
            TokenKind::VarKeyword => "var",
            TokenKind::ImportKeyword => {
                return Err(Error::syntax(
                    &self.peek.pos,
                    "imports must appear before other declarations",
                ))
            }
            _ => return Err(self.unexpected("expected top-level declaration")),
        };
        Err(Error::Unsupported {
            pos: self.peek.pos.clone(),
            keyword,
        })
    }

    /// `func [Receiver] Name Signature (Block | ;)`.
    pub fn parse_func_decl(&mut self) -> Result<FuncOrMethodDecl> {
        self.require("expected 'func'", &[TokenKind::FuncKeyword])?;
        let begin = self.tok.pos.clone();

        let receiver = if self.peek_is(TokenKind::LParen) {
            let list = self.parse_parameter_list(true)?;
            match list.len() {
                1 => {}
                0 => return Err(Error::syntax(&list.begin, "method has no receiver")),
                _ => return Err(Error::syntax(&list.begin, "method has multiple receivers")),
            }
            Some(list)
        } else {
            None
        };

        let name = self.parse_identifier_or("expected function name")?;
        let signature = self.parse_signature(true)?;

        let body = if self.peek_is(TokenKind::LBrace) {
            let block = self.parse_block()?;
            self.require("expected ';' after function body", &[TokenKind::Semicolon])?;
            Some(block)
        } else {
            self.require(
                "expected function body or ';' after signature",
                &[TokenKind::Semicolon],
            )?;
            None
        };

        debug!(
            name = %name,
            method = receiver.is_some(),
            has_body = body.is_some(),
            line = begin.line,
            "function declaration"
        );
        Ok(FuncOrMethodDecl {
            begin,
            receiver,
            name,
            signature,
            body,
        })
    }
}
