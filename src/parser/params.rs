use std::io::BufRead;

use tracing::debug;

use super::Parser;
use crate::ast::{FunctionSignature, Ident, Node, ParameterDecl, ParameterDeclList, TypeRef};
use crate::error::{Error, Result};
use crate::token::TokenKind;

/// One parameter-list entry before names are resolved.
struct Entry {
    name: Option<Ident>,
    variadic: bool,
    ty: TypeRef,
    // Parsed as a lone identifier: either a type name or a parameter name.
    bare: bool,
}

fn extract_ident(ty: &TypeRef) -> Result<Ident> {
    ty.as_bare_ident()
        .cloned()
        .ok_or_else(|| Error::internal(ty.begin(), "parameter entry is not a bare identifier"))
}

// Right to left: every bare entry becomes a name and takes the nearest explicit type to its
// right. Entries keep `bare == true` so the caller can flag their type as inferred.
fn propagate_types(entries: &mut [Entry]) -> Result<()> {
    let mut carried: Option<TypeRef> = None;
    for entry in entries.iter_mut().rev() {
        if entry.name.is_some() {
            carried = Some(entry.ty.clone());
            continue;
        }
        let ty = match (&carried, entry.bare) {
            (Some(ty), true) => ty.clone(),
            _ => {
                return Err(Error::syntax(
                    entry.ty.begin(),
                    "mixed named and unnamed parameters",
                ))
            }
        };
        let name = extract_ident(&entry.ty)?;
        debug!(
            name = %name,
            line = name.pos.line,
            "parameter type taken from a later entry"
        );
        entry.name = Some(name);
        entry.ty = ty;
    }
    Ok(())
}

impl<R: BufRead> Parser<R> {
    /// `Parameters [Result]`.
    ///
    /// `names_required` applies to the arguments only; results may always be unnamed. A result
    /// without parentheses is a single unnamed type.
    pub fn parse_signature(&mut self, names_required: bool) -> Result<FunctionSignature> {
        self.nested(|p| p.signature_inner(names_required))
    }

    fn signature_inner(&mut self, names_required: bool) -> Result<FunctionSignature> {
        let args = self.parse_parameter_list(names_required)?;
        let results = if self.peek_is(TokenKind::LParen) {
            Some(self.parse_parameter_list(false)?)
        } else {
            self.maybe_parse_type_ref()?.map(|ty| ParameterDeclList {
                begin: ty.begin().clone(),
                end: ty.end(),
                decls: vec![ParameterDecl {
                    name: None,
                    type_was_inferred: false,
                    variadic: false,
                    ty,
                }],
            })
        };
        Ok(FunctionSignature { args, results })
    }

    /// `( [entry {, entry} [,]] )`.
    ///
    /// Entries are either all unnamed types or all named. In the named form a run of bare
    /// identifiers takes the type of the next entry to its right, as `a` in `(a, b int)`.
    pub fn parse_parameter_list(&mut self, names_required: bool) -> Result<ParameterDeclList> {
        self.nested(|p| p.parameter_list_inner(names_required))
    }

    fn parameter_list_inner(&mut self, names_required: bool) -> Result<ParameterDeclList> {
        self.require("expected '(' to start parameter list", &[TokenKind::LParen])?;
        let begin = self.tok.pos.clone();

        let mut entries: Vec<Entry> = Vec::new();
        let mut has_named = false;
        while !self.peek_is(TokenKind::RParen) {
            let entry = if self.consume_if(TokenKind::EllipsisOp)? {
                Entry {
                    name: None,
                    variadic: true,
                    ty: self.parse_type_ref()?,
                    bare: false,
                }
            } else {
                let (first, bare) = self.parse_type_ref_or_ident()?;
                let type_follows =
                    bare && !self.peek_is(TokenKind::Comma) && !self.peek_is(TokenKind::RParen);
                if type_follows {
                    has_named = true;
                    let name = extract_ident(&first)?;
                    let variadic = self.consume_if(TokenKind::EllipsisOp)?;
                    Entry {
                        name: Some(name),
                        variadic,
                        ty: self.parse_type_ref()?,
                        bare: false,
                    }
                } else {
                    Entry {
                        name: None,
                        variadic: false,
                        ty: first,
                        bare,
                    }
                }
            };
            entries.push(entry);

            if !self.consume_if(TokenKind::Comma)? {
                break;
            }
        }
        self.require(
            "expected ',' or ')' in parameter list",
            &[TokenKind::RParen],
        )?;
        let end = self.tok.end();

        if let Some((_, entry)) = entries
            .iter()
            .enumerate()
            .find(|(i, e)| e.variadic && i + 1 != entries.len())
        {
            return Err(Error::syntax(
                entry.ty.begin(),
                "only the final parameter may be variadic",
            ));
        }

        if !entries.is_empty() && names_required && !has_named {
            return Err(Error::syntax(&begin, "parameter names are required here"));
        }

        if has_named {
            propagate_types(&mut entries)?;
        }

        let decls = entries
            .into_iter()
            .map(|e| ParameterDecl {
                type_was_inferred: e.name.is_some() && e.bare,
                name: e.name,
                variadic: e.variadic,
                ty: e.ty,
            })
            .collect();

        Ok(ParameterDeclList { begin, decls, end })
    }
}
