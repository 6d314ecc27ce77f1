use proc_macro::TokenStream;
use quote::{format_ident, quote, quote_spanned};
use syn::{parse_macro_input, spanned::Spanned, Data, DeriveInput, Field, Fields, Index};

/// Generates `impl crate::walk::WalkChildren` visiting every field in declaration order.
///
/// Fields marked `#[walk(skip)]` are not visited.
#[proc_macro_derive(WalkAst, attributes(walk))]
pub fn derive_walk_ast(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let span = input.span();

    let walk_body = match generate_walk_body(&input.data) {
        Ok(body) => body,
        Err(err) => return err.into_compile_error().into(),
    };

    let expanded = quote_spanned! {span =>
        impl<'ast> crate::walk::WalkChildren<'ast> for #name {
            #[inline]
            #[allow(unused_variables)]
            fn walk_children<V: crate::walk::Visitor<'ast> + ?Sized>(&'ast self, v: &mut V) {
                #walk_body
            }
        }
    };

    expanded.into()
}

fn is_skipped(field: &Field) -> syn::Result<bool> {
    let mut skip = false;
    for attr in &field.attrs {
        if !attr.path().is_ident("walk") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else {
                Err(meta.error("expected `skip`"))
            }
        })?;
    }
    Ok(skip)
}

fn generate_walk_body(data: &Data) -> syn::Result<proc_macro2::TokenStream> {
    match data {
        Data::Struct(data_struct) => generate_fields_walk(&data_struct.fields),
        Data::Enum(data_enum) => {
            let arms = data_enum
                .variants
                .iter()
                .map(|variant| generate_variant_arm(&variant.ident, &variant.fields))
                .collect::<syn::Result<Vec<_>>>()?;

            Ok(quote! {
                match self {
                    #(#arms)*
                }
            })
        }
        Data::Union(u) => Err(syn::Error::new_spanned(
            u.union_token,
            "WalkAst cannot be derived for unions",
        )),
    }
}

fn generate_fields_walk(fields: &Fields) -> syn::Result<proc_macro2::TokenStream> {
    let mut walk_calls = Vec::new();
    for (i, field) in fields.iter().enumerate() {
        if is_skipped(field)? {
            continue;
        }
        let field_access = match &field.ident {
            Some(ident) => quote! { &self.#ident },
            None => {
                let index = Index::from(i);
                quote! { &self.#index }
            }
        };
        walk_calls.push(quote! { crate::walk::Walk::walk(#field_access, v); });
    }

    Ok(quote! { #(#walk_calls)* })
}

fn generate_variant_arm(
    variant_name: &syn::Ident,
    fields: &Fields,
) -> syn::Result<proc_macro2::TokenStream> {
    match fields {
        Fields::Unit => Ok(quote! { Self::#variant_name => {} }),
        Fields::Named(fields_named) => {
            let mut bindings = Vec::new();
            for field in &fields_named.named {
                if !is_skipped(field)? {
                    if let Some(ident) = &field.ident {
                        bindings.push(ident.clone());
                    }
                }
            }

            let walk_calls = bindings.iter().map(|name| {
                quote! { crate::walk::Walk::walk(#name, v); }
            });

            Ok(quote! {
                Self::#variant_name { #(#bindings,)* .. } => {
                    #(#walk_calls)*
                }
            })
        }
        Fields::Unnamed(fields_unnamed) => {
            let mut patterns = Vec::new();
            let mut bound = Vec::new();
            for (i, field) in fields_unnamed.unnamed.iter().enumerate() {
                if is_skipped(field)? {
                    patterns.push(quote! { _ });
                } else {
                    let var = format_ident!("f{}", i);
                    patterns.push(quote! { #var });
                    bound.push(var);
                }
            }

            let walk_calls = bound.iter().map(|var| {
                quote! { crate::walk::Walk::walk(#var, v); }
            });

            Ok(quote! {
                Self::#variant_name(#(#patterns),*) => {
                    #(#walk_calls)*
                }
            })
        }
    }
}
