//! `#[derive(Dispatchable)]`.

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    DeriveInput, Token, Type, parenthesized, parse::Parse, parse_macro_input,
    punctuated::Punctuated,
};

/// Parents collected from `#[dispatch(parents(..))]`.
fn parse_parents(input: &DeriveInput) -> syn::Result<Vec<Type>> {
    let mut parents = Vec::new();
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("dispatch")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("parents") {
                let content;
                parenthesized!(content in meta.input);
                let list: Punctuated<Type, Token![,]> =
                    content.parse_terminated(Type::parse, Token![,])?;
                parents.extend(list);
                Ok(())
            } else {
                Err(meta.error("unknown dispatch attribute, expected `parents(..)`"))
            }
        })?;
    }
    Ok(parents)
}

pub fn derive_dispatchable_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let parents = match parse_parents(&input) {
        Ok(parents) => parents,
        Err(err) => return err.to_compile_error().into(),
    };

    let dispatchable_impl = quote! {
        impl #impl_generics ::singlet::Dispatchable for #name #ty_generics #where_clause {}
    };

    if parents.is_empty() {
        return TokenStream::from(dispatchable_impl);
    }

    if !input.generics.params.is_empty() {
        return syn::Error::new_spanned(
            &input.generics,
            "`#[dispatch(parents(..))]` is not supported on generic types; declare them at runtime",
        )
        .to_compile_error()
        .into();
    }

    let expanded = quote! {
        #dispatchable_impl

        const _: () = {
            fn __singlet_ty() -> ::singlet::TypeKey {
                ::singlet::TypeKey::of::<#name>()
            }

            fn __singlet_parents() -> ::std::vec::Vec<::singlet::TypeKey> {
                ::std::vec![#(::singlet::TypeKey::of::<#parents>()),*]
            }

            ::singlet::inventory::submit! {
                ::singlet::plugin::TypeDeclaration {
                    ty: __singlet_ty,
                    parents: __singlet_parents,
                }
            }
        };
    };

    TokenStream::from(expanded)
}
