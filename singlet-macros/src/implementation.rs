//! `#[implementation]` attribute.

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    FnArg, Ident, ItemFn, LitStr, Token, Type,
    parse::{Parse, ParseStream},
    parse_macro_input,
};

/// Arguments for the `#[implementation]` macro.
pub(crate) struct ImplementationArgs {
    pub registry: Option<LitStr>,
    pub ty: Option<Type>,
    pub named: Option<LitStr>,
}

impl Parse for ImplementationArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut registry = None;
        let mut ty = None;
        let mut named = None;

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            match ident.to_string().as_str() {
                "registry" => registry = Some(input.parse()?),
                "ty" => ty = Some(input.parse()?),
                "named" => named = Some(input.parse()?),
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown attribute: {}", other),
                    ));
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(ImplementationArgs {
            registry,
            ty,
            named,
        })
    }
}

/// Implementation of the `#[implementation]` attribute macro.
pub fn implementation_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as ImplementationArgs);
    let input = parse_macro_input!(item as ItemFn);

    match expand(&args, &input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(args: &ImplementationArgs, input: &ItemFn) -> syn::Result<proc_macro2::TokenStream> {
    let sig = &input.sig;
    let fn_name = &sig.ident;

    if let Some(asyncness) = &sig.asyncness {
        return Err(syn::Error::new_spanned(
            asyncness,
            "implementations are called synchronously and cannot be async",
        ));
    }
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "implementations cannot be generic",
        ));
    }

    let Some(registry) = &args.registry else {
        return Err(syn::Error::new_spanned(
            fn_name,
            "missing `registry = \"name\"` argument",
        ));
    };

    let declared = match (&args.ty, &args.named) {
        (Some(ty), None) => quote! { ::singlet::TypeKey::of::<#ty>() },
        (None, Some(name)) => quote! { ::singlet::TypeKey::named(#name) },
        _ => {
            return Err(syn::Error::new_spanned(
                fn_name,
                "expected exactly one of `ty = Type` or `named = \"Name\"`",
            ));
        }
    };

    let mut typed = Vec::with_capacity(sig.inputs.len());
    for arg in &sig.inputs {
        match arg {
            FnArg::Typed(pat_type) => typed.push(&*pat_type.ty),
            FnArg::Receiver(receiver) => {
                return Err(syn::Error::new_spanned(
                    receiver,
                    "implementations cannot take `self`",
                ));
            }
        }
    }

    let value_type = match typed.first() {
        Some(Type::Reference(reference)) => &*reference.elem,
        Some(other) => {
            return Err(syn::Error::new_spanned(
                other,
                "the dispatched value must be taken by reference (`&V`)",
            ));
        }
        None => {
            return Err(syn::Error::new_spanned(
                &sig.inputs,
                "implementations take the dispatched value as first argument",
            ));
        }
    };

    let (args_type, call) = match typed.get(1..).unwrap_or_default() {
        [] => (quote! { () }, quote! { |value, ()| #fn_name(value) }),
        [args] => (quote! { #args }, quote! { |value, args| #fn_name(value, args) }),
        [_, extra, ..] => {
            return Err(syn::Error::new_spanned(
                extra,
                "pass additional arguments as one tuple: fn(value: &V, args: (A, B))",
            ));
        }
    };

    let output_type = match &sig.output {
        syn::ReturnType::Default => quote! { () },
        syn::ReturnType::Type(_, ty) => quote! { #ty },
    };

    Ok(quote! {
        #input

        const _: () = {
            fn __singlet_declared() -> ::singlet::TypeKey {
                #declared
            }

            fn __singlet_handler() -> ::std::boxed::Box<dyn ::std::any::Any + Send + Sync> {
                let handler: ::singlet::Handler<#value_type, #args_type, #output_type> =
                    ::singlet::Handler::new(#call);
                ::std::boxed::Box::new(handler)
            }

            ::singlet::inventory::submit! {
                ::singlet::plugin::HandlerSubmission {
                    registry: #registry,
                    declared: __singlet_declared,
                    handler: __singlet_handler,
                }
            }
        };
    })
}
