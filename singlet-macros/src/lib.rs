//! Procedural macros for Singlet.
//!
//! - `#[derive(Dispatchable)]` - implements `Dispatchable` and, with
//!   `#[dispatch(parents(..))]`, submits the type's parents
//! - `#[implementation]` - submits a function as an implementation for a
//!   named registry
//!
//! Generated code refers to the `singlet` facade crate; parent and
//! implementation submissions need its `inventory` feature.

use proc_macro::TokenStream;

mod dispatchable;
mod implementation;

/// Derive macro for implementing `Dispatchable`.
///
/// ```rust,ignore
/// #[derive(Dispatchable)]
/// struct Animal;
///
/// #[derive(Dispatchable)]
/// #[dispatch(parents(Animal))]
/// struct Dog;
/// ```
#[proc_macro_derive(Dispatchable, attributes(dispatch))]
pub fn derive_dispatchable(input: TokenStream) -> TokenStream {
    dispatchable::derive_dispatchable_impl(input)
}

/// Submit a function as an implementation for a named registry.
///
/// ```rust,ignore
/// #[implementation(registry = "describe", ty = i64)]
/// fn describe_int(value: &dyn Dispatchable) -> String {
///     format!("INT:{}", value.downcast_ref::<i64>().unwrap())
/// }
///
/// registry.register_collected("describe")?;
/// ```
#[proc_macro_attribute]
pub fn implementation(attr: TokenStream, item: TokenStream) -> TokenStream {
    implementation::implementation_impl(attr, item)
}
