//! Proc macros for graft.
//!
//! `#[reflect]` turns an inherent impl block into a `Reflect` implementation
//! so the type's methods can be matched against interfaces at runtime.

use proc_macro::TokenStream;

mod expand;

/// Publish the `pub fn(&self, ..)` methods of an inherent impl block.
///
/// ```ignore
/// struct Target;
///
/// #[reflect]
/// impl Target {
///     pub fn add(&self, a: i32, b: i32) -> i32 {
///         a + b
///     }
///
///     pub fn div(&self, a: i32, b: i32) -> Result<i32, DivideByZero> {
///         // ...
///     }
///
///     #[reflect(skip)]
///     pub fn internal(&self) {}
/// }
/// ```
///
/// Methods are published in declaration order. A method is published when it
/// is `pub`, takes `&self`, has no generic parameters and is neither `async`
/// nor `unsafe`. Methods returning `Result<T, E>` (matched on the last path
/// segment) are registered as fallible: their signature returns `T` and an
/// `Err` reaches adapter callers as `Fault::Raised`. `E` must implement
/// `std::error::Error + Send + Sync + 'static`. `String`, references, `Box<dyn ..>`
/// and `anyhow`/`eyre` errors are rejected with a pointer to
/// `#[reflect(skip)]`; other aliases that hide a non-error `E` only fail at
/// the generated `try_method` call.
///
/// Method options:
/// - `#[reflect(skip)]` - do not publish
/// - `#[reflect(rename = "Add")]` - publish under another name
///
/// Impl options:
/// - `#[reflect(crate = path::to::graft_runtime)]` - path used in the generated code
#[proc_macro_attribute]
pub fn reflect(attr: TokenStream, item: TokenStream) -> TokenStream {
    let item = syn::parse_macro_input!(item as syn::ItemImpl);
    expand::expand(attr.into(), item)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
