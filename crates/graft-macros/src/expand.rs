//! Expansion of `#[reflect]`.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    Attribute, Error, FnArg, GenericArgument, ImplItem, ImplItemFn, ItemImpl, LitStr, Path,
    PathArguments, ReturnType, Signature, Type, TypePath, Visibility,
};

pub fn expand(attr: TokenStream, mut item: ItemImpl) -> syn::Result<TokenStream> {
    let krate = parse_crate_path(attr)?;

    if let Some((_, path, _)) = &item.trait_ {
        return Err(Error::new_spanned(
            path,
            "#[reflect] goes on an inherent impl block, not a trait impl",
        ));
    }
    if !item.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &item.generics,
            "#[reflect] does not support generic impl blocks",
        ));
    }

    let self_ty = item.self_ty.clone();
    let mut registrations = Vec::new();

    for impl_item in &mut item.items {
        let ImplItem::Fn(method) = impl_item else {
            continue;
        };
        let options = MethodOptions::take(&mut method.attrs)?;
        if options.skip || !is_published(method) {
            continue;
        }
        check_forwardable(&method.sig)?;

        let ident = &method.sig.ident;
        let name = options.rename.unwrap_or_else(|| ident.to_string());
        let register = if returns_result(&method.sig.output)? {
            quote!(try_method)
        } else {
            quote!(method)
        };
        registrations.push(quote! {
            ty.#register(#name, <#self_ty>::#ident);
        });
    }

    Ok(quote! {
        #item

        impl #krate::Reflect for #self_ty {
            #[allow(unused_variables)]
            fn describe(ty: &mut #krate::TypeBuilder<Self>) {
                #(#registrations)*
            }
        }
    })
}

fn parse_crate_path(attr: TokenStream) -> syn::Result<Path> {
    let mut krate: Path = syn::parse_quote!(::graft_runtime);
    if attr.is_empty() {
        return Ok(krate);
    }
    let parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("crate") {
            krate = meta.value()?.parse()?;
            Ok(())
        } else {
            Err(meta.error("unsupported #[reflect] option, expected `crate = path`"))
        }
    });
    syn::parse::Parser::parse2(parser, attr)?;
    Ok(krate)
}

/// Per-method `#[reflect(...)]` options. The attributes are removed from the
/// method since `reflect` is not a real attribute in that position.
#[derive(Default)]
struct MethodOptions {
    skip: bool,
    rename: Option<String>,
}

impl MethodOptions {
    fn take(attrs: &mut Vec<Attribute>) -> syn::Result<Self> {
        let mut options = Self::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident("reflect")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    options.skip = true;
                    Ok(())
                } else if meta.path.is_ident("rename") {
                    let name: LitStr = meta.value()?.parse()?;
                    options.rename = Some(name.value());
                    Ok(())
                } else {
                    Err(meta.error("expected `skip` or `rename = \"...\"`"))
                }
            })?;
        }
        attrs.retain(|a| !a.path().is_ident("reflect"));
        Ok(options)
    }
}

/// `pub`, `&self`, not generic, not async, not unsafe.
fn is_published(method: &ImplItemFn) -> bool {
    let sig = &method.sig;
    if !matches!(method.vis, Visibility::Public(_)) {
        return false;
    }
    if !sig.generics.params.is_empty() || sig.asyncness.is_some() || sig.unsafety.is_some() {
        return false;
    }
    match sig.inputs.first() {
        Some(FnArg::Receiver(receiver)) => {
            receiver.reference.is_some()
                && receiver.mutability.is_none()
                && receiver.colon_token.is_none()
        }
        _ => false,
    }
}

/// Arguments are moved through a forwarding call and the result is moved
/// back, so neither may borrow.
fn check_forwardable(sig: &Signature) -> syn::Result<()> {
    for input in sig.inputs.iter().skip(1) {
        if let FnArg::Typed(pat) = input {
            if borrows(&pat.ty) {
                return Err(Error::new_spanned(
                    &pat.ty,
                    "#[reflect] methods must take owned arguments; use #[reflect(skip)] to exclude this method",
                ));
            }
        }
    }
    if let ReturnType::Type(_, ty) = &sig.output {
        if borrows(ty) {
            return Err(Error::new_spanned(
                ty,
                "#[reflect] methods must return owned values; use #[reflect(skip)] to exclude this method",
            ));
        }
    }
    Ok(())
}

fn borrows(ty: &Type) -> bool {
    match ty {
        Type::Reference(_) | Type::ImplTrait(_) => true,
        Type::Paren(inner) => borrows(&inner.elem),
        Type::Group(inner) => borrows(&inner.elem),
        Type::Tuple(tuple) => tuple.elems.iter().any(borrows),
        _ => false,
    }
}

const ERROR_BOUND: &str = "#[reflect] methods returning `Result` need an error type implementing \
    `std::error::Error + Send + Sync + 'static`; use #[reflect(skip)] to exclude this method";

/// Whether the method is fallible, i.e. returns a type whose last path
/// segment is `Result`. Error types that cannot implement `std::error::Error`
/// are rejected here rather than as a trait error in the generated code.
fn returns_result(output: &ReturnType) -> syn::Result<bool> {
    let ReturnType::Type(_, ty) = output else {
        return Ok(false);
    };
    let Type::Path(result) = ty.as_ref() else {
        return Ok(false);
    };
    let Some(last) = result.path.segments.last() else {
        return Ok(false);
    };
    if last.ident != "Result" {
        return Ok(false);
    }
    if from_opaque_error_crate(result) {
        return Err(Error::new_spanned(result, ERROR_BOUND));
    }
    if let PathArguments::AngleBracketed(args) = &last.arguments {
        let error = args
            .args
            .iter()
            .filter_map(|arg| match arg {
                GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .nth(1);
        if let Some(error) = error.filter(|ty| cannot_be_error(ty)) {
            return Err(Error::new_spanned(error, ERROR_BOUND));
        }
    }
    Ok(true)
}

/// `anyhow` and `eyre` error types do not implement `std::error::Error`.
fn from_opaque_error_crate(path: &TypePath) -> bool {
    path.path
        .segments
        .first()
        .map(|seg| seg.ident == "anyhow" || seg.ident == "eyre")
        .unwrap_or(false)
}

/// `Box<dyn Trait>` never implements `std::error::Error`; `Box<E>` does when `E` does.
fn boxes_dyn(segment: &syn::PathSegment) -> bool {
    match &segment.arguments {
        PathArguments::AngleBracketed(args) => args
            .args
            .iter()
            .any(|arg| matches!(arg, GenericArgument::Type(Type::TraitObject(_)))),
        _ => false,
    }
}

fn cannot_be_error(ty: &Type) -> bool {
    match ty {
        Type::Reference(_) | Type::Tuple(_) => true,
        Type::Paren(inner) => cannot_be_error(&inner.elem),
        Type::Group(inner) => cannot_be_error(&inner.elem),
        Type::Path(path) => {
            let Some(last) = path.path.segments.last() else {
                return false;
            };
            from_opaque_error_crate(path) || last.ident == "String" || (last.ident == "Box" && boxes_dyn(last))
        }
        _ => false,
    }
}
