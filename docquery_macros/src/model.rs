use proc_macro::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::meta::ParseNestedMeta;
use syn::{Attribute, Data, DeriveInput, Fields, LitStr};

/// The field marked `#[model(id)]` and the key serde writes it under.
struct IdField {
    ident: syn::Ident,
    key: String,
}

pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    // Extract #[model(collection = "...")] from struct-level attributes
    let collection = match extract_collection(&input) {
        Ok(collection) => collection,
        Err(err) => return err.to_compile_error().into(),
    };

    // The optional field marked with #[model(id)]
    let id_field = match extract_id_field(&input) {
        Ok(id_field) => id_field,
        Err(err) => return err.to_compile_error().into(),
    };

    let (from_record, apply) = match id_field {
        Some(IdField { ident: id, key }) => {
            (
                quote! {
                    let mut model: Self = record.decode().ok()?;
                    model.#id = record.id().map(::std::string::ToString::to_string);
                    ::core::option::Option::Some(model)
                },
                quote! {
                    ::docquery::record::apply_serialized(self, record);
                    let _ = record.remove(#key);
                    if let ::core::option::Option::Some(id) = &self.#id {
                        record.set_id(::core::clone::Clone::clone(id));
                    }
                },
            )
        }
        None => (
            quote! {
                record.decode().ok()
            },
            quote! {
                ::docquery::record::apply_serialized(self, record);
            },
        ),
    };

    let expanded = quote! {
        impl #impl_generics ::docquery::Model for #name #ty_generics #where_clause {
            const COLLECTION: &'static str = #collection;

            fn from_record(record: &::docquery::Record) -> ::core::option::Option<Self> {
                #from_record
            }

            fn apply(&self, record: &mut ::docquery::Record) {
                #apply
            }
        }
    };

    TokenStream::from(expanded)
}

fn extract_collection(input: &DeriveInput) -> syn::Result<String> {
    for attr in &input.attrs {
        if !attr.path().is_ident("model") {
            continue;
        }

        let mut collection = None;
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("collection") {
                let value: LitStr = meta.value()?.parse()?;
                collection = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("expected `collection = \"...\"`"))
            }
        })?;

        if let Some(c) = collection {
            return Ok(c);
        }
    }

    // Default: the struct name as written
    Ok(input.ident.to_string())
}

fn extract_id_field(input: &DeriveInput) -> syn::Result<Option<IdField>> {
    let fields = match &input.data {
        Data::Struct(data_struct) => &data_struct.fields,
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Model derive: only structs are supported",
            ))
        }
    };

    let Fields::Named(fields) = fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Model derive: only structs with named fields are supported",
        ));
    };

    let mut found = None;
    for field in &fields.named {
        for attr in &field.attrs {
            if !attr.path().is_ident("model") {
                continue;
            }

            let mut is_id = false;
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("id") {
                    is_id = true;
                    Ok(())
                } else {
                    Err(meta.error("expected `id`"))
                }
            })?;

            if is_id {
                if found.is_some() {
                    return Err(syn::Error::new_spanned(
                        field,
                        "Model derive: only one field may be marked #[model(id)]",
                    ));
                }
                found = Some(field);
            }
        }
    }

    let Some(field) = found else {
        return Ok(None);
    };
    let Some(ident) = field.ident.clone() else {
        return Ok(None);
    };

    let key = match serde_name(&field.attrs, "rename")? {
        Some((renamed, _)) => renamed,
        None => {
            let name = ident.unraw().to_string();
            match serde_name(&input.attrs, "rename_all")? {
                Some((rule, span)) => apply_rename_rule(&rule, &name)
                    .ok_or_else(|| syn::Error::new(span, "Model derive: unknown rename_all rule"))?,
                None => name,
            }
        }
    };

    Ok(Some(IdField { ident, key }))
}

/// Find `#[serde(<name> = "...")]` or `#[serde(<name>(serialize = "..."))]`.
///
/// Other serde options are skipped.
fn serde_name(attrs: &[Attribute], name: &str) -> syn::Result<Option<(String, proc_macro2::Span)>> {
    let mut value = None;
    for attr in attrs {
        if !attr.path().is_ident("serde") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident(name) {
                return skip_meta(&meta);
            }
            if meta.input.peek(syn::Token![=]) {
                let lit: LitStr = meta.value()?.parse()?;
                value = Some((lit.value(), lit.span()));
                return Ok(());
            }
            meta.parse_nested_meta(|inner| {
                if inner.path.is_ident("serialize") {
                    let lit: LitStr = inner.value()?.parse()?;
                    value = Some((lit.value(), lit.span()));
                    Ok(())
                } else {
                    skip_meta(&inner)
                }
            })
        })?;
    }
    Ok(value)
}

fn skip_meta(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(syn::Token![=]) {
        let _: syn::Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        let _: proc_macro2::Group = meta.input.parse()?;
    }
    Ok(())
}

/// Serde's `rename_all` rules as applied to a snake_case field name.
fn apply_rename_rule(rule: &str, field: &str) -> Option<String> {
    let pascal = || {
        let mut out = String::new();
        let mut upper = true;
        for ch in field.chars() {
            if ch == '_' {
                upper = true;
            } else if upper {
                out.push(ch.to_ascii_uppercase());
                upper = false;
            } else {
                out.push(ch);
            }
        }
        out
    };

    let renamed = match rule {
        "lowercase" | "snake_case" => field.to_string(),
        "UPPERCASE" | "SCREAMING_SNAKE_CASE" => field.to_ascii_uppercase(),
        "PascalCase" => pascal(),
        "camelCase" => {
            let pascal = pascal();
            let mut chars = pascal.chars();
            match chars.next() {
                Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        }
        "kebab-case" => field.replace('_', "-"),
        "SCREAMING-KEBAB-CASE" => field.to_ascii_uppercase().replace('_', "-"),
        _ => return None,
    };
    Some(renamed)
}
