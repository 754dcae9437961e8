use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, Variant};

pub fn derive_choice_enum(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            name,
            "ChoiceEnum derive: only enums are supported",
        ));
    };
    if data.variants.is_empty() {
        return Err(syn::Error::new_spanned(
            name,
            "ChoiceEnum derive: enum has no variants",
        ));
    }

    let mut idents = Vec::new();
    let mut values = Vec::new();
    let mut keys = Vec::new();
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "ChoiceEnum derive: variants must not carry fields",
            ));
        }
        idents.push(&variant.ident);
        values.push(extract_value(variant)?);
        keys.push(variant.ident.to_string());
    }

    Ok(quote! {
        impl restkit::choices::ChoiceEnum for #name {
            const VARIANTS: &'static [Self] = &[#(#name::#idents),*];

            fn value(&self) -> &'static str {
                match self {
                    #(#name::#idents => #values,)*
                }
            }

            fn key(&self) -> &'static str {
                match self {
                    #(#name::#idents => #keys,)*
                }
            }
        }
    })
}

/// `#[choice(value = "...")]`, defaulting to the snake_case variant name.
fn extract_value(variant: &Variant) -> syn::Result<String> {
    for attr in &variant.attrs {
        if !attr.path().is_ident("choice") {
            continue;
        }

        let mut value = None;
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("value") {
                let lit: LitStr = meta.value()?.parse()?;
                value = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("expected `value = \"...\"`"))
            }
        })?;

        if let Some(v) = value {
            return Ok(v);
        }
    }

    Ok(to_snake_case(&variant.ident.to_string()))
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}
