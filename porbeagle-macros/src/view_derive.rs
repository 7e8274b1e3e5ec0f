//! Use-site validation of view declarations.

use syn::spanned::Spanned;
use syn::{Attribute, Data, DeriveInput, Fields, LitInt, Meta};

/// Check the declaration shape and every helper attribute, reporting all
/// problems at once.
pub fn validate(input: &DeriveInput) -> syn::Result<()> {
    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        Data::Enum(data) => {
            return Err(syn::Error::new(
                data.enum_token.span,
                "DiscordView can only be derived for structs",
            ))
        }
        Data::Union(data) => {
            return Err(syn::Error::new(
                data.union_token.span,
                "DiscordView can only be derived for structs",
            ))
        }
    };

    let mut errors: Vec<syn::Error> = Vec::new();

    if !input.generics.params.is_empty() {
        errors.push(syn::Error::new_spanned(
            &input.generics,
            "generic view declarations are not supported",
        ));
    }

    let members: Box<dyn Iterator<Item = &syn::Field>> = match fields {
        Fields::Named(named) => Box::new(named.named.iter()),
        Fields::Unnamed(unnamed) => Box::new(unnamed.unnamed.iter()),
        Fields::Unit => Box::new(std::iter::empty()),
    };

    for field in members {
        let mut rows = 0;
        for attr in &field.attrs {
            let result = if attr.path().is_ident("sticker") {
                check_sticker(attr)
            } else if attr.path().is_ident("action_row") {
                rows += 1;
                if rows > 1 {
                    Err(syn::Error::new_spanned(attr, "duplicate #[action_row] attribute"))
                } else {
                    action_row_index(attr).map(|_| ())
                }
            } else {
                Ok(())
            };
            if let Err(e) = result {
                errors.push(e);
            }
        }
    }

    match errors.into_iter().reduce(|mut acc, e| {
        acc.combine(e);
        acc
    }) {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

fn check_sticker(attr: &Attribute) -> syn::Result<()> {
    match &attr.meta {
        Meta::Path(_) => Ok(()),
        other => Err(syn::Error::new(other.span(), "#[sticker] takes no arguments")),
    }
}

/// Parse `#[action_row(n)]`, where `n` is a non-negative integer literal.
pub fn action_row_index(attr: &Attribute) -> syn::Result<u32> {
    let Meta::List(_) = &attr.meta else {
        return Err(syn::Error::new_spanned(
            attr,
            "#[action_row] requires a row index, e.g. #[action_row(0)]",
        ));
    };
    let lit: LitInt = attr.parse_args().map_err(|e| {
        syn::Error::new(
            e.span(),
            "#[action_row] takes exactly one non-negative integer literal",
        )
    })?;
    lit.base10_parse::<u32>()
}
