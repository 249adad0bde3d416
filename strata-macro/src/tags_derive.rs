use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Error, Fields, Result};

pub fn expand_tags_derive(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(Error::new_spanned(
                    input,
                    "Tags can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(Error::new_spanned(
                input,
                "Tags can only be derived for structs",
            ));
        }
    };

    // One `write!` per field; the separator is baked into the format string.
    let writes = fields.iter().filter_map(|f| f.ident.as_ref()).enumerate().map(|(i, ident)| {
        let sep = if i == 0 { "" } else { "," };
        // `r#type` is exported as `type`.
        let pattern = format!("{sep}{}=\"{{}}\"", ident.unraw());
        quote! {
            write!(f, #pattern, ::strata::core::escape_tag_value(&self.#ident.to_string()))?;
        }
    });

    let mut generics = input.generics.clone();
    if !fields.is_empty() {
        let where_clause = generics.make_where_clause();
        for field in fields {
            let ty = &field.ty;
            where_clause
                .predicates
                .push(syn::parse_quote!(#ty: ::std::fmt::Display));
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::strata::core::Tags for #name #ty_generics #where_clause {
            fn fmt_tags(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                #(#writes)*
                Ok(())
            }
        }
    })
}
