use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{Data, DeriveInput, Error, Expr, ExprLit, Fields, Lit, Meta, Result, parse2};

#[derive(Debug)]
struct HistogramField {
    ident: syn::Ident,
    // Full identifier, prefix included, already validated.
    name: String,
    buckets: Option<Expr>,
}

pub fn expand_metrics_macro(args: TokenStream, input: TokenStream) -> Result<TokenStream> {
    let mut input: DeriveInput = parse2(input)?;
    let prefix = parse_struct_attrs(args)?;

    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(Error::new_spanned(
                    input,
                    "metrics can only be applied to structs with named fields",
                ));
            }
        },
        _ => {
            return Err(Error::new_spanned(
                input,
                "metrics can only be applied to structs",
            ));
        }
    };

    let histogram_fields = fields
        .iter()
        .map(|field| parse_field(field, prefix.as_deref()))
        .collect::<Result<Vec<_>>>()?;

    let constructor = generate_constructor(name, &input.generics, &histogram_fields);
    let display_impl = generate_display_impl(name, &input.generics, &histogram_fields);

    if let Data::Struct(ref mut data) = input.data {
        if let Fields::Named(ref mut fields) = data.fields {
            for field in &mut fields.named {
                field.attrs.retain(|attr| !attr.path().is_ident("histogram"));
            }
        }
    }

    Ok(quote! {
        #input
        #constructor
        #display_impl
    })
}

fn parse_struct_attrs(args: TokenStream) -> Result<Option<String>> {
    if args.is_empty() {
        return Ok(None);
    }

    let nv = match parse2::<Meta>(args)? {
        Meta::NameValue(nv) => nv,
        other => return Err(Error::new_spanned(other, "expected `prefix = \"...\"`")),
    };
    if !nv.path.is_ident("prefix") {
        return Err(Error::new_spanned(nv.path, "unknown attribute"));
    }
    match &nv.value {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(Some(s.value())),
        other => Err(Error::new_spanned(other, "prefix must be a string literal")),
    }
}

fn parse_field(field: &syn::Field, prefix: Option<&str>) -> Result<HistogramField> {
    let Some(ident) = field.ident.clone() else {
        return Err(Error::new_spanned(field, "metrics fields must be named"));
    };
    let Some(attr) = field.attrs.iter().find(|a| a.path().is_ident("histogram")) else {
        return Err(Error::new_spanned(
            field,
            "every field of a #[metrics] struct must carry #[histogram(...)]",
        ));
    };

    let mut name_override: Option<syn::LitStr> = None;
    let mut buckets = None;
    if !matches!(attr.meta, Meta::Path(_)) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                name_override = Some(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("buckets") {
                buckets = Some(meta.value()?.parse::<Expr>()?);
                Ok(())
            } else {
                Err(meta.error("unknown attribute"))
            }
        })?;
    }

    let (base, span) = match &name_override {
        Some(lit) => (lit.value(), lit.span()),
        None => (ident.to_string(), ident.span()),
    };
    let name = build_metric_name(&base, prefix);
    validate_name(&name, span)?;

    Ok(HistogramField {
        ident,
        name,
        buckets,
    })
}

fn validate_name(name: &str, span: Span) -> Result<()> {
    strata_core::validate_identifier(name).map_err(|err| Error::new(span, err.to_string()))
}

fn generate_constructor(
    name: &syn::Ident,
    generics: &syn::Generics,
    fields: &[HistogramField],
) -> TokenStream {
    let inits = fields.iter().map(|field| {
        let ident = &field.ident;
        let metric_name = &field.name;
        let buckets = match &field.buckets {
            Some(expr) => quote! { &(#expr) },
            None => quote! { &::strata::core::DEFAULT_BUCKETS },
        };
        quote! {
            #ident: ::strata::core::HistogramStatic::new(#metric_name, #buckets)?,
        }
    });

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            /// Creates every histogram of this set with zeroed counters.
            pub fn new() -> ::strata::core::Result<Self> {
                Ok(Self {
                    #(#inits)*
                })
            }
        }
    }
}

fn generate_display_impl(
    name: &syn::Ident,
    generics: &syn::Generics,
    fields: &[HistogramField],
) -> TokenStream {
    let writes = fields.iter().map(|field| {
        let ident = &field.ident;
        quote! { self.#ident.write_to(f)?; }
    });

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    quote! {
        impl #impl_generics ::std::fmt::Display for #name #ty_generics #where_clause {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                #(#writes)*
                Ok(())
            }
        }
    }
}

fn build_metric_name(base: &str, prefix: Option<&str>) -> String {
    match prefix {
        Some(p) => format!("{p}_{base}"),
        None => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only_field(input: DeriveInput) -> syn::Field {
        match input.data {
            Data::Struct(data) => data.fields.into_iter().next().unwrap(),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_build_metric_name() {
        assert_eq!(build_metric_name("latency", None), "latency");
        assert_eq!(
            build_metric_name(r#"latency{path="/"}"#, Some("app")),
            r#"app_latency{path="/"}"#
        );
    }

    #[test]
    fn test_parse_field_defaults_to_ident() {
        let field = only_field(syn::parse_quote! {
            struct M {
                #[histogram]
                queue_time: HistogramStatic,
            }
        });
        let parsed = parse_field(&field, Some("svc")).unwrap();
        assert_eq!(parsed.name, "svc_queue_time");
        assert!(parsed.buckets.is_none());
    }

    #[test]
    fn test_parse_field_rejects_bad_name() {
        let field = only_field(syn::parse_quote! {
            struct M {
                #[histogram(name = "bad name", buckets = [1.0])]
                latency: HistogramStatic,
            }
        });
        let err = parse_field(&field, None).unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"invalid metric identifier: invalid identifier "bad name""#
        );
    }

    #[test]
    fn test_parse_field_requires_histogram_attr() {
        let field = only_field(syn::parse_quote! {
            struct M {
                latency: HistogramStatic,
            }
        });
        assert!(parse_field(&field, None).is_err());
    }
}
