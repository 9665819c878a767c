use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, parse_quote, Attribute, Data, DeriveInput, Fields, FieldsNamed, LitStr};

/// Derive macro for implementing `dom_template::Segments` on a struct
///
/// Every named field is exposed under its own name, for any key type that is
/// `AsRef<str>`. Field types must implement `dom_template::ToSegment`.
///
/// # Examples
///
/// ```ignore
/// use dom_template::Segments;
///
/// #[derive(Segments)]
/// struct Person {
///     name: String,
///     age: u32,
///     #[segments(rename = "emailAddress")]
///     email: String,
///     #[segments(skip)]
///     password: String,
/// }
/// ```
#[proc_macro_derive(Segments, attributes(segments))]
pub fn derive_segments(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate_segments_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn generate_segments_impl(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;

    let data = match &input.data {
        Data::Struct(data) => data,
        _ => return Err(syn::Error::new_spanned(input, "Segments can only be derived for structs")),
    };

    let fields = match &data.fields {
        Fields::Named(fields) => fields,
        Fields::Unnamed(_) => return Err(syn::Error::new_spanned(input, "Segments requires named fields")),
        Fields::Unit => return Err(syn::Error::new_spanned(input, "Segments cannot be derived for unit structs")),
    };

    let arms = generate_field_arms(fields)?;

    // The key type is an extra impl parameter, so the struct's own generics
    // are extended rather than reused.
    let mut generics = input.generics.clone();
    let type_params: Vec<_> = generics.type_params().map(|param| param.ident.clone()).collect();
    let where_clause = generics.make_where_clause();
    for ident in type_params {
        where_clause
            .predicates
            .push(parse_quote!(#ident: ::dom_template::ToSegment));
    }
    generics.params.push(parse_quote!(__SegmentKey: ::core::convert::AsRef<str> + ?Sized));
    let (impl_generics, _, where_clause) = generics.split_for_impl();
    let (_, ty_generics, _) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::dom_template::Segments<__SegmentKey> for #name #ty_generics #where_clause {
            fn segment(&self, key: &__SegmentKey) -> ::core::option::Option<::std::borrow::Cow<'_, [u8]>> {
                match ::core::convert::AsRef::<str>::as_ref(key) {
                    #(#arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    })
}

fn generate_field_arms(fields: &FieldsNamed) -> syn::Result<Vec<TokenStream2>> {
    let mut arms = Vec::new();
    let mut seen = Vec::new();

    for field in &fields.named {
        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };
        let attrs = parse_field_attributes(&field.attrs)?;

        // Skip fields marked with #[segments(skip)]
        if attrs.skip {
            continue;
        }

        let key = attrs.rename.unwrap_or_else(|| field_name.to_string());
        if seen.contains(&key) {
            return Err(syn::Error::new_spanned(
                field,
                format!("duplicate segment name `{}`", key),
            ));
        }

        arms.push(quote! {
            #key => ::dom_template::ToSegment::to_segment(&self.#field_name),
        });
        seen.push(key);
    }

    Ok(arms)
}

#[derive(Default)]
struct FieldAttributes {
    skip: bool,
    rename: Option<String>,
}

fn parse_field_attributes(attrs: &[Attribute]) -> syn::Result<FieldAttributes> {
    let mut result = FieldAttributes::default();

    for attr in attrs {
        if !attr.path().is_ident("segments") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                result.skip = true;
                Ok(())
            } else if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                result.rename = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("expected `skip` or `rename = \"...\"`"))
            }
        })?;
    }

    Ok(result)
}
