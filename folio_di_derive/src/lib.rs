use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, parse_quote, Data, DeriveInput, Field, Fields};

/// Derive `folio_di::Build` for a struct whose fields can all be built by the
/// provider. Fields marked with `#[state]` are initialized with
/// `Default::default()` instead.
///
/// Built values are cached in the provider, so every type is only built once.
#[proc_macro_derive(Build, attributes(state))]
pub fn derive_build(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream2> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Build can only be derived for structs",
        ));
    };

    let ident = &input.ident;
    let (_, ty_generics, _) = input.generics.split_for_impl();

    let mut generics = input.generics.clone();
    generics.params.push(parse_quote!(__Provider));
    let where_clause = generics.make_where_clause();
    where_clause
        .predicates
        .push(parse_quote!(Self: ::core::clone::Clone + 'static));
    where_clause
        .predicates
        .push(parse_quote!(__Provider: ::folio_di::Provider));
    for Field { ty, .. } in data.fields.iter().filter(|field| !is_state(field)) {
        where_clause
            .predicates
            .push(parse_quote!(#ty: ::folio_di::Build<__Provider>));
    }
    let (impl_generics, _, where_clause) = generics.split_for_impl();

    let value = match &data.fields {
        Fields::Named(fields) => {
            let fields = fields.named.iter().map(|field| {
                let ident = &field.ident;
                let init = init(field);
                quote! { #ident: #init }
            });
            quote! { Self { #(#fields),* } }
        }
        Fields::Unnamed(fields) => {
            let fields = fields.unnamed.iter().map(init);
            quote! { Self( #(#fields),* ) }
        }
        Fields::Unit => quote! { Self },
    };

    Ok(quote! {
        impl #impl_generics ::folio_di::Build<__Provider> for #ident #ty_generics #where_clause {
            fn build(provider: &mut __Provider) -> Self {
                if let ::core::option::Option::Some(cached) =
                    ::folio_di::Provider::cache(provider).get::<Self>()
                {
                    return ::core::clone::Clone::clone(cached);
                }

                let value = #value;
                ::folio_di::Provider::cache(provider).insert(::core::clone::Clone::clone(&value));
                value
            }
        }
    })
}

fn is_state(field: &Field) -> bool {
    field.attrs.iter().any(|attr| attr.path().is_ident("state"))
}

fn init(field: &Field) -> TokenStream2 {
    if is_state(field) {
        quote! { ::core::default::Default::default() }
    } else {
        quote! { ::folio_di::Build::build(provider) }
    }
}
