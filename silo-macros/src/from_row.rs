use crate::decode_table::TableMetadata;
use proc_macro2::TokenStream;
use quote::quote;
use syn::ItemStruct;

/// Generates the lenient `from_row` mapping: folded column lookup, central
/// coercion, absent or non-coercible values leave the field at its default.
pub(crate) fn from_row_fn(item: &ItemStruct, table: &TableMetadata) -> TokenStream {
    let entity_name = item.ident.to_string();
    let init_columns = table.columns.iter().map(|c| {
        let ident = &c.ident;
        quote!(#ident: ::core::default::Default::default())
    });
    let init_skipped = table.skipped.iter().map(|ident| {
        quote!(#ident: ::core::default::Default::default())
    });
    let assignments = table.columns.iter().enumerate().map(|(i, c)| {
        let ident = &c.ident;
        let field = &c.field;
        quote! {
            if let Some(value) = ::silo::mapping::lookup(row, columns[#i].name()) {
                if let Some(value) = ::silo::mapping::coerce(value, #entity_name, #field) {
                    entity.#ident = value;
                }
            }
        }
    });
    quote! {
        fn from_row(row: &::silo::RowLabeled) -> ::silo::Result<Self> {
            let columns = <Self as ::silo::Entity>::columns();
            let mut entity = Self {
                #(#init_columns,)*
                #(#init_skipped,)*
            };
            #(#assignments)*
            Ok(entity)
        }
    }
}
