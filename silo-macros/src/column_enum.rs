use crate::decode_table::TableMetadata;
use convert_case::{Case, Casing};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Error, Ident, ItemStruct, Result};

/// Generates the `{Entity}Column` enum: one variant per persistable field,
/// resolving to the matching `ColumnDef` of the cached descriptor.
pub(crate) fn column_enum(item: &ItemStruct, table: &TableMetadata) -> Result<(Ident, TokenStream)> {
    let struct_ident = &item.ident;
    let vis = &item.vis;
    let enum_ident = format_ident!("{}Column", struct_ident);
    let variants: Vec<Ident> = table
        .columns
        .iter()
        .map(|c| Ident::new(&c.field.to_case(Case::Pascal), c.ident.span()))
        .collect();
    for (i, a) in variants.iter().enumerate() {
        if let Some(b) = variants[i + 1..].iter().find(|b| *b == a) {
            return Err(Error::new(
                b.span(),
                format!("Fields `{}` and `{}` produce the same column variant", a, b),
            ));
        }
    }
    let arms = variants.iter().enumerate().map(|(i, variant)| {
        quote! { Self::#variant => &columns[#i] }
    });
    let tokens = quote! {
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        #vis enum #enum_ident {
            #(#variants),*
        }
        impl ::silo::EntityColumn for #enum_ident {
            fn def(&self) -> &'static ::silo::ColumnDef {
                let columns = <#struct_ident as ::silo::Entity>::columns();
                match self {
                    #(#arms,)*
                }
            }
        }
    };
    Ok((enum_ident, tokens))
}
