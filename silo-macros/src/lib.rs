mod column_enum;
mod decode_column;
mod decode_table;
mod decode_type;
mod from_row;

use crate::{column_enum::column_enum, decode_table::decode_table, from_row::from_row_fn};
use proc_macro::TokenStream;
use quote::quote;
use syn::{Error, ItemStruct, Result, parse_macro_input};

/// Derives `silo::Entity` for a named-field struct.
///
/// Column names resolve with the precedence: explicit
/// `#[silo(name = "...")]` per field, then the table-level
/// `#[silo(rename_all = "...")]` convention, then snake_case of the field
/// name. `#[silo(skip)]` keeps a field out of persistence entirely. The
/// primary key is the `#[silo(primary_key)]` field, or a field named `id`.
///
/// ```ignore
/// #[derive(Entity, Default, Clone)]
/// #[silo(name = "users")]
/// struct User {
///     id: i64,
///     #[silo(name = "login")]
///     user_name: Option<String>,
/// }
/// ```
#[proc_macro_derive(Entity, attributes(silo))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let item: ItemStruct = parse_macro_input!(input as ItemStruct);
    expand(&item)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}

fn expand(item: &ItemStruct) -> Result<proc_macro2::TokenStream> {
    if !item.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &item.generics,
            "Generic entities are not supported",
        ));
    }
    let table = decode_table(item)?;
    let struct_ident = &item.ident;
    let entity_name = struct_ident.to_string();
    let table_name = &table.name;
    let schema_name = &table.schema;
    let pk_index = table.primary_key;
    let pk_ident = &table.columns[pk_index].ident;
    let column_count = table.columns.len();
    let column_defs = table.columns.iter().map(|c| {
        let field = &c.field;
        let column = &c.column;
        let value = &c.value;
        let nullable = c.nullable;
        let unique = c.unique;
        let primary_key = if c.primary_key {
            quote!(::silo::PrimaryKeyType::PrimaryKey)
        } else {
            quote!(::silo::PrimaryKeyType::None)
        };
        quote! {
            ::silo::ColumnDef {
                field: #field,
                column_ref: ::silo::ColumnRef {
                    name: #column,
                    table: #table_name,
                    schema: #schema_name,
                },
                value: #value,
                nullable: #nullable,
                primary_key: #primary_key,
                unique: #unique,
            }
        }
    });
    let record_pushes = table.columns.iter().map(|c| {
        let ident = &c.ident;
        let column = &c.column;
        quote! {
            {
                let value = ::silo::AsValue::as_value(self.#ident.clone());
                if !value.is_null() {
                    record.push((#column, value));
                }
            }
        }
    });
    let (enum_ident, column_enum) = column_enum(item, &table)?;
    let from_row = from_row_fn(item, &table);
    Ok(quote! {
        #column_enum
        impl ::silo::Entity for #struct_ident {
            type Column = #enum_ident;

            fn descriptor() -> &'static ::silo::EntityDescriptor {
                static DESCRIPTOR: ::std::sync::LazyLock<::silo::EntityDescriptor> =
                    ::std::sync::LazyLock::new(|| {
                        ::silo::EntityDescriptor::try_new(
                            #entity_name,
                            ::silo::TableRef {
                                name: #table_name,
                                schema: #schema_name,
                            },
                            vec![#(#column_defs),*],
                            #pk_index,
                        )
                        .expect("column names were checked during derive expansion")
                    });
                &DESCRIPTOR
            }

            #from_row

            fn to_record(&self) -> ::silo::Record {
                let mut record = ::silo::Record::with_capacity(#column_count);
                #(#record_pushes)*
                record
            }

            fn primary_key_value(&self) -> ::silo::Value {
                ::silo::AsValue::as_value(self.#pk_ident.clone())
            }
        }
    })
}
