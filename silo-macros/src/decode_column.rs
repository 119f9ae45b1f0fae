use crate::decode_type::decode_type;
use proc_macro2::TokenStream;
use syn::{Error, Field, Ident, LitStr, Result};

pub(crate) struct ColumnMetadata {
    pub(crate) ident: Ident,
    /// Logical field name (identifier with any leading `_` stripped).
    pub(crate) field: String,
    /// Explicit `#[silo(name = "...")]` override, when present.
    pub(crate) explicit_name: Option<String>,
    /// Resolved column name, filled in by `decode_table`.
    pub(crate) column: String,
    pub(crate) value: TokenStream,
    pub(crate) nullable: bool,
    pub(crate) primary_key: bool,
    pub(crate) unique: bool,
}

pub(crate) enum DecodedField {
    Column(ColumnMetadata),
    /// `#[silo(skip)]`: never persisted, restored via `Default` on read.
    Skipped(Ident),
}

pub(crate) fn decode_column(field: &Field) -> Result<DecodedField> {
    let ident = field
        .ident
        .clone()
        .ok_or_else(|| Error::new_spanned(field, "Entity fields must be named"))?;
    let mut explicit_name = None;
    let mut primary_key = false;
    let mut unique = false;
    let mut skip = false;
    for attr in &field.attrs {
        if !attr.path().is_ident("silo") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                explicit_name = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("primary_key") {
                primary_key = true;
            } else if meta.path.is_ident("unique") {
                unique = true;
            } else if meta.path.is_ident("skip") {
                skip = true;
            } else {
                return Err(meta.error("Unknown silo attribute, expected one of: name, primary_key, unique, skip"));
            }
            Ok(())
        })?;
    }
    if skip {
        return Ok(DecodedField::Skipped(ident));
    }
    let (value, nullable) = decode_type(&field.ty)?;
    let mut name = ident.to_string();
    if name.starts_with('_') {
        name.remove(0);
    }
    Ok(DecodedField::Column(ColumnMetadata {
        field: name,
        explicit_name,
        column: String::new(),
        value,
        nullable: nullable && !primary_key,
        primary_key,
        unique,
        ident,
    }))
}
