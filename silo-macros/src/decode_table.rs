use crate::decode_column::{ColumnMetadata, DecodedField, decode_column};
use convert_case::{Case, Casing};
use syn::{Error, Ident, ItemStruct, LitStr, Result};

pub(crate) struct TableMetadata {
    pub(crate) name: String,
    pub(crate) schema: String,
    pub(crate) columns: Vec<ColumnMetadata>,
    pub(crate) skipped: Vec<Ident>,
    /// Index into `columns`.
    pub(crate) primary_key: usize,
}

fn parse_case(lit: &LitStr) -> Result<Case> {
    Ok(match lit.value().as_str() {
        "snake_case" => Case::Snake,
        "camelCase" => Case::Camel,
        "PascalCase" => Case::Pascal,
        "lowercase" => Case::Flat,
        "UPPERCASE" => Case::UpperFlat,
        "SCREAMING_SNAKE_CASE" => Case::UpperSnake,
        "kebab-case" => Case::Kebab,
        other => {
            return Err(Error::new(
                lit.span(),
                format!("Unknown rename_all convention `{}`", other),
            ));
        }
    })
}

pub(crate) fn decode_table(item: &ItemStruct) -> Result<TableMetadata> {
    let mut name = item.ident.to_string().to_case(Case::Snake);
    if name.starts_with('_') {
        name.remove(0);
    }
    let mut schema = String::new();
    let mut rename = Case::Snake;
    for attr in &item.attrs {
        if !attr.path().is_ident("silo") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                name = meta.value()?.parse::<LitStr>()?.value();
            } else if meta.path.is_ident("schema") {
                schema = meta.value()?.parse::<LitStr>()?.value();
            } else if meta.path.is_ident("rename_all") {
                rename = parse_case(&meta.value()?.parse::<LitStr>()?)?;
            } else {
                return Err(
                    meta.error("Unknown silo attribute, expected one of: name, schema, rename_all")
                );
            }
            Ok(())
        })?;
    }
    let mut columns = Vec::new();
    let mut skipped = Vec::new();
    for field in &item.fields {
        match decode_column(field)? {
            DecodedField::Column(mut column) => {
                // Resolution precedence: explicit override, then the
                // table-level convention applied to the field name.
                column.column = match &column.explicit_name {
                    Some(explicit) => explicit.clone(),
                    None => column.field.to_case(rename),
                };
                columns.push(column);
            }
            DecodedField::Skipped(ident) => skipped.push(ident),
        }
    }
    if columns.is_empty() {
        return Err(Error::new_spanned(
            &item.ident,
            "Entity has no persistable fields",
        ));
    }
    for (i, a) in columns.iter().enumerate() {
        if let Some(b) = columns[i + 1..].iter().find(|b| b.column == a.column) {
            return Err(Error::new(
                b.ident.span(),
                format!(
                    "Fields `{}` and `{}` both resolve to column `{}`",
                    a.field, b.field, a.column
                ),
            ));
        }
    }
    let marked: Vec<usize> = columns
        .iter()
        .enumerate()
        .filter_map(|(i, c)| c.primary_key.then_some(i))
        .collect();
    let primary_key = match marked.as_slice() {
        [] => {
            // Convention: a field named `id` is adopted as the key.
            let Some(i) = columns.iter().position(|c| c.field == "id") else {
                return Err(Error::new_spanned(
                    &item.ident,
                    "Entity needs a `#[silo(primary_key)]` field or a field named `id`",
                ));
            };
            columns[i].primary_key = true;
            columns[i].nullable = false;
            i
        }
        [single] => *single,
        [.., extra] => {
            return Err(Error::new(
                columns[*extra].ident.span(),
                "Only one field can be marked as the primary key",
            ));
        }
    };
    Ok(TableMetadata {
        name,
        schema,
        columns,
        skipped,
        primary_key,
    })
}
