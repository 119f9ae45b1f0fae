use proc_macro2::TokenStream;
use quote::quote;
use syn::{Error, GenericArgument, PathArguments, Result, Type};

/// Maps a field type onto its `Value` template and nullability.
///
/// `Option<T>` marks the column nullable and recurses on `T`. A path type
/// that is none of the built-ins is stored as `Varchar`: that is the
/// enum-as-string convention, such fields convert through their own
/// `AsValue` implementation.
pub(crate) fn decode_type(ty: &Type) -> Result<(TokenStream, bool)> {
    let Type::Path(path) = ty else {
        return Err(Error::new_spanned(
            ty,
            "Entity fields must be plain path types",
        ));
    };
    let Some(segment) = path.path.segments.last() else {
        return Err(Error::new_spanned(ty, "Entity fields must have a type name"));
    };
    let ident = segment.ident.to_string();
    let value = match ident.as_str() {
        "Option" => {
            let inner = generic_argument(segment, ty)?;
            let (value, _) = decode_type(inner)?;
            return Ok((value, true));
        }
        "bool" => quote!(::silo::Value::Boolean(None)),
        "i8" => quote!(::silo::Value::Int8(None)),
        "i16" => quote!(::silo::Value::Int16(None)),
        "i32" => quote!(::silo::Value::Int32(None)),
        "i64" => quote!(::silo::Value::Int64(None)),
        "u8" => quote!(::silo::Value::UInt8(None)),
        "u16" => quote!(::silo::Value::UInt16(None)),
        "u32" => quote!(::silo::Value::UInt32(None)),
        "u64" => quote!(::silo::Value::UInt64(None)),
        "f32" => quote!(::silo::Value::Float32(None)),
        "f64" => quote!(::silo::Value::Float64(None)),
        "String" => quote!(::silo::Value::Varchar(None)),
        "Decimal" => quote!(::silo::Value::Decimal(None, 0, 0)),
        "Date" => quote!(::silo::Value::Date(None)),
        "Time" => quote!(::silo::Value::Time(None)),
        "PrimitiveDateTime" => quote!(::silo::Value::Timestamp(None)),
        "Uuid" => quote!(::silo::Value::Uuid(None)),
        "Vec" => {
            let inner = generic_argument(segment, ty)?;
            if matches!(inner, Type::Path(p) if p.path.is_ident("u8")) {
                quote!(::silo::Value::Blob(None))
            } else {
                return Err(Error::new_spanned(
                    ty,
                    "Only Vec<u8> collections can be stored in a column",
                ));
            }
        }
        _ => quote!(::silo::Value::Varchar(None)),
    };
    Ok((value, false))
}

fn generic_argument<'a>(segment: &'a syn::PathSegment, ty: &Type) -> Result<&'a Type> {
    if let PathArguments::AngleBracketed(args) = &segment.arguments {
        if let Some(GenericArgument::Type(inner)) = args.args.first() {
            return Ok(inner);
        }
    }
    Err(Error::new_spanned(ty, "Expected a single type argument"))
}
