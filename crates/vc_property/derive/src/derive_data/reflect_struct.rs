use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, Ident, Path, Type};

use super::{FieldAttributes, TypeAttributes};

/// A named field that takes part in reflection.
pub(crate) struct StructField<'a> {
    pub ident: &'a Ident,
    pub ty: &'a Type,
    pub attrs: FieldAttributes,
}

/// Everything the derive needs to know about a struct.
pub(crate) struct ReflectStruct<'a> {
    ident: &'a Ident,
    attrs: TypeAttributes,
    vc_property_path: Path,
    fields: Vec<StructField<'a>>,
}

impl<'a> ReflectStruct<'a> {
    pub fn from_input(input: &'a DeriveInput) -> syn::Result<Self> {
        let Data::Struct(data) = &input.data else {
            return Err(syn::Error::new(
                input.ident.span(),
                "`Reflect` can only be derived for structs with named fields",
            ));
        };
        let Fields::Named(named) = &data.fields else {
            return Err(syn::Error::new(
                data.fields.span(),
                "`Reflect` can only be derived for structs with named fields",
            ));
        };
        if !input.generics.params.is_empty() {
            return Err(syn::Error::new(
                input.generics.span(),
                "`Reflect` cannot be derived for generic structs",
            ));
        }

        let mut attrs = TypeAttributes::parse_attrs(&input.attrs)?;
        let vc_property_path = attrs.crate_path.take().unwrap_or_else(crate::path::vc_property);

        let mut fields = Vec::with_capacity(named.named.len());
        for field in &named.named {
            let field_attrs = FieldAttributes::parse_attrs(&field.attrs)?;
            if field_attrs.skip.is_some() {
                continue;
            }
            let Some(ident) = &field.ident else {
                continue;
            };
            fields.push(StructField {
                ident,
                ty: &field.ty,
                attrs: field_attrs,
            });
        }

        Ok(Self {
            ident: &input.ident,
            attrs,
            vc_property_path,
            fields,
        })
    }

    #[inline]
    pub fn ident(&self) -> &Ident {
        self.ident
    }

    #[inline]
    pub fn attrs(&self) -> &TypeAttributes {
        &self.attrs
    }

    #[inline]
    pub fn vc_property_path(&self) -> &Path {
        &self.vc_property_path
    }

    #[inline]
    pub fn fields(&self) -> &[StructField<'a>] {
        &self.fields
    }
}
