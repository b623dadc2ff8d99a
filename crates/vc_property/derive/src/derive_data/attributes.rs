use proc_macro2::Span;
use syn::{Attribute, Expr, Ident, Path, Token, parse::ParseStream};

use crate::REFLECT_ATTRIBUTE_NAME;

/// Runs `item` once per comma separated entry of `#[reflect(...)]`.
fn parse_entries(
    input: ParseStream,
    mut item: impl FnMut(ParseStream) -> syn::Result<()>,
) -> syn::Result<()> {
    while !input.is_empty() {
        item(input)?;
        if input.is_empty() {
            break;
        }
        input.parse::<Token![,]>()?;
    }
    Ok(())
}

fn reflect_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident(REFLECT_ATTRIBUTE_NAME))
}

// -----------------------------------------------------------------------------
// Type attributes

/// Attributes applied to the struct itself.
///
/// Examples:
/// - `#[reflect(default)]`
/// - `#[reflect(members = Self::accessors)]`
/// - `#[reflect(crate_path = ::vc_bind::property)]`
#[derive(Default)]
pub(crate) struct TypeAttributes {
    pub default: Option<Span>,
    pub members: Option<Path>,
    pub crate_path: Option<Path>,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in reflect_attrs(attrs) {
            attr.parse_args_with(|input: ParseStream| parse_entries(input, |input| this.parse_entry(input)))?;
        }
        Ok(this)
    }

    fn parse_entry(&mut self, input: ParseStream) -> syn::Result<()> {
        if input.peek(Token![@]) {
            return Err(input.error("tags can only be applied to fields"));
        }

        let ident: Ident = input.parse()?;
        if ident == "default" {
            if self.default.is_some() {
                return Err(syn::Error::new(ident.span(), "duplicate `default`"));
            }
            self.default = Some(ident.span());
        } else if ident == "members" {
            input.parse::<Token![=]>()?;
            if self.members.is_some() {
                return Err(syn::Error::new(ident.span(), "duplicate `members`"));
            }
            self.members = Some(input.parse()?);
        } else if ident == "crate_path" {
            input.parse::<Token![=]>()?;
            if self.crate_path.is_some() {
                return Err(syn::Error::new(ident.span(), "duplicate `crate_path`"));
            }
            self.crate_path = Some(input.parse()?);
        } else if ident == "skip" {
            return Err(syn::Error::new(ident.span(), "`skip` can only be applied to fields"));
        } else {
            return Err(syn::Error::new(
                ident.span(),
                "expected `default`, `members = path` or `crate_path = path`",
            ));
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Field attributes

/// Attributes applied to a named field.
///
/// Examples:
/// - `#[reflect(skip)]`
/// - `#[reflect(@"label", @ConvertWith::new(Upper))]`
#[derive(Default)]
pub(crate) struct FieldAttributes {
    pub skip: Option<Span>,
    pub tags: Vec<Expr>,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in reflect_attrs(attrs) {
            attr.parse_args_with(|input: ParseStream| parse_entries(input, |input| this.parse_entry(input)))?;
        }
        if let (Some(span), false) = (this.skip, this.tags.is_empty()) {
            return Err(syn::Error::new(span, "a skipped field cannot carry tags"));
        }
        Ok(this)
    }

    /// Parse `@` tags and `skip`.
    ///
    /// Examples:
    /// - `#[reflect(@Foo)]`
    /// - `#[reflect(@Bar::baz("qux"))]`
    fn parse_entry(&mut self, input: ParseStream) -> syn::Result<()> {
        if input.peek(Token![@]) {
            input.parse::<Token![@]>()?;
            self.tags.push(input.parse()?);
            return Ok(());
        }

        let ident: Ident = input.parse()?;
        if ident == "skip" {
            self.skip = Some(ident.span());
            Ok(())
        } else {
            Err(syn::Error::new(ident.span(), "expected `skip` or `@tag`"))
        }
    }
}
