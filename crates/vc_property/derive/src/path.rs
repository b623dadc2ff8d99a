//! Paths into `vc_property` used by generated code.
//!
//! Kept in one place so that moving an item in `vc_property` only needs
//! a change here.

use proc_macro2::TokenStream;
use quote::quote;

/// The default crate path, `::vc_property`.
pub(crate) fn vc_property() -> syn::Path {
    syn::parse_quote!(::vc_property)
}

#[inline(always)]
pub(crate) fn reflect_(vc_property_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_property_path::Reflect
    }
}

#[inline(always)]
pub(crate) fn impl_reflect_common_(vc_property_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_property_path::__impl_reflect_common
    }
}

#[inline(always)]
pub(crate) fn reflect_ref_(vc_property_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_property_path::reflection::ReflectRef
    }
}

#[inline(always)]
pub(crate) fn reflect_mut_(vc_property_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_property_path::reflection::ReflectMut
    }
}

#[inline(always)]
pub(crate) fn typed_(vc_property_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_property_path::info::Typed
    }
}

#[inline(always)]
pub(crate) fn type_info_(vc_property_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_property_path::info::TypeInfo
    }
}

#[inline(always)]
pub(crate) fn type_info_cell_(vc_property_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_property_path::info::TypeInfoCell
    }
}

#[inline(always)]
pub(crate) fn member_table_(vc_property_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_property_path::members::MemberTable
    }
}
