use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectStruct;

/// Generate implementation code for `Reflect` trait.
pub(crate) fn impl_trait_reflect(reflect_struct: &ReflectStruct) -> TokenStream {
    let vc_property_path = reflect_struct.vc_property_path();

    let reflect_ = crate::path::reflect_(vc_property_path);
    let impl_reflect_common_ = crate::path::impl_reflect_common_(vc_property_path);
    let reflect_ref_ = crate::path::reflect_ref_(vc_property_path);
    let reflect_mut_ = crate::path::reflect_mut_(vc_property_path);

    let ident = reflect_struct.ident();

    quote! {
        impl #reflect_ for #ident {
            #impl_reflect_common_!();

            #[inline]
            fn reflect_ref(&self) -> #reflect_ref_<'_> {
                #reflect_ref_::Struct(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> #reflect_mut_<'_> {
                #reflect_mut_::Struct(self)
            }
        }
    }
}
