// -----------------------------------------------------------------------------
// Modules

mod trait_reflect;
mod trait_typed;

// -----------------------------------------------------------------------------
// Internal API

use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectStruct;

use trait_reflect::impl_trait_reflect;
use trait_typed::impl_trait_typed;

/// Generates every impl `#[derive(Reflect)]` provides for a struct.
pub(crate) fn impl_struct(reflect_struct: &ReflectStruct) -> TokenStream {
    let typed_impl = impl_trait_typed(reflect_struct);
    let reflect_impl = impl_trait_reflect(reflect_struct);

    quote! {
        #typed_impl

        #reflect_impl
    }
}
