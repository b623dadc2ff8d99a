use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;

use crate::derive_data::ReflectStruct;

/// Generate implementation code for `Typed`
///
/// Every field is registered on the `MemberTable` with its tags, then
/// the user's `members` function runs, if any.
pub(crate) fn impl_trait_typed(reflect_struct: &ReflectStruct) -> TokenStream {
    let vc_property_path = reflect_struct.vc_property_path();
    let typed_ = crate::path::typed_(vc_property_path);
    let type_info_ = crate::path::type_info_(vc_property_path);
    let info_cell = crate::path::type_info_cell_(vc_property_path);
    let member_table_ = crate::path::member_table_(vc_property_path);

    let fields = reflect_struct.fields().iter().map(|field| {
        let ident = field.ident;
        let ty = field.ty;
        let name = ident.unraw().to_string();
        let tags = field.attrs.tags.iter().map(|tag| quote!(.insert(#tag)));
        quote! {
            table.field::<#ty>(#name, |this| &this.#ident, |this| &mut this.#ident) #(#tags)*;
        }
    });

    let members = reflect_struct
        .attrs()
        .members
        .as_ref()
        .map(|members| quote!(#members(table);));

    let with_default = reflect_struct
        .attrs()
        .default
        .map(|_| quote!(.with_default::<Self>()));

    let ident = reflect_struct.ident();

    quote! {
        impl #typed_ for #ident {
            fn type_info() -> &'static #type_info_ {
                static CELL: #info_cell = #info_cell::new();
                CELL.get_or_init(|| {
                    #type_info_::structure::<Self>(|table: &mut #member_table_<Self>| {
                        #(#fields)*
                        #members
                    })
                    #with_default
                })
            }
        }
    }
}
