//! See [`Reflect`].
#![cfg_attr(docsrs, feature(doc_cfg))]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static REFLECT_ATTRIBUTE_NAME: &str = "reflect";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Struct Reflection Derivation
///
/// `#[derive(Reflect)]` implements `Typed` and `Reflect` for a struct with
/// named fields. Every field becomes a member the evaluator can read and
/// write by name; the field types must implement `Reflect` and `Typed`
/// themselves.
///
/// Tuple structs, unit structs, enums, unions and generic types are
/// rejected.
///
/// ## Default construction
///
/// Mark the type with `default` if it implements [`Default`]. Missing
/// values of the type can then be created when a write walks through
/// them.
///
/// ```rust, ignore
/// #[derive(Reflect, Default)]
/// #[reflect(default)]
/// struct Address {
///     city: String,
/// }
/// ```
///
/// This attribute can only be applied at the type level.
///
/// ## Accessor methods
///
/// `members = path` names a function that registers accessor methods
/// on top of the fields. It receives the `MemberTable` of the type. A
/// property hides the field of the same name, even where it lacks a
/// getter or a setter.
///
/// ```rust, ignore
/// #[derive(Reflect)]
/// #[reflect(members = Self::accessors)]
/// struct User {
///     email: String,
/// }
///
/// impl User {
///     fn accessors(table: &mut MemberTable<Self>) {
///         table.getter("getEmail", |u| Some(&u.email), |u| Some(&mut u.email));
///         table.setter("setEmail", |u, v: String| u.email = v.to_lowercase());
///     }
/// }
/// ```
///
/// This attribute can only be applied at the type level.
///
/// ## Tags
///
/// `@expr` attaches the value of `expr` to a field as a tag. Tags are
/// stored by type, so a later tag of the same type replaces an earlier
/// one.
///
/// ```rust, ignore
/// #[derive(Reflect)]
/// struct Upload {
///     #[reflect(@ConvertWith::new(SizeConverter), @"bytes")]
///     size: u64,
/// }
/// ```
///
/// This attribute can only be applied at the field level.
///
/// ## skip
///
/// `skip` leaves a field out of the member table. It can still be
/// reached through accessor methods.
///
/// This attribute can only be applied at the field level.
///
/// ## Crate path
///
/// Generated code refers to `::vc_property`. Use `crate_path = path`
/// when the crate is reached under another name, such as
/// `::vc_bind::property`.
#[proc_macro_derive(Reflect, attributes(reflect))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match derive_data::ReflectStruct::from_input(&ast) {
        Ok(reflect_struct) => impls::impl_struct(&reflect_struct).into(),
        Err(err) => err.into_compile_error().into(),
    }
}
