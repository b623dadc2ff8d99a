use core::marker::PhantomData;

use crate::Reflect;
use crate::info::{TypeInfo, Typed};
use crate::members::Tags;

// -----------------------------------------------------------------------------
// Erased accessor functions

pub(crate) trait GetFn: Send + Sync {
    fn get<'a>(&self, this: &'a dyn Reflect) -> Option<&'a dyn Reflect>;

    fn get_mut<'a>(&self, this: &'a mut dyn Reflect) -> Option<&'a mut dyn Reflect>;
}

pub(crate) trait SetFn: Send + Sync {
    fn set(&self, this: &mut dyn Reflect, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;
}

pub(crate) trait IndexedGetFn: Send + Sync {
    fn get<'a>(&self, this: &'a dyn Reflect, index: &dyn Reflect) -> Option<&'a dyn Reflect>;

    fn get_mut<'a>(
        &self,
        this: &'a mut dyn Reflect,
        index: &dyn Reflect,
    ) -> Option<&'a mut dyn Reflect>;
}

pub(crate) trait IndexedSetFn: Send + Sync {
    fn set(
        &self,
        this: &mut dyn Reflect,
        index: &dyn Reflect,
        value: Box<dyn Reflect>,
    ) -> Result<(), Box<dyn Reflect>>;
}

struct FieldFns<T, V> {
    get: fn(&T) -> &V,
    get_mut: fn(&mut T) -> &mut V,
}

impl<T: Reflect, V: Reflect> GetFn for FieldFns<T, V> {
    fn get<'a>(&self, this: &'a dyn Reflect) -> Option<&'a dyn Reflect> {
        Some((self.get)(this.downcast_ref::<T>()?).as_reflect())
    }

    fn get_mut<'a>(&self, this: &'a mut dyn Reflect) -> Option<&'a mut dyn Reflect> {
        Some((self.get_mut)(this.downcast_mut::<T>()?).as_reflect_mut())
    }
}

struct GetterFns<T, V> {
    get: fn(&T) -> Option<&V>,
    get_mut: fn(&mut T) -> Option<&mut V>,
}

impl<T: Reflect, V: Reflect> GetFn for GetterFns<T, V> {
    fn get<'a>(&self, this: &'a dyn Reflect) -> Option<&'a dyn Reflect> {
        (self.get)(this.downcast_ref::<T>()?).map(Reflect::as_reflect)
    }

    fn get_mut<'a>(&self, this: &'a mut dyn Reflect) -> Option<&'a mut dyn Reflect> {
        (self.get_mut)(this.downcast_mut::<T>()?).map(Reflect::as_reflect_mut)
    }
}

struct SetterFn<T, V> {
    set: fn(&mut T, V),
}

impl<T: Reflect, V: Reflect> SetFn for SetterFn<T, V> {
    fn set(&self, this: &mut dyn Reflect, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        let Some(this) = this.downcast_mut::<T>() else {
            return Err(value);
        };
        (self.set)(this, value.take::<V>()?);
        Ok(())
    }
}

struct IndexedGetterFns<T, I, V> {
    get: for<'a> fn(&'a T, &I) -> Option<&'a V>,
    get_mut: for<'a> fn(&'a mut T, &I) -> Option<&'a mut V>,
}

impl<T: Reflect, I: Reflect, V: Reflect> IndexedGetFn for IndexedGetterFns<T, I, V> {
    fn get<'a>(&self, this: &'a dyn Reflect, index: &dyn Reflect) -> Option<&'a dyn Reflect> {
        let index = index.downcast_ref::<I>()?;
        (self.get)(this.downcast_ref::<T>()?, index).map(Reflect::as_reflect)
    }

    fn get_mut<'a>(
        &self,
        this: &'a mut dyn Reflect,
        index: &dyn Reflect,
    ) -> Option<&'a mut dyn Reflect> {
        let index = index.downcast_ref::<I>()?;
        (self.get_mut)(this.downcast_mut::<T>()?, index).map(Reflect::as_reflect_mut)
    }
}

struct IndexedSetterFn<T, I, V> {
    set: fn(&mut T, &I, V),
}

impl<T: Reflect, I: Reflect, V: Reflect> IndexedSetFn for IndexedSetterFn<T, I, V> {
    fn set(
        &self,
        this: &mut dyn Reflect,
        index: &dyn Reflect,
        value: Box<dyn Reflect>,
    ) -> Result<(), Box<dyn Reflect>> {
        let (Some(this), Some(index)) = (this.downcast_mut::<T>(), index.downcast_ref::<I>()) else {
            return Err(value);
        };
        (self.set)(this, index, value.take::<V>()?);
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Declarations

pub(crate) enum Getter {
    Plain(Box<dyn GetFn>),
    Indexed(Box<dyn IndexedGetFn>),
}

pub(crate) enum Setter {
    Plain(Box<dyn SetFn>),
    Indexed(Box<dyn IndexedSetFn>),
}

pub(crate) enum MethodBody {
    Getter(Getter),
    Setter(Setter),
}

/// An accessor method, as registered. Nothing is validated yet.
pub(crate) struct MethodDecl {
    pub name: &'static str,
    pub value_type: fn() -> &'static TypeInfo,
    pub index_type: Option<fn() -> &'static TypeInfo>,
    pub body: MethodBody,
    pub tags: Tags,
}

pub(crate) struct FieldDecl {
    pub name: &'static str,
    pub value_type: fn() -> &'static TypeInfo,
    pub access: Box<dyn GetFn>,
    pub tags: Tags,
}

/// The raw member declarations of one struct.
#[derive(Default)]
pub(crate) struct MemberDeclarations {
    pub methods: Vec<MethodDecl>,
    pub fields: Vec<FieldDecl>,
}

// -----------------------------------------------------------------------------
// MemberTable

/// Registers the members of `T`.
///
/// `#[derive(Reflect)]` registers every named field. Accessor methods
/// are registered by hand, in a function named with
/// `#[reflect(members = path)]`. Their names follow the usual accessor
/// conventions: `getName`/`get_name` and `isActive`/`is_active` read,
/// `setName`/`set_name` write. Names that follow neither convention are
/// ignored.
///
/// Each registration returns the member's [`Tags`].
///
/// # Examples
///
/// ```
/// use vc_property::Reflect;
/// use vc_property::members::MemberTable;
///
/// #[derive(Reflect, Default)]
/// #[reflect(default, members = Self::accessors)]
/// struct Person {
///     #[reflect(skip)]
///     first: String,
/// }
///
/// impl Person {
///     fn accessors(table: &mut MemberTable<Self>) {
///         table.getter("getFirstName", |p| Some(&p.first), |p| Some(&mut p.first));
///         table.setter("setFirstName", |p, v: String| p.first = v);
///     }
/// }
///
/// let names = vc_property::member_names::<Person>();
/// assert_eq!(names.into_iter().collect::<Vec<_>>(), ["firstName"]);
/// ```
pub struct MemberTable<T> {
    declarations: MemberDeclarations,
    _marker: PhantomData<fn(T)>,
}

impl<T: Reflect> MemberTable<T> {
    pub(crate) fn new() -> Self {
        Self {
            declarations: MemberDeclarations::default(),
            _marker: PhantomData,
        }
    }

    pub(crate) fn into_declarations(self) -> MemberDeclarations {
        self.declarations
    }

    fn push_method(&mut self, method: MethodDecl) -> &mut Tags {
        let index = self.declarations.methods.len();
        self.declarations.methods.push(method);
        &mut self.declarations.methods[index].tags
    }

    /// Registers a directly accessible field.
    ///
    /// Fields are only consulted for names no accessor method claims.
    pub fn field<V: Reflect + Typed>(
        &mut self,
        name: &'static str,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
    ) -> &mut Tags {
        let index = self.declarations.fields.len();
        self.declarations.fields.push(FieldDecl {
            name,
            value_type: V::type_info,
            access: Box::new(FieldFns { get, get_mut }),
            tags: Tags::new(),
        });
        &mut self.declarations.fields[index].tags
    }

    /// Registers a read method. Returning `None` reads as null.
    pub fn getter<V: Reflect + Typed>(
        &mut self,
        name: &'static str,
        get: fn(&T) -> Option<&V>,
        get_mut: fn(&mut T) -> Option<&mut V>,
    ) -> &mut Tags {
        self.push_method(MethodDecl {
            name,
            value_type: V::type_info,
            index_type: None,
            body: MethodBody::Getter(Getter::Plain(Box::new(GetterFns { get, get_mut }))),
            tags: Tags::new(),
        })
    }

    /// Registers a write method.
    pub fn setter<V: Reflect + Typed>(&mut self, name: &'static str, set: fn(&mut T, V)) -> &mut Tags {
        self.push_method(MethodDecl {
            name,
            value_type: V::type_info,
            index_type: None,
            body: MethodBody::Setter(Setter::Plain(Box::new(SetterFn { set }))),
            tags: Tags::new(),
        })
    }

    /// Registers a read method taking an index of type `I`.
    ///
    /// Indexed properties are only reachable through an explicit index,
    /// as in `lines[2]`.
    pub fn indexed_getter<I: Reflect + Typed, V: Reflect + Typed>(
        &mut self,
        name: &'static str,
        get: for<'a> fn(&'a T, &I) -> Option<&'a V>,
        get_mut: for<'a> fn(&'a mut T, &I) -> Option<&'a mut V>,
    ) -> &mut Tags {
        self.push_method(MethodDecl {
            name,
            value_type: V::type_info,
            index_type: Some(I::type_info),
            body: MethodBody::Getter(Getter::Indexed(Box::new(IndexedGetterFns { get, get_mut }))),
            tags: Tags::new(),
        })
    }

    /// Registers a write method taking an index of type `I`.
    pub fn indexed_setter<I: Reflect + Typed, V: Reflect + Typed>(
        &mut self,
        name: &'static str,
        set: fn(&mut T, &I, V),
    ) -> &mut Tags {
        self.push_method(MethodDecl {
            name,
            value_type: V::type_info,
            index_type: Some(I::type_info),
            body: MethodBody::Setter(Setter::Indexed(Box::new(IndexedSetterFn { set }))),
            tags: Tags::new(),
        })
    }
}
