use core::any::Any;

use crate::Reflect;
use crate::access::Atom;
use crate::convert::prepare;
use crate::error::{PropertyError, Result};
use crate::info::{KindInfo, TypeInfo};
use crate::members::{Getter, Setter};
use crate::meta::{FieldDescriptor, PropertyDescriptor, TypeMetadata};
use crate::reflection::{ReflectMut, ReflectRef};

// -----------------------------------------------------------------------------
// MemberRef

/// A named member of a struct: a property, a field, or both when a
/// property is backed by a field of the same name.
#[derive(Clone, Copy)]
pub(crate) struct MemberRef {
    metadata: &'static TypeMetadata,
    property: Option<&'static PropertyDescriptor>,
    field: Option<&'static FieldDescriptor>,
}

impl MemberRef {
    pub fn lookup(metadata: &'static TypeMetadata, name: &str) -> Option<Self> {
        let property = metadata.property(name);
        let field = metadata.field(name);
        (property.is_some() || field.is_some()).then_some(Self {
            metadata,
            property,
            field,
        })
    }

    pub fn name(&self) -> &'static str {
        match (self.property, self.field) {
            (Some(property), _) => property.name(),
            (None, Some(field)) => field.name(),
            (None, None) => "",
        }
    }

    pub fn value_type(&self) -> &'static TypeInfo {
        match (self.property, self.field) {
            (Some(property), _) => property.value_type(),
            (None, Some(field)) => field.value_type(),
            (None, None) => self.metadata.type_info(),
        }
    }

    pub fn index_type(&self) -> Option<&'static TypeInfo> {
        self.property?.index_type()
    }

    /// Tags are looked up on the getter, the setter, then the field.
    pub fn tag<T: Any>(&self) -> Option<&'static T> {
        self.property
            .and_then(PropertyDescriptor::tag::<T>)
            .or_else(|| self.field.and_then(|field| field.tags().get::<T>()))
    }

    fn unreadable(&self, expression: &str) -> PropertyError {
        PropertyError::Unreadable {
            expression: expression.into(),
            member: self.name().to_owned(),
        }
    }

    fn unwritable(&self, expression: &str) -> PropertyError {
        PropertyError::Unwritable {
            expression: expression.into(),
            member: self.name().to_owned(),
        }
    }

    /// Reads through the property's getter, or through the field when
    /// no property of that name exists.
    fn read<'o>(&self, object: &'o dyn Reflect, expression: &str) -> Result<Option<&'o dyn Reflect>> {
        match (self.property, self.field) {
            (Some(property), _) => match property.getter() {
                Some(Getter::Plain(getter)) => Ok(getter.get(object)),
                _ => Err(self.unreadable(expression)),
            },
            (None, Some(field)) => Ok(field.access().get(object)),
            (None, None) => Err(self.unreadable(expression)),
        }
    }

    fn read_mut<'o>(
        &self,
        object: &'o mut dyn Reflect,
        expression: &str,
    ) -> Result<Option<&'o mut dyn Reflect>> {
        match (self.property, self.field) {
            (Some(property), _) => match property.getter() {
                Some(Getter::Plain(getter)) => Ok(getter.get_mut(object)),
                _ => Err(self.unreadable(expression)),
            },
            (None, Some(field)) => Ok(field.access().get_mut(object)),
            (None, None) => Err(self.unreadable(expression)),
        }
    }

    fn write(&self, object: &mut dyn Reflect, value: Box<dyn Reflect>, expression: &str) -> Result<()> {
        let rejected = |value: Box<dyn Reflect>| mismatch(self.name(), self.value_type(), &*value, expression);
        match (self.property, self.field) {
            (Some(property), _) => match property.setter() {
                Some(Setter::Plain(setter)) => setter.set(object, value).map_err(rejected),
                _ => Err(self.unwritable(expression)),
            },
            (None, Some(field)) => match field.access().get_mut(object) {
                Some(slot) => slot.set(value).map_err(rejected),
                None => Err(self.unwritable(expression)),
            },
            (None, None) => Err(self.unwritable(expression)),
        }
    }
}

/// Number of elements a sequence needs to hold `index`.
pub(crate) fn required_len(index: usize, label: &str, expression: &str) -> Result<usize> {
    index.checked_add(1).ok_or_else(|| PropertyError::MalformedPath {
        expression: expression.into(),
        message: format!("index {index} of `{label}` is too large"),
    })
}

fn mismatch(member: &str, expected: &TypeInfo, found: &dyn Reflect, expression: &str) -> PropertyError {
    PropertyError::TypeMismatch {
        expression: expression.into(),
        member: member.to_owned(),
        expected: expected.type_path(),
        found: found.type_path(),
    }
}

fn unwrap_optional(value: &dyn Reflect) -> Option<&dyn Reflect> {
    match value.reflect_ref() {
        ReflectRef::Optional(optional) => optional.value(),
        _ => Some(value),
    }
}

fn unwrap_optional_mut(value: &mut dyn Reflect) -> Option<&mut dyn Reflect> {
    if !value.reflect_type_info().is_optional() {
        return Some(value);
    }
    match value.reflect_mut() {
        ReflectMut::Optional(optional) => optional.value_mut(),
        _ => None,
    }
}

// -----------------------------------------------------------------------------
// Accessor

/// One step of a path walk: how to reach a child from its parent.
///
/// Reads report null as `None`. Optional slots are seen through, so a
/// `Some` read always yields the inner value.
pub(crate) enum Accessor {
    /// A property or field looked up by name.
    Member(MemberRef),
    /// A property that takes an index, with the index already converted.
    IndexedMember {
        member: MemberRef,
        index: Box<dyn Reflect>,
        label: String,
    },
    /// An element of a list or array.
    Element {
        index: usize,
        item_type: &'static TypeInfo,
        origin: Option<MemberRef>,
    },
    /// A map entry, with the key already converted.
    Entry {
        key: Box<dyn Reflect>,
        label: String,
        value_type: &'static TypeInfo,
        origin: Option<MemberRef>,
    },
}

impl Accessor {
    /// The declared type of the addressed slot, which may be optional.
    pub fn value_type(&self) -> &'static TypeInfo {
        match self {
            Self::Member(member) | Self::IndexedMember { member, .. } => member.value_type(),
            Self::Element { item_type, .. } => item_type,
            Self::Entry { value_type, .. } => value_type,
        }
    }

    /// The struct member this step belongs to.
    ///
    /// Elements and entries belong to the member holding their
    /// collection, if any.
    pub fn origin(&self) -> Option<MemberRef> {
        match self {
            Self::Member(member) | Self::IndexedMember { member, .. } => Some(*member),
            Self::Element { origin, .. } | Self::Entry { origin, .. } => *origin,
        }
    }

    pub fn tag<T: Any>(&self) -> Option<&'static T> {
        self.origin()?.tag::<T>()
    }

    /// A readable name for error messages.
    pub fn label(&self) -> String {
        let origin = self.origin().map_or("", |member| member.name());
        match self {
            Self::Member(member) => member.name().to_owned(),
            Self::IndexedMember { label, .. } | Self::Entry { label, .. } => format!("{origin}[{label}]"),
            Self::Element { index, .. } => format!("{origin}[{index}]"),
        }
    }

    fn wrong_container(&self, expression: &str) -> PropertyError {
        PropertyError::MalformedPath {
            expression: expression.into(),
            message: format!("`{}` does not address a container of the expected kind", self.label()),
        }
    }

    pub fn read<'o>(&self, object: &'o dyn Reflect, expression: &str) -> Result<Option<&'o dyn Reflect>> {
        let slot = match self {
            Self::Member(member) => member.read(object, expression)?,
            Self::IndexedMember { member, index, .. } => {
                match member.property.and_then(PropertyDescriptor::getter) {
                    Some(Getter::Indexed(getter)) => getter.get(object, &**index),
                    _ => return Err(member.unreadable(expression)),
                }
            }
            Self::Element { index, .. } => match object.reflect_ref() {
                ReflectRef::List(list) => list.get(*index),
                ReflectRef::Array(array) => array.get(*index),
                _ => return Err(self.wrong_container(expression)),
            },
            Self::Entry { key, .. } => match object.reflect_ref() {
                ReflectRef::Map(map) => map.get(&**key),
                _ => return Err(self.wrong_container(expression)),
            },
        };
        Ok(slot.and_then(unwrap_optional))
    }

    pub fn read_mut<'o>(
        &self,
        object: &'o mut dyn Reflect,
        expression: &str,
    ) -> Result<Option<&'o mut dyn Reflect>> {
        let slot = match self {
            Self::Member(member) => member.read_mut(object, expression)?,
            Self::IndexedMember { member, index, .. } => {
                match member.property.and_then(PropertyDescriptor::getter) {
                    Some(Getter::Indexed(getter)) => getter.get_mut(object, &**index),
                    _ => return Err(member.unreadable(expression)),
                }
            }
            Self::Element { index, .. } => match object.reflect_mut() {
                ReflectMut::List(list) => list.get_mut(*index),
                ReflectMut::Array(array) => array.get_mut(*index),
                _ => return Err(self.wrong_container(expression)),
            },
            Self::Entry { key, .. } => match object.reflect_mut() {
                ReflectMut::Map(map) => map.get_mut(&**key),
                _ => return Err(self.wrong_container(expression)),
            },
        };
        Ok(slot.and_then(unwrap_optional_mut))
    }

    /// Stores `value`, or null for `None`, into the addressed slot.
    ///
    /// Lists grow to reach the index, padding with default elements.
    /// Arrays never grow here; the walker replaces them beforehand.
    pub fn write(
        &self,
        object: &mut dyn Reflect,
        value: Option<Box<dyn Reflect>>,
        expression: &str,
    ) -> Result<()> {
        let target = self.value_type();
        let label = self.label();
        let value = prepare(target, value, &label, expression)?;

        match self {
            Self::Member(member) => member.write(object, value, expression),
            Self::IndexedMember { member, index, .. } => {
                match member.property.and_then(PropertyDescriptor::setter) {
                    Some(Setter::Indexed(setter)) => setter
                        .set(object, &**index, value)
                        .map_err(|value| mismatch(&label, target, &*value, expression)),
                    _ => Err(member.unwritable(expression)),
                }
            }
            Self::Element { index, item_type, .. } => match object.reflect_mut() {
                ReflectMut::List(list) => {
                    if let Some(slot) = list.get_mut(*index) {
                        return slot
                            .set(value)
                            .map_err(|value| mismatch(&label, target, &*value, expression));
                    }
                    required_len(*index, &label, expression)?;
                    while list.len() < *index {
                        let padding = item_type.create_default().ok_or_else(|| {
                            PropertyError::Instantiation {
                                expression: expression.into(),
                                type_path: item_type.type_path(),
                            }
                        })?;
                        list.push(padding)
                            .map_err(|value| mismatch(&label, target, &*value, expression))?;
                    }
                    list.push(value)
                        .map_err(|value| mismatch(&label, target, &*value, expression))
                }
                ReflectMut::Array(array) => match array.get_mut(*index) {
                    Some(slot) => slot
                        .set(value)
                        .map_err(|value| mismatch(&label, target, &*value, expression)),
                    None => Err(PropertyError::MalformedPath {
                        expression: expression.into(),
                        message: format!("index {index} is out of bounds for `{label}`"),
                    }),
                },
                _ => Err(self.wrong_container(expression)),
            },
            Self::Entry { key, .. } => match object.reflect_mut() {
                ReflectMut::Map(map) => map
                    .insert(&**key, value)
                    .map_err(|value| mismatch(&label, target, &*value, expression)),
                _ => Err(self.wrong_container(expression)),
            },
        }
    }

    /// Builds the missing value of this slot, so a write can continue
    /// below it.
    ///
    /// Arrays are sized by `hint`, the atom that will index them.
    pub fn create_missing(&self, hint: Option<&Atom>, expression: &str) -> Result<Box<dyn Reflect>> {
        let declared = self.value_type().declared();
        let instantiation = |info: &'static TypeInfo| PropertyError::Instantiation {
            expression: expression.into(),
            type_path: info.type_path(),
        };

        let KindInfo::Array(sequence) = declared.kind_info() else {
            return declared.create_default().ok_or_else(|| instantiation(declared));
        };
        let Some(index) = hint.and_then(Atom::as_index) else {
            return Err(PropertyError::MissingIndex {
                expression: expression.into(),
                member: self.label(),
            });
        };
        let len = required_len(index, &self.label(), expression)?;
        let item = sequence.item();
        let items = (0..len)
            .map(|_| item.create_default())
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| instantiation(item))?;
        sequence.from_items(items).map_err(|_| instantiation(declared))
    }
}
