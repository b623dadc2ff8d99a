use log::trace;

use crate::Reflect;
use crate::access::accessor::{Accessor, MemberRef, required_len};
use crate::access::{Atom, PropertyExpression};
use crate::convert::{ConvertWith, ConverterRegistry};
use crate::error::{PropertyError, Result};
use crate::info::{KindInfo, TypeInfo};
use crate::meta::describe;
use crate::reflection::ReflectMut;

/// What a write walk stores at its last atom.
pub(crate) enum Payload<'v, S> {
    /// A value, or null.
    Value(Option<Box<dyn Reflect>>),
    /// Raw strings, converted for the destination once it is known.
    Strings(&'v [S]),
}

/// Drives one evaluation of an expression against an object graph.
///
/// Built per call and dropped with it. Walk state is not stored here:
/// each step receives the current object and the atoms left to resolve,
/// so the cursor is the slice itself.
pub(crate) struct EvaluationContext<'e> {
    expression: &'e PropertyExpression,
    converters: &'e ConverterRegistry,
}

impl<'e> EvaluationContext<'e> {
    pub fn new(expression: &'e PropertyExpression, converters: &'e ConverterRegistry) -> Self {
        Self {
            expression,
            converters,
        }
    }

    #[inline]
    fn text(&self) -> &'e str {
        self.expression.as_str()
    }

    fn malformed(&self, message: String) -> PropertyError {
        PropertyError::MalformedPath {
            expression: self.text().into(),
            message,
        }
    }

    /// Resolves the accessor for the first atom of `atoms` on a value of
    /// type `ty`, and returns it with the atoms left over.
    ///
    /// An indexed property consumes the following atom as its index. If
    /// there is none, the bare member is returned when `allow_pending`
    /// is set, and the path is malformed otherwise.
    fn resolve<'a>(
        &self,
        ty: &'static TypeInfo,
        origin: Option<MemberRef>,
        atoms: &'a [Atom],
        allow_pending: bool,
    ) -> Result<(Accessor, &'a [Atom])> {
        let [atom, rest @ ..] = atoms else {
            return Err(self.malformed("nothing left to resolve".to_owned()));
        };

        let accessor = match ty.kind_info() {
            KindInfo::Struct(_) => {
                let member = describe(ty)
                    .and_then(|metadata| MemberRef::lookup(metadata, atom.text()))
                    .ok_or_else(|| PropertyError::NoSuchMember {
                        expression: self.text().into(),
                        member: atom.text().to_owned(),
                        type_path: ty.type_path(),
                    })?;
                let Some(index_type) = member.index_type() else {
                    return Ok((Accessor::Member(member), rest));
                };
                let [index, rest @ ..] = rest else {
                    if allow_pending {
                        return Ok((Accessor::Member(member), rest));
                    }
                    return Err(self.malformed(format!(
                        "indexed property `{}` is not followed by an index",
                        member.name(),
                    )));
                };
                let value = self
                    .converters
                    .parse_value(index_type, index.text(), None, self.text())?;
                let accessor = Accessor::IndexedMember {
                    member,
                    index: value,
                    label: index.text().to_owned(),
                };
                return Ok((accessor, rest));
            }
            KindInfo::List(sequence) | KindInfo::Array(sequence) => {
                let index = atom
                    .as_index()
                    .ok_or_else(|| self.malformed(format!("`{atom}` is not a sequence index")))?;
                Accessor::Element {
                    index,
                    item_type: sequence.item(),
                    origin,
                }
            }
            KindInfo::Map(map) => {
                let key = self
                    .converters
                    .parse_value(map.key(), atom.text(), None, self.text())?;
                Accessor::Entry {
                    key,
                    label: atom.text().to_owned(),
                    value_type: map.value(),
                    origin,
                }
            }
            KindInfo::Optional(_) | KindInfo::Opaque => {
                return Err(PropertyError::NoSuchMember {
                    expression: self.text().into(),
                    member: atom.text().to_owned(),
                    type_path: ty.type_path(),
                });
            }
        };
        Ok((accessor, rest))
    }

    /// Walks the expression down from `root`.
    ///
    /// Stops at the first null and reports it as `None`, whatever atoms
    /// remain. On success, the terminal accessor is returned with the
    /// value.
    pub fn read<'o>(&self, root: &'o dyn Reflect) -> Result<Option<(&'o dyn Reflect, Accessor)>> {
        let mut current = root;
        let mut origin = None;
        let mut atoms = self.expression.atoms();
        loop {
            let (accessor, rest) = self.resolve(current.reflect_type_info(), origin, atoms, false)?;
            let Some(value) = accessor.read(current, self.text())? else {
                trace!("`{}`: `{}` is null", self.text(), accessor.label());
                return Ok(None);
            };
            if rest.is_empty() {
                return Ok(Some((value, accessor)));
            }
            origin = accessor.origin();
            current = value;
            atoms = rest;
        }
    }

    /// Walks the expression down from `root` and stores `payload` at its
    /// end.
    ///
    /// Null intermediates are created on the way. Fixed-size arrays too
    /// short for the next index are replaced by a longer copy, written
    /// back through the member that holds them.
    pub fn write<S: AsRef<str>>(&self, root: &mut dyn Reflect, payload: Payload<'_, S>) -> Result<()> {
        self.write_from(root, None, self.expression.atoms(), payload)
    }

    fn write_from<S: AsRef<str>>(
        &self,
        object: &mut dyn Reflect,
        origin: Option<MemberRef>,
        atoms: &[Atom],
        payload: Payload<'_, S>,
    ) -> Result<()> {
        let (accessor, rest) = self.resolve(object.reflect_type_info(), origin, atoms, false)?;

        let Some(next) = rest.first() else {
            let value = match payload {
                Payload::Value(value) => value,
                Payload::Strings(raw) => {
                    let raw: Vec<&str> = raw.iter().map(AsRef::as_ref).collect();
                    self.converters.parse_strings(
                        accessor.value_type(),
                        &raw,
                        accessor.tag::<ConvertWith>(),
                        &accessor.label(),
                        self.text(),
                    )?
                }
            };
            return accessor.write(object, value, self.text());
        };

        if accessor.read_mut(object, self.text())?.is_none() {
            let created = accessor.create_missing(Some(next), self.text())?;
            trace!(
                "`{}`: created `{}` for `{}`",
                self.text(),
                created.type_path(),
                accessor.label(),
            );
            accessor.write(object, Some(created), self.text())?;
        }

        if let Some(index) = next.as_index() {
            let label = accessor.label();
            let grown = match accessor.read_mut(object, self.text())? {
                Some(child) => match child.reflect_mut() {
                    ReflectMut::Array(array) if index >= array.len() => {
                        let len = required_len(index, &label, self.text())?;
                        array.resized(len).map(|grown| (grown, len))
                    }
                    _ => None,
                },
                None => None,
            };
            if let Some((grown, len)) = grown {
                trace!("`{}`: grew `{label}` to {len} elements", self.text());
                accessor.write(object, Some(grown), self.text())?;
            }
        }

        let Some(child) = accessor.read_mut(object, self.text())? else {
            return Err(self.malformed(format!(
                "`{}` is still null after being created",
                accessor.label(),
            )));
        };
        self.write_from(child, accessor.origin(), rest, payload)
    }

    /// Resolves the terminal accessor from declared types alone, without
    /// touching any value.
    ///
    /// An indexed property may end the path.
    pub fn resolve_terminal(&self, root: &'static TypeInfo) -> Result<Accessor> {
        let mut ty = root;
        let mut origin = None;
        let mut atoms = self.expression.atoms();
        loop {
            let (accessor, rest) = self.resolve(ty, origin, atoms, true)?;
            if rest.is_empty() {
                return Ok(accessor);
            }
            ty = accessor.value_type().declared();
            origin = accessor.origin();
            atoms = rest;
        }
    }
}
