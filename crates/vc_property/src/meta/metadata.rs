use alloc::collections::BTreeSet;
use core::any::{Any, TypeId};

use log::{debug, warn};

use crate::info::{StructInfo, TypeInfo};
use crate::members::{FieldDecl, GetFn, Getter, MethodBody, MethodDecl, Setter, Tags};
use crate::meta::naming::{Prefix, split_accessor};
use crate::utils::{HashMap, new_map};

// -----------------------------------------------------------------------------
// Descriptors

/// A validated property: a getter, a setter, or a matching pair.
pub struct PropertyDescriptor {
    name: String,
    value_type: fn() -> &'static TypeInfo,
    index_type: Option<fn() -> &'static TypeInfo>,
    getter: Option<MethodDecl>,
    setter: Option<MethodDecl>,
}

impl PropertyDescriptor {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared type of the property's value.
    #[inline]
    pub fn value_type(&self) -> &'static TypeInfo {
        (self.value_type)()
    }

    /// The index type, for properties that take an index.
    #[inline]
    pub fn index_type(&self) -> Option<&'static TypeInfo> {
        self.index_type.map(|f| f())
    }

    #[inline]
    pub fn is_indexed(&self) -> bool {
        self.index_type.is_some()
    }

    #[inline]
    pub fn is_readable(&self) -> bool {
        self.getter.is_some()
    }

    #[inline]
    pub fn is_writable(&self) -> bool {
        self.setter.is_some()
    }

    pub(crate) fn getter(&self) -> Option<&Getter> {
        match &self.getter.as_ref()?.body {
            MethodBody::Getter(getter) => Some(getter),
            MethodBody::Setter(_) => None,
        }
    }

    pub(crate) fn setter(&self) -> Option<&Setter> {
        match &self.setter.as_ref()?.body {
            MethodBody::Setter(setter) => Some(setter),
            MethodBody::Getter(_) => None,
        }
    }

    pub fn getter_tags(&self) -> Option<&Tags> {
        self.getter.as_ref().map(|m| &m.tags)
    }

    pub fn setter_tags(&self) -> Option<&Tags> {
        self.setter.as_ref().map(|m| &m.tags)
    }
}

/// A directly accessible field.
pub struct FieldDescriptor {
    decl: FieldDecl,
}

impl FieldDescriptor {
    #[inline]
    pub fn name(&self) -> &'static str {
        self.decl.name
    }

    #[inline]
    pub fn value_type(&self) -> &'static TypeInfo {
        (self.decl.value_type)()
    }

    #[inline]
    pub fn tags(&self) -> &Tags {
        &self.decl.tags
    }

    #[inline]
    pub(crate) fn access(&self) -> &dyn GetFn {
        &*self.decl.access
    }
}

// -----------------------------------------------------------------------------
// TypeMetadata

/// Validated members of one struct type.
///
/// Built once per type and shared for the rest of the process, see
/// [`describe`](crate::meta::describe).
pub struct TypeMetadata {
    type_info: &'static TypeInfo,
    properties: HashMap<String, PropertyDescriptor>,
    fields: HashMap<&'static str, FieldDescriptor>,
}

impl TypeMetadata {
    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        self.type_info
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.get(name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    pub fn properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.values()
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.values()
    }

    /// Names of all properties and fields, sorted.
    pub fn member_names(&self) -> BTreeSet<String> {
        self.properties
            .keys()
            .cloned()
            .chain(self.fields.keys().map(|name| (*name).to_owned()))
            .collect()
    }

    /// Validates the raw declarations of a struct.
    ///
    /// Never fails: accessors that break the naming or pairing rules are
    /// dropped with a warning, and the rest of the type stays usable.
    pub(crate) fn build(type_info: &'static TypeInfo, info: &StructInfo) -> Self {
        let declarations = info.declarations();
        let type_path = type_info.type_path();

        let mut candidates: HashMap<String, Candidate> = new_map();
        for method in declarations.methods {
            let Some((prefix, name)) = split_accessor(method.name) else {
                debug!("`{type_path}`: `{}` is not an accessor name, ignored", method.name);
                continue;
            };
            let is_getter = matches!(method.body, MethodBody::Getter(_));
            match prefix {
                Prefix::Get | Prefix::Is if !is_getter => {
                    warn!("`{type_path}`: setter `{}` uses a getter name, ignored", method.name);
                    continue;
                }
                Prefix::Set if is_getter => {
                    warn!("`{type_path}`: getter `{}` uses a setter name, ignored", method.name);
                    continue;
                }
                Prefix::Is if (method.value_type)().type_id() != TypeId::of::<bool>() => {
                    debug!("`{type_path}`: `{}` does not return bool, ignored", method.name);
                    continue;
                }
                _ => {}
            }

            let candidate = candidates.entry(name).or_default();
            if is_getter {
                candidate.getters.push(method);
            } else {
                candidate.setters.push(method);
            }
        }

        let mut properties = new_map();
        for (name, candidate) in candidates {
            match candidate.validate(&name) {
                Ok(property) => {
                    properties.insert(name, property);
                }
                Err(reason) => warn!("`{type_path}`: property `{name}` dropped: {reason}"),
            }
        }

        let mut fields: HashMap<&'static str, FieldDescriptor> = new_map();
        for decl in declarations.fields {
            if fields.contains_key(decl.name) {
                warn!("`{type_path}`: field `{}` declared twice, keeping the first", decl.name);
                continue;
            }
            fields.insert(decl.name, FieldDescriptor { decl });
        }

        debug!(
            "built metadata for `{type_path}`: {} properties, {} fields",
            properties.len(),
            fields.len(),
        );

        Self {
            type_info,
            properties,
            fields,
        }
    }
}

// -----------------------------------------------------------------------------
// Validation

#[derive(Default)]
struct Candidate {
    getters: Vec<MethodDecl>,
    setters: Vec<MethodDecl>,
}

impl Candidate {
    fn validate(mut self, name: &str) -> Result<PropertyDescriptor, &'static str> {
        if self.getters.len() > 1 || self.setters.len() > 1 {
            return Err("conflicting accessor methods");
        }
        let getter = self.getters.pop();
        let setter = self.setters.pop();

        if let (Some(getter), Some(setter)) = (&getter, &setter) {
            if getter.index_type.is_some() != setter.index_type.is_some() {
                return Err("getter and setter disagree on taking an index");
            }
            if let (Some(get_index), Some(set_index)) = (getter.index_type, setter.index_type)
                && get_index().type_id() != set_index().type_id()
            {
                return Err("getter and setter take different index types");
            }
            if (getter.value_type)().type_id() != (setter.value_type)().type_id() {
                return Err("getter and setter disagree on the value type");
            }
        }

        let Some((value_type, index_type)) = getter
            .as_ref()
            .or(setter.as_ref())
            .map(|method| (method.value_type, method.index_type))
        else {
            return Err("no accessor methods");
        };

        Ok(PropertyDescriptor {
            name: name.to_owned(),
            value_type,
            index_type,
            getter,
            setter,
        })
    }
}

// -----------------------------------------------------------------------------
// Tag lookup

impl PropertyDescriptor {
    /// Looks a tag up on the getter, then on the setter.
    pub fn tag<T: Any>(&self) -> Option<&T> {
        self.getter_tags()
            .and_then(Tags::get::<T>)
            .or_else(|| self.setter_tags().and_then(Tags::get::<T>))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::info::Typed;
    use crate::members::MemberTable;
    use crate::meta::describe;
    use crate::{Evaluator, PropertyError, Reflect, member_names};

    /// One valid property next to one property per validation rule.
    #[derive(Reflect, Default)]
    #[reflect(default, members = Self::accessors)]
    struct Gadget {
        #[reflect(skip)]
        good: String,
        #[reflect(skip)]
        count: u32,
        #[reflect(skip)]
        slots: Vec<u8>,
        #[reflect(skip)]
        label: String,
        #[reflect(skip)]
        ready: u8,
    }

    impl Gadget {
        fn accessors(table: &mut MemberTable<Self>) {
            table.getter("getGood", |g| Some(&g.good), |g| Some(&mut g.good));
            table.setter("setGood", |g, good: String| g.good = good);

            table.getter("getCount", |g| Some(&g.count), |g| Some(&mut g.count));
            table.setter("setCount", |g, count: String| g.count = count.len() as u32);

            table.getter("getSlot", |g| g.slots.first(), |g| g.slots.first_mut());
            table.indexed_setter::<usize, u8>("setSlot", Self::set_slot);

            table.getter("getLabel", |g| Some(&g.label), |g| Some(&mut g.label));
            table.getter("get_label", |g| Some(&g.label), |g| Some(&mut g.label));

            table.getter("isReady", |g| Some(&g.ready), |g| Some(&mut g.ready));
        }

        fn set_slot(&mut self, index: &usize, value: u8) {
            if let Some(slot) = self.slots.get_mut(*index) {
                *slot = value;
            }
        }
    }

    fn assert_dropped(name: &str) {
        let metadata = describe(Gadget::type_info()).unwrap();
        assert!(metadata.property(name).is_none(), "{name}");
        assert!(!member_names::<Gadget>().contains(name), "{name}");

        let mut gadget = Gadget::default();
        let evaluator = Evaluator::default();
        let err = evaluator.get_reflect(name, &gadget).unwrap_err();
        assert!(matches!(err, PropertyError::NoSuchMember { .. }), "{name}");

        evaluator.set_strings("good", &mut gadget, &["kept"]).unwrap();
        assert_eq!(evaluator.get_string("good", &gadget).unwrap().as_deref(), Some("kept"));
    }

    #[test]
    fn disagreeing_value_types_drop_the_property() {
        assert_dropped("count");
    }

    #[test]
    fn disagreeing_index_arity_drops_the_property() {
        assert_dropped("slot");
    }

    #[test]
    fn conflicting_accessors_drop_the_property() {
        assert_dropped("label");
    }

    #[test]
    fn non_bool_is_accessor_is_ignored() {
        assert_dropped("ready");
    }

    #[test]
    fn valid_pair_is_kept() {
        let metadata = describe(Gadget::type_info()).unwrap();
        let good = metadata.property("good").unwrap();
        assert!(good.is_readable() && good.is_writable());
        assert!(!good.is_indexed());
        assert!(good.value_type().is::<String>());
        assert_eq!(member_names::<Gadget>().into_iter().collect::<Vec<_>>(), ["good"]);
    }
}
