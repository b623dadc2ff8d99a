use alloc::collections::BTreeSet;
use core::any::{Any, type_name};

use log::trace;

use crate::Reflect;
use crate::access::{EvaluationContext, Payload, PropertyExpression};
use crate::convert::{ConvertWith, ConverterRegistry};
use crate::error::{PropertyError, Result};
use crate::info::Typed;
use crate::meta::describe;

/// Evaluates property expressions against object graphs.
///
/// An evaluator only borrows the [`ConverterRegistry`] it converts raw
/// strings with, so it is cheap to create per call. The [`Default`]
/// evaluator uses [`ConverterRegistry::shared`].
///
/// # Examples
///
/// ```
/// use vc_property::{Evaluator, Reflect};
///
/// #[derive(Reflect, Default)]
/// #[reflect(default)]
/// struct Address {
///     city: String,
/// }
///
/// #[derive(Reflect, Default)]
/// #[reflect(default)]
/// struct User {
///     name: String,
///     address: Option<Address>,
/// }
///
/// let evaluator = Evaluator::default();
/// let mut user = User::default();
///
/// assert_eq!(evaluator.get_value::<String>("address.city", &user).unwrap(), None);
///
/// evaluator.set_strings("address.city", &mut user, &["Lyon"]).unwrap();
/// assert_eq!(user.address.as_ref().map(|a| a.city.as_str()), Some("Lyon"));
/// ```
#[derive(Clone, Copy)]
pub struct Evaluator<'r> {
    converters: &'r ConverterRegistry,
}

impl Default for Evaluator<'static> {
    fn default() -> Self {
        Self::new(ConverterRegistry::shared())
    }
}

impl<'r> Evaluator<'r> {
    #[inline]
    pub const fn new(converters: &'r ConverterRegistry) -> Self {
        Self { converters }
    }

    #[inline]
    pub fn converters(&self) -> &'r ConverterRegistry {
        self.converters
    }

    /// Reads the value `expression` addresses.
    ///
    /// Returns `None` as soon as a null is met on the way, even if atoms
    /// remain. Optional slots holding a value are seen through.
    pub fn get_reflect<'o>(&self, expression: &str, root: &'o dyn Reflect) -> Result<Option<&'o dyn Reflect>> {
        let expression = PropertyExpression::parse(expression)?;
        let context = EvaluationContext::new(&expression, self.converters);
        Ok(context.read(root)?.map(|(value, _)| value))
    }

    /// Reads the value `expression` addresses as a `T`.
    ///
    /// For an `Option<X>` slot, `T` is `X`.
    pub fn get_value<'o, T: Reflect>(&self, expression: &str, root: &'o dyn Reflect) -> Result<Option<&'o T>> {
        let parsed = PropertyExpression::parse(expression)?;
        let context = EvaluationContext::new(&parsed, self.converters);
        let Some((value, accessor)) = context.read(root)? else {
            return Ok(None);
        };
        match value.downcast_ref::<T>() {
            Some(value) => Ok(Some(value)),
            None => Err(PropertyError::TypeMismatch {
                expression: expression.into(),
                member: accessor.label(),
                expected: type_name::<T>(),
                found: value.type_path(),
            }),
        }
    }

    /// Reads the value `expression` addresses and renders it as a
    /// string.
    ///
    /// A [`ConvertWith`] tag on the member takes precedence over the
    /// registry.
    pub fn get_string(&self, expression: &str, root: &dyn Reflect) -> Result<Option<String>> {
        let parsed = PropertyExpression::parse(expression)?;
        let context = EvaluationContext::new(&parsed, self.converters);
        let Some((value, accessor)) = context.read(root)? else {
            return Ok(None);
        };
        self.converters
            .format_value(value, accessor.tag::<ConvertWith>(), expression)
            .map(Some)
    }

    /// Stores `value` at `expression`, creating null intermediates.
    ///
    /// `value` may be of the slot's type, of the inner type of an
    /// optional slot, or a collection holding exactly one such value.
    pub fn set_value<V: Reflect>(&self, expression: &str, root: &mut dyn Reflect, value: V) -> Result<()> {
        self.set_boxed(expression, root, Some(Box::new(value)))
    }

    /// Stores an already boxed value, or null for `None`.
    pub fn set_boxed(
        &self,
        expression: &str,
        root: &mut dyn Reflect,
        value: Option<Box<dyn Reflect>>,
    ) -> Result<()> {
        let parsed = PropertyExpression::parse(expression)?;
        trace!("setting `{expression}`");
        EvaluationContext::new(&parsed, self.converters).write::<&str>(root, Payload::Value(value))
    }

    /// Stores null at `expression`. The slot must be optional.
    pub fn set_null(&self, expression: &str, root: &mut dyn Reflect) -> Result<()> {
        self.set_boxed(expression, root, None)
    }

    /// Converts `raw` for the destination member and stores the result.
    ///
    /// Sequence members take one element per string. Other members take
    /// a single string; none at all stores null.
    pub fn set_strings<S: AsRef<str>>(&self, expression: &str, root: &mut dyn Reflect, raw: &[S]) -> Result<()> {
        let parsed = PropertyExpression::parse(expression)?;
        trace!("setting `{expression}` from {} string(s)", raw.len());
        EvaluationContext::new(&parsed, self.converters).write(root, Payload::Strings(raw))
    }

    /// Returns the tag of type `T` attached to the member `expression`
    /// ends at.
    ///
    /// The path is resolved from declared types, so null values on the
    /// way do not hide the tag. Elements and entries report the tags of
    /// the member holding their collection.
    pub fn get_tag<T: Any>(&self, expression: &str, root: &dyn Reflect) -> Result<Option<&'static T>> {
        let parsed = PropertyExpression::parse(expression)?;
        let context = EvaluationContext::new(&parsed, self.converters);
        let accessor = context.resolve_terminal(root.reflect_type_info())?;
        Ok(accessor.tag::<T>())
    }
}

// -----------------------------------------------------------------------------
// Free functions

/// Reads `expression` from `root` with the shared converters.
///
/// See [`Evaluator::get_value`].
pub fn get_value<'o, T: Reflect>(expression: &str, root: &'o dyn Reflect) -> Result<Option<&'o T>> {
    Evaluator::default().get_value(expression, root)
}

/// Reads `expression` from `root` as a string with the shared
/// converters.
///
/// See [`Evaluator::get_string`].
pub fn get_string(expression: &str, root: &dyn Reflect) -> Result<Option<String>> {
    Evaluator::default().get_string(expression, root)
}

/// Stores `value` at `expression`. See [`Evaluator::set_value`].
pub fn set_value<V: Reflect>(expression: &str, root: &mut dyn Reflect, value: V) -> Result<()> {
    Evaluator::default().set_value(expression, root, value)
}

/// Converts and stores `raw` at `expression` with the shared
/// converters. See [`Evaluator::set_strings`].
pub fn set_strings<S: AsRef<str>>(expression: &str, root: &mut dyn Reflect, raw: &[S]) -> Result<()> {
    Evaluator::default().set_strings(expression, root, raw)
}

/// See [`Evaluator::get_tag`].
pub fn get_tag<T: Any>(expression: &str, root: &dyn Reflect) -> Result<Option<&'static T>> {
    Evaluator::default().get_tag(expression, root)
}

/// Names of every property and field of `T`, sorted.
///
/// Empty for types that are not structs.
pub fn member_names<T: Typed>() -> BTreeSet<String> {
    describe(T::type_info())
        .map(|metadata| metadata.member_names())
        .unwrap_or_default()
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::convert::{ConverterRegistry, FromStrConverter};
    use crate::fixtures::{Account, Address, Line, Order, Plan, Tier, Upload, User};
    use crate::{Evaluator, PropertyError, member_names};

    fn user() -> User {
        User {
            name: "ada".to_owned(),
            age: 36,
            ..User::default()
        }
    }

    #[test]
    fn reads_plain_members() {
        let user = user();
        let evaluator = Evaluator::default();
        assert_eq!(evaluator.get_value::<String>("name", &user).unwrap().map(String::as_str), Some("ada"));
        assert_eq!(evaluator.get_value::<u32>("age", &user).unwrap(), Some(&36));
        assert_eq!(evaluator.get_string("age", &user).unwrap().as_deref(), Some("36"));
    }

    #[test]
    fn null_intermediate_reads_as_none() {
        let user = user();
        let evaluator = Evaluator::default();
        assert_eq!(evaluator.get_value::<String>("address.city", &user).unwrap(), None);
        // Atoms after the null are never consulted.
        assert!(evaluator.get_reflect("address.nothing.at.all", &user).unwrap().is_none());
        assert_eq!(evaluator.get_string("nickname", &user).unwrap(), None);
    }

    #[test]
    fn writes_create_missing_intermediates() {
        let mut user = user();
        let evaluator = Evaluator::default();
        evaluator.set_value("address.city", &mut user, "Paris".to_owned()).unwrap();

        let address = user.address.as_ref().unwrap();
        assert_eq!(address.city, "Paris");
        assert_eq!(
            evaluator.get_value::<String>("address.city", &user).unwrap().map(String::as_str),
            Some("Paris"),
        );
    }

    #[test]
    fn written_values_read_back() {
        let mut user = user();
        let evaluator = Evaluator::default();
        evaluator.set_strings("age", &mut user, &["41"]).unwrap();
        evaluator.set_strings("nickname", &mut user, &["countess"]).unwrap();
        evaluator.set_value("address.zip", &mut user, 75001_u32).unwrap();

        assert_eq!(evaluator.get_value::<u32>("age", &user).unwrap(), Some(&41));
        assert_eq!(evaluator.get_string("nickname", &user).unwrap().as_deref(), Some("countess"));
        assert_eq!(evaluator.get_value::<u32>("address.zip", &user).unwrap(), Some(&75001));

        evaluator.set_null("nickname", &mut user).unwrap();
        assert_eq!(user.nickname, None);
    }

    #[test]
    fn null_into_required_slot_is_rejected() {
        let mut user = user();
        let err = Evaluator::default().set_null("age", &mut user).unwrap_err();
        assert!(matches!(err, PropertyError::TypeMismatch { found: "null", .. }));
    }

    #[test]
    fn array_grows_to_fit_the_index() {
        let mut order = Order {
            items: Some(vec![Line::default(), Line::default()].into_boxed_slice()),
            ..Order::default()
        };
        let evaluator = Evaluator::default();
        evaluator.set_strings("items[5].sku", &mut order, &["X-5"]).unwrap();

        let items = order.items.as_ref().unwrap();
        assert_eq!(items.len(), 6);
        assert_eq!(items[5].sku, "X-5");
        assert_eq!(items[2].sku, "");
    }

    #[test]
    fn terminal_array_write_grows_the_array() {
        let mut order = Order {
            items: Some(vec![Line::new("A", 1), Line::new("B", 2)].into_boxed_slice()),
            ..Order::default()
        };
        Evaluator::default().set_value("items[5]", &mut order, Line::new("F", 6)).unwrap();

        let items = order.items.as_deref().unwrap();
        assert_eq!(items.len(), 6);
        assert_eq!(items[1], Line::new("B", 2));
        assert!(items[2..5].iter().all(|line| *line == Line::default()));
        assert_eq!(items[5], Line::new("F", 6));
    }

    #[test]
    fn oversized_indices_leave_the_graph_untouched() {
        let max = usize::MAX;
        let lines = [Line::new("A", 1), Line::new("B", 2)];
        let mut order = Order {
            items: Some(lines.to_vec().into_boxed_slice()),
            ..Order::default()
        };
        let evaluator = Evaluator::default();

        for expression in [format!("items[{max}].sku"), format!("items[{max}]"), format!("notes[{max}]")] {
            let err = evaluator.set_strings(&expression, &mut order, &["x"]).unwrap_err();
            assert!(matches!(err, PropertyError::MalformedPath { .. }), "{expression}");
        }
        assert_eq!(order.items.as_deref(), Some(&lines[..]));
        assert!(order.notes.is_empty());

        let mut empty = Order::default();
        let err = evaluator
            .set_value(&format!("items[{max}].qty"), &mut empty, 1_u32)
            .unwrap_err();
        assert!(matches!(err, PropertyError::MalformedPath { .. }));
        assert!(empty.items.is_none());
    }

    #[test]
    fn missing_array_is_sized_by_the_index() {
        let mut order = Order::default();
        Evaluator::default().set_value("items[2].qty", &mut order, 7_u32).unwrap();

        let items = order.items.as_ref().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[2].qty, 7);
    }

    #[test]
    fn missing_array_needs_a_numeric_index() {
        let mut order = Order::default();
        let err = Evaluator::default().set_value("items.qty", &mut order, 7_u32).unwrap_err();
        assert!(matches!(err, PropertyError::MissingIndex { .. }));
    }

    #[test]
    fn list_writes_pad_with_defaults() {
        let mut order = Order::default();
        let evaluator = Evaluator::default();
        evaluator.set_value("notes[2]", &mut order, "third".to_owned()).unwrap();
        assert_eq!(order.notes, ["", "", "third"]);

        evaluator.set_strings("notes[0]", &mut order, &["first"]).unwrap();
        assert_eq!(order.notes[0], "first");
        assert_eq!(evaluator.get_value::<String>("notes[7]", &order).unwrap(), None);
    }

    #[test]
    fn map_keys_are_converted() {
        let mut order = Order::default();
        let evaluator = Evaluator::default();
        evaluator.set_strings("scores['3']", &mut order, &["9"]).unwrap();

        assert_eq!(order.scores, HashMap::from([(3, 9)]));
        assert_eq!(evaluator.get_value::<i32>("scores[3]", &order).unwrap(), Some(&9));
        assert_eq!(evaluator.get_value::<i32>("scores[4]", &order).unwrap(), None);

        let err = evaluator.get_value::<i32>("scores['x']", &order).unwrap_err();
        assert!(matches!(err, PropertyError::Conversion { .. }));
    }

    #[test]
    fn single_string_fits_single_valued_slot() {
        let mut user = user();
        let evaluator = Evaluator::default();
        evaluator.set_strings("name", &mut user, &["x"]).unwrap();
        assert_eq!(user.name, "x");

        let err = evaluator.set_strings("name", &mut user, &["x", "y"]).unwrap_err();
        assert!(matches!(err, PropertyError::Arity { count: 2, .. }));

        evaluator.set_value("name", &mut user, vec!["z".to_owned()]).unwrap();
        assert_eq!(user.name, "z");
    }

    #[test]
    fn strings_fill_sequence_members() {
        let mut order = Order::default();
        Evaluator::default()
            .set_strings("tags", &mut order, &["a", "b", "c"])
            .unwrap();
        assert_eq!(order.tags, ["a", "b", "c"]);
    }

    #[test]
    fn indexed_members_take_the_next_atom() {
        let mut order = Order::default();
        let evaluator = Evaluator::default();
        evaluator.set_strings("line[1].sku", &mut order, &["B"]).unwrap();
        evaluator.set_value("line[0]", &mut order, Line::new("A", 2)).unwrap();

        assert_eq!(evaluator.get_string("line[1].sku", &order).unwrap().as_deref(), Some("B"));
        assert_eq!(evaluator.get_value::<u32>("line[0].qty", &order).unwrap(), Some(&2));
        assert_eq!(evaluator.get_reflect("line[5]", &order).unwrap().map(|_| ()), None);

        let err = evaluator.get_reflect("line", &order).unwrap_err();
        assert!(matches!(err, PropertyError::MalformedPath { .. }));
    }

    #[test]
    fn accessor_methods_shadow_fields() {
        let mut user = user();
        let evaluator = Evaluator::default();
        evaluator.set_strings("email", &mut user, &["  ADA@Example.org "]).unwrap();
        assert_eq!(user.email, "ada@example.org");
        assert_eq!(evaluator.get_value::<bool>("verified", &user).unwrap(), Some(&false));
    }

    #[test]
    fn properties_shadow_fields_of_the_same_name() {
        let mut account = Account::default();
        let evaluator = Evaluator::default();

        evaluator.set_strings("pin", &mut account, &["1234"]).unwrap();
        assert_eq!(account.pin, "hashed:1234");
        let err = evaluator.get_value::<String>("pin", &account).unwrap_err();
        assert!(matches!(err, PropertyError::Unreadable { ref member, .. } if member == "pin"));

        assert_eq!(evaluator.get_value::<u64>("created", &account).unwrap(), Some(&0));
        let err = evaluator.set_value("created", &mut account, 7_u64).unwrap_err();
        assert!(matches!(err, PropertyError::Unwritable { ref member, .. } if member == "created"));
        assert_eq!(account.created, 0);
    }

    #[test]
    fn repeated_reads_agree() {
        let mut user = user();
        let evaluator = Evaluator::default();
        evaluator.set_strings("visits['home']", &mut user, &["3"]).unwrap();

        for expression in ["name", "visits['home']", "address.city", "nickname"] {
            let first = evaluator.get_string(expression, &user).unwrap();
            let second = evaluator.get_string(expression, &user).unwrap();
            assert_eq!(first, second, "{expression}");
        }

        let first = evaluator.get_value::<u32>("age", &user).unwrap().unwrap();
        let second = evaluator.get_value::<u32>("age", &user).unwrap().unwrap();
        assert!(core::ptr::eq(first, second));
    }

    #[test]
    fn strings_round_trip_through_converters() {
        let mut registry = ConverterRegistry::new();
        registry.register::<Tier>(FromStrConverter::<Tier>::new());
        let evaluator = Evaluator::new(&registry);

        let plan = Plan {
            owner: "ada".to_owned(),
            seats: 12,
            price: 9.5,
            tier: Tier::Enterprise,
            trial: Some(true),
        };
        let mut copy = Plan::default();
        for expression in ["owner", "seats", "price", "tier", "trial"] {
            let text = evaluator.get_string(expression, &plan).unwrap().unwrap();
            evaluator.set_strings(expression, &mut copy, &[text]).unwrap();
        }
        assert_eq!(copy, plan);

        let err = evaluator.set_strings("tier", &mut copy, &["gold"]).unwrap_err();
        assert!(matches!(err, PropertyError::Conversion { .. }));
        assert_eq!(copy.tier, Tier::Enterprise);
    }

    #[test]
    fn tag_overrides_the_registry() {
        let mut upload = Upload::default();
        // Not registered anywhere; only the member tag knows the format.
        let registry = ConverterRegistry::empty();
        let evaluator = Evaluator::new(&registry);
        evaluator.set_strings("size", &mut upload, &["2k"]).unwrap();
        assert_eq!(upload.size, 2048);
        assert_eq!(evaluator.get_string("size", &upload).unwrap().as_deref(), Some("2k"));

        let err = evaluator.set_strings("limit", &mut upload, &["1"]).unwrap_err();
        assert!(matches!(err, PropertyError::NoConverterFound { .. }));
    }

    #[test]
    fn tags_resolve_through_null_values() {
        let user = user();
        let evaluator = Evaluator::default();
        let tag = evaluator.get_tag::<&'static str>("address.city", &user).unwrap();
        assert_eq!(tag, Some(&"locality"));
        assert_eq!(evaluator.get_tag::<&'static str>("name", &user).unwrap(), None);
        assert_eq!(evaluator.get_tag::<&'static str>("visits['home']", &user).unwrap(), Some(&"counter"));
    }

    #[test]
    fn unknown_members_are_reported() {
        let mut user = user();
        let evaluator = Evaluator::default();
        let err = evaluator.get_reflect("nope", &user).unwrap_err();
        assert!(matches!(
            err,
            PropertyError::NoSuchMember { ref member, .. } if member == "nope"
        ));
        assert_eq!(err.expression(), "nope");

        let err = evaluator.set_value("age.value", &mut user, 1_u32).unwrap_err();
        assert!(matches!(err, PropertyError::NoSuchMember { .. }));
    }

    #[test]
    fn wrong_value_types_are_reported() {
        let mut user = user();
        let evaluator = Evaluator::default();
        let err = evaluator.set_value("age", &mut user, "old".to_owned()).unwrap_err();
        assert!(matches!(err, PropertyError::TypeMismatch { .. }));

        let err = evaluator.get_value::<String>("age", &user).unwrap_err();
        assert!(matches!(err, PropertyError::TypeMismatch { .. }));
    }

    #[test]
    fn syntax_errors_surface_before_walking() {
        let user = user();
        let evaluator = Evaluator::default();
        for expression in ["..a", "a[", "a[']", "a]"] {
            let err = evaluator.get_reflect(expression, &user).unwrap_err();
            assert!(matches!(err, PropertyError::Syntax { .. }), "{expression}");
        }
    }

    #[test]
    fn lists_member_names() {
        let names = member_names::<Address>();
        assert_eq!(names.into_iter().collect::<Vec<_>>(), ["city", "zip"]);

        let names = member_names::<User>();
        assert!(names.contains("email"));
        assert!(names.contains("verified"));
        assert!(!names.contains("secret"));
        assert!(member_names::<u32>().is_empty());
    }
}
