//! The destructured output tree.
//!
//! A destructured exception is a [`DetailMap`]: an insertion-ordered,
//! string-keyed map of [`Detail`] values. Object graphs with shared or cyclic
//! references use reserved keys: the first occurrence of a referenced object
//! carries [`ID_KEY`], later occurrences are replaced by a map holding only
//! [`REF_KEY`]. A referenced list is wrapped into a map holding [`ID_KEY`] and
//! [`VALUES_KEY`].

use core::{fmt, ops::Deref};
use std::{borrow::Cow, mem};

use exdetail_internals::{Obj, Scalar, Value};
use indexmap::IndexMap;

use crate::graph::Anchor;

/// Key of the identifier of an object that is referenced again later.
///
/// A map entry already stored under this key, such as a dictionary key
/// `"$id"`, is moved to the first free key made by appending `$` to it.
pub const ID_KEY: &str = "$id";
/// Key of a back-reference to an object emitted earlier.
pub const REF_KEY: &str = "$ref";
/// Key of the items of a list that carries an identifier.
pub const VALUES_KEY: &str = "$values";
/// Key of the full type name of a destructured exception.
pub const TYPE_KEY: &str = "Type";
/// Key of the full type name when the exception has a property named `Type`.
pub const FALLBACK_TYPE_KEY: &str = "$Type";

/// A node of the destructured output.
#[derive(Clone, Default)]
pub enum Detail {
    /// No value.
    #[default]
    Null,
    /// A value-semantics value.
    Scalar(Scalar),
    /// An object emitted without being expanded: metadata, or a value beyond
    /// the depth limit. Rendered through its textual form.
    Opaque(Obj),
    /// A string-keyed map.
    Map(DetailMap),
    /// An ordered list.
    List(DetailList),
}

impl Detail {
    /// Returns `true` for [`Detail::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Detail::Null)
    }

    /// Returns the scalar, if this is one.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Detail::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Returns the string payload of a string scalar.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Scalar::as_str)
    }

    /// Returns the map, if this is one.
    #[must_use]
    pub fn as_map(&self) -> Option<&DetailMap> {
        match self {
            Detail::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the list, if this is one.
    #[must_use]
    pub fn as_list(&self) -> Option<&DetailList> {
        match self {
            Detail::List(list) => Some(list),
            _ => None,
        }
    }

    /// Returns the unexpanded object, if this is one.
    #[must_use]
    pub fn as_opaque(&self) -> Option<&Obj> {
        match self {
            Detail::Opaque(object) => Some(object),
            _ => None,
        }
    }

    /// Looks up `key` if this is a map.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Detail> {
        self.as_map().and_then(|map| map.get(key))
    }

    pub(crate) fn resolve_anchors(&mut self, ids: &dyn Fn(Anchor) -> Option<u32>) {
        match self {
            Detail::Map(map) => map.resolve_anchors(ids),
            Detail::List(list) => {
                for item in &mut list.items {
                    item.resolve_anchors(ids);
                }
                if let Some(id) = list.anchor.take().and_then(ids) {
                    let items = mem::take(&mut list.items);
                    let mut wrapper = DetailMap::new();
                    wrapper.insert(ID_KEY, id.to_string());
                    wrapper.insert(VALUES_KEY, DetailList::from(items));
                    *self = Detail::Map(wrapper);
                }
            }
            Detail::Null | Detail::Scalar(_) | Detail::Opaque(_) => {}
        }
    }
}

impl PartialEq for Detail {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Detail::Null, Detail::Null) => true,
            (Detail::Scalar(left), Detail::Scalar(right)) => left == right,
            (Detail::Opaque(left), Detail::Opaque(right)) => {
                exdetail_internals::value::identity_of(left)
                    == exdetail_internals::value::identity_of(right)
            }
            (Detail::Map(left), Detail::Map(right)) => left == right,
            (Detail::List(left), Detail::List(right)) => left == right,
            _ => false,
        }
    }
}

impl fmt::Debug for Detail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Detail::Null => f.write_str("null"),
            Detail::Scalar(scalar) => fmt::Debug::fmt(scalar, f),
            Detail::Opaque(object) => write!(f, "Opaque({object})"),
            Detail::Map(map) => fmt::Debug::fmt(map, f),
            Detail::List(list) => fmt::Debug::fmt(list, f),
        }
    }
}

macro_rules! detail_from_scalar {
    ($($source:ty),* $(,)?) => {
        $(
            impl From<$source> for Detail {
                fn from(value: $source) -> Self {
                    Detail::Scalar(Scalar::from(value))
                }
            }
        )*
    };
}

detail_from_scalar!(
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    usize,
    f32,
    f64,
    String,
    Cow<'static, str>,
    std::time::SystemTime,
    core::time::Duration,
);

impl From<&str> for Detail {
    fn from(value: &str) -> Self {
        Detail::Scalar(Scalar::String(Cow::Owned(value.to_owned())))
    }
}

impl From<Scalar> for Detail {
    fn from(value: Scalar) -> Self {
        Detail::Scalar(value)
    }
}

impl From<DetailMap> for Detail {
    fn from(value: DetailMap) -> Self {
        Detail::Map(value)
    }
}

impl From<DetailList> for Detail {
    fn from(value: DetailList) -> Self {
        Detail::List(value)
    }
}

impl From<Vec<Detail>> for Detail {
    fn from(value: Vec<Detail>) -> Self {
        Detail::List(DetailList::from(value))
    }
}

/// Converts a value without walking it: objects become [`Detail::Opaque`].
impl From<Value> for Detail {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Detail::Null,
            Value::Scalar(scalar) => Detail::Scalar(scalar),
            Value::Object(object) => Detail::Opaque(object),
        }
    }
}

impl<T: Into<Detail>> From<Option<T>> for Detail {
    fn from(value: Option<T>) -> Self {
        value.map_or(Detail::Null, Into::into)
    }
}

/// An insertion-ordered, string-keyed map of details.
///
/// Dereferences to the underlying [`IndexMap`].
#[derive(Clone, Default)]
pub struct DetailMap {
    entries: IndexMap<String, Detail>,
    anchor: Option<Anchor>,
}

impl DetailMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn anchored(anchor: Anchor) -> Self {
        Self {
            entries: IndexMap::new(),
            anchor: Some(anchor),
        }
    }

    /// Inserts an entry, returning the value previously stored under `key`.
    /// A replaced entry keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Detail>) -> Option<Detail> {
        self.entries.insert(key.into(), value.into())
    }

    /// Returns the underlying map.
    #[must_use]
    pub fn into_inner(self) -> IndexMap<String, Detail> {
        self.entries
    }

    pub(crate) fn resolve_anchors(&mut self, ids: &dyn Fn(Anchor) -> Option<u32>) {
        for value in self.entries.values_mut() {
            value.resolve_anchors(ids);
        }
        if let Some(id) = self.anchor.take().and_then(ids) {
            if let Some((index, _, displaced)) = self.entries.shift_remove_full(ID_KEY) {
                let mut key = format!("{ID_KEY}$");
                while self.entries.contains_key(&key) {
                    key.push('$');
                }
                self.entries.shift_insert(index, key, displaced);
            }
            self.entries
                .shift_insert(0, ID_KEY.to_owned(), Detail::from(id.to_string()));
        }
    }
}

impl Deref for DetailMap {
    type Target = IndexMap<String, Detail>;

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}

/// Compares entries, ignoring their order.
impl PartialEq for DetailMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl fmt::Debug for DetailMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<K: Into<String>, V: Into<Detail>> FromIterator<(K, V)> for DetailMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
            anchor: None,
        }
    }
}

impl IntoIterator for DetailMap {
    type Item = (String, Detail);
    type IntoIter = indexmap::map::IntoIter<String, Detail>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a DetailMap {
    type Item = (&'a String, &'a Detail);
    type IntoIter = indexmap::map::Iter<'a, String, Detail>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// An ordered list of details.
///
/// Dereferences to the underlying [`Vec`].
#[derive(Clone, Default)]
pub struct DetailList {
    items: Vec<Detail>,
    anchor: Option<Anchor>,
}

impl DetailList {
    pub(crate) fn anchored(anchor: Anchor) -> Self {
        Self {
            items: Vec::new(),
            anchor: Some(anchor),
        }
    }

    pub(crate) fn push(&mut self, item: Detail) {
        self.items.push(item);
    }

    /// Returns the underlying items.
    #[must_use]
    pub fn into_inner(self) -> Vec<Detail> {
        self.items
    }
}

impl From<Vec<Detail>> for DetailList {
    fn from(items: Vec<Detail>) -> Self {
        Self {
            items,
            anchor: None,
        }
    }
}

impl FromIterator<Detail> for DetailList {
    fn from_iter<I: IntoIterator<Item = Detail>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl Deref for DetailList {
    type Target = Vec<Detail>;

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl PartialEq for DetailList {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl fmt::Debug for DetailList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

#[cfg(feature = "serde")]
mod serialize {
    use std::time::SystemTime;

    use exdetail_internals::Scalar;
    use serde::{Serialize, Serializer};

    use super::{Detail, DetailList, DetailMap};

    struct ScalarRepr<'a>(&'a Scalar);

    impl Serialize for ScalarRepr<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self.0 {
                Scalar::Bool(value) => serializer.serialize_bool(*value),
                Scalar::Char(value) => serializer.serialize_char(*value),
                Scalar::I64(value) => serializer.serialize_i64(*value),
                Scalar::U64(value) => serializer.serialize_u64(*value),
                Scalar::F64(value) => serializer.serialize_f64(*value),
                Scalar::String(value) => serializer.serialize_str(value),
                Scalar::Enum { label, .. } => serializer.serialize_str(label),
                Scalar::Timestamp(value) => {
                    let seconds = match value.duration_since(SystemTime::UNIX_EPOCH) {
                        Ok(since) => since.as_secs_f64(),
                        Err(before) => -before.duration().as_secs_f64(),
                    };
                    serializer.serialize_f64(seconds)
                }
                Scalar::Duration(value) => serializer.serialize_f64(value.as_secs_f64()),
            }
        }
    }

    impl Serialize for Detail {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Detail::Null => serializer.serialize_none(),
                Detail::Scalar(scalar) => ScalarRepr(scalar).serialize(serializer),
                Detail::Opaque(object) => serializer.collect_str(&**object),
                Detail::Map(map) => map.serialize(serializer),
                Detail::List(list) => list.serialize(serializer),
            }
        }
    }

    impl Serialize for DetailMap {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_map(self.entries.iter())
        }
    }

    impl Serialize for DetailList {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(self.items.iter())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_resolution() {
        let mut map = DetailMap::anchored(Anchor::new(0));
        map.insert("Name", "outer");
        let mut list = DetailList::anchored(Anchor::new(1));
        list.push(Detail::from(1));
        map.insert("Items", list);
        map.insert("Unseen", DetailMap::anchored(Anchor::new(2)));

        let mut detail = Detail::Map(map);
        detail.resolve_anchors(&|anchor| match anchor.index() {
            0 => Some(1),
            1 => Some(2),
            _ => None,
        });

        let map = detail.as_map().unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), ["$id", "Name", "Items", "Unseen"]);
        assert_eq!(map["$id"].as_str(), Some("1"));
        assert_eq!(detail.get("Items").and_then(|items| items.get("$id")).and_then(Detail::as_str), Some("2"));
        assert_eq!(
            detail.get("Items").and_then(|items| items.get("$values")),
            Some(&Detail::from(vec![Detail::from(1)]))
        );
        assert!(detail.get("Unseen").unwrap().as_map().unwrap().is_empty());
    }

    #[test]
    fn test_existing_id_entry_is_kept() {
        let mut map = DetailMap::anchored(Anchor::new(0));
        map.insert("$id", "user value");
        map.insert("$id$", "taken");
        map.insert("Other", 1);

        let mut detail = Detail::Map(map);
        detail.resolve_anchors(&|_| Some(4));

        let map = detail.as_map().unwrap();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["$id", "$id$$", "$id$", "Other"]);
        assert_eq!(map["$id"].as_str(), Some("4"));
        assert_eq!(map["$id$$"].as_str(), Some("user value"));
        assert_eq!(map["$id$"].as_str(), Some("taken"));
    }

    #[test]
    fn test_resolution_runs_once() {
        let mut detail = Detail::Map(DetailMap::anchored(Anchor::new(0)));
        detail.resolve_anchors(&|_| Some(1));
        detail.resolve_anchors(&|_| Some(7));
        assert_eq!(detail.get(ID_KEY).and_then(Detail::as_str), Some("1"));
        assert_eq!(detail.as_map().unwrap().len(), 1);
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Detail::from(None::<&str>), Detail::Null);
        assert_eq!(Detail::from(Some("x")).as_str(), Some("x"));
        assert_eq!(Detail::from(Value::from(3)), Detail::from(3));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialize() {
        let map: DetailMap = [
            ("Message", Detail::from("boom")),
            ("Code", Detail::from(7)),
            ("Missing", Detail::Null),
            ("Elapsed", Detail::from(core::time::Duration::from_millis(1500))),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            serde_json::to_string(&map).unwrap(),
            r#"{"Message":"boom","Code":7,"Missing":null,"Elapsed":1.5}"#
        );
    }
}
