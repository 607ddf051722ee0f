use core::any::Any;
use std::sync::{PoisonError, RwLock};

use exdetail_internals::{MapView, Reflect, Shape, TypeInfo, Value};

/// Type descriptor of [`Dictionary`].
pub static DICTIONARY: TypeInfo =
    TypeInfo::new::<Dictionary>("Dictionary", concat!(module_path!(), "::Dictionary"));

/// An insertion-ordered key/value container.
///
/// Keys compare like [`Value`]s: scalars by value, objects by identity.
/// Inserting an existing key replaces its value in place. The container uses
/// interior mutability so it can be shared, for example as the `Data` of an
/// exception, and still be filled afterwards.
#[derive(Default)]
pub struct Dictionary {
    entries: RwLock<Vec<(Value, Value)>>,
}

impl Dictionary {
    /// Creates an empty dictionary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the value stored under `key`.
    pub fn insert(&self, key: impl Into<Value>, value: impl Into<Value>) {
        let (key, value) = (key.into(), value.into());
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        match entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => entries.push((key, value)),
        }
    }

    /// Returns a clone of the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &Value) -> Option<Value> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.clone())
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl<K: Into<Value>, V: Into<Value>> FromIterator<(K, V)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let dictionary = Self::new();
        for (key, value) in iter {
            dictionary.insert(key, value);
        }
        dictionary
    }
}

impl MapView for Dictionary {
    fn entries(&self) -> Vec<(Value, Value)> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Reflect for Dictionary {
    fn type_info(&self) -> &'static TypeInfo {
        &DICTIONARY
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn shape(&self) -> Shape<'_> {
        Shape::Map(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_in_place() {
        let dictionary = Dictionary::new();
        dictionary.insert("a", 1);
        dictionary.insert("b", 2);
        dictionary.insert("a", 3);

        assert_eq!(
            dictionary.entries(),
            vec![
                (Value::from("a"), Value::from(3)),
                (Value::from("b"), Value::from(2))
            ]
        );
        assert_eq!(dictionary.get(&Value::from("b")), Some(Value::from(2)));
        assert_eq!(dictionary.get(&Value::from("c")), None);
    }

    #[test]
    fn test_clear() {
        let dictionary: Dictionary = [("k", "v")].into_iter().collect();
        assert_eq!(MapView::len(&dictionary), 1);
        dictionary.clear();
        assert!(MapView::is_empty(&dictionary));
    }
}
