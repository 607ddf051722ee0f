//! The sink destructurers write into.

use crate::{
    detail::{Detail, DetailMap},
    error::BagError,
    exceptions::Exception,
    filters::PropertyFilter,
};

/// How many times a conflicting key is extended with `$` before the last
/// candidate is overwritten.
pub const MAX_CONFLICT_SUFFIXES: usize = 5;

/// The properties collected for one exception.
///
/// Every property goes through the configured [`PropertyFilter`] first;
/// rejected properties are dropped silently. A key that is already taken is
/// extended with `$` until it is free, at most [`MAX_CONFLICT_SUFFIXES`]
/// times; the last candidate is then overwritten.
///
/// Once [frozen](Self::freeze) the bag refuses further writes.
pub struct PropertiesBag<'a> {
    exception: &'a dyn Exception,
    filter: Option<&'a dyn PropertyFilter>,
    properties: DetailMap,
    frozen: bool,
}

impl<'a> PropertiesBag<'a> {
    /// Creates an empty bag for the properties of `exception`.
    #[must_use]
    pub fn new(exception: &'a dyn Exception, filter: Option<&'a dyn PropertyFilter>) -> Self {
        Self {
            exception,
            filter,
            properties: DetailMap::new(),
            frozen: false,
        }
    }

    /// The exception whose properties are collected.
    #[must_use]
    pub fn exception(&self) -> &'a dyn Exception {
        self.exception
    }

    /// Adds a property.
    ///
    /// # Errors
    ///
    /// - [`BagError::Frozen`] if the bag was frozen
    /// - [`BagError::EmptyKey`] if `key` is empty
    pub fn add_property(&mut self, key: &str, value: impl Into<Detail>) -> Result<(), BagError> {
        if self.frozen {
            return Err(BagError::Frozen {
                key: key.to_owned(),
            });
        }
        if key.is_empty() {
            return Err(BagError::EmptyKey);
        }

        let value = value.into();
        if let Some(filter) = self.filter
            && filter.should_reject(self.exception, key, &value)
        {
            tracing::trace!(
                type_name = self.exception.type_info().full_name(),
                property = key,
                "property rejected by filter"
            );
            return Ok(());
        }

        let mut candidate = key.to_owned();
        for _ in 0..MAX_CONFLICT_SUFFIXES {
            if !self.properties.contains_key(&candidate) {
                break;
            }
            candidate.push('$');
        }
        self.properties.insert(candidate, value);
        Ok(())
    }

    /// Returns `true` if a property is stored under exactly `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Returns `true` once the bag was frozen.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Freezes the bag and returns its properties. Freezing twice is allowed.
    pub fn freeze(&mut self) -> &DetailMap {
        self.frozen = true;
        &self.properties
    }

    /// Freezes the bag and returns its properties.
    #[must_use]
    pub fn into_properties(mut self) -> DetailMap {
        self.freeze();
        self.properties
    }

    pub(crate) fn resolve_anchors(&mut self, ids: &dyn Fn(crate::graph::Anchor) -> Option<u32>) {
        self.properties.resolve_anchors(ids);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{exceptions::ExceptionCore, filters::IgnorePropertyByName};

    #[test]
    fn test_conflicting_keys() {
        let exception = ExceptionCore::new("m");
        let mut bag = PropertiesBag::new(&exception, None);
        for index in 0..8 {
            bag.add_property("Key", index).unwrap();
        }

        let properties = bag.into_properties();
        assert_eq!(
            properties.keys().collect::<Vec<_>>(),
            ["Key", "Key$", "Key$$", "Key$$$", "Key$$$$", "Key$$$$$"]
        );
        assert_eq!(properties["Key$$$$$"], Detail::from(7));
    }

    #[test]
    fn test_frozen_bag_refuses_writes() {
        let exception = ExceptionCore::new("m");
        let mut bag = PropertiesBag::new(&exception, None);
        bag.add_property("A", 1).unwrap();
        assert_eq!(bag.freeze().len(), 1);
        assert_eq!(bag.freeze().len(), 1);

        assert_eq!(
            bag.add_property("B", 2),
            Err(BagError::Frozen {
                key: "B".to_owned()
            })
        );
        assert!(bag.is_frozen());
        assert!(!bag.contains_key("B"));
    }

    #[test]
    fn test_empty_key() {
        let exception = ExceptionCore::new("m");
        let mut bag = PropertiesBag::new(&exception, None);
        assert_eq!(bag.add_property("", 1), Err(BagError::EmptyKey));
    }

    #[test]
    fn test_filter_drops_silently() {
        let exception = ExceptionCore::new("m");
        let filter = IgnorePropertyByName::new(["StackTrace"]).unwrap();
        let mut bag = PropertiesBag::new(&exception, Some(&filter));

        bag.add_property("StackTrace", "at main").unwrap();
        bag.add_property("Message", "m").unwrap();

        assert!(!bag.contains_key("StackTrace"));
        assert!(bag.contains_key("Message"));
    }
}
