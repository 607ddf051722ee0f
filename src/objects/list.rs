use core::any::Any;
use std::sync::{PoisonError, RwLock};

use exdetail_internals::{Reflect, SeqView, Shape, TypeInfo, Value};

/// Type descriptor of [`List`].
pub static LIST: TypeInfo = TypeInfo::new::<List>("List", concat!(module_path!(), "::List"));

/// An ordered sequence of values.
#[derive(Default)]
pub struct List {
    items: RwLock<Vec<Value>>,
}

impl List {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an item.
    pub fn push(&self, item: impl Into<Value>) {
        self.items
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(item.into());
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns `true` if the list has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every item.
    pub fn clear(&self) {
        self.items
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl<T: Into<Value>> FromIterator<T> for List {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: RwLock::new(iter.into_iter().map(Into::into).collect()),
        }
    }
}

impl SeqView for List {
    fn items(&self) -> Vec<Value> {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Reflect for List {
    fn type_info(&self) -> &'static TypeInfo {
        &LIST
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn shape(&self) -> Shape<'_> {
        Shape::Seq(self)
    }
}
