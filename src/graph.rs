//! The per-call table of visited objects.

use exdetail_internals::{Obj, value::identity_of};
use hashbrown::HashMap;
use rustc_hash::FxBuildHasher;

use crate::detail::{Detail, DetailMap, REF_KEY};

/// Locates an output map or list that may have to receive an identifier once
/// the call is over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Anchor(usize);

impl Anchor {
    #[cfg(test)]
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    #[cfg(test)]
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// Objects visited during one destructuring call.
///
/// Identifiers are minted lazily: an object gets one only when it is reached a
/// second time. Identifiers start at 1. Every visited object is kept alive
/// until the table is dropped, so its address cannot be reused by another
/// object within the call.
pub(crate) struct ObjectGraph {
    slots: HashMap<usize, Anchor, FxBuildHasher>,
    objects: Vec<Obj>,
    ids: Vec<Option<u32>>,
    next_id: u32,
}

impl ObjectGraph {
    pub(crate) fn new() -> Self {
        Self {
            slots: HashMap::default(),
            objects: Vec::new(),
            ids: Vec::new(),
            next_id: 1,
        }
    }

    /// Records `object` as visited. The returned anchor goes on the output
    /// node emitted for it.
    pub(crate) fn register(&mut self, object: &Obj) -> Anchor {
        let anchor = Anchor(self.objects.len());
        self.slots.insert(identity_of(object), anchor);
        self.objects.push(object.clone());
        self.ids.push(None);
        anchor
    }

    /// Returns a `$ref` node if `object` was visited before, minting its
    /// identifier on first use.
    pub(crate) fn back_reference(&mut self, object: &Obj) -> Option<Detail> {
        let anchor = *self.slots.get(&identity_of(object))?;
        let slot = self.ids.get_mut(anchor.0)?;
        let id = *slot.get_or_insert_with(|| {
            let id = self.next_id;
            self.next_id += 1;
            id
        });

        let mut reference = DetailMap::new();
        reference.insert(REF_KEY, id.to_string());
        Some(Detail::Map(reference))
    }

    /// The identifier minted for the object behind `anchor`, if any.
    pub(crate) fn id_of(&self, anchor: Anchor) -> Option<u32> {
        self.ids.get(anchor.0).copied().flatten()
    }

    /// Number of visited objects.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.objects.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use exdetail_internals::Obj;

    use super::*;
    use crate::objects::List;

    #[test]
    fn test_ids_are_minted_on_second_visit() {
        let first: Obj = Arc::new(List::new());
        let second: Obj = Arc::new(List::new());
        let mut graph = ObjectGraph::new();

        assert!(graph.back_reference(&first).is_none());
        let first_anchor = graph.register(&first);
        let second_anchor = graph.register(&second);
        assert_eq!(graph.id_of(first_anchor), None);

        let reference = graph.back_reference(&second).unwrap();
        assert_eq!(reference.get(REF_KEY).and_then(Detail::as_str), Some("1"));
        graph.back_reference(&first);
        graph.back_reference(&second);

        assert_eq!(graph.id_of(second_anchor), Some(1));
        assert_eq!(graph.id_of(first_anchor), Some(2));
        assert_eq!(graph.len(), 2);
    }
}
