//! Errors reported by the engine.

/// An invalid configuration, reported when the configuration is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The root property name is empty.
    #[error("the root property name must not be empty")]
    EmptyRootName,
    /// The destructuring depth is zero.
    #[error("the destructuring depth must be positive, got {0}")]
    InvalidDepth(usize),
    /// Two destructurers target the same exception type.
    #[error("`{first}` and `{second}` both destructure `{type_name}`")]
    DuplicateDestructurer {
        /// Full name of the exception type.
        type_name: &'static str,
        /// The destructurer registered first.
        first: &'static str,
        /// The destructurer registered second.
        second: &'static str,
    },
    /// A composite filter was built without any filter.
    #[error("a composite filter needs at least one filter")]
    EmptyFilterChain,
    /// A property name filter was built without any name.
    #[error("a property name filter needs at least one name")]
    EmptyIgnoreList,
}

/// A misuse of a [`PropertiesBag`](crate::bag::PropertiesBag).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BagError {
    /// A property was added after the bag was frozen.
    #[error("cannot add property `{key}`: the bag is frozen")]
    Frozen {
        /// The rejected key.
        key: String,
    },
    /// A property was added with an empty name.
    #[error("property names must not be empty")]
    EmptyKey,
}
