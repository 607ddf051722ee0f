//! Property discovery for reflected types.
//!
//! The [`PropertyReflector`] turns a type's static declarations, and those of
//! its ancestors, into a [`TypeReflectionInfo`]: the ordered list of readable
//! properties, with accessors ready to call and names made unique. The result
//! is computed once per type and cached.

use core::{
    any::TypeId,
    fmt,
    panic::AssertUnwindSafe,
};
use std::{
    borrow::Cow,
    panic,
    sync::{PoisonError, RwLock},
};

use exdetail_internals::{
    Access, Getter, PropertyDecl, Receiver, Reflect, Thrown, TypeInfo, Value, Visibility,
};
use hashbrown::HashMap;
use rustc_hash::FxBuildHasher;

use crate::exceptions::EXCEPTION;

/// A readable property of a reflected type.
#[derive(Clone)]
pub struct PropertyDescriptor {
    name: Cow<'static, str>,
    original_name: &'static str,
    declaring_type: &'static TypeInfo,
    getter: Getter,
}

impl PropertyDescriptor {
    /// The emitted name: the declared name, or `DeclaringType.Name` when a
    /// more derived type declares a property with the same name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared name.
    #[must_use]
    pub fn original_name(&self) -> &'static str {
        self.original_name
    }

    /// The type that declares the property.
    #[must_use]
    pub fn declaring_type(&self) -> &'static TypeInfo {
        self.declaring_type
    }

    /// Reads the property of `target`.
    ///
    /// A panicking getter is reported like a failing one. The panic still
    /// goes through the process panic hook first, so with the default hook
    /// its message is also printed to stderr. Installing a quieter hook with
    /// [`std::panic::set_hook`] is left to the application, since the hook is
    /// process-wide.
    ///
    /// # Errors
    ///
    /// Returns the getter's [`Thrown`].
    pub fn read(&self, target: &dyn Reflect) -> Result<Value, Thrown> {
        let getter = self.getter;
        panic::catch_unwind(AssertUnwindSafe(|| getter(target)))
            .unwrap_or_else(|payload| Err(Thrown::from_panic(&*payload)))
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("declaring_type", &self.declaring_type.full_name())
            .finish_non_exhaustive()
    }
}

/// The readable properties of one type.
#[derive(Debug)]
pub struct TypeReflectionInfo {
    type_info: &'static TypeInfo,
    properties: Vec<PropertyDescriptor>,
    non_base: Vec<usize>,
}

impl TypeReflectionInfo {
    /// The reflected type.
    #[must_use]
    pub fn type_info(&self) -> &'static TypeInfo {
        self.type_info
    }

    /// Every public, instance, readable, non-indexed property of the type and
    /// its ancestors, most derived declaring type first.
    #[must_use]
    pub fn all_properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    /// The properties whose name is not one of the root exception type's.
    pub fn non_base_properties(&self) -> impl Iterator<Item = &PropertyDescriptor> + '_ {
        self.non_base.iter().map(|&index| &self.properties[index])
    }
}

type Cache = HashMap<TypeId, triomphe::Arc<TypeReflectionInfo>, FxBuildHasher>;

/// Computes and caches [`TypeReflectionInfo`]s.
///
/// Safe to share between threads. Concurrent first lookups of the same type
/// may both compute the info, but only one result is ever published.
pub struct PropertyReflector {
    cache: RwLock<Cache>,
    base_names: Vec<&'static str>,
}

impl PropertyReflector {
    /// Creates a reflector with an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(Cache::default()),
            base_names: EXCEPTION
                .declared_properties()
                .iter()
                .filter(|decl| is_reflected(decl))
                .map(PropertyDecl::name)
                .collect(),
        }
    }

    /// The reflection info of `type_info`, computed on first use.
    #[must_use]
    pub fn reflection_info(&self, type_info: &'static TypeInfo) -> triomphe::Arc<TypeReflectionInfo> {
        let type_id = type_info.type_id();
        if let Some(info) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
        {
            return info.clone();
        }

        let info = triomphe::Arc::new(self.build(type_info));
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(type_id)
            .or_insert(info)
            .clone()
    }

    /// Number of cached types.
    #[must_use]
    pub fn cached_types(&self) -> usize {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn build(&self, type_info: &'static TypeInfo) -> TypeReflectionInfo {
        let mut properties = Vec::new();
        for ty in type_info.ancestors() {
            for decl in ty.declared_properties().iter().filter(|decl| is_reflected(decl)) {
                match compile(decl) {
                    Some(getter) => properties.push(PropertyDescriptor {
                        name: Cow::Borrowed(decl.name()),
                        original_name: decl.name(),
                        declaring_type: ty,
                        getter,
                    }),
                    None => tracing::debug!(
                        type_name = type_info.full_name(),
                        declaring_type = ty.full_name(),
                        property = decl.name(),
                        "excluding property whose value cannot be read"
                    ),
                }
            }
        }
        resolve_collisions(&mut properties);

        let non_base = properties
            .iter()
            .enumerate()
            .filter(|(_, property)| !self.base_names.contains(&property.original_name))
            .map(|(index, _)| index)
            .collect();

        TypeReflectionInfo {
            type_info,
            properties,
            non_base,
        }
    }
}

impl Default for PropertyReflector {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PropertyReflector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyReflector")
            .field("cached_types", &self.cached_types())
            .finish_non_exhaustive()
    }
}

fn is_reflected(decl: &PropertyDecl) -> bool {
    decl.visibility() == Visibility::Public
        && decl.receiver() == Receiver::Instance
        && decl.index_arity() == 0
        && decl.is_readable()
}

fn compile(decl: &PropertyDecl) -> Option<Getter> {
    match decl.access() {
        Access::Get(getter) => Some(getter),
        Access::WriteOnly | Access::ByRef => None,
    }
}

/// Renames every property shadowed by a more derived declaration of the same
/// name to `DeclaringType.Name`.
fn resolve_collisions(properties: &mut [PropertyDescriptor]) {
    let mut groups: HashMap<&'static str, Vec<usize>, FxBuildHasher> = HashMap::default();
    for (index, property) in properties.iter().enumerate() {
        groups.entry(property.original_name).or_default().push(index);
    }

    for indices in groups.values().filter(|indices| indices.len() > 1) {
        for &index in indices {
            let declaring_type = properties[index].declaring_type;
            let shadowed = indices
                .iter()
                .any(|&other| properties[other].declaring_type.is_subclass_of(declaring_type));
            if shadowed {
                let property = &mut properties[index];
                property.name =
                    Cow::Owned(format!("{}.{}", declaring_type.name(), property.original_name));
            }
        }
    }
}
