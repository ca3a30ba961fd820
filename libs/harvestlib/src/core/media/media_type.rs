// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Media type tokens and the per-module type registry.
//!
//! A media path is configured against an *erased* type reference
//! ([`MediaTypeRef`]) because the set of usable types is only known at
//! module registration time. The erasure is undone in exactly one place:
//! [`ErasedMediaType::instantiate`] is implemented by a tag generic over
//! the concrete type, so everything built downstream of that call (the
//! binding, the runtime path) is statically typed. No casts anywhere
//! else.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::core::error::{HarvestError, Result};
use crate::core::media::path::{DynMediaPath, MediaPath, MediaPathBinding};
use crate::core::media::path_config::MediaPathConfig;

/// A media payload type that media paths can be specialized for.
///
/// Implementors are plain marker-capable data types registered with their
/// module:
///
/// ```no_run
/// use harvestlib::core::media::MediaType;
///
/// struct StatusRecord;
///
/// impl MediaType for StatusRecord {
///     const NAME: &'static str = "StatusRecord";
/// }
///
/// // Auto-register at compile time
/// harvestlib::register_media_type!(StatusRecord);
/// ```
pub trait MediaType: Send + Sync + 'static {
    /// Canonical name persisted under the `mediaClass` store key and used
    /// for registry lookups.
    const NAME: &'static str;
}

/// Erased view of one registered media type.
pub trait ErasedMediaType: Send + Sync {
    fn name(&self) -> &'static str;

    fn type_id(&self) -> TypeId;

    /// Build the strongly typed runtime path for `config`. The
    /// implementation is generic over the concrete media type; this call
    /// is the single erasure boundary of the crate.
    fn instantiate(&self, config: &MediaPathConfig) -> Result<Box<dyn DynMediaPath>>;
}

struct TypeTag<M: MediaType>(PhantomData<fn() -> M>);

impl<M: MediaType> ErasedMediaType for TypeTag<M> {
    fn name(&self) -> &'static str {
        M::NAME
    }

    fn type_id(&self) -> TypeId {
        TypeId::of::<M>()
    }

    fn instantiate(&self, config: &MediaPathConfig) -> Result<Box<dyn DynMediaPath>> {
        let binding = MediaPathBinding::<M>::from_config(config);
        Ok(Box::new(MediaPath::new(binding)))
    }
}

/// Cloneable erased reference to a registered media type. Two references
/// are equal when they name the same Rust type.
#[derive(Clone)]
pub struct MediaTypeRef(Arc<dyn ErasedMediaType>);

impl MediaTypeRef {
    pub fn of<M: MediaType>() -> Self {
        Self(Arc::new(TypeTag::<M>(PhantomData)))
    }

    /// Canonical name of the referenced type.
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    pub fn type_id(&self) -> TypeId {
        self.0.type_id()
    }

    pub fn is<M: MediaType>(&self) -> bool {
        self.type_id() == TypeId::of::<M>()
    }

    pub(crate) fn instantiate(&self, config: &MediaPathConfig) -> Result<Box<dyn DynMediaPath>> {
        self.0.instantiate(config)
    }
}

impl fmt::Debug for MediaTypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MediaTypeRef").field(&self.name()).finish()
    }
}

impl PartialEq for MediaTypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.type_id() == other.type_id()
    }
}

impl Eq for MediaTypeRef {}

/// Inventory entry for compile-time media type registration.
///
/// Submitted by [`register_media_type!`](crate::register_media_type);
/// collected into a registry by [`MediaTypeRegistry::with_submitted`].
pub struct MediaTypeRegistration {
    pub constructor: fn() -> MediaTypeRef,
}

inventory::collect!(MediaTypeRegistration);

/// Register a media type at compile time.
#[macro_export]
macro_rules! register_media_type {
    ($media_type:ty) => {
        $crate::inventory::submit! {
            $crate::core::media::MediaTypeRegistration {
                constructor: $crate::core::media::MediaTypeRef::of::<$media_type>,
            }
        }
    };
}

/// Closed registry of the media types one module can bind paths to.
///
/// Supports both compile-time registration (via inventory, see
/// [`MediaTypeRegistry::with_submitted`]) and runtime registration, the
/// same split the processor and schema registries use elsewhere in the
/// stack.
pub struct MediaTypeRegistry {
    types: RwLock<HashMap<String, MediaTypeRef>>,
}

impl MediaTypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            types: RwLock::new(HashMap::new()),
        }
    }

    /// Create a registry seeded with every type submitted at compile
    /// time. Duplicate submissions are skipped with a warning.
    pub fn with_submitted() -> Self {
        let registry = Self::new();
        {
            let mut types = registry.types.write();
            for registration in inventory::iter::<MediaTypeRegistration> {
                let media_type = (registration.constructor)();
                if types.contains_key(media_type.name()) {
                    tracing::warn!(
                        "media type '{}' already registered, skipping duplicate",
                        media_type.name()
                    );
                    continue;
                }
                tracing::debug!("registered media type: {}", media_type.name());
                types.insert(media_type.name().to_string(), media_type);
            }
        }
        registry
    }

    /// Register a media type at runtime.
    pub fn register<M: MediaType>(&self) -> Result<()> {
        self.register_ref(MediaTypeRef::of::<M>())
    }

    pub fn register_ref(&self, media_type: MediaTypeRef) -> Result<()> {
        let mut types = self.types.write();
        if types.contains_key(media_type.name()) {
            return Err(HarvestError::Registry(format!(
                "media type '{}' is already registered",
                media_type.name()
            )));
        }
        tracing::debug!("registered media type: {}", media_type.name());
        types.insert(media_type.name().to_string(), media_type);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<MediaTypeRef> {
        self.types.read().get(name).cloned()
    }

    /// Resolve a persisted canonical name to a type reference.
    pub fn resolve(&self, name: &str) -> Result<MediaTypeRef> {
        self.get(name)
            .ok_or_else(|| HarvestError::MediaTypeNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.read().contains_key(name)
    }

    /// All registered types, sorted by canonical name.
    pub fn list(&self) -> Vec<MediaTypeRef> {
        let mut types: Vec<MediaTypeRef> = self.types.read().values().cloned().collect();
        types.sort_by(|a, b| a.name().cmp(b.name()));
        types
    }

    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }
}

impl Default for MediaTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StatusRecord;

    impl MediaType for StatusRecord {
        const NAME: &'static str = "StatusRecord";
    }

    struct UserRecord;

    impl MediaType for UserRecord {
        const NAME: &'static str = "UserRecord";
    }

    #[test]
    fn test_ref_identity() {
        let a = MediaTypeRef::of::<StatusRecord>();
        let b = MediaTypeRef::of::<StatusRecord>();
        let c = MediaTypeRef::of::<UserRecord>();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.name(), "StatusRecord");
        assert!(a.is::<StatusRecord>());
        assert!(!a.is::<UserRecord>());
    }

    #[test]
    fn test_register_and_resolve() {
        let registry = MediaTypeRegistry::new();
        registry.register::<StatusRecord>().unwrap();

        let resolved = registry.resolve("StatusRecord").unwrap();
        assert!(resolved.is::<StatusRecord>());
        assert!(registry.contains("StatusRecord"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_resolve_unknown_fails() {
        let registry = MediaTypeRegistry::new();
        let err = registry.resolve("Missing").unwrap_err();
        assert!(matches!(err, HarvestError::MediaTypeNotFound(ref name) if name == "Missing"));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_register_duplicate_fails() {
        let registry = MediaTypeRegistry::new();
        registry.register::<StatusRecord>().unwrap();

        let result = registry.register::<StatusRecord>();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("already registered"));
    }

    #[test]
    fn test_list_sorted_by_name() {
        let registry = MediaTypeRegistry::new();
        registry.register::<UserRecord>().unwrap();
        registry.register::<StatusRecord>().unwrap();

        let names: Vec<&str> = registry.list().iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["StatusRecord", "UserRecord"]);
    }
}
