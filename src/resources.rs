//! Name-keyed resource cache
//!
//! Shared meshes and materials are constructed once and handed out as `Rc`
//! clones, so every spawner that asks for the same key gets the same instance.
//! The cache is owned by the bootstrap and passed by reference; it is only
//! touched from the simulation/render thread.

use std::any::{Any, type_name};
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::ResourceError;

#[derive(Default)]
pub struct ResourceCache {
    entries: HashMap<String, Rc<dyn Any>>,
    /// Number of resources constructed through this cache
    created: usize,
}

impl ResourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a resource by name
    ///
    /// Returns `None` when the name is absent or registered with another type.
    pub fn get<T: Any>(&self, name: &str) -> Option<Rc<T>> {
        let entry = self.entries.get(name)?;
        match Rc::clone(entry).downcast::<T>() {
            Ok(resource) => Some(resource),
            Err(_) => {
                log::warn!("Resource `{}` is not a {}", name, type_name::<T>());
                None
            }
        }
    }

    /// Register a new resource under `name`
    pub fn create<T: Any>(&mut self, name: &str, resource: T) -> Result<Rc<T>, ResourceError> {
        if self.entries.contains_key(name) {
            return Err(ResourceError::AlreadyExists(name.to_string()));
        }
        let resource = Rc::new(resource);
        self.entries
            .insert(name.to_string(), Rc::clone(&resource) as Rc<dyn Any>);
        self.created += 1;
        log::debug!("Created resource `{}` ({})", name, type_name::<T>());
        Ok(resource)
    }

    /// Return the cached resource, building it with `build` on first use
    pub fn get_or_create_with<T: Any>(
        &mut self,
        name: &str,
        build: impl FnOnce() -> T,
    ) -> Result<Rc<T>, ResourceError> {
        if let Some(entry) = self.entries.get(name) {
            return Rc::clone(entry)
                .downcast::<T>()
                .map_err(|_| ResourceError::TypeMismatch {
                    name: name.to_string(),
                    expected: type_name::<T>(),
                });
        }
        self.create(name, build())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total constructions over the cache lifetime
    pub fn created(&self) -> usize {
        self.created
    }

    /// Drop every cached resource (outstanding `Rc`s stay valid)
    pub fn clear(&mut self) {
        log::info!("Releasing {} cached resources", self.entries.len());
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing() {
        let cache = ResourceCache::new();
        assert!(cache.get::<u32>("nothing").is_none());
    }

    #[test]
    fn test_create_then_get_same_instance() {
        let mut cache = ResourceCache::new();
        let created = cache.create("answer", 42_u32).unwrap();
        let fetched = cache.get::<u32>("answer").unwrap();
        assert!(Rc::ptr_eq(&created, &fetched));
    }

    #[test]
    fn test_create_duplicate_fails() {
        let mut cache = ResourceCache::new();
        cache.create("dup", 1_u32).unwrap();
        let err = cache.create("dup", 2_u32).unwrap_err();
        assert!(matches!(err, ResourceError::AlreadyExists(name) if name == "dup"));
        assert_eq!(*cache.get::<u32>("dup").unwrap(), 1);
    }

    #[test]
    fn test_wrong_type_is_absent() {
        let mut cache = ResourceCache::new();
        cache.create("text", String::from("hi")).unwrap();
        assert!(cache.get::<u32>("text").is_none());
        assert!(matches!(
            cache.get_or_create_with("text", || 7_u32),
            Err(ResourceError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_get_or_create_builds_once() {
        let mut cache = ResourceCache::new();
        let mut builds = 0;
        let a = cache
            .get_or_create_with("mesh", || {
                builds += 1;
                vec![1.0_f32, 2.0]
            })
            .unwrap();
        let b = cache
            .get_or_create_with("mesh", || {
                builds += 1;
                vec![3.0_f32]
            })
            .unwrap();
        assert_eq!(builds, 1);
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(cache.created(), 1);
    }
}
