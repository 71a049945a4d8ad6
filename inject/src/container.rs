//! The main `Container` struct and its associated methods.

use crate::alias::AliasRegistry;
use crate::core::{Binding, Factory, Instance, Mode, ResolutionGuard};
use crate::error::{Error, Result};
use crate::key::BindingKey;
use dashmap::DashMap;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// The dependency injection container.
///
/// Holds exactly one binding per key plus the alias registry. It is
/// thread-safe, so services can be registered and resolved from anywhere
/// at any time. Create independent instances with `Container::new()` to keep a
/// set of bindings away from the global one, e.g. in tests.
#[derive(Default)]
pub struct Container {
  bindings: DashMap<BindingKey, Arc<Binding>>,
  aliases: AliasRegistry,
}

impl Container {
  /// Creates a new, empty `Container`.
  pub fn new() -> Self {
    Self::default()
  }

  // --- PRIVATE HELPERS ---

  pub(crate) fn insert(&self, key: BindingKey, binding: Binding) {
    tracing::debug!(key = %key, mode = ?binding.mode(), "registering binding");
    self.bindings.insert(key, Arc::new(binding));
  }

  /// Drops the binding stored directly under `key`, if any, so lookups fall
  /// through to the alias registry.
  pub(crate) fn unbind(&self, key: &BindingKey) {
    self.bindings.remove(key);
  }

  fn binding(&self, key: &BindingKey) -> Option<Arc<Binding>> {
    // The map guard is dropped here, before any factory runs.
    self.bindings.get(key).map(|binding| Arc::clone(binding.value()))
  }

  fn materialize(&self, key: &BindingKey, binding: &Binding) -> Result<Instance> {
    match binding {
      Binding::Value(instance) => Ok(instance.clone()),
      Binding::Singleton { cell, factory } => {
        if let Some(instance) = cell.get() {
          return Ok(instance.clone());
        }
        let _guard = ResolutionGuard::enter(self, key)?;
        cell
          .get_or_try_init(|| {
            tracing::trace!(key = %key, "materializing singleton");
            factory(self)
          })
          .cloned()
      }
      Binding::Factory { factory } => {
        let _guard = ResolutionGuard::enter(self, key)?;
        factory(self)
      }
    }
  }

  fn typed_factory<T: Any + Send + Sync>(
    factory: impl Fn(&Container) -> Result<T> + Send + Sync + 'static,
  ) -> Factory {
    Arc::new(move |container: &Container| factory(container).map(Instance::new))
  }

  // --- PUBLIC API ---

  // --- Value Registration ---

  /// Stores `value` under `key`, replacing any previous binding and any
  /// singleton memoized for it.
  pub fn set<T: Any + Send + Sync>(&self, key: impl Into<BindingKey>, value: T) {
    self.set_instance(key, Instance::new(value));
  }

  /// Stores an already shared value, e.g. an `Arc<dyn Trait>`.
  pub fn set_arc<T: ?Sized + Any + Send + Sync>(&self, key: impl Into<BindingKey>, value: Arc<T>) {
    self.set_instance(key, Instance::from_arc(value));
  }

  pub fn set_instance(&self, key: impl Into<BindingKey>, instance: Instance) {
    self.insert(key.into(), Binding::Value(instance));
  }

  // --- Factory Registration ---

  /// Registers a factory that runs on first resolution; its result is reused
  /// for every later resolution of `key`.
  pub fn set_singleton<T: Any + Send + Sync>(
    &self,
    key: impl Into<BindingKey>,
    factory: impl Fn(&Container) -> Result<T> + Send + Sync + 'static,
  ) {
    self.insert(
      key.into(),
      Binding::singleton(Self::typed_factory(factory)),
    );
  }

  /// Registers a factory that runs on every resolution of `key`.
  pub fn set_factory<T: Any + Send + Sync>(
    &self,
    key: impl Into<BindingKey>,
    factory: impl Fn(&Container) -> Result<T> + Send + Sync + 'static,
  ) {
    self.insert(
      key.into(),
      Binding::factory(Self::typed_factory(factory)),
    );
  }

  // --- Aliases ---

  /// Appends `key` to the bindings registered under `alias`.
  pub fn add_alias(&self, alias: impl Into<BindingKey>, key: impl Into<BindingKey>) {
    self.aliases.register(alias, key);
  }

  /// Appends `key` under `alias`, presenting its `Arc<T>` as `Arc<I>` through
  /// `cast` whenever it is resolved via the alias.
  pub fn add_alias_as<T, I>(
    &self,
    alias: impl Into<BindingKey>,
    key: impl Into<BindingKey>,
    cast: impl Fn(Arc<T>) -> Arc<I> + Send + Sync + 'static,
  ) where
    T: ?Sized + Any + Send + Sync,
    I: ?Sized + Any + Send + Sync,
  {
    self.aliases.register_as(alias, key, cast);
  }

  pub fn aliases(&self) -> &AliasRegistry {
    &self.aliases
  }

  /// The most recently registered concrete key for `alias`.
  pub fn resolve_one(&self, alias: &BindingKey) -> Option<BindingKey> {
    self.aliases.resolve_one(alias)
  }

  /// Every concrete key registered for `alias`, in registration order.
  pub fn resolve_all(&self, alias: &BindingKey) -> Vec<BindingKey> {
    self.aliases.resolve_all(alias)
  }

  // --- Lookup ---

  /// Whether `key` has a binding or is a known alias.
  pub fn has(&self, key: &BindingKey) -> bool {
    self.bindings.contains_key(key) || self.aliases.contains(key)
  }

  pub fn mode(&self, key: &BindingKey) -> Option<Mode> {
    self.binding(key).map(|binding| binding.mode())
  }

  /// Removes the binding for `key`. Returns `false` if there was none.
  ///
  /// An alias key stops resolving until something is registered under it
  /// again. Alias lists are append-only, so lists naming `key` as a target
  /// keep referring to it, and `get_all` on a deleted alias still sees its
  /// list.
  pub fn delete(&self, key: &BindingKey) -> bool {
    let unbound = self.bindings.remove(key).is_some();
    let hidden = self.aliases.hide(key);
    let removed = unbound || hidden;
    if removed {
      tracing::debug!(key = %key, "deleted binding");
    }
    removed
  }

  /// Forgets every memoized singleton. Factories run again on next use.
  pub fn clear_cache(&self) {
    for mut entry in self.bindings.iter_mut() {
      if let Some(fresh) = entry.value().reset() {
        *entry.value_mut() = Arc::new(fresh);
      }
    }
  }

  pub fn len(&self) -> usize {
    self.bindings.len()
  }

  pub fn is_empty(&self) -> bool {
    self.bindings.is_empty()
  }

  // --- Resolution ---

  /// Resolves `key` to its type-erased instance.
  ///
  /// A key without a binding of its own falls back to the most recently
  /// registered alias target for it.
  pub fn get_instance(&self, key: &BindingKey) -> Result<Instance> {
    if let Some(binding) = self.binding(key) {
      return self.materialize(key, &binding);
    }
    match self.aliases.last(key) {
      Some(target) => {
        let _guard = ResolutionGuard::enter(self, key)?;
        let instance = self.get_instance(&target.key)?;
        target.apply(key, instance)
      }
      None => Err(Error::KeyNotFound(key.clone())),
    }
  }

  /// Resolves `key` and downcasts it to `Arc<T>`.
  pub fn get<T: ?Sized + Any + Send + Sync>(&self, key: impl Into<BindingKey>) -> Result<Arc<T>> {
    let key = key.into();
    let instance = self.get_instance(&key)?;
    instance.downcast::<T>().ok_or_else(|| Error::TypeMismatch {
      key: key.to_string(),
      expected: std::any::type_name::<T>(),
      found: instance.type_name(),
    })
  }

  /// Resolves every binding registered under `alias`, oldest first.
  ///
  /// An alias with no registrations yields an empty list.
  pub fn get_all_instances(&self, alias: &BindingKey) -> Result<Vec<Instance>> {
    self
      .aliases
      .targets(alias)
      .into_iter()
      .map(|target| {
        let instance = self.get_instance(&target.key)?;
        target.apply(alias, instance)
      })
      .collect()
  }

  pub fn get_all<T: ?Sized + Any + Send + Sync>(
    &self,
    alias: impl Into<BindingKey>,
  ) -> Result<Vec<Arc<T>>> {
    let alias = alias.into();
    self
      .get_all_instances(&alias)?
      .into_iter()
      .map(|instance| {
        instance.downcast::<T>().ok_or_else(|| Error::TypeMismatch {
          key: alias.to_string(),
          expected: std::any::type_name::<T>(),
          found: instance.type_name(),
        })
      })
      .collect()
  }
}

impl fmt::Debug for Container {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Container")
      .field("bindings", &self.bindings.len())
      .field("aliases", &self.aliases)
      .finish()
  }
}
