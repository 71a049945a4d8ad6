//! Ordered multi-bindings: many concrete keys registered under one alias.

use crate::core::{view, Instance, View};
use crate::error::{Error, Result};
use crate::key::BindingKey;
use dashmap::DashMap;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// One concrete binding registered under an alias.
#[derive(Clone)]
pub(crate) struct AliasTarget {
  pub(crate) key: BindingKey,
  view: Option<View>,
}

impl AliasTarget {
  pub(crate) fn new(key: BindingKey, view: Option<View>) -> Self {
    Self { key, view }
  }

  /// Presents `instance`, resolved from `self.key`, as the alias's type.
  pub(crate) fn apply(&self, alias: &BindingKey, instance: Instance) -> Result<Instance> {
    match &self.view {
      None => Ok(instance),
      Some(view) => view(&instance).ok_or_else(|| Error::TypeMismatch {
        key: alias.to_string(),
        expected: alias_type_name(alias),
        found: instance.type_name(),
      }),
    }
  }
}

fn alias_type_name(alias: &BindingKey) -> &'static str {
  alias.as_type().map(|key| key.name()).unwrap_or("<alias view>")
}

impl fmt::Debug for AliasTarget {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AliasTarget")
      .field("key", &self.key)
      .field("view", &self.view.is_some())
      .finish()
  }
}

#[derive(Default)]
struct AliasList {
  targets: Vec<AliasTarget>,
  // Set by `Container::delete` on the alias key; cleared by the next append.
  hidden: bool,
}

/// Maps each alias to the concrete keys registered under it, in registration
/// order.
///
/// Lists are append-only: entries are never reordered, deduplicated or
/// removed. Reads copy the list out, so a reader never observes a partially
/// applied append.
///
/// A hidden alias no longer resolves as a single key (`resolve_one`,
/// `contains`) until something is registered under it again. Its list is
/// still returned by `resolve_all`.
#[derive(Default)]
pub struct AliasRegistry {
  entries: DashMap<BindingKey, AliasList>,
}

impl AliasRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Appends `key` to the list for `alias`, creating the list if needed.
  pub fn register(&self, alias: impl Into<BindingKey>, key: impl Into<BindingKey>) {
    self.push(alias.into(), AliasTarget::new(key.into(), None));
  }

  /// Appends `key` to the list for `alias`. Resolving it through the alias
  /// presents its `Arc<T>` as `Arc<I>` via `cast`.
  pub fn register_as<T, I>(
    &self,
    alias: impl Into<BindingKey>,
    key: impl Into<BindingKey>,
    cast: impl Fn(Arc<T>) -> Arc<I> + Send + Sync + 'static,
  ) where
    T: ?Sized + Any + Send + Sync,
    I: ?Sized + Any + Send + Sync,
  {
    self.push(alias.into(), AliasTarget::new(key.into(), Some(view(cast))));
  }

  pub(crate) fn push(&self, alias: BindingKey, target: AliasTarget) {
    tracing::trace!(alias = %alias, key = %target.key, "appending alias target");
    let mut list = self.entries.entry(alias).or_default();
    list.hidden = false;
    list.targets.push(target);
  }

  /// Hides `alias` from single-key lookups. Returns `false` if it was not
  /// visible.
  pub(crate) fn hide(&self, alias: &BindingKey) -> bool {
    match self.entries.get_mut(alias) {
      Some(mut list) if !list.hidden => {
        list.hidden = true;
        true
      }
      _ => false,
    }
  }

  /// The most recently registered concrete key for `alias`.
  pub fn resolve_one(&self, alias: &BindingKey) -> Option<BindingKey> {
    self.last(alias).map(|target| target.key)
  }

  /// Every concrete key registered for `alias`, oldest first.
  pub fn resolve_all(&self, alias: &BindingKey) -> Vec<BindingKey> {
    self
      .targets(alias)
      .into_iter()
      .map(|target| target.key)
      .collect()
  }

  pub fn contains(&self, alias: &BindingKey) -> bool {
    self
      .entries
      .get(alias)
      .map_or(false, |list| !list.hidden)
  }

  pub(crate) fn last(&self, alias: &BindingKey) -> Option<AliasTarget> {
    self
      .entries
      .get(alias)
      .filter(|list| !list.hidden)
      .and_then(|list| list.targets.last().cloned())
  }

  pub(crate) fn targets(&self, alias: &BindingKey) -> Vec<AliasTarget> {
    self
      .entries
      .get(alias)
      .map(|list| list.targets.clone())
      .unwrap_or_default()
  }
}

impl fmt::Debug for AliasRegistry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AliasRegistry")
      .field("aliases", &self.entries.len())
      .finish()
  }
}
