//! Core data structures shared by the container and the injector.

use crate::container::Container;
use crate::error::{Error, Result};
use crate::key::BindingKey;
use once_cell::sync::OnceCell;
use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

thread_local! {
  // Keys currently being materialized on this thread, tagged with the
  // address of the owning container.
  static RESOLVING_STACK: RefCell<HashSet<(usize, BindingKey)>> = RefCell::new(HashSet::new());
}

/// An RAII guard that detects re-entrant resolution of the same key.
///
/// Entering a singleton's initializer twice on one thread would deadlock on its
/// cell, so the second entry is reported as `Error::CircularDependency`.
pub(crate) struct ResolutionGuard {
  owner: usize,
  key: BindingKey,
}

impl ResolutionGuard {
  pub(crate) fn enter(owner: &Container, key: &BindingKey) -> Result<Self> {
    let owner = owner as *const Container as usize;
    RESOLVING_STACK.with(|stack| {
      if !stack.borrow_mut().insert((owner, key.clone())) {
        return Err(Error::CircularDependency(key.clone()));
      }
      Ok(Self {
        owner,
        key: key.clone(),
      })
    })
  }
}

impl Drop for ResolutionGuard {
  fn drop(&mut self) {
    RESOLVING_STACK.with(|stack| {
      stack.borrow_mut().remove(&(self.owner, self.key.clone()));
    });
  }
}

/// A type-erased, shared service value.
///
/// Internally this is an `Arc<T>` behind `dyn Any`, so cloning an `Instance`
/// never clones the service, and downcasting hands back the very same `Arc<T>`.
/// `T` may be unsized, which is how trait objects are stored.
#[derive(Clone)]
pub struct Instance {
  value: Arc<dyn Any + Send + Sync>,
  type_id: TypeId,
  type_name: &'static str,
}

impl Instance {
  pub fn new<T: Any + Send + Sync>(value: T) -> Self {
    Self::from_arc(Arc::new(value))
  }

  pub fn from_arc<T: ?Sized + Any + Send + Sync>(value: Arc<T>) -> Self {
    Self {
      value: Arc::new(value),
      type_id: TypeId::of::<T>(),
      type_name: std::any::type_name::<T>(),
    }
  }

  /// Returns the stored `Arc<T>`, or `None` if the instance holds another type.
  pub fn downcast<T: ?Sized + Any + Send + Sync>(&self) -> Option<Arc<T>> {
    self.value.downcast_ref::<Arc<T>>().cloned()
  }

  pub fn is<T: ?Sized + Any>(&self) -> bool {
    self.type_id == TypeId::of::<T>()
  }

  pub fn type_name(&self) -> &'static str {
    self.type_name
  }
}

impl fmt::Debug for Instance {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Instance({})", self.type_name)
  }
}

/// Presents a concrete instance as an alias's interface type.
pub(crate) type View = Arc<dyn Fn(&Instance) -> Option<Instance> + Send + Sync>;

pub(crate) fn view<T, I>(cast: impl Fn(Arc<T>) -> Arc<I> + Send + Sync + 'static) -> View
where
  T: ?Sized + Any + Send + Sync,
  I: ?Sized + Any + Send + Sync,
{
  Arc::new(move |instance: &Instance| {
    instance
      .downcast::<T>()
      .map(|concrete| Instance::from_arc(cast(concrete)))
  })
}

pub(crate) type Factory = Arc<dyn Fn(&Container) -> Result<Instance> + Send + Sync>;

/// How a binding produces its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  /// The stored value is returned as-is.
  Value,
  /// The factory runs at most once and its result is reused.
  Singleton,
  /// The factory runs on every resolution.
  Factory,
}

pub(crate) enum Binding {
  Value(Instance),
  Singleton {
    cell: OnceCell<Instance>,
    factory: Factory,
  },
  Factory {
    factory: Factory,
  },
}

impl Binding {
  pub(crate) fn singleton(factory: Factory) -> Self {
    Binding::Singleton {
      cell: OnceCell::new(),
      factory,
    }
  }

  pub(crate) fn factory(factory: Factory) -> Self {
    Binding::Factory { factory }
  }

  pub(crate) fn mode(&self) -> Mode {
    match self {
      Binding::Value(_) => Mode::Value,
      Binding::Singleton { .. } => Mode::Singleton,
      Binding::Factory { .. } => Mode::Factory,
    }
  }

  /// A copy of a materialized singleton with its cache emptied.
  pub(crate) fn reset(&self) -> Option<Binding> {
    match self {
      Binding::Singleton { cell, factory } if cell.get().is_some() => Some(Binding::Singleton {
        cell: OnceCell::new(),
        factory: Arc::clone(factory),
      }),
      _ => None,
    }
  }
}
