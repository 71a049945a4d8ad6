//! Call-site arguments and the resolved parameter set handed to a target.

use crate::core::Instance;
use crate::error::{Error, Result};
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// A single argument value: one instance, or an ordered list of them for a
/// list parameter.
#[derive(Debug, Clone)]
pub enum Arg {
  Single(Instance),
  List(Vec<Instance>),
}

impl Arg {
  pub fn value<T: Any + Send + Sync>(value: T) -> Self {
    Arg::Single(Instance::new(value))
  }

  pub fn shared<T: ?Sized + Any + Send + Sync>(value: Arc<T>) -> Self {
    Arg::Single(Instance::from_arc(value))
  }

  pub fn list<T: ?Sized + Any + Send + Sync>(values: impl IntoIterator<Item = Arc<T>>) -> Self {
    Arg::List(values.into_iter().map(Instance::from_arc).collect())
  }
}

impl From<Instance> for Arg {
  fn from(instance: Instance) -> Self {
    Arg::Single(instance)
  }
}

/// Arguments supplied at the call site. Anything supplied here wins over the
/// container.
#[derive(Debug, Clone, Default)]
pub struct Args {
  pub(crate) positional: Vec<Arg>,
  pub(crate) keyword: HashMap<String, Arg>,
}

impl Args {
  pub fn new() -> Self {
    Self::default()
  }

  /// Appends a positional argument.
  pub fn arg<T: Any + Send + Sync>(self, value: T) -> Self {
    self.push(Arg::value(value))
  }

  pub fn arg_arc<T: ?Sized + Any + Send + Sync>(self, value: Arc<T>) -> Self {
    self.push(Arg::shared(value))
  }

  pub fn arg_list<T: ?Sized + Any + Send + Sync>(self, values: impl IntoIterator<Item = Arc<T>>) -> Self {
    self.push(Arg::list(values))
  }

  /// Sets a keyword argument, replacing an earlier one with the same name.
  pub fn kwarg<T: Any + Send + Sync>(self, name: impl Into<String>, value: T) -> Self {
    self.insert(name, Arg::value(value))
  }

  pub fn kwarg_arc<T: ?Sized + Any + Send + Sync>(self, name: impl Into<String>, value: Arc<T>) -> Self {
    self.insert(name, Arg::shared(value))
  }

  pub fn kwarg_list<T: ?Sized + Any + Send + Sync>(
    self,
    name: impl Into<String>,
    values: impl IntoIterator<Item = Arc<T>>,
  ) -> Self {
    self.insert(name, Arg::list(values))
  }

  pub fn push(mut self, arg: Arg) -> Self {
    self.positional.push(arg);
    self
  }

  pub fn insert(mut self, name: impl Into<String>, arg: Arg) -> Self {
    self.keyword.insert(name.into(), arg);
    self
  }

  pub fn is_empty(&self) -> bool {
    self.positional.is_empty() && self.keyword.is_empty()
  }
}

/// The merged arguments a target is invoked with, keyed by parameter name.
///
/// Parameters that declared a default and could not be resolved are absent;
/// read those with [`Params::get_opt`].
#[derive(Debug, Clone, Default)]
pub struct Params {
  values: HashMap<String, Arg>,
}

impl Params {
  pub(crate) fn insert(&mut self, name: &str, arg: Arg) {
    self.values.insert(name.to_owned(), arg);
  }

  pub fn contains(&self, name: &str) -> bool {
    self.values.contains_key(name)
  }

  pub fn raw(&self, name: &str) -> Option<&Arg> {
    self.values.get(name)
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  /// The value of parameter `name` as `Arc<T>`.
  pub fn get<T: ?Sized + Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>> {
    self
      .get_opt(name)?
      .ok_or_else(|| Error::Unresolved(name.to_owned()))
  }

  /// Like [`Params::get`], but `None` for a defaulted parameter that was left
  /// unresolved.
  pub fn get_opt<T: ?Sized + Any + Send + Sync>(&self, name: &str) -> Result<Option<Arc<T>>> {
    match self.values.get(name) {
      None => Ok(None),
      Some(Arg::Single(instance)) => downcast(name, instance).map(Some),
      Some(Arg::List(_)) => Err(Error::TypeMismatch {
        key: name.to_owned(),
        expected: std::any::type_name::<T>(),
        found: "list",
      }),
    }
  }

  /// A clone of the value of parameter `name`.
  pub fn cloned<T: Clone + Any + Send + Sync>(&self, name: &str) -> Result<T> {
    self.get::<T>(name).map(|value| (*value).clone())
  }

  /// The values of list parameter `name`, in resolution order.
  pub fn list<T: ?Sized + Any + Send + Sync>(&self, name: &str) -> Result<Vec<Arc<T>>> {
    match self.values.get(name) {
      None => Err(Error::Unresolved(name.to_owned())),
      Some(Arg::List(instances)) => instances
        .iter()
        .map(|instance| downcast(name, instance))
        .collect(),
      Some(Arg::Single(instance)) => Err(Error::TypeMismatch {
        key: name.to_owned(),
        expected: "list",
        found: instance.type_name(),
      }),
    }
  }
}

fn downcast<T: ?Sized + Any + Send + Sync>(name: &str, instance: &Instance) -> Result<Arc<T>> {
  instance.downcast::<T>().ok_or_else(|| Error::TypeMismatch {
    key: name.to_owned(),
    expected: std::any::type_name::<T>(),
    found: instance.type_name(),
  })
}
