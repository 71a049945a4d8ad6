//! Parameter descriptors for injectable targets.
//!
//! Rust offers no runtime view of a closure's parameters, so a target declares
//! them up front, either with the [`Signature`] builder or the `signature!`
//! macro. The table is built once, when the target is wrapped, and is never
//! recomputed.

use crate::key::TypeKey;
use std::any::Any;
use std::sync::Arc;

/// The type a parameter declares, as far as injection cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredType {
  /// No type: only name matching and explicit binds apply.
  Untyped,
  Type(TypeKey),
  /// A list of `T`, filled from every binding registered under the alias `T`.
  ListOf(TypeKey),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
  name: String,
  declared: DeclaredType,
  has_default: bool,
}

impl Parameter {
  pub fn new(name: impl Into<String>, declared: DeclaredType) -> Self {
    Self {
      name: name.into(),
      declared,
      has_default: false,
    }
  }

  pub fn typed<T: ?Sized + Any>(name: impl Into<String>) -> Self {
    Self::new(name, DeclaredType::Type(TypeKey::of::<T>()))
  }

  pub fn list_of<T: ?Sized + Any>(name: impl Into<String>) -> Self {
    Self::new(name, DeclaredType::ListOf(TypeKey::of::<T>()))
  }

  pub fn untyped(name: impl Into<String>) -> Self {
    Self::new(name, DeclaredType::Untyped)
  }

  /// Marks the parameter as having a default supplied by the target itself.
  /// When nothing resolves it, it is left absent instead of reported missing.
  pub fn with_default(mut self) -> Self {
    self.has_default = true;
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn declared(&self) -> DeclaredType {
    self.declared
  }

  pub fn has_default(&self) -> bool {
    self.has_default
  }
}

/// An ordered parameter list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
  params: Vec<Parameter>,
}

impl Signature {
  pub fn new() -> Self {
    Self::default()
  }

  /// Appends `param`. A parameter with the same name is replaced in place,
  /// keeping its position.
  pub fn push(mut self, param: Parameter) -> Self {
    match self.params.iter_mut().find(|p| p.name == param.name) {
      Some(existing) => *existing = param,
      None => self.params.push(param),
    }
    self
  }

  pub fn param<T: ?Sized + Any>(self, name: impl Into<String>) -> Self {
    self.push(Parameter::typed::<T>(name))
  }

  pub fn untyped(self, name: impl Into<String>) -> Self {
    self.push(Parameter::untyped(name))
  }

  pub fn list<T: ?Sized + Any>(self, name: impl Into<String>) -> Self {
    self.push(Parameter::list_of::<T>(name))
  }

  pub fn defaulted<T: ?Sized + Any>(self, name: impl Into<String>) -> Self {
    self.push(Parameter::typed::<T>(name).with_default())
  }

  pub fn defaulted_untyped(self, name: impl Into<String>) -> Self {
    self.push(Parameter::untyped(name).with_default())
  }

  pub fn defaulted_list<T: ?Sized + Any>(self, name: impl Into<String>) -> Self {
    self.push(Parameter::list_of::<T>(name).with_default())
  }

  pub fn params(&self) -> &[Parameter] {
    &self.params
  }

  pub fn len(&self) -> usize {
    self.params.len()
  }

  pub fn is_empty(&self) -> bool {
    self.params.is_empty()
  }

  pub(crate) fn freeze(self) -> Arc<[Parameter]> {
    self.params.into()
  }
}

impl FromIterator<Parameter> for Signature {
  fn from_iter<I: IntoIterator<Item = Parameter>>(iter: I) -> Self {
    iter.into_iter().fold(Signature::new(), Signature::push)
  }
}
