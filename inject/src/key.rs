//! Keys that bindings are stored and looked up under.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifies a type, including unsized ones such as `dyn Trait`.
///
/// Two keys are equal when their `TypeId`s are equal; the type name is only
/// carried along for diagnostics.
#[derive(Clone, Copy)]
pub struct TypeKey {
  id: TypeId,
  name: &'static str,
}

impl TypeKey {
  pub fn of<T: ?Sized + Any>() -> Self {
    Self {
      id: TypeId::of::<T>(),
      name: std::any::type_name::<T>(),
    }
  }

  pub fn id(&self) -> TypeId {
    self.id
  }

  pub fn name(&self) -> &'static str {
    self.name
  }
}

impl PartialEq for TypeKey {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.id.hash(state);
  }
}

impl fmt::Debug for TypeKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "TypeKey({})", self.name)
  }
}

impl fmt::Display for TypeKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name)
  }
}

/// The identifier a container entry is stored under: either a plain name or
/// a type.
///
/// Keys are compared exactly. A binding stored under `BindingKey::of::<Foo>()`
/// is never found through a key for some trait `Foo` implements; use an alias
/// for that.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum BindingKey {
  Name(String),
  Type(TypeKey),
}

impl BindingKey {
  /// A key for the type `T`.
  pub fn of<T: ?Sized + Any>() -> Self {
    BindingKey::Type(TypeKey::of::<T>())
  }

  pub fn name(name: impl Into<String>) -> Self {
    BindingKey::Name(name.into())
  }

  pub fn as_name(&self) -> Option<&str> {
    match self {
      BindingKey::Name(name) => Some(name),
      BindingKey::Type(_) => None,
    }
  }

  pub fn as_type(&self) -> Option<TypeKey> {
    match self {
      BindingKey::Name(_) => None,
      BindingKey::Type(key) => Some(*key),
    }
  }
}

impl From<&str> for BindingKey {
  fn from(name: &str) -> Self {
    BindingKey::Name(name.to_owned())
  }
}

impl From<&String> for BindingKey {
  fn from(name: &String) -> Self {
    BindingKey::Name(name.clone())
  }
}

impl From<String> for BindingKey {
  fn from(name: String) -> Self {
    BindingKey::Name(name)
  }
}

impl From<TypeKey> for BindingKey {
  fn from(key: TypeKey) -> Self {
    BindingKey::Type(key)
  }
}

impl From<&BindingKey> for BindingKey {
  fn from(key: &BindingKey) -> Self {
    key.clone()
  }
}

impl fmt::Debug for BindingKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BindingKey::Name(name) => write!(f, "Key(Name({}))", name),
      BindingKey::Type(key) => write!(f, "Key(Type({}))", key.name),
    }
  }
}

impl fmt::Display for BindingKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BindingKey::Name(name) => f.write_str(name),
      BindingKey::Type(key) => f.write_str(key.name),
    }
  }
}
