//! Public macros for ergonomic resolution and target declaration.

/// Resolves a service from the global container.
///
/// The shorthand for pulling a dependency by hand. It panics if the requested
/// service cannot be resolved; use [`maybe_resolve!`] or `global().get(...)`
/// to handle that case.
///
/// # Panics
///
/// Panics if the service is not registered, holds another type, or its
/// factory fails.
///
/// # Examples
///
/// ```
/// use fibre_inject::{global, resolve};
///
/// global().set_singleton(fibre_inject::BindingKey::of::<String>(), |_| Ok(String::from("hello")));
/// let message = resolve!(String);
/// assert_eq!(*message, "hello");
///
/// global().set("motd", String::from("welcome"));
/// assert_eq!(*resolve!(String, "motd"), "welcome");
/// ```
///
/// ```
/// use fibre_inject::{global, resolve, BindingKey};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync { fn greet(&self) -> String; }
/// struct EnglishGreeter;
/// impl Greeter for EnglishGreeter { fn greet(&self) -> String { "Hello!".to_string() } }
///
/// global().set_arc(BindingKey::of::<dyn Greeter>(), Arc::new(EnglishGreeter) as Arc<dyn Greeter>);
///
/// let greeter = resolve!(trait Greeter);
/// assert_eq!(greeter.greet(), "Hello!");
/// ```
#[macro_export]
macro_rules! resolve {
  // resolve!(trait MyTrait)
  (trait $trait_ident:ident) => {
    $crate::global()
      .get::<dyn $trait_ident>($crate::BindingKey::of::<dyn $trait_ident>())
      .unwrap_or_else(|err| {
        panic!(
          "Failed to resolve required trait service {}: {}",
          std::any::type_name::<dyn $trait_ident>(),
          err
        )
      })
  };

  // resolve!(trait MyTrait, "name")
  (trait $trait_ident:ident, $name:expr) => {
    $crate::global()
      .get::<dyn $trait_ident>($name)
      .unwrap_or_else(|err| {
        panic!(
          "Failed to resolve required trait service with name '{}': {}",
          $name, err
        )
      })
  };

  // resolve!(MyService)
  ($type:ty) => {
    $crate::global()
      .get::<$type>($crate::BindingKey::of::<$type>())
      .unwrap_or_else(|err| {
        panic!(
          "Failed to resolve required service {}: {}",
          std::any::type_name::<$type>(),
          err
        )
      })
  };

  // resolve!(MyService, "name")
  ($type:ty, $name:expr) => {
    $crate::global()
      .get::<$type>($name)
      .unwrap_or_else(|err| {
        panic!(
          "Failed to resolve required service with name '{}': {}",
          $name, err
        )
      })
  };
}

/// Like [`resolve!`], but yields an `Option` instead of panicking.
#[macro_export]
macro_rules! maybe_resolve {
  (trait $trait_ident:ident) => {
    $crate::global()
      .get::<dyn $trait_ident>($crate::BindingKey::of::<dyn $trait_ident>())
      .ok()
  };
  (trait $trait_ident:ident, $name:expr) => {
    $crate::global().get::<dyn $trait_ident>($name).ok()
  };
  ($type:ty) => {
    $crate::global()
      .get::<$type>($crate::BindingKey::of::<$type>())
      .ok()
  };
  ($type:ty, $name:expr) => {
    $crate::global().get::<$type>($name).ok()
  };
}

/// Declares a target's parameter table.
///
/// Each entry is `name: Type`, `name: list Type` for a list filled from an
/// alias, or a bare `name` for an untyped parameter. Append `= default` to
/// any of them when the target supplies its own default.
///
/// ```
/// use fibre_inject::signature;
///
/// trait Plugin {}
///
/// let sig = signature! {
///   host: String,
///   port: u16 = default,
///   plugins: list dyn Plugin,
///   extra,
/// };
/// assert_eq!(sig.len(), 4);
/// ```
#[macro_export]
macro_rules! signature {
  () => {
    $crate::Signature::new()
  };
  ($($body:tt)+) => {
    $crate::__signature_entries!($crate::Signature::new(); $($body)+)
  };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __signature_entries {
  ($sig:expr;) => {
    $sig
  };
  ($sig:expr; $name:ident : list $ty:ty = default $(, $($rest:tt)*)?) => {
    $crate::__signature_entries!($sig.defaulted_list::<$ty>(stringify!($name)); $($($rest)*)?)
  };
  ($sig:expr; $name:ident : list $ty:ty $(, $($rest:tt)*)?) => {
    $crate::__signature_entries!($sig.list::<$ty>(stringify!($name)); $($($rest)*)?)
  };
  ($sig:expr; $name:ident : $ty:ty = default $(, $($rest:tt)*)?) => {
    $crate::__signature_entries!($sig.defaulted::<$ty>(stringify!($name)); $($($rest)*)?)
  };
  ($sig:expr; $name:ident : $ty:ty $(, $($rest:tt)*)?) => {
    $crate::__signature_entries!($sig.param::<$ty>(stringify!($name)); $($($rest)*)?)
  };
  ($sig:expr; $name:ident = default $(, $($rest:tt)*)?) => {
    $crate::__signature_entries!($sig.defaulted_untyped(stringify!($name)); $($($rest)*)?)
  };
  ($sig:expr; $name:ident $(, $($rest:tt)*)?) => {
    $crate::__signature_entries!($sig.untyped(stringify!($name)); $($($rest)*)?)
  };
}

/// Builds call-site [`Args`](crate::Args): bare expressions are positional,
/// `name = expr` entries are keyword arguments.
///
/// ```
/// use fibre_inject::args;
///
/// let args = args![5_i64, b = String::from("y")];
/// assert!(!args.is_empty());
/// ```
#[macro_export]
macro_rules! args {
  () => {
    $crate::Args::new()
  };
  ($($body:tt)+) => {
    $crate::__args_entries!($crate::Args::new(); $($body)+)
  };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __args_entries {
  ($args:expr;) => {
    $args
  };
  ($args:expr; $name:ident = $value:expr $(, $($rest:tt)*)?) => {
    $crate::__args_entries!($args.kwarg(stringify!($name), $value); $($($rest)*)?)
  };
  ($args:expr; $value:expr $(, $($rest:tt)*)?) => {
    $crate::__args_entries!($args.arg($value); $($($rest)*)?)
  };
}
