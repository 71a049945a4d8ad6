//! The global container instance and access functions.

use crate::container::Container;
use once_cell::sync::Lazy;

// The one and only global container instance.
// It will be created on its first access in a thread-safe manner.
static GLOBAL_CONTAINER: Lazy<Container> = Lazy::new(Container::default);

/// Provides a reference to the global container instance.
///
/// Injected targets resolve against this container unless they were given one
/// of their own with [`Inject::container`](crate::Inject::container).
///
/// # Examples
///
/// ```
/// use fibre_inject::global;
///
/// fn register_services() {
///   global().set("greeting", String::from("Hello from global!"));
/// }
///
/// register_services();
/// assert_eq!(*global().get::<String>("greeting").unwrap(), "Hello from global!");
/// ```
pub fn global() -> &'static Container {
  &GLOBAL_CONTAINER
}
