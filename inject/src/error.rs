use crate::key::BindingKey;
use thiserror::Error;

/// The error type for container lookups and injected calls.
#[derive(Debug, Error)]
pub enum Error {
  #[error("Service `{0}` is not registered")]
  KeyNotFound(BindingKey),

  /// One or more required parameters could not be resolved. Every missing
  /// parameter of the call is listed, not just the first.
  #[error(
    "Cannot execute function without required parameters. Did you forget to bind the following parameters: {}?",
    format_missing(.missing)
  )]
  Execution { missing: Vec<String> },

  #[error("`{key}` holds a value of type `{found}`, but `{expected}` was requested")]
  TypeMismatch {
    key: String,
    expected: &'static str,
    found: &'static str,
  },

  #[error("Parameter `{0}` was left to its default and has no value")]
  Unresolved(String),

  #[error("Too many positional arguments: the target takes {expected}, {given} were given")]
  TooManyArguments { expected: usize, given: usize },

  #[error("Unexpected keyword argument `{0}`")]
  UnexpectedArgument(String),

  #[error("Parameter `{0}` was given both positionally and by keyword")]
  DuplicateArgument(String),

  #[error("Circular dependency detected while resolving service: {0:?}")]
  CircularDependency(BindingKey),

  #[error("The container this target was registered in has been dropped")]
  ContainerDropped,
}

fn format_missing(missing: &[String]) -> String {
  missing
    .iter()
    .map(|name| format!("`{}`", name))
    .collect::<Vec<_>>()
    .join(", ")
}

/// A specialized `Result` type for `fibre_inject` operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
