//! Merges call-site arguments with container-resolved values.

use crate::args::{Arg, Args, Params};
use crate::container::Container;
use crate::error::{Error, Result};
use crate::key::BindingKey;
use crate::signature::{DeclaredType, Parameter};
use std::collections::HashMap;

/// Builds the parameter set for one call.
///
/// A parameter supplied by the caller is taken as-is. Anything else is tried,
/// in order, through an explicit bind, its name, its list type and its plain
/// type. Every parameter that stays unresolved without a default is collected
/// and reported in a single `Error::Execution`.
pub(crate) fn resolve(
  container: &Container,
  params: &[Parameter],
  bind: &HashMap<String, BindingKey>,
  args: Args,
) -> Result<Params> {
  let Args {
    positional,
    mut keyword,
  } = args;

  if positional.len() > params.len() {
    return Err(Error::TooManyArguments {
      expected: params.len(),
      given: positional.len(),
    });
  }
  if let Some(name) = keyword
    .keys()
    .find(|name| !params.iter().any(|p| p.name() == name.as_str()))
  {
    return Err(Error::UnexpectedArgument(name.clone()));
  }

  let mut resolved = Params::default();
  let mut missing = Vec::new();
  let mut positional = positional.into_iter();

  for param in params {
    let supplied = match (positional.next(), keyword.remove(param.name())) {
      (Some(_), Some(_)) => return Err(Error::DuplicateArgument(param.name().to_owned())),
      (Some(arg), None) | (None, Some(arg)) => Some(arg),
      (None, None) => None,
    };
    if let Some(arg) = supplied {
      resolved.insert(param.name(), arg);
      continue;
    }

    match resolve_param(container, param, bind)? {
      Some(arg) => resolved.insert(param.name(), arg),
      None if param.has_default() => {
        tracing::trace!(param = param.name(), "left to its default");
      }
      None => missing.push(param.name().to_owned()),
    }
  }

  if !missing.is_empty() {
    tracing::debug!(?missing, "unresolved parameters");
    return Err(Error::Execution { missing });
  }
  Ok(resolved)
}

fn resolve_param(
  container: &Container,
  param: &Parameter,
  bind: &HashMap<String, BindingKey>,
) -> Result<Option<Arg>> {
  if let Some(key) = bind.get(param.name()).filter(|key| container.has(key)) {
    tracing::trace!(param = param.name(), key = %key, "resolved by explicit bind");
    return container.get_instance(key).map(|i| Some(Arg::Single(i)));
  }

  let by_name = BindingKey::name(param.name());
  if container.has(&by_name) {
    tracing::trace!(param = param.name(), "resolved by name");
    return container.get_instance(&by_name).map(|i| Some(Arg::Single(i)));
  }

  match param.declared() {
    DeclaredType::ListOf(ty) => {
      let instances = container.get_all_instances(&ty.into())?;
      tracing::trace!(param = param.name(), count = instances.len(), "resolved list by alias");
      Ok(Some(Arg::List(instances)))
    }
    DeclaredType::Type(ty) => {
      let by_type = BindingKey::from(ty);
      if !container.has(&by_type) {
        return Ok(None);
      }
      tracing::trace!(param = param.name(), ty = ty.name(), "resolved by type");
      container.get_instance(&by_type).map(|i| Some(Arg::Single(i)))
    }
    DeclaredType::Untyped => Ok(None),
  }
}
