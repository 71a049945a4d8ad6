//! A target wrapped for injection.

use crate::args::{Args, Params};
use crate::container::Container;
use crate::error::{Error, Result};
use crate::global::global;
use crate::key::BindingKey;
use crate::resolver;
use crate::signature::{Parameter, Signature};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

pub(crate) type Target<R> = dyn Fn(&Params) -> Result<R> + Send + Sync;

/// Everything about a target except the container it resolves against.
pub(crate) struct Core<R> {
  params: Arc<[Parameter]>,
  bind: HashMap<String, BindingKey>,
  target: Box<Target<R>>,
}

impl<R> Core<R> {
  pub(crate) fn new(
    signature: Signature,
    bind: HashMap<String, BindingKey>,
    target: Box<Target<R>>,
  ) -> Self {
    Self {
      params: signature.freeze(),
      bind,
      target,
    }
  }

  pub(crate) fn call_in(&self, container: &Container, args: Args) -> Result<R> {
    let params = resolver::resolve(container, &self.params, &self.bind, args)?;
    (self.target)(&params)
  }
}

#[derive(Clone)]
pub(crate) enum Scope {
  Global,
  Shared(Arc<Container>),
  // Copies stored inside their own container hold it weakly so the container
  // does not keep itself alive.
  Detached(Weak<Container>),
}

/// A function or constructor whose parameters are filled from a container.
///
/// Calling it resolves every parameter the caller did not supply, then runs
/// the target. Cloning is cheap and shares the parameter table.
pub struct Injectable<R> {
  core: Arc<Core<R>>,
  scope: Scope,
}

impl<R> Clone for Injectable<R> {
  fn clone(&self) -> Self {
    Self {
      core: Arc::clone(&self.core),
      scope: self.scope.clone(),
    }
  }
}

impl<R> Injectable<R> {
  pub(crate) fn new(core: Arc<Core<R>>, scope: Scope) -> Self {
    Self { core, scope }
  }

  pub(crate) fn detached(&self) -> Self {
    let scope = match &self.scope {
      Scope::Shared(container) => Scope::Detached(Arc::downgrade(container)),
      other => other.clone(),
    };
    Self::new(Arc::clone(&self.core), scope)
  }

  /// Calls the target with `args`, resolving every other parameter.
  pub fn call(&self, args: Args) -> Result<R> {
    match &self.scope {
      Scope::Global => self.core.call_in(global(), args),
      Scope::Shared(container) => self.core.call_in(container, args),
      Scope::Detached(container) => {
        let container = container.upgrade().ok_or(Error::ContainerDropped)?;
        self.core.call_in(&container, args)
      }
    }
  }

  /// Calls the target with every parameter resolved from the container.
  pub fn invoke(&self) -> Result<R> {
    self.call(Args::new())
  }

  pub fn params(&self) -> &[Parameter] {
    &self.core.params
  }
}

impl<R> fmt::Debug for Injectable<R> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let names: Vec<_> = self.core.params.iter().map(Parameter::name).collect();
    f.debug_struct("Injectable")
      .field("params", &names)
      .field("bind", &self.core.bind)
      .finish()
  }
}
