//! The `inject` entry point: wraps targets and registers them.

use crate::alias::AliasTarget;
use crate::args::{Args, Params};
use crate::container::Container;
use crate::core::{view, Binding, Factory, Instance, View};
use crate::error::Result;
use crate::global::global;
use crate::injectable::{Core, Injectable, Scope};
use crate::key::BindingKey;
use crate::signature::Signature;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// Starts an injection with default options.
///
/// `inject()` on its own is the bare form; chain options onto it to configure
/// aliases, explicit binds, factory mode or a custom container.
///
/// # Examples
///
/// ```
/// use fibre_inject::{global, inject, signature};
///
/// global().set("port", 8080_u16);
///
/// let describe = inject().function("describe", signature! { port: u16 }, |p| {
///   Ok(format!("listening on {}", p.get::<u16>("port")?))
/// });
///
/// assert_eq!(describe.invoke().unwrap(), "listening on 8080");
/// ```
pub fn inject() -> Inject {
  Inject::new()
}

/// Injection options.
#[derive(Debug, Clone, Default)]
pub struct Inject {
  aliases: Vec<BindingKey>,
  bind: HashMap<String, BindingKey>,
  use_factory: bool,
  container: Option<Arc<Container>>,
}

impl Inject {
  pub fn new() -> Self {
    Self::default()
  }

  /// Also registers the target under `alias`. May be given more than once.
  pub fn alias(mut self, alias: impl Into<BindingKey>) -> Self {
    self.aliases.push(alias.into());
    self
  }

  /// Resolves parameter `param` from `key`, ahead of every other strategy.
  pub fn bind(mut self, param: impl Into<String>, key: impl Into<BindingKey>) -> Self {
    self.bind.insert(param.into(), key.into());
    self
  }

  /// Registers services in factory mode: a fresh instance per resolution.
  /// Has no effect on functions.
  pub fn use_factory(mut self, use_factory: bool) -> Self {
    self.use_factory = use_factory;
    self
  }

  /// Resolves from and registers into `container` instead of `global()`.
  pub fn container(mut self, container: Arc<Container>) -> Self {
    self.container = Some(container);
    self
  }

  fn scope(&self) -> Scope {
    match &self.container {
      Some(container) => Scope::Shared(Arc::clone(container)),
      None => Scope::Global,
    }
  }

  fn target_container(&self) -> &Container {
    match &self.container {
      Some(container) => container,
      None => global(),
    }
  }

  /// Wraps a function and registers it as a value under `name` and every
  /// alias.
  pub fn function<R, F>(self, name: impl Into<String>, signature: Signature, target: F) -> Injectable<R>
  where
    R: 'static,
    F: Fn(&Params) -> Result<R> + Send + Sync + 'static,
  {
    let core = Arc::new(Core::new(signature, self.bind.clone(), Box::new(target)));
    let injectable = Injectable::new(core, self.scope());

    let container = self.target_container();
    let key = BindingKey::name(name);
    tracing::debug!(key = %key, aliases = ?self.aliases, "registering injectable function");
    container.set(key.clone(), injectable.detached());
    for alias in &self.aliases {
      container.aliases().register(alias.clone(), key.clone());
      container.set(alias.clone(), injectable.detached());
    }
    injectable
  }

  /// Wraps a constructor. Nothing is registered until
  /// [`ServiceBinder::register`] is called.
  pub fn service<T, F>(self, signature: Signature, constructor: F) -> ServiceBinder<T>
  where
    T: Any + Send + Sync,
    F: Fn(&Params) -> Result<T> + Send + Sync + 'static,
  {
    let core = Arc::new(Core::new(signature, self.bind.clone(), Box::new(constructor)));
    ServiceBinder {
      options: self,
      core,
      views: Vec::new(),
    }
  }
}

/// A wrapped constructor awaiting registration.
#[must_use = "the service is not registered until `register` is called"]
pub struct ServiceBinder<T> {
  options: Inject,
  core: Arc<Core<T>>,
  views: Vec<(BindingKey, View)>,
}

impl<T: Any + Send + Sync> ServiceBinder<T> {
  /// Also registers the service under `alias`, resolving to `Arc<T>`.
  pub fn alias(mut self, alias: impl Into<BindingKey>) -> Self {
    self.options.aliases.push(alias.into());
    self
  }

  /// Registers the service under the interface `I`, which it is resolved as
  /// through `cast`. Typically `|svc| svc as Arc<dyn Interface>`.
  pub fn implements<I>(self, cast: impl Fn(Arc<T>) -> Arc<I> + Send + Sync + 'static) -> Self
  where
    I: ?Sized + Any + Send + Sync,
  {
    self.implements_as(BindingKey::of::<I>(), cast)
  }

  /// Like [`ServiceBinder::implements`], under an arbitrary alias key.
  pub fn implements_as<I>(
    mut self,
    alias: impl Into<BindingKey>,
    cast: impl Fn(Arc<T>) -> Arc<I> + Send + Sync + 'static,
  ) -> Self
  where
    I: ?Sized + Any + Send + Sync,
  {
    self.views.push((alias.into(), view(cast)));
    self
  }

  /// Registers the service under its own type and every alias, then returns
  /// the constructor. Calling the returned injectable builds a new `T`.
  pub fn register(self) -> Injectable<T> {
    let ServiceBinder {
      options,
      core,
      views,
    } = self;
    let container = options.target_container();

    let key = BindingKey::of::<T>();
    let constructor = Arc::clone(&core);
    let factory: Factory = Arc::new(move |container: &Container| {
      constructor.call_in(container, Args::new()).map(Instance::new)
    });
    let binding = if options.use_factory {
      Binding::factory(factory)
    } else {
      Binding::singleton(factory)
    };
    container.insert(key.clone(), binding);

    let targets = options
      .aliases
      .iter()
      .map(|alias| (alias.clone(), AliasTarget::new(key.clone(), None)))
      .chain(
        views
          .into_iter()
          .map(|(alias, view)| (alias, AliasTarget::new(key.clone(), Some(view)))),
      );
    // Alias keys resolve through the registry to `key` on every lookup, so a
    // later `set` of `key` is seen through them too.
    for (alias, target) in targets {
      container.aliases().push(alias.clone(), target);
      container.unbind(&alias);
    }

    Injectable::new(core, options.scope())
  }
}
