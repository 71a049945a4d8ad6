//! # Fibre Inject
//!
//! A thread-safe dependency injection runtime for Rust.
//!
//! Fibre Inject combines a keyed service container with injectable functions and
//! constructors. A target declares its parameters once; every call then fills the
//! parameters the caller left out from the container.
//!
//! ## Core Concepts
//!
//! - **Container**: One binding per key, where a key is a name or a type. A binding is
//!   a plain value, a singleton factory (run at most once) or a per-call factory.
//! - **Global Container**: A static, globally-available container, accessible via `global()`.
//! - **Aliases**: Many concrete services can be registered under one alias. A scalar
//!   parameter gets the latest one; a `list` parameter gets all of them, in
//!   registration order.
//! - **Injection**: `inject()` wraps a target. Missing parameters are resolved by
//!   explicit bind, then by name, then by list type, then by type. Anything left
//!   unresolved is reported at once, in one error.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_inject::{args, global, inject, signature};
//! use std::sync::Arc;
//!
//! trait Greeter: Send + Sync {
//!   fn greet(&self, name: &str) -> String;
//! }
//!
//! struct EnglishGreeter {
//!   punctuation: String,
//! }
//!
//! impl Greeter for EnglishGreeter {
//!   fn greet(&self, name: &str) -> String {
//!     format!("Hello, {}{}", name, self.punctuation)
//!   }
//! }
//!
//! fn main() {
//!   global().set("punctuation", String::from("!"));
//!   global().set("name", String::from("Tom"));
//!
//!   // Register a constructor. Its parameters are resolved from the container.
//!   inject()
//!     .service(signature! { punctuation: String }, |p| {
//!       Ok(EnglishGreeter { punctuation: p.cloned("punctuation")? })
//!     })
//!     .implements::<dyn Greeter>(|greeter| greeter as Arc<dyn Greeter>)
//!     .register();
//!
//!   // A function depending on the interface and on a named value.
//!   let welcome = inject().function(
//!     "welcome",
//!     signature! { greeter: dyn Greeter, name: String },
//!     |p| Ok(p.get::<dyn Greeter>("greeter")?.greet(&p.get::<String>("name")?)),
//!   );
//!
//!   assert_eq!(welcome.invoke().unwrap(), "Hello, Tom!");
//!   assert_eq!(welcome.call(args![name = String::from("Jack")]).unwrap(), "Hello, Jack!");
//! }
//! ```

mod alias;
mod args;
mod binder;
mod container;
mod core;
mod error;
mod global;
mod injectable;
mod key;
mod macros;
mod resolver;
mod signature;

pub use crate::alias::AliasRegistry;
pub use crate::args::{Arg, Args, Params};
pub use crate::binder::{inject, Inject, ServiceBinder};
pub use crate::container::Container;
pub use crate::core::{Instance, Mode};
pub use crate::error::{Error, Result};
pub use crate::global::global;
pub use crate::injectable::Injectable;
pub use crate::key::{BindingKey, TypeKey};
pub use crate::signature::{DeclaredType, Parameter, Signature};
