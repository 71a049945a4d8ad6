//! Injection of functions and constructors against the global container and
//! against caller-owned ones.

use fibre_inject::{
  args, global, inject, resolve, signature, BindingKey, Container, Error, Injectable, Signature,
};
use pretty_assertions::assert_eq;
use serial_test::serial;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

// --- Test Fixtures ---

fn seed_global() {
  global().set("a", 1_i64);
  global().set("b", String::from("test"));
  global().set("c", 2_i64);
  global().set("d", String::from("test_2"));
  global().set("message", String::from("Hello, Tom"));
}

fn pair() -> Injectable<(i64, String)> {
  inject().function("inject_test", signature! { a: i64, b: String }, |p| {
    Ok((p.cloned("a")?, p.cloned("b")?))
  })
}

fn same_object<T: ?Sized, U: ?Sized>(a: &Arc<T>, b: &Arc<U>) -> bool {
  Arc::as_ptr(a).cast::<()>() == Arc::as_ptr(b).cast::<()>()
}

// --- Global Container Tests ---

#[test]
#[serial]
fn test_can_inject_values_to_function() {
  seed_global();
  assert_eq!(pair().invoke().unwrap(), (1, "test".to_string()));
}

#[test]
#[serial]
fn test_can_override_injected_values() {
  seed_global();
  let inject_test = pair();

  assert_eq!(inject_test.call(args![12_i64]).unwrap(), (12, "test".to_string()));
  assert_eq!(
    inject_test.call(args![b = String::from("test_2")]).unwrap(),
    (1, "test_2".to_string())
  );
  assert_eq!(
    inject_test
      .call(args![12_i64, String::from("test_2")])
      .unwrap(),
    (12, "test_2".to_string())
  );
  assert_eq!(inject_test.invoke().unwrap(), (1, "test".to_string()));
}

#[test]
#[serial]
fn test_later_set_is_seen_by_next_call() {
  seed_global();
  let inject_test = pair();

  global().set("b", String::from("changed"));
  assert_eq!(inject_test.invoke().unwrap(), (1, "changed".to_string()));

  seed_global();
  assert_eq!(inject_test.invoke().unwrap(), (1, "test".to_string()));
}

#[test]
#[serial]
fn test_can_do_constructor_injection() {
  seed_global();
  struct Greeting {
    message: String,
  }

  let new_greeting = inject()
    .service(signature! { message: String }, |p| {
      Ok(Greeting {
        message: p.cloned("message")?,
      })
    })
    .register();

  assert_eq!(new_greeting.invoke().unwrap().message, "Hello, Tom");
  assert_eq!(
    new_greeting
      .call(args![String::from("Hello, Jack")])
      .unwrap()
      .message,
    "Hello, Jack"
  );
  assert_eq!(resolve!(Greeting).message, "Hello, Tom");
}

#[test]
#[serial]
fn test_map_dependencies() {
  seed_global();
  let map_dependencies_test = inject()
    .alias("map_dependencies")
    .bind("a", "c")
    .bind("b", "d")
    .function("map_dependencies_test", signature! { a: i64, b: String }, |p| {
      Ok((p.cloned::<i64>("a")?, p.cloned::<String>("b")?))
    });

  assert!(global().has(&"map_dependencies".into()));
  assert_eq!(map_dependencies_test.invoke().unwrap(), (2, "test_2".to_string()));

  let registered = global()
    .get::<Injectable<(i64, String)>>("map_dependencies")
    .unwrap();
  assert_eq!(
    registered.invoke().unwrap(),
    map_dependencies_test.invoke().unwrap()
  );
  assert_eq!(
    global().resolve_all(&"map_dependencies".into()),
    vec![BindingKey::from("map_dependencies_test")]
  );
}

#[test]
#[serial]
fn test_resolve_complex_dependencies() {
  seed_global();
  struct A {
    message: String,
  }
  struct B {
    a: i64,
    a_inst: Arc<A>,
  }
  struct C {
    a_inst: Arc<A>,
    b_inst: Arc<B>,
  }

  inject()
    .service(signature! { message: String }, |p| {
      Ok(A {
        message: p.cloned("message")?,
      })
    })
    .register();
  inject()
    .service(signature! { a: i64, a_inst: A }, |p| {
      Ok(B {
        a: p.cloned("a")?,
        a_inst: p.get("a_inst")?,
      })
    })
    .register();
  let new_c = inject()
    .service(signature! { a_inst: A, b_inst: B }, |p| {
      Ok(C {
        a_inst: p.get("a_inst")?,
        b_inst: p.get("b_inst")?,
      })
    })
    .register();

  let c_inst = new_c.invoke().unwrap();

  assert!(Arc::ptr_eq(&c_inst.a_inst, &resolve!(A)));
  assert!(Arc::ptr_eq(&c_inst.b_inst, &resolve!(B)));
  assert!(Arc::ptr_eq(&c_inst.a_inst, &c_inst.b_inst.a_inst));
  assert_eq!(c_inst.a_inst.message, "Hello, Tom");
  assert_eq!(c_inst.b_inst.a, 1);
}

#[test]
fn test_aliasing() {
  trait IX: Send + Sync {}
  struct X;
  impl IX for X {}

  inject()
    .service(Signature::new(), |_| Ok(X))
    .implements::<dyn IX>(|x| x as Arc<dyn IX>)
    .alias("x_by_name")
    .register();

  let x = resolve!(X);
  let ix = resolve!(trait IX);
  assert!(same_object(&x, &ix));
  assert!(Arc::ptr_eq(&x, &resolve!(X, "x_by_name")));
}

#[test]
fn test_execution_error() {
  let container = Arc::new(Container::new());
  container.set("a", String::from("present"));
  let ran = Arc::new(AtomicUsize::new(0));
  let counter = Arc::clone(&ran);

  let inject_test = inject().container(container).function(
    "inject_test",
    signature! { missing: String, another_missing: i64, a: String },
    move |_| {
      counter.fetch_add(1, Ordering::SeqCst);
      Ok(false)
    },
  );

  let err = inject_test.invoke().unwrap_err();
  let message = err.to_string();
  assert!(message.contains("`missing`"));
  assert!(message.contains("`another_missing`"));
  assert!(!message.contains("`a`"));
  assert!(matches!(
    err,
    Error::Execution { missing } if missing == vec!["missing", "another_missing"]
  ));
  // The target never ran.
  assert_eq!(ran.load(Ordering::SeqCst), 0);
}

#[test]
fn test_inject_with_custom_container() {
  let my_container = Arc::new(Container::new());
  my_container.set("custom_a", String::from("Some A"));

  let test_a = inject()
    .container(Arc::clone(&my_container))
    .function("test_a", signature! { custom_a: String }, |p| {
      p.cloned::<String>("custom_a")
    });

  assert_eq!(test_a.invoke().unwrap(), "Some A");
  assert!(my_container.has(&"test_a".into()));
  assert!(!global().has(&"custom_a".into()));
}

#[test]
fn test_inject_as_factory() {
  static CREATED: AtomicUsize = AtomicUsize::new(0);
  struct Stamp {
    serial: usize,
  }

  inject()
    .use_factory(true)
    .service(Signature::new(), |_| {
      Ok(Stamp {
        serial: CREATED.fetch_add(1, Ordering::SeqCst),
      })
    })
    .register();

  let x_1 = resolve!(Stamp);
  let x_2 = resolve!(Stamp);

  assert!(!Arc::ptr_eq(&x_1, &x_2));
  assert_ne!(x_1.serial, x_2.serial);
}

#[test]
fn test_injecting_alias_list() {
  // given
  trait Interface: Send + Sync {
    fn label(&self) -> &'static str;
  }
  struct ConcreteA;
  struct ConcreteB;
  struct ConcreteC;
  impl Interface for ConcreteA {
    fn label(&self) -> &'static str {
      "a"
    }
  }
  impl Interface for ConcreteB {
    fn label(&self) -> &'static str {
      "b"
    }
  }
  impl Interface for ConcreteC {
    fn label(&self) -> &'static str {
      "c"
    }
  }

  inject()
    .service(Signature::new(), |_| Ok(ConcreteA))
    .implements::<dyn Interface>(|c| c as Arc<dyn Interface>)
    .register();
  inject()
    .service(Signature::new(), |_| Ok(ConcreteB))
    .implements::<dyn Interface>(|c| c as Arc<dyn Interface>)
    .register();
  inject()
    .service(Signature::new(), |_| Ok(ConcreteC))
    .implements::<dyn Interface>(|c| c as Arc<dyn Interface>)
    .register();

  struct UseAllInterface {
    concretes: Vec<Arc<dyn Interface>>,
  }
  inject()
    .service(signature! { concretes: list dyn Interface }, |p| {
      Ok(UseAllInterface {
        concretes: p.list("concretes")?,
      })
    })
    .register();

  // when
  let instance = resolve!(UseAllInterface);

  // then
  let labels: Vec<_> = instance.concretes.iter().map(|c| c.label()).collect();
  assert_eq!(labels, vec!["a", "b", "c"]);
  assert!(same_object(&instance.concretes[0], &resolve!(ConcreteA)));
  assert!(same_object(&instance.concretes[1], &resolve!(ConcreteB)));
  assert!(same_object(&instance.concretes[2], &resolve!(ConcreteC)));

  // A scalar parameter of the alias type gets the latest registration.
  assert_eq!(resolve!(trait Interface).label(), "c");
}

// --- Precedence Tests (isolated containers) ---

#[test]
fn test_explicit_bind_beats_name_match() {
  let container = Arc::new(Container::new());
  container.set("a", 1_i64);
  container.set("c", 3_i64);

  let target = inject()
    .container(container)
    .bind("a", "c")
    .function("target", signature! { a: i64 }, |p| p.cloned::<i64>("a"));

  assert_eq!(target.invoke().unwrap(), 3);
}

#[test]
fn test_unregistered_bind_falls_through_to_name() {
  let container = Arc::new(Container::new());
  container.set("a", 1_i64);

  let target = inject()
    .container(container)
    .bind("a", "not_registered")
    .function("target", signature! { a: i64 }, |p| p.cloned::<i64>("a"));

  assert_eq!(target.invoke().unwrap(), 1);
}

#[test]
fn test_name_match_beats_type_match() {
  let container = Arc::new(Container::new());
  container.set("port", 80_u16);
  container.set(BindingKey::of::<u16>(), 8080_u16);

  let target = inject().container(container).function(
    "target",
    signature! { port: u16, other: u16 },
    |p| Ok((p.cloned::<u16>("port")?, p.cloned::<u16>("other")?)),
  );

  assert_eq!(target.invoke().unwrap(), (80, 8080));
}

#[test]
fn test_untyped_parameters_match_by_name_only() {
  let container = Arc::new(Container::new());
  container.set("raw", 5_u8);

  let target = inject().container(container).function(
    "target",
    signature! { raw, other },
    |p| p.cloned::<u8>("raw"),
  );

  assert!(matches!(
    target.invoke(),
    Err(Error::Execution { missing }) if missing == vec!["other"]
  ));
  assert_eq!(target.call(args![other = 1_u8]).unwrap(), 5);
}

#[test]
fn test_defaulted_parameters_are_left_absent() {
  let container = Arc::new(Container::new());

  let target = inject().container(Arc::clone(&container)).function(
    "target",
    signature! { retries: u32 = default },
    |p| Ok(p.get_opt::<u32>("retries")?.map(|r| *r).unwrap_or(3)),
  );

  assert_eq!(target.invoke().unwrap(), 3);
  container.set("retries", 5_u32);
  assert_eq!(target.invoke().unwrap(), 5);
}

#[test]
fn test_empty_alias_list_is_not_an_error() {
  trait Plugin: Send + Sync {}
  let container = Arc::new(Container::new());

  let target = inject().container(container).function(
    "target",
    signature! { plugins: list dyn Plugin },
    |p| Ok(p.list::<dyn Plugin>("plugins")?.len()),
  );

  assert_eq!(target.invoke().unwrap(), 0);
}

#[test]
fn test_caller_supplied_list_wins() {
  trait Plugin: Send + Sync {
    fn id(&self) -> u8;
  }
  struct Fixed(u8);
  impl Plugin for Fixed {
    fn id(&self) -> u8 {
      self.0
    }
  }
  let container = Arc::new(Container::new());

  let target = inject().container(container).function(
    "target",
    signature! { plugins: list dyn Plugin },
    |p| {
      Ok(
        p.list::<dyn Plugin>("plugins")?
          .iter()
          .map(|plugin| plugin.id())
          .collect::<Vec<_>>(),
      )
    },
  );

  let supplied: Vec<Arc<dyn Plugin>> = vec![Arc::new(Fixed(4)), Arc::new(Fixed(2))];
  assert_eq!(target.call(fibre_inject::Args::new().arg_list(supplied)).unwrap(), vec![4, 2]);
}

#[test]
fn test_call_shape_errors() {
  let container = Arc::new(Container::new());
  container.set("a", 1_i64);

  let target = inject()
    .container(container)
    .function("target", signature! { a: i64 }, |p| p.cloned::<i64>("a"));

  assert!(matches!(
    target.call(args![1_i64, 2_i64]),
    Err(Error::TooManyArguments {
      expected: 1,
      given: 2
    })
  ));
  assert!(matches!(
    target.call(args![z = 1_i64]),
    Err(Error::UnexpectedArgument(name)) if name == "z"
  ));
  assert!(matches!(
    target.call(args![1_i64, a = 2_i64]),
    Err(Error::DuplicateArgument(name)) if name == "a"
  ));
}

#[test]
fn test_wrong_argument_type_surfaces_from_target() {
  let container = Arc::new(Container::new());
  let target = inject()
    .container(container)
    .function("target", signature! { a: i64 }, |p| p.cloned::<i64>("a"));

  assert!(matches!(
    target.call(args!["not a number"]),
    Err(Error::TypeMismatch { expected: "i64", .. })
  ));
}

#[test]
fn test_scalar_alias_follows_latest_registration() {
  let container = Arc::new(Container::new());
  struct First;
  struct Second;

  inject()
    .container(Arc::clone(&container))
    .alias("backend")
    .service(Signature::new(), |_| Ok(First))
    .register();
  assert!(container.get::<First>("backend").is_ok());

  inject()
    .container(Arc::clone(&container))
    .alias("backend")
    .service(Signature::new(), |_| Ok(Second))
    .register();

  assert!(container.get::<Second>("backend").is_ok());
  assert_eq!(
    container.resolve_all(&"backend".into()),
    vec![BindingKey::of::<First>(), BindingKey::of::<Second>()]
  );
}

#[test]
fn test_set_on_concrete_key_is_seen_through_aliases() {
  trait Identified: Send + Sync {
    fn id(&self) -> u32;
  }
  struct Service {
    id: u32,
  }
  impl Identified for Service {
    fn id(&self) -> u32 {
      self.id
    }
  }

  let container = Arc::new(Container::new());
  inject()
    .container(Arc::clone(&container))
    .alias("service_by_name")
    .service(Signature::new(), |_| Ok(Service { id: 1 }))
    .implements::<dyn Identified>(|s| s as Arc<dyn Identified>)
    .register();

  let concrete = container.get::<Service>(BindingKey::of::<Service>()).unwrap();
  let by_interface = container.get::<dyn Identified>(BindingKey::of::<dyn Identified>()).unwrap();
  let by_name = container.get::<Service>("service_by_name").unwrap();
  assert_eq!(by_interface.id(), 1);
  assert!(same_object(&concrete, &by_interface));
  assert!(Arc::ptr_eq(&concrete, &by_name));

  container.set(BindingKey::of::<Service>(), Service { id: 2 });

  assert_eq!(container.get::<Service>(BindingKey::of::<Service>()).unwrap().id, 2);
  assert_eq!(
    container
      .get::<dyn Identified>(BindingKey::of::<dyn Identified>())
      .unwrap()
      .id(),
    2
  );
  assert_eq!(container.get::<Service>("service_by_name").unwrap().id, 2);
}

#[test]
fn test_delete_on_registered_service_alias() {
  struct Backend;

  let container = Arc::new(Container::new());
  inject()
    .container(Arc::clone(&container))
    .alias("backend")
    .service(Signature::new(), |_| Ok(Backend))
    .register();
  let alias = BindingKey::from("backend");
  assert!(container.get::<Backend>(alias.clone()).is_ok());

  assert!(container.delete(&alias));
  assert!(!container.has(&alias));
  assert!(matches!(container.get::<Backend>(alias), Err(Error::KeyNotFound(_))));
  assert!(container.get::<Backend>(BindingKey::of::<Backend>()).is_ok());
}
