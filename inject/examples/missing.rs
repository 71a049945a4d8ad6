use fibre_inject::{global, inject, signature, Error};
use std::panic;

struct UnregisteredService;

fn main() {
  // --- Injected calls report every missing parameter at once ---
  global().set("a", String::from("present"));
  let target = inject().function(
    "needs_everything",
    signature! { missing: String, another_missing: i64, a: String },
    |_| Ok(()),
  );

  match target.invoke() {
    Err(Error::Execution { missing }) => {
      println!("Missing parameters: {:?}", missing);
      assert_eq!(missing, vec!["missing", "another_missing"]);
    }
    other => panic!("expected an execution error, got {:?}", other),
  }

  // --- Using the panicking `resolve!` macro ---
  println!("Attempting to resolve a service that was never registered...");
  let result = panic::catch_unwind(|| {
    // This line will panic!
    let _service = fibre_inject::resolve!(UnregisteredService);
  });
  assert!(result.is_err(), "resolve! should have panicked.");

  // --- Using the fallible `get()` method ---
  let service = global().get::<UnregisteredService>(fibre_inject::BindingKey::of::<UnregisteredService>());
  match service {
    Err(err) => println!("Correctly received an error: {}", err),
    Ok(_) => panic!("Should not have found the service!"),
  }
}
