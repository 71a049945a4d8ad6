use fibre_inject::{global, inject, signature, Container};
use std::sync::Arc;

// A function that configures dependencies and runs some logic.
// By accepting a container, it can be exercised against a controlled environment.
fn process_data(container: Arc<Container>) -> String {
  // Register a data source ONLY within the scope of this container.
  container.set("data", "test data".to_string());

  let process = inject()
    .container(container)
    .function("process", signature! { data: String }, |p| {
      Ok(format!("Processed: {}", p.get::<String>("data")?.to_uppercase()))
    });
  process.invoke().expect("data not found in container")
}

fn main() {
  // --- Test Scenario with a Local Container ---
  println!("--- Running with a local container ---");
  let test_container = Arc::new(Container::new());
  let result = process_data(Arc::clone(&test_container));

  println!("Result: {}", result);
  assert_eq!(result, "Processed: TEST DATA");

  // --- Verify Isolation ---
  // Neither the data nor the function leaked into the global container.
  assert!(!global().has(&"data".into()));
  assert!(!global().has(&"process".into()));
  assert!(test_container.has(&"process".into()));

  println!("\nVerified that the local container is isolated from the global one.");
}
