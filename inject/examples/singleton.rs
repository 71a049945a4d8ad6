use fibre_inject::{global, inject, resolve, signature};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use tracing_subscriber::EnvFilter;

// A simple service that gets a unique ID upon creation.
struct RequestTracker {
  id: usize,
}

// A per-request handle, built fresh on every resolution.
struct RequestScope {
  tracker: Arc<RequestTracker>,
  id: usize,
}

// A global, thread-safe counter to generate unique IDs.
static ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  // --- Singleton Registration ---
  // The constructor runs ONCE, on first resolution.
  inject()
    .service(signature!(), |_| {
      println!("Creating SINGLETON RequestTracker...");
      Ok(RequestTracker {
        id: ID_COUNTER.fetch_add(1, Ordering::SeqCst),
      })
    })
    .register();

  // --- Factory Registration ---
  // The constructor runs EVERY time the service is resolved. Its own
  // dependency is the singleton above, matched by type.
  inject()
    .use_factory(true)
    .service(signature! { tracker: RequestTracker }, |p| {
      println!("Creating FACTORY RequestScope...");
      Ok(RequestScope {
        tracker: p.get("tracker")?,
        id: ID_COUNTER.fetch_add(1, Ordering::SeqCst),
      })
    })
    .register();

  println!("--- Resolving Singletons ---");
  let s1 = resolve!(RequestTracker);
  let s2 = resolve!(RequestTracker);
  println!("Singleton 1 ID: {}, Singleton 2 ID: {}", s1.id, s2.id);
  assert!(
    Arc::ptr_eq(&s1, &s2),
    "Singleton instances should be identical"
  );

  println!("--- Resolving Factories ---");
  let r1 = global().get::<RequestScope>(fibre_inject::BindingKey::of::<RequestScope>()).unwrap();
  let r2 = resolve!(RequestScope);
  println!("Scope 1 ID: {}, Scope 2 ID: {}", r1.id, r2.id);
  assert_ne!(r1.id, r2.id);
  assert!(!Arc::ptr_eq(&r1, &r2), "Factory instances should be different");
  assert!(Arc::ptr_eq(&r1.tracker, &s1));
  println!("Every scope shares the singleton tracker, as expected.");
}
