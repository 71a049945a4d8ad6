use fibre_inject::{global, inject, signature};
use std::sync::Arc;

// --- Abstraction and Implementations ---
trait MessageSender: Send + Sync {
  fn send(&self, to: &str, message: &str) -> String;
}

struct EmailSender;
impl MessageSender for EmailSender {
  fn send(&self, to: &str, message: &str) -> String {
    format!("Sending email to {}: '{}'", to, message)
  }
}

struct SmsSender;
impl MessageSender for SmsSender {
  fn send(&self, to: &str, message: &str) -> String {
    format!("Sending SMS to {}: '{}'", to, message)
  }
}

fn main() {
  tracing_subscriber::fmt().init();

  // --- Registration ---
  // Both implementations are registered under the `dyn MessageSender` alias.
  inject()
    .service(signature!(), |_| Ok(EmailSender))
    .implements::<dyn MessageSender>(|sender| sender as Arc<dyn MessageSender>)
    .register();
  inject()
    .service(signature!(), |_| Ok(SmsSender))
    .implements::<dyn MessageSender>(|sender| sender as Arc<dyn MessageSender>)
    .register();

  global().set("recipient", String::from("+123456789"));

  // A scalar parameter receives the latest registration...
  let notify = inject().function(
    "notify",
    signature! { sender: dyn MessageSender, recipient: String },
    |p| Ok(p.get::<dyn MessageSender>("sender")?.send(&p.get::<String>("recipient")?, "Hello from Fibre!")),
  );
  // ...while a list parameter receives all of them, in registration order.
  let broadcast = inject().function(
    "broadcast",
    signature! { senders: list dyn MessageSender, recipient: String },
    |p| {
      let recipient = p.get::<String>("recipient")?;
      Ok(
        p.list::<dyn MessageSender>("senders")?
          .iter()
          .map(|sender| sender.send(&recipient, "Hello from Fibre!"))
          .collect::<Vec<_>>(),
      )
    },
  );

  let single = notify.invoke().unwrap();
  println!("{}", single);
  assert!(single.contains("SMS"));

  let all = broadcast.invoke().unwrap();
  for line in &all {
    println!("{}", line);
  }
  assert_eq!(all.len(), 2);
  assert!(all[0].contains("email"));
}
