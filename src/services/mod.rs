mod notifier;

pub use notifier::{Notifier, Notify};
