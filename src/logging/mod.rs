//! Logging infrastructure for structured console output.

mod logger;
mod subscriber;
mod types;

pub use logger::Logger;
pub use subscriber::init_subscriber;
#[cfg(test)]
pub use subscriber::test_helpers;
pub use types::{HostEntry, PlanStatus};
