//! Session state, the goal registry and the services the presentation layer calls.

pub mod registry;
pub mod services;
pub mod session;
pub mod time;

pub use registry::{LedgerRegistry, ReplacePolicy};
pub use session::Session;
pub use time::{Clock, FixedClock, SystemClock};
