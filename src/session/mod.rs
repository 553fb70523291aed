//! Component A — Session Controller.

pub mod controller;
pub mod state;
pub mod wheel;

pub use controller::SessionController;
pub use state::{evaluate_stop, should_continue, Session, StopReason};
pub use wheel::WheelHealth;
