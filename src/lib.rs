//! Library surface for headless/integration tests and reuse.
//! The binary in main.rs only wires the terminal to these modules.
pub mod app_dirs;
pub mod config;
pub mod controller;
pub mod error;
pub mod feedback;
pub mod formatter;
pub mod highlight;
pub mod input;
pub mod metrics;
pub mod runtime;
pub mod session;
pub mod texts;
pub mod typing_policy;
pub mod ui;

pub use controller::{Render, Session, SessionEvent};
pub use error::{Error, Result};
