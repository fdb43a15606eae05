//! Field-level validation engine for form frontends.
//!
//! Table-driven rules per field kind, a touch state machine that keeps
//! errors hidden until a field is blurred, an autofill heuristic that
//! touches silently autofilled fields after a grace period, and submit
//! gating across a whole form.

pub mod config;
pub mod error;
pub mod functional;
pub mod models;
pub mod services;
pub mod utils;

pub use functional::prelude;
