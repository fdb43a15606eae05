#[cfg(feature = "runtime")]
pub mod autofill_runtime;
pub mod field_controller;
pub mod form_aggregator;
pub mod form_session;
