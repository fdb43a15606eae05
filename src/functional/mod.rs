pub mod autofill_detector;
pub mod prelude;
pub mod scheduled_task;
pub mod touch_tracker;
pub mod validation_engine;
pub mod validation_rules;
