//! Signup and login fields.

pub mod validators;
