//! Contact person fields.

pub mod validators;
