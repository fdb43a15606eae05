//! Postal address fields.

pub mod validators;
