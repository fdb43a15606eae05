use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    config::LengthBounds,
    functional::validation_rules::{numeric_only, pattern, person_name, postal_code, Rule},
    models::{field::FieldKind, length_rules},
};

static STREET_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\d][\p{L}\d '\-\.,#/]*$").expect("street regex is valid"));
static UNIT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9\-#/ ]+$").expect("unit regex is valid"));

/// Rule table for address kinds.
pub fn rules(kind: FieldKind, bounds: LengthBounds) -> Vec<Rule> {
    let label = kind.label();
    let mut rules = Vec::new();
    match kind {
        FieldKind::StreetNumber => {
            rules.push(numeric_only("Street number must contain only digits"))
        }
        FieldKind::PostalCode => rules.push(postal_code(
            "Postal code can only contain letters, digits, spaces, and hyphens",
        )),
        FieldKind::StreetName => rules.push(pattern(
            "street_name",
            STREET_REGEX.clone(),
            "Street name contains invalid characters",
        )),
        FieldKind::Unit => rules.push(pattern(
            "unit",
            UNIT_REGEX.clone(),
            "Unit contains invalid characters",
        )),
        // Place names follow the same alphabet as person names.
        FieldKind::City | FieldKind::Province | FieldKind::Country => rules.push(person_name(
            format!(
                "{} can only contain letters, spaces, apostrophes, periods, and hyphens",
                label
            ),
        )),
        _ => {}
    }
    rules.extend(length_rules(label, bounds));
    rules
}
