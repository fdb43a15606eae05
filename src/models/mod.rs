pub mod address;
pub mod auth;
pub mod field;
pub mod person;

use crate::config::{LengthBounds, ThresholdTable};
use crate::functional::validation_rules::{max_length, min_length, Rule};
use field::{FieldKind, ValidationMode};

/// External state some rule tables close over.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleContext<'a> {
    /// Current value of the field this one depends on (the password, for a
    /// confirm-password field).
    pub linked_value: Option<&'a str>,
}

impl<'a> RuleContext<'a> {
    pub fn linked(value: &'a str) -> Self {
        Self {
            linked_value: Some(value),
        }
    }
}

/// Full rule list for `kind`: the `required` rule first when `mode` asks
/// for it, then the kind's own table.
pub fn rules_for(
    kind: FieldKind,
    mode: ValidationMode,
    thresholds: &ThresholdTable,
    context: &RuleContext<'_>,
) -> Vec<Rule> {
    let mut rules = Vec::new();
    if mode == ValidationMode::Required {
        rules.push(Rule::required(format!("{} is required", kind.label())));
    }

    let bounds = thresholds.get(kind);
    match kind {
        FieldKind::Email | FieldKind::Password | FieldKind::ConfirmPassword | FieldKind::Username => {
            rules.extend(auth::validators::rules(kind, bounds, context))
        }
        FieldKind::FirstName | FieldKind::LastName | FieldKind::Phone => {
            rules.extend(person::validators::rules(kind, bounds))
        }
        FieldKind::StreetName
        | FieldKind::StreetNumber
        | FieldKind::Unit
        | FieldKind::PostalCode
        | FieldKind::City
        | FieldKind::Province
        | FieldKind::Country => rules.extend(address::validators::rules(kind, bounds)),
    }
    rules
}

/// Min/max character rules with the shared message wording.
pub(crate) fn length_rules(label: &str, bounds: LengthBounds) -> Vec<Rule> {
    let mut rules = Vec::with_capacity(2);
    if let Some(min) = bounds.min {
        rules.push(min_length(
            min,
            format!("{} must be at least {} characters long", label, min),
        ));
    }
    if let Some(max) = bounds.max {
        rules.push(max_length(
            max,
            format!("{} must be no more than {} characters long", label, max),
        ));
    }
    rules
}
