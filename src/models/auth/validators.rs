use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    config::LengthBounds,
    functional::validation_rules::{
        charset, contains_any_of, contains_digit, contains_lowercase, contains_uppercase, email,
        equals, pattern, Rule, PASSWORD_SPECIALS,
    },
    models::{field::FieldKind, length_rules, RuleContext},
};

static USERNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").expect("username regex is valid"));

pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match";

/// Rule table for signup/login kinds. Non-auth kinds get no rules.
pub fn rules(kind: FieldKind, bounds: LengthBounds, context: &RuleContext<'_>) -> Vec<Rule> {
    match kind {
        FieldKind::Email => email_rules(bounds),
        FieldKind::Password => password_rules(bounds),
        FieldKind::ConfirmPassword => confirm_password_rules(bounds, context),
        FieldKind::Username => username_rules(bounds),
        _ => Vec::new(),
    }
}

fn email_rules(bounds: LengthBounds) -> Vec<Rule> {
    let mut rules = vec![email("Please enter a valid email address")];
    rules.extend(length_rules(FieldKind::Email.label(), bounds));
    rules
}

/// Each password requirement is its own rule so that every unmet
/// requirement is listed at once.
fn password_rules(bounds: LengthBounds) -> Vec<Rule> {
    let mut rules = length_rules(FieldKind::Password.label(), bounds);
    rules.push(contains_lowercase(
        "Password must contain at least one lowercase letter",
    ));
    rules.push(contains_uppercase(
        "Password must contain at least one uppercase letter",
    ));
    rules.push(contains_digit("Password must contain at least one digit"));
    rules.push(contains_any_of(
        PASSWORD_SPECIALS,
        format!(
            "Password must contain at least one special character ({})",
            PASSWORD_SPECIALS
        ),
    ));
    rules.push(charset(
        PASSWORD_SPECIALS,
        format!(
            "Password can only contain letters, digits, and special characters ({})",
            PASSWORD_SPECIALS
        ),
    ));
    rules
}

/// The match rule captures the password as it is right now; callers
/// rebuild these rules whenever the password changes.
fn confirm_password_rules(bounds: LengthBounds, context: &RuleContext<'_>) -> Vec<Rule> {
    let original = context.linked_value.unwrap_or_default();
    let mut rules = vec![equals("passwords_match", original, PASSWORDS_DO_NOT_MATCH)];
    rules.extend(length_rules(FieldKind::ConfirmPassword.label(), bounds));
    rules
}

fn username_rules(bounds: LengthBounds) -> Vec<Rule> {
    let mut rules = length_rules(FieldKind::Username.label(), bounds);
    rules.push(pattern(
        "username",
        USERNAME_REGEX.clone(),
        "Username can only contain letters, digits, dots, dashes, and underscores",
    ));
    rules
}
