//! Composable Validation Rules
//!
//! A rule is a named predicate over the raw string held by an input, paired
//! with the message shown when it fails. Rules are plain data so that every
//! field kind can be described by a table instead of bespoke code.
//!
//! Every rule except [`Rule::required`] is vacuously satisfied by a blank
//! value. The constructors in this module enforce that by wrapping the
//! supplied predicate, which is what lets optional fields stay silent until
//! the user fills them.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

/// Name reserved for the single rule allowed to reject blank values.
pub const REQUIRED_RULE: &str = "required";

/// Characters accepted as "special" by the password rules.
pub const PASSWORD_SPECIALS: &str = "@$!%*?&_";

/// Cached regex patterns for validation
static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is valid"));
static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\d\s\-\(\)\+]+$").expect("phone regex is valid"));
static POSTAL_CODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 \-]*$").expect("postal code regex is valid"));
static PERSON_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}][\p{L} '\-\.]*$").expect("name regex is valid"));

/// Shared predicate signature. `Send + Sync` so rule sets can live inside
/// state guarded by the async timer runtime.
pub type Predicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Returns true when the value is empty or whitespace-only.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// A named predicate rule attached to a field.
#[derive(Clone)]
pub struct Rule {
    name: String,
    message: String,
    predicate: Predicate,
}

impl Rule {
    /// Builds a non-required rule. The predicate only ever sees non-blank
    /// values; blank values pass without consulting it.
    ///
    /// # Examples
    ///
    /// ```
    /// let rule = Rule::new("no_digits", "Digits are not allowed", |v| !v.chars().any(|c| c.is_ascii_digit()));
    /// assert!(rule.check(""));
    /// assert!(rule.check("abc"));
    /// assert!(!rule.check("a1"));
    /// ```
    pub fn new<F>(name: impl Into<String>, message: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            message: message.into(),
            predicate: Arc::new(move |value: &str| is_blank(value) || predicate(value)),
        }
    }

    /// The only rule that rejects blank values.
    pub fn required(message: impl Into<String>) -> Self {
        Self {
            name: REQUIRED_RULE.to_string(),
            message: message.into(),
            predicate: Arc::new(|value: &str| !is_blank(value)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_required(&self) -> bool {
        self.name == REQUIRED_RULE
    }

    /// Evaluates the predicate against `value`.
    pub fn check(&self, value: &str) -> bool {
        (self.predicate)(value)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// Minimum length in characters (not bytes).
pub fn min_length(min: usize, message: impl Into<String>) -> Rule {
    Rule::new("min_length", message, move |v| v.chars().count() >= min)
}

/// Maximum length in characters (not bytes).
pub fn max_length(max: usize, message: impl Into<String>) -> Rule {
    Rule::new("max_length", message, move |v| v.chars().count() <= max)
}

/// Matches the whole value against a compiled pattern.
pub fn pattern(name: impl Into<String>, regex: Regex, message: impl Into<String>) -> Rule {
    Rule::new(name, message, move |v| regex.is_match(v))
}

pub fn email(message: impl Into<String>) -> Rule {
    Rule::new("email", message, |v| EMAIL_REGEX.is_match(v.trim()))
}

pub fn phone(message: impl Into<String>) -> Rule {
    Rule::new("phone", message, |v| PHONE_REGEX.is_match(v))
}

pub fn postal_code(message: impl Into<String>) -> Rule {
    Rule::new("postal_code", message, |v| POSTAL_CODE_REGEX.is_match(v.trim()))
}

pub fn person_name(message: impl Into<String>) -> Rule {
    Rule::new("person_name", message, |v| PERSON_NAME_REGEX.is_match(v.trim()))
}

/// ASCII digits only.
pub fn numeric_only(message: impl Into<String>) -> Rule {
    Rule::new("numeric_only", message, |v| v.chars().all(|c| c.is_ascii_digit()))
}

pub fn contains_lowercase(message: impl Into<String>) -> Rule {
    Rule::new("lowercase", message, |v| v.chars().any(|c| c.is_ascii_lowercase()))
}

pub fn contains_uppercase(message: impl Into<String>) -> Rule {
    Rule::new("uppercase", message, |v| v.chars().any(|c| c.is_ascii_uppercase()))
}

pub fn contains_digit(message: impl Into<String>) -> Rule {
    Rule::new("digit", message, |v| v.chars().any(|c| c.is_ascii_digit()))
}

/// At least one character from `specials`.
pub fn contains_any_of(specials: &'static str, message: impl Into<String>) -> Rule {
    Rule::new("special_character", message, move |v| {
        v.chars().any(|c| specials.contains(c))
    })
}

/// Every character is an ASCII letter, an ASCII digit, or one of `extra`.
pub fn charset(extra: &'static str, message: impl Into<String>) -> Rule {
    Rule::new("charset", message, move |v| {
        v.chars().all(|c| c.is_ascii_alphanumeric() || extra.contains(c))
    })
}

/// Equality against a value captured when the rule is built.
///
/// The captured value is a snapshot: rules closing over another field's
/// value must be rebuilt whenever that field changes.
pub fn equals(
    name: impl Into<String>,
    expected: impl Into<String>,
    message: impl Into<String>,
) -> Rule {
    let expected = expected.into();
    Rule::new(name, message, move |v| v == expected)
}
