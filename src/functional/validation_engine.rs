//! Field Validation Engine
//!
//! Stateless evaluation of a field's rule set. The same inputs always yield
//! the same [`ValidationResult`]; nothing here remembers previous calls.
//!
//! Evaluation never short-circuits: every failing rule contributes its
//! message, in rule order, so a password can report "too short" and
//! "missing a digit" at the same time.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::config::ThresholdTable;
use crate::functional::validation_rules::Rule;
use crate::models::field::{FieldKind, FieldType, ValidationMode};
use crate::models::{self, RuleContext};

/// Outcome of validating one value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// A passing result with no messages.
    ///
    /// # Examples
    ///
    /// ```
    /// let r = ValidationResult::valid();
    /// assert!(r.is_valid);
    /// assert!(r.errors.is_empty());
    /// ```
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    /// Builds a result from collected messages; valid iff there are none.
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    pub fn has_error(&self, message: &str) -> bool {
        self.errors.iter().any(|e| e == message)
    }
}

/// Rules attached to one field.
///
/// A field whose validation is disabled has no config at all; see
/// [`ValidationConfig::build`].
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    pub field_name: String,
    pub field_type: FieldType,
    pub required: bool,
    pub rules: Vec<Rule>,
}

impl ValidationConfig {
    pub fn new(field_name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            field_name: field_name.into(),
            field_type,
            required: false,
            rules: Vec::new(),
        }
    }

    /// Appends a rule. A `required` rule is moved to the front so its
    /// message leads the error list.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        if rule.is_required() {
            self.required = true;
            self.rules.insert(0, rule);
        } else {
            self.rules.push(rule);
        }
        self
    }

    pub fn with_rules<I>(self, rules: I) -> Self
    where
        I: IntoIterator<Item = Rule>,
    {
        rules.into_iter().fold(self, |config, rule| config.with_rule(rule))
    }

    /// Table-driven config for a catalog field kind, named after the kind.
    pub fn for_kind(
        kind: FieldKind,
        mode: ValidationMode,
        thresholds: &ThresholdTable,
        context: &RuleContext<'_>,
    ) -> Self {
        Self::new(kind.as_str(), kind.field_type())
            .with_rules(models::rules_for(kind, mode, thresholds, context))
    }

    /// Config as seen by one render of a field wrapper. Returns `None` when
    /// validation is disabled, which [`validate_field`] treats as
    /// always-valid.
    pub fn build(
        enable_validation: bool,
        mode: ValidationMode,
        kind: FieldKind,
        thresholds: &ThresholdTable,
        context: &RuleContext<'_>,
    ) -> Option<Self> {
        enable_validation.then(|| Self::for_kind(kind, mode, thresholds, context))
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(Rule::name).collect()
    }
}

/// Validates `value` against `config`.
///
/// Absent config means validation is disabled: the result is always valid so
/// submit gating is unblocked as well.
///
/// # Examples
///
/// ```
/// let config = ValidationConfig::for_kind(
///     FieldKind::Password,
///     ValidationMode::Required,
///     &ThresholdTable::default(),
///     &RuleContext::default(),
/// );
/// let result = validate_field("password", "Ab1!", Some(&config));
/// assert!(result.has_error("Password must be at least 8 characters long"));
/// assert!(validate_field("password", "Ab1!", None).is_valid);
/// ```
pub fn validate_field(
    field_name: &str,
    value: &str,
    config: Option<&ValidationConfig>,
) -> ValidationResult {
    let Some(config) = config else {
        return ValidationResult::valid();
    };

    let errors = config
        .rules
        .iter()
        .filter(|rule| !rule.check(value))
        .map(|rule| rule.message().to_string())
        .collect_vec();

    if !errors.is_empty() {
        log::trace!("{} failed {} rule(s)", field_name, errors.len());
    }
    ValidationResult::from_errors(errors)
}

/// Validates a confirmation value against the password it must repeat,
/// using the default thresholds in required mode.
pub fn validate_confirm_password(value: &str, original: &str) -> ValidationResult {
    let config = ValidationConfig::for_kind(
        FieldKind::ConfirmPassword,
        ValidationMode::Required,
        &ThresholdTable::default(),
        &RuleContext::linked(original),
    );
    validate_field(FieldKind::ConfirmPassword.as_str(), value, Some(&config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functional::validation_rules::{max_length, min_length};

    fn password_config() -> ValidationConfig {
        ValidationConfig::for_kind(
            FieldKind::Password,
            ValidationMode::Required,
            &ThresholdTable::default(),
            &RuleContext::default(),
        )
    }

    #[test]
    fn test_absent_config_is_always_valid() {
        for value in ["", "   ", "anything", "#bad#"] {
            assert_eq!(validate_field("f", value, None), ValidationResult::valid());
        }
    }

    #[test]
    fn test_all_failures_reported_in_rule_order() {
        let config = ValidationConfig::new("code", FieldType::Text)
            .with_rule(min_length(5, "first"))
            .with_rule(max_length(2, "second"));
        let result = validate_field("code", "abc", Some(&config));
        assert!(!result.is_valid);
        assert_eq!(result.errors, vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn test_required_rule_moves_to_front() {
        let config = ValidationConfig::new("name", FieldType::Text)
            .with_rule(min_length(2, "short"))
            .with_rule(Rule::required("Name is required"));
        assert!(config.required);
        assert_eq!(config.rule_names(), vec!["required", "min_length"]);
    }

    #[test]
    fn test_password_short() {
        let result = validate_field("password", "Ab1!", Some(&password_config()));
        assert!(!result.is_valid);
        assert!(result.has_error("Password must be at least 8 characters long"));
    }

    #[test]
    fn test_password_missing_special() {
        let result = validate_field("password", "Password123", Some(&password_config()));
        assert!(result.has_error("Password must contain at least one special character (@$!%*?&_)"));
    }

    #[test]
    fn test_password_illegal_character() {
        let result = validate_field("password", "Password123#", Some(&password_config()));
        assert!(result
            .has_error("Password can only contain letters, digits, and special characters (@$!%*?&_)"));
        // '#' is not one of the accepted specials either
        assert!(result.has_error("Password must contain at least one special character (@$!%*?&_)"));
    }

    #[test]
    fn test_password_all_specials_valid() {
        let result = validate_field("password", "Password123@$!%*?&_", Some(&password_config()));
        assert_eq!(result, ValidationResult::valid());
    }

    #[test]
    fn test_password_reports_multiple_errors_at_once() {
        let result = validate_field("password", "abc", Some(&password_config()));
        assert!(result.errors.len() >= 4);
        assert!(result.has_error("Password must contain at least one uppercase letter"));
        assert!(result.has_error("Password must contain at least one digit"));
    }

    #[test]
    fn test_confirm_password() {
        assert!(validate_confirm_password("SecurePass123!", "SecurePass123!").is_valid);
        let mismatch = validate_confirm_password("SecurePass123!", "Different!");
        assert!(mismatch.has_error("Passwords do not match"));
    }

    #[test]
    fn test_build_disabled_yields_no_config() {
        let config = ValidationConfig::build(
            false,
            ValidationMode::Required,
            FieldKind::Email,
            &ThresholdTable::default(),
            &RuleContext::default(),
        );
        assert!(config.is_none());
    }

    #[test]
    fn test_optional_mode_omits_required_rule() {
        let config = ValidationConfig::for_kind(
            FieldKind::City,
            ValidationMode::Optional,
            &ThresholdTable::default(),
            &RuleContext::default(),
        );
        assert!(!config.required);
        assert!(validate_field("city", "", Some(&config)).is_valid);
    }
}
