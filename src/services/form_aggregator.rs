//! Form-level submit gating.
//!
//! Combines the latest per-field results with the required-field list into
//! one "submit allowed" decision.
//!
//! - Required mode: every required field holds a non-blank value and every
//!   recorded result is valid.
//! - Skippable mode: a recorded result only blocks when its field is
//!   non-blank and invalid. Empty optional fields never block.
//! - Validation disabled: recorded results are ignored; only required-field
//!   presence is checked.

use std::collections::{HashMap, HashSet};

use itertools::Itertools;

use crate::functional::validation_engine::ValidationResult;
use crate::functional::validation_rules::is_blank;
use crate::services::field_controller::ValidationReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitPolicy {
    pub skippable: bool,
    pub validation_enabled: bool,
}

impl Default for SubmitPolicy {
    fn default() -> Self {
        Self {
            skippable: false,
            validation_enabled: true,
        }
    }
}

impl SubmitPolicy {
    pub fn skippable() -> Self {
        Self {
            skippable: true,
            ..Self::default()
        }
    }
}

/// Why a form cannot be submitted yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Blocker {
    MissingRequired(String),
    Invalid(String),
}

impl Blocker {
    pub fn field(&self) -> &str {
        match self {
            Blocker::MissingRequired(field) | Blocker::Invalid(field) => field,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Blocker::MissingRequired(_) => 0,
            Blocker::Invalid(_) => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitVerdict {
    pub allowed: bool,
    /// Ordered by field name, missing-required before invalid.
    pub blockers: Vec<Blocker>,
}

fn value_of<'a>(values: &'a HashMap<String, String>, field: &str) -> &'a str {
    values.get(field).map(String::as_str).unwrap_or_default()
}

/// Submit decision with the reasons it was refused.
pub fn evaluate_submission(
    required_fields: &HashSet<String>,
    per_field_results: &HashMap<String, ValidationResult>,
    current_values: &HashMap<String, String>,
    policy: SubmitPolicy,
) -> SubmitVerdict {
    let missing = required_fields
        .iter()
        .filter(|_| !policy.skippable)
        .filter(|field| is_blank(value_of(current_values, field)))
        .map(|field| Blocker::MissingRequired(field.clone()));

    let invalid = per_field_results
        .iter()
        .filter(|_| policy.validation_enabled)
        .filter(|(_, result)| !result.is_valid)
        .filter(|(field, _)| !(policy.skippable && is_blank(value_of(current_values, field))))
        .map(|(field, _)| Blocker::Invalid(field.clone()));

    let blockers = missing
        .chain(invalid)
        .sorted_by(|a, b| a.field().cmp(b.field()).then(a.rank().cmp(&b.rank())))
        .collect_vec();

    SubmitVerdict {
        allowed: blockers.is_empty(),
        blockers,
    }
}

/// Submit gating with validation enabled.
///
/// # Examples
///
/// ```
/// let required: HashSet<String> = ["city", "country"].map(String::from).into();
/// let values: HashMap<String, String> =
///     [("city".to_string(), String::new()), ("country".to_string(), "Canada".to_string())].into();
/// assert!(!is_form_submittable(&required, &HashMap::new(), &values, false));
/// assert!(is_form_submittable(&required, &HashMap::new(), &values, true));
/// ```
pub fn is_form_submittable(
    required_fields: &HashSet<String>,
    per_field_results: &HashMap<String, ValidationResult>,
    current_values: &HashMap<String, String>,
    skippable: bool,
) -> bool {
    let policy = SubmitPolicy {
        skippable,
        validation_enabled: true,
    };
    evaluate_submission(required_fields, per_field_results, current_values, policy).allowed
}

/// `round(100 * filled / total)` over `fields`; `0` for an empty list.
/// Whether a field is required plays no part.
pub fn completion_percentage<'a, I>(fields: I, current_values: &HashMap<String, String>) -> u8
where
    I: IntoIterator<Item = &'a str>,
{
    let (total, filled) = fields.into_iter().fold((0usize, 0usize), |(total, filled), field| {
        let is_filled = !is_blank(value_of(current_values, field));
        (total + 1, filled + usize::from(is_filled))
    });
    if total == 0 {
        return 0;
    }
    ((filled as f64 * 100.0) / total as f64).round() as u8
}

/// Per-form validation state: latest result per field, the required
/// fields, and the gating policy. Lives from mount until unmount or a
/// successful submit.
#[derive(Debug, Clone, Default)]
pub struct FormValidationState {
    results: HashMap<String, ValidationResult>,
    required_fields: HashSet<String>,
    policy: SubmitPolicy,
}

impl FormValidationState {
    pub fn new(policy: SubmitPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn with_required_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn require(&mut self, field: impl Into<String>) {
        self.required_fields.insert(field.into());
    }

    pub fn unrequire(&mut self, field: &str) {
        self.required_fields.remove(field);
    }

    /// Stores the latest result reported by a field.
    pub fn record(&mut self, report: ValidationReport) {
        self.results.insert(report.field, report.result);
    }

    pub fn forget(&mut self, field: &str) -> Option<ValidationResult> {
        self.results.remove(field)
    }

    pub fn result(&self, field: &str) -> Option<&ValidationResult> {
        self.results.get(field)
    }

    pub fn results(&self) -> &HashMap<String, ValidationResult> {
        &self.results
    }

    pub fn required_fields(&self) -> &HashSet<String> {
        &self.required_fields
    }

    pub fn policy(&self) -> SubmitPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: SubmitPolicy) {
        self.policy = policy;
    }

    pub fn verdict(&self, current_values: &HashMap<String, String>) -> SubmitVerdict {
        evaluate_submission(&self.required_fields, &self.results, current_values, self.policy)
    }

    pub fn is_submittable(&self, current_values: &HashMap<String, String>) -> bool {
        self.verdict(current_values).allowed
    }

    pub fn clear(&mut self) {
        self.results.clear();
        self.required_fields.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(fields: &[&str]) -> HashSet<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn invalid(message: &str) -> ValidationResult {
        ValidationResult::from_errors(vec![message.to_string()])
    }

    #[test]
    fn test_required_mode_blocks_on_empty_required_field() {
        let required = set(&["city", "country"]);
        let current = values(&[("city", ""), ("country", "Canada")]);
        assert!(!is_form_submittable(&required, &HashMap::new(), &current, false));
    }

    #[test]
    fn test_skippable_mode_ignores_empty_fields() {
        let required = set(&["city", "country"]);
        let current = values(&[("city", ""), ("country", "Canada")]);
        assert!(is_form_submittable(&required, &HashMap::new(), &current, true));
    }

    #[test]
    fn test_whitespace_counts_as_empty() {
        let required = set(&["city"]);
        let current = values(&[("city", "   ")]);
        assert!(!is_form_submittable(&required, &HashMap::new(), &current, false));
    }

    #[test]
    fn test_required_mode_blocks_on_any_invalid_result() {
        let required = set(&["city"]);
        let current = values(&[("city", "Ottawa"), ("unit", "")]);
        let results: HashMap<_, _> = [
            ("city".to_string(), ValidationResult::valid()),
            ("unit".to_string(), invalid("bad")),
        ]
        .into();
        assert!(!is_form_submittable(&required, &results, &current, false));
    }

    #[test]
    fn test_skippable_mode_blocks_filled_invalid_field() {
        let current = values(&[("postal_code", "12"), ("unit", "")]);
        let results: HashMap<_, _> = [
            ("postal_code".to_string(), invalid("too short")),
            ("unit".to_string(), invalid("stale")),
        ]
        .into();
        let verdict = evaluate_submission(&HashSet::new(), &results, &current, SubmitPolicy::skippable());
        assert!(!verdict.allowed);
        assert_eq!(verdict.blockers, vec![Blocker::Invalid("postal_code".to_string())]);
    }

    #[test]
    fn test_validation_disabled_checks_presence_only() {
        let required = set(&["city"]);
        let results: HashMap<_, _> = [("city".to_string(), invalid("bad"))].into();
        let policy = SubmitPolicy {
            skippable: false,
            validation_enabled: false,
        };
        assert!(evaluate_submission(&required, &results, &values(&[("city", "x")]), policy).allowed);
        assert!(!evaluate_submission(&required, &results, &values(&[("city", "")]), policy).allowed);
    }

    #[test]
    fn test_blockers_sorted_by_field() {
        let required = set(&["zip", "city"]);
        let results: HashMap<_, _> = [
            ("city".to_string(), invalid("bad")),
            ("apt".to_string(), invalid("bad")),
        ]
        .into();
        let verdict = evaluate_submission(&required, &results, &HashMap::new(), SubmitPolicy::default());
        assert_eq!(
            verdict.blockers,
            vec![
                Blocker::Invalid("apt".to_string()),
                Blocker::MissingRequired("city".to_string()),
                Blocker::Invalid("city".to_string()),
                Blocker::MissingRequired("zip".to_string()),
            ]
        );
    }

    #[test]
    fn test_completion_percentage_rounds() {
        let fields = ["street_name", "street_number", "city"];
        let current = values(&[("street_name", "Main"), ("city", " ")]);
        assert_eq!(completion_percentage(fields, &current), 33);

        let current = values(&[("street_name", "Main"), ("city", "Ottawa")]);
        assert_eq!(completion_percentage(fields, &current), 67);
        assert_eq!(completion_percentage(["a", "b"], &values(&[("a", "1")])), 50);
        assert_eq!(completion_percentage(Vec::<&str>::new(), &current), 0);
    }

    #[test]
    fn test_state_records_and_clears() {
        let mut state = FormValidationState::new(SubmitPolicy::default()).with_required_fields(["email"]);
        let current = values(&[("email", "user@example.com")]);
        state.record(ValidationReport {
            field: "email".to_string(),
            result: invalid("bad"),
        });
        assert!(!state.is_submittable(&current));

        state.record(ValidationReport {
            field: "email".to_string(),
            result: ValidationResult::valid(),
        });
        assert!(state.is_submittable(&current));

        state.clear();
        assert!(state.results().is_empty());
        assert!(state.required_fields().is_empty());
    }
}
