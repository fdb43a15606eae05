//! Form session.
//!
//! Owns the controllers of one mounted form, routes input events to them,
//! records every report in a [`FormValidationState`], and propagates value
//! changes along cross-field dependencies (a confirm-password field
//! observes the password field).
//!
//! Dependencies are one-directional: each dependent observes at most one
//! source and cycles are rejected when the edge is added.

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use crate::error::{FormError, FormResult};
use crate::services::field_controller::{FieldController, FieldProps, ValidationReport};
use crate::services::form_aggregator::{
    completion_percentage, FormValidationState, SubmitPolicy, SubmitVerdict,
};

#[derive(Debug, Default)]
pub struct FormSession {
    fields: BTreeMap<String, FieldController>,
    /// dependent -> source
    sources: HashMap<String, String>,
    state: FormValidationState,
}

impl FormSession {
    pub fn new(policy: SubmitPolicy) -> Self {
        Self {
            fields: BTreeMap::new(),
            sources: HashMap::new(),
            state: FormValidationState::new(policy),
        }
    }

    /// Adds a controller. Fields in required mode join the required list.
    pub fn register(&mut self, controller: FieldController) -> FormResult<()> {
        let name = controller.name().to_string();
        if self.fields.contains_key(&name) {
            return Err(FormError::DuplicateField(name));
        }
        if controller.is_required() {
            self.state.require(name.clone());
        }
        self.fields.insert(name, controller);
        Ok(())
    }

    pub fn with_field(mut self, controller: FieldController) -> FormResult<Self> {
        self.register(controller)?;
        Ok(self)
    }

    /// Makes `dependent` observe `source`. The source's current value is
    /// pushed to the dependent straight away.
    pub fn add_dependency(&mut self, dependent: &str, source: &str) -> FormResult<()> {
        if dependent == source {
            return Err(FormError::SelfDependency(dependent.to_string()));
        }
        let source_value = self.field_or_err(source)?.value().to_string();
        self.field_or_err(dependent)?;

        let mut cursor = source;
        while let Some(upstream) = self.sources.get(cursor) {
            if upstream == dependent {
                return Err(FormError::CyclicDependency {
                    dependent: dependent.to_string(),
                    source_field: source.to_string(),
                });
            }
            cursor = upstream;
        }

        self.sources.insert(dependent.to_string(), source.to_string());
        let report = self
            .field_mut_or_err(dependent)?
            .on_dependency_change(&source_value);
        self.record(report);
        Ok(())
    }

    pub fn change(&mut self, field: &str, value: impl Into<String>, now: Instant) -> FormResult<()> {
        let controller = self.field_mut_or_err(field)?;
        let report = controller.on_change(value, now);
        let current = controller.value().to_string();
        self.record(report);
        self.propagate(field, &current);
        Ok(())
    }

    pub fn focus(&mut self, field: &str) -> FormResult<()> {
        self.field_mut_or_err(field)?.on_focus();
        Ok(())
    }

    pub fn blur(&mut self, field: &str) -> FormResult<()> {
        let report = self.field_mut_or_err(field)?.on_blur();
        self.record(report);
        Ok(())
    }

    /// Re-render of one field with new props.
    pub fn set_props(&mut self, field: &str, props: FieldProps) -> FormResult<()> {
        let controller = self.field_mut_or_err(field)?;
        let report = controller.set_props(props);
        let required = controller.is_required();
        if required {
            self.state.require(field);
        } else {
            self.state.unrequire(field);
        }
        if report.is_none() {
            self.state.forget(field);
        }
        self.record(report);
        Ok(())
    }

    /// Fires every due autofill timer. Returns how many fired.
    pub fn poll_autofill(&mut self, now: Instant) -> usize {
        let reports: Vec<ValidationReport> = self
            .fields
            .values_mut()
            .filter_map(|controller| controller.poll_autofill(now))
            .collect();
        let fired = reports.len();
        for report in reports {
            self.state.record(report);
        }
        fired
    }

    /// Fires one field's autofill timer if due.
    pub fn poll_field(&mut self, field: &str, now: Instant) -> FormResult<bool> {
        let report = self.field_mut_or_err(field)?.poll_autofill(now);
        let fired = report.is_some();
        self.record(report);
        Ok(fired)
    }

    pub fn autofill_deadline(&self, field: &str) -> FormResult<Option<Instant>> {
        Ok(self.field_or_err(field)?.autofill_deadline())
    }

    /// Earliest pending autofill deadline across the form.
    pub fn next_autofill_deadline(&self) -> Option<Instant> {
        self.fields
            .values()
            .filter_map(FieldController::autofill_deadline)
            .min()
    }

    /// Touches every field, e.g. when the user presses submit early.
    pub fn touch_all(&mut self) {
        let reports: Vec<ValidationReport> = self
            .fields
            .values_mut()
            .filter_map(FieldController::touch)
            .collect();
        for report in reports {
            self.state.record(report);
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldController> {
        self.fields.get(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn values(&self) -> HashMap<String, String> {
        self.fields
            .iter()
            .map(|(name, controller)| (name.clone(), controller.value().to_string()))
            .collect()
    }

    pub fn state(&self) -> &FormValidationState {
        &self.state
    }

    pub fn verdict(&self) -> SubmitVerdict {
        self.state.verdict(&self.values())
    }

    pub fn is_submittable(&self) -> bool {
        self.verdict().allowed
    }

    /// Share of registered fields holding a non-blank value.
    pub fn completion_percentage(&self) -> u8 {
        completion_percentage(self.field_names(), &self.values())
    }

    /// Successful submit: the form's state is discarded.
    pub fn submit_succeeded(&mut self) {
        log::debug!("form submitted, discarding {} field(s)", self.fields.len());
        self.teardown();
    }

    /// Unmount: tears down every controller (cancelling their timers) and
    /// discards all state.
    pub fn teardown(&mut self) {
        for controller in self.fields.values_mut() {
            controller.teardown();
        }
        self.fields.clear();
        self.sources.clear();
        self.state.clear();
    }

    fn propagate(&mut self, source: &str, value: &str) {
        let dependents: Vec<String> = self
            .sources
            .iter()
            .filter(|(_, upstream)| upstream.as_str() == source)
            .map(|(dependent, _)| dependent.clone())
            .collect();

        for dependent in dependents {
            if let Some(controller) = self.fields.get_mut(&dependent) {
                let report = controller.on_dependency_change(value);
                self.record(report);
            }
        }
    }

    fn record(&mut self, report: Option<ValidationReport>) {
        if let Some(report) = report {
            self.state.record(report);
        }
    }

    fn field_or_err(&self, name: &str) -> FormResult<&FieldController> {
        self.fields
            .get(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))
    }

    fn field_mut_or_err(&mut self, name: &str) -> FormResult<&mut FieldController> {
        self.fields
            .get_mut(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::field::FieldKind;
    use std::time::Duration;

    fn signup() -> FormSession {
        let mut session = FormSession::new(SubmitPolicy::default());
        session
            .register(FieldController::new(FieldKind::Email, FieldProps::default()))
            .unwrap();
        session
            .register(FieldController::new(FieldKind::Password, FieldProps::default()))
            .unwrap();
        session
            .register(FieldController::new(
                FieldKind::ConfirmPassword,
                FieldProps::default(),
            ))
            .unwrap();
        session
            .add_dependency("confirm_password", "password")
            .unwrap();
        session
    }

    fn type_and_blur(session: &mut FormSession, field: &str, value: &str) {
        session.focus(field).unwrap();
        session.change(field, value, Instant::now()).unwrap();
        session.blur(field).unwrap();
    }

    #[test]
    fn test_unknown_and_duplicate_fields() {
        let mut session = signup();
        assert_eq!(
            session.blur("nope"),
            Err(FormError::UnknownField("nope".to_string()))
        );
        assert_eq!(
            session.register(FieldController::new(FieldKind::Email, FieldProps::default())),
            Err(FormError::DuplicateField("email".to_string()))
        );
    }

    #[test]
    fn test_dependency_edges_are_validated() {
        let mut session = signup();
        assert_eq!(
            session.add_dependency("password", "password"),
            Err(FormError::SelfDependency("password".to_string()))
        );
        assert!(matches!(
            session.add_dependency("password", "confirm_password"),
            Err(FormError::CyclicDependency { .. })
        ));
        assert_eq!(
            session.add_dependency("confirm_password", "ghost"),
            Err(FormError::UnknownField("ghost".to_string()))
        );
    }

    #[test]
    fn test_password_edit_invalidates_touched_confirm() {
        let mut session = signup();
        type_and_blur(&mut session, "password", "SecurePass123!");
        type_and_blur(&mut session, "confirm_password", "SecurePass123!");
        assert!(session.state().result("confirm_password").unwrap().is_valid);

        session
            .change("password", "SecurePass123!x", Instant::now())
            .unwrap();
        let confirm = session.state().result("confirm_password").unwrap();
        assert!(!confirm.is_valid);
        assert!(confirm.has_error("Passwords do not match"));
        assert!(!session.is_submittable());
    }

    #[test]
    fn test_full_signup_becomes_submittable() {
        let mut session = signup();
        assert!(!session.is_submittable());
        type_and_blur(&mut session, "email", "user@example.com");
        type_and_blur(&mut session, "password", "SecurePass123!");
        assert!(!session.is_submittable());
        type_and_blur(&mut session, "confirm_password", "SecurePass123!");
        assert!(session.is_submittable());
        assert_eq!(session.completion_percentage(), 100);
    }

    #[test]
    fn test_touch_all_surfaces_every_error() {
        let mut session = signup();
        session.touch_all();
        let verdict = session.verdict();
        assert_eq!(verdict.blockers.len(), 6);
        assert_eq!(
            session.field("email").unwrap().display_errors(),
            ["Email is required".to_string()]
        );
    }

    #[test]
    fn test_autofill_through_session() {
        let start = Instant::now();
        let mut session = signup();
        session.change("email", "user@example.com", start).unwrap();
        assert_eq!(
            session.next_autofill_deadline(),
            Some(start + Duration::from_millis(1500))
        );
        assert_eq!(session.poll_autofill(start + Duration::from_millis(10)), 0);
        assert_eq!(session.poll_autofill(start + Duration::from_millis(1500)), 1);
        assert!(session.field("email").unwrap().is_touched());
        assert!(session.state().result("email").unwrap().is_valid);
    }

    #[test]
    fn test_set_props_switches_required_membership() {
        let mut session = signup();
        session.set_props("email", FieldProps::optional()).unwrap();
        assert!(!session.state().required_fields().contains("email"));
        session.set_props("email", FieldProps::default()).unwrap();
        assert!(session.state().required_fields().contains("email"));
    }

    #[test]
    fn test_submit_succeeded_discards_state() {
        let start = Instant::now();
        let mut session = signup();
        session.change("email", "user@example.com", start).unwrap();
        type_and_blur(&mut session, "password", "x");
        session.submit_succeeded();

        assert!(session.state().results().is_empty());
        assert_eq!(session.field_names().count(), 0);
        assert_eq!(session.next_autofill_deadline(), None);
        assert_eq!(session.poll_autofill(start + Duration::from_secs(5)), 0);
    }
}
