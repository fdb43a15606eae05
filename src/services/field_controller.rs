//! Per-field controller.
//!
//! One table-driven controller serves every input kind. It owns the field's
//! state and is the only thing that mutates it: change, focus and blur
//! handlers drive the [`TouchTracker`], the [`AutofillDetector`] and the
//! validator, and report results upward.
//!
//! Handlers return the [`ValidationReport`] they emitted, if any, and also
//! hand it to the `on_validation_change` listener when one is registered.

use std::fmt;
use std::time::Instant;

use crate::config::{EngineSettings, ThresholdTable};
use crate::functional::autofill_detector::{AutofillDetector, ChangeProbe};
use crate::functional::touch_tracker::{TouchEffect, TouchEvent, TouchState, TouchTracker};
use crate::functional::validation_engine::{validate_field, ValidationConfig, ValidationResult};
use crate::models::field::{FieldKind, ValidationMode};
use crate::models::RuleContext;

/// Receives `(is_valid, errors)` every time the field is validated.
pub type ValidationListener = Box<dyn FnMut(bool, &[String]) + Send>;

/// Inputs supplied by the parent on each render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldProps {
    pub disabled: bool,
    /// Errors from the parent or the server, shown while the field is not
    /// displaying its own.
    pub external_errors: Vec<String>,
    pub enable_validation: bool,
    pub validation_mode: ValidationMode,
}

impl Default for FieldProps {
    fn default() -> Self {
        Self {
            disabled: false,
            external_errors: Vec::new(),
            enable_validation: true,
            validation_mode: ValidationMode::Required,
        }
    }
}

impl FieldProps {
    pub fn optional() -> Self {
        Self {
            validation_mode: ValidationMode::Optional,
            ..Self::default()
        }
    }

    pub fn without_validation() -> Self {
        Self {
            enable_validation: false,
            ..Self::default()
        }
    }

    pub fn with_external_errors<I, S>(mut self, errors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.external_errors = errors.into_iter().map(Into::into).collect();
        self
    }
}

/// A validation result tagged with the field it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub field: String,
    pub result: ValidationResult,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldState {
    pub value: String,
    pub touch: TouchState,
    pub focused: bool,
    pub ever_focused: bool,
    pub last_result: ValidationResult,
}

/// What the rendering layer needs from a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldView<'a> {
    pub value: &'a str,
    pub touched: bool,
    pub display_errors: &'a [String],
    pub disabled: bool,
    pub autofill_pending: bool,
}

pub struct FieldController {
    name: String,
    kind: FieldKind,
    props: FieldProps,
    thresholds: ThresholdTable,
    linked_value: Option<String>,
    config: Option<ValidationConfig>,
    state: FieldState,
    tracker: TouchTracker,
    detector: AutofillDetector,
    listener: Option<ValidationListener>,
    torn_down: bool,
}

impl FieldController {
    /// Controller named after its kind, with default engine settings.
    pub fn new(kind: FieldKind, props: FieldProps) -> Self {
        Self::with_settings(kind.as_str(), kind, props, &EngineSettings::default())
    }

    pub fn with_settings(
        name: impl Into<String>,
        kind: FieldKind,
        props: FieldProps,
        settings: &EngineSettings,
    ) -> Self {
        let mut controller = Self {
            name: name.into(),
            kind,
            props,
            thresholds: settings.thresholds.clone(),
            linked_value: None,
            config: None,
            state: FieldState::default(),
            tracker: TouchTracker::new(),
            detector: AutofillDetector::with_timing(
                kind.autofill_shape(),
                settings.autofill_grace,
                settings.autofill_min_growth,
            ),
            listener: None,
            torn_down: false,
        };
        controller.rebuild_config();
        controller
    }

    /// Registers the `on_validation_change` callback.
    pub fn on_validation_change<F>(mut self, listener: F) -> Self
    where
        F: FnMut(bool, &[String]) + Send + 'static,
    {
        self.listener = Some(Box::new(listener));
        self
    }

    /// Pre-fills the value without validating or touching the field.
    pub fn with_initial_value(mut self, value: impl Into<String>) -> Self {
        self.state.value = value.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn props(&self) -> &FieldProps {
        &self.props
    }

    pub fn state(&self) -> &FieldState {
        &self.state
    }

    pub fn value(&self) -> &str {
        &self.state.value
    }

    pub fn is_touched(&self) -> bool {
        self.tracker.is_touched()
    }

    pub fn is_required(&self) -> bool {
        self.props.validation_mode == ValidationMode::Required
    }

    pub fn config(&self) -> Option<&ValidationConfig> {
        self.config.as_ref()
    }

    pub fn last_result(&self) -> &ValidationResult {
        &self.state.last_result
    }

    pub fn autofill_pending(&self) -> bool {
        self.detector.is_pending()
    }

    pub fn autofill_deadline(&self) -> Option<Instant> {
        self.detector.deadline()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Engine errors once touched with validation enabled, otherwise the
    /// parent's errors. Never both.
    pub fn display_errors(&self) -> &[String] {
        if self.tracker.is_touched() && self.config.is_some() {
            &self.state.last_result.errors
        } else {
            &self.props.external_errors
        }
    }

    pub fn view(&self) -> FieldView<'_> {
        FieldView {
            value: &self.state.value,
            touched: self.tracker.is_touched(),
            display_errors: self.display_errors(),
            disabled: self.props.disabled,
            autofill_pending: self.detector.is_pending(),
        }
    }

    /// Stores the new value, runs the autofill heuristic, and re-validates
    /// only if the field is already touched.
    pub fn on_change(&mut self, value: impl Into<String>, now: Instant) -> Option<ValidationReport> {
        if self.is_inert() {
            return None;
        }
        let next = value.into();
        let probe = ChangeProbe {
            previous: &self.state.value,
            next: &next,
            ever_focused: self.state.ever_focused,
            touched: self.tracker.is_touched(),
        };
        if self.detector.on_change(&probe, now).is_some() {
            log::debug!("{}: autofill suspected", self.name);
        }
        self.state.value = next;
        self.apply(TouchEvent::Change)
    }

    pub fn on_focus(&mut self) {
        if self.is_inert() {
            return;
        }
        self.state.focused = true;
        self.state.ever_focused = true;
        self.detector.on_interaction();
        self.tracker.apply(TouchEvent::Focus);
    }

    /// Touches the field and always re-validates.
    pub fn on_blur(&mut self) -> Option<ValidationReport> {
        if self.is_inert() {
            return None;
        }
        self.state.focused = false;
        self.detector.on_interaction();
        self.apply(TouchEvent::Blur)
    }

    /// Touches the field without a focus cycle, e.g. on a submit attempt.
    pub fn touch(&mut self) -> Option<ValidationReport> {
        if self.torn_down {
            return None;
        }
        self.detector.cancel();
        self.apply(TouchEvent::Blur)
    }

    /// Fires the autofill grace timer if due, validating the value present
    /// now rather than the one seen at detection.
    pub fn poll_autofill(&mut self, now: Instant) -> Option<ValidationReport> {
        if self.torn_down || !self.detector.poll(now) {
            return None;
        }
        log::debug!("{}: autofill grace elapsed, touching field", self.name);
        self.apply(TouchEvent::AutofillElapsed)
    }

    /// Re-render with new props. Rebuilds the rules and, when touched,
    /// reports a fresh result so toggling validation also updates gating.
    pub fn set_props(&mut self, props: FieldProps) -> Option<ValidationReport> {
        if self.torn_down {
            return None;
        }
        if props.disabled {
            self.detector.cancel();
        }
        self.props = props;
        self.rebuild_config();
        self.revalidate_if_touched()
    }

    /// The field this one depends on changed value. Rules closing over it
    /// are rebuilt; a touched field is re-validated so a stale verdict does
    /// not survive.
    pub fn on_dependency_change(&mut self, source_value: &str) -> Option<ValidationReport> {
        if self.torn_down {
            return None;
        }
        self.linked_value = Some(source_value.to_string());
        self.rebuild_config();
        self.revalidate_if_touched()
    }

    /// Cancels the pending timer and detaches the listener. Every later
    /// event is ignored.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        if self.detector.cancel() {
            log::trace!("{}: pending autofill timer cancelled on teardown", self.name);
        }
        self.listener = None;
        self.torn_down = true;
    }

    fn is_inert(&self) -> bool {
        self.torn_down || self.props.disabled
    }

    fn apply(&mut self, event: TouchEvent) -> Option<ValidationReport> {
        match self.tracker.apply(event) {
            TouchEffect::Validate => Some(self.revalidate()),
            TouchEffect::None => None,
        }
    }

    fn revalidate_if_touched(&mut self) -> Option<ValidationReport> {
        self.tracker.is_touched().then(|| self.revalidate())
    }

    fn revalidate(&mut self) -> ValidationReport {
        let result = validate_field(&self.name, &self.state.value, self.config.as_ref());
        if let Some(listener) = self.listener.as_mut() {
            listener(result.is_valid, &result.errors);
        }
        self.state.last_result = result.clone();
        ValidationReport {
            field: self.name.clone(),
            result,
        }
    }

    fn rebuild_config(&mut self) {
        let context = RuleContext {
            linked_value: self.linked_value.as_deref(),
        };
        self.config = ValidationConfig::build(
            self.props.enable_validation,
            self.props.validation_mode,
            self.kind,
            &self.thresholds,
            &context,
        )
        .map(|mut config| {
            config.field_name = self.name.clone();
            config
        });
    }
}

impl fmt::Debug for FieldController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldController")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("props", &self.props)
            .field("state", &self.state)
            .field("autofill_pending", &self.detector.is_pending())
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}
