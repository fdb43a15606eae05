//! Prelude for form validation
//!
//! Re-exports the types a field wrapper or form typically needs.

pub use crate::config::{EngineSettings, LengthBounds, ThresholdTable};
pub use crate::error::{ConfigError, FormError, FormResult};
pub use crate::functional::touch_tracker::{TouchEffect, TouchEvent, TouchState};
pub use crate::functional::validation_engine::{
    validate_confirm_password, validate_field, ValidationConfig, ValidationResult,
};
pub use crate::functional::validation_rules::{is_blank, Rule};
pub use crate::models::field::{FieldKind, FieldType, ValidationMode};
pub use crate::models::RuleContext;
#[cfg(feature = "runtime")]
pub use crate::services::autofill_runtime::AutofillRuntime;
pub use crate::services::field_controller::{
    FieldController, FieldProps, FieldView, ValidationReport,
};
pub use crate::services::form_aggregator::{
    completion_percentage, evaluate_submission, is_form_submittable, Blocker,
    FormValidationState, SubmitPolicy, SubmitVerdict,
};
pub use crate::services::form_session::FormSession;
