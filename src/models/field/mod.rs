//! Field catalog.
//!
//! Every input the application renders is one of a closed set of
//! [`FieldKind`]s. The kind decides the label used in messages, the input
//! type, the shape the autofill heuristic looks for, and which rule table
//! builds its [`ValidationConfig`](crate::functional::validation_engine::ValidationConfig).

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Input type of the rendered control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    #[display(fmt = "text")]
    Text,
    #[display(fmt = "email")]
    Email,
    #[display(fmt = "password")]
    Password,
}

/// Whether an empty value is an error (`Required`) or skipped (`Optional`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    #[default]
    #[display(fmt = "required")]
    Required,
    #[display(fmt = "optional")]
    Optional,
}

/// What a freshly autofilled value is expected to look like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutofillShape {
    /// Contains both `@` and `.`.
    Email,
    /// At least seven digits.
    Phone,
    /// Anything non-blank.
    NonBlank,
}

impl AutofillShape {
    pub fn matches(self, value: &str) -> bool {
        match self {
            AutofillShape::Email => value.contains('@') && value.contains('.'),
            AutofillShape::Phone => value.chars().filter(|c| c.is_ascii_digit()).count() >= 7,
            AutofillShape::NonBlank => !value.trim().is_empty(),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[display(fmt = "email")]
    Email,
    #[display(fmt = "password")]
    Password,
    #[display(fmt = "confirm_password")]
    ConfirmPassword,
    #[display(fmt = "username")]
    Username,
    #[display(fmt = "first_name")]
    FirstName,
    #[display(fmt = "last_name")]
    LastName,
    #[display(fmt = "phone")]
    Phone,
    #[display(fmt = "street_name")]
    StreetName,
    #[display(fmt = "street_number")]
    StreetNumber,
    #[display(fmt = "unit")]
    Unit,
    #[display(fmt = "postal_code")]
    PostalCode,
    #[display(fmt = "city")]
    City,
    #[display(fmt = "province")]
    Province,
    #[display(fmt = "country")]
    Country,
}

impl FieldKind {
    pub const ALL: [FieldKind; 14] = [
        FieldKind::Email,
        FieldKind::Password,
        FieldKind::ConfirmPassword,
        FieldKind::Username,
        FieldKind::FirstName,
        FieldKind::LastName,
        FieldKind::Phone,
        FieldKind::StreetName,
        FieldKind::StreetNumber,
        FieldKind::Unit,
        FieldKind::PostalCode,
        FieldKind::City,
        FieldKind::Province,
        FieldKind::Country,
    ];

    /// Stable identifier, also used as the default field name and as the
    /// key in threshold files.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Email => "email",
            FieldKind::Password => "password",
            FieldKind::ConfirmPassword => "confirm_password",
            FieldKind::Username => "username",
            FieldKind::FirstName => "first_name",
            FieldKind::LastName => "last_name",
            FieldKind::Phone => "phone",
            FieldKind::StreetName => "street_name",
            FieldKind::StreetNumber => "street_number",
            FieldKind::Unit => "unit",
            FieldKind::PostalCode => "postal_code",
            FieldKind::City => "city",
            FieldKind::Province => "province",
            FieldKind::Country => "country",
        }
    }

    /// Human label used as the subject of messages.
    pub fn label(self) -> &'static str {
        match self {
            FieldKind::Email => "Email",
            FieldKind::Password => "Password",
            FieldKind::ConfirmPassword => "Confirm password",
            FieldKind::Username => "Username",
            FieldKind::FirstName => "First name",
            FieldKind::LastName => "Last name",
            FieldKind::Phone => "Phone number",
            FieldKind::StreetName => "Street name",
            FieldKind::StreetNumber => "Street number",
            FieldKind::Unit => "Unit",
            FieldKind::PostalCode => "Postal code",
            FieldKind::City => "City",
            FieldKind::Province => "Province",
            FieldKind::Country => "Country",
        }
    }

    pub fn field_type(self) -> FieldType {
        match self {
            FieldKind::Email => FieldType::Email,
            FieldKind::Password | FieldKind::ConfirmPassword => FieldType::Password,
            _ => FieldType::Text,
        }
    }

    pub fn autofill_shape(self) -> AutofillShape {
        match self {
            FieldKind::Email => AutofillShape::Email,
            FieldKind::Phone => AutofillShape::Phone,
            _ => AutofillShape::NonBlank,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shape() {
        assert!(AutofillShape::Email.matches("user@example.com"));
        assert!(!AutofillShape::Email.matches("user@example"));
        assert!(!AutofillShape::Email.matches("example.com"));
    }

    #[test]
    fn test_phone_shape_counts_digits() {
        assert!(AutofillShape::Phone.matches("+1 (555) 123-4567"));
        assert!(!AutofillShape::Phone.matches("555-12"));
    }

    #[test]
    fn test_kind_serde_names_match_as_str() {
        for kind in FieldKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_kind_display_matches_as_str() {
        for kind in FieldKind::ALL {
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }

    #[test]
    fn test_display_of_mode_and_type() {
        assert_eq!(ValidationMode::Optional.to_string(), "optional");
        assert_eq!(FieldKind::Email.field_type().to_string(), "email");
        assert_eq!(FieldKind::ConfirmPassword.to_string(), "confirm_password");
    }
}
