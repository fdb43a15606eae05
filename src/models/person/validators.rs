use crate::{
    config::LengthBounds,
    functional::validation_rules::{person_name, phone, Rule},
    models::{field::FieldKind, length_rules},
};

/// Rule table for contact-person kinds.
pub fn rules(kind: FieldKind, bounds: LengthBounds) -> Vec<Rule> {
    let mut rules = length_rules(kind.label(), bounds);
    match kind {
        FieldKind::FirstName | FieldKind::LastName => rules.push(person_name(format!(
            "{} can only contain letters, spaces, apostrophes, periods, and hyphens",
            kind.label()
        ))),
        FieldKind::Phone => {
            rules.push(phone("Phone number can only contain digits, spaces, and ()+-"))
        }
        _ => {}
    }
    rules
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_accept_unicode_letters() {
        let rules = rules(FieldKind::LastName, LengthBounds::at_most(50));
        assert!(rules.iter().all(|r| r.check("O'Brien-Süß")));
        assert!(!rules.iter().all(|r| r.check("R2D2")));
    }

    #[test]
    fn test_phone_bounds_and_charset() {
        let rules = rules(FieldKind::Phone, LengthBounds::between(10, 20));
        assert!(rules.iter().all(|r| r.check("+1 (555) 123-4567")));
        assert!(!rules.iter().all(|r| r.check("555-1234")));
        assert!(!rules.iter().all(|r| r.check("555 123 4567 ext")));
    }
}
