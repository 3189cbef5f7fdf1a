//! Resource controllers.
//!
//! One module per resource. Write bodies arrive with every field optional:
//! a PUT body is validated as sent, a PATCH body is first merged over the
//! stored record, so the same checks cover both.

pub mod actors;
pub mod cinema_halls;
pub mod genres;
pub mod movie_sessions;
pub mod movies;
pub mod orders;

use crate::fields::Field;
use store::ValidationErrors;

pub(crate) use crate::fields::REQUIRED;
pub(crate) const BLANK: &str = "This field may not be blank.";
pub(crate) const NOT_POSITIVE: &str = "Ensure this value is greater than or equal to 1.";

/// The field's value, or its error recorded under `name`
pub(crate) fn required<T>(field: Field<T>, name: &str, errors: &mut ValidationErrors) -> Option<T> {
    match field.into_result() {
        Ok(value) => Some(value),
        Err(message) => {
            errors.add(name, message);
            None
        }
    }
}

/// A present, non-blank string, trimmed
pub(crate) fn required_text(
    field: Field<String>,
    name: &str,
    errors: &mut ValidationErrors,
) -> Option<String> {
    let value = required(field, name, errors)?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(name, BLANK);
        return None;
    }
    Some(trimmed.to_string())
}

/// A present integer of at least 1
pub(crate) fn required_positive(
    field: Field<i32>,
    name: &str,
    errors: &mut ValidationErrors,
) -> Option<i32> {
    let value = required(field, name, errors)?;
    if value < 1 {
        errors.add(name, NOT_POSITIVE);
        return None;
    }
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        let mut errors = ValidationErrors::new();

        assert_eq!(
            required_text(Field::Valid(" Drama ".into()), "name", &mut errors),
            Some("Drama".into())
        );
        assert!(errors.is_empty());

        assert_eq!(required_text(Field::Missing, "name", &mut errors), None);
        assert_eq!(required_text(Field::Valid("  ".into()), "title", &mut errors), None);
        assert_eq!(errors.field("name"), [REQUIRED]);
        assert_eq!(errors.field("title"), [BLANK]);
    }

    #[test]
    fn test_required_positive() {
        let mut errors = ValidationErrors::new();

        assert_eq!(required_positive(Field::Valid(1), "rows", &mut errors), Some(1));
        assert_eq!(required_positive(Field::Valid(0), "rows", &mut errors), None);
        let invalid = Field::Invalid("A valid integer is required.".into());
        assert_eq!(required_positive(invalid, "seats_in_row", &mut errors), None);
        assert_eq!(errors.field("rows"), [NOT_POSITIVE]);
        assert_eq!(errors.field("seats_in_row"), ["A valid integer is required."]);
    }
}
