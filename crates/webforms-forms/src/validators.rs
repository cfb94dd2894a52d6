//! Reference validators.
//!
//! A small set of [`Validator`]s and one [`ChainedValidator`] covering what
//! typical login, registration and settings forms need. Messages are looked
//! up through the state's localizer before placeholders are filled in, so
//! catalogs translate the message template.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use webforms_core::ValidationError;

use crate::schema::{ChainedValidator, CleanedData, ValidationState, Validator};

const EMPTY: &str = "Please enter a value";

fn empty_error(state: &ValidationState<'_>) -> ValidationError {
    ValidationError::new(state.translate(EMPTY), "empty")
}

/// Trims `raw` when asked and maps a missing key to the empty string.
fn prepare(raw: Option<&str>, strip: bool) -> &str {
    let raw = raw.unwrap_or_default();
    if strip {
        raw.trim()
    } else {
        raw
    }
}

/// A text value with optional length bounds.
///
/// ```
/// use webforms_forms::validators::UnicodeString;
/// use webforms_forms::schema::{ValidationState, Validator};
/// use webforms_http::SimpleRequest;
///
/// let request = SimpleRequest::builder().build();
/// let state = ValidationState::new(&request);
/// let v = UnicodeString::new().not_empty().strip();
///
/// assert_eq!(v.clean(Some("  ann "), &state).unwrap(), "ann");
/// assert!(v.clean(Some("   "), &state).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct UnicodeString {
    not_empty: bool,
    strip: bool,
    min: Option<usize>,
    max: Option<usize>,
}

impl UnicodeString {
    /// Accepts any text, including none.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects empty input.
    #[must_use]
    pub const fn not_empty(mut self) -> Self {
        self.not_empty = true;
        self
    }

    /// Trims surrounding whitespace before validating.
    #[must_use]
    pub const fn strip(mut self) -> Self {
        self.strip = true;
        self
    }

    /// Requires at least `min` characters.
    #[must_use]
    pub const fn min(mut self, min: usize) -> Self {
        self.min = Some(min);
        self
    }

    /// Allows at most `max` characters.
    #[must_use]
    pub const fn max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    /// Runs the checks and returns the prepared text.
    pub fn check<'a>(
        &self,
        raw: Option<&'a str>,
        state: &ValidationState<'_>,
    ) -> Result<&'a str, ValidationError> {
        let value = prepare(raw, self.strip);
        if value.is_empty() {
            if self.not_empty {
                return Err(empty_error(state));
            }
            return Ok(value);
        }
        let len = value.chars().count();
        if let Some(min) = self.min {
            if len < min {
                let message = state
                    .translate("Enter a value at least {min} characters long")
                    .replace("{min}", &min.to_string());
                return Err(ValidationError::new(message, "too_short"));
            }
        }
        if let Some(max) = self.max {
            if len > max {
                let message = state
                    .translate("Enter a value not more than {max} characters long")
                    .replace("{max}", &max.to_string());
                return Err(ValidationError::new(message, "too_long"));
            }
        }
        Ok(value)
    }
}

impl Validator for UnicodeString {
    fn clean(
        &self,
        raw: Option<&str>,
        state: &ValidationState<'_>,
    ) -> Result<Value, ValidationError> {
        self.check(raw, state).map(Value::from)
    }
}

fn email_user_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[\w!#$%&'*+\-/=?^`{|}~.]+$").expect("valid regex"))
}

fn email_domain_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:[a-z0-9][a-z0-9\-]{0,62}\.)+[a-z]{2,}$").expect("valid regex")
    })
}

/// An email address.
#[derive(Debug, Clone, Default)]
pub struct Email {
    not_empty: bool,
}

impl Email {
    /// Accepts an address or nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects empty input.
    #[must_use]
    pub const fn not_empty(mut self) -> Self {
        self.not_empty = true;
        self
    }
}

impl Validator for Email {
    fn clean(
        &self,
        raw: Option<&str>,
        state: &ValidationState<'_>,
    ) -> Result<Value, ValidationError> {
        let value = prepare(raw, true);
        if value.is_empty() {
            if self.not_empty {
                return Err(empty_error(state));
            }
            return Ok(Value::from(value));
        }
        let mut parts = value.split('@');
        let (Some(user), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ValidationError::new(
                state.translate("An email address must contain a single @"),
                "no_at",
            ));
        };
        if !email_user_re().is_match(user) {
            let message = state
                .translate("The username portion of the email address is invalid (the portion before the @: {username})")
                .replace("{username}", user);
            return Err(ValidationError::new(message, "bad_username"));
        }
        if !email_domain_re().is_match(domain) {
            let message = state
                .translate("The domain portion of the email address is invalid (the portion after the @: {domain})")
                .replace("{domain}", domain);
            return Err(ValidationError::new(message, "bad_domain"));
        }
        Ok(Value::from(value))
    }
}

/// An integer with optional bounds. Empty optional input cleans to `null`.
#[derive(Debug, Clone, Default)]
pub struct Int {
    not_empty: bool,
    min: Option<i64>,
    max: Option<i64>,
}

impl Int {
    /// Accepts any integer or nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects empty input.
    #[must_use]
    pub const fn not_empty(mut self) -> Self {
        self.not_empty = true;
        self
    }

    /// Requires at least `min`.
    #[must_use]
    pub const fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    /// Allows at most `max`.
    #[must_use]
    pub const fn max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }
}

impl Validator for Int {
    fn clean(
        &self,
        raw: Option<&str>,
        state: &ValidationState<'_>,
    ) -> Result<Value, ValidationError> {
        let value = prepare(raw, true);
        if value.is_empty() {
            if self.not_empty {
                return Err(empty_error(state));
            }
            return Ok(Value::Null);
        }
        let Ok(number) = value.parse::<i64>() else {
            return Err(ValidationError::new(
                state.translate("Please enter an integer value"),
                "integer",
            ));
        };
        if let Some(min) = self.min {
            if number < min {
                let message = state
                    .translate("Please enter a number that is {min} or greater")
                    .replace("{min}", &min.to_string());
                return Err(ValidationError::new(message, "too_low"));
            }
        }
        if let Some(max) = self.max {
            if number > max {
                let message = state
                    .translate("Please enter a number that is {max} or smaller")
                    .replace("{max}", &max.to_string());
                return Err(ValidationError::new(message, "too_high"));
            }
        }
        Ok(Value::from(number))
    }
}

/// A checkbox flag: absent, empty, `0`, `false` and `off` are `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bool;

impl Validator for Bool {
    fn clean(&self, raw: Option<&str>, _: &ValidationState<'_>) -> Result<Value, ValidationError> {
        let value = prepare(raw, true).to_ascii_lowercase();
        Ok(Value::Bool(!matches!(
            value.as_str(),
            "" | "0" | "false" | "off" | "no"
        )))
    }
}

/// One of a fixed list of values.
#[derive(Debug, Clone)]
pub struct OneOf {
    values: Vec<String>,
}

impl OneOf {
    /// Accepts exactly the given values.
    pub fn new<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

impl Validator for OneOf {
    fn clean(
        &self,
        raw: Option<&str>,
        state: &ValidationState<'_>,
    ) -> Result<Value, ValidationError> {
        let value = raw.unwrap_or_default();
        if self.values.iter().any(|v| v == value) {
            return Ok(Value::from(value));
        }
        let message = state
            .translate("Value must be one of: {items} (not '{value}')")
            .replace("{items}", &self.values.join("; "))
            .replace("{value}", value);
        Err(ValidationError::new(message, "invalid"))
    }
}

/// An ISO-8601 calendar date (`YYYY-MM-DD`), cleaned to the same format.
#[derive(Debug, Clone, Default)]
pub struct DateConverter {
    not_empty: bool,
}

impl DateConverter {
    /// Accepts a date or nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects empty input.
    #[must_use]
    pub const fn not_empty(mut self) -> Self {
        self.not_empty = true;
        self
    }
}

impl Validator for DateConverter {
    fn clean(
        &self,
        raw: Option<&str>,
        state: &ValidationState<'_>,
    ) -> Result<Value, ValidationError> {
        let value = prepare(raw, true);
        if value.is_empty() {
            if self.not_empty {
                return Err(empty_error(state));
            }
            return Ok(Value::Null);
        }
        chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(|date| Value::from(date.format("%Y-%m-%d").to_string()))
            .map_err(|_| {
                ValidationError::new(
                    state.translate("Please enter the date in the form YYYY-MM-DD"),
                    "bad_format",
                )
            })
    }
}

/// Requires every listed field to equal the first one (password
/// confirmation and the like). Mismatches are reported under the fields
/// that differ.
#[derive(Debug, Clone)]
pub struct FieldsMatch {
    fields: Vec<String>,
}

impl FieldsMatch {
    /// Compares the given fields.
    pub fn new<S: Into<String>>(fields: impl IntoIterator<Item = S>) -> Self {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

impl ChainedValidator for FieldsMatch {
    fn validate(
        &self,
        cleaned: &CleanedData,
        state: &ValidationState<'_>,
    ) -> Result<(), ValidationError> {
        let Some((first, rest)) = self.fields.split_first() else {
            return Ok(());
        };
        let expected = cleaned.get(first);
        let errors: std::collections::BTreeMap<String, String> = rest
            .iter()
            .filter(|name| cleaned.get(name.as_str()) != expected)
            .map(|name| (name.clone(), state.translate("Fields do not match")))
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::with_field_errors(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use webforms_core::i18n::{catalog, Localizer};
    use webforms_http::SimpleRequest;

    fn clean(v: &dyn Validator, raw: Option<&str>) -> Result<Value, ValidationError> {
        let request = SimpleRequest::builder().build();
        let state = ValidationState::new(&request);
        v.clean(raw, &state)
    }

    #[test]
    fn test_unicode_string_optional() {
        assert_eq!(clean(&UnicodeString::new(), None).unwrap(), "");
        assert_eq!(clean(&UnicodeString::new(), Some(" a ")).unwrap(), " a ");
    }

    #[test]
    fn test_unicode_string_bounds() {
        let v = UnicodeString::new().min(2).max(4);
        assert_eq!(
            clean(&v, Some("a")).unwrap_err().message,
            "Enter a value at least 2 characters long"
        );
        assert_eq!(
            clean(&v, Some("abcde")).unwrap_err().message,
            "Enter a value not more than 4 characters long"
        );
        assert_eq!(clean(&v, Some("äöü")).unwrap(), "äöü");
    }

    #[test]
    fn test_unicode_string_not_empty() {
        let err = clean(&UnicodeString::new().not_empty(), Some("")).unwrap_err();
        assert_eq!(err.code, "empty");
        assert_eq!(err.message, "Please enter a value");
    }

    #[test]
    fn test_email() {
        assert_eq!(clean(&Email::new(), Some(" a@b.org ")).unwrap(), "a@b.org");
        assert_eq!(clean(&Email::new(), None).unwrap(), "");
        assert_eq!(
            clean(&Email::new(), Some("ab.org")).unwrap_err().code,
            "no_at"
        );
        assert_eq!(
            clean(&Email::new(), Some("a@b@c.org")).unwrap_err().code,
            "no_at"
        );
        assert_eq!(
            clean(&Email::new(), Some("a b@c.org")).unwrap_err().code,
            "bad_username"
        );
        assert_eq!(
            clean(&Email::new(), Some("a@localhost")).unwrap_err().code,
            "bad_domain"
        );
        assert_eq!(
            clean(&Email::new().not_empty(), Some("")).unwrap_err().code,
            "empty"
        );
    }

    #[test]
    fn test_int() {
        assert_eq!(clean(&Int::new(), Some("42")).unwrap(), 42);
        assert_eq!(clean(&Int::new(), Some("")).unwrap(), Value::Null);
        assert_eq!(clean(&Int::new(), Some("x")).unwrap_err().code, "integer");
        let v = Int::new().min(1).max(10);
        assert_eq!(
            clean(&v, Some("0")).unwrap_err().message,
            "Please enter a number that is 1 or greater"
        );
        assert_eq!(
            clean(&v, Some("11")).unwrap_err().message,
            "Please enter a number that is 10 or smaller"
        );
    }

    #[test]
    fn test_bool() {
        assert_eq!(clean(&Bool, None).unwrap(), false);
        assert_eq!(clean(&Bool, Some("1")).unwrap(), true);
        assert_eq!(clean(&Bool, Some("on")).unwrap(), true);
        assert_eq!(clean(&Bool, Some("Off")).unwrap(), false);
    }

    #[test]
    fn test_one_of() {
        let v = OneOf::new(["en", "fr"]);
        assert_eq!(clean(&v, Some("fr")).unwrap(), "fr");
        assert_eq!(
            clean(&v, Some("de")).unwrap_err().message,
            "Value must be one of: en; fr (not 'de')"
        );
    }

    #[test]
    fn test_date_converter() {
        assert_eq!(
            clean(&DateConverter::new(), Some("2024-02-29")).unwrap(),
            "2024-02-29"
        );
        assert_eq!(clean(&DateConverter::new(), None).unwrap(), Value::Null);
        assert_eq!(
            clean(&DateConverter::new(), Some("2023-02-29"))
                .unwrap_err()
                .code,
            "bad_format"
        );
    }

    #[test]
    fn test_fields_match() {
        let request = SimpleRequest::builder().build();
        let state = ValidationState::new(&request);
        let v = FieldsMatch::new(["password", "confirm"]);

        let mut cleaned = CleanedData::new();
        cleaned.insert("password".into(), Value::from("s3cret"));
        cleaned.insert("confirm".into(), Value::from("s3cret"));
        assert!(v.validate(&cleaned, &state).is_ok());

        cleaned.insert("confirm".into(), Value::from("other"));
        let err = v.validate(&cleaned, &state).unwrap_err();
        assert_eq!(
            err.field_errors.get("confirm").map(String::as_str),
            Some("Fields do not match")
        );
    }

    #[test]
    fn test_messages_are_localized() {
        catalog::register_translations(
            "validators_t1",
            vec![("Enter a value at least {min} characters long", "Au moins {min} caractères")],
        );
        let request = SimpleRequest::builder()
            .localizer(Arc::new(Localizer::new("validators_t1")))
            .build();
        let state = ValidationState::new(&request);
        let err = UnicodeString::new().min(3).clean(Some("a"), &state).unwrap_err();
        assert_eq!(err.message, "Au moins 3 caractères");
    }
}
