//! Validation schemas.
//!
//! A [`Schema`] maps field names to [`Validator`]s and carries a list of
//! [`ChainedValidator`]s that check the cleaned data as a whole. Running a
//! schema aggregates every field error in one pass; chained validators only
//! run once all fields are clean.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use webforms_core::ValidationError;
use webforms_http::{FormRequest, QueryDict};

/// Validated values keyed by field name.
pub type CleanedData = BTreeMap<String, Value>;

/// Context handed to every validator during one schema run.
///
/// The state exposes the current request (the CSRF validator reads the
/// session token from it) and translates messages through the request's
/// localizer. Callers may attach extra values for their own validators.
pub struct ValidationState<'r> {
    request: &'r dyn FormRequest,
    values: BTreeMap<String, Value>,
}

impl<'r> ValidationState<'r> {
    /// Creates the default state for a request.
    pub fn new(request: &'r dyn FormRequest) -> Self {
        Self {
            request,
            values: BTreeMap::new(),
        }
    }

    /// Attaches a value for custom validators.
    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Returns an attached value.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Returns the request being validated.
    pub fn request(&self) -> &'r dyn FormRequest {
        self.request
    }

    /// Translates a message through the request's localizer.
    pub fn translate(&self, msgid: &str) -> String {
        self.request.localizer().translate(msgid)
    }
}

impl fmt::Debug for ValidationState<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationState")
            .field("method", self.request.method())
            .field("values", &self.values)
            .finish()
    }
}

/// Converts one submitted value into its cleaned form.
pub trait Validator: Send + Sync + fmt::Debug {
    /// Cleans `raw`, which is `None` when the key was not submitted.
    fn clean(
        &self,
        raw: Option<&str>,
        state: &ValidationState<'_>,
    ) -> Result<Value, ValidationError>;
}

/// Checks relationships between already-cleaned fields.
pub trait ChainedValidator: Send + Sync + fmt::Debug {
    /// Validates the cleaned data. Errors naming fields are reported under
    /// those fields; a bare message is reported for the whole form.
    fn validate(
        &self,
        cleaned: &CleanedData,
        state: &ValidationState<'_>,
    ) -> Result<(), ValidationError>;
}

/// A compiled set of validators for one form type.
#[derive(Debug, Clone)]
pub struct Schema {
    fields: BTreeMap<String, Arc<dyn Validator>>,
    chained: Vec<Arc<dyn ChainedValidator>>,
    allow_extra_fields: bool,
    filter_extra_fields: bool,
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

impl Schema {
    /// Creates an empty schema that accepts and drops unknown keys.
    pub fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
            chained: Vec::new(),
            allow_extra_fields: true,
            filter_extra_fields: true,
        }
    }

    /// Sets whether unknown submitted keys are accepted.
    #[must_use]
    pub const fn allow_extra_fields(mut self, allow: bool) -> Self {
        self.allow_extra_fields = allow;
        self
    }

    /// Sets whether accepted unknown keys are dropped from the output.
    #[must_use]
    pub const fn filter_extra_fields(mut self, filter: bool) -> Self {
        self.filter_extra_fields = filter;
        self
    }

    /// Registers a field validator.
    pub fn add_field(&mut self, name: impl Into<String>, validator: Arc<dyn Validator>) {
        self.fields.insert(name.into(), validator);
    }

    /// Registers a chained validator.
    pub fn add_chained_validator(&mut self, validator: Arc<dyn ChainedValidator>) {
        self.chained.push(validator);
    }

    /// Returns `true` if the schema validates `name`.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Returns the validated field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Returns the number of field validators.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Returns the number of chained validators.
    pub fn chained_count(&self) -> usize {
        self.chained.len()
    }

    /// Validates submitted data.
    pub fn validate(
        &self,
        data: &QueryDict,
        state: &ValidationState<'_>,
    ) -> Result<CleanedData, ValidationError> {
        let mut cleaned = CleanedData::new();
        let mut errors = BTreeMap::new();

        for key in data.keys() {
            if self.fields.contains_key(key) {
                continue;
            }
            if !self.allow_extra_fields {
                errors.insert(
                    key.to_string(),
                    state
                        .translate("The input field {name} was not expected.")
                        .replace("{name}", key),
                );
            } else if !self.filter_extra_fields {
                if let Some(value) = data.get(key) {
                    cleaned.insert(key.to_string(), Value::String(value.to_string()));
                }
            }
        }

        for (name, validator) in &self.fields {
            match validator.clean(data.get(name), state) {
                Ok(value) => {
                    cleaned.insert(name.clone(), value);
                }
                Err(err) => {
                    errors.insert(name.clone(), err.message);
                }
            }
        }

        if !errors.is_empty() {
            return Err(ValidationError::with_field_errors(errors));
        }

        for validator in &self.chained {
            if let Err(err) = validator.validate(&cleaned, state) {
                errors.extend(err.unpack_errors());
            }
        }

        if errors.is_empty() {
            Ok(cleaned)
        } else {
            Err(ValidationError::with_field_errors(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::{FieldsMatch, Int, UnicodeString};
    use webforms_core::NON_FIELD_ERRORS;
    use webforms_http::SimpleRequest;

    #[derive(Debug)]
    struct AlwaysFails;

    impl ChainedValidator for AlwaysFails {
        fn validate(
            &self,
            _: &CleanedData,
            _: &ValidationState<'_>,
        ) -> Result<(), ValidationError> {
            Err(ValidationError::new("Nope", "invalid"))
        }
    }

    fn schema() -> Schema {
        let mut schema = Schema::new();
        schema.add_field("name", Arc::new(UnicodeString::new().not_empty()));
        schema.add_field("age", Arc::new(Int::new()));
        schema
    }

    #[test]
    fn test_valid_data() {
        let request = SimpleRequest::builder().build();
        let state = ValidationState::new(&request);
        let data = QueryDict::parse("name=Ann&age=31&extra=x");
        let cleaned = schema().validate(&data, &state).unwrap();
        assert_eq!(cleaned.get("name"), Some(&Value::from("Ann")));
        assert_eq!(cleaned.get("age"), Some(&Value::from(31)));
        assert!(!cleaned.contains_key("extra"));
    }

    #[test]
    fn test_errors_aggregate() {
        let request = SimpleRequest::builder().build();
        let state = ValidationState::new(&request);
        let data = QueryDict::parse("age=old");
        let err = schema().validate(&data, &state).unwrap_err();
        assert_eq!(err.field_errors.len(), 2);
        assert!(err.field_errors.contains_key("name"));
        assert!(err.field_errors.contains_key("age"));
    }

    #[test]
    fn test_extra_fields_kept_when_not_filtered() {
        let request = SimpleRequest::builder().build();
        let state = ValidationState::new(&request);
        let data = QueryDict::parse("name=Ann&extra=x");
        let cleaned = schema()
            .filter_extra_fields(false)
            .validate(&data, &state)
            .unwrap();
        assert_eq!(cleaned.get("extra"), Some(&Value::from("x")));
    }

    #[test]
    fn test_extra_fields_rejected() {
        let request = SimpleRequest::builder().build();
        let state = ValidationState::new(&request);
        let data = QueryDict::parse("name=Ann&extra=x");
        let err = schema()
            .allow_extra_fields(false)
            .validate(&data, &state)
            .unwrap_err();
        assert_eq!(
            err.field_errors.get("extra").map(String::as_str),
            Some("The input field extra was not expected.")
        );
    }

    #[test]
    fn test_chained_skipped_when_fields_fail() {
        let request = SimpleRequest::builder().build();
        let state = ValidationState::new(&request);
        let mut schema = schema();
        schema.add_chained_validator(Arc::new(AlwaysFails));
        let err = schema.validate(&QueryDict::new(), &state).unwrap_err();
        assert!(!err.field_errors.contains_key(NON_FIELD_ERRORS));
    }

    #[test]
    fn test_chained_error_under_whole_form_key() {
        let request = SimpleRequest::builder().build();
        let state = ValidationState::new(&request);
        let mut schema = schema();
        schema.add_chained_validator(Arc::new(AlwaysFails));
        let err = schema
            .validate(&QueryDict::parse("name=Ann"), &state)
            .unwrap_err();
        assert_eq!(
            err.field_errors.get(NON_FIELD_ERRORS).map(String::as_str),
            Some("Nope")
        );
    }

    #[test]
    fn test_chained_error_under_field() {
        let request = SimpleRequest::builder().build();
        let state = ValidationState::new(&request);
        let mut schema = Schema::new();
        schema.add_field("a", Arc::new(UnicodeString::new()));
        schema.add_field("b", Arc::new(UnicodeString::new()));
        schema.add_chained_validator(Arc::new(FieldsMatch::new(["a", "b"])));
        let err = schema
            .validate(&QueryDict::parse("a=x&b=y"), &state)
            .unwrap_err();
        assert!(err.field_errors.contains_key("b"));
        assert!(!err.field_errors.contains_key(NON_FIELD_ERRORS));
    }

    #[test]
    fn test_state_values() {
        let request = SimpleRequest::builder().build();
        let state = ValidationState::new(&request).with_value("tenant", "acme");
        assert_eq!(state.value("tenant"), Some(&Value::from("acme")));
        assert!(state.value("missing").is_none());
    }
}
