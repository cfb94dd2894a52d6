//! Form types: declarations compiled into field maps and a schema.

use std::collections::BTreeMap;
use std::sync::Arc;

use webforms_core::{ValidationError, WebformsError, WebformsResult};
use webforms_http::{FormRequest, Method, QueryDict};

use crate::csrf::{csrf_token_field, CSRF_TOKEN_KEY};
use crate::declaration::{Declaration, FormParams};
use crate::fields::FieldDecl;
use crate::schema::{CleanedData, Schema, ValidationState};

/// A compiled, immutable form type.
///
/// Built once with [`FormType::declare`] and shared through `Arc` by every
/// form instance rendered from it.
///
/// ```
/// use webforms_forms::declaration::Declaration;
/// use webforms_forms::fields::FieldDecl;
/// use webforms_forms::registry::FormType;
/// use webforms_forms::validators::UnicodeString;
/// use webforms_http::Method;
///
/// let base = FormType::declare(
///     None,
///     Declaration::new("Search")
///         .method(Method::GET)
///         .field("q", FieldDecl::text().validator(UnicodeString::new())),
/// )
/// .unwrap();
///
/// assert!(base.field("q").is_some());
/// assert!(base.hidden_fields().is_empty());
/// assert!(base.schema().has_field("q"));
/// ```
#[derive(Debug, Clone)]
pub struct FormType {
    name: String,
    fields: BTreeMap<String, FieldDecl>,
    hidden: BTreeMap<String, FieldDecl>,
    params: FormParams,
    schema: Arc<Schema>,
}

impl FormType {
    /// Compiles `declaration` on top of `parent`.
    ///
    /// The parent is never modified. Filtering a name that is neither a
    /// field nor a hidden field fails with [`WebformsError::UnknownField`].
    pub fn declare(parent: Option<&Self>, declaration: Declaration) -> WebformsResult<Self> {
        let (name, declared_fields, declared_params) = declaration.into_parts();

        let (mut fields, mut hidden, mut params) = parent.map_or_else(
            || (BTreeMap::new(), BTreeMap::new(), FormParams::default()),
            |p| (p.fields.clone(), p.hidden.clone(), p.params.clone()),
        );

        for param in declared_params {
            param.apply(&mut params);
        }

        for (field_name, decl) in declared_fields {
            fields.remove(&field_name);
            hidden.remove(&field_name);
            if decl.kind.is_hidden() {
                hidden.insert(field_name, decl);
            } else {
                fields.insert(field_name, decl);
            }
        }

        for item in std::mem::take(&mut params.filter) {
            if fields.remove(&item).is_none() && hidden.remove(&item).is_none() {
                return Err(WebformsError::UnknownField(format!(
                    "cannot filter \"{item}\" from form \"{name}\": no such field"
                )));
            }
            for fieldset in &mut params.fieldsets {
                fieldset.fields.retain(|f| f != &item);
            }
        }

        if params.method == Method::POST {
            hidden
                .entry(CSRF_TOKEN_KEY.to_string())
                .or_insert_with(csrf_token_field);
        } else {
            hidden.remove(CSRF_TOKEN_KEY);
        }

        let schema = Arc::new(compile_schema(&fields, &hidden, &params));

        tracing::debug!(
            form = %name,
            fields = fields.len(),
            hidden = hidden.len(),
            validators = schema.field_count(),
            chained = schema.chained_count(),
            "compiled form type"
        );

        Ok(Self {
            name,
            fields,
            hidden,
            params,
            schema,
        })
    }

    /// Compiles `declaration` as a subtype of this form type.
    pub fn subtype(&self, declaration: Declaration) -> WebformsResult<Self> {
        Self::declare(Some(self), declaration)
    }

    /// Returns the form type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the visible fields.
    pub fn fields(&self) -> &BTreeMap<String, FieldDecl> {
        &self.fields
    }

    /// Returns the hidden fields.
    pub fn hidden_fields(&self) -> &BTreeMap<String, FieldDecl> {
        &self.hidden
    }

    /// Returns a visible field.
    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.get(name)
    }

    /// Returns the parameters.
    pub fn params(&self) -> &FormParams {
        &self.params
    }

    /// Returns the compiled schema.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Returns the submitted data this form type validates: the body for
    /// POST, the query string for GET, both merged otherwise.
    pub fn submitted_data(&self, request: &dyn FormRequest) -> QueryDict {
        if self.params.method == Method::POST {
            request.post().clone()
        } else if self.params.method == Method::GET {
            request.query().clone()
        } else {
            request.params()
        }
    }

    /// Validates the request's submitted data.
    ///
    /// A default [`ValidationState`] is built from the request when `state`
    /// is `None`. The CSRF token is checked but not returned.
    pub fn validate(
        &self,
        request: &dyn FormRequest,
        state: Option<&ValidationState<'_>>,
    ) -> Result<CleanedData, ValidationError> {
        let data = self.submitted_data(request);
        let default_state;
        let state = match state {
            Some(state) => state,
            None => {
                default_state = ValidationState::new(request);
                &default_state
            }
        };
        let mut cleaned = self.schema.validate(&data, state)?;
        cleaned.remove(CSRF_TOKEN_KEY);
        Ok(cleaned)
    }
}

fn compile_schema(
    fields: &BTreeMap<String, FieldDecl>,
    hidden: &BTreeMap<String, FieldDecl>,
    params: &FormParams,
) -> Schema {
    let mut schema = Schema::new();
    for (name, decl) in fields.iter().chain(hidden) {
        if let Some(validator) = &decl.validator {
            schema.add_field(name.clone(), Arc::clone(validator));
        }
    }
    for validator in &params.chained_validators {
        schema.add_chained_validator(Arc::clone(validator));
    }
    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::FieldsetItem;
    use crate::validators::{FieldsMatch, UnicodeString};
    use webforms_core::NON_FIELD_ERRORS;
    use webforms_http::SimpleRequest;

    fn base() -> FormType {
        FormType::declare(
            None,
            Declaration::new("Profile")
                .field("name", FieldDecl::text().validator(UnicodeString::new()))
                .field("bio", FieldDecl::textarea())
                .field("ref", FieldDecl::hidden("home"))
                .fieldsets(vec![vec![
                    FieldsetItem::caption("About"),
                    FieldsetItem::fields(["name", "bio"]),
                ]]),
        )
        .unwrap()
    }

    #[test]
    fn test_fields_are_classified() {
        let form = base();
        assert!(form.fields().contains_key("name"));
        assert!(form.fields().contains_key("bio"));
        assert!(form.hidden_fields().contains_key("ref"));
        assert!(form.hidden_fields().contains_key(CSRF_TOKEN_KEY));
    }

    #[test]
    fn test_schema_only_has_validated_fields() {
        let form = base();
        let names: Vec<_> = form.schema().field_names().collect();
        assert_eq!(names, vec![CSRF_TOKEN_KEY, "name"]);
    }

    #[test]
    fn test_redeclare_moves_between_maps() {
        let sub = base()
            .subtype(Declaration::new("Sub").field("bio", FieldDecl::hidden("")))
            .unwrap();
        assert!(!sub.fields().contains_key("bio"));
        assert!(sub.hidden_fields().contains_key("bio"));
    }

    #[test]
    fn test_filter_unknown_name_fails() {
        let err = base()
            .subtype(Declaration::new("Bad").filter(["nope"]))
            .unwrap_err();
        assert!(matches!(err, WebformsError::UnknownField(_)));
    }

    #[test]
    fn test_filter_hidden_field() {
        let sub = base()
            .subtype(Declaration::new("NoRef").filter(["ref"]))
            .unwrap();
        assert!(!sub.hidden_fields().contains_key("ref"));
        assert!(sub.params().filter.is_empty());
    }

    #[test]
    fn test_get_form_drops_csrf() {
        let sub = base()
            .subtype(Declaration::new("Lookup").method(Method::GET))
            .unwrap();
        assert!(!sub.hidden_fields().contains_key(CSRF_TOKEN_KEY));
        assert!(!sub.schema().has_field(CSRF_TOKEN_KEY));
    }

    #[test]
    fn test_validate_reads_query_for_get() {
        let form = FormType::declare(
            None,
            Declaration::new("Search")
                .method(Method::GET)
                .field("q", FieldDecl::text().validator(UnicodeString::new().not_empty())),
        )
        .unwrap();
        let request = SimpleRequest::builder().query_string("q=rust").build();
        let cleaned = form.validate(&request, None).unwrap();
        assert_eq!(cleaned.get("q"), Some(&serde_json::Value::from("rust")));
    }

    #[test]
    fn test_validate_merges_params_for_other_methods() {
        let form = FormType::declare(
            None,
            Declaration::new("Update")
                .method(Method::PUT)
                .field("a", FieldDecl::text().validator(UnicodeString::new()))
                .field("b", FieldDecl::text().validator(UnicodeString::new())),
        )
        .unwrap();
        let request = SimpleRequest::builder()
            .method(Method::PUT)
            .query_string("a=1")
            .body("b=2")
            .build();
        let cleaned = form.validate(&request, None).unwrap();
        assert_eq!(cleaned.len(), 2);
    }

    #[test]
    fn test_chained_validators_inherited() {
        let parent = FormType::declare(
            None,
            Declaration::new("Pw")
                .method(Method::GET)
                .field("pw", FieldDecl::password().validator(UnicodeString::new()))
                .field("pw2", FieldDecl::password().validator(UnicodeString::new()))
                .chained_validator(FieldsMatch::new(["pw", "pw2"])),
        )
        .unwrap();
        let child = parent.subtype(Declaration::new("Pw2")).unwrap();
        assert_eq!(child.schema().chained_count(), 1);

        let request = SimpleRequest::builder().query_string("pw=a&pw2=b").build();
        let err = child.validate(&request, None).unwrap_err();
        assert!(err.field_errors.contains_key("pw2"));
        assert!(!err.field_errors.contains_key(NON_FIELD_ERRORS));
    }
}
