//! Required-field validation for the feedback and loyalty forms

use axum::{
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
    Form, Json,
};
use discounts_common::{Feedback, LoyalUser};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Fields a form must carry, in the order they are checked
#[derive(Debug, Clone, Copy)]
pub struct RequiredFields {
    pub fields: &'static [&'static str],
    /// Client-facing message naming every required field
    pub message: &'static str,
}

pub const FEEDBACK_FIELDS: RequiredFields = RequiredFields {
    fields: &["name", "email", "message"],
    message: "Missing parameter name, email, or message.",
};

pub const LOYAL_USER_FIELDS: RequiredFields = RequiredFields {
    fields: &["name", "email", "phone"],
    message: "Missing parameter name, email, or phone number.",
};

/// A form was submitted without some of its required fields
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} (missing: {})", .missing.join(", "))]
pub struct MissingFields {
    pub message: &'static str,
    pub missing: Vec<&'static str>,
}

/// Decoded form body, whatever encoding the client used
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields(pub HashMap<String, String>);

impl FormFields {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

impl<const N: usize> From<[(&str, &str); N]> for FormFields {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

/// Values of `required.fields`, in order, if every one is a non-empty string
pub fn validate(
    form: &FormFields,
    required: &RequiredFields,
) -> Result<Vec<String>, MissingFields> {
    let mut values = Vec::with_capacity(required.fields.len());
    let mut missing = Vec::new();

    for &field in required.fields {
        match form.get(field) {
            Some(value) if !value.is_empty() => values.push(value.to_string()),
            _ => missing.push(field),
        }
    }

    if missing.is_empty() {
        Ok(values)
    } else {
        Err(MissingFields {
            message: required.message,
            missing,
        })
    }
}

/// A record built from a validated form and stored in a ledger
pub trait Submission: Serialize + DeserializeOwned + Send + Sync + Sized + 'static {
    const REQUIRED: RequiredFields;

    fn from_values(values: Vec<String>) -> Self;

    fn from_form(form: &FormFields) -> Result<Self, MissingFields> {
        validate(form, &Self::REQUIRED).map(Self::from_values)
    }
}

impl Submission for Feedback {
    const REQUIRED: RequiredFields = FEEDBACK_FIELDS;

    fn from_values(values: Vec<String>) -> Self {
        let mut values = values.into_iter();
        Feedback {
            name: values.next().unwrap_or_default(),
            email: values.next().unwrap_or_default(),
            message: values.next().unwrap_or_default(),
        }
    }
}

impl Submission for LoyalUser {
    const REQUIRED: RequiredFields = LOYAL_USER_FIELDS;

    fn from_values(values: Vec<String>) -> Self {
        let mut values = values.into_iter();
        LoyalUser {
            name: values.next().unwrap_or_default(),
            email: values.next().unwrap_or_default(),
            phone: values.next().unwrap_or_default(),
        }
    }
}

impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_ascii_lowercase);

        let Some(content_type) = content_type else {
            // Nothing to decode; validation reports the missing fields
            return Ok(FormFields::default());
        };

        if content_type.starts_with("multipart/form-data") {
            let mut multipart = Multipart::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            let mut fields = HashMap::new();

            while let Some(field) = multipart
                .next_field()
                .await
                .map_err(IntoResponse::into_response)?
            {
                // File uploads are not part of any form
                if field.file_name().is_some() {
                    continue;
                }
                let Some(name) = field.name().map(str::to_string) else {
                    continue;
                };
                let value = field.text().await.map_err(IntoResponse::into_response)?;
                fields.entry(name).or_insert(value);
            }

            Ok(FormFields(fields))
        } else if content_type.starts_with("application/json") {
            let Json(object) = Json::<HashMap<String, Value>>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;

            let fields = object
                .into_iter()
                .filter_map(|(name, value)| json_field_text(value).map(|text| (name, text)))
                .collect();

            Ok(FormFields(fields))
        } else {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;

            Ok(FormFields(fields))
        }
    }
}

/// Text of a JSON body field, or `None` when it does not count as filled in:
/// `null`, `false`, zero, arrays and objects. Empty strings are kept and
/// rejected later by [`validate`].
fn json_field_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_feedback_form() {
        let form = FormFields::from([
            ("name", "Ada"),
            ("email", "ada@example.com"),
            ("message", "Great deals"),
            ("extra", "ignored"),
        ]);

        let feedback = Feedback::from_form(&form).unwrap();
        assert_eq!(
            feedback,
            Feedback {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                message: "Great deals".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_and_empty_fields_are_reported_in_order() {
        let form = FormFields::from([("name", ""), ("email", "ada@example.com")]);

        let err = Feedback::from_form(&form).unwrap_err();
        assert_eq!(err.missing, vec!["name", "message"]);
        assert_eq!(err.message, "Missing parameter name, email, or message.");
        assert_eq!(
            err.to_string(),
            "Missing parameter name, email, or message. (missing: name, message)"
        );
    }

    #[test]
    fn test_loyal_user_requires_phone() {
        let form = FormFields::from([("name", "Grace"), ("email", "grace@example.com")]);

        let err = LoyalUser::from_form(&form).unwrap_err();
        assert_eq!(err.missing, vec!["phone"]);

        let form = FormFields::from([
            ("name", "Grace"),
            ("email", "grace@example.com"),
            ("phone", "626-555-0100"),
        ]);
        assert_eq!(LoyalUser::from_form(&form).unwrap().phone, "626-555-0100");
    }

    #[test]
    fn test_whitespace_counts_as_present() {
        let form = FormFields::from([("name", " "), ("email", "e"), ("phone", "p")]);
        assert!(LoyalUser::from_form(&form).is_ok());
    }

    #[test]
    fn test_json_field_text() {
        use serde_json::json;

        assert_eq!(json_field_text(json!("Ada")), Some("Ada".to_string()));
        assert_eq!(json_field_text(json!("")), Some(String::new()));
        assert_eq!(json_field_text(json!(6265550100u64)), Some("6265550100".to_string()));
        assert_eq!(json_field_text(json!(true)), Some("true".to_string()));

        assert_eq!(json_field_text(json!(false)), None);
        assert_eq!(json_field_text(json!(0)), None);
        assert_eq!(json_field_text(json!(0.0)), None);
        assert_eq!(json_field_text(Value::Null), None);
        assert_eq!(json_field_text(json!(["a"])), None);
        assert_eq!(json_field_text(json!({"a": 1})), None);
    }
}
