//! Form validation performed before anything is sent to the backend.
//!
//! Forms derive [`validator::Validate`]; [`check`] turns the nested
//! report into a flat, ordered [`ValidationErrors`] keyed by wire field
//! names such as `retryConfig.maxRetries`.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use validator::{Validate, ValidationErrorsKind};

/// Minimum accepted password length on the login form.
pub const MIN_PASSWORD_LEN: u64 = 8;

/// Dot-separated local part, at least one dot in the domain and a
/// two-letter TLD. Stricter than the HTML5 rule used by `validator`.
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9_'+\-]+(\.[A-Za-z0-9_'+\-]+)*@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$",
    )
    .expect("email pattern is valid")
});

/// One rejected form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All problems found in a form, ordered by field, one message per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", join(.0))]
pub struct ValidationErrors(Vec<FieldError>);

fn join(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    /// A report for a single field.
    #[must_use]
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self(vec![FieldError {
            field: field.into(),
            message: message.into(),
        }])
    }

    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Returns the message recorded for `field`.
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl From<validator::ValidationErrors> for ValidationErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = BTreeMap::new();
        flatten("", &errors, &mut fields);
        Self(
            fields
                .into_iter()
                .map(|(field, message)| FieldError { field, message })
                .collect(),
        )
    }
}

/// Collects the first message of every field, nested structs as `parent.child`.
fn flatten(prefix: &str, errors: &validator::ValidationErrors, out: &mut BTreeMap<String, String>) {
    for (field, kind) in errors.errors() {
        let path = format!("{prefix}{}", camel_case(&field.to_string()));
        match kind {
            ValidationErrorsKind::Field(list) => {
                if let Some(first) = list.first() {
                    let message = first
                        .message
                        .as_ref()
                        .map_or_else(|| first.code.to_string(), ToString::to_string);
                    out.entry(path).or_insert(message);
                }
            }
            ValidationErrorsKind::Struct(inner) => flatten(&format!("{path}."), inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten(&format!("{path}[{index}]."), inner, out);
                }
            }
        }
    }
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Validates `form`, reporting problems by wire field name.
///
/// # Errors
///
/// Returns every field problem found; at most one per field.
pub fn check<T: Validate>(form: &T) -> Result<(), ValidationErrors> {
    form.validate().map_err(ValidationErrors::from)
}

/// Builds a field error with a fixed message for `custom` rules.
#[must_use]
pub fn rule(code: &'static str, message: &'static str) -> validator::ValidationError {
    let mut error = validator::ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Checks that `id` can be placed in a URL path as a single segment.
///
/// # Errors
///
/// Returns an error for `field` if `id` is blank, is a dot segment or
/// contains a path, query or fragment delimiter.
pub fn validate_path_id(field: &'static str, id: &str) -> Result<(), ValidationErrors> {
    if id.trim().is_empty() {
        return Err(ValidationErrors::single(field, "Id is required"));
    }
    if matches!(id, "." | "..") || id.contains(['/', '\\', '?', '#']) {
        return Err(ValidationErrors::single(
            field,
            "Id must be a single path segment",
        ));
    }
    Ok(())
}

/// Credentials entered on the login form.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct LoginForm {
    #[validate(
        email(message = "Please enter a valid email address"),
        regex(path = *EMAIL, message = "Please enter a valid email address")
    )]
    pub email: String,
    #[validate(custom(function = "password_rule"))]
    pub password: String,
}

/// Required first, then the minimum length, counted in characters.
fn password_rule(password: &str) -> Result<(), validator::ValidationError> {
    if password.is_empty() {
        return Err(rule("required", "Password is required"));
    }
    if (password.chars().count() as u64) < MIN_PASSWORD_LEN {
        return Err(rule("length", "Password must be at least 8 characters"));
    }
    Ok(())
}

impl LoginForm {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}
