//! Decoding and validation of contact-form submissions.
//!
//! Two failure kinds are kept apart: a body that is not a JSON object of
//! strings is a [`SubmissionError::Decode`]; a well-formed body with missing
//! or bad fields is a [`SubmissionError::Invalid`] listing every failing
//! field.

use serde::{Deserialize, Serialize};

/// Source recorded when the submitter does not provide one.
pub const DEFAULT_SOURCE: &str = "website";

const MAX_EMAIL_LEN: usize = 254;
const MAX_LOCAL_PART_LEN: usize = 64;
const MAX_DOMAIN_LEN: usize = 255;
const MAX_LABEL_LEN: usize = 63;

/// Raw request body.  Every field is optional here so that a missing key is
/// reported as a field error rather than a decode failure.
#[derive(Debug, Deserialize)]
pub struct ContactPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

/// A validated submission, ready to be stored and announced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
    pub source: String,
}

/// One failing field and why it failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: &'static str,
}

#[derive(Debug)]
pub enum SubmissionError {
    /// The body is not JSON, not an object, or has values of the wrong type.
    Decode(String),
    /// One entry per failing field, in declaration order.
    Invalid(Vec<FieldError>),
}

impl std::fmt::Display for SubmissionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionError::Decode(e) => write!(f, "invalid request body: {e}"),
            SubmissionError::Invalid(errors) => {
                write!(f, "invalid fields:")?;
                for e in errors {
                    write!(f, " {} ({})", e.field, e.reason)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for SubmissionError {}

impl From<serde_json::Error> for SubmissionError {
    fn from(e: serde_json::Error) -> Self {
        SubmissionError::Decode(e.to_string())
    }
}

/// Decode and validate a raw request body.
pub fn parse_submission(body: &[u8]) -> Result<ContactSubmission, SubmissionError> {
    let value: serde_json::Value = serde_json::from_slice(body)?;
    if !value.is_object() {
        return Err(SubmissionError::Decode("expected a JSON object".to_string()));
    }
    let payload: ContactPayload = serde_json::from_value(value)?;
    payload.validate().map_err(SubmissionError::Invalid)
}

impl ContactPayload {
    /// Check every field, collecting all failures before returning.
    pub fn validate(self) -> Result<ContactSubmission, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = required_text("name", self.name, &mut errors);
        let email = required_text("email", self.email, &mut errors);
        if let Some(addr) = &email {
            if !is_valid_email(addr) {
                errors.push(FieldError {
                    field: "email",
                    reason: "value is not a valid email address",
                });
            }
        }
        let message = required_text("message", self.message, &mut errors);

        let source = self
            .source
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SOURCE.to_string());

        match (name, email, message) {
            (Some(name), Some(email), Some(message)) if errors.is_empty() => {
                Ok(ContactSubmission {
                    name,
                    email,
                    message,
                    source,
                })
            }
            _ => Err(errors),
        }
    }
}

fn required_text(
    field: &'static str,
    value: Option<String>,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match value.map(|v| v.trim().to_string()) {
        None => {
            errors.push(FieldError {
                field,
                reason: "field required",
            });
            None
        }
        Some(v) if v.is_empty() => {
            errors.push(FieldError {
                field,
                reason: "must not be empty",
            });
            None
        }
        Some(v) => Some(v),
    }
}

/// Syntactic email check: `local@domain` with a dotted domain.
///
/// Internationalised addresses are accepted: the local part may contain any
/// non-ASCII character and domain labels may use Unicode letters and digits.
/// Length limits count characters, not bytes.
pub fn is_valid_email(addr: &str) -> bool {
    if addr.chars().count() > MAX_EMAIL_LEN {
        return false;
    }
    let Some((local, domain)) = addr.split_once('@') else {
        return false;
    };
    is_valid_local_part(local) && is_valid_domain(domain)
}

fn is_valid_local_part(local: &str) -> bool {
    const FORBIDDEN: &[char] = &['(', ')', '<', '>', '[', ']', '\\', ',', ';', ':', '"', '@'];

    !local.is_empty()
        && local.chars().count() <= MAX_LOCAL_PART_LEN
        && !local.starts_with('.')
        && !local.ends_with('.')
        && !local.contains("..")
        && local
            .chars()
            .all(|c| (c.is_ascii_graphic() && !FORBIDDEN.contains(&c)) || is_intl_char(c))
}

fn is_valid_domain(domain: &str) -> bool {
    if domain.is_empty() || domain.chars().count() > MAX_DOMAIN_LEN {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && label.chars().count() <= MAX_LABEL_LEN
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_alphanumeric() || c == '-' || is_combining_mark(c))
        })
}

/// Non-ASCII, printable, and not whitespace.
fn is_intl_char(c: char) -> bool {
    !c.is_ascii() && !c.is_whitespace() && !c.is_control()
}

/// Combining diacritics, used by IDN labels written in decomposed form
/// and by scripts such as Devanagari and Thai.
fn is_combining_mark(c: char) -> bool {
    matches!(c,
        '\u{0300}'..='\u{036F}'
        | '\u{0900}'..='\u{0903}'
        | '\u{093A}'..='\u{094F}'
        | '\u{0E31}'
        | '\u{0E34}'..='\u{0E3A}'
        | '\u{0E47}'..='\u{0E4E}'
        | '\u{200C}'..='\u{200D}')
}
