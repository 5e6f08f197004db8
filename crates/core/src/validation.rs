//! Field validation for the profile, organization, contact and demo booking forms.
//!
//! Rules mirror native constraint validation: blank optional fields pass,
//! blank required fields fail, and a declared pattern must match the whole
//! value.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{FieldKind, FormField, FormSection};

static PERSON_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}][\p{L} .'\-]{1,49}$").expect("static regex"));
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").expect("static regex")
});
static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{10,15}$").expect("static regex"));
static POSTAL_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9][0-9]{5}$").expect("static regex"));

const MIN_ADDRESS_LEN: usize = 5;

//
// ─── RULES ─────────────────────────────────────────────────────────────────────
//

/// Built-in value shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    PersonName,
    Email,
    Phone,
    PostalCode,
    Address,
}

impl Rule {
    #[must_use]
    pub fn accepts(self, value: &str) -> bool {
        let value = value.trim();
        match self {
            Self::PersonName => PERSON_NAME.is_match(value),
            Self::Email => EMAIL.is_match(value),
            Self::Phone => PHONE.is_match(&strip_phone_separators(value)),
            Self::PostalCode => POSTAL_CODE.is_match(value),
            Self::Address => value.chars().filter(|ch| !ch.is_whitespace()).count() >= MIN_ADDRESS_LEN,
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::PersonName => "Please enter a valid name (letters and spaces only).",
            Self::Email => "Please enter a valid email address.",
            Self::Phone => "Please enter a valid phone number (10 to 15 digits).",
            Self::PostalCode => "Please enter a valid 6-digit postal code.",
            Self::Address => "Please enter a complete address.",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PersonName => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::PostalCode => "postal code",
            Self::Address => "address",
        };
        f.write_str(name)
    }
}

fn strip_phone_separators(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !matches!(ch, ' ' | '-' | '(' | ')'))
        .collect()
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FieldIssue {
    #[error("this field is required")]
    Missing,

    #[error("invalid {0}")]
    Malformed(Rule),

    #[error("value does not match the requested format")]
    PatternMismatch,

    #[error("please choose one of the listed options")]
    UnknownOption,
}

impl FieldIssue {
    /// Inline message shown under the field.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Malformed(rule) => rule.message().to_owned(),
            other => {
                let text = other.to_string();
                let mut chars = text.chars();
                chars
                    .next()
                    .map(|first| first.to_uppercase().chain(chars).collect())
                    .unwrap_or_default()
            }
        }
    }
}

/// Check `value` against a rule, honouring `required`.
///
/// # Errors
///
/// Returns the `FieldIssue` that blocks submission.
pub fn check(rule: Rule, required: bool, value: &str) -> Result<(), FieldIssue> {
    if value.trim().is_empty() {
        return if required { Err(FieldIssue::Missing) } else { Ok(()) };
    }
    if rule.accepts(value) {
        Ok(())
    } else {
        Err(FieldIssue::Malformed(rule))
    }
}

impl FormField {
    /// Validate a value entered for this field.
    ///
    /// A declared `pattern` replaces the built-in rule for the field kind. An
    /// unparseable pattern is ignored.
    ///
    /// # Errors
    ///
    /// Returns the `FieldIssue` that blocks advancing past the form.
    pub fn validate(&self, value: Option<&str>) -> Result<(), FieldIssue> {
        let value = value.unwrap_or_default();
        if value.trim().is_empty() {
            return if self.required { Err(FieldIssue::Missing) } else { Ok(()) };
        }

        if let Some(pattern) = self.pattern.as_deref() {
            if let Ok(regex) = Regex::new(&format!("^(?:{pattern})$")) {
                return if regex.is_match(value) {
                    Ok(())
                } else {
                    Err(FieldIssue::PatternMismatch)
                };
            }
        }

        match self.kind {
            FieldKind::Email => check(Rule::Email, self.required, value),
            FieldKind::Tel => check(Rule::Phone, self.required, value),
            FieldKind::Number => value
                .trim()
                .parse::<f64>()
                .map(|_| ())
                .map_err(|_| FieldIssue::PatternMismatch),
            kind if kind.is_choice() && !self.options.is_empty() => {
                if self.options.iter().any(|option| option.value == value) {
                    Ok(())
                } else {
                    Err(FieldIssue::UnknownOption)
                }
            }
            _ => Ok(()),
        }
    }
}

impl FormSection {
    /// Every field whose current value fails validation, in declaration order.
    #[must_use]
    pub fn invalid_fields<F>(&self, lookup: F) -> Vec<(String, FieldIssue)>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.fields
            .iter()
            .filter_map(|field| {
                let value = lookup(&field.id);
                field
                    .validate(value.as_deref())
                    .err()
                    .map(|issue| (field.id.clone(), issue))
            })
            .collect()
    }
}

//
// ─── FEEDBACK ──────────────────────────────────────────────────────────────────
//

/// What the view should show for a field after a validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackUpdate {
    pub valid: bool,
    /// Play the attention animation. Fires once per valid→invalid transition.
    pub shake: bool,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
struct FieldState {
    shaken: bool,
}

/// Per-field validity with a one-shot shake signal.
#[derive(Debug, Clone, Default)]
pub struct FieldFeedback {
    fields: HashMap<String, FieldState>,
}

impl FieldFeedback {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, field_id: &str, result: &Result<(), FieldIssue>) -> FeedbackUpdate {
        let state = self.fields.entry(field_id.to_owned()).or_default();
        match result {
            Ok(()) => {
                state.shaken = false;
                FeedbackUpdate {
                    valid: true,
                    shake: false,
                    message: None,
                }
            }
            Err(issue) => {
                let shake = !state.shaken;
                state.shaken = true;
                FeedbackUpdate {
                    valid: false,
                    shake,
                    message: Some(issue.message()),
                }
            }
        }
    }
}

//
// ─── FORMS ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FormError {
    #[error("{} field(s) need attention", .0.len())]
    Invalid(Vec<(&'static str, FieldIssue)>),
}

fn collect(checks: Vec<(&'static str, Result<(), FieldIssue>)>) -> Result<(), FormError> {
    let invalid: Vec<_> = checks
        .into_iter()
        .filter_map(|(field, result)| result.err().map(|issue| (field, issue)))
        .collect();
    if invalid.is_empty() {
        Ok(())
    } else {
        Err(FormError::Invalid(invalid))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl ContactForm {
    /// # Errors
    ///
    /// Returns `FormError::Invalid` listing every field that blocks submission.
    pub fn validate(&self) -> Result<(), FormError> {
        collect(vec![
            ("name", check(Rule::PersonName, true, &self.name)),
            ("email", check(Rule::Email, true, &self.email)),
            ("phone", check(Rule::Phone, false, &self.phone)),
            (
                "message",
                if self.message.trim().is_empty() {
                    Err(FieldIssue::Missing)
                } else {
                    Ok(())
                },
            ),
        ])
    }
}

/// District, state and country resolved from a postal code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalDetails {
    pub district: String,
    pub state: String,
    pub country: String,
}

/// Address block shared by the demo booking form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressFields {
    pub address: String,
    pub postal_code: String,
    pub district: String,
    pub state: String,
    pub country: String,
    pub postal_code_valid: bool,
}

impl AddressFields {
    /// Fold the lookup outcome for `code` into the dependent fields.
    ///
    /// Success fills district/state/country and marks the postal code valid;
    /// any failure clears them and marks it invalid. An outcome for a code
    /// that no longer matches `postal_code` is dropped and `false` returned.
    pub fn apply_lookup<E>(&mut self, code: &str, result: Result<PostalDetails, E>) -> bool {
        if self.postal_code.trim() != code {
            return false;
        }
        match result {
            Ok(details) => {
                self.district = details.district;
                self.state = details.state;
                self.country = details.country;
                self.postal_code_valid = true;
            }
            Err(_) => {
                self.district.clear();
                self.state.clear();
                self.country.clear();
                self.postal_code_valid = false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoBookingForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub address: AddressFields,
}

impl DemoBookingForm {
    /// # Errors
    ///
    /// Returns `FormError::Invalid` listing every field that blocks submission.
    pub fn validate(&self) -> Result<(), FormError> {
        let postal = check(Rule::PostalCode, true, &self.address.postal_code).and_then(|()| {
            if self.address.postal_code_valid {
                Ok(())
            } else {
                Err(FieldIssue::Malformed(Rule::PostalCode))
            }
        });
        collect(vec![
            ("name", check(Rule::PersonName, true, &self.name)),
            ("email", check(Rule::Email, true, &self.email)),
            ("phone", check(Rule::Phone, true, &self.phone)),
            (
                "company",
                if self.company.trim().is_empty() {
                    Err(FieldIssue::Missing)
                } else {
                    Ok(())
                },
            ),
            ("address", check(Rule::Address, true, &self.address.address)),
            ("postal_code", postal),
        ])
    }
}
