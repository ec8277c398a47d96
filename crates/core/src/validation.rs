//! Form validation schemas
//!
//! Each form validates every field and collects all failing rules, so the UI
//! can show several messages under one input. The same [`FieldErrors`] shape
//! is used for 422 responses from the backend.

use crate::forms::{CategoryForm, LoginForm, RegisterForm};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Field name to list of human readable messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(transparent)]
#[error("{}", join_messages(.0))]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Record several messages against a field; empty input adds nothing
    pub fn extend_field(&mut self, field: &str, messages: impl IntoIterator<Item = String>) {
        let mut messages = messages.into_iter().peekable();
        if messages.peek().is_some() {
            self.0.entry(field.to_string()).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Messages for a field, empty when the field is valid
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field).first().map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// `Ok(())` when no field failed
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// `field: message` pairs joined with `; `
fn join_messages(errors: &BTreeMap<String, Vec<String>>) -> String {
    errors
        .iter()
        .flat_map(|(field, messages)| messages.iter().map(move |m| format!("{field}: {m}")))
        .collect::<Vec<_>>()
        .join("; ")
}

/// A form that can be checked before it is submitted
pub trait Validate {
    /// Validate every field
    fn validate(&self) -> Result<(), FieldErrors>;

    /// Messages for a single field, for as-you-type feedback
    fn validate_field(&self, field: &str) -> Vec<String>;
}

pub mod messages {
    pub const INVALID_EMAIL: &str = "Invalid email address";
    pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters";
    pub const PASSWORD_LETTERS_AND_DIGITS: &str = "Password must contain letters and numbers";
    pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match";
    pub const FIRST_NAME_TOO_SHORT: &str = "First name must be at least 2 characters";
    pub const LAST_NAME_TOO_SHORT: &str = "Last name must be at least 2 characters";
    pub const LETTERS_ONLY: &str = "Only letters are allowed";
    pub const ADDRESS_TOO_SHORT: &str = "Address must be at least 5 characters";
    pub const INVALID_PHONE: &str = "Invalid phone number";
    pub const NAME_REQUIRED: &str = "Name is required";
    pub const NAME_TOO_LONG: &str = "At most 255 characters";
    pub const DESCRIPTION_TOO_LONG: &str = "At most 1000 characters";
}

/// Common validation helpers
pub mod validators {
    use once_cell::sync::Lazy;
    use regex::Regex;

    static EMAIL: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
            .expect("email pattern is valid")
    });

    static PERSON_NAME: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^[A-Za-zÁÉÍÓÚáéíóúñÑ\s]+$").expect("name pattern is valid"));

    static PHONE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^[0-9]{8,15}$").expect("phone pattern is valid"));

    /// Length in characters rather than bytes
    pub fn char_len(value: &str) -> usize {
        value.chars().count()
    }

    pub fn is_email(value: &str) -> bool {
        !value.starts_with('.') && !value.contains("..") && EMAIL.is_match(value)
    }

    /// Letters (including Spanish accented letters) and whitespace only
    pub fn is_person_name(value: &str) -> bool {
        PERSON_NAME.is_match(value)
    }

    /// Between 8 and 15 ASCII digits
    pub fn is_phone(value: &str) -> bool {
        PHONE.is_match(value)
    }

    pub fn has_letter_and_digit(value: &str) -> bool {
        value.chars().any(|c| c.is_ascii_alphabetic()) && value.chars().any(|c| c.is_ascii_digit())
    }
}

const MIN_PASSWORD: usize = 6;
const MIN_PERSON_NAME: usize = 2;
const MIN_ADDRESS: usize = 5;
const MAX_CATEGORY_NAME: usize = 255;
const MAX_CATEGORY_DESCRIPTION: usize = 1000;

fn check_email(value: &str) -> Vec<String> {
    if validators::is_email(value) {
        Vec::new()
    } else {
        vec![messages::INVALID_EMAIL.to_string()]
    }
}

fn check_person_name(value: &str, too_short: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if validators::char_len(value) < MIN_PERSON_NAME {
        errors.push(too_short.to_string());
    }
    if !validators::is_person_name(value) {
        errors.push(messages::LETTERS_ONLY.to_string());
    }
    errors
}

fn check_password_length(value: &str) -> Vec<String> {
    if validators::char_len(value) < MIN_PASSWORD {
        vec![messages::PASSWORD_TOO_SHORT.to_string()]
    } else {
        Vec::new()
    }
}

fn collect<V: Validate>(form: &V, fields: &[&str]) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    for field in fields {
        errors.extend_field(field, form.validate_field(field));
    }
    errors.into_result()
}

impl Validate for LoginForm {
    fn validate(&self) -> Result<(), FieldErrors> {
        collect(self, &["email", "password"])
    }

    fn validate_field(&self, field: &str) -> Vec<String> {
        match field {
            "email" => check_email(&self.email),
            "password" => check_password_length(&self.password),
            _ => Vec::new(),
        }
    }
}

impl Validate for RegisterForm {
    fn validate(&self) -> Result<(), FieldErrors> {
        collect(self, &Self::FIELDS)
    }

    fn validate_field(&self, field: &str) -> Vec<String> {
        match field {
            "first_name" => check_person_name(&self.first_name, messages::FIRST_NAME_TOO_SHORT),
            "last_name" => check_person_name(&self.last_name, messages::LAST_NAME_TOO_SHORT),
            "email" => check_email(&self.email),
            "address" => {
                if validators::char_len(&self.address) < MIN_ADDRESS {
                    vec![messages::ADDRESS_TOO_SHORT.to_string()]
                } else {
                    Vec::new()
                }
            }
            "phone" => {
                if validators::is_phone(&self.phone) {
                    Vec::new()
                } else {
                    vec![messages::INVALID_PHONE.to_string()]
                }
            }
            "password" => {
                let mut errors = check_password_length(&self.password);
                if !validators::has_letter_and_digit(&self.password) {
                    errors.push(messages::PASSWORD_LETTERS_AND_DIGITS.to_string());
                }
                errors
            }
            "password_confirmation" => {
                if self.password == self.password_confirmation {
                    Vec::new()
                } else {
                    vec![messages::PASSWORDS_DO_NOT_MATCH.to_string()]
                }
            }
            _ => Vec::new(),
        }
    }
}

impl Validate for CategoryForm {
    fn validate(&self) -> Result<(), FieldErrors> {
        collect(self, &["name", "description"])
    }

    fn validate_field(&self, field: &str) -> Vec<String> {
        match field {
            "name" => {
                let len = validators::char_len(&self.name);
                if len == 0 {
                    vec![messages::NAME_REQUIRED.to_string()]
                } else if len > MAX_CATEGORY_NAME {
                    vec![messages::NAME_TOO_LONG.to_string()]
                } else {
                    Vec::new()
                }
            }
            "description" => match &self.description {
                Some(description)
                    if validators::char_len(description) > MAX_CATEGORY_DESCRIPTION =>
                {
                    vec![messages::DESCRIPTION_TOO_LONG.to_string()]
                }
                _ => Vec::new(),
            },
            _ => Vec::new(),
        }
    }
}
