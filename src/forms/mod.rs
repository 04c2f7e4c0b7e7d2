use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub const MSG_REQUIRED: &str = "Este campo es obligatorio";
pub const MSG_EMAIL: &str = "Formato de email inválido";
pub const MSG_PHONE: &str = "Formato de teléfono inválido";
pub const MSG_CONFIRM_DELETE: &str = "¿Estás seguro de que quieres eliminar este elemento?";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9\s\-+()]+$").expect("phone regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Text,
    Email,
    Tel,
    Select,
    Textarea,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldInput {
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub value: String,
    /// The field's `maxlength`, when it shows a character counter.
    #[serde(default)]
    pub max_length: Option<usize>,
}

impl FieldInput {
    pub fn counter(&self) -> Option<CharacterCounter> {
        self.max_length.map(|max| character_counter(&self.value, max))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "message", rename_all = "lowercase")]
pub enum ValidationOutcome {
    Valid,
    Invalid(String),
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }

    /// Style class the field gets after a check.
    pub fn css_class(&self) -> &'static str {
        match self {
            ValidationOutcome::Valid => "is-valid",
            ValidationOutcome::Invalid(_) => "is-invalid",
        }
    }

    /// Text for the `.invalid-feedback` element, if one should be shown.
    pub fn feedback(&self) -> Option<&str> {
        match self {
            ValidationOutcome::Valid => None,
            ValidationOutcome::Invalid(msg) => Some(msg),
        }
    }
}

/// Check a field the way the form does on blur.
///
/// Rules run in order and each failing rule overwrites the message, so the
/// last failure wins.
pub fn validate_field(field: &FieldInput) -> ValidationOutcome {
    let value = field.value.trim();
    let mut error: Option<&'static str> = None;

    if field.required && value.is_empty() {
        error = Some(MSG_REQUIRED);
    }

    if field.kind == FieldKind::Email && !value.is_empty() && !EMAIL_RE.is_match(value) {
        error = Some(MSG_EMAIL);
    }

    if field.kind == FieldKind::Tel && !value.is_empty() && !PHONE_RE.is_match(value) {
        error = Some(MSG_PHONE);
    }

    match error {
        None => ValidationOutcome::Valid,
        Some(msg) => ValidationOutcome::Invalid(msg.to_string()),
    }
}

/// Live "n/max" counter under a textarea with a `maxlength`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterCounter {
    pub text: String,
    pub warning: bool,
}

pub fn character_counter(value: &str, max_length: usize) -> CharacterCounter {
    let current = value.chars().count();
    CharacterCounter {
        text: format!("{}/{}", current, max_length),
        // Warn past 90% of the limit
        warning: current * 10 > max_length * 9,
    }
}

/// A destructive action only goes through once the user confirms the prompt.
pub fn confirm_delete(confirm: impl FnOnce(&str) -> bool) -> bool {
    confirm(MSG_CONFIRM_DELETE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(kind: FieldKind, required: bool, value: &str) -> FieldInput {
        FieldInput {
            kind,
            required,
            value: value.to_string(),
            max_length: None,
        }
    }

    #[test]
    fn test_required() {
        let outcome = validate_field(&field(FieldKind::Text, true, "   "));
        assert_eq!(outcome, ValidationOutcome::Invalid(MSG_REQUIRED.to_string()));
        assert_eq!(outcome.css_class(), "is-invalid");

        assert!(validate_field(&field(FieldKind::Text, false, "")).is_valid());
        assert!(validate_field(&field(FieldKind::Select, true, "3")).is_valid());
    }

    #[test]
    fn test_email_shape() {
        assert!(validate_field(&field(FieldKind::Email, true, "ana@colegio.edu")).is_valid());
        for bad in ["ana", "ana@colegio", "ana @colegio.edu", "a@b@c.d"] {
            let outcome = validate_field(&field(FieldKind::Email, true, bad));
            assert_eq!(outcome.feedback(), Some(MSG_EMAIL), "{bad}");
        }
        // Empty optional email is fine
        assert!(validate_field(&field(FieldKind::Email, false, "")).is_valid());
    }

    #[test]
    fn test_phone_shape() {
        assert!(validate_field(&field(FieldKind::Tel, false, "+54 (11) 4444-5555")).is_valid());
        let outcome = validate_field(&field(FieldKind::Tel, false, "11-44x"));
        assert_eq!(outcome.feedback(), Some(MSG_PHONE));
    }

    #[test]
    fn test_required_message_for_empty_typed_field() {
        let outcome = validate_field(&field(FieldKind::Email, true, ""));
        assert_eq!(outcome.feedback(), Some(MSG_REQUIRED));
    }

    #[test]
    fn test_character_counter() {
        assert_eq!(
            character_counter("hola", 100),
            CharacterCounter {
                text: "4/100".to_string(),
                warning: false
            }
        );
        assert!(!character_counter(&"x".repeat(90), 100).warning);
        assert!(character_counter(&"x".repeat(91), 100).warning);
        assert_eq!(character_counter("ñandú", 10).text, "5/10");
    }

    #[test]
    fn test_counter_only_with_max_length() {
        let mut input = field(FieldKind::Textarea, false, &"x".repeat(95));
        assert_eq!(input.counter(), None);

        input.max_length = Some(100);
        let counter = input.counter().unwrap();
        assert_eq!(counter.text, "95/100");
        assert!(counter.warning);
    }

    #[test]
    fn test_confirm_delete() {
        let mut prompt = String::new();
        assert!(!confirm_delete(|msg| {
            prompt = msg.to_string();
            false
        }));
        assert_eq!(prompt, MSG_CONFIRM_DELETE);
        assert!(confirm_delete(|_| true));
    }
}
