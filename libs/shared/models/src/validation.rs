use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email) && email.len() <= 254
}

/// One violated field in a create request, reported back to the client as
/// `{"property": ..., "constraints": [...]}`.
#[derive(Debug, Clone, Serialize)]
pub struct FieldViolation {
    pub property: String,
    pub constraints: Vec<String>,
}

/// Collects per-field constraint violations while a request is checked.
#[derive(Debug, Default)]
pub struct Violations {
    fields: Vec<FieldViolation>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, property: &str, constraint: impl Into<String>) {
        let constraint = constraint.into();
        if let Some(existing) = self.fields.iter_mut().find(|f| f.property == property) {
            existing.constraints.push(constraint);
        } else {
            self.fields.push(FieldViolation {
                property: property.to_string(),
                constraints: vec![constraint],
            });
        }
    }

    /// Required string field, non-empty and bounded in length.
    pub fn require_text(&mut self, property: &str, value: Option<&str>, max_len: usize) {
        match value {
            None => self.add(property, format!("{} is required", property)),
            Some(v) if v.is_empty() || v.len() > max_len => self.add(
                property,
                format!("{} must be between 1 and {} characters", property, max_len),
            ),
            Some(_) => {}
        }
    }

    /// Required email field, syntactically checked.
    pub fn require_email(&mut self, property: &str, value: Option<&str>) {
        match value {
            None => self.add(property, format!("{} is required", property)),
            Some(v) if !is_valid_email(v) => {
                self.add(property, format!("{} must be a valid email address", property))
            }
            Some(_) => {}
        }
    }

    pub fn require(&mut self, property: &str, present: bool) {
        if !present {
            self.add(property, format!("{} is required", property));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_fields(self) -> Vec<FieldViolation> {
        self.fields
    }
}
