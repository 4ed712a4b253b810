//! Form validation for permission and role payloads.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::models::{PermissionInput, RoleInput};

/// Field-keyed validation failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[error("Validation failed: {}", self.summary())]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &BTreeMap<String, Vec<String>> {
        &self.fields
    }

    pub fn summary(&self) -> String {
        self.fields
            .iter()
            .flat_map(|(_, messages)| messages.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Record a `required` failure when `value` is blank.
pub fn required(errors: &mut ValidationErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, format!("The {field} field is required."));
    }
}

pub fn validate_permission(input: &PermissionInput) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    required(&mut errors, "slug", &input.slug);
    required(&mut errors, "name", &input.name);
    errors.into_result()
}

pub fn validate_role(input: &RoleInput) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    required(&mut errors, "slug", &input.slug);
    required(&mut errors, "name", &input.name);
    errors.into_result()
}
