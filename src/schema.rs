// src/schema.rs

//! Attribute descriptors for resources and data sources.
//!
//! Descriptors carry no validation logic. The host uses them to tell
//! in-place updates from replacements and to keep sensitive values out of
//! anything it prints.

use serde::Serialize;
use serde_json::Value;

/// Placeholder written over sensitive values on output.
pub const REDACTED: &str = "(sensitive value)";

/// Who provides an attribute's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    /// Must be set in the desired state
    Required,
    /// May be set in the desired state
    Optional,
    /// Set by the provider only
    Computed,
    /// May be set, otherwise filled in by the provider
    OptionalComputed,
}

/// Description of a single attribute.
#[derive(Debug, Clone, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    pub presence: Presence,
    pub description: &'static str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub sensitive: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub requires_replace: bool,
}

impl Attribute {
    fn new(name: &'static str, presence: Presence, description: &'static str) -> Self {
        Self {
            name,
            presence,
            description,
            sensitive: false,
            requires_replace: false,
        }
    }

    pub fn required(name: &'static str, description: &'static str) -> Self {
        Self::new(name, Presence::Required, description)
    }

    pub fn optional(name: &'static str, description: &'static str) -> Self {
        Self::new(name, Presence::Optional, description)
    }

    pub fn computed(name: &'static str, description: &'static str) -> Self {
        Self::new(name, Presence::Computed, description)
    }

    pub fn optional_computed(name: &'static str, description: &'static str) -> Self {
        Self::new(name, Presence::OptionalComputed, description)
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// A change to this attribute destroys and recreates the resource.
    pub fn requires_replace(mut self) -> Self {
        self.requires_replace = true;
        self
    }
}

/// Attribute layout of one resource or data source type.
#[derive(Debug, Clone, Serialize)]
pub struct Schema {
    pub description: &'static str,
    pub attributes: Vec<Attribute>,
}

impl Schema {
    pub fn new(description: &'static str) -> Self {
        Self {
            description,
            attributes: Vec::new(),
        }
    }

    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Overwrite every non-null sensitive attribute of a JSON state object.
    pub fn redact(&self, state: &mut Value) {
        let Some(object) = state.as_object_mut() else {
            return;
        };
        for attribute in self.attributes.iter().filter(|a| a.sensitive) {
            if let Some(value) = object.get_mut(attribute.name) {
                if !value.is_null() {
                    *value = Value::String(REDACTED.to_string());
                }
            }
        }
    }

    /// Whether any user-settable attribute of `plan` differs from `prior`.
    ///
    /// Optional-computed attributes only count when the plan sets them.
    pub fn has_changes(&self, prior: &Value, plan: &Value) -> bool {
        self.attributes
            .iter()
            .filter(|a| a.presence != Presence::Computed)
            .any(|a| {
                let after = plan.get(a.name).unwrap_or(&Value::Null);
                if a.presence == Presence::OptionalComputed && after.is_null() {
                    return false;
                }
                prior.get(a.name).unwrap_or(&Value::Null) != after
            })
    }

    /// Replace-marked attributes whose planned value differs from the prior state.
    pub fn replacement_attributes(&self, prior: &Value, plan: &Value) -> Vec<&'static str> {
        self.attributes
            .iter()
            .filter(|a| a.requires_replace)
            .filter(|a| {
                let before = prior.get(a.name).unwrap_or(&Value::Null);
                let after = plan.get(a.name).unwrap_or(&Value::Null);
                before != after
            })
            .map(|a| a.name)
            .collect()
    }
}
