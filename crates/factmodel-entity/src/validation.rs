//! Validation seam.
//!
//! Validation rules live outside this crate. A [`Validator`] inspects an
//! entity and records messages into an [`Errors`] collection; an entity is
//! valid when the collection is empty.

use std::collections::BTreeMap;

use crate::entity::Entity;

/// Validation messages keyed by attribute name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Errors {
    messages: BTreeMap<String, Vec<String>>,
}

impl Errors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against an attribute.
    pub fn add(&mut self, attribute: impl Into<String>, message: impl Into<String>) {
        self.messages
            .entry(attribute.into())
            .or_default()
            .push(message.into());
    }

    /// Messages recorded for one attribute.
    pub fn get(&self, attribute: &str) -> &[String] {
        self.messages.get(attribute).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Total number of messages.
    pub fn len(&self) -> usize {
        self.messages.values().map(Vec::len).sum()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.messages
            .iter()
            .flat_map(|(attr, msgs)| msgs.iter().map(move |m| (attr.as_str(), m.as_str())))
    }

    /// Messages prefixed with their attribute name, e.g. `name can't be blank`.
    pub fn full_messages(&self) -> Vec<String> {
        self.iter()
            .map(|(attr, msg)| format!("{} {}", attr, msg))
            .collect()
    }
}

/// An external validation rule.
pub trait Validator: Send + Sync {
    fn validate(&self, entity: &Entity, errors: &mut Errors);
}

impl<F> Validator for F
where
    F: Fn(&Entity, &mut Errors) + Send + Sync,
{
    fn validate(&self, entity: &Entity, errors: &mut Errors) {
        self(entity, errors)
    }
}

impl Entity {
    /// Run `validators`, replacing any previous errors. Returns validity.
    pub fn validate(&mut self, validators: &[&dyn Validator]) -> bool {
        let mut errors = Errors::new();
        for validator in validators {
            validator.validate(self, &mut errors);
        }
        if !errors.is_empty() {
            tracing::debug!(
                entity = %self.entity_type().name(),
                errors = errors.len(),
                "validation failed"
            );
        }
        self.errors = errors;
        self.is_valid()
    }

    /// Errors from the last [`validate`](Self::validate) call.
    pub fn errors(&self) -> &Errors {
        &self.errors
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}
