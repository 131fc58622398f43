//! Active field registry
//!
//! The registry holds an immutable snapshot of the active fields behind a
//! lock that only guards the pointer. Writers build a complete new map and
//! swap it in; readers clone the current `Arc` and keep using it for as long
//! as they like.

use crate::fields::types::FieldDefinition;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Snapshot of active fields, keyed by name
pub type FieldSet = HashMap<String, Arc<FieldDefinition>>;

/// A value captured by one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatch {
    pub field: String,
    pub value: String,
}

/// Process-wide set of active field definitions
#[derive(Debug, Default)]
pub struct FieldRegistry {
    snapshot: RwLock<Arc<FieldSet>>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current snapshot
    pub fn snapshot(&self) -> Arc<FieldSet> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn get(&self, name: &str) -> Option<Arc<FieldDefinition>> {
        self.snapshot().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.snapshot().contains_key(name)
    }

    /// Active field names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.snapshot().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Merges definitions into the registry and publishes the result
    ///
    /// Existing entries with other names are kept. An incoming definition
    /// replaces an active one with the same name.
    pub(crate) fn merge(&self, incoming: Vec<FieldDefinition>) {
        if incoming.is_empty() {
            return;
        }

        let mut guard = self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let mut next: FieldSet = (**guard).clone();
        for definition in incoming {
            next.insert(definition.name.clone(), Arc::new(definition));
        }
        *guard = Arc::new(next);
    }

    /// Runs every active field over `text`
    ///
    /// Fields are visited in name order. Repeated values of the same field
    /// are reported once, in first-seen order.
    pub fn extract(&self, text: &str) -> Vec<FieldMatch> {
        let snapshot = self.snapshot();
        let mut names: Vec<&String> = snapshot.keys().collect();
        names.sort();

        let mut matches = Vec::new();
        for name in names {
            let definition = &snapshot[name];
            let mut seen = Vec::new();
            for value in definition.extract(text) {
                if !seen.contains(&value) {
                    seen.push(value);
                    matches.push(FieldMatch {
                        field: name.clone(),
                        value: value.to_string(),
                    });
                }
            }
        }
        matches
    }
}
