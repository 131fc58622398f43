use crate::FieldError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Extraction strategy of a field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Regex,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Regex => write!(f, "regex"),
        }
    }
}

/// One named extraction rule
///
/// `patterns` is the declared form. `compiled` is rebuilt from it by
/// [`FieldDefinition::compile`] and never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,

    #[serde(rename = "type", default)]
    pub kind: FieldKind,

    /// Capture group to extract; 0 is the whole match
    #[serde(default)]
    pub group: usize,

    #[serde(rename = "regex", default)]
    pub patterns: Vec<String>,

    #[serde(skip)]
    compiled: Vec<Regex>,
}

impl FieldDefinition {
    /// Creates an uncompiled regex field
    pub fn new(name: impl Into<String>, group: usize, patterns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Regex,
            group,
            patterns,
            compiled: Vec::new(),
        }
    }

    /// Compiles every declared pattern
    ///
    /// Either all patterns compile and replace the previous compiled set, or
    /// the definition is left untouched and the first failing pattern is
    /// reported.
    pub fn compile(&mut self) -> Result<(), FieldError> {
        let compiled = self
            .patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| FieldError::Regex {
                    name: self.name.clone(),
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.compiled = compiled;
        Ok(())
    }

    pub fn compiled(&self) -> &[Regex] {
        &self.compiled
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled.len() == self.patterns.len()
    }

    /// Returns the configured capture group of every match, in order
    ///
    /// Matches where the group did not participate or is empty are skipped.
    pub fn extract<'t>(&self, text: &'t str) -> Vec<&'t str> {
        let mut values = Vec::new();
        for regex in &self.compiled {
            for captures in regex.captures_iter(text) {
                if let Some(m) = captures.get(self.group) {
                    if !m.as_str().is_empty() {
                        values.push(m.as_str());
                    }
                }
            }
        }
        values
    }
}

/// On-disk layout of the field configuration file
///
/// ```toml
/// [[field]]
/// name = "email"
/// type = "regex"
/// group = 0
/// regex = ['([a-zA-Z0-9._-]+@[a-zA-Z0-9._-]+\.[a-zA-Z0-9_-]+)']
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldConfigFile {
    #[serde(rename = "field", default)]
    pub fields: Vec<FieldDefinition>,
}
