//! Variables: named, typed column identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Measurement scale of a variable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    #[default]
    Continuous,
    Categorical,
}

impl VariableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Continuous => "continuous",
            Self::Categorical => "categorical",
        }
    }
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, typed column identifier.
///
/// `index` points into the owning dataset's column space, or records the
/// registration order for graphs parsed without data. Immutable once
/// registered; identity is by `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    name: String,
    kind: VariableKind,
    index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl Variable {
    pub fn new(name: impl Into<String>, kind: VariableKind, index: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            index,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> VariableKind {
        self.kind
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_categorical(&self) -> bool {
        self.kind == VariableKind::Categorical
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
