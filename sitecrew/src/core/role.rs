//! Persona descriptors for pipeline stages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A persona used to frame a stage's prompt.
///
/// Roles are plain configuration: built once when a crew is defined and
/// shared read-only by every stage that uses them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Display name, e.g. "Senior Project Manager".
    pub name: String,
    /// What the persona is trying to achieve.
    pub objective: String,
    /// Background the model should assume.
    pub persona: String,
}

impl Role {
    /// Creates a new role.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        objective: impl Into<String>,
        persona: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            objective: objective.into(),
            persona: persona.into(),
        }
    }

    /// Renders the role as a system instruction for the model.
    #[must_use]
    pub fn system_instruction(&self) -> String {
        format!(
            "You are {}. {}\nYour personal goal is: {}",
            self.name, self.persona, self.objective
        )
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
