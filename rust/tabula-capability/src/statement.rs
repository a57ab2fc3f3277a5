use crate::{Actions, Condition, Locator, Principal};
use serde::{Deserialize, Serialize};

/// A permission statement binding a grantee, an action set, target resources
/// and optional conditions.
///
/// Contains:
/// - `grantee` - who the statement is for
/// - `actions` - what the grantee may do
/// - `resources` - which resources the actions apply to
/// - `conditions` - guards that must all hold for the statement to apply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// Who receives the permissions.
    pub grantee: Principal,
    /// The permitted actions.
    pub actions: Actions,
    /// Target resource locators.
    pub resources: Vec<Locator>,
    /// Conditions guarding the statement.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

impl Statement {
    /// Create an unconditional statement.
    pub fn new(
        grantee: Principal,
        actions: impl Into<Actions>,
        resources: impl IntoIterator<Item = Locator>,
    ) -> Self {
        Self {
            grantee,
            actions: actions.into(),
            resources: resources.into_iter().collect(),
            conditions: Vec::new(),
        }
    }

    /// Add a condition to this statement.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Get the grantee.
    pub fn grantee(&self) -> &Principal {
        &self.grantee
    }

    /// Get the actions.
    pub fn actions(&self) -> &Actions {
        &self.actions
    }

    /// Get the target resources.
    pub fn resources(&self) -> &[Locator] {
        &self.resources
    }

    /// Get the conditions.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Whether `locator` is one of the statement's targets.
    pub fn targets(&self, locator: &Locator) -> bool {
        self.resources.iter().any(|resource| resource == locator)
    }

    /// Keys of every condition on this statement.
    pub fn condition_keys(&self) -> impl Iterator<Item = &str> {
        self.conditions.iter().map(|condition| condition.key.as_str())
    }
}
