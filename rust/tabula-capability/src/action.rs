use crate::CapabilityParseError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A concrete permission name such as `glue:GetTable` or `kms:Decrypt`.
///
/// Actions are opaque to this crate beyond the `service:operation` shape. They
/// can be declared in `const` tables with [`Action::from_static`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Action(Cow<'static, str>);

impl Action {
    /// Create an action from a static string, usable in `const` context.
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Get the full action name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the service prefix (the part before `:`).
    pub fn service(&self) -> &str {
        self.0.split_once(':').map(|(service, _)| service).unwrap_or("")
    }
}

impl FromStr for Action {
    type Err = CapabilityParseError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.split_once(':') {
            Some((service, operation)) if !service.is_empty() && !operation.is_empty() => {
                Ok(Self(Cow::Owned(name.to_owned())))
            }
            _ => Err(CapabilityParseError::MalformedAction(name.to_owned())),
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for Action {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// An ordered set of [`Action`]s.
///
/// Ordering is lexicographic so that set algebra (union of read and write
/// tables) yields the same statement regardless of how it was assembled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Actions(BTreeSet<Action>);

impl Actions {
    /// Set union of two action sets.
    pub fn union(&self, other: &Actions) -> Actions {
        Self(self.0.union(&other.0).cloned().collect())
    }

    /// Whether the two sets share no action.
    pub fn is_disjoint(&self, other: &Actions) -> bool {
        self.0.is_disjoint(&other.0)
    }

    /// Whether every action of `self` is also in `other`.
    pub fn is_subset(&self, other: &Actions) -> bool {
        self.0.is_subset(&other.0)
    }

    /// Whether the set contains the named action.
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|action| action.as_str() == name)
    }

    /// Number of actions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over actions in order.
    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.0.iter()
    }
}

impl From<&[Action]> for Actions {
    fn from(actions: &[Action]) -> Self {
        actions.iter().cloned().collect()
    }
}

impl<const N: usize> From<[Action; N]> for Actions {
    fn from(actions: [Action; N]) -> Self {
        actions.into_iter().collect()
    }
}

impl FromIterator<Action> for Actions {
    fn from_iter<T: IntoIterator<Item = Action>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Actions {
    type Item = &'a Action;
    type IntoIter = std::collections::btree_set::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
