use crate::{Action, Actions, CapabilityParseError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Abstract access level requested on a resource.
///
/// Resource owners translate a capability into concrete [`Action`]s for each
/// resource they manage. `ReadWrite` is always the union of `Read` and `Write`
/// and is never described by a hand-authored table of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Capability {
    /// Read access.
    Read,
    /// Write access.
    Write,
    /// Read and write access.
    ReadWrite,
}

impl Capability {
    /// Every capability, narrowest first.
    pub const ALL: [Capability; 3] = [Capability::Read, Capability::Write, Capability::ReadWrite];

    /// Canonical configuration string.
    pub fn as_str(self) -> &'static str {
        match self {
            Capability::Read => "READ",
            Capability::Write => "WRITE",
            Capability::ReadWrite => "READ_WRITE",
        }
    }

    /// Select the actions this capability maps to, given disjoint read and
    /// write tables.
    pub fn actions(self, read: &[Action], write: &[Action]) -> Actions {
        match self {
            Capability::Read => Actions::from(read),
            Capability::Write => Actions::from(write),
            Capability::ReadWrite => Actions::from(read).union(&Actions::from(write)),
        }
    }
}

impl FromStr for Capability {
    type Err = CapabilityParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Capability::ALL
            .into_iter()
            .find(|capability| capability.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| CapabilityParseError::UnknownCapability(value.to_owned()))
    }
}

impl Display for Capability {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
