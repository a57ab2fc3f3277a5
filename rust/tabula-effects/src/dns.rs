//! DNS zone signing resources.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use tabula_capability::Locator;

/// A hosted zone, as seen by resources that sign its records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedZone {
    /// Zone id.
    pub id: String,
    /// Zone locator.
    pub locator: Locator,
}

impl HostedZone {
    /// Reference an existing hosted zone.
    pub fn new(id: impl Into<String>, locator: impl Into<Locator>) -> Self {
        Self {
            id: id.into(),
            locator: locator.into(),
        }
    }
}

/// Whether a key signing key is used for signing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeySigningKeyStatus {
    /// The key is being used for signing.
    #[default]
    Active,
    /// The key is not being used for signing.
    Inactive,
}

impl Display for KeySigningKeyStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            KeySigningKeyStatus::Active => f.write_str("ACTIVE"),
            KeySigningKeyStatus::Inactive => f.write_str("INACTIVE"),
        }
    }
}

/// Definition of a key signing key handed to the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySigningKeyInput {
    /// Zone signed by the key.
    pub hosted_zone_id: String,
    /// Locator of the asymmetric key used for signing.
    pub key_locator: Locator,
    /// Name, unique within the zone.
    pub name: String,
    /// Signing status.
    pub status: KeySigningKeyStatus,
}
