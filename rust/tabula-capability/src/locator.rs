use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Locator (ARN equivalent) identifying a provisioned resource.
///
/// A `Locator` is what statements target. Locators are produced by the
/// platform collaborator and are never generated randomly by this crate.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locator(String);

impl Locator {
    /// Wrap a locator string.
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    /// Get the locator string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Locator of objects under this resource matching `pattern`
    /// (e.g. `arn:aws:s3:::bucket` + `data/*` → `arn:aws:s3:::bucket/data/*`).
    pub fn objects(&self, pattern: &str) -> Locator {
        Self(format!("{}/{}", self.0, pattern))
    }
}

impl From<&str> for Locator {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for Locator {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for Locator {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Locator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for Locator {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
