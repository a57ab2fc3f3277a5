//! Construct platform boundary.
//!
//! The platform owns identifier generation, resource template persistence and
//! parent/child registration. Resources are addressed by their [`Scope`], the
//! path of logical ids from the root of the resource graph.

use crate::PlatformError;
use crate::catalog::{PartitionIndexInput, TableInput};
use crate::dns::KeySigningKeyInput;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use tabula_capability::Locator;

/// Path of logical ids locating a resource in the resource graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scope(Vec<String>);

impl Scope {
    /// A top-level scope.
    pub fn root(id: impl Into<String>) -> Self {
        Self(vec![id.into()])
    }

    /// The scope of a child registered under `self` with logical id `id`.
    pub fn child(&self, id: impl Into<String>) -> Self {
        let mut path = self.0.clone();
        path.push(id.into());
        Self(path)
    }

    /// Logical id of this scope (its last segment).
    pub fn id(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or_default()
    }

    /// Segments from the root down.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// `/`-joined path.
    pub fn path(&self) -> String {
        self.0.join("/")
    }
}

impl Display for Scope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

/// Account and region resources are provisioned into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// Partition (e.g. `aws`, `aws-cn`).
    pub partition: String,
    /// Region (e.g. `us-east-1`).
    pub region: String,
    /// Account id.
    pub account: String,
}

impl Environment {
    /// Create an environment.
    pub fn new(
        partition: impl Into<String>,
        region: impl Into<String>,
        account: impl Into<String>,
    ) -> Self {
        Self {
            partition: partition.into(),
            region: region.into(),
            account: account.into(),
        }
    }
}

/// Components of a locator, rendered by [`Platform::format_locator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatorParts<'a> {
    /// Service namespace (e.g. `glue`).
    pub service: &'a str,
    /// Resource type (e.g. `table`).
    pub resource: &'a str,
    /// Resource name (e.g. `database/table`).
    pub resource_name: &'a str,
}

/// Opaque handle to a resource persisted by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceHandle {
    /// Physical id assigned by the platform.
    pub id: String,
    /// Locator of the resource.
    pub locator: Locator,
}

/// The construct platform.
///
/// Creation methods take `&mut self`: a resource graph is assembled by a
/// single caller before it is handed over.
pub trait Platform {
    /// Account and region resources land in.
    fn environment(&self) -> &Environment;

    /// Allocate a physical name for the resource at `scope`.
    fn allocate_name(&mut self, scope: &Scope) -> String;

    /// Render a locator for a resource in this platform's environment.
    fn format_locator(&self, parts: LocatorParts<'_>) -> Locator {
        let environment = self.environment();
        Locator::new(format!(
            "arn:{}:{}:{}:{}:{}/{}",
            environment.partition,
            parts.service,
            environment.region,
            environment.account,
            parts.resource,
            parts.resource_name
        ))
    }

    /// Persist a table definition.
    fn create_table(
        &mut self,
        scope: &Scope,
        input: &TableInput,
    ) -> Result<ResourceHandle, PlatformError>;

    /// Persist a partition index on an existing table.
    fn add_partition_index(
        &mut self,
        table: &ResourceHandle,
        index: &PartitionIndexInput,
    ) -> Result<(), PlatformError>;

    /// Persist a key signing key.
    fn create_key_signing_key(
        &mut self,
        scope: &Scope,
        input: &KeySigningKeyInput,
    ) -> Result<ResourceHandle, PlatformError>;
}
