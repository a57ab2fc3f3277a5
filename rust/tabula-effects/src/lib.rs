//! Tabula effects - the boundary between the table core and the platform that
//! actually provisions resources.
//!
//! The core never talks to a provisioning backend directly. It calls into the
//! collaborators defined here with fully validated inputs, and receives
//! resource handles (or bucket/key values) back.
//!
//! # Collaborators
//!
//! - [`platform`]: name allocation, locator formatting and resource creation
//!   (`Platform`, `Scope`, `ResourceHandle`)
//! - [`catalog`]: table definitions handed to the platform (`TableInput`,
//!   `StorageDescriptor`, `PartitionIndexInput`)
//! - [`storage`]: bucket creation and path-scoped bucket grants
//!   (`StorageService`, `Bucket`, `BucketEncryption`)
//! - [`key`]: key creation and key grants (`KeyService`, `Key`, `KeyOperation`)
//! - [`dns`]: key signing key definitions (`HostedZone`, `KeySigningKeyInput`)
//!
//! # Example
//!
//! ```
//! use tabula_effects::platform::Scope;
//!
//! let scope = Scope::root("Analytics").child("Events");
//! assert_eq!(scope.path(), "Analytics/Events");
//! assert_eq!(scope.child("Bucket").id(), "Bucket");
//! ```

#![warn(missing_docs)]

mod error;
pub use error::*;

pub mod catalog;
pub mod dns;
pub mod key;
pub mod platform;
pub mod storage;

#[cfg(any(test, feature = "helpers"))]
mod emulator;
#[cfg(any(test, feature = "helpers"))]
pub use emulator::*;

// Re-export capability primitives for convenience
pub use tabula_capability::{Capability, Grant, Locator, Principal, Statement, StatementSink};
