//! Catalog tables whose data lives in an object store.
//!
//! Building a [`Table`] resolves its encryption settings, creates or reuses
//! the bucket and key it depends on, and persists the table definition
//! through the platform. Afterwards, [`GrantComposer`] turns a single
//! [`Capability`] into statements spanning the table, its bucket (scoped to
//! the table's prefix) and, for client-side encryption, its key.
//!
//! # Example
//!
//! ```
//! use tabula_effects::Emulator;
//! use tabula_effects::platform::Scope;
//! use tabula_table::{Column, DataFormat, Database, Principal, Schema, Table, TableProps};
//!
//! # fn main() -> Result<(), tabula_table::TableError> {
//! let mut env = Emulator::default();
//! let props = TableProps::new(
//!     Database::new("analytics", "123456789012"),
//!     vec![Column::new("id", Schema::string())],
//!     DataFormat::parquet(),
//! )
//! .with_prefix("events/");
//!
//! let table = Table::new(&mut env, &Scope::root("Stack").child("Events"), props)?;
//! assert_eq!(table.location(), "s3://stack-events-bucket/events/");
//!
//! let analyst = Principal::identity("arn:aws:iam::123456789012:role/analyst");
//! let grant = table.grant_read(&env, &analyst);
//! assert_eq!(grant.len(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! # Provisioning decisions
//!
//! | Bucket supplied | Mode | Bucket | Key |
//! |-----------------|------|--------|-----|
//! | no | none / `Unmanaged` | created, `S3Managed` | none |
//! | no | `ManagedKey` | created, `KmsManaged` | none |
//! | no | `CallerKey` | created, `Kms` | supplied or generated by storage |
//! | no | `ClientSideKey` | created, provider defaults | supplied or created |
//! | yes | none | reused | supplied, if any |
//! | yes | `ClientSideKey` | reused | supplied or created |
//! | yes | other | `ConfigConflict` | - |

mod error;
pub use error::*;

pub mod encryption;
pub use encryption::EncryptionMode;

pub mod provision;

pub mod schema;
pub use schema::{Column, DataFormat, Schema, Type};

pub mod parameter;
pub use parameter::{CompressionType, StorageParameter};

mod table;
pub use table::*;

pub mod grant;
pub use grant::GrantComposer;

pub mod key_signing;

pub use tabula_capability::{Capability, Grant, Grantee, Locator, Principal};
