//! Capability and permission statement primitives.
//!
//! This crate provides the vocabulary used to describe access to provisioned
//! resources. An abstract [`Capability`] (read, write or both) is translated
//! by resource owners into concrete [`Action`]s, which are bound to a
//! [`Principal`] and a set of resource [`Locator`]s in a [`Statement`].
//! Statements issued for a single request are collected into a [`Grant`].
//!
//! # Quick Example
//!
//! ```rust
//! use tabula_capability::{Action, Capability, Grant, Locator, Principal, Statement};
//!
//! const READ: &[Action] = &[Action::from_static("glue:GetTable")];
//! const WRITE: &[Action] = &[Action::from_static("glue:CreatePartition")];
//!
//! let table = Locator::from("arn:aws:glue:us-east-1:123456789012:table/db/events");
//! let analyst = Principal::identity("arn:aws:iam::123456789012:role/analyst");
//!
//! // READ_WRITE is derived from the two narrower tables
//! let actions = Capability::ReadWrite.actions(READ, WRITE);
//! assert_eq!(actions.len(), 2);
//!
//! let grant = Grant::from(Statement::new(analyst, actions, [table.clone()]));
//! assert_eq!(grant.on(&table).count(), 1);
//! ```
//!
//! # Key Types
//!
//! | Type | Role |
//! |------|------|
//! | [`Capability`] | Abstract access level requested by a caller |
//! | [`Action`] / [`Actions`] | Concrete permission names (e.g. `glue:GetTable`) |
//! | [`Locator`] | ARN-equivalent identity of a resource |
//! | [`Principal`] / [`Grantee`] | Who receives a statement |
//! | [`Condition`] | Guard attached to a statement |
//! | [`Statement`] | `(grantee, actions, resources, conditions)` tuple |
//! | [`Grant`] | Ordered union of issued statements |
//! | [`StatementSink`] | Destination statements are attached to |

mod error;
pub use error::*;

mod action;
pub use action::*;

mod capability;
pub use capability::*;

mod locator;
pub use locator::*;

mod principal;
pub use principal::*;

mod condition;
pub use condition::*;

mod statement;
pub use statement::*;

mod grant;
pub use grant::*;
