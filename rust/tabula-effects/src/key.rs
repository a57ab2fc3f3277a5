//! Key management collaborator.
//!
//! # Operations
//!
//! ```text
//! KeyService
//!   ├── create(scope) → Key
//!   ├── grant(key, grantee, KeyOperation) → Grant
//!   └── grant_with(key, grantee, actions, conditions) → Grant
//! ```

use crate::PlatformError;
use crate::platform::Scope;
use serde::{Deserialize, Serialize};
use tabula_capability::{Action, Actions, Condition, Grant, Locator, Principal, Statement};

/// An encryption key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    /// Key id.
    pub id: String,
    /// Key locator.
    pub locator: Locator,
}

impl Key {
    /// Reference an existing key.
    pub fn new(id: impl Into<String>, locator: impl Into<Locator>) -> Self {
        Self {
            id: id.into(),
            locator: locator.into(),
        }
    }
}

const DECRYPT: &[Action] = &[Action::from_static("kms:Decrypt")];

const ENCRYPT: &[Action] = &[
    Action::from_static("kms:Encrypt"),
    Action::from_static("kms:ReEncrypt*"),
    Action::from_static("kms:GenerateDataKey*"),
];

/// Cryptographic operations a grantee can be allowed to perform with a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyOperation {
    /// Encrypt data and generate data keys.
    Encrypt,
    /// Decrypt data.
    Decrypt,
    /// Both.
    EncryptDecrypt,
}

impl KeyOperation {
    /// Actions this operation requires.
    pub fn actions(self) -> Actions {
        match self {
            KeyOperation::Encrypt => Actions::from(ENCRYPT),
            KeyOperation::Decrypt => Actions::from(DECRYPT),
            KeyOperation::EncryptDecrypt => Actions::from(ENCRYPT).union(&Actions::from(DECRYPT)),
        }
    }
}

/// The key management collaborator.
pub trait KeyService {
    /// Create a new key at `scope`.
    fn create(&mut self, scope: &Scope) -> Result<Key, PlatformError>;

    /// Grant `grantee` the actions needed for `operation` on `key`.
    fn grant(&self, key: &Key, grantee: &Principal, operation: KeyOperation) -> Grant {
        self.grant_with(key, grantee, operation.actions(), Vec::new())
    }

    /// Grant `grantee` arbitrary `actions` on `key`, guarded by `conditions`.
    fn grant_with(
        &self,
        key: &Key,
        grantee: &Principal,
        actions: Actions,
        conditions: Vec<Condition>,
    ) -> Grant {
        let statement = conditions.into_iter().fold(
            Statement::new(grantee.clone(), actions, [key.locator.clone()]),
            Statement::with_condition,
        );
        Grant::from(statement)
    }
}
