//! Grant composition.
//!
//! A single [`Capability`] on a table translates into statements for up to
//! three resources:
//!
//! ```text
//! grant(table, grantee, capability)
//!   ├── table actions on the table locator             (always)
//!   ├── KeyService::grant(key, grantee, operation)     (client-side encryption only)
//!   └── StorageService::grant(bucket, "{prefix}*")     (always)
//! ```
//!
//! Composition is pure. The returned [`Grant`] is handed to a
//! [`tabula_capability::StatementSink`] by the caller, if at all.

use crate::{EncryptionMode, Table};
use tabula_capability::{Action, Actions, Capability, Grant, Grantee, Statement};
use tabula_effects::key::{KeyOperation, KeyService};
use tabula_effects::storage::StorageService;

/// Catalog actions needed to read a table and its partitions.
pub const READ_ACTIONS: &[Action] = &[
    Action::from_static("glue:BatchGetPartition"),
    Action::from_static("glue:GetPartition"),
    Action::from_static("glue:GetPartitions"),
    Action::from_static("glue:GetTable"),
    Action::from_static("glue:GetTables"),
    Action::from_static("glue:GetTableVersion"),
    Action::from_static("glue:GetTableVersions"),
];

/// Catalog actions needed to maintain a table's partitions.
pub const WRITE_ACTIONS: &[Action] = &[
    Action::from_static("glue:BatchCreatePartition"),
    Action::from_static("glue:BatchDeletePartition"),
    Action::from_static("glue:CreatePartition"),
    Action::from_static("glue:DeletePartition"),
    Action::from_static("glue:UpdatePartition"),
];

/// Key operation a capability needs on a client-side encryption key.
pub fn key_operation(capability: Capability) -> KeyOperation {
    match capability {
        Capability::Read => KeyOperation::Decrypt,
        Capability::Write => KeyOperation::Encrypt,
        Capability::ReadWrite => KeyOperation::EncryptDecrypt,
    }
}

/// Composes grants on tables, delegating key and storage statements to the
/// collaborators that own those resources.
#[derive(Debug, Clone, Copy)]
pub struct GrantComposer<'a, Env> {
    env: &'a Env,
}

impl<'a, Env> GrantComposer<'a, Env>
where
    Env: StorageService + KeyService,
{
    /// A composer delegating to `env`.
    pub fn new(env: &'a Env) -> Self {
        Self { env }
    }

    /// Grant `grantee` everything `capability` requires on `table`.
    pub fn grant(&self, table: &Table, grantee: &impl Grantee, capability: Capability) -> Grant {
        let principal = grantee.principal();
        let mut grant = self.grant_actions(
            table,
            grantee,
            capability.actions(READ_ACTIONS, WRITE_ACTIONS),
        );

        if let (EncryptionMode::ClientSideKey, Some(key)) =
            (table.encryption(), table.encryption_key())
        {
            grant = grant.combine(KeyService::grant(
                self.env,
                key,
                principal,
                key_operation(capability),
            ));
        }

        grant = grant.combine(StorageService::grant(
            self.env,
            table.bucket(),
            principal,
            capability,
            &table.object_pattern(),
        ));

        tracing::trace!(
            table = %table.locator(),
            grantee = %principal,
            capability = %capability,
            statements = grant.len(),
            "composed table grant"
        );
        grant
    }

    /// Grant `grantee` arbitrary catalog `actions` on `table` alone.
    ///
    /// Neither the bucket nor the key is touched.
    pub fn grant_actions(
        &self,
        table: &Table,
        grantee: &impl Grantee,
        actions: impl Into<Actions>,
    ) -> Grant {
        Grant::from(Statement::new(
            grantee.principal().clone(),
            actions,
            [table.locator().clone()],
        ))
    }
}

impl Table {
    /// Grant `grantee` everything `capability` requires on this table.
    pub fn grant<Env>(&self, env: &Env, grantee: &impl Grantee, capability: Capability) -> Grant
    where
        Env: StorageService + KeyService,
    {
        GrantComposer::new(env).grant(self, grantee, capability)
    }

    /// Grant read access to the table, its objects and, if needed, its key.
    pub fn grant_read<Env>(&self, env: &Env, grantee: &impl Grantee) -> Grant
    where
        Env: StorageService + KeyService,
    {
        self.grant(env, grantee, Capability::Read)
    }

    /// Grant write access to the table, its objects and, if needed, its key.
    pub fn grant_write<Env>(&self, env: &Env, grantee: &impl Grantee) -> Grant
    where
        Env: StorageService + KeyService,
    {
        self.grant(env, grantee, Capability::Write)
    }

    /// Grant read and write access.
    pub fn grant_read_write<Env>(&self, env: &Env, grantee: &impl Grantee) -> Grant
    where
        Env: StorageService + KeyService,
    {
        self.grant(env, grantee, Capability::ReadWrite)
    }
}
