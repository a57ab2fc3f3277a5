//! Property tests over encryption resolution, provisioning and grants.

use proptest::prelude::*;
use std::collections::HashSet;
use tabula_capability::{Actions, Capability, Principal};
use tabula_effects::key::Key;
use tabula_effects::platform::Scope;
use tabula_effects::storage::{Bucket, BucketSettings};
use tabula_effects::{Emulator, PlatformError};
use tabula_table::encryption::resolve;
use tabula_table::grant::{READ_ACTIONS, WRITE_ACTIONS};
use tabula_table::parameter::assemble;
use tabula_table::{
    Column, DataFormat, Database, EncryptionMode, Schema, StorageParameter, Table, TableError,
    TableProps,
};

const SERVER_SIDE: [EncryptionMode; 3] = [
    EncryptionMode::Unmanaged,
    EncryptionMode::ManagedKey,
    EncryptionMode::CallerKey,
];

fn arb_mode() -> impl Strategy<Value = EncryptionMode> {
    prop::sample::select(EncryptionMode::ALL.to_vec())
}

fn arb_server_side_mode() -> impl Strategy<Value = EncryptionMode> {
    prop::sample::select(SERVER_SIDE.to_vec())
}

fn arb_capability() -> impl Strategy<Value = Capability> {
    prop::sample::select(Capability::ALL.to_vec())
}

fn arb_key() -> impl Strategy<Value = Option<Key>> {
    prop::option::of("[a-z0-9]{1,12}".prop_map(|id| {
        let locator = format!("arn:aws:kms:us-east-1:123456789012:key/{id}");
        Key::new(id, locator)
    }))
}

fn arb_prefix() -> impl Strategy<Value = String> {
    "([a-z]{1,8}/){0,3}"
}

fn props(prefix: &str, mode: EncryptionMode) -> TableProps {
    TableProps::new(
        Database::new("analytics", "123456789012"),
        vec![Column::new("id", Schema::bigint())],
        DataFormat::orc(),
    )
    .with_prefix(prefix)
    .with_encryption(mode)
}

fn analyst() -> Principal {
    Principal::identity("arn:aws:iam::123456789012:role/analyst")
}

proptest! {
    /// A supplied bucket's encryption is fixed, so server-side modes conflict.
    #[test]
    fn it_rejects_server_side_modes_for_supplied_buckets(
        mode in arb_server_side_mode(),
        key in arb_key(),
        name in "[a-z]{3,12}",
    ) {
        let bucket = Bucket::new(name.clone(), format!("arn:aws:s3:::{name}"));
        let result = resolve(Some(&bucket), Some(mode), key);
        let conflicted = matches!(
            result,
            Err(TableError::ConfigConflict { mode: rejected, .. }) if rejected == mode
        );
        prop_assert!(conflicted);
    }

    /// Client-side keys never reach the storage layer.
    #[test]
    fn it_keeps_client_side_keys_out_of_bucket_settings(
        prefix in arb_prefix(),
        key in arb_key(),
    ) {
        let mut env = Emulator::default();
        let mut props = props(&prefix, EncryptionMode::ClientSideKey);
        props.encryption_key = key.clone();

        let table = Table::new(&mut env, &Scope::root("Stack").child("Events"), props)
            .map_err(|error| TestCaseError::fail(error.to_string()))?;

        prop_assert_eq!(env.bucket_requests().len(), 1);
        prop_assert_eq!(&env.bucket_requests()[0].settings, &None);
        prop_assert!(table.encryption_key().is_some());
        prop_assert_eq!(env.keys().len(), usize::from(key.is_none()));
        if let Some(key) = key {
            prop_assert_eq!(table.encryption_key(), Some(&key));
        }
    }

    /// Created buckets are requested with the mode's encryption and the
    /// caller's key; storage only accepts a key for caller-key buckets.
    #[test]
    fn it_maps_server_side_modes_to_bucket_encryption(
        mode in arb_server_side_mode(),
        key in arb_key(),
        prefix in arb_prefix(),
    ) {
        let mut env = Emulator::default();
        let mut props = props(&prefix, mode);
        props.encryption_key = key.clone();

        let result = Table::new(&mut env, &Scope::root("Stack").child("Events"), props);

        let encryption = mode
            .bucket_encryption()
            .ok_or_else(|| TestCaseError::fail(format!("{mode} has no bucket encryption")))?;
        prop_assert_eq!(env.bucket_requests().len(), 1);
        prop_assert_eq!(
            &env.bucket_requests()[0].settings,
            &Some(BucketSettings {
                encryption,
                encryption_key: key.clone(),
            })
        );

        if key.is_none() || mode == EncryptionMode::CallerKey {
            prop_assert!(result.is_ok());
        } else {
            prop_assert!(matches!(
                result,
                Err(TableError::Platform(PlatformError::Backend(_)))
            ));
            prop_assert!(env.buckets().is_empty());
        }
    }

    /// Key statements are issued exactly for client-side encryption.
    #[test]
    fn it_grants_keys_only_for_client_side_encryption(
        mode in arb_mode(),
        capability in arb_capability(),
        prefix in arb_prefix(),
    ) {
        let mut env = Emulator::default();
        let scope = Scope::root("Stack").child("Events");
        let table = Table::new(&mut env, &scope, props(&prefix, mode))
            .map_err(|error| TestCaseError::fail(error.to_string()))?;
        let grant = table.grant(&env, &analyst(), capability);

        let key_statements = grant.for_service("kms").count();
        prop_assert_eq!(key_statements, usize::from(mode.is_client_side()));
        prop_assert_eq!(grant.on(table.locator()).count(), 1);

        let objects = table.bucket().locator.objects(&format!("{prefix}*"));
        prop_assert_eq!(grant.on(&objects).count(), 1);
    }

    /// Read-write on a table is exactly read plus write.
    #[test]
    fn it_composes_read_write_from_read_and_write(mode in arb_mode()) {
        let mut env = Emulator::default();
        let table = Table::new(&mut env, &Scope::root("Stack").child("Events"), props("", mode))
            .map_err(|error| TestCaseError::fail(error.to_string()))?;

        let table_actions = |capability| -> Actions {
            table
                .grant(&env, &analyst(), capability)
                .on(table.locator())
                .flat_map(|statement| statement.actions().iter().cloned())
                .collect()
        };

        let read = table_actions(Capability::Read);
        let write = table_actions(Capability::Write);
        prop_assert!(read.is_disjoint(&write));
        prop_assert_eq!(table_actions(Capability::ReadWrite), read.union(&write));
        prop_assert_eq!(read, Actions::from(READ_ACTIONS));
        prop_assert_eq!(write, Actions::from(WRITE_ACTIONS));
    }

    /// Distinct storage parameter keys assemble in order; a repeated key fails.
    #[test]
    fn it_assembles_storage_parameters(
        keys in prop::collection::btree_set("[a-z.]{1,10}", 1..8),
        repeat in any::<prop::sample::Index>(),
    ) {
        let keys = keys.into_iter().collect::<Vec<_>>();
        let mut parameters = keys
            .iter()
            .map(|key| StorageParameter::new(key.clone(), "value"))
            .collect::<Vec<_>>();

        let assembled = assemble(&parameters)
            .map_err(|error| TestCaseError::fail(error.to_string()))?;
        prop_assert_eq!(assembled.keys().cloned().collect::<Vec<_>>(), keys.clone());

        let repeated = repeat.get(&keys).clone();
        parameters.push(StorageParameter::new(repeated.clone(), "again"));
        prop_assert!(matches!(
            assemble(&parameters),
            Err(TableError::DuplicateParameterKey(key)) if key == repeated
        ));
    }
}

#[test]
fn it_never_hands_client_side_mode_to_storage() {
    let encryptions = EncryptionMode::ALL
        .into_iter()
        .filter_map(EncryptionMode::bucket_encryption)
        .collect::<HashSet<_>>();

    assert_eq!(encryptions.len(), SERVER_SIDE.len());
    assert_eq!(EncryptionMode::ClientSideKey.bucket_encryption(), None);
}
