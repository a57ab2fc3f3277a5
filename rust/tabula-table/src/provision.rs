//! Dependent resource provisioning.
//!
//! Acts on a [`ResolvedEncryption`]: reuses the supplied bucket or creates
//! one with the encryption settings the mode maps to, then creates the
//! planned key.

use crate::TableError;
use crate::encryption::{EncryptionMode, KeyPlan, ResolvedEncryption};
use tabula_effects::key::{Key, KeyService};
use tabula_effects::platform::Scope;
use tabula_effects::storage::{Bucket, BucketSettings, StorageService};

/// Logical id of a bucket created for a table.
pub const BUCKET_ID: &str = "Bucket";

/// Logical id of a key created for client-side encryption.
pub const KEY_ID: &str = "Key";

/// The resources a table is built on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependents {
    /// Bucket holding the table's data.
    pub bucket: Bucket,
    /// Effective encryption mode.
    pub encryption: EncryptionMode,
    /// Key tracked by the table, if any.
    pub encryption_key: Option<Key>,
}

/// Create or reuse the bucket and key a table at `scope` depends on.
///
/// A supplied bucket is reused verbatim. Otherwise a bucket is created under
/// `scope`: with provider defaults for client-side encryption, and with the
/// mode's [`BucketSettings`] for every other mode. In the latter case the
/// created bucket's key, which the storage layer may have generated, becomes
/// the tracked key.
///
/// A planned client-side key is created only once the bucket exists, so a
/// rejected bucket never leaves an orphaned key behind.
pub fn provision<Env>(
    env: &mut Env,
    scope: &Scope,
    supplied: Option<Bucket>,
    resolved: ResolvedEncryption,
) -> Result<Dependents, TableError>
where
    Env: StorageService + KeyService,
{
    let ResolvedEncryption { mode, key } = resolved;

    let (bucket, adopted) = match (supplied, mode.bucket_encryption()) {
        (Some(bucket), _) => {
            tracing::debug!(scope = %scope, bucket = %bucket.name, "reusing supplied bucket");
            (bucket, None)
        }
        (None, None) => (
            StorageService::create(env, &scope.child(BUCKET_ID), None)?,
            None,
        ),
        (None, Some(encryption)) => {
            let settings = BucketSettings {
                encryption,
                encryption_key: key.supplied().cloned(),
            };
            let bucket = StorageService::create(env, &scope.child(BUCKET_ID), Some(settings))?;
            let adopted = bucket.encryption_key.clone();
            (bucket, Some(adopted))
        }
    };

    let encryption_key = match (adopted, key) {
        (Some(adopted), _) => adopted,
        (None, KeyPlan::Supplied(key)) => Some(key),
        (None, KeyPlan::None) => None,
        (None, KeyPlan::Create) => {
            let key = KeyService::create(env, &scope.child(KEY_ID))?;
            tracing::debug!(
                scope = %scope,
                key = %key.locator,
                "created client-side encryption key"
            );
            Some(key)
        }
    };

    tracing::debug!(
        scope = %scope,
        bucket = %bucket.locator,
        mode = %mode,
        key = ?encryption_key.as_ref().map(|key| &key.locator),
        "provisioned table dependents"
    );

    Ok(Dependents {
        bucket,
        encryption: mode,
        encryption_key,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encryption::resolve;
    use pretty_assertions::assert_eq;
    use tabula_effects::Emulator;
    use tabula_effects::storage::BucketEncryption;
    use testresult::TestResult;

    fn scope() -> Scope {
        Scope::root("Stack").child("Events")
    }

    fn caller_key() -> Key {
        Key::new("caller", "arn:aws:kms:us-east-1:123456789012:key/caller")
    }

    #[test]
    fn it_creates_a_default_bucket() -> TestResult {
        let mut env = Emulator::default();
        let dependents = provision(&mut env, &scope(), None, resolve(None, None, None)?)?;

        assert_eq!(dependents.encryption, EncryptionMode::Unmanaged);
        assert_eq!(dependents.encryption_key, None);
        assert_eq!(
            env.bucket_requests()[0].settings,
            Some(BucketSettings {
                encryption: BucketEncryption::S3Managed,
                encryption_key: None,
            })
        );
        Ok(())
    }

    #[test]
    fn it_keeps_client_side_keys_away_from_the_bucket() -> TestResult {
        let mut env = Emulator::default();
        let resolved = resolve(None, Some(EncryptionMode::ClientSideKey), None)?;
        let dependents = provision(&mut env, &scope(), None, resolved)?;

        assert_eq!(env.bucket_requests()[0].settings, None);
        assert_eq!(dependents.bucket.encryption_key, None);
        assert_eq!(dependents.encryption_key.as_ref(), env.keys().first());
        assert_eq!(env.keys().len(), 1);
        Ok(())
    }

    #[test]
    fn it_adopts_keys_generated_by_storage() -> TestResult {
        let mut env = Emulator::default();
        let resolved = resolve(None, Some(EncryptionMode::CallerKey), None)?;
        let dependents = provision(&mut env, &scope(), None, resolved)?;

        assert!(dependents.encryption_key.is_some());
        assert_eq!(dependents.encryption_key, dependents.bucket.encryption_key);
        Ok(())
    }

    #[test]
    fn it_hands_caller_keys_to_storage() -> TestResult {
        let mut env = Emulator::default();
        let resolved = resolve(None, Some(EncryptionMode::CallerKey), Some(caller_key()))?;
        let dependents = provision(&mut env, &scope(), None, resolved)?;

        assert_eq!(
            env.bucket_requests()[0].settings,
            Some(BucketSettings {
                encryption: BucketEncryption::Kms,
                encryption_key: Some(caller_key()),
            })
        );
        assert_eq!(dependents.encryption_key, Some(caller_key()));
        assert!(env.keys().is_empty());
        Ok(())
    }

    #[test]
    fn it_drops_the_key_for_managed_key_buckets() -> TestResult {
        let mut env = Emulator::default();
        let resolved = resolve(None, Some(EncryptionMode::ManagedKey), None)?;
        let dependents = provision(&mut env, &scope(), None, resolved)?;

        assert_eq!(dependents.encryption, EncryptionMode::ManagedKey);
        assert_eq!(dependents.encryption_key, None);
        Ok(())
    }

    #[test]
    fn it_reuses_supplied_buckets_verbatim() -> TestResult {
        let mut env = Emulator::default();
        let supplied = Bucket::new("shared", "arn:aws:s3:::shared");
        let resolved = resolve(Some(&supplied), Some(EncryptionMode::ClientSideKey), None)?;
        let dependents = provision(&mut env, &scope(), Some(supplied.clone()), resolved)?;

        assert_eq!(dependents.bucket, supplied);
        assert!(env.bucket_requests().is_empty());
        assert!(dependents.encryption_key.is_some());
        Ok(())
    }

    #[test]
    fn it_creates_no_key_when_the_bucket_is_rejected() -> TestResult {
        let mut env = Emulator::default();
        StorageService::create(&mut env, &scope().child(BUCKET_ID), None)?;

        let resolved = resolve(None, Some(EncryptionMode::ClientSideKey), None)?;
        let result = provision(&mut env, &scope(), None, resolved);

        assert!(matches!(
            result,
            Err(TableError::Platform(tabula_effects::PlatformError::NameCollision(_)))
        ));
        assert!(env.keys().is_empty());
        Ok(())
    }

    #[test]
    fn it_surfaces_storage_errors_unchanged() -> TestResult {
        let mut env = Emulator::default();
        let resolved = resolve(None, Some(EncryptionMode::Unmanaged), Some(caller_key()))?;
        let result = provision(&mut env, &scope(), None, resolved);

        assert!(matches!(
            result,
            Err(TableError::Platform(tabula_effects::PlatformError::Backend(_)))
        ));
        Ok(())
    }
}
