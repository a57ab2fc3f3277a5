//! Encryption mode resolution.
//!
//! Resolution is a pure decision over the caller's options: it validates the
//! combination and says which key the table will track, without creating
//! anything. [`crate::provision`] acts on the decision.

use crate::TableError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use tabula_effects::key::Key;
use tabula_effects::storage::{Bucket, BucketEncryption};

/// How a table's data is encrypted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncryptionMode {
    /// Server-side encryption with a key managed by the storage service.
    #[default]
    #[serde(rename = "SSE-S3")]
    Unmanaged,
    /// Server-side encryption with the key service's default key.
    #[serde(rename = "SSE-KMS-MANAGED")]
    ManagedKey,
    /// Server-side encryption with a caller-owned key.
    #[serde(rename = "SSE-KMS")]
    CallerKey,
    /// Client-side encryption with a caller-owned key. The storage layer is
    /// unaware of it; readers and writers use the key directly.
    #[serde(rename = "CSE-KMS")]
    ClientSideKey,
}

impl EncryptionMode {
    /// Every mode.
    pub const ALL: [EncryptionMode; 4] = [
        EncryptionMode::Unmanaged,
        EncryptionMode::ManagedKey,
        EncryptionMode::CallerKey,
        EncryptionMode::ClientSideKey,
    ];

    /// Canonical configuration string.
    pub fn as_str(self) -> &'static str {
        match self {
            EncryptionMode::Unmanaged => "SSE-S3",
            EncryptionMode::ManagedKey => "SSE-KMS-MANAGED",
            EncryptionMode::CallerKey => "SSE-KMS",
            EncryptionMode::ClientSideKey => "CSE-KMS",
        }
    }

    /// Bucket encryption a newly created bucket gets for this mode.
    ///
    /// `None` for client-side encryption: the bucket is created with provider
    /// defaults and never learns about the key.
    pub fn bucket_encryption(self) -> Option<BucketEncryption> {
        match self {
            EncryptionMode::Unmanaged => Some(BucketEncryption::S3Managed),
            EncryptionMode::ManagedKey => Some(BucketEncryption::KmsManaged),
            EncryptionMode::CallerKey => Some(BucketEncryption::Kms),
            EncryptionMode::ClientSideKey => None,
        }
    }

    /// Whether data is encrypted with a caller-owned key outside storage.
    pub fn is_client_side(self) -> bool {
        self == EncryptionMode::ClientSideKey
    }
}

impl Display for EncryptionMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EncryptionMode {
    type Err = TableError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        EncryptionMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| TableError::UnknownEncryptionMode(value.to_owned()))
    }
}

/// What to do about the table's key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPlan {
    /// No key is tracked (yet; storage may still generate one).
    None,
    /// Track the caller's key.
    Supplied(Key),
    /// Create a dedicated key, independent of the bucket.
    Create,
}

impl KeyPlan {
    /// The caller's key, if one was supplied.
    pub fn supplied(&self) -> Option<&Key> {
        match self {
            KeyPlan::Supplied(key) => Some(key),
            KeyPlan::None | KeyPlan::Create => None,
        }
    }
}

/// Outcome of [`resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEncryption {
    /// Effective mode.
    pub mode: EncryptionMode,
    /// Key decision.
    pub key: KeyPlan,
}

/// Validate and normalize the caller's encryption options.
///
/// Fails with [`TableError::ConfigConflict`] when a bucket is supplied along
/// with any mode other than [`EncryptionMode::ClientSideKey`]: a bucket's
/// encryption is fixed when it is created.
pub fn resolve(
    bucket: Option<&Bucket>,
    mode: Option<EncryptionMode>,
    key: Option<Key>,
) -> Result<ResolvedEncryption, TableError> {
    if let (Some(bucket), Some(mode)) = (bucket, mode) {
        if !mode.is_client_side() {
            return Err(TableError::ConfigConflict {
                mode,
                bucket: bucket.name.clone(),
            });
        }
    }

    let mode = mode.unwrap_or_default();
    let key = match (mode, key) {
        (_, Some(key)) => KeyPlan::Supplied(key),
        (EncryptionMode::ClientSideKey, None) => KeyPlan::Create,
        (_, None) => KeyPlan::None,
    };

    tracing::debug!(mode = %mode, key = ?key, "resolved table encryption");
    Ok(ResolvedEncryption { mode, key })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use testresult::TestResult;

    fn key() -> Key {
        Key::new("caller", "arn:aws:kms:us-east-1:123456789012:key/caller")
    }

    fn bucket() -> Bucket {
        Bucket::new("shared", "arn:aws:s3:::shared")
    }

    #[test]
    fn it_defaults_to_unmanaged_without_key() -> TestResult {
        let resolved = resolve(None, None, None)?;
        assert_eq!(
            resolved,
            ResolvedEncryption {
                mode: EncryptionMode::Unmanaged,
                key: KeyPlan::None,
            }
        );
        Ok(())
    }

    #[test]
    fn it_plans_a_key_for_client_side_encryption() -> TestResult {
        let resolved = resolve(None, Some(EncryptionMode::ClientSideKey), None)?;
        assert_eq!(resolved.key, KeyPlan::Create);
        Ok(())
    }

    #[test]
    fn it_passes_supplied_keys_through() -> TestResult {
        for mode in EncryptionMode::ALL {
            let resolved = resolve(None, Some(mode), Some(key()))?;
            assert_eq!(resolved.key, KeyPlan::Supplied(key()));
        }
        Ok(())
    }

    #[test]
    fn it_rejects_server_side_modes_for_supplied_buckets() {
        for mode in [
            EncryptionMode::Unmanaged,
            EncryptionMode::ManagedKey,
            EncryptionMode::CallerKey,
        ] {
            let result = resolve(Some(&bucket()), Some(mode), None);
            assert!(matches!(
                result,
                Err(TableError::ConfigConflict { mode: rejected, ref bucket })
                    if rejected == mode && bucket == "shared"
            ));
        }
    }

    #[test]
    fn it_accepts_client_side_mode_for_supplied_buckets() -> TestResult {
        let resolved = resolve(Some(&bucket()), Some(EncryptionMode::ClientSideKey), None)?;
        assert_eq!(resolved.mode, EncryptionMode::ClientSideKey);
        assert_eq!(resolved.key, KeyPlan::Create);
        Ok(())
    }

    #[test]
    fn it_accepts_supplied_buckets_without_mode() -> TestResult {
        let resolved = resolve(Some(&bucket()), None, Some(key()))?;
        assert_eq!(resolved.mode, EncryptionMode::Unmanaged);
        assert_eq!(resolved.key, KeyPlan::Supplied(key()));
        Ok(())
    }

    #[test]
    fn it_maps_modes_to_bucket_encryption() {
        assert_eq!(
            EncryptionMode::Unmanaged.bucket_encryption(),
            Some(BucketEncryption::S3Managed)
        );
        assert_eq!(
            EncryptionMode::ManagedKey.bucket_encryption(),
            Some(BucketEncryption::KmsManaged)
        );
        assert_eq!(
            EncryptionMode::CallerKey.bucket_encryption(),
            Some(BucketEncryption::Kms)
        );
        assert_eq!(EncryptionMode::ClientSideKey.bucket_encryption(), None);
    }

    #[test]
    fn it_parses_canonical_strings() -> TestResult {
        assert_eq!("CSE-KMS".parse::<EncryptionMode>()?, EncryptionMode::ClientSideKey);
        assert_eq!("sse-kms".parse::<EncryptionMode>()?, EncryptionMode::CallerKey);
        assert!(matches!(
            "AES".parse::<EncryptionMode>(),
            Err(TableError::UnknownEncryptionMode(_))
        ));

        let json = serde_json::to_string(&EncryptionMode::ManagedKey)?;
        assert_eq!(json, r#""SSE-KMS-MANAGED""#);
        Ok(())
    }
}
