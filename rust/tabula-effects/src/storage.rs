//! Object storage collaborator.
//!
//! # Operations
//!
//! ```text
//! StorageService
//!   ├── create(scope, Option<BucketSettings>) → Bucket
//!   └── grant(bucket, grantee, Capability, path_scope) → Grant
//! ```
//!
//! Grants are always scoped to a key pattern under the bucket (e.g.
//! `data/*`), so a bucket shared between tables never hands out access to
//! objects outside the requested prefix.

use crate::PlatformError;
use crate::key::Key;
use crate::platform::Scope;
use serde::{Deserialize, Serialize};
use tabula_capability::{Action, Capability, Grant, Locator, Principal, Statement};

/// Object read actions.
pub const OBJECT_READ_ACTIONS: &[Action] = &[
    Action::from_static("s3:GetObject*"),
    Action::from_static("s3:GetBucket*"),
    Action::from_static("s3:List*"),
];

/// Object write actions.
pub const OBJECT_WRITE_ACTIONS: &[Action] = &[
    Action::from_static("s3:DeleteObject*"),
    Action::from_static("s3:PutObject"),
    Action::from_static("s3:PutObjectLegalHold"),
    Action::from_static("s3:PutObjectRetention"),
    Action::from_static("s3:PutObjectTagging"),
    Action::from_static("s3:PutObjectVersionTagging"),
    Action::from_static("s3:Abort*"),
];

/// Server-side encryption applied by the storage layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BucketEncryption {
    /// Encryption with a key managed by the storage service.
    S3Managed,
    /// Encryption with the key service's default key for the storage service.
    KmsManaged,
    /// Encryption with a caller-owned key; one is generated when none is given.
    Kms,
}

/// Settings applied when a bucket is created.
///
/// Encryption cannot be retrofitted onto an existing bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketSettings {
    /// Server-side encryption.
    pub encryption: BucketEncryption,
    /// Key used for `Kms` encryption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_key: Option<Key>,
}

/// A storage bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    /// Bucket name.
    pub name: String,
    /// Bucket locator.
    pub locator: Locator,
    /// Encryption the bucket was created with, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption: Option<BucketEncryption>,
    /// Key the bucket encrypts with, when it uses a caller-owned key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_key: Option<Key>,
}

impl Bucket {
    /// Reference an existing bucket.
    pub fn new(name: impl Into<String>, locator: impl Into<Locator>) -> Self {
        Self {
            name: name.into(),
            locator: locator.into(),
            encryption: None,
            encryption_key: None,
        }
    }

    /// `s3://{name}/{prefix}`.
    pub fn url_for_object(&self, prefix: &str) -> String {
        format!("s3://{}/{}", self.name, prefix)
    }
}

/// The object storage collaborator.
pub trait StorageService {
    /// Create a bucket at `scope`, with provider defaults when `settings` is
    /// `None`.
    fn create(
        &mut self,
        scope: &Scope,
        settings: Option<BucketSettings>,
    ) -> Result<Bucket, PlatformError>;

    /// Grant `grantee` the storage actions matching `capability` on the
    /// bucket and on objects matching `path_scope`.
    fn grant(
        &self,
        bucket: &Bucket,
        grantee: &Principal,
        capability: Capability,
        path_scope: &str,
    ) -> Grant {
        Grant::from(Statement::new(
            grantee.clone(),
            capability.actions(OBJECT_READ_ACTIONS, OBJECT_WRITE_ACTIONS),
            [bucket.locator.clone(), bucket.locator.objects(path_scope)],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_capability::Actions;

    #[test]
    fn it_keeps_object_tables_disjoint() {
        let read = Actions::from(OBJECT_READ_ACTIONS);
        assert!(read.is_disjoint(&Actions::from(OBJECT_WRITE_ACTIONS)));
    }

    #[test]
    fn it_renders_object_urls() {
        let bucket = Bucket::new("events", "arn:aws:s3:::events");
        assert_eq!(bucket.url_for_object("data/"), "s3://events/data/");
        assert_eq!(bucket.url_for_object(""), "s3://events/");
    }
}
