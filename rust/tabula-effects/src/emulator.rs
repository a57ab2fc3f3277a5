//! In-memory emulator of every collaborator.
//!
//! [`Emulator`] implements [`Platform`], [`StorageService`], [`KeyService`]
//! and [`StatementSink`] against in-memory state, and records every request
//! it receives so tests can assert on what the core asked for. It enforces
//! the same rules a real backend would (name collisions, partition index
//! validation, bucket encryption/key consistency).

use crate::PlatformError;
use crate::catalog::{PartitionIndexInput, TableInput};
use crate::dns::KeySigningKeyInput;
use crate::key::{Key, KeyService};
use crate::platform::{Environment, LocatorParts, Platform, ResourceHandle, Scope};
use crate::storage::{Bucket, BucketEncryption, BucketSettings, StorageService};
use indexmap::IndexMap;
use tabula_capability::{Locator, Statement, StatementSink};

/// Most partition indexes a single table accepts.
pub const MAX_PARTITION_INDEXES: usize = 3;

/// A bucket creation request as received by the emulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketRequest {
    /// Where the bucket was requested.
    pub scope: Scope,
    /// Settings it was requested with.
    pub settings: Option<BucketSettings>,
}

/// In-memory collaborator for tests.
#[derive(Debug)]
pub struct Emulator {
    environment: Environment,
    tables: IndexMap<Locator, TableInput>,
    indexes: IndexMap<Locator, Vec<PartitionIndexInput>>,
    bucket_requests: Vec<BucketRequest>,
    buckets: Vec<Bucket>,
    keys: Vec<Key>,
    key_signing_keys: Vec<KeySigningKeyInput>,
    attached: Vec<Statement>,
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new(Environment::new("aws", "us-east-1", "123456789012"))
    }
}

impl Emulator {
    /// Create an emulator provisioning into `environment`.
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            tables: IndexMap::new(),
            indexes: IndexMap::new(),
            bucket_requests: Vec::new(),
            buckets: Vec::new(),
            keys: Vec::new(),
            key_signing_keys: Vec::new(),
            attached: Vec::new(),
        }
    }

    /// Table persisted under `locator`.
    pub fn table(&self, locator: &Locator) -> Option<&TableInput> {
        self.tables.get(locator)
    }

    /// Every persisted table, in creation order.
    pub fn tables(&self) -> impl Iterator<Item = &TableInput> {
        self.tables.values()
    }

    /// Partition indexes of the table under `locator`, names resolved.
    pub fn partition_indexes(&self, locator: &Locator) -> &[PartitionIndexInput] {
        self.indexes.get(locator).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every bucket creation request, including rejected ones.
    pub fn bucket_requests(&self) -> &[BucketRequest] {
        &self.bucket_requests
    }

    /// Buckets created so far.
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// Keys created so far, including keys generated for buckets.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Key signing keys created so far.
    pub fn key_signing_keys(&self) -> &[KeySigningKeyInput] {
        &self.key_signing_keys
    }

    /// Statements attached through [`StatementSink`].
    pub fn attached(&self) -> &[Statement] {
        &self.attached
    }

    fn physical_name(scope: &Scope) -> String {
        scope
            .segments()
            .iter()
            .map(|segment| segment.to_lowercase())
            .collect::<Vec<_>>()
            .join("-")
    }

    fn validate_index(
        table: &TableInput,
        existing: &[PartitionIndexInput],
        name: &str,
        index: &PartitionIndexInput,
    ) -> Result<(), PlatformError> {
        let invalid = |reason: String| PlatformError::InvalidIndexDefinition {
            index: name.to_owned(),
            reason,
        };

        if existing.len() >= MAX_PARTITION_INDEXES {
            return Err(invalid(format!(
                "a table supports at most {MAX_PARTITION_INDEXES} partition indexes"
            )));
        }
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(invalid(
                "index names may only contain alphanumerics, '_' and '-'".into(),
            ));
        }
        if index.key_names.is_empty() {
            return Err(invalid("an index needs at least one key".into()));
        }
        if let Some(unknown) = index
            .key_names
            .iter()
            .find(|key| !table.partition_key_names().any(|column| column == key.as_str()))
        {
            return Err(invalid(format!("'{unknown}' is not a partition key")));
        }
        if existing
            .iter()
            .any(|other| other.index_name.as_deref() == Some(name))
        {
            return Err(invalid("an index with this name already exists".into()));
        }
        Ok(())
    }
}

impl Platform for Emulator {
    fn environment(&self) -> &Environment {
        &self.environment
    }

    fn allocate_name(&mut self, scope: &Scope) -> String {
        Self::physical_name(scope).replace('-', "_")
    }

    fn create_table(
        &mut self,
        scope: &Scope,
        input: &TableInput,
    ) -> Result<ResourceHandle, PlatformError> {
        let locator = self.format_locator(LocatorParts {
            service: "glue",
            resource: "table",
            resource_name: &format!("{}/{}", input.database_name, input.name),
        });
        if self.tables.contains_key(&locator) {
            return Err(PlatformError::NameCollision(input.name.clone()));
        }

        tracing::debug!(scope = %scope, table = %locator, "emulating table creation");
        self.tables.insert(locator.clone(), input.clone());
        Ok(ResourceHandle {
            id: input.name.clone(),
            locator,
        })
    }

    fn add_partition_index(
        &mut self,
        table: &ResourceHandle,
        index: &PartitionIndexInput,
    ) -> Result<(), PlatformError> {
        let input = self
            .tables
            .get(&table.locator)
            .ok_or_else(|| PlatformError::Backend(format!("no table at {}", table.locator)))?;
        let name = index
            .index_name
            .clone()
            .unwrap_or_else(|| format!("{}-index", index.key_names.join("-")));
        let existing = self.partition_indexes(&table.locator);

        Self::validate_index(input, existing, &name, index)?;

        tracing::debug!(table = %table.locator, index = %name, "emulating partition index");
        self.indexes
            .entry(table.locator.clone())
            .or_default()
            .push(PartitionIndexInput {
                index_name: Some(name),
                key_names: index.key_names.clone(),
            });
        Ok(())
    }

    fn create_key_signing_key(
        &mut self,
        scope: &Scope,
        input: &KeySigningKeyInput,
    ) -> Result<ResourceHandle, PlatformError> {
        if self
            .key_signing_keys
            .iter()
            .any(|other| other.hosted_zone_id == input.hosted_zone_id && other.name == input.name)
        {
            return Err(PlatformError::NameCollision(input.name.clone()));
        }

        let id = format!("{}|{}", input.hosted_zone_id, input.name);
        tracing::debug!(scope = %scope, id = %id, "emulating key signing key creation");
        self.key_signing_keys.push(input.clone());
        Ok(ResourceHandle {
            locator: self.format_locator(LocatorParts {
                service: "route53",
                resource: "keysigningkey",
                resource_name: &id,
            }),
            id,
        })
    }
}

impl KeyService for Emulator {
    fn create(&mut self, scope: &Scope) -> Result<Key, PlatformError> {
        let id = Self::physical_name(scope);
        if self.keys.iter().any(|key| key.id == id) {
            return Err(PlatformError::NameCollision(id));
        }

        let key = Key::new(
            id.clone(),
            self.format_locator(LocatorParts {
                service: "kms",
                resource: "key",
                resource_name: &id,
            }),
        );
        tracing::debug!(scope = %scope, key = %key.locator, "emulating key creation");
        self.keys.push(key.clone());
        Ok(key)
    }
}

impl StorageService for Emulator {
    fn create(
        &mut self,
        scope: &Scope,
        settings: Option<BucketSettings>,
    ) -> Result<Bucket, PlatformError> {
        self.bucket_requests.push(BucketRequest {
            scope: scope.clone(),
            settings: settings.clone(),
        });

        let name = Self::physical_name(scope);
        if self.buckets.iter().any(|bucket| bucket.name == name) {
            return Err(PlatformError::NameCollision(name));
        }

        let encryption_key = match &settings {
            None => None,
            Some(BucketSettings {
                encryption: BucketEncryption::Kms,
                encryption_key: Some(key),
            }) => Some(key.clone()),
            Some(BucketSettings {
                encryption: BucketEncryption::Kms,
                encryption_key: None,
            }) => Some(KeyService::create(self, &scope.child("Key"))?),
            Some(BucketSettings {
                encryption,
                encryption_key: Some(_),
            }) => {
                return Err(PlatformError::Backend(format!(
                    "an encryption key was given, so encryption must be Kms (got {encryption:?})"
                )));
            }
            Some(BucketSettings {
                encryption_key: None,
                ..
            }) => None,
        };

        let bucket = Bucket {
            locator: Locator::new(format!("arn:{}:s3:::{}", self.environment.partition, name)),
            name,
            encryption: settings.map(|settings| settings.encryption),
            encryption_key,
        };
        tracing::debug!(scope = %scope, bucket = %bucket.locator, "emulating bucket creation");
        self.buckets.push(bucket.clone());
        Ok(bucket)
    }
}

impl StatementSink for Emulator {
    type Error = PlatformError;

    fn attach(&mut self, statement: &Statement) -> Result<(), Self::Error> {
        self.attached.push(statement.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{EXTERNAL_TABLE, ColumnInput, SerdeInfo, StorageDescriptor};
    use pretty_assertions::assert_eq;
    use testresult::TestResult;

    fn table_input(name: &str, partition_keys: &[&str]) -> TableInput {
        TableInput {
            catalog_id: "123456789012".into(),
            database_name: "analytics".into(),
            name: name.into(),
            description: format!("{name} table"),
            partition_keys: Some(
                partition_keys
                    .iter()
                    .map(|key| ColumnInput {
                        name: (*key).into(),
                        type_string: "string".into(),
                        comment: None,
                    })
                    .collect(),
            ),
            parameters: IndexMap::new(),
            storage_descriptor: StorageDescriptor {
                location: "s3://bucket/".into(),
                compressed: false,
                stored_as_sub_directories: false,
                columns: Vec::new(),
                input_format: "input".into(),
                output_format: "output".into(),
                serde_info: SerdeInfo {
                    serialization_library: "serde".into(),
                },
                parameters: None,
            },
            table_type: EXTERNAL_TABLE.into(),
        }
    }

    #[test]
    fn it_rejects_duplicate_tables() -> TestResult {
        let mut emulator = Emulator::default();
        let scope = Scope::root("Stack").child("Events");

        emulator.create_table(&scope, &table_input("events", &[]))?;
        assert_eq!(
            emulator.create_table(&scope, &table_input("events", &[])),
            Err(PlatformError::NameCollision("events".into()))
        );
        Ok(())
    }

    #[test]
    fn it_generates_a_key_for_kms_buckets_without_one() -> TestResult {
        let mut emulator = Emulator::default();
        let bucket = StorageService::create(
            &mut emulator,
            &Scope::root("Stack").child("Bucket"),
            Some(BucketSettings {
                encryption: BucketEncryption::Kms,
                encryption_key: None,
            }),
        )?;

        assert_eq!(bucket.encryption_key.as_ref(), emulator.keys().first());
        assert_eq!(bucket.locator, "arn:aws:s3:::stack-bucket");
        Ok(())
    }

    #[test]
    fn it_rejects_keys_for_non_kms_buckets() {
        let mut emulator = Emulator::default();
        let result = StorageService::create(
            &mut emulator,
            &Scope::root("Stack").child("Bucket"),
            Some(BucketSettings {
                encryption: BucketEncryption::S3Managed,
                encryption_key: Some(Key::new("k", "arn:aws:kms:us-east-1:123456789012:key/k")),
            }),
        );

        assert!(matches!(result, Err(PlatformError::Backend(_))));
        assert_eq!(emulator.bucket_requests().len(), 1);
        assert!(emulator.buckets().is_empty());
    }

    #[test]
    fn it_validates_partition_indexes() -> TestResult {
        let mut emulator = Emulator::default();
        let handle = emulator.create_table(
            &Scope::root("Stack").child("Events"),
            &table_input("events", &["year", "month"]),
        )?;

        emulator.add_partition_index(
            &handle,
            &PartitionIndexInput {
                index_name: None,
                key_names: vec!["year".into()],
            },
        )?;
        assert_eq!(
            emulator.partition_indexes(&handle.locator)[0].index_name.as_deref(),
            Some("year-index")
        );

        let unknown = emulator.add_partition_index(
            &handle,
            &PartitionIndexInput {
                index_name: Some("by_day".into()),
                key_names: vec!["day".into()],
            },
        );
        assert!(matches!(
            unknown,
            Err(PlatformError::InvalidIndexDefinition { ref index, .. }) if index == "by_day"
        ));

        let duplicate = emulator.add_partition_index(
            &handle,
            &PartitionIndexInput {
                index_name: Some("year-index".into()),
                key_names: vec!["year".into()],
            },
        );
        assert!(matches!(
            duplicate,
            Err(PlatformError::InvalidIndexDefinition { .. })
        ));
        Ok(())
    }

    #[test]
    fn it_caps_partition_indexes_per_table() -> TestResult {
        let mut emulator = Emulator::default();
        let handle = emulator.create_table(
            &Scope::root("Stack").child("Events"),
            &table_input("events", &["year", "month", "day", "hour"]),
        )?;

        for key in ["year", "month", "day"] {
            emulator.add_partition_index(
                &handle,
                &PartitionIndexInput {
                    index_name: None,
                    key_names: vec![key.into()],
                },
            )?;
        }

        let result = emulator.add_partition_index(
            &handle,
            &PartitionIndexInput {
                index_name: None,
                key_names: vec!["hour".into()],
            },
        );
        assert!(matches!(
            result,
            Err(PlatformError::InvalidIndexDefinition { .. })
        ));
        Ok(())
    }
}
