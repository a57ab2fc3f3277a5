use crate::TableError;
use crate::encryption::{self, EncryptionMode};
use crate::parameter::{self, StorageParameter};
use crate::provision::{self, Dependents};
use crate::schema::{Column, DataFormat};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tabula_capability::Locator;
use tabula_effects::catalog::{
    EXTERNAL_TABLE, PartitionIndexInput, SerdeInfo, StorageDescriptor, TableInput,
};
use tabula_effects::key::{Key, KeyService};
use tabula_effects::platform::{LocatorParts, Platform, ResourceHandle, Scope};
use tabula_effects::storage::{Bucket, StorageService};

/// Table parameter carrying the data format's classification.
pub const CLASSIFICATION: &str = "classification";

/// Table parameter flagging encrypted data. Informational only.
pub const HAS_ENCRYPTED_DATA: &str = "has_encrypted_data";

/// Table parameter enabling partition filtering.
pub const PARTITION_FILTERING: &str = "partition_filtering.enabled";

/// The database a table is registered in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    /// Database name.
    pub name: String,
    /// Catalog the database belongs to (usually the account id).
    pub catalog_id: String,
}

impl Database {
    /// Reference an existing database.
    pub fn new(name: impl Into<String>, catalog_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            catalog_id: catalog_id.into(),
        }
    }
}

/// A secondary index over partition keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionIndex {
    /// Index name; the platform generates one when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
    /// Partition keys covered, in order.
    pub key_names: Vec<String>,
}

impl PartitionIndex {
    /// An unnamed index over `key_names`.
    pub fn new<K: Into<String>>(key_names: impl IntoIterator<Item = K>) -> Self {
        Self {
            index_name: None,
            key_names: key_names.into_iter().map(Into::into).collect(),
        }
    }

    /// A named index over `key_names`.
    pub fn named<K: Into<String>>(
        index_name: impl Into<String>,
        key_names: impl IntoIterator<Item = K>,
    ) -> Self {
        Self {
            index_name: Some(index_name.into()),
            ..Self::new(key_names)
        }
    }

    /// Render for the platform.
    pub fn to_input(&self) -> PartitionIndexInput {
        PartitionIndexInput {
            index_name: self.index_name.clone(),
            key_names: self.key_names.clone(),
        }
    }
}

/// Everything a [`Table`] is built from.
///
/// Can be written by hand, with [`TableProps::new`] and the `with_*` setters,
/// or read from JSON with [`TableProps::from_json`]. Omitted fields take their
/// defaults: no bucket (one is created), empty prefix, [`EncryptionMode::Unmanaged`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableProps {
    /// Enclosing database.
    pub database: Database,
    /// Physical name; allocated by the platform when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    /// Description; defaults to `"{name} generated by Tabula"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Data columns.
    pub columns: Vec<Column>,
    /// Partition columns.
    #[serde(default)]
    pub partition_keys: Vec<Column>,
    /// How the data is stored.
    pub data_format: DataFormat,
    /// Bucket to reuse instead of creating one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<Bucket>,
    /// Key prefix of the table's objects within the bucket.
    #[serde(default)]
    pub prefix: String,
    /// Encryption mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption: Option<EncryptionMode>,
    /// Caller-owned key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_key: Option<Key>,
    /// Whether the data is compressed.
    #[serde(default)]
    pub compressed: bool,
    /// Whether the data is stored in sub directories.
    #[serde(default)]
    pub stored_as_sub_directories: bool,
    /// Sets the partition filtering table parameter when given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_partition_filtering: Option<bool>,
    /// Extra table parameters.
    #[serde(default)]
    pub parameters: IndexMap<String, String>,
    /// Storage descriptor parameters; keys must be unique.
    #[serde(default)]
    pub storage_parameters: Vec<StorageParameter>,
    /// Partition indexes added once the table exists.
    #[serde(default)]
    pub partition_indexes: Vec<PartitionIndex>,
}

impl TableProps {
    /// Props with every optional field at its default.
    pub fn new(database: Database, columns: Vec<Column>, data_format: DataFormat) -> Self {
        Self {
            database,
            table_name: None,
            description: None,
            columns,
            partition_keys: Vec::new(),
            data_format,
            bucket: None,
            prefix: String::new(),
            encryption: None,
            encryption_key: None,
            compressed: false,
            stored_as_sub_directories: false,
            enable_partition_filtering: None,
            parameters: IndexMap::new(),
            storage_parameters: Vec::new(),
            partition_indexes: Vec::new(),
        }
    }

    /// Read props from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, TableError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the physical name.
    pub fn with_table_name(mut self, name: impl Into<String>) -> Self {
        self.table_name = Some(name.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the partition columns.
    pub fn with_partition_keys(mut self, partition_keys: Vec<Column>) -> Self {
        self.partition_keys = partition_keys;
        self
    }

    /// Reuse `bucket`.
    pub fn with_bucket(mut self, bucket: Bucket) -> Self {
        self.bucket = Some(bucket);
        self
    }

    /// Set the object key prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the encryption mode.
    pub fn with_encryption(mut self, mode: EncryptionMode) -> Self {
        self.encryption = Some(mode);
        self
    }

    /// Use a caller-owned key.
    pub fn with_encryption_key(mut self, key: Key) -> Self {
        self.encryption_key = Some(key);
        self
    }

    /// Mark the data as compressed.
    pub fn with_compressed(mut self, compressed: bool) -> Self {
        self.compressed = compressed;
        self
    }

    /// Mark the data as stored in sub directories.
    pub fn with_stored_as_sub_directories(mut self, stored: bool) -> Self {
        self.stored_as_sub_directories = stored;
        self
    }

    /// Enable or disable partition filtering.
    pub fn with_partition_filtering(mut self, enabled: bool) -> Self {
        self.enable_partition_filtering = Some(enabled);
        self
    }

    /// Add a table parameter.
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Add a storage parameter.
    pub fn with_storage_parameter(mut self, parameter: StorageParameter) -> Self {
        self.storage_parameters.push(parameter);
        self
    }

    /// Add a partition index.
    pub fn with_partition_index(mut self, index: PartitionIndex) -> Self {
        self.partition_indexes.push(index);
        self
    }
}

/// A catalog table whose data lives under a prefix of a bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
    locator: Locator,
    handle: ResourceHandle,
    database: Database,
    bucket: Bucket,
    prefix: String,
    encryption: EncryptionMode,
    encryption_key: Option<Key>,
    partition_indexes: Vec<PartitionIndex>,
}

impl Table {
    /// Build a table at `scope`.
    ///
    /// Validates the storage parameters and encryption options before any
    /// dependent is created, provisions the bucket and key, persists the table
    /// definition and finally adds the requested partition indexes.
    pub fn new<Env>(env: &mut Env, scope: &Scope, props: TableProps) -> Result<Self, TableError>
    where
        Env: Platform + StorageService + KeyService,
    {
        let storage_parameters = parameter::assemble(&props.storage_parameters)?;
        let resolved = encryption::resolve(
            props.bucket.as_ref(),
            props.encryption,
            props.encryption_key.clone(),
        )?;
        let Dependents {
            bucket,
            encryption,
            encryption_key,
        } = provision::provision(env, scope, props.bucket.clone(), resolved)?;

        let name = match &props.table_name {
            Some(name) => name.clone(),
            None => env.allocate_name(scope),
        };
        let input = render(&props, &name, &bucket, encryption, storage_parameters);
        let handle = env.create_table(scope, &input)?;
        let locator = env.format_locator(LocatorParts {
            service: "glue",
            resource: "table",
            resource_name: &format!("{}/{}", props.database.name, name),
        });

        tracing::info!(
            scope = %scope,
            table = %locator,
            location = %input.storage_descriptor.location,
            mode = %encryption,
            "created table"
        );

        let mut table = Table {
            name,
            locator,
            handle,
            database: props.database,
            bucket,
            prefix: props.prefix,
            encryption,
            encryption_key,
            partition_indexes: Vec::new(),
        };
        for index in props.partition_indexes {
            table.add_partition_index(env, index)?;
        }
        Ok(table)
    }

    /// Add a partition index to the table.
    ///
    /// Naming and key validation belong to the platform; its errors surface
    /// unchanged.
    pub fn add_partition_index(
        &mut self,
        platform: &mut impl Platform,
        index: PartitionIndex,
    ) -> Result<(), TableError> {
        platform.add_partition_index(&self.handle, &index.to_input())?;
        tracing::debug!(
            table = %self.locator,
            index = ?index.index_name,
            keys = ?index.key_names,
            "added partition index"
        );
        self.partition_indexes.push(index);
        Ok(())
    }

    /// Physical table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Table locator.
    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Handle returned by the platform.
    pub fn handle(&self) -> &ResourceHandle {
        &self.handle
    }

    /// Enclosing database.
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Bucket holding the data.
    pub fn bucket(&self) -> &Bucket {
        &self.bucket
    }

    /// Object key prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// `s3://{bucket}/{prefix}`.
    pub fn location(&self) -> String {
        self.bucket.url_for_object(&self.prefix)
    }

    /// Effective encryption mode.
    pub fn encryption(&self) -> EncryptionMode {
        self.encryption
    }

    /// Tracked key, if any.
    pub fn encryption_key(&self) -> Option<&Key> {
        self.encryption_key.as_ref()
    }

    /// Partition indexes added so far, in order.
    pub fn partition_indexes(&self) -> &[PartitionIndex] {
        &self.partition_indexes
    }

    /// Object key pattern covering the table's data.
    pub(crate) fn object_pattern(&self) -> String {
        format!("{}*", self.prefix)
    }
}

fn render(
    props: &TableProps,
    name: &str,
    bucket: &Bucket,
    encryption: EncryptionMode,
    storage_parameters: IndexMap<String, String>,
) -> TableInput {
    let mut parameters = IndexMap::new();
    if let Some(classification) = &props.data_format.classification {
        parameters.insert(CLASSIFICATION.to_owned(), classification.clone());
    }
    parameters.insert(
        HAS_ENCRYPTED_DATA.to_owned(),
        (encryption != EncryptionMode::Unmanaged).to_string(),
    );
    if let Some(enabled) = props.enable_partition_filtering {
        parameters.insert(PARTITION_FILTERING.to_owned(), enabled.to_string());
    }
    parameters.extend(props.parameters.clone());

    TableInput {
        catalog_id: props.database.catalog_id.clone(),
        database_name: props.database.name.clone(),
        name: name.to_owned(),
        description: props
            .description
            .clone()
            .unwrap_or_else(|| format!("{name} generated by Tabula")),
        partition_keys: (!props.partition_keys.is_empty())
            .then(|| props.partition_keys.iter().map(Column::to_input).collect()),
        parameters,
        storage_descriptor: StorageDescriptor {
            location: bucket.url_for_object(&props.prefix),
            compressed: props.compressed,
            stored_as_sub_directories: props.stored_as_sub_directories,
            columns: props.columns.iter().map(Column::to_input).collect(),
            input_format: props.data_format.input_format.clone(),
            output_format: props.data_format.output_format.clone(),
            serde_info: SerdeInfo {
                serialization_library: props.data_format.serialization_library.clone(),
            },
            parameters: (!storage_parameters.is_empty()).then_some(storage_parameters),
        },
        table_type: EXTERNAL_TABLE.to_owned(),
    }
}
