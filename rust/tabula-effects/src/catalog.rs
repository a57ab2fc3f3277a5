//! Table definitions handed to the platform.
//!
//! These are flat attribute sets. The core assembles and validates them; the
//! platform persists them field for field.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Table type of every table whose data lives in an object store.
pub const EXTERNAL_TABLE: &str = "EXTERNAL_TABLE";

/// Rendered column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInput {
    /// Column name.
    pub name: String,
    /// Type input string (e.g. `array<string>`).
    #[serde(rename = "type")]
    pub type_string: String,
    /// Optional comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Serialization library of a table's data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerdeInfo {
    /// Fully qualified class name of the serialization library.
    pub serialization_library: String,
}

/// Where and how a table's data is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageDescriptor {
    /// `s3://{bucket}/{prefix}`.
    pub location: String,
    /// Whether the data is compressed.
    pub compressed: bool,
    /// Whether the data is stored in sub directories.
    pub stored_as_sub_directories: bool,
    /// Data columns.
    pub columns: Vec<ColumnInput>,
    /// Input format class name.
    pub input_format: String,
    /// Output format class name.
    pub output_format: String,
    /// Serialization library.
    pub serde_info: SerdeInfo,
    /// Free-form storage parameters, absent when none were given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<IndexMap<String, String>>,
}

/// A complete table definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInput {
    /// Catalog the database belongs to (usually the account id).
    pub catalog_id: String,
    /// Enclosing database.
    pub database_name: String,
    /// Physical table name.
    pub name: String,
    /// Table description.
    pub description: String,
    /// Partition columns, absent when the table is not partitioned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition_keys: Option<Vec<ColumnInput>>,
    /// Table parameters (`classification`, `has_encrypted_data`, ...).
    pub parameters: IndexMap<String, String>,
    /// Storage descriptor.
    pub storage_descriptor: StorageDescriptor,
    /// Always [`EXTERNAL_TABLE`].
    pub table_type: String,
}

impl TableInput {
    /// Names of the partition columns, in order.
    pub fn partition_key_names(&self) -> impl Iterator<Item = &str> {
        self.partition_keys
            .iter()
            .flatten()
            .map(|column| column.name.as_str())
    }
}

/// A partition index to add to an existing table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionIndexInput {
    /// Index name; the platform generates one when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
    /// Partition keys the index covers, in order.
    pub key_names: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use testresult::TestResult;

    #[test]
    fn it_serializes_columns_with_catalog_field_names() -> TestResult {
        let column = ColumnInput {
            name: "tags".into(),
            type_string: "array<string>".into(),
            comment: None,
        };

        assert_eq!(
            serde_json::to_value(&column)?,
            serde_json::json!({"name": "tags", "type": "array<string>"})
        );
        Ok(())
    }

    #[test]
    fn it_leaves_index_naming_to_the_platform() -> TestResult {
        let index: PartitionIndexInput =
            serde_json::from_str(r#"{"key_names": ["year", "month"]}"#)?;

        assert_eq!(index.index_name, None);
        assert_eq!(index.key_names, vec!["year", "month"]);
        assert_eq!(
            serde_json::to_string(&index)?,
            r#"{"key_names":["year","month"]}"#
        );
        Ok(())
    }
}
