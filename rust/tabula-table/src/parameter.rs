//! Storage descriptor parameters.

use crate::TableError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A single `key = value` storage parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageParameter {
    /// Parameter key.
    pub key: String,
    /// Parameter value.
    pub value: String,
}

/// Compression applied to the table's data files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionType {
    /// Uncompressed.
    None,
    /// Snappy.
    Snappy,
    /// Gzip.
    Gzip,
    /// Bzip2.
    Bzip2,
}

impl Display for CompressionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            CompressionType::None => "none",
            CompressionType::Snappy => "snappy",
            CompressionType::Gzip => "gzip",
            CompressionType::Bzip2 => "bzip2",
        })
    }
}

impl StorageParameter {
    /// A parameter with an arbitrary key.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Alias of [`StorageParameter::new`] for keys without a named constructor.
    pub fn custom(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, value)
    }

    /// Number of header lines to skip in text files.
    pub fn skip_header_line_count(count: u32) -> Self {
        Self::new("skip.header.line.count", count.to_string())
    }

    /// Compression of the data files.
    pub fn compression_type(compression: CompressionType) -> Self {
        Self::new("compression_type", compression.to_string())
    }

    /// Whether writers may write in parallel.
    pub fn write_parallel(enabled: bool) -> Self {
        Self::new("write.parallel", if enabled { "on" } else { "off" })
    }
}

/// Assemble parameters into an insertion-ordered map.
///
/// Fails on the first key seen twice.
pub fn assemble(parameters: &[StorageParameter]) -> Result<IndexMap<String, String>, TableError> {
    let mut assembled = IndexMap::with_capacity(parameters.len());
    for StorageParameter { key, value } in parameters {
        if assembled.insert(key.clone(), value.clone()).is_some() {
            return Err(TableError::DuplicateParameterKey(key.clone()));
        }
    }
    Ok(assembled)
}
