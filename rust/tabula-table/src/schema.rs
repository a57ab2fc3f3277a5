//! Column types and data formats.
//!
//! [`Schema`] builds [`Type`]s whose input strings are understood by the
//! catalog (`string`, `array<bigint>`, `struct<a:int,b:string>`, ...).
//! [`DataFormat`] names the input/output format classes and serialization
//! library the data is read and written with.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use tabula_effects::catalog::ColumnInput;

/// A column type, rendered as its catalog input string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Type(String);

impl Type {
    /// Wrap a raw type input string.
    pub fn new(input: impl Into<String>) -> Self {
        Self(input.into())
    }

    /// The input string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this type is not a primitive.
    pub fn is_composite(&self) -> bool {
        self.0.contains('<')
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Column type.
    #[serde(rename = "type")]
    pub column_type: Type,
    /// Optional comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Column {
    /// A column without comment.
    pub fn new(name: impl Into<String>, column_type: Type) -> Self {
        Self {
            name: name.into(),
            column_type,
            comment: None,
        }
    }

    /// Attach a comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Render for the catalog.
    pub fn to_input(&self) -> ColumnInput {
        ColumnInput {
            name: self.name.clone(),
            type_string: self.column_type.to_string(),
            comment: self.comment.clone(),
        }
    }
}

/// Constructors for every [`Type`] the catalog understands.
pub struct Schema;

impl Schema {
    /// `boolean`
    pub fn boolean() -> Type {
        Type::new("boolean")
    }

    /// `binary`
    pub fn binary() -> Type {
        Type::new("binary")
    }

    /// 64-bit signed integer.
    pub fn bigint() -> Type {
        Type::new("bigint")
    }

    /// `double`
    pub fn double() -> Type {
        Type::new("double")
    }

    /// `float`
    pub fn float() -> Type {
        Type::new("float")
    }

    /// 32-bit signed integer.
    pub fn integer() -> Type {
        Type::new("int")
    }

    /// 16-bit signed integer.
    pub fn smallint() -> Type {
        Type::new("smallint")
    }

    /// 8-bit signed integer.
    pub fn tinyint() -> Type {
        Type::new("tinyint")
    }

    /// Date in `YYYY-MM-DD` form.
    pub fn date() -> Type {
        Type::new("date")
    }

    /// `timestamp`
    pub fn timestamp() -> Type {
        Type::new("timestamp")
    }

    /// `string`
    pub fn string() -> Type {
        Type::new("string")
    }

    /// Fixed precision decimal, e.g. `decimal(10,2)`.
    pub fn decimal(precision: u32, scale: Option<u32>) -> Type {
        match scale {
            Some(scale) => Type::new(format!("decimal({precision},{scale})")),
            None => Type::new(format!("decimal({precision})")),
        }
    }

    /// Fixed length character data.
    pub fn char(length: u32) -> Type {
        Type::new(format!("char({length})"))
    }

    /// Variable length character data.
    pub fn varchar(length: u32) -> Type {
        Type::new(format!("varchar({length})"))
    }

    /// `array<item>`
    pub fn array(item: Type) -> Type {
        Type::new(format!("array<{item}>"))
    }

    /// `map<key,value>`. Keys must be primitive types.
    pub fn map(key: Type, value: Type) -> Type {
        Type::new(format!("map<{key},{value}>"))
    }

    /// `struct<name:type,...>`, with `COMMENT '...'` for commented columns.
    pub fn struct_(columns: &[Column]) -> Type {
        let fields = columns
            .iter()
            .map(|column| match &column.comment {
                Some(comment) => {
                    format!("{}:{} COMMENT '{comment}'", column.name, column.column_type)
                }
                None => format!("{}:{}", column.name, column.column_type),
            })
            .collect::<Vec<_>>()
            .join(",");
        Type::new(format!("struct<{fields}>"))
    }
}

/// How a table's data is read and written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataFormat {
    /// Input format class name.
    pub input_format: String,
    /// Output format class name.
    pub output_format: String,
    /// Serialization library class name.
    pub serialization_library: String,
    /// Value of the `classification` table parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
}

const TEXT_INPUT: &str = "org.apache.hadoop.mapred.TextInputFormat";
const TEXT_OUTPUT: &str = "org.apache.hadoop.hive.ql.io.HiveIgnoreKeyTextOutputFormat";

impl DataFormat {
    /// A custom format.
    pub fn new(
        input_format: impl Into<String>,
        output_format: impl Into<String>,
        serialization_library: impl Into<String>,
    ) -> Self {
        Self {
            input_format: input_format.into(),
            output_format: output_format.into(),
            serialization_library: serialization_library.into(),
            classification: None,
        }
    }

    /// Set the `classification` table parameter.
    pub fn with_classification(mut self, classification: impl Into<String>) -> Self {
        self.classification = Some(classification.into());
        self
    }

    fn text(serialization_library: &str, classification: &str) -> Self {
        Self::new(TEXT_INPUT, TEXT_OUTPUT, serialization_library)
            .with_classification(classification)
    }

    /// Apache Parquet.
    pub fn parquet() -> Self {
        Self::new(
            "org.apache.hadoop.hive.ql.io.parquet.MapredParquetInputFormat",
            "org.apache.hadoop.hive.ql.io.parquet.MapredParquetOutputFormat",
            "org.apache.hadoop.hive.ql.io.parquet.serde.ParquetHiveSerDe",
        )
        .with_classification("parquet")
    }

    /// Apache ORC.
    pub fn orc() -> Self {
        Self::new(
            "org.apache.hadoop.hive.ql.io.orc.OrcInputFormat",
            "org.apache.hadoop.hive.ql.io.orc.OrcOutputFormat",
            "org.apache.hadoop.hive.ql.io.orc.OrcSerde",
        )
        .with_classification("orc")
    }

    /// Newline delimited JSON.
    pub fn json() -> Self {
        Self::text("org.openx.data.jsonserde.JsonSerDe", "json")
    }

    /// Comma separated values.
    pub fn csv() -> Self {
        Self::text("org.apache.hadoop.hive.serde2.OpenCSVSerde", "csv")
    }

    /// Tab separated values.
    pub fn tsv() -> Self {
        Self::text("org.apache.hadoop.hive.serde2.lazy.LazySimpleSerDe", "csv")
    }

    /// Apache Avro.
    pub fn avro() -> Self {
        Self::new(
            "org.apache.hadoop.hive.ql.io.avro.AvroContainerInputFormat",
            "org.apache.hadoop.hive.ql.io.avro.AvroContainerOutputFormat",
            "org.apache.hadoop.hive.serde2.avro.AvroSerDe",
        )
        .with_classification("avro")
    }

    /// Apache web server logs.
    pub fn apache_logs() -> Self {
        Self::text("org.apache.hadoop.hive.serde2.RegexSerDe", "apache")
    }

    /// Logstash grok patterns.
    pub fn logstash() -> Self {
        Self::text("com.amazonaws.glue.serde.GrokSerDe", "logstash")
    }

    /// CloudTrail logs.
    pub fn cloudtrail_logs() -> Self {
        Self::new(
            "com.amazon.emr.cloudtrail.CloudTrailInputFormat",
            TEXT_OUTPUT,
            "com.amazon.emr.hive.serde.CloudTrailSerde",
        )
        .with_classification("cloudtrail")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn it_renders_composite_types() {
        let address = Schema::struct_(&[
            Column::new("street", Schema::string()),
            Column::new("zip", Schema::integer()).with_comment("postal code"),
        ]);

        assert_eq!(Schema::array(Schema::string()).as_str(), "array<string>");
        assert_eq!(
            Schema::map(Schema::string(), Schema::array(Schema::bigint())).as_str(),
            "map<string,array<bigint>>"
        );
        assert_eq!(
            address.as_str(),
            "struct<street:string,zip:int COMMENT 'postal code'>"
        );
        assert!(address.is_composite());
        assert!(!Schema::date().is_composite());
    }

    #[test]
    fn it_renders_parameterized_primitives() {
        assert_eq!(Schema::decimal(10, Some(2)).as_str(), "decimal(10,2)");
        assert_eq!(Schema::decimal(38, None).as_str(), "decimal(38)");
        assert_eq!(Schema::char(4).as_str(), "char(4)");
        assert_eq!(Schema::varchar(255).as_str(), "varchar(255)");
    }

    #[test]
    fn it_renders_columns_for_the_catalog() {
        let input = Column::new("tags", Schema::array(Schema::string()))
            .with_comment("free form")
            .to_input();

        assert_eq!(
            input,
            ColumnInput {
                name: "tags".into(),
                type_string: "array<string>".into(),
                comment: Some("free form".into()),
            }
        );
    }

    #[test]
    fn it_classifies_text_formats() {
        assert_eq!(DataFormat::tsv().classification.as_deref(), Some("csv"));
        assert_eq!(DataFormat::json().input_format, TEXT_INPUT);
        assert_eq!(DataFormat::parquet().classification.as_deref(), Some("parquet"));
        assert_eq!(
            DataFormat::new("in", "out", "serde").classification,
            None
        );
    }

    #[test]
    fn it_reads_columns_from_json() -> testresult::TestResult {
        let column: Column = serde_json::from_str(r#"{"name":"id","type":"bigint"}"#)?;
        assert_eq!(column, Column::new("id", Schema::bigint()));
        Ok(())
    }
}
