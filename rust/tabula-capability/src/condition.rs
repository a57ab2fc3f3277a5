use crate::Locator;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Comparison applied by a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionOperator {
    /// Exact locator equality.
    ArnEquals,
    /// Boolean flag equality.
    Bool,
}

impl Display for ConditionOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ConditionOperator::ArnEquals => "ArnEquals",
            ConditionOperator::Bool => "Bool",
        };
        f.write_str(name)
    }
}

/// Value a condition key is compared against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    /// String (or locator) value.
    String(String),
    /// Boolean value.
    Bool(bool),
}

/// A guard attached to a statement: `operator(key, value)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Condition {
    /// The comparison.
    pub operator: ConditionOperator,
    /// The request attribute compared (e.g. `aws:SourceArn`).
    pub key: String,
    /// The expected value.
    pub value: ConditionValue,
}

impl Condition {
    /// Require the request attribute `key` to equal `locator` exactly.
    pub fn arn_equals(key: impl Into<String>, locator: &Locator) -> Self {
        Self {
            operator: ConditionOperator::ArnEquals,
            key: key.into(),
            value: ConditionValue::String(locator.as_str().to_owned()),
        }
    }

    /// Require the boolean request attribute `key` to equal `flag`.
    pub fn bool(key: impl Into<String>, flag: bool) -> Self {
        Self {
            operator: ConditionOperator::Bool,
            key: key.into(),
            value: ConditionValue::Bool(flag),
        }
    }
}
