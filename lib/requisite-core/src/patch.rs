//! JSON-Patch (RFC 6902) operations sent as PATCH bodies.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of JSON-Patch operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    /// Add a value.
    Add,
    /// Remove a value.
    Remove,
    /// Replace a value.
    Replace,
    /// Move a value from `from` to `path`.
    Move,
    /// Copy a value from `from` to `path`.
    Copy,
    /// Assert that `path` holds `value`.
    Test,
}

/// A single JSON-Patch operation.
///
/// # Example
///
/// ```
/// use requisite_core::PatchOperation;
///
/// let ops = [PatchOperation::add("/tags", true)];
/// let json = serde_json::to_string(&ops).expect("serialize");
/// assert_eq!(json, r#"[{"op":"add","path":"/tags","value":true}]"#);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOperation {
    /// Operation kind.
    pub op: PatchOp,
    /// JSON pointer to the target location.
    pub path: String,
    /// Operand for `add`, `replace` and `test`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Source location for `move` and `copy`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

impl PatchOperation {
    fn new(op: PatchOp, path: impl Into<String>) -> Self {
        Self {
            op,
            path: path.into(),
            value: None,
            from: None,
        }
    }

    /// `add` operation.
    #[must_use]
    pub fn add(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::new(PatchOp::Add, path)
        }
    }

    /// `remove` operation.
    #[must_use]
    pub fn remove(path: impl Into<String>) -> Self {
        Self::new(PatchOp::Remove, path)
    }

    /// `replace` operation.
    #[must_use]
    pub fn replace(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::new(PatchOp::Replace, path)
        }
    }

    /// `move` operation.
    #[must_use]
    pub fn move_to(from: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            from: Some(from.into()),
            ..Self::new(PatchOp::Move, path)
        }
    }

    /// `copy` operation.
    #[must_use]
    pub fn copy_to(from: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            from: Some(from.into()),
            ..Self::new(PatchOp::Copy, path)
        }
    }

    /// `test` operation.
    #[must_use]
    pub fn test(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::new(PatchOp::Test, path)
        }
    }
}
