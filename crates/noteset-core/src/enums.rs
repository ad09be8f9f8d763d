//! Policy and outcome enums for Noteset.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// CreatePolicy
// ---------------------------------------------------------------------------

/// Whether a submission may bring rows into existence.
///
/// ```text
/// disabled: id required; upsert of an absent id is a no-op (update only)
/// enabled:  id optional; id-less entries are created, absent ids inserted
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum CreatePolicy {
    #[default]
    Disabled,
    Enabled,
}

impl CreatePolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Enabled => "enabled",
        }
    }

    #[must_use]
    pub const fn allows_create(self) -> bool {
        matches!(self, Self::Enabled)
    }
}

impl fmt::Display for CreatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RowOp
// ---------------------------------------------------------------------------

/// A single-row store operation issued while applying a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RowOp {
    Delete,
    Upsert,
    Create,
}

impl RowOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Upsert => "upsert",
            Self::Create => "create",
        }
    }
}

impl fmt::Display for RowOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SubmitStatus
// ---------------------------------------------------------------------------

/// Status tag carried by boundary responses that have a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SubmitStatus {
    /// A list intent was processed; nothing was written.
    Idle,
    /// Validation failed; nothing was written.
    Error,
    /// Some row operations failed.
    Partial,
    /// The submission could not be applied at all.
    Failed,
}

impl SubmitStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Error => "error",
            Self::Partial => "partial",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for SubmitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
