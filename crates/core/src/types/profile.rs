//! Visitor profile records from the key-value store.

use serde::{Deserialize, Serialize};

use super::id::CategoryId;

/// Browsing signal recorded for a visitor.
///
/// Stored as JSON under the visitor's identity token. Both fields are
/// optional; an absent record is equivalent to `VisitorProfile::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorProfile {
    /// Most recently browsed category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    /// Display name of the most recently browsed category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
}
