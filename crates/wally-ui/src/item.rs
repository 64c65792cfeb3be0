//! Item data model for the combobox.
//!
//! Items are supplied wholesale by the consuming application (typically
//! deserialized from JSON) and replaced, never merged. Groups are derived
//! views and are never stored.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Group label used for items that carry no group key of their own.
pub const FALLBACK_GROUP_LABEL: &str = "Other";

/// The identifier of a combobox item.
///
/// Values are either strings or numbers, unique within a given item list.
/// The string form (via [`fmt::Display`]) participates in search filtering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComboValue {
    /// A numeric identifier.
    Number(i64),
    /// A string identifier.
    Text(String),
}

impl fmt::Display for ComboValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for ComboValue {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for ComboValue {
    fn from(n: i32) -> Self {
        Self::Number(n as i64)
    }
}

impl From<&str> for ComboValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ComboValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// One selectable candidate in the combobox.
///
/// `label` and `description` participate in search filtering; `metadata` is
/// passthrough data the engine never touches. Disabled items are skipped by
/// the rendering surfaces before any engine call is made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboItem {
    /// Unique identifier within the item list.
    pub value: ComboValue,
    /// Display text.
    pub label: String,
    /// Optional secondary text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// If true, the item cannot be focused or selected by the surfaces.
    #[serde(default)]
    pub disabled: bool,
    /// Optional grouping key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Open passthrough data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl ComboItem {
    /// Create a new item with a value and display label.
    pub fn new(value: impl Into<ComboValue>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            description: None,
            disabled: false,
            group: None,
            metadata: None,
        }
    }

    /// Set the secondary description text using builder pattern.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the grouping key using builder pattern.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Set the disabled flag using builder pattern.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Attach passthrough metadata using builder pattern.
    pub fn with_metadata(mut self, metadata: serde_json::Map<String, serde_json::Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// The group label this item buckets under.
    ///
    /// Items without a group key (or with an empty one) fall back to
    /// [`FALLBACK_GROUP_LABEL`].
    pub fn group_label(&self) -> &str {
        match self.group.as_deref() {
            Some(g) if !g.is_empty() => g,
            _ => FALLBACK_GROUP_LABEL,
        }
    }
}

/// A derived bucket of filtered items sharing a group label.
///
/// Groups are regenerated whenever the filtered view or the grouping key
/// changes; they are never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemGroup {
    /// The group label.
    pub label: String,
    /// The filtered items in this group, in filtered-view order.
    pub items: Vec<ComboItem>,
}
