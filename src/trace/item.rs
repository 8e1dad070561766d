//! Individual matchable items within a trace

use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::value::TraceValue;

/// An individual item used within a trace execution
///
/// Each item pairs a category label (e.g. `event` or `user-property`) with
/// an equatable payload. The optional UX hint describes how to make the item
/// fire (e.g. "Tap the sign up button") and is purely presentational: it
/// never participates in equality, matching, or deduplication.
#[derive(Debug, Clone, Serialize)]
pub struct TraceItem {
    /// A display string representing the category of item, such as `event`
    /// or `user-property`
    pub category: String,

    /// The payload to match against during an active trace
    pub value: TraceValue,

    /// An optional hint for what action to take in the UI/UX to make this
    /// item fire
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ux_hint: Option<String>,
}

impl TraceItem {
    /// Creates an item with the given category and payload and no hint
    pub fn new(category: impl Into<String>, value: impl Into<TraceValue>) -> Self {
        Self {
            category: category.into(),
            value: value.into(),
            ux_hint: None,
        }
    }

    /// Attaches a UX hint describing how to make this item fire
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.ux_hint = Some(hint.into());
        self
    }
}

impl PartialEq for TraceItem {
    fn eq(&self, other: &Self) -> bool {
        self.category == other.category && self.value == other.value
    }
}

impl Eq for TraceItem {}

impl Hash for TraceItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Hash the rendered payload so heterogeneous kinds hash consistently
        // with their equality; the hint stays out of it
        self.category.hash(state);
        self.value.describe().hash(state);
    }
}

impl std::fmt::Display for TraceItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.category, self.value)
    }
}
