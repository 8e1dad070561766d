//! Items captured during a logger session

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::value::TraceValue;

/// Optional properties logged along with an item
pub type LoggedItemProperties = BTreeMap<String, TraceValue>;

/// An item that was logged during a logger session
#[derive(Debug, Clone, Serialize)]
pub struct LoggedItem {
    /// The time at which this item was logged
    pub timestamp: DateTime<Utc>,

    /// The value that was logged
    pub value: TraceValue,

    /// An optional dictionary of properties logged along with this item
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<LoggedItemProperties>,
}

impl LoggedItem {
    pub(crate) fn new(value: TraceValue, properties: Option<LoggedItemProperties>) -> Self {
        Self {
            timestamp: Utc::now(),
            value,
            properties,
        }
    }
}
