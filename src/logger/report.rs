//! Report surface for logger sessions

use crate::error::Result;
use crate::logger::item::LoggedItem;
use crate::timefmt::format_timestamp;

/// A report of an item logger session
#[derive(Debug, Clone)]
pub struct ItemLoggerReport {
    logged_items: Vec<LoggedItem>,
}

impl ItemLoggerReport {
    /// Creates a report over the items captured during a session
    pub fn new(logged_items: Vec<LoggedItem>) -> Self {
        Self { logged_items }
    }

    /// The items logged during the session this report covers
    pub fn logged_items(&self) -> &[LoggedItem] {
        &self.logged_items
    }

    /// A multi-line rendering of every item logged during the session
    pub fn raw_log(&self) -> String {
        let entries = self
            .logged_items
            .iter()
            .map(|logged| {
                let properties = match &logged.properties {
                    Some(properties) => properties
                        .iter()
                        .map(|(key, value)| format!("{key}: {value}"))
                        .collect::<Vec<_>>()
                        .join("\n"),
                    None => "none".to_string(),
                };
                format!(
                    "{}\n---> timestamp: {},\n---> properties: {}",
                    logged.value,
                    format_timestamp(logged.timestamp),
                    properties
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            "\n========  Begin Item Logger Session  ========\n\
             \n\
             {entries}\n\
             \n\
             ========   End Item Logger Session   ========\n"
        )
    }

    /// Exports the session as JSON Lines, one logged item per line
    pub fn to_jsonl(&self) -> Result<String> {
        let mut lines = Vec::with_capacity(self.logged_items.len());
        for logged in &self.logged_items {
            lines.push(serde_json::to_string(logged)?);
        }
        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::item::LoggedItemProperties;
    use crate::value::TraceValue;

    fn session() -> Vec<LoggedItem> {
        let mut properties = LoggedItemProperties::new();
        properties.insert("screen".to_string(), TraceValue::from("signup"));
        vec![
            LoggedItem::new(TraceValue::from("tap"), Some(properties)),
            LoggedItem::new(TraceValue::from("swipe"), None),
        ]
    }

    #[test]
    fn test_raw_log_renders_values_and_properties() {
        let report = ItemLoggerReport::new(session());
        let raw = report.raw_log();

        assert!(raw.contains("Begin Item Logger Session"));
        assert!(raw.contains("tap"));
        assert!(raw.contains("screen: signup"));
        assert!(raw.contains("properties: none"));
    }

    #[test]
    fn test_jsonl_export_is_one_line_per_item() {
        let report = ItemLoggerReport::new(session());
        let jsonl = report.to_jsonl().unwrap();
        let lines: Vec<&str> = jsonl.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["value"], "tap");
        assert_eq!(first["properties"]["screen"], "signup");
    }

    #[test]
    fn test_empty_session_still_renders() {
        let report = ItemLoggerReport::new(Vec::new());
        assert!(report.raw_log().contains("Item Logger Session"));
        assert_eq!(report.to_jsonl().unwrap(), "");
    }
}
