//! Generic item logger sessions

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::logger::item::{LoggedItem, LoggedItemProperties};
use crate::signal::{ListenerToken, Signal};
use crate::value::TraceValue;

/// A signal that fires any time an item is logged
pub type ItemLoggedSignal = Signal<LoggedItem>;

/// Main interface for the generic item logger, useful for capturing items
/// outside of running traces (e.g. everything an app session emits)
///
/// Unlike a trace there is nothing to match: every logged value is recorded
/// with a timestamp until the session is stopped.
pub struct ItemLogger {
    items: Arc<Mutex<Vec<LoggedItem>>>,
    item_logged: Arc<ItemLoggedSignal>,
    listener: Option<ListenerToken>,
}

impl ItemLogger {
    /// Creates a logger with no active session
    pub fn new() -> Self {
        Self {
            items: Arc::new(Mutex::new(Vec::new())),
            item_logged: Arc::new(ItemLoggedSignal::new()),
            listener: None,
        }
    }

    /// Starts listening for items to be logged
    ///
    /// Starting an already-active logger is idempotent and returns the same
    /// signal. Returns an [`ItemLoggedSignal`] that can also be listened to
    /// by outside observers.
    pub fn start(&mut self) -> Arc<ItemLoggedSignal> {
        if self.listener.is_some() {
            return Arc::clone(&self.item_logged);
        }

        let items = Arc::clone(&self.items);
        self.listener = Some(self.item_logged.listen(move |logged: &LoggedItem| {
            items
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(logged.clone());
        }));
        Arc::clone(&self.item_logged)
    }

    /// Whether a logging session is currently active
    pub fn is_logging(&self) -> bool {
        self.listener.is_some()
    }

    /// Logs the given value; this is a no-op if no session is active
    pub fn log(&self, value: TraceValue) {
        self.item_logged.fire(&LoggedItem::new(value, None));
    }

    /// Logs the given value along with a dictionary of properties; this is
    /// a no-op if no session is active
    pub fn log_with(&self, value: TraceValue, properties: LoggedItemProperties) {
        self.item_logged.fire(&LoggedItem::new(value, Some(properties)));
    }

    /// Stops the current session, removes the recording listener, and
    /// returns all items logged during it
    pub fn stop(&mut self) -> Vec<LoggedItem> {
        if let Some(listener) = self.listener.take() {
            self.item_logged.remove(listener);
        }
        self.lock_items().clone()
    }

    /// Removes all logged items from this session
    pub fn clear(&self) {
        self.lock_items().clear();
    }

    /// A snapshot of the items logged so far
    pub fn logged_items(&self) -> Vec<LoggedItem> {
        self.lock_items().clone()
    }

    fn lock_items(&self) -> MutexGuard<'_, Vec<LoggedItem>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ItemLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ItemLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemLogger")
            .field("logging", &self.is_logging())
            .field("logged_items", &self.lock_items().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_session_records_logged_values() {
        let mut logger = ItemLogger::new();
        logger.start();
        logger.log(TraceValue::from("first"));
        logger.log(TraceValue::from("second"));

        let items = logger.stop();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].value, TraceValue::from("first"));
        assert!(!logger.is_logging());
    }

    #[test]
    fn test_logging_without_a_session_records_nothing() {
        let logger = ItemLogger::new();
        logger.log(TraceValue::from("dropped"));
        assert!(logger.logged_items().is_empty());
    }

    #[test]
    fn test_start_twice_is_idempotent() {
        let mut logger = ItemLogger::new();
        logger.start();
        logger.start();
        logger.log(TraceValue::from("once"));
        // One recording listener, so the item is stored exactly once
        assert_eq!(logger.stop().len(), 1);
    }

    #[test]
    fn test_properties_are_recorded() {
        let mut logger = ItemLogger::new();
        logger.start();

        let mut properties = LoggedItemProperties::new();
        properties.insert("screen".to_string(), TraceValue::from("signup"));
        logger.log_with(TraceValue::from("tap"), properties);

        let items = logger.stop();
        let recorded = items[0].properties.as_ref().unwrap();
        assert_eq!(recorded["screen"], TraceValue::from("signup"));
    }

    #[test]
    fn test_clear_empties_the_session() {
        let mut logger = ItemLogger::new();
        logger.start();
        logger.log(TraceValue::from("gone"));
        logger.clear();
        assert!(logger.logged_items().is_empty());
    }

    #[test]
    fn test_outside_observers_see_the_signal() {
        let mut logger = ItemLogger::new();
        let signal = logger.start();

        let seen = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&seen);
        signal.listen(move |_: &LoggedItem| {
            counted.fetch_add(1, Ordering::SeqCst);
        });

        logger.log(TraceValue::from("observed"));
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }
}
