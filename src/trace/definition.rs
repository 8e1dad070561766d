//! Declarative trace definitions

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::{Result, TraceError};
use crate::trace::item::TraceItem;

/// Zero-arg setup hook run once before a trace starts listening, e.g. to
/// put application state in place
pub type SetupFn = Arc<dyn Fn() + Send + Sync + 'static>;

/// A trace that can be registered, executed, and scored
///
/// Definitions are immutable value objects created once before a run. For
/// registry purposes two definitions are equal iff their names match; the
/// content of `items_to_match` is irrelevant to identity.
///
/// ```rust
/// use tracekit::{Trace, TraceItem};
///
/// let trace = Trace::new(
///     "signup-flow",
///     vec![
///         TraceItem::new("event", "signup_viewed"),
///         TraceItem::new("event", "signup_completed"),
///     ],
/// )
/// .with_enforce_order(true)
/// .with_setup_steps(vec!["Log out".to_string(), "Open the signup screen".to_string()]);
/// assert!(trace.validate().is_ok());
/// ```
#[derive(Clone)]
pub struct Trace {
    /// The display name of the trace (e.g. `signup-flow`); unique key for
    /// registration and lookup
    pub name: String,

    /// Whether to enforce the fired order of elements in `items_to_match`;
    /// defaults to `true`
    pub enforce_order: bool,

    /// Whether repeats of already-matched items are ignored harmlessly;
    /// defaults to `true`
    pub allow_duplicates: bool,

    /// Whether a transition into the failed state escalates to a hard
    /// runtime failure; defaults to `false`
    pub assert_on_failure: bool,

    /// The items to match against during an active trace; duplicates are
    /// allowed and each occurrence is a distinct slot
    pub items_to_match: Vec<TraceItem>,

    /// Optional setup steps rendered as a numbered list (i.e. pass these in
    /// without numbers)
    pub setup_steps: Option<Vec<String>>,

    /// Optional hook to execute arbitrary setup before the trace is run
    pub setup_fn: Option<SetupFn>,
}

impl Trace {
    /// Creates a trace with the default strictness: order enforced,
    /// duplicates allowed, no failure escalation
    pub fn new(name: impl Into<String>, items_to_match: Vec<TraceItem>) -> Self {
        Self {
            name: name.into(),
            enforce_order: true,
            allow_duplicates: true,
            assert_on_failure: false,
            items_to_match,
            setup_steps: None,
            setup_fn: None,
        }
    }

    /// Sets whether fired order is enforced
    pub fn with_enforce_order(mut self, enforce_order: bool) -> Self {
        self.enforce_order = enforce_order;
        self
    }

    /// Sets whether repeats of matched items are ignored harmlessly
    pub fn with_allow_duplicates(mut self, allow_duplicates: bool) -> Self {
        self.allow_duplicates = allow_duplicates;
        self
    }

    /// Sets whether a failed state escalates to a hard runtime failure
    pub fn with_assert_on_failure(mut self, assert_on_failure: bool) -> Self {
        self.assert_on_failure = assert_on_failure;
        self
    }

    /// Attaches human-readable setup steps
    pub fn with_setup_steps(mut self, setup_steps: Vec<String>) -> Self {
        self.setup_steps = Some(setup_steps);
        self
    }

    /// Attaches a setup hook run once before listening begins
    pub fn with_setup<F>(mut self, setup: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.setup_fn = Some(Arc::new(setup));
        self
    }

    /// Returns a numbered list of the setup steps, or `None` when there are
    /// no steps to show
    pub fn setup_steps_as_list(&self) -> Option<String> {
        let steps = self.setup_steps.as_ref()?;
        if steps.is_empty() {
            return None;
        }
        let mut list = String::from("Setup steps:\n\n");
        for (index, step) in steps.iter().enumerate() {
            list.push_str(&format!("{}. {}\n", index + 1, step));
        }
        Some(list)
    }

    /// Checks the definition is runnable; a trace with no items to match is
    /// a misuse of the API
    pub fn validate(&self) -> Result<()> {
        if self.items_to_match.is_empty() {
            return Err(TraceError::EmptyItemsToMatch {
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trace")
            .field("name", &self.name)
            .field("enforce_order", &self.enforce_order)
            .field("allow_duplicates", &self.allow_duplicates)
            .field("assert_on_failure", &self.assert_on_failure)
            .field("items_to_match", &self.items_to_match)
            .field("setup_steps", &self.setup_steps)
            .field("setup_fn", &self.setup_fn.as_ref().map(|_| "<closure>"))
            .finish()
    }
}

impl PartialEq for Trace {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Trace {}

impl Hash for Trace {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn items() -> Vec<TraceItem> {
        vec![TraceItem::new("event", "a"), TraceItem::new("event", "b")]
    }

    #[test]
    fn test_defaults() {
        let trace = Trace::new("defaults", items());
        assert!(trace.enforce_order);
        assert!(trace.allow_duplicates);
        assert!(!trace.assert_on_failure);
        assert!(trace.setup_steps.is_none());
        assert!(trace.setup_fn.is_none());
    }

    #[test]
    fn test_equality_is_by_name_only() {
        let lhs = Trace::new("same", items());
        let rhs = Trace::new("same", vec![TraceItem::new("event", "entirely-different")]);
        assert_eq!(lhs, rhs);
        assert_ne!(lhs, Trace::new("other", items()));
    }

    #[test]
    fn test_setup_steps_as_numbered_list() {
        let trace = Trace::new("setup", items())
            .with_setup_steps(vec!["Log out".to_string(), "Open signup".to_string()]);
        let list = trace.setup_steps_as_list().unwrap();
        assert!(list.starts_with("Setup steps:"));
        assert!(list.contains("1. Log out"));
        assert!(list.contains("2. Open signup"));
    }

    #[test]
    fn test_setup_steps_absent_or_empty_renders_nothing() {
        assert!(Trace::new("none", items()).setup_steps_as_list().is_none());
        let empty = Trace::new("empty", items()).with_setup_steps(Vec::new());
        assert!(empty.setup_steps_as_list().is_none());
    }

    #[test]
    fn test_setup_fn_is_invocable() {
        let count = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&count);
        let trace = Trace::new("hook", items()).with_setup(move || {
            counted.fetch_add(1, Ordering::SeqCst);
        });

        let setup = trace.setup_fn.as_ref().unwrap();
        setup();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_validate_rejects_empty_items() {
        let err = Trace::new("empty", Vec::new()).validate().unwrap_err();
        assert!(err.to_string().contains("empty"));
        assert!(Trace::new("ok", items()).validate().is_ok());
    }
}
