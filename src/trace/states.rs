//! Trace and trace item states

use serde::Serialize;

/// The state of an active trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceState {
    /// We are waiting for our first matchable item to be fired
    Waiting,

    /// This trace is passing so far, but the trace isn't completed yet
    Passing,

    /// The trace has completed and all trace items were accounted for
    Passed,

    /// This trace has failed in some way; check its report for more information
    Failed,
}

impl TraceState {
    /// Get the stable string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TraceState::Waiting => "waiting",
            TraceState::Passing => "passing",
            TraceState::Passed => "passed",
            TraceState::Failed => "failed",
        }
    }

    /// A static description of what this state means, used in summary
    /// reports to help others understand the result
    pub fn describe(&self) -> &'static str {
        match self {
            TraceState::Waiting => {
                "waiting: We are waiting for our first matchable item to be fired"
            }
            TraceState::Passing => {
                "passing: This trace is passing so far, but the trace isn't completed yet"
            }
            TraceState::Passed => {
                "passed: The trace has completed and all trace items were accounted for"
            }
            TraceState::Failed => {
                "failed: This trace has failed in some way; check its report for more information"
            }
        }
    }

    /// Whether no further state transition is possible for this run
    pub fn is_terminal(&self) -> bool {
        matches!(self, TraceState::Failed)
    }
}

impl std::fmt::Display for TraceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The state of an item within an active trace
///
/// One enum covers both roles an item state plays: the per-slot state of the
/// definition's items to match, and the classification of each firing in the
/// tailing log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TraceItemState {
    /// The trace is running and this item is still waiting to be matched
    WaitingToBeMatched,

    /// This trace item was fired (and fired in the right order if the trace
    /// was enforcing order)
    Matched,

    /// This trace was enforcing order and this item was fired out-of-order
    OutOfOrder,

    /// The trace has completed and this trace item was unaccounted for
    Missing,

    /// Did not find this item in the trace's items to match, so it was ignored
    IgnoredNoMatch,

    /// This matched an item in the trace's items to match but we had already
    /// matched all necessary items of that kind, so it was ignored
    IgnoredButMatched,

    /// This was a repeat of an item we had already fully matched and this
    /// trace was enforcing no duplicates, so it failed
    Duplicate,

    /// A duplicate of this item was fired after it and this trace was
    /// enforcing no duplicates, so it failed
    HadDuplicates,
}

impl TraceItemState {
    /// Get the stable string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TraceItemState::WaitingToBeMatched => "waitingToBeMatched",
            TraceItemState::Matched => "matched",
            TraceItemState::OutOfOrder => "outOfOrder",
            TraceItemState::Missing => "missing",
            TraceItemState::IgnoredNoMatch => "ignoredNoMatch",
            TraceItemState::IgnoredButMatched => "ignoredButMatched",
            TraceItemState::Duplicate => "duplicate",
            TraceItemState::HadDuplicates => "hadDuplicates",
        }
    }

    /// The states worth explaining in a report legend (everything except the
    /// transient waiting state)
    pub fn reportable_states() -> [TraceItemState; 7] {
        [
            TraceItemState::Matched,
            TraceItemState::OutOfOrder,
            TraceItemState::Missing,
            TraceItemState::IgnoredNoMatch,
            TraceItemState::IgnoredButMatched,
            TraceItemState::Duplicate,
            TraceItemState::HadDuplicates,
        ]
    }

    /// Description used in summary reports to help others understand each
    /// state's meaning
    pub fn describe(&self) -> &'static str {
        match self {
            TraceItemState::WaitingToBeMatched => {
                "waitingToBeMatched: The trace is running and this item is still waiting to be matched"
            }
            TraceItemState::Matched => {
                "matched: This trace item was fired (and fired in the right order if the trace was enforcing order)"
            }
            TraceItemState::OutOfOrder => {
                "outOfOrder: This trace was enforcing order and this item was fired out-of-order"
            }
            TraceItemState::Missing => {
                "missing: The trace has completed and this trace item was unaccounted for"
            }
            TraceItemState::IgnoredNoMatch => {
                "ignoredNoMatch: Did not find this item in the trace's items to match, so it was ignored"
            }
            TraceItemState::IgnoredButMatched => {
                "ignoredButMatched: This matched an item in the trace's items to match but we had already matched all necessary items of that kind, so it was ignored"
            }
            TraceItemState::Duplicate => {
                "duplicate: This was a repeat of an item we had already fully matched and this trace was enforcing no duplicates, so it failed"
            }
            TraceItemState::HadDuplicates => {
                "hadDuplicates: A duplicate of this item was fired after it and this trace was enforcing no duplicates, so it failed"
            }
        }
    }
}

impl std::fmt::Display for TraceItemState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_names() {
        assert_eq!(TraceState::Waiting.as_str(), "waiting");
        assert_eq!(TraceState::Failed.as_str(), "failed");
        assert_eq!(TraceItemState::WaitingToBeMatched.as_str(), "waitingToBeMatched");
        assert_eq!(TraceItemState::IgnoredButMatched.as_str(), "ignoredButMatched");
        assert_eq!(TraceItemState::HadDuplicates.as_str(), "hadDuplicates");
    }

    #[test]
    fn test_descriptions_lead_with_the_name() {
        for state in [
            TraceState::Waiting,
            TraceState::Passing,
            TraceState::Passed,
            TraceState::Failed,
        ] {
            assert!(state.describe().starts_with(state.as_str()));
        }
        for state in TraceItemState::reportable_states() {
            assert!(state.describe().starts_with(state.as_str()));
        }
    }

    #[test]
    fn test_only_failed_is_terminal() {
        assert!(TraceState::Failed.is_terminal());
        assert!(!TraceState::Waiting.is_terminal());
        assert!(!TraceState::Passing.is_terminal());
        assert!(!TraceState::Passed.is_terminal());
    }

    #[test]
    fn test_serialized_names_match_as_str() {
        let json = serde_json::to_value(TraceItemState::OutOfOrder).unwrap();
        assert_eq!(json, serde_json::json!("outOfOrder"));
        let json = serde_json::to_value(TraceState::Passing).unwrap();
        assert_eq!(json, serde_json::json!("passing"));
    }
}
