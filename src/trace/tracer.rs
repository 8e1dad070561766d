//! Registry and orchestrator for traces
//!
//! `Tracer` is the main interface for registering and running traces. At
//! most one trace is active at a time, system-wide; starting a second trace
//! while one runs is refused rather than queued or replaced. Construct one
//! `Tracer` per application context instead of holding global state.

use crate::trace::definition::Trace;
use crate::trace::item::TraceItem;
use crate::trace::report::TraceReport;
use crate::trace::runner::{TraceRunner, TraceStarted};

/// Main interface for registering and running traces
#[derive(Debug, Default)]
pub struct Tracer {
    registered: Vec<Trace>,
    current: Option<TraceRunner>,
}

impl Tracer {
    /// Creates a tracer with no registered traces
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the given trace so it can later be run or displayed in a
    /// list; do this before attempting to start it, e.g. at app launch
    ///
    /// Returns `false` (a no-op) if a trace with that name is already
    /// registered, otherwise `true`.
    pub fn register(&mut self, trace: Trace) -> bool {
        if self.registered.iter().any(|registered| registered.name == trace.name) {
            return false;
        }
        tracing::debug!(name = %trace.name, "trace registered");
        self.registered.push(trace);
        true
    }

    /// The registered traces, in registration order
    pub fn registered_traces(&self) -> &[Trace] {
        &self.registered
    }

    /// Whether a trace is currently active
    pub fn is_tracing(&self) -> bool {
        self.current.is_some()
    }

    /// Attempts to start the given trace, if it has been registered
    ///
    /// Note: this is a no-op returning `None` if a trace is already active.
    pub fn start_trace(&mut self, trace: &Trace) -> Option<TraceStarted> {
        self.start_named(&trace.name, false)
    }

    /// Attempts to start a trace by name, if it has been registered
    ///
    /// Returns `None` if no trace is registered by that name, or if another
    /// trace is already active; otherwise returns the [`TraceStarted`]
    /// handles to listen for trace changes.
    pub fn start_trace_named(&mut self, name: &str) -> Option<TraceStarted> {
        self.start_named(name, false)
    }

    /// Like [`start_trace_named`], but with hard-failure escalation
    /// suppressed for this run
    ///
    /// Intended for tool/UI-driven runs where an `assert_on_failure` trace
    /// should report instead of tearing down the host application session.
    ///
    /// [`start_trace_named`]: Tracer::start_trace_named
    pub fn start_trace_suppressed(&mut self, name: &str) -> Option<TraceStarted> {
        self.start_named(name, true)
    }

    /// Logs the given item; this is a no-op if no trace is active
    ///
    /// E.g. if you were tracing analytics calls, you'd fire this for events
    /// and user property changes and it would be compared against the trace
    /// currently being run.
    pub fn log(&self, item: TraceItem) {
        if let Some(runner) = &self.current {
            runner.log(item);
        }
    }

    /// Stops and clears the current trace
    ///
    /// Returns the report of the run, or `None` if no trace was active.
    pub fn stop(&mut self) -> Option<TraceReport> {
        let mut runner = self.current.take()?;
        Some(runner.stop())
    }

    fn start_named(&mut self, name: &str, suppress_escalation: bool) -> Option<TraceStarted> {
        if self.current.is_some() {
            tracing::warn!(name, "a trace is already active; start is a no-op");
            return None;
        }
        let trace = self
            .registered
            .iter()
            .find(|registered| registered.name == name)?
            .clone();

        let mut runner = TraceRunner::new(trace);
        let started = runner.start(suppress_escalation);
        self.current = Some(runner);
        Some(started)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::states::{TraceItemState, TraceState};

    fn item(value: &str) -> TraceItem {
        TraceItem::new("event", value)
    }

    fn flow_trace(name: &str) -> Trace {
        Trace::new(name, vec![item("viewed"), item("completed")])
    }

    #[test]
    fn test_register_refuses_duplicate_names() {
        let mut tracer = Tracer::new();
        assert!(tracer.register(flow_trace("signup")));
        assert!(!tracer.register(flow_trace("signup")));
        assert!(tracer.register(flow_trace("checkout")));
        assert_eq!(tracer.registered_traces().len(), 2);
    }

    #[test]
    fn test_start_unregistered_trace_returns_none() {
        let mut tracer = Tracer::new();
        assert!(tracer.start_trace_named("never-registered").is_none());
        assert!(!tracer.is_tracing());
    }

    #[test]
    fn test_only_one_trace_active_at_a_time() {
        let mut tracer = Tracer::new();
        tracer.register(flow_trace("first"));
        tracer.register(flow_trace("second"));

        assert!(tracer.start_trace_named("first").is_some());
        assert!(tracer.start_trace_named("second").is_none());

        // Stopping re-allows a new run
        assert!(tracer.stop().is_some());
        assert!(tracer.start_trace_named("second").is_some());
    }

    #[test]
    fn test_log_without_active_trace_is_a_no_op() {
        let tracer = Tracer::new();
        tracer.log(item("viewed"));
    }

    #[test]
    fn test_stop_without_active_trace_returns_none() {
        let mut tracer = Tracer::new();
        assert!(tracer.stop().is_none());
    }

    #[test]
    fn test_full_flow_produces_a_passed_report() {
        let mut tracer = Tracer::new();
        tracer.register(flow_trace("signup"));

        let started = tracer.start_trace_named("signup").expect("registered");
        assert_eq!(started.current_state, TraceState::Waiting);

        tracer.log(item("viewed"));
        tracer.log(item("completed"));

        let report = tracer.stop().expect("a trace was running");
        assert_eq!(report.trace_name(), "signup");
        assert_eq!(report.final_state(), TraceState::Passed);
        assert_eq!(report.slot_count(TraceItemState::Matched), 2);
        assert!(!tracer.is_tracing());
    }

    #[test]
    fn test_start_by_reference_uses_the_registered_definition() {
        let mut tracer = Tracer::new();
        let trace = flow_trace("by-ref");
        tracer.register(trace.clone());
        assert!(tracer.start_trace(&trace).is_some());
        assert!(tracer.is_tracing());
    }
}
