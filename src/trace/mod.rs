//! Trace matching engine
//!
//! A trace declares the instrumentation items a flow is expected to emit and
//! how strictly: positional order enforcement, duplicate tolerance, and
//! optional escalation of failure to a hard runtime failure.
//!
//! ## Lifecycle
//!
//! ```text
//! register(trace) ──► start_trace_named(name) ──► log(item) ... ──► stop()
//!                         │                          │                 │
//!                         setup + listen             classifier        finalize
//!                         returns signals            updates state     returns report
//! ```
//!
//! Fired items flow one direction: application code logs items, the runner
//! forwards them to the classification state machine, the state machine
//! updates per-slot states and the aggregate run state, and the signals
//! notify any observers. On stop, a [`TraceReport`] is derived from the
//! finalized result.

mod definition;
mod item;
mod report;
mod result;
mod runner;
mod states;
mod tracer;

pub use definition::{SetupFn, Trace};
pub use item::TraceItem;
pub use report::TraceReport;
pub use result::{FiringRecord, SlotStatus, TraceStateChangedSignal};
pub use runner::{TraceItemLoggedSignal, TraceStarted};
pub use states::{TraceItemState, TraceState};
pub use tracer::Tracer;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_signal_reaches_outside_observers() {
        let mut tracer = Tracer::new();
        tracer.register(Trace::new(
            "observed",
            vec![TraceItem::new("event", "only")],
        ));

        let started = tracer.start_trace_named("observed").unwrap();
        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = std::sync::Arc::clone(&seen);
        started.state_changed.listen(move |state: &TraceState| {
            sink.lock().unwrap().push(*state);
        });

        tracer.log(TraceItem::new("event", "only"));
        let report = tracer.stop().unwrap();
        assert_eq!(report.final_state(), TraceState::Passed);

        let seen = seen.lock().unwrap();
        assert!(seen.contains(&TraceState::Passing));
        assert_eq!(seen.last(), Some(&TraceState::Passed));
    }

    #[test]
    fn test_item_signal_carries_every_firing() {
        let mut tracer = Tracer::new();
        tracer.register(Trace::new(
            "items",
            vec![TraceItem::new("event", "declared")],
        ));

        let started = tracer.start_trace_named("items").unwrap();
        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = std::sync::Arc::clone(&seen);
        started.item_logged.listen(move |item: &TraceItem| {
            sink.lock().unwrap().push(item.clone());
        });

        tracer.log(TraceItem::new("event", "declared"));
        tracer.log(TraceItem::new("event", "stray"));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1], TraceItem::new("event", "stray"));
    }
}
