//! # Tracekit - declarative verification of instrumentation event flows
//!
//! Tracekit lets an application declare the sequence of instrumentation
//! events a flow must emit (a *trace*) and verify, at runtime or in
//! automated tests, that the events actually observed match that
//! expectation under configurable ordering and duplication rules. Use it to
//! catch regressions in analytics and event-firing logic, e.g. "the signup
//! flow must emit viewed → started → completed, in order, exactly once
//! each".
//!
//! ## Core Principle
//!
//! > A trace only passes when every declared item is accounted for.
//!
//! Failures are states, not exceptions: missing items, out-of-order items,
//! and disallowed duplicates flip the run to `failed` through the state
//! signal, and the caller decides what to do (optionally escalating to a
//! hard failure for test runs).
//!
//! ## Example
//!
//! ```rust
//! use tracekit::{Trace, TraceItem, TraceState, Tracer};
//!
//! let mut tracer = Tracer::new();
//! tracer.register(Trace::new(
//!     "signup-flow",
//!     vec![
//!         TraceItem::new("event", "signup_viewed"),
//!         TraceItem::new("event", "signup_started"),
//!         TraceItem::new("event", "signup_completed"),
//!     ],
//! ));
//!
//! let started = tracer.start_trace_named("signup-flow").expect("registered");
//! assert_eq!(started.current_state, TraceState::Waiting);
//!
//! // Fire the real events from the flow under test
//! tracer.log(TraceItem::new("event", "signup_viewed"));
//! tracer.log(TraceItem::new("event", "signup_started"));
//! tracer.log(TraceItem::new("event", "signup_completed"));
//!
//! let report = tracer.stop().expect("a trace was running");
//! assert_eq!(report.final_state(), TraceState::Passed);
//! println!("{}", report.summary());
//! ```

pub mod error;
pub mod logger;
pub mod signal;
pub mod trace;
pub mod value;

mod timefmt;

// Re-export main types
pub use error::{Result, TraceError};
pub use logger::{ItemLoggedSignal, ItemLogger, ItemLoggerReport, LoggedItem, LoggedItemProperties};
pub use signal::{ListenerToken, Signal};
pub use trace::{
    FiringRecord, SetupFn, SlotStatus, Trace, TraceItem, TraceItemLoggedSignal, TraceItemState,
    TraceReport, TraceStarted, TraceState, TraceStateChangedSignal, Tracer,
};
pub use value::{CustomEquatable, TraceValue};
