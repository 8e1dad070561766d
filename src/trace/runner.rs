//! Runs a single trace from setup through finalization

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::signal::{ListenerToken, Signal};
use crate::trace::definition::Trace;
use crate::trace::item::TraceItem;
use crate::trace::report::TraceReport;
use crate::trace::result::{TraceResult, TraceStateChangedSignal};
use crate::trace::states::TraceState;

/// A signal that fires any time an item is logged into the active run
pub type TraceItemLoggedSignal = Signal<TraceItem>;

/// Handles returned when a trace is started, for external subscription
///
/// The excluded presentation layer renders status indicators and item lists
/// purely from these two signals plus the current state.
#[derive(Debug, Clone)]
pub struct TraceStarted {
    /// The state of the trace at the moment it was started
    pub current_state: TraceState,
    /// Fires with the new state any time the trace's overall state is assigned
    pub state_changed: Arc<TraceStateChangedSignal>,
    /// Fires with each item logged into the run
    pub item_logged: Arc<TraceItemLoggedSignal>,
}

/// Prepares a trace to be run, listens for fired items, and finalizes the
/// trace result when stopped
pub(crate) struct TraceRunner {
    trace: Trace,
    result: Arc<Mutex<TraceResult>>,
    item_logged: Arc<TraceItemLoggedSignal>,
    listener: Option<ListenerToken>,
}

impl TraceRunner {
    /// Creates a runner and prepares an empty result to eventually report on
    pub(crate) fn new(trace: Trace) -> Self {
        let result = TraceResult::new(trace.clone());
        Self {
            trace,
            result: Arc::new(Mutex::new(result)),
            item_logged: Arc::new(TraceItemLoggedSignal::new()),
            listener: None,
        }
    }

    /// Whether this runner is currently listening for firings
    pub(crate) fn is_running(&self) -> bool {
        self.listener.is_some()
    }

    /// Executes any setup steps, then starts listening to fired items,
    /// feeding each into the classifier
    ///
    /// Starting an already-running trace is idempotent: the same signals are
    /// returned and setup does not run again. `suppress_escalation` disables
    /// hard-failure escalation for this run (for tool/UI-driven runs where
    /// an assertion would tear down the host application).
    pub(crate) fn start(&mut self, suppress_escalation: bool) -> TraceStarted {
        self.lock_result().set_escalation_suppressed(suppress_escalation);

        if self.is_running() {
            return self.started();
        }

        if let Some(setup) = &self.trace.setup_fn {
            setup();
        }

        let result = Arc::clone(&self.result);
        self.listener = Some(self.item_logged.listen(move |item: &TraceItem| {
            result
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .handle_firing(item.clone());
        }));

        tracing::debug!(name = %self.trace.name, "trace started");
        self.started()
    }

    /// Logs the given item into the run
    pub(crate) fn log(&self, item: TraceItem) {
        self.item_logged.fire(&item);
    }

    /// Stops listening, finalizes the result, and reports on it
    pub(crate) fn stop(&mut self) -> TraceReport {
        if let Some(listener) = self.listener.take() {
            self.item_logged.remove(listener);
        }

        let mut result = self.lock_result();
        result.finalize();
        let report = TraceReport::from_result(&result);
        drop(result);

        tracing::debug!(name = %self.trace.name, state = %report.final_state(), "trace stopped");
        report
    }

    fn started(&self) -> TraceStarted {
        let result = self.lock_result();
        TraceStarted {
            current_state: result.state(),
            state_changed: result.state_changed(),
            item_logged: Arc::clone(&self.item_logged),
        }
    }

    fn lock_result(&self) -> MutexGuard<'_, TraceResult> {
        self.result.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for TraceRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraceRunner")
            .field("trace", &self.trace.name)
            .field("running", &self.is_running())
            .finish()
    }
}
