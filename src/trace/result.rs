//! Classification state machine for an active trace
//!
//! `TraceResult` collects and evaluates fired items against the trace's
//! declared items so the run can be summarized later. It keeps a positional
//! slot state per declared item occurrence, an append-only tailing log of
//! every firing, and the aggregate trace state, which is re-derived after
//! every log append.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::signal::Signal;
use crate::trace::definition::Trace;
use crate::trace::item::TraceItem;
use crate::trace::report::TraceReport;
use crate::trace::states::{TraceItemState, TraceState};

/// A signal that fires any time the trace's overall state is assigned
pub type TraceStateChangedSignal = Signal<TraceState>;

/// One position in the definition's expected-items sequence, with how it
/// has been matched so far
#[derive(Debug, Clone, Serialize)]
pub struct SlotStatus {
    /// The declared item occupying this slot
    pub item: TraceItem,
    /// How the slot has been matched during the trace
    pub state: TraceItemState,
}

/// One entry in the tailing log, recorded for every firing regardless of
/// whether it matched anything
#[derive(Debug, Clone, Serialize)]
pub struct FiringRecord {
    /// The item that was fired
    pub item: TraceItem,
    /// How the firing was classified
    pub state: TraceItemState,
}

/// Collects and evaluates the results of the trace
pub(crate) struct TraceResult {
    trace: Trace,
    slots: Vec<SlotStatus>,
    firing_log: Vec<FiringRecord>,
    state: TraceState,
    state_changed: Arc<TraceStateChangedSignal>,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
    finalized: bool,
    escalation_suppressed: bool,
    escalated: bool,
}

impl TraceResult {
    /// Prepares an empty result for the given trace
    ///
    /// # Panics
    ///
    /// Panics if the trace declares no items to match; that is a misuse of
    /// the API by the integrating application, not a runtime condition.
    pub(crate) fn new(trace: Trace) -> Self {
        if let Err(err) = trace.validate() {
            panic!("{err}");
        }

        let slots = trace
            .items_to_match
            .iter()
            .cloned()
            .map(|item| SlotStatus {
                item,
                state: TraceItemState::WaitingToBeMatched,
            })
            .collect();

        Self {
            trace,
            slots,
            firing_log: Vec::new(),
            state: TraceState::Waiting,
            state_changed: Arc::new(TraceStateChangedSignal::new()),
            started_at: Utc::now(),
            ended_at: None,
            finalized: false,
            escalation_suppressed: false,
            escalated: false,
        }
    }

    /// Collects and evaluates the given fired item; no-op once finalized
    pub(crate) fn handle_firing(&mut self, item: TraceItem) {
        if self.finalized {
            return;
        }
        self.categorize(item);
    }

    /// Finalizes the trace by marking still-waiting items missing; idempotent
    pub(crate) fn finalize(&mut self) {
        if self.finalized {
            return;
        }
        for slot in &mut self.slots {
            if slot.state == TraceItemState::WaitingToBeMatched {
                slot.state = TraceItemState::Missing;
            }
        }
        self.update_state(true);
        self.ended_at = Some(Utc::now());
        self.finalized = true;
    }

    /// Disables or re-enables hard-failure escalation for this run,
    /// independent of the definition's `assert_on_failure`
    pub(crate) fn set_escalation_suppressed(&mut self, suppressed: bool) {
        self.escalation_suppressed = suppressed;
    }

    pub(crate) fn trace(&self) -> &Trace {
        &self.trace
    }

    pub(crate) fn slots(&self) -> &[SlotStatus] {
        &self.slots
    }

    pub(crate) fn firing_log(&self) -> &[FiringRecord] {
        &self.firing_log
    }

    pub(crate) fn state(&self) -> TraceState {
        self.state
    }

    /// The signal fired on every state assignment
    pub(crate) fn state_changed(&self) -> Arc<TraceStateChangedSignal> {
        Arc::clone(&self.state_changed)
    }

    pub(crate) fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub(crate) fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    #[cfg(test)]
    pub(crate) fn is_finalized(&self) -> bool {
        self.finalized
    }

    fn categorize(&mut self, item: TraceItem) {
        // Anything the trace never declared is logged and otherwise ignored
        if !self.trace.items_to_match.contains(&item) {
            tracing::debug!(item = %item, "fired item matches nothing in the trace");
            self.log_firing(item, TraceItemState::IgnoredNoMatch);
            return;
        }

        let first_waiting_idx = self
            .slots
            .iter()
            .position(|slot| slot.state == TraceItemState::WaitingToBeMatched);
        let this_value_idx = self.slots.iter().position(|slot| {
            slot.state == TraceItemState::WaitingToBeMatched && slot.item == item
        });

        match (first_waiting_idx, this_value_idx) {
            (Some(first_waiting_idx), Some(this_value_idx)) => {
                let state = if !self.trace.enforce_order
                    || this_value_idx == first_waiting_idx
                {
                    TraceItemState::Matched
                } else {
                    // A later-positioned value consumed a required order
                    // point, so every earlier slot still waiting can no
                    // longer legally match either
                    for slot in &mut self.slots[..this_value_idx] {
                        if slot.state == TraceItemState::WaitingToBeMatched {
                            slot.state = TraceItemState::OutOfOrder;
                        }
                    }
                    TraceItemState::OutOfOrder
                };
                self.slots[this_value_idx].state = state;
                self.log_firing(item, state);
            }
            _ => {
                // Every slot of this value is already consumed
                if self.trace.allow_duplicates {
                    self.log_firing(item, TraceItemState::IgnoredButMatched);
                } else {
                    // Attribute the duplicate to the most recently matched
                    // slot of this value, falling back to the last slot of
                    // the value so the report always points somewhere
                    let duplicated_idx = self
                        .slots
                        .iter()
                        .rposition(|slot| {
                            slot.item == item && slot.state == TraceItemState::Matched
                        })
                        .or_else(|| self.slots.iter().rposition(|slot| slot.item == item));
                    if let Some(idx) = duplicated_idx {
                        self.slots[idx].state = TraceItemState::HadDuplicates;
                    }
                    self.log_firing(item, TraceItemState::Duplicate);
                }
            }
        }
    }

    fn log_firing(&mut self, item: TraceItem, state: TraceItemState) {
        self.firing_log.push(FiringRecord { item, state });
        self.update_state(false);
    }

    fn update_state(&mut self, finalizing: bool) {
        // Once a trace is deemed failed, nothing can change that result
        // without re-running the trace
        if self.state.is_terminal() {
            self.set_state(TraceState::Failed);
            return;
        }

        // Failure scan runs before the waiting/passing checks every time so
        // a single bad firing flips the trace immediately
        let enforce_order = self.trace.enforce_order;
        let allow_duplicates = self.trace.allow_duplicates;
        let failing = self.slots.iter().any(|slot| match slot.state {
            TraceItemState::Missing => true,
            TraceItemState::OutOfOrder => enforce_order,
            TraceItemState::HadDuplicates => !allow_duplicates,
            _ => false,
        });
        if failing {
            self.set_state(TraceState::Failed);
            return;
        }

        if self
            .slots
            .iter()
            .all(|slot| slot.state == TraceItemState::WaitingToBeMatched)
        {
            self.set_state(TraceState::Waiting);
            return;
        }

        if finalizing {
            if self
                .slots
                .iter()
                .all(|slot| slot.state == TraceItemState::Matched)
            {
                self.set_state(TraceState::Passed);
            }
        } else if self
            .slots
            .iter()
            .any(|slot| slot.state == TraceItemState::Matched)
        {
            self.set_state(TraceState::Passing);
        }
    }

    fn set_state(&mut self, new_state: TraceState) {
        let old_state = self.state;
        self.state = new_state;
        self.state_changed.fire(&new_state);

        if old_state != TraceState::Failed && new_state == TraceState::Failed {
            tracing::warn!(name = %self.trace.name, "trace failed");

            if self.trace.assert_on_failure && !self.escalation_suppressed && !self.escalated {
                // Escalate at most once per run: finalize, surface the
                // report, then abort
                self.escalated = true;
                self.finalize();
                let report = TraceReport::from_result(self);
                tracing::error!(name = %self.trace.name, report = %report.summary(), "trace failed; escalating");
                panic!("trace '{}' failed", self.trace.name);
            }
        }
    }
}

impl std::fmt::Debug for TraceResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraceResult")
            .field("trace", &self.trace.name)
            .field("state", &self.state)
            .field("slots", &self.slots)
            .field("firing_log_len", &self.firing_log.len())
            .field("finalized", &self.finalized)
            .finish()
    }
}
