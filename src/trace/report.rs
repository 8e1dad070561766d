//! Report surface for finished traces
//!
//! A `TraceReport` is a read-only snapshot taken from a trace's result: the
//! excluded presentation layers (debug overlays, exporters) render entirely
//! from this surface and never touch the live state machine.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::timefmt::format_timestamp;
use crate::trace::result::{FiringRecord, SlotStatus, TraceResult};
use crate::trace::states::{TraceItemState, TraceState};

/// A report of a trace's execution
#[derive(Debug, Clone, Serialize)]
pub struct TraceReport {
    trace_name: String,
    enforce_order: bool,
    allow_duplicates: bool,
    final_state: TraceState,
    started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ended_at: Option<DateTime<Utc>>,
    slots: Vec<SlotStatus>,
    firing_log: Vec<FiringRecord>,
}

impl TraceReport {
    /// Snapshots the given result
    pub(crate) fn from_result(result: &TraceResult) -> Self {
        Self {
            trace_name: result.trace().name.clone(),
            enforce_order: result.trace().enforce_order,
            allow_duplicates: result.trace().allow_duplicates,
            final_state: result.state(),
            started_at: result.started_at(),
            ended_at: result.ended_at(),
            slots: result.slots().to_vec(),
            firing_log: result.firing_log().to_vec(),
        }
    }

    /// The name of the trace this report covers
    pub fn trace_name(&self) -> &str {
        &self.trace_name
    }

    /// The state the trace ended in
    pub fn final_state(&self) -> TraceState {
        self.final_state
    }

    /// When the trace started
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// When the trace ended; `None` for a report taken from a live run
    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// The per-slot classifications, positionally parallel to the
    /// definition's items to match
    pub fn slots(&self) -> &[SlotStatus] {
        &self.slots
    }

    /// The full tailing log of everything fired during the run
    pub fn firing_log(&self) -> &[FiringRecord] {
        &self.firing_log
    }

    /// How many slots ended in the given state
    pub fn slot_count(&self, state: TraceItemState) -> usize {
        self.slots.iter().filter(|slot| slot.state == state).count()
    }

    /// How many firings were classified with the given state
    pub fn firing_count(&self, state: TraceItemState) -> usize {
        self.firing_log
            .iter()
            .filter(|record| record.state == state)
            .count()
    }

    /// A multi-line summary of the trace execution which can be displayed
    /// or otherwise exported to share with others
    pub fn summary(&self) -> String {
        let total_slots = self.slots.len();
        let slot_tally = |state: TraceItemState| -> String {
            format!("{} out of {}", self.slot_count(state), total_slots)
        };

        let slot_log = self
            .slots
            .iter()
            .map(|slot| render_entry(&slot.item.category, &slot.item.value.describe(), slot.state))
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            "\n========  Begin Trace Report  ========\n\
             \n\
             Trace name: {name}\n\
             \n\
             Start time: {start}\n\
             End time: {end}\n\
             \n\
             Result: {state}\n\
             What does this mean?: {state_meaning}\n\
             \n\
             Enforcing order?: {enforce_order}\n\
             Allow duplicates?: {allow_duplicates}\n\
             \n\
             ======================================\n\
             \x20           Results Legend\n\
             ======================================\n\
             \n\
             {legend}\n\
             \n\
             ======================================\n\
             \x20           Trace Results\n\
             ======================================\n\
             \n\
             Total items to match: {total}\n\
             \n\
             --> Matched: {matched}\n\
             --> Missing: {missing}\n\
             --> Out of order: {out_of_order}\n\
             --> Had duplicates: {had_duplicates}\n\
             --> Ignored, but matched: {ignored_but_matched}\n\
             --> Ignored, no match: {ignored_no_match}\n\
             \n\
             ======================================\n\
             \x20        Items To Match Log\n\
             ======================================\n\
             \n\
             {slot_log}\n\
             \n\
             ======================================\n\
             \x20             Raw Log\n\
             ======================================\n\
             \n\
             The raw log can be exported separately.\n\
             \n\
             ========   End Trace Report   ========\n",
            name = self.trace_name,
            start = format_timestamp(self.started_at),
            end = format_timestamp(self.ended_at.unwrap_or_else(Utc::now)),
            state = self.final_state.as_str(),
            state_meaning = self.final_state.describe(),
            enforce_order = self.enforce_order,
            allow_duplicates = self.allow_duplicates,
            legend = legend(),
            total = total_slots,
            matched = slot_tally(TraceItemState::Matched),
            missing = slot_tally(TraceItemState::Missing),
            out_of_order = slot_tally(TraceItemState::OutOfOrder),
            had_duplicates = slot_tally(TraceItemState::HadDuplicates),
            ignored_but_matched = self.firing_count(TraceItemState::IgnoredButMatched),
            ignored_no_match = self.firing_count(TraceItemState::IgnoredNoMatch),
            slot_log = slot_log,
        )
    }

    /// A multi-line rendering of every item fired during this trace
    pub fn raw_log(&self) -> String {
        let firings = self
            .firing_log
            .iter()
            .map(|record| {
                render_entry(&record.item.category, &record.item.value.describe(), record.state)
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            "\n========  Begin Trace Raw Log  ========\n\
             \n\
             Trace name: {name}\n\
             \n\
             Start time: {start}\n\
             End time: {end}\n\
             \n\
             ======================================\n\
             \x20           Results Legend\n\
             ======================================\n\
             \n\
             {legend}\n\
             \n\
             ======================================\n\
             \x20             Raw Log\n\
             ======================================\n\
             \n\
             {firings}\n\
             \n\
             ========   End Trace Raw Log   ========\n",
            name = self.trace_name,
            start = format_timestamp(self.started_at),
            end = format_timestamp(self.ended_at.unwrap_or_else(Utc::now)),
            legend = legend(),
            firings = firings,
        )
    }

    /// A JSON snapshot of the report for programmatic consumption
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn render_entry(category: &str, value: &str, state: TraceItemState) -> String {
    format!("{}\n---> category: {},\n     value: {}", state.as_str(), category, value)
}

fn legend() -> String {
    TraceItemState::reportable_states()
        .iter()
        .map(|state| format!("--> '{}': {}", state.as_str(), state.describe()))
        .collect::<Vec<_>>()
        .join("\n")
}
