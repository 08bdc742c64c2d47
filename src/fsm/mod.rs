//! Function-pointer finite state machine engine for the mode supervisor.
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │  StateTable                                   │
//! │  ┌────────┬───────────┬───────────────────┐   │
//! │  │ StateId│ on_enter  │ on_update         │   │
//! │  ├────────┼───────────┼───────────────────┤   │
//! │  │ Manual │ fn(ctx)   │ fn(ctx)->Option<> │   │
//! │  │ Auto   │ fn(ctx)   │ fn(ctx)->Option<> │   │
//! │  │ Fault  │ fn(ctx)   │ fn(ctx)->Option<> │   │
//! │  └────────┴───────────┴───────────────────┘   │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** state.
//! If it returns `Some(next_id)`, the engine runs `on_enter` for the next
//! state and updates the current pointer. There are no exit hooks: every
//! entry action puts the output stage into its own safe starting point. All functions receive `&mut SupervisorContext`, which
//! owns the knob decoder and the output stage.
//!
//! The engine is generic over the two ports so the same table drives real
//! hardware and test doubles.

pub mod context;
pub mod states;

#[cfg(test)]
pub(crate) mod fakes;

use context::SupervisorContext;
use log::info;

use crate::app::ports::{KnobPort, OutputPort};

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Operating modes of the controller.
/// Must stay in sync with the state table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    /// Knob drives the output.
    Manual = 0,
    /// Bus drives the output.
    Auto = 1,
    /// Supply fault latched; output disabled.
    Fault = 2,
}

impl StateId {
    /// Total number of states, used to size the table array.
    pub const COUNT: usize = 3;

    /// Convert an index back to `StateId`. Panics on out-of-range in
    /// debug builds; returns `Fault` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Manual,
            1 => Self::Auto,
            2 => Self::Fault,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Fault
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` actions.
pub type StateActionFn<K, O> = fn(&mut SupervisorContext<K, O>);

/// Signature for the per-tick update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn<K, O> = fn(&mut SupervisorContext<K, O>) -> Option<StateId>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

pub struct StateDescriptor<K: KnobPort, O: OutputPort> {
    /// Must equal the row's index in the table.
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn<K, O>>,
    pub on_update: StateUpdateFn<K, O>,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

pub struct Fsm<K: KnobPort, O: OutputPort> {
    /// Fixed-size table indexed by `StateId as usize`.
    table: [StateDescriptor<K, O>; StateId::COUNT],
    current: usize,
    tick_count: u64,
    state_entry_tick: u64,
}

impl<K: KnobPort, O: OutputPort> Fsm<K, O> {
    pub fn new(table: [StateDescriptor<K, O>; StateId::COUNT], initial: StateId) -> Self {
        debug_assert!(
            table.iter().enumerate().all(|(i, row)| row.id as usize == i),
            "state table rows out of order"
        );
        Self {
            table,
            current: initial as usize,
            tick_count: 0,
            state_entry_tick: 0,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut SupervisorContext<K, O>) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance the FSM by one tick.
    pub fn tick(&mut self, ctx: &mut SupervisorContext<K, O>) {
        self.tick_count += 1;

        let next = (self.table[self.current].on_update)(ctx);

        if let Some(next_id) = next {
            self.transition(next_id, ctx);
        }
    }

    /// Force an immediate transition (used by the fault monitor to jump to
    /// `Fault` regardless of what `on_update` returned). No-op if `next`
    /// is already current.
    pub fn force_transition(&mut self, next: StateId, ctx: &mut SupervisorContext<K, O>) {
        if next as usize != self.current {
            self.transition(next, ctx);
        }
    }

    pub fn current_state(&self) -> StateId {
        StateId::from_index(self.current)
    }

    pub fn ticks_in_current_state(&self) -> u64 {
        self.tick_count - self.state_entry_tick
    }

    pub fn total_ticks(&self) -> u64 {
        self.tick_count
    }

    fn transition(&mut self, next_id: StateId, ctx: &mut SupervisorContext<K, O>) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        self.current = next_idx;
        self.state_entry_tick = self.tick_count;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
