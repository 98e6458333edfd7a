//! Function-pointer finite state machine for the loop phases.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │  PhaseTable                                               │
//! │  ┌──────────┬───────────┬──────────┬───────────────────┐  │
//! │  │ Phase    │ on_enter  │ on_exit  │ on_update         │  │
//! │  ├──────────┼───────────┼──────────┼───────────────────┤  │
//! │  │ Idle     │ fn(ctx)   │ -        │ fn(ctx)->Option<> │  │
//! │  │ Alerting │ fn(ctx)   │ -        │ fn(ctx)->Option<> │  │
//! │  │ Ranging  │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<> │  │
//! │  └──────────┴───────────┴──────────┴───────────────────┘  │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! A step runs `on_update` of the phase the machine is in.  `Some(next)`
//! moves it: `on_exit` of the old row, then `on_enter` of the new one.
//! Handlers never touch hardware; they read `ctx.readings` and leave an
//! indicator command in `ctx.command` for the control loop.

pub mod context;
pub mod states;

use context::LoopContext;
use log::info;

/// The phases of one control-loop run.  The discriminant is the row in
/// [`states::build_phase_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Phase {
    /// Polling the motion sensor.
    Idle = 0,
    /// Acknowledging detected motion.
    Alerting = 1,
    /// Continuous distance polling and indicator updates.
    Ranging = 2,
}

impl Phase {
    /// Rows in the phase table.
    pub const COUNT: usize = 3;

    const fn row(self) -> usize {
        self as usize
    }
}

/// `on_enter` / `on_exit` action.
pub type PhaseActionFn = fn(&mut LoopContext);

/// Per-step handler; `Some(next)` requests a phase change.
pub type PhaseUpdateFn = fn(&mut LoopContext) -> Option<Phase>;

/// One row of the phase table.
pub struct PhaseDescriptor {
    pub name: &'static str,
    pub on_enter: Option<PhaseActionFn>,
    pub on_exit: Option<PhaseActionFn>,
    pub on_update: PhaseUpdateFn,
}

pub struct Fsm {
    table: [PhaseDescriptor; Phase::COUNT],
    phase: Phase,
}

impl Fsm {
    pub fn new(table: [PhaseDescriptor; Phase::COUNT], initial: Phase) -> Self {
        Self {
            table,
            phase: initial,
        }
    }

    /// Enter the initial phase.  Call once, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut LoopContext) {
        let row = &self.table[self.phase.row()];
        info!("FSM starting in phase: {}", row.name);
        if let Some(enter) = row.on_enter {
            enter(ctx);
        }
    }

    /// One step of the current phase, plus the phase change it asks for.
    pub fn tick(&mut self, ctx: &mut LoopContext) {
        if let Some(next) = (self.table[self.phase.row()].on_update)(ctx) {
            self.enter(next, ctx);
        }
    }

    pub fn current_phase(&self) -> Phase {
        self.phase
    }

    fn enter(&mut self, next: Phase, ctx: &mut LoopContext) {
        let (from, to) = (&self.table[self.phase.row()], &self.table[next.row()]);
        info!("FSM transition: {} -> {}", from.name, to.name);

        if let Some(exit) = from.on_exit {
            exit(ctx);
        }
        if let Some(enter) = to.on_enter {
            enter(ctx);
        }
        self.phase = next;
    }
}
