//! Concrete phase handler functions and table builder.
//!
//! Each phase is defined by plain `fn` pointers: no closures, no dynamic
//! dispatch.
//!
//! ```text
//!  IDLE ──[motion]──▶ ALERTING ──[ack blink done]──▶ RANGING ─┐
//!   ▲                                                  ▲       │ sample →
//!   │                                                  └───────┘ band → light
//!   └───[idle_after_clear: N far samples in a row]──── RANGING
//! ```
//!
//! With the default `ranging_exit = never` the bottom edge does not exist.

use log::{debug, info};

use super::context::LoopContext;
use super::{Phase, PhaseDescriptor};
use crate::bands::Band;
use crate::config::RangingExit;
use crate::indicator::{ColourSet, IndicatorCommand};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static phase table.  Called once at startup.
pub fn build_phase_table() -> [PhaseDescriptor; Phase::COUNT] {
    [
        // Index 0: Idle
        PhaseDescriptor {
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_update: idle_update,
        },
        // Index 1: Alerting
        PhaseDescriptor {
            name: "Alerting",
            on_enter: Some(alerting_enter),
            on_exit: None,
            on_update: alerting_update,
        },
        // Index 2: Ranging
        PhaseDescriptor {
            name: "Ranging",
            on_enter: Some(ranging_enter),
            on_exit: Some(ranging_exit),
            on_update: ranging_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE: waiting for motion
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut LoopContext) {
    ctx.band = None;
    ctx.clear_streak = 0;
    ctx.readings.motion = false;
    info!("IDLE: waiting for motion");
}

fn idle_update(ctx: &mut LoopContext) -> Option<Phase> {
    if ctx.readings.motion {
        info!("IDLE: motion detected");
        return Some(Phase::Alerting);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  ALERTING: one all-lamp blink to acknowledge motion
// ═══════════════════════════════════════════════════════════════════════════

fn alerting_enter(ctx: &mut LoopContext) {
    ctx.command(IndicatorCommand::Blink {
        colours: ColourSet::ALL,
        times: 1,
    });
}

fn alerting_update(_ctx: &mut LoopContext) -> Option<Phase> {
    Some(Phase::Ranging)
}

// ═══════════════════════════════════════════════════════════════════════════
//  RANGING: sample, classify, drive the light
// ═══════════════════════════════════════════════════════════════════════════

fn ranging_enter(ctx: &mut LoopContext) {
    ctx.readings.distance_cm = None;
    match ctx.config.ranging_exit {
        RangingExit::Never => info!("RANGING: continuous distance polling"),
        RangingExit::IdleAfterClear { readings } => info!(
            "RANGING: continuous distance polling, idle after {} clear readings",
            readings
        ),
    }
}

fn ranging_exit(ctx: &mut LoopContext) {
    ctx.command(IndicatorCommand::Off);
    info!("RANGING: area clear, lights off");
}

fn ranging_update(ctx: &mut LoopContext) -> Option<Phase> {
    let distance = ctx.readings.distance_cm.take()?;
    let band = ctx.config.bands.classify(distance);
    debug!("RANGING: {:.2} cm → {}", distance, band);

    ctx.band = Some(band);
    ctx.command(band.command(ctx.config.critical_blinks));

    if band == Band::Far {
        ctx.clear_streak = ctx.clear_streak.saturating_add(1);
    } else {
        ctx.clear_streak = 0;
    }

    match ctx.config.ranging_exit {
        RangingExit::IdleAfterClear { readings } if ctx.clear_streak >= readings => {
            Some(Phase::Idle)
        }
        _ => None,
    }
}
