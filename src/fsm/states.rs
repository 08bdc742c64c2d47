//! Concrete state handler functions and table builder.
//!
//! Each state is plain `fn` pointers. No state has an exit hook: every
//! entry action cuts the output and re-zeroes the knob itself.
//!
//! ```text
//!   MANUAL ──[bus: enter auto]──▶ AUTO
//!     ▲                             │
//!     └──[key | bus: leave auto]────┘
//!   (key in MANUAL: output off, knob re-zeroed, stays MANUAL)
//!     ▲
//!     └──[key]── FAULT ◀──[confirmed supply fault]── any state
//! ```

use log::{info, warn};

use super::context::SupervisorContext;
use super::{StateDescriptor, StateId};
use crate::app::commands::BusCommand;
use crate::app::ports::{KnobPort, OutputPort};
use crate::render::RenderRequest;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the state table. Called once at startup.
pub fn build_state_table<K: KnobPort, O: OutputPort>() -> [StateDescriptor<K, O>; StateId::COUNT] {
    [
        // Index 0: Manual
        StateDescriptor {
            id: StateId::Manual,
            name: "Manual",
            on_enter: Some(manual_enter::<K, O>),
            on_update: manual_update::<K, O>,
        },
        // Index 1: Auto
        StateDescriptor {
            id: StateId::Auto,
            name: "Auto",
            on_enter: Some(auto_enter::<K, O>),
            on_update: auto_update::<K, O>,
        },
        // Index 2: Fault
        StateDescriptor {
            id: StateId::Fault,
            name: "Fault",
            on_enter: Some(fault_enter::<K, O>),
            on_update: fault_update::<K, O>,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  MANUAL state: knob drives the transformer
// ═══════════════════════════════════════════════════════════════════════════

fn manual_enter<K: KnobPort, O: OutputPort>(ctx: &mut SupervisorContext<K, O>) {
    ctx.output.set_supply(true);
    ctx.output_off();
    ctx.knob.init();
    let request = RenderRequest::manual(&ctx.palette, ctx.knob.position());
    ctx.push_update(request);
    info!("MANUAL: knob control, output off");
}

fn manual_update<K: KnobPort, O: OutputPort>(ctx: &mut SupervisorContext<K, O>) -> Option<StateId> {
    // Stop key: cut output and re-zero the knob before sampling it, so the
    // same tick cannot re-apply the old level. Power returns only once the
    // knob leaves the notch again.
    if ctx.inputs.key_pressed {
        ctx.output_off();
        ctx.knob.init();
        let request = RenderRequest::manual(&ctx.palette, ctx.knob.position());
        ctx.push_update(request);
        info!("MANUAL: stop key, output off, knob re-zeroed");
    }

    ctx.knob.run(ctx.inputs.now_ms);
    if ctx.knob.has_changed() {
        let position = ctx.knob.position();
        ctx.output.set_power(position);
        ctx.push_update(RenderRequest::manual(&ctx.palette, position));
    }

    if ctx.received(BusCommand::EnterAuto) {
        return Some(StateId::Auto);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  AUTO state: bus drives the transformer
// ═══════════════════════════════════════════════════════════════════════════

fn auto_enter<K: KnobPort, O: OutputPort>(ctx: &mut SupervisorContext<K, O>) {
    ctx.output.set_supply(true);
    ctx.output_off();
    ctx.knob.init();
    let request = RenderRequest::auto(&ctx.palette, ctx.output.power());
    ctx.push_update(request);
    info!("AUTO: bus control, output off");
}

fn auto_update<K: KnobPort, O: OutputPort>(ctx: &mut SupervisorContext<K, O>) -> Option<StateId> {
    if ctx.inputs.key_pressed {
        info!("AUTO: key pressed, back to manual");
        return Some(StateId::Manual);
    }

    match ctx.inputs.command {
        Some(BusCommand::LeaveAuto) => return Some(StateId::Manual),
        Some(BusCommand::SetPower(power)) => {
            ctx.output.set_power(power);
            let applied = ctx.output.power();
            ctx.push_update(RenderRequest::auto(&ctx.palette, applied));
            info!("AUTO: power {} (requested {})", applied, power);
        }
        Some(BusCommand::EnterAuto) | None => {}
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  FAULT state: supply off, latched until the operator acknowledges
// ═══════════════════════════════════════════════════════════════════════════

fn fault_enter<K: KnobPort, O: OutputPort>(ctx: &mut SupervisorContext<K, O>) {
    ctx.output.set_supply(false);
    ctx.output_off();
    ctx.knob.init();
    ctx.push_update(RenderRequest::Fault);
    warn!("FAULT: supply disabled, waiting for key");
}

fn fault_update<K: KnobPort, O: OutputPort>(ctx: &mut SupervisorContext<K, O>) -> Option<StateId> {
    if ctx.inputs.key_pressed {
        info!("FAULT: acknowledged by key");
        return Some(StateId::Manual);
    }

    None
}
