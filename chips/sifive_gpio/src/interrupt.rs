// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Interrupt plumbing between the upstream interrupt controller and the GPIO
//! block.
//!
//! Each pin raises its own interrupt line, numbered `irq_base + pin` at the
//! upstream controller. The controller delivers all of them to one handler,
//! which works out the pin from the interrupt id, fires the matching clients
//! and then acknowledges the pin in the GPIO block.

use log::{trace, warn};

use crate::callback::CallbackRegistry;
use crate::registers::{GpioRegisterMap, Pin, Register};

/// Something the interrupt controller can call when an interrupt arrives.
pub trait InterruptHandler {
    /// Runs in interrupt context. Must not block.
    fn handle_interrupt(&self);
}

/// The parts of the upstream interrupt controller (typically a PLIC) this
/// driver relies on.
pub trait InterruptController<'a> {
    /// Stop delivering `irq`.
    fn mask(&self, irq: u32);
    /// Start delivering `irq`.
    fn unmask(&self, irq: u32);
    /// Id of the interrupt currently being serviced.
    fn current_pending_id(&self) -> u32;
    /// Route deliveries of `irq` to `handler`.
    fn install_handler(&self, irq: u32, handler: &'a dyn InterruptHandler);
}

/// Pin behind interrupt `irq`, if it belongs to the range starting at
/// `irq_base`.
pub(crate) fn pin_for_irq(irq: u32, irq_base: u32) -> Option<Pin> {
    irq.checked_sub(irq_base)
        .and_then(|index| Pin::new(index).ok())
}

/// Clear `pin`'s bit in the first pending register that has it set, checking
/// rise, fall, high and low in that order. Returns the register written, or
/// `None` if no pending register had the bit.
pub(crate) fn acknowledge(registers: &GpioRegisterMap<'_>, pin: Pin) -> Option<Register> {
    let pending = Register::PENDING
        .into_iter()
        .find(|&reg| registers.is_set(reg, pin))?;
    registers.acknowledge(pending, pin);
    Some(pending)
}

/// Service one delivery of interrupt `irq`.
pub(crate) fn demultiplex(
    registers: &GpioRegisterMap<'_>,
    callbacks: &CallbackRegistry<'_>,
    irq_base: u32,
    irq: u32,
) {
    let pin = match pin_for_irq(irq, irq_base) {
        Some(pin) => pin,
        None => {
            warn!("gpio: interrupt {} is not a pin of this controller", irq);
            return;
        }
    };

    trace!("gpio: interrupt {} on pin {}", irq, pin.index());
    callbacks.dispatch(pin.mask());

    // Nothing pending means stale or misconfigured state; there is nobody to
    // report it to from here.
    if acknowledge(registers, pin).is_none() {
        warn!("gpio: no pending bit for pin {}", pin.index());
    }
}
