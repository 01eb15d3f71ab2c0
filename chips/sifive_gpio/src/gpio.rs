// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! The GPIO controller: per-pin configuration, reads and writes, callback
//! management and interrupt delivery for one SiFive GPIO block.
//!
//! There is no locking inside the controller. The upstream interrupt
//! controller serializes deliveries, and callers must not reconfigure a pin
//! from task context while its interrupt is being serviced.

use core::ops::RangeInclusive;

use log::debug;

use crate::callback::{CallbackRegistry, GpioCallback, GpioClient};
use crate::config::PinConfig;
use crate::error::GpioError;
use crate::interrupt::{self, InterruptController, InterruptHandler};
use crate::registers::{GpioRegisterMap, Pin, Register, PIN_COUNT};

/// Where a controller lives: the base address of its register block and the
/// interrupt id of pin 0 at the upstream interrupt controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControllerConfig {
    pub base_address: usize,
    pub irq_base: u32,
}

impl ControllerConfig {
    pub const fn new(base_address: usize, irq_base: u32) -> ControllerConfig {
        ControllerConfig {
            base_address,
            irq_base,
        }
    }

    /// The base address must be non-null and word aligned, and every pin's
    /// interrupt id must be representable.
    pub fn validate(&self) -> Result<(), GpioError> {
        if self.base_address == 0 || self.base_address % core::mem::align_of::<u32>() != 0 {
            return Err(GpioError::InvalidConfig);
        }
        self.irqs().map(|_| ())
    }

    /// Interrupt ids used by this controller, one per pin.
    pub fn irqs(&self) -> Result<RangeInclusive<u32>, GpioError> {
        irq_range(self.irq_base)
    }
}

/// Fails when the id of the last pin does not fit in a `u32`.
fn irq_range(irq_base: u32) -> Result<RangeInclusive<u32>, GpioError> {
    irq_base
        .checked_add(PIN_COUNT - 1)
        .map(|last| irq_base..=last)
        .ok_or(GpioError::InvalidConfig)
}

pub struct GpioController<'a, I: InterruptController<'a>> {
    registers: GpioRegisterMap<'a>,
    irq_base: u32,
    intc: &'a I,
    callbacks: CallbackRegistry<'a>,
}

impl<'a, I: InterruptController<'a>> GpioController<'a, I> {
    pub const fn new(registers: GpioRegisterMap<'a>, irq_base: u32, intc: &'a I) -> Self {
        GpioController {
            registers,
            irq_base,
            intc,
            callbacks: CallbackRegistry::new(),
        }
    }

    /// Create a controller for the block described by `config`.
    ///
    /// The caller must guarantee that `config.base_address` is the address of
    /// a SiFive GPIO block that stays mapped for the rest of the program.
    pub unsafe fn from_config(config: &ControllerConfig, intc: &'a I) -> Result<Self, GpioError> {
        config.validate()?;
        let registers = GpioRegisterMap::from_base_address(config.base_address);
        Ok(GpioController::new(registers, config.irq_base, intc))
    }

    /// Reset the block to a known state and take over the controller's
    /// interrupt lines.
    ///
    /// Direction, pull-up, trigger enable and invert registers are zeroed.
    /// Pending registers keep their hardware reset value and the I/O function
    /// registers are left alone. Safe to call more than once.
    pub fn initialize(&'a self) -> Result<(), GpioError> {
        let irqs = irq_range(self.irq_base)?;

        for reg in Register::RESET_ON_INIT {
            self.registers.reset(reg);
        }

        for irq in irqs.clone() {
            self.intc.install_handler(irq, self);
        }

        debug!(
            "gpio: initialized, interrupts {}..={}",
            irqs.start(),
            irqs.end()
        );
        Ok(())
    }

    /// Configure direction, polarity, pull-up and interrupt trigger of `pin`.
    ///
    /// On error no register has been written.
    pub fn configure(&self, pin: u32, config: PinConfig) -> Result<(), GpioError> {
        let pin = Pin::new(pin)?;
        config.apply(&self.registers, pin)
    }

    /// Level of `pin`: the driven value for outputs, the sampled input
    /// otherwise.
    pub fn read(&self, pin: u32) -> Result<bool, GpioError> {
        let pin = Pin::new(pin)?;
        let regs = &self.registers;

        if regs.is_set(Register::OutputEnable, pin) {
            Ok(regs.is_set(Register::OutputValue, pin))
        } else {
            Ok(regs.is_set(Register::InputValue, pin))
        }
    }

    pub fn write(&self, pin: u32, value: bool) -> Result<(), GpioError> {
        let pin = Pin::new(pin)?;
        let regs = &self.registers;

        if regs.is_set(Register::InputEnable, pin) {
            return Err(GpioError::PinIsInput);
        }
        regs.write_bit(Register::OutputValue, pin, value);
        Ok(())
    }

    /// Append `callback` to the clients fired on interrupts. Already
    /// registered callbacks keep their place.
    pub fn register_callback(&self, callback: &'a GpioCallback<'a>) {
        self.callbacks.register(callback);
    }

    /// Remove every registration of `client`.
    pub fn unregister_callback(&self, client: &dyn GpioClient) {
        self.callbacks.unregister(client);
    }

    /// Register `callback` if `set`, remove it otherwise.
    pub fn manage_callback(&self, callback: &'a GpioCallback<'a>, set: bool) {
        self.callbacks.manage(callback, set);
    }

    /// Unmask `pin`'s interrupt at the interrupt controller.
    ///
    /// The trigger itself is chosen with [`configure`](Self::configure).
    pub fn enable_interrupt(&self, pin: u32) -> Result<(), GpioError> {
        let irq = self.irq_for(pin)?;
        self.intc.unmask(irq);
        Ok(())
    }

    /// Mask `pin`'s interrupt. A delivery already in progress still
    /// completes.
    pub fn disable_interrupt(&self, pin: u32) -> Result<(), GpioError> {
        let irq = self.irq_for(pin)?;
        self.intc.mask(irq);
        Ok(())
    }

    fn irq_for(&self, pin: u32) -> Result<u32, GpioError> {
        let pin = Pin::new(pin)?;
        self.irq_base
            .checked_add(pin.index())
            .ok_or(GpioError::InvalidConfig)
    }
}

impl<'a, I: InterruptController<'a>> InterruptHandler for GpioController<'a, I> {
    fn handle_interrupt(&self) {
        let irq = self.intc.current_pending_id();
        interrupt::demultiplex(&self.registers, &self.callbacks, self.irq_base, irq);
    }
}
