// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Flag-word driver interface.
//!
//! Generic GPIO layers address a controller either one pin at a time or a
//! whole port at once, and describe pin configuration as a raw flag word
//! (see [`FLAGS`](crate::config::FLAGS)). This controller only implements
//! per-pin access.

use crate::callback::GpioCallback;
use crate::config::PinConfig;
use crate::error::GpioError;
use crate::gpio::GpioController;
use crate::interrupt::InterruptController;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessMode {
    /// Operate on the single pin named by the `pin` argument.
    Pin,
    /// Operate on all pins of the port at once.
    Port,
}

/// Generic GPIO driver API.
pub trait GpioDriver<'a> {
    fn config(&self, access: AccessMode, pin: u32, flags: u32) -> Result<(), GpioError>;
    /// Any non-zero `value` drives the pin high.
    fn write(&self, access: AccessMode, pin: u32, value: u32) -> Result<(), GpioError>;
    /// Returns 0 or 1.
    fn read(&self, access: AccessMode, pin: u32) -> Result<u32, GpioError>;
    fn manage_callback(&self, callback: &'a GpioCallback<'a>, set: bool);
    fn enable_callback(&self, access: AccessMode, pin: u32) -> Result<(), GpioError>;
    fn disable_callback(&self, access: AccessMode, pin: u32) -> Result<(), GpioError>;
}

fn by_pin(access: AccessMode) -> Result<(), GpioError> {
    match access {
        AccessMode::Pin => Ok(()),
        AccessMode::Port => Err(GpioError::UnsupportedOperation),
    }
}

impl<'a, I: InterruptController<'a>> GpioDriver<'a> for GpioController<'a, I> {
    fn config(&self, access: AccessMode, pin: u32, flags: u32) -> Result<(), GpioError> {
        by_pin(access)?;
        self.configure(pin, PinConfig::from_flags(flags))
    }

    fn write(&self, access: AccessMode, pin: u32, value: u32) -> Result<(), GpioError> {
        by_pin(access)?;
        GpioController::write(self, pin, value != 0)
    }

    fn read(&self, access: AccessMode, pin: u32) -> Result<u32, GpioError> {
        by_pin(access)?;
        GpioController::read(self, pin).map(u32::from)
    }

    fn manage_callback(&self, callback: &'a GpioCallback<'a>, set: bool) {
        GpioController::manage_callback(self, callback, set);
    }

    fn enable_callback(&self, access: AccessMode, pin: u32) -> Result<(), GpioError> {
        by_pin(access)?;
        self.enable_interrupt(pin)
    }

    fn disable_callback(&self, access: AccessMode, pin: u32) -> Result<(), GpioError> {
        by_pin(access)?;
        self.disable_interrupt(pin)
    }
}
