// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Driver core for the SiFive GPIO controller.
//!
//! The controller exposes 32 pins through a block of 17 memory-mapped
//! registers. Every pin owns one bit in each register. Interrupts from all
//! pins arrive on a contiguous range of interrupt ids at the upstream
//! interrupt controller; the [`gpio::GpioController`] demultiplexes them
//! back to the originating pin and fires the registered
//! [`callback::GpioClient`]s.
//!
//! ```rust,ignore
//! let config = ControllerConfig::new(0x1001_2000, 8);
//! // `GPIO` lives in a `static` so that the interrupt controller can keep a
//! // reference to it.
//! let gpio: &'static GpioController<'static, Plic> =
//!     GPIO.write(unsafe { GpioController::from_config(&config, &PLIC)? });
//! gpio.initialize()?;
//!
//! gpio.configure(5, PinConfig::input().with_interrupt(Trigger::Edge(EdgeMode::Double)))?;
//! // `button` is a `&'static GpioCallback` owned by the board.
//! gpio.register_callback(button);
//! gpio.enable_interrupt(5)?;
//! ```

#![cfg_attr(not(test), no_std)]
#![crate_name = "sifive_gpio"]
#![crate_type = "rlib"]

pub mod callback;
pub mod config;
pub mod driver;
pub mod error;
pub mod gpio;
pub mod interrupt;
pub mod list;
pub mod registers;

#[cfg(test)]
mod testing;

pub use crate::callback::{CallbackRegistry, GpioCallback, GpioClient};
pub use crate::config::{Direction, EdgeMode, LevelMode, PinConfig, Pull, Trigger};
pub use crate::driver::{AccessMode, GpioDriver};
pub use crate::error::GpioError;
pub use crate::gpio::{ControllerConfig, GpioController};
pub use crate::interrupt::{InterruptController, InterruptHandler};
pub use crate::registers::{GpioRegisterMap, GpioRegisters, Pin, Register, PIN_COUNT};
