// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Pin configuration: direction, polarity, pull resistor and interrupt
//! trigger.
//!
//! The hardware only allows some combinations. Inversion applies to outputs
//! only, the pull resistor is a pull-up on inputs only, and interrupts can
//! only be raised by inputs. [`PinConfig`] can express every combination;
//! the illegal ones are rejected before any register is written.
//!
//! Configuring an interrupt trigger only selects which condition latches a
//! pending bit. Delivery is enabled separately at the interrupt controller,
//! see [`GpioController::enable_interrupt`](crate::gpio::GpioController::enable_interrupt).

use log::debug;
use tock_registers::register_bitfields;
use tock_registers::LocalRegisterCopy;

use crate::error::GpioError;
use crate::registers::{GpioRegisterMap, Pin, Register};

register_bitfields![u32,
    /// Layout of the classic GPIO flag word accepted by
    /// `PinConfig::from_flags`.
    pub FLAGS [
        DIR OFFSET(0) NUMBITS(1) [
            In = 0,
            Out = 1
        ],
        INT OFFSET(1) NUMBITS(1) [],
        INT_ACTIVE_HIGH OFFSET(2) NUMBITS(1) [],
        INT_EDGE OFFSET(5) NUMBITS(1) [
            Level = 0,
            Edge = 1
        ],
        INT_DOUBLE_EDGE OFFSET(6) NUMBITS(1) [],
        POL_INV OFFSET(7) NUMBITS(1) [],
        PUD OFFSET(8) NUMBITS(2) [
            Normal = 0,
            PullUp = 1,
            PullDown = 2
        ]
    ]
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

/// Pull resistor. The block only implements pull-ups; `Down` exists so
/// callers can ask for it and be told no.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Pull {
    #[default]
    None,
    Up,
    Down,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EdgeMode {
    Double,
    ActiveHigh,
    #[default]
    ActiveLow,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LevelMode {
    ActiveHigh,
    #[default]
    ActiveLow,
}

/// Condition that sets a pin's pending bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    Edge(EdgeMode),
    Level(LevelMode),
}

impl Default for Trigger {
    fn default() -> Self {
        Trigger::Edge(EdgeMode::default())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinConfig {
    pub direction: Direction,
    /// Invert the driven value. Outputs only.
    pub invert: bool,
    /// Inputs only.
    pub pull: Pull,
    /// `None` leaves the pin's trigger registers as they are.
    pub interrupt: Option<Trigger>,
}

impl PinConfig {
    pub const fn input() -> PinConfig {
        PinConfig {
            direction: Direction::Input,
            invert: false,
            pull: Pull::None,
            interrupt: None,
        }
    }

    pub const fn output() -> PinConfig {
        PinConfig {
            direction: Direction::Output,
            invert: false,
            pull: Pull::None,
            interrupt: None,
        }
    }

    pub const fn inverted(mut self) -> PinConfig {
        self.invert = true;
        self
    }

    pub const fn with_pull(mut self, pull: Pull) -> PinConfig {
        self.pull = pull;
        self
    }

    pub const fn with_interrupt(mut self, trigger: Trigger) -> PinConfig {
        self.interrupt = Some(trigger);
        self
    }

    /// Decode a raw flag word laid out as [`FLAGS`].
    ///
    /// Unknown bits are ignored. A trigger is only decoded when `INT` is set;
    /// without `INT_EDGE` it is a level trigger, and `INT_DOUBLE_EDGE` takes
    /// precedence over `INT_ACTIVE_HIGH` for edges.
    pub fn from_flags(flags: u32) -> PinConfig {
        let flags: LocalRegisterCopy<u32, FLAGS::Register> = LocalRegisterCopy::new(flags);

        let direction = if flags.matches_all(FLAGS::DIR::Out) {
            Direction::Output
        } else {
            Direction::Input
        };

        let pull = match flags.read_as_enum(FLAGS::PUD) {
            Some(FLAGS::PUD::Value::PullUp) => Pull::Up,
            Some(FLAGS::PUD::Value::PullDown) => Pull::Down,
            _ => Pull::None,
        };

        let active_high = flags.is_set(FLAGS::INT_ACTIVE_HIGH);
        let interrupt = flags.is_set(FLAGS::INT).then(|| {
            if flags.matches_all(FLAGS::INT_EDGE::Edge) {
                Trigger::Edge(if flags.is_set(FLAGS::INT_DOUBLE_EDGE) {
                    EdgeMode::Double
                } else if active_high {
                    EdgeMode::ActiveHigh
                } else {
                    EdgeMode::ActiveLow
                })
            } else {
                Trigger::Level(if active_high {
                    LevelMode::ActiveHigh
                } else {
                    LevelMode::ActiveLow
                })
            }
        });

        PinConfig {
            direction,
            invert: flags.is_set(FLAGS::POL_INV),
            pull,
            interrupt,
        }
    }

    /// Reject the combinations the hardware cannot do.
    ///
    /// For inputs, inversion is reported before a pull-down. A pull request on
    /// an output is ignored, as the pull-up register only acts on inputs.
    pub fn validate(&self) -> Result<(), GpioError> {
        match self.direction {
            Direction::Output => {
                if self.interrupt.is_some() {
                    return Err(GpioError::InterruptNotSupportedOnOutput);
                }
            }
            Direction::Input => {
                if self.invert {
                    return Err(GpioError::UnsupportedPolarityForInput);
                }
                if self.pull == Pull::Down {
                    return Err(GpioError::UnsupportedPullDown);
                }
            }
        }
        Ok(())
    }

    /// Validate, then write this configuration for `pin`.
    ///
    /// Writes happen in a fixed order: direction, then polarity or pull-up,
    /// then the trigger. A trigger clears the enables of the other trigger
    /// kind before setting its own.
    pub(crate) fn apply(&self, registers: &GpioRegisterMap<'_>, pin: Pin) -> Result<(), GpioError> {
        self.validate()?;

        match self.direction {
            Direction::Output => {
                registers.clear_bit(Register::InputEnable, pin);
                registers.set_bit(Register::OutputEnable, pin);
                registers.write_bit(Register::Invert, pin, self.invert);
            }
            Direction::Input => {
                registers.clear_bit(Register::OutputEnable, pin);
                registers.set_bit(Register::InputEnable, pin);
                registers.write_bit(Register::PullUpEnable, pin, self.pull == Pull::Up);
            }
        }

        let trigger = match self.interrupt {
            Some(trigger) => trigger,
            None => {
                debug!("gpio: pin {} configured {:?}", pin.index(), self.direction);
                return Ok(());
            }
        };

        match trigger {
            Trigger::Edge(mode) => {
                registers.clear_bit(Register::HighEnable, pin);
                registers.clear_bit(Register::LowEnable, pin);

                let (rise, fall) = match mode {
                    EdgeMode::Double => (true, true),
                    EdgeMode::ActiveHigh => (true, false),
                    EdgeMode::ActiveLow => (false, true),
                };
                registers.write_bit(Register::RiseEnable, pin, rise);
                registers.write_bit(Register::FallEnable, pin, fall);
            }
            Trigger::Level(mode) => {
                registers.clear_bit(Register::RiseEnable, pin);
                registers.clear_bit(Register::FallEnable, pin);

                let high = mode == LevelMode::ActiveHigh;
                registers.write_bit(Register::HighEnable, pin, high);
                registers.write_bit(Register::LowEnable, pin, !high);
            }
        }

        debug!(
            "gpio: pin {} configured {:?} with trigger {:?}",
            pin.index(),
            self.direction,
            trigger
        );
        Ok(())
    }
}

impl From<u32> for PinConfig {
    fn from(flags: u32) -> PinConfig {
        PinConfig::from_flags(flags)
    }
}
