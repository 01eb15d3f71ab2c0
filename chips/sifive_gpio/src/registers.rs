// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Register map of the SiFive GPIO block.

use tock_registers::fields::Field;
use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};
use tock_registers::register_bitfields;
use tock_registers::registers::{ReadOnly, ReadWrite};

use crate::error::GpioError;

/// Number of pins served by one controller, one bit per pin in each register.
pub const PIN_COUNT: u32 = 32;

/// Number of 32-bit registers in the block.
pub const REGISTER_COUNT: usize = 17;

#[repr(C)]
pub struct GpioRegisters {
    /// Pin value.
    value: ReadOnly<u32, pins::Register>,
    /// Pin Input Enable Register
    input_en: ReadWrite<u32, pins::Register>,
    /// Pin Output Enable Register
    output_en: ReadWrite<u32, pins::Register>,
    /// Output Port Value Register
    port: ReadWrite<u32, pins::Register>,
    /// Internal Pull-Up Enable Register
    pullup: ReadWrite<u32, pins::Register>,
    /// Drive Strength Register
    drive: ReadWrite<u32, pins::Register>,
    /// Rise Interrupt Enable Register
    rise_ie: ReadWrite<u32, pins::Register>,
    /// Rise Interrupt Pending Register
    rise_ip: ReadWrite<u32, pins::Register>,
    /// Fall Interrupt Enable Register
    fall_ie: ReadWrite<u32, pins::Register>,
    /// Fall Interrupt Pending Register
    fall_ip: ReadWrite<u32, pins::Register>,
    /// High Interrupt Enable Register
    high_ie: ReadWrite<u32, pins::Register>,
    /// High Interrupt Pending Register
    high_ip: ReadWrite<u32, pins::Register>,
    /// Low Interrupt Enable Register
    low_ie: ReadWrite<u32, pins::Register>,
    /// Low Interrupt Pending Register
    low_ip: ReadWrite<u32, pins::Register>,
    /// HW I/O Function Enable Register
    iof_en: ReadWrite<u32, pins::Register>,
    /// HW I/O Function Select Register
    iof_sel: ReadWrite<u32, pins::Register>,
    /// Output XOR (invert) Register
    out_xor: ReadWrite<u32, pins::Register>,
}

/// Check that the registers are laid out at their hardware offsets
const _: () = assert!(core::mem::offset_of!(GpioRegisters, value) == 0x00);
const _: () = assert!(core::mem::offset_of!(GpioRegisters, input_en) == 0x04);
const _: () = assert!(core::mem::offset_of!(GpioRegisters, output_en) == 0x08);
const _: () = assert!(core::mem::offset_of!(GpioRegisters, port) == 0x0c);
const _: () = assert!(core::mem::offset_of!(GpioRegisters, pullup) == 0x10);
const _: () = assert!(core::mem::offset_of!(GpioRegisters, drive) == 0x14);
const _: () = assert!(core::mem::offset_of!(GpioRegisters, rise_ie) == 0x18);
const _: () = assert!(core::mem::offset_of!(GpioRegisters, rise_ip) == 0x1c);
const _: () = assert!(core::mem::offset_of!(GpioRegisters, fall_ie) == 0x20);
const _: () = assert!(core::mem::offset_of!(GpioRegisters, fall_ip) == 0x24);
const _: () = assert!(core::mem::offset_of!(GpioRegisters, high_ie) == 0x28);
const _: () = assert!(core::mem::offset_of!(GpioRegisters, high_ip) == 0x2c);
const _: () = assert!(core::mem::offset_of!(GpioRegisters, low_ie) == 0x30);
const _: () = assert!(core::mem::offset_of!(GpioRegisters, low_ip) == 0x34);
const _: () = assert!(core::mem::offset_of!(GpioRegisters, iof_en) == 0x38);
const _: () = assert!(core::mem::offset_of!(GpioRegisters, iof_sel) == 0x3c);
const _: () = assert!(core::mem::offset_of!(GpioRegisters, out_xor) == 0x40);
const _: () = assert!(core::mem::size_of::<GpioRegisters>() == REGISTER_COUNT * 4);

register_bitfields![u32,
    pub pins [
        pin0 0,
        pin1 1,
        pin2 2,
        pin3 3,
        pin4 4,
        pin5 5,
        pin6 6,
        pin7 7,
        pin8 8,
        pin9 9,
        pin10 10,
        pin11 11,
        pin12 12,
        pin13 13,
        pin14 14,
        pin15 15,
        pin16 16,
        pin17 17,
        pin18 18,
        pin19 19,
        pin20 20,
        pin21 21,
        pin22 22,
        pin23 23,
        pin24 24,
        pin25 25,
        pin26 26,
        pin27 27,
        pin28 28,
        pin29 29,
        pin30 30,
        pin31 31
    ]
];

/// Names the registers of the block. The discriminant is the word offset
/// from the base address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(usize)]
pub enum Register {
    InputValue = 0,
    InputEnable = 1,
    OutputEnable = 2,
    OutputValue = 3,
    PullUpEnable = 4,
    DriveStrength = 5,
    RiseEnable = 6,
    RisePending = 7,
    FallEnable = 8,
    FallPending = 9,
    HighEnable = 10,
    HighPending = 11,
    LowEnable = 12,
    LowPending = 13,
    IofEnable = 14,
    IofSelect = 15,
    Invert = 16,
}

impl Register {
    /// Pending registers in the order the interrupt path acknowledges them.
    pub const PENDING: [Register; 4] = [
        Register::RisePending,
        Register::FallPending,
        Register::HighPending,
        Register::LowPending,
    ];

    /// Registers cleared when the controller is initialized.
    pub const RESET_ON_INIT: [Register; 8] = [
        Register::InputEnable,
        Register::OutputEnable,
        Register::PullUpEnable,
        Register::RiseEnable,
        Register::FallEnable,
        Register::HighEnable,
        Register::LowEnable,
        Register::Invert,
    ];
}

/// A validated pin index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pin(u32);

impl Pin {
    pub const fn new(index: u32) -> Result<Pin, GpioError> {
        if index < PIN_COUNT {
            Ok(Pin(index))
        } else {
            Err(GpioError::InvalidPin)
        }
    }

    pub const fn index(self) -> u32 {
        self.0
    }

    /// Single-bit mask selecting this pin in any register.
    pub const fn mask(self) -> u32 {
        1 << self.0
    }

    fn field(self) -> Field<u32, pins::Register> {
        Field::new(1, self.0 as usize)
    }
}

impl TryFrom<u32> for Pin {
    type Error = GpioError;

    fn try_from(index: u32) -> Result<Pin, GpioError> {
        Pin::new(index)
    }
}

/// Handle onto one controller's register block.
///
/// Each accessor is a single volatile load or store on one register, or a
/// read followed by a write on the same register for bit updates. Nothing
/// here is atomic across registers.
#[derive(Clone, Copy)]
pub struct GpioRegisterMap<'a> {
    registers: &'a GpioRegisters,
}

impl<'a> GpioRegisterMap<'a> {
    pub const fn new(registers: &'a GpioRegisters) -> GpioRegisterMap<'a> {
        GpioRegisterMap { registers }
    }

    /// Map the register block located at `base`.
    ///
    /// The caller must guarantee that `base` is the address of a SiFive GPIO
    /// block that stays mapped for the rest of the program.
    pub unsafe fn from_base_address(base: usize) -> GpioRegisterMap<'static> {
        GpioRegisterMap {
            registers: &*(base as *const GpioRegisters),
        }
    }

    fn writable(&self, reg: Register) -> Option<&ReadWrite<u32, pins::Register>> {
        let regs = self.registers;

        match reg {
            Register::InputValue => None,
            Register::InputEnable => Some(&regs.input_en),
            Register::OutputEnable => Some(&regs.output_en),
            Register::OutputValue => Some(&regs.port),
            Register::PullUpEnable => Some(&regs.pullup),
            Register::DriveStrength => Some(&regs.drive),
            Register::RiseEnable => Some(&regs.rise_ie),
            Register::RisePending => Some(&regs.rise_ip),
            Register::FallEnable => Some(&regs.fall_ie),
            Register::FallPending => Some(&regs.fall_ip),
            Register::HighEnable => Some(&regs.high_ie),
            Register::HighPending => Some(&regs.high_ip),
            Register::LowEnable => Some(&regs.low_ie),
            Register::LowPending => Some(&regs.low_ip),
            Register::IofEnable => Some(&regs.iof_en),
            Register::IofSelect => Some(&regs.iof_sel),
            Register::Invert => Some(&regs.out_xor),
        }
    }

    /// Whole-register read.
    pub fn get(&self, reg: Register) -> u32 {
        match self.writable(reg) {
            Some(rw) => rw.get(),
            None => self.registers.value.get(),
        }
    }

    pub fn is_set(&self, reg: Register, pin: Pin) -> bool {
        match self.writable(reg) {
            Some(rw) => rw.is_set(pin.field()),
            None => self.registers.value.is_set(pin.field()),
        }
    }

    /// Set `pin`'s bit, leaving the other pins untouched. Writes to the
    /// read-only input value register are ignored.
    pub fn set_bit(&self, reg: Register, pin: Pin) {
        self.write_bit(reg, pin, true);
    }

    pub fn clear_bit(&self, reg: Register, pin: Pin) {
        self.write_bit(reg, pin, false);
    }

    pub fn write_bit(&self, reg: Register, pin: Pin, value: bool) {
        if let Some(rw) = self.writable(reg) {
            rw.modify(pin.field().val(u32::from(value)));
        }
    }

    /// Write only `pin`'s bit to a write-one-to-clear register.
    ///
    /// This is a plain store of the pin mask, not a read-modify-write, so
    /// pending bits of other pins are not cleared along the way.
    pub fn acknowledge(&self, reg: Register, pin: Pin) {
        if let Some(rw) = self.writable(reg) {
            rw.set(pin.mask());
        }
    }

    /// Zero a whole register.
    pub fn reset(&self, reg: Register) {
        if let Some(rw) = self.writable(reg) {
            rw.set(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBlock;

    #[test]
    fn pin_range() {
        assert_eq!(Pin::new(0).map(Pin::index), Ok(0));
        assert_eq!(Pin::new(31).map(Pin::mask), Ok(1 << 31));
        assert_eq!(Pin::new(32), Err(GpioError::InvalidPin));
        assert_eq!(Pin::try_from(u32::MAX), Err(GpioError::InvalidPin));
    }

    #[test]
    fn bit_updates_touch_one_pin() {
        let block = FakeBlock::new();
        let map = block.map();
        let pin = Pin::new(7).unwrap();

        block.poke(Register::PullUpEnable, 0x0000_0101);
        map.set_bit(Register::PullUpEnable, pin);
        assert_eq!(block.peek(Register::PullUpEnable), 0x0000_0181);
        assert!(map.is_set(Register::PullUpEnable, pin));

        map.clear_bit(Register::PullUpEnable, pin);
        assert_eq!(block.peek(Register::PullUpEnable), 0x0000_0101);
        assert!(!map.is_set(Register::PullUpEnable, pin));
    }

    #[test]
    fn input_value_is_read_only() {
        let block = FakeBlock::new();
        let map = block.map();
        let pin = Pin::new(3).unwrap();

        block.poke(Register::InputValue, 1 << 3);
        assert!(map.is_set(Register::InputValue, pin));
        assert_eq!(map.get(Register::InputValue), 1 << 3);

        map.clear_bit(Register::InputValue, pin);
        map.reset(Register::InputValue);
        assert_eq!(block.peek(Register::InputValue), 1 << 3);
    }

    #[test]
    fn acknowledge_stores_only_the_pin_mask() {
        let block = FakeBlock::new();
        let map = block.map();

        map.acknowledge(Register::FallPending, Pin::new(9).unwrap());
        // The fake block is plain memory, so the store lands verbatim.
        assert_eq!(block.peek(Register::FallPending), 1 << 9);
    }

    #[test]
    fn register_offsets_match_enum() {
        let block = FakeBlock::new();
        let map = block.map();

        for (offset, reg) in [
            Register::InputEnable,
            Register::OutputEnable,
            Register::OutputValue,
            Register::PullUpEnable,
            Register::DriveStrength,
            Register::RiseEnable,
            Register::RisePending,
            Register::FallEnable,
            Register::FallPending,
            Register::HighEnable,
            Register::HighPending,
            Register::LowEnable,
            Register::LowPending,
            Register::IofEnable,
            Register::IofSelect,
            Register::Invert,
        ]
        .into_iter()
        .enumerate()
        {
            map.set_bit(reg, Pin::new(offset as u32).unwrap());
            assert_eq!(block.peek(reg), 1 << offset, "{:?}", reg);
        }
    }
}
