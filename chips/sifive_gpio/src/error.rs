// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Errors returned by the GPIO controller.

use thiserror::Error;

/// Every failure the controller reports.
///
/// All of these are local validation rejections raised synchronously to the
/// caller. Nothing running in interrupt context produces one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[repr(usize)]
pub enum GpioError {
    /// The pin index is not below [`PIN_COUNT`](crate::registers::PIN_COUNT).
    #[error("pin index out of range")]
    InvalidPin = 0,
    /// Only per-pin access is implemented; port-wide access is rejected.
    #[error("access mode not supported")]
    UnsupportedOperation = 1,
    /// The pin is configured as an input and cannot be driven.
    #[error("pin is configured as input")]
    PinIsInput = 2,
    /// The invert register only applies to outputs.
    #[error("polarity inversion is only supported on outputs")]
    UnsupportedPolarityForInput = 3,
    /// The hardware has pull-up resistors only.
    #[error("pull-down is not supported")]
    UnsupportedPullDown = 4,
    /// Interrupt triggers can only be configured on inputs.
    #[error("interrupts are not supported on outputs")]
    InterruptNotSupportedOnOutput = 5,
    /// The controller base address or interrupt range is unusable.
    #[error("invalid controller configuration")]
    InvalidConfig = 6,
}

impl From<GpioError> for usize {
    fn from(err: GpioError) -> usize {
        err as usize
    }
}
