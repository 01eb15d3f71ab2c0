// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! In-memory stand-ins for the hardware used by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;

use crate::callback::{GpioCallback, GpioClient};
use crate::interrupt::{InterruptController, InterruptHandler};
use crate::registers::{GpioRegisterMap, GpioRegisters, Register, REGISTER_COUNT};

/// Give a test value the `'static` lifetime drivers expect.
pub(crate) fn leak<T>(value: T) -> &'static T {
    Box::leak(Box::new(value))
}

/// A registration that lives for the rest of the test run.
pub(crate) fn callback(
    client: &'static dyn GpioClient,
    pin_mask: u32,
    context: usize,
) -> &'static GpioCallback<'static> {
    leak(GpioCallback::new(client, pin_mask, context))
}

pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A register block backed by plain memory.
#[derive(Clone, Copy)]
pub(crate) struct FakeBlock {
    words: &'static [Cell<u32>; REGISTER_COUNT],
}

impl FakeBlock {
    pub(crate) fn new() -> FakeBlock {
        FakeBlock {
            words: leak(core::array::from_fn(|_| Cell::new(0))),
        }
    }

    pub(crate) fn map(&self) -> GpioRegisterMap<'static> {
        let words: *const [Cell<u32>; REGISTER_COUNT] = self.words;
        // `Cell<u32>` and the register types are both transparent wrappers
        // around an `UnsafeCell<u32>`, so the array has the block's layout.
        GpioRegisterMap::new(unsafe { &*words.cast::<GpioRegisters>() })
    }

    pub(crate) fn peek(&self, reg: Register) -> u32 {
        self.words[reg as usize].get()
    }

    pub(crate) fn poke(&self, reg: Register, value: u32) {
        self.words[reg as usize].set(value);
    }

    pub(crate) fn snapshot(&self) -> [u32; REGISTER_COUNT] {
        core::array::from_fn(|i| self.words[i].get())
    }

    pub(crate) fn fill(&self, value: u32) {
        for word in self.words {
            word.set(value);
        }
    }
}

/// Interrupt controller that records masking and delivers on request.
pub(crate) struct FakeIntc<'a> {
    handlers: RefCell<Vec<(u32, &'a dyn InterruptHandler)>>,
    unmasked: RefCell<BTreeSet<u32>>,
    pending: Cell<u32>,
}

impl<'a> FakeIntc<'a> {
    pub(crate) fn new() -> FakeIntc<'a> {
        FakeIntc {
            handlers: RefCell::new(Vec::new()),
            unmasked: RefCell::new(BTreeSet::new()),
            pending: Cell::new(0),
        }
    }

    pub(crate) fn installed(&self) -> Vec<u32> {
        self.handlers.borrow().iter().map(|(irq, _)| *irq).collect()
    }

    pub(crate) fn is_unmasked(&self, irq: u32) -> bool {
        self.unmasked.borrow().contains(&irq)
    }

    /// Deliver `irq` if it is unmasked and has a handler. Returns whether a
    /// handler ran.
    pub(crate) fn raise(&self, irq: u32) -> bool {
        if !self.is_unmasked(irq) {
            return false;
        }
        let handler = self
            .handlers
            .borrow()
            .iter()
            .find(|(id, _)| *id == irq)
            .map(|(_, handler)| *handler);
        match handler {
            Some(handler) => {
                self.pending.set(irq);
                handler.handle_interrupt();
                true
            }
            None => false,
        }
    }

    pub(crate) fn set_pending(&self, irq: u32) {
        self.pending.set(irq);
    }
}

impl<'a> InterruptController<'a> for FakeIntc<'a> {
    fn mask(&self, irq: u32) {
        self.unmasked.borrow_mut().remove(&irq);
    }

    fn unmask(&self, irq: u32) {
        self.unmasked.borrow_mut().insert(irq);
    }

    fn current_pending_id(&self) -> u32 {
        self.pending.get()
    }

    fn install_handler(&self, irq: u32, handler: &'a dyn InterruptHandler) {
        let mut handlers = self.handlers.borrow_mut();
        handlers.retain(|(id, _)| *id != irq);
        handlers.push((irq, handler));
    }
}

/// Client that records every call, and hands out tagged clients that log
/// which of them fired.
pub(crate) struct Recorder {
    calls: RefCell<Vec<(u32, usize)>>,
    tags: RefCell<Vec<u32>>,
}

impl Recorder {
    pub(crate) fn new() -> Recorder {
        Recorder {
            calls: RefCell::new(Vec::new()),
            tags: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn tagged(&self, tag: u32) -> Tagged<'_> {
        Tagged { log: self, tag }
    }

    pub(crate) fn calls(&self) -> Vec<(u32, usize)> {
        self.calls.borrow().clone()
    }

    pub(crate) fn tags(&self) -> Vec<u32> {
        self.tags.borrow().clone()
    }
}

impl GpioClient for Recorder {
    fn fired(&self, pins: u32, context: usize) {
        self.calls.borrow_mut().push((pins, context));
    }
}

pub(crate) struct Tagged<'a> {
    log: &'a Recorder,
    tag: u32,
}

impl GpioClient for Tagged<'_> {
    fn fired(&self, pins: u32, context: usize) {
        self.log.tags.borrow_mut().push(self.tag);
        self.log.calls.borrow_mut().push((pins, context));
    }
}
