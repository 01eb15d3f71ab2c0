// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Registry of GPIO interrupt clients.
//!
//! Registrations are [`GpioCallback`] nodes owned by their users and chained
//! into an intrusive [`List`], so registering never allocates and never runs
//! out of room. Nodes are appended at the tail and unlinked on removal, which
//! keeps dispatch in registration order. Dispatch may interrupt a
//! registration or removal at any point: every link update is one pointer
//! store followed by a compiler fence (see [`crate::list`]), and the only
//! thing that changes inside a linked node is its pin mask, a single word.

use core::cell::Cell;

use crate::list::{List, ListLink, ListNode};

/// Interface for users of GPIO interrupts.
pub trait GpioClient {
    /// Called in interrupt context when one of the pins in the registration
    /// mask raised an interrupt. `pins` holds the pins that fired, restricted
    /// to the registration mask. `context` is the value passed at registration.
    fn fired(&self, pins: u32, context: usize);
}

/// One registration: which pins a client listens to and the value handed
/// back to it when they fire.
pub struct GpioCallback<'a> {
    client: &'a dyn GpioClient,
    pin_mask: Cell<u32>,
    context: usize,
    next: ListLink<'a, GpioCallback<'a>>,
}

impl<'a> ListNode<'a, GpioCallback<'a>> for GpioCallback<'a> {
    fn next(&'a self) -> &'a ListLink<'a, GpioCallback<'a>> {
        &self.next
    }
}

impl<'a> GpioCallback<'a> {
    pub const fn new(client: &'a dyn GpioClient, pin_mask: u32, context: usize) -> Self {
        GpioCallback {
            client,
            pin_mask: Cell::new(pin_mask),
            context,
            next: ListLink::empty(),
        }
    }

    pub fn pin_mask(&self) -> u32 {
        self.pin_mask.get()
    }

    /// Change the pins this registration listens to. Takes effect from the
    /// next dispatch, whether or not the callback is registered.
    pub fn set_pin_mask(&self, pin_mask: u32) {
        self.pin_mask.set(pin_mask);
    }

    pub fn context(&self) -> usize {
        self.context
    }
}

fn same_client(a: &dyn GpioClient, b: &dyn GpioClient) -> bool {
    core::ptr::eq(
        core::ptr::from_ref(a).cast::<()>(),
        core::ptr::from_ref(b).cast::<()>(),
    )
}

fn same_node(a: &GpioCallback<'_>, b: &GpioCallback<'_>) -> bool {
    core::ptr::eq(
        core::ptr::from_ref(a).cast::<()>(),
        core::ptr::from_ref(b).cast::<()>(),
    )
}

/// Ordered collection of [`GpioCallback`]s.
pub struct CallbackRegistry<'a> {
    callbacks: List<'a, GpioCallback<'a>>,
}

impl<'a> CallbackRegistry<'a> {
    pub const fn new() -> Self {
        CallbackRegistry {
            callbacks: List::new(),
        }
    }

    /// Append `callback`. Registering a callback that is already registered
    /// leaves it where it is.
    pub fn register(&self, callback: &'a GpioCallback<'a>) {
        if !self.contains(callback) {
            self.callbacks.push_tail(callback);
        }
    }

    /// Remove every registration made by `client`. A client that is not
    /// registered is ignored.
    pub fn unregister(&self, client: &dyn GpioClient) {
        self.callbacks
            .remove_where(|cb| same_client(cb.client, client));
    }

    /// Make the presence of `callback` match `set`.
    pub fn manage(&self, callback: &'a GpioCallback<'a>, set: bool) {
        if set {
            self.register(callback);
        } else {
            self.callbacks
                .remove_where(|cb| same_node(cb, callback));
        }
    }

    /// Fire every registration whose mask intersects `pins`, in registration
    /// order, with the intersecting bits.
    pub fn dispatch(&self, pins: u32) {
        for cb in self.callbacks.iter() {
            let fired = cb.pin_mask() & pins;
            if fired != 0 {
                cb.client.fired(fired, cb.context);
            }
        }
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.callbacks.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.head().is_none()
    }

    pub fn contains(&self, callback: &GpioCallback<'_>) -> bool {
        self.callbacks
            .iter()
            .any(|cb| same_node(cb, callback))
    }
}
