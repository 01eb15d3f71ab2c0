// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Linked list with caller-owned nodes.
//!
//! Every link update is a single pointer store, followed by a compiler fence,
//! so an interrupt that walks the list between two updates always sees a
//! well-formed list. An unlinked node keeps its own `next` pointer until it is
//! pushed again, which lets a walk that is standing on it carry on.

use core::cell::Cell;
use core::sync::atomic::{compiler_fence, Ordering};

pub struct ListLink<'a, T: 'a + ?Sized>(Cell<Option<&'a T>>);

impl<'a, T: ?Sized> ListLink<'a, T> {
    pub const fn empty() -> ListLink<'a, T> {
        ListLink(Cell::new(None))
    }

    fn get(&self) -> Option<&'a T> {
        self.0.get()
    }

    fn set(&self, node: Option<&'a T>) {
        self.0.set(node);
        compiler_fence(Ordering::SeqCst);
    }
}

pub trait ListNode<'a, T: ?Sized> {
    fn next(&'a self) -> &'a ListLink<'a, T>;
}

pub struct List<'a, T: 'a + ?Sized + ListNode<'a, T>> {
    head: ListLink<'a, T>,
}

/// Walks a [`List`]. Each step reads the link it follows only when it is
/// taken, so nodes unlinked while the walk is under way are skipped.
pub struct ListIterator<'l, 'a, T: 'a + ?Sized + ListNode<'a, T>> {
    link: &'l ListLink<'a, T>,
}

impl<'l, 'a: 'l, T: ?Sized + ListNode<'a, T>> Iterator for ListIterator<'l, 'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let node = self.link.get()?;
        self.link = node.next();
        Some(node)
    }
}

impl<'a, T: ?Sized + ListNode<'a, T>> List<'a, T> {
    pub const fn new() -> List<'a, T> {
        List {
            head: ListLink::empty(),
        }
    }

    pub fn head(&self) -> Option<&'a T> {
        self.head.get()
    }

    /// Append `node`. The node must not already be in the list.
    pub fn push_tail(&self, node: &'a T) {
        node.next().set(None);
        match self.iter().last() {
            Some(last) => last.next().set(Some(node)),
            None => self.head.set(Some(node)),
        }
    }

    pub fn iter(&self) -> ListIterator<'_, 'a, T> {
        ListIterator { link: &self.head }
    }

    /// Unlink every node for which `remove` returns true, keeping the order of
    /// the others.
    pub fn remove_where<F: Fn(&'a T) -> bool>(&self, remove: F) {
        let mut link: &ListLink<'a, T> = &self.head;
        while let Some(node) = link.get() {
            if remove(node) {
                link.set(node.next().get());
            } else {
                link = node.next();
            }
        }
    }
}
