// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use super::id::{INVALID, ViewId};
use super::store::ViewStore;

/// An iterator over the direct children of a view.
///
/// Created by [`ViewStore::children`].
#[derive(Debug)]
pub struct Children<'a> {
    store: &'a ViewStore,
    current: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(store: &'a ViewStore, first: u32) -> Self {
        Self {
            store,
            current: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = ViewId;

    fn next(&mut self) -> Option<ViewId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.store.next_sibling[idx as usize];
        Some(ViewId {
            idx,
            generation: self.store.generation[idx as usize],
        })
    }
}
