// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays view storage with allocation, topology, and lifecycle fields.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use kurbo::Rect;

use crate::geometry::Layout;
use crate::plugin::{TransitionId, TransitionKind, TransitionPlugin};
use crate::state::ViewState;

use super::id::{INVALID, ViewId};
use super::transitions::ActiveTransition;
use super::traverse::Children;

/// Per-view transition effect configuration.
///
/// Each slot optionally names a registered plugin to run at that lifecycle
/// edge. An empty slot means the edge completes synchronously.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EffectSlots {
    /// Runs after the view attaches shown.
    pub build_in: Option<TransitionId>,
    /// Runs before the view detaches.
    pub build_out: Option<TransitionId>,
    /// Runs when the view becomes visible.
    pub show: Option<TransitionId>,
    /// Runs before the view becomes invisible.
    pub hide: Option<TransitionId>,
}

/// Struct-of-arrays storage for all views, and the statechart over them.
///
/// Views are addressed by [`ViewId`] handles. Internally, each view occupies
/// a slot in parallel arrays. Destroyed views are recycled via a free list,
/// and generation counters prevent stale handle access.
///
/// Lifecycle actions ([`render`](Self::render), [`attach`](Self::attach),
/// [`show`](Self::show), ...) are methods on this store taking the per-call
/// [`Collaborators`](crate::host::Collaborators) bundle.
pub struct ViewStore {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Lifecycle --
    pub(crate) state: Vec<ViewState>,
    pub(crate) visible_intent: Vec<bool>,
    pub(crate) pending_visibility: Vec<bool>,
    pub(crate) pending_content: Vec<bool>,
    /// Outstanding build-out transitions blocking this view's detach.
    pub(crate) building_out: Vec<u32>,
    /// Slot of the ancestor whose deferred detach this view's build-out is
    /// counted against, or `INVALID`.
    pub(crate) owning_detach: Vec<u32>,
    pub(crate) active: Vec<Option<ActiveTransition>>,
    pub(crate) saved_layout: Vec<Option<Layout>>,
    pub(crate) saved_frame: Vec<Option<Rect>>,
    pub(crate) effects: Vec<EffectSlots>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Transition plugin registry --
    pub(crate) plugins: Vec<Box<dyn TransitionPlugin>>,
}

impl Default for ViewStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewStore {
    /// Creates an empty view store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            state: Vec::new(),
            visible_intent: Vec::new(),
            pending_visibility: Vec::new(),
            pending_content: Vec::new(),
            building_out: Vec::new(),
            owning_detach: Vec::new(),
            active: Vec::new(),
            saved_layout: Vec::new(),
            saved_frame: Vec::new(),
            effects: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            plugins: Vec::new(),
        }
    }

    // -- Allocation API --

    /// Creates a new view and returns its handle.
    ///
    /// The view starts [`Unmaterialized`](ViewState::Unmaterialized), with
    /// visible intent, no parent, and no configured transitions.
    pub fn create_view(&mut self) -> ViewId {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            self.generation[idx as usize] += 1;
            self.parent[idx as usize] = INVALID;
            self.first_child[idx as usize] = INVALID;
            self.next_sibling[idx as usize] = INVALID;
            self.prev_sibling[idx as usize] = INVALID;
            self.state[idx as usize] = ViewState::Unmaterialized;
            self.visible_intent[idx as usize] = true;
            self.pending_visibility[idx as usize] = false;
            self.pending_content[idx as usize] = false;
            self.building_out[idx as usize] = 0;
            self.owning_detach[idx as usize] = INVALID;
            self.active[idx as usize] = None;
            self.saved_layout[idx as usize] = None;
            self.saved_frame[idx as usize] = None;
            self.effects[idx as usize] = EffectSlots::default();
            idx
        } else {
            // Allocate a new slot.
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.state.push(ViewState::Unmaterialized);
            self.visible_intent.push(true);
            self.pending_visibility.push(false);
            self.pending_content.push(false);
            self.building_out.push(0);
            self.owning_detach.push(INVALID);
            self.active.push(None);
            self.saved_layout.push(None);
            self.saved_frame.push(None);
            self.effects.push(EffectSlots::default());
            self.generation.push(0);
            idx
        };

        ViewId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Destroys a view, freeing its slot for reuse.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale, the view has children (orphan them
    /// first), or the view is still materialized (run
    /// [`destroy_materialization`](Self::destroy_materialization) first).
    pub fn destroy_view(&mut self, id: ViewId) {
        self.validate(id);
        let idx = id.idx;
        assert!(
            self.first_child[idx as usize] == INVALID,
            "cannot destroy view with children"
        );
        assert!(
            self.state[idx as usize] == ViewState::Unmaterialized,
            "cannot destroy view in state {:?}; destroy its materialization first",
            self.state[idx as usize]
        );

        // Remove from parent's child list if linked.
        if self.parent[idx as usize] != INVALID {
            self.unlink_from_parent(idx);
        }

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;

        self.free_list.push(idx);
    }

    /// Returns whether the given handle refers to a live view.
    #[must_use]
    pub fn is_alive(&self, id: ViewId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    // -- Topology API --
    //
    // Topology is mutated only through `adopt` and `orphan` (in `actions`),
    // which layer lifecycle alignment on top of the raw link operations here.

    /// Returns the parent of a view, if any.
    #[must_use]
    pub fn parent(&self, id: ViewId) -> Option<ViewId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        if p == INVALID { None } else { Some(self.handle(p)) }
    }

    /// Returns an iterator over the direct children of a view.
    #[must_use]
    pub fn children(&self, id: ViewId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.first_child[id.idx as usize])
    }

    /// Returns the root views (those with no parent).
    #[must_use]
    pub fn roots(&self) -> Vec<ViewId> {
        let mut roots = Vec::new();
        for idx in 0..self.len {
            if self.parent[idx as usize] == INVALID && !self.free_list.contains(&idx) {
                roots.push(self.handle(idx));
            }
        }
        roots
    }

    // -- Lifecycle getters --

    /// Returns the lifecycle state of a view.
    #[must_use]
    pub fn state(&self, id: ViewId) -> ViewState {
        self.validate(id);
        self.state[id.idx as usize]
    }

    /// Returns the view's own visibility intent (independent of ancestors).
    #[must_use]
    pub fn visible_intent(&self, id: ViewId) -> bool {
        self.validate(id);
        self.visible_intent[id.idx as usize]
    }

    /// Returns whether a visibility style update is queued for replay.
    #[must_use]
    pub fn pending_visibility_update(&self, id: ViewId) -> bool {
        self.validate(id);
        self.pending_visibility[id.idx as usize]
    }

    /// Returns whether a content update is queued for replay.
    #[must_use]
    pub fn pending_content_update(&self, id: ViewId) -> bool {
        self.validate(id);
        self.pending_content[id.idx as usize]
    }

    /// Returns how many build-out transitions this view's detach is waiting on.
    ///
    /// Nonzero only while the view is [`BuildingOut`](ViewState::BuildingOut).
    #[must_use]
    pub fn building_out_count(&self, id: ViewId) -> u32 {
        self.validate(id);
        self.building_out[id.idx as usize]
    }

    /// Returns the ancestor whose deferred detach this view is blocking.
    #[must_use]
    pub fn owning_detach(&self, id: ViewId) -> Option<ViewId> {
        self.validate(id);
        let o = self.owning_detach[id.idx as usize];
        if o == INVALID { None } else { Some(self.handle(o)) }
    }

    /// Returns the kind of the view's in-flight transition, if any.
    #[must_use]
    pub fn active_transition(&self, id: ViewId) -> Option<TransitionKind> {
        self.validate(id);
        self.active[id.idx as usize].as_ref().map(|a| a.kind)
    }

    /// Returns the view's transition effect configuration.
    #[must_use]
    pub fn effects(&self, id: ViewId) -> EffectSlots {
        self.validate(id);
        self.effects[id.idx as usize]
    }

    // -- Transition configuration --

    /// Registers a transition plugin and returns its handle.
    ///
    /// Plugins are registered once and shared by any number of views.
    pub fn register_transition(&mut self, plugin: Box<dyn TransitionPlugin>) -> TransitionId {
        let id = TransitionId(u32::try_from(self.plugins.len()).unwrap_or(u32::MAX));
        self.plugins.push(plugin);
        id
    }

    /// Configures the view's build-in transition.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the transition was not registered
    /// with this store.
    pub fn set_transition_in(&mut self, id: ViewId, transition: Option<TransitionId>) {
        self.validate(id);
        self.validate_transition(transition);
        self.effects[id.idx as usize].build_in = transition;
    }

    /// Configures the view's build-out transition.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the transition was not registered
    /// with this store.
    pub fn set_transition_out(&mut self, id: ViewId, transition: Option<TransitionId>) {
        self.validate(id);
        self.validate_transition(transition);
        self.effects[id.idx as usize].build_out = transition;
    }

    /// Configures the view's show transition.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the transition was not registered
    /// with this store.
    pub fn set_transition_show(&mut self, id: ViewId, transition: Option<TransitionId>) {
        self.validate(id);
        self.validate_transition(transition);
        self.effects[id.idx as usize].show = transition;
    }

    /// Configures the view's hide transition.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the transition was not registered
    /// with this store.
    pub fn set_transition_hide(&mut self, id: ViewId, transition: Option<TransitionId>) {
        self.validate(id);
        self.validate_transition(transition);
        self.effects[id.idx as usize].hide = transition;
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: ViewId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale ViewId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    /// Panics if the transition handle was not minted by this store.
    fn validate_transition(&self, transition: Option<TransitionId>) {
        if let Some(t) = transition {
            assert!(
                (t.0 as usize) < self.plugins.len(),
                "unregistered {t:?} (registry holds {})",
                self.plugins.len()
            );
        }
    }

    /// Builds a live handle for a slot known to be occupied.
    pub(crate) fn handle(&self, idx: u32) -> ViewId {
        ViewId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Returns the handle of `idx`'s next sibling, if any.
    pub(crate) fn next_sibling_handle(&self, idx: u32) -> Option<ViewId> {
        let next = self.next_sibling[idx as usize];
        if next == INVALID {
            None
        } else {
            Some(self.handle(next))
        }
    }

    /// Links `child` as a child of `parent`, before `before` (or last when
    /// `before` is `INVALID`). `child` must currently have no parent.
    pub(crate) fn link_child(&mut self, parent: u32, child: u32, before: u32) {
        debug_assert!(self.parent[child as usize] == INVALID);
        let p = parent;
        let c = child;
        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = INVALID;
        self.next_sibling[c as usize] = INVALID;

        if before != INVALID && self.parent[before as usize] == p {
            // Splice in front of `before`.
            self.next_sibling[c as usize] = before;
            self.prev_sibling[c as usize] = self.prev_sibling[before as usize];
            if self.prev_sibling[before as usize] != INVALID {
                self.next_sibling[self.prev_sibling[before as usize] as usize] = c;
            } else {
                self.first_child[p as usize] = c;
            }
            self.prev_sibling[before as usize] = c;
        } else if self.first_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            // Walk to last child.
            let mut last = self.first_child[p as usize];
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
            self.prev_sibling[c as usize] = last;
        }
    }

    /// Removes `idx` from its parent's child list.
    pub(crate) fn unlink_from_parent(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else if p != INVALID {
            self.first_child[p as usize] = next;
        }
        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }
}

impl fmt::Debug for ViewStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewStore")
            .field("len", &self.len)
            .field("free", &self.free_list.len())
            .field("plugins", &self.plugins.len())
            .finish_non_exhaustive()
    }
}
