// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The parent/child propagation protocol.
//!
//! Parents never mutate child state directly. An action on a view walks its
//! subtree top-down delivering "will"/"did" messages; each child answers for
//! its own state and either participates or prunes its subtree out of the
//! traversal (returning `false`). Children whose state changed are recorded
//! on a notify stack by the caller, which delivers observer "did"
//! notifications in reverse visitation order, deepest first, before the
//! acting view's own.
//!
//! A child in a state the protocol should never produce reports a
//! [`ProtocolViolation`](crate::observer::Advisory::ProtocolViolation)
//! advisory and prunes.

use alloc::vec::Vec;

use crate::host::Collaborators;
use crate::observer::{Advisory, ProtocolMessage};
use crate::plugin::{CancelBehavior, TransitionKind};
use crate::state::ViewState;

use super::id::INVALID;
use super::store::ViewStore;

impl ViewStore {
    // -- Traversal --

    /// Visits `root`'s subtree top-down, skipping `root` itself.
    ///
    /// `f` returns whether to descend into the visited child's subtree.
    /// Sibling order is captured before each visit, so a handler may detach
    /// the child it runs on.
    pub(crate) fn descend_top_down<'a, F>(
        &mut self,
        root: u32,
        cx: &mut Collaborators<'a>,
        f: &mut F,
    ) where
        F: FnMut(&mut Self, u32, &mut Collaborators<'a>) -> bool,
    {
        let mut child = self.first_child[root as usize];
        while child != INVALID {
            let next = self.next_sibling[child as usize];
            if f(self, child, cx) {
                self.descend_top_down(child, cx, f);
            }
            child = next;
        }
    }

    /// Visits `root`'s subtree bottom-up (children before parents), skipping
    /// `root` itself. No pruning.
    pub(crate) fn descend_bottom_up<'a, F>(
        &mut self,
        root: u32,
        cx: &mut Collaborators<'a>,
        f: &mut F,
    ) where
        F: FnMut(&mut Self, u32, &mut Collaborators<'a>),
    {
        let mut child = self.first_child[root as usize];
        while child != INVALID {
            let next = self.next_sibling[child as usize];
            self.descend_bottom_up(child, cx, f);
            f(self, child, cx);
            child = next;
        }
    }

    fn protocol_violation(
        &mut self,
        c: u32,
        message: ProtocolMessage,
        cx: &mut Collaborators<'_>,
    ) {
        cx.observer.advisory(
            self.handle(c),
            Advisory::ProtocolViolation {
                message,
                state: self.state[c as usize],
            },
        );
    }

    // -- Child-side handlers --

    /// An ancestor materialized its surface.
    pub(crate) fn parent_did_materialize(
        &mut self,
        c: u32,
        cx: &mut Collaborators<'_>,
        stack: &mut Vec<u32>,
    ) -> bool {
        match self.state[c as usize] {
            ViewState::Unmaterialized => {
                self.state[c as usize] = ViewState::DetachedByParent;
                stack.push(c);
                true
            }
            _ => {
                self.protocol_violation(c, ProtocolMessage::ParentDidMaterialize, cx);
                false
            }
        }
    }

    /// An ancestor finished attaching.
    pub(crate) fn parent_did_attach(
        &mut self,
        c: u32,
        cx: &mut Collaborators<'_>,
        stack: &mut Vec<u32>,
    ) -> bool {
        match self.state[c as usize] {
            ViewState::DetachedByParent => {
                self.replay_queued_updates(c, cx);
                self.goto_attached_tier(c);
                if self.state[c as usize] == ViewState::Shown {
                    if let Some(t) = self.effects[c as usize].build_in {
                        self.begin_transition(c, TransitionKind::BuildIn, t, false, cx);
                    }
                }
                stack.push(c);
                true
            }
            // A directly-detached (or never-rendered) child stays behind.
            ViewState::Unmaterialized | ViewState::Detached => false,
            _ => {
                self.protocol_violation(c, ProtocolMessage::ParentDidAttach, cx);
                false
            }
        }
    }

    /// An ancestor's surface is about to leave the display tree.
    ///
    /// Transitional states are resolved here so nothing animates through a
    /// detach; `Showing`/`Hiding` additionally queue a visibility replay
    /// since their style flip never completed normally.
    pub(crate) fn parent_will_detach(&mut self, c: u32, cx: &mut Collaborators<'_>) -> bool {
        match self.state[c as usize] {
            ViewState::Unmaterialized | ViewState::Detached | ViewState::DetachedByParent => {
                return false;
            }
            ViewState::Showing => {
                self.state[c as usize] = ViewState::Shown;
                self.cancel_active(c, CancelBehavior::RevertToStart, cx);
                self.teardown_transition(c, cx);
                self.pending_visibility[c as usize] = true;
            }
            ViewState::Hiding => {
                self.state[c as usize] = ViewState::Hidden;
                self.cancel_active(c, CancelBehavior::RevertToStart, cx);
                self.teardown_transition(c, cx);
                self.pending_visibility[c as usize] = true;
            }
            ViewState::BuildingIn => {
                self.state[c as usize] = ViewState::Shown;
                self.cancel_active(c, CancelBehavior::JumpToEnd, cx);
                self.teardown_transition(c, cx);
            }
            ViewState::BuildingOut => {
                // Its own deferred detach is superseded; finish it now.
                self.cancel_active(c, CancelBehavior::JumpToEnd, cx);
                if self.state[c as usize] == ViewState::BuildingOut {
                    self.building_out[c as usize] = 0;
                    self.teardown_transition(c, cx);
                    self.execute_detach(c, cx);
                }
                return false;
            }
            ViewState::BuildingOutByParent => {
                let owner = self.owning_detach[c as usize];
                self.state[c as usize] = ViewState::Shown;
                self.owning_detach[c as usize] = INVALID;
                let had_active = self.cancel_active(c, CancelBehavior::JumpToEnd, cx);
                self.teardown_transition(c, cx);
                if had_active && owner != INVALID {
                    // Release the owner's count without triggering its
                    // detach; the owner is the view whose sweep we are in.
                    self.building_out[owner as usize] =
                        self.building_out[owner as usize].saturating_sub(1);
                }
            }
            ViewState::Shown
            | ViewState::ShownAnimating
            | ViewState::Hidden
            | ViewState::HiddenByParent => {}
        }
        cx.observer.will_detach(self.handle(c));
        true
    }

    /// An ancestor's surface left the display tree.
    pub(crate) fn parent_did_detach(&mut self, c: u32) -> bool {
        if self.state[c as usize].is_attached() {
            self.state[c as usize] = ViewState::DetachedByParent;
            true
        } else {
            false
        }
    }

    /// An ancestor is about to become visible.
    pub(crate) fn parent_will_show(&mut self, c: u32, cx: &mut Collaborators<'_>) -> bool {
        match self.state[c as usize] {
            ViewState::HiddenByParent => {
                self.replay_queued_updates(c, cx);
                true
            }
            ViewState::Unmaterialized | ViewState::Detached | ViewState::Hidden => false,
            _ => {
                self.protocol_violation(c, ProtocolMessage::ParentWillShow, cx);
                false
            }
        }
    }

    /// An ancestor finished becoming visible.
    pub(crate) fn parent_did_show(
        &mut self,
        c: u32,
        cx: &mut Collaborators<'_>,
        stack: &mut Vec<u32>,
    ) -> bool {
        match self.state[c as usize] {
            ViewState::HiddenByParent => {
                self.state[c as usize] = ViewState::Shown;
                stack.push(c);
                true
            }
            ViewState::Unmaterialized | ViewState::Detached | ViewState::Hidden => false,
            _ => {
                self.protocol_violation(c, ProtocolMessage::ParentDidShow, cx);
                false
            }
        }
    }

    /// An ancestor is about to become invisible.
    ///
    /// In-flight transitions are cancelled to their end state; whether the
    /// traversal continues below the child depends on where it landed.
    pub(crate) fn parent_will_hide(&mut self, c: u32, cx: &mut Collaborators<'_>) -> bool {
        match self.state[c as usize] {
            ViewState::Shown => true,
            ViewState::ShownAnimating => {
                cx.host.halt_animation(self.handle(c), CancelBehavior::JumpToEnd);
                self.state[c as usize] = ViewState::Shown;
                true
            }
            ViewState::Showing
            | ViewState::BuildingIn
            | ViewState::BuildingOut
            | ViewState::BuildingOutByParent
            | ViewState::Hiding => {
                self.cancel_active(c, CancelBehavior::JumpToEnd, cx);
                self.state[c as usize].in_display()
            }
            ViewState::Unmaterialized | ViewState::Detached | ViewState::Hidden => false,
            ViewState::DetachedByParent | ViewState::HiddenByParent => {
                self.protocol_violation(c, ProtocolMessage::ParentWillHide, cx);
                false
            }
        }
    }

    /// An ancestor finished becoming invisible.
    pub(crate) fn parent_did_hide(
        &mut self,
        c: u32,
        cx: &mut Collaborators<'_>,
        stack: &mut Vec<u32>,
    ) -> bool {
        match self.state[c as usize] {
            ViewState::Shown => {
                self.state[c as usize] = ViewState::HiddenByParent;
                stack.push(c);
                true
            }
            ViewState::Unmaterialized | ViewState::Detached | ViewState::Hidden => false,
            _ => {
                self.protocol_violation(c, ProtocolMessage::ParentDidHide, cx);
                false
            }
        }
    }

    /// An ancestor began a deferred detach; shown children with a configured
    /// build-out start it now, counted against `owner`'s detach.
    pub(crate) fn parent_will_build_out(
        &mut self,
        c: u32,
        owner: u32,
        cx: &mut Collaborators<'_>,
    ) -> bool {
        match self.state[c as usize] {
            ViewState::Shown | ViewState::Showing | ViewState::BuildingIn => {
                if let Some(t) = self.effects[c as usize].build_out {
                    let in_place = self.active[c as usize].is_some();
                    if in_place {
                        // Quietly stop the incoming transition; the
                        // build-out takes over from current geometry.
                        self.state[c as usize] = ViewState::Shown;
                        self.cancel_active(c, CancelBehavior::KeepCurrent, cx);
                    }
                    self.owning_detach[c as usize] = owner;
                    self.begin_transition(c, TransitionKind::BuildOut, t, in_place, cx);
                    self.state[c as usize] = ViewState::BuildingOutByParent;
                }
                true
            }
            ViewState::ShownAnimating => true,
            _ => false,
        }
    }

    /// The ancestor whose deferred detach this subtree was building out for
    /// changed its mind (it re-attached, or a descendant is re-detaching on
    /// its own terms).
    pub(crate) fn parent_did_cancel_build_out(
        &mut self,
        c: u32,
        cx: &mut Collaborators<'_>,
    ) -> bool {
        match self.state[c as usize] {
            ViewState::BuildingOutByParent => {
                let owner = self.owning_detach[c as usize];
                let had_active = self.active[c as usize].is_some();
                let build_in = self.effects[c as usize].build_in;
                self.state[c as usize] = ViewState::Shown;
                self.owning_detach[c as usize] = INVALID;
                if let Some(t) = build_in {
                    self.cancel_active(c, CancelBehavior::KeepCurrent, cx);
                    self.begin_transition(c, TransitionKind::BuildIn, t, true, cx);
                } else {
                    self.cancel_active(c, CancelBehavior::RevertToStart, cx);
                    self.teardown_transition(c, cx);
                }
                if had_active && owner != INVALID {
                    // Release the count held against the old owner; cancel
                    // paths never trigger a detach.
                    self.building_out[owner as usize] =
                        self.building_out[owner as usize].saturating_sub(1);
                }
                true
            }
            // Building out on its own terms; leave it be.
            ViewState::BuildingOut => false,
            ViewState::Unmaterialized | ViewState::Detached | ViewState::DetachedByParent => false,
            s if s.is_hidden() => false,
            _ => true,
        }
    }
}
