// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The transition coordinator.
//!
//! Starts, cancels, and resolves plugin-driven transitions. A transition is
//! pending from [`begin_transition`](ViewStore::begin_transition) until it
//! resolves, either through a completion entry point or through
//! [`cancel_active`](ViewStore::cancel_active). Resolution always *takes*
//! the [`ActiveTransition`] out of its slot before dispatching, so a given
//! run resolves at most once; late plugin callbacks find the slot empty and
//! do nothing.
//!
//! Geometry hygiene: unless a transition continues in place from a previous
//! one, the view's layout and frame are snapshotted before the plugin runs
//! and the layout is restored through the host on teardown.

use crate::host::Collaborators;
use crate::plugin::{CancelBehavior, TransitionContext, TransitionId, TransitionKind};
use crate::state::ViewState;

use super::id::{INVALID, ViewId};
use super::store::ViewStore;

/// A transition that has started and not yet resolved.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ActiveTransition {
    pub(crate) kind: TransitionKind,
    pub(crate) plugin: TransitionId,
}

impl ViewStore {
    /// Saves the view's current geometry for restoration on teardown.
    fn snapshot_geometry(&mut self, idx: u32, cx: &mut Collaborators<'_>) {
        let id = self.handle(idx);
        self.saved_layout[idx as usize] = Some(cx.host.layout(id));
        self.saved_frame[idx as usize] = Some(cx.host.frame(id));
    }

    /// Restores the pre-transition layout, if one was snapshotted.
    pub(crate) fn teardown_transition(&mut self, idx: u32, cx: &mut Collaborators<'_>) {
        if let Some(layout) = self.saved_layout[idx as usize].take() {
            cx.host.set_layout(self.handle(idx), layout);
        }
        self.saved_frame[idx as usize] = None;
    }

    /// Starts a transition on `idx`.
    ///
    /// Snapshots geometry (unless continuing in place), moves the view to
    /// the matching transitional state (callers pick between the two
    /// build-out states themselves), counts build-outs against the owning
    /// detach, and invokes the plugin's `setup` and `run`.
    pub(crate) fn begin_transition(
        &mut self,
        idx: u32,
        kind: TransitionKind,
        plugin: TransitionId,
        in_place: bool,
        cx: &mut Collaborators<'_>,
    ) {
        if !in_place {
            self.snapshot_geometry(idx, cx);
        }
        self.active[idx as usize] = Some(ActiveTransition { kind, plugin });
        match kind {
            TransitionKind::BuildIn => self.state[idx as usize] = ViewState::BuildingIn,
            TransitionKind::Show => self.state[idx as usize] = ViewState::Showing,
            TransitionKind::Hide => self.state[idx as usize] = ViewState::Hiding,
            TransitionKind::BuildOut => {
                let owner = if self.owning_detach[idx as usize] != INVALID {
                    self.owning_detach[idx as usize]
                } else {
                    idx
                };
                self.building_out[owner as usize] += 1;
            }
        }

        let mut tcx = TransitionContext {
            view: self.handle(idx),
            kind,
            in_place,
            saved_layout: self.saved_layout[idx as usize],
            saved_frame: self.saved_frame[idx as usize],
            host: &mut *cx.host,
        };
        let p = &mut self.plugins[plugin.0 as usize];
        p.setup(&mut tcx);
        p.run(&mut tcx);
    }

    /// Cancels the view's in-flight transition, if any, then resolves it
    /// through the same path a natural completion would.
    ///
    /// Callers that want the resolution body to do nothing (a quiet cancel)
    /// pre-set the view's steady state first; the body dispatches on state
    /// and no-ops on anything non-transitional.
    pub(crate) fn cancel_active(
        &mut self,
        idx: u32,
        behavior: CancelBehavior,
        cx: &mut Collaborators<'_>,
    ) -> bool {
        let Some(active) = self.active[idx as usize].take() else {
            return false;
        };
        let mut tcx = TransitionContext {
            view: self.handle(idx),
            kind: active.kind,
            in_place: matches!(behavior, CancelBehavior::KeepCurrent),
            saved_layout: self.saved_layout[idx as usize],
            saved_frame: self.saved_frame[idx as usize],
            host: &mut *cx.host,
        };
        self.plugins[active.plugin.0 as usize].cancel(&mut tcx, behavior);
        match active.kind {
            TransitionKind::BuildIn | TransitionKind::Show => self.resolve_incoming(idx, cx),
            TransitionKind::BuildOut | TransitionKind::Hide => self.resolve_outgoing(idx, cx),
        }
        true
    }

    /// Reports that an incoming (build-in or show) transition finished.
    ///
    /// Called by plugins when their animation completes. Duplicate or late
    /// calls are no-ops.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn transition_did_complete_in(&mut self, view: ViewId, cx: &mut Collaborators<'_>) {
        self.validate(view);
        let idx = view.idx;
        if self.active[idx as usize].take().is_some() {
            self.resolve_incoming(idx, cx);
        }
    }

    /// Reports that an outgoing (build-out or hide) transition finished.
    ///
    /// Called by plugins when their animation completes. Duplicate or late
    /// calls are no-ops.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn transition_did_complete_out(&mut self, view: ViewId, cx: &mut Collaborators<'_>) {
        self.validate(view);
        let idx = view.idx;
        if self.active[idx as usize].take().is_some() {
            self.resolve_outgoing(idx, cx);
        }
    }

    /// Settles the view after an incoming transition resolved.
    fn resolve_incoming(&mut self, idx: u32, cx: &mut Collaborators<'_>) {
        match self.state[idx as usize] {
            ViewState::Showing | ViewState::BuildingIn => {
                self.teardown_transition(idx, cx);
                self.state[idx as usize] = ViewState::Shown;
            }
            // Quiet cancel: a steady state was pre-set.
            _ => {}
        }
    }

    /// Settles the view after an outgoing transition resolved.
    fn resolve_outgoing(&mut self, idx: u32, cx: &mut Collaborators<'_>) {
        match self.state[idx as usize] {
            ViewState::BuildingOut => {
                // Our own build-out is one of the counted blockers.
                self.building_out[idx as usize] = self.building_out[idx as usize].saturating_sub(1);
                if self.building_out[idx as usize] == 0 {
                    self.teardown_transition(idx, cx);
                    self.execute_detach(idx, cx);
                }
                // Otherwise children are still building out; the last of
                // them triggers the detach.
            }
            ViewState::BuildingOutByParent => {
                let owner = self.owning_detach[idx as usize];
                if owner != INVALID {
                    self.building_out[owner as usize] =
                        self.building_out[owner as usize].saturating_sub(1);
                    if self.building_out[owner as usize] == 0
                        && self.state[owner as usize] == ViewState::BuildingOut
                        && self.active[owner as usize].is_none()
                    {
                        self.teardown_transition(owner, cx);
                        self.execute_detach(owner, cx);
                    }
                }
                // The view keeps its by-parent state and owner link until
                // the owner's detach sweeps it to DetachedByParent.
            }
            ViewState::Hiding => {
                self.teardown_transition(idx, cx);
                self.execute_hide(idx, cx);
            }
            // Quiet cancel: a steady state was pre-set.
            _ => {}
        }
    }
}
