// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The lifecycle action dispatcher.
//!
//! Every public action validates its handle, dispatches on the view's
//! current state, and returns whether the request was handled. Requests
//! that have no meaning in the current state are refused with an
//! [`Advisory`] through the observer; they never corrupt state.
//!
//! Actions compose: `render` on a view whose parent is already attached
//! continues into `attach`; `adopt` renders, attaches, or demotes the child
//! to align it with its new parent's tier.

use alloc::vec::Vec;

use crate::host::{AnchorId, Collaborators};
use crate::observer::{Action, Advisory};
use crate::plugin::{CancelBehavior, TransitionKind};
use crate::state::ViewState;

use super::id::{INVALID, ViewId};
use super::store::ViewStore;

impl ViewStore {
    // -- render --

    /// Materializes a surface for `view` and its subtree.
    ///
    /// Handled only from [`Unmaterialized`](ViewState::Unmaterialized).
    /// Children become [`DetachedByParent`](ViewState::DetachedByParent);
    /// did-create notifications are delivered deepest-first, the acting view
    /// last. If the view's parent is already materialized, the view continues
    /// straight into [`attach`](Self::attach) at the parent's container
    /// anchor, riding along as [`DetachedByParent`](ViewState::DetachedByParent)
    /// when the parent's own surface is detached.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn render(&mut self, view: ViewId, cx: &mut Collaborators<'_>) -> bool {
        self.validate(view);
        let idx = view.idx;
        if self.state[idx as usize] != ViewState::Unmaterialized {
            self.misuse(idx, Action::Render, cx);
            return false;
        }
        self.execute_render(idx, cx);

        let p = self.parent[idx as usize];
        if p != INVALID && self.state[p as usize].is_materialized() {
            let anchor = cx.host.container_anchor(self.handle(p));
            let before = self.attached_next_sibling(idx);
            self.attach(view, anchor, before, cx);
        }
        true
    }

    fn execute_render(&mut self, idx: u32, cx: &mut Collaborators<'_>) {
        cx.host.render_to_surface(self.handle(idx));
        self.state[idx as usize] = ViewState::Detached;

        let mut stack: Vec<u32> = Vec::new();
        self.descend_top_down(idx, cx, &mut |s, c, cx| {
            s.parent_did_materialize(c, cx, &mut stack)
        });
        for &c in stack.iter().rev() {
            cx.observer.did_create_materialization(self.handle(c));
        }
        cx.observer.did_create_materialization(self.handle(idx));
    }

    // -- attach --

    /// Inserts `view`'s surface into the host tree under `anchor`.
    ///
    /// Handled from [`Detached`](ViewState::Detached) (the normal case) and
    /// from [`BuildingOut`](ViewState::BuildingOut), where it reverses the
    /// pending detach: children's by-parent build-outs are cancelled, the
    /// view's own outgoing transition resolves quietly in place, and a
    /// configured build-in restarts from the current geometry. Requests in
    /// any other state are refused, silently except for an attached shown
    /// view (detach it first) and a child detached by its parent (attach
    /// the ancestor instead).
    ///
    /// # Panics
    ///
    /// Panics if `view` or `before` is stale.
    pub fn attach(
        &mut self,
        view: ViewId,
        anchor: AnchorId,
        before: Option<ViewId>,
        cx: &mut Collaborators<'_>,
    ) -> bool {
        self.validate(view);
        if let Some(b) = before {
            self.validate(b);
        }
        let idx = view.idx;
        match self.state[idx as usize] {
            ViewState::Detached => {
                cx.observer.will_attach(view);
                self.replay_queued_updates(idx, cx);
                cx.host.insert(view, anchor, before);
                let p = self.parent[idx as usize];
                if p == INVALID || self.state[p as usize].is_attached() {
                    self.execute_attach(idx, cx);
                    if self.state[idx as usize] == ViewState::Shown {
                        if let Some(t) = self.effects[idx as usize].build_in {
                            self.begin_transition(idx, TransitionKind::BuildIn, t, false, cx);
                        }
                    }
                } else {
                    // The parent's surface is itself detached; ride along
                    // until the parent attaches.
                    self.state[idx as usize] = ViewState::DetachedByParent;
                }
                true
            }
            ViewState::BuildingOut => {
                // Reverse direction. Settle our own bookkeeping before the
                // cascade so child completions see nothing to decrement.
                self.building_out[idx as usize] = 0;
                let build_in = self.effects[idx as usize].build_in;
                self.state[idx as usize] = ViewState::Shown;
                self.descend_top_down(idx, cx, &mut |s, c, cx| {
                    s.parent_did_cancel_build_out(c, cx)
                });
                if let Some(t) = build_in {
                    self.cancel_active(idx, CancelBehavior::KeepCurrent, cx);
                    self.begin_transition(idx, TransitionKind::BuildIn, t, true, cx);
                } else {
                    self.cancel_active(idx, CancelBehavior::RevertToStart, cx);
                    self.teardown_transition(idx, cx);
                }
                true
            }
            ViewState::DetachedByParent => {
                cx.observer
                    .advisory(view, Advisory::AttachedChildDirectly);
                false
            }
            ViewState::Shown | ViewState::ShownAnimating => {
                cx.observer.advisory(view, Advisory::MovedWithoutDetach);
                false
            }
            // Mid-transition, hidden, or never rendered; nothing to do.
            _ => false,
        }
    }

    fn execute_attach(&mut self, idx: u32, cx: &mut Collaborators<'_>) {
        self.goto_attached_tier(idx);
        let mut stack: Vec<u32> = Vec::new();
        self.descend_top_down(idx, cx, &mut |s, c, cx| s.parent_did_attach(c, cx, &mut stack));
        for &c in stack.iter().rev() {
            cx.observer.did_attach(self.handle(c));
        }
        cx.observer.did_attach(self.handle(idx));
    }

    /// Picks the attached steady state for a freshly attached view: its own
    /// intent first, then the parent's visibility.
    pub(crate) fn goto_attached_tier(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let parent_shown = p == INVALID || self.state[p as usize].is_shown();
        self.state[idx as usize] = if !self.visible_intent[idx as usize] {
            ViewState::Hidden
        } else if parent_shown {
            ViewState::Shown
        } else {
            ViewState::HiddenByParent
        };
    }

    // -- detach --

    /// Removes `view`'s surface from the host tree.
    ///
    /// With `immediately` false, a configured build-out transition (and any
    /// child build-outs) runs first; the surface is removed only when the
    /// outstanding count drains to zero. In-flight transitions are resolved
    /// per state before the detach proceeds.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn detach(&mut self, view: ViewId, immediately: bool, cx: &mut Collaborators<'_>) -> bool {
        self.validate(view);
        let idx = view.idx;
        let mut immediately = immediately;
        let mut in_place = false;
        match self.state[idx as usize] {
            ViewState::Unmaterialized | ViewState::Detached => return false,
            ViewState::Shown => {}
            ViewState::DetachedByParent | ViewState::Hidden | ViewState::HiddenByParent => {
                // Not in the visible display; a transition would be unseen.
                immediately = true;
            }
            ViewState::ShownAnimating => {
                cx.host.halt_animation(view, CancelBehavior::JumpToEnd);
                self.state[idx as usize] = ViewState::Shown;
            }
            ViewState::Showing => {
                self.cancel_active(idx, CancelBehavior::JumpToEnd, cx);
            }
            ViewState::Hiding => {
                self.cancel_active(idx, CancelBehavior::JumpToEnd, cx);
                immediately = true;
            }
            ViewState::BuildingIn => {
                if immediately || self.effects[idx as usize].build_out.is_none() {
                    self.cancel_active(idx, CancelBehavior::JumpToEnd, cx);
                } else {
                    // Convert the half-done build-in into a build-out from
                    // the current geometry.
                    self.state[idx as usize] = ViewState::Shown;
                    self.cancel_active(idx, CancelBehavior::KeepCurrent, cx);
                    in_place = true;
                }
            }
            ViewState::BuildingOut => {
                if immediately {
                    self.cancel_active(idx, CancelBehavior::JumpToEnd, cx);
                    if self.state[idx as usize] == ViewState::BuildingOut {
                        // Children were still animating; cut them short.
                        self.building_out[idx as usize] = 0;
                        self.teardown_transition(idx, cx);
                        self.execute_detach(idx, cx);
                    }
                }
                return true;
            }
            ViewState::BuildingOutByParent => {
                // Re-detached on its own terms mid build-out: resolve the
                // by-parent run quietly and recount from scratch below.
                let owner = self.owning_detach[idx as usize];
                let had_active = self.active[idx as usize].is_some();
                self.state[idx as usize] = ViewState::Shown;
                self.owning_detach[idx as usize] = INVALID;
                self.cancel_active(idx, CancelBehavior::KeepCurrent, cx);
                self.descend_top_down(idx, cx, &mut |s, c, cx| {
                    s.parent_did_cancel_build_out(c, cx)
                });
                if owner != INVALID {
                    if had_active {
                        self.building_out[owner as usize] =
                            self.building_out[owner as usize].saturating_sub(1);
                    }
                    // The cascade may have released the owner's last
                    // blocker even when this view's own run had already
                    // completed; check the owner either way.
                    if self.building_out[owner as usize] == 0
                        && self.state[owner as usize] == ViewState::BuildingOut
                        && self.active[owner as usize].is_none()
                    {
                        self.teardown_transition(owner, cx);
                        self.execute_detach(owner, cx);
                        // The owner's detach swept this view out with it.
                        return self.detach(view, immediately, cx);
                    }
                }
                in_place = true;
            }
        }

        if immediately {
            self.execute_detach(idx, cx);
            return true;
        }

        // Deferred path: children's build-outs first, then our own.
        self.building_out[idx as usize] = 0;
        let owner = idx;
        self.descend_top_down(idx, cx, &mut |s, c, cx| s.parent_will_build_out(c, owner, cx));
        if let Some(t) = self.effects[idx as usize].build_out {
            self.begin_transition(idx, TransitionKind::BuildOut, t, in_place, cx);
            self.state[idx as usize] = ViewState::BuildingOut;
        } else if self.building_out[idx as usize] > 0 {
            self.state[idx as usize] = ViewState::BuildingOut;
        } else {
            self.execute_detach(idx, cx);
        }
        true
    }

    /// The unconditional detach: resolves children, removes the surface,
    /// and demotes the subtree.
    pub(crate) fn execute_detach(&mut self, idx: u32, cx: &mut Collaborators<'_>) {
        cx.observer.will_detach(self.handle(idx));
        self.descend_top_down(idx, cx, &mut |s, c, cx| s.parent_will_detach(c, cx));
        cx.host.remove(self.handle(idx));
        self.state[idx as usize] = ViewState::Detached;
        self.building_out[idx as usize] = 0;
        self.owning_detach[idx as usize] = INVALID;
        self.descend_top_down(idx, cx, &mut |s, c, _cx| s.parent_did_detach(c));
        cx.observer.did_detach(self.handle(idx));
    }

    // -- destroy --

    /// Discards the surfaces of `view` and its subtree.
    ///
    /// Handled only from [`Detached`](ViewState::Detached); every other
    /// state is a silent no-op. Children are discarded before parents;
    /// already-unmaterialized subtrees are skipped. Queued updates and
    /// transition bookkeeping are reset.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn destroy_materialization(&mut self, view: ViewId, cx: &mut Collaborators<'_>) -> bool {
        self.validate(view);
        let idx = view.idx;
        if self.state[idx as usize] != ViewState::Detached {
            return false;
        }
        self.descend_bottom_up(idx, cx, &mut |s, c, cx| s.teardown_surface(c, cx));
        self.teardown_surface(idx, cx);
        true
    }

    fn teardown_surface(&mut self, c: u32, cx: &mut Collaborators<'_>) {
        if self.state[c as usize] == ViewState::Unmaterialized {
            return;
        }
        cx.observer.will_destroy_materialization(self.handle(c));
        cx.host.discard_surface(self.handle(c));
        self.pending_visibility[c as usize] = false;
        self.pending_content[c as usize] = false;
        self.saved_layout[c as usize] = None;
        self.saved_frame[c as usize] = None;
        self.active[c as usize] = None;
        self.building_out[c as usize] = 0;
        self.owning_detach[c as usize] = INVALID;
        self.state[c as usize] = ViewState::Unmaterialized;
    }

    // -- show / hide --

    /// Makes `view` visible.
    ///
    /// Always records the intent. From [`Hidden`](ViewState::Hidden) under a
    /// shown (or absent) parent the visibility flips now, through a show
    /// transition when one is configured; under a non-shown ancestor the
    /// view queues the style update and waits as
    /// [`HiddenByParent`](ViewState::HiddenByParent). A mid-flight hide
    /// transition is taken over in place. While not attached, the update is
    /// queued for replay.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn show(&mut self, view: ViewId, cx: &mut Collaborators<'_>) -> bool {
        self.validate(view);
        let idx = view.idx;
        self.visible_intent[idx as usize] = true;
        match self.state[idx as usize] {
            ViewState::Hidden => {
                let p = self.parent[idx as usize];
                let parent_shown = p == INVALID || self.state[p as usize].is_shown();
                if parent_shown {
                    self.replay_queued_updates(idx, cx);
                    self.descend_top_down(idx, cx, &mut |s, c, cx| s.parent_will_show(c, cx));
                    cx.observer.will_show(view);
                    self.execute_show(idx, cx);
                    if let Some(t) = self.effects[idx as usize].show {
                        self.begin_transition(idx, TransitionKind::Show, t, false, cx);
                    }
                } else {
                    self.pending_visibility[idx as usize] = true;
                    self.state[idx as usize] = ViewState::HiddenByParent;
                }
                true
            }
            ViewState::Hiding => {
                // Take over the hide mid-flight.
                let show_t = self.effects[idx as usize].show;
                self.state[idx as usize] = ViewState::Shown;
                if let Some(t) = show_t {
                    self.cancel_active(idx, CancelBehavior::KeepCurrent, cx);
                    self.begin_transition(idx, TransitionKind::Show, t, true, cx);
                } else {
                    self.cancel_active(idx, CancelBehavior::RevertToStart, cx);
                    self.teardown_transition(idx, cx);
                }
                true
            }
            ViewState::Detached | ViewState::DetachedByParent => {
                self.pending_visibility[idx as usize] = true;
                true
            }
            _ => {
                self.misuse(idx, Action::Show, cx);
                false
            }
        }
    }

    /// Makes `view` invisible.
    ///
    /// Always records the intent. From shown-tier states the visibility
    /// flips now, through a hide transition when one is configured (the
    /// style change and will/did notifications then wait for its
    /// completion). Mid-flight incoming transitions are taken over; a view
    /// building out records the intent for replay instead of disturbing the
    /// pending detach. While not attached, the update is queued for replay.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn hide(&mut self, view: ViewId, cx: &mut Collaborators<'_>) -> bool {
        self.validate(view);
        let idx = view.idx;
        self.visible_intent[idx as usize] = false;
        match self.state[idx as usize] {
            ViewState::Shown => {
                self.run_hide(idx, cx);
                true
            }
            ViewState::ShownAnimating => {
                cx.host.halt_animation(view, CancelBehavior::JumpToEnd);
                self.state[idx as usize] = ViewState::Shown;
                self.run_hide(idx, cx);
                true
            }
            ViewState::Showing | ViewState::BuildingIn => {
                // Take over the incoming transition from current geometry.
                self.state[idx as usize] = ViewState::Shown;
                self.cancel_active(idx, CancelBehavior::KeepCurrent, cx);
                self.run_hide(idx, cx);
                true
            }
            ViewState::BuildingOut | ViewState::BuildingOutByParent => {
                // Don't disturb the pending detach; the style catches up on
                // the next attach.
                self.pending_visibility[idx as usize] = true;
                true
            }
            ViewState::HiddenByParent => {
                // Hidden on its own terms now, not just the ancestor's.
                self.apply_visibility_style(idx, cx);
                self.state[idx as usize] = ViewState::Hidden;
                true
            }
            ViewState::Detached | ViewState::DetachedByParent => {
                self.pending_visibility[idx as usize] = true;
                true
            }
            ViewState::Unmaterialized => {
                self.misuse(idx, Action::Hide, cx);
                false
            }
            // Already hidden (or on its way); nothing to do.
            ViewState::Hidden | ViewState::Hiding => false,
        }
    }

    fn run_hide(&mut self, idx: u32, cx: &mut Collaborators<'_>) {
        if let Some(t) = self.effects[idx as usize].hide {
            self.begin_transition(idx, TransitionKind::Hide, t, false, cx);
        } else {
            self.execute_hide(idx, cx);
        }
    }

    fn execute_show(&mut self, idx: u32, cx: &mut Collaborators<'_>) {
        self.apply_visibility_style(idx, cx);
        self.state[idx as usize] = ViewState::Shown;
        let mut stack: Vec<u32> = Vec::new();
        self.descend_top_down(idx, cx, &mut |s, c, cx| s.parent_did_show(c, cx, &mut stack));
        for &c in stack.iter().rev() {
            cx.observer.did_show(self.handle(c));
        }
        cx.observer.did_show(self.handle(idx));
    }

    pub(crate) fn execute_hide(&mut self, idx: u32, cx: &mut Collaborators<'_>) {
        cx.observer.will_hide(self.handle(idx));
        self.descend_top_down(idx, cx, &mut |s, c, cx| s.parent_will_hide(c, cx));
        self.apply_visibility_style(idx, cx);
        self.state[idx as usize] = ViewState::Hidden;
        let mut stack: Vec<u32> = Vec::new();
        self.descend_top_down(idx, cx, &mut |s, c, cx| s.parent_did_hide(c, cx, &mut stack));
        for &c in stack.iter().rev() {
            cx.observer.did_hide(self.handle(c));
        }
        cx.observer.did_hide(self.handle(idx));
    }

    fn apply_visibility_style(&mut self, idx: u32, cx: &mut Collaborators<'_>) {
        cx.host
            .apply_visibility(self.handle(idx), self.visible_intent[idx as usize]);
        self.pending_visibility[idx as usize] = false;
    }

    /// Dispatches to [`show`](Self::show) or [`hide`](Self::hide).
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_visible(&mut self, view: ViewId, visible: bool, cx: &mut Collaborators<'_>) -> bool {
        if visible {
            self.show(view, cx)
        } else {
            self.hide(view, cx)
        }
    }

    // -- content --

    /// Re-renders `view`'s content, or queues the update for replay.
    ///
    /// The host is called right away while the view is in the visible
    /// display, or when `force` is set; otherwise the update is recorded
    /// and replayed when the view next becomes eligible. Unhandled while
    /// unmaterialized.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn update_content(&mut self, view: ViewId, force: bool, cx: &mut Collaborators<'_>) -> bool {
        self.validate(view);
        let idx = view.idx;
        if !self.state[idx as usize].is_materialized() {
            self.misuse(idx, Action::UpdateContent, cx);
            return false;
        }
        if self.state[idx as usize].in_display() || force {
            cx.host.update_content(view);
            self.pending_content[idx as usize] = false;
        } else {
            self.pending_content[idx as usize] = true;
        }
        true
    }

    /// Replays queued visibility and content updates, at most once each.
    pub(crate) fn replay_queued_updates(&mut self, idx: u32, cx: &mut Collaborators<'_>) {
        if self.pending_visibility[idx as usize] {
            self.apply_visibility_style(idx, cx);
        }
        if self.pending_content[idx as usize] {
            cx.host.update_content(self.handle(idx));
            self.pending_content[idx as usize] = false;
        }
    }

    // -- topology --

    /// Links `view` under `parent`, before `before` (or as the last child),
    /// then pulls it to the parent's lifecycle tier: rendering, attaching,
    /// or discarding its materialization as needed. If `view` already has a
    /// different parent it is orphaned first, with an advisory.
    ///
    /// Returns `false` if `view` is already a child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if any handle is stale, or if `parent` is `view` itself.
    pub fn adopt(
        &mut self,
        view: ViewId,
        parent: ViewId,
        before: Option<ViewId>,
        cx: &mut Collaborators<'_>,
    ) -> bool {
        self.validate(view);
        self.validate(parent);
        assert!(view != parent, "cannot adopt a view into itself");
        let idx = view.idx;
        let p = parent.idx;

        let current = self.parent[idx as usize];
        if current == p {
            return false;
        }
        if current != INVALID {
            cx.observer.advisory(view, Advisory::AdoptedWithoutOrphan);
            self.orphan(view, cx);
        }

        let before_idx = match before {
            Some(b) => {
                self.validate(b);
                b.idx
            }
            None => INVALID,
        };
        self.link_child(p, idx, before_idx);
        cx.observer.did_adopt(view, parent);

        // Align the child with its new parent's tier.
        match self.state[idx as usize] {
            ViewState::Unmaterialized => {
                if self.state[p as usize].is_materialized() {
                    self.render(view, cx);
                }
            }
            ViewState::Detached => {
                if self.state[p as usize].is_materialized() {
                    let anchor = cx.host.container_anchor(parent);
                    let next = self.attached_next_sibling(idx);
                    self.attach(view, anchor, next, cx);
                } else {
                    self.destroy_materialization(view, cx);
                }
            }
            _ => {
                if self.state[p as usize].is_materialized() {
                    let anchor = cx.host.container_anchor(parent);
                    let next = self.attached_next_sibling(idx);
                    self.attach(view, anchor, next, cx);
                } else {
                    self.detach(view, true, cx);
                    self.destroy_materialization(view, cx);
                }
            }
        }
        true
    }

    /// Unlinks `view` from its parent. Lifecycle state is untouched; a
    /// subsequent [`adopt`](Self::adopt) or [`detach`](Self::detach) settles
    /// it.
    ///
    /// Returns `false` if the view has no parent.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn orphan(&mut self, view: ViewId, cx: &mut Collaborators<'_>) -> bool {
        self.validate(view);
        let idx = view.idx;
        let p = self.parent[idx as usize];
        if p == INVALID {
            return false;
        }
        let parent = self.handle(p);
        self.unlink_from_parent(idx);
        cx.observer.did_orphan(view, parent);
        true
    }

    /// The first next sibling whose surface is attached, as an insertion
    /// reference for the host.
    fn attached_next_sibling(&self, idx: u32) -> Option<ViewId> {
        let mut b = self.next_sibling[idx as usize];
        while b != INVALID && !self.state[b as usize].is_attached() {
            b = self.next_sibling[b as usize];
        }
        if b == INVALID { None } else { Some(self.handle(b)) }
    }

    // -- host animation bracketing --

    /// Marks the start of a host-level animation on a shown view.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn animation_began(&mut self, view: ViewId, cx: &mut Collaborators<'_>) -> bool {
        self.validate(view);
        let idx = view.idx;
        if self.state[idx as usize] == ViewState::Shown {
            self.state[idx as usize] = ViewState::ShownAnimating;
            true
        } else {
            self.misuse(idx, Action::AnimationBegan, cx);
            false
        }
    }

    /// Marks the end of a host-level animation.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn animation_ended(&mut self, view: ViewId, cx: &mut Collaborators<'_>) -> bool {
        self.validate(view);
        let idx = view.idx;
        if self.state[idx as usize] == ViewState::ShownAnimating {
            self.state[idx as usize] = ViewState::Shown;
            true
        } else {
            self.misuse(idx, Action::AnimationEnded, cx);
            false
        }
    }

    fn misuse(&mut self, idx: u32, action: Action, cx: &mut Collaborators<'_>) {
        cx.observer.advisory(
            self.handle(idx),
            Advisory::MisusedAction {
                action,
                state: self.state[idx as usize],
            },
        );
    }
}
