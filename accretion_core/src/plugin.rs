// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The transition plugin contract.
//!
//! Transitions animate a view between lifecycle tiers: build-in on attach,
//! build-out before detach, show and hide around visibility flips. The
//! statechart owns *when* a transition runs and what state the view sits in
//! meanwhile; the plugin owns the actual animation, driving the host however
//! it likes and reporting back through
//! [`ViewStore::transition_did_complete_in`] /
//! [`ViewStore::transition_did_complete_out`].
//!
//! Plugins are registered once with
//! [`ViewStore::register_transition`] and referenced from per-view effect
//! slots by [`TransitionId`], so configuring a view is a handle copy, not a
//! trait-object clone.
//!
//! [`ViewStore::register_transition`]: crate::view::ViewStore::register_transition
//! [`ViewStore::transition_did_complete_in`]: crate::view::ViewStore::transition_did_complete_in
//! [`ViewStore::transition_did_complete_out`]: crate::view::ViewStore::transition_did_complete_out

use core::fmt;

use kurbo::Rect;

use crate::geometry::Layout;
use crate::host::SurfaceHost;
use crate::view::ViewId;

/// A handle to a registered [`TransitionPlugin`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransitionId(pub(crate) u32);

impl fmt::Debug for TransitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransitionId({})", self.0)
    }
}

/// Which lifecycle edge a transition animates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    /// Animating in after an attach.
    BuildIn,
    /// Animating out ahead of a detach.
    BuildOut,
    /// Animating from hidden to shown.
    Show,
    /// Animating from shown to hidden.
    Hide,
}

/// How a canceled transition should leave the view's geometry.
///
/// Mirrors what the host's animation system is told when the statechart cuts
/// a transition short.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CancelBehavior {
    /// Snap to the end values of the animation.
    JumpToEnd,
    /// Freeze at the current mid-flight values (used when another transition
    /// immediately takes over in place).
    KeepCurrent,
    /// Revert to the values from before the animation started.
    RevertToStart,
}

/// Everything a plugin callback gets to see and touch.
///
/// `saved_layout` and `saved_frame` are copies of the geometry snapshot taken
/// when the transition (or the transition it took over from, for in-place
/// handoffs) started; the plugin may animate toward or away from them. All
/// host mutation goes through `host`.
pub struct TransitionContext<'a> {
    /// The transitioning view.
    pub view: ViewId,
    /// Which lifecycle edge is being animated.
    pub kind: TransitionKind,
    /// Whether this transition took over mid-flight from a previous one and
    /// should start from the view's current geometry rather than reset.
    pub in_place: bool,
    /// The view's layout from before the transition started, if snapshotted.
    pub saved_layout: Option<Layout>,
    /// The view's frame from before the transition started, if snapshotted.
    pub saved_frame: Option<Rect>,
    /// The rendering host.
    pub host: &'a mut dyn SurfaceHost,
}

impl fmt::Debug for TransitionContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionContext")
            .field("view", &self.view)
            .field("kind", &self.kind)
            .field("in_place", &self.in_place)
            .field("saved_layout", &self.saved_layout)
            .field("saved_frame", &self.saved_frame)
            .finish_non_exhaustive()
    }
}

/// An animated lifecycle transition.
///
/// `run` must eventually be answered by exactly one completion call on the
/// store (`transition_did_complete_in` for [`TransitionKind::BuildIn`] and
/// [`TransitionKind::Show`], `transition_did_complete_out` for
/// [`TransitionKind::BuildOut`] and [`TransitionKind::Hide`]), unless the
/// statechart cancels first. After `cancel`, the plugin must not deliver a
/// completion for that run; late deliveries are tolerated as no-ops but
/// waste work.
pub trait TransitionPlugin {
    /// Prepare the view for the animation (set starting geometry, etc.).
    ///
    /// Called immediately before [`run`](Self::run). Optional.
    fn setup(&mut self, cx: &mut TransitionContext<'_>) {
        let _ = cx;
    }

    /// Start the animation.
    fn run(&mut self, cx: &mut TransitionContext<'_>);

    /// Stop a running animation, leaving geometry per `behavior`. Optional.
    ///
    /// The statechart performs its own state resolution after this returns;
    /// the plugin only needs to stop driving the host.
    fn cancel(&mut self, cx: &mut TransitionContext<'_>, behavior: CancelBehavior) {
        let _ = (cx, behavior);
    }
}
