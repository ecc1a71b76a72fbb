// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host contract.
//!
//! The statechart never touches pixels, styles, or native display trees;
//! it calls a [`SurfaceHost`] at each point where one of those must change.
//! Calls arrive synchronously, mid-action, in a deterministic order — a host
//! may batch or defer the actual platform work, but it must answer the
//! queries ([`layout`](SurfaceHost::layout), [`frame`](SurfaceHost::frame),
//! [`container_anchor`](SurfaceHost::container_anchor)) from its current
//! model of the view.

use core::fmt;

use kurbo::Rect;

use crate::geometry::Layout;
use crate::observer::LifecycleObserver;
use crate::plugin::CancelBehavior;
use crate::view::ViewId;

/// An opaque reference to a container in the host's display tree.
///
/// Anchors are minted by the host (e.g. a DOM node, a native layer, an
/// arena index); the statechart only passes them back into
/// [`SurfaceHost::insert`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnchorId(pub u32);

impl fmt::Debug for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnchorId({})", self.0)
    }
}

/// Rendering and display-tree operations the statechart delegates.
pub trait SurfaceHost {
    /// Materialize a surface for `view`.
    fn render_to_surface(&mut self, view: ViewId);

    /// Discard `view`'s surface.
    fn discard_surface(&mut self, view: ViewId);

    /// The anchor under which `view`'s children should be inserted.
    fn container_anchor(&mut self, view: ViewId) -> AnchorId;

    /// Insert `view`'s surface under `anchor`, before `before`'s surface
    /// (or at the end when `before` is `None`).
    fn insert(&mut self, view: ViewId, anchor: AnchorId, before: Option<ViewId>);

    /// Remove `view`'s surface from the display tree.
    fn remove(&mut self, view: ViewId);

    /// Apply `view`'s visibility style.
    fn apply_visibility(&mut self, view: ViewId, visible: bool);

    /// Re-render `view`'s surface content.
    fn update_content(&mut self, view: ViewId);

    /// The view's current layout, as the host positions it.
    fn layout(&mut self, view: ViewId) -> Layout;

    /// The view's current frame in parent coordinates.
    fn frame(&mut self, view: ViewId) -> Rect;

    /// Overwrite the view's layout (restoring a pre-transition snapshot).
    fn set_layout(&mut self, view: ViewId, layout: Layout);

    /// Stop any host-level animation on `view`, leaving geometry per
    /// `behavior`.
    fn halt_animation(&mut self, view: ViewId, behavior: CancelBehavior);
}

/// The collaborators every action is threaded through.
///
/// Borrowed fresh per call so the statechart itself stays free of host and
/// observer lifetimes.
pub struct Collaborators<'a> {
    /// The rendering host.
    pub host: &'a mut dyn SurfaceHost,
    /// The lifecycle observer.
    pub observer: &'a mut dyn LifecycleObserver,
}

impl<'a> Collaborators<'a> {
    /// Bundles a host and an observer for one action call.
    pub fn new(host: &'a mut dyn SurfaceHost, observer: &'a mut dyn LifecycleObserver) -> Self {
        Self { host, observer }
    }
}

impl fmt::Debug for Collaborators<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
