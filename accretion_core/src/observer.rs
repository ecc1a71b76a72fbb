// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lifecycle event observation and advisories.
//!
//! Every action threads a `&mut dyn LifecycleObserver` through the
//! statechart. The observer receives the will/did notification pairs in the
//! documented order (top-down "will", reverse-visitation "did") plus
//! [`Advisory`] reports for requests and protocol messages that arrived in a
//! state they are not valid in. All methods default to no-ops, so an
//! observer implements only what it cares about; [`NoopObserver`] implements
//! nothing at all.

use crate::state::ViewState;
use crate::view::ViewId;

/// A lifecycle action requested on a view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Materialize a surface.
    Render,
    /// Insert the surface into the host's display tree.
    Attach,
    /// Remove the surface from the host's display tree.
    Detach,
    /// Discard the surface.
    DestroyMaterialization,
    /// Make the view visible.
    Show,
    /// Make the view invisible.
    Hide,
    /// Link the view under a parent.
    Adopt,
    /// Unlink the view from its parent.
    Orphan,
    /// Re-render the surface's content.
    UpdateContent,
    /// A host-level animation started on the view.
    AnimationBegan,
    /// A host-level animation finished on the view.
    AnimationEnded,
}

/// A propagation message delivered to a child on its parent's behalf.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProtocolMessage {
    /// An ancestor materialized its surface.
    ParentDidMaterialize,
    /// An ancestor finished attaching.
    ParentDidAttach,
    /// An ancestor is about to show.
    ParentWillShow,
    /// An ancestor finished showing.
    ParentDidShow,
    /// An ancestor is about to hide.
    ParentWillHide,
    /// An ancestor finished hiding.
    ParentDidHide,
}

/// A non-fatal report that a request or protocol message was not valid for
/// the view's current state.
///
/// Misuse never corrupts the statechart; the action or message is refused
/// (or degraded, for [`AdoptedWithoutOrphan`](Self::AdoptedWithoutOrphan))
/// and the advisory describes what a caller should fix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Advisory {
    /// An action was requested in a state where it has no meaning.
    MisusedAction {
        /// The refused action.
        action: Action,
        /// The view's state at the time of the request.
        state: ViewState,
    },
    /// `attach` was called on an already-attached view; detach it first.
    MovedWithoutDetach,
    /// `adopt` was called on a view that still had a different parent; the
    /// statechart orphaned it implicitly before proceeding.
    AdoptedWithoutOrphan,
    /// `attach` was called directly on a view that is detached only because
    /// its ancestor is; attach the ancestor instead.
    AttachedChildDirectly,
    /// A propagation message found a child in a state the protocol should
    /// never produce; the child's subtree was pruned from the traversal.
    ProtocolViolation {
        /// The message that could not be applied.
        message: ProtocolMessage,
        /// The child's state at delivery.
        state: ViewState,
    },
}

/// Receiver for lifecycle notifications and advisories.
///
/// All methods are optional. Implementations must not call back into the
/// [`ViewStore`](crate::view::ViewStore) they are observing; notifications
/// fire while an action is still in progress.
pub trait LifecycleObserver {
    /// The view is about to be inserted into the host's display tree.
    fn will_attach(&mut self, view: ViewId) {
        let _ = view;
    }

    /// The view (or a descendant swept along with it) finished attaching.
    fn did_attach(&mut self, view: ViewId) {
        let _ = view;
    }

    /// The view (or a descendant swept along with it) is about to detach.
    fn will_detach(&mut self, view: ViewId) {
        let _ = view;
    }

    /// The view finished detaching.
    fn did_detach(&mut self, view: ViewId) {
        let _ = view;
    }

    /// The view is about to become visible.
    fn will_show(&mut self, view: ViewId) {
        let _ = view;
    }

    /// The view finished becoming visible.
    fn did_show(&mut self, view: ViewId) {
        let _ = view;
    }

    /// The view is about to become invisible.
    fn will_hide(&mut self, view: ViewId) {
        let _ = view;
    }

    /// The view finished becoming invisible.
    fn did_hide(&mut self, view: ViewId) {
        let _ = view;
    }

    /// A surface was materialized for the view.
    fn did_create_materialization(&mut self, view: ViewId) {
        let _ = view;
    }

    /// The view's surface is about to be discarded.
    fn will_destroy_materialization(&mut self, view: ViewId) {
        let _ = view;
    }

    /// The view was linked under `parent`.
    fn did_adopt(&mut self, view: ViewId, parent: ViewId) {
        let _ = (view, parent);
    }

    /// The view was unlinked from `parent`.
    fn did_orphan(&mut self, view: ViewId, parent: ViewId) {
        let _ = (view, parent);
    }

    /// A request or protocol message was refused; see [`Advisory`].
    fn advisory(&mut self, view: ViewId, advisory: Advisory) {
        let _ = (view, advisory);
    }
}

/// A [`LifecycleObserver`] that ignores everything.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoopObserver;

impl LifecycleObserver for NoopObserver {}
