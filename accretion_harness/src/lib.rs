// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording host, observer, and transition doubles for statechart tests.

#![no_std]

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use kurbo::Rect;

use accretion_core::geometry::Layout;
use accretion_core::host::{AnchorId, SurfaceHost};
use accretion_core::observer::{Advisory, LifecycleObserver};
use accretion_core::plugin::{CancelBehavior, TransitionContext, TransitionKind, TransitionPlugin};
use accretion_core::view::ViewId;

/// One call made against a [`RecordingHost`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HostOp {
    /// `render_to_surface`.
    Render(ViewId),
    /// `discard_surface`.
    Discard(ViewId),
    /// `insert`.
    Insert {
        /// The inserted view.
        view: ViewId,
        /// The container it went under.
        anchor: AnchorId,
        /// The sibling it went before, if any.
        before: Option<ViewId>,
    },
    /// `remove`.
    Remove(ViewId),
    /// `apply_visibility`.
    Visibility {
        /// The styled view.
        view: ViewId,
        /// The applied visibility.
        visible: bool,
    },
    /// `update_content`.
    Content(ViewId),
    /// `set_layout`.
    SetLayout(ViewId),
    /// `halt_animation`.
    Halt(ViewId, CancelBehavior),
}

/// A [`SurfaceHost`] that records every call and answers geometry queries
/// from a settable table.
#[derive(Debug, Default)]
pub struct RecordingHost {
    /// Every host call, in order.
    pub ops: Vec<HostOp>,
    /// Layouts returned by [`SurfaceHost::layout`], keyed by view index.
    /// `set_layout` writes back here.
    pub layouts: BTreeMap<u32, Layout>,
    /// Frames returned by [`SurfaceHost::frame`], keyed by view index.
    pub frames: BTreeMap<u32, Rect>,
}

impl RecordingHost {
    /// How many recorded ops satisfy `pred`.
    pub fn count(&self, pred: impl Fn(&HostOp) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }
}

impl SurfaceHost for RecordingHost {
    fn render_to_surface(&mut self, view: ViewId) {
        self.ops.push(HostOp::Render(view));
    }

    fn discard_surface(&mut self, view: ViewId) {
        self.ops.push(HostOp::Discard(view));
    }

    fn container_anchor(&mut self, view: ViewId) -> AnchorId {
        AnchorId(view.index())
    }

    fn insert(&mut self, view: ViewId, anchor: AnchorId, before: Option<ViewId>) {
        self.ops.push(HostOp::Insert {
            view,
            anchor,
            before,
        });
    }

    fn remove(&mut self, view: ViewId) {
        self.ops.push(HostOp::Remove(view));
    }

    fn apply_visibility(&mut self, view: ViewId, visible: bool) {
        self.ops.push(HostOp::Visibility { view, visible });
    }

    fn update_content(&mut self, view: ViewId) {
        self.ops.push(HostOp::Content(view));
    }

    fn layout(&mut self, view: ViewId) -> Layout {
        self.layouts.get(&view.index()).copied().unwrap_or_default()
    }

    fn frame(&mut self, view: ViewId) -> Rect {
        self.frames.get(&view.index()).copied().unwrap_or(Rect::ZERO)
    }

    fn set_layout(&mut self, view: ViewId, layout: Layout) {
        self.ops.push(HostOp::SetLayout(view));
        self.layouts.insert(view.index(), layout);
    }

    fn halt_animation(&mut self, view: ViewId, behavior: CancelBehavior) {
        self.ops.push(HostOp::Halt(view, behavior));
    }
}

/// One notification delivered to a [`RecordingObserver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// `will_attach`.
    WillAttach(ViewId),
    /// `did_attach`.
    DidAttach(ViewId),
    /// `will_detach`.
    WillDetach(ViewId),
    /// `did_detach`.
    DidDetach(ViewId),
    /// `will_show`.
    WillShow(ViewId),
    /// `did_show`.
    DidShow(ViewId),
    /// `will_hide`.
    WillHide(ViewId),
    /// `did_hide`.
    DidHide(ViewId),
    /// `did_create_materialization`.
    DidCreate(ViewId),
    /// `will_destroy_materialization`.
    WillDestroy(ViewId),
    /// `did_adopt`.
    DidAdopt {
        /// The adopted view.
        view: ViewId,
        /// Its new parent.
        parent: ViewId,
    },
    /// `did_orphan`.
    DidOrphan {
        /// The orphaned view.
        view: ViewId,
        /// Its former parent.
        parent: ViewId,
    },
    /// `advisory`.
    Advisory(ViewId, Advisory),
}

/// A [`LifecycleObserver`] that records every notification in delivery order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    /// Every notification, in order.
    pub events: Vec<LifecycleEvent>,
}

impl RecordingObserver {
    /// The advisories received so far.
    pub fn advisories(&self) -> Vec<(ViewId, Advisory)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                LifecycleEvent::Advisory(v, a) => Some((*v, *a)),
                _ => None,
            })
            .collect()
    }
}

impl LifecycleObserver for RecordingObserver {
    fn will_attach(&mut self, view: ViewId) {
        self.events.push(LifecycleEvent::WillAttach(view));
    }

    fn did_attach(&mut self, view: ViewId) {
        self.events.push(LifecycleEvent::DidAttach(view));
    }

    fn will_detach(&mut self, view: ViewId) {
        self.events.push(LifecycleEvent::WillDetach(view));
    }

    fn did_detach(&mut self, view: ViewId) {
        self.events.push(LifecycleEvent::DidDetach(view));
    }

    fn will_show(&mut self, view: ViewId) {
        self.events.push(LifecycleEvent::WillShow(view));
    }

    fn did_show(&mut self, view: ViewId) {
        self.events.push(LifecycleEvent::DidShow(view));
    }

    fn will_hide(&mut self, view: ViewId) {
        self.events.push(LifecycleEvent::WillHide(view));
    }

    fn did_hide(&mut self, view: ViewId) {
        self.events.push(LifecycleEvent::DidHide(view));
    }

    fn did_create_materialization(&mut self, view: ViewId) {
        self.events.push(LifecycleEvent::DidCreate(view));
    }

    fn will_destroy_materialization(&mut self, view: ViewId) {
        self.events.push(LifecycleEvent::WillDestroy(view));
    }

    fn did_adopt(&mut self, view: ViewId, parent: ViewId) {
        self.events.push(LifecycleEvent::DidAdopt { view, parent });
    }

    fn did_orphan(&mut self, view: ViewId, parent: ViewId) {
        self.events.push(LifecycleEvent::DidOrphan { view, parent });
    }

    fn advisory(&mut self, view: ViewId, advisory: Advisory) {
        self.events.push(LifecycleEvent::Advisory(view, advisory));
    }
}

/// One call delivered to a [`ManualTransition`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PluginCall {
    /// `setup`.
    Setup(ViewId, TransitionKind),
    /// `run`.
    Run(ViewId, TransitionKind),
    /// `cancel`.
    Cancel(ViewId, TransitionKind, CancelBehavior),
}

/// A shared log of [`PluginCall`]s, cloneable across plugin instances and
/// the test body.
#[derive(Clone, Debug, Default)]
pub struct TransitionLog {
    calls: Rc<RefCell<Vec<PluginCall>>>,
}

impl TransitionLog {
    /// A snapshot of the calls so far.
    pub fn calls(&self) -> Vec<PluginCall> {
        self.calls.borrow().clone()
    }

    /// How many recorded calls satisfy `pred`.
    pub fn count(&self, pred: impl Fn(&PluginCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }
}

/// A [`TransitionPlugin`] that records its calls and never completes on its
/// own; tests drive the store's completion entry points explicitly.
#[derive(Debug)]
pub struct ManualTransition {
    log: TransitionLog,
}

impl ManualTransition {
    /// Creates a plugin reporting into `log`.
    #[must_use]
    pub fn new(log: &TransitionLog) -> Self {
        Self { log: log.clone() }
    }
}

impl TransitionPlugin for ManualTransition {
    fn setup(&mut self, cx: &mut TransitionContext<'_>) {
        self.log
            .calls
            .borrow_mut()
            .push(PluginCall::Setup(cx.view, cx.kind));
    }

    fn run(&mut self, cx: &mut TransitionContext<'_>) {
        self.log
            .calls
            .borrow_mut()
            .push(PluginCall::Run(cx.view, cx.kind));
    }

    fn cancel(&mut self, cx: &mut TransitionContext<'_>, behavior: CancelBehavior) {
        self.log
            .calls
            .borrow_mut()
            .push(PluginCall::Cancel(cx.view, cx.kind, behavior));
    }
}
