// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared doubles for the co-located statechart tests.

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use kurbo::Rect;

use crate::geometry::Layout;
use crate::host::{AnchorId, SurfaceHost};
use crate::observer::{Advisory, LifecycleObserver};
use crate::plugin::{CancelBehavior, TransitionContext, TransitionPlugin};

use super::id::ViewId;

/// Records every host call as a `(op, view index)` pair.
#[derive(Default)]
pub(crate) struct Host {
    pub(crate) ops: Vec<(&'static str, u32)>,
    pub(crate) layouts: BTreeMap<u32, Layout>,
}

impl Host {
    pub(crate) fn count(&self, op: &str) -> usize {
        self.ops.iter().filter(|(o, _)| *o == op).count()
    }
}

impl SurfaceHost for Host {
    fn render_to_surface(&mut self, view: ViewId) {
        self.ops.push(("render", view.index()));
    }

    fn discard_surface(&mut self, view: ViewId) {
        self.ops.push(("discard", view.index()));
    }

    fn container_anchor(&mut self, view: ViewId) -> AnchorId {
        AnchorId(view.index())
    }

    fn insert(&mut self, view: ViewId, _anchor: AnchorId, _before: Option<ViewId>) {
        self.ops.push(("insert", view.index()));
    }

    fn remove(&mut self, view: ViewId) {
        self.ops.push(("remove", view.index()));
    }

    fn apply_visibility(&mut self, view: ViewId, visible: bool) {
        let op = if visible { "style_show" } else { "style_hide" };
        self.ops.push((op, view.index()));
    }

    fn update_content(&mut self, view: ViewId) {
        self.ops.push(("content", view.index()));
    }

    fn layout(&mut self, view: ViewId) -> Layout {
        self.layouts.get(&view.index()).copied().unwrap_or_default()
    }

    fn frame(&mut self, _view: ViewId) -> Rect {
        Rect::ZERO
    }

    fn set_layout(&mut self, view: ViewId, layout: Layout) {
        self.ops.push(("set_layout", view.index()));
        self.layouts.insert(view.index(), layout);
    }

    fn halt_animation(&mut self, view: ViewId, _behavior: CancelBehavior) {
        self.ops.push(("halt", view.index()));
    }
}

/// Records lifecycle notifications and advisories in call order.
#[derive(Default)]
pub(crate) struct Probe {
    pub(crate) events: Vec<(&'static str, u32)>,
    pub(crate) advisories: Vec<(u32, Advisory)>,
}

impl LifecycleObserver for Probe {
    fn will_attach(&mut self, view: ViewId) {
        self.events.push(("will_attach", view.index()));
    }

    fn did_attach(&mut self, view: ViewId) {
        self.events.push(("did_attach", view.index()));
    }

    fn will_detach(&mut self, view: ViewId) {
        self.events.push(("will_detach", view.index()));
    }

    fn did_detach(&mut self, view: ViewId) {
        self.events.push(("did_detach", view.index()));
    }

    fn will_show(&mut self, view: ViewId) {
        self.events.push(("will_show", view.index()));
    }

    fn did_show(&mut self, view: ViewId) {
        self.events.push(("did_show", view.index()));
    }

    fn will_hide(&mut self, view: ViewId) {
        self.events.push(("will_hide", view.index()));
    }

    fn did_hide(&mut self, view: ViewId) {
        self.events.push(("did_hide", view.index()));
    }

    fn did_create_materialization(&mut self, view: ViewId) {
        self.events.push(("did_create", view.index()));
    }

    fn will_destroy_materialization(&mut self, view: ViewId) {
        self.events.push(("will_destroy", view.index()));
    }

    fn did_adopt(&mut self, view: ViewId, _parent: ViewId) {
        self.events.push(("did_adopt", view.index()));
    }

    fn did_orphan(&mut self, view: ViewId, _parent: ViewId) {
        self.events.push(("did_orphan", view.index()));
    }

    fn advisory(&mut self, view: ViewId, advisory: Advisory) {
        self.advisories.push((view.index(), advisory));
    }
}

/// A plugin that records its calls and completes only when the test drives
/// the store's completion entry points.
pub(crate) struct ManualPlugin {
    pub(crate) log: Rc<RefCell<Vec<(&'static str, u32)>>>,
}

impl TransitionPlugin for ManualPlugin {
    fn setup(&mut self, cx: &mut TransitionContext<'_>) {
        self.log.borrow_mut().push(("setup", cx.view.index()));
    }

    fn run(&mut self, cx: &mut TransitionContext<'_>) {
        self.log.borrow_mut().push(("run", cx.view.index()));
    }

    fn cancel(&mut self, cx: &mut TransitionContext<'_>, _behavior: CancelBehavior) {
        self.log.borrow_mut().push(("cancel", cx.view.index()));
    }
}
