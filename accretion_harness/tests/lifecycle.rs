// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end lifecycle scenarios against the recording doubles.

use accretion_core::host::{AnchorId, Collaborators};
use accretion_core::observer::Advisory;
use accretion_core::plugin::TransitionKind;
use accretion_core::state::ViewState;
use accretion_core::view::{ViewId, ViewStore};
use accretion_harness::{
    HostOp, LifecycleEvent, ManualTransition, PluginCall, RecordingHost, RecordingObserver,
    TransitionLog,
};

fn cx<'a>(
    host: &'a mut RecordingHost,
    observer: &'a mut RecordingObserver,
) -> Collaborators<'a> {
    Collaborators::new(host, observer)
}

/// parent with three shown children; `c1` and `c2` carry a build-out
/// transition reporting into the returned log.
fn build_out_family(
    store: &mut ViewStore,
    host: &mut RecordingHost,
    observer: &mut RecordingObserver,
) -> (ViewId, [ViewId; 3], TransitionLog) {
    let parent = store.create_view();
    let c1 = store.create_view();
    let c2 = store.create_view();
    let c3 = store.create_view();
    let log = TransitionLog::default();
    let t = store.register_transition(Box::new(ManualTransition::new(&log)));

    let mut c = cx(host, observer);
    assert!(store.adopt(c1, parent, None, &mut c));
    assert!(store.adopt(c2, parent, None, &mut c));
    assert!(store.adopt(c3, parent, None, &mut c));
    store.set_transition_out(c1, Some(t));
    store.set_transition_out(c2, Some(t));

    let mut c = cx(host, observer);
    assert!(store.render(parent, &mut c));
    assert!(store.attach(parent, AnchorId(0), None, &mut c));
    for v in [parent, c1, c2, c3] {
        assert_eq!(store.state(v), ViewState::Shown);
    }
    (parent, [c1, c2, c3], log)
}

#[test]
fn full_lifecycle_round_trip() {
    let mut store = ViewStore::new();
    let mut host = RecordingHost::default();
    let mut observer = RecordingObserver::default();
    let v = store.create_view();

    let mut c = cx(&mut host, &mut observer);
    assert!(store.render(v, &mut c));
    assert!(store.attach(v, AnchorId(7), None, &mut c));
    assert_eq!(store.state(v), ViewState::Shown);
    assert!(store.detach(v, false, &mut c));
    assert_eq!(store.state(v), ViewState::Detached);
    assert!(store.destroy_materialization(v, &mut c));
    assert_eq!(store.state(v), ViewState::Unmaterialized);

    assert_eq!(
        observer.events,
        [
            LifecycleEvent::DidCreate(v),
            LifecycleEvent::WillAttach(v),
            LifecycleEvent::DidAttach(v),
            LifecycleEvent::WillDetach(v),
            LifecycleEvent::DidDetach(v),
            LifecycleEvent::WillDestroy(v),
        ]
    );
    assert_eq!(
        host.ops,
        [
            HostOp::Render(v),
            HostOp::Insert {
                view: v,
                anchor: AnchorId(7),
                before: None
            },
            HostOp::Remove(v),
            HostOp::Discard(v),
        ]
    );
}

#[test]
fn creation_and_attach_notify_deepest_first() {
    let mut store = ViewStore::new();
    let mut host = RecordingHost::default();
    let mut observer = RecordingObserver::default();
    let root = store.create_view();
    let mid = store.create_view();
    let leaf = store.create_view();

    let mut c = cx(&mut host, &mut observer);
    store.adopt(mid, root, None, &mut c);
    store.adopt(leaf, mid, None, &mut c);

    observer.events.clear();
    let mut c = cx(&mut host, &mut observer);
    assert!(store.render(root, &mut c));
    let created: Vec<ViewId> = observer
        .events
        .iter()
        .filter_map(|e| match e {
            LifecycleEvent::DidCreate(v) => Some(*v),
            _ => None,
        })
        .collect();
    assert_eq!(created, [leaf, mid, root]);

    observer.events.clear();
    let mut c = cx(&mut host, &mut observer);
    assert!(store.attach(root, AnchorId(0), None, &mut c));
    let attached: Vec<ViewId> = observer
        .events
        .iter()
        .filter_map(|e| match e {
            LifecycleEvent::DidAttach(v) => Some(*v),
            _ => None,
        })
        .collect();
    assert_eq!(attached, [leaf, mid, root]);
    assert!(observer.advisories().is_empty());
}

#[test]
fn deferred_detach_waits_for_child_build_outs() {
    let mut store = ViewStore::new();
    let mut host = RecordingHost::default();
    let mut observer = RecordingObserver::default();
    let (parent, [c1, c2, c3], log) = build_out_family(&mut store, &mut host, &mut observer);

    let mut c = cx(&mut host, &mut observer);
    assert!(store.detach(parent, false, &mut c));
    assert_eq!(store.state(parent), ViewState::BuildingOut);
    assert_eq!(store.building_out_count(parent), 2);
    assert_eq!(store.state(c1), ViewState::BuildingOutByParent);
    assert_eq!(store.state(c2), ViewState::BuildingOutByParent);
    assert_eq!(store.owning_detach(c1), Some(parent));
    // The transition-less child just waits.
    assert_eq!(store.state(c3), ViewState::Shown);
    assert_eq!(host.count(|op| matches!(op, HostOp::Remove(_))), 0);
    assert_eq!(log.count(|call| matches!(call, PluginCall::Run(..))), 2);

    let mut c = cx(&mut host, &mut observer);
    store.transition_did_complete_out(c1, &mut c);
    assert_eq!(store.building_out_count(parent), 1);
    assert_eq!(store.state(parent), ViewState::BuildingOut);
    assert_eq!(host.count(|op| matches!(op, HostOp::Remove(_))), 0);

    let mut c = cx(&mut host, &mut observer);
    store.transition_did_complete_out(c2, &mut c);
    assert_eq!(store.state(parent), ViewState::Detached);
    assert_eq!(store.building_out_count(parent), 0);
    assert_eq!(host.ops.iter().filter(|op| matches!(op, HostOp::Remove(_))).count(), 1);
    assert!(host.ops.contains(&HostOp::Remove(parent)));
    for child in [c1, c2, c3] {
        assert_eq!(store.state(child), ViewState::DetachedByParent);
    }
}

#[test]
fn reattach_during_build_out_reverses() {
    let mut store = ViewStore::new();
    let mut host = RecordingHost::default();
    let mut observer = RecordingObserver::default();
    let (parent, [c1, c2, c3], log) = build_out_family(&mut store, &mut host, &mut observer);

    let mut c = cx(&mut host, &mut observer);
    assert!(store.detach(parent, false, &mut c));
    assert!(store.attach(parent, AnchorId(0), None, &mut c));

    assert_eq!(store.state(parent), ViewState::Shown);
    assert_eq!(store.building_out_count(parent), 0);
    for child in [c1, c2, c3] {
        assert_eq!(store.state(child), ViewState::Shown);
        assert_eq!(store.owning_detach(child), None);
    }
    // Both by-parent transitions were cancelled; the surface never moved.
    assert_eq!(log.count(|call| matches!(call, PluginCall::Cancel(..))), 2);
    assert_eq!(host.count(|op| matches!(op, HostOp::Remove(_))), 0);
    assert_eq!(host.count(|op| matches!(op, HostOp::Insert { .. })), 1);
}

#[test]
fn immediate_detach_cuts_build_out_short() {
    let mut store = ViewStore::new();
    let mut host = RecordingHost::default();
    let mut observer = RecordingObserver::default();
    let (parent, [c1, c2, _c3], log) = build_out_family(&mut store, &mut host, &mut observer);

    let mut c = cx(&mut host, &mut observer);
    assert!(store.detach(parent, false, &mut c));
    assert!(store.detach(parent, true, &mut c));

    assert_eq!(store.state(parent), ViewState::Detached);
    assert_eq!(store.state(c1), ViewState::DetachedByParent);
    assert_eq!(store.state(c2), ViewState::DetachedByParent);
    assert_eq!(store.building_out_count(parent), 0);
    assert_eq!(host.count(|op| matches!(op, HostOp::Remove(_))), 1);
    assert_eq!(log.count(|call| matches!(call, PluginCall::Cancel(..))), 2);
}

#[test]
fn re_detach_during_by_parent_build_out_recounts() {
    let mut store = ViewStore::new();
    let mut host = RecordingHost::default();
    let mut observer = RecordingObserver::default();
    let (parent, [c1, c2, _c3], _log) = build_out_family(&mut store, &mut host, &mut observer);

    let mut c = cx(&mut host, &mut observer);
    assert!(store.detach(parent, false, &mut c));
    assert_eq!(store.building_out_count(parent), 2);

    // c1's real owner detaches it mid build-out: it restarts as its own
    // deferred detach, and the parent stops waiting on it.
    assert!(store.detach(c1, false, &mut c));
    assert_eq!(store.state(c1), ViewState::BuildingOut);
    assert_eq!(store.building_out_count(c1), 1);
    assert_eq!(store.owning_detach(c1), None);
    assert_eq!(store.building_out_count(parent), 1);

    store.transition_did_complete_out(c1, &mut c);
    assert_eq!(store.state(c1), ViewState::Detached);
    assert_eq!(store.state(parent), ViewState::BuildingOut);

    store.transition_did_complete_out(c2, &mut c);
    assert_eq!(store.state(parent), ViewState::Detached);
    // c1 already left on its own; the parent's sweep does not touch it.
    assert_eq!(store.state(c1), ViewState::Detached);

    let removes: Vec<&HostOp> = host
        .ops
        .iter()
        .filter(|op| matches!(op, HostOp::Remove(_)))
        .collect();
    assert_eq!(removes, [&HostOp::Remove(c1), &HostOp::Remove(parent)]);
}

#[test]
fn re_detach_after_child_completion_releases_owner() {
    let mut store = ViewStore::new();
    let mut host = RecordingHost::default();
    let mut observer = RecordingObserver::default();
    let parent = store.create_view();
    let mid = store.create_view();
    let leaf = store.create_view();
    let log = TransitionLog::default();
    let t = store.register_transition(Box::new(ManualTransition::new(&log)));

    let mut c = cx(&mut host, &mut observer);
    assert!(store.adopt(mid, parent, None, &mut c));
    assert!(store.adopt(leaf, mid, None, &mut c));
    store.set_transition_out(mid, Some(t));
    store.set_transition_out(leaf, Some(t));

    let mut c = cx(&mut host, &mut observer);
    assert!(store.render(parent, &mut c));
    assert!(store.attach(parent, AnchorId(0), None, &mut c));

    assert!(store.detach(parent, false, &mut c));
    assert_eq!(store.building_out_count(parent), 2);

    // mid's own run finishes first; the grandchild still blocks the parent.
    store.transition_did_complete_out(mid, &mut c);
    assert_eq!(store.building_out_count(parent), 1);
    assert_eq!(store.state(mid), ViewState::BuildingOutByParent);

    // Re-detaching mid cancels leaf's run, which was the parent's last
    // outstanding blocker; the parent's deferred detach must complete.
    assert!(store.detach(mid, false, &mut c));
    assert_eq!(store.state(parent), ViewState::Detached);
    assert_eq!(store.building_out_count(parent), 0);
    assert_eq!(store.state(mid), ViewState::Detached);
    assert_eq!(store.state(leaf), ViewState::DetachedByParent);
    assert_eq!(log.count(|call| matches!(call, PluginCall::Cancel(..))), 1);

    let removes: Vec<&HostOp> = host
        .ops
        .iter()
        .filter(|op| matches!(op, HostOp::Remove(_)))
        .collect();
    assert_eq!(removes, [&HostOp::Remove(parent), &HostOp::Remove(mid)]);
}

#[test]
fn hide_mid_show_transition_takes_over() {
    let mut store = ViewStore::new();
    let mut host = RecordingHost::default();
    let mut observer = RecordingObserver::default();
    let v = store.create_view();
    let log = TransitionLog::default();
    let show_t = store.register_transition(Box::new(ManualTransition::new(&log)));
    let hide_t = store.register_transition(Box::new(ManualTransition::new(&log)));
    store.set_transition_show(v, Some(show_t));
    store.set_transition_hide(v, Some(hide_t));

    let mut c = cx(&mut host, &mut observer);
    store.render(v, &mut c);
    store.attach(v, AnchorId(0), None, &mut c);
    assert!(store.hide(v, &mut c));
    assert_eq!(store.state(v), ViewState::Hiding);
    store.transition_did_complete_out(v, &mut c);
    assert_eq!(store.state(v), ViewState::Hidden);

    assert!(store.show(v, &mut c));
    assert_eq!(store.state(v), ViewState::Showing);

    // Hiding mid-show cancels the show and starts the hide from where the
    // view currently is.
    assert!(store.hide(v, &mut c));
    assert_eq!(store.state(v), ViewState::Hiding);
    assert_eq!(store.active_transition(v), Some(TransitionKind::Hide));
    assert_eq!(
        log.count(|call| matches!(call, PluginCall::Cancel(_, TransitionKind::Show, _))),
        1
    );

    store.transition_did_complete_out(v, &mut c);
    assert_eq!(store.state(v), ViewState::Hidden);
    assert!(!store.visible_intent(v));
    // The style flip happened at completion, not at the hide request.
    assert_eq!(
        host.count(|op| matches!(op, HostOp::Visibility { visible: false, .. })),
        2
    );
}

#[test]
fn hide_during_build_out_queues_intent() {
    let mut store = ViewStore::new();
    let mut host = RecordingHost::default();
    let mut observer = RecordingObserver::default();
    let (parent, [c1, _c2, _c3], _log) = build_out_family(&mut store, &mut host, &mut observer);

    let mut c = cx(&mut host, &mut observer);
    assert!(store.detach(parent, false, &mut c));

    assert!(store.hide(c1, &mut c));
    assert_eq!(store.state(c1), ViewState::BuildingOutByParent);
    assert!(store.pending_visibility_update(c1));
    assert!(!store.visible_intent(c1));

    assert!(store.hide(parent, &mut c));
    assert_eq!(store.state(parent), ViewState::BuildingOut);
    assert!(store.pending_visibility_update(parent));
}

#[test]
fn build_in_runs_only_when_landing_shown() {
    let mut store = ViewStore::new();
    let mut host = RecordingHost::default();
    let mut observer = RecordingObserver::default();
    let shown = store.create_view();
    let hidden = store.create_view();
    let log = TransitionLog::default();
    let t = store.register_transition(Box::new(ManualTransition::new(&log)));
    store.set_transition_in(shown, Some(t));
    store.set_transition_in(hidden, Some(t));

    let mut c = cx(&mut host, &mut observer);
    store.render(shown, &mut c);
    store.attach(shown, AnchorId(0), None, &mut c);
    assert_eq!(store.state(shown), ViewState::BuildingIn);
    assert_eq!(store.active_transition(shown), Some(TransitionKind::BuildIn));
    store.transition_did_complete_in(shown, &mut c);
    assert_eq!(store.state(shown), ViewState::Shown);

    store.render(hidden, &mut c);
    store.hide(hidden, &mut c);
    store.attach(hidden, AnchorId(0), None, &mut c);
    // Attached hidden: no point animating in.
    assert_eq!(store.state(hidden), ViewState::Hidden);
    assert_eq!(store.active_transition(hidden), None);
    assert_eq!(
        log.count(|call| matches!(call, PluginCall::Run(v, _) if *v == hidden)),
        0
    );
}

#[test]
fn destroy_discards_children_first() {
    let mut store = ViewStore::new();
    let mut host = RecordingHost::default();
    let mut observer = RecordingObserver::default();
    let root = store.create_view();
    let mid = store.create_view();
    let leaf = store.create_view();

    let mut c = cx(&mut host, &mut observer);
    store.adopt(mid, root, None, &mut c);
    store.adopt(leaf, mid, None, &mut c);
    store.render(root, &mut c);

    assert!(store.destroy_materialization(root, &mut c));
    for v in [root, mid, leaf] {
        assert_eq!(store.state(v), ViewState::Unmaterialized);
    }
    let discarded: Vec<ViewId> = host
        .ops
        .iter()
        .filter_map(|op| match op {
            HostOp::Discard(v) => Some(*v),
            _ => None,
        })
        .collect();
    assert_eq!(discarded, [leaf, mid, root]);

    // Nothing left to discard.
    let mut c = cx(&mut host, &mut observer);
    assert!(!store.destroy_materialization(root, &mut c));
    assert_eq!(host.count(|op| matches!(op, HostOp::Discard(_))), 3);
}

#[test]
fn queued_updates_replay_exactly_once() {
    let mut store = ViewStore::new();
    let mut host = RecordingHost::default();
    let mut observer = RecordingObserver::default();
    let v = store.create_view();

    let mut c = cx(&mut host, &mut observer);
    store.render(v, &mut c);
    assert!(store.hide(v, &mut c));
    assert!(store.update_content(v, false, &mut c));
    assert_eq!(host.count(|op| matches!(op, HostOp::Visibility { .. })), 0);
    assert_eq!(host.count(|op| matches!(op, HostOp::Content(_))), 0);

    let mut c = cx(&mut host, &mut observer);
    store.attach(v, AnchorId(0), None, &mut c);
    assert_eq!(store.state(v), ViewState::Hidden);
    assert_eq!(
        host.count(|op| matches!(op, HostOp::Visibility { visible: false, .. })),
        1
    );
    assert_eq!(host.count(|op| matches!(op, HostOp::Content(_))), 1);

    // A second attach cycle has nothing queued to replay.
    let mut c = cx(&mut host, &mut observer);
    store.detach(v, true, &mut c);
    store.attach(v, AnchorId(0), None, &mut c);
    assert_eq!(host.count(|op| matches!(op, HostOp::Visibility { .. })), 1);
    assert_eq!(host.count(|op| matches!(op, HostOp::Content(_))), 1);
}

#[test]
fn parent_hide_halts_child_animation() {
    let mut store = ViewStore::new();
    let mut host = RecordingHost::default();
    let mut observer = RecordingObserver::default();
    let parent = store.create_view();
    let child = store.create_view();

    let mut c = cx(&mut host, &mut observer);
    store.adopt(child, parent, None, &mut c);
    store.render(parent, &mut c);
    store.attach(parent, AnchorId(0), None, &mut c);
    assert!(store.animation_began(child, &mut c));

    assert!(store.hide(parent, &mut c));
    assert_eq!(store.state(child), ViewState::HiddenByParent);
    assert_eq!(host.count(|op| matches!(op, HostOp::Halt(..))), 1);
    assert!(observer.advisories().is_empty());
}

#[test]
fn misused_actions_surface_advisories() {
    let mut store = ViewStore::new();
    let mut host = RecordingHost::default();
    let mut observer = RecordingObserver::default();
    let v = store.create_view();

    let mut c = cx(&mut host, &mut observer);
    store.render(v, &mut c);
    store.attach(v, AnchorId(0), None, &mut c);
    assert!(!store.attach(v, AnchorId(0), None, &mut c));
    assert_eq!(observer.advisories(), [(v, Advisory::MovedWithoutDetach)]);
}
