// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-view lifecycle statechart for UI view trees.
//!
//! `accretion_core` tracks, for every view in a tree, whether a backing
//! surface exists, whether that surface is in the host's display tree, and
//! whether the view is visible — and sequences the transitions between those
//! tiers, including animated ones. It is `no_std` compatible (with `alloc`)
//! and uses array-based struct-of-arrays storage with index handles for
//! cache-friendly traversal.
//!
//! # Architecture
//!
//! All state lives in a [`ViewStore`](view::ViewStore); everything that
//! touches the outside world is a borrowed collaborator, threaded through
//! each action call:
//!
//! ```text
//!   action (render / attach / show / ...)
//!       │
//!       ▼
//!   ViewStore ──propagates──► subtree (will: top-down, did: deepest-first)
//!       │                        │
//!       │ host calls             │ notifications + advisories
//!       ▼                        ▼
//!   SurfaceHost              LifecycleObserver
//!       ▲
//!       │ setup / run / cancel          completion
//!   TransitionPlugin ──────────► transition_did_complete_in / _out
//! ```
//!
//! **[`view`]** — Struct-of-arrays view tree with generational handles, the
//! lifecycle action dispatcher, the parent/child propagation protocol, and
//! the transition coordinator.
//!
//! **[`state`]** — The twelve-variant [`ViewState`](state::ViewState) and
//! its capability queries (materialized / attached / shown / hidden).
//!
//! **[`host`]** — The [`SurfaceHost`](host::SurfaceHost) trait rendering
//! backends implement, and the per-call [`Collaborators`](host::Collaborators)
//! bundle.
//!
//! **[`observer`]** — The [`LifecycleObserver`](observer::LifecycleObserver)
//! trait receiving will/did notifications and [`Advisory`](observer::Advisory)
//! reports for misused actions.
//!
//! **[`plugin`]** — The [`TransitionPlugin`](plugin::TransitionPlugin)
//! contract for animated build-in/build-out/show/hide transitions.
//!
//! **[`geometry`]** — The [`Layout`](geometry::Layout) snapshot restored
//! after transitions.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod geometry;
pub mod host;
pub mod observer;
pub mod plugin;
pub mod state;
pub mod view;
