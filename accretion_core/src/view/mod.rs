// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The view tree and its lifecycle statechart.
//!
//! A *view* is a node in a UI tree. Each view has:
//!
//! - An identity ([`ViewId`]) — a generational handle that becomes stale when
//!   the view is destroyed, preventing use-after-free bugs at the API level.
//! - Topology — parent, first-child, and sibling links forming an ordered
//!   tree, mutated only through [`adopt`](ViewStore::adopt) and
//!   [`orphan`](ViewStore::orphan).
//! - A lifecycle [`state`](ViewStore::state) — where the view sits between
//!   [`Unmaterialized`](crate::state::ViewState::Unmaterialized) and
//!   [`Shown`](crate::state::ViewState::Shown), advanced by the action
//!   methods (`render`, `attach`, `detach`, `show`, `hide`, ...).
//! - Transition effect slots ([`EffectSlots`]) naming registered plugins to
//!   animate its lifecycle edges.
//!
//! Views are stored in struct-of-arrays layout with index-based handles for
//! cache-friendly traversal.
//!
//! # Propagation
//!
//! Lifecycle changes ripple through the subtree in two phases: a top-down
//! "will" phase in which each child decides for itself whether to
//! participate (a hidden child prunes its whole subtree out of a show
//! cascade, for instance), and a "did" phase whose observer notifications
//! run deepest-first, the acting view last.

mod actions;
mod id;
mod propagate;
mod store;
mod transitions;
mod traverse;

#[cfg(test)]
mod testutil;

pub use id::{INVALID, ViewId};
pub use store::{EffectSlots, ViewStore};
pub use traverse::Children;
