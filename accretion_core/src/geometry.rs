// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Positioning snapshots exchanged with the host.

/// A sparse layout description for a view.
///
/// Only the properties the host actually positions the view with are
/// populated; `None` means "not constrained by this key". The statechart
/// treats the value as opaque: it snapshots the layout before a transition
/// starts and hands it back to the host on teardown so a plugin's scratch
/// positioning never leaks into steady state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Layout {
    /// Offset from the left edge of the parent, in host units.
    pub left: Option<f64>,
    /// Offset from the top edge of the parent, in host units.
    pub top: Option<f64>,
    /// Explicit width, in host units.
    pub width: Option<f64>,
    /// Explicit height, in host units.
    pub height: Option<f64>,
    /// Opacity in `0.0..=1.0`.
    pub opacity: Option<f64>,
}
