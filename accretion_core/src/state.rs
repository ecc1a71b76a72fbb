// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-view lifecycle state and its capability queries.

/// The view has a materialized surface.
const MATERIALIZED: u8 = 1 << 0;
/// The view's surface is inserted in the host's display tree.
const ATTACHED: u8 = 1 << 1;
/// The view is visible (possibly mid-animation).
const SHOWN: u8 = 1 << 2;
/// The view is invisible (possibly mid-hide).
const HIDDEN: u8 = 1 << 3;

/// The lifecycle state of a single view.
///
/// States are grouped in tiers: unmaterialized, materialized-but-detached,
/// and attached, with the attached tier split by visibility. Transitional
/// variants (`BuildingIn`, `BuildingOut`, `BuildingOutByParent`, `Showing`,
/// `Hiding`, `ShownAnimating`) exist only while an animation or plugin
/// transition is in flight.
///
/// Capability membership is answered by the `is_*` queries; code outside
/// this crate should prefer those over matching variants, since several
/// variants share each capability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewState {
    /// No surface exists for this view.
    Unmaterialized,
    /// A surface exists but is not in the host's display tree.
    Detached,
    /// A surface exists; the view is detached because an ancestor is.
    DetachedByParent,
    /// Attached and visible.
    Shown,
    /// Attached and visible, with a host-level animation running.
    ShownAnimating,
    /// Attached and invisible by its own intent.
    Hidden,
    /// Attached and invisible because an ancestor is hidden.
    HiddenByParent,
    /// Attached; an incoming build transition is running.
    BuildingIn,
    /// Attached; detaching once its outgoing transition (and any child
    /// build-outs it is waiting on) complete.
    BuildingOut,
    /// Attached; running an outgoing transition on behalf of an ancestor's
    /// deferred detach.
    BuildingOutByParent,
    /// Attached; a show transition is running.
    Showing,
    /// Attached; a hide transition is running (still visible until done).
    Hiding,
}

impl ViewState {
    /// The capability flag set for this state.
    const fn caps(self) -> u8 {
        match self {
            Self::Unmaterialized => 0,
            Self::Detached | Self::DetachedByParent => MATERIALIZED,
            Self::Shown | Self::ShownAnimating | Self::BuildingIn | Self::Showing => {
                MATERIALIZED | ATTACHED | SHOWN
            }
            Self::Hidden | Self::HiddenByParent | Self::Hiding => {
                MATERIALIZED | ATTACHED | HIDDEN
            }
            Self::BuildingOut | Self::BuildingOutByParent => MATERIALIZED | ATTACHED,
        }
    }

    /// Whether a surface exists for the view.
    #[inline]
    #[must_use]
    pub const fn is_materialized(self) -> bool {
        self.caps() & MATERIALIZED != 0
    }

    /// Whether the view's surface is inserted in the host's display tree.
    #[inline]
    #[must_use]
    pub const fn is_attached(self) -> bool {
        self.caps() & ATTACHED != 0
    }

    /// Whether the view is in a shown-tier state.
    #[inline]
    #[must_use]
    pub const fn is_shown(self) -> bool {
        self.caps() & SHOWN != 0
    }

    /// Whether the view is in a hidden-tier state.
    ///
    /// Note that [`Hiding`](Self::Hiding) already counts as hidden-tier even
    /// though the view remains on screen until the transition completes; use
    /// [`in_display`](Self::in_display) for "actually visible right now".
    #[inline]
    #[must_use]
    pub const fn is_hidden(self) -> bool {
        self.caps() & HIDDEN != 0
    }

    /// Whether the view currently participates in the visible display.
    ///
    /// Attached and not settled hidden. A `Hiding` view is still in display;
    /// a `Hidden` or `HiddenByParent` view is not.
    #[inline]
    #[must_use]
    pub const fn in_display(self) -> bool {
        self.is_attached() && !matches!(self, Self::Hidden | Self::HiddenByParent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ViewState; 12] = [
        ViewState::Unmaterialized,
        ViewState::Detached,
        ViewState::DetachedByParent,
        ViewState::Shown,
        ViewState::ShownAnimating,
        ViewState::Hidden,
        ViewState::HiddenByParent,
        ViewState::BuildingIn,
        ViewState::BuildingOut,
        ViewState::BuildingOutByParent,
        ViewState::Showing,
        ViewState::Hiding,
    ];

    #[test]
    fn attached_implies_materialized() {
        for s in ALL {
            if s.is_attached() {
                assert!(s.is_materialized(), "{s:?}");
            }
        }
    }

    #[test]
    fn shown_and_hidden_are_disjoint() {
        for s in ALL {
            assert!(!(s.is_shown() && s.is_hidden()), "{s:?}");
            if s.is_shown() || s.is_hidden() {
                assert!(s.is_attached(), "{s:?}");
            }
        }
    }

    #[test]
    fn hiding_is_still_in_display() {
        assert!(ViewState::Hiding.in_display());
        assert!(!ViewState::Hidden.in_display());
        assert!(!ViewState::HiddenByParent.in_display());
        assert!(ViewState::BuildingOut.in_display());
        assert!(!ViewState::Detached.in_display());
    }

    #[test]
    fn capability_table() {
        assert!(!ViewState::Unmaterialized.is_materialized());
        assert!(ViewState::Detached.is_materialized());
        assert!(!ViewState::Detached.is_attached());
        assert!(ViewState::DetachedByParent.is_materialized());
        assert!(!ViewState::DetachedByParent.is_attached());
        for s in [
            ViewState::Shown,
            ViewState::ShownAnimating,
            ViewState::BuildingIn,
            ViewState::Showing,
        ] {
            assert!(s.is_shown() && s.is_attached(), "{s:?}");
        }
        for s in [ViewState::Hidden, ViewState::HiddenByParent, ViewState::Hiding] {
            assert!(s.is_hidden() && s.is_attached(), "{s:?}");
        }
        for s in [ViewState::BuildingOut, ViewState::BuildingOutByParent] {
            assert!(s.is_attached() && !s.is_shown() && !s.is_hidden(), "{s:?}");
        }
    }
}
