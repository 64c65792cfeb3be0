//! Viewport-aware panel placement.
//!
//! Given a preferred side and the trigger's bounding rectangle, the
//! placement algorithm picks the side of the trigger where the panel fits
//! inside the viewport, falling back through a fixed priority order and
//! degrading to whichever direction offers the most space when nothing
//! fits.
//!
//! Measurement of the actual trigger/panel elements is platform-specific
//! and lives behind [`GeometryProvider`], keeping the algorithm itself pure
//! and independently testable.

use wally_ui_core::{Rect, Size};

/// Extra clearance required beyond the panel's extent for a side to count
/// as fitting.
pub const PLACEMENT_MARGIN: f32 = 20.0;

/// The side of the trigger the panel is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelPlacement {
    /// Below the trigger.
    #[default]
    Bottom,
    /// Above the trigger.
    Top,
    /// To the left of the trigger.
    Left,
    /// To the right of the trigger.
    Right,
}

impl PanelPlacement {
    /// Whether this side stacks the panel vertically against the trigger.
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Bottom | Self::Top)
    }

    /// Candidate sides to try, in priority order, starting with `self`.
    fn fallback_order(self) -> [PanelPlacement; 4] {
        match self {
            Self::Bottom => [Self::Bottom, Self::Top, Self::Right, Self::Left],
            Self::Top => [Self::Top, Self::Bottom, Self::Right, Self::Left],
            Self::Right => [Self::Right, Self::Left, Self::Bottom, Self::Top],
            Self::Left => [Self::Left, Self::Right, Self::Bottom, Self::Top],
        }
    }
}

/// Space available from each trigger edge to the viewport edges.
#[derive(Debug, Clone, Copy)]
struct DirectionalSpace {
    top: f32,
    bottom: f32,
    left: f32,
    right: f32,
}

impl DirectionalSpace {
    fn measure(trigger: Rect, viewport: Rect) -> Self {
        Self {
            top: trigger.top() - viewport.top(),
            bottom: viewport.bottom() - trigger.bottom(),
            left: trigger.left() - viewport.left(),
            right: viewport.right() - trigger.right(),
        }
    }

    fn available(&self, side: PanelPlacement) -> f32 {
        match side {
            PanelPlacement::Top => self.top,
            PanelPlacement::Bottom => self.bottom,
            PanelPlacement::Left => self.left,
            PanelPlacement::Right => self.right,
        }
    }
}

/// Choose the side of the trigger where the panel fits in the viewport.
///
/// The preferred side wins when the panel's extent plus
/// [`PLACEMENT_MARGIN`] fits in that direction; otherwise the fixed
/// fallback order for that side is tried. When no side fits, the direction
/// with the most available space wins, with vertical placement preferred
/// over horizontal.
pub fn resolve_placement(
    preferred: PanelPlacement,
    trigger: Rect,
    panel: Size,
    viewport: Rect,
) -> PanelPlacement {
    let space = DirectionalSpace::measure(trigger, viewport);

    let fits = |side: PanelPlacement| {
        let needed = if side.is_vertical() {
            panel.height + PLACEMENT_MARGIN
        } else {
            panel.width + PLACEMENT_MARGIN
        };
        space.available(side) >= needed
    };

    for side in preferred.fallback_order() {
        if fits(side) {
            return side;
        }
    }

    // Nothing fits: degrade to the roomiest direction, vertical first.
    let best_vertical = if space.bottom >= space.top {
        PanelPlacement::Bottom
    } else {
        PanelPlacement::Top
    };
    let best_horizontal = if space.right >= space.left {
        PanelPlacement::Right
    } else {
        PanelPlacement::Left
    };

    if space.available(best_vertical) >= space.available(best_horizontal) {
        best_vertical
    } else {
        best_horizontal
    }
}

/// Measurement seam between the placement algorithm and the UI platform.
///
/// `trigger_rect` and `panel_size` return `None` when the corresponding
/// element is detached or not yet rendered; the positioner then keeps the
/// preferred side rather than erroring.
pub trait GeometryProvider {
    /// Bounding rectangle of the trigger element, in viewport coordinates.
    fn trigger_rect(&self) -> Option<Rect>;

    /// Rendered dimensions of the content panel.
    fn panel_size(&self) -> Option<Size>;

    /// The visible viewport.
    fn viewport(&self) -> Rect;
}

/// Tracks the resolved panel side for one combobox instance.
///
/// Opening schedules a deferred recomputation (the panel must mount before
/// it can be measured); the host event loop drains it through the facade's
/// `process_deferred`. A recomputation that fires after the panel closed is
/// dropped so a stale side never flashes into a freshly reopened panel.
pub struct PanelPositioner {
    provider: Option<Box<dyn GeometryProvider>>,
    preferred: PanelPlacement,
    current: PanelPlacement,
    pending: bool,
}

impl PanelPositioner {
    /// Create a positioner with a preferred side and no measurement source.
    pub fn new(preferred: PanelPlacement) -> Self {
        Self {
            provider: None,
            preferred,
            current: preferred,
            pending: false,
        }
    }

    /// Install the platform measurement source.
    pub fn set_provider(&mut self, provider: Box<dyn GeometryProvider>) {
        self.provider = Some(provider);
    }

    /// The requested preferred side.
    pub fn preferred(&self) -> PanelPlacement {
        self.preferred
    }

    /// Change the preferred side. Takes effect on the next recomputation.
    pub fn set_preferred(&mut self, preferred: PanelPlacement) {
        self.preferred = preferred;
    }

    /// The currently resolved side.
    pub fn current(&self) -> PanelPlacement {
        self.current
    }

    /// Mark that a deferred recomputation is owed (called on open).
    pub fn schedule_recompute(&mut self) {
        self.pending = true;
    }

    /// Whether a deferred recomputation is owed.
    pub fn has_pending(&self) -> bool {
        self.pending
    }

    /// Run the deferred recomputation, if one is owed.
    ///
    /// Returns `true` if a recomputation ran. The panel may have closed
    /// between scheduling and this call; in that case the pass is dropped.
    pub fn process_deferred(&mut self, panel_open: bool) -> bool {
        if !self.pending {
            return false;
        }
        self.pending = false;

        if !panel_open {
            return false;
        }
        self.recompute();
        true
    }

    /// Recompute the resolved side from current measurements.
    ///
    /// Falls back to the preferred side when the trigger or panel cannot be
    /// measured.
    pub fn recompute(&mut self) {
        let resolved = self.provider.as_ref().and_then(|p| {
            let trigger = p.trigger_rect()?;
            let panel = p.panel_size()?;
            Some(resolve_placement(self.preferred, trigger, panel, p.viewport()))
        });

        self.current = match resolved {
            Some(side) => side,
            None => {
                tracing::debug!(
                    target: "wally_ui::combobox",
                    preferred = ?self.preferred,
                    "trigger geometry unavailable, keeping preferred placement"
                );
                self.preferred
            }
        };
    }
}

impl std::fmt::Debug for PanelPositioner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelPositioner")
            .field("preferred", &self.preferred)
            .field("current", &self.current)
            .field("pending", &self.pending)
            .field("has_provider", &self.provider.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Rect = Rect::new(0.0, 0.0, 1000.0, 800.0);
    const PANEL: Size = Size::new(200.0, 300.0);

    #[test]
    fn test_preferred_side_wins_when_it_fits() {
        // Trigger near the top: plenty of room below
        let trigger = Rect::new(400.0, 50.0, 200.0, 40.0);
        let side = resolve_placement(PanelPlacement::Bottom, trigger, PANEL, VIEWPORT);
        assert_eq!(side, PanelPlacement::Bottom);
    }

    #[test]
    fn test_flips_to_top_when_bottom_is_tight() {
        // Trigger near the bottom edge: 60px below, panel needs 320
        let trigger = Rect::new(400.0, 700.0, 200.0, 40.0);
        let side = resolve_placement(PanelPlacement::Bottom, trigger, PANEL, VIEWPORT);
        assert_eq!(side, PanelPlacement::Top);
    }

    #[test]
    fn test_margin_is_required_beyond_panel_extent() {
        // Exactly panel height below, but not the extra margin
        let trigger = Rect::new(400.0, 460.0, 200.0, 40.0);
        assert_eq!(VIEWPORT.bottom() - trigger.bottom(), PANEL.height);
        let side = resolve_placement(PanelPlacement::Bottom, trigger, PANEL, VIEWPORT);
        assert_ne!(side, PanelPlacement::Bottom);
    }

    #[test]
    fn test_falls_back_to_right_when_neither_vertical_fits() {
        // Short viewport: no vertical side can hold the panel
        let viewport = Rect::new(0.0, 0.0, 1000.0, 400.0);
        let trigger = Rect::new(100.0, 180.0, 200.0, 40.0);
        let side = resolve_placement(PanelPlacement::Bottom, trigger, PANEL, viewport);
        assert_eq!(side, PanelPlacement::Right);
    }

    #[test]
    fn test_nothing_fits_prefers_roomiest_vertical() {
        // Tiny viewport: nothing fits anywhere
        let viewport = Rect::new(0.0, 0.0, 300.0, 200.0);
        let trigger = Rect::new(100.0, 50.0, 100.0, 30.0);
        let side = resolve_placement(PanelPlacement::Bottom, trigger, PANEL, viewport);
        // 120 below vs 50 above; 100 right-and-left. Vertical wins.
        assert_eq!(side, PanelPlacement::Bottom);
    }

    #[test]
    fn test_nothing_fits_horizontal_wins_with_more_space() {
        // Flat viewport: no side fits, but horizontal space dwarfs vertical
        let viewport = Rect::new(0.0, 0.0, 250.0, 100.0);
        let trigger = Rect::new(20.0, 30.0, 60.0, 40.0);
        let side = resolve_placement(PanelPlacement::Bottom, trigger, PANEL, viewport);
        assert_eq!(side, PanelPlacement::Right);
    }

    #[test]
    fn test_horizontal_preference_falls_back_through_its_chain() {
        // Preferred Left with no room to the left flips to Right
        let viewport = Rect::new(0.0, 0.0, 1000.0, 100.0);
        let trigger = Rect::new(10.0, 30.0, 60.0, 40.0);
        let side = resolve_placement(PanelPlacement::Left, trigger, PANEL, viewport);
        assert_eq!(side, PanelPlacement::Right);
    }

    struct FixedGeometry {
        trigger: Option<Rect>,
        panel: Option<Size>,
        viewport: Rect,
    }

    impl GeometryProvider for FixedGeometry {
        fn trigger_rect(&self) -> Option<Rect> {
            self.trigger
        }
        fn panel_size(&self) -> Option<Size> {
            self.panel
        }
        fn viewport(&self) -> Rect {
            self.viewport
        }
    }

    #[test]
    fn test_positioner_resolves_through_provider() {
        let mut positioner = PanelPositioner::new(PanelPlacement::Bottom);
        positioner.set_provider(Box::new(FixedGeometry {
            trigger: Some(Rect::new(400.0, 700.0, 200.0, 40.0)),
            panel: Some(PANEL),
            viewport: VIEWPORT,
        }));

        positioner.recompute();
        assert_eq!(positioner.current(), PanelPlacement::Top);
    }

    #[test]
    fn test_positioner_detached_trigger_keeps_preferred() {
        let mut positioner = PanelPositioner::new(PanelPlacement::Bottom);
        positioner.set_provider(Box::new(FixedGeometry {
            trigger: None,
            panel: Some(PANEL),
            viewport: VIEWPORT,
        }));

        positioner.recompute();
        assert_eq!(positioner.current(), PanelPlacement::Bottom);
    }

    #[test]
    fn test_positioner_without_provider_keeps_preferred() {
        let mut positioner = PanelPositioner::new(PanelPlacement::Top);
        positioner.recompute();
        assert_eq!(positioner.current(), PanelPlacement::Top);
    }

    #[test]
    fn test_deferred_pass_dropped_when_panel_closed() {
        let mut positioner = PanelPositioner::new(PanelPlacement::Bottom);
        positioner.set_provider(Box::new(FixedGeometry {
            trigger: Some(Rect::new(400.0, 700.0, 200.0, 40.0)),
            panel: Some(PANEL),
            viewport: VIEWPORT,
        }));

        positioner.schedule_recompute();
        assert!(positioner.has_pending());

        // Panel closed before the deferred callback fired: no stale apply
        assert!(!positioner.process_deferred(false));
        assert_eq!(positioner.current(), PanelPlacement::Bottom);
        assert!(!positioner.has_pending());

        // A fresh open schedules again and this time it runs
        positioner.schedule_recompute();
        assert!(positioner.process_deferred(true));
        assert_eq!(positioner.current(), PanelPlacement::Top);
    }
}
