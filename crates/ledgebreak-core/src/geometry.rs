use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in screen pixels. `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.h / 2.0
    }

    /// Strict overlap test: rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// True when the horizontal extents overlap (edges touching excluded).
    pub fn overlaps_horizontally(&self, other: &Rect) -> bool {
        self.x < other.right() && self.right() > other.x
    }
}

/// Step `current` toward `target` by at most `max_step`, landing exactly on it.
pub fn approach(current: f32, target: f32, max_step: f32) -> f32 {
    if (target - current).abs() <= max_step {
        target
    } else if target > current {
        current + max_step
    } else {
        current - max_step
    }
}

/// Anything that moves through the world with a box and a velocity.
///
/// The player and every world entity implement this so collision code and
/// renderers can treat them uniformly.
pub trait Kinematic {
    fn bounds(&self) -> Rect;

    /// Velocity in pixels per frame.
    fn velocity(&self) -> (f32, f32);

    fn position(&self) -> (f32, f32) {
        let b = self.bounds();
        (b.x, b.y)
    }

    fn size(&self) -> (f32, f32) {
        let b = self.bounds();
        (b.w, b.h)
    }
}

impl Kinematic for Rect {
    fn bounds(&self) -> Rect {
        *self
    }

    fn velocity(&self) -> (f32, f32) {
        (0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b), "Shared vertical edge is not overlap");
        let c = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!a.intersects(&c), "Shared horizontal edge is not overlap");
    }

    #[test]
    fn overlapping_rects_intersect_both_ways() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn contained_rect_intersects() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(40.0, 40.0, 5.0, 5.0);
        assert!(outer.intersects(&inner));
        assert!(inner.intersects(&outer));
    }

    #[test]
    fn edges_and_centers() {
        let r = Rect::new(10.0, 20.0, 60.0, 75.0);
        assert_eq!(r.right(), 70.0);
        assert_eq!(r.bottom(), 95.0);
        assert_eq!(r.center_x(), 40.0);
        assert_eq!(r.center_y(), 57.5);
    }

    #[test]
    fn approach_stops_on_target() {
        assert_eq!(approach(0.0, 10.0, 3.0), 3.0);
        assert_eq!(approach(0.0, -10.0, 3.0), -3.0);
        assert_eq!(approach(9.0, 10.0, 3.0), 10.0);
        assert_eq!(approach(10.0, 10.0, 3.0), 10.0);
    }

    #[test]
    fn kinematic_defaults_derive_from_bounds() {
        let r = Rect::new(3.0, 4.0, 5.0, 6.0);
        assert_eq!(r.position(), (3.0, 4.0));
        assert_eq!(r.size(), (5.0, 6.0));
        assert_eq!(r.velocity(), (0.0, 0.0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn intersection_is_symmetric(
                ax in -500.0f32..500.0, ay in -500.0f32..500.0,
                aw in 1.0f32..200.0, ah in 1.0f32..200.0,
                bx in -500.0f32..500.0, by in -500.0f32..500.0,
                bw in 1.0f32..200.0, bh in 1.0f32..200.0,
            ) {
                let a = Rect::new(ax, ay, aw, ah);
                let b = Rect::new(bx, by, bw, bh);
                prop_assert_eq!(a.intersects(&b), b.intersects(&a));
            }
        }
    }
}
