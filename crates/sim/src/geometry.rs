use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

/// Axis-aligned box with its origin at the top-left corner, y growing down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Strict overlap: rectangles that merely share an edge do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    /// True when `self` lies entirely inside `bounds` (edges may touch).
    pub fn within(&self, bounds: &Rect) -> bool {
        self.x >= bounds.x
            && self.y >= bounds.y
            && self.x + self.w <= bounds.x + bounds.w
            && self.y + self.h <= bounds.y + bounds.h
    }

    pub fn expanded(&self, margin: f32) -> Rect {
        Rect {
            x: self.x - margin,
            y: self.y - margin,
            w: self.w + margin * 2.0,
            h: self.h + margin * 2.0,
        }
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Rect {
        Rect {
            x: self.x + dx,
            y: self.y + dy,
            w: self.w,
            h: self.h,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_rects_are_detected() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn edge_touching_rects_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!a.overlaps(&right));
        assert!(!a.overlaps(&below));
    }

    #[test]
    fn disjoint_rects_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 4.0, 4.0);
        let b = Rect::new(20.0, 20.0, 4.0, 4.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn within_accepts_touching_edges() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(Rect::new(0.0, 0.0, 100.0, 100.0).within(&bounds));
        assert!(Rect::new(10.0, 10.0, 20.0, 20.0).within(&bounds));
        assert!(!Rect::new(-1.0, 10.0, 20.0, 20.0).within(&bounds));
        assert!(!Rect::new(90.0, 10.0, 20.0, 20.0).within(&bounds));
    }

    #[test]
    fn expanded_grows_symmetrically() {
        let probe = Rect::new(10.0, 20.0, 24.0, 40.0).expanded(14.0);
        assert!((probe.x - -4.0).abs() < 0.0001);
        assert!((probe.y - 6.0).abs() < 0.0001);
        assert!((probe.w - 52.0).abs() < 0.0001);
        assert!((probe.h - 68.0).abs() < 0.0001);
    }

    #[test]
    fn translated_moves_origin_only() {
        let moved = Rect::new(1.0, 2.0, 3.0, 4.0).translated(5.0, -1.0);
        assert_eq!(moved, Rect::new(6.0, 1.0, 3.0, 4.0));
    }
}
