use glam::Vec2;

/// Axis-aligned rectangle in viewport pixels (`DOMRect` edges).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// Positive, finite area. Layout queries for hidden elements report zero.
    pub fn has_area(&self) -> bool {
        let finite = self.left.is_finite()
            && self.top.is_finite()
            && self.right.is_finite()
            && self.bottom.is_finite();
        finite && self.width() > 0.0 && self.height() > 0.0
    }

    /// Strict containment: points on the border count as outside.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x > self.left && p.x < self.right && p.y > self.top && p.y < self.bottom
    }

    /// Grow every edge outward by `pad`.
    pub fn inflate(&self, pad: f32) -> Self {
        Self::new(
            self.left - pad,
            self.top - pad,
            self.right + pad,
            self.bottom + pad,
        )
    }
}

/// Logical simulation bounds, tracked from viewport resize events.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// No usable area (zero, negative or NaN). Spawning and culling are skipped.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Whether `p` lies more than `margin` outside any edge.
    pub fn is_far_outside(&self, p: Vec2, margin: f32) -> bool {
        p.x < -margin
            || p.x > self.width + margin
            || p.y < -margin
            || p.y > self.height + margin
    }
}
