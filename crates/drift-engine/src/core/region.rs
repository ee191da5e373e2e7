use crate::core::bounds::Rect;

/// Source of the protected-region rectangle, usually a layout query on the page.
pub trait RegionProvider {
    /// Current rectangle, or `None` when the layout has nothing to report.
    fn query(&mut self) -> Option<Rect>;
}

/// A provider that always answers with the same value.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticRegion(pub Option<Rect>);

impl RegionProvider for StaticRegion {
    fn query(&mut self) -> Option<Rect> {
        self.0
    }
}

/// Last known protected region.
///
/// Stale-but-available: answers with no rect or zero area keep whatever was
/// stored before.
#[derive(Debug, Clone, Default)]
pub struct RegionTracker {
    rect: Option<Rect>,
    padding: f32,
}

impl RegionTracker {
    pub fn new(padding: f32) -> Self {
        Self { rect: None, padding }
    }

    pub fn set_padding(&mut self, padding: f32) {
        self.padding = padding;
    }

    /// Offer a new rect. Returns true when the stored rect changed.
    pub fn update(&mut self, rect: Option<Rect>) -> bool {
        match rect {
            Some(r) if r.has_area() && self.rect != Some(r) => {
                self.rect = Some(r);
                true
            }
            _ => false,
        }
    }

    /// Poll `provider` and keep its answer if usable.
    pub fn refresh(&mut self, provider: &mut impl RegionProvider) -> bool {
        self.update(provider.query())
    }

    /// The region used for inside/outside tests, padding applied.
    pub fn rect(&self) -> Option<Rect> {
        self.rect.map(|r| r.inflate(self.padding))
    }

    /// The rect exactly as last reported.
    pub fn raw(&self) -> Option<Rect> {
        self.rect
    }

    pub fn clear(&mut self) {
        self.rect = None;
    }
}
