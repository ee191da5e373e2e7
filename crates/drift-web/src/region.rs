use drift_engine::{Rect, RegionProvider};

/// Element whose bounds the field keeps clear by default.
pub const DEFAULT_REGION_ELEMENT: &str = "content-boundary";

/// Reads the protected region from an element's `getBoundingClientRect()`.
///
/// A missing element (page not mounted yet, route change) answers `None`, so
/// the field keeps using the last rect it saw.
#[derive(Debug, Clone)]
pub struct DomRegion {
    element_id: String,
}

impl DomRegion {
    pub fn new(element_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
        }
    }

    pub fn element_id(&self) -> &str {
        &self.element_id
    }
}

impl Default for DomRegion {
    fn default() -> Self {
        Self::new(DEFAULT_REGION_ELEMENT)
    }
}

impl RegionProvider for DomRegion {
    fn query(&mut self) -> Option<Rect> {
        let element = web_sys::window()?
            .document()?
            .get_element_by_id(&self.element_id)?;
        let r = element.get_bounding_client_rect();
        Some(Rect::new(
            r.left() as f32,
            r.top() as f32,
            r.right() as f32,
            r.bottom() as f32,
        ))
    }
}
