use glam::Vec2;

/// Last known pointer position.
///
/// The first movement activates the pointer and nothing deactivates it: once
/// touched, the pointer stays a live attraction source for the rest of the
/// session.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerTracker {
    pos: Vec2,
    active: bool,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a movement to absolute viewport coordinates.
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.pos = Vec2::new(x, y);
        self.active = true;
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}
