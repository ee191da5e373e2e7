use crate::api::config::FieldConfig;
use crate::core::particle::Particle;
use crate::systems::graph::ConnectionGraph;
use crate::systems::vector::{VectorColor, VectorState};

/// Width of connection lines, in pixels.
pub const CONNECTION_LINE_WIDTH: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

/// Page theme as far as the field cares about it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub mode: ThemeMode,
    /// Page foreground colour. Only used in dark mode.
    pub foreground: VectorColor,
}

impl Theme {
    pub const fn light() -> Self {
        Self {
            mode: ThemeMode::Light,
            foreground: VectorColor::BLACK,
        }
    }

    pub const fn dark(foreground: VectorColor) -> Self {
        Self {
            mode: ThemeMode::Dark,
            foreground,
        }
    }

    pub fn outline_color(&self) -> VectorColor {
        match self.mode {
            ThemeMode::Dark => self.foreground.with_alpha(0.2),
            ThemeMode::Light => VectorColor::BLACK.with_alpha(0.3),
        }
    }

    /// Outline width relative to particle size.
    pub fn outline_width(&self) -> f32 {
        match self.mode {
            ThemeMode::Dark => 0.05,
            ThemeMode::Light => 0.04,
        }
    }

    /// Lines fade out linearly with length and vanish at `max_distance`.
    pub fn connection_color(&self, distance: f32, max_distance: f32) -> VectorColor {
        let base = match self.mode {
            ThemeMode::Dark => 0.2,
            ThemeMode::Light => 0.15,
        };
        let fade = (1.0 - distance / max_distance).clamp(0.0, 1.0);
        let color = match self.mode {
            ThemeMode::Dark => self.foreground,
            ThemeMode::Light => VectorColor::BLACK,
        };
        color.with_alpha(base * fade)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

/// Tessellate one frame: connection lines first, outlines on top.
///
/// `graph` must have been rebuilt from `particles`.
pub fn build_field_geometry(
    particles: &[Particle],
    graph: &ConnectionGraph,
    config: &FieldConfig,
    theme: &Theme,
    out: &mut VectorState,
) {
    out.clear();

    for c in graph.connections() {
        let (Some(a), Some(b)) = (particles.get(c.a), particles.get(c.b)) else {
            continue;
        };
        let color = theme.connection_color(c.distance, config.connection_distance);
        out.stroke_segment(a.pos, b.pos, CONNECTION_LINE_WIDTH, color);
    }

    let outline = theme.outline_color();
    for p in particles {
        out.stroke_polygon(&p.outline(), theme.outline_width() * p.size(), outline);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::ParticleId;
    use crate::core::rng::Rng;
    use glam::Vec2;

    fn square(id: u32, pos: Vec2, rng: &mut Rng) -> Particle {
        Particle::new(ParticleId(id), pos, Vec2::ZERO, rng)
            .with_size(20.0)
            .with_shape(vec![
                Vec2::new(-0.5, -0.5),
                Vec2::new(0.5, -0.5),
                Vec2::new(0.5, 0.5),
                Vec2::new(-0.5, 0.5),
            ])
    }

    #[test]
    fn theme_styles() {
        let light = Theme::light();
        assert_eq!(light.outline_color(), VectorColor::BLACK.with_alpha(0.3));
        assert_eq!(light.outline_width(), 0.04);

        let fg = VectorColor::rgb(0.9, 0.9, 0.8);
        let dark = Theme::dark(fg);
        assert_eq!(dark.outline_color(), fg.with_alpha(0.2));
        assert_eq!(dark.outline_width(), 0.05);
    }

    #[test]
    fn connection_alpha_fades_with_distance() {
        let theme = Theme::light();
        assert!((theme.connection_color(0.0, 150.0).a - 0.15).abs() < 1e-6);
        assert!((theme.connection_color(75.0, 150.0).a - 0.075).abs() < 1e-6);
        assert_eq!(theme.connection_color(150.0, 150.0).a, 0.0);
        assert_eq!(theme.connection_color(400.0, 150.0).a, 0.0);
        let dark = Theme::dark(VectorColor::WHITE);
        assert!((dark.connection_color(0.0, 150.0).a - 0.2).abs() < 1e-6);
    }

    #[test]
    fn geometry_covers_outlines_and_connections() {
        let mut rng = Rng::new(5);
        let config = FieldConfig::default();
        let mut ps = vec![
            square(0, Vec2::new(100.0, 100.0), &mut rng),
            square(1, Vec2::new(200.0, 100.0), &mut rng),
        ];
        let mut graph = ConnectionGraph::new();
        graph.rebuild(&mut ps, &config);

        let mut outlines_only = VectorState::new();
        let no_edges = ConnectionGraph::new();
        build_field_geometry(&ps, &no_edges, &config, &Theme::light(), &mut outlines_only);
        assert!(outlines_only.vertex_count() > 0);

        let mut full = VectorState::new();
        build_field_geometry(&ps, &graph, &config, &Theme::light(), &mut full);
        assert!(full.vertex_count() > outlines_only.vertex_count());
    }

    #[test]
    fn rebuild_replaces_previous_frame() {
        let mut rng = Rng::new(5);
        let config = FieldConfig::default();
        let ps = vec![square(0, Vec2::new(50.0, 50.0), &mut rng)];
        let graph = ConnectionGraph::new();
        let mut out = VectorState::new();

        build_field_geometry(&ps, &graph, &config, &Theme::light(), &mut out);
        let once = out.vertex_count();
        build_field_geometry(&ps, &graph, &config, &Theme::light(), &mut out);
        assert_eq!(out.vertex_count(), once);
    }
}
