use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or validating a [`FieldConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid field config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Tunable constants for the particle field.
///
/// Every field has a default; JSON overrides only need to name the values
/// they change. Distances are viewport pixels, speeds are pixels per step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Population cap. Edge spawning stops while the field is at or above it.
    pub max_particles: usize,
    /// Particles seeded inside the viewport at init.
    pub initial_particles: usize,
    /// Probability of one edge spawn per step while under the cap.
    pub spawn_chance: f32,
    /// How far outside the edge a new particle appears.
    pub edge_spawn_offset: f32,
    /// Particles further than this outside the viewport are removed.
    pub cull_margin: f32,

    /// Pointer attraction reach.
    pub magnet_radius: f32,
    /// Peak acceleration toward the pointer (at zero distance).
    pub magnet_force: f32,
    /// Velocity multiplier while caught.
    pub magnet_friction: f32,
    /// Velocity multiplier while drifting.
    pub flow_friction: f32,
    /// Spin added per unit of attraction strength.
    pub caught_spin: f32,

    /// Lower edge of the soft speed band.
    pub min_speed: f32,
    /// Upper edge of the soft speed band.
    pub max_speed: f32,
    /// Multiplier applied below `min_speed`.
    pub speed_boost: f32,
    /// Multiplier applied above `max_speed`.
    pub speed_damp: f32,
    /// Per-step decay of rotation speed.
    pub rotation_damping: f32,

    /// Pairs closer than this are connected.
    pub connection_distance: f32,
    /// Pairs closer than this push apart.
    pub repel_distance: f32,
    /// Size of the push.
    pub repel_force: f32,
    /// Smallest connected component reported as a cluster.
    pub cluster_min_size: usize,

    /// Saturation rule applies when the pointer is this close to the region center.
    pub region_proximity: f32,
    /// Particles inside the region before outsiders stop being attracted.
    pub region_max_particles: usize,
    /// Extra margin around the protected region.
    pub region_padding: f32,
    /// Seconds between protected-region queries.
    pub region_refresh_secs: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            max_particles: 190,
            initial_particles: 80,
            spawn_chance: 0.08,
            edge_spawn_offset: 50.0,
            cull_margin: 200.0,
            magnet_radius: 300.0,
            magnet_force: 1.05,
            magnet_friction: 0.92,
            flow_friction: 0.995,
            caught_spin: 0.02,
            min_speed: 0.5,
            max_speed: 8.0,
            speed_boost: 1.02,
            speed_damp: 0.95,
            rotation_damping: 0.95,
            connection_distance: 150.0,
            repel_distance: 30.0,
            repel_force: 0.02,
            cluster_min_size: 10,
            region_proximity: 350.0,
            region_max_particles: 5,
            region_padding: 0.0,
            region_refresh_secs: 1.0,
        }
    }
}

impl FieldConfig {
    /// Parse overrides from JSON and validate the result.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: FieldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Cluster slots needed in the worst case.
    pub fn max_clusters(&self) -> usize {
        (self.max_particles / self.cluster_min_size.max(1)).max(1)
    }

    /// Reject values the integrator cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let floats = [
            ("spawn_chance", self.spawn_chance),
            ("edge_spawn_offset", self.edge_spawn_offset),
            ("cull_margin", self.cull_margin),
            ("magnet_radius", self.magnet_radius),
            ("magnet_force", self.magnet_force),
            ("magnet_friction", self.magnet_friction),
            ("flow_friction", self.flow_friction),
            ("caught_spin", self.caught_spin),
            ("min_speed", self.min_speed),
            ("max_speed", self.max_speed),
            ("speed_boost", self.speed_boost),
            ("speed_damp", self.speed_damp),
            ("rotation_damping", self.rotation_damping),
            ("connection_distance", self.connection_distance),
            ("repel_distance", self.repel_distance),
            ("repel_force", self.repel_force),
            ("region_proximity", self.region_proximity),
            ("region_padding", self.region_padding),
            ("region_refresh_secs", self.region_refresh_secs),
        ];
        for (field, value) in floats {
            if !value.is_finite() {
                return Err(invalid(field, "must be finite"));
            }
        }

        let non_negative = [
            ("edge_spawn_offset", self.edge_spawn_offset),
            ("cull_margin", self.cull_margin),
            ("magnet_force", self.magnet_force),
            ("min_speed", self.min_speed),
            ("repel_distance", self.repel_distance),
            ("repel_force", self.repel_force),
            ("region_proximity", self.region_proximity),
            ("region_padding", self.region_padding),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(invalid(field, "must not be negative"));
            }
        }

        let unit_factors = [
            ("magnet_friction", self.magnet_friction),
            ("flow_friction", self.flow_friction),
            ("speed_damp", self.speed_damp),
            ("rotation_damping", self.rotation_damping),
        ];
        for (field, value) in unit_factors {
            if value <= 0.0 || value > 1.0 {
                return Err(invalid(field, "must be in (0, 1]"));
            }
        }

        if self.magnet_radius <= 0.0 {
            return Err(invalid("magnet_radius", "must be positive"));
        }
        if self.connection_distance <= 0.0 {
            return Err(invalid("connection_distance", "must be positive"));
        }
        if self.region_refresh_secs <= 0.0 {
            return Err(invalid("region_refresh_secs", "must be positive"));
        }
        if self.max_speed < self.min_speed {
            return Err(invalid("max_speed", "must be at least min_speed"));
        }
        if self.speed_boost < 1.0 {
            return Err(invalid("speed_boost", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.spawn_chance) {
            return Err(invalid("spawn_chance", "must be in [0, 1]"));
        }
        if self.cluster_min_size == 0 {
            return Err(invalid("cluster_min_size", "must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        FieldConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{ "max_particles": 60, "magnet_radius": 120.0 }"#;
        let config = FieldConfig::from_json(json).unwrap();
        assert_eq!(config.max_particles, 60);
        assert_eq!(config.magnet_radius, 120.0);
        assert_eq!(config.flow_friction, FieldConfig::default().flow_friction);
        assert_eq!(config.cluster_min_size, 10);
    }

    #[test]
    fn empty_object_is_default() {
        let config = FieldConfig::from_json("{}").unwrap();
        assert_eq!(config, FieldConfig::default());
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = FieldConfig::from_json("{ max_particles: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn inverted_speed_band_rejected() {
        let err = FieldConfig::from_json(r#"{ "min_speed": 5.0, "max_speed": 1.0 }"#).unwrap_err();
        match err {
            ConfigError::Invalid { field, .. } => assert_eq!(field, "max_speed"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn zero_friction_rejected() {
        let config = FieldConfig {
            flow_friction: 0.0,
            ..FieldConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "flow_friction", .. })
        ));
    }

    #[test]
    fn zero_cluster_size_rejected() {
        let err = FieldConfig::from_json(r#"{ "cluster_min_size": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "cluster_min_size", .. }));
    }

    #[test]
    fn json_roundtrip_preserves_overrides() {
        let config = FieldConfig {
            repel_force: 0.05,
            ..FieldConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(FieldConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn max_clusters_never_zero() {
        let config = FieldConfig {
            max_particles: 3,
            ..FieldConfig::default()
        };
        assert_eq!(config.max_clusters(), 1);
        assert_eq!(FieldConfig::default().max_clusters(), 19);
    }
}
