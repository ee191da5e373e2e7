pub mod api;
pub mod bridge;
pub mod core;
pub mod input;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::config::{ConfigError, FieldConfig};
pub use api::field::FieldEngine;
pub use api::observer::{FrameObserver, Publisher, SubscriptionId};
pub use api::types::{GlowFrame, ParticleId, Point};
pub use bridge::protocol::{FrameBuffer, ProtocolLayout};
pub use crate::core::bounds::{Rect, Viewport};
pub use crate::core::particle::{Edge, Particle, ParticleState};
pub use crate::core::region::{RegionProvider, RegionTracker, StaticRegion};
pub use crate::core::rng::Rng;
pub use crate::core::time::{FixedTimestep, FramePlan, FrameScheduler, StepMode};
pub use input::pointer::PointerTracker;
pub use input::queue::{InputEvent, InputQueue};
pub use systems::cluster::{find_clusters, Cluster, ClusterDetector};
pub use systems::glow::GlowProbe;
pub use systems::graph::{Connection, ConnectionGraph};
pub use systems::integrator::StepStats;

#[cfg(feature = "vectors")]
pub use systems::render::{Theme, ThemeMode};
#[cfg(feature = "vectors")]
pub use systems::vector::{VectorColor, VectorState, VectorVertex};
