pub mod cluster;
pub mod glow;
pub mod graph;
pub mod integrator;
#[cfg(feature = "vectors")]
pub mod render;
#[cfg(feature = "vectors")]
pub mod vector;
