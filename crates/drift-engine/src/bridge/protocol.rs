//! Flat frame buffer read by the page.
//! Must stay in sync with the TypeScript reader.
//!
//! Layout (all values in f32 / 4 bytes):
//! ```text
//! [Header: 8 floats]
//! [Particles: max_particles × 2 floats]
//! [Clusters: max_clusters × 2 floats]
//! ```
//!
//! Capacities are written into the header every frame so the reader can
//! compute offsets without knowing the config.

use crate::api::config::FieldConfig;
use crate::api::types::{GlowFrame, Point};

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 8;

/// Header field indices.
pub const HEADER_PROTOCOL_VERSION: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_MAX_PARTICLES: usize = 2;
pub const HEADER_PARTICLE_COUNT: usize = 3;
pub const HEADER_MAX_CLUSTERS: usize = 4;
pub const HEADER_CLUSTER_COUNT: usize = 5;
pub const HEADER_ACTIVE: usize = 6;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per position: x, y (wire format, never changes).
pub const POINT_FLOATS: usize = Point::FLOATS;

/// Buffer layout for a given capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_particles: usize,
    pub max_clusters: usize,

    /// Offset (in floats) where particle positions begin.
    pub particle_data_offset: usize,
    /// Offset (in floats) where cluster centers begin.
    pub cluster_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    pub fn new(max_particles: usize, max_clusters: usize) -> Self {
        let particle_data_offset = HEADER_FLOATS;
        let cluster_data_offset = particle_data_offset + max_particles * POINT_FLOATS;
        let buffer_total_floats = cluster_data_offset + max_clusters * POINT_FLOATS;

        Self {
            max_particles,
            max_clusters,
            particle_data_offset,
            cluster_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    pub fn from_config(config: &FieldConfig) -> Self {
        Self::new(config.max_particles, config.max_clusters())
    }
}

/// The backing storage for one layout. Rewritten in place every frame.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    layout: ProtocolLayout,
    data: Vec<f32>,
}

impl FrameBuffer {
    pub fn new(layout: ProtocolLayout) -> Self {
        let mut data = vec![0.0; layout.buffer_total_floats];
        data[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        data[HEADER_MAX_PARTICLES] = layout.max_particles as f32;
        data[HEADER_MAX_CLUSTERS] = layout.max_clusters as f32;
        Self { layout, data }
    }

    /// Copy `frame` in. Entries past capacity are dropped from the buffer only.
    pub fn write(&mut self, frame: &GlowFrame, frame_counter: u64) {
        let particles = &frame.particles[..frame.particles.len().min(self.layout.max_particles)];
        let clusters = &frame.clusters[..frame.clusters.len().min(self.layout.max_clusters)];

        let header = &mut self.data[..HEADER_FLOATS];
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        header[HEADER_FRAME_COUNTER] = frame_counter as f32;
        header[HEADER_MAX_PARTICLES] = self.layout.max_particles as f32;
        header[HEADER_PARTICLE_COUNT] = particles.len() as f32;
        header[HEADER_MAX_CLUSTERS] = self.layout.max_clusters as f32;
        header[HEADER_CLUSTER_COUNT] = clusters.len() as f32;
        header[HEADER_ACTIVE] = if frame.active { 1.0 } else { 0.0 };

        let p = self.layout.particle_data_offset;
        self.data[p..p + particles.len() * POINT_FLOATS]
            .copy_from_slice(bytemuck::cast_slice(particles));
        let c = self.layout.cluster_data_offset;
        self.data[c..c + clusters.len() * POINT_FLOATS]
            .copy_from_slice(bytemuck::cast_slice(clusters));
    }

    pub fn layout(&self) -> &ProtocolLayout {
        &self.layout
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Raw pointer into linear memory, for a `Float32Array` view on the JS side.
    pub fn ptr(&self) -> *const f32 {
        self.data.as_ptr()
    }
}
