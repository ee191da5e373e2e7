pub mod bounds;
pub mod particle;
pub mod region;
pub mod rng;
pub mod store;
pub mod time;
