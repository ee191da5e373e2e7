pub mod config;
pub mod field;
pub mod observer;
pub mod types;
