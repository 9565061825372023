//! Common geometry primitives and error types shared by the walkmesh crates

mod geometry;

pub use geometry::*;

/// Represents a 3D position (ground-plane X/Y, height in Z)
pub type Vec3 = glam::Vec3;

/// Represents a ground-plane position
pub type Vec2 = glam::Vec2;

/// Error types for the library
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid walkmesh: {0}")]
    InvalidMesh(String),

    #[error("walkmesh invariant violated: {0}")]
    InvariantViolation(String),

    #[error("placement failed: {0}")]
    Placement(String),

    #[error("no agent with id {0}")]
    AgentNotFound(usize),
}

/// Result type for walkmesh operations
pub type Result<T> = std::result::Result<T, Error>;
