//! Mobile entities and movement resolution on a walkmesh
//!
//! This crate manages the agents moving across a [`walkmesh::Walkmesh`]: it
//! keeps each agent's position and triangle id in agreement, gates moves on
//! entity-to-entity collision, maintains talk/collision proximity sets, and
//! serves cached focus-target queries.
//!
//! # Example
//!
//! ```rust,ignore
//! use walkmesh_agents::{AgentParams, Navigator};
//!
//! let mut nav = Navigator::new(mesh);
//! let hero = nav.add_agent(AgentParams {
//!     name: "hero".into(),
//!     ..Default::default()
//! });
//! nav.drop_onto(hero, spawn_point, spawn_triangle)?;
//!
//! // Once per simulation step:
//! let moved = nav.try_move(hero, desired_position, true)?;
//! ```

pub mod agent;
pub mod navigator;

pub use agent::*;
pub use navigator::*;
