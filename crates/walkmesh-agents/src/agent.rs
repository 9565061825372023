//! Agent state and parameters

use std::collections::HashSet;

use glam::Vec3;
use walkmesh::TriId;

/// Identifies an agent within a [`crate::Navigator`]
pub type AgentId = usize;

/// Default collision radius for an agent, in world units
const DEFAULT_COLLIDE_RADIUS: f32 = 20.0;

/// Default talk radius for an agent, in world units
const DEFAULT_TALK_RADIUS: f32 = 30.0;

/// Capability flags for agents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AgentFlags(pub u8);

impl AgentFlags {
    /// Agent participates in collision gating
    pub const CAN_COLLIDE: AgentFlags = AgentFlags(1);
    /// Agent participates in talk-range tracking
    pub const CAN_TALK: AgentFlags = AgentFlags(2);

    /// Check if flags contain the specified flag
    pub fn contains(&self, other: AgentFlags) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for AgentFlags {
    fn default() -> Self {
        AgentFlags(AgentFlags::CAN_COLLIDE.0 | AgentFlags::CAN_TALK.0)
    }
}

/// Parameters for creating a new agent
#[derive(Debug, Clone)]
pub struct AgentParams {
    /// Display name, used in focus summaries and logging
    pub name: String,
    /// Collision radius in world units
    pub collide_radius: f32,
    /// Talk radius in world units
    pub talk_radius: f32,
    /// Capability flags
    pub flags: AgentFlags,
}

impl Default for AgentParams {
    fn default() -> Self {
        Self {
            name: String::new(),
            collide_radius: DEFAULT_COLLIDE_RADIUS,
            talk_radius: DEFAULT_TALK_RADIUS,
            flags: AgentFlags::default(),
        }
    }
}

/// A mobile entity on the walkmesh.
///
/// Position and triangle are set once at scene entry via
/// [`crate::Navigator::drop_onto`] and mutated only by successful moves
/// thereafter. The proximity sets are recomputed on every move attempt.
#[derive(Debug, Clone)]
pub struct Agent {
    /// Display name
    pub name: String,
    /// Current world position (Z is the mesh height)
    pub position: Vec3,
    /// Triangle the agent currently stands in, `None` until placed
    pub triangle: Option<TriId>,
    /// Collision radius in world units
    pub collide_radius: f32,
    /// Talk radius in world units
    pub talk_radius: f32,
    /// Capability flags
    pub flags: AgentFlags,
    /// Agents currently within combined collision radius
    pub colliding_with: HashSet<AgentId>,
    /// Agents currently within combined talk radius
    pub in_talk_range: HashSet<AgentId>,
}

impl Agent {
    pub(crate) fn new(params: AgentParams) -> Self {
        Self {
            name: params.name,
            position: Vec3::ZERO,
            triangle: None,
            collide_radius: params.collide_radius,
            talk_radius: params.talk_radius,
            flags: params.flags,
            colliding_with: HashSet::new(),
            in_talk_range: HashSet::new(),
        }
    }
}
