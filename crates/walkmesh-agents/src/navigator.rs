//! Movement resolution for agents on a walkmesh
//!
//! The [`Navigator`] owns the mesh and the agent list, and is the single
//! mutation path for agent positions, triangle ids and the mesh's
//! disabled-triangle set. A move request first refreshes proximity sets,
//! then gates on collision heading, then either commits directly inside the
//! current triangle or delegates to the transition resolver.

use std::collections::HashSet;

use glam::{Vec2, Vec3};
use walkmesh::{find_exit_edge, resolve, FocusState, Transition, TriId, Walkmesh};
use walkmesh_common::{Error, Result};

use crate::agent::{Agent, AgentFlags, AgentId, AgentParams};

/// Far-away probe endpoint used to confirm a position really lies inside its
/// triangle: a segment from an interior point to the probe must cross one of
/// the triangle's edges.
const INSIDE_PROBE: Vec2 = Vec2::new(9999.0, 9999.0);

/// Receives a notification after every committed move. Registered with
/// [`Navigator::add_listener`]; used by script and trigger hooks that need
/// to observe movement without owning it.
pub trait MoveListener {
    /// Called with the agent's position before and after the committed move
    fn agent_moved(&mut self, agent: AgentId, old_position: Vec3, new_position: Vec3);
}

/// Which proximity relation a refresh pass maintains
#[derive(Debug, Clone, Copy)]
enum Proximity {
    Talk,
    Collide,
}

impl Proximity {
    fn flag(self) -> AgentFlags {
        match self {
            Proximity::Talk => AgentFlags::CAN_TALK,
            Proximity::Collide => AgentFlags::CAN_COLLIDE,
        }
    }

    fn radius(self, agent: &Agent) -> f32 {
        match self {
            Proximity::Talk => agent.talk_radius,
            Proximity::Collide => agent.collide_radius,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Proximity::Talk => "talk",
            Proximity::Collide => "collision",
        }
    }
}

struct FocusEntry {
    reference: AgentId,
    target: AgentId,
    state: FocusState,
}

/// Owns a walkmesh and the agents moving across it.
pub struct Navigator {
    mesh: Walkmesh,
    agents: Vec<Agent>,
    listeners: Vec<Box<dyn MoveListener>>,
    focus: Option<FocusEntry>,
}

impl Navigator {
    /// Creates a navigator over a walkmesh
    pub fn new(mesh: Walkmesh) -> Self {
        Self {
            mesh,
            agents: Vec::new(),
            listeners: Vec::new(),
            focus: None,
        }
    }

    /// Read access to the walkmesh
    pub fn mesh(&self) -> &Walkmesh {
        &self.mesh
    }

    /// Marks a triangle impassable (or passable again) for every traversal.
    /// Invalidates any cached focus state, since distances may have changed.
    pub fn set_triangle_disabled(&mut self, id: TriId, disabled: bool) {
        self.mesh.set_disabled(id, disabled);
        self.focus = None;
    }

    /// Registers a listener notified after every committed move
    pub fn add_listener(&mut self, listener: Box<dyn MoveListener>) {
        self.listeners.push(listener);
    }

    /// Adds an agent; it has no position or triangle until placed with
    /// [`Navigator::drop_onto`].
    pub fn add_agent(&mut self, params: AgentParams) -> AgentId {
        self.agents.push(Agent::new(params));
        self.agents.len() - 1
    }

    /// Number of agents
    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Looks up an agent by id
    pub fn agent(&self, id: AgentId) -> Result<&Agent> {
        self.agents.get(id).ok_or(Error::AgentNotFound(id))
    }

    /// Mutable agent access, for callers adjusting radii or flags between
    /// steps. Position and triangle should only change through moves.
    pub fn agent_mut(&mut self, id: AgentId) -> Result<&mut Agent> {
        self.agents.get_mut(id).ok_or(Error::AgentNotFound(id))
    }

    /// Places an agent at a ground position in a known triangle,
    /// unconditionally, bypassing transition logic. Used at scene entry.
    pub fn drop_onto(&mut self, id: AgentId, position: Vec2, tri: TriId) -> Result<()> {
        self.check_agent(id)?;
        let height = self
            .mesh
            .height_in_triangle(tri, position.x, position.y, true)
            .ok_or_else(|| {
                Error::Placement(format!(
                    "position ({}, {}) has no height in triangle {tri}",
                    position.x, position.y
                ))
            })?;

        let agent = &mut self.agents[id];
        agent.position = Vec3::new(position.x, position.y, height);
        agent.triangle = Some(tri);
        self.focus = None;
        log::trace!("agent {id} placed at {:?} triangle {tri}", agent.position);
        Ok(())
    }

    /// Attempts to move an agent toward a desired position.
    ///
    /// Talk-range sets are refreshed on every attempt. With `check_collision`
    /// set, collision-range sets are refreshed too and the move is rejected
    /// when the agent is heading toward anything it is already colliding
    /// with (angle between the obstacle and the destination under 90
    /// degrees at the current position). A plain rejected move returns
    /// `Ok(false)` and leaves all agent state untouched.
    ///
    /// Returns an error only for broken geometry invariants, which indicate
    /// a malformed mesh rather than a blocked move.
    pub fn try_move(&mut self, id: AgentId, desired: Vec3, check_collision: bool) -> Result<bool> {
        self.check_agent(id)?;

        self.refresh_proximity(id, desired, Proximity::Talk);
        if check_collision {
            self.refresh_proximity(id, desired, Proximity::Collide);

            // While already colliding, only moves clearly away are allowed.
            // Comparing distances instead would let a large enough step pass
            // straight through a small obstacle.
            let mover_pos = self.agents[id].position;
            let colliding: Vec<AgentId> = self.agents[id].colliding_with.iter().copied().collect();
            for other in colliding {
                let other_pos = self.agents[other].position;
                let a = (other_pos - mover_pos).length();
                let b = (desired - mover_pos).length();
                let c = (other_pos - desired).length();
                let heading_angle = ((a * a + b * b - c * c) / (2.0 * a * b)).acos();

                if heading_angle < std::f32::consts::FRAC_PI_2 {
                    return Ok(false);
                }
            }
        }

        let old_position = self.agents[id].position;
        let current = self.agents[id].triangle.ok_or_else(|| {
            Error::Placement(format!("agent {id} has not been placed on the walkmesh"))
        })?;

        if let Some(height) = self
            .mesh
            .height_in_triangle(current, desired.x, desired.y, false)
        {
            // Staying in the same triangle; just update the height
            if find_exit_edge(&self.mesh, current, desired.truncate(), INSIDE_PROBE).is_none() {
                return Err(Error::InvariantViolation(format!(
                    "point ({}, {}) inside triangle {current} does not reach its boundary",
                    desired.x, desired.y
                )));
            }
            self.commit(id, old_position, Vec3::new(desired.x, desired.y, height));
            return Ok(true);
        }

        let outcome = resolve(
            &self.mesh,
            old_position.truncate(),
            desired.truncate(),
            current,
            true,
        )?;

        let (dest_tri, dest) = match outcome {
            Transition::Failure => return Ok(false),
            Transition::SlideCurrentTri { dest } => (current, dest),
            Transition::Success { tri, dest } | Transition::SlideNewTri { tri, dest } => {
                self.agents[id].triangle = Some(tri);
                self.focus = None;
                (tri, dest)
            }
        };

        let dest = self.mesh.clamp_to_triangle(dest_tri, dest)?;
        let height = self
            .mesh
            .height_in_triangle(dest_tri, dest.x, dest.y, true)
            .ok_or_else(|| {
                Error::InvariantViolation(format!(
                    "clamped point ({}, {}) has no height in triangle {dest_tri}",
                    dest.x, dest.y
                ))
            })?;

        self.commit(id, old_position, Vec3::new(dest.x, dest.y, height));
        Ok(true)
    }

    /// Mesh distance and path summary for a candidate focus target, as seen
    /// from a reference agent. `None` when either agent is unplaced or the
    /// target's triangle is unreachable.
    ///
    /// The result is cached per (reference, target) pair and invalidated
    /// whenever any agent changes triangle or a triangle is toggled
    /// disabled.
    pub fn focus_state(
        &mut self,
        reference: AgentId,
        target: AgentId,
    ) -> Result<Option<&FocusState>> {
        self.check_agent(reference)?;
        self.check_agent(target)?;

        let cached = self
            .focus
            .as_ref()
            .is_some_and(|e| e.reference == reference && e.target == target);

        if !cached {
            let Some(reference_tri) = self.agents[reference].triangle else {
                return Ok(None);
            };
            let Some(target_tri) = self.agents[target].triangle else {
                return Ok(None);
            };

            let Some(state) = walkmesh::focus_state(
                &self.mesh,
                reference_tri,
                target_tri,
                &self.agents[target].name,
                self.agents[target].position,
            ) else {
                return Ok(None);
            };

            log::debug!(
                "focus target {} is {} triangles from agent {reference}",
                state.target_name,
                state.distance
            );
            self.focus = Some(FocusEntry {
                reference,
                target,
                state,
            });
        }

        Ok(self.focus.as_ref().map(|e| &e.state))
    }

    fn check_agent(&self, id: AgentId) -> Result<()> {
        if id >= self.agents.len() {
            return Err(Error::AgentNotFound(id));
        }
        Ok(())
    }

    fn commit(&mut self, id: AgentId, old_position: Vec3, new_position: Vec3) {
        self.agents[id].position = new_position;
        log::trace!(
            "agent {id} at {new_position:?} triangle {:?}",
            self.agents[id].triangle
        );
        for listener in &mut self.listeners {
            listener.agent_moved(id, old_position, new_position);
        }
    }

    /// Rebuilds the mover's proximity set of the given kind against every
    /// eligible agent, measured at the position the mover is heading to.
    /// Membership is symmetric: both agents' sets are updated.
    fn refresh_proximity(&mut self, mover: AgentId, desired: Vec3, kind: Proximity) {
        let flag = kind.flag();
        let mover_radius = kind.radius(&self.agents[mover]);

        for i in 0..self.agents.len() {
            if i != mover {
                Self::proximity_set(&mut self.agents[i], kind).remove(&mover);
            }
        }
        Self::proximity_set(&mut self.agents[mover], kind).clear();

        for i in 0..self.agents.len() {
            if i == mover {
                continue;
            }
            let other = &self.agents[i];
            if !other.flags.contains(flag) || other.triangle.is_none() {
                continue;
            }

            let dist = (other.position.truncate() - desired.truncate()).length();
            let range = mover_radius + kind.radius(other);
            if dist <= range {
                log::debug!(
                    "agent {mover} now within {} range of agent {i}",
                    kind.label()
                );
                Self::proximity_set(&mut self.agents[i], kind).insert(mover);
                Self::proximity_set(&mut self.agents[mover], kind).insert(i);
            }
        }
    }

    fn proximity_set(agent: &mut Agent, kind: Proximity) -> &mut HashSet<AgentId> {
        match kind {
            Proximity::Talk => &mut agent.in_talk_range,
            Proximity::Collide => &mut agent.colliding_with,
        }
    }
}
