//! Agent slot descriptions and runtime agents.

use ds_core::{AgentId, IdentityId, OrientedRect};
use ds_timeline::Candidate;

// ── AgentSpec ─────────────────────────────────────────────────────────────────

/// Creation-time description of one agent slot.
///
/// The initial candidate and the goal rectangle come from the external
/// scenario-template loader; the engine only stores the resulting values.
/// Human slots are usually created unbound (`identity: None`) and bound
/// later through [`CommitEngine::bind_agent`][crate::CommitEngine::bind_agent];
/// bot slots are system-driven and count as bound from birth.
#[derive(Clone, Debug)]
pub struct AgentSpec {
    /// `true` → a background poller supplies future states; `false` → a
    /// human submission endpoint does.
    pub is_bot: bool,

    /// Bound identity, if known at creation.  Required for humans before
    /// the scenario can activate; optional bookkeeping for bots.
    pub identity: Option<IdentityId>,

    /// The agent's state at tick 0 (pose, speed; acceleration usually 0).
    pub initial: Candidate,

    /// Goal region in world coordinates.
    pub goal: OrientedRect,
}

impl AgentSpec {
    /// An unbound human slot.
    pub fn human(initial: Candidate, goal: OrientedRect) -> Self {
        Self { is_bot: false, identity: None, initial, goal }
    }

    /// A bot slot (bound by construction).
    pub fn bot(initial: Candidate, goal: OrientedRect) -> Self {
        Self { is_bot: true, identity: None, initial, goal }
    }
}

// ── Agent ─────────────────────────────────────────────────────────────────────

/// One driving participant in a scenario.
///
/// Invariant: once `identity` is `Some`, it never changes.
#[derive(Clone, Debug)]
pub struct Agent {
    pub id: AgentId,
    pub identity: Option<IdentityId>,
    pub is_bot: bool,
    pub initial: Candidate,
    pub goal: OrientedRect,
}

impl Agent {
    pub(crate) fn from_spec(id: AgentId, spec: AgentSpec) -> Self {
        Self {
            id,
            identity: spec.identity,
            is_bot: spec.is_bot,
            initial: spec.initial,
            goal: spec.goal,
        }
    }

    /// Bots count as bound from birth; humans need an identity.
    #[inline]
    pub fn is_bound(&self) -> bool {
        self.is_bot || self.identity.is_some()
    }
}
