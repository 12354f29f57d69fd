//! The `Timeline` — one agent's contiguous per-tick state sequence.

use ds_core::Tick;

use crate::error::{TimelineError, TimelineResult};
use crate::state::{AgentState, Candidate, StateStatus};

/// Ordered per-tick states for a single agent.
///
/// Contiguity is structural: the state for tick `t` lives at index `t` of
/// the backing `Vec`, so a gap cannot be represented at all.  The committed
/// prefix `states[..committed]` is frozen; everything after it is WAITING
/// candidates queued ahead of the barrier (bots may run many ticks ahead of
/// slow humans).
///
/// Commits happen strictly in tick order, one state at a time, and only
/// through [`commit`](Self::commit) — the single place a state's status and
/// pose are finalized.
#[derive(Clone, Debug)]
pub struct Timeline {
    /// `states[t]` is the state at tick `t`.  Never empty: constructed with
    /// the tick-0 placeholder, and truncation always keeps the terminal
    /// state itself.
    states: Vec<AgentState>,

    /// Number of committed states — `states[..committed]` are finalized.
    committed: usize,
}

impl Timeline {
    /// A fresh timeline holding only the tick-0 PENDING placeholder.
    pub fn new() -> Self {
        Self {
            states: vec![AgentState::placeholder()],
            committed: 0,
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// The highest tick that has any state (committed or queued).
    #[inline]
    pub fn last_known_tick(&self) -> Tick {
        Tick(self.states.len() as u64 - 1)
    }

    /// The tick a new candidate must target.
    #[inline]
    pub fn next_expected_tick(&self) -> Tick {
        Tick(self.states.len() as u64)
    }

    /// The highest committed tick, or `None` before the tick-0 commit.
    #[inline]
    pub fn committed_frontier(&self) -> Option<Tick> {
        self.committed.checked_sub(1).map(|i| Tick(i as u64))
    }

    /// The most recent state regardless of status.
    pub fn latest_state(&self) -> &AgentState {
        &self.states[self.states.len() - 1]
    }

    /// The most recent committed state, skipping queued candidates.
    ///
    /// For a terminal agent this repeats the terminal state for any later
    /// query — terminal states are the end of the sequence by construction.
    pub fn latest_committed(&self) -> Option<&AgentState> {
        self.committed.checked_sub(1).map(|i| &self.states[i])
    }

    /// `true` once a terminal status has been committed.
    pub fn is_terminal(&self) -> bool {
        self.latest_committed()
            .is_some_and(|s| s.status.is_terminal())
    }

    /// The state at exactly `tick`, if one exists.
    pub fn state_at(&self, tick: Tick) -> Option<&AgentState> {
        self.states.get(tick.0 as usize)
    }

    /// `true` iff a WAITING candidate is queued at `tick`.
    pub fn waiting_at(&self, tick: Tick) -> bool {
        self.state_at(tick)
            .is_some_and(|s| s.status == StateStatus::Waiting)
    }

    /// All states, committed prefix first, in tick order.
    pub fn states(&self) -> &[AgentState] {
        &self.states
    }

    // ── Mutations ─────────────────────────────────────────────────────────

    /// Queue a candidate at `tick`.
    ///
    /// # Errors
    ///
    /// - [`TimelineError::AgentTerminal`] once a terminal status committed —
    ///   rejected regardless of `tick`, so pollers learn to stop.
    /// - [`TimelineError::OutOfOrderTick`] unless `tick` is exactly
    ///   `last_known_tick + 1`.  Resubmitting an already-known tick is
    ///   always rejected the same way (idempotent rejection).
    pub fn append_candidate(&mut self, tick: Tick, candidate: Candidate) -> TimelineResult<()> {
        if let Some(terminal) = self.latest_committed().filter(|s| s.status.is_terminal()) {
            return Err(TimelineError::AgentTerminal {
                status: terminal.status,
                at: terminal.tick,
            });
        }
        let expected = self.next_expected_tick();
        if tick != expected {
            return Err(TimelineError::OutOfOrderTick { expected, got: tick });
        }
        self.states.push(AgentState::waiting(tick, candidate));
        Ok(())
    }

    /// Finalize the state at `tick` as `final_status`, freezing the pose and
    /// kinematics from `candidate`.
    ///
    /// `tick` must be the exact next uncommitted tick, and the state there
    /// must be WAITING (or the tick-0 PENDING placeholder).  Committing a
    /// terminal status truncates any candidates queued beyond `tick` — they
    /// described a future the agent no longer has.
    ///
    /// # Errors
    ///
    /// [`TimelineError::NotWaiting`] on any violation.  This is an
    /// internal-consistency error: the barrier only ever commits the tick it
    /// just proved satisfied.
    pub fn commit(
        &mut self,
        tick: Tick,
        final_status: StateStatus,
        candidate: &Candidate,
    ) -> TimelineResult<()> {
        debug_assert!(final_status.is_committed(), "commit target must be a committed status");

        let idx = tick.0 as usize;
        if idx != self.committed {
            return Err(TimelineError::NotWaiting {
                tick,
                found: self.states.get(idx).map(|s| s.status),
            });
        }
        let commitable = match self.states.get(idx) {
            Some(s) if s.status == StateStatus::Waiting => true,
            Some(s) if s.status == StateStatus::Pending && tick == Tick::ZERO => true,
            _ => false,
        };
        if !commitable {
            return Err(TimelineError::NotWaiting {
                tick,
                found: self.states.get(idx).map(|s| s.status),
            });
        }

        let state = &mut self.states[idx];
        state.status = final_status;
        state.pose = Some(candidate.pose);
        state.speed_mps = Some(candidate.speed_mps);
        state.accel_mps2 = Some(candidate.accel_mps2);
        self.committed = idx + 1;

        if final_status.is_terminal() {
            self.states.truncate(idx + 1);
        }
        Ok(())
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}
