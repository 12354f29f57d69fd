//! The per-bot submission loop.

use std::sync::Arc;
use std::time::Duration;

use ds_core::{AgentId, DriverRng, ScenarioId, Tick};
use ds_engine::{CommitEngine, EngineError};
use ds_timeline::TimelineError;
use tokio::time::MissedTickBehavior;

use crate::planner::{PlannerInput, TrajectoryPlanner};

/// Poll → plan → submit until the agent is terminal or the scenario closes.
///
/// The loop is deliberately stateless between iterations: every pass
/// re-reads the agent's latest known state from the engine, so a poller
/// that raced a commit (or another copy of itself) just re-syncs on the
/// next interval.  It never blocks inside `submit` — an unsatisfied barrier
/// leaves the candidate WAITING and the poller carries on queuing ahead.
///
/// Exits on its own when:
/// - the agent's committed state is terminal,
/// - a submission is rejected with `AgentTerminal` or `ScenarioClosed`,
/// - the scenario disappears from the registry.
///
/// The supervisor additionally aborts the task the moment the engine
/// reports either condition, so a poller between polls does not linger.
/// Exposed for callers that want to drive a bot under their own task
/// management instead of [`BotSupervisor`][crate::BotSupervisor].
pub async fn drive_bot(
    engine: Arc<CommitEngine>,
    planner: Arc<dyn TrajectoryPlanner>,
    scenario: ScenarioId,
    agent: AgentId,
    poll_interval: Duration,
    mut rng: DriverRng,
) {
    let Ok(view) = engine.agent_view(scenario, agent) else { return };
    let Ok(timing) = engine.timing(scenario) else { return };

    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        match engine.latest_committed(scenario, agent) {
            Ok(Some(state)) if state.status.is_terminal() => break,
            Ok(Some(_)) => {}
            // Tick 0 not committed yet — activation is still in flight.
            Ok(None) => continue,
            Err(_) => break,
        }
        let Ok(next) = engine.next_expected_tick(scenario, agent) else { break };

        // Plan from the latest known state (committed or queued) so a bot
        // running ahead of a slow sibling keeps extending its own path.
        let prev_tick = Tick(next.0 - 1);
        let Ok(prev) = engine.agent_states(scenario, agent, prev_tick, prev_tick) else { break };
        let Some((pose, speed)) = prev
            .first()
            .and_then(|s| Some((s.pose?, s.speed_mps.unwrap_or(0.0))))
        else {
            continue;
        };

        let input = PlannerInput {
            scenario,
            agent,
            tick: next,
            pose,
            speed_mps: speed,
            goal: view.goal,
            tick_duration_secs: timing.tick_duration_secs,
        };
        let candidate = planner.propose(&input, &mut rng);

        match engine.submit(scenario, agent, next, std::slice::from_ref(&candidate)) {
            Ok(_) => {}
            Err(EngineError::Rejected(TimelineError::AgentTerminal { .. }))
            | Err(EngineError::ScenarioClosed(_)) => break,
            // Lost a race with a commit between the reads above and the
            // submit; the next poll re-reads the frontier.
            Err(EngineError::Rejected(TimelineError::OutOfOrderTick { .. })) => continue,
            Err(e) => {
                log::warn!("bot {agent} in scenario {scenario}: submission failed: {e}");
                break;
            }
        }
    }
}
