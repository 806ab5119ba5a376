//! Batch sampling shared by the batch methods.
use crate::agent::Agent;
use crate::base::{Env, NextState, Transition};
use crate::stats::LengthStats;
use crate::valuerep::ValueRep;
use anyhow::Result;

/// A fixed set of transitions drawn from independently generated
/// episodes, retained unchanged across all policy-iteration sweeps.
pub(crate) struct SampleBatch<S, A> {
    pub steps: Vec<Transition<S, A>>,
    pub lengths: LengthStats,
    pub reward: f64,
}

/// Generates `episodes` full episodes under the current (untrained)
/// behavior policy and flattens them into one sample batch.
pub(crate) fn sample_environment<E, V>(
    agent: &mut Agent<E>,
    values: &V,
    episodes: u64,
) -> Result<SampleBatch<E::State, E::Act>>
where
    E: Env,
    V: ValueRep<E::State, E::Act>,
{
    let mut steps = Vec::new();
    let mut lengths = LengthStats::new();
    let mut reward = 0.0;

    for _ in 0..episodes {
        agent.initialize()?;
        let mut state = agent.state()?;
        let mut length = 0usize;

        loop {
            // Sampling happens before any learning; the iteration index is
            // not meaningful here.
            let step = agent.transition(values, &state, 0)?;
            let next_state = step.next_state.clone();

            length += 1;
            reward += step.reward;
            steps.push(step);

            match next_state {
                NextState::Terminal => break,
                NextState::Valid(s) => state = s,
            }
        }

        lengths.record(length);
    }

    Ok(SampleBatch {
        steps,
        lengths,
        reward,
    })
}
