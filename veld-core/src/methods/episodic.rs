//! Shared outer loop of the episodic methods.
use super::{LearnOutcome, RewardPoint};
use crate::agent::Agent;
use crate::base::Env;
use crate::record::ValueSnapshot;
use crate::stats::LengthStats;
use anyhow::Result;
use log::info;
use std::collections::VecDeque;

/// What an episode contributed to the run statistics.
pub(crate) struct EpisodeSummary {
    pub steps: usize,
    pub reward: f64,
}

/// An episodic method: runs one episode per iteration, updating its value
/// representation along the way or from the finished episode.
pub(crate) trait EpisodicLearner<E: Env> {
    fn method_name(&self) -> &str;

    fn agent_mut(&mut self) -> &mut Agent<E>;

    /// Runs one episode to the terminal sentinel, applying this method's
    /// update rule.
    fn learn_episode(&mut self, iteration: u64) -> Result<EpisodeSummary>;

    /// Emits a value snapshot for the current iteration.
    fn write_snapshot(
        &self,
        iteration: u64,
        snapshots: &mut dyn ValueSnapshot<E::State, E::Act>,
    ) -> Result<()>;
}

/// Drives an [`EpisodicLearner`] for a number of iterations, collecting
/// reward checkpoints and episode-length statistics.
pub(crate) fn learn_episodes<E, M>(
    method: &mut M,
    iterations: u64,
    reporting_points: &[u64],
    snapshots: &mut dyn ValueSnapshot<E::State, E::Act>,
) -> Result<LearnOutcome>
where
    E: Env,
    M: EpisodicLearner<E>,
{
    let mut points: VecDeque<u64> = reporting_points.iter().copied().collect();
    let mut rewards = Vec::new();
    let mut lengths = LengthStats::new();
    let mut received = 0.0;

    info!(
        "method {} learning for {} iterations",
        method.method_name(),
        iterations
    );

    if !points.is_empty() {
        info!("learning round initial");
        method.write_snapshot(0, snapshots)?;
        rewards.push(RewardPoint {
            agent: method.method_name().to_string(),
            iteration: 0,
            reward: received,
        });
    }

    for iteration in 1..=iterations {
        method.agent_mut().initialize()?;
        let episode = method.learn_episode(iteration)?;

        lengths.record(episode.steps);
        received += episode.reward;

        if points.front() == Some(&iteration) {
            info!(
                "learning round {}: {:.3}, {:?}",
                iteration, received, lengths
            );
            method.write_snapshot(iteration, snapshots)?;
            rewards.push(RewardPoint {
                agent: method.method_name().to_string(),
                iteration,
                reward: received,
            });
            points.pop_front();
        }
    }

    Ok(LearnOutcome { rewards, lengths })
}
