//! Factory wiring: every configured method builds and runs end to end.
use veld::config::{AgentSpec, MethodKind, ScheduleChoice};
use veld::factory::{build_blackjack, build_maze, BatchLimits};
use veld_core::methods::Method;
use veld_core::record::NullSnapshot;

fn spec(name: &str, method: MethodKind) -> AgentSpec {
    AgentSpec {
        name: name.to_string(),
        method,
        epsilon_type: ScheduleChoice::Constant,
        epsilon_constant: Some(0.2),
        epsilon_initial: None,
        epsilon_n0: None,
        epsilon_target_iterations: None,
        epsilon_target: None,
        alpha_type: ScheduleChoice::Constant,
        alpha_constant: Some(0.1),
        alpha_initial: None,
        alpha_a0: None,
        alpha_target_iterations: None,
        alpha_target: None,
        gamma: 0.9,
    }
}

const BATCH: Option<BatchLimits> = Some(BatchLimits {
    max_iterations: 3,
    stopping_limit: 0.01,
});

#[test]
fn every_blackjack_method_builds_and_learns() {
    fastrand::seed(83);
    let methods = [
        MethodKind::MonteCarloOn,
        MethodKind::MonteCarloOff,
        MethodKind::Qlearning,
        MethodKind::Sarsa,
        MethodKind::SarsaExpected,
        MethodKind::SgFcSarsa,
        MethodKind::SgPolSarsa,
        MethodKind::SgTcSarsa,
    ];

    for kind in &methods {
        let spec = spec("blackjack-agent", *kind);
        let (mut method, _snapshots) = build_blackjack(&spec, "simple", None).unwrap();
        let outcome = method.learn(20, &[], &mut NullSnapshot).unwrap();
        assert_eq!(outcome.lengths.episodes(), 20);

        let evaluated = method.evaluate(50).unwrap();
        assert_eq!(evaluated.lengths.episodes(), 50);
    }
}

#[test]
fn blackjack_batch_methods_build_and_learn() {
    fastrand::seed(89);
    for kind in &[
        MethodKind::LsTcBatch,
        MethodKind::LsPolBatch,
        MethodKind::LsFcBatch,
    ] {
        let spec = spec("blackjack-batch", *kind);
        let (mut method, _snapshots) = build_blackjack(&spec, "simple", BATCH).unwrap();
        let outcome = method.learn(15, &[], &mut NullSnapshot).unwrap();
        assert_eq!(outcome.lengths.episodes(), 15);
    }
}

#[test]
fn maze_methods_build_and_learn() {
    fastrand::seed(97);
    for kind in &[
        MethodKind::Qlearning,
        MethodKind::SarsaExpected,
        MethodKind::SgFcSarsa,
    ] {
        let spec = spec("maze-agent", *kind);
        let (mut method, _snapshots) = build_maze(&spec, "simple", None).unwrap();
        let outcome = method.learn(15, &[], &mut NullSnapshot).unwrap();
        assert_eq!(outcome.lengths.episodes(), 15);
    }
}

#[test]
fn maze_rejects_blackjack_only_representations() {
    let spec1 = spec("maze-agent", MethodKind::SgTcSarsa);
    assert!(build_maze(&spec1, "simple", None).is_err());
    let spec2 = spec("maze-agent", MethodKind::LsPolBatch);
    assert!(build_maze(&spec2, "simple", None).is_err());
}

#[test]
fn tabular_methods_require_an_alpha_schedule() {
    let mut spec = spec("blackjack-agent", MethodKind::Qlearning);
    spec.alpha_type = ScheduleChoice::NotUsed;
    assert!(build_blackjack(&spec, "simple", None).is_err());
}

#[test]
fn monte_carlo_runs_without_an_alpha_schedule() {
    fastrand::seed(101);
    let mut spec = spec("blackjack-agent", MethodKind::MonteCarloOn);
    spec.alpha_type = ScheduleChoice::NotUsed;
    let (mut method, _snapshots) = build_blackjack(&spec, "simple", None).unwrap();
    method.learn(10, &[], &mut NullSnapshot).unwrap();
}

#[test]
fn unknown_environment_variant_fails() {
    let spec = spec("agent", MethodKind::Qlearning);
    assert!(build_blackjack(&spec, "tournament", None).is_err());
    assert!(build_maze(&spec, "labyrinth", None).is_err());
}
