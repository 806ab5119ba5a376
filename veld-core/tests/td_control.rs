//! End-to-end temporal-difference control on the deterministic
//! two-state environment.
use veld_core::dummy::{DummyAct, DummyEnv, DummyState};
use veld_core::methods::{Method, QLearning};
use veld_core::record::NullSnapshot;
use veld_core::scales::Scales;
use veld_core::schedule::Schedule;
use veld_core::valuerep::TabularValues;
use veld_core::{Agent, Env, EpsilonGreedy};

fn q_learning(epsilon: f64, alpha: f64, gamma: f64) -> QLearning<DummyEnv> {
    let env = DummyEnv::build(&(), &mut Scales::new()).unwrap();
    let actions = env.actions().to_vec();
    let agent = Agent::new(
        "Qlearning",
        env,
        EpsilonGreedy::new(Schedule::constant(epsilon)),
    );
    QLearning::new(
        "Qlearning",
        agent,
        TabularValues::new(actions),
        Schedule::constant(alpha),
        gamma,
    )
}

#[test]
fn one_episode_moves_only_the_taken_actions() {
    fastrand::seed(41);
    let mut method = q_learning(1.0, 0.5, 0.9);

    let outcome = method
        .learn(1, &[], &mut NullSnapshot)
        .unwrap();
    assert_eq!(outcome.lengths.mean, 2.0);

    // The successor's values are all zero when each update runs, so the
    // taken action lands exactly on 0.5 * reward; the other action is
    // untouched and reads as the default.
    for state in &[DummyState::First, DummyState::Second] {
        let values = method.values();
        let pay = values.node(state, &DummyAct::Pay);
        let skip = values.node(state, &DummyAct::Skip);

        assert_eq!(pay.visit_count + skip.visit_count, 1);
        if pay.visit_count == 1 {
            assert_eq!(pay.value, 0.5);
            assert_eq!(skip.value, 0.0);
        } else {
            assert_eq!(skip.value, 0.0);
            assert_eq!(pay.value, 0.0);
        }
    }
}

#[test]
fn values_converge_to_the_discounted_optimum() {
    fastrand::seed(42);
    let mut method = q_learning(0.3, 0.5, 0.9);

    method.learn(500, &[], &mut NullSnapshot).unwrap();

    // Q*(Second, Pay) = 1, Q*(First, Pay) = 1 + 0.9 * 1.
    let values = method.values();
    assert!((values.value_of(&DummyState::Second, &DummyAct::Pay) - 1.0).abs() < 1e-6);
    assert!((values.value_of(&DummyState::First, &DummyAct::Pay) - 1.9).abs() < 1e-6);
    assert!(values.value_of(&DummyState::Second, &DummyAct::Skip) < 1.0);
}

#[test]
fn evaluation_is_read_only_and_greedy() {
    fastrand::seed(43);
    let mut method = q_learning(0.3, 0.5, 0.9);
    method.learn(200, &[], &mut NullSnapshot).unwrap();

    let nodes_before = method.values().len();
    let outcome = method.evaluate(100).unwrap();

    assert_eq!(method.values().len(), nodes_before);
    assert_eq!(outcome.lengths.episodes(), 100);
    // The greedy policy pays on both steps of every episode.
    assert_eq!(outcome.reward, 200.0);
}

#[test]
fn reporting_checkpoints_produce_reward_points() {
    fastrand::seed(44);
    let mut method = q_learning(1.0, 0.5, 0.9);

    let outcome = method.learn(10, &[5, 10], &mut NullSnapshot).unwrap();

    let iterations: Vec<u64> = outcome.rewards.iter().map(|p| p.iteration).collect();
    assert_eq!(iterations, vec![0, 5, 10]);
}
