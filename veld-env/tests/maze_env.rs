//! Episode protocol of the maze environment, and an end-to-end learning
//! run against the core.
use veld_core::methods::{Method, QLearning};
use veld_core::record::{GridSnapshot, NullSnapshot};
use veld_core::scales::Scales;
use veld_core::schedule::Schedule;
use veld_core::valuerep::TabularValues;
use veld_core::{Agent, Env, EpsilonGreedy, NextState};
use veld_env::maze::{MazeAct, MazeConfig, MazeEnv, MazeState};

fn simple_env() -> (MazeEnv, Scales) {
    let mut scales = Scales::new();
    let env = MazeEnv::build(&MazeConfig::simple(), &mut scales).unwrap();
    (env, scales)
}

#[test]
fn build_registers_grid_scales() {
    let (_, scales) = simple_env();
    assert_eq!(scales.value(0.0, "row").unwrap(), 0.0);
    assert!((scales.value(2.0, "row").unwrap() - 1.0).abs() < 1e-12);
    assert!((scales.value(3.0, "col").unwrap() - 1.0).abs() < 1e-12);
}

#[test]
fn reset_avoids_walls_and_terminal_cells() {
    fastrand::seed(67);
    let (mut env, _) = simple_env();
    for _ in 0..200 {
        env.reset().unwrap();
        let state = env.state().unwrap();
        assert_ne!((state.row, state.col), (1, 1), "started inside a wall");
        assert!(!((state.row, state.col) == (0, 3) || (state.row, state.col) == (1, 3)));
        assert!((0..3).contains(&state.row));
        assert!((0..4).contains(&state.col));
    }
}

#[test]
fn every_step_pays_the_living_cost() {
    fastrand::seed(71);
    let (mut env, _) = simple_env();
    env.reset().unwrap();

    loop {
        let (reward, next) = env.apply(&MazeAct::East).unwrap();
        match next {
            NextState::Valid(_) => assert_eq!(reward, -0.04),
            NextState::Terminal => {
                assert!((reward - 0.96).abs() < 1e-12 || (reward + 1.04).abs() < 1e-12);
                break;
            }
        }
    }
    assert!(env.state().is_err());
    assert!(env.apply(&MazeAct::East).is_err());
}

#[test]
fn report_grid_covers_every_cell() {
    let (env, _) = simple_env();
    let states = env.report_states();
    assert_eq!(states.len(), 12);
    assert!(states.contains(&MazeState { row: 1, col: 1 }));
    assert_eq!(env.state_columns(), vec!["row".to_string(), "col".to_string()]);
    assert_eq!(MazeEnv::state_cells(&MazeState { row: 2, col: 3 }), vec![2.0, 3.0]);
}

#[test]
fn q_learning_finds_the_positive_exit() {
    fastrand::seed(73);
    let (env, _) = simple_env();
    let actions = env.actions().to_vec();
    let agent = Agent::new(
        "Qlearning",
        env,
        EpsilonGreedy::new(Schedule::constant(0.15)),
    );
    let mut method = QLearning::new(
        "Qlearning",
        agent,
        TabularValues::new(actions),
        Schedule::constant(0.2),
        0.95,
    );

    method.learn(3000, &[], &mut NullSnapshot).unwrap();

    // From the cell left of the +1 exit, moving east must dominate
    // moving west.
    let values = method.values();
    let beside_exit = MazeState { row: 0, col: 2 };
    assert!(
        values.value_of(&beside_exit, &MazeAct::East)
            > values.value_of(&beside_exit, &MazeAct::West)
    );
    // The exit move is worth roughly the +1 reward minus the living cost.
    assert!(values.value_of(&beside_exit, &MazeAct::East) > 0.5);
}

#[test]
fn snapshots_tabulate_the_report_grid() {
    fastrand::seed(79);
    let (env, _) = simple_env();
    let actions = env.actions().to_vec();
    let mut snapshots = GridSnapshot::new(&env);
    let agent = Agent::new(
        "Qlearning",
        env,
        EpsilonGreedy::new(Schedule::constant(0.3)),
    );
    let mut method = QLearning::new(
        "Qlearning",
        agent,
        TabularValues::new(actions),
        Schedule::constant(0.2),
        0.95,
    );

    method.learn(20, &[10, 20], &mut snapshots).unwrap();

    // Initial snapshot plus two checkpoints, 12 states x 4 actions each.
    assert_eq!(snapshots.rows().len(), 3 * 12 * 4);
    assert_eq!(snapshots.columns().len(), 2 + 2 + 3);
    assert!(snapshots.rows().iter().all(|row| row.visit_count.is_some()));
}
