//! Episode protocol of the blackjack environment.
use veld_core::scales::Scales;
use veld_core::{Env, NextState};
use veld_env::blackjack::{BlackjackAct, BlackjackConfig, BlackjackEnv};

fn env() -> (BlackjackEnv, Scales) {
    let mut scales = Scales::new();
    let env = BlackjackEnv::build(&BlackjackConfig::default(), &mut scales).unwrap();
    (env, scales)
}

#[test]
fn build_registers_score_scales() {
    let (_, scales) = env();
    assert_eq!(scales.value(2.0, "dealer").unwrap(), 0.0);
    assert!((scales.value(11.0, "dealer").unwrap() - 1.0).abs() < 1e-12);
    assert_eq!(scales.value(4.0, "player").unwrap(), 0.0);
    assert!((scales.value(21.0, "player").unwrap() - 1.0).abs() < 1e-12);
}

#[test]
fn unknown_variant_is_rejected() {
    let config = BlackjackConfig {
        variant: "tournament".to_string(),
    };
    assert!(BlackjackEnv::build(&config, &mut Scales::new()).is_err());
}

#[test]
fn reset_never_deals_a_natural() {
    fastrand::seed(53);
    let (mut env, _) = env();
    for _ in 0..200 {
        env.reset().unwrap();
        let state = env.state().unwrap();
        assert!(state.player <= 21);
        assert!(!(state.player == 21 && state.soft));
        assert!((2..=11).contains(&state.dealer));
        assert!((4..=21).contains(&state.player));
    }
}

#[test]
fn standing_terminates_with_a_showdown_reward() {
    fastrand::seed(59);
    let (mut env, _) = env();
    for _ in 0..100 {
        env.reset().unwrap();
        let (reward, next) = env.apply(&BlackjackAct::Stand).unwrap();
        assert!(next.is_terminal());
        assert!(reward == -1.0 || reward == 0.0 || reward == 1.0);
        assert!(env.state().is_err());
        assert!(env.apply(&BlackjackAct::Hit).is_err());
    }
}

#[test]
fn hitting_either_continues_or_busts() {
    fastrand::seed(61);
    let (mut env, _) = env();
    for _ in 0..200 {
        env.reset().unwrap();
        loop {
            match env.apply(&BlackjackAct::Hit).unwrap() {
                (reward, NextState::Valid(state)) => {
                    assert_eq!(reward, 0.0);
                    assert!(state.player <= 21);
                }
                (reward, NextState::Terminal) => {
                    assert_eq!(reward, -1.0);
                    break;
                }
            }
        }
    }
}

#[test]
fn report_grid_covers_hard_and_soft_hands() {
    let (env, _) = env();
    let states = env.report_states();
    assert_eq!(states.len(), 10 * 18 + 10 * 10);
    assert!(states.iter().all(|s| (2..=11).contains(&s.dealer)));
    assert!(states.iter().filter(|s| s.soft).all(|s| s.player >= 12));
    assert_eq!(env.state_columns().len(), 3);
    assert_eq!(BlackjackEnv::state_cells(&states[0]).len(), 3);
}
