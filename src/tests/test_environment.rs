use image::Rgb;

use crate::environment::{CartPole, Environment};
use crate::error::DqnError;

#[test]
fn test_reset_draws_small_state() {
    let mut env = CartPole::new(Some(0));
    for _ in 0..20 {
        let state = env.reset().unwrap();
        assert_eq!(state.len(), 4);
        assert!(state.iter().all(|v| v.abs() <= 0.05));
    }
}

#[test]
fn test_step_requires_reset() {
    let mut env = CartPole::new(Some(0));
    assert!(matches!(env.step(0), Err(DqnError::TrainingError(_))));

    env.reset().unwrap();
    assert!(matches!(env.step(2), Err(DqnError::InvalidAction { action: 2, max_actions: 2 })));
    assert!(env.step(1).is_ok());
}

#[test]
fn test_episode_terminates_and_stays_done() {
    let mut env = CartPole::new(Some(1));
    env.reset().unwrap();

    let mut steps = 0;
    let mut total = 0.0;
    loop {
        let step = env.step(1).unwrap();
        steps += 1;
        total += step.reward;
        assert_eq!(step.reward, 1.0);
        if step.done {
            break;
        }
    }
    // Always pushing right tips the pole well before the time limit
    assert!(steps < 200);
    assert_eq!(total, steps as f32);
    assert!(matches!(env.step(0), Err(DqnError::TrainingError(_))));
}

#[test]
fn test_time_limit() {
    let mut env = CartPole::new(Some(2)).with_max_episode_steps(5);
    assert_eq!(env.max_episode_steps(), 5);
    env.reset().unwrap();

    let mut done = false;
    let mut steps = 0;
    while !done {
        done = env.step(steps % 2).unwrap().done;
        steps += 1;
    }
    assert_eq!(steps, 5);
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let mut a = CartPole::new(Some(42));
    let mut b = CartPole::new(Some(42));
    assert_eq!(a.reset().unwrap(), b.reset().unwrap());
    for _ in 0..10 {
        let action = a.sample_action();
        assert_eq!(action, b.sample_action());
        let sa = a.step(action).unwrap();
        let sb = b.step(action).unwrap();
        assert_eq!(sa.next_state, sb.next_state);
        if sa.done {
            break;
        }
    }
}

#[test]
fn test_render_frame() {
    let mut env = CartPole::new(Some(0));
    env.reset().unwrap();
    let frame = env.render().unwrap();

    assert_eq!(frame.dimensions(), (600, 400));
    assert_eq!(*frame.get_pixel(0, 0), Rgb([255, 255, 255]));
    // Cart sits near the horizontal centre
    assert_eq!(*frame.get_pixel(300, 300), Rgb([0, 0, 0]));
    assert!(frame.pixels().any(|p| *p == Rgb([202, 152, 101])));
}
