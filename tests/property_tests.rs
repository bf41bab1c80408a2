#[cfg(test)]
mod property_tests {
    use cartpole_dqn::agent::DqnAgent;
    use cartpole_dqn::config::DqnConfig;
    use cartpole_dqn::episode_buffer::EpisodeBuffer;
    use cartpole_dqn::exploration::EpsilonSchedule;
    use cartpole_dqn::metrics::RewardWindow;
    use cartpole_dqn::network::argmax;
    use ndarray::Array1;
    use proptest::prelude::*;

    // (state, next_state, action, reward, done) with 4-dimensional states
    fn transition_strategy() -> impl Strategy<Value = (Vec<f32>, Vec<f32>, usize, f32, bool)> {
        (
            prop::collection::vec(-5.0f32..5.0, 4),
            prop::collection::vec(-5.0f32..5.0, 4),
            0usize..2,
            -1.0f32..1.0,
            any::<bool>(),
        )
    }

    proptest! {
        #[test]
        fn test_buffer_rows_stay_aligned(transitions in prop::collection::vec(transition_strategy(), 1..50)) {
            let mut buffer = EpisodeBuffer::new();
            for (state, next_state, action, reward, done) in &transitions {
                buffer.store(
                    Array1::from_vec(state.clone()),
                    Array1::from_vec(next_state.clone()),
                    *action,
                    *reward,
                    *done,
                );
            }

            let batch = buffer.get().unwrap();
            prop_assert_eq!(batch.len(), transitions.len());
            prop_assert_eq!(batch.states.dim(), (transitions.len(), 4));
            for (i, (state, next_state, action, reward, done)) in transitions.iter().enumerate() {
                prop_assert_eq!(batch.states.row(i).to_vec(), state.clone());
                prop_assert_eq!(batch.next_states.row(i).to_vec(), next_state.clone());
                prop_assert_eq!(batch.actions[i], *action);
                prop_assert_eq!(batch.rewards[i], *reward);
                prop_assert_eq!(batch.dones[i], if *done { 1.0 } else { 0.0 });
            }

            buffer.clear();
            prop_assert!(buffer.is_empty());
        }

        #[test]
        fn test_epsilon_never_increases_or_drops_below_floor(
            start in 0.0f32..=1.0,
            floor_ratio in 0.0f32..=1.0,
            decay in 0.5f32..=1.0,
            episodes in 1usize..500,
        ) {
            let min = start * floor_ratio;
            let mut schedule = EpsilonSchedule::new(start, min, decay).unwrap();
            let mut previous = schedule.epsilon();
            for _ in 0..episodes {
                let epsilon = schedule.decay();
                prop_assert!(epsilon <= previous);
                prop_assert!(epsilon >= min);
                previous = epsilon;
            }
        }

        #[test]
        fn test_argmax_picks_first_maximum(values in prop::collection::vec(-100.0f32..100.0, 1..10)) {
            let array = Array1::from_vec(values.clone());
            let index = argmax(array.view());
            let max = values.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
            prop_assert_eq!(values[index], max);
            prop_assert!(values[..index].iter().all(|&v| v < max));
        }

        #[test]
        fn test_reward_window_reports_every_size_episodes(size in 1usize..20, episodes in 0usize..200) {
            let mut window = RewardWindow::new(size);
            let reports = (0..episodes).filter(|_| window.push(1.0).is_some()).count();
            prop_assert_eq!(reports, episodes / size);
            prop_assert_eq!(window.pending(), episodes % size);
        }

        #[test]
        fn test_last_target_is_reward_only(rewards in prop::collection::vec(-1.0f32..1.0, 1..20), seed in any::<u64>()) {
            let config = DqnConfig { hidden_sizes: vec![8], seed: Some(seed), ..DqnConfig::default() };
            let agent = DqnAgent::new(config).unwrap();
            let mut buffer = EpisodeBuffer::new();
            for (i, &reward) in rewards.iter().enumerate() {
                let state = Array1::from_elem(4, i as f32 * 0.1);
                buffer.store(state.clone(), state + 0.1f32, i % 2, reward, false);
            }

            let targets = agent.compute_targets(&buffer.get().unwrap()).unwrap();
            prop_assert_eq!(targets[rewards.len() - 1], rewards[rewards.len() - 1]);
        }
    }
}
