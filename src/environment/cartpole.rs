use image::{Rgb, RgbImage};
use ndarray::array;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Environment, State, Step};
use crate::error::{DqnError, Result};

// Episode ends once the cart leaves the track or the pole leans past 12 degrees.
const X_THRESHOLD: f32 = 2.4;
const THETA_THRESHOLD: f32 = 12.0 * 2.0 * std::f32::consts::PI / 360.0;

const SCREEN_WIDTH: u32 = 600;
const SCREEN_HEIGHT: u32 = 400;

/// Classic cart-pole balancing task with CartPole-v0 dynamics.
///
/// Observation: `[cart position, cart velocity, pole angle, pole angular velocity]`.
/// Actions: `0` pushes the cart left, `1` pushes it right. Every step,
/// including the last one, yields a reward of `1.0`.
#[derive(Debug, Clone)]
pub struct CartPole {
    x: f32,
    x_dot: f32,
    theta: f32,
    theta_dot: f32,

    gravity: f32,
    mass_cart: f32,
    mass_pole: f32,
    length: f32,
    force_mag: f32,
    tau: f32,

    max_episode_steps: usize,
    steps: usize,
    needs_reset: bool,
    rng: StdRng,
}

impl Default for CartPole {
    fn default() -> Self {
        Self::new(None)
    }
}

impl CartPole {
    /// Create the environment; `seed` makes resets and action sampling reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        CartPole {
            x: 0.0,
            x_dot: 0.0,
            theta: 0.0,
            theta_dot: 0.0,
            gravity: 9.8,
            mass_cart: 1.0,
            mass_pole: 0.1,
            length: 0.5, // half the pole's length
            force_mag: 10.0,
            tau: 0.02,
            max_episode_steps: 200,
            steps: 0,
            needs_reset: true,
            rng,
        }
    }

    pub fn with_max_episode_steps(mut self, max_episode_steps: usize) -> Self {
        self.max_episode_steps = max_episode_steps;
        self
    }

    pub fn max_episode_steps(&self) -> usize {
        self.max_episode_steps
    }

    fn state(&self) -> State {
        array![self.x, self.x_dot, self.theta, self.theta_dot]
    }
}

impl Environment for CartPole {
    fn observation_dim(&self) -> usize {
        4
    }

    fn action_count(&self) -> usize {
        2
    }

    fn reset(&mut self) -> Result<State> {
        self.x = self.rng.gen_range(-0.05..0.05);
        self.x_dot = self.rng.gen_range(-0.05..0.05);
        self.theta = self.rng.gen_range(-0.05..0.05);
        self.theta_dot = self.rng.gen_range(-0.05..0.05);
        self.steps = 0;
        self.needs_reset = false;
        Ok(self.state())
    }

    fn step(&mut self, action: usize) -> Result<Step> {
        if action >= self.action_count() {
            return Err(DqnError::InvalidAction { action, max_actions: self.action_count() });
        }
        if self.needs_reset {
            return Err(DqnError::TrainingError(
                "step called on a finished episode; call reset first".to_string(),
            ));
        }

        let force = if action == 1 { self.force_mag } else { -self.force_mag };
        let cos_theta = self.theta.cos();
        let sin_theta = self.theta.sin();
        let total_mass = self.mass_cart + self.mass_pole;
        let pole_mass_length = self.mass_pole * self.length;

        let temp = (force + pole_mass_length * self.theta_dot.powi(2) * sin_theta) / total_mass;
        let theta_acc = (self.gravity * sin_theta - cos_theta * temp)
            / (self.length * (4.0 / 3.0 - self.mass_pole * cos_theta.powi(2) / total_mass));
        let x_acc = temp - pole_mass_length * theta_acc * cos_theta / total_mass;

        // Explicit Euler, position before velocity
        self.x += self.tau * self.x_dot;
        self.x_dot += self.tau * x_acc;
        self.theta += self.tau * self.theta_dot;
        self.theta_dot += self.tau * theta_acc;
        self.steps += 1;

        let done = self.x.abs() > X_THRESHOLD
            || self.theta.abs() > THETA_THRESHOLD
            || self.steps >= self.max_episode_steps;
        self.needs_reset = done;

        Ok(Step { next_state: self.state(), reward: 1.0, done })
    }

    fn sample_action(&mut self) -> usize {
        self.rng.gen_range(0..self.action_count())
    }

    fn render(&mut self) -> Option<RgbImage> {
        let mut frame = RgbImage::from_pixel(SCREEN_WIDTH, SCREEN_HEIGHT, Rgb([255, 255, 255]));

        let scale = SCREEN_WIDTH as f32 / (2.0 * X_THRESHOLD);
        let cart_width = 50.0;
        let cart_height = 30.0;
        let pole_width = 10.0;
        let pole_length = scale * 2.0 * self.length;
        let cart_y = SCREEN_HEIGHT as f32 - 100.0;
        let cart_x = self.x * scale + SCREEN_WIDTH as f32 / 2.0;

        fill_rect(&mut frame, 0.0, cart_y + cart_height / 2.0, SCREEN_WIDTH as f32, cart_y + cart_height / 2.0 + 1.0, Rgb([0, 0, 0]));
        fill_rect(
            &mut frame,
            cart_x - cart_width / 2.0,
            cart_y - cart_height / 2.0,
            cart_x + cart_width / 2.0,
            cart_y + cart_height / 2.0,
            Rgb([0, 0, 0]),
        );

        let axle_y = cart_y - cart_height / 4.0;
        let samples = pole_length.ceil() as usize;
        for i in 0..=samples {
            let along = i as f32;
            let px = cart_x + along * self.theta.sin();
            let py = axle_y - along * self.theta.cos();
            fill_rect(
                &mut frame,
                px - pole_width / 2.0,
                py - pole_width / 2.0,
                px + pole_width / 2.0,
                py + pole_width / 2.0,
                Rgb([202, 152, 101]),
            );
        }
        fill_rect(&mut frame, cart_x - 5.0, axle_y - 5.0, cart_x + 5.0, axle_y + 5.0, Rgb([129, 132, 203]));

        Some(frame)
    }
}

/// Fill the axis-aligned rectangle `[x0, x1) x [y0, y1)`, clipped to the frame.
fn fill_rect(frame: &mut RgbImage, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgb<u8>) {
    let clip = |v: f32, max: u32| v.round().clamp(0.0, max as f32) as u32;
    let (x0, x1) = (clip(x0, frame.width()), clip(x1, frame.width()));
    let (y0, y1) = (clip(y0, frame.height()), clip(y1, frame.height()));
    for y in y0..y1 {
        for x in x0..x1 {
            frame.put_pixel(x, y, color);
        }
    }
}
