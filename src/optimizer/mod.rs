//! Gradient-descent optimizers for the online value network.
//!
//! Optimizers receive the parameter gradients of every layer at once, so
//! per-layer state (Adam's moment estimates) is indexed by layer position.

use ndarray::{Array1, Array2};
use serde::{Serialize, Deserialize};

use crate::layers::{DenseLayer, Gradients};

pub trait Optimizer {
    /// Apply one update to `layers` given matching `gradients`.
    fn step(&mut self, layers: &mut [DenseLayer], gradients: &[Gradients], learning_rate: f32);
}

/// Serializable choice of optimizer, part of the agent configuration.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub enum OptimizerConfig {
    Sgd,
    Adam { beta1: f32, beta2: f32, epsilon: f32 },
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        OptimizerConfig::Adam { beta1: 0.9, beta2: 0.999, epsilon: 1e-8 }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum OptimizerWrapper {
    SGD(SGD),
    Adam(Adam),
}

impl OptimizerWrapper {
    pub fn from_config(config: OptimizerConfig) -> Self {
        match config {
            OptimizerConfig::Sgd => OptimizerWrapper::SGD(SGD::new()),
            OptimizerConfig::Adam { beta1, beta2, epsilon } => {
                OptimizerWrapper::Adam(Adam::new(beta1, beta2, epsilon))
            }
        }
    }
}

impl Optimizer for OptimizerWrapper {
    fn step(&mut self, layers: &mut [DenseLayer], gradients: &[Gradients], learning_rate: f32) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.step(layers, gradients, learning_rate),
            OptimizerWrapper::Adam(optimizer) => optimizer.step(layers, gradients, learning_rate),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct SGD;

impl SGD {
    pub fn new() -> SGD {
        SGD
    }
}

impl Optimizer for SGD {
    fn step(&mut self, layers: &mut [DenseLayer], gradients: &[Gradients], learning_rate: f32) {
        for (layer, grads) in layers.iter_mut().zip(gradients) {
            layer.weights.scaled_add(-learning_rate, &grads.weights);
            layer.biases.scaled_add(-learning_rate, &grads.biases);
        }
    }
}

/// Adam with bias-corrected moment estimates.
///
/// `p -= lr * m_hat / (sqrt(v_hat) + epsilon)`. Moment buffers are created
/// on the first step from the gradient shapes.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Adam {
    pub beta1: f32,
    pub beta2: f32,
    pub epsilon: f32,
    m_weights: Vec<Array2<f32>>,
    v_weights: Vec<Array2<f32>>,
    m_biases: Vec<Array1<f32>>,
    v_biases: Vec<Array1<f32>>,
    pub t: i32,
}

impl Adam {
    pub fn new(beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Adam {
            beta1,
            beta2,
            epsilon,
            m_weights: Vec::new(),
            v_weights: Vec::new(),
            m_biases: Vec::new(),
            v_biases: Vec::new(),
            t: 0,
        }
    }

    fn ensure_state(&mut self, gradients: &[Gradients]) {
        let matches = self.m_weights.len() == gradients.len()
            && self.m_weights.iter().zip(gradients).all(|(m, g)| m.dim() == g.weights.dim());
        if matches {
            return;
        }
        self.m_weights = gradients.iter().map(|g| Array2::zeros(g.weights.dim())).collect();
        self.v_weights = gradients.iter().map(|g| Array2::zeros(g.weights.dim())).collect();
        self.m_biases = gradients.iter().map(|g| Array1::zeros(g.biases.dim())).collect();
        self.v_biases = gradients.iter().map(|g| Array1::zeros(g.biases.dim())).collect();
        self.t = 0;
    }
}

impl Default for Adam {
    fn default() -> Self {
        Self::new(0.9, 0.999, 1e-8)
    }
}

impl Optimizer for Adam {
    fn step(&mut self, layers: &mut [DenseLayer], gradients: &[Gradients], learning_rate: f32) {
        self.ensure_state(gradients);
        self.t += 1;

        let (beta1, beta2, epsilon) = (self.beta1, self.beta2, self.epsilon);
        let bias_correction1 = 1.0 - beta1.powi(self.t);
        let bias_correction2 = 1.0 - beta2.powi(self.t);

        for (index, (layer, grads)) in layers.iter_mut().zip(gradients).enumerate() {
            let m = &mut self.m_weights[index];
            let v = &mut self.v_weights[index];
            m.zip_mut_with(&grads.weights, |m, &g| *m = beta1 * *m + (1.0 - beta1) * g);
            v.zip_mut_with(&grads.weights, |v, &g| *v = beta2 * *v + (1.0 - beta2) * g * g);
            ndarray::Zip::from(&mut layer.weights).and(&*m).and(&*v).for_each(|w, &m, &v| {
                let m_hat = m / bias_correction1;
                let v_hat = v / bias_correction2;
                *w -= learning_rate * m_hat / (v_hat.sqrt() + epsilon);
            });

            let m = &mut self.m_biases[index];
            let v = &mut self.v_biases[index];
            m.zip_mut_with(&grads.biases, |m, &g| *m = beta1 * *m + (1.0 - beta1) * g);
            v.zip_mut_with(&grads.biases, |v, &g| *v = beta2 * *v + (1.0 - beta2) * g * g);
            ndarray::Zip::from(&mut layer.biases).and(&*m).and(&*v).for_each(|b, &m, &v| {
                let m_hat = m / bias_correction1;
                let v_hat = v / bias_correction2;
                *b -= learning_rate * m_hat / (v_hat.sqrt() + epsilon);
            });
        }
    }
}
