//! # Activation Functions
//!
//! Element-wise nonlinearities applied after each dense layer of the value network.
//!
//! - **ReLU**: `max(0, x)`, used after every hidden layer and, by default, after the
//!   output layer as well. On the output layer it clamps every action-value to be
//!   non-negative, which cannot represent a negative return. Select
//!   [`Activation::Linear`] through `DqnConfig::output_activation` to lift that.
//! - **Linear**: identity.
//!
//! ```rust
//! use cartpole_dqn::activations::Activation;
//! use ndarray::array;
//!
//! let mut data = array![1.0, -0.5, 0.0, 2.0];
//! Activation::Relu.apply(&mut data);
//! assert_eq!(data, array![1.0, 0.0, 0.0, 2.0]);
//! ```

pub mod functions;

pub use functions::Activation;
