pub mod dense;
pub mod initialization;

pub use dense::{DenseLayer, Gradients, LayerCache};
pub use initialization::WeightInit;
