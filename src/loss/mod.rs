pub mod functions;

pub use functions::{Loss, LossReduction, SquaredError};
