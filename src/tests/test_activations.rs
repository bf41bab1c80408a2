use ndarray::{array, arr2};
use crate::activations::Activation;

#[test]
fn test_relu_activation() {
    let relu = Activation::Relu;
    let mut input = array![-1.0, 0.0, 1.0, 2.0];
    relu.apply(&mut input);
    assert_eq!(input, array![0.0, 0.0, 1.0, 2.0]);
}

#[test]
fn test_linear_activation_is_identity() {
    let mut input = arr2(&[[-3.0, 0.5], [2.0, -0.25]]);
    let expected = input.clone();
    Activation::Linear.apply_batch(&mut input);
    assert_eq!(input, expected);
}

#[test]
fn test_relu_batch_clamps_negatives() {
    let mut input = arr2(&[[-3.0, 0.5], [2.0, -0.25]]);
    Activation::Relu.apply_batch(&mut input);
    assert_eq!(input, arr2(&[[0.0, 0.5], [2.0, 0.0]]));
}

#[test]
fn test_activation_derivatives() {
    let pre_activation = arr2(&[[-1.0, 0.0, 1.0, 2.0]]);

    let deriv = Activation::Relu.derivative_batch(pre_activation.view());
    assert_eq!(deriv, arr2(&[[0.0, 0.0, 1.0, 1.0]]));

    let deriv = Activation::Linear.derivative_batch(pre_activation.view());
    assert_eq!(deriv, arr2(&[[1.0, 1.0, 1.0, 1.0]]));
}

#[test]
fn test_default_is_relu() {
    assert_eq!(Activation::default(), Activation::Relu);
}
