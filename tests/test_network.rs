//! Integration tests for the numeric core: vector ops, the dense network
//! primitive, and the adaptive moment optimizer.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use loqui::errors::EngineError;
use loqui::network::DenseNetwork;
use loqui::ops;
use loqui::optimizer::AdamState;
use loqui::types::{Activation, Matrix};

// ---------------------------------------------------------------------------
// Vector ops
// ---------------------------------------------------------------------------

#[test]
fn test_feature_normalize_zero_mean() {
    let v = vec![1.0, 2.0, 3.0, 4.0];
    let n = ops::feature_normalize(&v);
    let mean: f64 = n.iter().sum::<f64>() / n.len() as f64;
    assert!(mean.abs() < 1e-9, "normalized mean should be ~0, got {}", mean);
    // Population variance, so the normalized variance is ~1.
    let (_, var) = ops::mean_variance(&n);
    assert!((var - 1.0).abs() < 1e-6, "normalized variance ~1, got {}", var);
}

#[test]
fn test_feature_normalize_constant_vector() {
    // Zero variance must not divide by zero.
    let n = ops::feature_normalize(&[5.0, 5.0, 5.0]);
    assert!(n.iter().all(|x| x.abs() < 1e-3), "constant input maps near zero");
}

#[test]
fn test_cosine_similarity_bounds() {
    let a = vec![1.0, 0.0, 2.0];
    assert!((ops::cosine_similarity(&a, &a) - 1.0).abs() < 1e-12);
    let b = vec![0.0, 3.0, 0.0];
    assert!(ops::cosine_similarity(&a, &b).abs() < 1e-12);
    let zero = vec![0.0, 0.0, 0.0];
    assert_eq!(ops::cosine_similarity(&a, &zero), 0.0);
}

#[test]
fn test_l2_normalize_zero_vector_untouched() {
    let mut v = vec![0.0, 0.0];
    ops::l2_normalize(&mut v);
    assert_eq!(v, vec![0.0, 0.0]);

    let mut w = vec![3.0, 4.0];
    ops::l2_normalize(&mut w);
    assert!((ops::l2_norm(&w) - 1.0).abs() < 1e-12);
}

#[test]
fn test_activation_derivatives_at_pre_activation() {
    // Relu derivative flips exactly at the pre-activation sign.
    assert_eq!(Activation::Relu.derivative(-0.5), 0.0);
    assert_eq!(Activation::Relu.derivative(0.5), 1.0);
    assert_eq!(Activation::LeakyRelu.derivative(-1.0), 0.01);
    let s = ops::sigmoid(0.7);
    let d = Activation::Sigmoid.derivative(0.7);
    assert!((d - s * (1.0 - s)).abs() < 1e-12);
}

// ---------------------------------------------------------------------------
// Network construction and prediction
// ---------------------------------------------------------------------------

#[test]
fn test_network_construction_validation() {
    assert!(DenseNetwork::new(&[4], &[], 1).is_err(), "single width rejected");
    assert!(
        DenseNetwork::new(&[4, 3], &[Activation::Relu, Activation::Tanh], 1).is_err(),
        "activation count must match transitions"
    );
    assert!(DenseNetwork::new(&[4, 0, 2], &[Activation::Relu, Activation::Tanh], 1).is_err());

    let net = DenseNetwork::new(&[4, 6, 2], &[Activation::Relu, Activation::Tanh], 1).unwrap();
    assert_eq!(net.input_dim(), 4);
    assert_eq!(net.output_dim(), 2);
    assert_eq!(net.layer_sizes(), &[4, 6, 2]);
}

#[test]
fn test_predict_is_pure_and_sized() {
    let net = DenseNetwork::new(&[3, 5, 2], &[Activation::Relu, Activation::Tanh], 7).unwrap();
    let input = vec![0.2, -0.4, 0.9];
    let a = net.predict(&input).unwrap();
    let b = net.predict(&input).unwrap();
    assert_eq!(a.len(), 2);
    assert_eq!(a, b, "prediction must not mutate the network");
}

#[test]
fn test_predict_dimension_mismatch() {
    let net = DenseNetwork::new(&[3, 2], &[Activation::Sigmoid], 7).unwrap();
    match net.predict(&[1.0, 2.0]) {
        Err(EngineError::DimensionMismatch { expected, got }) => {
            assert_eq!(expected, 3);
            assert_eq!(got, 2);
        }
        other => panic!("expected dimension mismatch, got {:?}", other.map(|v| v.len())),
    }
}

#[test]
fn test_seeded_networks_reproduce() {
    let a = DenseNetwork::new(&[4, 4, 1], &[Activation::Relu, Activation::Sigmoid], 42).unwrap();
    let b = DenseNetwork::new(&[4, 4, 1], &[Activation::Relu, Activation::Sigmoid], 42).unwrap();
    let input = vec![0.1, 0.5, -0.3, 0.8];
    assert_eq!(a.predict(&input).unwrap(), b.predict(&input).unwrap());

    let c = DenseNetwork::new(&[4, 4, 1], &[Activation::Relu, Activation::Sigmoid], 43).unwrap();
    assert_ne!(a.predict(&input).unwrap(), c.predict(&input).unwrap());
}

// ---------------------------------------------------------------------------
// Training
// ---------------------------------------------------------------------------

#[test]
fn test_train_mutates_weights() {
    let mut net =
        DenseNetwork::new(&[2, 4, 1], &[Activation::Relu, Activation::Sigmoid], 9).unwrap();
    let snapshot = |n: &DenseNetwork| -> Vec<f64> {
        let mut w = Vec::new();
        for r in 0..4 {
            for c in 0..2 {
                w.push(n.weight(0, r, c));
            }
        }
        for c in 0..4 {
            w.push(n.weight(1, 0, c));
        }
        w
    };
    let before = snapshot(&net);
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    for _ in 0..5 {
        net.train(&[1.0, 0.0], &[1.0], 0.05, 0.0, &mut rng).unwrap();
    }
    let after = snapshot(&net);
    assert_ne!(before, after, "training should change at least one weight");
}

#[test]
fn test_train_reduces_error_on_fixed_pair() {
    let mut net =
        DenseNetwork::new(&[2, 6, 1], &[Activation::Tanh, Activation::Sigmoid], 3).unwrap();
    let input = [0.9, -0.7];
    let target = [1.0];
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let before = (net.predict(&input).unwrap()[0] - target[0]).abs();
    for _ in 0..200 {
        net.train(&input, &target, 0.01, 0.0, &mut rng).unwrap();
    }
    let after = (net.predict(&input).unwrap()[0] - target[0]).abs();
    assert!(
        after < before,
        "error should shrink on a memorized pair: before={} after={}",
        before,
        after
    );
}

#[test]
fn test_train_single_transition_network() {
    // No hidden layers: the backward loop body never runs.
    let mut net = DenseNetwork::new(&[3, 2], &[Activation::Sigmoid], 11).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    net.train(&[1.0, 2.0, 3.0], &[0.0, 1.0], 0.1, 0.0, &mut rng)
        .unwrap();
    assert_eq!(net.predict(&[1.0, 2.0, 3.0]).unwrap().len(), 2);
}

#[test]
fn test_train_target_dimension_checked() {
    let mut net = DenseNetwork::new(&[2, 1], &[Activation::Sigmoid], 11).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    assert!(net.train(&[1.0, 2.0], &[0.0, 1.0], 0.1, 0.0, &mut rng).is_err());
}

// ---------------------------------------------------------------------------
// Optimizer
// ---------------------------------------------------------------------------

#[test]
fn test_adam_step_counter_and_bias_update() {
    let mut state = AdamState::new();
    assert_eq!(state.step_count(), 0);

    let mut weights = vec![Matrix::zeros(1, 2)];
    let mut biases = vec![vec![0.0]];
    let layer_inputs = vec![vec![1.0, 1.0]];
    let deltas = vec![vec![0.5]];
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    state.update(&mut weights, &mut biases, &layer_inputs, &deltas, 0.1, 0.0, &mut rng);
    assert_eq!(state.step_count(), 1);
    // Biases move by plain lr * delta with no moment tracking.
    assert!((biases[0][0] - (-0.05)).abs() < 1e-12, "bias = -lr*delta, got {}", biases[0][0]);
    // Weights move against the gradient sign.
    assert!(weights[0].get(0, 0) < 0.0);
}

#[test]
fn test_adam_full_dropout_freezes_weights() {
    // dropout_rate 1.0 zeroes every sampled activation, so the gradient is
    // zero everywhere and weights stay put; biases still move.
    let mut state = AdamState::new();
    let mut weights = vec![Matrix::zeros(2, 2)];
    let mut biases = vec![vec![0.0, 0.0]];
    let layer_inputs = vec![vec![1.0, 1.0]];
    let deltas = vec![vec![0.3, -0.2]];
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    state.update(&mut weights, &mut biases, &layer_inputs, &deltas, 0.1, 1.0, &mut rng);
    for i in 0..2 {
        for j in 0..2 {
            assert_eq!(weights[0].get(i, j), 0.0);
        }
    }
    assert!(biases[0][0] != 0.0 && biases[0][1] != 0.0);
}
