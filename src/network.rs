//! Dense feed-forward network primitive.
//!
//! One configurable abstraction serves every network role in the engine
//! (encoder, decoder, generator, discriminator, policy, value): a list of
//! layer widths, one weight matrix and bias vector per transition, and one
//! activation tag per transition. Weights are initialized once at
//! construction from a seeded RNG and mutated only by training steps.

use rand::SeedableRng;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, Result};
use crate::ops;
use crate::optimizer::AdamState;
use crate::types::{Activation, Matrix};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DenseNetwork {
    sizes: Vec<usize>,
    /// weights[l] has shape sizes[l+1] x sizes[l].
    weights: Vec<Matrix>,
    biases: Vec<Vec<f64>>,
    activations: Vec<Activation>,
    optimizer: AdamState,
}

/// Forward pass record used by backpropagation: pre-activation sums are
/// threaded separately from activated outputs because activation
/// derivatives must be evaluated at the pre-activation sum.
struct ForwardTrace {
    /// layer_inputs[l] is the (feature-normalized) vector fed into layer l.
    layer_inputs: Vec<Vec<f64>>,
    /// pre_sums[l] is W_l @ layer_inputs[l] + b_l.
    pre_sums: Vec<Vec<f64>>,
    output: Vec<f64>,
}

impl DenseNetwork {
    /// Construct with layer widths `[in, h1, ..., out]` and one activation
    /// tag per transition.
    pub fn new(sizes: &[usize], activations: &[Activation], seed: u64) -> Result<Self> {
        if sizes.len() < 2 {
            return Err(EngineError::InvalidInput(format!(
                "network needs at least 2 layer widths, got {}",
                sizes.len()
            )));
        }
        if activations.len() != sizes.len() - 1 {
            return Err(EngineError::DimensionMismatch {
                expected: sizes.len() - 1,
                got: activations.len(),
            });
        }
        if sizes.iter().any(|&s| s == 0) {
            return Err(EngineError::InvalidInput("zero-width layer".into()));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut weights = Vec::with_capacity(sizes.len() - 1);
        let mut biases = Vec::with_capacity(sizes.len() - 1);
        for l in 0..sizes.len() - 1 {
            weights.push(Matrix::xavier(sizes[l + 1], sizes[l], &mut rng));
            biases.push(vec![0.0; sizes[l + 1]]);
        }

        Ok(Self {
            sizes: sizes.to_vec(),
            weights,
            biases,
            activations: activations.to_vec(),
            optimizer: AdamState::new(),
        })
    }

    pub fn input_dim(&self) -> usize {
        self.sizes[0]
    }

    pub fn output_dim(&self) -> usize {
        *self.sizes.last().unwrap_or(&0)
    }

    pub fn layer_sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn weight(&self, layer: usize, row: usize, col: usize) -> f64 {
        self.weights[layer].get(row, col)
    }

    pub fn bias(&self, layer: usize, row: usize) -> f64 {
        self.biases[layer][row]
    }

    fn forward(&self, input: &[f64]) -> Result<ForwardTrace> {
        if input.len() != self.sizes[0] {
            return Err(EngineError::DimensionMismatch {
                expected: self.sizes[0],
                got: input.len(),
            });
        }

        let n_layers = self.weights.len();
        let mut layer_inputs = Vec::with_capacity(n_layers);
        let mut pre_sums = Vec::with_capacity(n_layers);

        // Feature normalization precedes every linear transform, the input
        // layer included.
        let mut current = ops::feature_normalize(input);
        for l in 0..n_layers {
            let mut z = self.weights[l].mul_vec(&current);
            for (zi, bi) in z.iter_mut().zip(self.biases[l].iter()) {
                *zi += bi;
            }
            let act = self.activations[l];
            let h: Vec<f64> = z.iter().map(|&x| act.apply(x)).collect();

            layer_inputs.push(current);
            pre_sums.push(z);

            current = if l + 1 < n_layers {
                ops::feature_normalize(&h)
            } else {
                h
            };
        }

        Ok(ForwardTrace {
            layer_inputs,
            pre_sums,
            output: current,
        })
    }

    /// Pure forward prediction. Repeated calls with unchanged weights and
    /// input yield identical output.
    pub fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        Ok(self.forward(input)?.output)
    }

    /// One backpropagation training step. Output-layer error is
    /// `(prediction - target) * act'(pre_sum)`, propagated backwards
    /// through the transposed weight matrices; the per-layer deltas and
    /// recorded activations are handed to the optimizer for an in-place
    /// weight/bias update.
    pub fn train<R: Rng>(
        &mut self,
        input: &[f64],
        target: &[f64],
        learning_rate: f64,
        dropout_rate: f64,
        rng: &mut R,
    ) -> Result<()> {
        let out_dim = self.output_dim();
        if target.len() != out_dim {
            return Err(EngineError::DimensionMismatch {
                expected: out_dim,
                got: target.len(),
            });
        }

        let trace = self.forward(input)?;
        let n_layers = self.weights.len();

        let mut deltas = vec![Vec::new(); n_layers];
        let last = n_layers - 1;
        let out_act = self.activations[last];
        deltas[last] = trace
            .output
            .iter()
            .zip(target.iter())
            .zip(trace.pre_sums[last].iter())
            .map(|((&pred, &tgt), &z)| (pred - tgt) * out_act.derivative(z))
            .collect();

        // With a single transition there are no hidden layers; this loop is
        // simply skipped.
        for l in (0..last).rev() {
            let propagated = self.weights[l + 1].mul_vec_transposed(&deltas[l + 1]);
            let act = self.activations[l];
            deltas[l] = propagated
                .iter()
                .zip(trace.pre_sums[l].iter())
                .map(|(&e, &z)| e * act.derivative(z))
                .collect();
        }

        self.optimizer.update(
            &mut self.weights,
            &mut self.biases,
            &trace.layer_inputs,
            &deltas,
            learning_rate,
            dropout_rate,
            rng,
        );
        Ok(())
    }
}
