//! Adaptive moment optimizer for dense network training steps.
//!
//! First/second moment accumulators mirror the weight tensors and are
//! allocated lazily on the first update. The dropout mask is resampled
//! independently for every weight, so two weights reading the same
//! activation may see different dropout outcomes; this is carried over
//! from the original design as an intentional stochastic regularizer.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::Matrix;

const BETA1: f64 = 0.9;
const BETA2: f64 = 0.999;
const EPSILON: f64 = 1e-8;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AdamState {
    moment1: Vec<Matrix>,
    moment2: Vec<Matrix>,
    step: u64,
}

impl AdamState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step_count(&self) -> u64 {
        self.step
    }

    fn ensure_allocated(&mut self, weights: &[Matrix]) {
        if self.moment1.len() == weights.len() {
            return;
        }
        self.moment1 = weights.iter().map(|w| Matrix::zeros(w.rows, w.cols)).collect();
        self.moment2 = weights.iter().map(|w| Matrix::zeros(w.rows, w.cols)).collect();
    }

    /// One in-place update of every weight and bias.
    ///
    /// `layer_inputs[l]` is the activation vector feeding layer `l`,
    /// `deltas[l]` the back-propagated error at layer `l`'s output.
    /// Weights move by `lr * m_hat / (sqrt(v_hat) + eps)`; biases by
    /// plain `lr * delta` with no moment tracking.
    pub fn update<R: Rng>(
        &mut self,
        weights: &mut [Matrix],
        biases: &mut [Vec<f64>],
        layer_inputs: &[Vec<f64>],
        deltas: &[Vec<f64>],
        learning_rate: f64,
        dropout_rate: f64,
        rng: &mut R,
    ) {
        self.ensure_allocated(weights);
        self.step += 1;
        let bc1 = 1.0 - BETA1.powi(self.step as i32);
        let bc2 = 1.0 - BETA2.powi(self.step as i32);

        for l in 0..weights.len() {
            let input = &layer_inputs[l];
            let delta = &deltas[l];
            let w = &mut weights[l];
            let m1 = &mut self.moment1[l];
            let m2 = &mut self.moment2[l];

            for i in 0..w.rows {
                for j in 0..w.cols {
                    let dropped = dropout_rate > 0.0 && rng.gen::<f64>() < dropout_rate;
                    let activation = if dropped { 0.0 } else { input[j] };
                    let grad = delta[i] * activation;

                    let idx = i * w.cols + j;
                    m1.data[idx] = BETA1 * m1.data[idx] + (1.0 - BETA1) * grad;
                    m2.data[idx] = BETA2 * m2.data[idx] + (1.0 - BETA2) * grad * grad;

                    let m_hat = m1.data[idx] / bc1;
                    let v_hat = m2.data[idx] / bc2;
                    w.data[idx] -= learning_rate * m_hat / (v_hat.sqrt() + EPSILON);
                }
            }

            for i in 0..biases[l].len() {
                biases[l][i] -= learning_rate * delta[i];
            }
        }
    }
}
