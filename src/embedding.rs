//! Word embedding trainer: fixed-size vectors derived from windowed
//! co-occurrence over the accumulated corpus.
//!
//! Vectors are re-derived from scratch on every retrain rather than
//! updated incrementally — a deliberate simplicity-over-efficiency choice
//! given the tiny corpus this engine operates on.

use rand::SeedableRng;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::lexicon::{word_tokens, Lexicon};
use crate::ops;

pub const EMBED_DIM: usize = 100;
const WINDOW: usize = 2;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EmbeddingTrainer {
    pub dim: usize,
    pub passes: usize,
    pub learning_rate: f64,
    pub seed: u64,
    vectors: HashMap<String, Vec<f64>>,
}

impl EmbeddingTrainer {
    pub fn new(seed: u64) -> Self {
        Self {
            dim: EMBED_DIM,
            passes: 3,
            learning_rate: 0.05,
            seed,
            vectors: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Re-derive every vocabulary word's vector from the full corpus.
    ///
    /// Initialization iterates the vocabulary in sorted order from a fixed
    /// seed, so retraining on an unchanged corpus reproduces the same
    /// vectors. Each pass walks every document; tokens within the ±2-word
    /// window nudge each other by `lr * (1 - sigmoid(dot)) * other`.
    /// Output vectors are L2-normalized.
    pub fn retrain(&mut self, lexicon: &Lexicon) {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.vectors.clear();
        for word in lexicon.vocabulary() {
            let v: Vec<f64> = (0..self.dim).map(|_| (rng.gen::<f64>() - 0.5) * 0.1).collect();
            self.vectors.insert(word.clone(), v);
        }

        let docs: Vec<Vec<String>> = lexicon
            .documents()
            .iter()
            .map(|d| word_tokens(d))
            .collect();

        for _ in 0..self.passes {
            for tokens in &docs {
                for i in 0..tokens.len() {
                    let lo = i.saturating_sub(WINDOW);
                    let hi = (i + WINDOW).min(tokens.len().saturating_sub(1));
                    for j in lo..=hi {
                        if j == i {
                            continue;
                        }
                        self.nudge_pair(&tokens[i], &tokens[j]);
                    }
                }
            }
        }

        for v in self.vectors.values_mut() {
            ops::l2_normalize(v);
        }
    }

    fn nudge_pair(&mut self, a: &str, b: &str) {
        let (va, vb) = match (self.vectors.get(a), self.vectors.get(b)) {
            (Some(va), Some(vb)) => (va.clone(), vb.clone()),
            _ => return,
        };
        let error = 1.0 - ops::sigmoid(ops::dot(&va, &vb));
        let lr = self.learning_rate;
        if let Some(v) = self.vectors.get_mut(a) {
            for (x, y) in v.iter_mut().zip(vb.iter()) {
                *x += lr * error * y;
            }
        }
        if let Some(v) = self.vectors.get_mut(b) {
            for (x, y) in v.iter_mut().zip(va.iter()) {
                *x += lr * error * y;
            }
        }
    }

    pub fn vector(&self, word: &str) -> Option<&Vec<f64>> {
        self.vectors.get(word)
    }

    pub fn words(&self) -> impl Iterator<Item = &String> {
        self.vectors.keys()
    }

    /// Mean of the tokens' vectors, L2-normalized. Unknown words contribute
    /// a zero vector.
    pub fn mean_vector(&self, tokens: &[String]) -> Vec<f64> {
        let mut mean = vec![0.0; self.dim];
        if tokens.is_empty() {
            return mean;
        }
        for token in tokens {
            if let Some(v) = self.vectors.get(token) {
                for (m, x) in mean.iter_mut().zip(v.iter()) {
                    *m += x;
                }
            }
        }
        for m in mean.iter_mut() {
            *m /= tokens.len() as f64;
        }
        ops::l2_normalize(&mut mean);
        mean
    }

    /// Top-k most cosine-similar vocabulary words, excluding the word itself.
    pub fn similar_words(&self, word: &str, k: usize) -> Vec<(String, f64)> {
        let target = match self.vectors.get(word) {
            Some(v) => v,
            None => return Vec::new(),
        };
        let mut scored: Vec<(String, f64)> = self
            .vectors
            .iter()
            .filter(|(w, _)| w.as_str() != word)
            .map(|(w, v)| (w.clone(), ops::cosine_similarity(target, v)))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        scored
    }
}
