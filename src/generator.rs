//! Response generation stages: encode, refine, improve, decode, and the
//! long-form word-by-word extension loop.
//!
//! Six independent dense networks share one abstraction: encoder, decoder,
//! generator, discriminator, policy, and value. The refine stage emulates
//! adversarial smoothing (meaning vector + decaying noise through the
//! generator network); the improve stage is an epsilon-greedy policy pass
//! with a single one-step TD update of the value and policy networks.
//! Neither runs a full offline training loop on the live request path.

use rand::SeedableRng;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::analysis::QueryAnalysis;
use crate::data;
use crate::embedding::{EmbeddingTrainer, EMBED_DIM};
use crate::errors::{EngineError, Result};
use crate::lexicon::{word_tokens, Lexicon};
use crate::network::DenseNetwork;
use crate::ops;
use crate::types::Activation;

/// Hard cap on the long-form extension loop.
pub const MAX_SENTENCE_WORDS: usize = 500;
/// Words decoded per meaning vector.
const DECODE_SLOTS: usize = 10;
/// Minimum noise scale in the refine stage.
const NOISE_FLOOR: f64 = 0.1;
/// Reward weights: coherence / topic relevance / sentiment alignment.
const REWARD_WEIGHTS: (f64, f64, f64) = (0.4, 0.4, 0.2);

pub struct ResponseGenerator {
    encoder: DenseNetwork,
    decoder: DenseNetwork,
    generator: DenseNetwork,
    discriminator: DenseNetwork,
    policy: DenseNetwork,
    value: DenseNetwork,
    rng: ChaCha8Rng,
    pub exploration: f64,
    pub discount: f64,
    pub learning_rate: f64,
    pub dropout_rate: f64,
}

impl ResponseGenerator {
    pub fn new(seed: u64, exploration: f64, discount: f64) -> Result<Self> {
        use Activation::*;
        Ok(Self {
            encoder: DenseNetwork::new(&[EMBED_DIM, 64, EMBED_DIM], &[Relu, Tanh], seed)?,
            decoder: DenseNetwork::new(&[EMBED_DIM, 64, EMBED_DIM], &[Relu, Tanh], seed + 1)?,
            generator: DenseNetwork::new(
                &[2 * EMBED_DIM, 128, EMBED_DIM],
                &[LeakyRelu, Tanh],
                seed + 2,
            )?,
            discriminator: DenseNetwork::new(&[EMBED_DIM, 32, 1], &[Relu, Sigmoid], seed + 3)?,
            policy: DenseNetwork::new(&[EMBED_DIM, 64, EMBED_DIM], &[Relu, Tanh], seed + 4)?,
            value: DenseNetwork::new(&[EMBED_DIM, 32, 1], &[Relu, Sigmoid], seed + 5)?,
            rng: ChaCha8Rng::seed_from_u64(seed ^ 0x6c6f_7175),
            exploration,
            discount,
            learning_rate: 0.01,
            dropout_rate: 0.1,
        })
    }

    // -----------------------------------------------------------------------
    // Stage: encode
    // -----------------------------------------------------------------------

    /// Average the word vectors of the text's tokens (unknown words
    /// contribute zero), L2-normalize, then run the encoder network.
    pub fn encode_to_meaning_space(
        &self,
        text: &str,
        embeddings: &EmbeddingTrainer,
    ) -> Result<Vec<f64>> {
        let tokens = word_tokens(text);
        let pooled = embeddings.mean_vector(&tokens);
        self.encoder.predict(&pooled)
    }

    // -----------------------------------------------------------------------
    // Stage: refine
    // -----------------------------------------------------------------------

    /// Concatenate the meaning vector with fresh noise (scaled down as the
    /// response grows, floored at 0.1) and push through the generator
    /// network, yielding a same-dimensional refined vector.
    pub fn refine(&mut self, meaning: &[f64], response_len: usize) -> Result<Vec<f64>> {
        if meaning.len() != EMBED_DIM {
            return Err(EngineError::DimensionMismatch {
                expected: EMBED_DIM,
                got: meaning.len(),
            });
        }
        let scale = (1.0 / (1.0 + response_len as f64 / 50.0)).max(NOISE_FLOOR);
        let mut input = Vec::with_capacity(2 * EMBED_DIM);
        input.extend_from_slice(meaning);
        for _ in 0..EMBED_DIM {
            input.push((self.rng.gen::<f64>() * 2.0 - 1.0) * scale);
        }
        self.generator.predict(&input)
    }

    // -----------------------------------------------------------------------
    // Stage: improve
    // -----------------------------------------------------------------------

    /// Epsilon-greedy policy pass. With probability epsilon returns a
    /// uniform random vector (pure exploration). Otherwise runs the policy
    /// network, scores the action with three heuristic sub-rewards, and
    /// performs one online TD(0) step of the value and policy networks
    /// before returning the action vector.
    pub fn improve(
        &mut self,
        refined: &[f64],
        response_text: &str,
        analysis: &QueryAnalysis,
    ) -> Result<Vec<f64>> {
        if self.rng.gen::<f64>() < self.exploration {
            return Ok((0..EMBED_DIM)
                .map(|_| self.rng.gen::<f64>() * 2.0 - 1.0)
                .collect());
        }

        let action = self.policy.predict(refined)?;
        let reward = self.reward(response_text, analysis);

        let v_state = self.value.predict(refined)?[0];
        let v_next = self.value.predict(&action)?[0];
        let td_target = reward + self.discount * v_next;
        let advantage = td_target - v_state;

        self.value.train(
            refined,
            &[td_target.clamp(0.0, 1.0)],
            self.learning_rate,
            self.dropout_rate,
            &mut self.rng,
        )?;

        // Nudge the policy output along the advantage sign.
        let policy_target: Vec<f64> = action
            .iter()
            .map(|&a| (a + 0.1 * advantage * a).clamp(-1.0, 1.0))
            .collect();
        self.policy.train(
            refined,
            &policy_target,
            self.learning_rate,
            self.dropout_rate,
            &mut self.rng,
        )?;

        Ok(action)
    }

    /// Scalar reward: 0.4 coherence + 0.4 topic relevance + 0.2 sentiment
    /// alignment, each sub-score in [0, 1].
    pub fn reward(&self, response_text: &str, analysis: &QueryAnalysis) -> f64 {
        let (wc, wt, ws) = REWARD_WEIGHTS;
        wc * coherence(response_text)
            + wt * topic_relevance(response_text, analysis)
            + ws * sentiment_alignment(response_text, analysis)
    }

    // -----------------------------------------------------------------------
    // Stage: decode
    // -----------------------------------------------------------------------

    /// Push the vector through the decoder network, then fill 10 output
    /// slots with the nearest-by-Euclidean-distance vocabulary words,
    /// removing each chosen word from the candidate pool (10 distinct
    /// words, nearest first), joined with spaces.
    pub fn decode_from_meaning_space(
        &self,
        vector: &[f64],
        embeddings: &EmbeddingTrainer,
    ) -> Result<String> {
        let target = self.decoder.predict(vector)?;
        let mut pool: Vec<&String> = embeddings.words().collect();
        if pool.is_empty() {
            return Err(EngineError::NoCandidates(
                "embedding table is empty".into(),
            ));
        }
        pool.sort();

        let mut words = Vec::with_capacity(DECODE_SLOTS);
        for _ in 0..DECODE_SLOTS {
            if pool.is_empty() {
                break;
            }
            let mut best = 0;
            let mut best_dist = f64::INFINITY;
            for (i, word) in pool.iter().enumerate() {
                if let Some(v) = embeddings.vector(word.as_str()) {
                    let d = ops::euclidean_distance(&target, v);
                    if d < best_dist {
                        best_dist = d;
                        best = i;
                    }
                }
            }
            words.push(pool.remove(best).clone());
        }
        Ok(words.join(" "))
    }

    /// Nearest single word to the vector, skipping `exclude`, rank-offset
    /// by `skip` (0 = nearest). Used by the long-form loop's retry path.
    fn decode_single_word(
        &self,
        target: &[f64],
        embeddings: &EmbeddingTrainer,
        exclude: &[&str],
        skip: usize,
    ) -> Result<String> {
        let mut scored: Vec<(&String, f64)> = embeddings
            .words()
            .filter(|w| !exclude.contains(&w.as_str()))
            .filter_map(|w| {
                embeddings
                    .vector(w)
                    .map(|v| (w, ops::euclidean_distance(target, v)))
            })
            .collect();
        if scored.is_empty() {
            return Err(EngineError::NoCandidates(
                "no vocabulary word available for decoding".into(),
            ));
        }
        scored.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });
        let idx = skip.min(scored.len() - 1);
        Ok(scored[idx].0.clone())
    }

    // -----------------------------------------------------------------------
    // Long-form extension
    // -----------------------------------------------------------------------

    /// Word-by-word generation loop. Each iteration re-runs the
    /// encode/refine/improve/decode single-word step on the running
    /// context, enforces topic adherence and sentiment drift correction,
    /// gates on a unique/total coherence ratio, and terminates on terminal
    /// punctuation, length budget, topic-stack depth, recent-sentiment
    /// variance, full keyword coverage, or a length-scaled random stop.
    pub fn generate_complex_sentence(
        &mut self,
        query: &str,
        analysis: &QueryAnalysis,
        lexicon: &Lexicon,
        embeddings: &EmbeddingTrainer,
        max_words: usize,
    ) -> Result<String> {
        let budget = max_words.min(MAX_SENTENCE_WORDS).max(1);
        let mut words = word_tokens(query);
        if words.is_empty() {
            words.push("studio".to_string());
        }
        let seed_len = words.len();

        let mut topic_stack: Vec<String> = Vec::new();
        let mut recent_sentiments: Vec<f64> = Vec::new();
        let keywords = &analysis.keywords;

        while words.len() < seed_len + budget {
            let context = words.join(" ");
            let meaning = self.encode_to_meaning_space(&context, embeddings)?;
            let refined = self.refine(&meaning, context.len())?;
            let improved = self.improve(&refined, &context, analysis)?;
            let target = self.decoder.predict(&improved)?;

            let last = words.last().map(|s| s.as_str()).unwrap_or("");
            let mut candidate = self.decode_single_word(&target, embeddings, &[last], 0)?;

            candidate = self.adhere_to_topic(candidate, analysis, &mut topic_stack, embeddings);
            candidate = self.correct_sentiment_drift(candidate, analysis, embeddings);

            // Coherence gate: reject and retry while the unique/total ratio
            // of the running context would drop to 0.5 or below.
            let mut retries = 0;
            while retries < 3 {
                let mut trial = words.clone();
                trial.push(candidate.clone());
                if coherence(&trial.join(" ")) > 0.5 {
                    break;
                }
                retries += 1;
                if let Some(fallback) = self.knowledge_fallback_word(&topic_stack, &words) {
                    candidate = fallback;
                    break;
                }
                if let Some(next) = most_frequent_successor(lexicon, last, &words) {
                    candidate = next;
                    break;
                }
                candidate = self.decode_single_word(&target, embeddings, &[last], retries)?;
            }

            if candidate == "." || candidate == "!" || candidate == "?" {
                break;
            }

            recent_sentiments.push(word_sentiment(&candidate));
            if recent_sentiments.len() > 5 {
                recent_sentiments.remove(0);
            }
            words.push(candidate);

            if topic_stack.len() > 3 {
                break;
            }
            if recent_sentiments.len() == 5 {
                let (_, variance) = ops::mean_variance(&recent_sentiments);
                if variance > 0.5 {
                    break;
                }
            }
            if !keywords.is_empty() && keywords.iter().all(|k| words.contains(k)) {
                break;
            }

            let generated = words.len() - seed_len;
            let stop_p = 0.02 + 0.1 * generated as f64 / budget as f64;
            if self.rng.gen::<f64>() < stop_p {
                break;
            }
        }

        let mut text = words.join(" ");
        if let Some(first) = text.get(..1) {
            let upper = first.to_uppercase();
            text.replace_range(..1, &upper);
        }
        if !text.ends_with('.') && !text.ends_with('!') && !text.ends_with('?') {
            text.push('.');
        }
        if !query.is_empty() && !text.contains(query) {
            text.push_str(&format!(" This relates to your question about \"{query}\"."));
        }
        Ok(text)
    }

    /// Swap the candidate for a topic-tagged similar word when the query
    /// carries topics; push the topic when the candidate already belongs
    /// to its knowledge-base vocabulary.
    fn adhere_to_topic(
        &mut self,
        candidate: String,
        analysis: &QueryAnalysis,
        topic_stack: &mut Vec<String>,
        embeddings: &EmbeddingTrainer,
    ) -> String {
        let topic = match analysis.topics.first() {
            Some(t) => t,
            None => return candidate,
        };
        let topic_words: Vec<String> = match data::knowledge_for(topic) {
            Some(paragraph) => word_tokens(paragraph),
            None => return candidate,
        };
        if topic_words.contains(&candidate) {
            topic_stack.push(topic.clone());
            return candidate;
        }
        for (similar, _) in embeddings.similar_words(&candidate, 5) {
            if topic_words.contains(&similar) {
                topic_stack.push(topic.clone());
                return similar;
            }
        }
        candidate
    }

    /// When the query carries strong sentiment and the candidate pulls the
    /// opposite way, try a similar word that does not fight the query's tone.
    fn correct_sentiment_drift(
        &self,
        candidate: String,
        analysis: &QueryAnalysis,
        embeddings: &EmbeddingTrainer,
    ) -> String {
        if analysis.sentiment.abs() <= 0.5 {
            return candidate;
        }
        let drift = word_sentiment(&candidate) * analysis.sentiment.signum();
        if drift >= 0.0 {
            return candidate;
        }
        for (similar, _) in embeddings.similar_words(&candidate, 5) {
            if word_sentiment(&similar) * analysis.sentiment.signum() >= 0.0 {
                return similar;
            }
        }
        candidate
    }

    /// First knowledge-base word for the current topic that the running
    /// text has not used yet.
    fn knowledge_fallback_word(&self, topic_stack: &[String], used: &[String]) -> Option<String> {
        let topic = topic_stack.last()?;
        let paragraph = data::knowledge_for(topic)?;
        word_tokens(paragraph)
            .into_iter()
            .find(|w| !used.contains(w) && !data::is_stopword(w))
    }

    // -----------------------------------------------------------------------
    // Offline adversarial round (never invoked by the request path)
    // -----------------------------------------------------------------------

    /// One generator/discriminator round over encoded corpus vectors.
    /// The discriminator learns real=1 / generated=0; the generator then
    /// trains against the inverted label.
    pub fn adversarial_round(&mut self, real_vectors: &[Vec<f64>]) -> Result<()> {
        for real in real_vectors {
            if real.len() != EMBED_DIM {
                return Err(EngineError::DimensionMismatch {
                    expected: EMBED_DIM,
                    got: real.len(),
                });
            }
            let fake = self.refine(real, 0)?;
            self.discriminator.train(
                real,
                &[1.0],
                self.learning_rate,
                self.dropout_rate,
                &mut self.rng,
            )?;
            self.discriminator.train(
                &fake,
                &[0.0],
                self.learning_rate,
                self.dropout_rate,
                &mut self.rng,
            )?;

            // Generator step: push its output toward what the discriminator
            // currently accepts.
            let score = self.discriminator.predict(&fake)?[0];
            if score < 0.5 {
                let mut input = Vec::with_capacity(2 * EMBED_DIM);
                input.extend_from_slice(real);
                input.resize(2 * EMBED_DIM, 0.0);
                self.generator.train(
                    &input,
                    real,
                    self.learning_rate,
                    self.dropout_rate,
                    &mut self.rng,
                )?;
            }
        }
        Ok(())
    }

    /// Discriminator score for a vector (diagnostic).
    pub fn discriminate(&self, vector: &[f64]) -> Result<f64> {
        Ok(self.discriminator.predict(vector)?[0])
    }
}

// ---------------------------------------------------------------------------
// Reward heuristics
// ---------------------------------------------------------------------------

/// Ratio of unique to total words.
pub fn coherence(text: &str) -> f64 {
    let words = word_tokens(text);
    if words.is_empty() {
        return 1.0;
    }
    let unique: std::collections::HashSet<&String> = words.iter().collect();
    unique.len() as f64 / words.len() as f64
}

/// Fraction of the query's topics present in the response text.
fn topic_relevance(text: &str, analysis: &QueryAnalysis) -> f64 {
    if analysis.topics.is_empty() {
        return 0.5;
    }
    let lower = text.to_lowercase();
    let hit = analysis
        .topics
        .iter()
        .filter(|t| lower.contains(t.as_str()))
        .count();
    hit as f64 / analysis.topics.len() as f64
}

/// How closely response sentiment tracks query sentiment, in [0, 1].
fn sentiment_alignment(text: &str, analysis: &QueryAnalysis) -> f64 {
    let response = crate::analysis::sentiment_score(&word_tokens(text));
    1.0 - (response.tanh() - analysis.sentiment.tanh()).abs() / 2.0
}

/// Markov successor of `last` with the highest transition count that the
/// running text has not used yet. Ties break alphabetically.
fn most_frequent_successor(lexicon: &Lexicon, last: &str, used: &[String]) -> Option<String> {
    let successors = lexicon.markov_successors(last)?;
    let mut ranked: Vec<(&String, &u32)> = successors
        .iter()
        .filter(|(w, _)| !used.contains(*w))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    ranked.first().map(|(w, _)| (*w).clone())
}

fn word_sentiment(word: &str) -> f64 {
    for (w, s) in data::POSITIVE_WORDS {
        if w == &word {
            return *s as f64;
        }
    }
    for (w, s) in data::NEGATIVE_WORDS {
        if w == &word {
            return -(*s as f64);
        }
    }
    0.0
}
