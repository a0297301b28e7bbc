//! Lexical statistics store: vocabulary, term/document frequency, n-gram
//! counts, and a first-order Markov transition table over a growing corpus.
//!
//! The store only ever accumulates. Training twice on the same text doubles
//! its counts; nothing is pruned or replaced.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Tokenize into case-folded word-or-punctuation tokens. A word is a run
/// of alphanumerics (apostrophes allowed inside); any other non-whitespace
/// character becomes its own token.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut word = String::new();
    for c in text.chars() {
        if c.is_alphanumeric() || (c == '\'' && !word.is_empty()) {
            for lc in c.to_lowercase() {
                word.push(lc);
            }
        } else {
            if !word.is_empty() {
                tokens.push(std::mem::take(&mut word));
            }
            if !c.is_whitespace() {
                tokens.push(c.to_string());
            }
        }
    }
    if !word.is_empty() {
        tokens.push(word);
    }
    tokens
}

/// Word tokens only (punctuation stripped). Used where the pipeline wants
/// content words: embeddings, keywords, Markov transitions.
pub fn word_tokens(text: &str) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|t| t.chars().any(|c| c.is_alphanumeric()))
        .collect()
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Lexicon {
    documents: Vec<String>,
    vocabulary: BTreeSet<String>,
    word_freq: HashMap<String, u32>,
    /// n-gram counts for n = 2..=4, keyed by the space-joined window.
    ngrams: HashMap<String, u32>,
    doc_freq: HashMap<String, u32>,
    idf: HashMap<String, f64>,
    /// word -> successor word -> observed transition count. Append-only.
    markov: HashMap<String, HashMap<String, u32>>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest one document: appends it to the corpus, updates unigram and
    /// 2–4-gram counts (a window is only recorded when it fits fully within
    /// the token sequence), extends the Markov table, and recomputes IDF
    /// for the whole vocabulary.
    pub fn train_on_text(&mut self, text: &str) {
        let tokens = tokenize(text);
        self.documents.push(text.to_string());

        for token in &tokens {
            self.vocabulary.insert(token.clone());
            *self.word_freq.entry(token.clone()).or_insert(0) += 1;
        }

        for n in 2..=4usize {
            if tokens.len() < n {
                continue;
            }
            for window in tokens.windows(n) {
                let key = window.join(" ");
                *self.ngrams.entry(key).or_insert(0) += 1;
            }
        }

        let words = word_tokens(text);
        for pair in words.windows(2) {
            *self
                .markov
                .entry(pair[0].clone())
                .or_default()
                .entry(pair[1].clone())
                .or_insert(0) += 1;
        }

        let unique: BTreeSet<&String> = tokens.iter().collect();
        for token in unique {
            *self.doc_freq.entry(token.clone()).or_insert(0) += 1;
        }
        self.recompute_idf();
    }

    fn recompute_idf(&mut self) {
        let total = self.documents.len() as f64;
        self.idf.clear();
        for word in &self.vocabulary {
            let df = self.doc_freq.get(word).copied().unwrap_or(0) as f64;
            self.idf.insert(word.clone(), (total / (1.0 + df)).ln());
        }
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    pub fn vocabulary(&self) -> &BTreeSet<String> {
        &self.vocabulary
    }

    pub fn contains(&self, word: &str) -> bool {
        self.vocabulary.contains(word)
    }

    pub fn word_count(&self, word: &str) -> u32 {
        self.word_freq.get(word).copied().unwrap_or(0)
    }

    pub fn ngram_count(&self, window: &[&str]) -> u32 {
        self.ngrams.get(&window.join(" ")).copied().unwrap_or(0)
    }

    pub fn idf(&self, word: &str) -> f64 {
        match self.idf.get(word) {
            Some(&v) => v,
            // Unseen word: treated as occurring in no document.
            None => (self.documents.len().max(1) as f64).ln(),
        }
    }

    /// Sparse TF-IDF vector over the given tokens.
    pub fn tf_idf(&self, tokens: &[String]) -> HashMap<String, f64> {
        let mut tf: HashMap<String, f64> = HashMap::new();
        if tokens.is_empty() {
            return tf;
        }
        let n = tokens.len() as f64;
        for token in tokens {
            *tf.entry(token.clone()).or_insert(0.0) += 1.0 / n;
        }
        for (word, weight) in tf.iter_mut() {
            *weight *= self.idf(word);
        }
        tf
    }

    pub fn markov_successors(&self, word: &str) -> Option<&HashMap<String, u32>> {
        self.markov.get(word)
    }

    /// Draw a successor for `word`, weighted by observed transition counts.
    pub fn markov_step<R: Rng>(&self, word: &str, rng: &mut R) -> Option<String> {
        let successors = self.markov.get(word)?;
        let total: u32 = successors.values().sum();
        if total == 0 {
            return None;
        }
        let mut pick = rng.gen_range(0..total);
        // BTree-ordered iteration keeps the draw reproducible for a fixed seed.
        let mut ordered: Vec<(&String, &u32)> = successors.iter().collect();
        ordered.sort_by(|a, b| a.0.cmp(b.0));
        for (succ, count) in ordered {
            if pick < *count {
                return Some(succ.clone());
            }
            pick -= count;
        }
        None
    }

    /// Extend a seed word into a short Markov chain walk.
    pub fn markov_chain<R: Rng>(&self, seed: &str, max_words: usize, rng: &mut R) -> Vec<String> {
        let mut out = vec![seed.to_string()];
        let mut current = seed.to_string();
        for _ in 1..max_words {
            match self.markov_step(&current, rng) {
                Some(next) => {
                    current = next.clone();
                    out.push(next);
                }
                None => break,
            }
        }
        out
    }
}

/// Cosine similarity between two sparse TF-IDF vectors.
pub fn sparse_cosine(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
    let dot: f64 = a
        .iter()
        .filter_map(|(k, va)| b.get(k).map(|vb| va * vb))
        .sum();
    let na: f64 = a.values().map(|v| v * v).sum::<f64>().sqrt();
    let nb: f64 = b.values().map(|v| v * v).sum::<f64>().sqrt();
    if na <= 1e-12 || nb <= 1e-12 {
        return 0.0;
    }
    dot / (na * nb)
}
