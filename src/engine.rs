//! Engine orchestration: owns the lexical store, the embedding table, the
//! response generator, and the bounded conversation memory. All entry
//! points the binary and the ingestion module use live here.

use std::collections::VecDeque;
use std::thread;
use std::time::Duration;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::analysis::{self, QueryAnalysis};
use crate::data::{self, FAREWELL_INDEX, GREETING_INDEX, INTENT_CATALOG, KNOWLEDGE_BASE};
use crate::embedding::EmbeddingTrainer;
use crate::errors::{EngineError, Result};
use crate::generator::ResponseGenerator;
use crate::lexicon::{word_tokens, Lexicon};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Seed for every random stream the engine owns.
    pub seed: u64,
    /// Most-recent conversation turns kept for context scoring.
    pub memory_limit: usize,
    /// Intent matches below this cosine score fall back to the
    /// uncertain response pool.
    pub confidence_threshold: f64,
    /// Epsilon for the improve stage's exploration branch.
    pub exploration: f64,
    /// Discount factor for the one-step TD update.
    pub discount: f64,
    /// Per-character delay of the typed-output helper, in milliseconds.
    pub typing_delay_ms: u64,
    /// Word budget handed to the long-form generation loop.
    pub max_generated_words: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            memory_limit: 10,
            confidence_threshold: 0.1,
            exploration: 0.1,
            discount: 0.99,
            typing_delay_ms: 10,
            max_generated_words: 40,
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct TextEngine {
    config: EngineConfig,
    lexicon: Lexicon,
    embeddings: EmbeddingTrainer,
    generator: ResponseGenerator,
    memory: VecDeque<String>,
    rng: ChaCha8Rng,
    last_query: Option<String>,
    last_analysis: Option<QueryAnalysis>,
}

const UNCERTAIN_RESPONSES: &[&str] = &[
    "I'm not sure I follow. Could you rephrase that?",
    "I'm not sure I caught that. Are you asking about our services, our work, or something else?",
    "I'm not sure I understand. Try asking about design, development, or branding.",
];

impl TextEngine {
    /// Build an engine, train the lexicon on the built-in catalog,
    /// knowledge base, and corpus, then derive the embedding table once.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let mut lexicon = Lexicon::new();
        for entry in INTENT_CATALOG {
            for trigger in entry.triggers {
                lexicon.train_on_text(trigger);
            }
            for response in entry.responses {
                lexicon.train_on_text(response);
            }
        }
        for (_, paragraph) in KNOWLEDGE_BASE {
            lexicon.train_on_text(paragraph);
        }
        for line in data::TRAINING_CORPUS {
            lexicon.train_on_text(line);
        }

        let mut embeddings = EmbeddingTrainer::new(config.seed);
        embeddings.retrain(&lexicon);

        let generator =
            ResponseGenerator::new(config.seed, config.exploration, config.discount)?;

        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(7)),
            memory: VecDeque::with_capacity(config.memory_limit),
            config,
            lexicon,
            embeddings,
            generator,
            last_query: None,
            last_analysis: None,
        })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(EngineConfig::default())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn embeddings(&self) -> &EmbeddingTrainer {
        &self.embeddings
    }

    pub fn memory(&self) -> impl Iterator<Item = &String> {
        self.memory.iter()
    }

    /// Diagnostic bundle of the most recent query, if any.
    pub fn last_analysis(&self) -> Option<&QueryAnalysis> {
        self.last_analysis.as_ref()
    }

    // -----------------------------------------------------------------------
    // Entry points
    // -----------------------------------------------------------------------

    /// Full request path: analyze the input against prior turns, record
    /// the turn in memory, compose a response, then optionally translate.
    pub fn handle_user_input(
        &mut self,
        input: &str,
        target_language: Option<&str>,
    ) -> Result<String> {
        let trimmed = input.trim();
        let prior: Vec<String> = self.memory.iter().cloned().collect();
        let query_analysis = analysis::understand(trimmed, &self.lexicon, &prior);

        self.remember(trimmed);
        self.last_query = Some(trimmed.to_string());
        self.last_analysis = Some(query_analysis.clone());

        let response = self.compose_response(trimmed, &query_analysis)?;
        Ok(match target_language {
            Some(language) => translate(&response, language),
            None => response,
        })
    }

    /// Re-run composition for the most recent query. The random streams
    /// have advanced, so template and decoding choices may differ.
    pub fn regenerate_response(&mut self) -> Result<String> {
        let query = self
            .last_query
            .clone()
            .ok_or_else(|| EngineError::InvalidInput("no query to regenerate".into()))?;
        let query_analysis = self
            .last_analysis
            .clone()
            .ok_or_else(|| EngineError::InvalidInput("no analysis to regenerate from".into()))?;
        self.compose_response(&query, &query_analysis)
    }

    /// Long-form elaboration on a query via the word-by-word loop.
    pub fn elaborate(&mut self, query: &str) -> Result<String> {
        let prior: Vec<String> = self.memory.iter().cloned().collect();
        let query_analysis = analysis::understand(query, &self.lexicon, &prior);
        self.generator.generate_complex_sentence(
            query,
            &query_analysis,
            &self.lexicon,
            &self.embeddings,
            self.config.max_generated_words,
        )
    }

    /// Canned conversation starters shown by the interactive shell.
    pub fn conversation_suggestions(&self) -> &'static [&'static str] {
        data::SUGGESTIONS
    }

    /// Fold new text into the lexicon and re-derive the embedding table.
    pub fn train_on_text(&mut self, text: &str) {
        self.lexicon.train_on_text(text);
        self.embeddings.retrain(&self.lexicon);
    }

    /// Feed a response to `sink` one character at a time, sleeping the
    /// configured delay between characters.
    pub fn type_out<F: FnMut(char)>(&self, text: &str, mut sink: F) {
        let delay = Duration::from_millis(self.config.typing_delay_ms);
        for ch in text.chars() {
            sink(ch);
            if !delay.is_zero() {
                thread::sleep(delay);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Composition
    // -----------------------------------------------------------------------

    fn compose_response(&mut self, query: &str, query_analysis: &QueryAnalysis) -> Result<String> {
        let index = match query_analysis.intent_index {
            Some(i) if query_analysis.confidence >= self.config.confidence_threshold => i,
            _ => return Ok(self.uncertain_response()),
        };

        let entry = &INTENT_CATALOG[index];
        let template = entry.responses[self.rng.gen_range(0..entry.responses.len())];
        let mut parts: Vec<String> = vec![template.to_string()];

        // Markov supplement seeded by the strongest keyword; greetings and
        // farewells stay template-led without it.
        if index != GREETING_INDEX && index != FAREWELL_INDEX {
            if let Some(keyword) = query_analysis.keywords.first() {
                let chain = self.lexicon.markov_chain(keyword, 8, &mut self.rng);
                if chain.len() > 1 {
                    parts.push(sentence_case(&chain.join(" ")));
                }
            }
        }

        // Encode the response so far, refine and improve the meaning
        // vector, and decode both stages into word sequences.
        let running = parts.join(" ");
        let meaning = self
            .generator
            .encode_to_meaning_space(&running, &self.embeddings)?;
        let refined = self.generator.refine(&meaning, running.len())?;
        let refined_text = self
            .generator
            .decode_from_meaning_space(&refined, &self.embeddings)?;
        let improved = self.generator.improve(&refined, &running, query_analysis)?;
        let improved_text = self
            .generator
            .decode_from_meaning_space(&improved, &self.embeddings)?;
        parts.push(sentence_case(&refined_text));
        parts.push(sentence_case(&improved_text));

        self.append_sentiment_clause(query, query_analysis, &mut parts);

        for topic in &query_analysis.topics {
            if let Some(paragraph) = data::knowledge_for(topic) {
                parts.push(first_sentence(paragraph).to_string());
            }
        }

        if !query_analysis.entities.is_empty() {
            let listed: Vec<String> = query_analysis
                .entities
                .iter()
                .map(|e| format!("{} ({})", e.text, e.kind))
                .collect();
            parts.push(format!("I noticed you mentioned: {}.", listed.join(", ")));
        }

        Ok(parts.join(" "))
    }

    fn append_sentiment_clause(
        &self,
        query: &str,
        query_analysis: &QueryAnalysis,
        parts: &mut Vec<String>,
    ) {
        if word_tokens(query).len() <= 3 || query_analysis.sentiment.abs() <= 0.5 {
            return;
        }
        if query_analysis.sentiment > 0.0 {
            parts.push("I'm glad to hear the positive energy in your message!".to_string());
        } else {
            parts.push(
                "I'm sorry if something isn't working the way you hoped. Let's fix that together."
                    .to_string(),
            );
        }
    }

    fn uncertain_response(&mut self) -> String {
        UNCERTAIN_RESPONSES[self.rng.gen_range(0..UNCERTAIN_RESPONSES.len())].to_string()
    }

    fn remember(&mut self, turn: &str) {
        if turn.is_empty() {
            return;
        }
        if self.memory.len() == self.config.memory_limit {
            self.memory.pop_front();
        }
        self.memory.push_back(turn.to_string());
    }

    // -----------------------------------------------------------------------
    // Snapshots
    // -----------------------------------------------------------------------

    /// Serialize the lexical state (config, lexicon, embeddings, memory)
    /// to JSON bytes. Network weights are rebuilt from the seed on load.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let snapshot = Snapshot {
            config: self.config.clone(),
            lexicon: self.lexicon.clone(),
            embeddings: self.embeddings.clone(),
            memory: self.memory.iter().cloned().collect(),
        };
        serde_json::to_vec(&snapshot).map_err(|e| EngineError::Snapshot(e.to_string()))
    }

    /// Rebuild an engine from snapshot bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let snapshot: Snapshot =
            serde_json::from_slice(bytes).map_err(|e| EngineError::Snapshot(e.to_string()))?;
        let generator = ResponseGenerator::new(
            snapshot.config.seed,
            snapshot.config.exploration,
            snapshot.config.discount,
        )?;
        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(snapshot.config.seed.wrapping_add(7)),
            memory: snapshot.memory.into_iter().collect(),
            config: snapshot.config,
            lexicon: snapshot.lexicon,
            embeddings: snapshot.embeddings,
            generator,
            last_query: None,
            last_analysis: None,
        })
    }
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    config: EngineConfig,
    lexicon: Lexicon,
    embeddings: EmbeddingTrainer,
    memory: Vec<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Phrase-pair substitution from the built-in translation tables.
/// Unsupported languages pass the text through unchanged.
pub fn translate(text: &str, language: &str) -> String {
    match data::translation_table(language) {
        Some(table) => {
            let mut out = text.to_string();
            for (english, foreign) in table {
                out = out.replace(english, foreign);
            }
            out
        }
        None => text.to_string(),
    }
}

fn sentence_case(text: &str) -> String {
    let mut out = text.to_string();
    if let Some(first) = out.get(..1) {
        let upper = first.to_uppercase();
        out.replace_range(..1, &upper);
    }
    if !out.ends_with('.') && !out.ends_with('!') && !out.ends_with('?') {
        out.push('.');
    }
    out
}

fn first_sentence(paragraph: &str) -> &str {
    match paragraph.find('.') {
        Some(i) => &paragraph[..=i],
        None => paragraph,
    }
}
