//! Query understanding: intent matching, entity extraction, sentiment,
//! topics, keywords.
//!
//! Intent matching is TF-IDF cosine similarity between the query and each
//! catalog entry's concatenated trigger phrases. Replacement requires a
//! strictly greater score, so ties resolve to the earlier catalog entry.

use serde::{Deserialize, Serialize};

use crate::data::{self, INTENT_CATALOG, NEGATIVE_WORDS, POSITIVE_WORDS, TOPIC_TAGS};
use crate::lexicon::{sparse_cosine, tokenize, word_tokens, Lexicon};

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Person,
    Organization,
    Location,
    Date,
    Email,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            EntityKind::Person => "person",
            EntityKind::Organization => "organization",
            EntityKind::Location => "location",
            EntityKind::Date => "date",
            EntityKind::Email => "email",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub text: String,
}

// ---------------------------------------------------------------------------
// Analysis bundle
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QueryAnalysis {
    /// First trigger phrase of the best-matching catalog entry.
    pub intent: String,
    /// Index into the intent catalog, None when nothing scored above zero.
    pub intent_index: Option<usize>,
    /// Cosine similarity of the winning entry.
    pub confidence: f64,
    pub entities: Vec<Entity>,
    /// Top-5 TF-IDF word tokens.
    pub keywords: Vec<String>,
    /// Diagnostic summary; logged, never used for control flow.
    pub analysis: String,
    pub sentiment: f64,
    pub topics: Vec<String>,
    /// Rough similarity against recent conversation turns.
    pub context_relevance: f64,
}

/// Run the full query-understanding pass.
pub fn understand(query: &str, lexicon: &Lexicon, memory: &[String]) -> QueryAnalysis {
    let tokens = tokenize(query);
    let query_vec = lexicon.tf_idf(&tokens);

    let mut best_index: Option<usize> = None;
    let mut best_score = 0.0_f64;
    for (i, entry) in INTENT_CATALOG.iter().enumerate() {
        let trigger_text = entry.triggers.join(" ");
        let trigger_vec = lexicon.tf_idf(&tokenize(&trigger_text));
        let score = sparse_cosine(&query_vec, &trigger_vec);
        if score > best_score {
            best_score = score;
            best_index = Some(i);
        }
    }

    let intent = best_index
        .map(|i| INTENT_CATALOG[i].triggers[0].to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let entities = extract_entities(query);
    let sentiment = sentiment_score(&tokens);
    let topics = topic_tags(query);
    let keywords = top_keywords(query, lexicon, 5);

    let context_relevance = memory
        .iter()
        .map(|turn| sparse_cosine(&query_vec, &lexicon.tf_idf(&tokenize(turn))))
        .fold(0.0_f64, f64::max);

    let analysis = format!(
        "intent='{}' confidence={:.3} sentiment={:+.1} topics={:?} entities={} keywords={:?} context={:.3}",
        intent,
        best_score,
        sentiment,
        topics,
        entities.len(),
        keywords,
        context_relevance,
    );

    QueryAnalysis {
        intent,
        intent_index: best_index,
        confidence: best_score,
        entities,
        keywords,
        analysis,
        sentiment,
        topics,
        context_relevance,
    }
}

// ---------------------------------------------------------------------------
// Keywords, sentiment, topics
// ---------------------------------------------------------------------------

/// Top-k word tokens by TF-IDF weight, stopwords excluded.
pub fn top_keywords(text: &str, lexicon: &Lexicon, k: usize) -> Vec<String> {
    let words = word_tokens(text);
    let weights = lexicon.tf_idf(&words);
    let mut scored: Vec<(String, f64)> = weights
        .into_iter()
        .filter(|(w, _)| !data::is_stopword(w))
        .collect();
    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    scored.into_iter().take(k).map(|(w, _)| w).collect()
}

/// Lexicon sentiment: +1/+2 per positive token, -1/-2 per negative token,
/// no normalization by length.
pub fn sentiment_score(tokens: &[String]) -> f64 {
    let mut score = 0;
    for token in tokens {
        if let Some((_, s)) = POSITIVE_WORDS.iter().find(|(w, _)| w == token) {
            score += s;
        }
        if let Some((_, s)) = NEGATIVE_WORDS.iter().find(|(w, _)| w == token) {
            score -= s;
        }
    }
    score as f64
}

/// Topic tags literally contained in the query.
pub fn topic_tags(query: &str) -> Vec<String> {
    let lower = query.to_lowercase();
    TOPIC_TAGS
        .iter()
        .filter(|t| lower.contains(*t))
        .map(|t| t.to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Entity extraction (heuristic)
// ---------------------------------------------------------------------------

const ORG_SUFFIXES: &[&str] = &["Inc", "Inc.", "Corp", "Corp.", "LLC", "Ltd", "Ltd."];
const LOCATIVE_SUFFIXES: &[&str] = &["City", "Island", "Valley", "Beach", "Bay", "Park"];
const MONTHS: &[&str] = &[
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december",
];

fn is_capitalized(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) if c.is_uppercase() => chars.all(|c| c.is_lowercase() || c == '\''),
        _ => false,
    }
}

fn is_all_caps(word: &str) -> bool {
    word.len() >= 2 && word.chars().all(|c| c.is_uppercase())
}

fn strip_punct(word: &str) -> &str {
    word.trim_matches(|c: char| !c.is_alphanumeric() && c != '@' && c != '.' && c != '/')
        .trim_end_matches('.')
}

/// Regex-free heuristic entity pass over the raw (case-preserving) query.
pub fn extract_entities(query: &str) -> Vec<Entity> {
    let raw: Vec<&str> = query.split_whitespace().collect();
    let mut entities = Vec::new();

    // Emails: token with '@' and a dot in the domain part.
    for token in &raw {
        let t = token.trim_matches(|c: char| c == ',' || c == ';' || c == ')' || c == '(');
        if let Some(at) = t.find('@') {
            let domain = &t[at + 1..];
            if at > 0 && domain.contains('.') && !domain.ends_with('.') {
                entities.push(Entity {
                    kind: EntityKind::Email,
                    text: t.trim_end_matches('.').to_string(),
                });
            }
        }
    }

    // Dates: numeric 12/05/2024 or 2024-05-12 shapes, and "Month day, year".
    for (i, token) in raw.iter().enumerate() {
        let t = strip_punct(token);
        if is_numeric_date(t) {
            entities.push(Entity { kind: EntityKind::Date, text: t.to_string() });
            continue;
        }
        if MONTHS.contains(&t.to_lowercase().as_str()) {
            if let Some(next) = raw.get(i + 1) {
                let day = next.trim_matches(|c: char| !c.is_ascii_digit());
                if !day.is_empty() && day.chars().all(|c| c.is_ascii_digit()) {
                    let mut text = format!("{t} {day}");
                    if let Some(year) = raw.get(i + 2) {
                        let y = strip_punct(year);
                        if y.len() == 4 && y.chars().all(|c| c.is_ascii_digit()) {
                            text.push(' ');
                            text.push_str(y);
                        }
                    }
                    entities.push(Entity { kind: EntityKind::Date, text });
                }
            }
        }
    }

    // Organizations: all-caps tokens, or capitalized runs ending in a
    // corporate suffix.
    for token in &raw {
        let t = strip_punct(token);
        if is_all_caps(t) && t.chars().all(|c| c.is_alphabetic()) {
            entities.push(Entity { kind: EntityKind::Organization, text: t.to_string() });
        }
    }

    // Capitalized runs: suffix decides organization/location, otherwise a
    // run of two or more reads as a person name. The query's leading word
    // alone is too noisy to count.
    let mut i = 0;
    while i < raw.len() {
        let t = strip_punct(raw[i]);
        if !is_capitalized(t) {
            i += 1;
            continue;
        }
        let start = i;
        let mut run: Vec<&str> = vec![t];
        let mut j = i + 1;
        while j < raw.len() {
            let next = raw[j].trim_end_matches(|c: char| c == ',' || c == '?' || c == '!');
            let stripped = strip_punct(next);
            if is_capitalized(stripped) || ORG_SUFFIXES.contains(&next) {
                run.push(if ORG_SUFFIXES.contains(&next) { next } else { stripped });
                j += 1;
            } else {
                break;
            }
        }
        let last = *run.last().unwrap_or(&"");
        if ORG_SUFFIXES.contains(&last) {
            entities.push(Entity {
                kind: EntityKind::Organization,
                text: run.join(" "),
            });
        } else if LOCATIVE_SUFFIXES.contains(&last) && run.len() >= 2 {
            entities.push(Entity {
                kind: EntityKind::Location,
                text: run.join(" "),
            });
        } else if run.len() >= 2 && !(start == 0 && run.len() == raw.len()) {
            entities.push(Entity {
                kind: EntityKind::Person,
                text: run.join(" "),
            });
        }
        i = j.max(i + 1);
    }

    entities
}

fn is_numeric_date(t: &str) -> bool {
    for sep in ['/', '-'] {
        let parts: Vec<&str> = t.split(sep).collect();
        if parts.len() == 3
            && parts
                .iter()
                .all(|p| !p.is_empty() && p.len() <= 4 && p.chars().all(|c| c.is_ascii_digit()))
        {
            return true;
        }
    }
    false
}
