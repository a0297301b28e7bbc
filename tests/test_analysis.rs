//! Integration tests for query understanding: intent matching, keywords,
//! sentiment, topics, and entity extraction.

use loqui::analysis::{
    extract_entities, sentiment_score, top_keywords, topic_tags, understand, EntityKind,
};
use loqui::data::{FAREWELL_INDEX, GREETING_INDEX, INTENT_CATALOG, KNOWLEDGE_BASE, TRAINING_CORPUS};
use loqui::lexicon::{word_tokens, Lexicon};

/// Lexicon trained the way the engine trains at construction.
fn trained_lexicon() -> Lexicon {
    let mut lex = Lexicon::new();
    for entry in INTENT_CATALOG {
        for trigger in entry.triggers {
            lex.train_on_text(trigger);
        }
        for response in entry.responses {
            lex.train_on_text(response);
        }
    }
    for (_, paragraph) in KNOWLEDGE_BASE {
        lex.train_on_text(paragraph);
    }
    for line in TRAINING_CORPUS {
        lex.train_on_text(line);
    }
    lex
}

// ---------------------------------------------------------------------------
// Intent matching
// ---------------------------------------------------------------------------

#[test]
fn test_greeting_and_farewell_intents() {
    let lex = trained_lexicon();
    let hello = understand("hello", &lex, &[]);
    assert_eq!(hello.intent_index, Some(GREETING_INDEX));
    assert_eq!(hello.intent, "hello");
    assert!(hello.confidence > 0.0);

    let bye = understand("goodbye", &lex, &[]);
    assert_eq!(bye.intent_index, Some(FAREWELL_INDEX));
}

#[test]
fn test_no_overlap_yields_unknown_intent() {
    let lex = trained_lexicon();
    let a = understand("zzyzx qwerty", &lex, &[]);
    assert_eq!(a.intent_index, None);
    assert_eq!(a.intent, "unknown");
    assert_eq!(a.confidence, 0.0);
}

#[test]
fn test_empty_query_is_unknown() {
    let lex = trained_lexicon();
    let a = understand("", &lex, &[]);
    assert_eq!(a.intent_index, None);
    assert!(a.keywords.is_empty());
    assert_eq!(a.sentiment, 0.0);
}

#[test]
fn test_pricing_query_matches_pricing_entry() {
    let lex = trained_lexicon();
    let a = understand("how much does a project cost", &lex, &[]);
    let triggers = INTENT_CATALOG[a.intent_index.unwrap()].triggers;
    assert!(
        triggers.contains(&"price"),
        "expected the pricing entry, matched triggers {:?}",
        triggers
    );
}

#[test]
fn test_context_relevance_tracks_memory() {
    let lex = trained_lexicon();
    let fresh = understand("tell me about branding", &lex, &[]);
    assert_eq!(fresh.context_relevance, 0.0, "no memory, no context score");

    let memory = vec!["tell me about branding".to_string()];
    let repeat = understand("tell me about branding", &lex, &memory);
    assert!(
        repeat.context_relevance > 0.9,
        "repeating a remembered turn should score high, got {}",
        repeat.context_relevance
    );
}

// ---------------------------------------------------------------------------
// Keywords
// ---------------------------------------------------------------------------

#[test]
fn test_keywords_exclude_stopwords_and_cap_at_five() {
    let lex = trained_lexicon();
    let keywords = top_keywords(
        "the design studio builds branding projects with careful typography and motion",
        &lex,
        5,
    );
    assert!(keywords.len() <= 5);
    assert!(!keywords.iter().any(|k| k == "the" || k == "and" || k == "with"));
    assert!(keywords.iter().any(|k| k == "typography" || k == "branding" || k == "motion"));
}

// ---------------------------------------------------------------------------
// Sentiment
// ---------------------------------------------------------------------------

#[test]
fn test_sentiment_two_tier_strengths() {
    // "good" is +1, "amazing" +2, "bad" -1, "terrible" -2; no length
    // normalization.
    assert_eq!(sentiment_score(&word_tokens("good")), 1.0);
    assert_eq!(sentiment_score(&word_tokens("amazing")), 2.0);
    assert_eq!(sentiment_score(&word_tokens("good amazing")), 3.0);
    assert_eq!(sentiment_score(&word_tokens("bad terrible")), -3.0);
    assert_eq!(sentiment_score(&word_tokens("good bad")), 0.0);
    assert_eq!(sentiment_score(&word_tokens("completely neutral words")), 0.0);
}

// ---------------------------------------------------------------------------
// Topics
// ---------------------------------------------------------------------------

#[test]
fn test_topic_tags_by_containment() {
    let topics = topic_tags("I need web design and branding help");
    assert!(topics.contains(&"design".to_string()));
    assert!(topics.contains(&"branding".to_string()));
    assert!(topics.contains(&"web".to_string()));
    assert!(!topics.contains(&"motion".to_string()));
    assert!(topic_tags("nothing relevant here").is_empty());
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

#[test]
fn test_entity_extraction_mixed_query() {
    let entities =
        extract_entities("John Smith from Acme Corp emailed john@studio.com on March 5, 2024");

    let kinds: Vec<(EntityKind, &str)> =
        entities.iter().map(|e| (e.kind, e.text.as_str())).collect();
    assert!(kinds.contains(&(EntityKind::Person, "John Smith")), "got {:?}", kinds);
    assert!(kinds.contains(&(EntityKind::Organization, "Acme Corp")), "got {:?}", kinds);
    assert!(kinds.contains(&(EntityKind::Email, "john@studio.com")), "got {:?}", kinds);
    assert!(kinds.contains(&(EntityKind::Date, "March 5 2024")), "got {:?}", kinds);
}

#[test]
fn test_entity_numeric_date_shapes() {
    let slash = extract_entities("we met on 12/05/2024 downtown");
    assert!(slash.iter().any(|e| e.kind == EntityKind::Date && e.text == "12/05/2024"));

    let dash = extract_entities("deadline is 2024-05-12 sharp");
    assert!(dash.iter().any(|e| e.kind == EntityKind::Date && e.text == "2024-05-12"));
}

#[test]
fn test_entity_all_caps_organization() {
    let entities = extract_entities("I work at NASA these days");
    assert!(entities.iter().any(|e| e.kind == EntityKind::Organization && e.text == "NASA"));
}

#[test]
fn test_entity_location_suffix() {
    let entities = extract_entities("we opened an office in Silicon Valley last year");
    assert!(
        entities.iter().any(|e| e.kind == EntityKind::Location && e.text == "Silicon Valley"),
        "got {:?}",
        entities.iter().map(|e| (&e.text, e.kind)).collect::<Vec<_>>()
    );
}

#[test]
fn test_entity_leading_run_spanning_whole_query_ignored() {
    // A fully-capitalized query is title casing, not a name.
    let entities = extract_entities("Hello There");
    assert!(
        !entities.iter().any(|e| e.kind == EntityKind::Person),
        "got {:?}",
        entities.iter().map(|e| (&e.text, e.kind)).collect::<Vec<_>>()
    );
}

#[test]
fn test_entity_none_in_plain_query() {
    assert!(extract_entities("what services do you offer").is_empty());
}
