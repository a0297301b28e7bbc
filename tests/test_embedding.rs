//! Integration tests for the word embedding trainer.

use loqui::embedding::{EmbeddingTrainer, EMBED_DIM};
use loqui::lexicon::{word_tokens, Lexicon};
use loqui::ops;

fn small_corpus_lexicon() -> Lexicon {
    let mut lex = Lexicon::new();
    lex.train_on_text("the studio designs brands and products");
    lex.train_on_text("good design solves real problems");
    lex.train_on_text("the studio builds web products");
    lex.train_on_text("design and development work together");
    lex
}

#[test]
fn test_vectors_cover_vocabulary_at_fixed_dim() {
    let lex = small_corpus_lexicon();
    let mut trainer = EmbeddingTrainer::new(42);
    assert!(trainer.is_empty());

    trainer.retrain(&lex);
    assert_eq!(trainer.len(), lex.vocabulary().len());
    for word in lex.vocabulary() {
        let v = trainer.vector(word).unwrap();
        assert_eq!(v.len(), EMBED_DIM, "every vector is {}-dimensional", EMBED_DIM);
    }
}

#[test]
fn test_vectors_are_unit_length() {
    let lex = small_corpus_lexicon();
    let mut trainer = EmbeddingTrainer::new(42);
    trainer.retrain(&lex);

    for word in lex.vocabulary() {
        let v = trainer.vector(word).unwrap();
        let norm = ops::l2_norm(v);
        assert!((norm - 1.0).abs() < 1e-9, "'{}' norm {} != 1", word, norm);
    }
}

#[test]
fn test_retrain_is_seed_deterministic() {
    let lex = small_corpus_lexicon();
    let mut a = EmbeddingTrainer::new(7);
    let mut b = EmbeddingTrainer::new(7);
    a.retrain(&lex);
    b.retrain(&lex);
    for word in lex.vocabulary() {
        assert_eq!(a.vector(word), b.vector(word), "same seed, same vectors");
    }

    let mut c = EmbeddingTrainer::new(8);
    c.retrain(&lex);
    let diverged = lex
        .vocabulary()
        .iter()
        .any(|w| a.vector(w) != c.vector(w));
    assert!(diverged, "different seed should produce different vectors");
}

#[test]
fn test_retrain_replaces_previous_table() {
    let mut lex = Lexicon::new();
    lex.train_on_text("alpha beta");
    let mut trainer = EmbeddingTrainer::new(1);
    trainer.retrain(&lex);
    assert!(trainer.vector("gamma").is_none());

    lex.train_on_text("gamma delta");
    trainer.retrain(&lex);
    assert!(trainer.vector("gamma").is_some(), "new vocabulary appears after retrain");
    assert_eq!(trainer.len(), lex.vocabulary().len());
}

#[test]
fn test_mean_vector_unknown_words_contribute_zero() {
    let lex = small_corpus_lexicon();
    let mut trainer = EmbeddingTrainer::new(42);
    trainer.retrain(&lex);

    let known = trainer.mean_vector(&word_tokens("design"));
    let v = trainer.vector("design").unwrap();
    assert!((ops::cosine_similarity(&known, v) - 1.0).abs() < 1e-9);

    // All-unknown input pools to the zero vector and stays there.
    let unknown = trainer.mean_vector(&word_tokens("zzz qqq"));
    assert!(unknown.iter().all(|x| *x == 0.0));

    let empty = trainer.mean_vector(&[]);
    assert_eq!(empty.len(), EMBED_DIM);
    assert!(empty.iter().all(|x| *x == 0.0));
}

#[test]
fn test_cowindowed_words_drift_together() {
    // Words that always share a window end up more similar than words
    // that never co-occur.
    let mut lex = Lexicon::new();
    for _ in 0..5 {
        lex.train_on_text("river water flows");
        lex.train_on_text("stone mountain stands");
    }
    let mut trainer = EmbeddingTrainer::new(3);
    trainer.retrain(&lex);

    let near = ops::cosine_similarity(
        trainer.vector("river").unwrap(),
        trainer.vector("water").unwrap(),
    );
    let far = ops::cosine_similarity(
        trainer.vector("river").unwrap(),
        trainer.vector("mountain").unwrap(),
    );
    assert!(near > far, "co-windowed pair ({}) should beat unrelated pair ({})", near, far);
}

#[test]
fn test_similar_words_excludes_self() {
    let lex = small_corpus_lexicon();
    let mut trainer = EmbeddingTrainer::new(42);
    trainer.retrain(&lex);

    let similar = trainer.similar_words("design", 3);
    assert_eq!(similar.len(), 3);
    assert!(similar.iter().all(|(w, _)| w != "design"));
    // Ordered by descending similarity.
    assert!(similar[0].1 >= similar[1].1 && similar[1].1 >= similar[2].1);

    assert!(trainer.similar_words("notaword", 3).is_empty());
}
