//! Integration tests for file ingestion: text, CSV, and JSON handling.

use loqui::engine::{EngineConfig, TextEngine};
use loqui::ingest::process_attached_file;

fn engine() -> TextEngine {
    let config = EngineConfig {
        typing_delay_ms: 0,
        max_generated_words: 12,
        ..EngineConfig::default()
    };
    TextEngine::new(config).unwrap()
}

#[test]
fn test_text_file_report_counts_and_terms() {
    let mut eng = engine();
    let contents = "Typography matters. Typography sets the tone. \
                    Good typography carries the brand voice.";
    let report = process_attached_file("notes.txt", contents, &mut eng).unwrap();

    assert!(report.contains("notes.txt"));
    assert!(report.contains("12 words"), "got '{}'", report);
    assert!(report.contains("3 sentences"), "got '{}'", report);
    assert!(
        report.to_lowercase().contains("typography"),
        "dominant term expected in '{}'",
        report
    );
    // The document was folded into the lexicon.
    assert!(eng.lexicon().contains("typography"));
}

#[test]
fn test_empty_text_file_apologizes() {
    let mut eng = engine();
    let report = process_attached_file("empty.txt", "   \n  ", &mut eng).unwrap();
    assert!(report.starts_with("I'm sorry"), "got '{}'", report);
    assert!(report.contains("empty.txt"));
}

#[test]
fn test_csv_structure_is_described() {
    let mut eng = engine();
    let contents = "name, role, city\n\
                    Ana, designer, Lisbon\n\
                    Bea, developer, Porto\n";
    let report = process_attached_file("team.csv", contents, &mut eng).unwrap();
    assert!(report.contains("3 columns"), "got '{}'", report);
    assert!(report.contains("2 data rows"), "got '{}'", report);
    assert!(report.contains("name, role, city"));
}

#[test]
fn test_json_text_values_are_learned() {
    let mut eng = engine();
    let contents = r#"{"title": "studio handbook", "topics": ["quokka rituals", "critique"]}"#;
    let report = process_attached_file("handbook.json", contents, &mut eng).unwrap();
    assert!(report.contains("text value"), "got '{}'", report);
    assert!(eng.lexicon().contains("quokka"), "JSON strings feed the lexicon");
}

#[test]
fn test_malformed_json_apologizes_without_error() {
    let mut eng = engine();
    let before = eng.lexicon().document_count();
    let report = process_attached_file("broken.json", "{not valid json", &mut eng).unwrap();
    assert!(report.starts_with("I'm sorry"), "got '{}'", report);
    assert!(report.contains("broken.json"));
    assert_eq!(eng.lexicon().document_count(), before, "nothing learned from garbage");
}

#[test]
fn test_json_without_text_is_reported() {
    let mut eng = engine();
    let report = process_attached_file("numbers.json", "[1, 2, 3]", &mut eng).unwrap();
    assert!(report.contains("no text"), "got '{}'", report);
}

#[test]
fn test_extension_dispatch_is_case_insensitive() {
    let mut eng = engine();
    let report = process_attached_file("DATA.CSV", "a, b\n1, 2\n", &mut eng).unwrap();
    assert!(report.contains("2 columns"), "got '{}'", report);
}
