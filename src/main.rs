//! Loqui CLI — talk to the text engine.
//!
//! Usage:
//!   loqui ask "what services do you offer"
//!   loqui chat
//!   loqui analyze "John Smith from Acme Corp emailed me"
//!   loqui ingest notes.txt
//!   loqui bench

use std::fs;
use std::io::{self, BufRead, Write};
use std::time::Instant;

use clap::{Parser, Subcommand};

use loqui::analysis;
use loqui::engine::{EngineConfig, TextEngine};
use loqui::ingest;

#[derive(Parser)]
#[command(name = "loqui", version, about = "Loqui — self-contained conversational text engine")]
struct Cli {
    /// Random seed
    #[arg(long, default_value = "42")]
    seed: u64,
    /// Translate responses into this language (es, fr, de)
    #[arg(long)]
    language: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a single question and print the response
    Ask {
        /// The question text
        query: String,
        /// Use the word-by-word long-form generator instead
        #[arg(long)]
        long: bool,
    },
    /// Interactive conversation shell
    Chat,
    /// Print the analysis bundle for a query without responding
    Analyze {
        /// The query text
        query: String,
    },
    /// Ingest a text, CSV, or JSON file and report on it
    Ingest {
        /// Path to the file
        file: String,
    },
    /// Print conversation starter suggestions
    Suggest,
    /// Run built-in benchmark
    Bench,
}

fn main() {
    let cli = Cli::parse();

    let config = EngineConfig {
        seed: cli.seed,
        ..EngineConfig::default()
    };
    let mut engine = match TextEngine::new(config) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Engine init failed: {}", e);
            std::process::exit(1);
        }
    };

    let language = cli.language.as_deref();
    match cli.command {
        Commands::Ask { query, long } => cmd_ask(&mut engine, &query, long, language),
        Commands::Chat => cmd_chat(&mut engine, language),
        Commands::Analyze { query } => cmd_analyze(&engine, &query),
        Commands::Ingest { file } => cmd_ingest(&mut engine, &file),
        Commands::Suggest => cmd_suggest(&engine),
        Commands::Bench => cmd_bench(&mut engine),
    }
}

fn cmd_ask(engine: &mut TextEngine, query: &str, long: bool, language: Option<&str>) {
    let response = if long {
        engine.elaborate(query)
    } else {
        engine.handle_user_input(query, language)
    };
    match response {
        Ok(text) => {
            if let Some(a) = engine.last_analysis() {
                eprintln!("[analysis] {}", a.analysis);
            }
            print_typed(engine, &text);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_chat(engine: &mut TextEngine, language: Option<&str>) {
    println!("Loqui interactive shell. Type 'quit' to exit, 'again' to regenerate.");
    println!("Try one of these:");
    for suggestion in engine.conversation_suggestions() {
        println!("  - {}", suggestion);
    }

    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("Read error: {}", e);
                break;
            }
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "exit" {
            break;
        }

        let result = if input == "again" {
            engine.regenerate_response()
        } else {
            engine.handle_user_input(input, language)
        };
        match result {
            Ok(text) => print_typed(engine, &text),
            Err(e) => eprintln!("Error: {}", e),
        }
    }
    println!("Goodbye.");
}

fn cmd_analyze(engine: &TextEngine, query: &str) {
    let memory: Vec<String> = engine.memory().cloned().collect();
    let a = analysis::understand(query, engine.lexicon(), &memory);
    println!("intent:    {} (index {:?})", a.intent, a.intent_index);
    println!("confidence: {:.4}", a.confidence);
    println!("sentiment: {:+.1}", a.sentiment);
    println!("topics:    {:?}", a.topics);
    println!("keywords:  {:?}", a.keywords);
    println!("context:   {:.4}", a.context_relevance);
    for entity in &a.entities {
        println!("entity:    {} ({})", entity.text, entity.kind);
    }
}

fn cmd_ingest(engine: &mut TextEngine, path: &str) {
    let contents = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading {}: {}", path, e);
            std::process::exit(1);
        }
    };
    match ingest::process_attached_file(path, &contents, engine) {
        Ok(report) => print_typed(engine, &report),
        Err(e) => {
            eprintln!("Ingest error: {}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_suggest(engine: &TextEngine) {
    for suggestion in engine.conversation_suggestions() {
        println!("{}", suggestion);
    }
}

fn cmd_bench(engine: &mut TextEngine) {
    let queries = [
        "hello there",
        "what services do you offer",
        "tell me about your design process",
        "I love the amazing work you did on branding",
        "how much does a website cost",
    ];
    println!("vocabulary: {} words", engine.lexicon().vocabulary().len());
    println!("embeddings: {} vectors", engine.embeddings().len());

    let start = Instant::now();
    for query in &queries {
        let t = Instant::now();
        match engine.handle_user_input(query, None) {
            Ok(text) => println!(
                "{:>7.1?}  {} -> {} chars",
                t.elapsed(),
                query,
                text.chars().count()
            ),
            Err(e) => eprintln!("[bench] '{}' failed: {}", query, e),
        }
    }
    println!("total: {:.1?}", start.elapsed());
}

fn print_typed(engine: &TextEngine, text: &str) {
    engine.type_out(text, |ch| {
        print!("{}", ch);
        let _ = io::stdout().flush();
    });
    println!();
}
