use areacomp_rs::{AreaComp, AreaCompConfig, Compressor};
use std::env;
use std::fs;

/// Compresses a file and prints grammar statistics.
///
/// Usage: cargo run --example main <filename> [config-json]
///
/// The optional configuration is inline JSON, e.g. `'{"area": "width-first"}'`.
fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <filename> [config-json]", args[0]);
        std::process::exit(1);
    }

    let filename = &args[1];
    let data = fs::read(filename).unwrap_or_else(|_| {
        eprintln!("File \"{}\" not found.", filename);
        std::process::exit(1);
    });

    let config = match args.get(2) {
        Some(json) => AreaCompConfig::from_json(json).unwrap_or_else(|err| {
            eprintln!("{err}");
            std::process::exit(1);
        }),
        None => AreaCompConfig::default(),
    };

    let comp = AreaComp::with_config(config);
    let (grammar, run) = comp.compress_with_stats(&data);

    // Verify by reconstructing
    if let Some(position) = grammar
        .iter()
        .zip(&data)
        .position(|(expanded, &original)| expanded != original)
    {
        eprintln!("Mismatch at position {}", position);
    }
    if grammar.iter().count() != data.len() {
        eprintln!("Grammar length differs from file length");
    }

    let stats = grammar.stats();

    println!("=== {} ===", comp.name());
    println!("Candidates scored: {}", run.candidates);
    println!("Candidates accepted: {}", run.accepted);
    println!(
        "Candidates rejected: {} (boundary), {} (aliased)",
        run.rejected_boundary, run.rejected_aliased
    );

    println!("\n=== Statistics ===");
    println!("Total bytes read: {}", stats.input_length);
    println!("Symbols in grammar: {}", stats.grammar_symbols);
    println!("Rules created: {}", stats.num_rules);
    println!("Grammar depth: {}", stats.depth);
    println!("Average rule length: {:.2}", grammar.average_rule_length());
    println!("Compression ratio: {:.2}%", stats.compression_ratio());
}
