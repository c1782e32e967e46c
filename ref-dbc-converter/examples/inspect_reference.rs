//! Inspect a reference file: header fields, entry count and parsed messages
//!
//! Usage: cargo run --example inspect_reference -- <file.ref>

use ref_dbc_converter::Converter;
use std::fs::File;
use std::path::PathBuf;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let Some(path) = std::env::args().nth(1).map(PathBuf::from) else {
        eprintln!("Usage: inspect_reference <file.ref>");
        std::process::exit(1);
    };

    let converter = Converter::new();
    let file = match File::open(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("✗ Cannot open {:?}: {}", path, e);
            std::process::exit(1);
        }
    };

    let contents = match converter.read_container(file) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("✗ Error: {}", e);
            std::process::exit(1);
        }
    };

    println!("Header:  {}", contents.header);
    println!("Serial:  {}", contents.serial);
    println!("Entries: {}", contents.entry_count);
    println!("Lines:   {}", contents.lines.len());

    let parsed = converter.build_database(&contents.lines);

    println!("\nMessages:");
    println!("─────────────────────────");
    for msg in parsed.database.messages_sorted() {
        println!(
            "  {:>6} (0x{:03X})  dlc {:2}  {:3} signal(s)",
            msg.id,
            msg.id,
            msg.dlc,
            msg.signals.len()
        );
    }

    let warnings: Vec<_> = contents.warnings.iter().chain(parsed.warnings.iter()).collect();
    if !warnings.is_empty() {
        println!("\nWarnings ({}):", warnings.len());
        for w in warnings {
            println!("  ⚠ {}", w);
        }
    }
}
