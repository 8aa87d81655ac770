//! LRU store demo driver.
//!
//! `touch` replays a word sequence and prints the store after each touch;
//! `bench` fills a store with synthetic keys and reports timings. Without a
//! subcommand both run with their defaults.

use anyhow::Result;
use clap::{Parser, Subcommand};
use lru_store::LruStore;
use tracing::info;

mod bench;

/// Words touched when none are given on the command line.
const DEFAULT_WORDS: [&str; 6] = ["Terry", "Tee", "Dog", "Terry", "Car", "Terry"];

/// LRU store demo CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Store capacity (number of entries)
    #[arg(short, long, default_value_t = 5, global = true)]
    capacity: usize,
}

/// Subcommands for the CLI
#[derive(Subcommand, Debug)]
enum Commands {
    /// Touch each word in order and print the store after every touch
    Touch {
        /// Words to touch; defaults to a short fixed sequence
        words: Vec<String>,
    },

    /// Fill a store with unique synthetic keys and time it
    Bench {
        /// Number of synthetic keys to touch
        #[arg(long, default_value_t = 1_000_000)]
        size: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    info!(capacity = args.capacity, "starting lru-demo");

    match args.command {
        Some(Commands::Touch { words }) => print_touches(args.capacity, &words),
        Some(Commands::Bench { size }) => print_bench(args.capacity, size),
        None => {
            print_touches(args.capacity, &[])?;
            print_bench(args.capacity, 1_000_000)
        }
    }
}

fn print_touches(capacity: usize, words: &[String]) -> Result<()> {
    for line in render_touches(capacity, words)? {
        println!("{line}");
    }
    Ok(())
}

fn print_bench(capacity: usize, size: usize) -> Result<()> {
    let report = bench::run(capacity, size, &mut rand::thread_rng())?;
    println!(
        "Time taken to fill store with {} elements: {:?}",
        report.size, report.fill
    );
    println!(
        "Time taken to find element in store index: {:?}",
        report.lookup
    );
    Ok(())
}

/// Touches `words` (or the default sequence when empty) and returns the
/// store's rendering after each touch.
fn render_touches(capacity: usize, words: &[String]) -> Result<Vec<String>> {
    let mut store = LruStore::new(capacity)?;
    let words: Vec<&str> = if words.is_empty() {
        DEFAULT_WORDS.to_vec()
    } else {
        words.iter().map(String::as_str).collect()
    };

    let mut lines = Vec::with_capacity(words.len());
    for word in words {
        if let Some((evicted, _)) = store.touch(word, word) {
            info!(evicted, "store over capacity");
        }
        lines.push(store.to_string());
    }
    Ok(lines)
}
