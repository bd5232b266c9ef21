//! Example demonstrating board generation for the standard board types.
//!
//! This example shows how to:
//! - Pick a standard `BoardType` by sector count
//! - Stream every valid board to a file with `generate_to_file`
//! - Split a large run into shards, serially or fanned out with rayon
//! - Sample a single random board with `BoardSampler`
//!
//! # Usage
//!
//! ```sh
//! cargo run --release --example generate_boards -- --sectors 12
//! ```
//!
//! Bound the memory used per stage (boards held at once):
//!
//! ```sh
//! cargo run --release --example generate_boards -- --sectors 24 --chunk-size 100000
//! ```
//!
//! Produce one shard of a run split across four workers:
//!
//! ```sh
//! cargo run --release --example generate_boards -- --sectors 24 --shard 2/4
//! ```
//!
//! Run all four shards in parallel on this machine:
//!
//! ```sh
//! cargo run --release --example generate_boards -- --sectors 24 --all-shards 4
//! ```
//!
//! Sample one random board instead of enumerating them all:
//!
//! ```sh
//! cargo run --release --example generate_boards -- --sectors 18 --sample
//! ```

use std::{
    path::{Path, PathBuf},
    process,
    str::FromStr,
};

use clap::Parser;
use rayon::prelude::*;
use skysearch_generator::{BoardSampler, BoardType, GenerateConfig, GenerateReport, Shard};

#[derive(Debug, Clone, Copy)]
struct ShardArg(Shard);

impl FromStr for ShardArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("expected INDEX/COUNT with INDEX < COUNT, got {s:?}");
        let (index, count) = s.split_once('/').ok_or_else(invalid)?;
        let index = index.parse().map_err(|_| invalid())?;
        let count = count.parse().map_err(|_| invalid())?;
        Shard::new(index, count).map(Self).ok_or_else(invalid)
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Board size: 12, 18, or 24 sectors.
    #[arg(long, value_name = "COUNT", default_value_t = 12)]
    sectors: usize,

    /// Output file. Defaults to boards-<sectors>.txt.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Maximum boards held in memory per stage.
    #[arg(long, value_name = "COUNT")]
    chunk_size: Option<usize>,

    /// Generate one shard of a split run, written as INDEX/COUNT.
    #[arg(long, value_name = "INDEX/COUNT", conflicts_with = "all_shards")]
    shard: Option<ShardArg>,

    /// Generate every shard of a COUNT-way split in parallel.
    #[arg(long, value_name = "COUNT")]
    all_shards: Option<usize>,

    /// Print one random valid board instead of enumerating them all.
    #[arg(long, conflicts_with_all = ["output", "shard", "all_shards"])]
    sample: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let Some(board_type) = BoardType::standard(args.sectors) else {
        eprintln!("No standard board type has {} sectors (try 12, 18, or 24).", args.sectors);
        process::exit(2);
    };

    if args.sample {
        let board = BoardSampler::new(board_type).sample();
        println!("{board}");
        return;
    }

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("boards-{}.txt", args.sectors)));

    if let Some(count) = args.all_shards {
        if count == 0 {
            eprintln!("--all-shards must be at least 1.");
            process::exit(1);
        }
        run_all_shards(&board_type, &output, args.chunk_size, count);
        return;
    }

    let config = GenerateConfig {
        chunk_size: args.chunk_size,
        shard: args.shard.map(|shard| shard.0),
    };
    match board_type.generate_to_file(&output, &config) {
        Ok(report) => print_report(&report, 1),
        Err(err) => {
            eprintln!("Generation failed: {err}");
            process::exit(1);
        }
    }
}

fn run_all_shards(board_type: &BoardType, output: &Path, chunk_size: Option<usize>, count: usize) {
    let results = (0..count)
        .into_par_iter()
        .map(|index| {
            let mut path = output.as_os_str().to_owned();
            path.push(format!(".shard{index}"));
            let config = GenerateConfig {
                chunk_size,
                shard: Shard::new(index, count),
            };
            board_type.generate_to_file(&PathBuf::from(path), &config)
        })
        .collect::<Vec<_>>();

    let mut total = GenerateReport::default();
    for result in results {
        match result {
            Ok(report) => {
                total.num_boards += report.num_boards;
            }
            Err(err) => {
                eprintln!("Generation failed: {err}");
                process::exit(1);
            }
        }
    }
    print_report(&total, count);
}

fn print_report(report: &GenerateReport, shards: usize) {
    if shards > 1 {
        println!("Shards: {shards}");
    } else {
        for (stage, count) in report.stage_counts.iter().enumerate() {
            println!("Stage {}: {count} partial boards", stage + 1);
        }
    }
    println!("Boards: {}", report.num_boards);
}
