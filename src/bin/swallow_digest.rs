//! Print the digest of each argument, one per line, for building search
//! targets. With no arguments, reads lines from stdin.

use clap::Parser;
use std::io::{self, BufRead};
use swallow::io_utils::simple_cli_error;
use swallow::HashAlgorithm;

#[derive(Parser)]
struct Args {
    /// Hash algorithm: md5 or sha256
    #[arg(long, default_value = "md5")]
    algorithm: HashAlgorithm,
    /// Strings to hash
    inputs: Vec<String>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    if !args.inputs.is_empty() {
        for input in &args.inputs {
            println!("{}  {input}", args.algorithm.hex_digest(input.as_bytes()));
        }
        return Ok(());
    }

    for line in io::stdin().lock().lines() {
        let line = line.map_err(|e| simple_cli_error(&format!("reading stdin: {e}")))?;
        println!("{}  {line}", args.algorithm.hex_digest(line.as_bytes()));
    }
    Ok(())
}
