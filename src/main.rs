use clap::Parser;
use swallow::alphabet::PRINTABLE;
use swallow::io_utils::{simple_cli_error, swallow_cli_error};
use swallow::{
    tuning, Alphabet, Coordinator, CrackConfig, HashAlgorithm, Outcome, ProgressBarObserver,
    SearchSpec, TargetDigest, DEFAULT_WORKERS,
};

const BANNER: &str = r"
   _____                      _   _
  / ____|                    | | | |
 | (___   __      __   __ _  | | | |   ___   __      __
  \___ \  \ \ /\ / /  / _` | | | | |  / _ \  \ \ /\ / /
  ____) |  \ V  V /  | (_| | | | | | | (_) |  \ V  V /
 |_____/    \_/\_/    \__,_| |_| |_|  \___/    \_/\_/
";

/// Brute-force search for a string whose digest matches a target.
#[derive(Parser)]
#[command(name = "swallow", version)]
struct Args {
    /// Target digest in hex (case-insensitive)
    #[arg(short, long)]
    target: String,
    /// Minimum candidate length
    #[arg(short = 'm', long, default_value_t = 1)]
    min_length: usize,
    /// Maximum candidate length
    #[arg(short = 'M', long)]
    max_length: usize,
    /// Symbols to build candidates from; sorted and deduplicated.
    /// Defaults to printable ASCII without whitespace.
    #[arg(short, long)]
    alphabet: Option<String>,
    /// Number of worker threads (1-120)
    #[arg(short, long, default_value_t = DEFAULT_WORKERS)]
    workers: usize,
    /// Hash algorithm of the target: md5 or sha256
    #[arg(long, default_value = "md5")]
    algorithm: HashAlgorithm,
    /// Candidates per batch; derived from the worker count when omitted
    #[arg(long)]
    batch_size: Option<usize>,
    /// Candidates a worker accumulates before reporting progress
    #[arg(long)]
    update_threshold: Option<u64>,
    /// Print the final report as JSON on stdout
    #[arg(long)]
    json: bool,
    /// No banner and no progress bar
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    env_logger::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32, Box<dyn std::error::Error>> {
    let args = Args::parse();
    let chatty = !args.quiet && !args.json;
    if chatty {
        eprintln!("{BANNER}");
        eprintln!("Welcome to the Password Cracker ({} Mode)!", args.algorithm.to_string().to_uppercase());
    }

    let alphabet = Alphabet::sorted(args.alphabet.as_deref().unwrap_or(PRINTABLE))
        .map_err(|e| swallow_cli_error("invalid alphabet", e))?;
    let target = TargetDigest::parse(&args.target, args.algorithm.output_len())
        .map_err(|e| swallow_cli_error("invalid target", e))?;
    let spec = SearchSpec::new(target, alphabet, args.min_length, args.max_length)
        .map_err(|e| swallow_cli_error("invalid search", e))?;

    if !(1..=swallow::MAX_WORKERS).contains(&args.workers) {
        return Err(simple_cli_error(&format!(
            "Number of workers must be between 1 and {}",
            swallow::MAX_WORKERS
        ))
        .into());
    }
    let mut config = CrackConfig::for_workers(args.workers);
    if let Some(batch_size) = args.batch_size {
        config = config.with_batch_size(batch_size);
    }
    if let Some(threshold) = args.update_threshold {
        config = config.with_update_threshold(threshold);
    }
    let config = tuning::fit_to_host(config, &spec);

    if chatty {
        eprintln!("Using characters: {}", spec.alphabet);
        eprintln!("Using batch size: {} combinations per iteration.", config.batch_size);
    }

    let mut coordinator = Coordinator::new(spec, config).with_algorithm(args.algorithm);
    if chatty {
        coordinator = coordinator.with_observer(ProgressBarObserver::new());
    }

    let cancel = coordinator.cancel_handle();
    ctrlc::set_handler(move || {
        eprintln!("\nStopping... Please wait.");
        cancel.cancel();
    })
    .map_err(|e| simple_cli_error(&format!("failed to install Ctrl-C handler: {e}")))?;

    let report = coordinator
        .crack()
        .map_err(|e| swallow_cli_error("search failed", e))?;

    if args.json {
        let out_json = serde_json::json!({
            "outcome": report.outcome,
            "completed": report.completed,
            "total": report.total,
            "elapsed_ms": report.elapsed.as_millis() as u64,
            "workers": report.workers_started,
        });
        println!("{}", serde_json::to_string_pretty(&out_json)?);
    } else {
        report.print_summary();
        if let Outcome::Found(candidate) = &report.outcome {
            println!("{candidate}");
        }
    }

    Ok(match report.outcome {
        Outcome::Found(_) | Outcome::NotFound => 0,
        Outcome::Interrupted => 130,
    })
}
