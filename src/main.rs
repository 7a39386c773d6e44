use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, error, trace, warn};

use parmap::benchmark;
use parmap::config::{Config, ConfigLoader, LoadedConfig};
use parmap::error::{ErrorCode, ErrorExt, ParmapError};
use parmap::transforms::{brighten, pixel_label, sample_pixels, square};
use parmap::ParallelMapper;

/// Elements echoed by `run`; the brightened block also shows the last element
const BRIGHTENED_SAMPLES: [usize; 3] = [0, 1, 100];
const LABEL_SAMPLES: [usize; 3] = [0, 1, 100];
const SQUARE_SAMPLES: [usize; 3] = [0, 1, 10];

/// Order-preserving parallel map over a fixed worker budget
#[derive(Parser)]
#[command(name = "parmap")]
#[command(about = "Parallel map demo and benchmark", long_about = None)]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Brighten, label and square sample pixels in parallel
    Run {
        /// Worker threads (default: configuration, then CPU count)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Number of sample pixels
        #[arg(short, long)]
        size: Option<usize>,

        /// Make the brighten transform fail at this element
        #[arg(long)]
        fail_at: Option<usize>,
    },
    /// Compare sequential and parallel brighten timings
    Bench {
        /// Worker threads (default: configuration, then CPU count)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Number of sample pixels
        #[arg(short, long)]
        size: Option<usize>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the resolved configuration
    Config,
}

fn main() {
    let cli = Cli::parse();

    let LoadedConfig { config, ignored } = match ConfigLoader::new().load(cli.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            std::process::exit(e.exit_code());
        }
    };

    let log_level = match cli.verbose {
        0 => config.effective_log_level().to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(io::stderr)
        .with_target(cli.verbose >= 2) // Show target module for -vv and above
        .with_thread_ids(cli.verbose >= 3) // Show thread IDs for -vvv
        .with_line_number(cli.verbose >= 3) // Show line numbers for -vvv
        .init();

    for skipped in &ignored {
        warn!("{}", skipped);
    }

    debug!("parmap started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());

    let result = match cli.command {
        Commands::Run {
            workers,
            size,
            fail_at,
        } => run_samples(&config, workers, size, fail_at),
        Commands::Bench {
            workers,
            size,
            json,
        } => run_bench(&config, workers, size, json),
        Commands::Config => show_config(&config),
    };

    if let Err(e) = result {
        error!("Fatal error: {:#}", e);
        match e.downcast_ref::<ParmapError>() {
            Some(err) => {
                eprintln!("Error: {}", err.user_message());
                std::process::exit(err.exit_code());
            }
            None => {
                eprintln!("Error: {e:#}");
                std::process::exit(1);
            }
        }
    }
}

fn mapper_for(config: &Config, workers: Option<usize>) -> ParallelMapper {
    match workers {
        Some(n) => ParallelMapper::with_workers(n),
        None => ParallelMapper::from_config(config),
    }
}

fn run_samples(
    config: &Config,
    workers: Option<usize>,
    size: Option<usize>,
    fail_at: Option<usize>,
) -> anyhow::Result<()> {
    let size = size.unwrap_or_else(|| config.effective_sample_size());
    let mapper = mapper_for(config, workers);
    let pixels = sample_pixels(size);

    if let Some(index) = fail_at {
        if index >= size {
            return Err(ParmapError::validation_with_code(
                ErrorCode::VALIDATION_OUT_OF_RANGE,
                format!("must be below the sample size {size}"),
                Some("fail-at".to_string()),
            )
            .into());
        }
    }

    let failing_pixel = fail_at.and_then(|i| pixels.get(i).copied());
    let brightened = mapper
        .try_map(&pixels, |pixel| match failing_pixel {
            Some(bad) if *pixel == bad => Err(format!("pixel {pixel} rejected")),
            _ => Ok(brighten(pixel)),
        })
        .map_err(ParmapError::from)?;
    let labels = mapper.map(&pixels, pixel_label);
    let squares = mapper.map(&pixels, square);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_samples(&mut out, &brightened, &labels, &squares)
        .to_execution_error("Cannot write results")?;
    writeln!(
        out,
        "Processed {} elements with {} threads",
        pixels.len(),
        mapper.worker_count()
    )
    .to_execution_error("Cannot write results")?;

    Ok(())
}

fn write_samples(
    out: &mut impl Write,
    brightened: &[i32],
    labels: &[String],
    squares: &[i64],
) -> io::Result<()> {
    let tail = brightened.len().checked_sub(1);
    let brightened_at = BRIGHTENED_SAMPLES
        .into_iter()
        .chain(tail.filter(|last| !BRIGHTENED_SAMPLES.contains(last)));

    writeln!(out, "// brightened")?;
    for i in brightened_at {
        if let Some(value) = brightened.get(i) {
            writeln!(out, "brightened[{i}] = {value}")?;
        }
    }

    writeln!(out, "// labels")?;
    for i in LABEL_SAMPLES {
        if let Some(label) = labels.get(i) {
            writeln!(out, "labels[{i}] = \"{label}\"")?;
        }
    }

    writeln!(out, "// squares")?;
    for i in SQUARE_SAMPLES {
        if let Some(value) = squares.get(i) {
            writeln!(out, "squares[{i}] = {value}")?;
        }
    }

    Ok(())
}

fn run_bench(
    config: &Config,
    workers: Option<usize>,
    size: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let size = size.unwrap_or_else(|| config.effective_sample_size());
    let mapper = mapper_for(config, workers);
    let pixels = sample_pixels(size);

    let report = benchmark::compare(&mapper, &pixels, brighten)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to encode report")?
        );
    } else {
        print!("{}", report.render());
    }
    Ok(())
}

fn show_config(config: &Config) -> anyhow::Result<()> {
    let rendered = config.to_toml_string()?;
    let effective = ParallelMapper::from_config(config);

    print!("{rendered}");
    println!("# effective workers: {}", effective.worker_count());
    println!("# effective sample_size: {}", config.effective_sample_size());
    Ok(())
}
