use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sparse_fold::commands::{self, Encoding, Summary};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Writes a random sparse vector of G1 elements
    Generate {
        /// Output file
        out: PathBuf,
        /// Length of the dense vector the file represents
        #[arg(long, default_value_t = 1 << 12)]
        domain_size: usize,
        /// Fraction of positions holding a non-identity value
        #[arg(long, default_value_t = 0.1)]
        density: f64,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Use the whitespace-separated text encoding
        #[arg(long)]
        text: bool,
    },

    /// Prints the shape of a stored sparse vector
    Inspect {
        path: PathBuf,
        #[arg(long)]
        text: bool,
    },

    /// Folds a stored sparse vector against random scalar weights
    Accumulate {
        path: PathBuf,
        /// First dense position covered by the weights
        #[arg(long, default_value_t = 0)]
        offset: usize,
        /// Number of weights
        #[arg(long)]
        len: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Where to write the residual vector
        #[arg(long)]
        residual: Option<PathBuf>,
        #[arg(long)]
        text: bool,
    },
}

fn encoding(text: bool) -> Encoding {
    if text {
        Encoding::Text
    } else {
        Encoding::Binary
    }
}

fn print_summary(summary: &Summary) {
    println!("domain size:  {}", summary.domain_size);
    println!("entries:      {}", summary.len);
    println!("size in bits: {}", summary.size_in_bits);
    println!("valid:        {}", summary.valid);
}

fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Generate {
            out,
            domain_size,
            density,
            seed,
            text,
        } => {
            let summary = commands::generate(&out, domain_size, density, seed, encoding(text))?;
            print_summary(&summary);
        }
        Command::Inspect { path, text } => {
            print_summary(&commands::inspect(&path, encoding(text))?);
        }
        Command::Accumulate {
            path,
            offset,
            len,
            seed,
            residual,
            text,
        } => {
            let report = commands::accumulate(
                &path,
                offset,
                len,
                seed,
                encoding(text),
                residual.as_deref(),
            )?;
            println!("accumulated:  {}", report.accumulated);
            println!(
                "residual:     {} entries over domain {}",
                report.residual.len(),
                report.residual.domain_size()
            );
        }
    }
    Ok(())
}
