use clap::{Args, Parser, Subcommand, ValueEnum};

use std::any::Any;

use ark_bn254::{Fr, G1Projective};
use ark_std::{test_rng, UniformRand};
use sparse_core::SparseVector;
use tracing_chrome::ChromeLayerBuilder;
use tracing::Subscriber;
use tracing_subscriber::fmt::{
    self,
    format::{Compact, DefaultFields, Format as FmtFormat, FmtSpan},
};
use tracing_subscriber::{prelude::*, registry::LookupSpan, EnvFilter};

/// Profile sparse vector workloads.
#[derive(Parser, Debug)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Profile(ProfileArgs),
}

#[derive(Args, Debug, Clone)]
struct ProfileArgs {
    /// Output formats
    #[clap(short, long, value_enum)]
    format: Option<Vec<Format>>,

    /// Workload to run
    #[clap(long, value_enum)]
    name: BenchType,

    /// Domain size to use (as 2^scale)
    #[clap(short, long, default_value_t = 16)]
    scale: usize,

    /// Fraction of positions holding a non-identity value
    #[clap(short, long, default_value_t = 0.1)]
    density: f64,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
enum BenchType {
    Accumulate,
    AccumulateMsm,
    Serialize,
}

#[derive(Debug, Clone, ValueEnum, PartialEq)]
enum Format {
    Default,
    Chrome,
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Commands::Profile(args) => trace(args),
    }
}

/// Compact stdout layer without target, file or thread decorations.
fn compact_layer<S>() -> fmt::Layer<S, DefaultFields, FmtFormat<Compact>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .compact()
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_thread_names(false)
}

fn trace(args: ProfileArgs) {
    let log_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let mut layers = vec![compact_layer().with_filter(log_filter).boxed()];
    let mut guards: Vec<Box<dyn Any>> = vec![];

    let formats = args.format.as_deref().unwrap_or_default();
    if formats.contains(&Format::Default) {
        layers.push(compact_layer().with_span_events(FmtSpan::CLOSE).boxed());
    }
    if formats.contains(&Format::Chrome) {
        let (chrome_layer, guard) = ChromeLayerBuilder::new().include_args(true).build();
        layers.push(chrome_layer.boxed());
        guards.push(Box::new(guard));
        tracing::info!("Writing a trace-<timestamp>.json chrome trace, viewable in https://ui.perfetto.dev/");
    }

    tracing_subscriber::registry().with(layers).init();

    let span = tracing::info_span!("Profile", name = ?args.name, scale = args.scale);
    span.in_scope(|| {
        run(&args);
        tracing::info!("Profile Complete");
    });
}

fn run(args: &ProfileArgs) {
    let mut rng = test_rng();
    let domain_size = 1usize << args.scale;
    let vector = SparseVector::<G1Projective>::random(domain_size, args.density, &mut rng);
    tracing::info!(
        "domain size {domain_size}, {} entries, {} bits",
        vector.len(),
        vector.size_in_bits()
    );

    match args.name {
        BenchType::Accumulate | BenchType::AccumulateMsm => {
            // Fold in four equal windows, feeding each residual into the next.
            let window = domain_size.div_ceil(4);
            let mut accumulated = Vec::new();
            let mut residual = vector;
            while residual.domain_size() > 0 {
                let len = window.min(residual.domain_size());
                let weights: Vec<Fr> = (0..len).map(|_| Fr::rand(&mut rng)).collect();
                let (value, rest) = if args.name == BenchType::AccumulateMsm {
                    residual.accumulate_msm(&weights, 0)
                } else {
                    residual.accumulate(&weights, 0)
                };
                accumulated.push(value);
                residual = rest;
            }
            tracing::info!("accumulated {} windows", accumulated.len());
        }
        BenchType::Serialize => match vector.to_bytes() {
            Ok(bytes) => match SparseVector::<G1Projective>::from_bytes(&bytes) {
                Ok(decoded) => tracing::info!(
                    "round-tripped {} bytes, equal: {}",
                    bytes.len(),
                    decoded == vector
                ),
                Err(err) => tracing::error!("decoding failed: {err}"),
            },
            Err(err) => tracing::error!("encoding failed: {err}"),
        },
    }
}
