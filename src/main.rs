//! `matquery` command-line interface.

use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser as _;
use log::debug;
use matquery::{run, InputSource, Query, QueryConfig};
use matquery_core::Metric;

#[derive(clap::Parser)]
#[command(name = "matquery")]
#[command(about = "Nearest rows, closest and furthest row pairs, and k-means centroids of a matrix")]
struct Args {
    /// JSON file, or literal JSON text
    #[arg(short = 'j', long, global = true)]
    json_data: Option<String>,

    /// Headerless numeric CSV file
    #[arg(short = 'f', long, global = true)]
    csv_file: Option<PathBuf>,

    /// Parquet file in the dense or sparse matrix layout
    #[arg(short = 'p', long, global = true)]
    parquet_file: Option<PathBuf>,

    /// Sparse matrix as `row col value` lines
    #[arg(short = 's', long, global = true)]
    sparse_coo: Option<PathBuf>,

    /// Query configuration (JSON); flags override its values
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct PairOpts {
    /// Distance metric (euclidean, sqeuclidean, manhattan, chebyshev, cosine, canberra, braycurtis)
    #[arg(short, long)]
    metric: Option<String>,

    /// Print the distance after each pair
    #[arg(long)]
    distance: bool,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Print the matrix
    #[command(alias = "print_mat")]
    PrintMat,

    /// Print the input type and value
    Echo {
        #[arg(default_value = "1")]
        times: usize,
    },

    /// Row closest to ROW_I
    #[command(alias = "closest_to")]
    ClosestTo {
        row_i: usize,

        #[command(flatten)]
        opts: PairOpts,
    },

    /// The N closest distinct row pairs
    Closest {
        #[arg(default_value = "1")]
        n: usize,

        #[command(flatten)]
        opts: PairOpts,
    },

    /// The N furthest distinct row pairs
    Furthest {
        #[arg(default_value = "1")]
        n: usize,

        #[command(flatten)]
        opts: PairOpts,
    },

    /// N k-means centroids in canonical order
    Centroids {
        #[arg(default_value = "1")]
        n: usize,

        /// k-means seed
        #[arg(long)]
        seed: Option<u64>,

        /// k-means iteration cap
        #[arg(long)]
        max_iter: Option<usize>,
    },

    /// Write the matrix to OUT_DIR/NAME.parquet
    Convert { out_dir: PathBuf, name: String },
}

fn apply_pair_opts(config: QueryConfig, opts: &PairOpts) -> anyhow::Result<QueryConfig> {
    let mut config = config;
    if let Some(name) = &opts.metric {
        let metric: Metric = name
            .parse()
            .with_context(|| format!("invalid --metric '{}'", name))?;
        config = config.with_metric(metric);
    }
    if opts.distance {
        config = config.with_show_distance(true);
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let env = env_logger::Env::default().default_filter_or("warn");
    env_logger::Builder::from_env(env).init();

    let args = Args::parse();

    let source = InputSource::from_options(
        args.json_data,
        args.csv_file,
        args.parquet_file,
        args.sparse_coo,
    )?;

    let mut config = match &args.config {
        Some(path) => QueryConfig::from_json_file(path)
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => QueryConfig::default(),
    };

    let query = match args.command {
        Command::PrintMat => Query::PrintMat,
        Command::Echo { times } => Query::Echo { times },
        Command::ClosestTo { row_i, opts } => {
            config = apply_pair_opts(config, &opts)?;
            Query::ClosestTo { row: row_i }
        }
        Command::Closest { n, opts } => {
            config = apply_pair_opts(config, &opts)?;
            Query::Closest { n }
        }
        Command::Furthest { n, opts } => {
            config = apply_pair_opts(config, &opts)?;
            Query::Furthest { n }
        }
        Command::Centroids { n, seed, max_iter } => {
            if let Some(seed) = seed {
                config = config.with_seed(seed);
            }
            if let Some(max_iter) = max_iter {
                config = config.with_max_iter(max_iter);
            }
            Query::Centroids { n }
        }
        Command::Convert { out_dir, name } => Query::Convert { out_dir, name },
    };
    debug!("Input {} = {}", source.kind(), source.value());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(&query, &source, &config, &mut out)?;
    out.flush()?;
    Ok(())
}
