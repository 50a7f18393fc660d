//! `anchorhash`: inspect bucket assignments for an operation history.
//!
//! # Usage
//!
//! ```text
//! anchorhash -c 10 -w 8 lookup 1 2 3             # assigned buckets
//! anchorhash -c 7 --ops r6,r5,r1,r0 lookup --path 5
//! anchorhash -c 10 -w 5 distribution -n 1000000  # load per bucket
//! anchorhash --width compact -c 7 --ops r6,a state
//! ```

use std::str::FromStr;

use anchorhash::{Anchor, AnchorBuilder, BucketId, RemovePolicy};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::{rngs::StdRng, RngCore, SeedableRng};
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "anchorhash",
    version,
    about = "Inspect AnchorHash bucket assignments"
)]
struct Cli {
    /// Bucket id width: `wide` (u32) or `compact` (u16, up to 65536 buckets).
    #[arg(long, global = true, default_value_t = Width::Wide)]
    width: Width,

    /// Removal policy: `strict` or `lenient`. Defaults to the width's policy.
    #[arg(long, global = true)]
    policy: Option<RemovePolicy>,

    /// Total number of buckets.
    #[arg(short, long, global = true, default_value_t = 10)]
    capacity: usize,

    /// Initially working buckets. Defaults to the capacity.
    #[arg(short, long, global = true)]
    working: Option<usize>,

    /// Operation history applied after construction, e.g. `r3,r5,a`.
    ///
    /// `r<id>` removes bucket `id`, `a` adds back the last removed bucket.
    #[arg(long, global = true, value_delimiter = ',')]
    ops: Vec<Op>,

    /// Log level used when `RUST_LOG` is not set.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the bucket assigned to each key.
    Lookup {
        /// Keys to look up.
        #[arg(required = true)]
        keys: Vec<u64>,

        /// Also print every bucket visited on the way.
        #[arg(long)]
        path: bool,
    },
    /// Count assignments over a key sample and report load balance.
    Distribution {
        /// Number of keys to sample.
        #[arg(short = 'n', long, default_value_t = 1_000_000)]
        keys: u64,

        /// Draw uniform random keys from this seed instead of `0..n`.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the anchor's internal arrays.
    State,
}

#[derive(Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
enum Width {
    Wide,
    Compact,
}

/// One step of the `--ops` history
#[derive(Clone, Copy, Debug)]
enum Op {
    Remove(usize),
    Add,
}

impl FromStr for Op {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "a" => Ok(Op::Add),
            op => match op.strip_prefix('r').map(str::parse) {
                Some(Ok(bucket)) => Ok(Op::Remove(bucket)),
                _ => Err(format!("expected `a` or `r<bucket>`, got `{op}`")),
            },
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.width {
        Width::Wide => run::<u32>(&cli),
        Width::Compact => run::<u16>(&cli),
    }
}

fn init_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run<T: BucketId>(cli: &Cli) -> Result<()> {
    let anchor = build::<T>(cli)?;
    match &cli.command {
        Command::Lookup { keys, path } => lookup(&anchor, keys, *path),
        Command::Distribution { keys, seed } => distribution(&anchor, *keys, *seed)?,
        Command::State => state(&anchor),
    }
    Ok(())
}

/// Construct the anchor and replay the `--ops` history onto it.
fn build<T: BucketId>(cli: &Cli) -> Result<Anchor<T>> {
    let mut builder = AnchorBuilder::new();
    if let Some(working) = cli.working {
        builder.working(working);
    }
    if let Some(policy) = cli.policy {
        builder.remove_policy(policy);
    }
    let mut anchor = builder
        .build::<T>(cli.capacity)
        .with_context(|| format!("building {} anchor", cli.width))?;

    for (step, op) in cli.ops.iter().enumerate() {
        match *op {
            Op::Remove(bucket) => {
                if bucket >= anchor.capacity() {
                    bail!(
                        "step {step}: bucket {bucket} is out of range for capacity {}",
                        anchor.capacity()
                    );
                }
                anchor
                    .remove_bucket(T::from_index(bucket))
                    .with_context(|| format!("step {step}: removing bucket {bucket}"))?;
            }
            Op::Add => {
                let bucket = anchor
                    .add_bucket()
                    .with_context(|| format!("step {step}: adding a bucket"))?;
                debug!(step, %bucket, "history added bucket");
            }
        }
    }
    Ok(anchor)
}

fn lookup<T: BucketId>(anchor: &Anchor<T>, keys: &[u64], show_path: bool) {
    let mut path = Vec::new();
    for &key in keys {
        if show_path {
            path.clear();
            path = anchor.get_path(key, path);
            let hops: Vec<String> = path.iter().map(ToString::to_string).collect();
            println!("{key}\t{}\t{}", anchor.get_bucket(key), hops.join(" -> "));
        } else {
            println!("{key}\t{}", anchor.get_bucket(key));
        }
    }
}

fn distribution<T: BucketId>(anchor: &Anchor<T>, keys: u64, seed: Option<u64>) -> Result<()> {
    if keys == 0 {
        bail!("distribution needs at least one key");
    }
    let mut counts = vec![0_u64; anchor.capacity()];
    let mut path = Vec::with_capacity(64);
    let mut hops = 0_usize;
    let mut rng = seed.map(StdRng::seed_from_u64);

    for n in 0..keys {
        let key = rng.as_mut().map_or(n, |rng| rng.next_u64());
        path.clear();
        path = anchor.get_path(key, path);
        hops += path.len();
        if let Some(&bucket) = path.last() {
            counts[bucket.index()] += 1;
        }
    }

    let expected = keys as f64 / anchor.len().max(1) as f64;
    let mut deviation = 0.0_f64;
    println!("bucket\tkeys\tshare");
    for &bucket in anchor.working_buckets() {
        let count = counts[bucket.index()];
        deviation = deviation.max((count as f64 - expected).abs() / expected);
        println!("{bucket}\t{count}\t{:.4}", count as f64 / keys as f64);
    }
    println!("max deviation\t{:.4}", deviation);
    println!(
        "mean path\t{:.4}\t(1 + ln(C/N) = {:.4})",
        hops as f64 / keys as f64,
        1.0 + (anchor.capacity() as f64 / anchor.len().max(1) as f64).ln()
    );
    Ok(())
}

fn state<T: BucketId>(anchor: &Anchor<T>) {
    let row = |values: &[T]| {
        values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    };
    println!("capacity  {}", anchor.capacity());
    println!("working   {}", anchor.len());
    println!("policy    {}", anchor.remove_policy());
    println!("status    {}", row(anchor.status()));
    println!("order     {}", row(anchor.order()));
    println!("location  {}", row(anchor.location()));
    println!("successor {}", row(anchor.successor()));
    println!("removed   {}", row(anchor.removed()));
}
