//! metapack CLI
//!
//! Hashes a file or directory once and writes `NAME.meta4` and
//! `NAME.torrent` next to it.

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use metapack::{
    DEFAULT_READ_BUFFER_SIZE, DEFAULT_TRACKER, FileEntry, LogProgress, Progress, RunConfig,
    Throughput, format_bytes, package,
};

/// Create a Metalink document and a torrent from one pass over the input
#[derive(Parser)]
#[command(name = "metapack")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// File or directory to package
    path: PathBuf,

    /// Mirror base URL (can be specified multiple times, first has highest priority)
    #[arg(short, long = "mirrors", value_name = "URL")]
    mirrors: Vec<String>,

    /// Tracker announce URL
    #[arg(long, default_value = DEFAULT_TRACKER, value_name = "URL")]
    tracker: String,

    /// Directory to write the documents to (defaults to the input's parent)
    #[arg(short, long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Sign the Metalink document with this GnuPG key id
    #[arg(long, visible_aliases = ["pgp", "gpg"], value_name = "KEY_ID")]
    sign: Option<String>,

    /// Read buffer size in bytes
    #[arg(long, default_value_t = DEFAULT_READ_BUFFER_SIZE, value_name = "BYTES")]
    buffer_size: usize,

    /// Enable debug output
    #[arg(short, long)]
    verbose: bool,

    /// Log progress lines instead of drawing a progress bar
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// Draws an indicatif bar over the bytes hashed.
struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    fn new() -> Self {
        let style = ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta}) {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        Self {
            bar: ProgressBar::hidden().with_style(style),
        }
    }
}

impl Progress for BarProgress {
    fn start(&mut self, total_bytes: u64, _files: usize) {
        self.bar.set_length(total_bytes);
        self.bar.set_draw_target(indicatif::ProgressDrawTarget::stderr());
    }

    fn advance(&mut self, bytes: u64) {
        self.bar.inc(bytes);
    }

    fn file_done(&mut self, entry: &FileEntry, _stats: &Throughput) {
        self.bar.set_message(entry.path.clone());
    }

    fn finish(&mut self, stats: &Throughput) {
        self.bar.finish_with_message(format!(
            "{} in {:.2}s",
            format_bytes(stats.bytes),
            stats.elapsed.as_secs_f64()
        ));
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = RunConfig::new(&cli.path)
        .with_mirrors(cli.mirrors)
        .with_tracker(cli.tracker)
        .with_read_buffer_size(cli.buffer_size);
    if let Some(dir) = cli.out_dir {
        config = config.with_out_dir(dir);
    }
    if let Some(key) = cli.sign {
        config = config.with_signer(key);
    }
    if config.mirrors().is_empty() {
        warn!("no mirrors given; documents will list no download URLs");
    }

    let result = if cli.quiet || !std::io::stderr().is_terminal() {
        package(&config, LogProgress)
    } else {
        package(&config, BarProgress::new())
    };
    let out = result.with_context(|| format!("failed to package {}", cli.path.display()))?;

    println!("{}", out.metalink_path.display());
    println!("{}", out.torrent_path.display());
    Ok(())
}
