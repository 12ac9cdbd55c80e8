//! huff CLI - compress and decompress files with tree_huff.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{ArgAction, Parser, Subcommand};
use log::{info, warn, LevelFilter};

use tree_huff::{BitReader, BitWriter};

const EXTENSION: &str = "hf";

/// Huffman file compressor with a self-describing tree header.
#[derive(Parser, Debug)]
#[command(name = "huff")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    mode: Mode,

    /// Show more detail (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Overwrite the output file if it exists
    #[arg(short, long, global = true)]
    force: bool,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Compress INPUT (default output: INPUT.hf)
    Compress {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },
    /// Decompress INPUT (default output: INPUT without .hf, or INPUT.out)
    Decompress {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },
}

fn compressed_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".");
    name.push(EXTENSION);
    PathBuf::from(name)
}

fn decompressed_path(input: &Path) -> PathBuf {
    if input.extension().is_some_and(|ext| ext == EXTENSION) {
        input.with_extension("")
    } else {
        let mut name = input.as_os_str().to_owned();
        name.push(".out");
        PathBuf::from(name)
    }
}

type FileSink = BitWriter<BufWriter<File>>;

// both paths must exist to compare equal
fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn open_output(
    input: &Path,
    path: &Path,
    force: bool,
) -> Result<FileSink, Box<dyn std::error::Error>> {
    if same_file(input, path) {
        return Err(format!("{} is the same file as the input", path.display()).into());
    }
    if path.exists() && !force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )
        .into());
    }
    Ok(BitWriter::new(BufWriter::new(File::create(path)?)))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let start = Instant::now();
    match args.mode {
        Mode::Compress { input, output } => {
            let output = output.unwrap_or_else(|| compressed_path(&input));
            let mut source = BitReader::new(BufReader::new(File::open(&input)?));
            let mut sink = open_output(&input, &output, args.force)?;

            let stats = match tree_huff::compress(&mut source, &mut sink) {
                Ok(stats) => stats,
                Err(e) => {
                    drop(sink);
                    discard(&output);
                    return Err(e.into());
                }
            };

            let ratio = if stats.bytes_in == 0 {
                0.0
            } else {
                stats.bytes_out() as f64 / stats.bytes_in as f64 * 100.0
            };
            info!(
                "{} -> {}: {} bytes -> {} bytes ({:.1}%), {} symbols in {:.2?}",
                input.display(),
                output.display(),
                stats.bytes_in,
                stats.bytes_out(),
                ratio,
                stats.leaves,
                start.elapsed()
            );
        }
        Mode::Decompress { input, output } => {
            let output = output.unwrap_or_else(|| decompressed_path(&input));
            let mut source = BitReader::new(BufReader::new(File::open(&input)?));
            let mut sink = open_output(&input, &output, args.force)?;

            let stats = match tree_huff::decompress(&mut source, &mut sink) {
                Ok(stats) => stats,
                Err(e) => {
                    drop(sink);
                    discard(&output);
                    return Err(e.into());
                }
            };

            info!(
                "{} -> {}: {} bytes in {:.2?}",
                input.display(),
                output.display(),
                stats.bytes_out,
                start.elapsed()
            );
        }
    }

    Ok(())
}

// partial output is useless once a stream fails
fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        warn!("could not remove partial output {}: {}", path.display(), e);
    }
}
