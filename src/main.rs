//! Main Program for Tileshuffle
//! Run with `--help` for more instruction

// Copyright (C) 2023 Dheatly23
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Error};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tileshuffle::codec::Compression;
use tileshuffle::{ConfigBuilder, Pipeline, ShuffleMode};

#[derive(Parser, Debug)]
#[command(author, version)]
struct App {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Shuffle the tiles of an image
    #[command(alias = "encode")]
    Shuffle(ShuffleArgs),

    /// Put the tiles of a shuffled image back in place
    #[command(alias = "decode")]
    Restore(RestoreArgs),
}

#[derive(clap::Args, Debug)]
struct GridArgs {
    /// Input file (PNG or JPEG)
    input: PathBuf,

    /// Number of tile columns (must divide the image width)
    xsplit: u32,

    /// Number of tile rows (must divide the image height)
    ysplit: u32,

    /// Output file or directory
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// PNG compression level
    #[arg(long, value_enum, default_value_t = Level::Default)]
    compression: Level,
}

#[derive(clap::Args, Debug)]
struct ShuffleArgs {
    #[command(flatten)]
    grid: GridArgs,

    /// Random seed
    #[arg(long)]
    seed: Option<String>,
}

#[derive(clap::Args, Debug)]
struct RestoreArgs {
    #[command(flatten)]
    grid: GridArgs,

    /// Seed used for shuffling. Without it, tiles are matched by their borders.
    #[arg(long)]
    seed: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Level {
    Fast,
    Default,
    Best,
}

impl From<Level> for Compression {
    fn from(l: Level) -> Self {
        match l {
            Level::Fast => Self::Fast,
            Level::Default => Self::Default,
            Level::Best => Self::Best,
        }
    }
}

/// `<stem><suffix>.png` next to `input`, or inside `output` if it is a directory.
fn output_path(input: &Path, output: Option<PathBuf>, suffix: &str) -> Result<PathBuf, Error> {
    let mut name = input
        .file_stem()
        .with_context(|| format!("{} has no file name", input.display()))?
        .to_owned();
    name.push(suffix);
    name.push(".png");

    Ok(match output {
        None => input.with_file_name(name),
        Some(dir) if dir.is_dir() => dir.join(name),
        Some(path) => path,
    })
}

fn run(args: GridArgs, seed: Option<String>, suffix: &str, restore: bool) -> Result<(), Error> {
    let output = output_path(&args.input, args.output, suffix)?;
    info!("From: {}", args.input.display());
    info!("To: {}", output.display());

    let mode = match seed {
        Some(s) => ShuffleMode::from_passphrase(s),
        None => ShuffleMode::Entropy,
    };
    let config = ConfigBuilder::new()
        .split(args.xsplit, args.ysplit)
        .shuffle(mode)
        .compression(args.compression.into())
        .build();
    let pipeline = Pipeline::new(config);

    let input = fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let out = if restore {
        pipeline.restore_bytes(&input)?
    } else {
        pipeline.shuffle_bytes(&input)?
    };
    fs::write(&output, out).with_context(|| format!("failed to write {}", output.display()))?;

    Ok(())
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match App::parse().command {
        Command::Shuffle(a) => run(a.grid, a.seed, "_shuffled", false),
        Command::Restore(a) => run(a.grid, a.seed, "_restored", true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        let p = output_path(Path::new("dir/cat.jpg"), None, "_shuffled").unwrap();
        assert_eq!(p, Path::new("dir/cat_shuffled.png"));

        let p = output_path(
            Path::new("dir/cat.jpg"),
            Some(PathBuf::from("out/x.png")),
            "_shuffled",
        )
        .unwrap();
        assert_eq!(p, Path::new("out/x.png"));

        let dir = std::env::temp_dir();
        let p = output_path(Path::new("cat.png"), Some(dir.clone()), "_restored").unwrap();
        assert_eq!(p, dir.join("cat_restored.png"));
    }

    #[test]
    fn test_cli_parses() {
        let app = App::try_parse_from([
            "tileshuffle",
            "encode",
            "a.png",
            "4",
            "2",
            "--seed",
            "x",
        ])
        .unwrap();
        match app.command {
            Command::Shuffle(a) => {
                assert_eq!((a.grid.xsplit, a.grid.ysplit), (4, 2));
                assert_eq!(a.seed.as_deref(), Some("x"));
            }
            Command::Restore(_) => panic!("expected shuffle"),
        }
    }
}
