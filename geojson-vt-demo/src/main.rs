use std::{io, io::Write, path::PathBuf, process::ExitCode};

use clap::Parser;

use crate::job::{JobError, TileJob};

mod job;

/// Builds a single vector tile from a JSON tile job and prints it.
#[derive(Parser, Debug)]
#[command(name = "geojson-vt-demo", version, about)]
struct Args {
    /// Path to the tile job.
    job: PathBuf,
    /// Overrides the extent of the tile options.
    #[arg(long)]
    extent: Option<u32>,
    /// Prints normalized mercator coordinates instead of tile coordinates.
    #[arg(long)]
    no_transform: bool,
    #[arg(long)]
    pretty: bool,
}

fn run(args: Args) -> Result<(), JobError> {
    let mut job = TileJob::from_path(&args.job)?;
    if let Some(extent) = args.extent {
        job.options.extent = extent;
    }
    log::debug!("running {} with {:?}", args.job.display(), job.options);

    let tile = job.run(!args.no_transform)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.pretty {
        serde_json::to_writer_pretty(&mut out, &tile)?;
    } else {
        serde_json::to_writer(&mut out, &tile)?;
    }
    writeln!(out)?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
