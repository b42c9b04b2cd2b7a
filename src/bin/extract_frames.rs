//! extract_frames - export one image topic of a sensor-log archive as
//! timestamped JPEG files

use anyhow::{anyhow, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;

use framesift::extract::{export_frames, FrameSource, SyntheticSource};

#[path = "../ui.rs"]
mod ui;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Archive location. `stub://` archives generate synthetic frames.
    #[arg(long, default_value = "stub://demo")]
    archive: String,
    /// Image topic to export.
    #[arg(long, default_value = "/camera/color/image_raw")]
    topic: String,
    /// Directory to write the frame files into.
    #[arg(long, default_value = "./converted")]
    export_dir: PathBuf,
    /// Number of frames emitted by `stub://` archives.
    #[arg(long, default_value_t = 10)]
    stub_frames: u64,
    /// UI mode for stderr progress (auto|plain|pretty)
    #[arg(long, default_value = "auto", value_name = "MODE")]
    ui: String,
}

fn open_source(args: &Args) -> Result<Box<dyn FrameSource>> {
    if args.archive.starts_with("stub://") {
        // One frame per second starting 2025-02-21 15:46:30 UTC.
        return Ok(Box::new(SyntheticSource::new(
            1_740_152_790_000_000_000,
            1_000_000_000,
            args.stub_frames,
        )));
    }
    Err(anyhow!(
        "no reader is built in for archive {}; adapt your log reader for topic {} to framesift::extract::FrameSource",
        args.archive,
        args.topic,
    ))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let is_tty = std::io::stderr().is_terminal();
    let stdout_is_tty = std::io::stdout().is_terminal();
    let ui = ui::Ui::from_args(Some(&args.ui), is_tty, !stdout_is_tty);

    let mut source = open_source(&args)?;
    let written = {
        let _stage = ui.stage("Export frames");
        export_frames(source.as_mut(), &args.export_dir)?
    };

    println!("exported {} frames to {}", written, args.export_dir.display());
    Ok(())
}
