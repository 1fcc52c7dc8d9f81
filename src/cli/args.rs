//! Command-line argument definitions

use clap::Args;

/// Arguments for the probe command
#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Input media file (repeat for multiple inputs)
    #[arg(short, long = "input", required = true)]
    pub inputs: Vec<String>,

    /// Output the inventory in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the mix command
#[derive(Args, Debug)]
pub struct MixArgs {
    /// Input media file (repeat for multiple inputs)
    #[arg(short, long = "input", required = true)]
    pub inputs: Vec<String>,

    /// Track selector, e.g. "0:0 0:1 1:c" or "0:va 1:s"
    #[arg(short, long)]
    pub tracks: String,

    /// Output file path; the extension picks the container
    #[arg(short, long)]
    pub output: String,

    /// Emit progress as JSON events instead of a console percentage
    #[arg(long)]
    pub json_progress: bool,
}
