//! Command implementations

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::args::{MixArgs, ProbeArgs};
use crate::engine::progress::ProgressSink;
use crate::engine::{ConsoleProgress, JsonProgress, Mixer};
use crate::model::TrackGroup;
use crate::planner::MixPlanner;
use crate::probe::TrackProber;
use crate::selector;
use crate::utils::time::format_timestamp;

/// Execute the probe command
pub async fn probe(tool: &str, args: ProbeArgs) -> Result<()> {
    info!("Starting probe operation");

    let prober = TrackProber::new(tool);
    let groups = prober
        .probe(&args.inputs)
        .await
        .context("Failed to probe inputs")?;

    if args.json {
        let json = serde_json::to_string_pretty(&groups)
            .context("Failed to serialize inventory to JSON")?;
        println!("{}", json);
    } else {
        print_inventory(&groups);
    }

    info!("Probe operation completed successfully");
    Ok(())
}

/// Execute the mix command
pub async fn mix(tool: &str, args: MixArgs) -> Result<()> {
    info!("Starting mix operation");
    info!("Output: {}", args.output);

    let prober = TrackProber::new(tool);
    let groups = prober
        .probe(&args.inputs)
        .await
        .context("Failed to probe inputs")?;

    let maps = selector::resolve(&groups, &args.tracks)?;
    let plan = MixPlanner::plan(&groups, &maps, &args.output)?;

    let mixer = Mixer::new(tool);
    let mut sink: Box<dyn ProgressSink> = if args.json_progress {
        Box::new(JsonProgress)
    } else {
        Box::new(ConsoleProgress)
    };
    mixer
        .run(&plan, sink.as_mut())
        .await
        .context("Failed to execute mix")?;

    if !args.json_progress {
        println!();
        println!("Done");
    }

    info!("Mix operation completed successfully");
    Ok(())
}

/// Print the inventory in the listing format the shell uses:
/// one line per input, one line per track, one summary line for chapters.
pub fn print_inventory(groups: &[TrackGroup]) {
    for (i, group) in groups.iter().enumerate() {
        let name = Path::new(&group.path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| group.path.clone());
        match group.duration {
            Some(duration) => println!("#{}  {}  [{}]", i, name, format_timestamp(duration)),
            None => println!("#{}  {}", i, name),
        }
        for track in &group.tracks {
            let title = track.title.as_deref().unwrap_or("");
            println!(
                "#{}:{}   ({})  {}({})",
                i,
                track.index,
                track.track_type.letter(),
                title,
                track.codec
            );
        }
        if !group.chapters.is_empty() {
            println!("#{}:C   (c)  {} chapters", i, group.chapters.len());
        }
    }
}
