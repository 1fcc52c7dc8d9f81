//! Interactive menu loop
//!
//! Keeps a current inventory between rounds: inputs can be added (the
//! previous paths are re-submitted together with the new ones and the whole
//! inventory is rebuilt), replaced, or removed, and any selection can be
//! mixed. An empty line at any prompt returns to the menu.

use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;

use crate::cli::commands::print_inventory;
use crate::engine::{ConsoleProgress, Mixer};
use crate::model::TrackGroup;
use crate::planner::MixPlanner;
use crate::probe::TrackProber;
use crate::selector;

/// Run the interactive shell until the user quits.
pub async fn run(tool: &str) -> Result<()> {
    let mut groups: Vec<TrackGroup> = Vec::new();
    loop {
        print_inventory(&groups);
        if !groups.is_empty() {
            println!();
        }
        if !menu_round(tool, &mut groups).await? {
            return Ok(());
        }
        println!();
    }
}

/// One menu round; returns `false` when the user quits.
async fn menu_round(tool: &str, groups: &mut Vec<TrackGroup>) -> Result<bool> {
    let choice = if groups.is_empty() {
        // Nothing loaded yet; go straight to entering inputs.
        "2".to_string()
    } else {
        println!("Enter an empty input at any time to return to the main menu.");
        println!("Enter the menu's number to access the corresponding menu.");
        println!("1. Add tracks");
        println!("2. Replace tracks");
        println!("3. Remove single input");
        println!("4. Remove all inputs");
        println!("5. Mix tracks");
        println!("q. Quit");
        read_line()?
    };

    match choice.trim() {
        "1" | "2" => {
            let adding = choice.trim() == "1";
            println!("Put the full paths of the input files in quotes. You can enter multiple paths separated by space or you can drag and drop the files.");
            let line = read_line()?;
            if line.trim().is_empty() {
                // With nothing loaded there is no menu to return to.
                return Ok(!groups.is_empty());
            }
            let mut paths = parse_paths(&line);
            if adding {
                let mut all: Vec<String> = groups.iter().map(|g| g.path.clone()).collect();
                all.append(&mut paths);
                paths = all;
            }
            if paths.is_empty() {
                return Ok(true);
            }
            let prober = TrackProber::new(tool);
            match prober.probe(&paths).await {
                Ok(probed) => *groups = probed,
                Err(e) => {
                    println!("Probe failed: {e}");
                    wait_for_enter()?;
                }
            }
        }
        "3" => {
            println!("Enter the index of the input you wish to remove");
            let line = read_line()?;
            if let Ok(index) = line.trim().parse::<usize>() {
                if index < groups.len() {
                    groups.remove(index);
                }
            }
        }
        "4" => groups.clear(),
        "5" => mix_round(tool, groups).await?,
        "q" | "Q" => return Ok(false),
        _ => {}
    }

    Ok(true)
}

/// The mix dialog: selector, output path, then the run itself.
async fn mix_round(tool: &str, groups: &[TrackGroup]) -> Result<()> {
    println!("Enter the tracks you want to mix, separated by space, in the format explained below:");
    println!("[InputIndex]:[TrackIndex] - e.g. 0:1 to select the second track (1) of the first input (0)");
    println!("[InputIndex]:C - e.g. 1:C to select the chapters (C) of the second input (1)");
    println!("[InputIndex]:[TrackLetters] - e.g. 1:a to select all the audio tracks (a) of the second input (1) or 0:s to select all the subtitle tracks (s) of the first input (0) or 2:vs to select all the video and subtitle tracks (vs) of the third input (2)");
    println!("The colon (:) can be omitted in most cases.");
    let selector_line = read_line()?;
    if selector_line.trim().is_empty() {
        return Ok(());
    }

    let maps = match selector::resolve(groups, &selector_line) {
        Ok(maps) => maps,
        Err(e) => {
            println!("{e}");
            println!("Press enter to retry");
            wait_for_enter()?;
            return Ok(());
        }
    };
    if maps.is_empty() {
        return Ok(());
    }

    println!("Enter the full path of the output. If you enter a relative path, it is resolved against the directory of the first input.");
    let output_line = read_line()?;
    if output_line.trim().is_empty() {
        return Ok(());
    }
    let output = resolve_output_path(groups, &output_line);
    if groups.iter().any(|g| g.path == output) {
        println!("Output path cannot be the same as input path");
        println!("Press enter to retry");
        wait_for_enter()?;
        return Ok(());
    }

    println!();
    let plan = match MixPlanner::plan(groups, &maps, &output) {
        Ok(plan) => plan,
        Err(e) => {
            println!("{e}");
            wait_for_enter()?;
            return Ok(());
        }
    };

    let mixer = Mixer::new(tool);
    let mut sink = ConsoleProgress;
    match mixer.run(&plan, &mut sink).await {
        Ok(()) => {
            println!();
            println!("Done");
        }
        Err(e) => {
            println!();
            println!("Mix failed: {e}");
        }
    }
    wait_for_enter()?;
    Ok(())
}

/// Extract input paths from one line: every `"..."` segment, or plain
/// whitespace-separated tokens when nothing is quoted.
fn parse_paths(input: &str) -> Vec<String> {
    let mut paths = Vec::new();
    let mut rest = input;
    while let Some(start) = rest.find('"') {
        let after = &rest[start + 1..];
        match after.find('"') {
            Some(end) => {
                paths.push(after[..end].to_string());
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
    if paths.is_empty() {
        paths = input.split_whitespace().map(str::to_string).collect();
    }
    paths.retain(|p| !p.is_empty());
    paths
}

/// Strip surrounding quotes and resolve relative paths against the first
/// input's directory. An absolute path wins as-is.
fn resolve_output_path(groups: &[TrackGroup], raw: &str) -> String {
    let mut trimmed = raw.trim();
    trimmed = trimmed.strip_prefix('"').unwrap_or(trimmed);
    trimmed = trimmed.strip_suffix('"').unwrap_or(trimmed);
    let base = groups
        .first()
        .and_then(|g| Path::new(&g.path).parent())
        .unwrap_or_else(|| Path::new(""));
    base.join(trimmed).to_string_lossy().into_owned()
}

fn read_line() -> io::Result<String> {
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn wait_for_enter() -> io::Result<()> {
    read_line().map(|_| ())
}
