// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cue::config::CueConfig;
use cue::events::Event;
use cue::music::Notation;
use cue::playback::SimulatedPlayer;
use cue::session::Session;
use cue::setlist::Setlist;
use cue::song::{Song, SongDocument, SongLibrary, SongLoader, SongOptions};
use cue::timing::format_time;

fn print_usage() {
    println!("CUE - Live lyrics and chord cue engine");
    println!();
    println!("Usage: cue [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --validate <SONG>                  Check a song document");
    println!("  --show <SONG> [SEMITONES] [--flat] Print a song, optionally transposed");
    println!("  --setlist <FILE>                   Print a setlist summary");
    println!("                                     (bare names are read from the setlists dir)");
    println!("  --simulate <FILE> [--speed X]      Play a setlist against a simulated player");
    println!("             [--songs DIR]           Song library (default from config)");
    println!("  --config <FILE>                    Configuration file (YAML or TOML)");
    println!("  --help                             Show this help message");
}

/// Arguments with `--config <FILE>` removed, so the command can follow it
fn command_args(args: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(args.len());
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            iter.next();
        } else {
            out.push(arg.clone());
        }
    }
    out
}

/// Value following `flag`, if present
fn option_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn validate_song(path: &str) -> Result<()> {
    let doc = SongDocument::load(path).with_context(|| format!("Invalid song: {}", path))?;
    let entries: usize = doc.sections.iter().map(|s| s.entries.len()).sum();
    let song = Song::from_document(doc, SongOptions::default());

    println!(
        "OK: \"{}\" by {} ({} sections, {} entries, {})",
        song.title(),
        song.artist(),
        song.sections().len(),
        entries,
        format_time(song.duration())
    );
    for overlap in song.overlaps() {
        println!("  warning: overlapping time ranges: {:?}", overlap);
    }
    Ok(())
}

fn show_song(path: &str, semitones: i32, notation: Option<Notation>) -> Result<()> {
    let doc = SongDocument::load(path).with_context(|| format!("Failed to load song: {}", path))?;
    let song = Song::from_document(
        doc,
        SongOptions {
            transpose: semitones,
            notation,
            ..Default::default()
        },
    );

    println!("{} - {}", song.title(), song.artist());
    println!(
        "Key: {}  BPM: {}  Transpose: {:+}",
        song.transposed_key(),
        song.bpm(),
        song.transpose()
    );

    for section in song.sections() {
        println!();
        println!("[{}] {}", format_time(section.start_time), section.name);
        for entry in &section.entries {
            println!(
                "  {}  {:<16} {}",
                format_time(entry.start_time),
                entry.word.as_deref().unwrap_or(""),
                entry.chord_text().unwrap_or_default()
            );
        }
    }
    Ok(())
}

fn show_setlist(path: &Path) -> Result<()> {
    let setlist = Setlist::load(path)
        .with_context(|| format!("Failed to load setlist: {}", path.display()))?;

    println!("{}", setlist.name);
    if let Some(description) = &setlist.description {
        println!("{}", description);
    }
    println!();
    for (i, song) in setlist.songs.iter().enumerate() {
        println!(
            "{:>3}. {} - {} ({}){}",
            i + 1,
            song.title,
            song.artist,
            format_time(song.duration),
            song.notes
                .as_deref()
                .map(|n| format!("  [{}]", n))
                .unwrap_or_default()
        );
    }
    println!();
    println!(
        "{} songs, {} (gap {}s, auto-advance {}, loop {}, shuffle {})",
        setlist.song_count(),
        setlist.estimated_time(),
        setlist.settings.gap_seconds,
        setlist.settings.auto_advance,
        setlist.settings.loop_,
        setlist.settings.shuffle
    );
    Ok(())
}

async fn simulate(path: &Path, speed: f64, songs_dir: PathBuf, config: &CueConfig) -> Result<()> {
    let setlist = Setlist::load(path)
        .with_context(|| format!("Failed to load setlist: {}", path.display()))?;
    if setlist.is_empty() {
        bail!("Setlist '{}' has no songs", setlist.name);
    }
    if !setlist.settings.auto_advance {
        warn!("auto_advance is off; the simulation will stay on the first song");
    }

    let player = Arc::new(SimulatedPlayer::new(speed));
    let library: Arc<dyn SongLoader> = Arc::new(SongLibrary::new(&songs_dir));
    let session = Session::start(player.clone(), Some(library), config);

    // Restart the player before the scheduler starts watching the new song
    let restart = Arc::clone(&player);
    let mut loaded_duration: Option<f64> = None;
    session.broadcaster().subscribe(move |event| {
        match event {
            Event::SongLoaded { song } => loaded_duration = Some(song.duration),
            Event::SetlistUpdate(state) if state.is_playing => {
                let fallback = state.current_song.as_ref().map_or(0.0, |s| s.duration);
                let duration = loaded_duration.take().filter(|d| *d > 0.0).unwrap_or(fallback);
                restart.start(duration);
            }
            Event::SetlistUpdate(_) => restart.stop(),
            _ => {}
        }
        Ok(())
    });

    let mut events = session.events();
    info!(setlist = %setlist.name, speed, "starting simulation");
    session.scheduler().load(setlist).await;
    session.scheduler().play_current().await;

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                println!("{}", event.to_json()?);
                if matches!(event, Event::SetlistFinished { .. }) {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
        }
    }

    session.shutdown().await;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let config = match option_value(&args, "--config") {
        Some(path) => CueConfig::load(path)?,
        None => CueConfig::default(),
    };
    init_logging(&config.logging.level);
    let args = command_args(&args);

    if args.len() < 2 {
        println!("CUE - Live lyrics and chord cue engine");
        println!("Run with --help for usage information");
        return Ok(());
    }

    match args[1].as_str() {
        "--validate" => {
            let Some(path) = args.get(2) else {
                eprintln!("Error: --validate requires a song file");
                std::process::exit(1);
            };
            validate_song(path)?;
        }
        "--show" => {
            let Some(path) = args.get(2) else {
                eprintln!("Error: --show requires a song file");
                std::process::exit(1);
            };
            let semitones: i32 = match args.get(3).filter(|a| !a.starts_with("--")) {
                Some(value) => value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Invalid semitone count: {}", value))?,
                None => 0,
            };
            let notation = if args.iter().any(|a| a == "--flat") {
                Some(Notation::Flat)
            } else {
                config.display.notation
            };
            show_song(path, semitones, notation)?;
        }
        "--setlist" => {
            let Some(path) = args.get(2) else {
                eprintln!("Error: --setlist requires a setlist file");
                std::process::exit(1);
            };
            show_setlist(&config.library.setlist_path(path))?;
        }
        "--simulate" => {
            let Some(path) = args.get(2) else {
                eprintln!("Error: --simulate requires a setlist file");
                std::process::exit(1);
            };
            let speed: f64 = match option_value(&args, "--speed") {
                Some(value) => value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Invalid speed: {}", value))?,
                None => 1.0,
            };
            let songs_dir = option_value(&args, "--songs")
                .map(PathBuf::from)
                .unwrap_or_else(|| config.library.songs_dir.clone());
            simulate(&config.library.setlist_path(path), speed, songs_dir, &config).await?;
        }
        "--help" | "-h" => {
            print_usage();
        }
        _ => {
            eprintln!("Unknown option: {}", args[1]);
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_config_before_command() {
        let raw = args(&["cue", "--config", "cue.yaml", "--simulate", "set.json", "--speed", "4"]);
        assert_eq!(option_value(&raw, "--config"), Some("cue.yaml"));

        let command = command_args(&raw);
        assert_eq!(command[1], "--simulate");
        assert_eq!(command[2], "set.json");
        assert_eq!(option_value(&command, "--speed"), Some("4"));
    }

    #[test]
    fn test_config_after_command() {
        let command = command_args(&args(&["cue", "--setlist", "gig.yaml", "--config", "cue.toml"]));
        assert_eq!(command, args(&["cue", "--setlist", "gig.yaml"]));
    }
}
