//! `geomoves animate`: run the full timed animation for one person.

use anyhow::{bail, Result};
use geomoves_core::animation::{GeoMoves, RunSummary, TickReport};

use crate::config::Config;
use crate::driver::run_animation;
use crate::family_file::load_tree;
use crate::inspect::find_person;
use crate::render::OutputMode;

pub async fn run_animate(config: &Config, person_id: &str, mode: OutputMode) -> Result<()> {
    let settings = config.animation_settings()?;
    let tree = load_tree(&config.tree.path)?;
    let root = find_person(&tree, person_id)?.handle;

    let mut geomoves = GeoMoves::new(
        tree,
        mode.surface(),
        Box::new(config.name_display()),
        settings,
    );
    let summary = run_animation(&mut geomoves, &root, |report| print_level(mode, report)).await?;
    match summary {
        Some(summary) => print_summary(mode, &summary),
        None => bail!("person not found: {}", person_id),
    }
    Ok(())
}

fn print_level(mode: OutputMode, report: &TickReport) {
    match mode {
        OutputMode::Human => println!("level {}  {}", report.level, report.status),
        OutputMode::Json => {
            let line = serde_json::json!({ "event": "level", "report": report });
            println!("{}", line);
        }
    }
}

fn print_summary(mode: OutputMode, summary: &RunSummary) {
    match mode {
        OutputMode::Human => {
            println!(
                "done  {} persons, {} paths, {} places over {} generations",
                summary.persons_drawn, summary.paths_drawn, summary.marks, summary.levels
            );
            if !summary.missing.is_empty() {
                println!("places without coordinates:");
                for place in &summary.missing {
                    println!("  {}  {}", place.place_id, place.title);
                }
            }
        }
        OutputMode::Json => {
            let line = serde_json::json!({ "event": "summary", "summary": summary });
            println!("{}", line);
        }
    }
}
