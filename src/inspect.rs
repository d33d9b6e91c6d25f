//! One-shot inspection commands: `levels`, `marks` and `describe`.
//!
//! These run the same walker, extractor and aggregation as the animation,
//! without a timer, and print the result.

use anyhow::{bail, Result};
use geomoves_core::aggregate::{describe_marks, drawing_order};
use geomoves_core::coords::format_degrees;
use geomoves_core::extract::{extract_person_marks, Extraction};
use geomoves_core::models::{Mark, Person};
use geomoves_core::names::NameDisplay;
use geomoves_core::tree::FamilyTree;
use geomoves_core::walker::GenerationWalker;

use crate::config::Config;
use crate::family_file::load_tree;

/// Look a person up by their human-readable id.
pub fn find_person(tree: &dyn FamilyTree, person_id: &str) -> Result<Person> {
    match tree.get_person_from_gramps_id(person_id)? {
        Some(person) => Ok(person),
        None => bail!("person not found: {}", person_id),
    }
}

pub fn run_levels(config: &Config, person_id: &str) -> Result<()> {
    let tree = load_tree(&config.tree.path)?;
    let names = config.name_display();
    let root = find_person(&tree, person_id)?;
    let max = config.geography.maximum_generations;
    let walker = GenerationWalker::walk(&tree, root.handle.clone(), max);

    println!(
        "Generations of {} ({}), up to level {}",
        names.display(&root),
        root.gramps_id,
        max
    );
    for level in 0..=walker.max_level() {
        let assigned = walker.levels().get(level);
        println!(
            "level {}  assigned {}  visited {}",
            level,
            assigned.len(),
            walker.visits().count(level)
        );
        for handle in walker.visits().at_level(level) {
            if let Some(person) = tree.get_person_from_handle(handle)? {
                println!("  {}  {}", person.gramps_id, names.display(&person));
            }
        }
    }
    Ok(())
}

fn person_extraction(config: &Config, tree: &dyn FamilyTree, person: &Person) -> Extraction {
    let names = config.name_display();
    extract_person_marks(tree, &names, config.display.calendar, Some(person))
}

fn format_mark(mark: &Mark) -> String {
    format!(
        "{}  {}  ({}, {})  {}  [{}]",
        mark.year_key,
        mark.place_title,
        format_degrees(mark.latitude),
        format_degrees(mark.longitude),
        mark.descriptor,
        mark.event_id
    )
}

pub fn run_marks(config: &Config, person_id: &str) -> Result<()> {
    let tree = load_tree(&config.tree.path)?;
    let person = find_person(&tree, person_id)?;
    let extraction = person_extraction(config, &tree, &person);

    let ordered = drawing_order(&extraction.marks);
    if ordered.is_empty() {
        println!("No geocoded events for {}.", person_id);
    }
    for mark in &ordered {
        println!("{}", format_mark(mark));
    }
    if !extraction.missing.is_empty() {
        println!("places without coordinates:");
        for place in &extraction.missing {
            println!("  {}  {}", place.place_id, place.title);
        }
    }
    Ok(())
}

pub fn run_describe(config: &Config, person_id: &str, place_id: &str) -> Result<()> {
    let tree = load_tree(&config.tree.path)?;
    let person = find_person(&tree, person_id)?;
    let extraction = person_extraction(config, &tree, &person);

    let at_place: Vec<Mark> = extraction
        .marks
        .into_iter()
        .filter(|m| m.place_id == place_id)
        .collect();
    if at_place.is_empty() {
        bail!("no geocoded events of {} at place {}", person_id, place_id);
    }

    let names = config.name_display();
    for summary in describe_marks(&tree, &names, &at_place) {
        println!("{} ({})", summary.place_title, summary.place_id);
        for line in &summary.lines {
            println!("  {}", line);
        }
    }
    Ok(())
}
