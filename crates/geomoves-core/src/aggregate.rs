//! Mark ordering, merging, path building and marker pop-up text.
//!
//! - [`drawing_order`] groups a batch of marks by place, then date.
//! - [`MarkHistory`] is the running, chronologically sorted union of every
//!   batch merged during one animation run.
//! - [`build_path`] turns an ordered batch into one path of distinct
//!   waypoints.
//! - [`describe_marks`] renders the text shown when a marker is selected.

use serde::Serialize;

use crate::color::Rgb16;
use crate::models::{EventRole, Handle, Mark};
use crate::names::NameDisplay;
use crate::surface::PathSegment;
use crate::tree::FamilyTree;

/// Stable sort by `(place title, year key)`.
pub fn drawing_order(marks: &[Mark]) -> Vec<Mark> {
    let mut sorted = marks.to_vec();
    sorted.sort_by(|a, b| {
        a.place_title
            .cmp(&b.place_title)
            .then_with(|| a.year_key.cmp(&b.year_key))
    });
    sorted
}

/// Cumulative, year-ordered marks of one run.
#[derive(Debug, Clone, Default)]
pub struct MarkHistory {
    marks: Vec<Mark>,
}

impl MarkHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every mark not already present (full equality), then re-sort
    /// the whole history by year key. Returns how many marks were added.
    pub fn merge(&mut self, batch: &[Mark]) -> usize {
        let before = self.marks.len();
        for mark in batch {
            if !self.marks.contains(mark) {
                self.marks.push(mark.clone());
            }
        }
        self.marks.sort_by(|a, b| a.year_key.cmp(&b.year_key));
        self.marks.len() - before
    }

    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
}

/// One path through the distinct locations of `marks`, in the given order.
///
/// A location already on the path is not added again. Returns `None` when
/// there is nothing to draw.
pub fn build_path(marks: &[Mark], color: Rgb16) -> Option<PathSegment> {
    let mut points: Vec<(f64, f64)> = Vec::new();
    for mark in marks {
        let point = (mark.latitude, mark.longitude);
        if !points.contains(&point) {
            points.push(point);
        }
    }
    if points.is_empty() {
        return None;
    }
    let label = marks
        .iter()
        .find(|m| m.year_key.is_known())
        .map(|m| m.year_key.year_label());
    Some(PathSegment {
        points,
        color,
        label,
    })
}

/// Pop-up text for the events at one place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceSummary {
    pub place_title: String,
    pub place_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub lines: Vec<String>,
}

/// Group marks by place (sorted by place then date), drop repeated events,
/// and describe each event:
///
/// ```text
/// (1850-03-12) Birth : Berg, Anna
/// (1875-06-01) Marriage : Berg, Nils - Lund, Karin
/// (Unknown) Witness => No description
/// ```
pub fn describe_marks(
    tree: &dyn FamilyTree,
    names: &dyn NameDisplay,
    marks: &[Mark],
) -> Vec<PlaceSummary> {
    let mut summaries: Vec<PlaceSummary> = Vec::new();
    let mut seen_events: Vec<&str> = Vec::new();

    let ordered = drawing_order(marks);
    for mark in &ordered {
        if seen_events.contains(&mark.event_id.as_str()) {
            continue;
        }
        seen_events.push(&mark.event_id);

        let line = describe_one(tree, names, mark);
        match summaries.last_mut() {
            Some(last) if last.place_title == mark.place_title => last.lines.push(line),
            _ => summaries.push(PlaceSummary {
                place_title: mark.place_title.clone(),
                place_id: mark.place_id.clone(),
                latitude: mark.latitude,
                longitude: mark.longitude,
                lines: vec![line],
            }),
        }
    }
    summaries
}

fn describe_one(tree: &dyn FamilyTree, names: &dyn NameDisplay, mark: &Mark) -> String {
    let event = tree.get_event_from_gramps_id(&mark.event_id).ok().flatten();
    let date = event
        .as_ref()
        .map(|e| e.date.to_string())
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| "Unknown".to_string());

    match &mark.role {
        EventRole::Primary => {
            let name = tree
                .get_person_from_gramps_id(&mark.person_id)
                .ok()
                .flatten()
                .map(|p| names.display(&p))
                .unwrap_or_default();
            format!("({}) {} : {}", date, mark.event_type, name)
        }
        EventRole::Family => {
            let (father, mother) = event
                .as_ref()
                .map(|e| couple_of_event(tree, names, &e.handle))
                .unwrap_or_default();
            format!("({}) {} : {} - {}", date, mark.event_type, father, mother)
        }
        role => {
            let description = event
                .as_ref()
                .map(|e| e.description.clone())
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| "No description".to_string());
            format!("({}) {} => {}", date, role, description)
        }
    }
}

/// Father and mother names of the first family referencing `event`.
fn couple_of_event(
    tree: &dyn FamilyTree,
    names: &dyn NameDisplay,
    event: &Handle,
) -> (String, String) {
    let Ok(families) = tree.iter_family_handles() else {
        return Default::default();
    };
    let name_of = |handle: Option<&Handle>| {
        handle
            .and_then(|h| tree.get_person_from_handle(h).ok().flatten())
            .map(|p| names.display(&p))
            .unwrap_or_default()
    };
    families
        .iter()
        .filter_map(|h| tree.get_family_from_handle(h).ok().flatten())
        .find(|f| f.has_event(event))
        .map(|f| (name_of(f.father.as_ref()), name_of(f.mother.as_ref())))
        .unwrap_or_default()
}
