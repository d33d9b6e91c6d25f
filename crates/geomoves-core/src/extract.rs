//! Geocoded mark extraction.
//!
//! For one person, walks their own events and the events of every family
//! they belong to, and turns each event that has a dated, geocoded place
//! into a [`Mark`]. Places without usable coordinates are reported
//! separately in [`Extraction::missing`].
//!
//! Extraction is best-effort: an unresolvable event, an unconvertible date,
//! or an event without a place is skipped and never aborts the rest.

use tracing::debug;

use crate::coords::conv_lat_lon;
use crate::date::Calendar;
use crate::models::{Event, EventRef, Family, Handle, Mark, MissingCoordinates, Person};
use crate::names::NameDisplay;
use crate::tree::{resolve, FamilyTree};

/// Marks and missing-coordinate places produced for one subject.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub marks: Vec<Mark>,
    /// Deduplicated by place id, in encounter order.
    pub missing: Vec<MissingCoordinates>,
}

impl Extraction {
    fn add_missing(&mut self, place_id: &str, title: &str) {
        if !self.missing.iter().any(|m| m.place_id == place_id) {
            self.missing.push(MissingCoordinates {
                place_id: place_id.to_string(),
                title: title.to_string(),
            });
        }
    }
}

/// Marks for one person; shorthand for [`Extractor::person_marks`].
pub fn extract_person_marks(
    tree: &dyn FamilyTree,
    names: &dyn NameDisplay,
    calendar: Calendar,
    person: Option<&Person>,
) -> Extraction {
    Extractor::new(tree, names, calendar).person_marks(person)
}

/// Turns events into marks using a tree, a name formatter and a calendar.
pub struct Extractor<'a> {
    tree: &'a dyn FamilyTree,
    names: &'a dyn NameDisplay,
    calendar: Calendar,
}

impl<'a> Extractor<'a> {
    pub fn new(tree: &'a dyn FamilyTree, names: &'a dyn NameDisplay, calendar: Calendar) -> Self {
        Self {
            tree,
            names,
            calendar,
        }
    }

    /// Marks for a person's own events followed by the events of each of
    /// their families. `None` yields an empty extraction.
    pub fn person_marks(&self, person: Option<&Person>) -> Extraction {
        let mut out = Extraction::default();
        let Some(person) = person else {
            return out;
        };

        let name = self.names.display(person);
        for event_ref in &person.event_refs {
            let Some(event) = self.event(event_ref) else {
                continue;
            };
            let label = format!("{} : {}", event.event_type, name);
            self.push_event(&mut out, person, event_ref, &event, &label);
        }

        let mut couple: Option<String> = None;
        for family_handle in &person.families {
            let Some(family) = resolve(
                "family",
                family_handle,
                self.tree.get_family_from_handle(family_handle),
            ) else {
                continue;
            };
            // Family events are labelled with the couple of the primary
            // family, whichever family they belong to.
            let label = couple
                .get_or_insert_with(|| self.primary_couple(person))
                .as_str();
            for event_ref in &family.event_refs {
                let Some(event) = self.event(event_ref) else {
                    continue;
                };
                self.push_event(&mut out, person, event_ref, &event, label);
            }
        }
        out
    }

    /// Marks for a family's own events, attributed to its first resolvable
    /// parent. A family without parents yields nothing.
    pub fn family_marks(&self, family: Option<&Family>) -> Extraction {
        let mut out = Extraction::default();
        let Some(family) = family else {
            return out;
        };
        let Some(subject) = [&family.father, &family.mother]
            .into_iter()
            .flatten()
            .find_map(|h| resolve("person", h, self.tree.get_person_from_handle(h)))
        else {
            return out;
        };
        let label = self.couple_label(family);
        for event_ref in &family.event_refs {
            let Some(event) = self.event(event_ref) else {
                continue;
            };
            self.push_event(&mut out, &subject, event_ref, &event, &label);
        }
        out
    }

    fn event(&self, event_ref: &EventRef) -> Option<Event> {
        resolve(
            "event",
            &event_ref.handle,
            self.tree.get_event_from_handle(&event_ref.handle),
        )
    }

    fn push_event(
        &self,
        out: &mut Extraction,
        person: &Person,
        event_ref: &EventRef,
        event: &Event,
        descriptor: &str,
    ) {
        let date = match event.date.to_calendar(self.calendar) {
            Ok(date) => date,
            Err(err) => {
                debug!(event = %event.gramps_id, error = %err, "skipping event with unusable date");
                return;
            }
        };
        let Some(place_handle) = &event.place else {
            return;
        };
        let Some(place) = resolve(
            "place",
            place_handle,
            self.tree.get_place_from_handle(place_handle),
        ) else {
            return;
        };

        match conv_lat_lon(&place.latitude, &place.longitude) {
            Some((latitude, longitude)) => out.marks.push(Mark {
                place_title: place.title.clone(),
                event_type: event.event_type.clone(),
                person_id: person.gramps_id.clone(),
                latitude,
                longitude,
                descriptor: descriptor.to_string(),
                year_key: date.year_key(),
                place_id: place.gramps_id.clone(),
                event_id: event.gramps_id.clone(),
                role: event_ref.role.clone(),
            }),
            None => out.add_missing(&place.gramps_id, &place.title),
        }
    }

    fn primary_couple(&self, person: &Person) -> String {
        person
            .primary_family()
            .and_then(|h| resolve("family", h, self.tree.get_family_from_handle(h)))
            .map(|family| self.couple_label(&family))
            .unwrap_or_else(|| " - ".to_string())
    }

    /// `"<father> - <mother>"`; a missing parent leaves its side empty.
    pub fn couple_label(&self, family: &Family) -> String {
        let name_of = |handle: &Option<Handle>| {
            handle
                .as_ref()
                .and_then(|h| resolve("person", h, self.tree.get_person_from_handle(h)))
                .map(|p| self.names.display(&p))
                .unwrap_or_default()
        };
        format!("{} - {}", name_of(&family.father), name_of(&family.mother))
    }
}
