//! Timed, generation-by-generation animation.
//!
//! [`GeoMoves`] is a state machine:
//!
//! ```text
//! Idle ──build_map──▶ Running(0) ──tick──▶ Running(1) ── … ──▶ Finished
//!   ▲                                                             │
//!   └──────────────────────── build_map ◀─────────────────────────┘
//! ```
//!
//! Each tick draws one level and arms the next one through a [`Timer`].
//! Every run is tagged with a fresh [`RunToken`]; ticks carrying an older
//! token are discarded, so restarting while a tick is pending is safe even
//! when the timer cannot be cancelled in time.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use crate::aggregate::{build_path, drawing_order, MarkHistory};
use crate::color::Rgb16;
use crate::date::{Calendar, YearKey};
use crate::extract::Extractor;
use crate::models::{EventType, Handle, MissingCoordinates, Person};
use crate::names::NameDisplay;
use crate::surface::{Bounds, MapSurface};
use crate::tree::{resolve, FamilyTree};
use crate::walker::GenerationWalker;

/// Tunables read from the user's configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationSettings {
    /// Deepest level drawn; a run takes `maximum_generations + 1` ticks.
    pub maximum_generations: u32,
    /// Delay before each tick.
    pub generation_interval: Duration,
    pub color_base: Rgb16,
    pub calendar: Calendar,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            maximum_generations: 10,
            generation_interval: Duration::from_millis(500),
            color_base: Rgb16::from_rgb8(0xff, 0xa5, 0x00),
            calendar: Calendar::Gregorian,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AnimationState {
    Idle,
    Running { level: u32 },
    Finished,
}

/// Identifies one run. Strictly increasing per [`GeoMoves`] instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RunToken(pub u64);

/// A scheduled request to draw `level` of run `run`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub run: RunToken,
    pub level: u32,
}

/// Schedules ticks. At most one tick is outstanding at a time.
pub trait Timer {
    /// Deliver `tick` after `delay`, replacing any pending tick.
    fn arm(&mut self, delay: Duration, tick: Tick);

    /// Drop the pending tick, if any.
    fn disarm(&mut self);
}

/// Timer that only remembers what it was asked to do; tests fire ticks by
/// hand.
#[derive(Debug, Default)]
pub struct ManualTimer {
    pending: Option<(Duration, Tick)>,
    armed: usize,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<(Duration, Tick)> {
        self.pending
    }

    /// Take the pending tick, as if it had fired.
    pub fn fire(&mut self) -> Option<Tick> {
        self.pending.take().map(|(_, tick)| tick)
    }

    /// How many times `arm` was called.
    pub fn armed_count(&self) -> usize {
        self.armed
    }
}

impl Timer for ManualTimer {
    fn arm(&mut self, delay: Duration, tick: Tick) {
        self.pending = Some((delay, tick));
        self.armed += 1;
    }

    fn disarm(&mut self) {
        self.pending = None;
    }
}

/// Everything one run accumulates. Built fresh for every `build_map` and
/// dropped when the run finishes or is replaced.
#[derive(Debug)]
pub struct AnimationRun {
    token: RunToken,
    root_name: String,
    walker: GenerationWalker,
    history: MarkHistory,
    color: Rgb16,
    bounds: Option<Bounds>,
    missing: Vec<MissingCoordinates>,
    persons_drawn: usize,
    paths_drawn: usize,
}

impl AnimationRun {
    fn new(token: RunToken, root: Handle, root_name: String, settings: &AnimationSettings) -> Self {
        Self {
            token,
            root_name,
            walker: GenerationWalker::new(root, settings.maximum_generations),
            history: MarkHistory::new(),
            color: settings.color_base,
            bounds: None,
            missing: Vec::new(),
            persons_drawn: 0,
            paths_drawn: 0,
        }
    }

    pub fn token(&self) -> RunToken {
        self.token
    }

    pub fn root(&self) -> &Handle {
        self.walker.root()
    }

    pub fn walker(&self) -> &GenerationWalker {
        &self.walker
    }

    pub fn history(&self) -> &MarkHistory {
        &self.history
    }

    pub fn color(&self) -> Rgb16 {
        self.color
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn missing(&self) -> &[MissingCoordinates] {
        &self.missing
    }

    fn add_missing(&mut self, found: Vec<MissingCoordinates>) {
        for m in found {
            if !self.missing.iter().any(|known| known.place_id == m.place_id) {
                self.missing.push(m);
            }
        }
    }

    fn summary(&self) -> RunSummary {
        RunSummary {
            run: self.token,
            root: self.walker.root().clone(),
            root_name: self.root_name.clone(),
            levels: self.walker.max_level() as u32 + 1,
            persons_drawn: self.persons_drawn,
            paths_drawn: self.paths_drawn,
            marks: self.history.len(),
            bounds: self.bounds,
            missing: self.missing.clone(),
        }
    }
}

/// What one tick drew.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    pub run: RunToken,
    pub level: u32,
    pub persons: usize,
    pub paths: usize,
    pub new_marks: usize,
    pub total_marks: usize,
    /// Informational status line for the level.
    pub status: String,
}

/// Totals for a finished run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub run: RunToken,
    pub root: Handle,
    pub root_name: String,
    pub levels: u32,
    pub persons_drawn: usize,
    pub paths_drawn: usize,
    pub marks: usize,
    pub bounds: Option<Bounds>,
    pub missing: Vec<MissingCoordinates>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The tick belonged to a superseded run or an unexpected level.
    Stale,
    Continued(TickReport),
    Finished {
        last: TickReport,
        summary: RunSummary,
    },
}

/// The animation: owns the tree, the surface and the settings, and holds
/// at most one active run.
pub struct GeoMoves<T: FamilyTree, S: MapSurface> {
    tree: T,
    surface: S,
    names: Box<dyn NameDisplay>,
    settings: AnimationSettings,
    last_token: u64,
    state: AnimationState,
    run: Option<AnimationRun>,
}

impl<T: FamilyTree, S: MapSurface> GeoMoves<T, S> {
    pub fn new(tree: T, surface: S, names: Box<dyn NameDisplay>, settings: AnimationSettings) -> Self {
        Self {
            tree,
            surface,
            names,
            settings,
            last_token: 0,
            state: AnimationState::Idle,
            run: None,
        }
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn current_run(&self) -> Option<&AnimationRun> {
        self.run.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn tree(&self) -> &T {
        &self.tree
    }

    pub fn settings(&self) -> &AnimationSettings {
        &self.settings
    }

    /// Start a new run from `root`, abandoning any run in progress.
    ///
    /// Returns `false` (and stays idle on a cleared map) when `root` does
    /// not resolve to a person.
    pub fn build_map(&mut self, root: &Handle, timer: &mut dyn Timer) -> bool {
        self.last_token += 1;
        let token = RunToken(self.last_token);
        timer.disarm();
        self.surface.clear_all();
        self.run = None;
        self.state = AnimationState::Idle;

        let Some(person) = resolve("person", root, self.tree.get_person_from_handle(root)) else {
            info!(%root, "root person not found, nothing to animate");
            return false;
        };
        let name = self.names.display(&person);
        info!(
            %root,
            run = token.0,
            generations = self.settings.maximum_generations,
            "animation started"
        );

        self.surface
            .add_message(&format!("All descendants of {}", name));
        self.run = Some(AnimationRun::new(token, root.clone(), name, &self.settings));
        self.state = AnimationState::Running { level: 0 };
        timer.arm(
            self.settings.generation_interval,
            Tick {
                run: token,
                level: 0,
            },
        );
        true
    }

    /// Draw the level carried by `tick` and arm the next one.
    pub fn on_tick(&mut self, tick: Tick, timer: &mut dyn Timer) -> TickOutcome {
        let expected = match self.state {
            AnimationState::Running { level } => level,
            _ => {
                debug!(run = tick.run.0, "tick while not running, ignored");
                return TickOutcome::Stale;
            }
        };
        let Some(mut run) = self.run.take() else {
            return TickOutcome::Stale;
        };
        if run.token != tick.run || tick.level != expected {
            debug!(
                run = tick.run.0,
                level = tick.level,
                active = run.token.0,
                expected,
                "stale tick discarded"
            );
            self.run = Some(run);
            return TickOutcome::Stale;
        }

        let report = self.draw_level(&mut run, tick.level);

        if tick.level >= self.settings.maximum_generations {
            let summary = run.summary();
            info!(
                run = run.token.0,
                persons = summary.persons_drawn,
                marks = summary.marks,
                "animation finished"
            );
            self.state = AnimationState::Finished;
            return TickOutcome::Finished {
                last: report,
                summary,
            };
        }

        let next = tick.level + 1;
        self.state = AnimationState::Running { level: next };
        timer.arm(
            self.settings.generation_interval,
            Tick {
                run: run.token,
                level: next,
            },
        );
        self.run = Some(run);
        TickOutcome::Continued(report)
    }

    fn draw_level(&mut self, run: &mut AnimationRun, level: u32) -> TickReport {
        let tree: &dyn FamilyTree = &self.tree;
        let depth = i32::try_from(level).unwrap_or(i32::MAX);
        run.walker.advance_to(tree, depth);
        run.walker.record_level(tree, depth);

        let extractor = Extractor::new(tree, self.names.as_ref(), self.settings.calendar);
        let mut persons: Vec<(YearKey, Person)> = run
            .walker
            .visits()
            .at_level(depth)
            .filter_map(|h| resolve("person", h, tree.get_person_from_handle(h)))
            .map(|p| (birth_key(tree, &p, self.settings.calendar), p))
            .collect();
        // Known birth keys first, chronologically; undated persons last.
        persons.sort_by_key(|(key, _)| (!key.is_known(), *key));

        let mut paths = 0;
        let mut new_marks = 0;
        for (_, person) in &persons {
            let extraction = extractor.person_marks(Some(person));
            run.add_missing(extraction.missing);
            let ordered = drawing_order(&extraction.marks);

            if let Some(path) = build_path(&ordered, run.color) {
                self.surface.add_path(&path);
                paths += 1;
            }
            run.color = run.color.shifted(level);
            for mark in &ordered {
                match run.bounds.as_mut() {
                    Some(bounds) => bounds.extend(mark.latitude, mark.longitude),
                    None => run.bounds = Some(Bounds::around(mark.latitude, mark.longitude)),
                }
            }
            new_marks += run.history.merge(&ordered);
        }
        run.persons_drawn += persons.len();
        run.paths_drawn += paths;

        self.surface.add_markers(run.history.marks());
        if let Some(bounds) = run.bounds {
            self.surface.hint_viewport(&bounds);
        }

        let status = format!(
            "{}: generation {} of {}, {} persons, {} places",
            run.root_name,
            level,
            self.settings.maximum_generations,
            run.persons_drawn,
            run.history.len()
        );
        debug!(run = run.token.0, level, persons = persons.len(), paths, new_marks, "level drawn");

        TickReport {
            run: run.token,
            level,
            persons: persons.len(),
            paths,
            new_marks,
            total_marks: run.history.len(),
            status,
        }
    }
}

/// Key used to order persons within a level: the birth date, else the
/// earliest known event date, else unknown.
fn birth_key(tree: &dyn FamilyTree, person: &Person, calendar: Calendar) -> YearKey {
    let mut earliest: Option<YearKey> = None;
    for event_ref in &person.event_refs {
        let Some(event) = resolve(
            "event",
            &event_ref.handle,
            tree.get_event_from_handle(&event_ref.handle),
        ) else {
            continue;
        };
        let Ok(date) = event.date.to_calendar(calendar) else {
            continue;
        };
        let key = date.year_key();
        if !key.is_known() {
            continue;
        }
        if event.event_type == EventType::Birth {
            return key;
        }
        earliest = Some(earliest.map_or(key, |e| e.min(key)));
    }
    earliest.unwrap_or(YearKey::UNKNOWN)
}
