//! Map rendering boundary.
//!
//! The core never renders. It hands paths, markers and text overlays to a
//! [`MapSurface`], which may draw tiles, print to a terminal, or just record
//! what it was told (see [`RecordingSurface`]).

use serde::Serialize;

use crate::color::Rgb16;
use crate::models::Mark;

/// One continuous path of waypoints, drawn in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathSegment {
    /// `(latitude, longitude)` pairs, without repeated locations.
    pub points: Vec<(f64, f64)>,
    pub color: Rgb16,
    /// Four-digit year of the first dated mark on the path.
    pub label: Option<String>,
}

/// Latitude/longitude envelope of everything drawn so far.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    pub fn around(lat: f64, lon: f64) -> Self {
        Self {
            min_lat: lat,
            max_lat: lat,
            min_lon: lon,
            max_lon: lon,
        }
    }

    pub fn extend(&mut self, lat: f64, lon: f64) {
        self.min_lat = self.min_lat.min(lat);
        self.max_lat = self.max_lat.max(lat);
        self.min_lon = self.min_lon.min(lon);
        self.max_lon = self.max_lon.max(lon);
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }
}

/// Receives draw commands from the animation.
///
/// Implementations must not call back into the animation.
pub trait MapSurface {
    /// Draw one path.
    fn add_path(&mut self, path: &PathSegment);

    /// Show markers for every mark accumulated so far.
    fn add_markers(&mut self, marks: &[Mark]);

    /// Show a text overlay.
    fn add_message(&mut self, text: &str);

    /// Remove every path, marker and message.
    fn clear_all(&mut self);

    /// Suggest a viewport covering `bounds`. Ignored by default.
    fn hint_viewport(&mut self, _bounds: &Bounds) {}
}

/// A command received by a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum SurfaceCommand {
    AddPath(PathSegment),
    AddMarkers { marks: Vec<Mark> },
    AddMessage { text: String },
    ClearAll,
    HintViewport(Bounds),
}

/// Surface that records every command, for tests and replay.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub commands: Vec<SurfaceCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> impl Iterator<Item = &PathSegment> {
        self.commands.iter().filter_map(|c| match c {
            SurfaceCommand::AddPath(p) => Some(p),
            _ => None,
        })
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            SurfaceCommand::AddMessage { text } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Marks passed to the most recent `add_markers` call.
    pub fn last_markers(&self) -> Option<&[Mark]> {
        self.commands.iter().rev().find_map(|c| match c {
            SurfaceCommand::AddMarkers { marks } => Some(marks.as_slice()),
            _ => None,
        })
    }
}

impl MapSurface for RecordingSurface {
    fn add_path(&mut self, path: &PathSegment) {
        self.commands.push(SurfaceCommand::AddPath(path.clone()));
    }

    fn add_markers(&mut self, marks: &[Mark]) {
        self.commands.push(SurfaceCommand::AddMarkers {
            marks: marks.to_vec(),
        });
    }

    fn add_message(&mut self, text: &str) {
        self.commands.push(SurfaceCommand::AddMessage {
            text: text.to_string(),
        });
    }

    fn clear_all(&mut self) {
        self.commands.push(SurfaceCommand::ClearAll);
    }

    fn hint_viewport(&mut self, bounds: &Bounds) {
        self.commands.push(SurfaceCommand::HintViewport(*bounds));
    }
}

impl<S: MapSurface + ?Sized> MapSurface for Box<S> {
    fn add_path(&mut self, path: &PathSegment) {
        (**self).add_path(path)
    }

    fn add_markers(&mut self, marks: &[Mark]) {
        (**self).add_markers(marks)
    }

    fn add_message(&mut self, text: &str) {
        (**self).add_message(text)
    }

    fn clear_all(&mut self) {
        (**self).clear_all()
    }

    fn hint_viewport(&mut self, bounds: &Bounds) {
        (**self).hint_viewport(bounds)
    }
}
