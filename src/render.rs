//! Terminal map surfaces.
//!
//! There is no map widget on a terminal, so the CLI renders draw commands
//! as text. [`TerminalSurface`] writes one human-readable line per command;
//! [`JsonSurface`] writes one JSON object per line so the stream can be fed
//! to a real map renderer. Both write to stdout in the CLI; logs go to
//! stderr.

use std::io::Write;

use geomoves_core::coords::format_degrees;
use geomoves_core::models::Mark;
use geomoves_core::surface::{Bounds, MapSurface, PathSegment, SurfaceCommand};

/// Human-friendly draw log: `path 1850  #ffa500  3 points  (59.91, 10.75) -> ...`.
pub struct TerminalSurface<W: Write> {
    out: W,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        let _ = writeln!(self.out, "{}", text);
        let _ = self.out.flush();
    }
}

fn point(lat: f64, lon: f64) -> String {
    format!("({}, {})", format_degrees(lat), format_degrees(lon))
}

impl<W: Write> MapSurface for TerminalSurface<W> {
    fn add_path(&mut self, path: &PathSegment) {
        let points: Vec<String> = path.points.iter().map(|(lat, lon)| point(*lat, *lon)).collect();
        let line = format!(
            "path {}  {}  {} point{}  {}",
            path.label.as_deref().unwrap_or("----"),
            path.color,
            points.len(),
            if points.len() == 1 { "" } else { "s" },
            points.join(" -> ")
        );
        self.line(&line);
    }

    fn add_markers(&mut self, marks: &[Mark]) {
        self.line(&format!("markers {}", marks.len()));
    }

    fn add_message(&mut self, text: &str) {
        self.line(&format!("message {}", text));
    }

    fn clear_all(&mut self) {
        self.line("clear");
    }

    fn hint_viewport(&mut self, bounds: &Bounds) {
        let line = format!(
            "viewport {} .. {}",
            point(bounds.min_lat, bounds.min_lon),
            point(bounds.max_lat, bounds.max_lon)
        );
        self.line(&line);
    }
}

/// Machine-readable draw log: one [`SurfaceCommand`] per line.
pub struct JsonSurface<W: Write> {
    out: W,
}

impl<W: Write> JsonSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, command: SurfaceCommand) {
        if let Ok(line) = serde_json::to_string(&command) {
            let _ = writeln!(self.out, "{}", line);
            let _ = self.out.flush();
        }
    }
}

impl<W: Write> MapSurface for JsonSurface<W> {
    fn add_path(&mut self, path: &PathSegment) {
        self.emit(SurfaceCommand::AddPath(path.clone()));
    }

    fn add_markers(&mut self, marks: &[Mark]) {
        self.emit(SurfaceCommand::AddMarkers {
            marks: marks.to_vec(),
        });
    }

    fn add_message(&mut self, text: &str) {
        self.emit(SurfaceCommand::AddMessage {
            text: text.to_string(),
        });
    }

    fn clear_all(&mut self) {
        self.emit(SurfaceCommand::ClearAll);
    }

    fn hint_viewport(&mut self, bounds: &Bounds) {
        self.emit(SurfaceCommand::HintViewport(*bounds));
    }
}

/// Output mode for `geomoves animate`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    /// Default: human output when stdout is a TTY, otherwise JSON.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stdout) {
            OutputMode::Human
        } else {
            OutputMode::Json
        }
    }

    /// Surface writing to stdout in this mode.
    pub fn surface(&self) -> Box<dyn MapSurface + Send> {
        match self {
            OutputMode::Human => Box::new(TerminalSurface::new(std::io::stdout())),
            OutputMode::Json => Box::new(JsonSurface::new(std::io::stdout())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geomoves_core::color::Rgb16;

    fn path() -> PathSegment {
        PathSegment {
            points: vec![(59.91, 10.75), (60.39, 5.32)],
            color: Rgb16::from_rgb8(0xff, 0xa5, 0x00),
            label: Some("1850".to_string()),
        }
    }

    #[test]
    fn terminal_lines() {
        let mut surface = TerminalSurface::new(Vec::new());
        surface.clear_all();
        surface.add_message("All descendants of Berg, Anna");
        surface.add_path(&path());
        surface.add_markers(&[]);
        let text = String::from_utf8(surface.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "clear");
        assert_eq!(lines[1], "message All descendants of Berg, Anna");
        assert_eq!(
            lines[2],
            "path 1850  #ffa500  2 points  (59.91000000, 10.75000000) -> (60.39000000, 5.32000000)"
        );
        assert_eq!(lines[3], "markers 0");
    }

    #[test]
    fn unlabelled_single_point_path() {
        let mut surface = TerminalSurface::new(Vec::new());
        surface.add_path(&PathSegment {
            points: vec![(1.0, 2.0)],
            color: Rgb16::new(0, 0, 0),
            label: None,
        });
        let text = String::from_utf8(surface.into_inner()).unwrap();
        assert_eq!(text, "path ----  #000000  1 point  (1.00000000, 2.00000000)\n");
    }

    #[test]
    fn json_lines_parse_back() {
        let mut surface = JsonSurface::new(Vec::new());
        surface.clear_all();
        surface.add_path(&path());
        surface.hint_viewport(&Bounds::around(1.0, 2.0));
        let text = String::from_utf8(surface.into_inner()).unwrap();
        let values: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(values[0]["command"], "clear_all");
        assert_eq!(values[1]["command"], "add_path");
        assert_eq!(values[1]["label"], "1850");
        assert_eq!(values[2]["command"], "hint_viewport");
        assert_eq!(values[2]["min_lat"], 1.0);
    }
}
