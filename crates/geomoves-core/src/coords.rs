//! Latitude/longitude normalization.
//!
//! Places store coordinates as free-form strings. [`conv_lat_lon`] turns a
//! pair into decimal degrees rounded to eight decimals, or rejects the pair
//! when either half is empty, unparseable, or out of range.
//!
//! Accepted forms, with `.` or `,` as the decimal separator:
//!
//! ```text
//! 50.8463      -3.25       +12,5
//! N 50.8463    50.8463N    3.25 W
//! 50°50'46.8"N   50:50:46.8   W 3° 15'
//! ```

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    fn limit(self) -> f64 {
        match self {
            Axis::Latitude => 90.0,
            Axis::Longitude => 180.0,
        }
    }

    /// Sign implied by a hemisphere letter, `None` if the letter does not
    /// belong to this axis.
    fn hemisphere_sign(self, letter: char) -> Option<f64> {
        match (self, letter) {
            (Axis::Latitude, 'N') | (Axis::Longitude, 'E') => Some(1.0),
            (Axis::Latitude, 'S') | (Axis::Longitude, 'W') => Some(-1.0),
            _ => None,
        }
    }
}

/// Normalize a latitude/longitude pair. Both halves must be usable.
pub fn conv_lat_lon(latitude: &str, longitude: &str) -> Option<(f64, f64)> {
    let lat = parse_coordinate(latitude, Axis::Latitude)?;
    let lon = parse_coordinate(longitude, Axis::Longitude)?;
    Some((lat, lon))
}

/// Render a normalized value the way it is stored in marks (`D.D8`).
pub fn format_degrees(value: f64) -> String {
    format!("{:.8}", value)
}

fn parse_coordinate(raw: &str, axis: Axis) -> Option<f64> {
    let mut text = raw.trim().to_uppercase();
    if text.is_empty() {
        return None;
    }

    let mut sign = 1.0;
    if let Some(first) = text.chars().next().filter(char::is_ascii_alphabetic) {
        sign = axis.hemisphere_sign(first)?;
        text.remove(0);
    } else if let Some(last) = text.chars().last().filter(char::is_ascii_alphabetic) {
        sign = axis.hemisphere_sign(last)?;
        text.pop();
    }

    let text = text.trim().replace(',', ".");
    if text.is_empty() {
        return None;
    }

    let value = if text.contains(['°', '\'', '"', ':', '′', '″']) {
        parse_sexagesimal(&text)?
    } else {
        text.parse::<f64>().ok()?
    };
    if !value.is_finite() {
        return None;
    }

    let value = if sign < 0.0 { -value.abs() } else { value };
    if value.abs() > axis.limit() {
        return None;
    }
    Some((value * 1e8).round() / 1e8)
}

fn parse_sexagesimal(text: &str) -> Option<f64> {
    let parts: Vec<&str> = text
        .split(|c: char| matches!(c, '°' | '\'' | '"' | ':' | '′' | '″') || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }

    let degrees: f64 = parts[0].parse().ok()?;
    let minutes: f64 = match parts.get(1) {
        Some(p) => p.parse().ok()?,
        None => 0.0,
    };
    let seconds: f64 = match parts.get(2) {
        Some(p) => p.parse().ok()?,
        None => 0.0,
    };
    if !(0.0..60.0).contains(&minutes) || !(0.0..60.0).contains(&seconds) {
        return None;
    }

    let magnitude = degrees.abs() + minutes / 60.0 + seconds / 3600.0;
    Some(if parts[0].starts_with('-') {
        -magnitude
    } else {
        magnitude
    })
}
