//! Path colours.
//!
//! Colours use 16-bit channels. Each drawn person shifts the run's colour a
//! little further (see [`Rgb16::shifted`]), so successive generations stand
//! apart on the map.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Per-level step applied to the channels, in 16-bit units.
const LEVEL_STEP: i64 = 3000;
const CHANNEL_MODULUS: i64 = 65535;

const NAMED: &[(&str, (u8, u8, u8))] = &[
    ("black", (0x00, 0x00, 0x00)),
    ("blue", (0x00, 0x00, 0xff)),
    ("brown", (0xa5, 0x2a, 0x2a)),
    ("cyan", (0x00, 0xff, 0xff)),
    ("gray", (0xbe, 0xbe, 0xbe)),
    ("green", (0x00, 0xff, 0x00)),
    ("grey", (0xbe, 0xbe, 0xbe)),
    ("magenta", (0xff, 0x00, 0xff)),
    ("maroon", (0xb0, 0x30, 0x60)),
    ("navy", (0x00, 0x00, 0x80)),
    ("orange", (0xff, 0xa5, 0x00)),
    ("purple", (0xa0, 0x20, 0xf0)),
    ("red", (0xff, 0x00, 0x00)),
    ("white", (0xff, 0xff, 0xff)),
    ("yellow", (0xff, 0xff, 0x00)),
];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("unknown colour name: {0:?}")]
    UnknownName(String),

    #[error("malformed hex colour: {0:?}")]
    MalformedHex(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb16 {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

impl Rgb16 {
    pub const fn new(red: u16, green: u16, blue: u16) -> Self {
        Self { red, green, blue }
    }

    pub const fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as u16 * 257,
            green: green as u16 * 257,
            blue: blue as u16 * 257,
        }
    }

    /// Colour carried to the next person after one is drawn at `level`:
    /// red drifts down, and green (odd levels) or blue (even levels) drifts
    /// up. Level 0 leaves the colour untouched.
    pub fn shifted(self, level: u32) -> Self {
        if level == 0 {
            return self;
        }
        let step = i64::from(level) * LEVEL_STEP;
        let wrap = |v: u16, delta: i64| (v as i64 + delta).rem_euclid(CHANNEL_MODULUS) as u16;
        let mut next = self;
        next.red = wrap(self.red, -step);
        if level % 2 == 1 {
            next.green = wrap(self.green, step);
        } else {
            next.blue = wrap(self.blue, step);
        }
        next
    }
}

impl FromStr for Rgb16 {
    type Err = ColorError;

    /// Accepts a colour name (`"orange"`), `#rgb`, or `#rrggbb`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let spec = s.trim();
        if let Some(hex) = spec.strip_prefix('#') {
            let malformed = || ColorError::MalformedHex(spec.to_string());
            if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(malformed());
            }
            let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| malformed());
            return match hex.len() {
                3 => {
                    let expand = |i: usize| channel(hex[i..i + 1].repeat(2).as_str());
                    Ok(Self::from_rgb8(expand(0)?, expand(1)?, expand(2)?))
                }
                6 => Ok(Self::from_rgb8(
                    channel(&hex[0..2])?,
                    channel(&hex[2..4])?,
                    channel(&hex[4..6])?,
                )),
                _ => Err(malformed()),
            };
        }
        let lower = spec.to_ascii_lowercase();
        NAMED
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, (r, g, b))| Self::from_rgb8(*r, *g, *b))
            .ok_or_else(|| ColorError::UnknownName(spec.to_string()))
    }
}

/// `#rrggbb`, using the high byte of each channel.
impl fmt::Display for Rgb16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}",
            self.red >> 8,
            self.green >> 8,
            self.blue >> 8
        )
    }
}

impl Serialize for Rgb16 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_hex() {
        let orange: Rgb16 = "orange".parse().unwrap();
        assert_eq!(orange, Rgb16::new(0xffff, 0xa5a5, 0x0000));
        assert_eq!("Orange".parse::<Rgb16>().unwrap(), orange);
        assert_eq!("#ffa500".parse::<Rgb16>().unwrap(), orange);
        assert_eq!("#f00".parse::<Rgb16>().unwrap(), Rgb16::from_rgb8(255, 0, 0));
    }

    #[test]
    fn rejects_bad_specs() {
        assert_eq!(
            "chartreuse-ish".parse::<Rgb16>(),
            Err(ColorError::UnknownName("chartreuse-ish".to_string()))
        );
        assert!(matches!("#12345".parse::<Rgb16>(), Err(ColorError::MalformedHex(_))));
        assert!(matches!("#gggggg".parse::<Rgb16>(), Err(ColorError::MalformedHex(_))));
    }

    #[test]
    fn display_round_trips_through_parse() {
        let c: Rgb16 = "#1a2b3c".parse().unwrap();
        assert_eq!(c.to_string(), "#1a2b3c");
    }

    #[test]
    fn level_zero_leaves_colour_unchanged() {
        let c = Rgb16::new(100, 200, 300);
        assert_eq!(c.shifted(0), c);
    }

    #[test]
    fn level_zero_keeps_full_channels() {
        let white = Rgb16::new(0xffff, 0xffff, 0xffff);
        assert_eq!(white.shifted(0), white);
        let orange: Rgb16 = "orange".parse().unwrap();
        assert_eq!(orange.shifted(0).red, 0xffff);
    }

    #[test]
    fn full_channels_wrap_on_later_levels() {
        let white = Rgb16::new(0xffff, 0xffff, 0xffff);
        assert_eq!(white.shifted(1), Rgb16::new(62535, 3000, 0xffff));
        assert_eq!(white.shifted(2), Rgb16::new(59535, 0xffff, 6000));
    }

    #[test]
    fn shift_alternates_green_and_blue_and_wraps() {
        let base = Rgb16::new(1000, 0, 0);
        let odd = base.shifted(1);
        assert_eq!(odd, Rgb16::new(63535, 3000, 0));
        let even = base.shifted(2);
        assert_eq!(even, Rgb16::new(60535, 0, 6000));
    }
}
