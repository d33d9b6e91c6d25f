use anyhow::{Context, Result};
use geomoves_core::animation::AnimationSettings;
use geomoves_core::color::Rgb16;
use geomoves_core::date::Calendar;
use geomoves_core::names::{NameFormat, StandardNameDisplay};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub tree: TreeConfig,
    #[serde(default)]
    pub geography: GeographyConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TreeConfig {
    /// JSON family-tree document.
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeographyConfig {
    #[serde(default = "default_maximum_generations")]
    pub maximum_generations: u32,
    /// Milliseconds between two generations.
    #[serde(default = "default_generation_interval")]
    pub generation_interval: u64,
    #[serde(default = "default_color_base")]
    pub color_base: String,
}

impl Default for GeographyConfig {
    fn default() -> Self {
        Self {
            maximum_generations: default_maximum_generations(),
            generation_interval: default_generation_interval(),
            color_base: default_color_base(),
        }
    }
}

fn default_maximum_generations() -> u32 {
    10
}
fn default_generation_interval() -> u64 {
    500
}
fn default_color_base() -> String {
    "orange".to_string()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DisplayConfig {
    #[serde(default)]
    pub name_format: NameFormat,
    #[serde(default)]
    pub calendar: Calendar,
}

impl Config {
    /// Defaults for everything except the tree location. Used when no
    /// config file exists but `--tree` was given.
    pub fn with_tree(path: PathBuf) -> Self {
        Self {
            tree: TreeConfig { path },
            geography: GeographyConfig::default(),
            display: DisplayConfig::default(),
        }
    }

    pub fn animation_settings(&self) -> Result<AnimationSettings> {
        let color_base: Rgb16 = self
            .geography
            .color_base
            .parse()
            .with_context(|| "Invalid geography.color_base")?;
        Ok(AnimationSettings {
            maximum_generations: self.geography.maximum_generations,
            generation_interval: Duration::from_millis(self.geography.generation_interval),
            color_base,
            calendar: self.display.calendar,
        })
    }

    pub fn name_display(&self) -> StandardNameDisplay {
        StandardNameDisplay::new(self.display.name_format)
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

pub fn validate(config: &Config) -> Result<()> {
    if !(1..=20).contains(&config.geography.maximum_generations) {
        anyhow::bail!("geography.maximum_generations must be in [1, 20]");
    }

    if !(500..=3000).contains(&config.geography.generation_interval) {
        anyhow::bail!("geography.generation_interval must be in [500, 3000] milliseconds");
    }

    if let Err(err) = config.geography.color_base.parse::<Rgb16>() {
        anyhow::bail!("geography.color_base: {}", err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_text: &str) -> Result<Config> {
        let config: Config = toml::from_str(toml_text)?;
        validate(&config)?;
        Ok(config)
    }

    #[test]
    fn defaults_fill_missing_sections() {
        let config = parse("[tree]\npath = \"family.json\"\n").unwrap();
        assert_eq!(config.geography.maximum_generations, 10);
        assert_eq!(config.geography.generation_interval, 500);
        assert_eq!(config.geography.color_base, "orange");
        assert_eq!(config.display.name_format, NameFormat::SurnameGiven);
        assert_eq!(config.display.calendar, Calendar::Gregorian);

        let settings = config.animation_settings().unwrap();
        assert_eq!(settings.generation_interval, Duration::from_millis(500));
        assert_eq!(settings.color_base, Rgb16::from_rgb8(0xff, 0xa5, 0x00));
    }

    #[test]
    fn display_section_is_parsed() {
        let config = parse(
            "[tree]\npath = \"t.json\"\n\n[display]\nname_format = \"given_surname\"\ncalendar = \"julian\"\n",
        )
        .unwrap();
        assert_eq!(config.display.name_format, NameFormat::GivenSurname);
        assert_eq!(config.animation_settings().unwrap().calendar, Calendar::Julian);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let err = parse("[tree]\npath = \"t.json\"\n[geography]\nmaximum_generations = 0\n")
            .unwrap_err();
        assert!(err.to_string().contains("maximum_generations"));

        let err = parse("[tree]\npath = \"t.json\"\n[geography]\ngeneration_interval = 100\n")
            .unwrap_err();
        assert!(err.to_string().contains("generation_interval"));

        let err = parse("[tree]\npath = \"t.json\"\n[geography]\ncolor_base = \"plaid\"\n")
            .unwrap_err();
        assert!(err.to_string().contains("color_base"));
    }

    #[test]
    fn missing_file_has_context() {
        let err = load_config(Path::new("/nonexistent/geomoves.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
