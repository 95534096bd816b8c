use crate::{
    error::ConfigError,
    helpers::parse_hex_color,
    types::{ClickMode, HoverMode, MoveDirection, OutMode, Shape},
};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

const DEFAULT_TARGET: &str = "AISSAM";
const DEFAULT_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%&*";
const DEFAULT_TICK_MS: u64 = 100;
const DEFAULT_PAUSE_MS: u64 = 2000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub reveal: RevealConfig,
    pub particles: ParticleConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Text the animation resolves to.
    pub target: String,
    /// Filler glyphs for unrevealed positions.
    pub alphabet: String,
    pub tick_ms: u64,
    /// Delay between a completed reveal and the next cycle.
    pub pause_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET.to_string(),
            alphabet: DEFAULT_ALPHABET.to_string(),
            tick_ms: DEFAULT_TICK_MS,
            pause_ms: DEFAULT_PAUSE_MS,
        }
    }
}

impl RevealConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.alphabet.is_empty() {
            return Err(ConfigError::EmptyAlphabet);
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroInterval("reveal.tick_ms"));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub enabled: bool,
    /// Particles seeded on the first resize.
    pub count: usize,
    /// Upper bound enforced by click pushes, 0 for none.
    pub limit: usize,
    pub color: String,
    pub shape: Shape,
    pub opacity: f32,
    pub size: f32,
    pub size_random: bool,
    #[serde(rename = "move")]
    pub movement: MoveConfig,
    pub links: LinkConfig,
    pub interactivity: InteractivityConfig,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            count: 60,
            limit: 300,
            color: "#ffffff".to_string(),
            shape: Shape::Circle,
            opacity: 0.5,
            size: 3.0,
            size_random: true,
            movement: MoveConfig::default(),
            links: LinkConfig::default(),
            interactivity: InteractivityConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveConfig {
    pub enabled: bool,
    /// Cells per second.
    pub speed: f32,
    pub direction: MoveDirection,
    pub random: bool,
    pub out_mode: OutMode,
}

impl Default for MoveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            speed: 4.0,
            direction: MoveDirection::None,
            random: false,
            out_mode: OutMode::Out,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    pub enabled: bool,
    pub color: String,
    pub distance: f32,
    pub opacity: f32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            color: "#ffffff".to_string(),
            distance: 12.0,
            opacity: 0.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractivityConfig {
    pub on_hover: HoverMode,
    pub on_click: ClickMode,
    pub grab_distance: f32,
    pub push_count: usize,
}

impl Default for InteractivityConfig {
    fn default() -> Self {
        Self {
            on_hover: HoverMode::Grab,
            on_click: ClickMode::Push,
            grab_distance: 14.0,
            push_count: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    /// Log destination; without one, events are discarded since the
    /// terminal belongs to the UI.
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "scramble-reveal").map(|dirs| dirs.config_dir().join("config.toml"))
}

impl Config {
    /// Loads `path` if given, otherwise the default location. A missing
    /// default file yields built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::load_from_path(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Writes the defaults to the default location and returns that path.
    pub fn write_default() -> Result<PathBuf, ConfigError> {
        let path = default_config_path().ok_or(ConfigError::NoConfigDir)?;
        let dir = path.parent().ok_or(ConfigError::NoConfigDir)?;

        fs::create_dir_all(dir).map_err(|source| ConfigError::Write {
            path: dir.to_path_buf(),
            source,
        })?;
        fs::write(&path, Self::default().to_toml()?).map_err(|source| ConfigError::Write {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }

    /// Checks every section, including particle colors when the field is
    /// disabled.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.reveal.validate()?;
        parse_hex_color(&self.particles.color)?;
        parse_hex_color(&self.particles.links.color)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.reveal.tick(), Duration::from_millis(100));
        assert_eq!(config.reveal.pause(), Duration::from_millis(2000));
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = Config::from_toml(
            r##"
[reveal]
target = "Ada Lovelace"

[particles]
count = 10
shape = "star"

[particles.move]
direction = "top"
out_mode = "bounce"

[particles.interactivity]
on_click = "remove"
"##,
        )
        .unwrap();

        assert_eq!(config.reveal.target, "Ada Lovelace");
        assert_eq!(config.reveal.alphabet, DEFAULT_ALPHABET);
        assert_eq!(config.particles.count, 10);
        assert_eq!(config.particles.shape, Shape::Star);
        assert_eq!(config.particles.movement.direction, MoveDirection::Top);
        assert_eq!(config.particles.movement.out_mode, OutMode::Bounce);
        assert_eq!(config.particles.interactivity.on_click, ClickMode::Remove);
        assert_eq!(config.particles.interactivity.on_hover, HoverMode::Grab);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn unknown_enum_value_is_a_parse_error() {
        assert!(Config::from_toml("[particles]\nshape = \"hexagon\"\n").is_err());
    }

    #[test]
    fn defaults_survive_serialization() {
        let text = Config::default().to_toml().unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), Config::default());
    }

    #[test]
    fn validation_rejects_empty_alphabet_and_zero_tick() {
        let mut reveal = RevealConfig {
            alphabet: String::new(),
            ..RevealConfig::default()
        };
        assert!(matches!(reveal.validate(), Err(ConfigError::EmptyAlphabet)));

        reveal.alphabet = "#".to_string();
        reveal.tick_ms = 0;
        assert!(matches!(
            reveal.validate(),
            Err(ConfigError::ZeroInterval("reveal.tick_ms"))
        ));
    }

    #[test]
    fn validation_checks_colors_of_disabled_particles() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.particles.enabled = false;
        config.particles.color = "white".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Color(c)) if c == "white"));

        config.particles.color = "#fff".to_string();
        config.particles.links.color = "#12345".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Color(_))));
    }

    #[test]
    fn missing_explicit_file_is_a_read_error() {
        let err = Config::load(Some(Path::new("/nonexistent/scramble-reveal.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
