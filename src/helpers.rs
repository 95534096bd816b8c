use crate::{config::Config, error::ConfigError};

use clap::Parser;
use ratatui::prelude::*;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "scramble-reveal")]
#[command(version)]
#[command(about = "A name that decrypts itself over a drifting particle field", long_about = None)]
pub struct Cli {
    /// Read configuration from PATH instead of the default location
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write a default configuration file and exit
    #[arg(long)]
    pub init: bool,

    /// Text to reveal
    #[arg(short, long, value_name = "TEXT")]
    pub target: Option<String>,

    /// Glyphs shown in place of unrevealed characters
    #[arg(short, long, value_name = "TEXT")]
    pub alphabet: Option<String>,

    /// Disable the particle background
    #[arg(long)]
    pub no_particles: bool,

    /// Write logs to PATH
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Command line values take precedence over the config file.
pub fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(target) = &cli.target {
        config.reveal.target = target.clone();
    }
    if let Some(alphabet) = &cli.alphabet {
        config.reveal.alphabet = alphabet.clone();
    }
    if cli.no_particles {
        config.particles.enabled = false;
    }
    if let Some(path) = &cli.log_file {
        config.log.file = Some(path.clone());
    }
}

/// Parses `#rrggbb` or `#rgb`.
pub fn parse_hex_color(value: &str) -> Result<Color, ConfigError> {
    let invalid = || ConfigError::Color(value.to_string());

    let hex = value.trim().strip_prefix('#').ok_or_else(invalid)?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());

    match hex.len() {
        6 => Ok(Color::Rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        3 => {
            let r = channel(&hex[0..1])?;
            let g = channel(&hex[1..2])?;
            let b = channel(&hex[2..3])?;
            Ok(Color::Rgb(r * 17, g * 17, b * 17))
        }
        _ => Err(invalid()),
    }
}

/// Scales an RGB color toward black.
pub fn dim(color: Color, factor: f32) -> Color {
    let factor = factor.clamp(0.0, 1.0);
    match color {
        Color::Rgb(r, g, b) => Color::Rgb(
            (r as f32 * factor) as u8,
            (g as f32 * factor) as u8,
            (b as f32 * factor) as u8,
        ),
        other => other,
    }
}

/// A rect of `height` rows spanning the full width, vertically centered.
pub fn centered_rows(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    let y = area.y + (area.height - height) / 2;

    Rect::new(area.x, y, area.width, height)
}

/// Integer cells on the segment between two points, endpoints included.
pub fn line_points(from: (i32, i32), to: (i32, i32)) -> Vec<(i32, i32)> {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut points = Vec::with_capacity((dx - dy) as usize + 1);
    loop {
        points.push((x, y));
        if (x, y) == to {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(parse_hex_color("#ff8000").unwrap(), Color::Rgb(255, 128, 0));
        assert_eq!(parse_hex_color("#fff").unwrap(), Color::Rgb(255, 255, 255));
        assert_eq!(parse_hex_color(" #0a0B0c ").unwrap(), Color::Rgb(10, 11, 12));
    }

    #[test]
    fn rejects_malformed_colors() {
        for value in ["ffffff", "#ffff", "#gggggg", "", "#", "#ff00ff00"] {
            assert!(
                matches!(parse_hex_color(value), Err(ConfigError::Color(_))),
                "{value:?}"
            );
        }
    }

    #[test]
    fn dim_scales_rgb_only() {
        assert_eq!(dim(Color::Rgb(200, 100, 50), 0.5), Color::Rgb(100, 50, 25));
        assert_eq!(dim(Color::Rgb(10, 10, 10), 3.0), Color::Rgb(10, 10, 10));
        assert_eq!(dim(Color::White, 0.1), Color::White);
    }

    #[test]
    fn centered_rows_clamps_to_area() {
        let area = Rect::new(0, 0, 40, 11);
        assert_eq!(centered_rows(area, 1), Rect::new(0, 5, 40, 1));
        assert_eq!(centered_rows(area, 20), area);
    }

    #[test]
    fn line_points_cover_both_endpoints() {
        assert_eq!(line_points((0, 0), (3, 0)), vec![(0, 0), (1, 0), (2, 0), (3, 0)]);
        assert_eq!(line_points((2, 2), (2, 2)), vec![(2, 2)]);

        let diagonal = line_points((4, 4), (0, 0));
        assert_eq!(diagonal.first(), Some(&(4, 4)));
        assert_eq!(diagonal.last(), Some(&(0, 0)));
        assert_eq!(diagonal.len(), 5);
    }

    #[test]
    fn overrides_replace_config_values() {
        let cli = Cli::parse_from([
            "scramble-reveal",
            "--target",
            "Linus",
            "-a",
            "01",
            "--no-particles",
        ]);
        let mut config = Config::default();
        apply_overrides(&mut config, &cli);

        assert_eq!(config.reveal.target, "Linus");
        assert_eq!(config.reveal.alphabet, "01");
        assert!(!config.particles.enabled);
        assert!(config.log.file.is_none());
    }
}
