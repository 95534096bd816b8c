//! Background particle field.
//!
//! Configured once at startup and then left to run on the UI frame clock.
//! Coordinates are in terminal cells; distances treat a cell as twice as
//! tall as it is wide.

use crate::{
    config::ParticleConfig,
    error::ConfigError,
    helpers::{dim, line_points, parse_hex_color},
    types::{ClickMode, HoverMode, MoveDirection, OutMode, Point, Shape},
};

use rand::Rng;
use ratatui::{prelude::*, widgets::Widget};
use std::time::Duration;
use tracing::debug;

const CELL_ASPECT: f32 = 2.0;
const REPULSE_STRENGTH: f32 = 6.0;
const LINK_GLYPH: char = '·';

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub pos: Point,
    /// Heading, scaled by the configured speed each step.
    pub vel: Point,
    pub size: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
    pub from: Point,
    pub to: Point,
    /// 1.0 when touching, falling to 0.0 at the link distance.
    pub strength: f32,
}

pub struct ParticleField<R> {
    config: ParticleConfig,
    color: Color,
    link_color: Color,
    particles: Vec<Particle>,
    width: f32,
    height: f32,
    seeded: bool,
    pointer: Option<Point>,
    rng: R,
}

fn distance(a: Point, b: Point) -> f32 {
    let dx = a.x - b.x;
    let dy = (a.y - b.y) * CELL_ASPECT;
    (dx * dx + dy * dy).sqrt()
}

/// Folds `value` into `[0, max)`. `max` must be positive.
fn wrap(value: f32, max: f32) -> f32 {
    let wrapped = value.rem_euclid(max);
    // rem_euclid rounds tiny negatives up to `max`.
    if wrapped >= max { 0.0 } else { wrapped }
}

fn bounce(value: &mut f32, vel: &mut f32, max: f32) {
    if *value < 0.0 {
        *value = 0.0;
        *vel = vel.abs();
    } else if *value >= max {
        *value = (max - 0.01).max(0.0);
        *vel = -vel.abs();
    }
}

fn glyph(shape: Shape, size: f32) -> char {
    if size < 1.0 {
        return LINK_GLYPH;
    }

    let large = size >= 2.0;
    match shape {
        Shape::Circle if large => '●',
        Shape::Circle => '•',
        Shape::Edge if large => '■',
        Shape::Edge => '▪',
        Shape::Triangle if large => '▲',
        Shape::Triangle => '▴',
        Shape::Star if large => '★',
        Shape::Star => '✦',
    }
}

impl<R: Rng> ParticleField<R> {
    pub fn new(config: ParticleConfig, rng: R) -> Result<Self, ConfigError> {
        let color = parse_hex_color(&config.color)?;
        let link_color = parse_hex_color(&config.links.color)?;

        Ok(Self {
            config,
            color,
            link_color,
            particles: Vec::new(),
            width: 0.0,
            height: 0.0,
            seeded: false,
            pointer: None,
            rng,
        })
    }

    /// Sets the container size. The first non-empty size seeds the field.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width as f32;
        self.height = height as f32;

        if width == 0 || height == 0 {
            return;
        }

        if !self.seeded {
            self.seeded = true;
            for _ in 0..self.config.count {
                let particle = self.spawn(None);
                self.particles.push(particle);
            }
            debug!(count = self.particles.len(), width, height, "particle field seeded");
            return;
        }

        let (w, h) = (self.width, self.height);
        for p in &mut self.particles {
            p.pos.x = p.pos.x.min(w - 0.01);
            p.pos.y = p.pos.y.min(h - 0.01);
        }
    }

    fn spawn(&mut self, at: Option<Point>) -> Particle {
        let pos = at.unwrap_or_else(|| {
            Point::new(
                self.rng.random_range(0.0..self.width),
                self.rng.random_range(0.0..self.height),
            )
        });

        let movement = &self.config.movement;
        let base = match movement.direction {
            MoveDirection::None => Point::new(0.0, 0.0),
            MoveDirection::Top => Point::new(0.0, -1.0),
            MoveDirection::Bottom => Point::new(0.0, 1.0),
            MoveDirection::Left => Point::new(-1.0, 0.0),
            MoveDirection::Right => Point::new(1.0, 0.0),
        };
        let vel = if movement.direction == MoveDirection::None {
            Point::new(
                self.rng.random_range(-1.0..1.0),
                self.rng.random_range(-1.0..1.0) / CELL_ASPECT,
            )
        } else if movement.random {
            Point::new(
                base.x + self.rng.random_range(-0.5..0.5),
                base.y + self.rng.random_range(-0.5..0.5),
            )
        } else {
            base
        };

        let size = if self.config.size_random {
            self.config.size * self.rng.random_range(0.0..1.0)
        } else {
            self.config.size
        };

        Particle { pos, vel, size }
    }

    /// Advances every particle by `dt`.
    pub fn step(&mut self, dt: Duration) {
        if !self.config.movement.enabled || self.width <= 0.0 || self.height <= 0.0 {
            return;
        }

        let secs = dt.as_secs_f32();
        let speed = self.config.movement.speed;
        let out_mode = self.config.movement.out_mode;
        let (w, h) = (self.width, self.height);
        let repulse = match (self.config.interactivity.on_hover, self.pointer) {
            (HoverMode::Repulse, Some(pointer)) => Some(pointer),
            _ => None,
        };
        let radius = self.config.interactivity.grab_distance;

        for p in &mut self.particles {
            p.pos.x += p.vel.x * speed * secs;
            p.pos.y += p.vel.y * speed * secs;

            if let Some(pointer) = repulse {
                let d = distance(p.pos, pointer);
                if d > 0.0 && d < radius {
                    let push = (radius - d) / radius * REPULSE_STRENGTH * speed * secs;
                    p.pos.x += (p.pos.x - pointer.x) / d * push;
                    p.pos.y += (p.pos.y - pointer.y) / d * push;
                }
            }

            match out_mode {
                OutMode::Out => {
                    p.pos.x = wrap(p.pos.x, w);
                    p.pos.y = wrap(p.pos.y, h);
                }
                OutMode::Bounce => {
                    bounce(&mut p.pos.x, &mut p.vel.x, w);
                    bounce(&mut p.pos.y, &mut p.vel.y, h);
                }
            }
        }
    }

    pub fn hover(&mut self, pointer: Option<Point>) {
        self.pointer = pointer;
    }

    pub fn click(&mut self, at: Point) {
        let count = self.config.interactivity.push_count;

        match self.config.interactivity.on_click {
            ClickMode::None => {}
            ClickMode::Push => {
                let room = match self.config.limit {
                    0 => count,
                    limit => limit.saturating_sub(self.particles.len()).min(count),
                };
                for _ in 0..room {
                    let particle = self.spawn(Some(at));
                    self.particles.push(particle);
                }
                debug!(pushed = room, total = self.particles.len(), "particles pushed");
            }
            ClickMode::Remove => {
                let removed = count.min(self.particles.len());
                self.particles.drain(..removed);
                debug!(removed, total = self.particles.len(), "particles removed");
            }
        }
    }
}

impl<R> ParticleField<R> {
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Pairs of particles closer than the link distance.
    pub fn links(&self) -> Vec<Link> {
        let links = &self.config.links;
        if !links.enabled || links.distance <= 0.0 {
            return Vec::new();
        }

        let mut out = Vec::new();
        for (i, a) in self.particles.iter().enumerate() {
            for b in &self.particles[i + 1..] {
                let d = distance(a.pos, b.pos);
                if d < links.distance {
                    out.push(Link {
                        from: a.pos,
                        to: b.pos,
                        strength: 1.0 - d / links.distance,
                    });
                }
            }
        }

        out
    }

    /// Lines from the pointer to nearby particles while hovering in grab mode.
    pub fn grab_links(&self) -> Vec<Link> {
        let interactivity = &self.config.interactivity;
        let Some(pointer) = self.pointer else {
            return Vec::new();
        };
        if interactivity.on_hover != HoverMode::Grab || interactivity.grab_distance <= 0.0 {
            return Vec::new();
        }

        self.particles
            .iter()
            .filter_map(|p| {
                let d = distance(pointer, p.pos);
                (d < interactivity.grab_distance).then(|| Link {
                    from: pointer,
                    to: p.pos,
                    strength: 1.0 - d / interactivity.grab_distance,
                })
            })
            .collect()
    }
}

fn put(buf: &mut Buffer, area: Rect, pos: (i32, i32), ch: char, color: Color) {
    let (x, y) = pos;
    if x < 0 || y < 0 || x >= area.width as i32 || y >= area.height as i32 {
        return;
    }

    if let Some(cell) = buf.cell_mut((area.x + x as u16, area.y + y as u16)) {
        cell.set_char(ch).set_fg(color);
    }
}

impl<R> Widget for &ParticleField<R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let link_opacity = self.config.links.opacity;

        for link in self.links().into_iter().chain(self.grab_links()) {
            let color = dim(self.link_color, link_opacity * link.strength);
            let from = (link.from.x as i32, link.from.y as i32);
            let to = (link.to.x as i32, link.to.y as i32);

            for point in line_points(from, to) {
                put(buf, area, point, LINK_GLYPH, color);
            }
        }

        let color = dim(self.color, self.config.opacity);
        for p in &self.particles {
            put(
                buf,
                area,
                (p.pos.x as i32, p.pos.y as i32),
                glyph(self.config.shape, p.size),
                color,
            );
        }
    }
}
