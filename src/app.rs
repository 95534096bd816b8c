use crate::{
    animator::{RenderSink, ScrambleRevealAnimator},
    config::Config,
    error::ConfigError,
    helpers::centered_rows,
    particles::ParticleField,
    types::{AnimatorState, Point},
};

use rand::{Rng, rngs::ThreadRng};
use ratatui::{
    crossterm::event::{MouseButton, MouseEvent, MouseEventKind},
    prelude::*,
    widgets::*,
};
use std::time::Instant;

/// The on-screen text element the animator writes into.
#[derive(Debug, Default)]
pub struct Headline {
    text: String,
}

impl Headline {
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl RenderSink for Headline {
    fn set_text(&mut self, text: &str) {
        self.text.set_text(text);
    }
}

pub struct App<R = ThreadRng> {
    animator: ScrambleRevealAnimator<R>,
    headline: Headline,
    particles: Option<ParticleField<R>>,
    last_update: Instant,
}

impl App<ThreadRng> {
    pub fn new(config: &Config, now: Instant) -> Result<Self, ConfigError> {
        Self::with_rng(config, now, rand::rng)
    }
}

impl<R: Rng> App<R> {
    /// Builds the app with a fresh generator per component from `rng`.
    pub fn with_rng(
        config: &Config,
        now: Instant,
        mut rng: impl FnMut() -> R,
    ) -> Result<Self, ConfigError> {
        let animator = ScrambleRevealAnimator::new(&config.reveal, rng(), now)?;
        let particles = if config.particles.enabled {
            Some(ParticleField::new(config.particles.clone(), rng())?)
        } else {
            None
        };

        Ok(Self {
            animator,
            headline: Headline::default(),
            particles,
            last_update: now,
        })
    }

    /// Runs due animator ticks and steps the background.
    pub fn update(&mut self, now: Instant) {
        self.animator.poll(now, &mut self.headline);

        if let Some(field) = &mut self.particles {
            field.step(now.saturating_duration_since(self.last_update));
        }
        self.last_update = now;
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let Some(field) = &mut self.particles else {
            return;
        };

        let at = Point::new(mouse.column as f32, mouse.row as f32);
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => field.hover(Some(at)),
            MouseEventKind::Down(MouseButton::Left) => field.click(at),
            _ => {}
        }
    }

    /// Pointer left the window.
    pub fn clear_hover(&mut self) {
        if let Some(field) = &mut self.particles {
            field.hover(None);
        }
    }

    pub fn headline(&self) -> &str {
        self.headline.text()
    }

    pub fn next_deadline(&self) -> Instant {
        self.animator.next_deadline()
    }

    pub fn status(&self) -> String {
        let reveal = match self.animator.state() {
            AnimatorState::Running => {
                let revealed = self.animator.cursor().clamp(0, self.animator.target_len() as isize);
                format!("revealing {}/{}", revealed, self.animator.target_len())
            }
            AnimatorState::Paused => "paused".to_string(),
        };

        match &self.particles {
            Some(field) => format!("{} | {} particles", reveal, field.particles().len()),
            None => reveal,
        }
    }

    pub fn draw_ui(&mut self, f: &mut Frame) {
        let area = f.area();

        if let Some(field) = &mut self.particles {
            field.resize(area.width, area.height);
            f.render_widget(&*field, area);
        }

        let headline = Paragraph::new(self.headline())
            .style(Style::default().add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        f.render_widget(headline, centered_rows(area, 1));

        let footer_area = Rect::new(
            area.x,
            area.bottom().saturating_sub(1),
            area.width,
            area.height.min(1),
        );
        let hint = "ESC to quit";
        let [status_area, hint_area] = Layout::horizontal([
            Constraint::Min(0),
            Constraint::Length(hint.len() as u16),
        ])
        .areas(footer_area);

        let dimmed = Style::default().fg(Color::DarkGray);
        f.render_widget(Paragraph::new(self.status()).style(dimmed), status_area);
        f.render_widget(Paragraph::new(hint).style(dimmed), hint_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::{SeedableRng, rngs::StdRng};
    use ratatui::{
        backend::TestBackend,
        crossterm::event::KeyModifiers,
    };
    use std::time::Duration;

    fn config(target: &str, alphabet: &str, particles: bool) -> Config {
        let mut config = Config::default();
        config.reveal.target = target.to_string();
        config.reveal.alphabet = alphabet.to_string();
        config.particles.enabled = particles;
        config
    }

    fn app(config: &Config, now: Instant) -> App<StdRng> {
        let mut seed = 0;
        App::with_rng(config, now, || {
            seed += 1;
            StdRng::seed_from_u64(seed)
        })
        .unwrap()
    }

    fn row(terminal: &Terminal<TestBackend>, y: u16) -> String {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.width)
            .map(|x| buffer.cell((x, y)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn headline_is_empty_until_first_tick() {
        let t0 = Instant::now();
        let mut app = app(&config("AB", "#", false), t0);

        app.update(t0 + Duration::from_millis(50));
        assert_eq!(app.headline(), "");

        app.update(t0 + Duration::from_millis(100));
        assert_eq!(app.headline(), "##");

        app.update(t0 + Duration::from_millis(200));
        app.update(t0 + Duration::from_millis(300));
        assert_eq!(app.headline(), "AB");
    }

    #[test]
    fn draws_headline_centered() {
        let t0 = Instant::now();
        let mut app = app(&config("AB", "#", false), t0);
        app.update(t0 + Duration::from_millis(100));
        app.update(t0 + Duration::from_millis(200));

        let mut terminal = Terminal::new(TestBackend::new(40, 5)).unwrap();
        terminal.draw(|f| app.draw_ui(f)).unwrap();

        assert_eq!(row(&terminal, 2).trim(), "A#");
        assert_eq!(row(&terminal, 2).find("A#"), Some(19));

        let footer = row(&terminal, 4);
        assert!(footer.starts_with("revealing 1/2 "), "{footer:?}");
        assert!(footer.ends_with("ESC to quit"), "{footer:?}");
    }

    #[test]
    fn draws_particles_behind_headline() {
        let t0 = Instant::now();
        let mut app = app(&config("HI", "#", true), t0);

        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        terminal.draw(|f| app.draw_ui(f)).unwrap();

        let field = app.particles.as_ref().unwrap();
        assert_eq!(field.particles().len(), Config::default().particles.count);
    }

    #[test]
    fn left_click_pushes_particles() {
        let t0 = Instant::now();
        let mut app = app(&config("HI", "#", true), t0);
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        terminal.draw(|f| app.draw_ui(f)).unwrap();
        let before = app.particles.as_ref().unwrap().particles().len();

        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 5,
            row: 5,
            modifiers: KeyModifiers::NONE,
        });

        let after = app.particles.as_ref().unwrap().particles().len();
        assert_eq!(after, before + 4);
    }

    #[test]
    fn hover_then_clear() {
        let t0 = Instant::now();
        let mut app = app(&config("HI", "#", true), t0);
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        terminal.draw(|f| app.draw_ui(f)).unwrap();
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 20,
            row: 5,
            modifiers: KeyModifiers::NONE,
        });

        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Moved,
            column: 20,
            row: 5,
            modifiers: KeyModifiers::NONE,
        });
        assert!(!app.particles.as_ref().unwrap().grab_links().is_empty());

        app.clear_hover();
        assert!(app.particles.as_ref().unwrap().grab_links().is_empty());
    }

    #[test]
    fn status_tracks_cycle_and_particle_count() {
        let t0 = Instant::now();
        let mut app = app(&config("AB", "#", false), t0);
        assert_eq!(app.status(), "revealing 0/2");

        for ms in [100, 200, 300] {
            app.update(t0 + Duration::from_millis(ms));
        }
        assert_eq!(app.status(), "revealing 2/2");

        app.update(t0 + Duration::from_millis(400));
        assert_eq!(app.status(), "paused");
        assert_eq!(app.next_deadline(), t0 + Duration::from_millis(2400));

        let mut app = app_with_particles();
        app.update(t0);
        assert!(app.status().ends_with("| 60 particles"));
    }

    fn app_with_particles() -> App<StdRng> {
        let mut app = app(&config("AB", "#", true), Instant::now());
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        terminal.draw(|f| app.draw_ui(f)).unwrap();
        app
    }

    #[test]
    fn invalid_reveal_settings_fail_construction() {
        let result = App::with_rng(&config("AB", "", false), Instant::now(), || {
            StdRng::seed_from_u64(0)
        });
        assert!(matches!(result, Err(ConfigError::EmptyAlphabet)));
    }
}
