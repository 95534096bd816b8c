mod animator;
mod app;
mod config;
mod error;
mod helpers;
mod logging;
mod particles;
mod types;

use crate::{
    app::App,
    config::Config,
    helpers::{apply_overrides, parse_args},
};

use anyhow::{Context, Result};
use ratatui::{
    crossterm::{
        event::{
            self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
            KeyModifiers,
        },
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
    prelude::*,
};
use std::{
    io,
    time::{Duration, Instant},
};
use tracing::{error, info};

const POLLING_RATE_MS: u64 = 16;

fn main() -> Result<()> {
    let cli = parse_args();

    if cli.init {
        let path = Config::write_default()?;
        println!("Default configuration written to {}", path.display());
        return Ok(());
    }

    let mut config = Config::load(cli.config.as_deref())?;
    apply_overrides(&mut config, &cli);
    config.validate()?;

    logging::init(&config.log)?;
    info!(
        target_len = config.reveal.target.chars().count(),
        particles = config.particles.enabled,
        "starting"
    );

    let mut app = App::new(&config, Instant::now())?;

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to setup terminal")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let res = run(&mut terminal, &mut app);

    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to restore terminal")?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = %err, "exiting after error");
    } else {
        info!("exiting");
    }

    res
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    terminal.hide_cursor()?;

    loop {
        app.update(Instant::now());
        terminal.draw(|frame| app.draw_ui(frame))?;

        let timeout = app
            .next_deadline()
            .saturating_duration_since(Instant::now())
            .min(Duration::from_millis(POLLING_RATE_MS));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Esc | KeyCode::Char('q') => break,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                    _ => {}
                },
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                Event::FocusLost => app.clear_hover(),
                _ => {}
            }
        }
    }

    Ok(())
}
