//! Scramble-reveal text animation.
//!
//! Each tick renders the target string with a growing prefix revealed and
//! every other position replaced by a random glyph. Once the cursor has
//! run past the end, the recurring tick is swapped for a one-shot restart
//! after a pause, and the cycle begins again.

use crate::{config::RevealConfig, error::ConfigError, types::AnimatorState};

use rand::Rng;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Cursor value meaning no character is revealed.
pub const NOTHING_REVEALED: isize = -1;

/// Destination for rendered frames.
pub trait RenderSink {
    fn set_text(&mut self, text: &str);
}

impl RenderSink for String {
    fn set_text(&mut self, text: &str) {
        self.clear();
        self.push_str(text);
    }
}

impl RenderSink for Vec<String> {
    fn set_text(&mut self, text: &str) {
        self.push(text.to_string());
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Timer {
    Interval { period: Duration, next_due: Instant },
    Restart { due: Instant },
}

pub struct ScrambleRevealAnimator<R> {
    target: Vec<char>,
    alphabet: Vec<char>,
    tick: Duration,
    pause: Duration,
    cursor: isize,
    timer: Timer,
    rng: R,
}

impl<R: Rng> ScrambleRevealAnimator<R> {
    /// Validates `settings` and starts the first cycle at `now`.
    pub fn new(settings: &RevealConfig, rng: R, now: Instant) -> Result<Self, ConfigError> {
        settings.validate()?;

        let tick = settings.tick();
        let mut animator = Self {
            target: settings.target.chars().collect(),
            alphabet: settings.alphabet.chars().collect(),
            tick,
            pause: settings.pause(),
            cursor: NOTHING_REVEALED,
            timer: Timer::Interval {
                period: tick,
                next_due: now + tick,
            },
            rng,
        };
        animator.start_cycle(now);

        Ok(animator)
    }

    pub fn start_cycle(&mut self, now: Instant) {
        self.cursor = NOTHING_REVEALED;
        self.timer = Timer::Interval {
            period: self.tick,
            next_due: now + self.tick,
        };

        debug!(target_len = self.target.len(), "reveal cycle started");
    }

    /// Renders one frame into `sink` and advances the cursor. `at` is the
    /// instant the tick was scheduled for.
    pub fn tick(&mut self, at: Instant, sink: &mut impl RenderSink) {
        let frame = compose_frame(&self.target, &self.alphabet, self.cursor, &mut self.rng);
        sink.set_text(&frame);
        trace!(cursor = self.cursor, frame = %frame, "tick");

        self.cursor += 1;

        if self.cursor > self.target.len() as isize {
            self.timer = Timer::Restart {
                due: at + self.pause,
            };
            debug!(pause_ms = self.pause.as_millis() as u64, "reveal complete, pausing");
        }
    }

    /// Fires the timers due at or before `now` and returns the number of
    /// frames rendered. An overdue interval fires once; deadlines it missed
    /// are dropped and the next one lands on its period grid after `now`.
    pub fn poll(&mut self, now: Instant, sink: &mut impl RenderSink) -> usize {
        let mut rendered = 0;

        loop {
            match self.timer {
                Timer::Interval { period, next_due } if next_due <= now => {
                    self.timer = Timer::Interval {
                        period,
                        next_due: next_deadline_after(next_due, period, now),
                    };
                    self.tick(next_due, sink);
                    rendered += 1;
                }
                Timer::Restart { due } if due <= now => self.start_cycle(due),
                _ => break,
            }
        }

        rendered
    }

    pub fn state(&self) -> AnimatorState {
        match self.timer {
            Timer::Interval { .. } => AnimatorState::Running,
            Timer::Restart { .. } => AnimatorState::Paused,
        }
    }

    pub fn next_deadline(&self) -> Instant {
        match self.timer {
            Timer::Interval { next_due, .. } => next_due,
            Timer::Restart { due } => due,
        }
    }

    pub fn cursor(&self) -> isize {
        self.cursor
    }

    pub fn target_len(&self) -> usize {
        self.target.len()
    }
}

/// First deadline on the grid `due + k * period` (k >= 1) later than `now`.
fn next_deadline_after(due: Instant, period: Duration, now: Instant) -> Instant {
    let next = due + period;
    if next > now {
        return next;
    }

    let offset = now.duration_since(next).as_nanos() % period.as_nanos();
    now - Duration::from_nanos(offset as u64) + period
}

/// Builds the display buffer: positions up to and including `cursor` show
/// the target, the rest an independent uniform draw from `alphabet`.
pub fn compose_frame<R: Rng>(
    target: &[char],
    alphabet: &[char],
    cursor: isize,
    rng: &mut R,
) -> String {
    target
        .iter()
        .enumerate()
        .map(|(idx, &ch)| {
            if idx as isize <= cursor {
                ch
            } else {
                alphabet[rng.random_range(0..alphabet.len())]
            }
        })
        .collect()
}
