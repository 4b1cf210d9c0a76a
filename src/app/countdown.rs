// SPDX-License-Identifier: GPL-3.0-only

//! Countdown before the shutter fires
//!
//! Shows `3`, `2`, `1`, a shutter marker, then hides itself and completes.
//! One tick per period. A countdown that is already running ignores new
//! requests instead of restarting.

use crate::config::Config;
use crate::constants::countdown::{SHUTTER_MARKER, START_SECONDS, TICK};
use crate::errors::CountdownError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::{Instant, interval_at};
use tracing::{debug, info, warn};

/// What the countdown overlay shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountdownTick {
    Number(u32),
    /// Last visible step before capture
    Shutter,
    /// Overlay hidden, countdown over
    Hidden,
}

impl CountdownTick {
    /// Overlay text, `None` when hidden
    pub fn label(&self) -> Option<String> {
        match self {
            CountdownTick::Number(n) => Some(n.to_string()),
            CountdownTick::Shutter => Some(SHUTTER_MARKER.to_string()),
            CountdownTick::Hidden => None,
        }
    }
}

/// Receives every countdown step
pub trait CountdownDisplay: Send {
    fn show(&mut self, tick: &CountdownTick);
}

/// Display that shows nothing
#[derive(Debug, Default)]
pub struct HiddenDisplay;

impl CountdownDisplay for HiddenDisplay {
    fn show(&mut self, _tick: &CountdownTick) {}
}

/// Clears the running flag when a run ends or is dropped
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Non-reentrant countdown timer
#[derive(Debug)]
pub struct Countdown {
    start: u32,
    tick: Duration,
    running: AtomicBool,
}

impl Countdown {
    pub fn new(start: u32, tick: Duration) -> Self {
        Self {
            start,
            // tokio intervals reject a zero period
            tick: tick.max(Duration::from_millis(1)),
            running: AtomicBool::new(false),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.countdown_seconds, config.tick())
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Run the countdown to the end
    ///
    /// Resolves once, after the overlay has been hidden. Fails immediately,
    /// without touching `display`, if another run is in flight.
    pub async fn run(&self, display: &mut dyn CountdownDisplay) -> Result<(), CountdownError> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("Countdown already running, ignoring trigger");
            return Err(CountdownError::AlreadyRunning);
        }
        let _guard = RunningGuard(&self.running);

        info!(seconds = self.start, "Starting countdown");
        let mut remaining = self.start as i64;
        display.show(&step(remaining));

        let mut ticker = interval_at(Instant::now() + self.tick, self.tick);
        loop {
            ticker.tick().await;
            remaining -= 1;
            if remaining < 0 {
                display.show(&CountdownTick::Hidden);
                break;
            }
            debug!(remaining, "Countdown tick");
            display.show(&step(remaining));
        }

        debug!("Countdown complete");
        Ok(())
    }

    /// Run the countdown, then call `on_complete` exactly once
    pub async fn start<F, T>(
        &self,
        display: &mut dyn CountdownDisplay,
        on_complete: F,
    ) -> Result<T, CountdownError>
    where
        F: FnOnce() -> T,
    {
        self.run(display).await?;
        Ok(on_complete())
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(START_SECONDS, TICK)
    }
}

fn step(remaining: i64) -> CountdownTick {
    if remaining <= 0 {
        CountdownTick::Shutter
    } else {
        CountdownTick::Number(remaining as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        ticks: Vec<(CountdownTick, Duration)>,
        started: Option<Instant>,
    }

    impl CountdownDisplay for Recorder {
        fn show(&mut self, tick: &CountdownTick) {
            let started = *self.started.get_or_insert_with(Instant::now);
            self.ticks.push((tick.clone(), started.elapsed()));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequence_and_timing() {
        let countdown = Countdown::default();
        let mut display = Recorder::default();
        let mut completions = 0;

        countdown
            .start(&mut display, || completions += 1)
            .await
            .unwrap();

        let ticks: Vec<_> = display.ticks.iter().map(|(t, _)| t.clone()).collect();
        assert_eq!(
            ticks,
            vec![
                CountdownTick::Number(3),
                CountdownTick::Number(2),
                CountdownTick::Number(1),
                CountdownTick::Shutter,
                CountdownTick::Hidden,
            ]
        );
        let times: Vec<_> = display.ticks.iter().map(|(_, at)| at.as_secs()).collect();
        assert_eq!(times, vec![0, 1, 2, 3, 4]);
        assert_eq!(completions, 1);
        assert!(!countdown.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_trigger_is_ignored() {
        let countdown = Countdown::default();
        let mut first = Recorder::default();
        let mut second = Recorder::default();

        let (a, b) = tokio::join!(countdown.run(&mut first), countdown.run(&mut second));
        assert_eq!(a, Ok(()));
        assert_eq!(b, Err(CountdownError::AlreadyRunning));
        assert_eq!(first.ticks.len(), 5);
        assert!(second.ticks.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_can_run_again_after_completion() {
        let countdown = Countdown::new(1, Duration::from_millis(10));
        let mut display = Recorder::default();
        countdown.run(&mut display).await.unwrap();
        countdown.run(&mut display).await.unwrap();
        assert_eq!(display.ticks.len(), 6);
    }

    #[test]
    fn test_labels() {
        assert_eq!(CountdownTick::Number(2).label().as_deref(), Some("2"));
        assert_eq!(CountdownTick::Shutter.label().as_deref(), Some("📸"));
        assert_eq!(CountdownTick::Hidden.label(), None);
    }
}
