//! Frame timing for the viewer.
//!
//! [`FrameClock`] counts frames, tracks FPS and handles pausing; the
//! scheduler asks it once per redraw whether the simulation should step.
//! [`TickProfiler`] accumulates how long ticks take so the average can be
//! logged.
//!
//! # Example
//!
//! ```ignore
//! use image_particles::time::{FrameClock, TickProfiler};
//!
//! let mut clock = FrameClock::new();
//! let mut profiler = TickProfiler::new();
//!
//! // once per redraw
//! if clock.advance() {
//!     profiler.measure(|| simulation.tick())?;
//! }
//! ```

use std::time::{Duration, Instant};

/// Frame counter with FPS tracking and pause support.
#[derive(Debug)]
pub struct FrameClock {
    /// Frames that actually stepped the simulation.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    /// Redraws since the last FPS update.
    fps_frames: u32,
    /// Time of last FPS calculation.
    fps_update_time: Instant,
    /// How often to update FPS calculation.
    fps_update_interval: Duration,
    /// Set when the last `advance` refreshed the FPS value.
    fps_updated: bool,
    paused: bool,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            fps: 0.0,
            fps_frames: 0,
            fps_update_time: Instant::now(),
            fps_update_interval: Duration::from_millis(500),
            fps_updated: false,
            paused: false,
        }
    }

    /// Record a redraw. Returns `true` if the simulation should step this frame.
    pub fn advance(&mut self) -> bool {
        self.advance_at(Instant::now())
    }

    fn advance_at(&mut self, now: Instant) -> bool {
        self.fps_frames += 1;
        self.fps_updated = false;

        let since = now.duration_since(self.fps_update_time);
        if since >= self.fps_update_interval {
            self.fps = self.fps_frames as f32 / since.as_secs_f32();
            self.fps_frames = 0;
            self.fps_update_time = now;
            self.fps_updated = true;
        }

        if self.paused {
            return false;
        }
        self.frame_count += 1;
        true
    }

    /// Frames that stepped the simulation.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Redraws per second, including paused ones.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Whether the last [`advance`](Self::advance) produced a new FPS value.
    #[inline]
    pub fn fps_updated(&self) -> bool {
        self.fps_updated
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Running average of tick durations.
#[derive(Debug, Default)]
pub struct TickProfiler {
    samples: u64,
    total: Duration,
    started: Option<Instant>,
}

impl TickProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Close the sample opened by [`start`](Self::start). Does nothing without one.
    pub fn end(&mut self) {
        if let Some(started) = self.started.take() {
            self.record(started.elapsed());
        }
    }

    /// Time `f` as one sample.
    pub fn measure<T>(&mut self, f: impl FnOnce() -> T) -> T {
        self.start();
        let out = f();
        self.end();
        out
    }

    pub fn record(&mut self, duration: Duration) {
        self.samples += 1;
        self.total += duration;
    }

    #[inline]
    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// Mean duration, `None` before the first sample.
    pub fn average(&self) -> Option<Duration> {
        if self.samples == 0 {
            return None;
        }
        Some(self.total / u32::try_from(self.samples).unwrap_or(u32::MAX))
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
