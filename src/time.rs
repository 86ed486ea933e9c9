//! Frame clock.
//!
//! Tracks elapsed time since mount, frame count and a periodically updated
//! FPS figure. Elapsed time is what drives particle motion, so it is the only
//! value the field consumes; the rest is for logging.

use std::time::{Duration, Instant};

/// Time tracking for the render loop.
#[derive(Debug)]
pub struct Time {
    start: Instant,
    elapsed_secs: f32,
    delta_secs: f32,
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
}

impl Time {
    /// Create a clock starting from now.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Create a clock whose zero is `start`.
    pub fn starting_at(start: Instant) -> Self {
        Self {
            start,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: start,
            fps_update_interval: Duration::from_secs(5),
        }
    }

    /// Advance to now. Returns the elapsed seconds since start.
    pub fn update(&mut self) -> f32 {
        self.update_at(Instant::now())
    }

    /// Advance to `now`. Instants before the last update are treated as no
    /// progress.
    pub fn update_at(&mut self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.start).as_secs_f32();
        self.delta_secs = (elapsed - self.elapsed_secs).max(0.0);
        self.elapsed_secs = self.elapsed_secs.max(elapsed);
        self.frame_count += 1;

        let fps_elapsed = now.saturating_duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.elapsed_secs
    }

    /// Seconds since start as of the last update.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Seconds between the last two updates.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Frames per second over the last reporting interval. Zero until the
    /// first interval has passed.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Whether the last update closed an FPS reporting interval.
    pub fn fps_updated(&self) -> bool {
        self.frame_count > 0 && self.fps_frame_count == self.frame_count
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
