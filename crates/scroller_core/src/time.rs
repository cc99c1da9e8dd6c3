//! Frame pacing statistics.
//!
//! The simulation runs one step per displayed frame, with no accumulator and
//! no fixed timestep, so this clock only measures. It never decides how many
//! steps to run.

use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 60;
const LONG_FRAME_SECS: f64 = 0.25;

pub struct FrameClock {
    pub frame_count: u64,
    pub real_dt: f64,
    pub total_time: f64,
    last_instant: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            real_dt: 0.0,
            total_time: 0.0,
            last_instant: Instant::now(),
            fps_samples: [1.0 / 60.0; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
            smoothed_frame_time_ms: 16.667,
        }
    }

    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.record(dt);
    }

    /// Forget time spent while nothing was ticking (pause, minimised window),
    /// so the next frame doesn't report a huge delta.
    pub fn resync(&mut self) {
        self.last_instant = Instant::now();
    }

    pub fn record(&mut self, dt: f64) {
        self.real_dt = dt;
        self.total_time += dt;
        self.frame_count += 1;

        if dt > LONG_FRAME_SECS {
            log::warn!(
                "Frame took {:.1}ms; simulation advanced a single tick for it",
                dt * 1000.0
            );
        }

        self.fps_samples[self.fps_sample_index] = dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }

    /// True once every `every` frames, for periodic logging.
    pub fn is_report_frame(&self, every: u64) -> bool {
        every > 0 && self.frame_count > 0 && self.frame_count % every == 0
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothing_converges_to_steady_rate() {
        let mut clock = FrameClock::new();
        for _ in 0..FPS_SAMPLE_COUNT {
            clock.record(1.0 / 30.0);
        }
        assert!((clock.smoothed_fps - 30.0).abs() < 1e-6);
        assert!((clock.smoothed_frame_time_ms - 33.333).abs() < 1e-2);
        assert_eq!(clock.frame_count, FPS_SAMPLE_COUNT as u64);
    }

    #[test]
    fn record_accumulates_total_time() {
        let mut clock = FrameClock::new();
        clock.record(0.5);
        clock.record(0.25);
        assert!((clock.total_time - 0.75).abs() < f64::EPSILON);
        assert!((clock.real_dt - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn report_frame_every_n() {
        let mut clock = FrameClock::new();
        assert!(!clock.is_report_frame(3));
        for _ in 0..3 {
            clock.record(0.016);
        }
        assert!(clock.is_report_frame(3));
        assert!(!clock.is_report_frame(0));
        clock.record(0.016);
        assert!(!clock.is_report_frame(3));
    }
}
