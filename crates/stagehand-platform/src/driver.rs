//! Per-frame housekeeping: Tab auto-repeat, timer polling, FPS.

use std::time::Duration;

use stagehand_input::InteractiveManager;
use web_time::Instant;

use crate::config::PlatformConfig;
use crate::timer::Timers;

pub struct FrameDriver {
    input: InteractiveManager,
    timers: Timers,
    config: PlatformConfig,
    tick: u64,
    frame_counter: u32,
    fps: u32,
    window_start: Instant,
}

impl FrameDriver {
    pub fn new(input: InteractiveManager, timers: Timers, config: PlatformConfig) -> Self {
        Self {
            input,
            timers,
            config,
            tick: 0,
            frame_counter: 0,
            fps: 0,
            window_start: Instant::now(),
        }
    }

    pub fn input(&self) -> &InteractiveManager {
        &self.input
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    /// Frames run so far.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Frames counted over the last full second.
    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn frame(&mut self) {
        self.frame_at(Instant::now());
    }

    pub fn frame_at(&mut self, now: Instant) {
        self.input.tick();

        self.frame_counter += 1;
        if now.duration_since(self.window_start) >= Duration::from_secs(1) {
            self.fps = self.frame_counter;
            self.frame_counter = 0;
            self.window_start = now;
            log::trace!("fps: {}", self.fps);
        }

        self.tick += 1;
        if self.tick % self.config.timer_check_frame_frequency.max(1) == 0 {
            self.timers.process(now);
        }
    }

    /// How long a self-paced loop should sleep after a frame: a little under
    /// the frame period while running fast, shorter while catching up.
    pub fn pacing(&self) -> Duration {
        let rate = self.config.frame_rate.max(1);
        if self.fps > rate {
            Duration::from_secs_f32(1.0 / rate.saturating_add(10) as f32)
        } else {
            Duration::from_secs_f32(1.0 / (rate as f32 * 1.5))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    use stagehand_core::{Key, Modifiers, Stage};
    use stagehand_input::InteractiveConfig;

    #[test]
    fn test_timers_polled_at_frame_frequency() {
        let stage = Stage::new();
        let input = InteractiveManager::new(&stage, InteractiveConfig::default());
        let timers = Timers::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let t0 = Instant::now();
        timers.schedule_at(t0, None, move |_| h.set(h.get() + 1));

        let config = PlatformConfig::default().with_timer_check_frame_frequency(4);
        let mut driver = FrameDriver::new(input, timers, config);
        for _ in 0..3 {
            driver.frame_at(t0);
        }
        assert_eq!(hits.get(), 0);
        driver.frame_at(t0);
        assert_eq!(hits.get(), 1);
        assert_eq!(driver.tick_count(), 4);
    }

    #[test]
    fn test_frames_drive_tab_repeat() {
        let stage = Stage::new();
        let input = InteractiveManager::new(
            &stage,
            InteractiveConfig::default().with_tabbing_enabled(true),
        );
        let mut ids = Vec::new();
        for name in ["a", "b"] {
            let id = stage.create_interactive(name, 10.0, 10.0);
            stage.add_child(stage.root(), id).unwrap();
            input.register(id);
            ids.push(id);
        }

        let mut driver = FrameDriver::new(input.clone(), Timers::new(), PlatformConfig::default());
        input.key_down(Key::Tab, Modifiers::NONE);
        for _ in 0..31 {
            driver.frame();
        }
        assert_eq!(input.focused(), Some(ids[1]));
    }

    #[test]
    fn test_fps_counts_frames_per_second() {
        let stage = Stage::new();
        let input = InteractiveManager::new(&stage, InteractiveConfig::default());
        let mut driver = FrameDriver::new(input, Timers::new(), PlatformConfig::default());
        let t0 = driver.window_start;

        for i in 0..30 {
            driver.frame_at(t0 + Duration::from_millis(i * 10));
        }
        assert_eq!(driver.fps(), 0);
        driver.frame_at(t0 + Duration::from_secs(1));
        assert_eq!(driver.fps(), 31);
        assert!(driver.pacing() < Duration::from_millis(20));
    }

    #[test]
    fn test_pacing_at_extreme_frame_rate() {
        let stage = Stage::new();
        let input = InteractiveManager::new(&stage, InteractiveConfig::default());
        let config = PlatformConfig::default().with_frame_rate(u32::MAX - 5);
        let mut driver = FrameDriver::new(input, Timers::new(), config);

        driver.fps = u32::MAX;
        assert!(driver.pacing() < Duration::from_millis(1));
        driver.fps = 0;
        assert!(driver.pacing() < Duration::from_millis(1));
    }
}
