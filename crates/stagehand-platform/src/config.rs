use stagehand_input::InteractiveConfig;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlatformConfig {
    /// Timers are polled once every this many frames.
    pub timer_check_frame_frequency: u64,
    /// Target frames per second for self-paced loops.
    pub frame_rate: u32,
    pub interactive: InteractiveConfig,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            timer_check_frame_frequency: 100,
            frame_rate: 60,
            interactive: InteractiveConfig::default(),
        }
    }
}

impl PlatformConfig {
    pub fn with_timer_check_frame_frequency(mut self, frames: u64) -> Self {
        self.timer_check_frame_frequency = frames;
        self
    }

    pub fn with_frame_rate(mut self, frame_rate: u32) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    pub fn with_interactive(mut self, interactive: InteractiveConfig) -> Self {
        self.interactive = interactive;
        self
    }
}
