/// Tuning for [`InteractiveManager`](crate::InteractiveManager).
///
/// Hold and repeat times are counted in frames (calls to `tick`), not
/// wall-clock time.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InteractiveConfig {
    /// Frames a held Tab waits before auto-repeat starts.
    pub key_hold_time: i32,
    /// Frames between auto-repeat steps once repeating.
    pub key_repeat_interval: i32,
    /// Whether Tab / Enter / Escape handling starts enabled.
    pub tabbing_enabled: bool,
}

impl Default for InteractiveConfig {
    fn default() -> Self {
        Self {
            key_hold_time: 30,
            key_repeat_interval: 3,
            tabbing_enabled: false,
        }
    }
}

impl InteractiveConfig {
    pub fn with_key_hold_time(mut self, frames: i32) -> Self {
        self.key_hold_time = frames;
        self
    }

    pub fn with_key_repeat_interval(mut self, frames: i32) -> Self {
        self.key_repeat_interval = frames;
        self
    }

    pub fn with_tabbing_enabled(mut self, on: bool) -> Self {
        self.tabbing_enabled = on;
        self
    }
}
