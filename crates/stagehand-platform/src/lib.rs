//! Backend glue for stagehand.
//!
//! A backend produces [`InputEvent`](stagehand_core::InputEvent)s and calls
//! [`FrameDriver::frame`] once per frame:
//!
//! - [`InputAdapter`] feeds input events into an
//!   [`InteractiveManager`](stagehand_input::InteractiveManager);
//! - [`FrameDriver`] ticks Tab auto-repeat, polls [`Timers`] every
//!   `timer_check_frame_frequency` frames and measures FPS;
//! - with the `desktop` feature, [`desktop::run_desktop`] does all of the
//!   above for a winit window.

pub mod adapter;
pub mod config;
#[cfg(feature = "desktop")]
pub mod desktop;
pub mod driver;
pub mod timer;
mod tests;

pub use adapter::InputAdapter;
pub use config::PlatformConfig;
pub use driver::FrameDriver;
pub use timer::{TimerId, Timers};
