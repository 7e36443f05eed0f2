//! # Interactive input for a stagehand scene
//!
//! [`InteractiveManager`] owns the registry of interactive nodes and turns
//! raw pointer and key input into [`InteractiveEvent`]s:
//!
//! - `screen_touch` / `screen_drag` / `screen_wheel` resolve the topmost
//!   node under the pointer ([`hit_test`]) and track hover and drag state;
//! - `set_focused`, `focus_next`, `reset_focus` and friends move focus;
//! - `key_down` / `key_up` / `tick` drive Tab cycling with auto-repeat;
//! - every event is delivered through [`dispatch`], which bubbles it to
//!   interactive parents of nodes that push events up.
//!
//! ```rust
//! use stagehand_core::*;
//! use stagehand_input::{InteractiveConfig, InteractiveManager};
//!
//! let stage = Stage::new();
//! let ok = stage.create_interactive("ok", 80.0, 24.0);
//! stage.add_child(stage.root(), ok).unwrap();
//!
//! let input = InteractiveManager::new(&stage, InteractiveConfig::default());
//! input.register(ok);
//!
//! input.screen_touch(5.0, 5.0, PointerId(0), MouseButton::Left, true);
//! assert_eq!(input.focused(), Some(ok));
//! ```
//!
//! [`InteractiveEvent`]: stagehand_core::InteractiveEvent

pub mod config;
pub mod dispatch;
pub mod focus;
pub mod manager;

pub use config::InteractiveConfig;
pub use dispatch::dispatch;
pub use focus::TabDirection;
pub use hit_test::HitCandidate;
pub use manager::InteractiveManager;
