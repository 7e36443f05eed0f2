//! # Scene graph and interactive capability
//!
//! `stagehand-core` holds the data the input layer works on:
//!
//! - [`Stage`]: a cloneable handle over an arena-backed [`SceneGraph`].
//! - [`SceneNode`]: a positioned, scaled node; parent links are ids.
//! - [`InteractiveState`]: the optional capability that gives a node a hit
//!   area, hover/drag/focus flags and listeners.
//! - [`InteractiveEvent`]: the value delivered to listeners.
//!
//! ```rust
//! use stagehand_core::*;
//!
//! let stage = Stage::new();
//! let button = stage.create(
//!     SceneNode::new("ok").at(10.0, 10.0).with_interactive(InteractiveState::new(80.0, 24.0)),
//! );
//! stage.add_child(stage.root(), button).unwrap();
//!
//! stage.on(button, InteractiveEventKind::Down, |e| {
//!     log::info!("pressed at {:?}", e.position);
//! });
//!
//! assert!(stage.is_on_screen(button));
//! assert_eq!(stage.with(|g| g.hit_rect(button)), Some(Rect::new(10.0, 10.0, 80.0, 24.0)));
//! ```
//!
//! Derived properties (absolute position and scale, on-screen status) are
//! computed from the parent chain on every query. Paint order
//! ([`SceneGraph::absolute_z_order`]) is recomputed whenever the tree
//! structure changes.
//!
//! Routing input to nodes lives in `stagehand-input`.

pub mod error;
pub mod event;
pub mod geometry;
pub mod input;
pub mod interactive;
pub mod scene;
pub mod stage;
mod tests;

pub use error::SceneError;
pub use event::{InteractiveEvent, InteractiveEventKind};
pub use geometry::{Rect, Size, Transform, Vec2};
pub use input::{
    InputEvent, Key, KeyEvent, KeyState, Modifiers, MouseButton, MouseButtons, PointerEvent,
    PointerEventKind, PointerId, TextInputEvent, WheelEvent,
};
pub use interactive::{InteractiveFlags, InteractiveState, Listener, ListenerId};
pub use scene::{NodeId, SceneGraph, SceneNode};
pub use stage::{DetachObserverId, Stage, WeakStage};
