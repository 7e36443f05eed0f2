use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use stagehand_core::*;
use stagehand_input::{InteractiveConfig, InteractiveManager};
use stagehand_platform::{PlatformConfig, Timers};

const TITLE_HEIGHT: f32 = 16.0;
const BUTTON_WIDTH: f32 = 50.0;
const BUTTON_HEIGHT: f32 = 12.0;

/// A panel dragged by its title bar. Right-dragging the title bar resizes
/// its grab area instead. Children push their events up to the panel.
fn panel(stage: &Stage, input: &InteractiveManager, name: &str, x: f32, y: f32) -> NodeId {
    let panel = stage.create(
        SceneNode::new(name)
            .at(x, y)
            .with_interactive(InteractiveState::new(200.0, 120.0).with_tabbing_enabled(false)),
    );
    let title = stage.create(
        SceneNode::new(format!("{name}/title")).with_interactive(
            InteractiveState::new(200.0, TITLE_HEIGHT)
                .with_tabbing_enabled(false)
                .with_push_events_up(true),
        ),
    );
    stage.add_child(stage.root(), panel).unwrap_or_else(|e| log::error!("{e}"));
    stage.add_child(panel, title).unwrap_or_else(|e| log::error!("{e}"));
    input.register(panel);
    input.register(title);

    let grab = Rc::new(Cell::new(Vec2::ZERO));
    let resizing = Rc::new(Cell::new(false));

    let weak = stage.downgrade();
    let (g, r) = (grab.clone(), resizing.clone());
    stage.on(title, InteractiveEventKind::Down, move |e| {
        let Some(stage) = weak.upgrade() else { return };
        let Some(origin) = stage.position(panel) else { return };
        g.set(e.position + origin);
        r.set(e.button == Some(MouseButton::Right));
        // Re-appending paints the panel (and its hit areas) on top.
        if let Err(err) = stage.add_child(stage.root(), panel) {
            log::warn!("cannot raise panel: {err}");
        }
    });

    let weak = stage.downgrade();
    stage.on(title, InteractiveEventKind::Drag, move |e| {
        let Some(stage) = weak.upgrade() else { return };
        if resizing.get() {
            let (w, h) = (e.position.x.max(5.0), e.position.y.max(5.0));
            stage.with_mut(|g| {
                if let Some(state) = g.interactive_mut(title) {
                    state.set_area(w, h);
                }
            });
            return;
        }
        let Some(origin) = stage.position(panel) else { return };
        let pointer = e.position + origin;
        let delta = pointer - grab.get();
        stage.set_position(panel, origin.x + delta.x, origin.y + delta.y);
        grab.set(pointer);
    });

    let name = name.to_string();
    stage.on_any(panel, move |e| log::debug!("{name} <- {:?}", e.kind));

    panel
}

fn button(
    stage: &Stage,
    input: &InteractiveManager,
    parent: NodeId,
    label: &str,
    index: usize,
    on_press: impl Fn() + 'static,
) -> NodeId {
    let id = stage.create(
        SceneNode::new(label)
            .at(index as f32 * (BUTTON_WIDTH + 1.0), TITLE_HEIGHT + 4.0)
            .with_interactive(
                InteractiveState::new(BUTTON_WIDTH, BUTTON_HEIGHT).with_push_events_up(true),
            ),
    );
    stage.add_child(parent, id).unwrap_or_else(|e| log::error!("{e}"));
    input.register(id);
    stage.on(id, InteractiveEventKind::Down, move |_| on_press());
    let label = label.to_string();
    stage.on(id, InteractiveEventKind::FocusIn, move |e| {
        log::info!("focus: {label} (mouse: {})", e.by_mouse_down)
    });
    id
}

fn build_scene(stage: &Stage, input: &InteractiveManager, timers: &Timers) -> NodeId {
    let debug = panel(stage, input, "debug", 100.0, 100.0);
    let _other = panel(stage, input, "other", 180.0, 140.0);

    for (i, (label, dx)) in [("Move<", -1.0), ("Move>", 1.0)].into_iter().enumerate() {
        let weak = stage.downgrade();
        button(stage, input, debug, label, i, move || {
            if let Some(stage) = weak.upgrade() {
                if let Some(p) = stage.position(debug) {
                    stage.set_position(debug, p.x + dx, p.y);
                }
            }
        });
    }
    let weak = stage.downgrade();
    button(stage, input, debug, "Hide", 2, move || {
        if let Some(stage) = weak.upgrade() {
            if let Err(e) = stage.remove_from_parent(debug) {
                log::warn!("{e}");
            }
        }
    });

    let weak = stage.downgrade();
    timers.set_interval(Duration::from_millis(250), move |_| {
        if let Some(p) = weak.upgrade().and_then(|s| s.position(debug)) {
            log::info!("debug panel at ({}, {})", p.x, p.y);
        }
    });

    debug
}

#[cfg(feature = "desktop")]
fn run(config: PlatformConfig) -> anyhow::Result<()> {
    stagehand_platform::desktop::run_desktop("Drag panel", config, |cx| {
        build_scene(&cx.stage, &cx.input, &cx.timers);
    })
}

#[cfg(not(feature = "desktop"))]
fn frames(driver: &mut stagehand_platform::FrameDriver, n: usize) {
    for _ in 0..n {
        driver.frame();
        std::thread::sleep(driver.pacing());
    }
}

/// A scripted session: drag the panel, tab through its buttons, press one
/// with Enter and hide the panel with a click.
#[cfg(not(feature = "desktop"))]
fn run(config: PlatformConfig) -> anyhow::Result<()> {
    use stagehand_platform::{FrameDriver, InputAdapter};

    let stage = Stage::new();
    let input = InteractiveManager::new(&stage, config.interactive);
    let timers = Timers::new();
    let debug = build_scene(&stage, &input, &timers);

    let mut adapter = InputAdapter::new(input.clone());
    let mut driver = FrameDriver::new(input.clone(), timers, config);

    // Drag by the title bar.
    let mut at = Vec2::new(110.0, 105.0);
    adapter.handle(&InputEvent::pointer_move(at));
    adapter.handle(&InputEvent::pointer_down(at, MouseButton::Left));
    for _ in 0..10 {
        at = at + Vec2::new(5.0, 4.0);
        adapter.handle(&InputEvent::pointer_move(at));
        frames(&mut driver, 1);
    }
    adapter.handle(&InputEvent::pointer_up(at, MouseButton::Left));
    let moved = stage
        .position(debug)
        .ok_or_else(|| anyhow::anyhow!("debug panel vanished"))?;
    println!("after drag: ({}, {})", moved.x, moved.y);

    // Hold Tab long enough for auto-repeat to kick in.
    adapter.handle(&InputEvent::key(Key::Tab, KeyState::Pressed, Modifiers::NONE));
    frames(&mut driver, 40);
    adapter.handle(&InputEvent::key(Key::Tab, KeyState::Released, Modifiers::NONE));
    let focused = input.focused().and_then(|id| stage.name(id));
    println!("focused after holding Tab: {focused:?}");

    // Focus "Move>" and activate it from the keyboard.
    if let Some(next) = stage.with(|g| g.find_by_name("Move>")) {
        input.set_focused(next, false);
    }
    adapter.handle(&InputEvent::key(Key::Enter, KeyState::Pressed, Modifiers::NONE));
    adapter.handle(&InputEvent::key(Key::Enter, KeyState::Released, Modifiers::NONE));
    frames(&mut driver, 30);

    // Click "Hide".
    let hide = stage
        .with(|g| g.find_by_name("Hide").and_then(|id| g.hit_rect(id)))
        .ok_or_else(|| anyhow::anyhow!("no Hide button"))?;
    let click = hide.origin() + Vec2::new(2.0, 2.0);
    adapter.handle(&InputEvent::pointer_move(click));
    adapter.handle(&InputEvent::pointer_down(click, MouseButton::Left));
    adapter.handle(&InputEvent::pointer_up(click, MouseButton::Left));
    frames(&mut driver, 30);

    println!(
        "panel on screen: {}, focused: {:?}, fps: {}",
        stage.is_on_screen(debug),
        input.focused(),
        driver.fps()
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = PlatformConfig::default()
        .with_timer_check_frame_frequency(10)
        .with_interactive(InteractiveConfig::default().with_tabbing_enabled(true));
    run(config)
}
