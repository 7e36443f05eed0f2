#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use stagehand_core::*;
    use stagehand_input::{InteractiveConfig, InteractiveManager};

    use crate::*;

    fn setup() -> (Stage, InputAdapter, NodeId, Rc<RefCell<Vec<InteractiveEvent>>>) {
        let _ = env_logger::builder().is_test(true).try_init();
        let stage = Stage::new();
        let input = InteractiveManager::new(
            &stage,
            InteractiveConfig::default().with_tabbing_enabled(true),
        );
        let button = stage.create(
            SceneNode::new("button")
                .at(10.0, 10.0)
                .with_interactive(InteractiveState::new(40.0, 20.0)),
        );
        stage.add_child(stage.root(), button).unwrap();
        input.register(button);

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        stage.on_any(button, move |e| sink.borrow_mut().push(e.clone()));
        (stage, InputAdapter::new(input), button, events)
    }

    fn kinds(events: &Rc<RefCell<Vec<InteractiveEvent>>>) -> Vec<InteractiveEventKind> {
        events.borrow_mut().drain(..).map(|e| e.kind).collect()
    }

    #[test]
    fn test_pointer_sequence() {
        use InteractiveEventKind::*;
        let (_stage, mut adapter, button, events) = setup();

        adapter.handle(&InputEvent::pointer_move(Vec2::new(20.0, 20.0)));
        adapter.handle(&InputEvent::pointer_down(Vec2::new(20.0, 20.0), MouseButton::Left));
        adapter.handle(&InputEvent::pointer_move(Vec2::new(80.0, 20.0)));
        adapter.handle(&InputEvent::pointer_up(Vec2::new(80.0, 20.0), MouseButton::Left));

        assert_eq!(kinds(&events), vec![Hover, FocusIn, Down, Drag, Out, Up]);
        assert_eq!(adapter.cursor(), Vec2::new(80.0, 20.0));
        assert_eq!(adapter.input().focused(), Some(button));
        assert!(adapter.input().buttons().is_empty());
    }

    #[test]
    fn test_keys_and_text() {
        use InteractiveEventKind::*;
        let (_stage, mut adapter, button, events) = setup();
        adapter.input().set_focused(button, false);
        kinds(&events);

        adapter.handle(&InputEvent::ModifiersChanged(Modifiers::SHIFT));
        adapter.handle(&InputEvent::key(Key::Character('a'), KeyState::Pressed, Modifiers::SHIFT));
        adapter.handle(&InputEvent::Key(KeyEvent {
            key: Key::Character('a'),
            state: KeyState::Pressed,
            modifiers: Modifiers::SHIFT,
            is_repeat: true,
        }));
        adapter.handle(&InputEvent::Text(TextInputEvent {
            text: "A".into(),
            modifiers: Modifiers::SHIFT,
        }));
        adapter.handle(&InputEvent::key(Key::Character('a'), KeyState::Released, Modifiers::SHIFT));

        assert_eq!(adapter.modifiers(), Modifiers::SHIFT);
        assert_eq!(adapter.input().modifiers(), Modifiers::SHIFT);
        assert_eq!(kinds(&events), vec![KeyDown, KeyRepeat, KeyType, KeyUp]);
    }

    #[test]
    fn test_wheel_and_escape() {
        use InteractiveEventKind::*;
        let (_stage, mut adapter, button, events) = setup();
        adapter.input().set_focused(button, false);
        kinds(&events);

        adapter.handle(&InputEvent::Wheel(WheelEvent {
            delta: 1.5,
            modifiers: Modifiers::NONE,
        }));
        adapter.handle(&InputEvent::key(Key::Escape, KeyState::Pressed, Modifiers::NONE));

        let seen = events.borrow().clone();
        assert_eq!(seen[0].kind, Wheel);
        assert_eq!(seen[0].delta, 1.5);
        assert_eq!(kinds(&events), vec![Wheel, KeyDown, FocusOut, Out]);
        assert_eq!(adapter.input().focused(), None);
    }

    #[test]
    fn test_pointer_modifiers_reach_listeners() {
        use InteractiveEventKind::*;
        let (_stage, mut adapter, _button, events) = setup();
        let at = Vec2::new(20.0, 20.0);
        let shift = Modifiers::SHIFT;

        for kind in [
            PointerEventKind::Down(MouseButton::Left),
            PointerEventKind::Move,
            PointerEventKind::Up(MouseButton::Left),
        ] {
            adapter.handle(&InputEvent::Pointer(PointerEvent {
                id: PointerId(0),
                event: kind,
                position: at,
                modifiers: shift,
            }));
        }

        assert_eq!(adapter.modifiers(), shift);
        let seen = events.borrow().clone();
        let pointer: Vec<_> = seen
            .iter()
            .filter(|e| matches!(e.kind, Down | Drag | Up))
            .collect();
        assert_eq!(pointer.len(), 3);
        assert!(pointer.iter().all(|e| e.modifiers == shift));

        adapter.handle(&InputEvent::pointer_move(at));
        assert_eq!(adapter.input().modifiers(), Modifiers::NONE);
    }
}
