#[cfg(test)]
mod tests {
    use crate::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn child(stage: &Stage, parent: NodeId, node: SceneNode) -> NodeId {
        let id = stage.create(node);
        stage.add_child(parent, id).unwrap();
        id
    }

    #[test]
    fn test_rect_contains_inclusive_edges() {
        let rect = Rect::new(10.0, 10.0, 100.0, 50.0);

        assert!(rect.contains(Vec2::new(50.0, 30.0)));
        assert!(rect.contains(Vec2::new(10.0, 10.0)));
        assert!(rect.contains(Vec2::new(110.0, 60.0)));
        assert!(!rect.contains(Vec2::new(5.0, 30.0)));
        assert!(!rect.contains(Vec2::new(50.0, 70.0)));
    }

    #[test]
    fn test_negative_area_is_clamped() {
        let state = InteractiveState::new(-5.0, 12.0);
        assert_eq!(state.area(), Size::clamped(0.0, 12.0));
        assert_eq!(state.area().width, 0.0);
    }

    #[test]
    fn test_absolute_transform_follows_parent_scale() {
        let stage = Stage::new();
        let panel = child(&stage, stage.root(), SceneNode::new("panel").at(100.0, 50.0).scaled(2.0, 2.0));
        let button = child(
            &stage,
            panel,
            SceneNode::new("button")
                .at(10.0, 5.0)
                .with_interactive(InteractiveState::new(20.0, 10.0)),
        );

        assert_eq!(stage.absolute_position(button), Some(Vec2::new(120.0, 60.0)));
        assert_eq!(
            stage.with(|g| g.hit_rect(button)),
            Some(Rect::new(120.0, 60.0, 40.0, 20.0))
        );
    }

    #[test]
    fn test_z_order_is_paint_order() {
        let stage = Stage::new();
        let a = child(&stage, stage.root(), SceneNode::new("a"));
        let a1 = child(&stage, a, SceneNode::new("a1"));
        let b = child(&stage, stage.root(), SceneNode::new("b"));

        stage.with(|g| {
            assert_eq!(g.absolute_z_order(g.root()), 0);
            assert_eq!(g.absolute_z_order(a), 1);
            assert_eq!(g.absolute_z_order(a1), 2);
            assert_eq!(g.absolute_z_order(b), 3);
        });

        // Moving `a` to the end paints it (and its child) last.
        stage.add_child(stage.root(), a).unwrap();
        stage.with(|g| {
            assert_eq!(g.absolute_z_order(b), 1);
            assert_eq!(g.absolute_z_order(a), 2);
            assert_eq!(g.absolute_z_order(a1), 3);
        });
    }

    #[test]
    fn test_detach_takes_subtree_off_screen() {
        let stage = Stage::new();
        let panel = child(&stage, stage.root(), SceneNode::new("panel"));
        let inner = child(&stage, panel, SceneNode::new("inner"));
        let leaf = child(&stage, inner, SceneNode::new("leaf"));

        assert!(stage.is_on_screen(leaf));
        stage.remove_from_parent(panel).unwrap();
        assert!(!stage.is_on_screen(leaf));
        assert!(!stage.is_attached(inner));
        assert_eq!(stage.with(|g| g.absolute_z_order(leaf)), -1);

        stage.add_child(stage.root(), panel).unwrap();
        assert!(stage.is_on_screen(leaf));
    }

    #[test]
    fn test_hidden_ancestor_hides_descendants() {
        let stage = Stage::new();
        let panel = child(&stage, stage.root(), SceneNode::new("panel").hidden());
        let leaf = child(&stage, panel, SceneNode::new("leaf"));

        assert!(stage.is_attached(leaf));
        assert!(stage.with(|g| g.is_visible(leaf)));
        assert!(!stage.is_on_screen(leaf));
    }

    #[test]
    fn test_cycles_and_root_are_rejected() {
        let stage = Stage::new();
        let a = child(&stage, stage.root(), SceneNode::new("a"));
        let b = child(&stage, a, SceneNode::new("b"));

        assert_eq!(
            stage.add_child(b, a),
            Err(SceneError::Cycle { parent: b, child: a })
        );
        assert_eq!(stage.add_child(a, a), Err(SceneError::Cycle { parent: a, child: a }));
        assert_eq!(stage.add_child(a, stage.root()), Err(SceneError::Root));
        assert_eq!(stage.remove_from_parent(stage.root()), Err(SceneError::Root));
        assert_eq!(
            stage.insert_child(a, 5, stage.create(SceneNode::new("c"))),
            Err(SceneError::ChildIndex { index: 5, len: 1 })
        );
    }

    #[test]
    fn test_insert_child_reorders_siblings() {
        let stage = Stage::new();
        let a = child(&stage, stage.root(), SceneNode::new("a"));
        let b = child(&stage, stage.root(), SceneNode::new("b"));
        let c = stage.create(SceneNode::new("c"));

        stage.insert_child(stage.root(), 0, c).unwrap();
        assert_eq!(stage.with(|g| g.children(g.root()).to_vec()), vec![c, a, b]);

        stage.insert_child(stage.root(), 2, c).unwrap();
        assert_eq!(stage.with(|g| g.children(g.root()).to_vec()), vec![a, b, c]);
    }

    #[test]
    fn test_detach_observer_fires_once_per_leave() {
        init_logger();
        let stage = Stage::new();
        let panel = child(&stage, stage.root(), SceneNode::new("panel"));
        let leaf = child(&stage, panel, SceneNode::new("leaf"));
        let seen = Rc::new(RefCell::new(Vec::new()));

        let seen_clone = seen.clone();
        stage.on_detach(move |id| seen_clone.borrow_mut().push(id));

        // Reparenting within the stage is not a leave.
        let other = child(&stage, stage.root(), SceneNode::new("other"));
        stage.add_child(other, leaf).unwrap();
        assert!(seen.borrow().is_empty());

        stage.remove_from_parent(other).unwrap();
        // Already detached: no second notification.
        stage.remove_from_parent(leaf).unwrap();
        assert_eq!(*seen.borrow(), vec![other]);

        assert_eq!(stage.destroy(panel), Ok(1));
        assert_eq!(*seen.borrow(), vec![other, panel]);
        assert!(!stage.contains(panel));

        // Destroying a detached subtree is reported too.
        assert_eq!(stage.destroy(other), Ok(2));
        assert_eq!(*seen.borrow(), vec![other, panel, other]);
    }

    #[test]
    fn test_typed_listeners() {
        let stage = Stage::new();
        let node = stage.create_interactive("node", 10.0, 10.0);
        let plain = stage.create(SceneNode::new("plain"));
        let hits = Rc::new(RefCell::new(Vec::new()));

        let h = hits.clone();
        let down = stage
            .on(node, InteractiveEventKind::Down, move |e| h.borrow_mut().push(e.kind))
            .unwrap();
        let h = hits.clone();
        stage.on_any(node, move |e| h.borrow_mut().push(e.kind));
        assert!(stage.on_any(plain, |_| {}).is_none());

        let listeners = stage.with(|g| g.interactive(node).unwrap().listeners_for(InteractiveEventKind::Down));
        assert_eq!(listeners.len(), 2);
        let listeners = stage.with(|g| g.interactive(node).unwrap().listeners_for(InteractiveEventKind::Up));
        assert_eq!(listeners.len(), 1);

        assert!(stage.remove_listener(node, down));
        assert!(!stage.remove_listener(node, down));
        assert_eq!(stage.with(|g| g.interactive(node).unwrap().listener_count()), 1);
    }

    #[test]
    fn test_bubble_parent_requires_flag_and_capability() {
        let stage = Stage::new();
        let panel = child(
            &stage,
            stage.root(),
            SceneNode::new("panel").with_interactive(InteractiveState::new(100.0, 100.0)),
        );
        let plain = child(&stage, panel, SceneNode::new("plain"));
        let pushing = child(
            &stage,
            panel,
            SceneNode::new("pushing")
                .with_interactive(InteractiveState::new(10.0, 10.0).with_push_events_up(true)),
        );
        let quiet = child(
            &stage,
            panel,
            SceneNode::new("quiet").with_interactive(InteractiveState::new(10.0, 10.0)),
        );
        let orphan = child(
            &stage,
            plain,
            SceneNode::new("orphan")
                .with_interactive(InteractiveState::new(10.0, 10.0).with_push_events_up(true)),
        );

        stage.with(|g| {
            assert_eq!(g.bubble_parent(pushing), Some(panel));
            assert_eq!(g.bubble_parent(quiet), None);
            assert_eq!(g.bubble_parent(orphan), None);
            assert_eq!(g.bubble_parent(panel), None);
        });
    }

    #[test]
    fn test_key_chars() {
        assert_eq!(Key::Character('x').as_char(), Some('x'));
        assert_eq!(Key::Space.as_char(), Some(' '));
        assert_eq!(Key::Escape.as_char(), None);

        let e = InteractiveEvent::new(InteractiveEventKind::KeyType).with_text("hé");
        assert_eq!(e.key_char, Some('h'));
        assert_eq!(e.text.as_deref(), Some("hé"));
    }

    #[test]
    fn test_find_by_name() {
        let stage = Stage::new();
        let panel = child(&stage, stage.root(), SceneNode::new("panel"));
        let ok = child(&stage, panel, SceneNode::new("ok"));
        assert_eq!(stage.with(|g| g.find_by_name("ok")), Some(ok));
        assert_eq!(stage.with(|g| g.find_by_name("missing")), None);
    }
}
