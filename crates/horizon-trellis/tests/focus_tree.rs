//! Focus paths and Tab traversal through nested containers.

use horizon_trellis::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn shift_tab() -> Event {
    Event::KeyPressed(KeyEvent::with_modifiers(Key::Tab, KeyboardModifiers::SHIFT))
}

struct Form {
    gui: Gui,
    first: ObjectId,
    group: ObjectId,
    second: ObjectId,
    third: ObjectId,
    last: ObjectId,
}

/// root: [first, group: [second, third], label, last]
fn form() -> Form {
    init_tracing();
    let mut gui = Gui::new(Vector2f::new(800.0, 600.0));
    let root = gui.root();
    let tree = gui.tree_mut();
    let first = tree.add(root, EditBox::new(), "First").unwrap();
    let group = tree.add(root, Group::new(), "Group").unwrap();
    tree.set_position(group, (0.0, 50.0)).unwrap();
    let second = tree.add(group, CheckBox::new("second"), "Second").unwrap();
    let third = tree.add(group, Button::new("third"), "Third").unwrap();
    tree.set_position(third, (0.0, 30.0)).unwrap();
    tree.add(root, Label::new("not focusable"), "Caption").unwrap();
    let last = tree.add(root, Button::new("last"), "Last").unwrap();
    tree.set_position(last, (0.0, 200.0)).unwrap();
    Form {
        gui,
        first,
        group,
        second,
        third,
        last,
    }
}

#[test]
fn test_tab_order_is_depth_first_and_wraps() {
    let Form {
        mut gui,
        first,
        second,
        third,
        last,
        ..
    } = form();

    let mut order = Vec::new();
    for _ in 0..5 {
        gui.handle_event(&Event::key(Key::Tab));
        order.push(gui.tree().focused_leaf().unwrap());
    }
    assert_eq!(order, vec![first, second, third, last, first]);

    let mut reverse = Vec::new();
    for _ in 0..5 {
        gui.handle_event(&shift_tab());
        reverse.push(gui.tree().focused_leaf().unwrap());
    }
    assert_eq!(reverse, vec![last, third, second, first, last]);
}

#[test]
fn test_next_and_previous_are_inverses() {
    let Form { mut gui, .. } = form();
    gui.handle_event(&Event::key(Key::Tab));
    for _ in 0..4 {
        let before = gui.tree().focused_leaf();
        gui.handle_event(&Event::key(Key::Tab));
        gui.handle_event(&shift_tab());
        assert_eq!(gui.tree().focused_leaf(), before);
        gui.handle_event(&Event::key(Key::Tab));
    }
}

#[test]
fn test_focus_path_is_marked() {
    let Form {
        mut gui,
        first,
        group,
        third,
        ..
    } = form();
    gui.tree_mut().set_focused(third, true).unwrap();
    let tree = gui.tree();
    assert!(tree.core(third).unwrap().is_focused());
    assert!(tree.core(group).unwrap().is_focused());
    assert!(tree.core(tree.root()).unwrap().is_focused());
    assert!(!tree.core(first).unwrap().is_focused());

    gui.tree_mut().set_focused(group, false).unwrap();
    assert!(!gui.tree().core(third).unwrap().is_focused());
    assert_eq!(gui.tree().focused_leaf(), None);
}

#[test]
fn test_isolated_panel_keeps_its_own_cycle_and_memory() {
    init_tracing();
    let mut gui = Gui::new(Vector2f::new(800.0, 600.0));
    let root = gui.root();
    let tree = gui.tree_mut();
    let outside = tree.add(root, Button::new("outside"), "Outside").unwrap();
    let panel = tree.add(root, Panel::new(), "Panel").unwrap();
    tree.set_position(panel, (200.0, 0.0)).unwrap();
    tree.set_size(panel, (200.0, 200.0)).unwrap();
    let x = tree.add(panel, Button::new("x"), "X").unwrap();
    let y = tree.add(panel, Button::new("y"), "Y").unwrap();
    tree.set_position(y, (0.0, 50.0)).unwrap();

    // Click y: it lies at (200, 50) in root coordinates.
    gui.handle_event(&Event::left_press(210.0, 60.0));
    gui.handle_event(&Event::left_release(210.0, 60.0));
    assert_eq!(gui.tree().focused_leaf(), Some(y));

    // Tab stays inside the panel.
    gui.handle_event(&Event::key(Key::Tab));
    assert_eq!(gui.tree().focused_leaf(), Some(x));
    gui.handle_event(&Event::key(Key::Tab));
    assert_eq!(gui.tree().focused_leaf(), Some(y));

    // Leaving and coming back restores the last focused child.
    gui.handle_event(&Event::left_press(10.0, 10.0));
    gui.handle_event(&Event::left_release(10.0, 10.0));
    assert_eq!(gui.tree().focused_leaf(), Some(outside));
    assert!(!gui.tree().core(panel).unwrap().is_focused());

    gui.tree_mut().set_focused(panel, true).unwrap();
    assert_eq!(gui.tree().focused_leaf(), Some(y));
}

#[test]
fn test_hidden_and_disabled_widgets_are_skipped() {
    let Form {
        mut gui,
        first,
        second,
        third,
        last,
        ..
    } = form();
    gui.tree_mut().set_enabled(second, false).unwrap();
    gui.tree_mut().set_visible(last, false).unwrap();

    let mut order = Vec::new();
    for _ in 0..3 {
        gui.handle_event(&Event::key(Key::Tab));
        order.push(gui.tree().focused_leaf().unwrap());
    }
    assert_eq!(order, vec![first, third, first]);
}

#[test]
fn test_keys_reach_the_focused_leaf() {
    let Form { mut gui, first, .. } = form();
    gui.handle_event(&Event::key(Key::Tab));
    for c in "abc".chars() {
        gui.handle_event(&Event::text(c));
    }
    gui.handle_event(&Event::key(Key::Backspace));
    assert_eq!(gui.tree().widget::<EditBox>(first).unwrap().text(), "ab");
}
