//! Window events flowing through the Gui into widgets.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use horizon_trellis::prelude::*;
use horizon_trellis::Clipboard;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn click(gui: &mut Gui, x: f32, y: f32) {
    gui.handle_event(&Event::left_press(x, y));
    gui.handle_event(&Event::left_release(x, y));
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

#[test]
fn test_child_window_drag_and_close() {
    init_tracing();
    let mut gui = Gui::new(Vector2f::new(800.0, 600.0));
    let root = gui.root();
    let window = gui.tree_mut().add(root, ChildWindow::new("Tools"), "Tools").unwrap();
    gui.tree_mut().set_position(window, (50.0, 50.0)).unwrap();
    gui.tree_mut().set_size(window, (200.0, 150.0)).unwrap();

    gui.handle_event(&Event::left_press(100.0, 60.0));
    gui.handle_event(&Event::mouse_move(150.0, 90.0));
    gui.handle_event(&Event::left_release(150.0, 90.0));
    assert_eq!(gui.tree().core(window).unwrap().position(), Vector2f::new(100.0, 80.0));

    let closed = Rc::new(RefCell::new(0));
    let sink = closed.clone();
    gui.tree_mut()
        .connect(window, "Closed", move || *sink.borrow_mut() += 1)
        .unwrap();

    // The close button sits 188 right and 10 down from the window corner.
    click(&mut gui, 288.0, 92.0);
    assert_eq!(*closed.borrow(), 1);
    assert!(!gui.tree().contains(window));
}

#[test]
fn test_combo_box_pick_with_mouse() {
    init_tracing();
    let mut gui = Gui::default();
    let root = gui.root();
    let combo = gui
        .tree_mut()
        .add(root, ComboBox::new().with_items(["a", "b", "c"]), "Combo")
        .unwrap();
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    gui.tree_mut()
        .connect(combo, "ItemSelected", move |index: Option<usize>| sink.borrow_mut().push(index))
        .unwrap();

    click(&mut gui, 10.0, 10.0);
    assert!(gui.tree().widget::<ComboBox>(combo).unwrap().is_expanded());

    // Rows below the box are as high as the box itself.
    click(&mut gui, 10.0, 60.0);
    let c = gui.tree().widget::<ComboBox>(combo).unwrap();
    assert!(!c.is_expanded());
    assert_eq!(c.selected_item(), Some("b"));
    assert_eq!(*log.borrow(), vec![Some(1)]);
}

#[test]
fn test_list_view_double_click_uses_gui_clock() {
    init_tracing();
    let mut gui = Gui::default();
    let root = gui.root();
    let list = gui.tree_mut().add(root, ListView::new().with_column("Name", 200.0), "List").unwrap();
    gui.tree_mut()
        .update(list, |l: &mut ListView, _| {
            l.add_item(["one"]);
            l.add_item(["two"]);
        })
        .unwrap();
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    gui.tree_mut()
        .connect(list, "DoubleClicked", move |row: usize| sink.borrow_mut().push(row))
        .unwrap();

    click(&mut gui, 10.0, 30.0);
    gui.update_time(ms(100));
    click(&mut gui, 10.0, 30.0);
    assert_eq!(*log.borrow(), vec![0]);

    click(&mut gui, 10.0, 50.0);
    gui.update_time(ms(600));
    click(&mut gui, 10.0, 50.0);
    assert_eq!(*log.borrow(), vec![0]);
    assert_eq!(gui.tree().widget::<ListView>(list).unwrap().selected_item_index(), Some(1));
}

#[test]
fn test_timer_commands_mutate_tree() {
    init_tracing();
    let mut gui = Gui::default();
    let commands = gui.commands();
    let root = gui.root();
    gui.timers_mut().create(
        move || {
            commands.push(move |gui| {
                let count = gui.tree().children(root).map(|c| c.len()).unwrap_or(0);
                gui.tree_mut().add(root, Label::new("tick"), &format!("Tick{count}")).unwrap();
            })
        },
        ms(100),
        true,
    );

    gui.update_time(ms(50));
    assert!(gui.tree().get(root, "Tick0").is_none());
    gui.update_time(ms(50));
    assert!(gui.tree().get(root, "Tick0").is_some());
    gui.update_time(ms(100));
    assert!(gui.tree().get(root, "Tick1").is_some());
    assert!(gui.commands().is_empty());
}

#[test]
fn test_clipboard_shortcuts_through_gui() {
    init_tracing();
    let mut gui = Gui::default();
    let root = gui.root();
    let edit = gui.tree_mut().add(root, EditBox::new(), "Edit").unwrap();
    gui.handle_event(&Event::key(Key::Tab));
    for c in "hi".chars() {
        gui.handle_event(&Event::text(c));
    }
    for key in [Key::A, Key::C, Key::V, Key::V] {
        gui.handle_event(&Event::KeyPressed(KeyEvent::with_modifiers(key, KeyboardModifiers::CTRL)));
    }
    assert_eq!(gui.tree().widget::<EditBox>(edit).unwrap().text(), "hihi");
    assert_eq!(gui.tree_mut().clipboard().get_text().unwrap(), "hi");
}

#[test]
fn test_resize_reaches_relative_layouts() {
    init_tracing();
    let mut gui = Gui::new(Vector2f::new(400.0, 300.0));
    let root = gui.root();
    let panel = gui.tree_mut().add(root, Panel::new(), "Panel").unwrap();
    gui.tree_mut()
        .set_size(panel, Layout2d::parse("50%", "100%").unwrap())
        .unwrap();
    assert_eq!(gui.tree().core(panel).unwrap().size(), Vector2f::new(200.0, 300.0));

    assert!(gui.handle_event(&Event::Resized { width: 800.0, height: 600.0 }));
    assert_eq!(gui.tree().core(panel).unwrap().size(), Vector2f::new(400.0, 600.0));
}
