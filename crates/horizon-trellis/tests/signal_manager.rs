//! Connections by widget name and handler arities through the tree.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use horizon_trellis::prelude::*;
use horizon_trellis::SignalError;
use horizon_trellis::TrellisError;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn counter() -> (Rc<Cell<u32>>, impl FnMut() + 'static) {
    let count = Rc::new(Cell::new(0));
    let sink = count.clone();
    (count, move || sink.set(sink.get() + 1))
}

fn click(gui: &mut Gui, x: f32, y: f32) {
    gui.handle_event(&Event::left_press(x, y));
    gui.handle_event(&Event::left_release(x, y));
}

#[test]
fn test_connection_attaches_to_widgets_added_later() {
    init_tracing();
    let mut gui = Gui::default();
    let (count, handler) = counter();
    gui.tree_mut().connect_by_name("NameOfWidget", "Pressed", handler);
    assert_eq!(gui.tree().managed_connection_count(), 1);

    let root = gui.root();
    let panel = gui.tree_mut().add(root, Panel::new(), "Panel").unwrap();
    gui.tree_mut().set_size(panel, (300.0, 300.0)).unwrap();
    let button = gui.tree_mut().add(panel, Button::new("OK"), "NameOfWidget").unwrap();
    assert_eq!(gui.tree().connection_count(button, Some("Pressed")).unwrap(), 1);

    click(&mut gui, 10.0, 10.0);
    assert_eq!(count.get(), 1);
}

#[test]
fn test_connection_follows_renames_and_removal() {
    init_tracing();
    let mut gui = Gui::default();
    let root = gui.root();
    let button = gui.tree_mut().add(root, Button::new("OK"), "Other").unwrap();

    let (count, handler) = counter();
    let id = gui.tree_mut().connect_by_name("NameOfWidget", "Pressed", handler);
    click(&mut gui, 10.0, 10.0);
    assert_eq!(count.get(), 0);

    gui.tree_mut().set_name(button, "NameOfWidget").unwrap();
    click(&mut gui, 10.0, 10.0);
    assert_eq!(count.get(), 1);

    gui.tree_mut().set_name(button, "Renamed").unwrap();
    assert_eq!(gui.tree().connection_count(button, None).unwrap(), 0);
    click(&mut gui, 10.0, 10.0);
    assert_eq!(count.get(), 1);

    gui.tree_mut().set_name(button, "NameOfWidget").unwrap();
    gui.tree_mut().remove(button);
    let again = gui.tree_mut().add(root, Button::new("OK"), "NameOfWidget").unwrap();
    click(&mut gui, 10.0, 10.0);
    assert_eq!(count.get(), 2);

    assert!(gui.tree_mut().disconnect_by_name(id));
    assert!(!gui.tree_mut().disconnect_by_name(id));
    assert_eq!(gui.tree().connection_count(again, None).unwrap(), 0);
    click(&mut gui, 10.0, 10.0);
    assert_eq!(count.get(), 2);
}

#[test]
fn test_one_connection_per_matching_widget() {
    init_tracing();
    let mut gui = Gui::default();
    let root = gui.root();
    let a = gui.tree_mut().add(root, CheckBox::new("a"), "Option").unwrap();
    let b = gui.tree_mut().add(root, CheckBox::new("b"), "Option").unwrap();
    gui.tree_mut().set_position(b, (0.0, 100.0)).unwrap();

    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    gui.tree_mut().connect_by_name("Option", "Checked", move |_: bool, id: ObjectId, signal: &str| {
        sink.borrow_mut().push((id, signal.to_string()))
    });

    click(&mut gui, 10.0, 110.0);
    click(&mut gui, 10.0, 10.0);
    assert_eq!(
        *log.borrow(),
        vec![(b, "Checked".to_string()), (a, "Checked".to_string())]
    );

    gui.tree_mut().disconnect_all_by_name();
    assert_eq!(gui.tree().managed_connection_count(), 0);
    assert_eq!(gui.tree().connection_count(a, None).unwrap(), 0);
}

#[test]
fn test_mismatched_signal_is_skipped_for_that_widget() {
    init_tracing();
    let mut gui = Gui::default();
    let root = gui.root();
    let label = gui.tree_mut().add(root, Label::new("text"), "Target").unwrap();
    let (count, handler) = counter();
    gui.tree_mut().connect_by_name("Target", "Pressed", handler);
    assert_eq!(gui.tree().connection_count(label, None).unwrap(), 0);

    let button = gui.tree_mut().add(root, Button::new("OK"), "Target").unwrap();
    gui.tree_mut().set_position(button, (0.0, 100.0)).unwrap();
    click(&mut gui, 10.0, 110.0);
    assert_eq!(count.get(), 1);
}

#[test]
fn test_direct_connections_share_ids_and_order() {
    init_tracing();
    let mut gui = Gui::default();
    let root = gui.root();
    let button = gui.tree_mut().add(root, Button::new("OK"), "Ok").unwrap();

    let log = Rc::new(RefCell::new(Vec::new()));
    let first = {
        let log = log.clone();
        gui.tree_mut()
            .connect(button, "Pressed", move || log.borrow_mut().push("nullary"))
            .unwrap()
    };
    let managed = {
        let log = log.clone();
        gui.tree_mut()
            .connect_by_name("Ok", "Pressed", move |text: String| {
                assert_eq!(text, "OK");
                log.borrow_mut().push("value")
            })
    };
    let last = {
        let log = log.clone();
        gui.tree_mut()
            .connect(button, "Pressed", move |_: ObjectId, _: &str| log.borrow_mut().push("source"))
            .unwrap()
    };
    assert!(first < managed && managed < last);

    click(&mut gui, 10.0, 10.0);
    assert_eq!(*log.borrow(), vec!["nullary", "value", "source"]);

    assert!(gui.tree_mut().disconnect(button, first));
    assert!(!gui.tree_mut().disconnect(button, first));

    let err = gui.tree_mut().connect(button, "Pressed", |_: f32| {}).unwrap_err();
    assert!(matches!(err, TrellisError::Signal(SignalError::ArgumentMismatch { .. })));
    let err = gui.tree_mut().connect(button, "Nope", || {}).unwrap_err();
    assert!(matches!(err, TrellisError::Signal(SignalError::UnknownSignal { .. })));
}
