//! Show and hide effects driven by the logical clock.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use horizon_trellis::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// A button resting at (30, 15) with size (120, 30) inside a panel of
/// opacity 0.9.
fn setup() -> (WidgetTree, ObjectId, ObjectId) {
    init_tracing();
    let mut tree = WidgetTree::new(Vector2f::new(800.0, 600.0));
    let panel = tree.add(tree.root(), Panel::new(), "Panel").unwrap();
    tree.set_size(panel, (400.0, 300.0)).unwrap();
    tree.set_opacity(panel, 0.9).unwrap();
    let button = tree.add(panel, Button::new("OK"), "Ok").unwrap();
    tree.set_position(button, (30.0, 15.0)).unwrap();
    tree.set_size(button, (120.0, 30.0)).unwrap();
    (tree, panel, button)
}

fn geometry(tree: &WidgetTree, id: ObjectId) -> (Vector2f, Vector2f) {
    let core = tree.core(id).unwrap();
    (core.position(), core.size())
}

fn opacity(tree: &WidgetTree, id: ObjectId) -> f32 {
    tree.core(id).unwrap().inherited_opacity()
}

#[test]
fn test_fade_in_reaches_resting_opacity() {
    let (mut tree, _, button) = setup();
    assert_eq!(opacity(&tree, button), 0.9);

    tree.show_with_effect(button, ShowEffectType::Fade, ms(300)).unwrap();
    assert_eq!(opacity(&tree, button), 0.0);

    tree.update_time(ms(100));
    assert!((opacity(&tree, button) - 0.3).abs() < 1e-4);

    let mut previous = opacity(&tree, button);
    for _ in 0..3 {
        tree.update_time(ms(50));
        let current = opacity(&tree, button);
        assert!(current >= previous);
        previous = current;
    }

    tree.update_time(ms(50));
    assert_eq!(opacity(&tree, button), 0.9);
    assert!(!tree.is_animation_playing(button));

    tree.update_time(ms(500));
    assert_eq!(opacity(&tree, button), 0.9);
    assert_eq!(tree.core(button).unwrap().opacity(), 1.0);
}

#[test]
fn test_hide_during_fade_in_shortens_fade_out() {
    let (mut tree, _, button) = setup();
    tree.show_with_effect(button, ShowEffectType::Fade, ms(300)).unwrap();
    tree.update_time(ms(100));
    assert!((opacity(&tree, button) - 0.3).abs() < 1e-4);

    // A third of the way in, only a third of the fade out is left.
    tree.hide_with_effect(button, ShowEffectType::Fade, ms(300)).unwrap();
    tree.update_time(ms(50));
    assert!((opacity(&tree, button) - 0.15).abs() < 1e-3);
    tree.update_time(ms(40));
    assert!(opacity(&tree, button) < 0.035);
    assert!(tree.core(button).unwrap().is_visible());

    tree.update_time(ms(10));
    let core = tree.core(button).unwrap();
    assert!(!core.is_visible());
    assert_eq!(core.inherited_opacity(), 0.9);
    assert!(!tree.is_animation_playing(button));
}

#[test]
fn test_scale_in_starts_collapsed_at_center() {
    let (mut tree, _, button) = setup();
    tree.show_with_effect(button, ShowEffectType::Scale, ms(300)).unwrap();
    assert_eq!(geometry(&tree, button), (Vector2f::new(90.0, 30.0), Vector2f::ZERO));

    tree.update_time(ms(150));
    assert_eq!(
        geometry(&tree, button),
        (Vector2f::new(60.0, 22.5), Vector2f::new(60.0, 15.0))
    );

    tree.update_time(ms(150));
    assert_eq!(
        geometry(&tree, button),
        (Vector2f::new(30.0, 15.0), Vector2f::new(120.0, 30.0))
    );
    tree.update_time(ms(100));
    assert_eq!(
        geometry(&tree, button),
        (Vector2f::new(30.0, 15.0), Vector2f::new(120.0, 30.0))
    );
}

#[test]
fn test_hide_restores_resting_values() {
    let (mut tree, _, button) = setup();
    for effect in [
        ShowEffectType::Scale,
        ShowEffectType::Fade,
        ShowEffectType::SlideToLeft,
        ShowEffectType::SlideToBottom,
    ] {
        tree.set_visible(button, true).unwrap();
        tree.hide_with_effect(button, effect, ms(200)).unwrap();
        tree.update_time(ms(100));
        assert!(tree.core(button).unwrap().is_visible(), "{effect:?} hid too early");

        tree.update_time(ms(100));
        let core = tree.core(button).unwrap();
        assert!(!core.is_visible(), "{effect:?} left the widget visible");
        assert_eq!(core.position(), Vector2f::new(30.0, 15.0), "{effect:?}");
        assert_eq!(core.size(), Vector2f::new(120.0, 30.0), "{effect:?}");
        assert_eq!(core.inherited_opacity(), 0.9, "{effect:?}");
    }
}

#[test]
fn test_slides_use_parent_size() {
    let (mut tree, _, button) = setup();
    tree.show_with_effect(button, ShowEffectType::SlideFromRight, ms(100)).unwrap();
    assert_eq!(tree.core(button).unwrap().position(), Vector2f::new(400.0, 15.0));
    tree.update_time(ms(100));

    tree.show_with_effect(button, ShowEffectType::SlideFromTop, ms(100)).unwrap();
    assert_eq!(tree.core(button).unwrap().position(), Vector2f::new(30.0, -30.0));
    tree.update_time(ms(50));
    assert_eq!(tree.core(button).unwrap().position(), Vector2f::new(30.0, -7.5));
}

#[test]
fn test_effect_finished_signals() {
    let (mut tree, _, button) = setup();
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    tree.connect(button, "ShowEffectFinished", move |finished: (ShowEffectType, bool)| {
        sink.borrow_mut().push(finished)
    })
    .unwrap();

    tree.show_with_effect(button, ShowEffectType::Fade, ms(100)).unwrap();
    tree.update_time(ms(100));
    tree.hide_with_effect(button, ShowEffectType::SlideToRight, ms(100)).unwrap();
    tree.update_time(ms(150));

    assert_eq!(
        *log.borrow(),
        vec![(ShowEffectType::Fade, true), (ShowEffectType::SlideToRight, false)]
    );
}

#[test]
fn test_gui_clock_drives_animations() {
    init_tracing();
    let mut gui = Gui::default();
    let root = gui.root();
    let label = gui.tree_mut().add(root, Label::new("hello"), "Hello").unwrap();
    gui.tree_mut()
        .move_with_animation(label, Vector2f::new(100.0, 0.0), ms(200))
        .unwrap();

    assert!(gui.update_time(ms(100)));
    assert_eq!(gui.tree().core(label).unwrap().position(), Vector2f::new(50.0, 0.0));
    assert!(gui.update_time(ms(100)));
    assert!(!gui.update_time(ms(100)));
    assert_eq!(gui.tree().core(label).unwrap().position(), Vector2f::new(100.0, 0.0));
}
