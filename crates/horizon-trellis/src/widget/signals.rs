//! Signal names and per-widget signal catalogues.
//!
//! Names are matched case-insensitively by `connect`; the constants here are
//! the canonical spelling used when emitting.

use horizon_trellis_core::SignalSpec;

use crate::animation::{AnimationChannel, ShowEffectType};
use crate::geometry::Vector2f;

/// `PositionChanged(Vector2f)`
pub const POSITION_CHANGED: &str = "PositionChanged";
/// `SizeChanged(Vector2f)`
pub const SIZE_CHANGED: &str = "SizeChanged";
/// `Focused`
pub const FOCUSED: &str = "Focused";
/// `Unfocused`
pub const UNFOCUSED: &str = "Unfocused";
/// `MouseEntered`
pub const MOUSE_ENTERED: &str = "MouseEntered";
/// `MouseLeft`
pub const MOUSE_LEFT: &str = "MouseLeft";
/// `AnimationFinished(AnimationChannel)`
pub const ANIMATION_FINISHED: &str = "AnimationFinished";
/// `ShowEffectFinished((ShowEffectType, bool))`, the flag is true for show
/// effects and false for hide effects.
pub const SHOW_EFFECT_FINISHED: &str = "ShowEffectFinished";

/// `MousePressed(Vector2f)`
pub const MOUSE_PRESSED: &str = "MousePressed";
/// `MouseReleased(Vector2f)`
pub const MOUSE_RELEASED: &str = "MouseReleased";
/// `Clicked(Vector2f)`
pub const CLICKED: &str = "Clicked";
/// `RightMousePressed(Vector2f)`
pub const RIGHT_MOUSE_PRESSED: &str = "RightMousePressed";
/// `RightMouseReleased(Vector2f)`
pub const RIGHT_MOUSE_RELEASED: &str = "RightMouseReleased";
/// `RightClicked(Vector2f)`
pub const RIGHT_CLICKED: &str = "RightClicked";

/// `Pressed(String)`
pub const PRESSED: &str = "Pressed";
/// `Checked(bool)`
pub const CHECKED: &str = "Checked";
/// `Unchecked(bool)`
pub const UNCHECKED: &str = "Unchecked";
/// `Changed(bool)`
pub const CHANGED: &str = "Changed";
/// `TextChanged(String)`
pub const TEXT_CHANGED: &str = "TextChanged";
/// `ReturnKeyPressed(String)`
pub const RETURN_KEY_PRESSED: &str = "ReturnKeyPressed";
/// `SelectionChanged`
pub const SELECTION_CHANGED: &str = "SelectionChanged";
/// `ValueChanged(f32)`
pub const VALUE_CHANGED: &str = "ValueChanged";
/// `RangeChanged((f32, f32))`
pub const RANGE_CHANGED: &str = "RangeChanged";
/// `ItemSelected(Option<usize>)`
pub const ITEM_SELECTED: &str = "ItemSelected";
/// `DoubleClicked(usize)`
pub const DOUBLE_CLICKED: &str = "DoubleClicked";
/// `HeaderClicked(usize)`
pub const HEADER_CLICKED: &str = "HeaderClicked";
/// `Closed`
pub const CLOSED: &str = "Closed";
/// `Maximized`
pub const MAXIMIZED: &str = "Maximized";
/// `Minimized`
pub const MINIMIZED: &str = "Minimized";
/// `EscapeKeyPressed`
pub const ESCAPE_KEY_PRESSED: &str = "EscapeKeyPressed";

macro_rules! signal_list {
    (widget; $($extra:expr),* $(,)?) => {
        &[
            SignalSpec::with_value::<Vector2f>(POSITION_CHANGED),
            SignalSpec::with_value::<Vector2f>(SIZE_CHANGED),
            SignalSpec::unit(FOCUSED),
            SignalSpec::unit(UNFOCUSED),
            SignalSpec::unit(MOUSE_ENTERED),
            SignalSpec::unit(MOUSE_LEFT),
            SignalSpec::with_value::<AnimationChannel>(ANIMATION_FINISHED),
            SignalSpec::with_value::<(ShowEffectType, bool)>(SHOW_EFFECT_FINISHED),
            $($extra),*
        ]
    };
    (clickable; $($extra:expr),* $(,)?) => {
        signal_list!(widget;
            SignalSpec::with_value::<Vector2f>(MOUSE_PRESSED),
            SignalSpec::with_value::<Vector2f>(MOUSE_RELEASED),
            SignalSpec::with_value::<Vector2f>(CLICKED),
            SignalSpec::with_value::<Vector2f>(RIGHT_MOUSE_PRESSED),
            SignalSpec::with_value::<Vector2f>(RIGHT_MOUSE_RELEASED),
            SignalSpec::with_value::<Vector2f>(RIGHT_CLICKED),
            $($extra),*
        )
    };
}

/// Signals of every widget.
pub const WIDGET: &[SignalSpec] = signal_list!(widget;);

/// Signals of clickable widgets and containers.
pub const CLICKABLE: &[SignalSpec] = signal_list!(clickable;);

/// Button signals.
pub const BUTTON: &[SignalSpec] = signal_list!(clickable; SignalSpec::with_value::<String>(PRESSED));

/// CheckBox and RadioButton signals.
pub const CHECKABLE: &[SignalSpec] = signal_list!(clickable;
    SignalSpec::with_value::<bool>(CHECKED),
    SignalSpec::with_value::<bool>(UNCHECKED),
    SignalSpec::with_value::<bool>(CHANGED),
);

/// EditBox signals.
pub const EDIT_BOX: &[SignalSpec] = signal_list!(clickable;
    SignalSpec::with_value::<String>(TEXT_CHANGED),
    SignalSpec::with_value::<String>(RETURN_KEY_PRESSED),
);

/// TextArea signals.
pub const TEXT_AREA: &[SignalSpec] = signal_list!(widget;
    SignalSpec::with_value::<String>(TEXT_CHANGED),
    SignalSpec::unit(SELECTION_CHANGED),
);

/// Slider, EditBoxSlider and Scrollbar signals.
pub const VALUED: &[SignalSpec] = signal_list!(widget; SignalSpec::with_value::<f32>(VALUE_CHANGED));

/// RangeSlider signals.
pub const RANGE_SLIDER: &[SignalSpec] =
    signal_list!(widget; SignalSpec::with_value::<(f32, f32)>(RANGE_CHANGED));

/// ComboBox signals.
pub const COMBO_BOX: &[SignalSpec] =
    signal_list!(widget; SignalSpec::with_value::<Option<usize>>(ITEM_SELECTED));

/// ListView signals.
pub const LIST_VIEW: &[SignalSpec] = signal_list!(widget;
    SignalSpec::with_value::<Option<usize>>(ITEM_SELECTED),
    SignalSpec::with_value::<usize>(DOUBLE_CLICKED),
    SignalSpec::with_value::<usize>(HEADER_CLICKED),
);

/// ChildWindow signals.
pub const CHILD_WINDOW: &[SignalSpec] = signal_list!(clickable;
    SignalSpec::unit(CLOSED),
    SignalSpec::unit(MAXIMIZED),
    SignalSpec::unit(MINIMIZED),
    SignalSpec::unit(ESCAPE_KEY_PRESSED),
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogues_extend_common_set() {
        for list in [BUTTON, CHECKABLE, EDIT_BOX, TEXT_AREA, VALUED, RANGE_SLIDER, COMBO_BOX, LIST_VIEW, CHILD_WINDOW] {
            for common in WIDGET {
                assert!(list.iter().any(|spec| spec.name == common.name));
            }
        }
        assert_eq!(CLICKABLE.len(), WIDGET.len() + 6);
    }

    #[test]
    fn test_value_types() {
        let pressed = BUTTON.iter().find(|s| s.name == PRESSED).unwrap();
        assert_eq!(pressed.value_type_name(), Some(std::any::type_name::<String>()));
        let focused = WIDGET.iter().find(|s| s.name == FOCUSED).unwrap();
        assert_eq!(focused.value_type_name(), None);
    }
}
