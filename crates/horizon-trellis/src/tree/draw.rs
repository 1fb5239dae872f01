//! Draw traversal.

use horizon_trellis_core::ObjectId;

use super::WidgetTree;
use crate::geometry::{Rect, Vector2f};
use crate::render::{DrawCommand, DrawList, Renderer};

impl WidgetTree {
    /// Emit draw commands for every visible widget, back to front.
    ///
    /// Children are clipped to the area of their containers and drawn with
    /// their effective opacity. The root itself draws nothing.
    pub fn draw(&self, renderer: &mut dyn Renderer) {
        let clip = Rect::from_origin_size(Vector2f::ZERO, self.window_size);
        self.draw_children(self.root, Vector2f::ZERO, clip, renderer);
    }

    fn draw_children(&self, container: ObjectId, origin: Vector2f, clip: Rect, renderer: &mut dyn Renderer) {
        let Ok(children) = self.objects.children(container) else {
            return;
        };
        for &child in children {
            self.draw_widget(child, origin, clip, renderer);
        }
    }

    fn draw_widget(&self, id: ObjectId, origin: Vector2f, clip: Rect, renderer: &mut dyn Renderer) {
        let Some(node) = self.objects.get(id) else {
            return;
        };
        if !node.core.visible {
            return;
        }
        let position = origin + node.core.position;
        let opacity = node.core.effective_opacity();

        if let Some(behavior) = node.behavior.as_ref() {
            let mut list = DrawList::new();
            behavior.draw(&node.core, &mut list);
            for (part, rect) in list.drain() {
                renderer.draw(&DrawCommand {
                    widget: id,
                    kind: node.kind,
                    part,
                    rect: rect.translate(position),
                    clip,
                    opacity,
                });
            }
        }

        if node.container.is_some() {
            let inner = Rect::from_origin_size(position, node.core.size);
            if let Some(child_clip) = clip.intersect(&inner) {
                self.draw_children(id, position + self.child_offset(id), child_clip, renderer);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Part;
    use crate::widgets::{Button, Panel};

    #[test]
    fn test_draw_order_clip_and_opacity() {
        let mut tree = WidgetTree::new(Vector2f::new(400.0, 300.0));
        let panel = tree.add(tree.root(), Panel::new(), "Panel").unwrap();
        tree.set_position(panel, (10.0, 10.0)).unwrap();
        tree.set_size(panel, (100.0, 100.0)).unwrap();
        tree.set_opacity(panel, 0.5).unwrap();
        let button = tree.add(panel, Button::new("x"), "x").unwrap();
        tree.set_position(button, (90.0, 0.0)).unwrap();
        let hidden = tree.add(panel, Button::new("y"), "y").unwrap();
        tree.set_visible(hidden, false).unwrap();

        let mut commands = Vec::new();
        tree.draw(&mut commands);

        assert_eq!(commands[0].widget, panel);
        assert_eq!(commands[0].part, Part::Background);
        let button_bg = commands
            .iter()
            .find(|c| c.widget == button && c.part == Part::Background)
            .unwrap();
        assert_eq!(button_bg.rect.origin, Vector2f::new(100.0, 10.0));
        assert_eq!(button_bg.clip, Rect::new(10.0, 10.0, 100.0, 100.0));
        assert_eq!(button_bg.opacity, 0.5);
        assert!(commands.iter().all(|c| c.widget != hidden));
    }
}
