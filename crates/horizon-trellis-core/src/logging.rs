//! Logging and debugging facilities for Horizon Trellis.
//!
//! Horizon Trellis uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_trellis=debug,horizon_trellis_core::timer=trace")
//!     .init();
//! ```
//!
//! [`TreeDebug`] renders an [`ObjectTree`] as an indented outline, which is
//! handy when a hit test or focus move does not do what you expect.

use std::fmt::{self, Write as FmtWrite};

use crate::object::{ObjectId, ObjectTree};

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Object arena target.
    pub const OBJECT: &str = "horizon_trellis_core::object";
    /// Timer system target.
    pub const TIMER: &str = "horizon_trellis_core::timer";
    /// Signal system target.
    pub const SIGNAL: &str = "horizon_trellis_core::signal";
    /// Container routing target.
    pub const CONTAINER: &str = "horizon_trellis::container";
    /// Focus chain target.
    pub const FOCUS: &str = "horizon_trellis::focus";
    /// Layout evaluation target.
    pub const LAYOUT: &str = "horizon_trellis::layout";
    /// Animation engine target.
    pub const ANIMATION: &str = "horizon_trellis::animation";
    /// Gui context target.
    pub const GUI: &str = "horizon_trellis::gui";
}

/// Indented outline of a subtree.
///
/// The label closure decides what is printed for each object.
pub struct TreeDebug<'a, T, F> {
    tree: &'a ObjectTree<T>,
    root: ObjectId,
    label: F,
}

impl<'a, T, F> TreeDebug<'a, T, F>
where
    F: Fn(ObjectId, &str, &T) -> String,
{
    /// Describe the subtree starting at `root`.
    pub fn new(tree: &'a ObjectTree<T>, root: ObjectId, label: F) -> Self {
        Self { tree, root, label }
    }

    /// Render the outline to a string.
    pub fn format_tree(&self) -> String {
        let mut out = String::new();
        self.write_node(&mut out, self.root, 0);
        out
    }

    fn write_node(&self, out: &mut String, id: ObjectId, depth: usize) {
        let (Ok(name), Some(payload)) = (self.tree.name(id), self.tree.get(id)) else {
            return;
        };
        let _ = writeln!(out, "{:indent$}{}", "", (self.label)(id, name, payload), indent = depth * 2);
        if let Ok(children) = self.tree.children(id) {
            for &child in children {
                self.write_node(out, child, depth + 1);
            }
        }
    }
}

impl<T, F> fmt::Display for TreeDebug<'_, T, F>
where
    F: Fn(ObjectId, &str, &T) -> String,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_tree())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_tree() {
        let mut tree = ObjectTree::new();
        let root = tree.insert(None, "root", 1).unwrap();
        let panel = tree.insert(Some(root), "panel", 2).unwrap();
        tree.insert(Some(panel), "button", 3).unwrap();
        tree.insert(Some(root), "label", 4).unwrap();

        let debug = TreeDebug::new(&tree, root, |_, name, value| format!("{name} ({value})"));
        assert_eq!(
            debug.format_tree(),
            "root (1)\n  panel (2)\n    button (3)\n  label (4)\n"
        );
    }
}
