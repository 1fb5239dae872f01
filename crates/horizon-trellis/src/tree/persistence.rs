//! Saving and loading widget trees.
//!
//! A [`SavedWidget`] captures what is needed to rebuild a widget: its kind,
//! name, layouts (in their textual form), common flags and the widget's own
//! properties as a [`PropertyMap`]. It derives serde, so any serde format can
//! store it; the file grammar is up to the application.

use horizon_trellis_core::logging::targets;
use horizon_trellis_core::{ObjectId, PropertyMap, PropertyValue};
use serde::{Deserialize, Serialize};

use super::WidgetTree;
use crate::error::{Result, TrellisError};
use crate::layout::Layout2d;
use crate::widget::WidgetKind;

fn default_true() -> bool {
    true
}

fn default_opacity() -> f32 {
    1.0
}

/// Serializable description of a widget and its subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedWidget {
    /// Widget type.
    pub kind: WidgetKind,
    /// Name used for lookups and name-based connections.
    pub name: String,
    /// Position layout, x and y.
    pub position: [String; 2],
    /// Size layout, width and height.
    pub size: [String; 2],
    /// Whether the widget is shown.
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Whether the widget accepts input.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Own opacity.
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    /// Widget-specific properties.
    #[serde(default)]
    pub properties: PropertyMap,
    /// Children, back to front.
    #[serde(default)]
    pub children: Vec<SavedWidget>,
}

impl WidgetTree {
    /// Describe a widget and its subtree.
    pub fn save(&self, id: ObjectId) -> Result<SavedWidget> {
        let node = self.node(id)?;
        let core = &node.core;
        let mut properties = PropertyMap::new();
        if let Some(behavior) = node.behavior.as_ref() {
            behavior.properties(&mut properties);
        }
        let children = self
            .children(id)?
            .iter()
            .map(|&child| self.save(child))
            .collect::<Result<Vec<_>>>()?;
        Ok(SavedWidget {
            kind: node.kind,
            name: self.name(id)?.to_string(),
            position: [core.position_layout.x.to_string(), core.position_layout.y.to_string()],
            size: [core.size_layout.x.to_string(), core.size_layout.y.to_string()],
            visible: core.visible,
            enabled: core.enabled,
            opacity: core.opacity,
            properties,
            children,
        })
    }

    /// Describe every widget below the root.
    pub fn save_all(&self) -> Result<Vec<SavedWidget>> {
        self.children(self.root)?
            .iter()
            .map(|&child| self.save(child))
            .collect()
    }

    /// Rebuild a saved widget and its subtree below `parent`.
    ///
    /// Nothing is added if the description is invalid: layouts and
    /// properties are checked before the widget enters the tree.
    pub fn load(&mut self, parent: ObjectId, saved: &SavedWidget) -> Result<ObjectId> {
        if saved.kind == WidgetKind::Root {
            return Err(TrellisError::RootWidget);
        }
        let position = Layout2d::parse(&saved.position[0], &saved.position[1])?;
        let size = Layout2d::parse(&saved.size[0], &saved.size[1])?;
        let mut widget = saved.kind.create();
        for (name, value) in &saved.properties {
            widget.set_property(name, value)?;
        }

        let id = self.add_boxed(parent, widget, &saved.name)?;
        self.set_size(id, size)?;
        self.set_position(id, position)?;
        self.set_enabled(id, saved.enabled)?;
        self.set_visible(id, saved.visible)?;
        self.set_opacity(id, saved.opacity)?;
        for child in &saved.children {
            self.load(id, child)?;
        }
        tracing::debug!(target: targets::CONTAINER, ?id, kind = %saved.kind, name = saved.name, "widget loaded");
        Ok(id)
    }

    /// Rebuild saved widgets below the root.
    pub fn load_all(&mut self, saved: &[SavedWidget]) -> Result<Vec<ObjectId>> {
        let root = self.root;
        saved.iter().map(|widget| self.load(root, widget)).collect()
    }

    /// The widget-specific properties of a widget.
    pub fn properties(&self, id: ObjectId) -> Result<PropertyMap> {
        let mut properties = PropertyMap::new();
        if let Some(behavior) = self.node(id)?.behavior.as_ref() {
            behavior.properties(&mut properties);
        }
        Ok(properties)
    }

    /// Set one widget-specific property.
    pub fn set_property(&mut self, id: ObjectId, name: &str, value: &PropertyValue) -> Result<()> {
        self.node(id)?;
        match self.with_behavior(id, |widget, _| widget.set_property(name, value)) {
            Some(result) => Ok(result?),
            None => Ok(()),
        }
    }
}
