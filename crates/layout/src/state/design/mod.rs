//! Design state management
//!
//! This module provides the design store: container, elements, selection,
//! snap preferences and undo/redo history behind one mutation API.

mod container_ops;
mod display;
mod element_ops;
mod history;
mod persistence;
mod queries;
mod transform_ops;

pub use display::{element_display_name, zone_label};

use shared::{Container, Element, ElementId, LayoutScene};

use crate::snap::SnapSettings;
use crate::state::settings::EngineSettings;

use transform_ops::DragSession;

/// Design store with undo/redo history
pub struct DesignState {
    /// Current committed layout (plus transient drag previews)
    pub(crate) scene: LayoutScene,
    /// Undo stack - previous states, newest last
    pub(crate) undo_stack: Vec<LayoutScene>,
    /// Redo stack - undone states, most recently undone last
    pub(crate) redo_stack: Vec<LayoutScene>,
    /// Monotonically increasing version counter for render invalidation
    pub(crate) version: u64,
    /// Next id handed out by `add_element`
    pub(crate) next_id: ElementId,
    /// Live snap preferences
    pub(crate) snap: SnapSettings,
    pub(crate) settings: EngineSettings,
    /// Drag gesture in progress, if any
    pub(crate) drag: Option<DragSession>,
}

impl Default for DesignState {
    fn default() -> Self {
        Self::with_settings(EngineSettings::default())
    }
}

impl DesignState {
    /// Empty design in the default container
    pub fn with_settings(settings: EngineSettings) -> Self {
        Self {
            scene: LayoutScene::default(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            version: 0,
            next_id: 1,
            snap: settings.snap.clone(),
            settings,
            drag: None,
        }
    }

    /// Current design version (increments on every visible change)
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn scene(&self) -> &LayoutScene {
        &self.scene
    }

    pub fn container(&self) -> &Container {
        &self.scene.container
    }

    pub fn elements(&self) -> &[Element] {
        &self.scene.elements
    }

    pub fn selected_element(&self) -> Option<ElementId> {
        self.scene.selected_element
    }

    /// Get an element by ID
    pub fn get_element(&self, id: ElementId) -> Option<&Element> {
        self.scene.element(id)
    }

    pub fn snap_settings(&self) -> &SnapSettings {
        &self.snap
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Bump version without saving undo
    pub(crate) fn notify_mutated(&mut self) {
        self.version += 1;
    }

    pub(crate) fn require_element(&self, id: ElementId) -> crate::error::LayoutResult<&Element> {
        self.scene
            .element(id)
            .ok_or(crate::error::LayoutError::UnknownElement(id))
    }
}
