//! Transform/drag operations
//!
//! A drag writes transient previews straight into the live layout without
//! history. Only `end_drag` commits, through `move_element`.

use shared::{ElementId, LayoutScene};

use super::DesignState;
use crate::error::{LayoutError, LayoutResult};
use crate::geometry::same_position;

/// Drag gesture in progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DragSession {
    pub element_id: ElementId,
    /// Last committed position of the dragged element
    pub origin: [f64; 3],
}

impl DesignState {
    /// Start dragging an element
    pub fn begin_drag(&mut self, id: ElementId) -> LayoutResult<()> {
        self.abort_drag();
        let element = self
            .scene
            .element_mut(id)
            .ok_or(LayoutError::UnknownElement(id))?;
        element.dragging = true;
        self.drag = Some(DragSession {
            element_id: id,
            origin: element.position,
        });
        self.notify_mutated();
        Ok(())
    }

    /// Show the element at `position` while dragging; not validated, not tracked
    pub fn preview_drag(&mut self, id: ElementId, position: [f64; 3]) -> LayoutResult<()> {
        if self.drag.map(|d| d.element_id) != Some(id) {
            self.begin_drag(id)?;
        }
        if let Some(element) = self.scene.element_mut(id) {
            element.position = position;
        }
        self.notify_mutated();
        Ok(())
    }

    /// Finish a drag at `position`.
    ///
    /// The candidate is snapped and validated. Returns `Ok(true)` if a move
    /// was committed, `Ok(false)` if the snapped position equals the committed
    /// one. On rejection the element is back at its committed position.
    pub fn end_drag(&mut self, id: ElementId, position: [f64; 3]) -> LayoutResult<bool> {
        let session = self.drag;
        let origin = match session {
            Some(session) if session.element_id == id => {
                self.abort_drag();
                session.origin
            }
            _ => {
                self.abort_drag();
                let element = self
                    .scene
                    .element_mut(id)
                    .ok_or(LayoutError::UnknownElement(id))?;
                element.dragging = false;
                element.position
            }
        };

        let snapped = self.snap.snap_position(position);
        if same_position(snapped, origin) {
            return Ok(false);
        }
        self.move_element(id, snapped)?;
        Ok(true)
    }

    /// Abandon a drag and put the element back
    pub fn cancel_drag(&mut self, id: ElementId) -> LayoutResult<()> {
        let session = self.drag;
        match session {
            Some(session) if session.element_id == id => {
                self.abort_drag();
                Ok(())
            }
            _ => {
                let element = self
                    .scene
                    .element_mut(id)
                    .ok_or(LayoutError::UnknownElement(id))?;
                element.dragging = false;
                Ok(())
            }
        }
    }

    /// Restore the dragged element, if any, to its committed position
    pub(crate) fn abort_drag(&mut self) {
        if let Some(session) = self.drag.take() {
            if let Some(element) = self.scene.element_mut(session.element_id) {
                element.position = session.origin;
                element.dragging = false;
            }
            self.notify_mutated();
        }
    }

    /// Layout with any drag preview replaced by the committed position
    pub fn committed_scene(&self) -> LayoutScene {
        let mut scene = self.scene.clone();
        if let Some(session) = self.drag {
            if let Some(element) = scene.element_mut(session.element_id) {
                element.position = session.origin;
                element.dragging = false;
            }
        }
        scene
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }
}
