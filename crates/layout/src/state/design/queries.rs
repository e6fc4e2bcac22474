//! Read-only engine queries and snap preferences
//!
//! Queries never touch history. Snap preferences are UI state: they change
//! the store but are not undoable.

use shared::{Element, ElementId, Guide};

use super::DesignState;
use crate::error::{LayoutError, LayoutResult};
use crate::guides;
use crate::snap::SnapSettings;
use crate::validation::{Candidate, Validator};

fn check_pitch(name: &'static str, value: f64) -> LayoutResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LayoutError::InvalidSetting { name, value })
    }
}

impl DesignState {
    fn validator(&self) -> Validator<'_> {
        Validator::new(
            &self.scene.container,
            &self.scene.elements,
            &self.settings.validation,
        )
    }

    /// Would element `id` be admissible at `position`?
    pub fn validate_position(&self, id: ElementId, position: [f64; 3]) -> bool {
        self.validator()
            .validate_position(Candidate::Existing(id), position)
    }

    /// Would an element not yet in the design be admissible at `position`?
    pub fn validate_candidate(&self, element: &Element, position: [f64; 3]) -> bool {
        self.validator()
            .validate_position(Candidate::Pending(element), position)
    }

    /// Would element `id` be admissible with `rotation` at its current position?
    pub fn validate_rotation(&self, id: ElementId, rotation: [f64; 3]) -> bool {
        self.validator().validate_rotation(id, rotation)
    }

    pub fn snap_position(&self, position: [f64; 3]) -> [f64; 3] {
        self.snap.snap_position(position)
    }

    pub fn snap_rotation(&self, rotation: [f64; 3]) -> [f64; 3] {
        self.snap.snap_rotation(rotation)
    }

    /// Alignment guides for element `id` hovering at `position`
    pub fn alignment_guides(&self, id: ElementId, position: [f64; 3]) -> Vec<Guide> {
        guides::alignment_guides(
            &self.scene.container,
            &self.scene.elements,
            id,
            position,
            self.settings.guides.threshold,
        )
    }

    // ── Snap preferences ────────────────────────────────────────

    pub fn set_snap_to_grid(&mut self, enabled: bool) {
        self.snap.snap_to_grid = enabled;
        self.notify_mutated();
    }

    /// Flip grid snapping; returns the new value
    pub fn toggle_snap_to_grid(&mut self) -> bool {
        self.set_snap_to_grid(!self.snap.snap_to_grid);
        self.snap.snap_to_grid
    }

    pub fn set_grid_size(&mut self, size: f64) -> LayoutResult<()> {
        check_pitch("grid_size", size)?;
        self.snap.grid_size = size;
        self.notify_mutated();
        Ok(())
    }

    pub fn set_snap_to_rotation(&mut self, enabled: bool) {
        self.snap.snap_to_rotation = enabled;
        self.notify_mutated();
    }

    /// Flip rotation snapping; returns the new value
    pub fn toggle_snap_to_rotation(&mut self) -> bool {
        self.set_snap_to_rotation(!self.snap.snap_to_rotation);
        self.snap.snap_to_rotation
    }

    pub fn set_rotation_snap_angle(&mut self, angle: f64) -> LayoutResult<()> {
        check_pitch("rotation_snap_angle", angle)?;
        self.snap.rotation_snap_angle = angle;
        self.notify_mutated();
        Ok(())
    }

    /// Replace every snap preference at once, or none if a pitch is invalid.
    pub fn set_snap_settings(&mut self, snap: SnapSettings) -> LayoutResult<()> {
        check_pitch("grid_size", snap.grid_size)?;
        check_pitch("rotation_snap_angle", snap.rotation_snap_angle)?;
        self.snap = snap;
        self.notify_mutated();
        Ok(())
    }
}
