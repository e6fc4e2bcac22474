//! Export/import and save/load of the session
//!
//! Incoming blobs are parsed into fresh values and checked in full before
//! anything live is replaced.

use std::collections::HashSet;

use shared::{Container, DesignExport, Element, ElementId, LayoutScene, ProgressSnapshot};

use super::DesignState;
use crate::error::{LayoutResult, SnapshotError};
use crate::snap::SnapSettings;
use crate::state::settings::ValidationSettings;
use crate::validation::{Candidate, Validator};

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Structural and layout checks shared by import and load.
fn check_design(
    container: &Container,
    elements: &[Element],
    rules: &ValidationSettings,
) -> Result<(), SnapshotError> {
    if ![container.length, container.width, container.height]
        .into_iter()
        .all(positive)
    {
        return Err(SnapshotError::Invalid(
            "container dimensions must be positive".to_string(),
        ));
    }

    let mut ids = HashSet::new();
    for element in elements {
        if !ids.insert(element.id) {
            return Err(SnapshotError::Invalid(format!(
                "duplicate element id {}",
                element.id
            )));
        }
        if !element.size.into_iter().all(positive) || !positive(element.scale) {
            return Err(SnapshotError::Invalid(format!(
                "element {} has a non-positive size or scale",
                element.id
            )));
        }
    }

    let validator = Validator::new(container, elements, rules);
    for element in elements {
        validator
            .check_position(Candidate::Existing(element.id), element.position)
            .and_then(|_| validator.check_rotation(element.id, element.rotation))
            .map_err(|v| SnapshotError::Invalid(v.to_string()))?;
    }
    Ok(())
}

fn check_snap(snap: &SnapSettings) -> Result<(), SnapshotError> {
    if positive(snap.grid_size) && positive(snap.rotation_snap_angle) {
        Ok(())
    } else {
        Err(SnapshotError::Invalid(
            "grid size and rotation snap angle must be positive".to_string(),
        ))
    }
}

/// First id above every id in `elements`.
fn next_free_id(elements: &[Element]) -> Result<ElementId, SnapshotError> {
    match elements.iter().map(|e| e.id).max() {
        None => Ok(1),
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| SnapshotError::Invalid("element id space exhausted".to_string())),
    }
}

fn clear_drag_flags(elements: &mut [Element]) {
    for element in elements {
        element.dragging = false;
    }
}

impl DesignState {
    /// Serialize `{container, elements}`; selection and history are left out.
    pub fn export_design(&self) -> LayoutResult<String> {
        let export = DesignExport::from(&self.committed_scene());
        let json = serde_json::to_string_pretty(&export).map_err(SnapshotError::from)?;
        Ok(json)
    }

    /// Replace container and elements from an export blob (undoable).
    pub fn import_design(&mut self, json: &str) -> LayoutResult<()> {
        let mut export: DesignExport = serde_json::from_str(json)
            .map_err(SnapshotError::from)
            .inspect_err(|e| tracing::warn!("Ignoring malformed design: {e}"))?;
        let next_id = check_design(&export.container, &export.elements, &self.settings.validation)
            .and_then(|_| next_free_id(&export.elements))
            .inspect_err(|e| tracing::warn!("Rejected design import: {e}"))?;
        clear_drag_flags(&mut export.elements);

        let count = export.elements.len();
        self.next_id = self.next_id.max(next_id);
        self.commit("import design", move |scene| {
            scene.container = export.container;
            scene.elements = export.elements;
            scene.selected_element = None;
            Ok(())
        })?;
        tracing::info!("Imported design ({count} elements)");
        Ok(())
    }

    /// Serialize the whole session, including snap preferences.
    pub fn save_progress(&self) -> LayoutResult<String> {
        let scene = self.committed_scene();
        let snapshot = ProgressSnapshot {
            container: scene.container,
            elements: scene.elements,
            selected_element: scene.selected_element,
            snap_to_grid: self.snap.snap_to_grid,
            grid_size: self.snap.grid_size,
            snap_to_rotation: self.snap.snap_to_rotation,
            rotation_snap_angle: self.snap.rotation_snap_angle,
        };
        let json = serde_json::to_string_pretty(&snapshot).map_err(SnapshotError::from)?;
        Ok(json)
    }

    /// Replace the whole session from a progress blob and clear history.
    pub fn load_progress(&mut self, json: &str) -> LayoutResult<()> {
        let mut snapshot: ProgressSnapshot = serde_json::from_str(json)
            .map_err(SnapshotError::from)
            .inspect_err(|e| tracing::warn!("Ignoring malformed progress snapshot: {e}"))?;

        let snap = SnapSettings {
            snap_to_grid: snapshot.snap_to_grid,
            grid_size: snapshot.grid_size,
            snap_to_rotation: snapshot.snap_to_rotation,
            rotation_snap_angle: snapshot.rotation_snap_angle,
        };
        let checked = check_snap(&snap)
            .and_then(|_| check_design(&snapshot.container, &snapshot.elements, &self.settings.validation))
            .and_then(|_| match snapshot.selected_element {
                Some(id) if !snapshot.elements.iter().any(|e| e.id == id) => Err(
                    SnapshotError::Invalid(format!("selected element {id} does not exist")),
                ),
                _ => Ok(()),
            })
            .and_then(|_| next_free_id(&snapshot.elements));
        let next_id = checked.inspect_err(|e| tracing::warn!("Rejected progress snapshot: {e}"))?;
        clear_drag_flags(&mut snapshot.elements);

        self.drag = None;
        self.next_id = self.next_id.max(next_id);
        let count = snapshot.elements.len();
        self.scene = LayoutScene {
            container: snapshot.container,
            elements: snapshot.elements,
            selected_element: snapshot.selected_element,
        };
        self.snap = snap;
        self.clear_history();
        self.notify_mutated();
        tracing::info!("Loaded progress snapshot ({count} elements)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::{LayoutError, SnapshotError};
    use crate::fixtures::design_with;
    use crate::state::design::DesignState;

    #[test]
    fn test_export_shape() {
        let state = design_with(&["door"]);
        let json = state.export_design().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["container"]["length"], 6.0);
        assert_eq!(value["elements"][0]["type"], "door");
        assert_eq!(value["elements"][0]["isOpen"], false);
        assert!(value.get("selectedElement").is_none());
        assert!(value["elements"][0].get("dragging").is_none());
    }

    #[test]
    fn test_import_is_undoable() {
        let source = design_with(&["bed", "toilet"]);
        let json = source.export_design().unwrap();

        let mut state = design_with(&["chair"]);
        state.import_design(&json).unwrap();
        assert_eq!(state.elements().len(), 2);
        assert_eq!(state.elements()[0].kind, "bed");

        state.undo();
        assert_eq!(state.elements().len(), 1);
        assert_eq!(state.elements()[0].kind, "chair");
    }

    #[test]
    fn test_import_keeps_ids_fresh() {
        let source = design_with(&["bed", "toilet", "door"]);
        let json = source.export_design().unwrap();
        let mut state = DesignState::default();
        state.import_design(&json).unwrap();
        let id = state.add_from_catalog("chair").unwrap();
        assert!(state.elements().iter().filter(|e| e.id == id).count() == 1);
        assert!(id > 3);
    }

    #[test]
    fn test_snapshot_with_last_id_is_rejected() {
        let source = design_with(&["bed"]);
        let mut design: serde_json::Value =
            serde_json::from_str(&source.export_design().unwrap()).unwrap();
        design["elements"][0]["id"] = serde_json::json!(u64::MAX);
        let mut progress: serde_json::Value =
            serde_json::from_str(&source.save_progress().unwrap()).unwrap();
        progress["elements"][0]["id"] = serde_json::json!(u64::MAX);
        progress["selectedElement"] = serde_json::Value::Null;

        let mut state = design_with(&["chair"]);
        let before = state.scene().clone();
        let err = state.import_design(&design.to_string()).unwrap_err();
        assert!(matches!(err, LayoutError::Snapshot(SnapshotError::Invalid(_))));
        let err = state.load_progress(&progress.to_string()).unwrap_err();
        assert!(matches!(err, LayoutError::Snapshot(SnapshotError::Invalid(_))));
        assert_eq!(state.scene(), &before);
        assert!(!state.can_undo());
    }

    #[test]
    fn test_import_near_last_id_then_add_fails_cleanly() {
        let source = design_with(&["bed"]);
        let mut design: serde_json::Value =
            serde_json::from_str(&source.export_design().unwrap()).unwrap();
        design["elements"][0]["id"] = serde_json::json!(u64::MAX - 1);

        let mut state = DesignState::default();
        state.import_design(&design.to_string()).unwrap();
        let depth = state.undo_depth();
        let err = state.add_from_catalog("chair").unwrap_err();
        assert!(matches!(err, LayoutError::IdsExhausted));
        assert_eq!(state.elements().len(), 1);
        assert_eq!(state.undo_depth(), depth);
    }

    #[test]
    fn test_import_rejects_overlapping_layout() {
        let json = r##"{
            "container": {"length": 6, "width": 2.5, "height": 3, "material": "metal"},
            "elements": [
                {"id": 1, "type": "box", "position": [0, 0.6, 0], "size": [1, 1, 1], "material": "wood", "color": "#fff", "isOpen": false},
                {"id": 2, "type": "box", "position": [0.5, 0.6, 0], "size": [1, 1, 1], "material": "wood", "color": "#fff", "isOpen": false}
            ]
        }"##;
        let mut state = DesignState::default();
        let err = state.import_design(json).unwrap_err();
        assert!(matches!(err, LayoutError::Snapshot(SnapshotError::Invalid(_))));
        assert!(state.elements().is_empty());
        assert!(!state.can_undo());
    }

    #[test]
    fn test_progress_roundtrip_restores_preferences() {
        let mut state = design_with(&["bed", "door"]);
        let bed = state.elements()[0].id;
        state.select_element(Some(bed)).unwrap();
        state.toggle_snap_to_rotation();
        state.set_grid_size(0.25).unwrap();
        let json = state.save_progress().unwrap();

        let mut restored = DesignState::default();
        restored.set_container_material("wood").unwrap();
        restored.load_progress(&json).unwrap();
        assert_eq!(restored.elements(), state.elements());
        assert_eq!(restored.selected_element(), Some(bed));
        assert!(restored.snap_settings().snap_to_rotation);
        assert_eq!(restored.snap_settings().grid_size, 0.25);
        assert!(!restored.can_undo());
        assert!(!restored.can_redo());
    }

    #[test]
    fn test_malformed_progress_leaves_state_alone() {
        let mut state = design_with(&["bed"]);
        let before = state.scene().clone();
        let err = state.load_progress("{\"container\": 3}").unwrap_err();
        assert!(matches!(err, LayoutError::Snapshot(SnapshotError::Parse(_))));
        assert_eq!(state.scene(), &before);
    }

    #[test]
    fn test_progress_with_dangling_selection_rejected() {
        let state = design_with(&["bed"]);
        let json = state.save_progress().unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["selectedElement"] = serde_json::json!(77);

        let mut target = DesignState::default();
        let err = target.load_progress(&value.to_string()).unwrap_err();
        assert!(matches!(err, LayoutError::Snapshot(SnapshotError::Invalid(_))));
        assert!(target.elements().is_empty());
    }

    #[test]
    fn test_save_during_drag_stores_committed_position() {
        let mut state = design_with(&["chair"]);
        let id = state.elements()[0].id;
        let origin = state.get_element(id).unwrap().position;
        state.preview_drag(id, [1.0, 0.6, 0.0]).unwrap();
        let json = state.save_progress().unwrap();

        let mut restored = DesignState::default();
        restored.load_progress(&json).unwrap();
        let chair = restored.get_element(id).unwrap();
        assert_eq!(chair.position, origin);
        assert!(!chair.dragging);
    }
}
