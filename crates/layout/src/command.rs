//! JSON command protocol for driving the layout engine.
//!
//! Each command maps onto one call of the engine surface. Rejected mutations
//! come back as `success: false` with the error message; only malformed
//! command JSON is an `Err`.

use serde::{Deserialize, Serialize};
use serde_json::json;
use shared::{ContainerDimensions, ElementId, ElementPatch};

use crate::catalog::NewElement;
use crate::error::LayoutResult;
use crate::state::{element_display_name, zone_label, DesignState};

/// A command the input layer can execute.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum LayoutCommand {
    /// Add an element with explicit size; placement is automatic
    AddElement {
        #[serde(rename = "type")]
        kind: String,
        size: [f64; 3],
        material: Option<String>,
        color: Option<String>,
        scale: Option<f64>,
    },
    /// Add an element using the catalog template for its type
    AddFromCatalog {
        #[serde(rename = "type")]
        kind: String,
    },
    RemoveElement {
        id: ElementId,
    },
    /// Merge-patch an element
    UpdateElement {
        id: ElementId,
        patch: ElementPatch,
    },
    MoveElement {
        id: ElementId,
        position: [f64; 3],
    },
    RotateElement {
        id: ElementId,
        rotation: [f64; 3],
    },
    ToggleDoor {
        id: ElementId,
    },
    /// Select an element, or clear the selection with `null`
    Select {
        id: Option<ElementId>,
    },
    SetContainerDimensions {
        length: Option<f64>,
        width: Option<f64>,
        height: Option<f64>,
    },
    SetContainerMaterial {
        material: String,
    },
    /// Change snap preferences; omitted fields stay as they are
    SetSnap {
        snap_to_grid: Option<bool>,
        grid_size: Option<f64>,
        snap_to_rotation: Option<bool>,
        rotation_snap_angle: Option<f64>,
    },
    ValidatePosition {
        id: ElementId,
        position: [f64; 3],
    },
    ValidateRotation {
        id: ElementId,
        rotation: [f64; 3],
    },
    SnapPosition {
        position: [f64; 3],
    },
    SnapRotation {
        rotation: [f64; 3],
    },
    AlignmentGuides {
        id: ElementId,
        position: [f64; 3],
    },
    BeginDrag {
        id: ElementId,
    },
    PreviewDrag {
        id: ElementId,
        position: [f64; 3],
    },
    EndDrag {
        id: ElementId,
        position: [f64; 3],
    },
    CancelDrag {
        id: ElementId,
    },
    /// Undo the last tracked change.
    Undo,
    /// Redo the last undone change.
    Redo,
    /// Inspect the design: container, elements, selection and history depth.
    Inspect,
    /// Export `{container, elements}` as JSON.
    ExportDesign,
    /// Replace the design with an exported one (undoable).
    ImportDesign {
        design: serde_json::Value,
    },
    /// Serialize the whole session.
    SaveProgress,
    /// Restore a saved session; clears history.
    LoadProgress {
        progress: serde_json::Value,
    },
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }

    fn from_result(result: LayoutResult<Option<serde_json::Value>>) -> Self {
        match result {
            Ok(Some(data)) => Self::ok_with_data(data),
            Ok(None) => Self::ok(),
            Err(e) => Self::err(e.to_string()),
        }
    }
}

fn inspect(state: &DesignState) -> serde_json::Value {
    let elements: Vec<serde_json::Value> = state
        .elements()
        .iter()
        .map(|element| {
            json!({
                "id": element.id,
                "name": element_display_name(element),
                "type": element.kind,
                "zone": zone_label(&element.kind),
                "position": element.position,
                "size": element.size,
                "rotation": element.rotation,
                "scale": element.scale,
                "is_open": element.is_open,
                "dragging": element.dragging,
            })
        })
        .collect();
    json!({
        "container": state.container(),
        "element_count": elements.len(),
        "elements": elements,
        "selected_element": state.selected_element(),
        "can_undo": state.can_undo(),
        "can_redo": state.can_redo(),
        "snap": state.snap_settings(),
    })
}

fn set_snap(
    state: &mut DesignState,
    snap_to_grid: Option<bool>,
    grid_size: Option<f64>,
    snap_to_rotation: Option<bool>,
    rotation_snap_angle: Option<f64>,
) -> LayoutResult<()> {
    let mut snap = state.snap_settings().clone();
    if let Some(enabled) = snap_to_grid {
        snap.snap_to_grid = enabled;
    }
    if let Some(size) = grid_size {
        snap.grid_size = size;
    }
    if let Some(enabled) = snap_to_rotation {
        snap.snap_to_rotation = enabled;
    }
    if let Some(angle) = rotation_snap_angle {
        snap.rotation_snap_angle = angle;
    }
    state.set_snap_settings(snap)
}

/// Execute a single command on the design store.
pub fn execute_command(state: &mut DesignState, cmd: LayoutCommand) -> CommandResponse {
    let result = match cmd {
        LayoutCommand::AddElement {
            kind,
            size,
            material,
            color,
            scale,
        } => {
            let mut new = NewElement::new(kind, size);
            if let Some(material) = material {
                new = new.with_material(material);
            }
            if let Some(color) = color {
                new = new.with_color(color);
            }
            if let Some(scale) = scale {
                new = new.with_scale(scale);
            }
            state.add_element(new).map(|id| Some(json!({ "id": id })))
        }

        LayoutCommand::AddFromCatalog { kind } => state
            .add_from_catalog(&kind)
            .map(|id| Some(json!({ "id": id }))),

        LayoutCommand::RemoveElement { id } => state.remove_element(id).map(|_| None),

        LayoutCommand::UpdateElement { id, patch } => state.update_element(id, patch).map(|_| None),

        LayoutCommand::MoveElement { id, position } => {
            state.move_element(id, position).map(|_| None)
        }

        LayoutCommand::RotateElement { id, rotation } => state
            .rotate_element(id, rotation)
            .map(|_| state.get_element(id).map(|e| json!({ "rotation": e.rotation }))),

        LayoutCommand::ToggleDoor { id } => state
            .toggle_door(id)
            .map(|open| Some(json!({ "is_open": open }))),

        LayoutCommand::Select { id } => state
            .select_element(id)
            .map(|_| Some(json!({ "selected": id }))),

        LayoutCommand::SetContainerDimensions {
            length,
            width,
            height,
        } => state
            .set_container_dimensions(ContainerDimensions {
                length,
                width,
                height,
            })
            .map(|_| Some(json!({ "container": state.container() }))),

        LayoutCommand::SetContainerMaterial { material } => {
            state.set_container_material(material).map(|_| None)
        }

        LayoutCommand::SetSnap {
            snap_to_grid,
            grid_size,
            snap_to_rotation,
            rotation_snap_angle,
        } => set_snap(state, snap_to_grid, grid_size, snap_to_rotation, rotation_snap_angle)
            .map(|_| Some(json!({ "snap": state.snap_settings() }))),

        LayoutCommand::ValidatePosition { id, position } => {
            Ok(Some(json!({ "valid": state.validate_position(id, position) })))
        }

        LayoutCommand::ValidateRotation { id, rotation } => {
            Ok(Some(json!({ "valid": state.validate_rotation(id, rotation) })))
        }

        LayoutCommand::SnapPosition { position } => {
            Ok(Some(json!({ "position": state.snap_position(position) })))
        }

        LayoutCommand::SnapRotation { rotation } => {
            Ok(Some(json!({ "rotation": state.snap_rotation(rotation) })))
        }

        LayoutCommand::AlignmentGuides { id, position } => {
            Ok(Some(json!({ "guides": state.alignment_guides(id, position) })))
        }

        LayoutCommand::BeginDrag { id } => state.begin_drag(id).map(|_| None),

        LayoutCommand::PreviewDrag { id, position } => {
            state.preview_drag(id, position).map(|_| {
                Some(json!({
                    "valid": state.validate_position(id, position),
                    "guides": state.alignment_guides(id, position),
                }))
            })
        }

        LayoutCommand::EndDrag { id, position } => state
            .end_drag(id, position)
            .map(|committed| Some(json!({ "committed": committed }))),

        LayoutCommand::CancelDrag { id } => state.cancel_drag(id).map(|_| None),

        LayoutCommand::Undo => Ok(Some(json!({ "undone": state.undo() }))),

        LayoutCommand::Redo => Ok(Some(json!({ "redone": state.redo() }))),

        LayoutCommand::Inspect => Ok(Some(inspect(state))),

        LayoutCommand::ExportDesign => state
            .export_design()
            .map(|json| Some(json!({ "design_json": json }))),

        LayoutCommand::ImportDesign { design } => {
            state.import_design(&design.to_string()).map(|_| None)
        }

        LayoutCommand::SaveProgress => state
            .save_progress()
            .map(|json| Some(json!({ "progress_json": json }))),

        LayoutCommand::LoadProgress { progress } => {
            state.load_progress(&progress.to_string()).map(|_| None)
        }
    };
    CommandResponse::from_result(result)
}

/// Parse and execute a single JSON command string.
pub fn execute_json(state: &mut DesignState, json: &str) -> Result<CommandResponse, String> {
    let cmd: LayoutCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(state, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    state: &mut DesignState,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<LayoutCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(state, cmd))
        .collect())
}
