//! Factory functions for creating test data.
//!
//! Provides helpers to construct `Container`, `Element`, `LayoutScene` and
//! ready-made `DesignState`s used in tests and when driving the command
//! protocol by hand.

use shared::*;

use crate::state::DesignState;

// ── Container factories ─────────────────────────────────────────

/// Container with the default 6 × 2.5 × 3 m extents.
pub fn container_6x3() -> Container {
    Container::default()
}

// ── Element factories ───────────────────────────────────────────

/// Element of `kind` centered at `position`, unrotated and unscaled.
pub fn element_at(id: ElementId, kind: &str, position: [f64; 3], size: [f64; 3]) -> Element {
    Element {
        id,
        kind: kind.to_string(),
        position,
        size,
        rotation: [0.0; 3],
        scale: 1.0,
        material: "wood".to_string(),
        color: "#ffffff".to_string(),
        is_open: false,
        dragging: false,
    }
}

// ── Scene / store factories ─────────────────────────────────────

/// Scene in `container` with the given elements and nothing selected.
pub fn scene_with(container: Container, elements: Vec<Element>) -> LayoutScene {
    LayoutScene {
        container,
        elements,
        selected_element: None,
    }
}

/// Store holding `scene` as its committed state, with empty history.
pub fn design_from_scene(scene: LayoutScene) -> DesignState {
    let mut state = DesignState::default();
    if let Some(max) = scene.elements.iter().map(|e| e.id).max() {
        state.next_id = max.saturating_add(1);
    }
    state.scene = scene;
    state
}

/// Store with one catalog element per entry in `kinds`, history cleared.
///
/// Kinds that cannot be placed are skipped with a warning.
pub fn design_with(kinds: &[&str]) -> DesignState {
    let mut state = DesignState::default();
    for kind in kinds {
        if let Err(e) = state.add_from_catalog(kind) {
            tracing::warn!("Fixture could not place {kind}: {e}");
        }
    }
    state.clear_history();
    state
}
