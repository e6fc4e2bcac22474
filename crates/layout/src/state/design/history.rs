//! Undo/redo functionality

use shared::LayoutScene;

use super::DesignState;
use crate::error::LayoutResult;

impl DesignState {
    /// Apply a tracked mutation.
    ///
    /// `apply` runs on a copy of the current layout. On success the copy
    /// becomes current, the previous layout goes onto the undo stack and the
    /// redo stack is cleared; on error nothing changes.
    pub(crate) fn commit<T>(
        &mut self,
        label: &str,
        apply: impl FnOnce(&mut LayoutScene) -> LayoutResult<T>,
    ) -> LayoutResult<T> {
        self.abort_drag();

        let mut next = self.scene.clone();
        let out = apply(&mut next)?;
        let prev = std::mem::replace(&mut self.scene, next);
        self.save_undo(prev);
        self.redo_stack.clear();
        self.version += 1;
        tracing::debug!("Committed {label} (undo depth {})", self.undo_stack.len());
        Ok(out)
    }

    /// Save a snapshot to the undo stack, evicting the oldest past the limit
    fn save_undo(&mut self, snapshot: LayoutScene) {
        self.undo_stack.push(snapshot);
        if let Some(limit) = self.settings.history.limit {
            let excess = self.undo_stack.len().saturating_sub(limit);
            if excess > 0 {
                self.undo_stack.drain(..excess);
            }
        }
    }

    /// Undo last change. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.abort_drag();
        let Some(prev) = self.undo_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.scene, prev);
        self.redo_stack.push(current);
        self.version += 1;
        tracing::debug!("Undo (undo depth {}, redo depth {})", self.undo_stack.len(), self.redo_stack.len());
        true
    }

    /// Redo last undone change. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.abort_drag();
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.scene, next);
        self.undo_stack.push(current);
        self.version += 1;
        tracing::debug!("Redo (undo depth {}, redo depth {})", self.undo_stack.len(), self.redo_stack.len());
        true
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drop all history
    pub fn clear_history(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use crate::fixtures::design_with;
    use crate::state::design::DesignState;
    use crate::state::settings::{EngineSettings, HistorySettings};

    #[test]
    fn test_undo_on_empty_is_noop() {
        let mut state = DesignState::default();
        let version = state.version();
        assert!(!state.can_undo());
        assert!(!state.undo());
        assert!(!state.redo());
        assert_eq!(state.version(), version);
    }

    #[test]
    fn test_undo_redo_material_change() {
        let mut state = DesignState::default();
        state.set_container_material("wood").unwrap();
        assert_eq!(state.container().material, "wood");

        assert!(state.undo());
        assert_eq!(state.container().material, "metal");
        assert!(state.can_redo());

        assert!(state.redo());
        assert_eq!(state.container().material, "wood");
        assert!(!state.can_redo());
    }

    #[test]
    fn test_new_commit_clears_redo() {
        let mut state = DesignState::default();
        state.set_container_material("wood").unwrap();
        state.undo();
        assert!(state.can_redo());
        state.set_container_material("glass").unwrap();
        assert!(!state.can_redo());
        assert_eq!(state.undo_depth(), 1);
    }

    #[test]
    fn test_failed_commit_leaves_history_alone() {
        let mut state = DesignState::default();
        state.set_container_material("wood").unwrap();
        assert!(state.remove_element(42).is_err());
        assert_eq!(state.undo_depth(), 1);
        assert_eq!(state.container().material, "wood");
    }

    #[test]
    fn test_history_limit_evicts_oldest() {
        let settings = EngineSettings {
            history: HistorySettings { limit: Some(2) },
            ..Default::default()
        };
        let mut state = DesignState::with_settings(settings);
        for material in ["wood", "glass", "plastic"] {
            state.set_container_material(material).unwrap();
        }
        assert_eq!(state.undo_depth(), 2);
        assert!(state.undo());
        assert!(state.undo());
        assert!(!state.undo());
        // The oldest snapshot ("metal") was evicted
        assert_eq!(state.container().material, "wood");
    }

    #[test]
    fn test_history_snapshots_do_not_alias_live_state() {
        let mut state = design_with(&["table"]);
        let id = state.elements()[0].id;
        state
            .update_element(
                id,
                shared::ElementPatch {
                    color: Some("#000000".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(state.get_element(id).unwrap().color, "#000000");
        state.undo();
        assert_eq!(state.get_element(id).unwrap().color, "#8B4513");
    }
}
