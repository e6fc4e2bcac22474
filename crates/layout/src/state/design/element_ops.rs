//! Element CRUD operations

use std::f64::consts::FRAC_PI_2;

use shared::{Element, ElementId, ElementPatch};

use super::DesignState;
use crate::catalog::{template, NewElement};
use crate::error::{LayoutError, LayoutResult};
use crate::placement::{jitter_for, Placement, Placer};
use crate::validation::{Candidate, Validator};

fn check_size(size: [f64; 3]) -> LayoutResult<()> {
    for value in size {
        if !(value.is_finite() && value > 0.0) {
            return Err(LayoutError::InvalidDimension { name: "size", value });
        }
    }
    Ok(())
}

fn check_scale(scale: f64) -> LayoutResult<()> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(LayoutError::InvalidDimension { name: "scale", value: scale })
    }
}

impl DesignState {
    /// Add an element, placing it with the zone heuristic.
    ///
    /// Returns the new id, or `PlacementExhausted` if no valid spot was found
    /// within the attempt budget (nothing is inserted in that case).
    pub fn add_element(&mut self, new: NewElement) -> LayoutResult<ElementId> {
        check_size(new.size)?;
        check_scale(new.scale)?;
        let id = self.next_id;
        let next_id = id.checked_add(1).ok_or(LayoutError::IdsExhausted)?;
        self.abort_drag();

        let mut element = Element {
            id,
            kind: new.kind,
            position: [0.0; 3],
            size: new.size,
            rotation: [0.0; 3],
            scale: new.scale,
            material: new.material,
            color: new.color,
            is_open: false,
            dragging: false,
        };

        let mut jitter = jitter_for(&self.settings.placement, id);
        let placement = Placer::new(
            &self.scene.container,
            &self.scene.elements,
            &self.settings.placement,
            &self.settings.validation,
        )
        .propose_initial_placement(&element, jitter.as_mut());

        element.position = match placement {
            Placement::Accepted { position, .. } => position,
            Placement::Exhausted { last, attempts } => {
                tracing::warn!(
                    "No free spot for {} after {attempts} attempts (last tried {:?})",
                    element.kind,
                    last
                );
                return Err(LayoutError::PlacementExhausted {
                    kind: element.kind,
                    attempts,
                });
            }
        };

        self.commit("add element", move |scene| {
            scene.elements.push(element);
            Ok(())
        })?;
        self.next_id = next_id;
        Ok(id)
    }

    /// Add an element of `kind` using its catalog template
    pub fn add_from_catalog(&mut self, kind: &str) -> LayoutResult<ElementId> {
        let new = template(kind, &self.scene.container);
        self.add_element(new)
    }

    /// Remove an element; clears the selection if it pointed at it.
    pub fn remove_element(&mut self, id: ElementId) -> LayoutResult<()> {
        self.commit("remove element", |scene| {
            let index = scene
                .elements
                .iter()
                .position(|e| e.id == id)
                .ok_or(LayoutError::UnknownElement(id))?;
            scene.elements.remove(index);
            if scene.selected_element == Some(id) {
                scene.selected_element = None;
            }
            Ok(())
        })
    }

    /// Merge `patch` into an element.
    ///
    /// A patch that only sets `dragging` is applied without history. Patches
    /// touching position, size, scale or rotation are validated first.
    pub fn update_element(&mut self, id: ElementId, patch: ElementPatch) -> LayoutResult<()> {
        if !patch.is_tracked() {
            let element = self
                .scene
                .element_mut(id)
                .ok_or(LayoutError::UnknownElement(id))?;
            patch.apply(element);
            self.notify_mutated();
            return Ok(());
        }

        if let Some(size) = patch.size {
            check_size(size)?;
        }
        if let Some(scale) = patch.scale {
            check_scale(scale)?;
        }

        let rules = self.settings.validation.clone();
        self.commit("update element", |scene| {
            let mut updated = scene
                .element(id)
                .cloned()
                .ok_or(LayoutError::UnknownElement(id))?;
            patch.apply(&mut updated);

            let validator = Validator::new(&scene.container, &scene.elements, &rules);
            if patch.touches_placement() {
                validator.check_position(Candidate::Replacing(&updated), updated.position)?;
            }
            if patch.rotation.is_some() || (updated.is_door() && patch.touches_placement()) {
                validator.check_rotation_at(&updated, updated.rotation, updated.position)?;
            }

            if let Some(slot) = scene.element_mut(id) {
                *slot = updated;
            }
            Ok(())
        })
        .inspect_err(|e| tracing::warn!("Update of element {id} rejected: {e}"))
    }

    /// Commit a new position for an element (end of a drag gesture).
    pub fn move_element(&mut self, id: ElementId, position: [f64; 3]) -> LayoutResult<()> {
        let rules = self.settings.validation.clone();
        self.commit("move element", |scene| {
            let validator = Validator::new(&scene.container, &scene.elements, &rules);
            validator.check_position(Candidate::Existing(id), position)?;
            let element = scene.element(id).ok_or(LayoutError::UnknownElement(id))?;
            if element.is_door() {
                validator.check_rotation_at(element, element.rotation, position)?;
            }
            if let Some(element) = scene.element_mut(id) {
                element.position = position;
            }
            Ok(())
        })
        .inspect_err(|e| tracing::warn!("Move of element {id} rejected: {e}"))
    }

    /// Snap and commit a rotation.
    pub fn rotate_element(&mut self, id: ElementId, rotation: [f64; 3]) -> LayoutResult<()> {
        let rotation = self.snap.snap_rotation(rotation);
        self.update_element(
            id,
            ElementPatch {
                rotation: Some(rotation),
                ..Default::default()
            },
        )
    }

    /// Open a closed door or close an open one.
    ///
    /// Returns the new `is_open` value.
    pub fn toggle_door(&mut self, id: ElementId) -> LayoutResult<bool> {
        let element = self.require_element(id)?;
        if !element.is_door() {
            return Err(LayoutError::NotADoor(id));
        }
        let open = !element.is_open;
        let rotation = if open { [0.0, FRAC_PI_2, 0.0] } else { [0.0; 3] };
        self.update_element(
            id,
            ElementPatch {
                rotation: Some(rotation),
                is_open: Some(open),
                ..Default::default()
            },
        )?;
        Ok(open)
    }

    /// Change the selection (not tracked by history)
    pub fn select_element(&mut self, id: Option<ElementId>) -> LayoutResult<()> {
        if let Some(id) = id {
            self.require_element(id)?;
        }
        self.scene.selected_element = id;
        self.notify_mutated();
        Ok(())
    }
}
