//! Placement and rotation validation.
//!
//! `Validator` is a read-only view over a container and its elements. It
//! never mutates anything; callers decide what to do with a rejection.

use std::f64::consts::{FRAC_PI_2, TAU};

use shared::{Container, Element, ElementId};
use thiserror::Error;

use crate::geometry::{overlaps, within_bounds};
use crate::state::settings::ValidationSettings;

/// A door counts as open when its Y rotation is this close to π/2.
pub const DOOR_OPEN_TOLERANCE: f64 = 0.1;

/// Why a candidate placement or rotation was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    #[error("element {0} does not exist")]
    UnknownElement(ElementId),
    #[error("element {id} would leave the container bounds")]
    OutOfBounds { id: ElementId },
    #[error("element {id} would overlap element {other}")]
    Overlap { id: ElementId, other: ElementId },
    #[error("rotation component {axis} = {value} is outside [-2π, 2π]")]
    RotationOutOfRange { axis: usize, value: f64 },
    #[error("door {id} may only rotate about Y")]
    DoorTilted { id: ElementId },
    #[error("door {id} swing {angle} is outside [0, π/2]")]
    DoorSwingRange { id: ElementId, angle: f64 },
    #[error("open door {id} would swing through a wall")]
    DoorClearance { id: ElementId },
}

/// The element a placement check is about
#[derive(Debug, Clone, Copy)]
pub enum Candidate<'a> {
    /// Element already in the collection; it is excluded from collision checks
    Existing(ElementId),
    /// Edited copy of an element in the collection (same id excluded)
    Replacing(&'a Element),
    /// Element not inserted yet; checked against the full collection
    Pending(&'a Element),
}

/// Validator over a container and its element collection.
pub struct Validator<'a> {
    container: &'a Container,
    elements: &'a [Element],
    rules: &'a ValidationSettings,
}

impl<'a> Validator<'a> {
    pub fn new(container: &'a Container, elements: &'a [Element], rules: &'a ValidationSettings) -> Self {
        Self {
            container,
            elements,
            rules,
        }
    }

    fn find(&self, id: ElementId) -> Result<&'a Element, Violation> {
        self.elements
            .iter()
            .find(|e| e.id == id)
            .ok_or(Violation::UnknownElement(id))
    }

    /// Admit or reject `position` for the candidate element.
    pub fn validate_position(&self, candidate: Candidate<'_>, position: [f64; 3]) -> bool {
        self.check_position(candidate, position).is_ok()
    }

    /// Same as [`Self::validate_position`] but reports the first violation.
    pub fn check_position(&self, candidate: Candidate<'_>, position: [f64; 3]) -> Result<(), Violation> {
        let (element, skip) = match candidate {
            Candidate::Existing(id) => (self.find(id)?, Some(id)),
            Candidate::Replacing(element) => (element, Some(element.id)),
            Candidate::Pending(element) => (element, None),
        };

        let size = element.scaled_size();
        if !within_bounds(position, size, self.container, self.rules.wall_margin, self.rules.ceiling) {
            return Err(Violation::OutOfBounds { id: element.id });
        }

        for other in self.elements {
            if Some(other.id) == skip {
                continue;
            }
            if overlaps(position, size, other.position, other.scaled_size()) {
                return Err(Violation::Overlap {
                    id: element.id,
                    other: other.id,
                });
            }
        }

        Ok(())
    }

    /// Admit or reject a rotation for an existing element at its current position.
    pub fn validate_rotation(&self, id: ElementId, rotation: [f64; 3]) -> bool {
        self.check_rotation(id, rotation).is_ok()
    }

    pub fn check_rotation(&self, id: ElementId, rotation: [f64; 3]) -> Result<(), Violation> {
        let element = self.find(id)?;
        self.check_rotation_at(element, rotation, element.position)
    }

    /// Rotation check with the door clearance measured at `position`.
    pub fn check_rotation_at(
        &self,
        element: &Element,
        rotation: [f64; 3],
        position: [f64; 3],
    ) -> Result<(), Violation> {
        for (axis, &value) in rotation.iter().enumerate() {
            if !(-TAU..=TAU).contains(&value) {
                return Err(Violation::RotationOutOfRange { axis, value });
            }
        }

        if !element.is_door() {
            return Ok(());
        }

        if rotation[0] != 0.0 || rotation[2] != 0.0 {
            return Err(Violation::DoorTilted { id: element.id });
        }
        if !(0.0..=FRAC_PI_2).contains(&rotation[1]) {
            return Err(Violation::DoorSwingRange {
                id: element.id,
                angle: rotation[1],
            });
        }

        if (rotation[1] - FRAC_PI_2).abs() < DOOR_OPEN_TOLERANCE {
            let protrusion = element.scaled_size()[0] / 2.0;
            let wall = self.container.half_length() - self.rules.wall_margin;
            if position[0] + protrusion > wall || position[0] - protrusion < -wall {
                return Err(Violation::DoorClearance { id: element.id });
            }
        }

        Ok(())
    }

    /// Check every element against bounds and every other element.
    pub fn check_layout(&self) -> Result<(), Violation> {
        for element in self.elements {
            self.check_position(Candidate::Existing(element.id), element.position)?;
        }
        Ok(())
    }
}
