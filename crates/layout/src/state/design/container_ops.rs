//! Container dimension and material edits

use shared::ContainerDimensions;

use super::DesignState;
use crate::error::{LayoutError, LayoutResult};
use crate::validation::Validator;

impl DesignState {
    /// Resize the container.
    ///
    /// Rejected if a dimension is not positive or if any existing element
    /// would end up outside the new bounds.
    pub fn set_container_dimensions(&mut self, dims: ContainerDimensions) -> LayoutResult<()> {
        for (name, value) in [("length", dims.length), ("width", dims.width), ("height", dims.height)] {
            if let Some(value) = value {
                if !(value.is_finite() && value > 0.0) {
                    return Err(LayoutError::InvalidDimension { name, value });
                }
            }
        }

        let rules = self.settings.validation.clone();
        self.commit("resize container", |scene| {
            let container = &mut scene.container;
            if let Some(length) = dims.length {
                container.length = length;
            }
            if let Some(width) = dims.width {
                container.width = width;
            }
            if let Some(height) = dims.height {
                container.height = height;
            }
            Validator::new(&scene.container, &scene.elements, &rules).check_layout()?;
            Ok(())
        })
        .inspect_err(|e| tracing::warn!("Container resize rejected: {e}"))
    }

    /// Change the container material tag
    pub fn set_container_material(&mut self, material: impl Into<String>) -> LayoutResult<()> {
        let material = material.into();
        self.commit("container material", move |scene| {
            scene.container.material = material;
            Ok(())
        })
    }
}
