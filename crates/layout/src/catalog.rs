//! Default templates for element types plus the material and color palettes.

use std::f64::consts::{FRAC_PI_2, PI};

use shared::Container;

/// Materials offered for elements and the container
pub const MATERIALS: &[&str] = &["wood", "metal", "plastic", "glass", "concrete", "fabric"];

/// Colors offered for elements
pub const COLORS: &[&str] = &["#ffffff", "#000000", "#ff0000", "#00ff00", "#0000ff"];

/// Y rotation presets: 0°, 90°, 180°, 270°
pub const ROTATION_PRESETS: [(&str, f64); 4] = [
    ("0°", 0.0),
    ("90°", FRAC_PI_2),
    ("180°", PI),
    ("270°", 3.0 * FRAC_PI_2),
];

/// Types with a dedicated template
pub const KNOWN_TYPES: &[&str] = &[
    "door", "window", "partition", "shelf", "table", "chair", "bed", "toilet", "fan",
];

/// Clearance subtracted from container-sized templates
const FIT_CLEARANCE: f64 = 0.2;

/// Everything needed to add an element except its position
#[derive(Debug, Clone, PartialEq)]
pub struct NewElement {
    pub kind: String,
    pub size: [f64; 3],
    pub material: String,
    pub color: String,
    pub scale: f64,
}

impl NewElement {
    pub fn new(kind: impl Into<String>, size: [f64; 3]) -> Self {
        Self {
            kind: kind.into(),
            size,
            material: MATERIALS[0].to_string(),
            color: COLORS[0].to_string(),
            scale: 1.0,
        }
    }

    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = material.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }
}

/// Default template for `kind`; partitions and shelves follow the container.
pub fn template(kind: &str, container: &Container) -> NewElement {
    let (size, material, color) = match kind {
        "door" => ([0.9, 2.0, 0.1], "wood", "#8B4513"),
        "window" => ([1.0, 1.0, 0.1], "glass", "#87CEEB"),
        "partition" => (
            [0.1, container.height - FIT_CLEARANCE, container.width - FIT_CLEARANCE],
            "wood",
            "#D2B48C",
        ),
        "shelf" => ([container.length - FIT_CLEARANCE, 0.1, 0.4], "wood", "#A0522D"),
        "table" => ([1.5, 0.8, 1.0], "wood", "#8B4513"),
        "chair" => ([0.5, 1.0, 0.5], "wood", "#D2B48C"),
        "bed" => ([2.0, 0.5, 1.5], "fabric", "#FFFFFF"),
        "toilet" => ([0.6, 0.8, 0.6], "plastic", "#FFFFFF"),
        "fan" => ([0.5, 0.1, 0.5], "metal", "#C0C0C0"),
        _ => ([1.0, 1.0, 1.0], MATERIALS[0], COLORS[0]),
    };
    NewElement::new(kind, size)
        .with_material(material)
        .with_color(color)
}
