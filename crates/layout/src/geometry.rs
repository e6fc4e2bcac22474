//! Axis-aligned bounding box math.
//!
//! Boxes are described by their center and full extents, matching how
//! elements store `position` and `size`.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use shared::Container;

const POSITION_EPSILON: f64 = 1e-9;

/// Upper limit of the usable volume along Y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CeilingRule {
    /// Elements may reach `height - margin`
    #[default]
    FullHeight,
    /// Elements may only reach `height / 2 - margin`
    HalfHeight,
}

impl CeilingRule {
    /// Y coordinate of the ceiling under this rule (before margin)
    pub fn limit(self, container: &Container) -> f64 {
        match self {
            CeilingRule::FullHeight => container.height,
            CeilingRule::HalfHeight => container.height / 2.0,
        }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    /// Box centered at `center` with full extents `size`
    pub fn from_center_size(center: [f64; 3], size: [f64; 3]) -> Self {
        let center = DVec3::from_array(center);
        let half = DVec3::from_array(size) * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Usable interior of the container, shrunk by `margin` on every side
    pub fn interior(container: &Container, margin: f64, ceiling: CeilingRule) -> Self {
        Self {
            min: DVec3::new(
                -container.half_length() + margin,
                margin,
                -container.half_width() + margin,
            ),
            max: DVec3::new(
                container.half_length() - margin,
                ceiling.limit(container) - margin,
                container.half_width() - margin,
            ),
        }
    }

    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Strict intersection on all three axes; touching faces do not count.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.cmplt(other.max).all() && other.min.cmplt(self.max).all()
    }

    /// `other` lies fully inside `self` (faces may coincide).
    pub fn contains(&self, other: &Aabb) -> bool {
        other.min.cmpge(self.min).all() && other.max.cmple(self.max).all()
    }
}

/// True iff the two boxes intersect on every axis.
///
/// Per axis: center distance < half the sum of extents.
pub fn overlaps(a_pos: [f64; 3], a_size: [f64; 3], b_pos: [f64; 3], b_size: [f64; 3]) -> bool {
    let distance = (DVec3::from_array(a_pos) - DVec3::from_array(b_pos)).abs();
    let reach = (DVec3::from_array(a_size) + DVec3::from_array(b_size)) * 0.5;
    distance.cmplt(reach).all()
}

/// True iff the box stays inside the container interior minus `margin`.
pub fn within_bounds(
    pos: [f64; 3],
    size: [f64; 3],
    container: &Container,
    margin: f64,
    ceiling: CeilingRule,
) -> bool {
    Aabb::interior(container, margin, ceiling).contains(&Aabb::from_center_size(pos, size))
}

/// Positions equal up to floating-point noise from snapping.
pub fn same_position(a: [f64; 3], b: [f64; 3]) -> bool {
    (DVec3::from_array(a) - DVec3::from_array(b)).abs().max_element() < POSITION_EPSILON
}

/// Move a box center so the box lies inside the interior.
///
/// On an axis where the box is larger than the interior, the center goes to
/// the middle of the interior.
pub fn clamp_center(
    pos: [f64; 3],
    size: [f64; 3],
    container: &Container,
    margin: f64,
    ceiling: CeilingRule,
) -> [f64; 3] {
    let interior = Aabb::interior(container, margin, ceiling);
    let lo = interior.min.to_array();
    let hi = interior.max.to_array();
    let mut out = pos;
    for axis in 0..3 {
        let half = size[axis] / 2.0;
        let min_c = lo[axis] + half;
        let max_c = hi[axis] - half;
        out[axis] = if min_c > max_c {
            (lo[axis] + hi[axis]) / 2.0
        } else {
            pos[axis].max(min_c).min(max_c)
        };
    }
    out
}
