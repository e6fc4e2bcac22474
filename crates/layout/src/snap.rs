//! Grid and rotation snapping.
//!
//! Snapping only quantizes a candidate; bounds and collisions are the
//! validator's job.

use serde::{Deserialize, Serialize};

/// Snap preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapSettings {
    /// Round positions to `grid_size`
    pub snap_to_grid: bool,
    /// Grid pitch in meters (recommended 0.01..=1.0)
    pub grid_size: f64,
    /// Round rotations to `rotation_snap_angle`
    pub snap_to_rotation: bool,
    /// Angular pitch in radians
    pub rotation_snap_angle: f64,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            snap_to_grid: true,
            grid_size: 0.1,
            snap_to_rotation: false,
            rotation_snap_angle: std::f64::consts::FRAC_PI_2,
        }
    }
}

impl SnapSettings {
    /// Round each axis to the nearest grid multiple (half away from zero).
    pub fn snap_position(&self, position: [f64; 3]) -> [f64; 3] {
        if !self.snap_to_grid {
            return position;
        }
        quantize(position, self.grid_size)
    }

    /// Round each Euler angle to the nearest multiple of the snap angle.
    pub fn snap_rotation(&self, rotation: [f64; 3]) -> [f64; 3] {
        if !self.snap_to_rotation {
            return rotation;
        }
        quantize(rotation, self.rotation_snap_angle)
    }
}

fn quantize(v: [f64; 3], pitch: f64) -> [f64; 3] {
    v.map(|c| (c / pitch).round() * pitch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn approx(a: [f64; 3], b: [f64; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-9)
    }

    #[test]
    fn test_snap_position_to_tenth() {
        let snap = SnapSettings::default();
        let out = snap.snap_position([1.234, 0.876, -0.551]);
        // -5.51 grid steps rounds to -6
        assert!(approx(out, [1.2, 0.9, -0.6]), "got {:?}", out);
    }

    #[test]
    fn test_snap_rounds_half_away_from_zero() {
        let snap = SnapSettings {
            grid_size: 1.0,
            ..Default::default()
        };
        assert_eq!(snap.snap_position([0.5, -0.5, 2.5]), [1.0, -1.0, 3.0]);
    }

    #[test]
    fn test_snap_disabled_passes_through() {
        let snap = SnapSettings {
            snap_to_grid: false,
            ..Default::default()
        };
        let p = [1.234, 0.876, -0.551];
        assert_eq!(snap.snap_position(p), p);
    }

    #[test]
    fn test_snap_idempotent() {
        let snap = SnapSettings::default();
        let once = snap.snap_position([1.234, 0.876, -0.551]);
        assert!(approx(snap.snap_position(once), once));
    }

    #[test]
    fn test_rotation_snap_off_by_default() {
        let snap = SnapSettings::default();
        assert_eq!(snap.snap_rotation([0.3, 1.2, 0.0]), [0.3, 1.2, 0.0]);
    }

    #[test]
    fn test_rotation_snap_to_right_angles() {
        let snap = SnapSettings {
            snap_to_rotation: true,
            ..Default::default()
        };
        let out = snap.snap_rotation([0.3, 1.2, 2.9]);
        assert!(approx(out, [0.0, FRAC_PI_2, PI]), "got {:?}", out);
    }
}
