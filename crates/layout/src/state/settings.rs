//! Engine settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::geometry::CeilingRule;
use crate::snap::SnapSettings;

/// Bounds and collision rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationSettings {
    /// Clearance kept from every wall, floor and ceiling
    pub wall_margin: f64,
    /// Where the usable volume ends along Y
    #[serde(default)]
    pub ceiling: CeilingRule,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            wall_margin: 0.05,
            ceiling: CeilingRule::FullHeight,
        }
    }
}

/// How the placement search perturbs a rejected anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JitterStrategy {
    /// Deterministic rings of X/Z offsets around the anchor
    #[default]
    Spiral,
    /// Uniform random X/Z offsets from a seeded generator
    Random,
}

/// Zone-based auto-placement settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementSettings {
    /// Attempts including the anchor itself
    pub max_attempts: usize,
    /// Offset step (spiral) or bound (random) in meters
    pub jitter: f64,
    pub strategy: JitterStrategy,
    /// Seed for the random strategy
    pub seed: u64,
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            jitter: 0.25,
            strategy: JitterStrategy::Spiral,
            seed: 0x5eed,
        }
    }
}

/// Alignment guide settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuideSettings {
    /// Distance under which a coordinate counts as aligned
    pub threshold: f64,
}

impl Default for GuideSettings {
    fn default() -> Self {
        Self { threshold: 0.1 }
    }
}

/// Undo history settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistorySettings {
    /// Maximum undo depth; oldest entries are evicted first. None = unbounded.
    #[serde(default)]
    pub limit: Option<usize>,
}

/// All engine settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Snap preferences used for new sessions
    #[serde(default)]
    pub snap: SnapSettings,
    #[serde(default)]
    pub validation: ValidationSettings,
    #[serde(default)]
    pub placement: PlacementSettings,
    #[serde(default)]
    pub guides: GuideSettings,
    #[serde(default)]
    pub history: HistorySettings,
}

impl EngineSettings {
    fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "container-layout", "container-layout")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Save settings to file
    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            if let Err(e) = self.save_to(&path) {
                tracing::warn!("Failed to save settings to {}: {e}", path.display());
            }
        }
    }

    pub fn load_from(path: &Path) -> Self {
        let Ok(json) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str::<Self>(&json) {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                tracing::warn!("Ignoring malformed settings at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }

    /// Reset every section holding an unusable value to its default
    fn sanitized(mut self) -> Self {
        let snap = &self.snap;
        if !(positive(snap.grid_size) && positive(snap.rotation_snap_angle)) {
            tracing::warn!("Ignoring invalid snap settings: {snap:?}");
            self.snap = SnapSettings::default();
        }
        if !non_negative(self.validation.wall_margin) {
            tracing::warn!("Ignoring invalid wall margin {}", self.validation.wall_margin);
            self.validation = ValidationSettings::default();
        }
        let placement = &self.placement;
        if placement.max_attempts == 0 || !non_negative(placement.jitter) {
            tracing::warn!("Ignoring invalid placement settings: {placement:?}");
            self.placement = PlacementSettings::default();
        }
        if !non_negative(self.guides.threshold) {
            tracing::warn!("Ignoring invalid guide threshold {}", self.guides.threshold);
            self.guides = GuideSettings::default();
        }
        self
    }
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = EngineSettings::default();
        assert_eq!(s.validation.wall_margin, 0.05);
        assert_eq!(s.placement.max_attempts, 10);
        assert_eq!(s.placement.jitter, 0.25);
        assert_eq!(s.guides.threshold, 0.1);
        assert!(s.history.limit.is_none());
        assert!(s.snap.snap_to_grid);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s: EngineSettings =
            serde_json::from_str(r#"{"history":{"limit":20},"validation":{"wall_margin":0.1,"ceiling":"half_height"}}"#)
                .unwrap();
        assert_eq!(s.history.limit, Some(20));
        assert_eq!(s.validation.ceiling, CeilingRule::HalfHeight);
        assert_eq!(s.validation.wall_margin, 0.1);
        assert_eq!(s.placement, PlacementSettings::default());
    }

    #[test]
    fn test_strategy_names() {
        let p: PlacementSettings =
            serde_json::from_str(r#"{"max_attempts":5,"jitter":0.5,"strategy":"random","seed":7}"#).unwrap();
        assert_eq!(p.strategy, JitterStrategy::Random);
    }

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("container-layout-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let path = scratch_path("roundtrip.json");
        let mut settings = EngineSettings::default();
        settings.snap.grid_size = 0.25;
        settings.history.limit = Some(5);
        settings.save_to(&path).unwrap();

        assert_eq!(EngineSettings::load_from(&path), settings);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = scratch_path("absent.json");
        assert_eq!(EngineSettings::load_from(&path), EngineSettings::default());
    }

    #[test]
    fn test_unusable_sections_fall_back_to_defaults() {
        let path = scratch_path("unusable.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            r#"{
                "placement": {"max_attempts": 0, "jitter": 0.5, "strategy": "random", "seed": 1},
                "guides": {"threshold": -1.0},
                "validation": {"wall_margin": 0.1},
                "history": {"limit": 3}
            }"#,
        )
        .unwrap();

        let s = EngineSettings::load_from(&path);
        assert_eq!(s.placement, PlacementSettings::default());
        assert_eq!(s.guides, GuideSettings::default());
        assert_eq!(s.validation.wall_margin, 0.1);
        assert_eq!(s.history.limit, Some(3));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_negative_jitter_rejected() {
        let mut s = EngineSettings::default();
        s.placement.jitter = -0.5;
        s.snap.grid_size = 0.0;
        let s = s.sanitized();
        assert_eq!(s.placement, PlacementSettings::default());
        assert_eq!(s.snap, SnapSettings::default());
    }
}
