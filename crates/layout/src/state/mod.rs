pub mod design;
pub mod settings;

pub use design::{element_display_name, zone_label, DesignState};
pub use settings::{
    EngineSettings, GuideSettings, HistorySettings, JitterStrategy, PlacementSettings,
    ValidationSettings,
};
