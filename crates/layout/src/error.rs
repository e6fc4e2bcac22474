//! Error types for store mutations and snapshot loading.

use shared::ElementId;
use thiserror::Error;

use crate::validation::Violation;

/// A snapshot blob could not be turned into a session.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to parse snapshot: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid snapshot: {0}")]
    Invalid(String),
}

/// Errors returned by the design store. None of them leave partial state.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("element {0} does not exist")]
    UnknownElement(ElementId),
    #[error("element {0} is not a door")]
    NotADoor(ElementId),
    #[error("rejected: {0}")]
    Rejected(#[from] Violation),
    #[error("no free spot for {kind} after {attempts} attempts")]
    PlacementExhausted { kind: String, attempts: usize },
    #[error("element id space exhausted")]
    IdsExhausted,
    #[error("invalid {name}: {value}")]
    InvalidDimension { name: &'static str, value: f64 },
    #[error("invalid setting {name}: {value}")]
    InvalidSetting { name: &'static str, value: f64 },
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

pub type LayoutResult<T> = Result<T, LayoutError>;
