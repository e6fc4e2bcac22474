// Library crate: the layout engine and its JSON command surface.
// The binary only wires stdin/stdout and logging around `command`.

pub mod catalog;
pub mod command;
pub mod error;
pub mod fixtures;
pub mod geometry;
pub mod guides;
pub mod placement;
pub mod snap;
pub mod state;
pub mod validation;
