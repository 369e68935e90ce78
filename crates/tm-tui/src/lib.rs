//! Terminal UI for Tablemate, a tabletop companion.
//!
//! Provides a unified ratatui-based interface with tabs for dice rolling,
//! card drawing, coin flipping, tile drawing, custom deck authoring, game
//! templates with a step runner, and settings.

pub mod app;
pub mod shared;
pub mod store;
pub mod tabs;
pub mod terminal;
