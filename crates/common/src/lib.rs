//! Shared building blocks used by every crate in the workspace:
//! logging initialisation and the small response types the HTTP layer
//! shares with its tests.

pub mod types;
pub mod utils;
