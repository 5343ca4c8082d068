//! Terminal UI module using ratatui.
//!
//! - `render`: frame rendering for the credential-entry and accounts views
//! - `input`: keyboard event handling
//! - `styles`: color scheme and text styling

pub mod input;
pub mod render;
pub mod styles;
