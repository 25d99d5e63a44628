//! krab: a modal terminal SQL editor.
//!
//! The editing core lives in [`model`] and [`editor`]; [`app`] projects it
//! onto a ratatui frame.

pub mod app;
pub mod editor;
pub mod model;
pub mod msg;
