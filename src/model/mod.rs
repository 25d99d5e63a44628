pub mod blink;
pub mod buffer;
pub mod clipboard;
pub mod config;
pub mod cursor;
pub mod document;
pub mod keymap;
pub mod mode;
pub mod position;
pub mod regions;
pub mod selection;
pub mod surface;
pub mod viewport;
