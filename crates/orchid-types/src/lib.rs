//! Foundation types for the Orchid shell.
//!
//! This crate contains the hardware-agnostic types shared by every Orchid
//! crate: RGB565 colors, key snapshots, configuration, and error types.

pub mod color;
pub mod config;
pub mod error;
pub mod input;
