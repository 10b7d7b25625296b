//! Foundation types and traits for bezel.
//!
//! This crate contains the engine-agnostic core types shared by all bezel
//! crates: colors, the graphics-device and shader-binding traits, the panel
//! vertex format, input events, configuration, and error types.

pub mod backend;
pub mod color;
pub mod config;
pub mod error;
pub mod input;
pub mod vertex;
