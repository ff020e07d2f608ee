//! UI module for rolechat.
//!
//! This module contains all UI rendering logic including:
//! - Main UI layout and transcript rendering
//! - Persona picker overlay
//! - Gradient utilities
//! - Text wrapping

mod gradient;
mod menu;
mod render;
pub mod text;

pub use render::ui;
