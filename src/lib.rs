//! RoleChat - a terminal chat interface with switchable expert personas.
//!
//! This library exposes the core modules for testing and reuse.

pub mod app;
pub mod config;
pub mod controller;
pub mod input;
pub mod llm;
pub mod logging;
pub mod message;
pub mod persona;
pub mod store;
pub mod ui;
