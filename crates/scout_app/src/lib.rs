//! Scout app: terminal shell around the core state machine and the engine.
pub mod app;
pub mod bindings;
pub mod config;
pub mod effects;
pub mod input;
pub mod render;
