//! Demo server: listener, static files and the handler chain built around them.

pub mod app;
pub mod listener;
pub mod static_files;
