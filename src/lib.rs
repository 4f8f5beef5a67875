//! Recipe Search Library
//!
//! Exposes the data, cache, use-case and presentation layers to the binary
//! and to integration tests.

pub mod app;
pub mod cache;
pub mod cli;
pub mod data;
pub mod interactors;
pub mod presentation;
pub mod ui;
