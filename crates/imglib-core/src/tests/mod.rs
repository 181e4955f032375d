//! Test module for imglib-core
//!
//! This module contains tests for:
//! - Configuration loading, defaults and sanitizing
//! - Dragging the panel and the toggle button
//! - Edge resizing with minimum-size rules and the position cross-write
//! - Panel construction, restored geometry and visibility
//! - Image grid rendering, search, copy and remove
//! - Hooks replacing built-in behaviors
//! - Property checks on resize floors and search

// Test modules use exact float comparisons on whole-pixel geometry
#![allow(clippy::float_cmp)]

mod fixtures;
mod grid_tests;
mod hooks_tests;
