pub mod clipboard;
pub mod config;
pub mod dom;
pub mod drag;
pub mod events;
pub mod grid;
pub mod hooks;
pub mod messages;
pub mod panel;
pub mod resize;
pub mod store;
pub mod timers;
pub mod upload;

mod error;
mod library;

#[cfg(test)]
mod tests;

pub use error::{Error, Result};
pub use library::{ImageLibrary, Surfaces, WidgetContext};

pub use imglib_types::*;
