//! Recorded gesture scripts.
//!
//! A script is a JSON array of steps:
//!
//! ```json
//! [
//!   {"type": "press", "target": "#imageLibrary", "x": 700, "y": 20},
//!   {"type": "move", "x": 400, "y": 300},
//!   {"type": "release", "x": 400, "y": 300}
//! ]
//! ```
//!
//! Targets are simple selectors (`tag`, `#id`, `.class`, `[attr="value"]`).

use anyhow::{Context, Result, anyhow};
use imglib_core::ImageLibrary;
use imglib_types::{FileDescriptor, ImageRecord};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

fn default_inside() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Step {
    Press {
        target: String,
        x: f64,
        y: f64,
    },
    Move {
        x: f64,
        y: f64,
    },
    Release {
        x: f64,
        y: f64,
    },
    Click {
        target: String,
    },
    #[serde(rename = "dblclick")]
    DoubleClick {
        target: String,
    },
    Hover {
        target: String,
        #[serde(default = "default_inside")]
        inside: bool,
    },
    Show,
    Hide,
    Load {
        images: Vec<ImageRecord>,
    },
    Search {
        text: String,
    },
    Select {
        files: Vec<FileDescriptor>,
    },
    Submit,
    /// Let `ms` milliseconds pass on the widget's clock
    Wait {
        ms: u64,
    },
}

/// Read a script file
pub fn load(path: &Path) -> Result<Vec<Step>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid gesture script {}", path.display()))
}

/// Run every step against `library`, stopping at the first failure
pub fn replay(library: &ImageLibrary, steps: &[Step]) -> Result<()> {
    for (index, step) in steps.iter().enumerate() {
        run_step(library, step).with_context(|| format!("Step {} failed", index + 1))?;
    }
    Ok(())
}

fn find(library: &ImageLibrary, selector: &str) -> Result<imglib_core::dom::ElementId> {
    library
        .find(selector)
        .ok_or_else(|| anyhow!("No element matches {selector:?}"))
}

fn run_step(library: &ImageLibrary, step: &Step) -> Result<()> {
    debug!("Replaying {:?}", step);
    match step {
        Step::Press { target, x, y } => library.press(find(library, target)?, *x, *y),
        Step::Move { x, y } => library.move_pointer(*x, *y),
        Step::Release { x, y } => library.release(*x, *y),
        Step::Click { target } => library.click(find(library, target)?),
        Step::DoubleClick { target } => library.double_click(find(library, target)?),
        Step::Hover { target, inside } => library.hover(find(library, target)?, *inside),
        Step::Show => library.show(),
        Step::Hide => library.hide(),
        Step::Load { images } => {
            if !library.load_library_images(images) {
                return Err(anyhow!("Images could not be loaded"));
            }
        }
        Step::Search { text } => library.search(text),
        Step::Select { files } => library.select_files(files.clone()),
        Step::Submit => {
            library.submit();
        }
        Step::Wait { ms } => library.advance_time(*ms),
    }
    Ok(())
}
