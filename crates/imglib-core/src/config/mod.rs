mod dirs;
mod settings;
mod validation;

pub use dirs::Directories;
pub use settings::{Checks, Config, SurfaceConfig, WidgetConfig};
pub use validation::warn_unknown_fields;
