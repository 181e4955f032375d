use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub library: WidgetConfig,

    #[serde(default)]
    pub surface: SurfaceConfig,
}

impl Config {
    /// Load config from file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid JSON or
    /// declares a viewport without a positive size.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        super::validation::warn_unknown_fields(&content, "config.json");
        let mut config: Self = serde_json::from_str(&content)?;
        config.surface.check()?;
        config.library = config.library.sanitized();
        Ok(config)
    }

    /// Save config to file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Options of one image library widget.
///
/// Keys mirror the option names hosts already pass to the widget
/// (`imageFormId`, `maxFileSize`, ...). Behavior hooks are not data and live
/// in [`crate::hooks::Hooks`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    #[serde(default = "default_image_form_id")]
    pub image_form_id: String,

    #[serde(default = "default_image_file_input_id")]
    pub image_file_input_id: String,

    #[serde(default = "default_image_file_input_id")]
    pub image_file_input_name: String,

    #[serde(default = "default_image_alt_text_input_id")]
    pub image_alt_text_input_id: String,

    #[serde(default = "default_image_alt_text_input_id")]
    pub image_alt_text_input_name: String,

    #[serde(default = "default_image_hidden_input_id")]
    pub image_hidden_input_id: String,

    #[serde(default = "default_image_hidden_input_id")]
    pub image_hidden_input_name: String,

    #[serde(default = "default_image_submit_button_id")]
    pub image_submit_button_id: String,

    #[serde(default = "default_image_message_field_id")]
    pub image_message_field_id: String,

    #[serde(default = "default_image_search_input_id")]
    pub image_search_input_id: String,

    #[serde(default = "default_image_search_input_id")]
    pub image_search_input_name: String,

    #[serde(default = "default_images_list_container_id")]
    pub images_list_container_id: String,

    #[serde(default = "default_images_library_container_id")]
    pub images_library_container_id: String,

    #[serde(default = "default_library_toggle_button_id")]
    pub library_toggle_button_id: String,

    /// Maximum number of files per upload
    #[serde(default = "default_max_files")]
    pub max_files: usize,

    /// Maximum size of a single file, in KB
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Accepted extensions, lowercase and without the dot
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,

    #[serde(default)]
    pub checks: Checks,

    /// How long a status message stays visible
    #[serde(default = "default_message_timeout_ms")]
    pub message_timeout_ms: u64,

    /// Lifetime of saved panel/button geometry
    #[serde(default = "default_geometry_expiry_days")]
    pub geometry_expiry_days: u32,
}

fn default_image_form_id() -> String {
    "imageUploadForm".to_string()
}
fn default_image_file_input_id() -> String {
    "imageFileInput".to_string()
}
fn default_image_alt_text_input_id() -> String {
    "imageAltText".to_string()
}
fn default_image_hidden_input_id() -> String {
    "library_image_button".to_string()
}
fn default_image_submit_button_id() -> String {
    "uploadImageButton".to_string()
}
fn default_image_message_field_id() -> String {
    "imageUploadMessage".to_string()
}
fn default_image_search_input_id() -> String {
    "imageSearch".to_string()
}
fn default_images_list_container_id() -> String {
    "imageList".to_string()
}
fn default_images_library_container_id() -> String {
    "imageLibrary".to_string()
}
fn default_library_toggle_button_id() -> String {
    "toggleImageLibrary".to_string()
}
fn default_max_files() -> usize {
    20
}
fn default_max_file_size() -> u64 {
    100
}
fn default_allowed_extensions() -> Vec<String> {
    ["jpg", "jpeg", "png", "webp"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_message_timeout_ms() -> u64 {
    3000
}
fn default_geometry_expiry_days() -> u32 {
    365
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            image_form_id: default_image_form_id(),
            image_file_input_id: default_image_file_input_id(),
            image_file_input_name: default_image_file_input_id(),
            image_alt_text_input_id: default_image_alt_text_input_id(),
            image_alt_text_input_name: default_image_alt_text_input_id(),
            image_hidden_input_id: default_image_hidden_input_id(),
            image_hidden_input_name: default_image_hidden_input_id(),
            image_submit_button_id: default_image_submit_button_id(),
            image_message_field_id: default_image_message_field_id(),
            image_search_input_id: default_image_search_input_id(),
            image_search_input_name: default_image_search_input_id(),
            images_list_container_id: default_images_list_container_id(),
            images_library_container_id: default_images_library_container_id(),
            library_toggle_button_id: default_library_toggle_button_id(),
            max_files: default_max_files(),
            max_file_size: default_max_file_size(),
            allowed_extensions: default_allowed_extensions(),
            checks: Checks::default(),
            message_timeout_ms: default_message_timeout_ms(),
            geometry_expiry_days: default_geometry_expiry_days(),
        }
    }
}

impl WidgetConfig {
    /// Replace empty strings and zero limits with their defaults.
    ///
    /// Hosts that pass `""` or `0` for an option get the default, the same
    /// way an unset option does.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();

        let pick = |value: String, default: String| {
            if value.trim().is_empty() {
                default
            } else {
                value
            }
        };

        Self {
            image_form_id: pick(self.image_form_id, defaults.image_form_id),
            image_file_input_id: pick(self.image_file_input_id, defaults.image_file_input_id),
            image_file_input_name: pick(self.image_file_input_name, defaults.image_file_input_name),
            image_alt_text_input_id: pick(
                self.image_alt_text_input_id,
                defaults.image_alt_text_input_id,
            ),
            image_alt_text_input_name: pick(
                self.image_alt_text_input_name,
                defaults.image_alt_text_input_name,
            ),
            image_hidden_input_id: pick(self.image_hidden_input_id, defaults.image_hidden_input_id),
            image_hidden_input_name: pick(
                self.image_hidden_input_name,
                defaults.image_hidden_input_name,
            ),
            image_submit_button_id: pick(
                self.image_submit_button_id,
                defaults.image_submit_button_id,
            ),
            image_message_field_id: pick(
                self.image_message_field_id,
                defaults.image_message_field_id,
            ),
            image_search_input_id: pick(self.image_search_input_id, defaults.image_search_input_id),
            image_search_input_name: pick(
                self.image_search_input_name,
                defaults.image_search_input_name,
            ),
            images_list_container_id: pick(
                self.images_list_container_id,
                defaults.images_list_container_id,
            ),
            images_library_container_id: pick(
                self.images_library_container_id,
                defaults.images_library_container_id,
            ),
            library_toggle_button_id: pick(
                self.library_toggle_button_id,
                defaults.library_toggle_button_id,
            ),
            max_files: if self.max_files == 0 {
                defaults.max_files
            } else {
                self.max_files
            },
            max_file_size: if self.max_file_size == 0 {
                defaults.max_file_size
            } else {
                self.max_file_size
            },
            allowed_extensions: self
                .allowed_extensions
                .into_iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            checks: self.checks,
            message_timeout_ms: if self.message_timeout_ms == 0 {
                defaults.message_timeout_ms
            } else {
                self.message_timeout_ms
            },
            geometry_expiry_days: if self.geometry_expiry_days == 0 {
                defaults.geometry_expiry_days
            } else {
                self.geometry_expiry_days
            },
        }
    }

    /// Maximum file size in bytes
    #[must_use]
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size.saturating_mul(1024)
    }

    /// Value of the file input's `accept` attribute
    #[must_use]
    pub fn accept_attribute(&self) -> String {
        self.allowed_extensions
            .iter()
            .map(|ext| format!(".{ext}"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Form field name of the file input
    #[must_use]
    pub fn file_input_field_name(&self) -> String {
        format!("{}[]", self.image_file_input_name)
    }
}

/// Upload checks that can be switched off individually.
///
/// When the `checks` object is absent every check is on; when it is present,
/// checks it does not mention are off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checks {
    #[serde(default)]
    pub max_file_size_check: bool,

    #[serde(default)]
    pub max_files_check: bool,

    #[serde(default)]
    pub allowed_extensions_check: bool,
}

impl Default for Checks {
    fn default() -> Self {
        Self {
            max_file_size_check: true,
            max_files_check: true,
            allowed_extensions_check: true,
        }
    }
}

/// Headless rendering surface settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceConfig {
    #[serde(default = "default_viewport_width")]
    pub viewport_width: f64,

    #[serde(default = "default_viewport_height")]
    pub viewport_height: f64,
}

fn default_viewport_width() -> f64 {
    1280.0
}
fn default_viewport_height() -> f64 {
    800.0
}

impl SurfaceConfig {
    fn check(&self) -> Result<()> {
        for (name, value) in [
            ("viewportWidth", self.viewport_width),
            ("viewportHeight", self.viewport_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::Config(format!("{name} must be positive, got {value}")));
            }
        }
        Ok(())
    }
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
        }
    }
}
