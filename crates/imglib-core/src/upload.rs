//! Client-side checks on the files picked in the upload form.

use crate::config::WidgetConfig;
use imglib_types::FileDescriptor;
use thiserror::Error;

/// Why a file selection was refused.
///
/// The `Display` text is the message shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadRejection {
    #[error("File \"{name}\" exceeds the allowed size {max_kb} KB.")]
    FileTooLarge { name: String, max_kb: u64 },

    #[error("You can only upload up to {max} files at a time.")]
    TooManyFiles { max: usize },

    #[error("You are trying to upload some invalid files!")]
    InvalidExtension { name: String },
}

/// Run the enabled checks in order: size, count, extension.
///
/// The first failing check wins and nothing after it runs. An empty
/// selection always passes.
///
/// # Errors
///
/// Returns the first rejection found.
pub fn validate_selection(
    files: &[FileDescriptor],
    config: &WidgetConfig,
) -> Result<(), UploadRejection> {
    if files.is_empty() {
        return Ok(());
    }

    if config.checks.max_file_size_check {
        let max_bytes = config.max_file_size_bytes();
        if let Some(file) = files.iter().find(|f| f.size_bytes > max_bytes) {
            return Err(UploadRejection::FileTooLarge {
                name: file.name.clone(),
                max_kb: config.max_file_size,
            });
        }
    }

    if config.checks.max_files_check && files.len() > config.max_files {
        return Err(UploadRejection::TooManyFiles {
            max: config.max_files,
        });
    }

    if config.checks.allowed_extensions_check
        && let Some(file) = files
            .iter()
            .find(|f| !config.allowed_extensions.contains(&f.extension()))
    {
        return Err(UploadRejection::InvalidExtension {
            name: file.name.clone(),
        });
    }

    Ok(())
}
