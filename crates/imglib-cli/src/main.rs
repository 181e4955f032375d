//! Image library CLI
//!
//! Drives the widget on a headless document:
//! - `render`: build the panel and print it as HTML
//! - `replay`: run a recorded gesture script and print the saved geometry
//! - `validate`: check files against the upload rules
//! - `geometry`: inspect or clear the saved panel/button geometry

mod script;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use imglib_core::clipboard::MemoryClipboard;
use imglib_core::config::{Config, Directories};
use imglib_core::dom::{Document, Viewport};
use imglib_core::hooks::Hooks;
use imglib_core::store::{
    BUTTON_POSITION_KEY, CookieJar, FileCookieJar, GeometryStore, POSITION_KEY,
    PersistenceSurface, SIZE_KEY,
};
use imglib_core::upload::validate_selection;
use imglib_core::{ImageLibrary, Surfaces};
use imglib_types::{FileDescriptor, ImageRecord};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Image library CLI
#[derive(Parser)]
#[command(name = "imglib")]
#[command(about = "Floating image library panel, driven headlessly")]
#[command(version)]
#[command(after_help = "\
Examples:
  imglib render --images images.json --show   Print the open panel as HTML
  imglib replay drag.json                     Replay gestures, print saved geometry
  imglib validate photo.png scan.tiff         Check files against the upload rules
  imglib geometry show                        Show saved panel/button geometry
  imglib geometry clear                       Forget saved geometry
")]
struct Cli {
    /// Config file (defaults to ~/.config/imglib/config.json)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the widget and print the document as HTML
    Render {
        /// JSON array of image records to load into the grid
        #[arg(long, value_name = "PATH")]
        images: Option<PathBuf>,

        /// Open the panel instead of showing the toggle button
        #[arg(long)]
        show: bool,
    },

    /// Replay a JSON gesture script and print the resulting geometry
    Replay {
        /// Gesture script
        script: PathBuf,

        /// Write the geometry to the saved store instead of a scratch one
        #[arg(long)]
        persist: bool,

        /// Also print the final document as HTML
        #[arg(long)]
        html: bool,
    },

    /// Check files against the upload rules; exits 1 on rejection
    Validate {
        /// Files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Saved geometry commands
    Geometry {
        #[command(subcommand)]
        command: GeometryCommand,
    },
}

#[derive(Subcommand)]
enum GeometryCommand {
    /// Print the saved records
    Show,

    /// Remove every saved record
    Clear,
}

/// Set up logging to stderr. Debug builds also log to a timestamped file in
/// the temp dir, linked from `imglib.log`.
fn setup_logging(debug_flag: bool) {
    let level = if debug_flag || cfg!(debug_assertions) {
        "debug"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("imglib_core={level},imglib={level}")));

    fn stderr_layer<S>() -> fmt::Layer<
        S,
        fmt::format::DefaultFields,
        fmt::format::Format,
        fn() -> std::io::Stderr,
    > {
        fmt::layer()
            .with_writer(std::io::stderr as fn() -> std::io::Stderr)
            .with_target(true)
            .with_line_number(true)
    }

    if cfg!(debug_assertions) {
        let temp_dir = std::env::temp_dir();
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let log_filename = format!("imglib-{timestamp}.log");
        let log_path = temp_dir.join(&log_filename);

        #[cfg(unix)]
        {
            let symlink_path = temp_dir.join("imglib.log");
            let _ = std::fs::remove_file(&symlink_path);
            let _ = std::os::unix::fs::symlink(&log_path, &symlink_path);
        }

        let file_appender = tracing_appender::rolling::never(&temp_dir, &log_filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        std::mem::forget(guard);

        let file_layer = fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(file_layer)
            .with(stderr_layer())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(stderr_layer())
            .with(filter)
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.debug);

    let dirs = Directories::new();
    let config_path = cli.config.unwrap_or_else(|| dirs.config_file.clone());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;

    match cli.command {
        Commands::Render { images, show } => run_render(&config, &dirs, images.as_deref(), show),
        Commands::Replay {
            script,
            persist,
            html,
        } => run_replay(&config, &dirs, &script, persist, html),
        Commands::Validate { files } => run_validate(&config, &files),
        Commands::Geometry { command } => run_geometry(&dirs, &command),
    }
}

fn viewport(config: &Config) -> Viewport {
    Viewport::new(config.surface.viewport_width, config.surface.viewport_height)
}

fn open_geometry_store(dirs: &Directories) -> Result<Rc<FileCookieJar>> {
    dirs.ensure_exists()
        .with_context(|| format!("Failed to create {}", dirs.data.display()))?;
    Ok(Rc::new(FileCookieJar::open(&dirs.geometry_file)))
}

fn build_library(config: &Config, persistence: Rc<dyn PersistenceSurface>) -> ImageLibrary {
    let surfaces = Surfaces {
        document: Document::shared(viewport(config)),
        persistence,
        clipboard: Rc::new(MemoryClipboard::new()),
    };
    ImageLibrary::new(config.library.clone(), Hooks::default(), surfaces)
}

fn load_records(path: &Path) -> Result<Vec<ImageRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of image records", path.display()))
}

fn run_render(config: &Config, dirs: &Directories, images: Option<&Path>, show: bool) -> Result<()> {
    let library = build_library(config, open_geometry_store(dirs)?);

    if let Some(path) = images {
        let records = load_records(path)?;
        if !library.load_library_images(&records) {
            anyhow::bail!("Could not render the images from {}", path.display());
        }
        info!("Loaded {} images from {}", records.len(), path.display());
    }

    if show {
        library.show();
    }

    println!("{}", library.to_html());
    Ok(())
}

fn run_replay(
    config: &Config,
    dirs: &Directories,
    script_path: &Path,
    persist: bool,
    html: bool,
) -> Result<()> {
    let steps = script::load(script_path)?;
    let persistence: Rc<dyn PersistenceSurface> = if persist {
        open_geometry_store(dirs)?
    } else {
        Rc::new(CookieJar::new())
    };
    let store = GeometryStore::new(persistence.clone());
    let library = build_library(config, persistence);

    script::replay(&library, &steps)?;
    info!("Replayed {} steps from {}", steps.len(), script_path.display());

    let mut summary = serde_json::Map::new();
    summary.insert(
        POSITION_KEY.to_string(),
        serde_json::to_value(store.load_position(POSITION_KEY))?,
    );
    summary.insert(
        SIZE_KEY.to_string(),
        serde_json::to_value(store.load_size(SIZE_KEY))?,
    );
    summary.insert(
        BUTTON_POSITION_KEY.to_string(),
        serde_json::to_value(store.load_position(BUTTON_POSITION_KEY))?,
    );
    summary.insert("message".to_string(), library.message().into());
    summary.insert("visible".to_string(), library.is_visible().into());
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if html {
        println!("{}", library.to_html());
    }
    Ok(())
}

fn describe_file(path: &Path) -> Result<FileDescriptor> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(FileDescriptor::new(name, metadata.len()))
}

fn run_validate(config: &Config, paths: &[PathBuf]) -> Result<()> {
    let files = paths
        .iter()
        .map(|path| describe_file(path))
        .collect::<Result<Vec<_>>>()?;

    match validate_selection(&files, &config.library) {
        Ok(()) => {
            println!("{} file(s) accepted", files.len());
            Ok(())
        }
        Err(rejection) => {
            warn!("Upload rejected: {:?}", rejection);
            eprintln!("{rejection}");
            std::process::exit(1);
        }
    }
}

fn run_geometry(dirs: &Directories, command: &GeometryCommand) -> Result<()> {
    let jar = FileCookieJar::open(&dirs.geometry_file);

    match command {
        GeometryCommand::Show => {
            let entries = jar.entries();
            if entries.is_empty() {
                println!("No saved geometry in {}", jar.path().display());
                return Ok(());
            }
            for (name, value) in entries {
                println!("{name}: {value}");
            }
        }
        GeometryCommand::Clear => {
            jar.clear();
            println!("Cleared saved geometry in {}", jar.path().display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_render() {
        let cli = Cli::parse_from(["imglib", "render", "--images", "a.json", "--show"]);

        match cli.command {
            Commands::Render { images, show } => {
                assert_eq!(images, Some(PathBuf::from("a.json")));
                assert!(show);
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::parse_from(["imglib", "validate", "a.png", "--config", "c.json"]);

        assert_eq!(cli.config, Some(PathBuf::from("c.json")));
    }

    #[test]
    fn test_validate_requires_files() {
        assert!(Cli::try_parse_from(["imglib", "validate"]).is_err());
    }

    #[test]
    fn test_describe_file_uses_name_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.PNG");
        std::fs::write(&path, vec![0u8; 2048]).unwrap();

        let file = describe_file(&path).unwrap();

        assert_eq!(file.name, "photo.PNG");
        assert_eq!(file.size_bytes, 2048);
        assert_eq!(file.extension(), "png");
    }

    #[test]
    fn test_load_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("images.json");
        std::fs::write(&path, r#"[{"id": 1, "img": "/a.png"}]"#).unwrap();

        let records = load_records(&path).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].img, "/a.png");
    }

    #[test]
    fn test_render_uses_saved_geometry() {
        let dir = tempfile::tempdir().unwrap();
        let dirs = Directories::with_base(dir.path().to_path_buf());
        let jar = open_geometry_store(&dirs).unwrap();
        jar.set(
            POSITION_KEY,
            r#"{"left":"12px","top":"34px","right":"auto","bottom":"auto"}"#,
            365,
        );

        let reopened = open_geometry_store(&dirs).unwrap();
        let library = build_library(&Config::default(), reopened);

        assert!(library.to_html().contains("left: 12px;"));
    }
}
