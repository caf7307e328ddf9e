use std::path::PathBuf;
use thiserror::Error;

/// Main error type for wallshuf operations
#[derive(Error, Debug)]
pub enum WallshufError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Selection error: {0}")]
    Selection(#[from] SelectionError),

    #[error("Configuration store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Wallpaper catalog errors
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog file not found: {path:?}")]
    NotFound { path: PathBuf },

    #[error("Failed to read catalog file: {path:?}")]
    Read { path: PathBuf, source: std::io::Error },

    #[error("Malformed catalog: {message}")]
    Parse { message: String },

    #[error("Could not determine home directory")]
    NoHomeDir,
}

/// Random selection errors
#[derive(Error, Debug)]
pub enum SelectionError {
    #[error("No wallpaper candidates to choose from")]
    Empty,
}

/// Desktop configuration store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Configuration store unavailable ({tool}): {reason}")]
    Unavailable { tool: String, reason: String },
}

/// User configuration file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {path:?}")]
    FileRead { path: PathBuf, source: std::io::Error },

    #[error("Failed to parse TOML configuration: {message}")]
    TomlParse { message: String },

    #[error("Invalid configuration value for {field}: {value:?}")]
    InvalidValue { field: String, value: String },

    #[error("Could not determine config directory")]
    NoConfigDir,
}

// Convenience type alias
pub type Result<T> = std::result::Result<T, WallshufError>;

impl From<quick_xml::Error> for WallshufError {
    fn from(err: quick_xml::Error) -> Self {
        WallshufError::Catalog(CatalogError::Parse {
            message: err.to_string(),
        })
    }
}

impl From<quick_xml::events::attributes::AttrError> for WallshufError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        WallshufError::Catalog(CatalogError::Parse {
            message: err.to_string(),
        })
    }
}

// Error reporting utilities
pub trait ErrorReporting {
    fn log_error(&self, context: &str);
    fn user_friendly_message(&self) -> String;
}

impl ErrorReporting for WallshufError {
    fn log_error(&self, context: &str) {
        log::debug!("{}: {:?}", context, self);
    }

    fn user_friendly_message(&self) -> String {
        match self {
            WallshufError::Catalog(CatalogError::NotFound { path }) => {
                format!("Wallpaper catalog not found: {:?}", path)
            }
            WallshufError::Catalog(CatalogError::Parse { message }) => {
                format!("Invalid wallpaper catalog: {}", message)
            }
            WallshufError::Selection(SelectionError::Empty) => {
                "No usable wallpapers in the catalog. Add some in the Appearance settings first."
                    .to_string()
            }
            WallshufError::Store(StoreError::Unavailable { tool, reason }) => {
                format!(
                    "Could not reach the desktop settings store via {}: {}. Is a desktop session running?",
                    tool, reason
                )
            }
            WallshufError::Config(ConfigError::TomlParse { message }) => {
                format!("Invalid configuration format: {}", message)
            }
            _ => self.to_string(),
        }
    }
}
