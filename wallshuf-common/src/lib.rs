pub mod entry;
pub mod catalog;
pub mod selector;
pub mod store;
pub mod command_builder;
pub mod executor;
pub mod wallpaper;
pub mod shuffle;
pub mod error;

pub use entry::{CatalogRecord, DeletedFlag, WallpaperEntry};
pub use catalog::{default_catalog_path, expand_tilde};
pub use selector::{choose_random, filter_valid};
pub use store::{Backend, CommandStore, ConfigStore, MemoryStore, PathEncoding, StoreKeys};
pub use command_builder::StoreCommandBuilder;
pub use executor::ProcessExecutor;
pub use wallpaper::{apply_wallpaper, read_active};
pub use error::{WallshufError, Result, ErrorReporting};
