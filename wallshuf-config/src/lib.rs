use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use wallshuf_common::{
    default_catalog_path, error::ConfigError, expand_tilde, Backend, Result, StoreKeys,
    WallshufError,
};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Catalog file, `~` allowed.
    #[serde(default)]
    pub catalog: Option<String>,
    #[serde(default)]
    pub store: StoreConfig,
}

/// Where the active wallpaper lives. Unset fields fall back to the
/// backend's well-known values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub filename_key: Option<String>,
    #[serde(default)]
    pub options_key: Option<String>,
}

impl Config {
    /// Loads the per-user config, or defaults when there is none.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            log::debug!("No config file at {:?}, using defaults", config_path);
            return Ok(Self::default());
        }

        Self::load_from_path(&config_path)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(WallshufError::Config(ConfigError::FileRead {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "File not found"),
            }));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| WallshufError::Config(ConfigError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| WallshufError::Config(ConfigError::TomlParse {
                message: e.to_string(),
            }))?;

        config.validate()?;

        log::info!("Configuration loaded from {:?}", path);
        Ok(config)
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(WallshufError::Config(ConfigError::NoConfigDir))?
            .join("wallshuf");

        Ok(config_dir.join("config.toml"))
    }

    /// The configured catalog, or the per-user default when none is set.
    pub fn catalog_path(&self) -> Result<PathBuf> {
        match &self.catalog {
            Some(catalog) => Ok(expand_tilde(catalog)),
            None => default_catalog_path(),
        }
    }

    fn validate(&self) -> Result<()> {
        if let Some(catalog) = &self.catalog {
            if catalog.trim().is_empty() {
                return Err(invalid_value("catalog", catalog));
            }
        }

        self.store.validate()
    }
}

impl StoreConfig {
    pub fn namespace(&self) -> String {
        self.namespace
            .clone()
            .unwrap_or_else(|| self.backend.default_namespace().to_string())
    }

    pub fn keys(&self) -> StoreKeys {
        let mut keys = StoreKeys::for_backend(self.backend);
        if let Some(filename_key) = &self.filename_key {
            keys.filename_key = filename_key.clone();
        }
        if let Some(options_key) = &self.options_key {
            keys.options_key = options_key.clone();
        }
        keys
    }

    fn validate(&self) -> Result<()> {
        let fields = [
            ("store.namespace", &self.namespace),
            ("store.filename_key", &self.filename_key),
            ("store.options_key", &self.options_key),
        ];

        for (field, value) in fields {
            if let Some(value) = value {
                if value.trim().is_empty() {
                    return Err(invalid_value(field, value));
                }
            }
        }

        if let (Some(filename_key), Some(options_key)) = (&self.filename_key, &self.options_key) {
            if filename_key == options_key {
                return Err(invalid_value("store.options_key", options_key));
            }
        }

        Ok(())
    }
}

fn invalid_value(field: &str, value: &str) -> WallshufError {
    WallshufError::Config(ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    })
}
