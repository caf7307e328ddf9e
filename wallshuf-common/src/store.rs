//! Desktop configuration store access.
//!
//! The desktop shell reads the active wallpaper from two string keys in its
//! settings store. [`ConfigStore`] is the minimal get/set surface over that
//! store; [`CommandStore`] reaches the real one through its command-line tool
//! and [`MemoryStore`] keeps everything in-process.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::catalog::expand_tilde;
use crate::command_builder::StoreCommandBuilder;
use crate::error::StoreError;
use crate::executor::ProcessExecutor;
use crate::Result;

/// Printed by GIO when no dconf session is reachable; writes then go nowhere.
const GSETTINGS_MEMORY_BACKEND_WARNING: &str = "'memory' GSettings backend";

pub trait ConfigStore {
    fn get(&self, key: &str) -> Result<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// dconf through `gsettings` (GNOME 3 and later)
    #[default]
    Gsettings,
    /// GConf through `gconftool-2` (GNOME 2)
    Gconf,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Gsettings => write!(f, "gsettings"),
            Backend::Gconf => write!(f, "gconf"),
        }
    }
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gsettings" | "dconf" => Ok(Backend::Gsettings),
            "gconf" | "gconftool-2" => Ok(Backend::Gconf),
            other => Err(format!("unknown store backend: {}", other)),
        }
    }
}

impl Backend {
    pub fn tool(&self) -> &'static str {
        match self {
            Backend::Gsettings => "gsettings",
            Backend::Gconf => "gconftool-2",
        }
    }

    /// Schema id for gsettings, key directory for GConf.
    pub fn default_namespace(&self) -> &'static str {
        match self {
            Backend::Gsettings => "org.gnome.desktop.background",
            Backend::Gconf => "/desktop/gnome/background",
        }
    }

    /// Renders a string the way the tool expects it on its command line.
    pub fn format_value(&self, value: &str) -> String {
        match self {
            Backend::Gsettings => gvariant_quote(value),
            Backend::Gconf => value.to_string(),
        }
    }

    /// Extracts the string value from the tool's `get` output.
    pub fn parse_value(&self, stdout: &str) -> String {
        match self {
            Backend::Gsettings => gvariant_unquote(stdout.trim()),
            Backend::Gconf => stdout.trim_end_matches(['\n', '\r']).to_string(),
        }
    }
}

/// How the wallpaper path is stored under the filename key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PathEncoding {
    /// The path as given.
    Plain,
    /// A `file://` URI of the tilde-expanded path.
    FileUri,
}

impl PathEncoding {
    pub fn encode(&self, path: &str) -> String {
        match self {
            PathEncoding::Plain => path.to_string(),
            PathEncoding::FileUri => {
                if path.starts_with("file://") {
                    return path.to_string();
                }
                format!("file://{}", expand_tilde(path).display())
            }
        }
    }

    pub fn decode(&self, raw: &str) -> String {
        match self {
            PathEncoding::Plain => raw.to_string(),
            PathEncoding::FileUri => raw.strip_prefix("file://").unwrap_or(raw).to_string(),
        }
    }
}

/// The well-known keys holding the active wallpaper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreKeys {
    pub filename_key: String,
    pub options_key: String,
    /// Mirror of the filename key some shells read instead (GNOME 42+ dark
    /// style). Written best-effort.
    pub dark_filename_key: Option<String>,
    pub path_encoding: PathEncoding,
}

impl StoreKeys {
    pub fn for_backend(backend: Backend) -> Self {
        match backend {
            Backend::Gsettings => Self {
                filename_key: "picture-uri".to_string(),
                options_key: "picture-options".to_string(),
                dark_filename_key: Some("picture-uri-dark".to_string()),
                path_encoding: PathEncoding::FileUri,
            },
            Backend::Gconf => Self {
                filename_key: "picture_filename".to_string(),
                options_key: "picture_options".to_string(),
                dark_filename_key: None,
                path_encoding: PathEncoding::Plain,
            },
        }
    }
}

/// The live desktop store, driven through `gsettings` or `gconftool-2`.
///
/// The tool is looked up on first use, so building a store never fails.
pub struct CommandStore {
    backend: Backend,
    namespace: String,
    tool_path: Option<PathBuf>,
}

impl CommandStore {
    pub fn new(backend: Backend, namespace: &str) -> Self {
        Self {
            backend,
            namespace: namespace.to_string(),
            tool_path: None,
        }
    }

    pub fn with_tool_path(backend: Backend, namespace: &str, tool_path: PathBuf) -> Self {
        Self {
            backend,
            namespace: namespace.to_string(),
            tool_path: Some(tool_path),
        }
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    fn builder(&self) -> Result<StoreCommandBuilder> {
        let tool_path = match &self.tool_path {
            Some(path) => path.clone(),
            None => {
                let path = which::which(self.backend.tool()).map_err(|e| StoreError::Unavailable {
                    tool: self.backend.tool().to_string(),
                    reason: e.to_string(),
                })?;
                log::debug!("Using {} at {:?}", self.backend, path);
                path
            }
        };

        Ok(StoreCommandBuilder::new(tool_path, self.backend, &self.namespace))
    }

    fn check_reachable(&self, stderr: &str) -> Result<()> {
        if self.backend == Backend::Gsettings && stderr.contains(GSETTINGS_MEMORY_BACKEND_WARNING) {
            return Err(StoreError::Unavailable {
                tool: self.backend.tool().to_string(),
                reason: "no dconf session available, settings would not persist".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

impl ConfigStore for CommandStore {
    fn get(&self, key: &str) -> Result<String> {
        let mut cmd = self.builder()?.build_get(key);
        let output = ProcessExecutor::run(self.backend.tool(), &mut cmd)?;
        self.check_reachable(&output.stderr)?;
        Ok(self.backend.parse_value(&output.stdout))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut cmd = self.builder()?.build_set(key, value);
        let output = ProcessExecutor::run(self.backend.tool(), &mut cmd)?;
        self.check_reachable(&output.stderr)?;
        log::info!("Set {} = {:?}", key, value);
        Ok(())
    }
}

/// In-process store. Unknown keys read as the empty string, matching a fresh
/// desktop profile.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    writes: Vec<(String, String)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `set` in call order.
    pub fn writes(&self) -> &[(String, String)] {
        &self.writes
    }
}

impl ConfigStore for MemoryStore {
    fn get(&self, key: &str) -> Result<String> {
        Ok(self.values.get(key).cloned().unwrap_or_default())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.writes.push((key.to_string(), value.to_string()));
        Ok(())
    }
}

/// GVariant text form of a string: single quotes, `\` and `'` escaped.
pub fn gvariant_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        if c == '\\' || c == '\'' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}

/// Inverse of [`gvariant_quote`]. Also accepts double quotes, which
/// `gsettings` uses when the string itself contains a single quote.
/// Unquoted input is returned unchanged.
pub fn gvariant_unquote(text: &str) -> String {
    let quote = match text.chars().next() {
        Some(c @ ('\'' | '"')) if text.len() >= 2 && text.ends_with(c) => c,
        _ => return text.to_string(),
    };
    let inner = &text[quote.len_utf8()..text.len() - quote.len_utf8()];

    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => value.push('\n'),
            Some('t') => value.push('\t'),
            Some(other) => value.push(other),
            None => value.push('\\'),
        }
    }
    value
}
