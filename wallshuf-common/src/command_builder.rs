use std::path::PathBuf;
use std::process::Command;

use crate::store::Backend;

#[derive(Clone)]
pub struct StoreCommandBuilder {
    tool_path: PathBuf,
    backend: Backend,
    namespace: String,
}

impl StoreCommandBuilder {
    pub fn new(tool_path: PathBuf, backend: Backend, namespace: &str) -> Self {
        Self {
            tool_path,
            backend,
            namespace: namespace.to_string(),
        }
    }

    pub fn build_get(&self, key: &str) -> Command {
        let mut cmd = Command::new(&self.tool_path);
        match self.backend {
            Backend::Gsettings => {
                cmd.args(["get", &self.namespace, key]);
            }
            Backend::Gconf => {
                cmd.args(["--get", &self.gconf_key(key)]);
            }
        }
        cmd
    }

    pub fn build_set(&self, key: &str, value: &str) -> Command {
        let mut cmd = Command::new(&self.tool_path);
        let value = self.backend.format_value(value);
        match self.backend {
            Backend::Gsettings => {
                cmd.args(["set", &self.namespace, key, &value]);
            }
            Backend::Gconf => {
                cmd.args(["--type", "string", "--set", &self.gconf_key(key), &value]);
            }
        }
        cmd
    }

    // GConf keys are absolute paths below the namespace directory
    fn gconf_key(&self, key: &str) -> String {
        if key.starts_with('/') {
            return key.to_string();
        }
        format!("{}/{}", self.namespace.trim_end_matches('/'), key)
    }
}
