use std::path::{Path, PathBuf};

use crate::error::Error;

/// Project configuration loaded from `.yiinav.toml`.
/// Every field is an overridable convention; the defaults match a stock
/// Yii 1.x webapp skeleton.
pub struct Config {
    /// Controllers directory name under `protected` (default `controllers`).
    pub controllers_dir: String,
    /// Whether the tool is enabled. The engine never checks this itself;
    /// callers decide whether to invoke it at all.
    pub enabled: bool,
    /// Framework checkout location. Relative values are resolved against
    /// the workspace root; default `framework`.
    pub framework_dir: String,
    /// Modules directory name under `protected` (default `modules`).
    pub modules_dir: String,
    /// Private source root directory name (default `protected`).
    pub protected_dir: String,
    /// Views directory name (default `views`).
    pub views_dir: String,
}

/// Raw TOML structure for `.yiinav.toml`. Absent keys fall back per-field
/// so a config that only overrides one directory name stays one line long.
#[derive(serde::Deserialize)]
struct YiinavTomlConfig {
    #[serde(default)]
    controllers: Option<String>,
    #[serde(default)]
    enabled: Option<bool>,
    #[serde(default)]
    framework: Option<String>,
    #[serde(default)]
    modules: Option<String>,
    #[serde(default)]
    protected: Option<String>,
    #[serde(default)]
    views: Option<String>,
}

impl Config {
    /// Stock Yii 1.x directory conventions.
    pub fn defaults() -> Self {
        Self {
            controllers_dir: "controllers".to_string(),
            enabled: true,
            framework_dir: "framework".to_string(),
            modules_dir: "modules".to_string(),
            protected_dir: "protected".to_string(),
            views_dir: "views".to_string(),
        }
    }

    /// Absolute path of the framework tree for a given workspace root.
    pub fn framework_root(&self, workspace_root: &Path) -> PathBuf {
        let framework = Path::new(&self.framework_dir);
        if framework.is_absolute() {
            return framework.to_path_buf();
        }
        workspace_root.join(framework)
    }

    /// Load config from `.yiinav.toml` in the given root directory.
    /// Returns the defaults if the file doesn't exist. Returns an error if
    /// the file exists but is malformed — never silently falls back to
    /// defaults when the user wrote a config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(".yiinav.toml");
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::defaults()),
            Err(e) => return Err(Error::Io(e)),
        };

        let raw: YiinavTomlConfig = toml::from_str(&content)?;
        let defaults = Self::defaults();
        Ok(Self {
            controllers_dir: raw.controllers.unwrap_or(defaults.controllers_dir),
            enabled: raw.enabled.unwrap_or(defaults.enabled),
            framework_dir: raw.framework.unwrap_or(defaults.framework_dir),
            modules_dir: raw.modules.unwrap_or(defaults.modules_dir),
            protected_dir: raw.protected.unwrap_or(defaults.protected_dir),
            views_dir: raw.views.unwrap_or(defaults.views_dir),
        })
    }

    /// Absolute path of a module's directory for a given workspace root.
    pub fn module_root(&self, workspace_root: &Path, module: &str) -> PathBuf {
        self.protected_root(workspace_root)
            .join(&self.modules_dir)
            .join(module)
    }

    /// Absolute path of the private source root for a given workspace root.
    pub fn protected_root(&self, workspace_root: &Path) -> PathBuf {
        workspace_root.join(&self.protected_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.protected_dir, "protected");
        assert_eq!(config.views_dir, "views");
        assert!(config.enabled);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".yiinav.toml"), "views = \"templates\"\n").unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.views_dir, "templates");
        assert_eq!(config.controllers_dir, "controllers");
    }

    #[test]
    fn malformed_toml_is_an_error_not_a_fallback() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".yiinav.toml"), "views = [not toml").unwrap();
        assert!(Config::load(dir.path()).is_err());
    }
}
