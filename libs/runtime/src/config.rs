use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::paths::home_dir::resolve_home_dir;

/// Main application configuration: strongly-typed global sections plus a
/// per-module configuration bag.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Where local state lives.
    pub storage: StorageConfig,
    /// Logging configuration (optional, uses defaults if None).
    pub logging: Option<LoggingConfig>,
    /// Directory containing per-module YAML files (optional).
    #[serde(default)]
    pub modules_dir: Option<String>,
    /// Per-module configuration bag: module_name → arbitrary JSON/YAML value.
    #[serde(default)]
    pub modules: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    pub home_dir: String, // normalized to an absolute path on load
    /// Persisted snapshots directory, relative to `home_dir` unless absolute.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

/// Logging configuration - maps subsystem names to their logging settings.
/// Key "default" is the catch-all for logs that don't match explicit subsystems.
pub type LoggingConfig = HashMap<String, Section>;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Section {
    pub console_level: String, // "info", "debug", "error", "off"
    pub file: String,          // "logs/ptj.log"
    #[serde(default)]
    pub file_level: String,
    #[serde(default)]
    pub max_backups: Option<usize>,
    #[serde(default)]
    pub max_size_mb: Option<u64>,
}

fn default_data_dir() -> String {
    "data".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            // Empty => platform default ($HOME/.ptj or %APPDATA%/.ptj)
            home_dir: String::new(),
            data_dir: default_data_dir(),
        }
    }
}

/// Console quiet, file verbose, rotated at 20 MB keeping three backups.
pub fn default_logging_config() -> LoggingConfig {
    HashMap::from([(
        "default".to_string(),
        Section {
            console_level: "warn".into(),
            file: "logs/ptj.log".into(),
            file_level: "debug".into(),
            max_backups: Some(3),
            max_size_mb: Some(20),
        },
    )])
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            logging: Some(default_logging_config()),
            modules_dir: None,
            modules: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Layered loading: defaults → YAML file → `APP__`-prefixed environment.
    /// `storage.home_dir` comes back absolute and already created.
    pub fn load_layered<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let path = config_path.as_ref();
        if !path.is_file() {
            anyhow::bail!("config file not found: {}", path.display());
        }

        // Optional sections stay None unless YAML/ENV provides them.
        let base = AppConfig {
            logging: None,
            ..AppConfig::default()
        };

        let mut config: AppConfig = Figment::from(Serialized::defaults(base))
            .merge(Yaml::file(path))
            // APP__STORAGE__DATA_DIR=snapshots maps to storage.data_dir
            .merge(Env::prefixed("APP__").split("__"))
            .extract()
            .with_context(|| format!("Failed to parse yaml config '{}'", path.display()))?;

        config.storage.resolve_home()?;
        if let Some(dir) = config.modules_dir.clone() {
            merge_module_files(&mut config.modules, dir)?;
        }
        Ok(config)
    }

    /// Without a path the built-in defaults are used, home dir resolved all the same.
    pub fn load_or_default<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_layered(path);
        }
        let mut config = Self::default();
        config.storage.resolve_home()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config to YAML")
    }

    /// `-v` raises the console level of the "default" section; no flag keeps the file's value.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        let level = match args.verbose {
            0 => return,
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        let logging = self.logging.get_or_insert_with(default_logging_config);
        if let Some(section) = logging.get_mut("default") {
            section.console_level = level.to_string();
        }
    }

    /// Absolute path of the snapshots directory.
    pub fn data_dir(&self) -> PathBuf {
        let p = Path::new(&self.storage.data_dir);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            Path::new(&self.storage.home_dir).join(p)
        }
    }

    /// Typed view of one entry of the modules bag; a missing entry yields `T::default()`.
    pub fn module_config<T>(&self, module_name: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        match self.modules.get(module_name) {
            Some(raw) => serde_json::from_value(raw.clone())
                .with_context(|| format!("Invalid config for module '{}'", module_name)),
            None => Ok(T::default()),
        }
    }
}

/// Command line arguments that influence configuration.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config: Option<String>,
    pub print_config: bool,
    pub verbose: u8,
    pub mock: bool,
}

const HOME_SUBDIR: &str = ".ptj";

impl StorageConfig {
    /// Replaces `home_dir` with its absolute, created form. Blank means the platform default.
    fn resolve_home(&mut self) -> Result<()> {
        let requested = Some(self.home_dir.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_owned);
        let resolved = resolve_home_dir(requested, HOME_SUBDIR, true)
            .context("Failed to resolve storage.home_dir")?;
        self.home_dir = resolved.to_string_lossy().into_owned();
        Ok(())
    }
}

/// Every `<name>.yaml` / `<name>.yml` under `dir` becomes `modules.<name>`,
/// replacing any inline entry of the same name. A missing directory is not an error.
fn merge_module_files(
    bag: &mut HashMap<String, serde_json::Value>,
    dir: impl AsRef<Path>,
) -> Result<()> {
    let dir = dir.as_ref();
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read modules_dir '{}'", dir.display()))
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_yaml_file(path))
        .collect();
    // Deterministic precedence when both `x.yml` and `x.yaml` exist.
    files.sort();

    for path in files {
        let Some(module) = path.file_stem().and_then(|s| s.to_str()).map(str::to_owned) else {
            continue;
        };
        let file = std::fs::File::open(&path)
            .with_context(|| format!("Failed to open module file '{}'", path.display()))?;
        let parsed: serde_yaml::Value = serde_yaml::from_reader(file)
            .with_context(|| format!("Failed to parse yaml module file '{}'", path.display()))?;
        bag.insert(module, serde_json::to_value(parsed)?);
    }
    Ok(())
}

fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}
