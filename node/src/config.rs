use anyhow::Result;
use config::{Config, File as ConfigFile};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Sled,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sled" => Ok(StorageBackend::Sled),
            "memory" | "mem" => Ok(StorageBackend::Memory),
            other => anyhow::bail!("Unknown storage backend '{other}' (expected sled or memory)"),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Sled => write!(f, "sled"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

/// Host process configuration, read from an optional TOML file and
/// `ZONN_`-prefixed environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    pub config_path: Option<PathBuf>,
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub storage_backend: StorageBackend,
    /// Imported at start when the store holds no profiles.
    pub genesis_file: Option<PathBuf>,
    /// Written with the exported state on shutdown.
    pub export_file: Option<PathBuf>,
    pub log_level: String,
    pub log_format: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        let data_dir = default_data_dir();
        Self {
            config_path: None,
            db_path: data_dir.join("db"),
            data_dir,
            storage_backend: StorageBackend::Sled,
            genesis_file: None,
            export_file: None,
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

impl NodeConfig {
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_path {
            if !path.exists() {
                anyhow::bail!(
                    "Configuration file {} not found (specified via --config)",
                    path.display()
                );
            }
            builder = builder.add_source(ConfigFile::from(path));
        }

        builder = builder.add_source(config::Environment::with_prefix("ZONN"));

        let config = builder.build()?;
        let defaults = NodeConfig::default();

        let data_dir = get_string_value(&config, &["data_dir", "storage.data_dir"])
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);
        // db_path follows data_dir unless set explicitly
        let db_path = get_string_value(&config, &["db_path", "storage.db_path"])
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("db"));
        let storage_backend = match get_string_value(&config, &["storage_backend", "storage.backend"]) {
            Some(value) => value.parse()?,
            None => defaults.storage_backend,
        };

        Ok(Self {
            config_path: config_path.map(Path::to_path_buf),
            data_dir,
            db_path,
            storage_backend,
            genesis_file: get_string_value(&config, &["genesis_file", "genesis.import_file"])
                .map(PathBuf::from),
            export_file: get_string_value(&config, &["export_file", "genesis.export_file"])
                .map(PathBuf::from),
            log_level: get_string_value(&config, &["log_level", "logging.level"])
                .unwrap_or(defaults.log_level),
            log_format: get_string_value(&config, &["log_format", "logging.format"])
                .unwrap_or(defaults.log_format),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.data_dir.as_os_str().is_empty() {
            anyhow::bail!("DATA_DIR must not be empty");
        }
        if self.storage_backend == StorageBackend::Sled && self.db_path.as_os_str().is_empty() {
            anyhow::bail!("DB_PATH must not be empty for the sled backend");
        }
        if !matches!(self.log_format.as_str(), "json" | "pretty") {
            anyhow::bail!(
                "LOG_FORMAT must be 'json' or 'pretty', got '{}'",
                self.log_format
            );
        }
        if let Some(genesis) = &self.genesis_file {
            if !genesis.exists() {
                anyhow::bail!("Genesis file {} not found", genesis.display());
            }
        }
        Ok(())
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("zonn"))
        .unwrap_or_else(|| PathBuf::from("./data"))
}

fn get_string_value(config: &Config, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        config
            .get_string(key)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}
