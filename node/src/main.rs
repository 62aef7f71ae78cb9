use anyhow::{Context, Result};
use clap::{Arg, Command};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use zonn_identity::IdentityRegistry;
use zonn_storage::{MemoryStorage, SledStorage, Storage};
use zonn_types::GenesisState;

mod config;
mod version;

use config::{NodeConfig, StorageBackend};
use version::{git_commit_hash, ZONN_VERSION};

type Registry = IdentityRegistry<Arc<dyn Storage>>;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("zonn-node")
        .version(ZONN_VERSION)
        .about("Zonn identity registry node")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level (trace, debug, info, warn, error)"),
        )
        .get_matches();

    let mut config = NodeConfig::load(matches.get_one::<String>("config").map(Path::new))?;
    if let Some(level) = matches.get_one::<String>("log-level") {
        config.log_level = level.clone();
    }
    config.validate()?;

    init_logging(&config)?;
    info!(
        version = ZONN_VERSION,
        commit = git_commit_hash(),
        backend = %config.storage_backend,
        "Starting Zonn node"
    );

    let registry = IdentityRegistry::new(open_storage(&config)?);

    if let Some(path) = &config.genesis_file {
        import_genesis(&registry, path)?;
    }

    info!("Identity registry ready; press Ctrl-C to stop");
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("Shutdown signal received");

    shutdown(&registry, config.export_file.as_deref())?;
    info!("Zonn node stopped");
    Ok(())
}

fn open_storage(config: &NodeConfig) -> Result<Arc<dyn Storage>> {
    let storage: Arc<dyn Storage> = match config.storage_backend {
        StorageBackend::Sled => {
            fs::create_dir_all(&config.data_dir).with_context(|| {
                format!("failed to create data directory {}", config.data_dir.display())
            })?;
            Arc::new(SledStorage::open(&config.db_path)?)
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; state is lost on shutdown");
            Arc::new(MemoryStorage::new())
        }
    };
    Ok(storage)
}

/// Import `path` into an empty registry. A registry that already holds
/// profiles keeps its state and the file is ignored.
fn import_genesis(registry: &Registry, path: &Path) -> Result<bool> {
    if registry.has_profiles()? {
        info!(path = %path.display(), "Store already populated; skipping genesis import");
        return Ok(false);
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read genesis file {}", path.display()))?;
    let genesis: GenesisState = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse genesis file {}", path.display()))?;
    genesis
        .validate()
        .with_context(|| format!("invalid genesis file {}", path.display()))?;

    let profiles = genesis.profiles.len();
    registry.init_genesis(genesis)?;
    info!(path = %path.display(), profiles, "Genesis imported");
    Ok(true)
}

fn shutdown(registry: &Registry, export_file: Option<&Path>) -> Result<()> {
    if let Some(path) = export_file {
        let genesis = registry.export_genesis()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_vec_pretty(&genesis)?)
            .with_context(|| format!("failed to write export file {}", path.display()))?;
        info!(
            path = %path.display(),
            profiles = genesis.profiles.len(),
            "State exported"
        );
    }
    registry.storage().flush()?;
    Ok(())
}

fn init_logging(config: &NodeConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if config.log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use zonn_identity::TxContext;
    use zonn_types::{WalletAddress, ADDRESS_BYTES};

    fn addr(byte: u8) -> String {
        WalletAddress::from_bytes(&[byte; ADDRESS_BYTES]).to_string()
    }

    fn memory_registry() -> Registry {
        IdentityRegistry::new(Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn export_then_import_restores_state() {
        let dir = TempDir::new().unwrap();
        let export = dir.path().join("out").join("genesis.json");

        let source = memory_registry();
        let id = source
            .create_profile(&TxContext::new(addr(1), 10), "alice", "")
            .unwrap();
        source
            .link_wallet(&TxContext::new(addr(1), 11), &id, &addr(2))
            .unwrap();
        shutdown(&source, Some(&export)).unwrap();

        let restored = memory_registry();
        assert!(import_genesis(&restored, &export).unwrap());
        assert_eq!(restored.get_profile_by_wallet(&addr(2)).unwrap().profile_id, id);
        assert_eq!(
            restored.export_genesis().unwrap(),
            source.export_genesis().unwrap()
        );
    }

    #[test]
    fn import_skips_populated_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("genesis.json");
        fs::write(&path, "not even json").unwrap();

        let registry = memory_registry();
        registry
            .create_profile(&TxContext::new(addr(1), 1), "", "")
            .unwrap();
        assert!(!import_genesis(&registry, &path).unwrap());
    }

    #[test]
    fn import_runs_when_only_params_are_stored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("genesis.json");
        let source = memory_registry();
        source
            .create_profile(&TxContext::new(addr(5), 1), "", "")
            .unwrap();
        shutdown(&source, Some(&path)).unwrap();

        let registry = memory_registry();
        registry.set_params(zonn_types::Params::default()).unwrap();
        assert!(!registry.has_profiles().unwrap());
        assert!(import_genesis(&registry, &path).unwrap());
        assert!(registry.has_profiles().unwrap());
    }

    #[test]
    fn import_rejects_invalid_genesis() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("genesis.json");
        fs::write(
            &path,
            r#"{"profiles":[],"params":{"max_username_length":0,"default_metadata_uri":""}}"#,
        )
        .unwrap();

        let registry = memory_registry();
        let err = import_genesis(&registry, &path).unwrap_err();
        assert!(err.to_string().contains("invalid genesis"), "unexpected error: {err}");
        assert!(registry.list_profiles().unwrap().is_empty());
    }

    #[test]
    fn sled_backend_opens_under_data_dir() {
        let dir = TempDir::new().unwrap();
        let config = NodeConfig {
            data_dir: dir.path().join("data"),
            db_path: dir.path().join("data").join("db"),
            ..NodeConfig::default()
        };
        let registry = IdentityRegistry::new(open_storage(&config).unwrap());
        registry
            .create_profile(&TxContext::new(addr(3), 1), "", "")
            .unwrap();
        shutdown(&registry, None).unwrap();
        assert!(config.db_path.exists());
    }
}
