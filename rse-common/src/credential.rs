//! Saved classifier credential
//!
//! Holds the optional token the user enters on the page. The value lives in
//! memory for the running session and is written back to the TOML config
//! (`classifier.token`) so it survives restarts. Persistence is best-effort:
//! a failed write is logged and the in-memory value is still used.
//!
//! Updates are serialized: the in-memory value and the file always end up
//! holding the token from the same `set` call.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{info, warn};

use crate::config::{load_toml_config, write_toml_config};

/// Where an update ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    /// Written to the config file
    Persisted,
    /// Kept in memory only (no config path, or the write failed)
    MemoryOnly,
}

/// Shared handle to the saved credential
///
/// Cloning shares the same value. `Debug` never prints the token.
///
/// [`CredentialStore::set`] does blocking file I/O when a config path is
/// set; async callers should run it on a blocking thread.
#[derive(Clone, Default)]
pub struct CredentialStore {
    token: Arc<RwLock<Option<String>>>,
    /// Held across the in-memory update and the config write
    update_lock: Arc<Mutex<()>>,
    config_path: Option<PathBuf>,
}

impl CredentialStore {
    /// In-memory store seeded with `initial` (blank counts as absent)
    pub fn new(initial: Option<String>) -> Self {
        Self {
            token: Arc::new(RwLock::new(normalize(initial.as_deref().unwrap_or("")))),
            update_lock: Arc::default(),
            config_path: None,
        }
    }

    /// Persist future updates to the TOML config at `path`
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn get(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_set(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Save a new token; blank input clears it
    pub fn set(&self, token: &str) -> Persistence {
        let token = normalize(token);
        let cleared = token.is_none();

        let _update = self.update_lock.lock().unwrap_or_else(PoisonError::into_inner);

        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token.clone();

        if cleared {
            info!("Classifier credential cleared");
        } else {
            info!("Classifier credential saved");
        }

        match &self.config_path {
            Some(path) => persist(path, token),
            None => Persistence::MemoryOnly,
        }
    }
}

fn persist(path: &Path, token: Option<String>) -> Persistence {
    let mut config = match load_toml_config(path) {
        Ok(config) => config,
        Err(e) => {
            warn!("Credential not persisted, config unreadable: {}", e);
            return Persistence::MemoryOnly;
        }
    };

    config.classifier.token = token;

    match write_toml_config(&config, path) {
        Ok(()) => {
            info!("Credential written to {}", path.display());
            Persistence::Persisted
        }
        Err(e) => {
            warn!("Credential not persisted (kept in memory): {}", e);
            Persistence::MemoryOnly
        }
    }
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore")
            .field("is_set", &self.is_set())
            .field("config_path", &self.config_path)
            .finish()
    }
}

fn normalize(token: &str) -> Option<String> {
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TomlConfig;
    use tempfile::TempDir;

    #[test]
    fn test_blank_initial_is_absent() {
        assert!(!CredentialStore::new(Some("   ".to_string())).is_set());
        assert!(!CredentialStore::new(None).is_set());
    }

    #[test]
    fn test_set_trims_and_clears() {
        let store = CredentialStore::default();
        assert_eq!(store.set("  hf_abc  "), Persistence::MemoryOnly);
        assert_eq!(store.get().as_deref(), Some("hf_abc"));

        store.set("");
        assert_eq!(store.get(), None);
    }

    #[test]
    fn test_clones_share_value() {
        let store = CredentialStore::default();
        let clone = store.clone();
        store.set("shared");
        assert_eq!(clone.get().as_deref(), Some("shared"));
    }

    #[test]
    fn test_debug_hides_token() {
        let store = CredentialStore::new(Some("secret-token".to_string()));
        let debug = format!("{:?}", store);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("is_set: true"));
    }

    #[test]
    fn test_persists_into_existing_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rse-ui.toml");

        let original = TomlConfig {
            port: 6000,
            ..TomlConfig::default()
        };
        write_toml_config(&original, &path).unwrap();

        let store = CredentialStore::default().with_config_path(&path);
        assert_eq!(store.set("persist-me"), Persistence::Persisted);

        let reloaded = load_toml_config(&path).unwrap();
        assert_eq!(reloaded.port, 6000);
        assert_eq!(reloaded.classifier.token.as_deref(), Some("persist-me"));

        store.set(" ");
        let reloaded = load_toml_config(&path).unwrap();
        assert_eq!(reloaded.classifier.token, None);
    }

    #[test]
    fn test_persists_when_config_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("rse-ui.toml");

        let store = CredentialStore::default().with_config_path(&path);
        assert_eq!(store.set("fresh"), Persistence::Persisted);
        assert!(path.exists());
    }

    #[test]
    fn test_concurrent_updates_leave_memory_and_file_in_agreement() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rse-ui.toml");
        let store = CredentialStore::default().with_config_path(&path);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    (0..10)
                        .map(|round| store.set(&format!("token-{}-{}", i, round)))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for handle in handles {
            let outcomes = handle.join().unwrap();
            assert!(outcomes.iter().all(|p| *p == Persistence::Persisted));
        }

        let reloaded = load_toml_config(&path).unwrap();
        assert_eq!(reloaded.classifier.token, store.get());
        assert!(store.is_set());
    }

    #[test]
    fn test_unparsable_config_stays_in_memory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rse-ui.toml");
        std::fs::write(&path, "port = [not valid").unwrap();

        let store = CredentialStore::default().with_config_path(&path);
        assert_eq!(store.set("kept"), Persistence::MemoryOnly);
        assert_eq!(store.get().as_deref(), Some("kept"));
    }
}
