//! Connection profiles: named CMCI endpoints stored as TOML files.
//!
//! Profiles live under `$XDG_CONFIG_HOME/cicsctl/profiles/*.toml`, one file
//! per profile. The registry holds the in-memory aggregate and delegates
//! persistence to the storage port so tests can substitute a temp directory.

use crate::client::{CmciSession, Protocol};
use crate::error::CmciError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::PathBuf;
use std::sync::Arc;

/// Resolve the user's config home: `$XDG_CONFIG_HOME` when set, otherwise
/// the platform default config directory.
pub fn config_home() -> Result<PathBuf, CmciError> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            return Ok(PathBuf::from(xdg));
        }
    }
    directories::BaseDirs::new()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| {
            CmciError::Config("Unable to determine config directory (no home directory)".to_string())
        })
}

fn default_port() -> u16 {
    1490
}

fn default_protocol() -> Protocol {
    Protocol::Https
}

fn default_reject_unauthorized() -> bool {
    true
}

/// A stored CMCI connection profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmciProfile {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub user: String,
    pub password: String,
    #[serde(default = "default_protocol")]
    pub protocol: Protocol,
    #[serde(default = "default_reject_unauthorized")]
    pub reject_unauthorized: bool,
    /// Default target region for commands that don't name one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_name: Option<String>,
    /// CICSplex to route requests through, when the region is managed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cics_plex: Option<String>,
}

impl CmciProfile {
    /// Connection parameters for the transport.
    pub fn session(&self) -> CmciSession {
        CmciSession {
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            password: self.password.clone(),
            protocol: self.protocol,
            reject_unauthorized: self.reject_unauthorized,
        }
    }
}

/// A profile loaded from disk, with its source path.
#[derive(Debug, Clone)]
pub struct StoredProfile {
    pub profile_name: String,
    pub profile: CmciProfile,
    pub path: PathBuf,
}

/// Persistence port for profiles.
pub trait ProfileStorage: Send + Sync {
    fn list(&self) -> Result<Vec<StoredProfile>, CmciError>;
    fn path_for(&self, profile_name: &str) -> Result<PathBuf, CmciError>;
    fn save(&self, profile_name: &str, profile: &CmciProfile) -> Result<(), CmciError>;
    fn delete(&self, profile_name: &str) -> Result<(), CmciError>;
    fn profiles_dir(&self) -> Result<PathBuf, CmciError>;
}

pub struct XdgProfileStorage;

impl XdgProfileStorage {
    pub fn new() -> Self {
        Self
    }
}

impl Default for XdgProfileStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn profiles_dir() -> Result<PathBuf, CmciError> {
    let dir = config_home()?.join("cicsctl").join("profiles");
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            CmciError::Profile(format!(
                "Failed to create profiles directory {}: {}",
                dir.display(),
                e
            ))
        })?;
    }
    Ok(dir)
}

impl ProfileStorage for XdgProfileStorage {
    fn list(&self) -> Result<Vec<StoredProfile>, CmciError> {
        let profiles_dir = profiles_dir()?;

        let entries = std::fs::read_dir(&profiles_dir).map_err(|e| {
            CmciError::Profile(format!(
                "Failed to read profiles directory {}: {}",
                profiles_dir.display(),
                e
            ))
        })?;

        let mut loaded = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!(
                        "Failed to read directory entry in {}: {}",
                        profiles_dir.display(),
                        e
                    );
                    continue;
                }
            };

            let path = entry.path();
            if path.extension() != Some(OsStr::new("toml")) {
                continue;
            }

            let profile_name = match path.file_stem().and_then(|s| s.to_str()) {
                Some(name) => name.to_string(),
                None => {
                    tracing::warn!("Invalid profile filename (non-UTF8): {:?}", path);
                    continue;
                }
            };

            let content = match std::fs::read_to_string(&path) {
                Ok(c) => c,
                Err(e) => {
                    tracing::error!("Failed to read profile {}: {}", path.display(), e);
                    continue;
                }
            };

            let profile: CmciProfile = match toml::from_str(&content) {
                Ok(profile) => profile,
                Err(e) => {
                    tracing::error!("Failed to parse profile {}: {}", path.display(), e);
                    continue;
                }
            };

            loaded.push(StoredProfile {
                profile_name,
                profile,
                path,
            });
        }

        Ok(loaded)
    }

    fn path_for(&self, profile_name: &str) -> Result<PathBuf, CmciError> {
        let dir = profiles_dir()?;
        Ok(dir.join(format!("{}.toml", profile_name)))
    }

    fn save(&self, profile_name: &str, profile: &CmciProfile) -> Result<(), CmciError> {
        let profile_path = self.path_for(profile_name)?;
        let toml_content = toml::to_string_pretty(profile)
            .map_err(|e| CmciError::Profile(format!("Failed to serialize profile: {}", e)))?;
        std::fs::write(&profile_path, toml_content).map_err(|e| {
            CmciError::Profile(format!(
                "Failed to write profile to {}: {}",
                profile_path.display(),
                e
            ))
        })?;
        Ok(())
    }

    fn delete(&self, profile_name: &str) -> Result<(), CmciError> {
        let profile_path = self.path_for(profile_name)?;
        if !profile_path.exists() {
            return Err(CmciError::Profile(format!(
                "Profile not found: {}",
                profile_path.display()
            )));
        }
        std::fs::remove_file(&profile_path).map_err(|e| {
            CmciError::Profile(format!(
                "Failed to delete profile file {}: {}",
                profile_path.display(),
                e
            ))
        })
    }

    fn profiles_dir(&self) -> Result<PathBuf, CmciError> {
        profiles_dir()
    }
}

/// Profile registry: in-memory aggregate of loaded profiles.
pub struct ProfileRegistry {
    profiles: HashMap<String, CmciProfile>,
    storage: Arc<dyn ProfileStorage>,
}

impl ProfileRegistry {
    /// Create a registry backed by the default XDG storage.
    pub fn new() -> Self {
        Self::with_storage(Arc::new(XdgProfileStorage::new()))
    }

    pub fn with_storage(storage: Arc<dyn ProfileStorage>) -> Self {
        Self {
            profiles: HashMap::new(),
            storage,
        }
    }

    /// Load profiles from the storage directory.
    ///
    /// Invalid profile files are logged and skipped.
    pub fn load_from_xdg(&mut self) -> Result<(), CmciError> {
        for stored in self.storage.list()? {
            self.profiles.insert(stored.profile_name, stored.profile);
        }
        Ok(())
    }

    pub fn get(&self, profile_name: &str) -> Option<&CmciProfile> {
        self.profiles.get(profile_name)
    }

    pub fn get_or_error(&self, profile_name: &str) -> Result<&CmciProfile, CmciError> {
        self.get(profile_name)
            .ok_or_else(|| CmciError::Profile(format!("Profile not found: {}", profile_name)))
    }

    /// Profile names in sorted order.
    pub fn list_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.profiles.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn profile_path(&self, profile_name: &str) -> Result<PathBuf, CmciError> {
        self.storage.path_for(profile_name)
    }

    pub fn save_profile(&mut self, profile_name: &str, profile: &CmciProfile) -> Result<(), CmciError> {
        self.storage.save(profile_name, profile)?;
        self.profiles
            .insert(profile_name.to_string(), profile.clone());
        Ok(())
    }

    pub fn delete_profile(&mut self, profile_name: &str) -> Result<(), CmciError> {
        self.storage.delete(profile_name)?;
        self.profiles.remove(profile_name);
        Ok(())
    }

    pub fn profiles_dir(&self) -> Result<PathBuf, CmciError> {
        self.storage.profiles_dir()
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::new()
    }
}
