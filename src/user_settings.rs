use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::config::{find_network_by_chain_id, DEFAULT_CHAIN_ID};

const SETTINGS_FILE: &str = "paymygas_settings.json";

fn default_selected_chain_id() -> u64 {
    DEFAULT_CHAIN_ID
}

/// Showcase app settings that persist between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowcaseSettings {
    /// Recipient used by the live demo widgets
    #[serde(default)]
    pub recipient_address: String,
    /// Chain the demo wallet is pointed at
    #[serde(default = "default_selected_chain_id")]
    pub selected_chain_id: u64,
    /// Custom RPC overrides per chain ID
    #[serde(default)]
    pub custom_rpcs: HashMap<u64, String>,
}

impl Default for ShowcaseSettings {
    fn default() -> Self {
        Self {
            recipient_address: String::new(),
            selected_chain_id: default_selected_chain_id(),
            custom_rpcs: HashMap::new(),
        }
    }
}

impl ShowcaseSettings {
    /// Get the settings file path
    fn settings_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            let app_dir = config_dir.join("paymygas");
            if !app_dir.exists() {
                let _ = fs::create_dir_all(&app_dir);
            }
            app_dir.join(SETTINGS_FILE)
        } else {
            PathBuf::from(SETTINGS_FILE)
        }
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let path = Self::settings_path();
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(settings) => {
                        tracing::info!("Loaded settings from {:?}", path);
                        return settings;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse settings file: {}", e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read settings file: {}", e);
                }
            }
        }
        tracing::info!("Using default settings");
        Self::default()
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::settings_path();
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content)?;
        tracing::info!("Saved settings to {:?}", path);
        Ok(())
    }

    pub fn settings_path_display() -> String {
        Self::settings_path().display().to_string()
    }

    /// Get custom RPC for a chain, or None if using default
    pub fn get_custom_rpc(&self, chain_id: u64) -> Option<&String> {
        self.custom_rpcs.get(&chain_id).filter(|s| !s.is_empty())
    }

    /// Set custom RPC for a chain (empty string removes the override)
    pub fn set_custom_rpc(&mut self, chain_id: u64, rpc: String) {
        if rpc.trim().is_empty() {
            self.custom_rpcs.remove(&chain_id);
        } else {
            self.custom_rpcs.insert(chain_id, rpc.trim().to_string());
        }
    }

    /// RPC to use for a chain: the override if set, else the network default.
    pub fn effective_rpc(&self, chain_id: u64) -> Option<String> {
        self.get_custom_rpc(chain_id)
            .cloned()
            .or_else(|| find_network_by_chain_id(chain_id).map(|n| n.default_rpc.to_string()))
    }
}
