/// Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_audio")]
    pub audio: AudioSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    /// Directory holding one `<id>.json` per playtree
    #[serde(default = "default_playtrees_dir")]
    pub playtrees_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AudioSettings {
    /// OS audio player invoked per local item
    #[serde(default = "default_player_command")]
    pub player_command: String,

    /// Prefix prepended to local item uris
    #[serde(default)]
    pub audio_path: String,
}

impl ServerConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        let mut settings = config::Config::builder();

        // Load from config file if it exists
        let config_path = PathBuf::from("config.toml");
        if config_path.exists() {
            settings = settings.add_source(config::File::from(config_path));
        }

        // Override with environment variables (prefixed with PLAYTREE_)
        settings = settings.add_source(
            config::Environment::with_prefix("PLAYTREE")
                .separator("_")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        let mut config: ServerConfig = config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        // the bare AUDIO_PATH variable wins; the audio backend contract
        // names it directly
        if let Ok(path) = std::env::var("AUDIO_PATH") {
            config.audio.audio_path = path;
        }

        Ok(config)
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        playtrees_dir: default_playtrees_dir(),
    }
}

fn default_playtrees_dir() -> PathBuf {
    PathBuf::from("./playtrees")
}

fn default_audio() -> AudioSettings {
    AudioSettings {
        player_command: default_player_command(),
        audio_path: String::new(),
    }
}

fn default_player_command() -> String {
    "afplay".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
            audio: default_audio(),
        }
    }
}
