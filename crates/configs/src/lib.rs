use std::net::SocketAddr;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: Some(default_worker_threads()) }
    }
}

/// Location of the embedded store file.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { path: default_store_path() }
    }
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 3000 }
fn default_worker_threads() -> usize { 4 }
fn default_store_path() -> String { "data/todos.redb".into() }

fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    load_from_file(&config_path())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

/// `TODO_STORE`, or `LEVELDB` as used by earlier deployments.
fn store_path_from_env() -> Option<String> {
    ["TODO_STORE", "LEVELDB"]
        .iter()
        .find_map(|k| std::env::var(k).ok())
        .filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// Read `CONFIG_PATH` (default `config.toml`) when it exists, else build from env vars.
    /// A file that exists but fails to parse is an error, not a silent fallback.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = if Path::new(&config_path()).exists() {
            load_default()?
        } else {
            Self::from_env()
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// `SERVER_HOST`, `PORT`, `TOKIO_WORKER_THREADS` and `TODO_STORE` (alias `LEVELDB`), with defaults.
    pub fn from_env() -> Self {
        let host = std::env::var("SERVER_HOST").unwrap_or_else(|_| default_host());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or_else(default_port);
        let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok());
        let path = store_path_from_env().unwrap_or_else(default_store_path);
        Self {
            server: ServerConfig { host, port, worker_threads },
            store: StoreConfig { path },
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        // blanks left in the file are filled from env before any default applies
        self.server.normalize_from_env();
        self.store.normalize_from_env();
        self.server.normalize()?;
        self.store.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    pub fn normalize_from_env(&mut self) {
        if self.host.trim().is_empty() {
            if let Ok(host) = std::env::var("SERVER_HOST") {
                self.host = host;
            }
        }
    }

    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(default_worker_threads()),
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

impl StoreConfig {
    /// An empty `store.path` in the file is taken from `TODO_STORE` (or `LEVELDB`).
    pub fn normalize_from_env(&mut self) {
        if self.path.trim().is_empty() {
            if let Some(path) = store_path_from_env() {
                self.path = path;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.path.trim().is_empty() {
            return Err(anyhow!("store.path is empty; set it in config.toml or TODO_STORE"));
        }
        Ok(())
    }
}
