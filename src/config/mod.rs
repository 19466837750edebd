mod types;

pub use types::{parse_hex_color, BarConfig, Config, ConfigIssue, NotchConfig};

use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};

pub type SharedConfig = Arc<RwLock<Config>>;

const CONFIG_FILE: &str = "config.toml";

pub fn get_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("glimmer")
        .join(CONFIG_FILE)
}

pub fn load_config() -> Config {
    let config_path = get_config_path();

    let config = if config_path.exists() {
        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {:?}", config_path);
                    config
                }
                Err(e) => {
                    log::error!("Failed to parse config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                log::error!("Failed to read config file: {}", e);
                Config::default()
            }
        }
    } else {
        log::info!("No config file found at {:?}, using defaults", config_path);
        Config::default()
    };

    let issues = config.validate();
    for issue in &issues {
        if issue.is_error {
            log::error!("Config: {}", issue);
        } else {
            log::warn!("Config: {}", issue);
        }
    }

    if issues.iter().any(|issue| issue.is_error) {
        log::error!("Config has errors; falling back to defaults.");
        return Config::default();
    }

    config
}

/// Watches the config directory and swaps the shared config on change.
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    receiver: Receiver<Result<Event, notify::Error>>,
    config: SharedConfig,
    last_reload: Mutex<Instant>,
}

impl ConfigWatcher {
    pub fn new(config: SharedConfig) -> Result<Self, notify::Error> {
        let (tx, rx) = channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;

        let config_path = get_config_path();
        let config_dir = config_path.parent().unwrap_or(&config_path);
        if !config_dir.exists() {
            let _ = std::fs::create_dir_all(config_dir);
        }

        watcher.watch(config_dir, RecursiveMode::NonRecursive)?;
        log::info!("Watching config directory: {:?}", config_dir);

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
            config,
            last_reload: Mutex::new(Instant::now()),
        })
    }

    /// Drains pending watch events and reloads if the config file changed.
    /// Reloads are debounced; returns true if the config was swapped.
    pub fn check_and_reload(&self) -> bool {
        let mut touched = false;

        while let Ok(event) = self.receiver.try_recv() {
            match event {
                Ok(event) => {
                    let is_config = event
                        .paths
                        .iter()
                        .any(|p| p.file_name().map(|n| n == CONFIG_FILE).unwrap_or(false));
                    if is_config && (event.kind.is_modify() || event.kind.is_create()) {
                        touched = true;
                    }
                }
                Err(e) => {
                    log::error!("Config watch error: {}", e);
                }
            }
        }

        if !touched {
            return false;
        }

        let now = Instant::now();
        let elapsed = self
            .last_reload
            .lock()
            .map(|t| now.duration_since(*t))
            .unwrap_or(Duration::ZERO);
        if elapsed <= Duration::from_millis(500) {
            return false;
        }

        log::info!("Config file changed, reloading...");
        let new_config = load_config();
        let Ok(mut current) = self.config.write() else {
            return false;
        };
        *current = new_config;
        if let Ok(mut t) = self.last_reload.lock() {
            *t = now;
        }
        true
    }
}
