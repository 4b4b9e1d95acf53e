//! Server settings read from the environment.

use std::path::PathBuf;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_STATIC_DIR: &str = "./static";

pub const BIND_ADDR_VAR: &str = "CHECKERS_BIND_ADDR";
pub const STATIC_DIR_VAR: &str = "CHECKERS_STATIC_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = ServerConfig::default();
        ServerConfig {
            bind_addr: get(BIND_ADDR_VAR).unwrap_or(defaults.bind_addr),
            static_dir: get(STATIC_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn falls_back_to_defaults() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config, ServerConfig::default());

        let blank = ServerConfig::from_lookup(|_| Some(" ".to_string()));
        assert_eq!(blank.bind_addr, DEFAULT_BIND_ADDR);
    }

    #[test]
    fn reads_overrides() {
        let vars: HashMap<&str, &str> = [
            (BIND_ADDR_VAR, "0.0.0.0:9000"),
            (STATIC_DIR_VAR, "/srv/checkers"),
        ]
        .into_iter()
        .collect();
        let config = ServerConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.static_dir, PathBuf::from("/srv/checkers"));
    }
}
