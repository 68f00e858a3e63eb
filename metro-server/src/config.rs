//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::cache::CacheConfig;
use crate::fare::{FareFileError, FareTable};
use crate::planner::SearchConfig;

/// Default edge file, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "data/delhi_metro_edges.csv";

/// Default bind address.
pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Errors in the server configuration. All are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ServerConfigError {
    #[error("invalid METRO_ADDR {value:?}")]
    InvalidAddr { value: String },

    #[error("invalid METRO_DEADLINE_MS {value:?}")]
    InvalidDeadline { value: String },

    #[error("cannot read fare file {path}: {source}")]
    FareFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("bad fare file {path}: {source}")]
    Fares {
        path: String,
        #[source]
        source: FareFileError,
    },
}

/// Everything the binary needs to start serving.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Edge CSV (`METRO_DATA`).
    pub data_path: PathBuf,

    /// Optional JSON fare bands (`METRO_FARES`).
    pub fares_path: Option<PathBuf>,

    /// Bind address (`METRO_ADDR`).
    pub addr: SocketAddr,

    /// Planner settings; the deadline comes from `METRO_DEADLINE_MS`.
    pub search: SearchConfig,

    pub cache: CacheConfig,
}

impl ServerConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ServerConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ServerConfigError> {
        let data_path = lookup("METRO_DATA")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string())
            .into();

        let fares_path = lookup("METRO_FARES")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let addr_value = lookup("METRO_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr_value
            .parse()
            .map_err(|_| ServerConfigError::InvalidAddr { value: addr_value })?;

        let mut search = SearchConfig::default();
        if let Some(value) = lookup("METRO_DEADLINE_MS") {
            let ms: u64 = value
                .trim()
                .parse()
                .map_err(|_| ServerConfigError::InvalidDeadline { value })?;
            // Zero disables the deadline.
            search.deadline_ms = (ms > 0).then_some(ms);
        }

        Ok(Self {
            data_path,
            fares_path,
            addr,
            search,
            cache: CacheConfig::default(),
        })
    }

    /// Load the fare table, falling back to the Delhi Metro default.
    pub fn load_fares(&self) -> Result<FareTable, ServerConfigError> {
        let Some(path) = &self.fares_path else {
            return Ok(FareTable::delhi_metro());
        };
        let display = path.display().to_string();

        let json = std::fs::read_to_string(path).map_err(|source| ServerConfigError::FareFile {
            path: display.clone(),
            source,
        })?;

        FareTable::from_json(&json).map_err(|source| ServerConfigError::Fares {
            path: display,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, ServerConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_PATH));
        assert_eq!(config.addr, DEFAULT_ADDR.parse().unwrap());
        assert!(config.fares_path.is_none());
        assert_eq!(config.search.deadline_ms, Some(2000));
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("METRO_DATA", "/srv/edges.csv"),
            ("METRO_ADDR", "0.0.0.0:8080"),
            ("METRO_DEADLINE_MS", "250"),
            ("METRO_FARES", "/srv/fares.json"),
        ])
        .unwrap();

        assert_eq!(config.data_path, PathBuf::from("/srv/edges.csv"));
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.search.deadline_ms, Some(250));
        assert_eq!(config.fares_path, Some(PathBuf::from("/srv/fares.json")));
    }

    #[test]
    fn zero_deadline_disables() {
        let config = config(&[("METRO_DEADLINE_MS", "0")]).unwrap();
        assert_eq!(config.search.deadline_ms, None);
    }

    #[test]
    fn invalid_values() {
        assert!(matches!(
            config(&[("METRO_ADDR", "nowhere")]),
            Err(ServerConfigError::InvalidAddr { .. })
        ));
        assert!(matches!(
            config(&[("METRO_DEADLINE_MS", "soon")]),
            Err(ServerConfigError::InvalidDeadline { .. })
        ));
    }

    #[test]
    fn default_fares() {
        let config = config(&[]).unwrap();
        assert_eq!(config.load_fares().unwrap(), FareTable::delhi_metro());
    }

    #[test]
    fn fares_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"max_distance": 10.0, "fare": 15}}, {{"max_distance": null, "fare": 40}}]"#
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = config(&[("METRO_FARES", path.as_str())]).unwrap();
        let fares = config.load_fares().unwrap();
        assert_eq!(fares.calculate(12.0), 40);
    }

    #[test]
    fn bad_fare_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[]").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = config(&[("METRO_FARES", path.as_str())]).unwrap();
        assert!(matches!(
            config.load_fares(),
            Err(ServerConfigError::Fares { .. })
        ));

        let config = config_missing_file();
        assert!(matches!(
            config.load_fares(),
            Err(ServerConfigError::FareFile { .. })
        ));
    }

    fn config_missing_file() -> ServerConfig {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        config(&[("METRO_FARES", path.to_str().unwrap())]).unwrap()
    }
}
