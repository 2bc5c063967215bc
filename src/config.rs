use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8050;
pub const DEFAULT_DATA_PATH: &str = "PRY_Dash.xlsx";

const PORT_VAR: &str = "PORT";
const DATA_VAR: &str = "DASHBOARD_DATA";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var} value '{value}': expected a port number")]
    InvalidPort { var: &'static str, value: String },
}

/// Runtime settings, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub port: u16,
    pub data_path: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
        }
    }
}

impl DashboardConfig {
    /// Read `PORT` and `DASHBOARD_DATA` from the process environment.
    /// A positional argument, if given, overrides the data path.
    ///
    /// Never fails: a bad port is logged and the default is used.
    pub fn from_env() -> Self {
        let data_arg = std::env::args().nth(1);
        let config = Self::resolve(
            std::env::var(PORT_VAR).ok().as_deref(),
            std::env::var(DATA_VAR).ok().as_deref(),
            data_arg.as_deref(),
        );
        match config {
            Ok(c) => c,
            Err((c, e)) => {
                log::warn!("{e}; using port {}", c.port);
                c
            }
        }
    }

    /// Build a config from raw values. On a port error the fallback config
    /// is returned alongside the error.
    pub fn resolve(
        port: Option<&str>,
        data_env: Option<&str>,
        data_arg: Option<&str>,
    ) -> Result<Self, (Self, ConfigError)> {
        let data_path = data_arg
            .or(data_env)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

        match parse_port(port) {
            Ok(port) => Ok(Self { port, data_path }),
            Err(e) => Err((
                Self {
                    port: DEFAULT_PORT,
                    data_path,
                },
                e,
            )),
        }
    }
}

fn parse_port(raw: Option<&str>) -> Result<u16, ConfigError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(DEFAULT_PORT),
        Some(v) => v.parse::<u16>().map_err(|_| ConfigError::InvalidPort {
            var: PORT_VAR,
            value: v.to_string(),
        }),
    }
}
