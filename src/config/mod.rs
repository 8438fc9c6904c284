use anyhow::{Context, anyhow};
use serde::Deserialize;
use std::path::PathBuf;

mod logs_config;
mod server_config;

pub use logs_config::LogsConfig;
pub use server_config::{DEFAULT_PORT, ServerConfig};

pub const PORT_ENV: &str = "PORT";

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logs: LogsConfig,
}

impl Config {
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).with_context(|| {
            "Error: Failed to parse configuration file.\n\
            Please check the file syntax is valid TOML syntax"
        })
    }
    /// Replaces the configured port with the value of the `PORT` variable.
    pub fn override_port(&mut self, port: Option<&str>) -> anyhow::Result<()> {
        if let Some(port) = port {
            self.server.port = port.trim().parse::<u16>().with_context(|| {
                format!("Error: Invalid {PORT_ENV} environment variable: '{port}'")
            })?;
        }
        Ok(())
    }
}

fn parse_config_path<I>(args: I) -> anyhow::Result<Option<PathBuf>>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter().skip(1);
    while let Some(arg) = args.next() {
        if arg == "-c" || arg == "--config" {
            return match args.next() {
                Some(path) => Ok(Some(PathBuf::from(path))),
                None => Err(anyhow!(
                    "Error: Please specify path string for -c argument. Usage: -c <config_file>"
                )),
            };
        }
    }
    Ok(None)
}

/// Builds the configuration from the command line and the environment.
///
/// `-c/--config <file>` is optional, without it every field keeps its
/// default. `PORT` wins over the port from the file.
pub fn load() -> anyhow::Result<Config> {
    let port = std::env::var(PORT_ENV).ok();
    load_from(std::env::args(), port.as_deref())
}

pub fn load_from<I>(args: I, port: Option<&str>) -> anyhow::Result<Config>
where
    I: IntoIterator<Item = String>,
{
    let mut config = match parse_config_path(args)? {
        Some(path) => {
            if !path.is_file() {
                return Err(anyhow!(
                    "Error: Configuration file not found or invalid.\n\
                    Please make sure that the configuration file exists and is a valid TOML file.\n\
                    Expected file path: {:?}",
                    path
                ));
            }
            let content = std::fs::read_to_string(&path).with_context(|| {
                "Error: Failed to read configuration file.\n\
                Please check the file path and file permissions, and make sure the file is valid accessible"
            })?;
            Config::from_toml(&content)?
        }
        None => Config::default(),
    };
    config.override_port(port)?;
    Ok(config)
}
