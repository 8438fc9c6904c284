use serde::Deserialize;

pub const DEFAULT_PORT: u16 = 4100;

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: DEFAULT_PORT,
        }
    }
}
