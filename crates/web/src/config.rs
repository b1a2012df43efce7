use std::{env, error, fmt, num::ParseIntError};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort(String, ParseIntError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPort(value, why) => {
                write!(f, "invalid WEB_PORT `{}`: {}", value, why)
            }
        }
    }
}

impl error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::InvalidPort(_, why) => Some(why),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
        }
    }
}

impl WebConfig {
    /// Reads `WEB_HOST` and `WEB_PORT`, falling back to the defaults for
    /// variables that are not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(env::var("WEB_HOST").ok(), env::var("WEB_PORT").ok())
    }

    fn from_vars(host: Option<String>, port: Option<String>) -> Result<Self, ConfigError> {
        let port = match port {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|why| ConfigError::InvalidPort(port.clone(), why))?,
            None => DEFAULT_PORT,
        };
        Ok(Self {
            host: host.unwrap_or_else(|| DEFAULT_HOST.to_owned()),
            port,
        })
    }

    pub fn listen_address(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        assert_eq!(WebConfig::from_vars(None, None).unwrap(), WebConfig::default());
    }

    #[test]
    fn reads_host_and_port() {
        let config =
            WebConfig::from_vars(Some("127.0.0.1".to_owned()), Some("3000".to_owned()))
                .unwrap();
        assert_eq!(config.listen_address(), ("127.0.0.1", 3000));
    }

    #[test]
    fn rejects_bad_port() {
        let result = WebConfig::from_vars(None, Some("eighty".to_owned()));
        assert!(matches!(result, Err(ConfigError::InvalidPort(value, _)) if value == "eighty"));
    }
}
