//! Server configuration from environment variables.

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to listen on.
    pub bind_addr: String,
    /// Allowed CORS origins. Empty means any origin.
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// - `MISE_BIND_ADDR`: listen address (default: "0.0.0.0:3000")
    /// - `MISE_CORS_ORIGINS`: comma-separated allowed origins (default: any)
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let bind_addr = lookup("MISE_BIND_ADDR")
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let cors_origins = lookup("MISE_CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            bind_addr,
            cors_origins,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_vars(|_| None);
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn test_cors_origins_split() {
        let config = ServerConfig::from_vars(|key| match key {
            "MISE_CORS_ORIGINS" => Some("http://localhost:5173, https://mise.app,".to_string()),
            "MISE_BIND_ADDR" => Some("127.0.0.1:8080".to_string()),
            _ => None,
        });
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(
            config.cors_origins,
            vec!["http://localhost:5173", "https://mise.app"]
        );
    }
}
