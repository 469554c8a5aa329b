use std::path::PathBuf;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// CORS origin allow-list; empty means permissive
    pub allowed_origins: Vec<String>,
    /// How long a disconnected player keeps their seat before removal
    pub grace_period: Duration,
    /// Enables the punishment mini-game flag on mid-round eliminations
    pub punishment_enabled: bool,
    pub wordlist_file: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            allowed_origins: Vec::new(),
            grace_period: Duration::from_secs(30),
            punishment_enabled: false,
            wordlist_file: PathBuf::from("wordlists.json"),
        }
    }
}

impl ServerConfig {
    /// Load config from environment variables
    pub fn from_env() -> Self {
        let port = std::env::var("WORDSPY_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3001);

        let allowed_origins: Vec<String> = std::env::var("WORDSPY_ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let grace_secs = std::env::var("WORDSPY_GRACE_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        let punishment_enabled = std::env::var("WORDSPY_PUNISHMENT")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);

        let wordlist_file = std::env::var("WORDSPY_WORDLIST_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("wordlists.json"));

        tracing::info!(
            port,
            grace_secs,
            punishment_enabled,
            origins = allowed_origins.len(),
            "Server config loaded"
        );

        Self {
            port,
            allowed_origins,
            grace_period: Duration::from_secs(grace_secs),
            punishment_enabled,
            wordlist_file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "WORDSPY_PORT",
            "WORDSPY_ALLOWED_ORIGINS",
            "WORDSPY_GRACE_SECS",
            "WORDSPY_PUNISHMENT",
            "WORDSPY_WORDLIST_FILE",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = ServerConfig::from_env();

        assert_eq!(config.port, 3001);
        assert!(config.allowed_origins.is_empty());
        assert_eq!(config.grace_period, Duration::from_secs(30));
        assert!(!config.punishment_enabled);
        assert_eq!(config.wordlist_file, PathBuf::from("wordlists.json"));
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("WORDSPY_PORT", "8080");
        std::env::set_var("WORDSPY_ALLOWED_ORIGINS", "https://a.example, https://b.example");
        std::env::set_var("WORDSPY_GRACE_SECS", "5");
        std::env::set_var("WORDSPY_PUNISHMENT", "true");

        let config = ServerConfig::from_env();
        assert_eq!(config.port, 8080);
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.grace_period, Duration::from_secs(5));
        assert!(config.punishment_enabled);

        clear_env();
    }
}
