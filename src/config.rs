use clap::{Args, ValueEnum};
use std::path::PathBuf;

const APP_DIR: &str = "arabic-vocab";

/// Where words and levels are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StorageBackend {
    /// `words.json` and `custom-levels.json` in the data directory
    #[default]
    Json,
    /// A `vocab.db` SQLite file in the data directory
    Sqlite,
    /// In-process only; lost on exit
    Memory,
}

/// Settings shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    /// Directory holding the word and level data
    #[arg(long, global = true, env = "VOCAB_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Storage backend
    #[arg(long, global = true, env = "VOCAB_BACKEND", value_enum, default_value_t = StorageBackend::Json)]
    pub backend: StorageBackend,

    /// Address the HTTP server binds to
    #[arg(long, global = true, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port the HTTP server listens on
    #[arg(long, global = true, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, env = "VOCAB_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub backend: StorageBackend,
    pub host: String,
    pub port: u16,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            backend: StorageBackend::default(),
            host: "127.0.0.1".to_string(),
            port: 3000,
            log_file: None,
        }
    }
}

impl Config {
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("vocab.db")
    }

    /// Host and port in a form `TcpListener::bind` resolves, so names like
    /// `localhost` and bare or bracketed IPv6 literals both work.
    pub fn bind_target(&self) -> (&str, u16) {
        let host = self.host.trim();
        let host = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);
        (host, self.port)
    }
}

impl From<ConfigArgs> for Config {
    fn from(args: ConfigArgs) -> Self {
        Self {
            data_dir: args.data_dir.unwrap_or_else(default_data_dir),
            backend: args.backend,
            host: args.host,
            port: args.port,
            log_file: args.log_file,
        }
    }
}

pub fn default_data_dir() -> PathBuf {
    if cfg!(target_os = "windows") {
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| "C:\\Users\\User".to_string());
        PathBuf::from(home).join(".local\\share").join(APP_DIR)
    } else {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/home/user".to_string());
        PathBuf::from(home).join(".local/share").join(APP_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        config: ConfigArgs,
    }

    #[test]
    fn test_explicit_arguments() {
        let cli = TestCli::try_parse_from([
            "test",
            "--data-dir",
            "/tmp/vocab",
            "--backend",
            "sqlite",
            "--port",
            "8080",
        ])
        .unwrap();
        let config = Config::from(cli.config);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/vocab"));
        assert_eq!(config.backend, StorageBackend::Sqlite);
        assert_eq!(config.port, 8080);
        assert_eq!(config.db_path(), PathBuf::from("/tmp/vocab/vocab.db"));
    }

    fn with_host(host: &str) -> Config {
        Config {
            host: host.to_string(),
            port: 4000,
            ..Config::default()
        }
    }

    #[test]
    fn test_bind_target() {
        assert_eq!(with_host("0.0.0.0").bind_target(), ("0.0.0.0", 4000));
        assert_eq!(with_host("[::1]").bind_target(), ("::1", 4000));
        assert_eq!(with_host("localhost").bind_target(), ("localhost", 4000));
    }

    #[tokio::test]
    async fn test_bind_target_resolves_names_and_ipv6() {
        for host in ["127.0.0.1", "::1", "[::1]", "localhost"] {
            let config = with_host(host);
            let mut addrs = tokio::net::lookup_host(config.bind_target()).await.unwrap();
            let addr = addrs.next().unwrap();
            assert_eq!(addr.port(), 4000);
            assert!(addr.ip().is_loopback(), "{host} resolved to {addr}");
        }
    }

    #[test]
    fn test_invalid_backend_rejected() {
        assert!(TestCli::try_parse_from(["test", "--backend", "redis"]).is_err());
    }

    #[test]
    fn test_default_data_dir_ends_with_app_dir() {
        assert!(default_data_dir().ends_with(APP_DIR));
    }
}
