use std::io;

use anyhow::Result;
use serde::Deserialize;
use anyhow::{anyhow, Context};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_environment")]
    pub environment: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// Allowed CORS origins; empty means permissive.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8000, worker_threads: Some(4), cors_origins: Vec::new() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
    /// Apply pending migrations when the server starts.
    #[serde(default)]
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
            auto_migrate: false,
        }
    }
}

fn default_environment() -> String { "development".into() }
fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }

pub fn load_default() -> Result<AppConfig> {
    match std::env::var("CONFIG_PATH") {
        Ok(path) => load_or_default(&path, true),
        Err(_) => load_or_default(DEFAULT_CONFIG_PATH, false),
    }
}

/// Read and parse `path`. A missing file yields the defaults unless `required`;
/// any other read error and every parse error is returned.
pub fn load_or_default(path: &str, required: bool) -> Result<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound && !required => return Ok(AppConfig::default()),
        Err(e) => return Err(e).with_context(|| format!("cannot read config file {path}")),
    };
    parse(&content).with_context(|| format!("invalid config file {path}"))
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// `CONFIG_PATH` (must exist) or `config.toml` (optional), then env overrides, then validation.
    pub fn load() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.apply_env()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay `ENV`, `SERVER_HOST`, `SERVER_PORT`, `CORS_ORIGINS` and `AUTO_MIGRATE`.
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(env) = var("ENV") {
            self.environment = env;
        }
        if let Some(host) = var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("SERVER_PORT") {
            self.server.port = port
                .trim()
                .parse::<u16>()
                .map_err(|_| anyhow!("SERVER_PORT must be a number in 1..=65535, got '{port}'"))?;
        }
        if let Some(origins) = var("CORS_ORIGINS") {
            self.server.cors_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }
        if let Some(flag) = var("AUTO_MIGRATE") {
            self.database.auto_migrate = match flag.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                other => return Err(anyhow!("AUTO_MIGRATE must be true or false, got '{other}'")),
            };
        }
        Ok(())
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl DatabaseConfig {
    /// Single-connection in-memory SQLite, used by tests and quick local runs.
    pub fn sqlite_memory() -> Self {
        Self {
            url: "sqlite::memory:".into(),
            max_connections: 1,
            min_connections: 1,
            ..Self::default()
        }
    }

    pub fn normalize_from_env(&mut self) {
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn is_sqlite(&self) -> bool {
        self.url.to_lowercase().starts_with("sqlite:")
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://") || self.is_sqlite()) {
            return Err(anyhow!("database.url must start with postgres://, postgresql:// or sqlite:"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_toml_with_defaults() {
        let cfg = parse(
            r#"
            environment = "production"
            [server]
            host = "0.0.0.0"
            port = 9000
            [database]
            url = "postgres://u:p@db:5432/faculty"
            auto_migrate = true
            "#,
        )
        .unwrap();
        assert_eq!(cfg.environment, "production");
        assert_eq!(cfg.server.port, 9000);
        assert!(cfg.server.cors_origins.is_empty());
        assert_eq!(cfg.database.max_connections, 10);
        assert!(cfg.database.auto_migrate);
        assert_eq!(cfg.bind_addr(), "0.0.0.0:9000");
    }

    fn scratch_file(name: &str, content: Option<&str>) -> String {
        let path = std::env::temp_dir().join(format!("faculty-configs-{}-{name}.toml", std::process::id()));
        let _ = std::fs::remove_file(&path);
        if let Some(c) = content {
            std::fs::write(&path, c).unwrap();
        }
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn missing_optional_file_falls_back_to_defaults() {
        let path = scratch_file("absent", None);
        let cfg = load_or_default(&path, false).unwrap();
        assert_eq!(cfg.server.port, 8000);
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let path = scratch_file("required", None);
        let err = load_or_default(&path, true).unwrap_err();
        assert!(err.to_string().contains("cannot read config file"));
    }

    #[test]
    fn malformed_file_is_an_error_even_when_optional() {
        let path = scratch_file("malformed", Some("[server\nport = \"eighty\""));
        for required in [false, true] {
            let err = load_or_default(&path, required).unwrap_err();
            assert!(err.to_string().contains("invalid config file"), "{err:#}");
        }
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn env_overrides_are_applied_and_checked() {
        let vars = |pairs: &'static [(&'static str, &'static str)]| {
            move |key: &str| pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| v.to_string())
        };

        let mut cfg = AppConfig::default();
        cfg.apply_overrides(vars(&[
            ("SERVER_PORT", "9100"),
            ("CORS_ORIGINS", "http://a.test, ,http://b.test"),
            ("AUTO_MIGRATE", "yes"),
        ]))
        .unwrap();
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.server.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert!(cfg.database.auto_migrate);

        let mut cfg = AppConfig::default();
        assert!(cfg.apply_overrides(vars(&[("SERVER_PORT", "80a")])).is_err());
        assert!(cfg.apply_overrides(vars(&[("SERVER_PORT", "70000")])).is_err());
        assert_eq!(cfg.server.port, 8000);
        assert!(cfg.apply_overrides(vars(&[("AUTO_MIGRATE", "maybe")])).is_err());
    }

    #[test]
    fn rejects_unknown_scheme() {
        let db = DatabaseConfig { url: "mysql://root@localhost/x".into(), ..DatabaseConfig::default() };
        assert!(db.validate().is_err());
    }

    #[test]
    fn rejects_inverted_pool_bounds() {
        let db = DatabaseConfig {
            url: "postgres://localhost/x".into(),
            max_connections: 1,
            min_connections: 3,
            ..DatabaseConfig::default()
        };
        assert!(db.validate().is_err());
    }

    #[test]
    fn sqlite_memory_is_valid() {
        let db = DatabaseConfig::sqlite_memory();
        assert!(db.is_sqlite());
        db.validate().unwrap();
    }

    #[test]
    fn zero_workers_normalized() {
        let mut s = ServerConfig { worker_threads: Some(0), host: " ".into(), ..ServerConfig::default() };
        s.normalize().unwrap();
        assert_eq!(s.worker_threads, Some(4));
        assert_eq!(s.host, "127.0.0.1");
    }
}
